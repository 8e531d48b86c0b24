use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vitalrs::agents::{builtin_agent, BUILTIN_AGENT_IDS};
use vitalrs::{
    compute_baseline, compute_burnout_risk, compute_readiness, detect_anomalies, AgentContext,
    DailyMetrics, Orchestrator, UserProfile,
};

/// Benchmarks for the scoring engine and a full agent cycle
///
/// History sizes cover a fresh user up to several years of daily records.

fn create_history(days: usize) -> Vec<DailyMetrics> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    (0..days)
        .map(|i| {
            let wave = (i % 9) as f64;
            DailyMetrics {
                date: start + Duration::days(i as i64),
                sleep_hours: 6.5 + wave * 0.2,
                sleep_efficiency: 78.0 + wave,
                hrv: 50.0 + wave * 2.0,
                resting_hr: 56.0 + (i % 5) as f64,
                steps: 6000 + (i as u32 % 7) * 1000,
                workout_minutes: (i as u32 % 4) * 20,
                training_load: 20.0 + wave * 8.0,
                stress_score: 30.0 + wave * 5.0,
                mood_score: 3 + (i % 3) as u8,
                energy_score: 2 + (i % 4) as u8,
            }
        })
        .collect()
}

fn bench_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Baseline");

    for &size in &[7, 14, 365, 1500] {
        let history = create_history(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("compute_baseline", size),
            &history,
            |b, history| b.iter(|| compute_baseline(black_box(history))),
        );
    }

    group.finish();
}

fn bench_daily_scores(c: &mut Criterion) {
    let history = create_history(60);
    let ctx = AgentContext::from_history(UserProfile::default(), &history).unwrap();

    let mut group = c.benchmark_group("Daily Scores");
    group.bench_function("readiness", |b| {
        b.iter(|| compute_readiness(black_box(&ctx.today), &ctx.baseline, &ctx.last_7_days))
    });
    group.bench_function("burnout_risk", |b| {
        b.iter(|| compute_burnout_risk(black_box(&ctx.last_7_days), &ctx.baseline))
    });
    group.bench_function("anomalies", |b| {
        b.iter(|| detect_anomalies(black_box(&ctx.today), &ctx.baseline))
    });
    group.bench_function("context_from_history", |b| {
        b.iter(|| AgentContext::from_history(UserProfile::default(), black_box(&history)))
    });
    group.finish();
}

fn bench_analysis_cycle(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let history = create_history(90);
    let ctx = AgentContext::from_history(UserProfile::default(), &history).unwrap();

    let mut orchestrator = Orchestrator::new();
    for id in BUILTIN_AGENT_IDS {
        if let Some(agent) = builtin_agent(id, Some(7)) {
            orchestrator.register_agent(agent);
        }
    }

    c.bench_function("analysis_cycle_builtin_agents", |b| {
        b.iter(|| runtime.block_on(orchestrator.analyze(black_box(&ctx))))
    });
}

criterion_group!(benches, bench_baseline, bench_daily_scores, bench_analysis_cycle);
criterion_main!(benches);
