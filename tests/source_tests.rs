use std::fs;
use tempfile::TempDir;
use vitalrs::source::MemorySource;
use vitalrs::{
    AgentContext, Chronotype, FileSource, Goal, MetricsSource, SourceError, VitalRsError,
};

/// Loading metrics and profiles from disk

#[cfg(test)]
mod source_tests {
    use super::*;

    const METRICS_CSV: &str = "\
date,sleepHours,sleepEfficiency,hrv,restingHr,steps,workoutMinutes,trainingLoad,stressScore,moodScore,energyScore
2024-04-03, 6.5, 80, 52, 63, 7000, 0, 20, 60, 3, 3
2024-04-01, 7.5, 88, 61, 58, 9500, 45, 55, 30, 4, 4
2024-04-02, 8.0, 90, 64, 57, 11000, 60, 70, 25, 5, 4
";

    const METRICS_JSON: &str = r#"[
  {"date":"2024-04-01","sleepHours":7.5,"sleepEfficiency":88,"hrv":61,"restingHr":58,
   "steps":9500,"workoutMinutes":45,"trainingLoad":55,"stressScore":30,"moodScore":4,"energyScore":4},
  {"date":"2024-04-02","sleepHours":8.0,"sleepEfficiency":90,"hrv":64,"restingHr":57,
   "steps":11000,"workoutMinutes":60,"trainingLoad":70,"stressScore":25,"moodScore":5,"energyScore":4}
]"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_csv_metrics_are_trimmed_and_ordered() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "metrics.csv", METRICS_CSV);

        let records = FileSource::new(path).load_metrics().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date.to_string(), "2024-04-01");
        assert_eq!(records[2].resting_hr, 63.0);
        assert_eq!(records[2].mood_score, 3);
    }

    #[test]
    fn test_json_metrics_build_a_context() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "metrics.json", METRICS_JSON);
        let source = FileSource::new(path);

        let history = source.load_metrics().unwrap();
        let ctx = AgentContext::from_history(source.load_profile().unwrap(), &history).unwrap();

        assert_eq!(ctx.today.date.to_string(), "2024-04-02");
        assert_eq!(ctx.last_7_days.len(), 2);
        assert_eq!(ctx.baseline.days_used, 2);
        assert!((ctx.baseline.hrv - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_profile_from_json_and_toml() {
        let dir = TempDir::new().unwrap();
        let metrics = write(&dir, "metrics.json", METRICS_JSON);
        let json_profile = write(
            &dir,
            "profile.json",
            r#"{"name":"Sam","goal":"build_muscle","chronotype":"night","trainingFrequency":4,"baselineSleepNeed":8.5,"examPhase":true}"#,
        );
        let toml_profile = write(
            &dir,
            "profile.toml",
            "name = \"Sam\"\ngoal = \"build_muscle\"\nchronotype = \"night\"\ntrainingFrequency = 4\nbaselineSleepNeed = 8.5\nexamPhase = true\n",
        );

        let from_json = FileSource::new(&metrics)
            .with_profile(json_profile)
            .load_profile()
            .unwrap();
        let from_toml = FileSource::new(&metrics)
            .with_profile(toml_profile)
            .load_profile()
            .unwrap();

        assert_eq!(from_json, from_toml);
        assert_eq!(from_json.goal, Goal::BuildMuscle);
        assert_eq!(from_json.chronotype, Chronotype::Night);
        assert!(from_json.exam_phase);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "metrics.json", "[{\"date\": \"not a date\"}]");

        let err = FileSource::new(path).load_metrics().unwrap_err();
        assert!(matches!(err, VitalRsError::Json(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "metrics.xml", "<metrics/>");

        let err = FileSource::new(path).load_metrics().unwrap_err();
        assert!(matches!(
            err,
            VitalRsError::Source(SourceError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_empty_history_has_no_context() {
        let source = MemorySource::default();
        let history = source.load_metrics().unwrap();
        assert!(AgentContext::from_history(source.load_profile().unwrap(), &history).is_none());
    }
}
