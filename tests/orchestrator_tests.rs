use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use vitalrs::agents::{builtin_agent, FitnessCoachAgent, RemoteAiAgent, RemoteAiConfig};
use vitalrs::{
    Agent, AgentContext, AgentError, AgentInfo, AgentRecommendation, DailyMetrics, Orchestrator,
    Priority, RecommendationType, UserProfile,
};

/// Fan-out behaviour of the orchestrator with real and synthetic agents

#[cfg(test)]
mod orchestrator_tests {
    use super::*;

    enum Behaviour {
        Succeed(&'static [&'static str]),
        Fail,
        Panic,
    }

    struct ScriptedAgent {
        info: AgentInfo,
        behaviour: Behaviour,
    }

    impl ScriptedAgent {
        fn boxed(id: &str, behaviour: Behaviour) -> Box<dyn Agent> {
            Box::new(Self {
                info: AgentInfo::new(id, id, "scripted test agent"),
                behaviour,
            })
        }
    }

    #[async_trait]
    impl Agent for ScriptedAgent {
        fn info(&self) -> &AgentInfo {
            &self.info
        }

        async fn analyze(
            &self,
            _ctx: &AgentContext,
        ) -> Result<Vec<AgentRecommendation>, AgentError> {
            match self.behaviour {
                Behaviour::Succeed(titles) => Ok(titles
                    .iter()
                    .map(|title| {
                        AgentRecommendation::new(
                            &self.info.name,
                            RecommendationType::General,
                            *title,
                            "scripted",
                            Priority::Medium,
                        )
                    })
                    .collect()),
                Behaviour::Fail => Err(AgentError::Failed {
                    agent: self.info.id.clone(),
                    reason: "scripted failure".to_string(),
                }),
                Behaviour::Panic => panic!("scripted panic"),
            }
        }
    }

    fn history(days: i64) -> Vec<DailyMetrics> {
        (0..days)
            .map(|i| DailyMetrics {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() + Duration::days(i),
                sleep_hours: 7.5,
                sleep_efficiency: 88.0,
                hrv: 62.0,
                resting_hr: 58.0,
                steps: 9000,
                workout_minutes: 45,
                training_load: 40.0,
                stress_score: 35.0,
                mood_score: 4,
                energy_score: 4,
            })
            .collect()
    }

    fn context() -> AgentContext {
        AgentContext::from_history(UserProfile::default(), &history(14)).unwrap()
    }

    #[tokio::test]
    async fn test_failing_agent_is_skipped() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register_agent(ScriptedAgent::boxed("a", Behaviour::Succeed(&["a1", "a2"])));
        orchestrator.register_agent(ScriptedAgent::boxed("broken", Behaviour::Fail));
        orchestrator.register_agent(ScriptedAgent::boxed("c", Behaviour::Succeed(&["c1"])));

        let report = orchestrator.analyze_with_report(&context()).await;

        let titles: Vec<&str> = report.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2", "c1"]);
        assert_eq!(report.agents_run, 3);
        assert!(report.is_partial());
        assert_eq!(report.failures[0].agent(), "broken");
    }

    #[tokio::test]
    async fn test_panicking_agent_is_contained() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register_agent(ScriptedAgent::boxed("first", Behaviour::Succeed(&["one"])));
        orchestrator.register_agent(ScriptedAgent::boxed("boom", Behaviour::Panic));
        orchestrator.register_agent(ScriptedAgent::boxed("last", Behaviour::Succeed(&["two"])));

        let report = orchestrator.analyze_with_report(&context()).await;

        let titles: Vec<&str> = report.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two"]);
        assert!(matches!(
            report.failures.as_slice(),
            [AgentError::Panicked { agent }] if agent == "boom"
        ));
    }

    #[tokio::test]
    async fn test_unregistered_agent_no_longer_runs() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register_agent(ScriptedAgent::boxed("keep", Behaviour::Succeed(&["kept"])));
        orchestrator.register_agent(ScriptedAgent::boxed("drop", Behaviour::Succeed(&["dropped"])));

        assert!(orchestrator.unregister_agent("drop").is_some());
        let recs = orchestrator.analyze(&context()).await;

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "kept");
    }

    #[tokio::test]
    async fn test_builtin_agents_on_steady_history() {
        let mut orchestrator = Orchestrator::new();
        for id in ["sleep", "burnout-guardian", "planner"] {
            orchestrator.register_agent(builtin_agent(id, None).unwrap());
        }

        let report = orchestrator.analyze_with_report(&context()).await;

        assert!(!report.is_partial());
        assert!(report
            .recommendations
            .iter()
            .all(|r| r.agent != "Burnout Guardian"));
    }

    #[tokio::test]
    async fn test_seeded_fitness_coach_is_deterministic() {
        let mut titles = Vec::new();
        for _ in 0..2 {
            let mut orchestrator = Orchestrator::new();
            orchestrator.register_agent(Box::new(FitnessCoachAgent::with_seed(42)));
            let recs = orchestrator.analyze(&context()).await;
            titles.push(recs.into_iter().map(|r| r.title).collect::<Vec<_>>());
        }
        assert_eq!(titles[0], titles[1]);
    }

    #[tokio::test]
    async fn test_unreachable_remote_agent_still_contributes() {
        let agent = RemoteAiAgent::new(RemoteAiConfig {
            endpoint: "http://127.0.0.1:9/recommendations".to_string(),
            timeout_secs: 1,
            ..RemoteAiConfig::default()
        })
        .unwrap();

        let mut orchestrator = Orchestrator::new();
        orchestrator.register_agent(Box::new(agent));
        let report = orchestrator.analyze_with_report(&context()).await;

        assert!(!report.is_partial());
        assert_eq!(report.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn test_recommendation_ids_are_unique_across_agents() {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register_agent(ScriptedAgent::boxed("x", Behaviour::Succeed(&["same", "same"])));
        orchestrator.register_agent(ScriptedAgent::boxed("y", Behaviour::Succeed(&["same"])));

        let recs = orchestrator.analyze(&context()).await;
        let mut ids: Vec<_> = recs.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
