//! End-to-end training runs for every learner.

mod common;

use common::{quick_config, quick_simulation};
use pursuit::{
    app::{AgentKind, App, ScenarioPreset, SimulationConfig},
    pipeline::{EpisodeOutcome, MetricsObserver, Observer, TrainingLoop},
};

#[test]
fn every_agent_kind_produces_one_point_per_batch() {
    let app = App::new();
    for kind in AgentKind::ALL {
        let record = app.run_experiment(&quick_config(kind, 21), Vec::new()).unwrap();

        assert_eq!(record.series.len(), 3, "{kind}");
        assert_eq!(record.total_train_episodes, 12);
        assert_eq!(record.label(), kind.description());
        let episodes: Vec<u64> = record.series.points.iter().map(|p| p.episode).collect();
        assert_eq!(episodes, vec![4, 8, 12]);
        for point in &record.series.points {
            assert_eq!(point.evaluated, 3);
            if let Some(stats) = point.stats {
                assert!(stats.min >= 1.0);
                assert!(stats.min <= stats.mean && stats.mean <= stats.max);
            }
        }
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let app = App::new();
    for kind in [AgentKind::Proposed, AgentKind::Centralized] {
        let first = app.run_experiment(&quick_config(kind, 5), Vec::new()).unwrap();
        let second = app.run_experiment(&quick_config(kind, 5), Vec::new()).unwrap();

        assert_eq!(first.series, second.series, "{kind}");
        assert_eq!(first.team, second.team, "{kind}");
    }
}

#[test]
fn different_seeds_diverge() {
    let app = App::new();
    let first = app
        .run_experiment(&quick_config(AgentKind::Independent, 1), Vec::new())
        .unwrap();
    let second = app
        .run_experiment(&quick_config(AgentKind::Independent, 2), Vec::new())
        .unwrap();
    assert_ne!(first.team, second.team);
}

#[test]
fn step_cap_marks_episodes_uncaptured() {
    let app = App::new();
    let config = quick_config(AgentKind::Random, 8).with_simulation(SimulationConfig {
        max_steps_per_episode: 2,
        ..quick_simulation()
    });

    let record = app.run_experiment(&config, Vec::new()).unwrap();

    for point in &record.series.points {
        let captured = point.stats.map_or(0, |stats| stats.count);
        assert_eq!(captured + point.uncaptured, point.evaluated);
        if let Some(stats) = point.stats {
            assert!(stats.max <= 2.0);
        }
    }
}

#[test]
fn observers_see_every_evaluation_episode() {
    struct Counter {
        captured: usize,
        abandoned: usize,
        batches: usize,
    }

    impl Observer for Counter {
        fn on_evaluation_episode(
            &mut self,
            _length: usize,
            outcome: EpisodeOutcome,
        ) -> pursuit::Result<()> {
            match outcome {
                EpisodeOutcome::Captured => self.captured += 1,
                EpisodeOutcome::Abandoned => self.abandoned += 1,
            }
            Ok(())
        }

        fn on_batch_end(&mut self, _point: &pursuit::analysis::SeriesPoint) -> pursuit::Result<()> {
            self.batches += 1;
            assert_eq!(self.captured + self.abandoned, self.batches * 3);
            Ok(())
        }
    }

    let app = App::new();
    let config = quick_config(AgentKind::SelfModel, 13);
    let mut game = app.create_game(&config).unwrap();
    let mut team = app.create_team(&config, &game).unwrap();

    let mut training = TrainingLoop::new(config.simulation, config.label())
        .with_observer(Box::new(Counter {
            captured: 0,
            abandoned: 0,
            batches: 0,
        }))
        .with_observer(Box::new(MetricsObserver::new()));
    let result = training.run(&mut game, team.as_mut()).unwrap();

    assert_eq!(result.curve.len(), 3);
    assert_eq!(training.episodes_trained(), 12);
}

#[test]
fn heterogeneous_preset_trains() {
    let app = App::new();
    let config = quick_config(AgentKind::Proposed, 3)
        .with_game(ScenarioPreset::Heterogeneous.game_config());
    let record = app.run_experiment(&config, Vec::new()).unwrap();
    assert_eq!(record.series.len(), 3);
}
