//! End-to-end runs: real workers, aggregator and barriers on a paused clock

mod common;

use std::time::Duration;

use aggregator::AggregatorError;
use common::helpers::Fault;
use common::{RecordingSpawner, TestFixtures, TestHelpers};
use orchestrator::services::{RandomDescriptorSource, ShutdownSignal};
use orchestrator::OrchestratorError;
use shared::{SharedError, UnitId, WorkerId, MAX_WORKERS};

#[tokio::test(start_paused = true)]
async fn test_three_workers_fill_order_of_one_hundred() {
    let config = TestFixtures::config(3, TestFixtures::SCENARIO_ORDER_SIZE);
    let descriptors = TestFixtures::descriptors(&TestFixtures::SCENARIO_CAPACITIES, TestFixtures::FAST_DELAY_MS);

    let outcome = TestHelpers::run_to_completion(config, descriptors).await.unwrap();

    TestHelpers::assert_balanced(&outcome, 100, 3);
    assert_eq!(outcome.workers.len(), 3);
    assert!(outcome.failed_workers.is_empty());
    for (summary, capacity) in outcome.workers.iter().zip(TestFixtures::SCENARIO_CAPACITIES) {
        assert!(summary.total_produced <= u64::from(capacity) * summary.cycles.max(1));
    }
}

#[tokio::test(start_paused = true)]
async fn test_scenario_holds_across_delay_interleavings() {
    for delay in [0, 1, 3, 7, 20] {
        let config = TestFixtures::config(3, TestFixtures::SCENARIO_ORDER_SIZE);
        let descriptors = TestFixtures::descriptors(&TestFixtures::SCENARIO_CAPACITIES, delay);

        let outcome = TestHelpers::run_to_completion(config, descriptors).await.unwrap();
        TestHelpers::assert_balanced(&outcome, 100, 3);
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_order_only_completions() {
    let config = TestFixtures::config(4, 0);
    let descriptors = TestFixtures::descriptors(&[10, 20, 30, 40], TestFixtures::FAST_DELAY_MS);

    let outcome = TestHelpers::run_to_completion(config, descriptors).await.unwrap();

    TestHelpers::assert_balanced(&outcome, 0, 4);
    assert!(outcome.report.workers.iter().all(|w| w.cycles == 0 && w.total_produced == 0));
    assert_eq!(outcome.workers.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_maximum_worker_count_runs() {
    let config = TestFixtures::config(MAX_WORKERS, 2_500);
    let descriptors = RandomDescriptorSource::from_config(&config, Some(42));

    let outcome = TestHelpers::run_to_completion(config, descriptors).await.unwrap();

    TestHelpers::assert_balanced(&outcome, 2_500, MAX_WORKERS);
}

#[tokio::test(start_paused = true)]
async fn test_more_workers_than_units() {
    let config = TestFixtures::config(5, 3);
    let descriptors = TestFixtures::descriptors(&[10, 10, 10, 10, 10], TestFixtures::FAST_DELAY_MS);

    let outcome = TestHelpers::run_to_completion(config, descriptors).await.unwrap();

    TestHelpers::assert_balanced(&outcome, 3, 5);
    let producing = outcome.report.workers.iter().filter(|w| w.cycles > 0).count();
    assert_eq!(producing, 1);
}

#[tokio::test(start_paused = true)]
async fn test_every_unit_is_reaped() {
    let spawner = RecordingSpawner::new();
    let config = TestFixtures::config(3, 100);
    let descriptors = TestFixtures::descriptors(&[40, 30, 50], TestFixtures::FAST_DELAY_MS);

    TestHelpers::run_with(config, descriptors, spawner.clone(), std::future::pending())
        .await
        .unwrap();

    let spawned = spawner.spawned_units();
    assert_eq!(spawned.len(), 4);
    assert!(spawned.contains(&UnitId::Aggregator));
    assert!(spawner.running_units().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_tears_down_and_stops_units() {
    let spawner = RecordingSpawner::new();
    // Ten-second cycles: the interrupt lands mid-production.
    let config = TestFixtures::config(3, 1_000).with_stall_timeout(Some(Duration::from_secs(60)));
    let descriptors = TestFixtures::descriptors(&[10, 10, 10], 10_000);
    let shutdown = tokio::time::sleep(Duration::from_millis(500));

    let result = TestHelpers::run_with(config, descriptors, spawner.clone(), shutdown).await;

    assert!(matches!(result, Err(OrchestratorError::Interrupted)));
    TestHelpers::settle().await;
    assert_eq!(spawner.spawned_units().len(), 4);
    assert!(spawner.running_units().is_empty(), "interrupt must stop every unit");
}

/// A request made while units are still being set up is honored once they exist
#[tokio::test(start_paused = true)]
async fn test_shutdown_requested_before_run_tears_down() {
    let spawner = RecordingSpawner::new();
    let config = TestFixtures::config(3, 1_000);
    let descriptors = TestFixtures::descriptors(&[10, 10, 10], TestFixtures::FAST_DELAY_MS);
    let shutdown = ShutdownSignal::new();
    shutdown.trigger();

    let result = TestHelpers::run_with(config, descriptors, spawner.clone(), shutdown.triggered()).await;

    assert!(matches!(result, Err(OrchestratorError::Interrupted)));
    TestHelpers::settle().await;
    assert_eq!(spawner.spawned_units().len(), 4);
    assert!(spawner.running_units().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_crashed_worker_does_not_hang_the_run() {
    let spawner = RecordingSpawner::with_fault(Fault::Crash(WorkerId(2)));
    let config = TestFixtures::config(3, 100).with_stall_timeout(None);
    let descriptors = TestFixtures::descriptors(&[40, 30, 50], TestFixtures::FAST_DELAY_MS);

    let result = TestHelpers::run_with(config, descriptors, spawner.clone(), std::future::pending()).await;

    match result {
        Err(OrchestratorError::AggregatorFailed(AggregatorError::ReceiveFailed { finished, expected, source })) => {
            assert_eq!(finished, 2);
            assert_eq!(expected, 3);
            assert!(matches!(source, SharedError::ChannelClosed { .. }));
        }
        other => panic!("expected aggregator failure, got {other:?}"),
    }
    TestHelpers::settle().await;
    assert!(spawner.running_units().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_crashed_aggregator_does_not_hang_the_run() {
    let spawner = RecordingSpawner::with_fault(Fault::CrashAggregator);
    let config = TestFixtures::config(3, 100).with_reap_timeout(Some(Duration::from_secs(5)));
    let descriptors = TestFixtures::descriptors(&[40, 30, 50], TestFixtures::FAST_DELAY_MS);

    let run = TestHelpers::run_with(config, descriptors, spawner.clone(), std::future::pending());
    let result = tokio::time::timeout(Duration::from_secs(3_600), run)
        .await
        .expect("orchestrator still waiting on a dead aggregator");

    match result {
        Err(OrchestratorError::UnitJoin { unit, message }) => {
            assert_eq!(unit, UnitId::Aggregator.to_string());
            assert!(message.starts_with("panicked"), "unexpected join failure: {message}");
        }
        other => panic!("expected aggregator join failure, got {other:?}"),
    }
    TestHelpers::settle().await;
    assert_eq!(spawner.spawned_units().len(), 4);
    assert!(spawner.running_units().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lingering_unit_hits_reap_timeout() {
    let spawner = RecordingSpawner::with_fault(Fault::Linger(WorkerId(1), Duration::from_secs(3_600)));
    let config = TestFixtures::config(2, 50).with_reap_timeout(Some(Duration::from_secs(5)));
    let descriptors = TestFixtures::descriptors(&[20, 20], TestFixtures::FAST_DELAY_MS);

    let result = TestHelpers::run_with(config, descriptors, spawner.clone(), std::future::pending()).await;

    assert!(matches!(result, Err(OrchestratorError::ReapTimeout { waited_ms: 5_000 })));
    TestHelpers::settle().await;
    assert!(spawner.running_units().is_empty(), "failed teardown must stop the lingering unit");
}
