use foundation_testing::scenarios::{
    run_aborted_round, run_phased, run_pipeline, run_resource_pool, PhasedConfig, PipelineConfig,
    PoolConfig,
};
use foundation_testing::stress::sync::run_queue_handoff_stress;
use foundation_testing::{PerformanceReport, ScenarioError, StressConfig};
use serial_test::serial;
use tracing_test::traced_test;

/// WHY: A pipeline with more producers than slots still delivers everything
/// WHAT: 6 producers through a single slot into 2 consumers
#[test]
#[ntest::timeout(20000)]
fn test_pipeline_through_single_slot() {
    let report = run_pipeline(
        PipelineConfig::new()
            .producers(6)
            .consumers(2)
            .items_per_producer(150)
            .capacity(1),
    )
    .unwrap();

    assert_eq!(report.delivered, 900);
    assert_eq!(report.per_consumer.len(), 2);
}

/// WHY: Rounds, reset and pools compose without leaking state between runs
/// WHAT: Back-to-back phased, aborted and pooled runs all succeed
#[test]
#[ntest::timeout(20000)]
fn test_barrier_and_pool_scenarios_back_to_back() {
    let phased = run_phased(PhasedConfig::new().parties(3).rounds(40)).unwrap();
    assert_eq!(phased.final_generation, 40);

    assert_eq!(run_aborted_round(3).unwrap(), 2);

    let pool = run_resource_pool(PoolConfig::new().permits(4).clients(8)).unwrap();
    assert!(pool.peak <= 4);
}

/// WHY: Misconfigured scenarios fail fast instead of spawning threads
/// WHAT: Zero consumers with work queued is rejected
#[test]
fn test_pipeline_without_consumers_is_rejected() {
    let err = run_pipeline(PipelineConfig::new().consumers(0)).unwrap_err();

    assert_eq!(
        err,
        ScenarioError::InvalidConfig("pipeline has items to deliver but no consumers")
    );
}

/// WHY: The stress drivers report through the log facade
/// WHAT: A clean handoff run logs its summary and renders a report
#[test]
#[traced_test]
#[serial]
fn test_handoff_stress_logs_summary() {
    let result = run_queue_handoff_stress(StressConfig::new().threads(4).iterations(200), 2);

    assert!(result.is_clean(), "{result:?}");
    assert!(logs_contain("stress run finished: 800 ops"));

    let report = PerformanceReport::new(
        "handoff",
        foundation_testing::Metrics::new(result.total_operations(), result.duration),
    );
    assert!(report.to_string().contains("Operations: 800"));
}
