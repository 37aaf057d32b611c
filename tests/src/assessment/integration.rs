#![cfg(test)]
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use nethealth_common::config::AssessConfig;
use nethealth_common::error::AssessError;
use nethealth_core::assessment::{Assessment, ExposureOutcome};

use crate::stubs::{ScriptedBroker, ScriptedNetwork, ScriptedStatus, EXTERNAL_PROBER};

const ALL_UNITS: &[&str] = &["ubuntu/0", "ubuntu/1", "network-health/0"];

/// Two workload units plus one prober, converged, nothing exposed.
const CONVERGED: &str = r#"{
    "applications": {
        "ubuntu": {
            "exposed": false,
            "units": {
                "ubuntu/0": {"public-address": "10.0.0.1"},
                "ubuntu/1": {"public-address": "10.0.0.2"}
            }
        },
        "network-health": {
            "exposed": false,
            "units": {
                "network-health/0": {"public-address": "10.0.0.9"}
            }
        }
    }
}"#;

/// Same deployment after `expose ubuntu` went through.
const UBUNTU_EXPOSED: &str = r#"{
    "applications": {
        "ubuntu": {
            "exposed": true,
            "units": {
                "ubuntu/0": {"public-address": "10.0.0.1"},
                "ubuntu/1": {"public-address": "10.0.0.2"}
            }
        },
        "network-health": {
            "exposed": false,
            "units": {
                "network-health/0": {"public-address": "10.0.0.9"}
            }
        }
    }
}"#;

fn cfg() -> AssessConfig {
    AssessConfig {
        probe_retries: 0,
        retry_backoff: Duration::ZERO,
        ..AssessConfig::default()
    }
}

fn names(groups: &[&str]) -> BTreeSet<String> {
    groups.iter().map(|g| g.to_string()).collect()
}

#[tokio::test]
async fn healthy_unexposed_deployment_skips_the_external_probe() {
    let status = ScriptedStatus::from_json(&[CONVERGED]);
    let internal = Arc::new(ScriptedNetwork::full_mesh(&["network-health/0"], ALL_UNITS));
    let broker = ScriptedBroker::new(Arc::new(ScriptedNetwork::new()));

    let assessment = Assessment::new(&status, internal, &broker, cfg());
    let report = assessment.run().await.unwrap();

    // One prober times two groups, every unit visible.
    assert_eq!(report.matrix.len(), 1);
    let row = &report.matrix["network-health/0"];
    assert_eq!(row.len(), 2);
    assert_eq!(row["ubuntu"], vec![true, true]);

    // The prober is a target of its own group's probe and saw itself.
    assert_eq!(row["network-health"], vec![true]);

    assert!(matches!(report.exposure, ExposureOutcome::NotApplicable));
    assert_eq!(*broker.established.lock().unwrap(), 0);
}

#[tokio::test]
async fn exposure_flags_are_read_at_verification_time() {
    // The matrix is built from the first snapshot, where nothing is
    // exposed yet; the expose lands before verification.
    let status = ScriptedStatus::from_json(&[CONVERGED, UBUNTU_EXPOSED]);
    let internal = Arc::new(ScriptedNetwork::full_mesh(&["network-health/0"], ALL_UNITS));
    let external = Arc::new(
        ScriptedNetwork::new()
            .reach(EXTERNAL_PROBER, "ubuntu/0")
            .reach(EXTERNAL_PROBER, "ubuntu/1"),
    );
    let broker = ScriptedBroker::new(external);

    let assessment = Assessment::new(&status, internal, &broker, cfg());
    let report = assessment.run().await.unwrap();

    match &report.exposure {
        ExposureOutcome::Verified(verdict) => {
            assert_eq!(verdict.passes, names(&["ubuntu"]));
            assert!(verdict.fails.is_empty());
        }
        other => panic!("expected a verdict, got {other:?}"),
    }
    assert_eq!(*broker.established.lock().unwrap(), 1);
    assert_eq!(*broker.torn_down.lock().unwrap(), 1);
}

#[tokio::test]
async fn undeclared_reachable_group_is_a_policy_violation() {
    let status = ScriptedStatus::from_json(&[UBUNTU_EXPOSED]);
    let internal = Arc::new(ScriptedNetwork::full_mesh(&["network-health/0"], ALL_UNITS));
    // The external vantage point reaches the prober group too, which
    // nobody declared.
    let external = Arc::new(
        ScriptedNetwork::new()
            .reach(EXTERNAL_PROBER, "ubuntu/0")
            .reach(EXTERNAL_PROBER, "network-health/0"),
    );
    let broker = ScriptedBroker::new(external);

    let assessment = Assessment::new(&status, internal, &broker, cfg());
    let report = assessment.run().await.unwrap();

    match &report.exposure {
        ExposureOutcome::Verified(verdict) => {
            assert_eq!(verdict.passes, names(&["ubuntu"]));
            assert_eq!(verdict.fails, names(&["network-health"]));
            assert!(!verdict.is_clean());
        }
        other => panic!("expected a verdict, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_groups_make_no_exposure_claim() {
    let status = ScriptedStatus::from_json(&[UBUNTU_EXPOSED]);
    let internal = Arc::new(ScriptedNetwork::full_mesh(&["network-health/0"], ALL_UNITS));
    // External vantage point reaches nothing at all.
    let broker = ScriptedBroker::new(Arc::new(ScriptedNetwork::new()));

    let assessment = Assessment::new(&status, internal, &broker, cfg());
    let report = assessment.run().await.unwrap();

    match &report.exposure {
        ExposureOutcome::Verified(verdict) => {
            assert!(verdict.passes.is_empty());
            assert!(verdict.fails.is_empty());
        }
        other => panic!("expected a verdict, got {other:?}"),
    }
}

#[tokio::test]
async fn external_site_failure_keeps_visibility_results() {
    let status = ScriptedStatus::from_json(&[UBUNTU_EXPOSED]);
    let internal = Arc::new(ScriptedNetwork::full_mesh(&["network-health/0"], ALL_UNITS));
    let broker = ScriptedBroker::failing();

    let assessment = Assessment::new(&status, internal, &broker, cfg());
    let report = assessment.run().await.unwrap();

    assert_eq!(report.matrix.len(), 1);
    assert!(matches!(
        report.exposure,
        ExposureOutcome::SetupFailed(AssessError::ExternalProbeSetup { .. })
    ));
}

#[tokio::test]
async fn internal_probe_failure_aborts_the_run() {
    let status = ScriptedStatus::from_json(&[CONVERGED]);
    let internal = Arc::new(
        ScriptedNetwork::full_mesh(&["network-health/0"], ALL_UNITS)
            .failing_against("ubuntu/0"),
    );
    let broker = ScriptedBroker::new(Arc::new(ScriptedNetwork::new()));

    let assessment = Assessment::new(&status, internal, &broker, cfg());
    let err = assessment.run().await.unwrap_err();

    match err {
        AssessError::ProbeDispatch { prober, group, .. } => {
            assert_eq!(prober, "network-health/0");
            assert_eq!(group, "ubuntu");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn repeated_runs_yield_identical_verdicts() {
    let status = ScriptedStatus::from_json(&[UBUNTU_EXPOSED]);
    let internal = Arc::new(ScriptedNetwork::full_mesh(&["network-health/0"], ALL_UNITS));
    let external = Arc::new(ScriptedNetwork::new().reach(EXTERNAL_PROBER, "ubuntu/1"));
    let broker = ScriptedBroker::new(external);

    let assessment = Assessment::new(&status, internal, &broker, cfg());
    let first = assessment.run().await.unwrap();
    let second = assessment.run().await.unwrap();

    match (&first.exposure, &second.exposure) {
        (ExposureOutcome::Verified(a), ExposureOutcome::Verified(b)) => assert_eq!(a, b),
        other => panic!("expected two verdicts, got {other:?}"),
    }
    assert_eq!(first.matrix, second.matrix);
}

#[tokio::test]
async fn missing_prober_group_is_rejected_up_front() {
    let status = ScriptedStatus::from_json(&[r#"{
        "applications": {
            "ubuntu": {"units": {"ubuntu/0": {"public-address": "10.0.0.1"}}}
        }
    }"#]);
    let internal = Arc::new(ScriptedNetwork::new());
    let broker = ScriptedBroker::new(Arc::new(ScriptedNetwork::new()));

    let assessment = Assessment::new(&status, internal.clone(), &broker, cfg());
    let err = assessment.run().await.unwrap_err();

    assert!(matches!(err, AssessError::MalformedSnapshot { .. }));
    // Nothing was probed on a snapshot that cannot carry a run.
    assert!(internal.calls.lock().unwrap().is_empty());
}
