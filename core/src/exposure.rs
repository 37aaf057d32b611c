//! # Exposure Verifier
//!
//! Checks declared exposure policy against observed reality. A second,
//! independently networked deployment carries its own prober, so
//! reachability from it stands in for reachability from the public
//! internet rather than from within the deployment's private network.

use std::collections::{BTreeMap, BTreeSet};

use nethealth_common::config::AssessConfig;
use nethealth_common::error::AssessError;
use nethealth_common::model::matrix::{ExposureVerdict, ProbeResult};
use nethealth_common::model::target::TargetMap;
use nethealth_common::probing::ExternalSiteBroker;
use nethealth_common::{info, warn};

use crate::probe::Dispatcher;

/// Probes every group from an external vantage point and reconciles
/// what answered against the declared exposure set.
///
/// The external site is exclusively this verifier's for the run: no
/// other component dispatches through it, and it is handed back to the
/// broker once verdicts exist, on the error path included.
pub async fn verify_exposure(
    broker: &dyn ExternalSiteBroker,
    targets: &TargetMap,
    declared_exposed: &BTreeSet<String>,
    cfg: &AssessConfig,
) -> Result<ExposureVerdict, AssessError> {
    let site = broker
        .establish()
        .await
        .map_err(|source| AssessError::ExternalProbeSetup { source })?;
    info!(
        "external prober {} is up, probing {} groups",
        site.prober_unit,
        targets.len()
    );

    let dispatcher = Dispatcher::new(site.runner.clone(), cfg);
    let observed = dispatcher.probe_all(&site.prober_unit, targets).await;

    if let Err(err) = broker.teardown(site).await {
        warn!("external probe site teardown failed: {err:#}");
    }

    Ok(reconcile(&observed?, declared_exposed))
}

/// A group is reachable externally iff at least one of its units
/// answered. Reachable and declared is a pass, reachable without the
/// declaration is a policy violation, unreachable groups make no
/// exposure claim and land in neither set.
pub fn reconcile(
    observed: &BTreeMap<String, ProbeResult>,
    declared_exposed: &BTreeSet<String>,
) -> ExposureVerdict {
    let mut verdict = ExposureVerdict::default();
    for (group, result) in observed {
        if !result.contains(&true) {
            continue;
        }
        if declared_exposed.contains(group) {
            verdict.passes.insert(group.clone());
        } else {
            verdict.fails.insert(group.clone());
        }
    }
    verdict
}
