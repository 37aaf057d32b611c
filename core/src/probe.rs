//! # Probe Dispatcher
//!
//! Issues reachability probes over a unit's remote-action channel and
//! collects the raw results. The dispatcher owns the encoding of
//! target sets and the transport retry policy; it never decides what a
//! result means.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use nethealth_common::config::AssessConfig;
use nethealth_common::error::AssessError;
use nethealth_common::model::matrix::ProbeResult;
use nethealth_common::model::target::{TargetMap, UnitAddresses};
use nethealth_common::probing::ProbeRunner;
use nethealth_common::warn;

pub mod wire;

/// Action implemented by the probing agent on every health unit.
pub const PING_ACTION: &str = "ping";

#[derive(Clone)]
pub struct Dispatcher {
    runner: Arc<dyn ProbeRunner>,
    retries: u32,
    backoff: Duration,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn ProbeRunner>, cfg: &AssessConfig) -> Self {
        Self {
            runner,
            retries: cfg.probe_retries,
            backoff: cfg.retry_backoff,
        }
    }

    /// Probes every unit of one group from `prober`.
    ///
    /// The remote call blocks until the action converges and is
    /// awaited to completion. Transport failures are retried up to the
    /// configured budget with jittered, doubling backoff; whatever
    /// comes back is length-checked against the group's unit count
    /// before anyone downstream can misattribute a boolean.
    pub async fn probe_group(
        &self,
        prober: &str,
        group: &str,
        units: &UnitAddresses,
    ) -> Result<ProbeResult, AssessError> {
        let param: String = format!("targets={}", wire::encode_units(units));

        let mut attempt: u32 = 0;
        let responded: Vec<bool> = loop {
            match self.runner.run_action(prober, PING_ACTION, &param).await {
                Ok(responded) => break responded,
                Err(source) if attempt < self.retries => {
                    attempt += 1;
                    let delay = retry_delay(self.backoff, attempt);
                    warn!(
                        "probe from {prober} against {group} failed, \
                         retry {attempt} in {delay:?}: {source:#}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(source) => {
                    return Err(AssessError::ProbeDispatch {
                        prober: prober.to_owned(),
                        group: group.to_owned(),
                        source,
                    });
                }
            }
        };

        if responded.len() != units.len() {
            return Err(AssessError::ProbeResultShape {
                prober: prober.to_owned(),
                group: group.to_owned(),
                expected: units.len(),
                got: responded.len(),
            });
        }

        Ok(responded)
    }

    /// Probes every group in the target map from one prober, one
    /// action call per group so results stay attributable.
    pub async fn probe_all(
        &self,
        prober: &str,
        targets: &TargetMap,
    ) -> Result<BTreeMap<String, ProbeResult>, AssessError> {
        let mut results = BTreeMap::new();
        for (group, units) in targets {
            let result = self.probe_group(prober, group, units).await?;
            results.insert(group.clone(), result);
        }
        Ok(results)
    }
}

fn retry_delay(base: Duration, attempt: u32) -> Duration {
    let doubled: Duration = base.saturating_mul(1u32 << (attempt - 1).min(8));
    doubled.mul_f64(rand::random_range(0.75..1.25))
}
