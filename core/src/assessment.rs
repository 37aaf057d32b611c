//! # Assessment Run
//!
//! The linear state machine tying the components together: resolve
//! the target map, build the visibility matrix, verify exposure when
//! any group is declared exposed, report. Terminal on success or on
//! the first fatal error; a verdict is never built from incomplete
//! data.
//!
//! Every component takes its inputs as explicit arguments. The only
//! ambient capabilities are the traits handed to [`Assessment::new`],
//! which is what lets a whole run execute against in-memory stubs.

use std::sync::Arc;

use nethealth_common::config::AssessConfig;
use nethealth_common::error::AssessError;
use nethealth_common::model::matrix::{ExposureVerdict, VisibilityMatrix};
use nethealth_common::model::status::StatusSnapshot;
use nethealth_common::model::target::TargetMap;
use nethealth_common::probing::{ExternalSiteBroker, ProbeRunner, StatusSource};
use nethealth_common::{error, info};

use crate::probe::Dispatcher;
use crate::{exposure, matrix, resolver};

/// How the exposure phase of a run ended.
#[derive(Debug)]
pub enum ExposureOutcome {
    /// No group was declared exposed; nothing to verify.
    NotApplicable,
    Verified(ExposureVerdict),
    /// The external site could not be created. The visibility matrix
    /// stands on its own.
    SetupFailed(AssessError),
}

/// Everything one run produces.
#[derive(Debug)]
pub struct AssessReport {
    pub targets: TargetMap,
    pub matrix: VisibilityMatrix,
    pub exposure: ExposureOutcome,
}

pub struct Assessment<'a> {
    status: &'a dyn StatusSource,
    runner: Arc<dyn ProbeRunner>,
    broker: &'a dyn ExternalSiteBroker,
    cfg: AssessConfig,
}

impl<'a> Assessment<'a> {
    pub fn new(
        status: &'a dyn StatusSource,
        runner: Arc<dyn ProbeRunner>,
        broker: &'a dyn ExternalSiteBroker,
        cfg: AssessConfig,
    ) -> Self {
        Self {
            status,
            runner,
            broker,
            cfg,
        }
    }

    pub async fn run(&self) -> Result<AssessReport, AssessError> {
        let snapshot = self.fetch_status().await?;
        let targets = resolver::resolve(&snapshot)?;
        let probers = prober_units(&snapshot, &self.cfg.health_group)?;

        info!(
            "probing {} groups from {} prober units",
            targets.len(),
            probers.len()
        );
        let dispatcher = Dispatcher::new(self.runner.clone(), &self.cfg);
        let matrix =
            matrix::build_matrix(&probers, &targets, &dispatcher, self.cfg.max_inflight).await?;

        // Policy may have changed while the probes ran. Groups are
        // judged by the flags the controller reports now, not by the
        // snapshot the matrix was built from.
        let declared = self.fetch_status().await?.exposed_groups();
        let exposure = if declared.is_empty() {
            info!("no group is declared exposed, skipping external probe");
            ExposureOutcome::NotApplicable
        } else {
            match exposure::verify_exposure(self.broker, &targets, &declared, &self.cfg).await {
                Ok(verdict) => ExposureOutcome::Verified(verdict),
                Err(err @ AssessError::ExternalProbeSetup { .. }) => {
                    error!("exposure verification skipped: {err:#}");
                    ExposureOutcome::SetupFailed(err)
                }
                Err(err) => return Err(err),
            }
        };

        Ok(AssessReport {
            targets,
            matrix,
            exposure,
        })
    }

    async fn fetch_status(&self) -> Result<StatusSnapshot, AssessError> {
        self.status
            .fetch()
            .await
            .map_err(|source| AssessError::StatusFetch { source })
    }
}

/// Unit ids of the group carrying the probing agent.
fn prober_units(snapshot: &StatusSnapshot, health_group: &str) -> Result<Vec<String>, AssessError> {
    let malformed = |reason: String| AssessError::MalformedSnapshot { reason };

    let apps = snapshot
        .applications
        .as_ref()
        .ok_or_else(|| malformed("no applications table".to_owned()))?;
    let group = apps
        .get(health_group)
        .ok_or_else(|| malformed(format!("prober group {health_group} is not deployed")))?;
    let units = group
        .units
        .as_ref()
        .ok_or_else(|| malformed(format!("prober group {health_group} has no units table")))?;

    if units.is_empty() {
        return Err(malformed(format!(
            "prober group {health_group} has no units"
        )));
    }
    Ok(units.keys().cloned().collect())
}
