//! Capabilities the assessment borrows from the deployment platform.
//!
//! The core never talks to a controller directly. It is handed these
//! traits by the caller, which keeps every component's inputs explicit
//! and makes the whole run drivable from deterministic stubs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::status::StatusSnapshot;

/// Remote-action channel of a deployed prober unit.
#[async_trait]
pub trait ProbeRunner: Send + Sync {
    /// Invokes `action` on `unit` with a single string parameter and
    /// returns the ordered per-target outcomes.
    ///
    /// The call blocks until the action converges on the remote side,
    /// however long that takes; there is no transport-level timeout.
    async fn run_action(&self, unit: &str, action: &str, param: &str)
    -> anyhow::Result<Vec<bool>>;
}

/// Source of deployment status snapshots.
///
/// Fetched more than once per run: exposure flags are re-read right
/// before verification so policy changes made after convergence are
/// judged by their current state.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<StatusSnapshot>;
}

/// A prober standing outside the deployment boundary.
///
/// Reachability from here approximates reachability from the public
/// internet rather than from within the deployment's private network.
pub struct ExternalSite {
    /// Unit id of the prober inside the external deployment.
    pub prober_unit: String,
    pub runner: Arc<dyn ProbeRunner>,
}

/// Stands up and tears down the second, independently networked
/// deployment that hosts the external prober.
#[async_trait]
pub trait ExternalSiteBroker: Send + Sync {
    async fn establish(&self) -> anyhow::Result<ExternalSite>;

    /// Hands the site back once verdicts exist. Called on success and
    /// on error paths alike, after in-flight probes have drained.
    async fn teardown(&self, site: ExternalSite) -> anyhow::Result<()>;
}
