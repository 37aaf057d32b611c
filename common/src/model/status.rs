//! Deployment status as reported by the controller.
//!
//! Mirrors the controller's JSON status format: applications keyed by
//! name, units keyed by id, kebab-case field names. Structural pieces
//! the resolver depends on (`applications`, per-group `units`) are kept
//! as `Option` instead of defaulting to empty, so a snapshot missing
//! them can be rejected as malformed rather than treated as vacuously
//! healthy.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// One running instance within a group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnitStatus {
    /// Network address, absent until the platform assigns one.
    pub public_address: Option<String>,
}

/// A named collection of co-deployed units sharing a role.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationStatus {
    /// Declared external-exposure policy at snapshot time.
    #[serde(default)]
    pub exposed: bool,
    pub units: Option<BTreeMap<String, UnitStatus>>,
}

/// Snapshot of a converged deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusSnapshot {
    pub applications: Option<BTreeMap<String, ApplicationStatus>>,
}

impl StatusSnapshot {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let snapshot: StatusSnapshot = serde_json::from_str(raw)?;
        Ok(snapshot)
    }

    /// Groups whose declared policy says they should be reachable from
    /// outside the deployment boundary.
    pub fn exposed_groups(&self) -> BTreeSet<String> {
        self.applications
            .iter()
            .flatten()
            .filter(|(_, app)| app.exposed)
            .map(|(name, _)| name.clone())
            .collect()
    }
}
