//! Probe outcomes.

use std::collections::{BTreeMap, BTreeSet};

/// Outcome of one probe against one group: one flag per target unit,
/// `true` when that unit answered, in the target map's unit-id order.
pub type ProbeResult = Vec<bool>;

/// Prober unit id to target group to probe outcome.
///
/// Built once per assessment run and read-only afterward. Every
/// (prober, group) pair that was probed has exactly one entry; a hole
/// is an internal inconsistency, not an acceptable state.
pub type VisibilityMatrix = BTreeMap<String, BTreeMap<String, ProbeResult>>;

/// Reconciliation of observed external reachability against declared
/// exposure policy.
///
/// Groups unreachable from outside appear in neither set: they make no
/// exposure claim to verify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposureVerdict {
    /// Reachable from outside and declared exposed.
    pub passes: BTreeSet<String>,
    /// Reachable from outside without being declared exposed.
    pub fails: BTreeSet<String>,
}

impl ExposureVerdict {
    pub fn is_clean(&self) -> bool {
        self.fails.is_empty()
    }
}
