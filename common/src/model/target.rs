//! Probe target map.

use std::collections::BTreeMap;

/// Addresses of one group's units, keyed by unit id.
///
/// `None` marks a unit the platform has not assigned an address yet;
/// it stays in the map so a prober can tell "target not reachable yet"
/// apart from "target never existed".
pub type UnitAddresses = BTreeMap<String, Option<String>>;

/// Group name to unit addresses, one entry per group in the snapshot.
///
/// Ordered maps throughout: a probe result's boolean positions are only
/// attributable to units because iteration order is deterministic.
pub type TargetMap = BTreeMap<String, UnitAddresses>;
