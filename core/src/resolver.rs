//! # Address Resolver
//!
//! Turns a controller status snapshot into the probe target map.
//!
//! Every group in the snapshot gets exactly one entry. Units whose
//! address the platform has not assigned yet are kept with an explicit
//! `None` rather than dropped, so downstream probing can tell "target
//! not reachable yet" apart from "target never existed".

use nethealth_common::error::AssessError;
use nethealth_common::model::status::StatusSnapshot;
use nethealth_common::model::target::{TargetMap, UnitAddresses};

pub fn resolve(snapshot: &StatusSnapshot) -> Result<TargetMap, AssessError> {
    let apps = snapshot
        .applications
        .as_ref()
        .ok_or_else(|| malformed("no applications table"))?;

    let mut targets = TargetMap::new();
    for (group, app) in apps {
        let units = app
            .units
            .as_ref()
            .ok_or_else(|| malformed(&format!("group {group} has no units table")))?;

        let mut addresses = UnitAddresses::new();
        for (unit_id, unit) in units {
            // Controllers report a not-yet-assigned address as either
            // a missing field or an empty string.
            let address = unit
                .public_address
                .as_deref()
                .filter(|addr| !addr.is_empty())
                .map(str::to_owned);
            addresses.insert(unit_id.clone(), address);
        }
        targets.insert(group.clone(), addresses);
    }

    Ok(targets)
}

fn malformed(reason: &str) -> AssessError {
    AssessError::MalformedSnapshot {
        reason: reason.to_owned(),
    }
}
