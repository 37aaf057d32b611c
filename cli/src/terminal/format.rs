//! Turns assessment results into tree details for the terminal.

use std::collections::BTreeMap;

use colored::*;

use nethealth_common::model::matrix::{ExposureVerdict, ProbeResult};
use nethealth_common::model::target::TargetMap;

use crate::terminal::colors;

type Detail = (String, ColoredString);

/// One line per target group: how many of its units the prober saw.
pub fn row_to_details(row: &BTreeMap<String, ProbeResult>) -> Vec<Detail> {
    row.iter()
        .map(|(group, result)| (group.clone(), visibility_summary(result)))
        .collect()
}

fn visibility_summary(result: &ProbeResult) -> ColoredString {
    let reached: usize = result.iter().filter(|r| **r).count();
    let total: usize = result.len();
    let summary: String = format!("{reached}/{total} reachable");

    if total == 0 {
        "no units".italic().color(colors::SEPARATOR)
    } else if reached == total {
        summary.green()
    } else if reached > 0 {
        summary.yellow()
    } else {
        summary.red()
    }
}

/// Per-group unit listings with their resolved addresses.
pub fn target_details(targets: &TargetMap) -> Vec<(String, Vec<Detail>)> {
    targets
        .iter()
        .map(|(group, units)| {
            let details: Vec<Detail> = units
                .iter()
                .map(|(unit, address)| {
                    let value: ColoredString = match address {
                        Some(address) => address.normal(),
                        None => "no address yet".italic().bright_black(),
                    };
                    (unit.clone(), value)
                })
                .collect();
            (group.clone(), details)
        })
        .collect()
}

pub fn verdict_details(verdict: &ExposureVerdict) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::new();
    for group in &verdict.passes {
        details.push((group.clone(), "exposed as declared".green()));
    }
    for group in &verdict.fails {
        details.push((group.clone(), "reachable but not declared exposed".red().bold()));
    }
    details
}
