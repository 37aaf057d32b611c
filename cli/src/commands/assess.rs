use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use tracing::info_span;

use nethealth_common::config::AssessConfig;
use nethealth_common::success;
use nethealth_core::assessment::{AssessReport, Assessment, ExposureOutcome};

use crate::commands::AssessArgs;
use crate::controller::{ControllerCli, ExternalModelBroker};
use crate::nprint;
use crate::terminal::{format, print};

pub async fn assess(args: AssessArgs) -> anyhow::Result<()> {
    let cfg = AssessConfig {
        probe_retries: args.retries,
        retry_backoff: Duration::from_millis(args.backoff_ms),
        max_inflight: args.max_inflight,
        health_group: args.health_group.clone(),
        quiet: args.quiet,
    };

    print::banner(cfg.quiet);
    print::header("network health assessment", cfg.quiet);

    let controller = Arc::new(ControllerCli::new(args.controller.clone(), args.model.clone()));
    let broker = ExternalModelBroker::new(args.controller.clone(), args.health_group.clone());

    let span = info_span!("assessment", indicatif.pb_show = true);
    let guard = span.enter();

    let start_time: Instant = Instant::now();
    let assessment = Assessment::new(controller.as_ref(), controller.clone(), &broker, cfg.clone());
    let report = assessment.run().await?;

    drop(guard);

    report_ends(&report, start_time.elapsed(), &cfg)
}

fn report_ends(report: &AssessReport, total_time: Duration, cfg: &AssessConfig) -> anyhow::Result<()> {
    print::header("neighbor visibility", cfg.quiet);
    for (idx, (prober, row)) in report.matrix.iter().enumerate() {
        print::tree_head(idx, prober);
        print::as_tree_one_level(format::row_to_details(row));
        if idx + 1 != report.matrix.len() {
            nprint!();
        }
    }

    match &report.exposure {
        ExposureOutcome::NotApplicable => {
            nprint!();
            print::print_status("no group is declared exposed, external probe skipped");
        }
        ExposureOutcome::Verified(verdict) => {
            print::header("exposure", cfg.quiet);
            print::as_tree_one_level(format::verdict_details(verdict));
            if !verdict.is_clean() {
                let culprits: Vec<String> = verdict.fails.iter().cloned().collect();
                anyhow::bail!("exposure policy violated by: {}", culprits.join(", "));
            }
        }
        ExposureOutcome::SetupFailed(err) => {
            // Visibility results above still stand; the run as a whole
            // cannot be called healthy without the external check.
            anyhow::bail!("exposure verification could not run: {err}");
        }
    }

    print_summary(report, total_time, cfg);
    Ok(())
}

fn print_summary(report: &AssessReport, total_time: Duration, cfg: &AssessConfig) {
    let probers: ColoredString = format!("{} probers", report.matrix.len()).bold().green();
    let groups: ColoredString = format!("{} groups", report.targets.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Assessment complete: {probers} against {groups} in {total_time}")
        .color(crate::terminal::colors::TEXT_DEFAULT)
        .to_string();

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            nprint!();
            success!("{}", output)
        }
    }
}
