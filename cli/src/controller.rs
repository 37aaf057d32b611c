//! Adapters over the deployment controller's command line.
//!
//! The core only knows the capability traits from
//! `nethealth_common::probing`; everything controller-shaped (argument
//! order, JSON output formats, model scoping) is confined to here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use nethealth_common::model::status::StatusSnapshot;
use nethealth_common::probing::{ExternalSite, ExternalSiteBroker, ProbeRunner, StatusSource};

/// Name of the model the external probe site is deployed into.
const EXTERNAL_SITE_MODEL: &str = "nethealth-external";

/// A controller binary, optionally scoped to one model.
pub struct ControllerCli {
    program: String,
    model: Option<String>,
}

impl ControllerCli {
    pub fn new(program: impl Into<String>, model: Option<String>) -> Self {
        Self {
            program: program.into(),
            model,
        }
    }

    fn scoped_args(&self, args: &[&str]) -> Vec<String> {
        let mut full: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        if let Some(model) = &self.model {
            full.extend(["-m".to_string(), model.clone()]);
        }
        full
    }

    async fn run(&self, args: Vec<String>) -> anyhow::Result<Vec<u8>> {
        let rendered: String = args.join(" ");
        debug!("running {} {rendered}", self.program);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .with_context(|| format!("spawning {}", self.program))?;

        anyhow::ensure!(
            output.status.success(),
            "{} {rendered} exited with {}: {}",
            self.program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Ok(output.stdout)
    }
}

#[async_trait]
impl StatusSource for ControllerCli {
    async fn fetch(&self) -> anyhow::Result<StatusSnapshot> {
        let stdout = self
            .run(self.scoped_args(&["status", "--format", "json"]))
            .await?;
        let raw = String::from_utf8(stdout).context("status output is not utf-8")?;
        StatusSnapshot::from_json(&raw).context("parsing status snapshot")
    }
}

#[async_trait]
impl ProbeRunner for ControllerCli {
    async fn run_action(
        &self,
        unit: &str,
        action: &str,
        param: &str,
    ) -> anyhow::Result<Vec<bool>> {
        let stdout = self
            .run(self.scoped_args(&[
                "run-action", unit, action, param, "--wait", "--format", "json",
            ]))
            .await?;
        let results: Vec<bool> = serde_json::from_slice(&stdout)
            .with_context(|| format!("parsing {action} results from {unit}"))?;
        Ok(results)
    }
}

/// Frozen snapshot on disk, for offline target resolution.
pub struct FileStatusSource {
    path: PathBuf,
}

impl FileStatusSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl StatusSource for FileStatusSource {
    async fn fetch(&self) -> anyhow::Result<StatusSnapshot> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        StatusSnapshot::from_json(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))
    }
}

/// Stands the external probe site up as a second model under the same
/// controller, with its own health unit.
pub struct ExternalModelBroker {
    program: String,
    health_charm: String,
}

impl ExternalModelBroker {
    pub fn new(program: impl Into<String>, health_charm: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            health_charm: health_charm.into(),
        }
    }
}

#[async_trait]
impl ExternalSiteBroker for ExternalModelBroker {
    async fn establish(&self) -> anyhow::Result<ExternalSite> {
        let controller = ControllerCli::new(self.program.clone(), None);
        controller
            .run(vec!["add-model".to_string(), EXTERNAL_SITE_MODEL.to_string()])
            .await
            .context("creating the external site model")?;

        let site = ControllerCli::new(
            self.program.clone(),
            Some(EXTERNAL_SITE_MODEL.to_string()),
        );
        site.run(site.scoped_args(&["deploy", &self.health_charm]))
            .await
            .context("deploying the external prober")?;
        site.run(site.scoped_args(&["wait-for", "application", &self.health_charm]))
            .await
            .context("waiting for the external prober")?;

        Ok(ExternalSite {
            prober_unit: format!("{}/0", self.health_charm),
            runner: Arc::new(site),
        })
    }

    async fn teardown(&self, _site: ExternalSite) -> anyhow::Result<()> {
        let controller = ControllerCli::new(self.program.clone(), None);
        controller
            .run(vec![
                "destroy-model".to_string(),
                "--no-prompt".to_string(),
                EXTERNAL_SITE_MODEL.to_string(),
            ])
            .await
            .context("destroying the external site model")?;
        Ok(())
    }
}
