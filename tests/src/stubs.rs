//! Deterministic collaborators for whole-run tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use nethealth_common::model::status::StatusSnapshot;
use nethealth_common::probing::{ExternalSite, ExternalSiteBroker, ProbeRunner, StatusSource};
use nethealth_core::probe::wire;

pub const EXTERNAL_PROBER: &str = "external-health/0";

/// Plays back a scripted sequence of snapshots; the last one repeats
/// for every fetch after the script runs out.
pub struct ScriptedStatus {
    snapshots: Vec<StatusSnapshot>,
    cursor: Mutex<usize>,
}

impl ScriptedStatus {
    pub fn from_json(raws: &[&str]) -> Self {
        assert!(!raws.is_empty(), "status script needs at least one snapshot");
        let snapshots = raws
            .iter()
            .map(|raw| StatusSnapshot::from_json(raw).expect("stub snapshot"))
            .collect();
        Self {
            snapshots,
            cursor: Mutex::new(0),
        }
    }
}

#[async_trait]
impl StatusSource for ScriptedStatus {
    async fn fetch(&self) -> anyhow::Result<StatusSnapshot> {
        let mut cursor = self.cursor.lock().unwrap();
        let idx = (*cursor).min(self.snapshots.len() - 1);
        *cursor += 1;
        Ok(self.snapshots[idx].clone())
    }
}

/// A network where reachability is exactly the scripted set of
/// (vantage unit, target unit) pairs.
#[derive(Default)]
pub struct ScriptedNetwork {
    reachable: BTreeSet<(String, String)>,
    fail_when_targeting: Option<String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listed vantage unit sees every listed target unit.
    pub fn full_mesh(vantages: &[&str], targets: &[&str]) -> Self {
        let mut network = Self::new();
        for vantage in vantages {
            for target in targets {
                network
                    .reachable
                    .insert((vantage.to_string(), target.to_string()));
            }
        }
        network
    }

    pub fn reach(mut self, vantage: &str, target: &str) -> Self {
        self.reachable
            .insert((vantage.to_string(), target.to_string()));
        self
    }

    /// Simulates a transport failure for any probe whose target set
    /// contains the given unit.
    pub fn failing_against(mut self, unit_id: &str) -> Self {
        self.fail_when_targeting = Some(unit_id.to_string());
        self
    }
}

#[async_trait]
impl ProbeRunner for ScriptedNetwork {
    async fn run_action(&self, unit: &str, action: &str, param: &str) -> anyhow::Result<Vec<bool>> {
        anyhow::ensure!(action == "ping", "unknown action {action}");
        let encoded = param
            .strip_prefix("targets=")
            .ok_or_else(|| anyhow::anyhow!("missing targets parameter"))?;
        let targets = wire::decode_units(encoded)?;

        self.calls
            .lock()
            .unwrap()
            .push((unit.to_string(), param.to_string()));

        if let Some(marker) = &self.fail_when_targeting {
            anyhow::ensure!(!targets.contains_key(marker), "no route to host");
        }

        Ok(targets
            .keys()
            .map(|target| {
                self.reachable
                    .contains(&(unit.to_string(), target.clone()))
            })
            .collect())
    }
}

/// Hands out a vantage point on a scripted external network and
/// counts lifecycle calls.
pub struct ScriptedBroker {
    external: Arc<ScriptedNetwork>,
    fail_setup: bool,
    pub established: Mutex<u32>,
    pub torn_down: Mutex<u32>,
}

impl ScriptedBroker {
    pub fn new(external: Arc<ScriptedNetwork>) -> Self {
        Self {
            external,
            fail_setup: false,
            established: Mutex::new(0),
            torn_down: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        let mut broker = Self::new(Arc::new(ScriptedNetwork::new()));
        broker.fail_setup = true;
        broker
    }
}

#[async_trait]
impl ExternalSiteBroker for ScriptedBroker {
    async fn establish(&self) -> anyhow::Result<ExternalSite> {
        anyhow::ensure!(!self.fail_setup, "no capacity for a second model");
        *self.established.lock().unwrap() += 1;
        Ok(ExternalSite {
            prober_unit: EXTERNAL_PROBER.to_string(),
            runner: self.external.clone(),
        })
    }

    async fn teardown(&self, _site: ExternalSite) -> anyhow::Result<()> {
        *self.torn_down.lock().unwrap() += 1;
        Ok(())
    }
}
