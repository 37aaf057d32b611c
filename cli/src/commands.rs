pub mod assess;
pub mod targets;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nethealth")]
#[command(about = "Assess network reachability of a deployed model.")]
pub struct CommandLine {
    /// Log internal events alongside status output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full reachability assessment
    #[command(alias = "a")]
    Assess(AssessArgs),
    /// Resolve and print the probe target map
    #[command(alias = "t")]
    Targets(TargetsArgs),
}

#[derive(Args)]
pub struct AssessArgs {
    /// Controller CLI used for status, remote actions and model management
    #[arg(long, value_name = "BINARY")]
    pub controller: String,

    /// Model the workload is deployed in, defaults to the controller's current one
    #[arg(long)]
    pub model: Option<String>,

    /// Group whose units carry the probing agent
    #[arg(long, default_value = "network-health")]
    pub health_group: String,

    /// Extra attempts per probe after a transport failure
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Base retry backoff in milliseconds
    #[arg(long, default_value_t = 500)]
    pub backoff_ms: u64,

    /// Probes allowed in flight at once
    #[arg(long, default_value_t = 4)]
    pub max_inflight: usize,

    /// Less terminal output, repeatable
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Controller CLI to fetch live status from
    #[arg(
        long,
        value_name = "BINARY",
        required_unless_present = "status_file",
        conflicts_with = "status_file"
    )]
    pub controller: Option<String>,

    /// Frozen status snapshot to read instead of a live controller
    #[arg(long, value_name = "PATH")]
    pub status_file: Option<PathBuf>,

    /// Model to fetch status from
    #[arg(long)]
    pub model: Option<String>,

    /// Less terminal output, repeatable
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
