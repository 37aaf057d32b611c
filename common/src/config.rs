use std::time::Duration;

/// Tuning knobs for a single assessment run.
#[derive(Debug, Clone)]
pub struct AssessConfig {
    /// Extra attempts per probe after the first transport failure.
    pub probe_retries: u32,
    /// Base delay before a retry.
    ///
    /// Doubles with every attempt and gets a small random jitter so
    /// retrying probes do not hammer the remote channel in lockstep.
    pub retry_backoff: Duration,
    /// Upper bound on probes in flight at once.
    pub max_inflight: usize,
    /// Group whose units carry the probing agent.
    pub health_group: String,
    /// Terminal verbosity, higher is quieter.
    pub quiet: u8,
}

impl Default for AssessConfig {
    fn default() -> Self {
        Self {
            probe_retries: 2,
            retry_backoff: Duration::from_millis(500),
            max_inflight: 4,
            health_group: String::from("network-health"),
            quiet: 0,
        }
    }
}
