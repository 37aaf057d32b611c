use thiserror::Error;

/// Failure classes of an assessment run.
///
/// Every variant carries enough context (which prober, which group) to
/// diagnose a run from its abort message alone. None of these are
/// retried automatically except transport failures inside the probe
/// dispatcher, which get a bounded number of attempts before they
/// surface as [`AssessError::ProbeDispatch`].
#[derive(Debug, Error)]
pub enum AssessError {
    /// The status snapshot is missing the expected group/unit structure.
    #[error("malformed status snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    /// The status source itself could not produce a snapshot.
    #[error("could not fetch deployment status")]
    StatusFetch {
        #[source]
        source: anyhow::Error,
    },

    /// Remote execution failed for one probe, retries included.
    #[error("probe from {prober} against {group} failed")]
    ProbeDispatch {
        prober: String,
        group: String,
        #[source]
        source: anyhow::Error,
    },

    /// A probe answered with the wrong number of results for its group.
    #[error("probe from {prober} against {group} returned {got} results for {expected} targets")]
    ProbeResultShape {
        prober: String,
        group: String,
        expected: usize,
        got: usize,
    },

    /// An expected (prober, group) entry never made it into the matrix.
    #[error("visibility matrix is missing {prober} against {group}")]
    PartialMatrix { prober: String, group: String },

    /// The deployment hosting the external prober could not be created.
    #[error("could not establish the external probe site")]
    ExternalProbeSetup {
        #[source]
        source: anyhow::Error,
    },

    /// An encoded target payload could not be decoded.
    #[error("malformed target payload: {reason}")]
    Payload { reason: String },
}
