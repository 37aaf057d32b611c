//! # Neighbor Visibility Matrix
//!
//! Probes every prober unit against every group, the prober's own
//! group included, so self-visibility is validated along the way.
//! Probes are independent and run concurrently on a bounded worker
//! pool; a prober's row only ever becomes visible as part of the
//! finished, audited matrix.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

use nethealth_common::error::AssessError;
use nethealth_common::model::matrix::{ProbeResult, VisibilityMatrix};
use nethealth_common::model::target::TargetMap;

use crate::probe::Dispatcher;

type ProbeOutcome = Result<(String, String, ProbeResult), AssessError>;

pub async fn build_matrix(
    probers: &[String],
    targets: &TargetMap,
    dispatcher: &Dispatcher,
    max_inflight: usize,
) -> Result<VisibilityMatrix, AssessError> {
    let limit = Arc::new(Semaphore::new(max_inflight.max(1)));
    let mut probes: JoinSet<ProbeOutcome> = JoinSet::new();

    for prober in probers {
        for (group, units) in targets {
            let limit = limit.clone();
            let dispatcher = dispatcher.clone();
            let prober = prober.clone();
            let group = group.clone();
            let units = units.clone();

            probes.spawn(async move {
                let _permit = limit.acquire_owned().await.map_err(|err| {
                    AssessError::ProbeDispatch {
                        prober: prober.clone(),
                        group: group.clone(),
                        source: err.into(),
                    }
                })?;
                let result = dispatcher.probe_group(&prober, &group, &units).await?;
                Ok((prober, group, result))
            });
        }
    }

    let mut matrix = VisibilityMatrix::new();
    while let Some(joined) = probes.join_next().await {
        match joined {
            Ok(Ok((prober, group, result))) => {
                matrix.entry(prober).or_default().insert(group, result);
            }
            Ok(Err(err)) => {
                drain(&mut probes).await;
                return Err(err);
            }
            // A dead probe task leaves a hole; the audit below turns
            // that into a hard error instead of a missing entry.
            Err(join_err) => error!("probe task died: {join_err}"),
        }
    }

    audit(&matrix, probers, targets)?;
    Ok(matrix)
}

/// Aborts what has not started and waits out the rest. In-flight
/// remote actions must not be left orphaned when the run gives up.
async fn drain(probes: &mut JoinSet<ProbeOutcome>) {
    probes.abort_all();
    while probes.join_next().await.is_some() {}
}

/// Checks the matrix holds exactly one entry per dispatched
/// (prober, group) pair.
pub fn audit(
    matrix: &VisibilityMatrix,
    probers: &[String],
    targets: &TargetMap,
) -> Result<(), AssessError> {
    for prober in probers {
        for group in targets.keys() {
            let present = matrix
                .get(prober)
                .is_some_and(|row| row.contains_key(group));
            if !present {
                return Err(AssessError::PartialMatrix {
                    prober: prober.clone(),
                    group: group.clone(),
                });
            }
        }
    }
    Ok(())
}
