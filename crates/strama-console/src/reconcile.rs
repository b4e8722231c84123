//! Snapshot reconciliation
//!
//! Merges a freshly fetched instance list into the previous snapshot.
//! The fresh list is authoritative: the new snapshot is exactly the
//! fresh records in server order, and local state always defers to
//! server truth. Reconciliation additionally reports what changed —
//! status transitions for surviving instances and departures for
//! instances that vanished from the list.

use std::collections::HashMap;

use tracing::{debug, warn};

use strama_core::validation::sanitize_for_log;
use strama_core::{Instance, InstanceStatus};

/// A detected status change between two successive list responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// Instance that changed
    pub id: String,
    /// Status in the previous snapshot
    pub from: InstanceStatus,
    /// Status in the fresh list
    pub to: InstanceStatus,
}

/// An instance present in the previous snapshot but absent from the
/// fresh list.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    /// Last known record of the departed instance
    pub instance: Instance,
    /// True when the instance was not yet in a terminal status, i.e.
    /// the server deleted it while it was still active. Observability
    /// hook only; the instance is removed locally either way.
    pub anomalous: bool,
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// The new snapshot: fresh records in server order
    pub snapshot: Vec<Instance>,
    /// Status transitions observed against the previous snapshot
    pub transitions: Vec<StatusTransition>,
    /// Instances that disappeared from the list
    pub departures: Vec<Departure>,
}

/// Merge `fresh` into `previous`.
///
/// Pure over its inputs apart from logging. Never fabricates a record
/// absent from `fresh`; never re-sorts — ordering and filtering are the
/// caller's concern. Newly observed instances produce no transition.
pub fn reconcile(previous: &[Instance], fresh: Vec<Instance>) -> ReconcileOutcome {
    let known: HashMap<&str, &Instance> =
        previous.iter().map(|i| (i.id.as_str(), i)).collect();

    let mut transitions = Vec::new();
    for instance in &fresh {
        match known.get(instance.id.as_str()) {
            Some(prior) if prior.status != instance.status => {
                debug!(
                    id = %instance.id,
                    from = %prior.status,
                    to = %instance.status,
                    "instance status transition"
                );
                transitions.push(StatusTransition {
                    id: instance.id.clone(),
                    from: prior.status,
                    to: instance.status,
                });
            }
            // Unchanged, or newly observed (no transition event).
            _ => {}
        }
    }

    let mut departures = Vec::new();
    for instance in previous {
        if fresh.iter().any(|f| f.id == instance.id) {
            continue;
        }
        let anomalous = !instance.status.is_terminal();
        if anomalous {
            warn!(
                id = %instance.id,
                name = %sanitize_for_log(&instance.name, 64),
                status = %instance.status,
                "instance disappeared from the list while still active"
            );
        } else {
            debug!(id = %instance.id, "deprovisioned instance left the list");
        }
        departures.push(Departure {
            instance: instance.clone(),
            anomalous,
        });
    }

    ReconcileOutcome {
        snapshot: fresh,
        transitions,
        departures,
    }
}
