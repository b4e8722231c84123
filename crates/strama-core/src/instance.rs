//! Managed streaming instance records and their status lifecycle
//!
//! Instances are provisioned asynchronously by the control plane. The
//! console only ever observes them: records are mutated by reconciliation
//! against the remote list, never by the UI directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A managed streaming instance as reported by the control plane.
///
/// Identity is `id`. All other fields are display/policy inputs; the
/// engine interprets only `id`, `name`, `status` and the timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Server-assigned identifier
    pub id: String,
    /// Human-chosen instance name
    pub name: String,
    /// Current lifecycle status
    pub status: InstanceStatus,
    /// Username of the creating user
    pub owner: String,
    /// Region the instance runs in
    pub region: String,
    /// Cloud provider hosting the instance
    pub provider: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a managed instance.
///
/// The happy path is `accepted → preparing → provisioning → ready`,
/// then `ready → deprovision → (removed from the list)`. Provisioning
/// may end in `failed` instead of `ready`, and the control plane may
/// override any status to `failed` at any point. `failed` and
/// `deprovision` are absorbing: a failed instance only permits
/// deletion, a deprovisioning instance permits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    /// Request accepted, not yet scheduled
    Accepted,
    /// Backing resources being prepared
    Preparing,
    /// Cluster coming up
    Provisioning,
    /// Up and serving traffic
    Ready,
    /// Provisioning failed or the control plane marked it failed
    Failed,
    /// Deletion in progress; removal from the list is the terminal event
    Deprovision,
    /// Status string the console does not recognize
    #[serde(other)]
    Unknown,
}

impl InstanceStatus {
    /// All statuses the console recognizes, in lifecycle order.
    pub const KNOWN: [InstanceStatus; 6] = [
        InstanceStatus::Accepted,
        InstanceStatus::Preparing,
        InstanceStatus::Provisioning,
        InstanceStatus::Ready,
        InstanceStatus::Failed,
        InstanceStatus::Deprovision,
    ];

    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Accepted => "accepted",
            InstanceStatus::Preparing => "preparing",
            InstanceStatus::Provisioning => "provisioning",
            InstanceStatus::Ready => "ready",
            InstanceStatus::Failed => "failed",
            InstanceStatus::Deprovision => "deprovision",
            InstanceStatus::Unknown => "unknown",
        }
    }

    /// Terminal: disappearance from the remote list is expected next.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstanceStatus::Deprovision)
    }

    /// Provisioning has finished, one way or the other.
    ///
    /// Unknown statuses are treated as not yet stable so that safety
    /// policies (e.g. delete confirmation bypass) stay conservative
    /// about what they skip.
    pub fn is_stable(&self) -> bool {
        matches!(
            self,
            InstanceStatus::Ready | InstanceStatus::Failed | InstanceStatus::Deprovision
        )
    }

    /// Whether deletion may target an instance in this status.
    pub fn allows_delete(&self) -> bool {
        !matches!(self, InstanceStatus::Deprovision)
    }

    /// Whether a credentials reset may target an instance in this status.
    ///
    /// Failed instances only permit deletion; deprovisioning instances
    /// permit nothing.
    pub fn allows_credential_reset(&self) -> bool {
        matches!(
            self,
            InstanceStatus::Accepted
                | InstanceStatus::Preparing
                | InstanceStatus::Provisioning
                | InstanceStatus::Ready
        )
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InstanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::KNOWN
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Error returned when parsing a status string the console does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown instance status: {0}")]
pub struct UnknownStatus(pub String);
