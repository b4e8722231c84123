//! Single-slot modal orchestration
//!
//! All console dialogs live in one closed set of typed variants. At
//! most one dialog is logically open: showing a second replaces the
//! first wholesale — no stacking. A replaced dialog's in-flight
//! submission is not cancelled; its completion callback runs against
//! whatever it captured at call time.

use tracing::debug;

use strama_core::{CreateInstanceForm, InstanceStatus, ValidatedField};

/// Props for the create-instance dialog.
#[derive(Debug, Clone, Default)]
pub struct CreateInstanceProps {
    /// Form state, empty on open
    pub form: CreateInstanceForm,
}

/// Props for the delete-instance confirmation dialog.
#[derive(Debug, Clone)]
pub struct DeleteInstanceProps {
    /// Target instance id
    pub id: String,
    /// Target instance name, compared against the typed confirmation
    pub name: String,
    /// Target status at open time; drives the confirmation policy
    pub status: InstanceStatus,
    /// Text the user has typed so far
    pub typed_confirmation: String,
}

impl DeleteInstanceProps {
    /// New dialog props with an empty confirmation box.
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: InstanceStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            typed_confirmation: String::new(),
        }
    }

    /// Whether the confirm action is enabled.
    ///
    /// Destroying an instance that holds real data requires typing its
    /// name (case-insensitively, with no trimming). An instance that
    /// never finished provisioning holds nothing worth protecting, so
    /// no confirmation is required at all.
    pub fn confirm_enabled(&self) -> bool {
        if !self.status.is_stable() {
            return true;
        }
        self.typed_confirmation.eq_ignore_ascii_case(&self.name)
    }
}

/// Props for the reset-credentials dialog (instance-scoped).
#[derive(Debug, Clone)]
pub struct ResetCredentialsProps {
    pub id: String,
    pub name: String,
    /// Status at open time; resets are refused once provisioning has
    /// failed or deprovisioning has begun
    pub status: InstanceStatus,
}

/// Props for the create-service-account dialog.
#[derive(Debug, Clone, Default)]
pub struct CreateServiceAccountProps {
    /// Account name, validated like instance names
    pub name: ValidatedField<String>,
    /// Optional free-text description
    pub description: ValidatedField<String>,
}

/// Props for the delete-service-account confirmation dialog.
#[derive(Debug, Clone)]
pub struct DeleteServiceAccountProps {
    pub id: String,
    pub name: String,
    /// Text the user has typed so far
    pub typed_confirmation: String,
}

impl DeleteServiceAccountProps {
    /// New dialog props with an empty confirmation box.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            typed_confirmation: String::new(),
        }
    }

    /// Service accounts are live from the moment they exist, so the
    /// typed-name gate always applies.
    pub fn confirm_enabled(&self) -> bool {
        self.typed_confirmation.eq_ignore_ascii_case(&self.name)
    }
}

/// Props for the reset-service-account dialog.
#[derive(Debug, Clone)]
pub struct ResetServiceAccountProps {
    pub id: String,
    pub name: String,
}

/// The closed set of console dialogs.
#[derive(Debug, Clone)]
pub enum Modal {
    /// Create a streaming instance
    CreateInstance(CreateInstanceProps),
    /// Delete a streaming instance
    DeleteInstance(DeleteInstanceProps),
    /// Reset a streaming instance's credentials
    ResetCredentials(ResetCredentialsProps),
    /// Create a service account
    CreateServiceAccount(CreateServiceAccountProps),
    /// Delete a service account
    DeleteServiceAccount(DeleteServiceAccountProps),
    /// Reset a service account's secret
    ResetServiceAccount(ResetServiceAccountProps),
}

/// Discriminant of [`Modal`], for conditional rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    CreateInstance,
    DeleteInstance,
    ResetCredentials,
    CreateServiceAccount,
    DeleteServiceAccount,
    ResetServiceAccount,
}

impl Modal {
    /// Which dialog this is.
    pub fn kind(&self) -> ModalKind {
        match self {
            Modal::CreateInstance(_) => ModalKind::CreateInstance,
            Modal::DeleteInstance(_) => ModalKind::DeleteInstance,
            Modal::ResetCredentials(_) => ModalKind::ResetCredentials,
            Modal::CreateServiceAccount(_) => ModalKind::CreateServiceAccount,
            Modal::DeleteServiceAccount(_) => ModalKind::DeleteServiceAccount,
            Modal::ResetServiceAccount(_) => ModalKind::ResetServiceAccount,
        }
    }
}

/// Single-slot registry governing dialog lifecycle.
#[derive(Debug, Default)]
pub struct ModalOrchestrator {
    active: Option<Modal>,
}

impl ModalOrchestrator {
    /// No dialog open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a dialog, replacing any currently active one.
    pub fn show(&mut self, modal: Modal) {
        if let Some(previous) = &self.active {
            debug!(
                from = ?previous.kind(),
                to = ?modal.kind(),
                "replacing active dialog"
            );
        }
        self.active = Some(modal);
    }

    /// Close the active dialog, if any.
    pub fn hide(&mut self) {
        self.active = None;
    }

    /// Whether a dialog of the given kind is open.
    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.active.as_ref().map(Modal::kind) == Some(kind)
    }

    /// Kind of the active dialog, if any.
    pub fn active_kind(&self) -> Option<ModalKind> {
        self.active.as_ref().map(Modal::kind)
    }

    /// The active dialog, if any.
    pub fn active(&self) -> Option<&Modal> {
        self.active.as_ref()
    }

    /// Mutable access for edits routed through the coordinator.
    pub fn active_mut(&mut self) -> Option<&mut Modal> {
        self.active.as_mut()
    }
}
