//! Resource lifecycle tracking and interaction engine
//!
//! The engine behind the Strama console's instance views. It owns the
//! three pieces with real state-machine behavior:
//!
//! - **Polling**: a visibility-aware scheduler fetches the instance
//!   list on a fixed cadence, pausing for hidden tabs and supporting
//!   out-of-band refreshes after mutations.
//! - **Reconciliation**: fresh list responses are merged into the
//!   previous snapshot, emitting status-transition events and flagging
//!   instances that vanish while still active.
//! - **Dialogs**: a single-slot modal orchestrator over a closed set
//!   of typed dialog variants, with confirmation gating for deletes.
//!
//! The [`coordinator::ConsoleCoordinator`] ties them together as the
//! single writer for the snapshot, filter state and modal slot. Views
//! call its operations and never mutate the collections directly.

pub mod config;
pub mod coordinator;
pub mod modal;
pub mod poller;
pub mod reconcile;
pub mod visibility;

pub use config::{ConsoleConfig, ConsoleConfigBuilder};
pub use coordinator::{ActionError, ConsoleCoordinator};
pub use modal::{Modal, ModalKind, ModalOrchestrator};
pub use poller::{PollHandle, PollTarget, PollingScheduler, Refresher};
pub use reconcile::{reconcile, Departure, ReconcileOutcome, StatusTransition};
pub use visibility::{visibility_channel, VisibilityPublisher, VisibilitySignal};
