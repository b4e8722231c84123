//! # Strama
//!
//! Client-side engine for a managed-streaming console: a visibility-aware
//! polling scheduler, snapshot reconciliation with transition events, a
//! capped filter model, and single-slot dialog orchestration with
//! confirmation gating for destructive actions.
//!
//! This crate is a facade re-exporting the commonly used types from
//! [`strama_core`], [`strama_client`] and [`strama_console`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strama::prelude::*;
//!
//! # struct MyApi;
//! # struct MyAuth;
//! # fn api() -> Arc<dyn ControlPlaneApi> { unimplemented!() }
//! # fn auth() -> Arc<dyn AuthProvider> { unimplemented!() }
//! #[tokio::main]
//! async fn main() {
//!     let coordinator = Arc::new(ConsoleCoordinator::new(
//!         api(),
//!         auth(),
//!         ConsoleConfig::default(),
//!     ));
//!
//!     let handle = PollingScheduler::start(
//!         Arc::clone(&coordinator) as Arc<dyn PollTarget>,
//!         coordinator.config().poll_interval,
//!         VisibilitySignal::always_visible(),
//!     );
//!     coordinator.bind_refresher(handle.refresher());
//!
//!     // ... drive the views from coordinator.snapshot() ...
//!
//!     handle.stop();
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

// Re-export the domain model crate
pub use strama_core as core;

// Re-export the collaborator surface
pub use strama_client as client;

// Re-export the engine
pub use strama_console as console;

/// Instance records and lifecycle statuses.
pub mod instance {
    pub use strama_core::instance::*;
}

/// Filter state and search-expression serialization.
pub mod filter {
    pub use strama_core::filter::*;
}

/// Validated form fields.
pub mod validated {
    pub use strama_core::validated::*;
}

/// Commonly used types, for glob import.
pub mod prelude {
    pub use strama_client::{
        classify, ApiFailureBody, AuthProvider, ControlPlaneApi, CreateInstanceRequest,
        Credentials, ErrorKind, ListPage, ListQuery, ServiceAccount, ServiceAccountRequest,
        StaticAuth,
    };
    pub use strama_console::{
        visibility_channel, ActionError, ConsoleConfig, ConsoleCoordinator, Modal, ModalKind,
        PollHandle, PollTarget, PollingScheduler, Refresher, StatusTransition,
        VisibilityPublisher, VisibilitySignal,
    };
    pub use strama_core::{
        CreateInstanceForm, FieldVerdict, FilterCriterion, FilterError, FilterField, FilterState,
        Instance, InstanceStatus, ValidatedField,
    };
}
