//! Control-plane collaborator surface for the Strama console
//!
//! The console engine never owns a wire format. This crate defines the
//! traits and types the engine talks through: the list/mutate API of
//! the remote management service, the auth collaborator supplying
//! bearer tokens and identity, structured transport failures, and the
//! closed error taxonomy the UI renders from.

pub mod api;
pub mod auth;
pub mod classify;
pub mod error;

pub use api::{
    ControlPlaneApi, CreateInstanceRequest, Credentials, ListPage, ListQuery, ServiceAccount,
    ServiceAccountRequest,
};
pub use auth::{AuthProvider, StaticAuth};
pub use classify::{classify, ErrorKind};
pub use error::{ApiFailureBody, Error, Result};
