//! Remote management API as a collaborator trait
//!
//! The engine issues list and mutate calls through [`ControlPlaneApi`]
//! and interprets only id, name, status and timestamps from the
//! results. Concrete transports (HTTP, in-process fakes for tests)
//! implement the trait; the engine never manages connections itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strama_core::Instance;

use crate::error::Result;

/// Query parameters for the paginated instance list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    /// 1-based page index
    pub page: u32,
    /// Page size
    pub size: u32,
    /// Search expression from the filter state, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Sort column and direction, e.g. `created_at desc`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            search: None,
            order_by: None,
        }
    }
}

/// One page of instance records plus the unfiltered total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPage {
    /// Records in server order
    pub items: Vec<Instance>,
    /// Total matching records across all pages
    pub total: u32,
    /// Echoed page index
    pub page: u32,
    /// Echoed page size
    pub size: u32,
}

/// Payload for creating a new streaming instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    pub name: String,
    pub provider: String,
    pub region: String,
    pub plan: String,
}

/// Credentials returned by a reset, shown to the user exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Payload for creating a service account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A service account as reported by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub id: String,
    pub name: String,
    pub client_id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// The remote management service.
///
/// All methods are fallible with the crate's transport [`Error`]
/// (crate::Error); domain interpretation happens in the classifier,
/// not here.
#[async_trait]
pub trait ControlPlaneApi: Send + Sync {
    /// Fetch one page of instances matching the query.
    async fn list_instances(&self, query: &ListQuery) -> Result<ListPage>;

    /// Request a new instance. Provisioning is asynchronous: the
    /// returned record starts in `accepted`.
    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<Instance>;

    /// Request deletion of an instance. Absence from a later list
    /// response is the confirmation.
    async fn delete_instance(&self, id: &str) -> Result<()>;

    /// Reset the credentials of an instance.
    async fn reset_credentials(&self, id: &str) -> Result<Credentials>;

    /// Create a service account.
    async fn create_service_account(&self, request: &ServiceAccountRequest)
        -> Result<ServiceAccount>;

    /// Delete a service account.
    async fn delete_service_account(&self, id: &str) -> Result<()>;

    /// Reset a service account's secret.
    async fn reset_service_account(&self, id: &str) -> Result<ServiceAccount>;
}
