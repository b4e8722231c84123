//! Console coordinator
//!
//! Single owner of the instance snapshot, filter state, pagination and
//! the modal slot. Views read through accessor methods and mutate only
//! by calling the operations declared here — one writer per aggregate.
//!
//! The coordinator is also the poll target: each cycle lists the
//! current page with the committed filters, reconciles the response
//! into the snapshot, and records transitions for ephemeral banners.
//! Responses are applied under a monotonic fetch sequence so a slow
//! response that arrives after a newer one has been applied is
//! discarded, not merged.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use strama_client::{
    classify, ControlPlaneApi, CreateInstanceRequest, Credentials, ErrorKind, ListQuery,
    ServiceAccount, ServiceAccountRequest,
};
use strama_core::{
    CreateInstanceForm, FilterCriterion, FilterError, FilterField, FilterState, Instance,
    InstanceStatus,
};

use crate::config::ConsoleConfig;
use crate::modal::{
    CreateInstanceProps, CreateServiceAccountProps, DeleteInstanceProps,
    DeleteServiceAccountProps, Modal, ModalKind, ModalOrchestrator, ResetCredentialsProps,
    ResetServiceAccountProps,
};
use crate::poller::{PollTarget, Refresher};
use crate::reconcile::{reconcile, StatusTransition};

/// Failure of a coordinator operation.
///
/// Local validation failures never reach the network; remote failures
/// arrive pre-classified for the initiating dialog, which stays open so
/// the user can correct input or retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No dialog of the expected kind is open
    #[error("no active dialog for this action")]
    NoActiveDialog,

    /// The typed confirmation does not match the target name
    #[error("confirmation text does not match the target name")]
    ConfirmationMismatch,

    /// The form has empty or invalid required fields
    #[error("form is incomplete or invalid")]
    FormIncomplete,

    /// The instance is not in the current snapshot
    #[error("instance {0} not found")]
    InstanceNotFound(String),

    /// The instance's lifecycle status forbids the action
    #[error("instance {id} in status {status} does not allow this action")]
    InvalidState { id: String, status: InstanceStatus },

    /// The user neither owns the instance nor administers the org
    #[error("not permitted to modify instance {0}")]
    NotPermitted(String),

    /// The control plane rejected the call
    #[error("{0}")]
    Api(ErrorKind),
}

/// Mutable console state, guarded by one lock.
struct ConsoleState {
    snapshot: Vec<Instance>,
    total: u32,
    page: u32,
    filters: FilterState,
    modals: ModalOrchestrator,
    transitions: Vec<StatusTransition>,
    last_poll_error: Option<String>,
    last_applied_seq: u64,
}

/// Single-owner coordinator for the instance views.
pub struct ConsoleCoordinator {
    api: Arc<dyn ControlPlaneApi>,
    auth: Arc<dyn strama_client::AuthProvider>,
    config: ConsoleConfig,
    state: Mutex<ConsoleState>,
    fetch_seq: AtomicU64,
    refresher: Mutex<Option<Refresher>>,
}

impl ConsoleCoordinator {
    /// Create a coordinator over the given collaborators.
    pub fn new(
        api: Arc<dyn ControlPlaneApi>,
        auth: Arc<dyn strama_client::AuthProvider>,
        config: ConsoleConfig,
    ) -> Self {
        let filters = FilterState::new(
            config.max_filter_criteria,
            config.max_filter_criteria_per_field,
        );
        Self {
            api,
            auth,
            config,
            state: Mutex::new(ConsoleState {
                snapshot: Vec::new(),
                total: 0,
                page: 1,
                filters,
                modals: ModalOrchestrator::new(),
                transitions: Vec::new(),
                last_poll_error: None,
                last_applied_seq: 0,
            }),
            fetch_seq: AtomicU64::new(0),
            refresher: Mutex::new(None),
        }
    }

    /// Attach the scheduler's refresh trigger so successful mutations
    /// can request an immediate out-of-cycle poll.
    pub fn bind_refresher(&self, refresher: Refresher) {
        *self.refresher.lock() = Some(refresher);
    }

    /// The configuration this coordinator was built with.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    // ========================================================================
    // Snapshot and pagination
    // ========================================================================

    /// Current snapshot, in server order.
    pub fn snapshot(&self) -> Vec<Instance> {
        self.state.lock().snapshot.clone()
    }

    /// Total matching instances across all pages.
    pub fn total(&self) -> u32 {
        self.state.lock().total
    }

    /// Current 1-based page.
    pub fn page(&self) -> u32 {
        self.state.lock().page
    }

    /// Switch pages; the change takes effect on the next fetch.
    pub fn set_page(&self, page: u32) {
        self.state.lock().page = page.max(1);
    }

    /// Drain the status transitions observed since the last call.
    /// Consumers use these for ephemeral "just changed" banners.
    pub fn take_transitions(&self) -> Vec<StatusTransition> {
        std::mem::take(&mut self.state.lock().transitions)
    }

    /// Error from the most recent failed poll, cleared by the next
    /// successful one. The list is stale while this is set.
    pub fn last_poll_error(&self) -> Option<String> {
        self.state.lock().last_poll_error.clone()
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Commit a filter criterion.
    pub fn add_filter(
        &self,
        field: FilterField,
        value: impl Into<String>,
        exact: bool,
    ) -> Result<(), FilterError> {
        self.state.lock().filters.add(field, value, exact)
    }

    /// Remove one committed criterion; missing entries are a no-op.
    pub fn remove_filter(&self, field: FilterField, value: &str) {
        self.state.lock().filters.remove(field, value);
    }

    /// Remove all criteria for one field.
    pub fn clear_filter_field(&self, field: FilterField) {
        self.state.lock().filters.clear_field(field);
    }

    /// Remove all criteria.
    pub fn clear_filters(&self) {
        self.state.lock().filters.clear_all();
    }

    /// Committed criteria in insertion order, for chip display.
    pub fn filter_criteria(&self) -> Vec<FilterCriterion> {
        self.state.lock().filters.criteria().to_vec()
    }

    /// The query the next fetch will issue.
    pub fn query(&self) -> ListQuery {
        let state = self.state.lock();
        ListQuery {
            page: state.page,
            size: self.config.page_size,
            search: state.filters.to_search(),
            order_by: None,
        }
    }

    // ========================================================================
    // Dialogs
    // ========================================================================

    /// Open the create-instance dialog with an empty form.
    pub fn open_create_instance(&self) {
        self.state
            .lock()
            .modals
            .show(Modal::CreateInstance(CreateInstanceProps::default()));
    }

    /// Open the delete confirmation for an instance on the current
    /// page. Refused once deprovisioning has begun.
    pub fn open_delete_instance(&self, id: &str) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        let instance = find_instance(&state.snapshot, id)?;
        if !instance.status.allows_delete() {
            return Err(ActionError::InvalidState {
                id: instance.id.clone(),
                status: instance.status,
            });
        }
        let props = DeleteInstanceProps::new(&instance.id, &instance.name, instance.status);
        state.modals.show(Modal::DeleteInstance(props));
        Ok(())
    }

    /// Open the reset-credentials dialog. Refused for failed or
    /// deprovisioning instances.
    pub fn open_reset_credentials(&self, id: &str) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        let instance = find_instance(&state.snapshot, id)?;
        if !instance.status.allows_credential_reset() {
            return Err(ActionError::InvalidState {
                id: instance.id.clone(),
                status: instance.status,
            });
        }
        let props = ResetCredentialsProps {
            id: instance.id.clone(),
            name: instance.name.clone(),
            status: instance.status,
        };
        state.modals.show(Modal::ResetCredentials(props));
        Ok(())
    }

    /// Open the create-service-account dialog.
    pub fn open_create_service_account(&self) {
        self.state.lock().modals.show(Modal::CreateServiceAccount(
            CreateServiceAccountProps::default(),
        ));
    }

    /// Open the delete confirmation for a service account.
    pub fn open_delete_service_account(&self, id: impl Into<String>, name: impl Into<String>) {
        self.state
            .lock()
            .modals
            .show(Modal::DeleteServiceAccount(DeleteServiceAccountProps::new(
                id, name,
            )));
    }

    /// Open the reset dialog for a service account.
    pub fn open_reset_service_account(&self, id: impl Into<String>, name: impl Into<String>) {
        self.state
            .lock()
            .modals
            .show(Modal::ResetServiceAccount(ResetServiceAccountProps {
                id: id.into(),
                name: name.into(),
            }));
    }

    /// Close the active dialog, if any.
    pub fn close_modal(&self) {
        self.state.lock().modals.hide();
    }

    /// Kind of the active dialog, if any.
    pub fn active_modal_kind(&self) -> Option<ModalKind> {
        self.state.lock().modals.active_kind()
    }

    /// Whether a dialog of the given kind is open.
    pub fn is_modal_open(&self, kind: ModalKind) -> bool {
        self.state.lock().modals.is_open(kind)
    }

    /// Edit the create-instance form in place.
    pub fn edit_create_form<R>(
        &self,
        edit: impl FnOnce(&mut CreateInstanceForm) -> R,
    ) -> Result<R, ActionError> {
        let mut state = self.state.lock();
        match state.modals.active_mut() {
            Some(Modal::CreateInstance(props)) => Ok(edit(&mut props.form)),
            _ => Err(ActionError::NoActiveDialog),
        }
    }

    /// Record the text typed into a delete confirmation box.
    pub fn set_delete_confirmation(&self, text: impl Into<String>) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        match state.modals.active_mut() {
            Some(Modal::DeleteInstance(props)) => {
                props.typed_confirmation = text.into();
                Ok(())
            }
            Some(Modal::DeleteServiceAccount(props)) => {
                props.typed_confirmation = text.into();
                Ok(())
            }
            _ => Err(ActionError::NoActiveDialog),
        }
    }

    /// Whether the active delete dialog's confirm action is enabled.
    pub fn delete_confirm_enabled(&self) -> bool {
        let state = self.state.lock();
        match state.modals.active() {
            Some(Modal::DeleteInstance(props)) => props.confirm_enabled(),
            Some(Modal::DeleteServiceAccount(props)) => props.confirm_enabled(),
            _ => false,
        }
    }

    // ========================================================================
    // Mutating actions
    // ========================================================================

    /// Submit the create-instance dialog.
    ///
    /// On success the dialog closes and an immediate refresh is
    /// requested; on failure the dialog stays open and the classified
    /// reason is returned for inline display.
    pub async fn submit_create_instance(&self) -> Result<Instance, ActionError> {
        let request = {
            let state = self.state.lock();
            let Some(Modal::CreateInstance(props)) = state.modals.active() else {
                return Err(ActionError::NoActiveDialog);
            };
            if !props.form.ready_to_submit() {
                return Err(ActionError::FormIncomplete);
            }
            CreateInstanceRequest {
                name: props.form.name.value().clone(),
                provider: props.form.provider.value().clone().unwrap_or_default(),
                region: props.form.region.value().clone().unwrap_or_default(),
                plan: props.form.plan.value().clone().unwrap_or_default(),
            }
        };

        match self.api.create_instance(&request).await {
            Ok(instance) => {
                info!(id = %instance.id, name = %instance.name, "instance creation accepted");
                self.finish_mutation();
                Ok(instance)
            }
            Err(e) => Err(self.classify_failure("create instance", e)),
        }
    }

    /// Confirm the delete-instance dialog.
    ///
    /// The local snapshot is not touched: removal happens once a later
    /// poll confirms absence from the remote list.
    pub async fn confirm_delete_instance(&self) -> Result<(), ActionError> {
        let id = {
            let state = self.state.lock();
            let Some(Modal::DeleteInstance(props)) = state.modals.active() else {
                return Err(ActionError::NoActiveDialog);
            };
            if !props.confirm_enabled() {
                return Err(ActionError::ConfirmationMismatch);
            }
            let instance = find_instance(&state.snapshot, &props.id)?;
            if !instance.status.allows_delete() {
                return Err(ActionError::InvalidState {
                    id: instance.id.clone(),
                    status: instance.status,
                });
            }
            self.check_permission(instance)?;
            props.id.clone()
        };

        match self.api.delete_instance(&id).await {
            Ok(()) => {
                info!(id = %id, "instance deletion requested");
                self.finish_mutation();
                Ok(())
            }
            Err(e) => Err(self.classify_failure("delete instance", e)),
        }
    }

    /// Confirm the reset-credentials dialog.
    pub async fn reset_credentials(&self) -> Result<Credentials, ActionError> {
        let id = {
            let state = self.state.lock();
            let Some(Modal::ResetCredentials(props)) = state.modals.active() else {
                return Err(ActionError::NoActiveDialog);
            };
            // Re-check against the snapshot: the status may have moved
            // since the dialog opened.
            let instance = find_instance(&state.snapshot, &props.id)?;
            if !instance.status.allows_credential_reset() {
                return Err(ActionError::InvalidState {
                    id: instance.id.clone(),
                    status: instance.status,
                });
            }
            self.check_permission(instance)?;
            props.id.clone()
        };

        match self.api.reset_credentials(&id).await {
            Ok(credentials) => {
                info!(id = %id, "instance credentials reset");
                self.finish_mutation();
                Ok(credentials)
            }
            Err(e) => Err(self.classify_failure("reset credentials", e)),
        }
    }

    /// Submit the create-service-account dialog.
    pub async fn submit_create_service_account(&self) -> Result<ServiceAccount, ActionError> {
        let request = {
            let state = self.state.lock();
            let Some(Modal::CreateServiceAccount(props)) = state.modals.active() else {
                return Err(ActionError::NoActiveDialog);
            };
            if props.name.blocks_submit() {
                return Err(ActionError::FormIncomplete);
            }
            ServiceAccountRequest {
                name: props.name.value().clone(),
                description: match props.description.value().as_str() {
                    "" => None,
                    text => Some(text.to_string()),
                },
            }
        };

        match self.api.create_service_account(&request).await {
            Ok(account) => {
                info!(id = %account.id, name = %account.name, "service account created");
                self.finish_mutation();
                Ok(account)
            }
            Err(e) => Err(self.classify_failure("create service account", e)),
        }
    }

    /// Confirm the delete-service-account dialog.
    pub async fn confirm_delete_service_account(&self) -> Result<(), ActionError> {
        let id = {
            let state = self.state.lock();
            let Some(Modal::DeleteServiceAccount(props)) = state.modals.active() else {
                return Err(ActionError::NoActiveDialog);
            };
            if !props.confirm_enabled() {
                return Err(ActionError::ConfirmationMismatch);
            }
            props.id.clone()
        };

        match self.api.delete_service_account(&id).await {
            Ok(()) => {
                info!(id = %id, "service account deleted");
                self.finish_mutation();
                Ok(())
            }
            Err(e) => Err(self.classify_failure("delete service account", e)),
        }
    }

    /// Confirm the reset-service-account dialog.
    pub async fn reset_service_account(&self) -> Result<ServiceAccount, ActionError> {
        let id = {
            let state = self.state.lock();
            let Some(Modal::ResetServiceAccount(props)) = state.modals.active() else {
                return Err(ActionError::NoActiveDialog);
            };
            props.id.clone()
        };

        match self.api.reset_service_account(&id).await {
            Ok(account) => {
                info!(id = %id, "service account secret reset");
                self.finish_mutation();
                Ok(account)
            }
            Err(e) => Err(self.classify_failure("reset service account", e)),
        }
    }

    // ========================================================================
    // Fetch application
    // ========================================================================

    /// Fetch one page and apply it to the snapshot.
    ///
    /// Overlapping fetches are resolved by issue time, not completion
    /// time: once a later-issued response has been applied, an
    /// earlier-issued one is discarded even if it completes last. A
    /// last-completer-wins rule would behave differently only when
    /// fetches overlap, which the scheduler's one-in-flight rule
    /// prevents; issue order is kept because an earlier-issued
    /// response can only carry an equal-or-older view of the list.
    pub async fn fetch_once(&self) -> strama_client::Result<()> {
        // Take a ticket before issuing so responses can be ordered by
        // issue time even if a re-entrant caller overlaps fetches.
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.query();

        match self.api.list_instances(&query).await {
            Ok(page) => {
                self.apply_page(seq, page.items, page.total);
                Ok(())
            }
            Err(e) => {
                self.state.lock().last_poll_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn apply_page(&self, seq: u64, items: Vec<Instance>, total: u32) {
        let mut state = self.state.lock();
        if seq < state.last_applied_seq {
            // A later-issued response has already been applied; this
            // straggler loses.
            debug!(seq, newest = state.last_applied_seq, "discarding stale list response");
            return;
        }
        state.last_applied_seq = seq;
        state.last_poll_error = None;

        let outcome = reconcile(&state.snapshot, items);
        state.snapshot = outcome.snapshot;
        state.total = total;
        state.transitions.extend(outcome.transitions);
    }

    fn finish_mutation(&self) {
        self.state.lock().modals.hide();
        if let Some(refresher) = self.refresher.lock().as_ref() {
            refresher.request();
        }
    }

    fn classify_failure(&self, action: &str, error: strama_client::Error) -> ActionError {
        let kind = classify(&error);
        warn!(action, error = %error, %kind, "mutating call failed");
        ActionError::Api(kind)
    }

    fn check_permission(&self, instance: &Instance) -> Result<(), ActionError> {
        if self.auth.is_org_admin() {
            return Ok(());
        }
        if self.auth.username().as_deref() == Some(instance.owner.as_str()) {
            return Ok(());
        }
        Err(ActionError::NotPermitted(instance.id.clone()))
    }
}

#[async_trait]
impl PollTarget for ConsoleCoordinator {
    async fn poll(&self) -> strama_client::Result<()> {
        self.fetch_once().await
    }
}

fn find_instance<'a>(snapshot: &'a [Instance], id: &str) -> Result<&'a Instance, ActionError> {
    snapshot
        .iter()
        .find(|i| i.id == id)
        .ok_or_else(|| ActionError::InstanceNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parking_lot::Mutex as PlMutex;
    use std::collections::VecDeque;
    use strama_client::{Error, ListPage, StaticAuth};

    fn instance(id: &str, name: &str, status: InstanceStatus) -> Instance {
        let now = Utc::now();
        Instance {
            id: id.to_string(),
            name: name.to_string(),
            status,
            owner: "alice".to_string(),
            region: "eu-west-1".to_string(),
            provider: "aws".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn page(items: Vec<Instance>) -> ListPage {
        let total = items.len() as u32;
        ListPage {
            items,
            total,
            page: 1,
            size: 10,
        }
    }

    /// Scripted control plane: list responses are consumed in order
    /// (the last one repeats), mutations are recorded or fail with a
    /// scripted error.
    #[derive(Default)]
    struct ScriptedApi {
        lists: PlMutex<VecDeque<ListPage>>,
        create_error: PlMutex<Option<Error>>,
        deleted: PlMutex<Vec<String>>,
    }

    impl ScriptedApi {
        fn with_lists(pages: Vec<ListPage>) -> Self {
            Self {
                lists: PlMutex::new(pages.into()),
                ..Self::default()
            }
        }

        fn fail_create(self, error: Error) -> Self {
            *self.create_error.lock() = Some(error);
            self
        }
    }

    #[async_trait]
    impl ControlPlaneApi for ScriptedApi {
        async fn list_instances(&self, _query: &ListQuery) -> strama_client::Result<ListPage> {
            let mut lists = self.lists.lock();
            if lists.len() > 1 {
                Ok(lists.pop_front().unwrap_or_default())
            } else {
                Ok(lists.front().cloned().unwrap_or_default())
            }
        }

        async fn create_instance(
            &self,
            request: &CreateInstanceRequest,
        ) -> strama_client::Result<Instance> {
            if let Some(error) = self.create_error.lock().take() {
                return Err(error);
            }
            Ok(instance("ins-new", &request.name, InstanceStatus::Accepted))
        }

        async fn delete_instance(&self, id: &str) -> strama_client::Result<()> {
            self.deleted.lock().push(id.to_string());
            Ok(())
        }

        async fn reset_credentials(&self, _id: &str) -> strama_client::Result<Credentials> {
            Ok(Credentials {
                client_id: "cid".to_string(),
                client_secret: "secret".to_string(),
            })
        }

        async fn create_service_account(
            &self,
            request: &ServiceAccountRequest,
        ) -> strama_client::Result<ServiceAccount> {
            Ok(ServiceAccount {
                id: "sa-1".to_string(),
                name: request.name.clone(),
                client_id: "cid".to_string(),
                owner: "alice".to_string(),
                created_at: Utc::now(),
            })
        }

        async fn delete_service_account(&self, id: &str) -> strama_client::Result<()> {
            self.deleted.lock().push(id.to_string());
            Ok(())
        }

        async fn reset_service_account(&self, id: &str) -> strama_client::Result<ServiceAccount> {
            Ok(ServiceAccount {
                id: id.to_string(),
                name: "svc".to_string(),
                client_id: "cid".to_string(),
                owner: "alice".to_string(),
                created_at: Utc::now(),
            })
        }
    }

    fn coordinator_with(api: ScriptedApi) -> ConsoleCoordinator {
        ConsoleCoordinator::new(
            Arc::new(api),
            Arc::new(StaticAuth::user("alice")),
            ConsoleConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_fetch_applies_snapshot_and_transitions() {
        let api = ScriptedApi::with_lists(vec![
            page(vec![instance("1", "orders", InstanceStatus::Accepted)]),
            page(vec![instance("1", "orders", InstanceStatus::Provisioning)]),
        ]);
        let coordinator = coordinator_with(api);

        coordinator.fetch_once().await.unwrap();
        assert_eq!(coordinator.snapshot()[0].status, InstanceStatus::Accepted);
        assert!(coordinator.take_transitions().is_empty());

        coordinator.fetch_once().await.unwrap();
        assert_eq!(coordinator.snapshot()[0].status, InstanceStatus::Provisioning);
        let transitions = coordinator.take_transitions();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from, InstanceStatus::Accepted);
        assert_eq!(transitions[0].to, InstanceStatus::Provisioning);

        // Drained: a second take returns nothing.
        assert!(coordinator.take_transitions().is_empty());
    }

    #[tokio::test]
    async fn test_straggler_response_is_discarded() {
        let api = ScriptedApi::with_lists(vec![page(vec![])]);
        let coordinator = coordinator_with(api);

        // Sequence 2 applies first; the older sequence 1 then arrives.
        coordinator.apply_page(
            2,
            vec![instance("1", "orders", InstanceStatus::Ready)],
            1,
        );
        coordinator.apply_page(
            1,
            vec![instance("1", "orders", InstanceStatus::Accepted)],
            1,
        );

        assert_eq!(coordinator.snapshot()[0].status, InstanceStatus::Ready);
    }

    #[tokio::test]
    async fn test_poll_failure_sets_stale_marker() {
        #[derive(Default)]
        struct FailingApi;

        #[async_trait]
        impl ControlPlaneApi for FailingApi {
            async fn list_instances(&self, _q: &ListQuery) -> strama_client::Result<ListPage> {
                Err(Error::Connection("refused".to_string()))
            }
            async fn create_instance(
                &self,
                _r: &CreateInstanceRequest,
            ) -> strama_client::Result<Instance> {
                unreachable!()
            }
            async fn delete_instance(&self, _id: &str) -> strama_client::Result<()> {
                unreachable!()
            }
            async fn reset_credentials(&self, _id: &str) -> strama_client::Result<Credentials> {
                unreachable!()
            }
            async fn create_service_account(
                &self,
                _r: &ServiceAccountRequest,
            ) -> strama_client::Result<ServiceAccount> {
                unreachable!()
            }
            async fn delete_service_account(&self, _id: &str) -> strama_client::Result<()> {
                unreachable!()
            }
            async fn reset_service_account(
                &self,
                _id: &str,
            ) -> strama_client::Result<ServiceAccount> {
                unreachable!()
            }
        }

        let coordinator = ConsoleCoordinator::new(
            Arc::new(FailingApi),
            Arc::new(StaticAuth::user("alice")),
            ConsoleConfig::default(),
        );

        assert!(coordinator.fetch_once().await.is_err());
        assert!(coordinator.last_poll_error().is_some());
    }

    #[tokio::test]
    async fn test_create_flow_closes_dialog() {
        let api = ScriptedApi::with_lists(vec![page(vec![])]);
        let coordinator = coordinator_with(api);

        coordinator.open_create_instance();
        assert!(coordinator.is_modal_open(ModalKind::CreateInstance));

        // Incomplete form is rejected locally.
        assert_eq!(
            coordinator.submit_create_instance().await.unwrap_err(),
            ActionError::FormIncomplete
        );

        coordinator
            .edit_create_form(|form| {
                form.set_name("orders");
                form.set_provider("aws");
                form.set_region("eu-west-1");
                form.set_plan("standard");
            })
            .unwrap();

        let created = coordinator.submit_create_instance().await.unwrap();
        assert_eq!(created.name, "orders");
        assert_eq!(coordinator.active_modal_kind(), None);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_dialog_open() {
        let api = ScriptedApi::with_lists(vec![page(vec![])])
            .fail_create(Error::api(409, r#"{"code":"streams-mgmt-36"}"#));
        let coordinator = coordinator_with(api);

        coordinator.open_create_instance();
        coordinator
            .edit_create_form(|form| {
                form.set_name("orders");
                form.set_provider("aws");
                form.set_region("eu-west-1");
                form.set_plan("standard");
            })
            .unwrap();

        let err = coordinator.submit_create_instance().await.unwrap_err();
        assert_eq!(err, ActionError::Api(ErrorKind::DuplicateName));
        // The dialog stays open for correction.
        assert!(coordinator.is_modal_open(ModalKind::CreateInstance));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_when_stable() {
        let api = ScriptedApi::with_lists(vec![page(vec![instance(
            "1",
            "my-topic",
            InstanceStatus::Ready,
        )])]);
        let coordinator = coordinator_with(api);
        coordinator.fetch_once().await.unwrap();

        coordinator.open_delete_instance("1").unwrap();
        assert!(!coordinator.delete_confirm_enabled());

        assert_eq!(
            coordinator.confirm_delete_instance().await.unwrap_err(),
            ActionError::ConfirmationMismatch
        );

        coordinator.set_delete_confirmation("MY-TOPIC").unwrap();
        assert!(coordinator.delete_confirm_enabled());
        coordinator.confirm_delete_instance().await.unwrap();
        assert_eq!(coordinator.active_modal_kind(), None);

        // Deletion does not touch the local snapshot; the next poll does.
        assert_eq!(coordinator.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_provisioning_needs_no_confirmation() {
        let api = ScriptedApi::with_lists(vec![page(vec![instance(
            "1",
            "my-topic",
            InstanceStatus::Provisioning,
        )])]);
        let coordinator = coordinator_with(api);
        coordinator.fetch_once().await.unwrap();

        coordinator.open_delete_instance("1").unwrap();
        assert!(coordinator.delete_confirm_enabled());
        coordinator.confirm_delete_instance().await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_refused_for_deprovisioning_instance() {
        let api = ScriptedApi::with_lists(vec![page(vec![instance(
            "1",
            "my-topic",
            InstanceStatus::Deprovision,
        )])]);
        let coordinator = coordinator_with(api);
        coordinator.fetch_once().await.unwrap();

        assert!(matches!(
            coordinator.open_delete_instance("1").unwrap_err(),
            ActionError::InvalidState { .. }
        ));
    }

    #[tokio::test]
    async fn test_reset_refused_for_failed_instance() {
        let api = ScriptedApi::with_lists(vec![page(vec![instance(
            "1",
            "my-topic",
            InstanceStatus::Failed,
        )])]);
        let coordinator = coordinator_with(api);
        coordinator.fetch_once().await.unwrap();

        assert!(matches!(
            coordinator.open_reset_credentials("1").unwrap_err(),
            ActionError::InvalidState { .. }
        ));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete() {
        let api = ScriptedApi::with_lists(vec![page(vec![instance(
            "1",
            "my-topic",
            InstanceStatus::Provisioning,
        )])]);
        let coordinator = ConsoleCoordinator::new(
            Arc::new(api),
            Arc::new(StaticAuth::user("mallory")),
            ConsoleConfig::default(),
        );
        coordinator.fetch_once().await.unwrap();

        coordinator.open_delete_instance("1").unwrap();
        assert_eq!(
            coordinator.confirm_delete_instance().await.unwrap_err(),
            ActionError::NotPermitted("1".to_string())
        );
    }

    #[tokio::test]
    async fn test_org_admin_may_delete_foreign_instance() {
        let api = ScriptedApi::with_lists(vec![page(vec![instance(
            "1",
            "my-topic",
            InstanceStatus::Provisioning,
        )])]);
        let coordinator = ConsoleCoordinator::new(
            Arc::new(api),
            Arc::new(StaticAuth::admin("root")),
            ConsoleConfig::default(),
        );
        coordinator.fetch_once().await.unwrap();

        coordinator.open_delete_instance("1").unwrap();
        coordinator.confirm_delete_instance().await.unwrap();
    }

    #[tokio::test]
    async fn test_service_account_flows() {
        let api = ScriptedApi::with_lists(vec![page(vec![])]);
        let coordinator = coordinator_with(api);

        coordinator.open_create_service_account();
        assert_eq!(
            coordinator.submit_create_service_account().await.unwrap_err(),
            ActionError::FormIncomplete
        );

        {
            let mut state = coordinator.state.lock();
            if let Some(Modal::CreateServiceAccount(props)) = state.modals.active_mut() {
                props.name.set_value("ci-publisher".to_string());
            }
        }
        let account = coordinator.submit_create_service_account().await.unwrap();
        assert_eq!(account.name, "ci-publisher");

        coordinator.open_delete_service_account("sa-1", "ci-publisher");
        coordinator.set_delete_confirmation("ci-publisher").unwrap();
        coordinator.confirm_delete_service_account().await.unwrap();

        coordinator.open_reset_service_account("sa-1", "ci-publisher");
        let reset = coordinator.reset_service_account().await.unwrap();
        assert_eq!(reset.id, "sa-1");
    }

    #[tokio::test]
    async fn test_filters_flow_into_query() {
        let api = ScriptedApi::with_lists(vec![page(vec![])]);
        let coordinator = coordinator_with(api);

        coordinator
            .add_filter(FilterField::Name, "orders", false)
            .unwrap();
        coordinator
            .add_filter(FilterField::Owner, "alice", true)
            .unwrap();

        let query = coordinator.query();
        assert_eq!(
            query.search.as_deref(),
            Some("name like %orders% and owner = alice")
        );

        coordinator.clear_filters();
        assert_eq!(coordinator.query().search, None);
    }
}
