//! Client core for a household task tracker: a typed task model, a wire
//! transform for the remote gateway, a staleness-aware task cache with
//! rollback-safe mutations, pure filter/sort and dashboard aggregation
//! functions, and the modal edit-session state machine.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::edit_session::EditSession;
pub use application::task_store::{NowProvider, RetryPolicy, TaskSnapshot, TaskStore};
pub use domain::filter::{derive, AssigneeFilter, CategoryFilter, FilterSpec, SortBy};
pub use domain::models::{
    AuthSession, Member, Task, TaskDraft, TaskPatch, TaskStatus,
};
pub use domain::summary::{category_breakdown, upcoming, upcoming_window, CategoryShare};
pub use infrastructure::config::GatewayConfig;
pub use infrastructure::credential_store::{
    CredentialStore, InMemoryCredentialStore, KeyringCredentialStore,
};
pub use infrastructure::error::ClientError;
pub use infrastructure::task_client::{ReqwestTaskClient, TaskGateway};
