pub mod config;
pub mod credential_store;
pub mod error;
pub mod task_client;
pub mod wire;
