pub mod edit_session;
pub mod task_store;
