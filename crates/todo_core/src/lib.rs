//! Core todo record store.
//! This crate owns the data model, its JSON persistence and every invariant
//! the command-line front end relies on.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::stats::TodoStats;
pub use model::todo::{
    format_timestamp, parse_timestamp, Priority, Todo, TodoId, TodoValidationError,
    TIMESTAMP_FORMAT,
};
pub use repo::todo_repo::{
    JsonFileRepository, RepoError, RepoResult, TodoRepository, DEFAULT_DATA_FILE,
};
pub use service::todo_store::{StoreError, StoreResult, TodoPatch, TodoStore};
