//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory todo collection and orchestrate repository writes.
//! - Keep the CLI decoupled from storage details.

pub mod todo_store;
