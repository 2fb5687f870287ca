//! Domain model for the todo store.
//!
//! # Responsibility
//! - Define the persisted todo record and its validation rules.
//! - Derive read-only summaries (statistics) from the collection.
//!
//! # Invariants
//! - IDs are positional (`1..=N`) and may change after a deletion.
//! - Deletion is a hard delete; there are no tombstones.

pub mod stats;
pub mod todo;
