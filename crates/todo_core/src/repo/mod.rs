//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-collection load/save contract used by the store.
//! - Isolate file format and filesystem details from the service layer.
//!
//! # Invariants
//! - `save` replaces the full collection; there is no incremental patching.
//! - A failed `save` leaves the previously persisted data intact.
//! - `load` rejects invalid persisted state instead of masking it; callers
//!   decide whether to degrade.

pub mod todo_repo;
