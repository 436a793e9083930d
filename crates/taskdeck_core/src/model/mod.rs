//! Task board domain model.
//!
//! # Responsibility
//! - Define the records held by the store and mirrored to the slot.
//! - Own the wire shape (camelCase JSON, ISO 8601 millisecond instants).
//!
//! # Invariants
//! - Every task is identified by an `id` assigned once at creation.
//! - Deletion removes the record; there are no tombstones.

pub mod task;
pub mod timestamp;
