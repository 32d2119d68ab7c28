//! # delver-checkpoint
//!
//! Checkpoint abstractions for delver run graphs: the [`Checkpoint`] snapshot
//! type, the [`CheckpointSaver`] storage trait, and the in-memory
//! [`InMemorySaver`] reference backend.
//!
//! The engine commits one checkpoint per completed node, keyed by run id.
//! Storage is addressed through the trait so a durable backend can be swapped
//! in without touching the engine; only the in-memory backend ships here.

pub mod checkpoint;
pub mod error;
pub mod memory;
pub mod traits;

// Re-export main types
pub use checkpoint::Checkpoint;
pub use error::{CheckpointError, Result};
pub use memory::InMemorySaver;
pub use traits::CheckpointSaver;
