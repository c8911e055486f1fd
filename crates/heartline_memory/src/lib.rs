//! # Heartline persistence
//!
//! Stores relationship records and dialogue logs by player x character key.
//! The relationship engine never touches this crate; the conversation service
//! loads a record, hands it to the engine and saves the snapshot it gets back.

mod json_store;
mod locks;
mod memory_store;
mod store;

pub use json_store::JsonFileStore;
pub use locks::PairLocks;
pub use memory_store::MemoryStore;
pub use store::{RelationshipStore, Result, StoreError};
