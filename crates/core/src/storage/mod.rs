//! In-memory storage used by nodes for the entries they hold directly.
//! Durability is left to the embedding application.

pub mod memory;

pub use crate::storage::memory::MemStorage;
