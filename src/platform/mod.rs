//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (timestamps for scores and saves)
//! - Input events
//! - Storage (LocalStorage on web)
//! - HUD element visibility

pub mod dom;
pub mod input;
pub mod storage;
pub mod time;

pub use input::command_for_key;
pub use storage::{KeyValueStore, MemoryStore, PlatformStore, StorageError};
