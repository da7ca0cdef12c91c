//! Storage layer for the persisted session.
//!
//! # Modules
//!
//! - `backend`: Key/value trait abstraction and an in-memory implementation
//! - `json`: JSON file-based implementation with atomic writes
//! - `auth`: Token and profile accessors over any backend

pub mod auth;
pub mod backend;
pub mod json;

pub use auth::{AuthStorage, TOKEN_KEY, USER_KEY};
pub use backend::{KeyValueStore, MemoryStore};
pub use json::JsonStore;
