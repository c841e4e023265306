//! Error types for the playback sandbox

pub mod types;

pub use types::{BridgeError, CatalogError, SandboxError, StorageError};
