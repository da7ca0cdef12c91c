//! Infrastructure layer for filesystem interactions in the plugin sandbox.

pub mod paths;

pub use paths::{resolve_path, session_file, span_file, DEFAULT_DATA_DIR};
