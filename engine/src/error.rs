//! Error types and handling
//!
//! Top-level error type for the Quill engine. Layer-specific failures
//! (file operations, LLM calls, agent commands) have their own enums in
//! their modules; this type covers configuration, keychain access, and
//! plain I/O failures that surface at the binary level.

use thiserror::Error;

/// Main engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Keyring errors
    #[error("Keyring error: {0}")]
    Keyring(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
