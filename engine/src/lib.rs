//! Quill Engine Library
//!
//! This library provides the core functionality of the Quill engine.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Engine error types
pub mod error;

/// Secret management module
pub mod secrets;

/// File operations against the project root
pub mod fs_ops;

/// Directive scanning and execution module
pub mod directives;

/// LLM provider abstraction layer
pub mod llm;

/// Assistant client and reply worker module
pub mod agent;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
