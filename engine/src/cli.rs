//! CLI interface for Quill
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quill AI Coding Assistant
///
/// A chat assistant that can create, edit, and inspect files in your
/// project through directives embedded in its replies.
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a single message and print the processed reply
    Ask {
        /// The message to send
        message: String,

        /// Project root override (defaults to core.project_root)
        #[arg(long, value_name = "PATH")]
        project: Option<PathBuf>,
    },

    /// Start an interactive chat session
    Chat {
        /// Project root override (defaults to core.project_root)
        #[arg(long, value_name = "PATH")]
        project: Option<PathBuf>,
    },

    /// Print the rendered project structure
    Structure {
        /// Project root override (defaults to core.project_root)
        #[arg(long, value_name = "PATH")]
        project: Option<PathBuf>,
    },

    /// Manage the Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

/// API key management actions
#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Store the API key in the OS keychain (prompted interactively)
    Set,

    /// Remove the API key from the OS keychain
    Clear,

    /// Show whether an API key is configured
    Status,
}
