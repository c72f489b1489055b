//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - ask: Send a single message and print the processed reply
//! - chat: Interactive REPL session
//! - structure: Print the rendered project tree
//! - key: Manage the Gemini API key in the OS keychain

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::agent::AssistantClient;
use crate::cli::KeyAction;
use crate::config::Config;
use crate::fs_ops::FileOps;
use crate::llm::gemini::GeminiProvider;
use crate::secrets::{SecretManager, GEMINI_API_KEY};

/// Keychain service name for Quill secrets
const SERVICE_NAME: &str = "quill";

/// Send a single message and print the processed reply.
pub async fn handle_ask(message: String, project: Option<PathBuf>, config: &Config) -> Result<()> {
    let client = build_client(config, project)?;

    let reply = client
        .send_message(message)
        .await
        .context("Assistant request failed")?;

    println!("{}", reply);
    Ok(())
}

/// Interactive chat session. `/clear` resets the conversation, `/quit`
/// (or EOF) exits.
pub async fn handle_chat(project: Option<PathBuf>, config: &Config) -> Result<()> {
    let client = build_client(config, project)?;

    println!("Quill chat — /clear resets the conversation, /quit exits.");

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let input = line.trim();
        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                client.clear_history().await.ok();
                println!("(conversation cleared)");
                continue;
            }
            _ => {}
        }

        match client.send_message(input).await {
            Ok(reply) => println!("\n{}\n", reply),
            Err(e) => eprintln!("error: {}", e),
        }
    }

    Ok(())
}

/// Print the rendered project structure.
pub fn handle_structure(project: Option<PathBuf>, config: &Config) -> Result<()> {
    let root = project.unwrap_or_else(|| config.core.project_root.clone());
    let ops = FileOps::new(root.clone());

    println!("{}/", root.display());
    print!("{}", ops.render_structure());
    Ok(())
}

/// Manage the Gemini API key in the OS keychain.
pub fn handle_key(action: KeyAction) -> Result<()> {
    let secrets = SecretManager::new(SERVICE_NAME);

    match action {
        KeyAction::Set => {
            let value = secrets.prompt_for_secret(GEMINI_API_KEY)?;
            secrets.set_secret(GEMINI_API_KEY, &value)?;
            println!("API key stored.");
        }
        KeyAction::Clear => {
            secrets.delete_secret(GEMINI_API_KEY)?;
            println!("API key removed.");
        }
        KeyAction::Status => {
            if secrets.has_secret(GEMINI_API_KEY) {
                println!("API key is configured.");
            } else {
                println!("No API key configured. Run 'quill key set'.");
            }
        }
    }

    Ok(())
}

/// Build an assistant client from config, keychain, and project override.
///
/// A missing API key is reported here, before any message is sent — the
/// reply pipeline itself never sees an unconfigured provider.
fn build_client(config: &Config, project: Option<PathBuf>) -> Result<AssistantClient> {
    let secrets = SecretManager::new(SERVICE_NAME);
    if !secrets.has_secret(GEMINI_API_KEY) {
        bail!("No Gemini API key configured. Run 'quill key set' first.");
    }

    let api_key = secrets.get_secret(GEMINI_API_KEY)?;
    let provider = Box::new(GeminiProvider::new(config.gemini.clone(), api_key));

    let root = project.unwrap_or_else(|| config.core.project_root.clone());
    Ok(AssistantClient::new(provider, Some(root)))
}
