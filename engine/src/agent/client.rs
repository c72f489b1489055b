//! Assistant client and the single reply worker
//!
//! `AssistantClient` is a cheap handle over a bounded command channel. The
//! worker task on the other end owns the provider, the conversation log,
//! and the optional file-operation executor, and processes commands one at
//! a time — the single consumer is what gives directive batches their total
//! ordering across concurrent sends.

use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use super::{prompt, AgentError, ChatMessage};
use crate::directives::DirectiveProcessor;
use crate::fs_ops::FileOps;
use crate::llm::LLMProvider;
use crate::secrets::scrub_secrets;

/// Command channel buffer size
const COMMAND_BUFFER_SIZE: usize = 100;

/// Commands handled by the reply worker
enum AgentCommand {
    SendMessage {
        text: String,
        respond_to: oneshot::Sender<Result<String, AgentError>>,
    },
    SetProjectRoot {
        root: PathBuf,
    },
    ClearHistory,
    History {
        respond_to: oneshot::Sender<Vec<ChatMessage>>,
    },
}

/// Handle to the assistant reply worker.
///
/// Cloneable; all clones feed the same worker and therefore share one
/// conversation and one serialized directive pipeline.
#[derive(Clone)]
pub struct AssistantClient {
    commands: mpsc::Sender<AgentCommand>,
}

impl AssistantClient {
    /// Create a client and spawn its reply worker.
    ///
    /// With `project_root` set to `None`, replies are delivered verbatim —
    /// no directive is recognized or executed until a root is provided via
    /// `set_project_root`.
    pub fn new(provider: Box<dyn LLMProvider>, project_root: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER_SIZE);
        tokio::spawn(run_worker(provider, project_root, rx));
        Self { commands: tx }
    }

    /// Send a user message and wait for the fully processed reply.
    ///
    /// The returned text is the model reply with every recognized directive
    /// replaced by its status line.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<String, AgentError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(AgentCommand::SendMessage {
                text: text.into(),
                respond_to: tx,
            })
            .await
            .map_err(|_| AgentError::WorkerGone)?;

        rx.await.map_err(|_| AgentError::WorkerGone)?
    }

    /// Point directive execution at a (new) project root.
    pub async fn set_project_root(&self, root: PathBuf) -> Result<(), AgentError> {
        self.commands
            .send(AgentCommand::SetProjectRoot { root })
            .await
            .map_err(|_| AgentError::WorkerGone)
    }

    /// Clear the conversation history.
    pub async fn clear_history(&self) -> Result<(), AgentError> {
        self.commands
            .send(AgentCommand::ClearHistory)
            .await
            .map_err(|_| AgentError::WorkerGone)
    }

    /// Snapshot of the conversation history, oldest first.
    pub async fn history(&self) -> Result<Vec<ChatMessage>, AgentError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(AgentCommand::History { respond_to: tx })
            .await
            .map_err(|_| AgentError::WorkerGone)?;

        rx.await.map_err(|_| AgentError::WorkerGone)
    }
}

/// The reply worker loop. Exits when every client handle is dropped.
async fn run_worker(
    provider: Box<dyn LLMProvider>,
    project_root: Option<PathBuf>,
    mut commands: mpsc::Receiver<AgentCommand>,
) {
    let mut ops = project_root.map(FileOps::new);
    let mut history: Vec<ChatMessage> = Vec::new();

    debug!("Reply worker started (provider: {})", provider.name());

    while let Some(command) = commands.recv().await {
        match command {
            AgentCommand::SendMessage { text, respond_to } => {
                let result = handle_send(provider.as_ref(), &ops, &mut history, text).await;
                // Caller may have gone away; that doesn't stop the worker
                let _ = respond_to.send(result);
            }

            AgentCommand::SetProjectRoot { root } => {
                info!("Project root set to {}", root.display());
                ops = Some(FileOps::new(root));
            }

            AgentCommand::ClearHistory => {
                history.clear();
            }

            AgentCommand::History { respond_to } => {
                let _ = respond_to.send(history.clone());
            }
        }
    }

    debug!("Reply worker stopped");
}

/// One full send: record the turn, call the provider, process directives,
/// record the reply.
async fn handle_send(
    provider: &dyn LLMProvider,
    ops: &Option<FileOps>,
    history: &mut Vec<ChatMessage>,
    text: String,
) -> Result<String, AgentError> {
    info!("Sending message ({} chars)", text.len());
    history.push(ChatMessage::user(&text));

    let structure = ops.as_ref().map(|o| o.render_structure());
    let messages = prompt::assemble_prompt(history, structure.as_deref());

    let reply = provider.generate(&messages).await.map_err(|e| {
        error!("Provider call failed: {}", e);
        AgentError::Provider(scrub_secrets(&e.to_string()))
    })?;

    let processed = match ops {
        Some(ops) => {
            // Directive execution does blocking filesystem work; keep it
            // off the async executor.
            let processor = DirectiveProcessor::new(ops.clone());
            tokio::task::spawn_blocking(move || processor.process(&reply))
                .await
                .map_err(|e| AgentError::Processing(e.to_string()))?
        }
        // No project root: the engine is a no-op on the reply text
        None => reply,
    };

    history.push(ChatMessage::assistant(&processed));
    Ok(processed)
}
