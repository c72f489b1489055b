//! Directive scanning and execution
//!
//! The assistant requests file-system side effects by embedding bracketed
//! directives in its reply text:
//!
//! ```text
//! [CREATE_FILE:path]
//! [CREATE_DIR:path]
//! [WRITE_FILE:path]content[/WRITE_FILE]
//! [DELETE_FILE:path]
//! [READ_FILE:path]
//! [LIST_FILES:path]
//! ```
//!
//! The processor scans the reply, executes each recognized directive against
//! the project root, and substitutes a status line for the matched span,
//! leaving all surrounding prose untouched. These token strings are the wire
//! contract with the model prompt; see `agent::prompt` for the vocabulary
//! text that teaches them to the model.
//!
//! Processing runs one pass per directive kind, in a fixed order. The order
//! is a hard contract: a reply containing both `[DELETE_FILE:a]` and
//! `[CREATE_FILE:a]` always creates first and deletes second, regardless of
//! which marker appears earlier in the text.

use crate::fs_ops::FileOps;
use tracing::{debug, warn};

/// Closing tag terminating a WRITE_FILE body.
const WRITE_FILE_TERMINATOR: &str = "[/WRITE_FILE]";

/// The six directive kinds the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    CreateFile,
    CreateDir,
    WriteFile,
    DeleteFile,
    ReadFile,
    ListFiles,
}

impl DirectiveKind {
    /// The fixed cross-kind execution order. Each kind is processed in a
    /// full pass over the text before the next kind is considered.
    pub const PROCESSING_ORDER: [DirectiveKind; 6] = [
        DirectiveKind::CreateFile,
        DirectiveKind::CreateDir,
        DirectiveKind::WriteFile,
        DirectiveKind::DeleteFile,
        DirectiveKind::ReadFile,
        DirectiveKind::ListFiles,
    ];

    /// The literal opening marker, up to and including the colon.
    pub fn marker(&self) -> &'static str {
        match self {
            DirectiveKind::CreateFile => "[CREATE_FILE:",
            DirectiveKind::CreateDir => "[CREATE_DIR:",
            DirectiveKind::WriteFile => "[WRITE_FILE:",
            DirectiveKind::DeleteFile => "[DELETE_FILE:",
            DirectiveKind::ReadFile => "[READ_FILE:",
            DirectiveKind::ListFiles => "[LIST_FILES:",
        }
    }

    /// Whether this kind carries a body terminated by `[/WRITE_FILE]`.
    fn has_body(&self) -> bool {
        matches!(self, DirectiveKind::WriteFile)
    }
}

/// Scans reply text for directives and executes them against a `FileOps`.
///
/// `process` is the sole entry point. It never returns an error: failures of
/// individual directives become inline failure status lines, and malformed
/// markers are passed through verbatim.
#[derive(Debug, Clone)]
pub struct DirectiveProcessor {
    ops: FileOps,
}

impl DirectiveProcessor {
    pub fn new(ops: FileOps) -> Self {
        Self { ops }
    }

    /// Rewrite reply text, replacing every well-formed directive with its
    /// status line. Text without recognized markers is returned unchanged,
    /// byte for byte.
    pub fn process(&self, reply: &str) -> String {
        let mut text = reply.to_string();
        for kind in DirectiveKind::PROCESSING_ORDER {
            text = self.run_pass(&text, kind);
        }
        text
    }

    /// Single left-to-right pass for one directive kind.
    ///
    /// Output is built append-only from a source cursor: prose is copied up
    /// to each match, the status line is emitted in place of the matched
    /// span, and scanning resumes in the *source* after the span. Inserted
    /// status text is never rescanned, so the pass always terminates and
    /// status lines cannot produce false matches.
    fn run_pass(&self, input: &str, kind: DirectiveKind) -> String {
        let marker = kind.marker();
        let mut out = String::with_capacity(input.len());
        let mut cursor = 0;

        while let Some(found) = input[cursor..].find(marker) {
            let start = cursor + found;
            let operand_start = start + marker.len();

            // Operand runs to the next ']'. Without one the directive is
            // malformed: stop this pass and pass the rest through raw.
            let Some(close) = input[operand_start..].find(']') else {
                warn!("Unterminated {} marker, leaving raw text", marker);
                break;
            };
            let operand_end = operand_start + close;
            let operand = &input[operand_start..operand_end];

            let (body, span_end) = if kind.has_body() {
                let body_start = operand_end + 1;
                match input[body_start..].find(WRITE_FILE_TERMINATOR) {
                    Some(term) => {
                        let body_end = body_start + term;
                        (
                            Some(&input[body_start..body_end]),
                            body_end + WRITE_FILE_TERMINATOR.len(),
                        )
                    }
                    None => {
                        // Missing [/WRITE_FILE]: same malformed treatment.
                        warn!("WRITE_FILE for '{}' has no terminator, leaving raw text", operand);
                        break;
                    }
                }
            } else {
                (None, operand_end + 1)
            };

            out.push_str(&input[cursor..start]);
            out.push_str(&self.execute(kind, operand, body));
            cursor = span_end;
        }

        out.push_str(&input[cursor..]);
        out
    }

    /// Execute one directive and format its status line.
    ///
    /// Every well-formed directive yields exactly one outcome, success or
    /// failure; errors are converted here and never propagate.
    fn execute(&self, kind: DirectiveKind, path: &str, body: Option<&str>) -> String {
        debug!("Executing {:?} for '{}'", kind, path);

        match kind {
            DirectiveKind::CreateFile => match self.ops.create_file(path) {
                Ok(_) => format!("✓ File created: {}", path),
                Err(e) => format!("✗ Failed to create file: {}", e),
            },

            DirectiveKind::CreateDir => {
                if self.ops.create_dir(path) {
                    format!("✓ Directory created: {}", path)
                } else {
                    "✗ Failed to create directory".to_string()
                }
            }

            DirectiveKind::WriteFile => {
                match self.ops.write_file(path, body.unwrap_or_default()) {
                    Ok(()) => format!("✓ File written: {}\n", path),
                    Err(e) => format!("✗ Failed to write file: {}\n", e),
                }
            }

            DirectiveKind::DeleteFile => {
                if self.ops.delete(path) {
                    format!("✓ Deleted: {}", path)
                } else {
                    "✗ Failed to delete".to_string()
                }
            }

            DirectiveKind::ReadFile => match self.ops.read_file(path) {
                Ok(content) => format!("File content of {}:\n```\n{}\n```", path, content),
                Err(e) => format!("✗ Failed to read file: {}", e),
            },

            DirectiveKind::ListFiles => {
                let files = self.ops.list_files(path);
                format!("Files in {}:\n{}", path, files.join("\n"))
            }
        }
    }
}
