//! Prompt assembly
//!
//! Builds the outbound message list for the provider: a system message
//! carrying the assistant context, the rendered project structure, and the
//! directive vocabulary, followed by the most recent conversation turns.

use super::ChatMessage;
use crate::llm::Message;

/// Number of trailing conversation turns included in each prompt.
pub const HISTORY_WINDOW: usize = 5;

/// Static description of the directive grammar, included in every system
/// prompt. The bracketed token strings are the wire contract with the
/// directive processor — they must match `DirectiveKind::marker` exactly.
pub const DIRECTIVE_VOCABULARY: &str = "\
File Operation Commands (use these in your response):
- [CREATE_FILE:path/to/file] - Create a new empty file
- [WRITE_FILE:path/to/file]content[/WRITE_FILE] - Write content to a file
- [READ_FILE:path/to/file] - Read file content
- [DELETE_FILE:path/to/file] - Delete a file or directory
- [CREATE_DIR:path/to/directory] - Create a directory
- [LIST_FILES:path/to/directory] - List files in a directory
";

/// Assemble the provider message list for the current conversation state.
///
/// `structure` is the rendered project tree, when a project root is set.
/// The caller is expected to have already appended the current user turn to
/// `history`.
pub fn assemble_prompt(history: &[ChatMessage], structure: Option<&str>) -> Vec<Message> {
    let mut system = String::new();
    system.push_str(
        "You are an AI coding assistant. You can help with code generation, \
         debugging, refactoring, and file operations.\n\n",
    );

    if let Some(tree) = structure {
        system.push_str("Current Project Structure:\n");
        system.push_str(tree);
        system.push_str("\n\n");
    }

    system.push_str(DIRECTIVE_VOCABULARY);

    let mut messages = vec![Message::system(system)];

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    for turn in &history[start..] {
        if turn.is_user() {
            messages.push(Message::user(&turn.content));
        } else {
            messages.push(Message::assistant(&turn.content));
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_system_prompt_carries_vocabulary() {
        let history = vec![ChatMessage::user("hello")];
        let messages = assemble_prompt(&history, None);

        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0].content.contains("[CREATE_FILE:"));
        assert!(messages[0].content.contains("[/WRITE_FILE]"));
        assert!(messages[0].content.contains("[LIST_FILES:"));
        assert!(!messages[0].content.contains("Current Project Structure"));
    }

    #[test]
    fn test_structure_included_when_present() {
        let history = vec![ChatMessage::user("hello")];
        let messages = assemble_prompt(&history, Some("└── src/\n"));

        assert!(messages[0].content.contains("Current Project Structure:"));
        assert!(messages[0].content.contains("└── src/"));
    }

    #[test]
    fn test_history_window_trims_old_turns() {
        let mut history = Vec::new();
        for i in 0..8 {
            history.push(ChatMessage::user(format!("turn {}", i)));
        }

        let messages = assemble_prompt(&history, None);
        // system message + the last HISTORY_WINDOW turns
        assert_eq!(messages.len(), 1 + HISTORY_WINDOW);
        assert_eq!(messages[1].content, "turn 3");
        assert_eq!(messages.last().unwrap().content, "turn 7");
    }

    #[test]
    fn test_turn_roles_map_to_message_roles() {
        let history = vec![
            ChatMessage::user("make a file"),
            ChatMessage::assistant("✓ File created: a.txt"),
            ChatMessage::user("thanks"),
        ];

        let messages = assemble_prompt(&history, None);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(messages[3].role, MessageRole::User);
    }
}
