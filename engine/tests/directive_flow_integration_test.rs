//! End-to-end tests for the directive pipeline: reply text in, rewritten
//! text out, with real filesystem effects under a temporary project root.

use quill_engine::directives::DirectiveProcessor;
use quill_engine::fs_ops::FileOps;
use tempfile::TempDir;

fn setup() -> (TempDir, DirectiveProcessor) {
    let temp = TempDir::new().unwrap();
    let processor = DirectiveProcessor::new(FileOps::new(temp.path().to_path_buf()));
    (temp, processor)
}

#[test]
fn test_reply_without_directives_is_untouched() {
    let (_temp, processor) = setup();

    let reply = "To fix the bug, change line 12 of `main.rs` [see docs].\n\nNo directives here.";
    assert_eq!(processor.process(reply), reply);
}

#[test]
fn test_create_file_directive_creates_and_confirms() {
    let (temp, processor) = setup();

    let out = processor.process("[CREATE_FILE:notes.txt]");
    assert_eq!(out, "✓ File created: notes.txt");
    assert!(temp.path().join("notes.txt").is_file());
}

#[test]
fn test_write_read_round_trip() {
    let (temp, processor) = setup();

    let out = processor.process("[WRITE_FILE:a.txt]hello world[/WRITE_FILE]");
    assert_eq!(out, "✓ File written: a.txt\n");
    assert_eq!(
        std::fs::read_to_string(temp.path().join("a.txt")).unwrap(),
        "hello world"
    );

    let out = processor.process("[READ_FILE:a.txt]");
    assert!(out.contains("File content of a.txt:"));
    assert!(out.contains("```\nhello world\n"));
}

#[test]
fn test_cross_kind_order_create_before_delete() {
    let (temp, processor) = setup();

    std::fs::write(temp.path().join("a.txt"), "pre-existing").unwrap();

    let out = processor.process("[DELETE_FILE:a.txt][CREATE_FILE:a.txt]");

    // CREATE_FILE is an earlier pass than DELETE_FILE, so the file ends up
    // absent even though the delete marker appears first in the text.
    assert!(!temp.path().join("a.txt").exists());
    assert_eq!(out, "✓ Deleted: a.txt✓ File created: a.txt");
}

#[test]
fn test_full_reply_with_mixed_prose_and_directives() {
    let (temp, processor) = setup();

    let reply = "I'll set up the module for you.\n\n\
                 [CREATE_DIR:src]\n\
                 [WRITE_FILE:src/lib.txt]pub fn answer() -> i32 { 42 }\n[/WRITE_FILE]\n\
                 Now listing to confirm:\n\
                 [LIST_FILES:src]\n\
                 Let me know if you need anything else.";

    let out = processor.process(reply);

    assert!(out.starts_with("I'll set up the module for you."));
    assert!(out.contains("✓ Directory created: src"));
    assert!(out.contains("✓ File written: src/lib.txt"));
    assert!(out.contains("Files in src:\nlib.txt"));
    assert!(out.ends_with("Let me know if you need anything else."));
    assert!(temp.path().join("src/lib.txt").is_file());
}

#[test]
fn test_malformed_marker_no_mutation() {
    let (temp, processor) = setup();

    let reply = "[CREATE_FILE:missing_bracket";
    assert_eq!(processor.process(reply), reply);
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_read_failure_yields_inline_status() {
    let (temp, processor) = setup();

    let out = processor.process("[READ_FILE:does_not_exist.txt]");
    assert!(out.contains("✗ Failed to read file:"));
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_rename_via_ops_backend() {
    let (temp, _processor) = setup();
    let ops = FileOps::new(temp.path().to_path_buf());

    ops.write_file("old/name.txt", "content").unwrap();
    assert!(ops.rename("old/name.txt", "new/name.txt"));
    assert!(temp.path().join("new/name.txt").is_file());
    assert!(!temp.path().join("old/name.txt").exists());
}

#[test]
fn test_tree_filtering_end_to_end() {
    let temp = TempDir::new().unwrap();
    let ops = FileOps::new(temp.path().to_path_buf());

    ops.create_dir(".git");
    ops.create_dir("build");
    ops.create_dir("bin");
    ops.write_file("src/Main.txt", "fn main() {}").unwrap();

    let tree = ops.render_structure();
    assert!(!tree.contains(".git"));
    assert!(!tree.contains("build"));
    assert!(!tree.contains("bin"));
    assert!(tree.contains("src/"));
    assert!(tree.contains("Main.txt"));
}
