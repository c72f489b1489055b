//! File operations against the project root
//!
//! Primitive, stateless-per-call file operations for the directive engine.
//! Every operation takes a path relative to the project root and resolves it
//! by direct concatenation. Resolved paths are NOT canonicalized or checked
//! for containment, so `..` operands can escape the root — a known gap kept
//! for compatibility with the directive wire contract (see DESIGN.md).
//!
//! All calls are synchronous; the reply worker runs them on a blocking
//! thread (`spawn_blocking`), never on the async executor directly.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Directory tree rendering stops below this depth (root children = 0).
const MAX_TREE_DEPTH: usize = 3;

/// Directory names excluded from the rendered project structure.
const SKIPPED_DIR_NAMES: [&str; 2] = ["build", "bin"];

/// Errors from individual file operations.
///
/// These are caught at the point of directive execution and formatted into
/// inline failure status lines; they never abort a directive pass.
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to create directory: {0}")]
    CreateDir(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// File operation executor rooted at a project directory.
///
/// Holds only the root path, so it is cheap to clone into blocking tasks.
#[derive(Debug, Clone)]
pub struct FileOps {
    root: PathBuf,
}

impl FileOps {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The project root all relative operands resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an operand against the project root by direct concatenation.
    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Read a file as text.
    ///
    /// Fails with `NotFound` if the path is missing or not a regular file.
    /// Content is reconstructed line by line with a trailing `\n` per line,
    /// so CRLF input is normalized and the result always ends in a newline.
    pub fn read_file(&self, path: &str) -> Result<String, FileOpError> {
        let file = self.resolve(path);
        if !file.is_file() {
            return Err(FileOpError::NotFound(path.to_string()));
        }

        let raw = fs::read_to_string(&file)?;
        let mut content = String::with_capacity(raw.len() + 1);
        for line in raw.lines() {
            content.push_str(line);
            content.push('\n');
        }

        debug!("Read {} bytes from {}", content.len(), file.display());
        Ok(content)
    }

    /// Write content to a file, creating it if absent and overwriting
    /// entirely otherwise. Missing parent directories are created first.
    pub fn write_file(&self, path: &str, content: &str) -> Result<(), FileOpError> {
        let file = self.resolve(path);
        self.ensure_parent(&file)?;

        fs::write(&file, content)?;
        debug!("File written: {}", path);
        Ok(())
    }

    /// Create a new empty file, creating missing parent directories.
    ///
    /// Returns `Ok(false)` when the file already exists — that is a normal
    /// outcome, not an error.
    pub fn create_file(&self, path: &str) -> Result<bool, FileOpError> {
        let file = self.resolve(path);
        self.ensure_parent(&file)?;

        match OpenOptions::new().write(true).create_new(true).open(&file) {
            Ok(_) => {
                debug!("File created: {}", path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!("File created: {} - already exists", path);
                Ok(false)
            }
            Err(e) => Err(FileOpError::Io(e)),
        }
    }

    /// Create a directory and any missing ancestors.
    ///
    /// Returns whether a directory was actually created: an already-existing
    /// path reports `false`, as does any creation failure.
    pub fn create_dir(&self, path: &str) -> bool {
        let dir = self.resolve(path);
        let created = !dir.exists() && fs::create_dir_all(&dir).is_ok();
        debug!("Directory created: {} - {}", path, created);
        created
    }

    /// Recursively delete a file or directory, children first.
    ///
    /// Returns the result of the final delete of the target itself; a
    /// missing target simply reports `false`.
    pub fn delete(&self, path: &str) -> bool {
        let target = self.resolve(path);
        let deleted = delete_tree(&target);
        debug!("Deleted: {} - {}", path, deleted);
        deleted
    }

    /// List the immediate children of a directory, in filesystem order.
    ///
    /// A missing path or a non-directory yields an empty list, not an error.
    pub fn list_files(&self, path: &str) -> Vec<String> {
        let dir = self.resolve(path);
        if !dir.is_dir() {
            return Vec::new();
        }

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect()
    }

    /// Rename or move a file, creating missing parent directories for the
    /// destination first.
    pub fn rename(&self, old_path: &str, new_path: &str) -> bool {
        let old = self.resolve(old_path);
        let new = self.resolve(new_path);

        if self.ensure_parent(&new).is_err() {
            return false;
        }

        let renamed = fs::rename(&old, &new).is_ok();
        debug!("Renamed: {} -> {} - {}", old_path, new_path, renamed);
        renamed
    }

    /// Render the project structure as a depth-limited tree drawing.
    ///
    /// Hidden entries (leading `.`) and `build`/`bin` directories are
    /// skipped entirely. Directories carry a trailing `/`; the last child of
    /// each directory uses the `└── ` branch glyph.
    pub fn render_structure(&self) -> String {
        let mut out = String::new();
        render_level(&self.root, "", &mut out, 0);
        out
    }

    /// Create the parent directory chain for a target path.
    fn ensure_parent(&self, target: &Path) -> Result<(), FileOpError> {
        if let Some(parent) = target.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|_| FileOpError::CreateDir(parent.display().to_string()))?;
            }
        }
        Ok(())
    }
}

/// Post-order delete of a file or directory tree.
///
/// Uses an explicit stack instead of recursion so worst-case stack usage
/// stays bounded on deep trees. Child deletion failures are ignored; only
/// the final delete of `root` determines the result.
fn delete_tree(root: &Path) -> bool {
    // First pass: walk top-down, removing files as they are found and
    // recording directories for a deepest-first second pass.
    let mut pending = vec![root.to_path_buf()];
    let mut dirs: Vec<PathBuf> = Vec::new();

    while let Some(path) = pending.pop() {
        if path.is_dir() {
            dirs.push(path.clone());
            if let Ok(entries) = fs::read_dir(&path) {
                for entry in entries.flatten() {
                    pending.push(entry.path());
                }
            }
        } else if path != root {
            let _ = fs::remove_file(&path);
        }
    }

    // Directories were recorded parent-before-child, so the reverse order
    // is always child-before-parent.
    for dir in dirs.iter().rev() {
        if dir == root {
            continue;
        }
        let _ = fs::remove_dir(dir);
    }

    if root.is_dir() {
        fs::remove_dir(root).is_ok()
    } else {
        fs::remove_file(root).is_ok()
    }
}

/// Whether a directory entry is hidden from the rendered structure.
fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIR_NAMES.contains(&name)
}

/// Render one directory level and recurse into subdirectories.
///
/// Recursion depth is bounded by `MAX_TREE_DEPTH`.
fn render_level(dir: &Path, prefix: &str, out: &mut String, depth: usize) {
    if depth > MAX_TREE_DEPTH {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    let visible: Vec<(String, PathBuf, bool)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_skipped(&name) {
                return None;
            }
            let path = entry.path();
            let is_dir = path.is_dir();
            Some((name, path, is_dir))
        })
        .collect();

    for (i, (name, path, is_dir)) in visible.iter().enumerate() {
        let is_last = i == visible.len() - 1;

        out.push_str(prefix);
        out.push_str(if is_last { "└── " } else { "├── " });
        out.push_str(name);
        if *is_dir {
            out.push('/');
        }
        out.push('\n');

        if *is_dir {
            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            render_level(path, &child_prefix, out, depth + 1);
        }
    }
}
