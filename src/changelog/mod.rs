use crate::transcript::{ToolUseBlock, Transcript};
use std::fmt;

// ===================================================================
// Constants
// ===================================================================

/// Sole changelog line when no file-modifying tool call was recognized.
pub const NO_CHANGES: &str = "(no file changes)";

/// Bash commands are quoted up to this many characters, without a marker.
const COMMAND_PREVIEW_CHARS: usize = 80;

/// Substrings that make a Bash command count as a deletion.
const DELETE_MARKERS: &[&str] = &["rm ", "rm -", "rmdir", "unlink"];

/// Substrings that make a Bash command count as a filesystem move, copy,
/// or directory creation. Checked only when no delete marker matched.
const FS_MARKERS: &[&str] = &["mv ", "cp ", "mkdir"];

/// Placeholder for a missing path parameter.
const UNKNOWN_PATH: &str = "?";

/// Keep the first `max` chars of `s` (Unicode scalar values, not bytes).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

// ===================================================================
// FileChange: one recognized tool call
// ===================================================================

/// A file-modifying action taken by the assistant. Each variant renders as
/// exactly one changelog line via `Display`.
#[derive(Debug, PartialEq, Eq)]
pub enum FileChange {
    /// `Edit` tool: path plus the length of the replacement text in chars.
    Edit { path: String, chars: usize },
    /// `Write` tool.
    Write { path: String },
    /// `NotebookEdit` tool.
    Notebook { path: String },
    /// `Bash` command that removes files, already truncated.
    Delete { command: String },
    /// `Bash` command that moves, copies or creates directories, already truncated.
    Fs { command: String },
}

impl FileChange {
    /// Classify a tool_use block. Unknown tools, and Bash commands that
    /// match neither marker list, yield `None`.
    pub fn classify(tool_use: &ToolUseBlock) -> Option<Self> {
        let path = |key: &str| tool_use.str_input(key).unwrap_or(UNKNOWN_PATH).to_string();
        match tool_use.name.as_str() {
            "Edit" => Some(Self::Edit {
                path: path("file_path"),
                chars: tool_use.str_input("new_string").unwrap_or("").chars().count(),
            }),
            "Write" => Some(Self::Write { path: path("file_path") }),
            "NotebookEdit" => Some(Self::Notebook { path: path("notebook_path") }),
            "Bash" => Self::classify_command(tool_use.str_input("command").unwrap_or("")),
            _ => None,
        }
    }

    /// Markers are matched against the full command; only the emitted
    /// text is truncated.
    fn classify_command(command: &str) -> Option<Self> {
        let preview = || truncate_chars(command, COMMAND_PREVIEW_CHARS).to_string();
        if DELETE_MARKERS.iter().any(|m| command.contains(m)) {
            Some(Self::Delete { command: preview() })
        } else if FS_MARKERS.iter().any(|m| command.contains(m)) {
            Some(Self::Fs { command: preview() })
        } else {
            None
        }
    }
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit { path, chars } => write!(f, "EDIT {path}: {chars} chars"),
            Self::Write { path } => write!(f, "WRITE {path}"),
            Self::Notebook { path } => write!(f, "NOTEBOOK {path}"),
            Self::Delete { command } => write!(f, "DELETE via bash: {command}"),
            Self::Fs { command } => write!(f, "FS: {command}"),
        }
    }
}

// ===================================================================
// Changelog: ordered changes for a transcript
// ===================================================================

#[derive(Debug, PartialEq, Eq)]
pub struct Changelog {
    changes: Vec<FileChange>,
}

impl Changelog {
    /// Collect the changes made by assistant tool calls, in document order.
    pub fn from_transcript(transcript: &Transcript) -> Self {
        let changes = transcript
            .assistant_tool_uses()
            .filter_map(FileChange::classify)
            .inspect(|change| tracing::debug!(%change, "classified tool call"))
            .collect();
        Self { changes }
    }

    pub fn changes(&self) -> &[FileChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// One newline-terminated line per change, or the sentinel line when
    /// there are none.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return format!("{NO_CHANGES}\n");
        }
        self.changes.iter().map(|c| format!("{c}\n")).collect()
    }
}
