// # Diff Tool Trait
//
// Defines the interface for generating a human-readable diff of two snapshots.
//
// ## Purpose
//
// The engine's value is the versioning state machine, not diff computation,
// so the diff stays behind an interface. Implementations may shell out to an
// external command or embed a text-diff library; the engine only captures
// their output and never parses it.
//
// ## Failure Contract
//
// A diff that runs but exits non-zero is NOT an error: its stdout/stderr are
// returned in [`DiffOutput`] with `exit_failed` set, and the engine embeds
// them in the report verbatim. Only a failure to invoke the tool at all
// (e.g. program not found) is an `Err`, and the engine recovers that into a
// report too rather than aborting the run.

use async_trait::async_trait;
use std::path::Path;

/// Captured output of one diff invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOutput {
    /// Standard output, verbatim
    pub stdout: String,
    /// Standard error, verbatim
    pub stderr: String,
    /// True when the tool exited non-zero
    pub exit_failed: bool,
}

impl DiffOutput {
    /// Build an output describing a tool that could not be invoked
    pub fn from_failure(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            exit_failed: true,
        }
    }
}

/// Trait for diff tool implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DiffTool: Send + Sync {
    /// Diff two snapshot files
    ///
    /// # Parameters
    ///
    /// - `old_path`: The prior snapshot
    /// - `new_path`: The snapshot that displaced it
    ///
    /// # Returns
    ///
    /// - `Ok(DiffOutput)`: the tool ran; inspect `exit_failed` for its status
    /// - `Err(Error)`: the tool could not be invoked
    async fn diff(&self, old_path: &Path, new_path: &Path) -> Result<DiffOutput, crate::Error>;

    /// Get the tool name (for logging/debugging)
    fn tool_name(&self) -> &'static str;
}
