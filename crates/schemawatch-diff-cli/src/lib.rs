// # CLI Diff Tool
//
// This crate runs an external diff command for the schemawatch system.
//
// ## Architecture
//
// The command is invoked once per detected change with the two snapshot
// paths appended to its configured arguments. stdout, stderr, and the exit
// status are captured verbatim; the engine embeds them in the diff report
// without interpretation.
//
// A non-zero exit is normal for diff tools (most use it to mean "files
// differ") and is reported through `DiffOutput::exit_failed`, not as an
// error. Only failing to spawn the process at all returns `Err`.

use schemawatch_core::config::DiffCommandConfig;
use schemawatch_core::traits::diff_tool::{DiffOutput, DiffTool};
use schemawatch_core::{Error, Result};

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Diff tool backed by an external command
pub struct CliDiffTool {
    /// Program to execute
    program: String,

    /// Leading arguments before the two snapshot paths
    args: Vec<String>,
}

impl CliDiffTool {
    /// Create a diff tool from command configuration
    pub fn new(config: &DiffCommandConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            program: config.program.clone(),
            args: config.args.clone(),
        })
    }
}

#[async_trait::async_trait]
impl DiffTool for CliDiffTool {
    async fn diff(&self, old_path: &Path, new_path: &Path) -> Result<DiffOutput> {
        tracing::debug!(
            program = %self.program,
            old = %old_path.display(),
            new = %new_path.display(),
            "Running diff command"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(old_path)
            .arg(new_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::diff_tool(format!("Failed to run '{}': {}", self.program, e)))?;

        Ok(DiffOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_failed: !output.status.success(),
        })
    }

    fn tool_name(&self) -> &'static str {
        "cli"
    }
}
