//! Command sinks: the hand-off point between reconciliation and transport.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::error::{CfgMgrError, CfgMgrResult};

/// Destination for generated commands (device session, file, ...).
#[async_trait]
pub trait CommandSink: Send {
    /// Delivers an ordered, non-empty list of commands.
    async fn apply(&mut self, commands: &[String]) -> CfgMgrResult<()>;
}

/// Appends commands to a file, one per line.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CommandSink for FileSink {
    async fn apply(&mut self, commands: &[String]) -> CfgMgrResult<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| CfgMgrError::sink(format!("{}: {}", self.path.display(), e)))?;

        let mut buf = commands.join("\n");
        buf.push('\n');
        file.write_all(buf.as_bytes())
            .await
            .map_err(|e| CfgMgrError::sink(format!("{}: {}", self.path.display(), e)))?;
        file.flush()
            .await
            .map_err(|e| CfgMgrError::sink(format!("{}: {}", self.path.display(), e)))?;

        debug!("Wrote {} commands to {}", commands.len(), self.path.display());
        Ok(())
    }
}

/// Keeps every applied batch in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Batches in the order they were applied.
    pub batches: Vec<Vec<String>>,
}

#[async_trait]
impl CommandSink for MemorySink {
    async fn apply(&mut self, commands: &[String]) -> CfgMgrResult<()> {
        self.batches.push(commands.to_vec());
        Ok(())
    }
}

/// Outcome of running a command list against a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// True if the device configuration would change (or did).
    pub changed: bool,
    /// The generated commands.
    pub commands: Vec<String>,
}

/// Hands `commands` to `sink` unless they are empty or `check_mode` is set.
///
/// `changed` reflects whether there was anything to do, regardless of
/// check mode.
#[instrument(skip(sink, commands), fields(count = commands.len()))]
pub async fn execute<S: CommandSink + ?Sized>(
    sink: &mut S,
    commands: Vec<String>,
    check_mode: bool,
) -> CfgMgrResult<ExecutionResult> {
    let changed = !commands.is_empty();
    if changed && !check_mode {
        sink.apply(&commands).await?;
        info!("Applied {} commands", commands.len());
    } else if changed {
        info!("Check mode: {} commands not applied", commands.len());
    }
    Ok(ExecutionResult { changed, commands })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cmds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_execute_applies_commands() {
        let mut sink = MemorySink::default();
        let result = execute(&mut sink, cmds(&["interface Eth1", "quit"]), false)
            .await
            .unwrap();
        assert!(result.changed);
        assert_eq!(sink.batches, vec![cmds(&["interface Eth1", "quit"])]);
    }

    #[tokio::test]
    async fn test_execute_check_mode_skips_sink() {
        let mut sink = MemorySink::default();
        let result = execute(&mut sink, cmds(&["interface Eth1", "quit"]), true)
            .await
            .unwrap();
        assert!(result.changed);
        assert!(sink.batches.is_empty());
    }

    #[tokio::test]
    async fn test_execute_empty_is_unchanged() {
        let mut sink = MemorySink::default();
        let result = execute(&mut sink, Vec::new(), false).await.unwrap();
        assert!(!result.changed);
        assert!(sink.batches.is_empty());
    }

    #[tokio::test]
    async fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commit.txt");
        let mut sink = FileSink::new(&path);

        sink.apply(&cmds(&["interface Eth1", "quit"])).await.unwrap();
        sink.apply(&cmds(&["interface Eth2", "quit"])).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "interface Eth1\nquit\ninterface Eth2\nquit\n");
    }

    #[tokio::test]
    async fn test_file_sink_error_is_retryable() {
        let mut sink = FileSink::new("/nonexistent-dir/commit.txt");
        let err = sink.apply(&cmds(&["quit"])).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
