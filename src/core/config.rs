//! Flow configuration from YAML

use crate::flow::Mode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use anyhow::Result;

/// Which backend a [`Flow`](crate::flow::Flow) forwards to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Multiplex futures on the awaiting task
    #[default]
    Futures,
    /// Spawn every unit of work on the tokio runtime
    Tokio,
}

/// Library defaults, loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Backend used by `Flow::from_config`
    #[serde(default)]
    pub backend: BackendKind,

    /// Limit applied to `limited` runs that don't set their own
    #[serde(default)]
    pub default_limit: Option<usize>,
}

impl FlowConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FlowConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_limit == Some(0) {
            anyhow::bail!("default_limit must be greater than zero");
        }
        Ok(())
    }
}

/// Scheduling mode as written in a flow file
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Series,
    Parallel,
    Limited,
}

impl RunMode {
    /// Turn into a [`Mode`], taking the first limit that is set
    pub fn resolve(self, limits: &[Option<usize>]) -> Result<Mode> {
        match self {
            RunMode::Series => Ok(Mode::Series),
            RunMode::Parallel => Ok(Mode::Parallel),
            RunMode::Limited => match limits.iter().flatten().next() {
                Some(0) => anyhow::bail!("limit must be greater than zero"),
                Some(limit) => Ok(Mode::Limited(*limit)),
                None => anyhow::bail!("mode 'limited' requires a limit"),
            },
        }
    }
}

/// A flow of shell commands loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowFile {
    /// Flow name
    pub name: String,

    /// How the commands are scheduled
    #[serde(default)]
    pub mode: RunMode,

    /// Maximum commands in flight for `limited`
    #[serde(default)]
    pub limit: Option<usize>,

    /// Backend override for this flow
    #[serde(default)]
    pub backend: Option<BackendKind>,

    /// Commands, in order
    pub commands: Vec<CommandSpec>,
}

/// A single command in a flow file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandSpec {
    /// Unique command name
    pub name: String,

    /// Shell command line, run with `sh -c`
    pub run: String,

    /// Working directory (defaults to the current one)
    #[serde(default)]
    pub cwd: Option<String>,

    /// Kill the command after this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FlowFile {
    /// Load a flow file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a flow file from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: FlowFile = serde_yaml::from_str(yaml)?;
        file.validate()?;
        Ok(file)
    }

    /// Validate the flow file
    pub fn validate(&self) -> Result<()> {
        if self.commands.is_empty() {
            anyhow::bail!("Flow '{}' has no commands", self.name);
        }

        let mut seen = HashSet::new();
        for command in &self.commands {
            if command.name.trim().is_empty() {
                anyhow::bail!("Flow '{}' has a command without a name", self.name);
            }
            if !seen.insert(&command.name) {
                anyhow::bail!("Duplicate command name: {}", command.name);
            }
            if command.run.trim().is_empty() {
                anyhow::bail!("Command '{}' has an empty run line", command.name);
            }
        }

        if let Some(command) = self.commands.iter().find(|c| c.timeout_secs == Some(0)) {
            anyhow::bail!("Command '{}' has a zero timeout", command.name);
        }

        if self.limit == Some(0) {
            anyhow::bail!("Flow '{}' sets limit to 0", self.name);
        }

        Ok(())
    }
}
