//! CLI command definitions

use clap::Args;
use crate::core::config::{BackendKind, RunMode};

/// Run a flow file
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to flow YAML file
    #[arg(short, long)]
    pub file: String,

    /// Scheduling mode (overrides the flow file)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Maximum commands in flight for `limited`
    #[arg(long)]
    pub limit: Option<usize>,

    /// Backend to drive the flow with (overrides file and config)
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Print captured stdout of each command
    #[arg(long)]
    pub show_output: bool,
}

/// Validate a flow file
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to flow YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Scheduling mode argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    Series,
    Parallel,
    Limited,
}

impl From<ModeArg> for RunMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Series => RunMode::Series,
            ModeArg::Parallel => RunMode::Parallel,
            ModeArg::Limited => RunMode::Limited,
        }
    }
}

/// Backend argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    Futures,
    Tokio,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Futures => BackendKind::Futures,
            BackendArg::Tokio => BackendKind::Tokio,
        }
    }
}
