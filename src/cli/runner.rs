//! Command runner - drives shell commands through a [`Flow`]

use crate::core::config::CommandSpec;
use crate::core::{task, FlowError, Task};
use crate::flow::{Backend, Flow, FlowBackend, Mode};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Error types for a single command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{name}' exited with code {code}: {stderr}")]
    Exit {
        name: String,
        code: i32,
        stderr: String,
    },

    #[error("'{name}' timed out after {secs} seconds")]
    Timeout { name: String, secs: u64 },
}

impl CommandError {
    /// Name of the command that failed
    pub fn name(&self) -> &str {
        match self {
            CommandError::Spawn { name, .. }
            | CommandError::Exit { name, .. }
            | CommandError::Timeout { name, .. } => name,
        }
    }
}

/// What a finished command produced
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub name: String,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

/// Events that can occur while a flow of commands runs
#[derive(Debug, Clone)]
pub enum RunEvent {
    FlowStarted {
        flow_name: String,
        mode: Mode,
        commands: usize,
    },
    CommandStarted {
        name: String,
    },
    CommandFinished {
        name: String,
        duration: Duration,
    },
    CommandFailed {
        name: String,
        error: String,
    },
    /// Still running when another command failed; killed with the flow
    CommandCancelled {
        name: String,
    },
    FlowFinished {
        flow_name: String,
        succeeded: bool,
        duration: Duration,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(RunEvent) + Send + Sync>;

/// Runs a list of commands in the mode it is given
pub struct CommandRunner<B = Backend> {
    flow: Flow<B>,
    event_handlers: Vec<EventHandler>,
}

impl<B: FlowBackend> CommandRunner<B> {
    pub fn new(flow: Flow<B>) -> Self {
        Self {
            flow,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(RunEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Run `commands` under `mode`, stopping at the first failure
    pub async fn run(
        &self,
        flow_name: &str,
        commands: Vec<CommandSpec>,
        mode: Mode,
    ) -> Result<Vec<CommandOutcome>, FlowError<CommandError>> {
        let started = Instant::now();
        let handlers: Arc<[EventHandler]> = self.event_handlers.clone().into();

        info!(
            "Running flow '{}' ({} commands, {}, up to {} at a time)",
            flow_name,
            commands.len(),
            mode,
            mode.concurrency(commands.len())
        );
        emit(
            &handlers,
            RunEvent::FlowStarted {
                flow_name: flow_name.to_string(),
                mode,
                commands: commands.len(),
            },
        );

        let running: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let tasks: Vec<Task<CommandOutcome, CommandError>> = commands
            .into_iter()
            .map(|spec| {
                let handlers = handlers.clone();
                let running = running.clone();
                task(async move { run_observed(spec, &handlers, &running).await })
            })
            .collect();

        let result = self.flow.run(tasks, mode).await;

        if let Err(e) = &result {
            warn!("Flow '{}' stopped: {}", flow_name, e);
            for name in running.lock().await.drain(..) {
                warn!("Cancelled '{}'", name);
                emit(&handlers, RunEvent::CommandCancelled { name });
            }
        }
        emit(
            &handlers,
            RunEvent::FlowFinished {
                flow_name: flow_name.to_string(),
                succeeded: result.is_ok(),
                duration: started.elapsed(),
            },
        );

        result
    }
}

fn emit(handlers: &[EventHandler], event: RunEvent) {
    for handler in handlers {
        handler(event.clone());
    }
}

async fn run_observed(
    spec: CommandSpec,
    handlers: &[EventHandler],
    running: &Mutex<Vec<String>>,
) -> Result<CommandOutcome, CommandError> {
    running.lock().await.push(spec.name.clone());
    emit(
        handlers,
        RunEvent::CommandStarted {
            name: spec.name.clone(),
        },
    );

    let result = run_command(&spec).await;
    running.lock().await.retain(|name| name != &spec.name);

    match result {
        Ok(outcome) => {
            emit(
                handlers,
                RunEvent::CommandFinished {
                    name: outcome.name.clone(),
                    duration: outcome.duration,
                },
            );
            Ok(outcome)
        }
        Err(e) => {
            emit(
                handlers,
                RunEvent::CommandFailed {
                    name: spec.name.clone(),
                    error: e.to_string(),
                },
            );
            Err(e)
        }
    }
}

/// Run one command through `sh -c` and capture its output
pub async fn run_command(spec: &CommandSpec) -> Result<CommandOutcome, CommandError> {
    debug!("Spawning '{}': {}", spec.name, spec.run);
    let started = Instant::now();

    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(&spec.run)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    if let Some(cwd) = &spec.cwd {
        command.current_dir(cwd);
    }

    let output = match spec.timeout_secs {
        Some(secs) => timeout(Duration::from_secs(secs), command.output())
            .await
            .map_err(|_| CommandError::Timeout {
                name: spec.name.clone(),
                secs,
            })?,
        None => command.output().await,
    }
    .map_err(|source| CommandError::Spawn {
        name: spec.name.clone(),
        source,
    })?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        warn!("'{}' exited with code {}: {}", spec.name, code, stderr);
        return Err(CommandError::Exit {
            name: spec.name.clone(),
            code,
            stderr,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    debug!("'{}' returned {} bytes of output", spec.name, stdout.len());

    Ok(CommandOutcome {
        name: spec.name.clone(),
        stdout,
        stderr,
        duration: started.elapsed(),
    })
}
