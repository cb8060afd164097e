use flowsync::cli::output::*;
use flowsync::cli::runner::CommandRunner;
use flowsync::cli::{Cli, Command};
use flowsync::cli::commands::{RunCommand, ValidateCommand};
use flowsync::core::config::{FlowConfig, FlowFile, RunMode};
use flowsync::flow::{Backend, Flow};

use anyhow::{Context, Result};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = match &cli.config {
        Some(path) => FlowConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => FlowConfig::default(),
    };

    match &cli.command {
        Command::Run(cmd) => run_flow(cmd, &config).await?,
        Command::Validate(cmd) => validate_flow(cmd)?,
    }

    Ok(())
}

async fn run_flow(cmd: &RunCommand, config: &FlowConfig) -> Result<()> {
    let file = FlowFile::from_file(&cmd.file).context("Failed to load flow file")?;

    println!("{} Loaded flow: {}", INFO, style(&file.name).bold());

    let run_mode: RunMode = cmd.mode.map(Into::into).unwrap_or(file.mode);
    let mode = run_mode
        .resolve(&[cmd.limit, file.limit, config.default_limit])
        .context("Invalid scheduling mode")?;

    let backend_kind = cmd
        .backend
        .map(Into::into)
        .or(file.backend)
        .unwrap_or(config.backend);

    let mut runner = CommandRunner::new(Flow::new(Backend::from_kind(backend_kind)));
    runner.add_event_handler(|event| println!("{}", format_run_event(&event)));

    println!();
    let result = runner.run(&file.name, file.commands.clone(), mode).await;

    match result {
        Ok(outcomes) => {
            if cmd.show_output {
                println!();
                for outcome in &outcomes {
                    println!("{}", format_outcome(outcome));
                }
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn validate_flow(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating flow...", INFO);

    match FlowFile::from_file(&cmd.file) {
        Ok(file) => {
            println!("{} Flow file is valid!", CHECK);
            println!("  Name: {}", style(&file.name).bold());
            println!("  Mode: {}", style(format!("{:?}", file.mode).to_lowercase()).cyan());
            println!("  Commands: {}", style(file.commands.len()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&file)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
