//! CLI output formatting

use crate::cli::runner::{CommandOutcome, RunEvent};
use console::Emoji;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a run event for display
pub fn format_run_event(event: &RunEvent) -> String {
    match event {
        RunEvent::FlowStarted {
            flow_name,
            mode,
            commands,
        } => format!(
            "{} Starting flow {} ({} commands, {})",
            ROCKET,
            style(flow_name).bold(),
            style(commands).cyan(),
            style(mode).dim()
        ),
        RunEvent::CommandStarted { name } => format!("{} {}", SPINNER, style(name).cyan()),
        RunEvent::CommandFinished { name, duration } => format!(
            "{} {} {}",
            CHECK,
            style(name).green(),
            style(format_duration(*duration)).dim()
        ),
        RunEvent::CommandFailed { name, error } => {
            format!("{} {}: {}", CROSS, style(name).red(), error)
        }
        RunEvent::CommandCancelled { name } => {
            format!("{} {} {}", WARN, style(name).yellow(), style("cancelled").dim())
        }
        RunEvent::FlowFinished {
            flow_name,
            succeeded,
            duration,
        } => {
            let icon = if *succeeded { CHECK } else { CROSS };
            let status = if *succeeded {
                style("completed").green()
            } else {
                style("failed").red()
            };
            format!(
                "{} {} {} in {}",
                icon,
                style(flow_name).bold(),
                status,
                style(format_duration(*duration)).dim()
            )
        }
    }
}

/// Format a command's captured stdout, indented under its name
pub fn format_outcome(outcome: &CommandOutcome) -> String {
    let mut out = format!("{} {}", INFO, style(&outcome.name).bold());
    for line in outcome.stdout.lines() {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}

pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
