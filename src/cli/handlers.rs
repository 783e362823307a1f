//! CLI command handlers.
//!
//! Thin mapping from parsed arguments onto the service layer, plus the
//! human-facing rendering of fence results.

use crate::artifacts::ArtifactStore;
use crate::cli::args::{Cli, Commands};
use crate::compare::{format_percentage, Delta};
use crate::error::FenceError;
use crate::exec::SystemRunner;
use crate::service::{describe_tools, FenceOutcome, ProjectService, RegisterOutcome};
use crate::store::JsonProjectStore;
use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::time::Duration;

/// Builds the service from global arguments and dispatches one command.
///
/// # Errors
/// Propagates service failures; the binary renders them on stderr.
pub fn run(cli: &Cli) -> Result<()> {
    let store = JsonProjectStore::open(cli.data_dir.join("projects.json"))?;
    let artifacts = ArtifactStore::new(&cli.data_dir);
    let runner = SystemRunner::new(Duration::from_secs(cli.timeout_secs));
    let tools_dir = cli
        .tools_dir
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("tools"));
    let mut service = ProjectService::new(store, artifacts, Box::new(runner), tools_dir);

    match &cli.command {
        Commands::Register {
            name,
            path,
            settings,
        } => {
            let outcome = service.register(name, path, settings.as_deref())?;
            match outcome {
                RegisterOutcome::Created => {
                    println!("{} project '{name}'", "created:".green().bold());
                }
                RegisterOutcome::Updated => {
                    println!("{} project '{name}'", "updated:".yellow().bold());
                }
            }
        }
        Commands::Settings { name, set } => match set {
            Some(incoming) => {
                service.update_settings(name, incoming)?;
                println!("{} settings for '{name}'", "updated:".green().bold());
            }
            None => match service.get_settings(name)? {
                Some(text) => println!("{text}"),
                None => println!("{}", "no settings stored".dimmed()),
            },
        },
        Commands::Fence { name, json } => {
            let outcome = service.fence(name)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_fence_summary(name, &outcome);
            }
        }
        Commands::Report { name } => match service.get_report(name)? {
            Some(text) => println!("{text}"),
            None => println!("{}", "no report stored".dimmed()),
        },
        Commands::List => {
            for project in service.find_all()? {
                let last_build = project
                    .last_build
                    .map_or_else(|| "never built".to_string(), |t| t.to_rfc3339());
                println!(
                    "{}  {}  ({last_build})",
                    project.name.bold(),
                    project.source_path.display(),
                );
            }
        }
        Commands::Delete { name } => {
            if service.delete(name)? {
                println!("{} project '{name}'", "deleted:".red().bold());
            } else {
                println!("{}", format!("no project by name: {name}").dimmed());
            }
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&describe_tools())?);
        }
        Commands::Instant { tool, file } => {
            let source = fs::read_to_string(file)
                .map_err(|e| FenceError::io(e, file.clone()))?;
            match service.instant_report(tool, &source)? {
                Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                None => println!("{}", "tool produced no usable output".dimmed()),
            }
        }
    }
    Ok(())
}

fn print_fence_summary(name: &str, outcome: &FenceOutcome) {
    println!("{} fence run for '{name}'", "completed:".green().bold());
    for (tool, delta) in &outcome.comparisons {
        println!("  {}  {}", tool.bold(), render_delta(delta));
    }
}

fn render_delta(delta: &Delta) -> String {
    match (delta.errors_then, delta.errors_now, delta.percentage_change) {
        (Some(then), Some(now), Some(change)) => {
            let pct = format_percentage(change);
            let pct = if now <= then { pct.green() } else { pct.red() };
            format!("{then} -> {now}  (change {pct})")
        }
        (None, Some(now), None) => format!("{now} (no previous baseline)"),
        _ => "no usable output".dimmed().to_string(),
    }
}
