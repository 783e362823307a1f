//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "toolfence", version, about = "Run configured analysis tools against registered projects and track metric drift between runs")]
pub struct Cli {
    /// Data directory holding the project store and per-project artifacts
    #[arg(long, global = true, default_value = ".toolfence")]
    pub data_dir: PathBuf,

    /// Directory holding tool binaries and jars not on PATH
    #[arg(long, global = true)]
    pub tools_dir: Option<PathBuf>,

    /// Per-tool execution timeout in seconds
    #[arg(long, global = true, default_value_t = 600)]
    pub timeout_secs: u64,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a project (or update an existing one)
    Register {
        name: String,
        /// Path to the checked-out project sources
        #[arg(long)]
        path: PathBuf,
        /// Inline settings JSON to seed the effective settings
        #[arg(long)]
        settings: Option<String>,
    },
    /// Show or update a project's effective settings
    Settings {
        name: String,
        /// Settings JSON update; omitted to print the current document
        #[arg(long)]
        set: Option<String>,
    },
    /// Run every configured tool and report metric changes
    Fence {
        name: String,
        /// Emit the raw comparison document instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// Print the last persisted report document
    Report { name: String },
    /// List registered projects
    List,
    /// Delete a project and its artifacts
    Delete { name: String },
    /// Describe every known tool and its parameters
    Tools,
    /// Run one tool with default settings against a single source file
    Instant {
        /// Tool name (checkstyle, pmd, maven)
        tool: String,
        /// Source file to analyze
        #[arg(long)]
        file: PathBuf,
    },
}
