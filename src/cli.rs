use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "license-matchr",
    about = "Identify open-source licenses by canonical URL or by text similarity",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Config file [default: ./.license-matchr/config.toml, fallback ~/.config/license-matchr/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of <template>.txt files overriding the built-in license texts
    #[arg(long, global = true, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Minimum similarity a text match must exceed (0..1)
    #[arg(long, global = true, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Report format
    #[arg(long, global = true, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Exit with code 1 when any input stays unclassified
    #[arg(long, global = true)]
    pub strict: bool,

    /// Show extra columns and error details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify license URLs by exact canonical match
    Url {
        /// URLs to classify
        #[arg(required = true)]
        urls: Vec<String>,

        /// Download unknown URLs and classify their contents by text
        #[arg(long)]
        online: bool,
    },

    /// Classify license files by text similarity (stdin when no file or `-`)
    Text {
        /// Files to classify
        files: Vec<PathBuf>,
    },

    /// Find license files in a directory tree and classify each
    Scan {
        /// Project path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum directory depth to descend
        #[arg(long, default_value_t = 3)]
        max_depth: usize,
    },

    /// List the known licenses
    List,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
