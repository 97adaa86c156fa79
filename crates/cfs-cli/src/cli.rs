use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cfs",
    about = "Counter File System: an in-memory filesystem of self-counting files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with mount settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mount a fresh namespace and walk through the counter files
    Demo(DemoArgs),
    /// Mount a fresh namespace and run a script of shell commands
    Run(RunArgs),
    /// Show filesystem statistics, or the attributes of one path
    Stat(StatArgs),
    /// Print the effective mount configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct DemoArgs {
    /// How many times to read `contador1` before writing to it
    #[arg(short, long, default_value = "2")]
    pub reads: usize,
}

#[derive(Args)]
pub struct RunArgs {
    /// Script path, or `-` for stdin
    pub script: String,
    /// Stop at the first failing command
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Args)]
pub struct StatArgs {
    pub path: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {}
