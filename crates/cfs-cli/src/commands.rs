use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing::debug;

use cfs_mount::{LayoutConfig, Mount, MountConfig};
use cfs_types::NodeKind;

use crate::cli::*;
use crate::shell::{Outcome, Shell, ShellCommand};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let format = cli.format;
    match cli.command {
        Command::Demo(args) => cmd_demo(config, args, format),
        Command::Run(args) => cmd_run(config, args, format),
        Command::Stat(args) => cmd_stat(config, args, format),
        Command::Config(_) => cmd_config(config, format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MountConfig> {
    match path {
        Some(path) => MountConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(MountConfig::default()),
    }
}

fn mount(config: MountConfig) -> anyhow::Result<Shell> {
    let mount = Mount::new(config).context("failed to mount")?;
    Ok(Shell::new(mount))
}

fn cmd_demo(config: MountConfig, args: DemoArgs, format: OutputFormat) -> anyhow::Result<()> {
    let script = demo_script(&config.layout, args.reads);
    let shell = mount(config)?;
    for line in &script {
        if let Some(outcome) = shell.execute_line(line)? {
            print_outcome(line, &outcome, format)?;
        }
    }
    Ok(())
}

/// Read the root file `reads` times, turn it into a text file, then touch
/// and read a new file inside the directory.
fn demo_script(layout: &LayoutConfig, reads: usize) -> Vec<String> {
    let file = format!("/{}", layout.root_file);
    let dir = format!("/{}", layout.directory);
    let mut script = vec![format!("cat {file}"); reads];
    script.extend([
        format!("write {file} abc"),
        format!("cat {file}"),
        format!("cat {dir}/{}", layout.directory_file),
        format!("touch {dir}/nuevo"),
        format!("cat {dir}/nuevo"),
        format!("ls {dir}"),
        "df".to_string(),
    ]);
    script
}

fn cmd_run(config: MountConfig, args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let script = if args.script == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read script from stdin")?;
        input
    } else {
        std::fs::read_to_string(&args.script)
            .with_context(|| format!("failed to read script {}", args.script))?
    };

    let shell = mount(config)?;
    let failed = run_script(&shell, &script, args.fail_fast, format)?;
    debug!(script = %args.script, failed, "script finished");
    if failed > 0 {
        anyhow::bail!("{failed} command(s) failed");
    }
    Ok(())
}

/// Run every line of `script`, reporting errors as they happen. Returns the
/// number of failed lines.
fn run_script(
    shell: &Shell,
    script: &str,
    fail_fast: bool,
    format: OutputFormat,
) -> anyhow::Result<usize> {
    let mut failed = 0;
    for (number, line) in script.lines().enumerate() {
        match shell.execute_line(line) {
            Ok(Some(outcome)) => print_outcome(line, &outcome, format)?,
            Ok(None) => {}
            Err(e) => {
                failed += 1;
                eprintln!("{} line {}: {}", "error:".red().bold(), number + 1, e);
                if fail_fast {
                    break;
                }
            }
        }
    }
    Ok(failed)
}

fn cmd_stat(config: MountConfig, args: StatArgs, format: OutputFormat) -> anyhow::Result<()> {
    let shell = mount(config)?;
    let command = match args.path {
        Some(path) => ShellCommand::Stat { path },
        None => ShellCommand::Df,
    };
    let outcome = shell.execute(&command)?;
    print_outcome("", &outcome, format)
}

fn cmd_config(config: MountConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", config.to_toml()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

fn print_outcome(line: &str, outcome: &Outcome, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string(outcome)?);
        return Ok(());
    }

    if !line.is_empty() {
        println!("{} {}", "$".dimmed(), line.trim().bold());
    }
    match outcome {
        Outcome::Read { content, .. } => print!("{content}"),
        Outcome::Listing { entries, .. } => {
            for entry in entries {
                match entry.kind {
                    NodeKind::Directory => {
                        println!("d {:>4}  {}/", entry.ino.to_string().dimmed(), entry.name.blue().bold())
                    }
                    NodeKind::File => {
                        println!("- {:>4}  {}", entry.ino.to_string().dimmed(), entry.name)
                    }
                }
            }
        }
        Outcome::Written { path, bytes } => {
            println!("{} wrote {} bytes to {}", "✓".green(), bytes, path.bold())
        }
        Outcome::Created { path, kind } => {
            let what = match kind {
                NodeKind::Directory => "directory",
                NodeKind::File => "file",
            };
            println!("{} created {} {}", "✓".green(), what, path.bold())
        }
        Outcome::Stat(stat) => {
            println!("  Path: {}", stat.path.bold());
            println!("  Inode: {}", stat.attr.ino);
            println!("  Mode: {:o} ({})", stat.attr.mode(), stat.attr.perm);
            println!("  Owner: {}:{}", stat.attr.uid, stat.attr.gid);
            if let Some(record) = &stat.record {
                println!("  Record: {}", record.id.to_string().cyan());
                println!("  Counter: {}", record.counter.to_string().yellow());
                println!("  Content mode: {}", record.mode);
                if let Some(text) = &record.text {
                    println!("  Text: {text:?}");
                }
            }
        }
        Outcome::Df(stats) => {
            println!("  Mount: {}", stats.mount_id.cyan());
            println!("  Magic: {:#x}", stats.magic);
            println!("  Block size: {}", stats.block_size);
            println!(
                "  Records: {} used, {} free of {} ({} static)",
                stats.allocated.to_string().yellow(),
                stats.free.to_string().green(),
                stats.capacity,
                stats.statics
            );
            println!("  Nodes: {}", stats.nodes);
        }
    }
    Ok(())
}
