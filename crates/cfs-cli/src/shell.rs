//! A small line-oriented command language for driving a mount.
//!
//! ## Command Set
//!
//! - `ls [path]` - List a directory (root by default)
//! - `cat <path>` - Read a file to the end
//! - `write <path> <data>` - Write the rest of the line to a file (`echo` works too)
//! - `touch <path>` - Create a file
//! - `mkdir <path>` - Create a directory
//! - `stat <path>` - Show a node's attributes
//! - `df` - Show filesystem statistics
//!
//! Blank lines and lines starting with `#` are skipped.

use serde::Serialize;
use thiserror::Error;

use cfs_mount::{FsStats, Mount, MountError, NodeStat};
use cfs_tree::DirEntry;
use cfs_types::NodeKind;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Mount(#[from] MountError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List { path: String },
    Cat { path: String },
    Write { path: String, data: String },
    Touch { path: String },
    Mkdir { path: String },
    Stat { path: String },
    Df,
}

impl ShellCommand {
    /// Parse one script line. `Ok(None)` for blank lines and comments.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim_start()),
            None => (line, ""),
        };
        let first = rest.split_whitespace().next().map(str::to_string);
        let require = |what| first.clone().ok_or(ShellError::MissingArgument(what));

        let command = match cmd.to_lowercase().as_str() {
            "ls" => ShellCommand::List {
                path: first.clone().unwrap_or_else(|| "/".into()),
            },
            "cat" => ShellCommand::Cat { path: require("path")? },
            "write" | "echo" => {
                let path = require("path")?;
                let data = rest[path.len()..].trim_start();
                if data.is_empty() {
                    return Err(ShellError::MissingArgument("data"));
                }
                ShellCommand::Write {
                    path,
                    data: data.to_string(),
                }
            }
            "touch" => ShellCommand::Touch { path: require("path")? },
            "mkdir" => ShellCommand::Mkdir { path: require("path")? },
            "stat" => ShellCommand::Stat { path: require("path")? },
            "df" => ShellCommand::Df,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// What a command produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Outcome {
    Read { path: String, content: String },
    Listing { path: String, entries: Vec<DirEntry> },
    Written { path: String, bytes: usize },
    Created { path: String, kind: NodeKind },
    Stat(NodeStat),
    Df(FsStats),
}

/// Runs commands against one mount.
pub struct Shell {
    mount: Mount,
}

impl Shell {
    pub fn new(mount: Mount) -> Self {
        Self { mount }
    }

    pub fn execute(&self, command: &ShellCommand) -> Result<Outcome, ShellError> {
        let m = &self.mount;
        let outcome = match command {
            ShellCommand::List { path } => Outcome::Listing {
                path: path.clone(),
                entries: m.readdir(path)?,
            },
            ShellCommand::Cat { path } => Outcome::Read {
                path: path.clone(),
                content: String::from_utf8_lossy(&m.cat(path)?).into_owned(),
            },
            ShellCommand::Write { path, data } => Outcome::Written {
                path: path.clone(),
                bytes: m.write(path, data.as_bytes())?,
            },
            ShellCommand::Touch { path } => Outcome::Created {
                path: m.create_file(path)?.path(),
                kind: NodeKind::File,
            },
            ShellCommand::Mkdir { path } => Outcome::Created {
                path: m.create_directory(path)?.path(),
                kind: NodeKind::Directory,
            },
            ShellCommand::Stat { path } => Outcome::Stat(m.stat(path)?),
            ShellCommand::Df => Outcome::Df(m.statfs()),
        };
        Ok(outcome)
    }

    /// Parse and run one line.
    pub fn execute_line(&self, line: &str) -> Result<Option<Outcome>, ShellError> {
        match ShellCommand::parse(line)? {
            Some(command) => self.execute(&command).map(Some),
            None => Ok(None),
        }
    }
}
