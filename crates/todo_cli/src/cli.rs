//! Command-line surface and configuration.
//!
//! Every option can also come from the environment so the data file and
//! log directory can be pinned once per shell.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use todo_core::{Priority, TodoId, DEFAULT_DATA_FILE};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Manage a local todo list stored as JSON.")]
pub struct Cli {
    /// JSON data file holding the todo list.
    #[arg(long, global = true, env = "TODO_FILE", default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Absolute directory for rotating log files; logging is off when unset.
    #[arg(long, global = true, env = "TODO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, global = true, env = "TODO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Output format for command results.
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new todo.
    Add {
        #[arg(value_name = "TITLE")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
    },
    /// List todos in stored order.
    List {
        /// Hide completed todos.
        #[arg(long)]
        pending: bool,
        /// Include description and timestamps.
        #[arg(long)]
        detailed: bool,
    },
    /// Show one todo in detail.
    Show { id: TodoId },
    /// Mark a todo as completed.
    Done { id: TodoId },
    /// Mark a todo as pending again.
    Undo { id: TodoId },
    /// Change the title, description or priority of a todo.
    Update {
        id: TodoId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
    /// Delete a todo. Remaining todos are renumbered.
    Delete {
        id: TodoId,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show completion statistics.
    Stats,
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    value.parse::<Priority>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use todo_core::Priority;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_defaults_priority_to_medium() {
        let cli = Cli::try_parse_from(["todo", "add", "water plants"]).unwrap();
        match cli.command {
            Command::Add {
                title, priority, ..
            } => {
                assert_eq!(title, "water plants");
                assert_eq!(priority, Priority::Medium);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn invalid_priority_is_rejected_at_parse_time() {
        let err = Cli::try_parse_from(["todo", "add", "x", "--priority", "urgent"]).unwrap_err();
        assert!(err.to_string().contains("low|medium|high"));
    }
}
