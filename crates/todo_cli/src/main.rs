//! `todo` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start optional file logging, open the store.
//! - Render store results as text or JSON.
//!
//! # Invariants
//! - All record rules live in `todo_core`; this binary only presents them.
//! - Any failure exits with status 1 and a message on stderr.

mod cli;
mod render;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use cli::{Cli, Command, OutputFormat};
use log::info;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use todo_core::{
    default_log_level, flush_logging, init_logging, JsonFileRepository, Todo, TodoId, TodoPatch,
    TodoStore,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = run(cli);
    flush_logging();
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok command={}",
        command_name(&cli.command)
    );

    let mut store = TodoStore::open(JsonFileRepository::new(&cli.file));
    let format = cli.format;

    match cli.command {
        Command::Add {
            title,
            description,
            priority,
        } => {
            let todo = store
                .create(&title, &description, priority)
                .context("failed to add todo")?;
            emit(format, &todo, || {
                format!(
                    "[SUCCESS] Todo added successfully!\n  ID: {} - {} (Priority: {})",
                    todo.id, todo.title, todo.priority
                )
            })
        }
        Command::List { pending, detailed } => {
            let todos = store.list(!pending);
            emit(format, &todos, || render::render_list(&todos, detailed))
        }
        Command::Show { id } => {
            let todo = found(store.get(id), id)?;
            emit(format, todo, || render::format_todo(todo, true))
        }
        Command::Done { id } => {
            ensure_found(store.complete(id)?, id)?;
            emit_changed(format, &store, id, "marked as completed!")
        }
        Command::Undo { id } => {
            ensure_found(store.uncomplete(id)?, id)?;
            emit_changed(format, &store, id, "marked as pending!")
        }
        Command::Update {
            id,
            title,
            description,
            priority,
        } => {
            let patch = TodoPatch {
                title,
                description,
                priority,
            };
            ensure_found(store.update(id, &patch)?, id)?;
            emit_changed(format, &store, id, "updated successfully!")
        }
        Command::Delete { id, yes } => {
            let title = found(store.get(id), id)?.title.clone();
            let prompt = format!("Are you sure you want to delete '{title}'? (yes/no): ");
            if !yes && !confirm(&prompt)? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            ensure_found(store.delete(id)?, id)?;
            let payload = serde_json::json!({ "deleted": id, "remaining": store.len() });
            emit(format, &payload, || format!("[SUCCESS] Todo {id} deleted successfully!"))
        }
        Command::Stats => {
            let stats = store.stats();
            emit(format, &stats, || {
                render::render_stats(&stats, Local::now().date_naive())
            })
        }
    }
}

fn emit<T, F>(format: OutputFormat, value: &T, text: F) -> Result<()>
where
    T: serde::Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn emit_changed(
    format: OutputFormat,
    store: &TodoStore<JsonFileRepository>,
    id: TodoId,
    verb: &str,
) -> Result<()> {
    let todo = found(store.get(id), id)?;
    emit(format, todo, || format!("[SUCCESS] Todo {id} {verb}"))
}

fn found(todo: Option<&Todo>, id: TodoId) -> Result<&Todo> {
    match todo {
        Some(todo) => Ok(todo),
        None => bail!("Todo with ID {id} not found."),
    }
}

fn ensure_found(changed: bool, id: TodoId) -> Result<()> {
    if !changed {
        bail!("Todo with ID {id} not found.");
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y"))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::List { .. } => "list",
        Command::Show { .. } => "show",
        Command::Done { .. } => "done",
        Command::Undo { .. } => "undo",
        Command::Update { .. } => "update",
        Command::Delete { .. } => "delete",
        Command::Stats => "stats",
    }
}
