//! Todo repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Read and write the complete todo collection as one JSON array.
//! - Keep the on-disk file consistent across failed writes.
//!
//! # Invariants
//! - Writes go to a sibling temp file which is renamed over the target.
//! - Read paths repair `completed`/`completed_at` disagreements, then
//!   validate every record and reject duplicate IDs.
//! - A missing data file reads as an empty collection.

use crate::model::todo::{Todo, TodoValidationError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Data file used when no path is configured.
pub const DEFAULT_DATA_FILE: &str = "todos.json";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for todo load/save operations.
#[derive(Debug)]
pub enum RepoError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Json(err) => write!(f, "malformed todo data: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Whole-collection persistence contract for the todo store.
pub trait TodoRepository {
    fn load(&self) -> RepoResult<Vec<Todo>>;
    fn save(&self, todos: &[Todo]) -> RepoResult<()>;
}

/// JSON file backed repository.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_todos(&self) -> RepoResult<Option<Vec<Todo>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(RepoError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut todos: Vec<Todo> = serde_json::from_slice(&bytes)?;
        repair_completion_state(&mut todos);
        check_collection(&todos)?;
        Ok(Some(todos))
    }

    fn write_todos(&self, todos: &[Todo]) -> RepoResult<()> {
        let dir = parent_dir(&self.path);
        let io_err = |source: io::Error| RepoError::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, todos)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl TodoRepository for JsonFileRepository {
    fn load(&self) -> RepoResult<Vec<Todo>> {
        let started_at = Instant::now();
        match self.read_todos() {
            Ok(Some(todos)) => {
                info!(
                    "event=todo_load module=repo status=ok duration_ms={} count={}",
                    started_at.elapsed().as_millis(),
                    todos.len()
                );
                Ok(todos)
            }
            Ok(None) => {
                info!(
                    "event=todo_load module=repo status=missing path={}",
                    self.path.display()
                );
                Ok(Vec::new())
            }
            Err(err) => {
                warn!(
                    "event=todo_load module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, todos: &[Todo]) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.write_todos(todos) {
            Ok(()) => {
                info!(
                    "event=todo_save module=repo status=ok duration_ms={} count={}",
                    started_at.elapsed().as_millis(),
                    todos.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=todo_save module=repo status=error duration_ms={} error_code=save_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn repair_completion_state(todos: &mut [Todo]) {
    for todo in todos.iter_mut() {
        if todo.repair_completion() {
            warn!(
                "event=todo_load module=repo status=repaired id={} completed={}",
                todo.id, todo.completed
            );
        }
    }
}

fn check_collection(todos: &[Todo]) -> RepoResult<()> {
    let mut seen = HashSet::with_capacity(todos.len());
    for todo in todos {
        todo.validate()?;
        if !seen.insert(todo.id) {
            return Err(RepoError::InvalidData(format!("duplicate todo id {}", todo.id)));
        }
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
