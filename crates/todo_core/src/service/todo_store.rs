//! Record store: the in-memory todo collection mirrored to a repository.
//!
//! # Responsibility
//! - Provide create/list/get/update/complete/uncomplete/delete/stats APIs.
//! - Persist the whole collection after every successful mutation.
//!
//! # Invariants
//! - IDs are unique; after a delete survivors are relabeled `1..=N` in
//!   stored order. Callers must re-fetch before reusing an ID across a delete.
//! - Validation runs before any field changes, so a rejected edit leaves
//!   the collection untouched.
//! - Memory is authoritative: when a save fails the mutation stays applied
//!   and `StoreError::Persist` is returned carrying the affected record;
//!   `flush` retries the write.
//! - Unknown IDs yield `Ok(false)` / `None` without mutating or writing.

use crate::model::stats::TodoStats;
use crate::model::todo::{local_now, normalize_title, Priority, Todo, TodoId, TodoValidationError};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure for mutating operations.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected; the collection is unchanged.
    Validation(TodoValidationError),
    /// The mutation is applied in memory but could not be written out.
    ///
    /// `todo` is the created or edited record as it now sits in memory;
    /// `None` for deletes and plain flushes.
    Persist {
        source: RepoError,
        todo: Option<Box<Todo>>,
    },
}

impl StoreError {
    /// The in-memory record a failed save left unpersisted, if any.
    pub fn unsaved_todo(&self) -> Option<&Todo> {
        match self {
            Self::Persist { todo, .. } => todo.as_deref(),
            Self::Validation(_) => None,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persist { source, .. } => write!(f, "failed to save todos: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persist { source, .. } => Some(source),
        }
    }
}

impl From<TodoValidationError> for StoreError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persist {
            source: value,
            todo: None,
        }
    }
}

/// Partial edit applied by [`TodoStore::update`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }
}

/// Owner of the todo collection for the lifetime of the process.
pub struct TodoStore<R: TodoRepository> {
    repo: R,
    todos: Vec<Todo>,
}

impl<R: TodoRepository> TodoStore<R> {
    /// Opens a store, loading existing todos from `repo`.
    ///
    /// Loading is best-effort: any repository error yields an empty store.
    pub fn open(repo: R) -> Self {
        let todos = match repo.load() {
            Ok(todos) => todos,
            Err(err) => {
                warn!("event=store_open module=service status=degraded fallback=empty error={err}");
                Vec::new()
            }
        };
        info!(
            "event=store_open module=service status=ok count={}",
            todos.len()
        );
        Self { repo, todos }
    }

    /// Appends a new pending todo and persists the collection.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when `title` trims to nothing; nothing is stored.
    /// - `Validation(IdSpaceExhausted)` when no larger ID fits in `TodoId`.
    /// - `Persist` when the write fails; the todo is kept in memory and
    ///   returned inside the error.
    pub fn create(
        &mut self,
        title: &str,
        description: &str,
        priority: Priority,
    ) -> StoreResult<Todo> {
        let todo = Todo::new(self.next_id()?, title, description, priority, local_now())?;
        self.todos.push(todo.clone());
        info!(
            "event=todo_create module=service status=ok id={} priority={}",
            todo.id, todo.priority
        );
        self.persist_with(Some(&todo))?;
        Ok(todo)
    }

    /// Returns todos in stored order, optionally skipping completed ones.
    pub fn list(&self, include_completed: bool) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| include_completed || !todo.completed)
            .collect()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Marks a todo completed, stamping `completed_at` with the current time.
    pub fn complete(&mut self, id: TodoId) -> StoreResult<bool> {
        let Some(todo) = self.find_mut(id) else {
            return Ok(not_found("complete", id));
        };
        todo.mark_completed(local_now());
        let todo = todo.clone();
        info!("event=todo_complete module=service status=ok id={id}");
        self.persist_with(Some(&todo))?;
        Ok(true)
    }

    /// Returns a todo to pending and clears `completed_at`.
    pub fn uncomplete(&mut self, id: TodoId) -> StoreResult<bool> {
        let Some(todo) = self.find_mut(id) else {
            return Ok(not_found("uncomplete", id));
        };
        todo.mark_pending();
        let todo = todo.clone();
        info!("event=todo_uncomplete module=service status=ok id={id}");
        self.persist_with(Some(&todo))?;
        Ok(true)
    }

    /// Applies the provided fields of `patch`.
    ///
    /// An empty patch changes nothing but still persists.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when a provided title trims to nothing; the
    ///   todo is left untouched, including its other fields.
    pub fn update(&mut self, id: TodoId, patch: &TodoPatch) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(not_found("update", id));
        };

        let title = patch.title.as_deref().map(normalize_title).transpose()?;
        let todo = &mut self.todos[index];
        if let Some(title) = title {
            todo.title = title;
        }
        if let Some(description) = patch.description.as_deref() {
            todo.description = description.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            todo.priority = priority;
        }
        let todo = todo.clone();

        info!(
            "event=todo_update module=service status=ok id={id} noop={}",
            patch.is_empty()
        );
        self.persist_with(Some(&todo))?;
        Ok(true)
    }

    /// Removes a todo and relabels the remaining ones `1..=N`.
    pub fn delete(&mut self, id: TodoId) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(not_found("delete", id));
        };

        self.todos.remove(index);
        for (offset, todo) in self.todos.iter_mut().enumerate() {
            todo.id = offset as TodoId + 1;
        }

        info!(
            "event=todo_delete module=service status=ok id={id} remaining={}",
            self.todos.len()
        );
        self.persist()?;
        Ok(true)
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Rewrites the current collection, e.g. after an earlier failed save.
    pub fn flush(&self) -> StoreResult<()> {
        self.persist()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    // Equals `len + 1` whenever IDs are contiguous, which every write keeps.
    // Files edited by hand may have gaps; max + 1 keeps IDs unique there too.
    fn next_id(&self) -> Result<TodoId, TodoValidationError> {
        let max_id = self.todos.iter().map(|todo| todo.id).max().unwrap_or(0);
        let count = TodoId::try_from(self.todos.len()).unwrap_or(TodoId::MAX);
        max_id
            .max(count)
            .checked_add(1)
            .ok_or(TodoValidationError::IdSpaceExhausted)
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    fn find_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    fn persist(&self) -> StoreResult<()> {
        self.persist_with(None)
    }

    fn persist_with(&self, todo: Option<&Todo>) -> StoreResult<()> {
        self.repo
            .save(&self.todos)
            .map_err(|source| StoreError::Persist {
                source,
                todo: todo.cloned().map(Box::new),
            })
    }
}

fn not_found(operation: &str, id: TodoId) -> bool {
    debug!("event=todo_{operation} module=service status=not_found id={id}");
    false
}
