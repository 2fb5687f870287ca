//! Aggregate counters over the todo collection.

use crate::model::todo::Todo;
use serde::Serialize;

/// Completion summary for a set of todos.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percentage of completed todos, one decimal place; `0.0` when empty.
    pub completion_rate: f64,
}

impl TodoStats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|todo| todo.completed).count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            round_one_decimal(completed as f64 / total as f64 * 100.0)
        };

        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }
}

// Halves go to the even neighbour: 6.25 -> 6.2, 31.25 -> 31.2.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
