//! Text rendering for todos and statistics.

use chrono::{Datelike, NaiveDate};
use todo_core::{format_timestamp, Todo, TodoStats};

const RULE_WIDTH: usize = 60;

const QUOTES: [&str; 5] = [
    "Small steps lead to big changes.",
    "Action is the foundational key to all success.",
    "Don't count the days, make the days count.",
    "The secret of getting ahead is getting started.",
    "Well done is better than well said.",
];

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn banner(title: &str) -> String {
    format!("{}\n{:^width$}\n{}", rule(), title, rule(), width = RULE_WIDTH)
}

/// One-line summary, or a multi-line block when `detailed`.
pub fn format_todo(todo: &Todo, detailed: bool) -> String {
    let status = if todo.completed { "[X]" } else { "[ ]" };
    let mut line = format!(
        "{status} ID: {} - {} (Priority: {})",
        todo.id, todo.title, todo.priority
    );

    if detailed {
        if !todo.description.is_empty() {
            line.push_str(&format!("\n   Description: {}", todo.description));
        }
        line.push_str(&format!("\n   Created: {}", format_timestamp(&todo.created_at)));
        if let Some(completed_at) = &todo.completed_at {
            line.push_str(&format!("\n   Completed: {}", format_timestamp(completed_at)));
        }
    }
    line
}

pub fn render_list(todos: &[&Todo], detailed: bool) -> String {
    if todos.is_empty() {
        return "No todos found.".to_string();
    }

    let mut out = banner("TODO LIST");
    for todo in todos {
        out.push('\n');
        out.push_str(&format_todo(todo, detailed));
    }
    out.push('\n');
    out.push_str(&rule());
    out
}

pub fn render_stats(stats: &TodoStats, today: NaiveDate) -> String {
    format!(
        "{}\nTotal Todos: {}\nCompleted: {}\nPending: {}\nCompletion Rate: {}%\n{}\n\nDaily Motivation: {}",
        banner("STATISTICS"),
        stats.total,
        stats.completed,
        stats.pending,
        stats.completion_rate,
        rule(),
        daily_quote(today)
    )
}

/// Same quote for the whole day, rotating through the list.
pub fn daily_quote(today: NaiveDate) -> &'static str {
    QUOTES[today.ordinal0() as usize % QUOTES.len()]
}
