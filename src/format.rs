//! Rendering of task listings.

use chrono::NaiveDate;
use crossterm::style::Stylize;

use crate::db::Listed;
use crate::task::Task;

/// Format a completion flag for display.
pub fn format_status(completed: bool, color: bool) -> String {
    match (completed, color) {
        (true, true) => "Completed".green().to_string(),
        (false, true) => "Pending".yellow().to_string(),
        (true, false) => "Completed".to_string(),
        (false, false) => "Pending".to_string(),
    }
}

/// True for a pending task whose deadline reads as an ISO date before `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed
        && NaiveDate::parse_from_str(task.deadline.trim(), "%Y-%m-%d")
            .map(|d| d < today)
            .unwrap_or(false)
}

/// One line of `list` output.
pub fn format_row(listed: &Listed<'_>, today: NaiveDate, color: bool) -> String {
    let t = listed.task;
    let overdue = if is_overdue(t, today) { " [overdue]" } else { "" };
    format!(
        "{}. {} - {} (Deadline: {}{}, Category: {}, Priority: {}, Status: {})",
        listed.position,
        t.title,
        t.description,
        t.deadline,
        overdue,
        t.category,
        t.priority,
        format_status(t.completed, color)
    )
}
