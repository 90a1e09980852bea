//! Task data structure and the partial update applied by `edit`.
//!
//! A task has no identifier of its own; it is addressed by its position in
//! the task store.

use serde::{Deserialize, Serialize};

/// A single to-do item as persisted in the task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub completed: bool,
}

fn default_priority() -> i64 {
    1
}

impl Task {
    /// Create a pending task.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: impl Into<String>,
        category: impl Into<String>,
        priority: i64,
    ) -> Self {
        Task {
            title: title.into(),
            description: description.into(),
            deadline: deadline.into(),
            category: category.into(),
            priority,
            completed: false,
        }
    }

    /// Overwrite every field the edit supplies.
    ///
    /// Empty strings count as "not supplied". Any supplied priority wins,
    /// including zero.
    pub fn apply(&mut self, edit: TaskEdit) {
        fn overwrite(field: &mut String, value: Option<String>) {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                *field = v;
            }
        }
        overwrite(&mut self.title, edit.title);
        overwrite(&mut self.description, edit.description);
        overwrite(&mut self.deadline, edit.deadline);
        overwrite(&mut self.category, edit.category);
        if let Some(p) = edit.priority {
            self.priority = p;
        }
    }
}

/// Fields to change on an existing task; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub category: Option<String>,
    pub priority: Option<i64>,
}
