//! Task store: the ordered task list and its JSON file.
//!
//! Tasks are addressed by their 1-based position. Every mutation rewrites the
//! whole file before returning.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Result, TrackerError};
use crate::fields::{ListQuery, SortKey};
use crate::task::{Task, TaskEdit};

/// A task together with the 1-based store position it is addressed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listed<'a> {
    pub position: usize,
    pub task: &'a Task,
}

/// In-memory task list paired with its backing file.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Load the store from `path`; a missing file gives an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let tasks = read_json::<Vec<Task>>(path)?.unwrap_or_default();
        info!("loaded {} task(s) from {}", tasks.len(), path.display());
        Ok(TaskStore { path: path.to_path_buf(), tasks })
    }

    #[cfg(test)]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a pending task and persist. Returns its position.
    pub fn add(&mut self, task: Task) -> Result<usize> {
        let mut next = self.tasks.clone();
        next.push(Task { completed: false, ..task });
        self.commit(next)?;
        Ok(self.tasks.len())
    }

    /// Filtered and sorted view; the stored order is left untouched.
    ///
    /// Both sorts are stable, so equal keys keep their stored order.
    pub fn list(&self, query: &ListQuery) -> Vec<Listed<'_>> {
        let mut view: Vec<Listed<'_>> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| query.filter.as_ref().map_or(true, |f| f.matches(t)))
            .map(|(i, task)| Listed { position: i + 1, task })
            .collect();

        match query.sort {
            Some(SortKey::Priority) => view.sort_by_key(|l| l.task.priority),
            Some(SortKey::Deadline) => view.sort_by(|a, b| a.task.deadline.cmp(&b.task.deadline)),
            None => {}
        }
        view
    }

    #[cfg(test)]
    pub fn get(&self, position: usize) -> Option<&Task> {
        position.checked_sub(1).and_then(|i| self.tasks.get(i))
    }

    /// 0-based slot of a 1-based position.
    fn slot(&self, position: usize) -> Result<usize> {
        match position.checked_sub(1) {
            Some(i) if i < self.tasks.len() => Ok(i),
            _ => Err(TrackerError::TaskNotFound(position)),
        }
    }

    /// Apply a partial update to the task at `position` and persist.
    pub fn edit(&mut self, position: usize, edit: TaskEdit) -> Result<()> {
        let i = self.slot(position)?;
        let mut next = self.tasks.clone();
        next[i].apply(edit);
        self.commit(next)
    }

    /// Mark the task at `position` completed and persist.
    pub fn mark_completed(&mut self, position: usize) -> Result<()> {
        let i = self.slot(position)?;
        let mut next = self.tasks.clone();
        next[i].completed = true;
        self.commit(next)
    }

    /// Remove the task at `position`; later tasks shift down by one.
    pub fn delete(&mut self, position: usize) -> Result<Task> {
        let i = self.slot(position)?;
        let mut next = self.tasks.clone();
        let removed = next.remove(i);
        self.commit(next)?;
        Ok(removed)
    }

    /// Write `next` to the task file and only then adopt it in memory.
    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        write_json(&self.path, &next)?;
        debug!("saved {} task(s) to {}", next.len(), self.path.display());
        self.tasks = next;
        Ok(())
    }
}

/// Read and parse a JSON file, or `None` when it does not exist.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut buf = String::new();
    File::open(path)?.read_to_string(&mut buf)?;
    Ok(Some(serde_json::from_str(&buf)?))
}

/// Write JSON via a sibling temp file and rename it over `path`.
pub(crate) fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_string_pretty(value)?;
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}
