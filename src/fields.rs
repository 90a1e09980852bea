//! Filter and sort options for task listings.
//!
//! `list` takes up to two free-form tokens: a filter (`completed`, `pending`
//! or a category name) and a sort key written as `sort:<key>`.

use std::str::FromStr;

use crate::error::{Result, TrackerError};
use crate::task::Task;

/// Which tasks a listing keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    Completed,
    Pending,
    /// Exact, case-sensitive category match.
    Category(String),
}

impl ListFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            ListFilter::Completed => task.completed,
            ListFilter::Pending => !task.completed,
            ListFilter::Category(c) => task.category == *c,
        }
    }
}

impl From<&str> for ListFilter {
    fn from(s: &str) -> Self {
        match s {
            "completed" => ListFilter::Completed,
            "pending" => ListFilter::Pending,
            other => ListFilter::Category(other.to_string()),
        }
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Ascending numeric priority.
    Priority,
    /// Ascending string order of the deadline text; no date parsing.
    Deadline,
}

impl FromStr for SortKey {
    type Err = TrackerError;

    /// Parse the `sort:<key>` form used on the command line.
    fn from_str(s: &str) -> Result<Self> {
        match s.strip_prefix("sort:") {
            Some("priority") => Ok(SortKey::Priority),
            Some("deadline") => Ok(SortKey::Deadline),
            _ => Err(TrackerError::InvalidListArgument(s.to_string())),
        }
    }
}

/// A parsed `list` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: Option<ListFilter>,
    pub sort: Option<SortKey>,
}

impl ListQuery {
    /// Build a query from the raw `list` tokens, in any order.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let mut query = ListQuery::default();
        for token in tokens {
            let token: &str = token.as_ref();
            if token.starts_with("sort:") {
                if query.sort.is_some() {
                    return Err(TrackerError::InvalidListArgument(token.to_string()));
                }
                query.sort = Some(token.parse()?);
            } else {
                if query.filter.is_some() {
                    return Err(TrackerError::InvalidListArgument(token.to_string()));
                }
                query.filter = Some(ListFilter::from(token));
            }
        }
        Ok(query)
    }
}
