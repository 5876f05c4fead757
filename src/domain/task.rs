//! Task and ticket domain model
//!
//! A task is one record of the catalog; its id is the 1-based line number of
//! the record in the source file. A ticket is an accepted selection of tasks.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ledger::TicketKey;

/// Task ID: the 1-based line number of the record in the catalog file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u32);

impl TaskId {
    /// Creates a task ID from a line number, rejecting zero
    pub fn new(line: u32) -> Option<Self> {
        (line > 0).then_some(Self(line))
    }

    /// Returns the line number this ID refers to
    pub fn line(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An exam task as loaded from the catalog
///
/// Only metadata is kept; the task text stays in the source file and is looked
/// up by line number when a ticket is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub theme: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub complexity: u32,
}

impl Task {
    pub fn new(
        id: TaskId,
        theme: impl Into<String>,
        task_type: impl Into<String>,
        complexity: u32,
    ) -> Self {
        Self {
            id,
            theme: theme.into(),
            task_type: task_type.into(),
            complexity,
        }
    }
}

/// Sum of complexities over a selection of tasks
pub fn total_complexity(tasks: &[&Task]) -> u64 {
    tasks.iter().map(|t| u64::from(t.complexity)).sum()
}

/// A generated ticket
///
/// `task_ids` keeps selection order, which is the order tasks are rendered in.
/// Identity for deduplication is the unordered set, see [`Ticket::key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub number: u32,
    pub task_ids: Vec<TaskId>,
}

impl Ticket {
    pub fn new(number: u32, task_ids: Vec<TaskId>) -> Self {
        Self { number, task_ids }
    }

    /// Order-independent identity of this ticket
    pub fn key(&self) -> TicketKey {
        TicketKey::new(&self.task_ids)
    }

    /// Returns the number of tasks in the ticket
    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    /// Returns true if the ticket holds no tasks
    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }
}
