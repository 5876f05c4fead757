//! Subset validation rules
//!
//! Rules are applied in a fixed order and stop at the first failure:
//!
//! 1. the subset is non-empty
//! 2. the subset holds at least `min_tasks` tasks
//! 3. the total complexity lies inside the window
//! 4. multi-task subsets span at least two themes
//! 5. multi-task subsets span at least two types (when required)
//! 6. task ids are pairwise distinct
//! 7. the id set has not been issued before in this run

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ledger::TicketLedger;
use super::task::{total_complexity, Task, TaskId};
use super::window::ComplexityWindow;

/// Why a candidate subset was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Empty,
    TooFewTasks,
    OutOfWindow,
    SingleTheme,
    SingleType,
    DuplicateTask,
    AlreadyIssued,
}

impl Rejection {
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::Empty => "empty",
            Rejection::TooFewTasks => "too few tasks",
            Rejection::OutOfWindow => "out of window",
            Rejection::SingleTheme => "single theme",
            Rejection::SingleType => "single type",
            Rejection::DuplicateTask => "duplicate task",
            Rejection::AlreadyIssued => "already issued",
        }
    }
}

/// Configurable part of the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Require at least two distinct task types in multi-task tickets
    pub require_type_diversity: bool,

    /// Smallest number of tasks a ticket may hold; 1 allows single-task tickets
    pub min_tasks: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            require_type_diversity: false,
            min_tasks: 2,
        }
    }
}

impl ValidationRules {
    /// Checks a candidate subset; the caller commits accepted subsets to the ledger
    pub fn check(
        &self,
        candidate: &[&Task],
        window: &ComplexityWindow,
        ledger: &TicketLedger,
    ) -> Result<(), Rejection> {
        if candidate.is_empty() {
            return Err(Rejection::Empty);
        }

        if candidate.len() < self.min_tasks {
            return Err(Rejection::TooFewTasks);
        }

        if !window.contains(total_complexity(candidate)) {
            return Err(Rejection::OutOfWindow);
        }

        if candidate.len() > 1 {
            if distinct(candidate.iter().map(|t| t.theme.as_str())) < 2 {
                return Err(Rejection::SingleTheme);
            }

            if self.require_type_diversity
                && distinct(candidate.iter().map(|t| t.task_type.as_str())) < 2
            {
                return Err(Rejection::SingleType);
            }
        }

        let ids: Vec<TaskId> = candidate.iter().map(|t| t.id).collect();
        if distinct(ids.iter()) != ids.len() {
            return Err(Rejection::DuplicateTask);
        }

        if ledger.contains(&ids) {
            return Err(Rejection::AlreadyIssued);
        }

        Ok(())
    }

    /// Convenience wrapper returning only accept/reject
    pub fn accepts(
        &self,
        candidate: &[&Task],
        window: &ComplexityWindow,
        ledger: &TicketLedger,
    ) -> bool {
        self.check(candidate, window, ledger).is_ok()
    }
}

fn distinct<T: Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> usize {
    values.collect::<HashSet<_>>().len()
}
