//! Exam tickets - randomized, constraint-satisfying exam ticket generation
//!
//! Tickets are subsets of a task pool whose total complexity falls inside a
//! tolerance window around a target, span at least two themes, and never
//! repeat an earlier ticket's task set within a run.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{ComplexityWindow, Generator, Task, TaskId, Ticket, TicketLedger, ValidationRules};
