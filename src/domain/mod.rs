//! Domain models for ticket generation
//!
//! Contains the search engine without any I/O concerns.

mod task;
mod window;
mod rules;
mod ledger;
mod sampler;
mod generator;

pub use task::{total_complexity, Task, TaskId, Ticket};
pub use window::ComplexityWindow;
pub use rules::{Rejection, ValidationRules};
pub use ledger::{TicketKey, TicketLedger};
pub use sampler::{
    binomial, candidate_count, candidate_sizes, CandidateSampler, Combinations, ExhaustiveSampler,
    GreedySampler, SamplingStrategy,
};
pub use generator::{
    EmitError, GenerateError, GenerationReport, Generator, RunLimits, StopSignal, Termination,
    TicketEmitter, DEFAULT_FAILURE_BOUND,
};
