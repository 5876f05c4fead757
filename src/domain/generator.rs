//! Ticket generation loop
//!
//! The loop asks a [`CandidateSampler`] for one candidate per attempt, checks
//! it against the [`ValidationRules`] and the run's [`TicketLedger`], and hands
//! every accepted ticket to a [`TicketEmitter`].
//!
//! ```text
//! Searching ──accept──▶ commit to ledger ─▶ emit ─▶ Searching (failures = 0)
//!     │
//!     └──reject──▶ failures += 1 ─▶ Searching, or Exhausted at the bound
//! ```
//!
//! The failure bound is a stopping heuristic for randomized samplers, not a
//! proof that no further tickets exist. Exhaustive samplers end on their own.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rand::RngCore;
use serde::Serialize;
use thiserror::Error;

use super::ledger::TicketLedger;
use super::rules::{Rejection, ValidationRules};
use super::sampler::CandidateSampler;
use super::task::{Task, TaskId, Ticket};
use super::window::ComplexityWindow;

/// Consecutive rejected candidates after which a randomized search gives up
pub const DEFAULT_FAILURE_BOUND: u32 = 1000;

/// Error type an emitter may fail with
pub type EmitError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task catalog is empty")]
    EmptyCatalog,

    #[error("Failed to emit ticket {number}")]
    EmitterFailure {
        number: u32,
        #[source]
        source: EmitError,
    },
}

/// Receives accepted tickets, once each, in acceptance order
pub trait TicketEmitter {
    fn emit(&mut self, ticket: &Ticket) -> Result<(), EmitError>;
}

impl TicketEmitter for Vec<Ticket> {
    fn emit(&mut self, ticket: &Ticket) -> Result<(), EmitError> {
        self.push(ticket.clone());
        Ok(())
    }
}

/// External stop request, polled once before every attempt
pub trait StopSignal {
    fn should_stop(&mut self, attempts: u64) -> bool;
}

impl<F: FnMut(u64) -> bool> StopSignal for F {
    fn should_stop(&mut self, attempts: u64) -> bool {
        self(attempts)
    }
}

/// Attempt cap and wall-clock deadline; both unlimited by default
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLimits {
    pub max_attempts: Option<u64>,
    pub deadline: Option<Instant>,
}

impl RunLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }
}

impl StopSignal for RunLimits {
    fn should_stop(&mut self, attempts: u64) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The failure bound was reached or the sampler ran out of candidates
    Exhausted,
    /// The stop signal fired
    Stopped,
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub tickets: usize,
    pub attempts: u64,
    pub rejections: BTreeMap<Rejection, u64>,
    pub termination: Termination,
}

/// One generation run over a borrowed catalog
#[derive(Debug)]
pub struct Generator<'a> {
    catalog: &'a [Task],
    window: ComplexityWindow,
    rules: ValidationRules,
    failure_bound: u32,
}

impl<'a> Generator<'a> {
    /// Validates the arguments and the catalog before any search starts
    pub fn new(catalog: &'a [Task], target: i64, tolerance_percent: i64) -> Result<Self, GenerateError> {
        let window = ComplexityWindow::new(target, tolerance_percent)?;

        if catalog.is_empty() {
            return Err(GenerateError::EmptyCatalog);
        }

        Ok(Self {
            catalog,
            window,
            rules: ValidationRules::default(),
            failure_bound: DEFAULT_FAILURE_BOUND,
        })
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the consecutive-failure bound (at least 1)
    pub fn with_failure_bound(mut self, failure_bound: u32) -> Self {
        self.failure_bound = failure_bound.max(1);
        self
    }

    pub fn window(&self) -> &ComplexityWindow {
        &self.window
    }

    pub fn catalog(&self) -> &'a [Task] {
        self.catalog
    }

    /// Runs the search until it is exhausted or `stop` fires
    ///
    /// Each accepted id set is committed to the ledger before the ticket is
    /// emitted. An emitter failure aborts the run; tickets emitted earlier
    /// stay emitted.
    pub fn run(
        &self,
        sampler: &mut dyn CandidateSampler,
        rng: &mut dyn RngCore,
        emitter: &mut dyn TicketEmitter,
        stop: &mut dyn StopSignal,
    ) -> Result<GenerationReport, GenerateError> {
        let mut ledger = TicketLedger::new();
        let mut rejections: BTreeMap<Rejection, u64> = BTreeMap::new();
        let mut failures = 0u32;
        let mut attempts = 0u64;
        let mut next_number = 1u32;

        let termination = loop {
            if stop.should_stop(attempts) {
                break Termination::Stopped;
            }

            let Some(candidate) = sampler.next_candidate(self.catalog, &self.window, rng) else {
                break Termination::Exhausted;
            };
            attempts += 1;

            match self.rules.check(&candidate, &self.window, &ledger) {
                Ok(()) => {
                    let ids: Vec<TaskId> = candidate.iter().map(|t| t.id).collect();
                    ledger.add(&ids);

                    let ticket = Ticket::new(next_number, ids);
                    next_number += 1;
                    failures = 0;

                    emitter
                        .emit(&ticket)
                        .map_err(|source| GenerateError::EmitterFailure {
                            number: ticket.number,
                            source,
                        })?;
                }
                Err(reason) => {
                    *rejections.entry(reason).or_default() += 1;
                    failures += 1;

                    if !sampler.is_exhaustive() && failures >= self.failure_bound {
                        break Termination::Exhausted;
                    }
                }
            }
        };

        Ok(GenerationReport {
            tickets: ledger.len(),
            attempts,
            rejections,
            termination,
        })
    }
}
