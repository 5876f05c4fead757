//! `tickets generate` command

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::output::Output;
use crate::domain::{
    EmitError, Generator, RunLimits, SamplingStrategy, Termination, Ticket, TicketEmitter,
};
use crate::storage::{Project, TaskCatalog, TicketWriter};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Target total complexity of a ticket
    #[arg(long, short = 't', allow_negative_numbers = true)]
    pub target: i64,

    /// Allowed deviation from the target, in percent
    #[arg(long, short = 'p', allow_negative_numbers = true)]
    pub tolerance: i64,

    /// Task catalog (defaults to the configured one)
    #[arg(long)]
    pub tasks: Option<PathBuf>,

    /// Ticket file to write (defaults to the configured one)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sampling strategy: greedy or exhaustive
    #[arg(long)]
    pub strategy: Option<SamplingStrategy>,

    /// Require two distinct task types in multi-task tickets
    #[arg(long)]
    pub require_type_diversity: bool,

    /// Smallest number of tasks per ticket
    #[arg(long)]
    pub min_tasks: Option<usize>,

    /// Consecutive rejected candidates before the search stops
    #[arg(long)]
    pub failure_bound: Option<u32>,

    /// Stop after this many candidates in total
    #[arg(long)]
    pub max_attempts: Option<u64>,

    /// Stop after this many seconds
    #[arg(long)]
    pub time_limit: Option<u64>,
}

/// Writes tickets to the file and keeps them for the report
struct RecordingEmitter<'w> {
    writer: &'w mut TicketWriter,
    tickets: Vec<Ticket>,
}

impl TicketEmitter for RecordingEmitter<'_> {
    fn emit(&mut self, ticket: &Ticket) -> Result<(), EmitError> {
        self.writer.emit(ticket)?;
        self.tickets.push(ticket.clone());
        Ok(())
    }
}

/// Runs a generation and writes the ticket file
pub fn run(output: &Output, mut project: Project, args: GenerateArgs) -> Result<()> {
    let generation = &mut project.config_mut().project.generation;
    if let Some(strategy) = args.strategy {
        generation.strategy = strategy;
    }
    if args.require_type_diversity {
        generation.require_type_diversity = true;
    }
    if let Some(min_tasks) = args.min_tasks {
        generation.min_tasks = min_tasks;
    }
    if let Some(failure_bound) = args.failure_bound {
        generation.failure_bound = failure_bound;
    }
    if args.seed.is_some() {
        generation.seed = args.seed;
    }
    generation.validate()?;
    let generation = generation.clone();

    let config = project.config();
    let tasks_path = args.tasks.unwrap_or_else(|| config.tasks_path());
    let tickets_path = args.output.unwrap_or_else(|| config.tickets_path());

    let catalog = TaskCatalog::read(&tasks_path)?;
    output.verbose_ctx(
        "generate",
        &format!("Loaded {} tasks from {}", catalog.len(), tasks_path.display()),
    );
    if !catalog.skipped().is_empty() {
        output.verbose_ctx(
            "generate",
            &format!("Skipped malformed lines: {:?}", catalog.skipped()),
        );
    }

    let generator = Generator::new(catalog.tasks(), args.target, args.tolerance)?
        .with_rules(generation.rules())
        .with_failure_bound(generation.failure_bound);
    let window = *generator.window();
    output.verbose_ctx(
        "generate",
        &format!("Complexity window: [{}, {}]", window.lower, window.upper),
    );

    let seed = generation.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    output.verbose_ctx("generate", &format!("Seed: {}", seed));

    let (strategy, mut sampler) = generation.strategy.sampler_for(
        catalog.tasks(),
        &window,
        u128::from(generation.exhaustive_limit),
    );
    if strategy != generation.strategy {
        output.verbose_ctx(
            "generate",
            &format!(
                "Candidate space exceeds {} subsets, using {} sampling",
                generation.exhaustive_limit, strategy
            ),
        );
    } else {
        output.verbose_ctx("generate", &format!("Strategy: {}", strategy));
    }

    let mut limits = RunLimits::unlimited();
    if let Some(max_attempts) = args.max_attempts {
        limits = limits.with_max_attempts(max_attempts);
    }
    if let Some(seconds) = args.time_limit {
        limits = limits.with_time_limit(Duration::from_secs(seconds));
    }

    let mut writer = TicketWriter::new(&tickets_path, &tasks_path);
    writer.initialize()?;

    let mut emitter = RecordingEmitter {
        writer: &mut writer,
        tickets: Vec::new(),
    };
    let report = generator.run(sampler.as_mut(), &mut rng, &mut emitter, &mut limits)?;
    let tickets = emitter.tickets;

    output.verbose_ctx(
        "generate",
        &format!("{} candidates tried, {} accepted", report.attempts, report.tickets),
    );
    if output.is_verbose() {
        for (reason, count) in &report.rejections {
            output.verbose_ctx("generate", &format!("Rejected ({}): {}", reason.label(), count));
        }
    }

    let items: Vec<_> = tickets
        .iter()
        .map(|t| {
            serde_json::json!({
                "number": t.number,
                "task_ids": t.task_ids,
                "fingerprint": t.key().fingerprint(),
            })
        })
        .collect();
    let data = serde_json::json!({
        "tickets": items,
        "count": report.tickets,
        "attempts": report.attempts,
        "rejections": report.rejections,
        "termination": report.termination,
        "window": { "lower": window.lower, "upper": window.upper },
        "strategy": strategy,
        "seed": seed,
        "output": tickets_path.display().to_string(),
    });

    output.render(&data, || {
        if report.tickets == 0 && report.termination == Termination::Stopped {
            println!("No tickets generated before the run was stopped.");
        } else if report.tickets == 0 {
            println!(
                "No tickets fit the window [{}, {}] with the current rules.",
                window.lower, window.upper
            );
        } else {
            println!(
                "Generated {} ticket(s) into {}",
                report.tickets,
                tickets_path.display()
            );
        }
        let ending = match report.termination {
            Termination::Exhausted => "search exhausted",
            Termination::Stopped => "stopped early",
        };
        println!(
            "{} candidates tried, {} ({} sampling, seed {})",
            report.attempts, ending, strategy, seed
        );
    })?;

    Ok(())
}
