//! Candidate samplers
//!
//! A sampler hands the generation loop one candidate subset per attempt.
//! Subsets are drawn without replacement, so a candidate never holds the same
//! task twice.
//!
//! - [`GreedySampler`] shuffles the catalog and packs tasks first-fit under the
//!   window ceiling. Cheap per attempt, but it cannot prove that no further
//!   tickets exist, so the loop stops it with a consecutive-failure bound.
//! - [`ExhaustiveSampler`] walks every subset whose size could land in the
//!   window. Complete, but only practical for small catalogs.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::task::Task;
use super::window::ComplexityWindow;

/// Source of candidate subsets for the generation loop
pub trait CandidateSampler {
    /// Produces the next candidate, or `None` once the sampler has nothing left
    fn next_candidate<'a>(
        &mut self,
        catalog: &'a [Task],
        window: &ComplexityWindow,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<&'a Task>>;

    /// True if the sampler enumerates the whole space and ends on its own
    fn is_exhaustive(&self) -> bool {
        false
    }
}

/// First-fit greedy packing over a fresh random permutation per attempt
#[derive(Debug, Default)]
pub struct GreedySampler {
    order: Vec<usize>,
}

impl GreedySampler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CandidateSampler for GreedySampler {
    fn next_candidate<'a>(
        &mut self,
        catalog: &'a [Task],
        window: &ComplexityWindow,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<&'a Task>> {
        self.order.clear();
        self.order.extend(0..catalog.len());
        self.order.shuffle(rng);

        let mut running = 0u64;
        let mut subset = Vec::new();
        for &index in &self.order {
            let task = &catalog[index];
            if window.fits(running, task.complexity) {
                running += u64::from(task.complexity);
                subset.push(task);
            }
        }

        Some(subset)
    }
}

/// Lexicographic k-combinations of `0..n` as an iterative index counter
///
/// Indices stay strictly increasing, so each subset is produced exactly once
/// and never in a permuted form.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k == 0 || k > n,
        }
    }

    fn advance(&mut self) {
        let k = self.indices.len();

        // Rightmost position that can still move up
        let Some(pos) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            self.done = true;
            return;
        };

        self.indices[pos] += 1;
        for j in pos + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        self.advance();
        Some(current)
    }
}

/// Number of k-subsets of an n-set, saturating at `u128::MAX`
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = match result.checked_mul((n - i) as u128) {
            Some(product) => product / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    result
}

/// Range of subset sizes whose total complexity can reach the window
///
/// The largest size packs the cheapest tasks under the ceiling; the smallest
/// size takes the most complex tasks until the floor is reached.
pub fn candidate_sizes(catalog: &[Task], window: &ComplexityWindow) -> Option<RangeInclusive<usize>> {
    let mut complexities: Vec<u64> = catalog.iter().map(|t| u64::from(t.complexity)).collect();
    complexities.sort_unstable();

    let mut sum = 0u64;
    let mut max_size = 0;
    for &c in &complexities {
        if (sum + c) as f64 > window.upper {
            break;
        }
        sum += c;
        max_size += 1;
    }

    let mut sum = 0u64;
    let mut min_size = None;
    for (taken, &c) in complexities.iter().rev().enumerate() {
        sum += c;
        if sum as f64 >= window.lower {
            min_size = Some(taken + 1);
            break;
        }
    }

    match min_size {
        Some(min_size) if min_size <= max_size => Some(min_size..=max_size),
        _ => None,
    }
}

/// Number of candidates an exhaustive walk over `catalog` would produce
pub fn candidate_count(catalog: &[Task], window: &ComplexityWindow) -> u128 {
    candidate_sizes(catalog, window)
        .map(|sizes| {
            sizes.fold(0u128, |total, k| {
                total.saturating_add(binomial(catalog.len(), k))
            })
        })
        .unwrap_or(0)
}

/// Enumerates every subset of feasible size, smallest sizes first
///
/// The catalog order is shuffled once on the first call, so different seeds
/// emit the same tickets in a different order.
#[derive(Debug, Default)]
pub struct ExhaustiveSampler {
    order: Vec<usize>,
    sizes: Option<RangeInclusive<usize>>,
    combinations: Option<Combinations>,
    started: bool,
}

impl ExhaustiveSampler {
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&mut self, catalog: &[Task], window: &ComplexityWindow, rng: &mut dyn RngCore) {
        self.order = (0..catalog.len()).collect();
        self.order.shuffle(rng);
        self.sizes = candidate_sizes(catalog, window);
        self.started = true;
    }
}

impl CandidateSampler for ExhaustiveSampler {
    fn next_candidate<'a>(
        &mut self,
        catalog: &'a [Task],
        window: &ComplexityWindow,
        rng: &mut dyn RngCore,
    ) -> Option<Vec<&'a Task>> {
        if !self.started {
            self.start(catalog, window, rng);
        }

        loop {
            if let Some(combination) = self.combinations.as_mut().and_then(Iterator::next) {
                return Some(
                    combination
                        .into_iter()
                        .map(|i| &catalog[self.order[i]])
                        .collect(),
                );
            }

            let size = self.sizes.as_mut()?.next()?;
            self.combinations = Some(Combinations::new(self.order.len(), size));
        }
    }

    fn is_exhaustive(&self) -> bool {
        true
    }
}

/// How candidates are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Randomized first-fit packing, stopped by the failure bound
    #[default]
    Greedy,
    /// Complete enumeration; falls back to greedy past the candidate limit
    Exhaustive,
}

impl SamplingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingStrategy::Greedy => "greedy",
            SamplingStrategy::Exhaustive => "exhaustive",
        }
    }

    /// Picks the concrete sampler for this catalog
    ///
    /// Returns the strategy actually used alongside the sampler, since an
    /// exhaustive request over more than `limit` candidates runs greedy.
    pub fn sampler_for(
        self,
        catalog: &[Task],
        window: &ComplexityWindow,
        limit: u128,
    ) -> (SamplingStrategy, Box<dyn CandidateSampler>) {
        if self == SamplingStrategy::Exhaustive && candidate_count(catalog, window) <= limit {
            let sampler: Box<dyn CandidateSampler> = Box::new(ExhaustiveSampler::new());
            return (SamplingStrategy::Exhaustive, sampler);
        }

        let sampler: Box<dyn CandidateSampler> = Box::new(GreedySampler::new());
        (SamplingStrategy::Greedy, sampler)
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(SamplingStrategy::Greedy),
            "exhaustive" => Ok(SamplingStrategy::Exhaustive),
            other => Err(format!(
                "unknown strategy '{}', expected 'greedy' or 'exhaustive'",
                other
            )),
        }
    }
}
