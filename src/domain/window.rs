//! Complexity window
//!
//! The inclusive range a ticket's total complexity must fall within:
//! `[target * (1 - tolerance/100), target * (1 + tolerance/100)]`.

use serde::Serialize;

use super::generator::GenerateError;

/// Inclusive complexity range derived from a target and a tolerance percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplexityWindow {
    pub target: i64,
    pub tolerance_percent: i64,
    pub lower: f64,
    pub upper: f64,
}

impl ComplexityWindow {
    /// Computes the window, failing on a non-positive target or a negative tolerance
    pub fn new(target: i64, tolerance_percent: i64) -> Result<Self, GenerateError> {
        if target <= 0 {
            return Err(GenerateError::InvalidArgument(format!(
                "target complexity must be positive, got {}",
                target
            )));
        }
        if tolerance_percent < 0 {
            return Err(GenerateError::InvalidArgument(format!(
                "tolerance must not be negative, got {}%",
                tolerance_percent
            )));
        }

        let ratio = tolerance_percent as f64 / 100.0;
        Ok(Self {
            target,
            tolerance_percent,
            lower: target as f64 * (1.0 - ratio),
            upper: target as f64 * (1.0 + ratio),
        })
    }

    /// Returns true if `total` lies inside the window (both ends inclusive)
    pub fn contains(&self, total: u64) -> bool {
        let total = total as f64;
        total >= self.lower && total <= self.upper
    }

    /// Returns true if adding `complexity` to `running` stays under the ceiling
    pub fn fits(&self, running: u64, complexity: u32) -> bool {
        (running + u64::from(complexity)) as f64 <= self.upper
    }
}
