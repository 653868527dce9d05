//! Trial history and run records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spsa_types::OptimizeResult;
use uuid::Uuid;

use crate::config::Coefficients;

/// Unique optimization run identifier.
pub type RunId = Uuid;

/// Diagnostic record of the retained trials, as four parallel sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialHistory {
    pub cost_plus: Vec<f64>,
    pub cost_minus: Vec<f64>,
    pub theta_plus: Vec<Vec<f64>>,
    pub theta_minus: Vec<Vec<f64>>,
}

/// One retained trial, borrowed from a [`TrialHistory`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialRecord<'a> {
    pub theta_plus: &'a [f64],
    pub theta_minus: &'a [f64],
    pub cost_plus: f64,
    pub cost_minus: f64,
}

impl TrialHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        theta_plus: Vec<f64>,
        theta_minus: Vec<f64>,
        cost_plus: f64,
        cost_minus: f64,
    ) {
        self.theta_plus.push(theta_plus);
        self.theta_minus.push(theta_minus);
        self.cost_plus.push(cost_plus);
        self.cost_minus.push(cost_minus);
    }

    pub fn len(&self) -> usize {
        self.cost_plus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cost_plus.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TrialRecord<'_>> {
        self.theta_plus
            .iter()
            .zip(&self.theta_minus)
            .zip(self.cost_plus.iter().zip(&self.cost_minus))
            .map(|((tp, tm), (cp, cm))| TrialRecord {
                theta_plus: tp,
                theta_minus: tm,
                cost_plus: *cp,
                cost_minus: *cm,
            })
    }
}

/// Full outcome of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpsaRun {
    pub id: RunId,

    /// Coefficients the loop ran with, after any calibration.
    pub coefficients: Coefficients,

    /// Objective value at `best_theta`.
    pub final_cost: f64,

    /// Average of the last `last_avg` iterates.
    pub best_theta: Vec<f64>,

    /// The last iterate.
    pub final_theta: Vec<f64>,

    pub history: TrialHistory,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SpsaRun {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Reduce to the solution and its value. The evaluation count is left
    /// unset since SPSA does not track it.
    pub fn into_result(self) -> OptimizeResult {
        OptimizeResult::new(self.best_theta, self.final_cost)
    }
}
