use serde::{Deserialize, Serialize};

/// Outcome of a single `optimize` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// The reported solution.
    pub point: Vec<f64>,
    /// Objective value at `point`.
    pub value: f64,
    /// Number of objective evaluations, when the optimizer tracks it.
    pub evaluations: Option<usize>,
}

impl OptimizeResult {
    pub fn new(point: Vec<f64>, value: f64) -> Self {
        Self {
            point,
            value,
            evaluations: None,
        }
    }
}
