//! Problem description handed to an optimizer.

use serde::{Deserialize, Serialize};

/// Externally supplied gradient of the objective.
pub type GradientFn = Box<dyn FnMut(&[f64]) -> Vec<f64> + Send>;

/// Optional lower/upper bound on one variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableBound {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl VariableBound {
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Everything about a minimization problem except the objective itself.
///
/// Which fields an optimizer actually reads is governed by its
/// [`SupportLevels`](crate::SupportLevels).
pub struct Problem {
    pub num_vars: usize,
    pub initial_point: Option<Vec<f64>>,
    pub variable_bounds: Option<Vec<VariableBound>>,
    pub gradient: Option<GradientFn>,
}

impl Problem {
    pub fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            initial_point: None,
            variable_bounds: None,
            gradient: None,
        }
    }

    pub fn with_initial_point(mut self, point: impl Into<Vec<f64>>) -> Self {
        self.initial_point = Some(point.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Vec<VariableBound>) -> Self {
        self.variable_bounds = Some(bounds);
        self
    }

    pub fn with_gradient(mut self, gradient: GradientFn) -> Self {
        self.gradient = Some(gradient);
        self
    }
}

impl std::fmt::Debug for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Problem")
            .field("num_vars", &self.num_vars)
            .field("initial_point", &self.initial_point)
            .field("variable_bounds", &self.variable_bounds)
            .field("gradient", &self.gradient.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
