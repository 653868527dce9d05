//! Optimizer configuration and SPSA coefficients.

use serde::{Deserialize, Serialize};
use spsa_types::{Result, SpsaError};

/// Default target update for the first step, `2π · 0.1`.
pub const DEFAULT_C0: f64 = 2.0 * std::f64::consts::PI * 0.1;

/// The five SPSA gain coefficients.
///
/// Serialized under their conventional names `c0`..`c4`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Initial update step numerator ("a"). Calibration replaces it.
    #[serde(rename = "c0")]
    pub a: f64,
    /// Initial perturbation magnitude ("c").
    #[serde(rename = "c1")]
    pub c: f64,
    /// Decay exponent of the update step.
    #[serde(rename = "c2")]
    pub alpha: f64,
    /// Decay exponent of the perturbation magnitude.
    #[serde(rename = "c3")]
    pub gamma: f64,
    /// Stability offset added to the iteration index when decaying `a`.
    #[serde(rename = "c4")]
    pub stability: f64,
}

impl Coefficients {
    pub fn from_array(c: [f64; 5]) -> Self {
        Self {
            a: c[0],
            c: c[1],
            alpha: c[2],
            gamma: c[3],
            stability: c[4],
        }
    }

    pub fn to_array(&self) -> [f64; 5] {
        [self.a, self.c, self.alpha, self.gamma, self.stability]
    }

    /// Update step size at iteration `k` (zero-based).
    pub fn step_size(&self, k: usize) -> f64 {
        self.a / (k as f64 + 1.0 + self.stability).powf(self.alpha)
    }

    /// Perturbation magnitude at iteration `k` (zero-based).
    pub fn perturbation(&self, k: usize) -> f64 {
        self.c / (k as f64 + 1.0).powf(self.gamma)
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::from_array([DEFAULT_C0, 0.1, 0.602, 0.101, 0.0])
    }
}

/// How the objective is called for each +/- pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// One call per point.
    #[default]
    Single,
    /// One call with both points concatenated, returning two costs.
    Paired,
}

impl EvaluationMode {
    /// Mode implied by a maximum number of points per objective call.
    pub fn from_max_evals_grouped(max_evals_grouped: usize) -> Self {
        if max_evals_grouped > 1 {
            Self::Paired
        } else {
            Self::Single
        }
    }
}

/// Configuration for an SPSA optimizer instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpsaConfig {
    /// Number of perturbation/update iterations.
    pub max_trials: usize,

    /// Keep every `save_steps`-th trial in the history.
    pub save_steps: usize,

    /// Average the last `last_avg` iterates into the reported point.
    pub last_avg: usize,

    #[serde(flatten)]
    pub coefficients: Coefficients,

    /// Use `coefficients` as given instead of calibrating `c0`.
    pub skip_calibration: bool,

    pub evaluation: EvaluationMode,

    /// Seed for the perturbation generator. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SpsaConfig {
    fn default() -> Self {
        Self {
            max_trials: 1000,
            save_steps: 1,
            last_avg: 1,
            coefficients: Coefficients::default(),
            skip_calibration: false,
            evaluation: EvaluationMode::Single,
            seed: None,
        }
    }
}

impl SpsaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.last_avg < 1 {
            return Err(SpsaError::invalid_config(
                "last_avg",
                format!("must be at least 1, got {}", self.last_avg),
            ));
        }
        if self.save_steps < 1 {
            return Err(SpsaError::invalid_config(
                "save_steps",
                format!("must be at least 1, got {}", self.save_steps),
            ));
        }
        Ok(())
    }

    /// Number of calibration samples: a fifth of the trial budget, within `[1, 25]`.
    pub fn calibration_samples(&self) -> usize {
        (self.max_trials / 5).clamp(1, 25)
    }

    pub fn with_max_trials(mut self, n: usize) -> Self {
        self.max_trials = n;
        self
    }

    pub fn with_save_steps(mut self, n: usize) -> Self {
        self.save_steps = n;
        self
    }

    pub fn with_last_avg(mut self, n: usize) -> Self {
        self.last_avg = n;
        self
    }

    pub fn with_coefficients(mut self, coefficients: Coefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    pub fn with_skip_calibration(mut self, skip: bool) -> Self {
        self.skip_calibration = skip;
        self
    }

    pub fn with_evaluation(mut self, mode: EvaluationMode) -> Self {
        self.evaluation = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
