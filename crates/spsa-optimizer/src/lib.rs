//! # spsa-optimizer
//!
//! Simultaneous Perturbation Stochastic Approximation (SPSA) for black-box
//! objectives that are expensive to evaluate.
//!
//! Each iteration estimates the gradient from just two objective evaluations,
//! at `θ ± c_k δ` for a random sign vector `δ`, however many variables there
//! are. Before the loop starts, the update gain `c0` is calibrated from the
//! objective's observed sensitivity around the starting point.
//!
//! ```no_run
//! use spsa_optimizer::{FnObjective, Spsa, SpsaConfig};
//!
//! let config = SpsaConfig::new().with_max_trials(200).with_seed(7);
//! let mut spsa = Spsa::new(config)?;
//! let objective = FnObjective::new(2, |x: &[f64]| x.iter().map(|v| v * v).sum());
//! let result = spsa.minimize(objective, &[1.0, 1.0])?;
//! println!("{:?} -> {}", result.point, result.value);
//! # Ok::<(), spsa_optimizer::SpsaError>(())
//! ```

mod calibration;
mod config;
mod objective;
mod optimization;
mod perturbation;
mod spsa;
mod trial;

pub use calibration::calibrate;
pub use config::{Coefficients, EvaluationMode, SpsaConfig, DEFAULT_C0};
pub use objective::{FnObjective, Objective, TryFnObjective};
pub use optimization::run_trials;
pub use perturbation::{perturb, sign_vector};
pub use spsa::Spsa;
pub use trial::{RunId, SpsaRun, TrialHistory, TrialRecord};

pub use spsa_types::{
    BoxError, OptimizeResult, Problem, SpsaError, SupportLevel, SupportLevels, VariableBound,
};
