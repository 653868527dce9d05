//! The public SPSA optimizer.

use std::fmt::Write as _;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spsa_types::{OptimizeResult, Problem, Result, SpsaError, SupportLevel, SupportLevels};
use tracing::{debug, info};

use crate::calibration::calibrate;
use crate::config::{Coefficients, EvaluationMode, SpsaConfig};
use crate::objective::Objective;
use crate::optimization::run_trials;
use crate::trial::SpsaRun;

/// Simultaneous perturbation stochastic approximation optimizer.
///
/// See Spall, "An Overview of the Simultaneous Perturbation Method for
/// Efficient Optimization", and Kandala et al. (arXiv:1704.05018,
/// supplementary section IV) for the calibration scheme.
///
/// The instance owns its configuration and its random generator. Unless
/// `skip_calibration` is set, every run first calibrates `c0` and **stores
/// the calibrated value back** into the instance's coefficients, so a later
/// run starts from the calibrated value as its target update. Methods that
/// run the optimizer take `&mut self` for that reason.
#[derive(Debug, Clone)]
pub struct Spsa<R = ChaCha8Rng> {
    config: SpsaConfig,
    rng: R,
}

impl Spsa<ChaCha8Rng> {
    /// Validate `config` and seed the generator from `config.seed`, or from
    /// entropy when no seed is set.
    pub fn new(config: SpsaConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Spsa<R> {
    /// Validate `config` and use `rng` for every perturbation draw.
    /// `config.seed` is not consulted.
    pub fn with_rng(config: SpsaConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// SPSA needs a starting point and disregards gradients and bounds.
    pub fn support_level(&self) -> SupportLevels {
        SupportLevels {
            gradient: SupportLevel::Ignored,
            bounds: SupportLevel::Ignored,
            initial_point: SupportLevel::Required,
        }
    }

    pub fn config(&self) -> &SpsaConfig {
        &self.config
    }

    /// Current coefficients, including any calibrated `c0`.
    pub fn coefficients(&self) -> &Coefficients {
        &self.config.coefficients
    }

    pub fn set_evaluation_mode(&mut self, mode: EvaluationMode) {
        self.config.evaluation = mode;
    }

    /// Pair +/- evaluations into one objective call when more than one point
    /// may be evaluated at a time.
    pub fn set_max_evals_grouped(&mut self, max_evals_grouped: usize) {
        self.set_evaluation_mode(EvaluationMode::from_max_evals_grouped(max_evals_grouped));
    }

    /// Minimize the objective for a checked [`Problem`].
    ///
    /// Supplied gradients and bounds are ignored. The returned result never
    /// carries an evaluation count.
    pub fn optimize<O: Objective>(
        &mut self,
        problem: Problem,
        objective: O,
    ) -> Result<OptimizeResult> {
        self.support_level().check(&problem)?;
        let initial_point = problem.initial_point.ok_or(SpsaError::MissingInitialPoint)?;
        let run = self.run(objective, &initial_point)?;
        Ok(run.into_result())
    }

    /// Shorthand for [`optimize`](Self::optimize) with only a starting point.
    pub fn minimize<O: Objective>(
        &mut self,
        objective: O,
        initial_point: &[f64],
    ) -> Result<OptimizeResult> {
        let problem = Problem::new(initial_point.len()).with_initial_point(initial_point);
        self.optimize(problem, objective)
    }

    /// Calibrate (unless skipped) and run the loop, returning the full run
    /// record with its trial history.
    pub fn run<O: Objective>(&mut self, mut objective: O, initial_point: &[f64]) -> Result<SpsaRun> {
        if initial_point.is_empty() {
            return Err(SpsaError::Validation(
                "initial point must have at least one variable".to_string(),
            ));
        }

        debug!("Parameters: {:?}", self.config.coefficients.to_array());
        if self.config.skip_calibration {
            debug!("Skipping calibration, parameters used as provided.");
        } else {
            self.calibrate(&mut objective, initial_point)?;
        }

        let run = run_trials(
            &mut objective,
            initial_point,
            &self.config.coefficients,
            &self.config,
            &mut self.rng,
        )?;
        info!(
            "SPSA run {} finished: {} trials, final objective {:.7}",
            run.id, self.config.max_trials, run.final_cost
        );
        Ok(run)
    }

    /// Calibrate `c0` around `initial_point` and store it in this instance.
    ///
    /// Uses `clamp(max_trials / 5, 1, 25)` samples. On error the stored
    /// coefficients are left unchanged.
    pub fn calibrate<O: Objective + ?Sized>(
        &mut self,
        objective: &mut O,
        initial_point: &[f64],
    ) -> Result<Coefficients> {
        let calibrated = calibrate(
            objective,
            self.config.evaluation,
            initial_point,
            &self.config.coefficients,
            self.config.calibration_samples(),
            &mut self.rng,
        )?;
        self.config.coefficients = calibrated;
        Ok(calibrated)
    }

    /// Human-readable summary of the optimizer's options and capabilities.
    pub fn setting(&self) -> String {
        let levels = self.support_level();
        let c = self.config.coefficients.to_array();
        let mut out = String::from("Optimizer: Spsa\n");
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "-- support_level: gradient={}, bounds={}, initial_point={}",
            levels.gradient, levels.bounds, levels.initial_point
        );
        let _ = writeln!(out, "-- max_trials: {}", self.config.max_trials);
        let _ = writeln!(out, "-- save_steps: {}", self.config.save_steps);
        let _ = writeln!(out, "-- last_avg: {}", self.config.last_avg);
        let _ = writeln!(
            out,
            "-- parameters: [{}, {}, {}, {}, {}]",
            c[0], c[1], c[2], c[3], c[4]
        );
        let _ = writeln!(out, "-- skip_calibration: {}", self.config.skip_calibration);
        let _ = writeln!(out, "-- evaluation: {:?}", self.config.evaluation);
        out
    }
}
