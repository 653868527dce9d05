//! The SPSA perturbation/update loop.

use chrono::Utc;
use rand::Rng;
use spsa_types::Result;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{Coefficients, SpsaConfig};
use crate::objective::{Evaluator, Objective};
use crate::perturbation::{perturb, sign_vector};
use crate::trial::{SpsaRun, TrialHistory};

/// Minimize `objective` from `initial_theta` for `config.max_trials` steps.
///
/// Each step `k` uses the gains `a_k = c0 / (k + 1 + c4)^c2` and
/// `c_k = c1 / (k + 1)^c3`, draws a fresh sign vector `δ`, and moves
/// `θ ← θ - a_k · (f(θ + c_k δ) - f(θ - c_k δ)) δ / (2 c_k)`.
///
/// Every `save_steps`-th trial is recorded, and the iterates of the last
/// `last_avg` steps are averaged into the returned `best_theta`, at which the
/// objective is evaluated once more for `final_cost`.
///
/// `config.coefficients` is not read; the caller passes the coefficients to
/// use, calibrated or not.
pub fn run_trials<O, R>(
    objective: &mut O,
    initial_theta: &[f64],
    coefficients: &Coefficients,
    config: &SpsaConfig,
    rng: &mut R,
) -> Result<SpsaRun>
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;

    let started_at = Utc::now();
    let max_trials = config.max_trials;
    let save_steps = config.save_steps;
    let last_avg = config.last_avg;
    let n = initial_theta.len();

    let mut evaluator = Evaluator::new(objective, config.evaluation);
    let mut history = TrialHistory::new();
    let mut theta = initial_theta.to_vec();
    let mut theta_best = vec![0.0; n];

    for k in 0..max_trials {
        let a_spsa = coefficients.step_size(k);
        let c_spsa = coefficients.perturbation(k);
        let delta = sign_vector(rng, n);

        let (theta_plus, theta_minus) = perturb(&theta, &delta, c_spsa);
        let (cost_plus, cost_minus) = evaluator.pair(&theta_plus, &theta_minus)?;

        for (t, d) in theta.iter_mut().zip(&delta) {
            let g_spsa = (cost_plus - cost_minus) * d / (2.0 * c_spsa);
            *t -= a_spsa * g_spsa;
        }

        if k % save_steps == 0 {
            debug!("Objective function at theta+ for step # {}: {:.7}", k, cost_plus);
            debug!("Objective function at theta- for step # {}: {:.7}", k, cost_minus);
            history.record(theta_plus, theta_minus, cost_plus, cost_minus);
        }

        if k + last_avg >= max_trials {
            for (best, t) in theta_best.iter_mut().zip(&theta) {
                *best += t / last_avg as f64;
            }
        }
    }

    let final_cost = evaluator.point(&theta_best)?;
    info!("Final objective function is: {:.7}", final_cost);

    Ok(SpsaRun {
        id: Uuid::new_v4(),
        coefficients: *coefficients,
        final_cost,
        best_theta: theta_best,
        final_theta: theta,
        history,
        started_at,
        finished_at: Utc::now(),
    })
}
