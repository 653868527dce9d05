//! Step-size calibration from the objective's local sensitivity.

use rand::Rng;
use spsa_types::{Result, SpsaError};
use tracing::{debug, info};

use crate::config::{Coefficients, EvaluationMode};
use crate::objective::{Evaluator, Objective};
use crate::perturbation::{perturb, sign_vector};

/// Calibrate the update coefficient `c0` around `initial_theta`.
///
/// On input `coefficients.a` is the desired magnitude of the first update.
/// The objective is probed `stat` times at `initial_theta ± c1 · δ` along
/// random sign directions, and `c0` is solved from the mean absolute cost
/// difference so that the first step moves by roughly that target.
///
/// Returns a copy of `coefficients` with `a` replaced; the input is left
/// as is.
///
/// # Errors
///
/// [`SpsaError::InvalidConfig`] if `stat` is zero, before any evaluation.
/// [`SpsaError::DegenerateCalibration`] if the objective did not change along
/// any sampled direction (or the derived coefficient is not finite), plus any
/// error raised by the objective.
pub fn calibrate<O, R>(
    objective: &mut O,
    mode: EvaluationMode,
    initial_theta: &[f64],
    coefficients: &Coefficients,
    stat: usize,
    rng: &mut R,
) -> Result<Coefficients>
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    if stat == 0 {
        return Err(SpsaError::invalid_config(
            "calibration samples",
            "must be at least 1, got 0",
        ));
    }
    let target_update = coefficients.a;
    let initial_c = coefficients.c;
    let mut evaluator = Evaluator::new(objective, mode);

    debug!("Calibration...");
    let mut delta_obj = 0.0;
    for i in 0..stat {
        if i % 5 == 0 {
            debug!("calibration step # {} of {}", i, stat);
        }
        let delta = sign_vector(rng, initial_theta.len());
        let (theta_plus, theta_minus) = perturb(initial_theta, &delta, initial_c);
        let (obj_plus, obj_minus) = evaluator.pair(&theta_plus, &theta_minus)?;
        delta_obj += (obj_plus - obj_minus).abs() / stat as f64;
    }

    let a = target_update * 2.0 / delta_obj * initial_c * (coefficients.stability + 1.0);
    if delta_obj == 0.0 || !a.is_finite() {
        return Err(SpsaError::DegenerateCalibration { samples: stat });
    }

    info!("Calibrated SPSA parameter c0 is {:.7}", a);
    Ok(Coefficients { a, ..*coefficients })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::FnObjective;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sum_of_squares(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    #[test]
    fn linear_objective_gives_closed_form_c0() {
        // |f(x + cδ) - f(x - cδ)| = 10c = 1.0 for every draw.
        let mut f = FnObjective::new(1, |x: &[f64]| 5.0 * x[0]);
        let coefficients = Coefficients::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let calibrated = calibrate(
            &mut f,
            EvaluationMode::Single,
            &[0.3],
            &coefficients,
            10,
            &mut rng,
        )
        .unwrap();

        assert_relative_eq!(calibrated.a, coefficients.a * 2.0 * 0.1, epsilon = 1e-12);
        assert_eq!(calibrated.c, coefficients.c);
        assert_eq!(calibrated.alpha, coefficients.alpha);
    }

    #[test]
    fn stability_offset_scales_c0() {
        let mut f = FnObjective::new(1, |x: &[f64]| 5.0 * x[0]);
        let coefficients = Coefficients {
            stability: 9.0,
            ..Coefficients::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let calibrated = calibrate(
            &mut f,
            EvaluationMode::Single,
            &[0.0],
            &coefficients,
            4,
            &mut rng,
        )
        .unwrap();
        assert_relative_eq!(calibrated.a, coefficients.a * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn quadratic_c0_is_finite_positive_and_changed() {
        let mut f = FnObjective::new(2, sum_of_squares);
        let coefficients = Coefficients::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let calibrated = calibrate(
            &mut f,
            EvaluationMode::Single,
            &[1.0, 2.0],
            &coefficients,
            20,
            &mut rng,
        )
        .unwrap();
        assert!(calibrated.a.is_finite());
        assert!(calibrated.a > 0.0);
        assert_ne!(calibrated.a, coefficients.a);
    }

    #[test]
    fn flat_objective_is_degenerate() {
        let mut calls = 0;
        let mut f = FnObjective::new(3, |_: &[f64]| {
            calls += 1;
            1.0
        });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = calibrate(
            &mut f,
            EvaluationMode::Single,
            &[0.0, 0.0, 0.0],
            &Coefficients::default(),
            6,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, SpsaError::DegenerateCalibration { samples: 6 }));
        drop(f);
        assert_eq!(calls, 12);
    }

    #[test]
    fn zero_samples_is_rejected_without_evaluating() {
        let mut calls = 0;
        let mut f = FnObjective::new(1, |x: &[f64]| {
            calls += 1;
            x[0]
        });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = calibrate(
            &mut f,
            EvaluationMode::Single,
            &[1.0],
            &Coefficients::default(),
            0,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SpsaError::InvalidConfig {
                field: "calibration samples",
                ..
            }
        ));
        drop(f);
        assert_eq!(calls, 0);
    }

    #[test]
    fn paired_and_single_modes_agree() {
        let coefficients = Coefficients::default();
        let theta = [0.5, -1.5, 2.0];

        let mut single = FnObjective::new(3, sum_of_squares);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let a = calibrate(&mut single, EvaluationMode::Single, &theta, &coefficients, 25, &mut rng)
            .unwrap();

        let mut paired = FnObjective::new(3, sum_of_squares);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let b = calibrate(&mut paired, EvaluationMode::Paired, &theta, &coefficients, 25, &mut rng)
            .unwrap();

        assert_eq!(a, b);
    }
}
