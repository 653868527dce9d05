//! The objective-function contract and the evaluator that drives it.

use spsa_types::{BoxError, Result, SpsaError};

use crate::config::EvaluationMode;

/// A black-box cost function.
///
/// `points` holds one or more parameter vectors laid out back to back. The
/// implementation returns one cost per vector, in order. In
/// [`EvaluationMode::Single`] every call carries exactly one vector; in
/// [`EvaluationMode::Paired`] the +/- perturbation pair arrives as a single
/// call with two vectors.
pub trait Objective {
    fn evaluate(&mut self, points: &[f64]) -> std::result::Result<Vec<f64>, BoxError>;
}

impl<O: Objective + ?Sized> Objective for &mut O {
    fn evaluate(&mut self, points: &[f64]) -> std::result::Result<Vec<f64>, BoxError> {
        (**self).evaluate(points)
    }
}

impl<O: Objective + ?Sized> Objective for Box<O> {
    fn evaluate(&mut self, points: &[f64]) -> std::result::Result<Vec<f64>, BoxError> {
        (**self).evaluate(points)
    }
}

/// Adapts an infallible per-point closure to [`Objective`].
#[derive(Debug, Clone)]
pub struct FnObjective<F> {
    num_vars: usize,
    f: F,
}

impl<F> FnObjective<F>
where
    F: FnMut(&[f64]) -> f64,
{
    pub fn new(num_vars: usize, f: F) -> Self {
        Self { num_vars, f }
    }
}

impl<F> Objective for FnObjective<F>
where
    F: FnMut(&[f64]) -> f64,
{
    fn evaluate(&mut self, points: &[f64]) -> std::result::Result<Vec<f64>, BoxError> {
        let width = self.num_vars.max(1);
        Ok(points.chunks(width).map(|p| (self.f)(p)).collect())
    }
}

/// Adapts a fallible per-point closure to [`Objective`].
///
/// The first error aborts the call and is returned as is.
#[derive(Debug, Clone)]
pub struct TryFnObjective<F> {
    num_vars: usize,
    f: F,
}

impl<F, E> TryFnObjective<F>
where
    F: FnMut(&[f64]) -> std::result::Result<f64, E>,
    E: Into<BoxError>,
{
    pub fn new(num_vars: usize, f: F) -> Self {
        Self { num_vars, f }
    }
}

impl<F, E> Objective for TryFnObjective<F>
where
    F: FnMut(&[f64]) -> std::result::Result<f64, E>,
    E: Into<BoxError>,
{
    fn evaluate(&mut self, points: &[f64]) -> std::result::Result<Vec<f64>, BoxError> {
        let width = self.num_vars.max(1);
        points
            .chunks(width)
            .map(|p| (self.f)(p).map_err(Into::into))
            .collect()
    }
}

/// Calls an [`Objective`] according to the configured evaluation mode and
/// checks that it answered with the right number of costs.
pub(crate) struct Evaluator<'a, O: ?Sized> {
    objective: &'a mut O,
    mode: EvaluationMode,
    scratch: Vec<f64>,
}

impl<'a, O: Objective + ?Sized> Evaluator<'a, O> {
    pub(crate) fn new(objective: &'a mut O, mode: EvaluationMode) -> Self {
        Self {
            objective,
            mode,
            scratch: Vec::new(),
        }
    }

    /// Cost at a single point.
    pub(crate) fn point(&mut self, point: &[f64]) -> Result<f64> {
        let costs = self.call(point, 1)?;
        Ok(costs[0])
    }

    /// Costs at `plus` and `minus`.
    pub(crate) fn pair(&mut self, plus: &[f64], minus: &[f64]) -> Result<(f64, f64)> {
        match self.mode {
            EvaluationMode::Single => Ok((self.point(plus)?, self.point(minus)?)),
            EvaluationMode::Paired => {
                let mut joined = std::mem::take(&mut self.scratch);
                joined.clear();
                joined.extend_from_slice(plus);
                joined.extend_from_slice(minus);
                let costs = self.call(&joined, 2);
                self.scratch = joined;
                let costs = costs?;
                Ok((costs[0], costs[1]))
            }
        }
    }

    fn call(&mut self, points: &[f64], expected: usize) -> Result<Vec<f64>> {
        let costs = self
            .objective
            .evaluate(points)
            .map_err(SpsaError::Objective)?;
        if costs.len() != expected {
            return Err(SpsaError::ObjectiveArity {
                expected,
                got: costs.len(),
            });
        }
        Ok(costs)
    }
}
