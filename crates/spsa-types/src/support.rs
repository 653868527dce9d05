//! Capability declarations: which problem inputs an optimizer consumes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, SpsaError};
use crate::problem::Problem;

/// How an optimizer treats one optional problem input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    /// Supplying the input is an error.
    NotSupported,
    /// The input is accepted and then disregarded.
    Ignored,
    /// The input is used when present.
    Supported,
    /// The input must be present.
    Required,
}

impl std::fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotSupported => "not_supported",
            Self::Ignored => "ignored",
            Self::Supported => "supported",
            Self::Required => "required",
        };
        write!(f, "{s}")
    }
}

/// Support levels for the gradient, variable bounds and initial point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportLevels {
    pub gradient: SupportLevel,
    pub bounds: SupportLevel,
    pub initial_point: SupportLevel,
}

impl SupportLevels {
    /// Check a problem against these levels before any evaluation happens.
    pub fn check(&self, problem: &Problem) -> Result<()> {
        if problem.num_vars == 0 {
            return Err(SpsaError::Validation(
                "num_vars must be at least 1".to_string(),
            ));
        }

        check_input(
            "gradient",
            self.gradient,
            problem.gradient.is_some(),
            SpsaError::MissingGradient,
        )?;
        check_input(
            "variable bounds",
            self.bounds,
            problem.variable_bounds.is_some(),
            SpsaError::MissingBounds,
        )?;
        check_input(
            "initial point",
            self.initial_point,
            problem.initial_point.is_some(),
            SpsaError::MissingInitialPoint,
        )?;

        if let Some(point) = &problem.initial_point {
            if point.len() != problem.num_vars {
                return Err(SpsaError::DimensionMismatch {
                    what: "initial point",
                    expected: problem.num_vars,
                    got: point.len(),
                });
            }
        }
        if let Some(bounds) = &problem.variable_bounds {
            if bounds.len() != problem.num_vars {
                return Err(SpsaError::DimensionMismatch {
                    what: "variable bounds",
                    expected: problem.num_vars,
                    got: bounds.len(),
                });
            }
        }

        Ok(())
    }
}

fn check_input(
    name: &'static str,
    level: SupportLevel,
    supplied: bool,
    missing: SpsaError,
) -> Result<()> {
    match (level, supplied) {
        (SupportLevel::Required, false) => Err(missing),
        (SupportLevel::NotSupported, true) => Err(SpsaError::Unsupported(name)),
        (SupportLevel::Ignored, true) => {
            debug!("{} supplied but ignored by this optimizer", name);
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::VariableBound;

    fn spsa_levels() -> SupportLevels {
        SupportLevels {
            gradient: SupportLevel::Ignored,
            bounds: SupportLevel::Ignored,
            initial_point: SupportLevel::Required,
        }
    }

    #[test]
    fn missing_required_initial_point_is_rejected() {
        let problem = Problem::new(2);
        let err = spsa_levels().check(&problem).unwrap_err();
        assert!(matches!(err, SpsaError::MissingInitialPoint));
    }

    #[test]
    fn ignored_inputs_are_accepted() {
        let problem = Problem::new(2)
            .with_initial_point(vec![0.0, 0.0])
            .with_bounds(vec![VariableBound::new(Some(-1.0), Some(1.0)); 2])
            .with_gradient(Box::new(|x: &[f64]| x.to_vec()));
        assert!(spsa_levels().check(&problem).is_ok());
    }

    #[test]
    fn not_supported_input_is_rejected() {
        let levels = SupportLevels {
            bounds: SupportLevel::NotSupported,
            ..spsa_levels()
        };
        let problem = Problem::new(1)
            .with_initial_point(vec![0.0])
            .with_bounds(vec![VariableBound::unbounded()]);
        let err = levels.check(&problem).unwrap_err();
        assert!(matches!(err, SpsaError::Unsupported("variable bounds")));
    }

    #[test]
    fn initial_point_length_must_match() {
        let problem = Problem::new(3).with_initial_point(vec![1.0, 2.0]);
        match spsa_levels().check(&problem) {
            Err(SpsaError::DimensionMismatch {
                expected, got, ..
            }) => {
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn zero_variables_is_invalid() {
        let problem = Problem::new(0).with_initial_point(Vec::new());
        assert!(matches!(
            spsa_levels().check(&problem),
            Err(SpsaError::Validation(_))
        ));
    }

    #[test]
    fn support_level_serializes_snake_case() {
        let json = serde_json::to_string(&SupportLevel::NotSupported).unwrap();
        assert_eq!(json, "\"not_supported\"");
    }
}
