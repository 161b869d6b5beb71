//! Scoring strategy - external estimator first, rule proportion fallback.

use std::fmt;

use secrecy::SecretString;
use thiserror::Error;

use crate::rules::CompiledRule;

/// A strength rating in `0..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(0);
    pub const MAX: Score = Score(4);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = EstimatorError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=4).contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(EstimatorError::OutOfRange(value))
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("estimator failed: {0}")]
    Failed(String),
    #[error("estimator score {0} is outside 0-4")]
    OutOfRange(i64),
}

/// An injected strength estimator, consulted before the rule fallback.
///
/// Implemented for any `Fn(&SecretString) -> Result<Score, EstimatorError>`
/// closure. Absence and failure are both normal states; the engine falls
/// back to rule-proportion scoring and never surfaces the error.
pub trait StrengthEstimator {
    fn estimate(&self, password: &SecretString) -> Result<Score, EstimatorError>;
}

impl<F> StrengthEstimator for F
where
    F: Fn(&SecretString) -> Result<Score, EstimatorError>,
{
    fn estimate(&self, password: &SecretString) -> Result<Score, EstimatorError> {
        self(password)
    }
}

/// Scores the current password.
///
/// An available estimator wins unconditionally. When it is absent or
/// errs, the score is `floor(passing / total * 4)` over the just-updated
/// rule states. Validated configurations always carry at least one rule,
/// so the proportion is well defined.
pub(crate) fn compute_score(
    password: &SecretString,
    rules: &[CompiledRule],
    estimator: Option<&dyn StrengthEstimator>,
) -> Score {
    if let Some(estimator) = estimator {
        match estimator.estimate(password) {
            Ok(score) => return score,
            Err(err) => {
                tracing::debug!("estimator unavailable, scoring by rules: {err}");
            }
        }
    }

    let passing = rules
        .iter()
        .filter(|rule| rule.is_passing() == Some(true))
        .count();
    Score((passing * 4 / rules.len()) as u8)
}
