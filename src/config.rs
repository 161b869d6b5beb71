//! Setup options - validated into an immutable engine configuration.

use std::collections::BTreeMap;
use std::rc::Rc;

use thiserror::Error;

use crate::rules::{compile_rules, RuleName, RuleSpec};
use crate::score::{Score, StrengthEstimator};

/// Everything the setup entry point accepts.
///
/// `rules` maps rule names to thresholds; names other than `length`,
/// `upper`, `lower`, `number` and `special` are ignored. `labels`, when
/// present, must cover all five scores. The estimator is an optional
/// capability and its absence is a normal state.
#[derive(Clone, Default)]
pub struct MeterOptions {
    pub rules: BTreeMap<String, i64>,
    pub labels: Option<BTreeMap<u8, String>>,
    pub estimator: Option<Rc<dyn StrengthEstimator>>,
}

impl MeterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, name: &str, threshold: i64) -> Self {
        self.rules.insert(name.to_string(), threshold);
        self
    }

    pub fn labels(mut self, labels: [&str; 5]) -> Self {
        self.labels = Some(
            labels
                .iter()
                .enumerate()
                .map(|(score, label)| (score as u8, label.to_string()))
                .collect(),
        );
        self
    }

    pub fn estimator(mut self, estimator: impl StrengthEstimator + 'static) -> Self {
        self.estimator = Some(Rc::new(estimator));
        self
    }
}

/// Why a setup call was rejected.
///
/// Always recoverable: the caller fixes the options and retries, and
/// nothing gets bound in the meantime.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no usable rules: at least one of length, upper, lower, number or special needs a positive threshold")]
    NoUsableRules,
    #[error("threshold {threshold} for rule '{name}' is not a positive integer")]
    InvalidThreshold { name: RuleName, threshold: i64 },
    #[error("labels must provide exactly the score keys 0 through 4")]
    LabelKeys,
    #[error("label for score {0} is empty")]
    EmptyLabel(u8),
    #[error("rule '{name}' does not compile at threshold {threshold}")]
    Pattern {
        name: RuleName,
        threshold: u32,
        #[source]
        source: regex::Error,
    },
}

/// The label table, indexed by score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Labels([String; 5]);

impl Labels {
    pub(crate) fn get(&self, score: Score) -> &str {
        &self.0[score.value() as usize]
    }
}

/// A validated, immutable configuration shared by every bound instance.
pub(crate) struct MeterConfig {
    pub(crate) rules: Vec<RuleSpec>,
    pub(crate) labels: Option<Labels>,
    pub(crate) estimator: Option<Rc<dyn StrengthEstimator>>,
}

impl MeterConfig {
    pub(crate) fn from_options(options: &MeterOptions) -> Result<Self, ConfigError> {
        let labels = options.labels.as_ref().map(validate_labels).transpose()?;

        let mut rules = Vec::new();
        for name in RuleName::ALL {
            let Some(&threshold) = options.rules.get(name.key()) else {
                continue;
            };
            let Ok(threshold) = u32::try_from(threshold) else {
                return Err(ConfigError::InvalidThreshold { name, threshold });
            };
            // A zero threshold opts the rule out entirely; it is not
            // compiled as always-passing.
            if threshold == 0 {
                continue;
            }
            rules.push(RuleSpec { name, threshold });
        }
        if rules.is_empty() {
            return Err(ConfigError::NoUsableRules);
        }
        // Surfaces oversized thresholds here rather than at first binding.
        compile_rules(&rules)?;

        Ok(Self {
            rules,
            labels,
            estimator: options.estimator.clone(),
        })
    }
}

fn validate_labels(labels: &BTreeMap<u8, String>) -> Result<Labels, ConfigError> {
    let keys: Vec<u8> = labels.keys().copied().collect();
    if keys != [0, 1, 2, 3, 4] {
        return Err(ConfigError::LabelKeys);
    }
    let mut table: [String; 5] = Default::default();
    for (&score, label) in labels {
        if label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel(score));
        }
        table[score as usize] = label.clone();
    }
    Ok(Labels(table))
}
