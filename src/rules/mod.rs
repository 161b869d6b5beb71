//! Rule engine - compiles threshold rules into evaluable matchers.

mod compiled;
mod validity;

pub use compiled::CompiledRule;
pub use validity::ValidityExpr;

use std::fmt;

use crate::config::ConfigError;

/// The recognized rule names.
///
/// `Length` is a minimum overall length. The others are minimum counts
/// of characters from the rule's class anywhere in the password, not
/// necessarily contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleName {
    Length,
    Number,
    Upper,
    Lower,
    Special,
}

impl RuleName {
    /// Canonical compile order. Presentational only; neither validity
    /// nor scoring depends on it.
    pub const ALL: [RuleName; 5] = [
        RuleName::Length,
        RuleName::Number,
        RuleName::Upper,
        RuleName::Lower,
        RuleName::Special,
    ];

    /// The configuration key for this rule.
    pub fn key(self) -> &'static str {
        match self {
            RuleName::Length => "length",
            RuleName::Number => "number",
            RuleName::Upper => "upper",
            RuleName::Lower => "lower",
            RuleName::Special => "special",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A validated rule: a recognized name plus a positive threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: RuleName,
    pub threshold: u32,
}

/// Compiles a validated rule set into per-rule matchers.
pub(crate) fn compile_rules(specs: &[RuleSpec]) -> Result<Vec<CompiledRule>, ConfigError> {
    specs.iter().map(|spec| CompiledRule::compile(*spec)).collect()
}
