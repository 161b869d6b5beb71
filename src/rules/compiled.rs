//! Compiled rules - per-rule matchers with a cached pass state.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::{RuleName, RuleSpec};
use crate::config::ConfigError;

/// A rule compiled into a matcher, plus the last evaluated pass state.
///
/// The matcher is a pure function of the password. `is_passing` is
/// cached only so change detection can tell a flip from a no-op; it
/// starts as `None` so the first evaluation always registers as a
/// change.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    spec: RuleSpec,
    pattern: String,
    regex: Regex,
    is_passing: Option<bool>,
}

impl CompiledRule {
    pub(crate) fn compile(spec: RuleSpec) -> Result<Self, ConfigError> {
        let pattern = match spec.name {
            RuleName::Length => format!("^.{{{},}}$", spec.threshold),
            RuleName::Number => format!("(.*[0-9]){{{}}}", spec.threshold),
            RuleName::Upper => format!("(.*[A-Z]){{{}}}", spec.threshold),
            RuleName::Lower => format!("(.*[a-z]){{{}}}", spec.threshold),
            RuleName::Special => format!(r"(.*[_\W]){{{}}}", spec.threshold),
        };
        let regex = Regex::new(&pattern).map_err(|source| ConfigError::Pattern {
            name: spec.name,
            threshold: spec.threshold,
            source,
        })?;
        Ok(Self {
            spec,
            pattern,
            regex,
            is_passing: None,
        })
    }

    pub fn name(&self) -> RuleName {
        self.spec.name
    }

    pub fn threshold(&self) -> u32 {
        self.spec.threshold
    }

    /// The matcher source. Count rules match unanchored, so they read as
    /// "at least N such characters anywhere in the string".
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Last evaluated state; `None` until the first evaluation.
    pub fn is_passing(&self) -> Option<bool> {
        self.is_passing
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    fn matches(&self, password: &SecretString) -> bool {
        self.regex.is_match(password.expose_secret())
    }

    /// Re-evaluates against `password`. Returns the new state when the
    /// cached state flipped, `None` when nothing changed.
    pub(crate) fn update(&mut self, password: &SecretString) -> Option<bool> {
        let was = self.is_passing;
        let now = self.matches(password);
        self.is_passing = Some(now);
        (was != Some(now)).then_some(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn compile(name: RuleName, threshold: u32) -> CompiledRule {
        CompiledRule::compile(RuleSpec { name, threshold }).expect("pattern compiles")
    }

    #[test]
    fn length_pattern_is_anchored() {
        assert_eq!(compile(RuleName::Length, 8).pattern(), "^.{8,}$");
    }

    #[test]
    fn length_counts_the_whole_string() {
        let mut rule = compile(RuleName::Length, 8);
        assert_eq!(rule.update(&secret("1234567")), Some(false));
        assert_eq!(rule.update(&secret("12345678")), Some(true));
    }

    #[test]
    fn count_rules_match_anywhere() {
        let mut rule = compile(RuleName::Number, 2);
        assert_eq!(rule.update(&secret("a1b2c")), Some(true));
        assert_eq!(rule.update(&secret("a1bc")), Some(false));
    }

    #[test]
    fn special_counts_underscores_and_symbols() {
        let mut rule = compile(RuleName::Special, 2);
        assert_eq!(rule.update(&secret("a_b!")), Some(true));
        assert_eq!(rule.update(&secret("ab!")), Some(false));
    }

    #[test]
    fn first_evaluation_always_registers_as_a_change() {
        let mut rule = compile(RuleName::Lower, 1);
        assert_eq!(rule.is_passing(), None);
        assert_eq!(rule.update(&secret("ABC")), Some(false));
    }

    #[test]
    fn unchanged_state_reports_no_flip() {
        let mut rule = compile(RuleName::Upper, 1);
        assert_eq!(rule.update(&secret("Night")), Some(true));
        assert_eq!(rule.update(&secret("Watch")), None);
        assert_eq!(rule.update(&secret("watch")), Some(false));
    }

    #[test]
    fn oversized_threshold_is_a_config_error() {
        let result = CompiledRule::compile(RuleSpec {
            name: RuleName::Number,
            threshold: 1_000_000,
        });
        assert!(matches!(result, Err(ConfigError::Pattern { .. })));
    }
}
