//! Validity expression - one combined matcher for "all rules pass".

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::{CompiledRule, RuleName};
use crate::config::ConfigError;

/// The combined validity matcher built from an instance's compiled rules.
///
/// The source pattern keeps the lookahead form: one `(?=..)` assertion
/// per count rule in compiled order, then the length rule's body with
/// its anchors stripped, and no outer anchors. Evaluation runs the
/// component matchers conjunctively, which agrees with the lookahead
/// reading for any single-line password: a character-class count over a
/// suffix never exceeds the count over the whole string, so only the
/// match at the start of the string matters.
#[derive(Debug, Clone)]
pub struct ValidityExpr {
    pattern: String,
    parts: Vec<Regex>,
    length: Option<Regex>,
}

impl ValidityExpr {
    /// Built once per instance, after rule compilation; never rebuilt.
    pub(crate) fn build(rules: &[CompiledRule]) -> Result<Self, ConfigError> {
        let mut pattern = String::new();
        let mut parts = Vec::new();
        let mut length = None;

        for rule in rules {
            if rule.name() == RuleName::Length {
                // The length body goes at the end of the combined source.
                let body = rule
                    .pattern()
                    .trim_start_matches('^')
                    .trim_end_matches('$')
                    .to_string();
                let regex = Regex::new(&body).map_err(|source| ConfigError::Pattern {
                    name: rule.name(),
                    threshold: rule.threshold(),
                    source,
                })?;
                length = Some((body, regex));
            } else {
                pattern.push_str("(?=");
                pattern.push_str(rule.pattern());
                pattern.push(')');
                parts.push(rule.regex().clone());
            }
        }

        let length = length.map(|(body, regex)| {
            pattern.push_str(&body);
            regex
        });

        Ok(Self {
            pattern,
            parts,
            length,
        })
    }

    /// The combined pattern source.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True iff every rule's matcher accepts the password.
    pub fn matches(&self, password: &SecretString) -> bool {
        let value = password.expose_secret();
        self.parts.iter().all(|part| part.is_match(value))
            && self.length.as_ref().is_none_or(|length| length.is_match(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSpec;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn build(specs: &[(RuleName, u32)]) -> ValidityExpr {
        let rules: Vec<CompiledRule> = specs
            .iter()
            .map(|&(name, threshold)| {
                CompiledRule::compile(RuleSpec { name, threshold }).expect("pattern compiles")
            })
            .collect();
        ValidityExpr::build(&rules).expect("expression builds")
    }

    #[test]
    fn lookaheads_come_first_and_the_length_body_last() {
        let expr = build(&[
            (RuleName::Length, 8),
            (RuleName::Number, 1),
            (RuleName::Upper, 1),
        ]);
        assert_eq!(expr.pattern(), "(?=(.*[0-9]){1})(?=(.*[A-Z]){1}).{8,}");
    }

    #[test]
    fn without_a_length_rule_there_is_no_minimum() {
        let expr = build(&[(RuleName::Lower, 1)]);
        assert_eq!(expr.pattern(), "(?=(.*[a-z]){1})");
        assert!(expr.matches(&secret("a")));
        assert!(!expr.matches(&secret("B")));
    }

    #[test]
    fn a_lone_length_rule_keeps_only_its_body() {
        let expr = build(&[(RuleName::Length, 8)]);
        assert_eq!(expr.pattern(), ".{8,}");
        assert!(expr.matches(&secret("12345678")));
        assert!(!expr.matches(&secret("1234567")));
    }

    #[test]
    fn all_components_must_accept() {
        let expr = build(&[
            (RuleName::Lower, 1),
            (RuleName::Upper, 1),
            (RuleName::Special, 1),
        ]);
        assert!(expr.matches(&secret("Night!1")));
        assert!(!expr.matches(&secret("night!1")));
        assert!(!expr.matches(&secret("NIGHT!1")));
        assert!(!expr.matches(&secret("Night1")));
    }

    #[test]
    fn length_and_counts_combine() {
        let expr = build(&[
            (RuleName::Length, 8),
            (RuleName::Number, 1),
            (RuleName::Upper, 1),
        ]);
        assert!(expr.matches(&secret("Nightwatch1")));
        assert!(!expr.matches(&secret("1NIGHT1")));
        assert!(!expr.matches(&secret("nightwatch1")));
    }
}
