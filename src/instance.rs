//! Engine instance - per-input state and the change-detection pipeline.

use std::rc::Rc;

use secrecy::SecretString;

use crate::config::{ConfigError, MeterConfig};
use crate::events::{Dispatcher, EventKind, MeterEvent, RuleChange};
use crate::host::InputHandle;
use crate::rules::{compile_rules, CompiledRule, ValidityExpr};
use crate::score::{compute_score, Score};

/// One engine bound to one input.
///
/// Owns the value mirror and every derived dimension: per-rule pass
/// states, score, label and overall validity. Each input mutation runs
/// the pipeline to completion and emits one notification per dimension
/// that actually changed, in a fixed order: rules, score, label,
/// validity. The label check must follow the score check because it
/// reads the just-updated score.
pub struct MeterInstance {
    input: InputHandle,
    password: SecretString,
    rules: Vec<CompiledRule>,
    validity: ValidityExpr,
    score: Score,
    label: Option<String>,
    is_valid: bool,
    config: Rc<MeterConfig>,
    dispatcher: Dispatcher,
}

impl MeterInstance {
    /// Compiles the rule set and runs the first evaluation, so a fresh
    /// instance is immediately consistent with its input's content.
    pub(crate) fn bind(input: InputHandle, config: Rc<MeterConfig>) -> Result<Self, ConfigError> {
        let rules = compile_rules(&config.rules)?;
        let validity = ValidityExpr::build(&rules)?;
        let mut instance = Self {
            password: SecretString::from(input.value()),
            input,
            rules,
            validity,
            score: Score::MIN,
            label: config
                .labels
                .as_ref()
                .map(|labels| labels.get(Score::MIN).to_string()),
            is_valid: false,
            config,
            dispatcher: Dispatcher::new(),
        };
        instance.evaluate();
        Ok(instance)
    }

    /// Feeds a new password value through the pipeline.
    pub fn on_input(&mut self, value: &str) {
        self.password = SecretString::from(value.to_string());
        self.evaluate();
    }

    /// Re-reads the bound input's current content through the pipeline.
    pub fn refresh(&mut self) {
        let value = self.input.value();
        self.on_input(&value);
    }

    pub fn subscribe(&mut self, callback: impl Fn(&MeterEvent) + 'static) {
        self.dispatcher.subscribe(callback);
    }

    pub fn subscribe_kind(&mut self, kind: EventKind, callback: impl Fn(&MeterEvent) + 'static) {
        self.dispatcher.subscribe_kind(kind, callback);
    }

    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// The compiled rules, in compile order, with their current states.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// The label for the current score; `None` when no labels were
    /// configured.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The combined validity matcher.
    pub fn validity(&self) -> &ValidityExpr {
        &self.validity
    }

    fn evaluate(&mut self) {
        self.check_rules();
        self.check_score();
        self.check_label();
        self.check_validity();
    }

    fn check_rules(&mut self) {
        let mut changed = Vec::new();
        for rule in &mut self.rules {
            if let Some(is_passing) = rule.update(&self.password) {
                changed.push(RuleChange {
                    name: rule.name(),
                    is_passing,
                });
            }
        }
        if !changed.is_empty() {
            self.dispatcher.emit(&MeterEvent::RuleMatchChange { changed });
        }
    }

    fn check_score(&mut self) {
        let score = compute_score(&self.password, &self.rules, self.config.estimator.as_deref());
        if score != self.score {
            self.score = score;
            self.dispatcher.emit(&MeterEvent::ScoreChange { score });
        }
    }

    fn check_label(&mut self) {
        let Some(labels) = &self.config.labels else {
            return;
        };
        let label = labels.get(self.score);
        if self.label.as_deref() != Some(label) {
            let label = label.to_string();
            self.label = Some(label.clone());
            self.dispatcher.emit(&MeterEvent::LabelChange { label });
        }
    }

    fn check_validity(&mut self) {
        let is_valid = self.validity.matches(&self.password);
        if is_valid != self.is_valid {
            self.is_valid = is_valid;
            self.dispatcher.emit(&MeterEvent::ValidityChange { is_valid });
        }
    }
}
