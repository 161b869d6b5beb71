//! Change notifications - immutable event records and per-instance dispatch.

use crate::rules::RuleName;
use crate::score::Score;

/// One rule whose pass state flipped during an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleChange {
    pub name: RuleName,
    pub is_passing: bool,
}

/// A notification for one derived dimension that actually changed.
///
/// Records are freshly constructed per emission and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeterEvent {
    RuleMatchChange { changed: Vec<RuleChange> },
    ScoreChange { score: Score },
    LabelChange { label: String },
    ValidityChange { is_valid: bool },
}

impl MeterEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MeterEvent::RuleMatchChange { .. } => EventKind::RuleMatch,
            MeterEvent::ScoreChange { .. } => EventKind::Score,
            MeterEvent::LabelChange { .. } => EventKind::Label,
            MeterEvent::ValidityChange { .. } => EventKind::Validity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RuleMatch,
    Score,
    Label,
    Validity,
}

type Callback = Box<dyn Fn(&MeterEvent)>;

/// Listener registry for one bound instance.
///
/// Delivery is synchronous and fire-and-forget, in subscription order.
/// There is no unsubscription; instances live for the host page
/// lifetime.
pub(crate) struct Dispatcher {
    listeners: Vec<(Option<EventKind>, Callback)>,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, callback: impl Fn(&MeterEvent) + 'static) {
        self.listeners.push((None, Box::new(callback)));
    }

    pub(crate) fn subscribe_kind(
        &mut self,
        kind: EventKind,
        callback: impl Fn(&MeterEvent) + 'static,
    ) {
        self.listeners.push((Some(kind), Box::new(callback)));
    }

    pub(crate) fn emit(&self, event: &MeterEvent) {
        for (filter, callback) in &self.listeners {
            if filter.is_none_or(|kind| kind == event.kind()) {
                callback(event);
            }
        }
    }
}
