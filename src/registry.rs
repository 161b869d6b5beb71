//! Instance registry - bulk setup and selector-based lookup.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{ConfigError, MeterConfig, MeterOptions};
use crate::host::{Document, InputHandle};
use crate::instance::MeterInstance;

/// Shared handle to a bound engine instance.
pub type InstanceHandle = Rc<RefCell<MeterInstance>>;

/// What a lookup may be keyed by: a host query string or a concrete
/// input handle.
pub enum Selector<'a> {
    Query(&'a str),
    Handle(&'a InputHandle),
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(query: &'a str) -> Self {
        Selector::Query(query)
    }
}

impl<'a> From<&'a InputHandle> for Selector<'a> {
    fn from(handle: &'a InputHandle) -> Self {
        Selector::Handle(handle)
    }
}

/// The set of bound instances for one document, plus the configuration
/// they share.
///
/// At most one instance exists per input; every lookup checks the
/// existing set before creating anything.
pub struct Registry {
    document: Rc<dyn Document>,
    config: Rc<MeterConfig>,
    instances: Vec<InstanceHandle>,
}

impl Registry {
    /// Bulk bootstrap: validates the options, then binds every input
    /// currently carrying the marker. A rejected configuration binds
    /// nothing, and whatever registry the caller had before stays
    /// untouched.
    pub fn setup(document: Rc<dyn Document>, options: MeterOptions) -> Result<Self, ConfigError> {
        let config = match MeterConfig::from_options(&options) {
            Ok(config) => Rc::new(config),
            Err(err) => {
                tracing::warn!("setup rejected: {err}");
                return Err(err);
            }
        };

        let mut registry = Self {
            document,
            config,
            instances: Vec::new(),
        };
        for input in registry.document.marked_inputs() {
            if let Err(err) = registry.bind(input) {
                tracing::warn!("setup rejected: {err}");
                return Err(err);
            }
        }
        Ok(registry)
    }

    /// Looks up the instance for `selector`, lazily binding it when the
    /// target exists and carries the marker. Every failure is reported
    /// on the warning channel and answered with `None`.
    pub fn resolve<'a>(&mut self, selector: impl Into<Selector<'a>>) -> Option<InstanceHandle> {
        match selector.into() {
            Selector::Query(query) => {
                if let Some(existing) = self.find_by_query(query) {
                    return Some(existing);
                }
                self.create_from_query(query)
            }
            Selector::Handle(handle) => {
                if let Some(existing) = self.find_by_identity(handle) {
                    return Some(existing);
                }
                self.create_from_handle(handle)
            }
        }
    }

    /// Read-only view of the bound instances, in binding order.
    pub fn instances(&self) -> &[InstanceHandle] {
        &self.instances
    }

    fn find_by_query(&self, query: &str) -> Option<InstanceHandle> {
        self.instances
            .iter()
            .find(|instance| instance.borrow().input().matches_query(query))
            .map(Rc::clone)
    }

    fn find_by_identity(&self, handle: &InputHandle) -> Option<InstanceHandle> {
        self.instances
            .iter()
            .find(|instance| same_input(instance.borrow().input(), handle))
            .map(Rc::clone)
    }

    fn create_from_query(&mut self, query: &str) -> Option<InstanceHandle> {
        let matches = self.document.query_all(query);
        if matches.is_empty() {
            tracing::warn!("selector {query:?} matched nothing");
            return None;
        }
        let Some(input) = matches.into_iter().find(|input| input.is_marked()) else {
            tracing::warn!("selector {query:?} matched no input carrying the binding marker");
            return None;
        };
        // The query may be an alias for an input that is already bound.
        if let Some(existing) = self.find_by_identity(&input) {
            return Some(existing);
        }
        self.try_bind(input)
    }

    fn create_from_handle(&mut self, handle: &InputHandle) -> Option<InstanceHandle> {
        if !handle.is_marked() {
            tracing::warn!("input does not carry the binding marker");
            return None;
        }
        self.try_bind(Rc::clone(handle))
    }

    fn try_bind(&mut self, input: InputHandle) -> Option<InstanceHandle> {
        match self.bind(input) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!("binding failed: {err}");
                None
            }
        }
    }

    fn bind(&mut self, input: InputHandle) -> Result<InstanceHandle, ConfigError> {
        let instance = MeterInstance::bind(input, Rc::clone(&self.config))?;
        let handle = Rc::new(RefCell::new(instance));
        self.instances.push(Rc::clone(&handle));
        Ok(handle)
    }
}

/// Identity, not equality; only the data pointer is compared.
fn same_input(a: &InputHandle, b: &InputHandle) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::host::memory::{MemoryDocument, MemoryInput};

    fn document(inputs: &[(&str, bool)]) -> Rc<MemoryDocument> {
        let document = Rc::new(MemoryDocument::new());
        for &(id, marked) in inputs {
            document.add(MemoryInput::new(id, marked));
        }
        document
    }

    fn options() -> MeterOptions {
        MeterOptions::new().rule("length", 8).rule("lower", 1)
    }

    #[test]
    fn setup_binds_every_marked_input() {
        let document = document(&[("#a", true), ("#b", true), ("#plain", false)]);
        let registry = Registry::setup(document, options()).unwrap();
        assert_eq!(registry.instances().len(), 2);
    }

    #[test]
    fn rejected_options_bind_nothing() {
        let document = document(&[("#a", true)]);
        let result = Registry::setup(document, MeterOptions::new());
        assert!(matches!(result, Err(ConfigError::NoUsableRules)));
    }

    #[test]
    fn resolve_by_query_returns_the_bound_instance() {
        let document = document(&[("#a", true), ("#b", true)]);
        let mut registry = Registry::setup(document, options()).unwrap();

        let first = registry.resolve("#a").unwrap();
        let again = registry.resolve("#a").unwrap();

        assert!(Rc::ptr_eq(&first, &again));
        assert_eq!(registry.instances().len(), 2);
    }

    #[test]
    fn resolve_by_handle_uses_identity() {
        let document = Rc::new(MemoryDocument::new());
        let input = MemoryInput::new("#a", true);
        document.add(Rc::clone(&input));
        let mut registry = Registry::setup(Rc::clone(&document) as Rc<dyn Document>, options()).unwrap();

        let handle: InputHandle = input;
        let resolved = registry.resolve(&handle).unwrap();

        assert!(same_input(resolved.borrow().input(), &handle));
        assert_eq!(registry.instances().len(), 1);
    }

    #[test]
    fn unknown_queries_resolve_to_nothing() {
        let document = document(&[("#a", true)]);
        let mut registry = Registry::setup(document, options()).unwrap();
        assert!(registry.resolve("#missing").is_none());
    }

    #[test]
    fn unmarked_inputs_are_refused() {
        let document = document(&[("#plain", false)]);
        let mut registry = Registry::setup(document, options()).unwrap();

        assert!(registry.resolve("#plain").is_none());

        let stray: InputHandle = MemoryInput::new("#stray", false);
        assert!(registry.resolve(&stray).is_none());
        assert!(registry.instances().is_empty());
    }

    #[test]
    fn inputs_added_after_setup_bind_lazily() {
        let document = document(&[("#a", true)]);
        let mut registry = Registry::setup(Rc::clone(&document) as Rc<dyn Document>, options()).unwrap();

        document.add(MemoryInput::new("#late", true));
        let late = registry.resolve("#late").unwrap();
        assert_eq!(registry.instances().len(), 2);

        let again = registry.resolve("#late").unwrap();
        assert!(Rc::ptr_eq(&late, &again));
        assert_eq!(registry.instances().len(), 2);
    }

    #[test]
    fn lazy_binding_runs_the_initial_evaluation() {
        let document = document(&[]);
        let mut registry = Registry::setup(Rc::clone(&document) as Rc<dyn Document>, options()).unwrap();

        let input = MemoryInput::new("#late", true);
        input.set_value("nightwatch");
        document.add(input);

        let meter = registry.resolve("#late").unwrap();
        assert!(meter.borrow().is_valid());
    }
}
