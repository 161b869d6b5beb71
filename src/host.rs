//! Host seams - the narrow traits the engine needs from its platform.

use std::rc::Rc;

/// A host-owned password input an engine instance can be bound to.
///
/// The engine never owns the element. It reads the current content
/// through this trait and leaves listener registration, selection syntax
/// and rendering to the host glue.
pub trait PasswordInput {
    /// The input's current content.
    fn value(&self) -> String;

    /// Whether the element opted in via the binding marker.
    fn is_marked(&self) -> bool;

    /// Whether the element matches a host query string.
    fn matches_query(&self, query: &str) -> bool;
}

pub type InputHandle = Rc<dyn PasswordInput>;

/// The host document, consulted by bulk setup and lazy lookup.
pub trait Document {
    /// Every element matching the query, marked or not.
    fn query_all(&self, query: &str) -> Vec<InputHandle>;

    /// Every element currently carrying the binding marker.
    fn marked_inputs(&self) -> Vec<InputHandle>;
}

/// In-memory host types for tests, examples and non-browser embedding.
pub mod memory {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{Document, InputHandle, PasswordInput};

    /// A fake input identified by a query id such as `"#password"`.
    pub struct MemoryInput {
        id: String,
        marked: bool,
        value: RefCell<String>,
    }

    impl MemoryInput {
        pub fn new(id: &str, marked: bool) -> Rc<Self> {
            Rc::new(Self {
                id: id.to_string(),
                marked,
                value: RefCell::new(String::new()),
            })
        }

        pub fn id(&self) -> &str {
            &self.id
        }

        pub fn set_value(&self, value: &str) {
            *self.value.borrow_mut() = value.to_string();
        }
    }

    impl PasswordInput for MemoryInput {
        fn value(&self) -> String {
            self.value.borrow().clone()
        }

        fn is_marked(&self) -> bool {
            self.marked
        }

        fn matches_query(&self, query: &str) -> bool {
            self.id == query
        }
    }

    /// A fake document; inputs can be added while the page is "live".
    #[derive(Default)]
    pub struct MemoryDocument {
        inputs: RefCell<Vec<Rc<MemoryInput>>>,
    }

    impl MemoryDocument {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add(&self, input: Rc<MemoryInput>) {
            self.inputs.borrow_mut().push(input);
        }
    }

    impl Document for MemoryDocument {
        fn query_all(&self, query: &str) -> Vec<InputHandle> {
            self.inputs
                .borrow()
                .iter()
                .filter(|input| input.matches_query(query))
                .map(|input| Rc::clone(input) as InputHandle)
                .collect()
        }

        fn marked_inputs(&self) -> Vec<InputHandle> {
            self.inputs
                .borrow()
                .iter()
                .filter(|input| input.is_marked())
                .map(|input| Rc::clone(input) as InputHandle)
                .collect()
        }
    }
}
