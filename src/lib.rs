//! Rule-based password strength meter.
//!
//! Binds an evaluation engine to host-provided password inputs. Each
//! engine compiles a configurable rule set (minimum length and minimum
//! counts of uppercase, lowercase, numeric and special characters) into
//! per-rule matchers plus one combined validity matcher, derives a
//! strength score (0-4), a display label and an overall validity flag,
//! and emits a typed notification for every derived dimension that
//! actually changed on an input mutation.
//!
//! Host platform glue (element selection syntax, listener registration)
//! stays behind the narrow traits in [`host`]; an in-memory
//! implementation ships in [`host::memory`] for tests and non-browser
//! embedding. Scoring can delegate to an injected external estimator
//! and falls back to the proportion of passing rules.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use pwd_meter::host::memory::{MemoryDocument, MemoryInput};
//! use pwd_meter::{MeterOptions, Registry};
//!
//! let document = Rc::new(MemoryDocument::new());
//! document.add(MemoryInput::new("#password", true));
//!
//! let options = MeterOptions::new()
//!     .rule("length", 8)
//!     .rule("upper", 1)
//!     .labels(["Very weak", "Weak", "Fair", "Strong", "Very strong"]);
//! let mut registry = Registry::setup(document, options).expect("valid options");
//!
//! let meter = registry.resolve("#password").expect("a bound input");
//! meter.borrow_mut().subscribe(|event| println!("{event:?}"));
//! meter.borrow_mut().on_input("Nightwatch");
//!
//! assert!(meter.borrow().is_valid());
//! assert_eq!(meter.borrow().score().value(), 4);
//! assert_eq!(meter.borrow().label(), Some("Very strong"));
//! ```

// Internal modules
mod config;
mod events;
pub mod host;
mod instance;
mod registry;
mod rules;
mod score;

// Public API
pub use config::{ConfigError, MeterOptions};
pub use events::{EventKind, MeterEvent, RuleChange};
pub use instance::MeterInstance;
pub use registry::{InstanceHandle, Registry, Selector};
pub use rules::{CompiledRule, RuleName, RuleSpec, ValidityExpr};
pub use score::{EstimatorError, Score, StrengthEstimator};
