//! Event processing pipeline.
//!
//! Every inbound event flows through:
//! 1. the admission gate (allowed action kinds)
//! 2. `ConfigLoader::load()` for a per-event configuration snapshot
//! 3. payload schema validation
//! 4. `SkipPolicy::evaluate()`
//! 5. the processor for the action kind: `pre`, `action`, then `post`
//!    handlers, strictly in order

pub mod dispatcher;
pub mod skip;
pub mod types;

pub use dispatcher::{DEFAULT_ALLOWED_ACTIONS, DispatchOutcome, EventDispatcher};
pub use skip::{SkipDecision, SkipField, SkipPolicy, SkipRule, SkipRules};
pub use types::{ActionKind, Handler, ProcessorEntry, ProcessorRegistry, Stage};
