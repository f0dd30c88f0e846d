//! Inbound events and the context they are processed in.

pub mod context;
pub mod payload;

pub use context::EventContext;
pub use payload::{Comment, Issue, Label, Payload, Repository, User, UserType};
