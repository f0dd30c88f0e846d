//! Bounty agent: event binding and dispatch for repository automation.

pub mod commands;
pub mod config;
pub mod error;
pub mod event;
pub mod github;
pub mod pipeline;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;
