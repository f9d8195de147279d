//! Utilities the HiveMind container is built on, usable on their own:
//!
//! - [`Orderer`] - deterministic topological ordering of named items with
//!   precede/follow constraints and `*` wildcards
//! - [`StrategyRegistry`] - handler lookup over an explicit type graph with
//!   per-subject caching

mod order;
mod strategy;

pub use order::Orderer;
pub use strategy::{StrategyError, StrategyRegistry, TypeEntry};
