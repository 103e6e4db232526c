//! Operator and traveler query surface over the stores.

pub mod engine;

pub use engine::{AccountHistory, OperatorQueryEngine};
