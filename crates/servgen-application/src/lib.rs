//! Application Layer - servgen
//!
//! Resolution engine of the wiring generator: given the types and producer
//! declarations of one run, it computes a creation order, a unique
//! identifier for every produced value, and the expression that supplies
//! each value a consumer needs.
//!
//! ## Architecture
//!
//! The application layer:
//! - Schedules initiator producers into levels
//! - Assigns instance names, identifiers and per-type defaults
//! - Binds consumer requests to creator calls, instances or inline literals
//! - Performs no I/O; declarations arrive through the domain ports
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `servgen-domain`: catalog, producers, expressions and the error type
//! - `tracing` for resolution progress logs

pub mod resolution;
pub mod use_cases;

pub use resolution::*;
pub use use_cases::*;
