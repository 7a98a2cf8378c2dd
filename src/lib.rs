//! # elog-client
//!
//! Bootstrap for the logbook client: configuration loading, tracing setup,
//! dependency wiring, and the command-line driver.

pub mod adapters;
pub mod bootstrap;
pub mod cli;
