//! # Pure Data Module - Data Transfer Objects Only
//!
//! Configuration data structures and their TOML mapping. No validation and
//! no default-value policy lives here; wiring decides what an empty value means.

pub mod app_config;

pub use app_config::AppConfig;
