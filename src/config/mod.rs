//! Configuration for a build invocation
//!
//! This module provides the `BuildConfig` struct and its fluent builder.
//! A config is constructed once per invocation and never mutated mid-pipeline.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::BuildConfigBuilder;
pub use types::{BuildConfig, EmailTestConfig, LitmusConfig, ParseOptions};
