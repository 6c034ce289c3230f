//! Email template build helper.
//!
//! Takes an HTML document with embedded and/or externally linked stylesheets
//! and produces a single HTML document with all CSS rules folded into `style`
//! attributes, which is what most email clients require. Optional collaborators
//! can dispatch the built HTML as a test email (SMTP) or submit it to the
//! Litmus rendering-verification service.

pub mod builder;
pub mod config;
pub mod inliner;
pub mod litmus;
pub mod mailer;

// Re-exports for public API
pub use builder::{BuildJob, BuildReport, EmailBuilder};
pub use config::{BuildConfig, BuildConfigBuilder, EmailTestConfig, LitmusConfig, ParseOptions};
pub use inliner::{BuildError, InlineResult, Source, inline_css};
pub use litmus::LitmusClient;
pub use mailer::{DispatchOutcome, Mailer};
