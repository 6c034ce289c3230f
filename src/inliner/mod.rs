//! CSS-inlining pipeline
//!
//! This module turns an HTML document with embedded and/or linked stylesheets
//! into a single document whose rules are folded into `style` attributes.
//! The stages run strictly downstream: acquisition, extraction, external
//! embedding, a second extraction, marker cleanup, cascade application and an
//! optional encoding pass.

// Sub-modules
pub mod attr;
pub mod encode;
pub mod errors;
pub mod extractor;
pub mod pipeline;
pub mod resolver;
pub mod source;

// Re-exports for public API
pub use errors::{BuildError, InlineResult};
pub use extractor::Extraction;
pub use pipeline::inline_css;
pub use resolver::StyleBase;
pub use source::Source;
