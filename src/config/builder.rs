//! Fluent builder for `BuildConfig`
//!
//! All fields have defaults, so the builder can be finished at any point.

use std::path::Path;

use super::types::{BuildConfig, EmailTestConfig, LitmusConfig, ParseOptions};

#[derive(Debug, Clone, Default)]
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

impl BuildConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape non-ASCII characters in the final output.
    #[must_use]
    pub fn encode_special_chars(mut self, enabled: bool) -> Self {
        self.config.encode_special_chars = enabled;
        self
    }

    /// CSS appended after all extracted CSS; wins ties at equal specificity.
    #[must_use]
    pub fn extra_css(mut self, css: impl Into<String>) -> Self {
        self.config.extra_css = css.into();
        self
    }

    /// Base for resolving external stylesheets: a directory or an http(s) URL.
    #[must_use]
    pub fn relative_path(mut self, base: impl Into<String>) -> Self {
        self.config.relative_path = Some(base.into());
        self
    }

    /// Convenience for directory bases held as paths.
    #[must_use]
    pub fn relative_dir(self, dir: impl AsRef<Path>) -> Self {
        self.relative_path(dir.as_ref().to_string_lossy().into_owned())
    }

    #[must_use]
    pub fn parse_options(mut self, parse: ParseOptions) -> Self {
        self.config.parse = parse;
        self
    }

    #[must_use]
    pub fn litmus(mut self, litmus: LitmusConfig) -> Self {
        self.config.litmus = Some(litmus);
        self
    }

    #[must_use]
    pub fn email_test(mut self, email_test: EmailTestConfig) -> Self {
        self.config.email_test = Some(email_test);
        self
    }

    #[must_use]
    pub fn build(self) -> BuildConfig {
        self.config
    }
}

impl BuildConfig {
    /// Start building a config with defaults.
    #[must_use]
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_off() {
        let config = BuildConfig::builder().build();
        assert!(!config.encode_special_chars());
        assert!(config.extra_css().is_empty());
        assert!(config.relative_path().is_none());
        assert!(config.litmus().is_none());
        assert!(config.email_test().is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let config = BuildConfig::builder()
            .encode_special_chars(true)
            .extra_css("p { color: blue; }")
            .relative_path("https://example.com/assets")
            .build();
        assert!(config.encode_special_chars());
        assert_eq!(config.extra_css(), "p { color: blue; }");
        assert_eq!(
            config.relative_path(),
            Some("https://example.com/assets")
        );
    }
}
