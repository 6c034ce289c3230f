//! Read accessors for `BuildConfig`

use super::types::{BuildConfig, EmailTestConfig, LitmusConfig, ParseOptions};

impl BuildConfig {
    #[must_use]
    pub fn encode_special_chars(&self) -> bool {
        self.encode_special_chars
    }

    #[must_use]
    pub fn extra_css(&self) -> &str {
        &self.extra_css
    }

    #[must_use]
    pub fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    #[must_use]
    pub fn parse(&self) -> &ParseOptions {
        &self.parse
    }

    #[must_use]
    pub fn litmus(&self) -> Option<&LitmusConfig> {
        self.litmus.as_ref()
    }

    #[must_use]
    pub fn email_test(&self) -> Option<&EmailTestConfig> {
        self.email_test.as_ref()
    }
}
