//! Attribute utilities for control-attribute handling
//!
//! Stateless rewrites of serialized HTML text. They run before and after DOM
//! round-trips, so they must not depend on a particular parser's
//! serialization quirks, and reapplying any of them to already-clean HTML is
//! a no-op.

use regex::Regex;

/// Opt-out on a `<style>`: keep the block embedded, do not inline its rules.
pub const EMBED_ATTR: &str = "data-embed";

/// Opt-out on a `<style>` or `<link>`: do not inline or embed at all.
pub const EMBED_IGNORE_ATTR: &str = "data-embed-ignore";

/// Internal resolver-facing spelling of [`EMBED_IGNORE_ATTR`]. Must never
/// leak into final output.
pub const INLINE_IGNORE_ATTR: &str = "data-inline-ignore";

/// Rewrite empty-valued occurrences of `attr` (`attr=""` or `attr=''`) to the
/// valueless boolean form.
///
/// DOM serialization forces an empty-string value onto boolean attributes,
/// which a later raw-text match on the valueless form would miss.
#[must_use]
pub fn strip_empty_attr_value(html: &str, attr: &str) -> String {
    let pattern = format!(r#"(\b{}\b)(?:=["']\s*["'])?"#, regex::escape(attr));
    let re = Regex::new(&pattern)
        .expect("BUG: escaped attribute name produced an invalid regex");
    re.replace_all(html, "$1").into_owned()
}

/// Pure textual rename of `from` to `to` across the whole document.
///
/// Used to translate the externally facing opt-out attribute into the
/// pipeline's internal marker name before the DOM-based stages, and back
/// afterward.
#[must_use]
pub fn rename_attr(html: &str, from: &str, to: &str) -> String {
    let pattern = format!(r"\b{}\b", regex::escape(from));
    let re = Regex::new(&pattern)
        .expect("BUG: escaped attribute name produced an invalid regex");
    re.replace_all(html, to).into_owned()
}

/// Remove `attr` (with or without a value) from every element.
///
/// The trailing delimiter capture keeps `data-embed` from eating the prefix
/// of `data-embed-ignore`.
#[must_use]
pub fn strip_attr(html: &str, attr: &str) -> String {
    let pattern = format!(
        r#"\s+{}(?:=["'][^"']*["'])?([\s>/])"#,
        regex::escape(attr)
    );
    let re = Regex::new(&pattern)
        .expect("BUG: escaped attribute name produced an invalid regex");
    re.replace_all(html, "$1").into_owned()
}
