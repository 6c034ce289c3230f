//! Pipeline orchestrator
//!
//! Runs the strictly ordered stages: acquire, extract, embed externals,
//! extract again, normalize markers, combine CSS, apply the cascade and
//! optionally encode. Each stage's output feeds the next; any failure aborts
//! the remaining stages.

use super::attr::{self, EMBED_ATTR, EMBED_IGNORE_ATTR, INLINE_IGNORE_ATTR};
use super::errors::{BuildError, InlineResult};
use super::resolver::StyleBase;
use super::source::Source;
use super::{encode, extractor, resolver};
use crate::config::BuildConfig;

/// Inline all CSS of `source` and return the final HTML bytes.
///
/// Preconditions are validated synchronously, before any I/O is scheduled:
/// a non-file source with no configured `relative_path` fails immediately
/// with [`BuildError::Configuration`].
pub async fn inline_css(source: &Source, config: &BuildConfig) -> InlineResult<Vec<u8>> {
    // Fail fast: determine the resolution base before touching any I/O.
    let base = match (config.relative_path(), source.parent_dir()) {
        (Some(raw), _) => StyleBase::parse(raw)?,
        (None, Some(dir)) => StyleBase::Dir(dir.to_path_buf()),
        (None, None) => {
            return Err(BuildError::Configuration(
                "relative_path must be set when the source is not a file path".to_string(),
            ));
        }
    };

    // Acquire
    let html = source.acquire().await?;

    // Extract (pass 1): inline-eligible CSS out, preserved blocks stamped
    let first = extractor::extract(&html, config.parse())?;

    // Resolve: splice external stylesheets in as plain <style> elements
    let embedded = resolver::embed(&first.html, &base).await?;

    // Extract (pass 2): absorb the freshly embedded stylesheets
    let second = extractor::extract(&embedded, config.parse())?;

    // Normalize markers: the embedded stamp goes away entirely, the ignore
    // attribute gets its external spelling back.
    let html = attr::strip_attr(&second.html, EMBED_ATTR);
    let html = attr::rename_attr(&html, INLINE_IGNORE_ATTR, EMBED_IGNORE_ATTR);
    let html = attr::strip_empty_attr_value(&html, EMBED_IGNORE_ATTR);

    // Combine: pass-1 CSS, then pass-2 CSS, then caller-supplied extra CSS.
    // This order is the tie-break at equal specificity.
    let mut css = first.css;
    css.push_str(&second.css);
    css.push_str(config.extra_css());

    // Apply: hand the document and the combined CSS to the cascade
    // capability. Remaining <style>/<link> blocks are the preserved ones and
    // must come through untouched.
    let options = css_inline::InlineOptions {
        inline_style_tags: false,
        keep_style_tags: true,
        keep_link_tags: true,
        load_remote_stylesheets: false,
        extra_css: Some(css.into()),
        preallocate_node_capacity: config.parse().node_capacity_hint,
        ..css_inline::InlineOptions::default()
    };
    let inliner = css_inline::CSSInliner::new(options);
    let inlined = inliner.inline(&html)?;

    // The cascade stage serializes boolean attributes back to the
    // empty-value form; restore the valueless spelling of the opt-out.
    let inlined = attr::strip_empty_attr_value(&inlined, EMBED_IGNORE_ATTR);

    // Optional encode
    if config.encode_special_chars() {
        Ok(encode::encode_bytes(inlined.as_bytes()))
    } else {
        Ok(inlined.into_bytes())
    }
}
