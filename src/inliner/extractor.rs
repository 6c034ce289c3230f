//! Style extraction
//!
//! Partitions `<style>` blocks into inline-eligible CSS and blocks that must
//! survive the pipeline untouched. Runs twice per pipeline invocation: once
//! on the acquired document and once after external stylesheets have been
//! embedded, so freshly spliced blocks are absorbed on the second pass.

use kuchiki::traits::TendrilSink;

use super::attr::{self, EMBED_ATTR, EMBED_IGNORE_ATTR, INLINE_IGNORE_ATTR};
use super::errors::InlineResult;
use crate::config::ParseOptions;

/// Output of one extraction pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Inline-eligible CSS, concatenated in document order.
    pub css: String,
    /// The document with inline-eligible `<style>` blocks removed and
    /// preserved blocks stamped with the embedded marker.
    pub html: String,
}

/// Extract inline-eligible CSS from `html`.
///
/// A `<style>` without an opt-out marker contributes its text to the CSS
/// accumulator and is removed from the tree. A marked block stays in place
/// and is stamped `data-embed="true"` so later passes recognize it: once a
/// block carries the embedded marker it is preserved verbatim for the rest
/// of the run.
pub fn extract(html: &str, _parse: &ParseOptions) -> InlineResult<Extraction> {
    // The resolver and the raw-text utilities only know the internal
    // spelling of the ignore attribute.
    let html = attr::rename_attr(html, EMBED_IGNORE_ATTR, INLINE_IGNORE_ATTR);

    let document = kuchiki::parse_html().one(html);
    let mut css = String::new();

    // Collect before iterating: detach() during iteration invalidates the
    // selection iterator.
    let matches: Vec<_> = document
        .select("style")
        .expect("BUG: hardcoded selector 'style' is invalid")
        .collect();

    for node_ref in matches {
        let preserved = {
            let attrs = node_ref.attributes.borrow();
            attrs.contains(EMBED_ATTR) || attrs.contains(INLINE_IGNORE_ATTR)
        };

        if preserved {
            node_ref
                .attributes
                .borrow_mut()
                .insert(EMBED_ATTR, "true".to_string());
        } else {
            css.push_str(&node_ref.text_contents());
            node_ref.as_node().detach();
        }
    }

    let mut out = Vec::new();
    document.serialize(&mut out)?;
    let serialized = String::from_utf8(out)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    // Serialization gives boolean attributes an empty value; downstream
    // raw-text detection expects the valueless form.
    let html = attr::strip_empty_attr_value(&serialized, INLINE_IGNORE_ATTR);

    log::debug!(
        "Extraction pass collected {} bytes of inline-eligible CSS",
        css.len()
    );

    Ok(Extraction { css, html })
}
