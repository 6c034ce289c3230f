//! External stylesheet resolution
//!
//! Locates stylesheet `<link>` tags that are not opted out, fetches each
//! referent relative to the base path, and splices the content in place as a
//! plain `<style>` element so the next extraction pass can absorb it.
//! Image references are never embedded. Any unreadable referent fails the
//! pipeline with a resolution error; there is no retry.

use std::path::PathBuf;

use futures::future::join_all;
use kuchiki::traits::TendrilSink;
use reqwest::Client;
use url::Url;

use super::attr::INLINE_IGNORE_ATTR;
use super::errors::{BuildError, InlineResult};

const STYLESHEET_LINK_SELECTOR: &str = r#"link[rel="stylesheet"]"#;

/// Base against which relative stylesheet references are resolved.
#[derive(Debug, Clone)]
pub enum StyleBase {
    /// Filesystem directory; referents are read with `tokio::fs`.
    Dir(PathBuf),
    /// http(s) URL prefix; referents are fetched with `reqwest`.
    Url(Url),
}

impl StyleBase {
    /// Classify a raw base string as a URL or a directory.
    pub fn parse(raw: &str) -> InlineResult<Self> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|e| BuildError::resolution(raw, e))?;
            Ok(StyleBase::Url(url))
        } else {
            Ok(StyleBase::Dir(PathBuf::from(raw)))
        }
    }
}

/// Embed every eligible external stylesheet of `html` relative to `base`.
///
/// Document order is preserved: fetches may run concurrently, but each
/// result is spliced back at the position of the `<link>` it replaces.
pub async fn embed(html: &str, base: &StyleBase) -> InlineResult<String> {
    let document = kuchiki::parse_html().one(html.to_string());

    // Collect before mutating: detach() during iteration invalidates the
    // selection iterator.
    let matches: Vec<_> = document
        .select(STYLESHEET_LINK_SELECTOR)
        .expect("BUG: hardcoded stylesheet link selector is invalid")
        .collect();

    let mut targets = Vec::new();
    for node_ref in matches {
        let href = {
            let attrs = node_ref.attributes.borrow();
            if attrs.contains(INLINE_IGNORE_ATTR) {
                log::debug!("Skipping opted-out stylesheet link");
                None
            } else {
                attrs.get("href").map(str::to_string)
            }
        };
        if let Some(href) = href {
            targets.push((node_ref, href));
        }
    }

    if targets.is_empty() {
        return Ok(html.to_string());
    }

    let client = Client::new();
    let fetches = targets
        .iter()
        .map(|(_, href)| fetch_stylesheet(&client, base, href));
    let contents = join_all(fetches).await;

    for ((node_ref, href), content) in targets.iter().zip(contents) {
        let css = content?;
        log::debug!("Embedding stylesheet '{href}' ({} bytes)", css.len());

        let style_html = format!("<style type=\"text/css\">\n{css}\n</style>");
        let fragment = kuchiki::parse_html().one(style_html);
        let style = fragment
            .select_first("style")
            .expect("BUG: spliced style fragment has no style element");

        let node = node_ref.as_node();
        node.insert_before(style.as_node().clone());
        node.detach();
    }

    let mut out = Vec::new();
    document.serialize(&mut out)?;
    String::from_utf8(out)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// Fetch one stylesheet referent. Absolute http(s) references bypass the
/// base; everything else resolves against it.
async fn fetch_stylesheet(client: &Client, base: &StyleBase, href: &str) -> InlineResult<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        let url = Url::parse(href).map_err(|e| BuildError::resolution(href, e))?;
        return fetch_remote(client, href, url).await;
    }

    match base {
        StyleBase::Url(base_url) => {
            let url = base_url
                .join(href)
                .map_err(|e| BuildError::resolution(href, e))?;
            fetch_remote(client, href, url).await
        }
        StyleBase::Dir(dir) => {
            let path = dir.join(href);
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| BuildError::resolution(href, e))
        }
    }
}

async fn fetch_remote(client: &Client, href: &str, url: Url) -> InlineResult<String> {
    log::debug!("Fetching stylesheet: {url}");
    let response = client
        .get(url.clone())
        .header("Accept", "text/css,*/*;q=0.1")
        .send()
        .await
        .map_err(|e| BuildError::resolution(href, e))?;

    if !response.status().is_success() {
        return Err(BuildError::resolution(
            href,
            format!("stylesheet fetch failed with status {}", response.status()),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| BuildError::resolution(href, e))
}
