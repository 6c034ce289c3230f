//! Source references and document acquisition
//!
//! A source is materialized into HTML text exactly once per pipeline run.
//! Non-file sources carry no base path of their own, so the caller must
//! supply one through the config (checked by the orchestrator before any
//! I/O happens).

use std::io;
use std::path::{Path, PathBuf};

use super::errors::InlineResult;

/// Where the input HTML comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Path to an HTML file. Its parent directory is the default base for
    /// resolving relative external resources.
    Path(PathBuf),
    /// Raw HTML text.
    Html(String),
    /// Raw HTML bytes (must be UTF-8).
    Bytes(Vec<u8>),
}

impl Source {
    #[must_use]
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Source::Path(path.into())
    }

    #[must_use]
    pub fn html(html: impl Into<String>) -> Self {
        Source::Html(html.into())
    }

    #[must_use]
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Source::Bytes(bytes.into())
    }

    /// True for file-path sources, which carry their own base path.
    #[must_use]
    pub fn is_path(&self) -> bool {
        matches!(self, Source::Path(_))
    }

    /// The parent directory of a file source, if any.
    #[must_use]
    pub fn parent_dir(&self) -> Option<&Path> {
        match self {
            Source::Path(path) => Some(path.parent().unwrap_or_else(|| Path::new("."))),
            _ => None,
        }
    }

    /// Materialize the source into HTML text.
    pub(crate) async fn acquire(&self) -> InlineResult<String> {
        match self {
            Source::Path(path) => {
                log::debug!("Reading source file: {}", path.display());
                Ok(tokio::fs::read_to_string(path).await?)
            }
            Source::Html(html) => Ok(html.clone()),
            Source::Bytes(bytes) => String::from_utf8(bytes.clone())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into()),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<String> for Source {
    fn from(html: String) -> Self {
        Source::Html(html)
    }
}

impl From<&str> for Source {
    fn from(html: &str) -> Self {
        Source::Html(html.to_string())
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}
