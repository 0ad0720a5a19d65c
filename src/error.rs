//! Errors surfaced to callers of the export pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::fonts::FontError;
use crate::render::RenderError;

#[cfg(feature = "bookmarks")]
use crate::bookmarks::BookmarkError;

/// Message shown to users whenever an export fails.
pub const EXPORT_FAILED: &str = "Failed to generate document, please try again";

/// A failed export.
///
/// Every variant displays the same user-facing message; the underlying cause
/// is available through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}", EXPORT_FAILED)]
    Fonts(#[source] FontError),
    #[error("{}", EXPORT_FAILED)]
    Render(#[source] RenderError),
    #[cfg(feature = "bookmarks")]
    #[error("{}", EXPORT_FAILED)]
    Bookmarks(#[source] BookmarkError),
    #[error("{}", EXPORT_FAILED)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<FontError> for ExportError {
    fn from(err: FontError) -> Self {
        Self::Fonts(err)
    }
}

impl From<RenderError> for ExportError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

#[cfg(feature = "bookmarks")]
impl From<BookmarkError> for ExportError {
    fn from(err: BookmarkError) -> Self {
        Self::Bookmarks(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn message_is_fixed_and_cause_is_kept() {
        let err = ExportError::from(RenderError::Pdf("broken xref".into()));
        assert_eq!(err.to_string(), EXPORT_FAILED);
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("PDF backend error: broken xref"));
    }

    #[test]
    fn every_variant_shows_the_same_message() {
        let write = ExportError::Write {
            path: PathBuf::from("out/report.pdf"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        let fonts = ExportError::from(FontError::NotFound { checked: "assets/fonts".to_owned() });
        assert_eq!(write.to_string(), EXPORT_FAILED);
        assert_eq!(fonts.to_string(), EXPORT_FAILED);
    }
}
