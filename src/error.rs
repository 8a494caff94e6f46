//! Error types for visio2img library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for visio2img operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while exporting pages.
#[derive(Error, Debug)]
pub enum Error {
    /// Both a page index and a page name were requested.
    #[error("options --page and --name are mutually exclusive")]
    ConflictingSelection,

    /// The destination extension is not one of the supported image formats.
    #[error("Unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The source document does not exist.
    #[error("No such visio file: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The directory that should receive the images does not exist.
    #[error("Could not write image file: {} (directory not found)", .0.display())]
    DestinationDirNotFound(PathBuf),

    /// The automation host could not be reached or launched.
    #[error("Visio not found: {0}")]
    HostUnavailable(String),

    /// The host launched but refused to open the document.
    #[error("Could not open file (already opened by other process?): {}: {reason}", path.display())]
    SourceOpenFailed {
        /// Document that failed to open
        path: PathBuf,
        /// Host-reported reason
        reason: String,
    },

    /// Requested page index is outside the document.
    #[error("Invalid page number: {index} (document has {count} pages)")]
    PageIndexOutOfRange {
        /// Requested 1-based index
        index: usize,
        /// Number of pages in the document
        count: usize,
    },

    /// No page carries the requested name.
    #[error("Page not found: pagename={0}")]
    PageNotFound(String),

    /// The host failed to render a page.
    #[error("Could not write image: {} (page {page}): {reason}", path.display())]
    ExportFailed {
        /// 1-based position of the page being exported
        page: usize,
        /// Destination of the failed export
        path: PathBuf,
        /// Host-reported reason
        reason: String,
    },

    /// Host error that fits none of the categories above.
    #[error("Unexpected host error: {0}")]
    Unexpected(String),

    /// I/O error while resolving paths.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Short, stable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::ConflictingSelection => "conflicting-selection",
            Error::UnsupportedFormat(_) => "unsupported-format",
            Error::SourceNotFound(_) => "source-not-found",
            Error::DestinationDirNotFound(_) => "destination-dir-not-found",
            Error::HostUnavailable(_) => "host-unavailable",
            Error::SourceOpenFailed { .. } => "source-open-failed",
            Error::PageIndexOutOfRange { .. } => "page-index-out-of-range",
            Error::PageNotFound(_) => "page-not-found",
            Error::ExportFailed { .. } => "export-failed",
            Error::Unexpected(_) => "unexpected",
            Error::Io(_) => "io",
        }
    }
}
