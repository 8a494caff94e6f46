//! # visio2img
//!
//! Export pages of Visio documents to GIF, JPEG, and PNG images.
//!
//! Rendering is done by Visio itself, driven through COM automation; this
//! crate decides which pages to export, what to call the files, and makes
//! sure the Visio process is shut down afterwards.
//!
//! ## Quick Start
//!
//! ```no_run
//! use visio2img::export;
//!
//! fn main() -> visio2img::Result<()> {
//!     // Every page: drawing1.png, drawing2.png, ...
//!     let outcome = export("drawing.vsdx", "drawing.png", None, None)?;
//!     println!("{:?}", outcome.files());
//!
//!     // Only the second page, written to exactly page.png
//!     export("drawing.vsdx", "page.png", Some(2), None)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Output names
//!
//! A single exported page is written to the destination as given. Several
//! pages get a zero-padded number before the extension, wide enough for the
//! page count, so `out.png` with 12 pages yields `out01.png` .. `out12.png`.

pub mod error;
pub mod format;
pub mod host;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod select;

// Re-export commonly used types
pub use error::{Error, Result};
pub use format::{validate, ImageFormat};
pub use host::{
    is_available, is_registered, Automation, HostSession, OpenMode, SessionGuard, VisioAutomation,
    VisioOptions,
};
pub use model::Page;
pub use naming::names_for;
pub use pipeline::{export, ExportEvent, ExportOutcome, ExportPipeline, ExportRequest};
pub use select::{select, PageSelection};
