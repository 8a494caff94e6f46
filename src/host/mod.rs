//! Connection to the application that renders pages.
//!
//! The pipeline never talks to Visio directly. It goes through two traits:
//! [`Automation`] launches the host and opens a document, producing a
//! [`HostSession`] that lists pages and exports them. A session owns the
//! host process; [`SessionGuard`] makes sure it is closed exactly once,
//! whichever way the caller leaves the scope.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use visio2img::host::{Automation, HostSession, SessionGuard, VisioAutomation};
//!
//! fn main() -> visio2img::Result<()> {
//!     let automation = VisioAutomation::new();
//!     let mut session = SessionGuard::new(automation.open(Path::new("drawing.vsdx"))?);
//!     for page in session.pages()? {
//!         println!("{}", page);
//!     }
//!     session.release();
//!     Ok(())
//! }
//! ```

mod visio;

pub use visio::{
    is_available, is_registered, OpenMode, VisioAutomation, VisioOptions, VisioSession,
    VISIO_PROG_ID,
};

use crate::error::{Error, Result};
use crate::model::Page;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// A document opened inside a running host.
///
/// Sessions are single-owner and not meant to be shared between threads.
pub trait HostSession {
    /// All pages of the open document, in document order.
    fn pages(&self) -> Result<Vec<Page>>;

    /// Render one page to an image file.
    ///
    /// The image format follows the extension of `destination`.
    fn export(&mut self, page: &Page, destination: &Path) -> Result<()>;

    /// Release the host process.
    ///
    /// Must be idempotent and must not fail; problems while shutting the host
    /// down are logged, not returned.
    fn close(&mut self);
}

/// Something that can launch a host and open a document in it.
pub trait Automation {
    /// Session type produced by [`Automation::open`].
    type Session: HostSession;

    /// Launch the host and open `source`.
    ///
    /// Fails with `HostUnavailable` when the host cannot be started and with
    /// `SourceOpenFailed` when it starts but rejects the document. In the
    /// latter case the host has already been released when this returns.
    fn open(&self, source: &Path) -> Result<Self::Session>;
}

/// Scoped ownership of an open session.
///
/// The wrapped session is closed exactly once: on [`SessionGuard::release`],
/// or when the guard is dropped on an early return or unwind.
pub struct SessionGuard<S: HostSession> {
    session: S,
}

impl<S: HostSession> SessionGuard<S> {
    /// Take ownership of an open session.
    pub fn new(session: S) -> Self {
        Self { session }
    }

    /// Close the session now.
    pub fn release(self) {}
}

impl<S: HostSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: HostSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: HostSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        log::debug!("releasing host session");
        self.session.close();
    }
}

/// Resolve `path` against the current directory.
///
/// The host resolves relative paths against its own working directory, so
/// every path handed to it must be absolute. No filesystem access besides
/// reading the current directory.
pub fn absolute_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Absolute destination for exporting `page` to `destination`.
///
/// A path that cannot be resolved is a failure of that page's export, not a
/// separate I/O error.
pub fn export_path(page: &Page, destination: &Path) -> Result<PathBuf> {
    absolute_path(destination).map_err(|e| export_failed(page, destination, e))
}

/// `ExportFailed` for `page` written to `destination`.
pub(crate) fn export_failed(
    page: &Page,
    destination: &Path,
    reason: impl std::fmt::Display,
) -> Error {
    Error::ExportFailed {
        page: page.position,
        path: destination.to_path_buf(),
        reason: reason.to_string(),
    }
}
