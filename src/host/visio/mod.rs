//! Microsoft Visio driven through COM automation.
//!
//! Only available on Windows. On other targets [`VisioAutomation::open`]
//! fails with `HostUnavailable` and [`is_available`] returns `false`.

#[cfg(windows)]
mod com;

use super::{absolute_path, Automation};
use crate::error::Result;
use std::path::Path;

#[cfg(not(windows))]
use super::HostSession;
#[cfg(not(windows))]
use crate::error::Error;
#[cfg(not(windows))]
use crate::model::Page;

/// ProgID of the invisible Visio application.
pub const VISIO_PROG_ID: &str = "Visio.InvisibleApp";

/// `visOpenCopy`
const VIS_OPEN_COPY: i16 = 0x1;
/// `visOpenRO`
const VIS_OPEN_RO: i16 = 0x2;

/// How the source document is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenMode {
    /// Open a read-only copy; works while another Visio instance holds the file
    #[default]
    ReadOnlyCopy,
    /// Plain `Documents.Open`
    Normal,
}

impl OpenMode {
    /// Flags passed to `Documents.OpenEx`, or `None` to use `Documents.Open`.
    pub fn open_ex_flags(&self) -> Option<i16> {
        match self {
            OpenMode::ReadOnlyCopy => Some(VIS_OPEN_COPY | VIS_OPEN_RO),
            OpenMode::Normal => None,
        }
    }
}

/// Options for launching Visio.
#[derive(Debug, Clone)]
pub struct VisioOptions {
    /// COM ProgID of the application class
    pub prog_id: String,

    /// How documents are opened
    pub open_mode: OpenMode,
}

impl VisioOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ProgID used to launch Visio.
    pub fn with_prog_id(mut self, prog_id: impl Into<String>) -> Self {
        self.prog_id = prog_id.into();
        self
    }

    /// Set the open mode.
    pub fn with_open_mode(mut self, mode: OpenMode) -> Self {
        self.open_mode = mode;
        self
    }
}

impl Default for VisioOptions {
    fn default() -> Self {
        Self {
            prog_id: VISIO_PROG_ID.to_string(),
            open_mode: OpenMode::ReadOnlyCopy,
        }
    }
}

/// Launches Visio for each opened document.
#[derive(Debug, Clone, Default)]
pub struct VisioAutomation {
    options: VisioOptions,
}

impl VisioAutomation {
    /// Create an automation handle with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an automation handle with custom options.
    pub fn with_options(options: VisioOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &VisioOptions {
        &self.options
    }

    /// Check whether the ProgID this automation launches is registered.
    pub fn is_available(&self) -> bool {
        is_registered(&self.options.prog_id)
    }
}

/// Check whether the default Visio automation class is registered.
///
/// Cheap: looks the class up without launching the application.
pub fn is_available() -> bool {
    is_registered(VISIO_PROG_ID)
}

/// Check whether the automation class `prog_id` is registered on this machine.
#[cfg(windows)]
pub fn is_registered(prog_id: &str) -> bool {
    com::is_registered(prog_id)
}

/// Check whether the automation class `prog_id` is registered on this machine.
///
/// Always `false` off Windows.
#[cfg(not(windows))]
pub fn is_registered(_prog_id: &str) -> bool {
    false
}

/// A running Visio instance with one open document.
#[cfg(windows)]
pub use com::VisioSession;

/// A running Visio instance with one open document.
///
/// Uninhabited off Windows: no session can ever be opened there.
#[cfg(not(windows))]
#[derive(Debug)]
pub enum VisioSession {}

#[cfg(not(windows))]
impl HostSession for VisioSession {
    fn pages(&self) -> Result<Vec<Page>> {
        match *self {}
    }

    fn export(&mut self, _page: &Page, _destination: &Path) -> Result<()> {
        match *self {}
    }

    fn close(&mut self) {
        match *self {}
    }
}

impl Automation for VisioAutomation {
    type Session = VisioSession;

    fn open(&self, source: &Path) -> Result<VisioSession> {
        let path = absolute_path(source)?;
        log::info!("opening {} with {}", path.display(), self.options.prog_id);
        open_session(&self.options, source, &path)
    }
}

#[cfg(windows)]
fn open_session(options: &VisioOptions, source: &Path, path: &Path) -> Result<VisioSession> {
    com::VisioSession::launch(options, source, path)
}

#[cfg(not(windows))]
fn open_session(options: &VisioOptions, _source: &Path, _path: &Path) -> Result<VisioSession> {
    Err(Error::HostUnavailable(format!(
        "{} requires COM automation, which is only available on Windows",
        options.prog_id
    )))
}
