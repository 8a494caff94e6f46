//! Export pipeline: validate, open, select, name, export, release.
//!
//! # Example
//!
//! ```no_run
//! use visio2img::{ExportOutcome, ExportPipeline, ExportRequest, VisioAutomation};
//!
//! fn main() -> visio2img::Result<()> {
//!     let request = ExportRequest::new("drawing.vsdx", "out/drawing.png").with_page_name("Overview");
//!     let mut pipeline = ExportPipeline::new(VisioAutomation::new());
//!
//!     if let ExportOutcome::Exported(files) = pipeline.run(&request)? {
//!         for file in files {
//!             println!("{}", file.display());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::format;
use crate::host::{Automation, HostSession, SessionGuard, VisioAutomation};
use crate::model::Page;
use crate::naming::names_for;
use crate::select::PageSelection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to export and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Source document
    pub source: PathBuf,

    /// Output image; its extension picks the format
    pub destination: PathBuf,

    /// 1-based page to export
    pub page_index: Option<usize>,

    /// Export every page with this exact name
    pub page_name: Option<String>,
}

impl ExportRequest {
    /// Request an export of every page.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            page_index: None,
            page_name: None,
        }
    }

    /// Restrict the export to the page at `index` (1-based).
    pub fn with_page_index(mut self, index: usize) -> Self {
        self.page_index = Some(index);
        self
    }

    /// Restrict the export to pages named `name`.
    pub fn with_page_name(mut self, name: impl Into<String>) -> Self {
        self.page_name = Some(name.into());
        self
    }

    /// Page selection described by this request.
    pub fn selection(&self) -> Result<PageSelection> {
        PageSelection::from_parts(self.page_index, self.page_name.as_deref())
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "files", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Every selected page was written, in document order
    Exported(Vec<PathBuf>),

    /// The document has no pages; nothing was written
    NothingToExport,
}

impl ExportOutcome {
    /// Files written by the run.
    pub fn files(&self) -> &[PathBuf] {
        match self {
            ExportOutcome::Exported(files) => files,
            ExportOutcome::NothingToExport => &[],
        }
    }
}

/// Progress notifications emitted while exporting.
#[derive(Debug, Clone, Copy)]
pub enum ExportEvent<'a> {
    /// Pages are selected and named; `total` exports follow
    Started {
        /// Number of pages to export
        total: usize,
    },

    /// One page has been written
    PageExported {
        /// Page that was exported
        page: &'a Page,
        /// File it was written to
        path: &'a Path,
    },
}

type ProgressFn = Box<dyn FnMut(ExportEvent<'_>)>;

/// Runs export requests against an [`Automation`] host.
pub struct ExportPipeline<A: Automation> {
    automation: A,
    progress: Option<ProgressFn>,
}

impl<A: Automation> ExportPipeline<A> {
    /// Create a pipeline driving `automation`.
    pub fn new(automation: A) -> Self {
        Self {
            automation,
            progress: None,
        }
    }

    /// Receive [`ExportEvent`]s during [`ExportPipeline::run`].
    pub fn with_progress(mut self, progress: impl FnMut(ExportEvent<'_>) + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// The automation this pipeline drives.
    pub fn automation(&self) -> &A {
        &self.automation
    }

    /// Export the pages described by `request`.
    ///
    /// Everything that can be checked without the host is checked first.
    /// Once the host session is open it is closed exactly once before this
    /// returns, whether the run succeeds or fails. Exports stop at the first
    /// failing page; files written before it are left in place.
    pub fn run(&mut self, request: &ExportRequest) -> Result<ExportOutcome> {
        let selection = request.selection()?;
        let format = format::validate(&request.destination)?;
        preflight(request)?;

        log::info!(
            "exporting {} of {} as {}",
            selection,
            request.source.display(),
            format
        );

        let mut session = SessionGuard::new(self.automation.open(&request.source)?);
        let result = self.export_pages(&mut *session, &selection, &request.destination);
        session.release();

        if let Err(ref e) = result {
            log::debug!("export failed: {}", e);
        }
        result
    }

    fn export_pages(
        &mut self,
        session: &mut A::Session,
        selection: &PageSelection,
        destination: &Path,
    ) -> Result<ExportOutcome> {
        let pages = selection.apply(session.pages()?)?;
        let names = names_for(destination, pages.len());
        if names.is_empty() {
            log::warn!("document has no pages to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        self.emit(ExportEvent::Started { total: names.len() });
        for (page, path) in pages.iter().zip(&names) {
            session.export(page, path)?;
            log::debug!("wrote {} to {}", page, path.display());
            self.emit(ExportEvent::PageExported { page, path });
        }

        Ok(ExportOutcome::Exported(names))
    }

    fn emit(&mut self, event: ExportEvent<'_>) {
        if let Some(progress) = self.progress.as_mut() {
            progress(event);
        }
    }
}

/// Filesystem checks that must pass before launching the host.
fn preflight(request: &ExportRequest) -> Result<()> {
    if !request.source.exists() {
        return Err(Error::SourceNotFound(request.source.clone()));
    }

    let dir = match request.destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(Error::DestinationDirNotFound(dir.to_path_buf()));
    }

    Ok(())
}

/// Export pages of a Visio document with default options.
///
/// # Arguments
///
/// * `source` - Path to the Visio document
/// * `destination` - Output image path (`.gif`, `.jpg`, `.jpeg` or `.png`)
/// * `page_index` - Optional 1-based page to export
/// * `page_name` - Optional exact page name to export
///
/// # Example
///
/// ```no_run
/// let outcome = visio2img::export("drawing.vsdx", "drawing.png", Some(2), None).unwrap();
/// println!("{:?}", outcome.files());
/// ```
pub fn export<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    page_index: Option<usize>,
    page_name: Option<&str>,
) -> Result<ExportOutcome> {
    let mut request = ExportRequest::new(source.as_ref(), destination.as_ref());
    request.page_index = page_index;
    request.page_name = page_name.map(str::to_string);
    ExportPipeline::new(VisioAutomation::new()).run(&request)
}
