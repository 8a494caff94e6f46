//! Page selection by 1-based index or exact display name.

use crate::error::{Error, Result};
use crate::model::Page;

/// Which pages of a document to export.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSelection {
    /// Every page, in document order
    #[default]
    All,
    /// A single page by 1-based position
    Index(usize),
    /// Every page whose display name matches exactly
    Name(String),
}

impl PageSelection {
    /// Build a selection from the two optional request fields.
    ///
    /// Supplying both is rejected, never resolved in favour of either.
    pub fn from_parts(index: Option<usize>, name: Option<&str>) -> Result<Self> {
        match (index, name) {
            (Some(_), Some(_)) => Err(Error::ConflictingSelection),
            (Some(index), None) => Ok(PageSelection::Index(index)),
            (None, Some(name)) => Ok(PageSelection::Name(name.to_string())),
            (None, None) => Ok(PageSelection::All),
        }
    }

    /// Apply the selection to the pages of a document.
    pub fn apply(&self, pages: Vec<Page>) -> Result<Vec<Page>> {
        match self {
            PageSelection::All => Ok(pages),
            PageSelection::Index(index) => {
                let count = pages.len();
                if *index == 0 || *index > count {
                    return Err(Error::PageIndexOutOfRange {
                        index: *index,
                        count,
                    });
                }
                Ok(pages.into_iter().skip(index - 1).take(1).collect())
            }
            PageSelection::Name(name) => {
                let matched: Vec<Page> = pages.into_iter().filter(|p| p.has_name(name)).collect();
                if matched.is_empty() {
                    return Err(Error::PageNotFound(name.clone()));
                }
                log::debug!("{} page(s) named {:?}", matched.len(), name);
                Ok(matched)
            }
        }
    }
}

impl std::fmt::Display for PageSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSelection::All => write!(f, "all pages"),
            PageSelection::Index(index) => write!(f, "page {}", index),
            PageSelection::Name(name) => write!(f, "pages named {:?}", name),
        }
    }
}

/// Choose pages by index or name.
///
/// # Arguments
/// * `pages` - All pages of the document, in document order
/// * `index` - Optional 1-based page position
/// * `name` - Optional exact, case-sensitive page name
///
/// # Example
/// ```
/// use visio2img::{select, Page};
///
/// let pages = vec![Page::new(1, "Overview"), Page::new(2, "Detail")];
/// let picked = select(pages, None, Some("Detail")).unwrap();
/// assert_eq!(picked, vec![Page::new(2, "Detail")]);
/// ```
pub fn select(pages: Vec<Page>, index: Option<usize>, name: Option<&str>) -> Result<Vec<Page>> {
    PageSelection::from_parts(index, name)?.apply(pages)
}
