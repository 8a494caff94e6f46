//! Page-level types.

use serde::{Deserialize, Serialize};

/// A single page of an open document.
///
/// Only valid while the session that produced it is open; the position is
/// what the host uses to find the page again at export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page position (1-indexed, document order)
    pub position: usize,

    /// Display name, if the host reports one. Not unique.
    pub name: Option<String>,
}

impl Page {
    /// Create a page with a display name.
    pub fn new(position: usize, name: impl Into<String>) -> Self {
        Self {
            position,
            name: Some(name.into()),
        }
    }

    /// Create a page without a display name.
    pub fn unnamed(position: usize) -> Self {
        Self {
            position,
            name: None,
        }
    }

    /// Check whether the display name equals `name` exactly.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// Name for messages: the display name, or `#position` when absent.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.position),
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {} ({})", self.position, self.label())
    }
}
