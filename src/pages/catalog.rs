//! Error code descriptors.

use indexmap::IndexMap;
use serde::Serialize;

/// The per-status-code data shared by every template.
///
/// Serialized as the rendering context of a page, so templates see
/// `code`, `message` and `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub code: String,
    pub message: String,
    pub description: String,
}

/// Mapping from error code to its descriptor, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PageCatalog {
    pages: IndexMap<String, PageDescriptor>,
}

impl PageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the descriptor for `code`.
    ///
    /// Replacing keeps the code's original position.
    pub fn add(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        description: impl Into<String>,
    ) {
        let code = code.into();
        let page = PageDescriptor {
            code: code.clone(),
            message: message.into(),
            description: description.into(),
        };
        self.pages.insert(code, page);
    }

    pub fn get(&self, code: &str) -> Option<&PageDescriptor> {
        self.pages.get(code)
    }

    pub(crate) fn get_index(&self, index: usize) -> Option<&PageDescriptor> {
        self.pages.get_index(index).map(|(_, page)| page)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.pages.values()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
