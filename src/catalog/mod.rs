//! Categorized prompt fragments.
//!
//! A [`Catalog`] is a read-only snapshot taken by [`CsvCatalogStore::load`].
//! Appending through the store writes to the backing file only; snapshots
//! already handed out stay as they were until the caller reloads.

pub mod defaults;
pub mod store;

pub use store::CsvCatalogStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable at {path}: {reason}")]
    Unavailable { path: String, reason: String },

    #[error("Catalog schema invalid: {reason}")]
    SchemaInvalid { reason: String },

    #[error("Could not add fragment: {reason}")]
    Append { reason: String },
}

impl CatalogError {
    /// Short advice shown next to the error.
    pub fn user_hint(&self) -> &'static str {
        match self {
            CatalogError::Unavailable { .. } => {
                "Check that the catalog file exists and is readable, then reload."
            }
            CatalogError::SchemaInvalid { .. } => {
                "The catalog needs a header with 'category' and 'prompt' columns."
            }
            CatalogError::Append { .. } => "Fill in every field and try again.",
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl CatalogEntry {
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: None,
            text: text.into(),
            translation: None,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }
}

/// Entries of one category. Entries sharing a subcategory are kept
/// contiguous, in order of the subcategory's first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub name: String,
    pub entries: Vec<CatalogEntry>,
}

/// A run of entries under one subheading. `start` is the zero-based
/// position of the first entry within its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub subcategory: Option<&'a str>,
    pub start: usize,
    pub entries: &'a [CatalogEntry],
}

impl CategoryGroup {
    fn insert(&mut self, entry: CatalogEntry) {
        match self
            .entries
            .iter()
            .rposition(|e| e.subcategory == entry.subcategory)
        {
            Some(last) => self.entries.insert(last + 1, entry),
            None => self.entries.push(entry),
        }
    }

    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections = Vec::new();
        let mut start = 0;
        while start < self.entries.len() {
            let subcategory = self.entries[start].subcategory.as_deref();
            let len = self.entries[start..]
                .iter()
                .take_while(|e| e.subcategory.as_deref() == subcategory)
                .count();
            sections.push(Section {
                subcategory,
                start,
                entries: &self.entries[start..start + len],
            });
            start += len;
        }
        sections
    }
}

/// Entries grouped by category, then subcategory. Both keep the order of
/// their first appearance; entries keep file order within a subcategory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<CategoryGroup>,
    skipped_rows: usize,
}

impl Catalog {
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Catalog::default();
        for entry in entries {
            catalog.push(entry);
        }
        catalog
    }

    pub(crate) fn push(&mut self, entry: CatalogEntry) {
        match self.groups.iter_mut().find(|g| g.name == entry.category) {
            Some(group) => group.insert(entry),
            None => self.groups.push(CategoryGroup {
                name: entry.category.clone(),
                entries: vec![entry],
            }),
        }
    }

    pub(crate) fn note_skipped(&mut self) {
        self.skipped_rows += 1;
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn group(&self, category: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.name == category)
    }

    pub fn entries(&self, category: &str) -> &[CatalogEntry] {
        self.group(category)
            .map(|g| g.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Fragment at `index` (zero-based) within `category`.
    pub fn find(&self, category: &str, index: usize) -> Option<&CatalogEntry> {
        self.entries(category).get(index)
    }

    /// Number of entries across all categories.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rows dropped during load because they were malformed.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

#[cfg(test)]
mod tests;
