//! CSV-backed catalog storage.

use super::{defaults, Catalog, CatalogEntry, CatalogError, CatalogResult};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const CATEGORY_COLUMN: &str = "category";
const SUBCATEGORY_COLUMN: &str = "subcategory";
const PROMPT_COLUMNS: [&str; 2] = ["prompt", "text"];
const TRANSLATION_COLUMN: &str = "translation";

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy)]
struct Layout {
    category: usize,
    subcategory: Option<usize>,
    prompt: usize,
    translation: Option<usize>,
    width: usize,
}

impl Layout {
    fn from_headers(headers: &csv::StringRecord) -> Option<Self> {
        Some(Self {
            category: column(headers, &[CATEGORY_COLUMN])?,
            subcategory: column(headers, &[SUBCATEGORY_COLUMN]),
            prompt: column(headers, &PROMPT_COLUMNS)?,
            translation: column(headers, &[TRANSLATION_COLUMN]),
            width: headers.len(),
        })
    }

    fn full() -> Self {
        Self {
            category: 0,
            subcategory: Some(1),
            prompt: 2,
            translation: Some(3),
            width: 4,
        }
    }

    fn header_row(&self) -> Vec<&'static str> {
        let mut row = vec![""; self.width];
        row[self.category] = CATEGORY_COLUMN;
        if let Some(i) = self.subcategory {
            row[i] = SUBCATEGORY_COLUMN;
        }
        row[self.prompt] = PROMPT_COLUMNS[0];
        if let Some(i) = self.translation {
            row[i] = TRANSLATION_COLUMN;
        }
        row
    }

    fn row<'a>(&self, entry: &'a CatalogEntry) -> Vec<&'a str> {
        let mut row = vec![""; self.width];
        row[self.category] = entry.category.as_str();
        if let (Some(i), Some(s)) = (self.subcategory, entry.subcategory.as_deref()) {
            row[i] = s;
        }
        row[self.prompt] = entry.text.as_str();
        if let (Some(i), Some(t)) = (self.translation, entry.translation.as_deref()) {
            row[i] = t;
        }
        row
    }
}

#[derive(Debug, Clone)]
pub struct CsvCatalogStore {
    path: PathBuf,
}

impl CsvCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file into a fresh snapshot.
    ///
    /// Malformed rows are skipped with a warning. A missing file, an unreadable
    /// file or a header without the required columns fails the load.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> CatalogResult<Catalog> {
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| self.unavailable(e))?.clone();
        let layout = Layout::from_headers(&headers).ok_or_else(|| CatalogError::SchemaInvalid {
            reason: format!(
                "expected columns '{}' and '{}', found [{}]",
                CATEGORY_COLUMN,
                PROMPT_COLUMNS[0],
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        })?;

        let mut catalog = Catalog::default();
        for (index, record) in reader.records().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!(line, error = %e, "Skipping unreadable catalog row");
                    catalog.note_skipped();
                    continue;
                }
            };

            let category = record.get(layout.category).unwrap_or("");
            let text = record.get(layout.prompt).unwrap_or("");
            if category.is_empty() || text.is_empty() {
                warn!(line, "Skipping catalog row without category or prompt");
                catalog.note_skipped();
                continue;
            }

            let mut entry = CatalogEntry::new(category, text);
            entry.subcategory = optional_field(&record, layout.subcategory);
            entry.translation = optional_field(&record, layout.translation);
            catalog.push(entry);
        }

        info!(
            entries = catalog.len(),
            categories = catalog.groups().len(),
            skipped = catalog.skipped_rows(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Appends one fragment to the backing file. No uniqueness check.
    ///
    /// Optional fields are written only when the file has a column for them.
    #[instrument(skip(self, entry), fields(path = %self.path.display(), category = %entry.category))]
    pub fn append(&self, entry: CatalogEntry) -> CatalogResult<()> {
        let entry = CatalogEntry {
            category: entry.category.trim().to_string(),
            subcategory: trimmed(entry.subcategory),
            text: entry.text.trim().to_string(),
            translation: trimmed(entry.translation),
        };
        if entry.category.is_empty() || entry.text.is_empty() {
            return Err(CatalogError::Append {
                reason: "category and prompt text are both required".to_string(),
            });
        }

        let existing_layout = self.existing_layout()?;
        let write_header = existing_layout.is_none();
        let layout = existing_layout.unwrap_or_else(Layout::full);

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(append_error)?;
        ensure_trailing_newline(&mut file).map_err(append_error)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        if write_header {
            writer.write_record(layout.header_row()).map_err(append_error)?;
        }
        writer.write_record(layout.row(&entry)).map_err(append_error)?;
        writer.flush().map_err(append_error)?;

        debug!(text = %entry.text, "Fragment appended");
        Ok(())
    }

    /// Writes the starter catalog if no file exists yet. Returns whether it wrote.
    pub fn seed_defaults(&self) -> CatalogResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        let layout = Layout::full();
        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| self.unavailable(e))?;
        writer
            .write_record(layout.header_row())
            .map_err(|e| self.unavailable(e))?;
        for entry in defaults::starter_entries() {
            writer
                .write_record(layout.row(&entry))
                .map_err(|e| self.unavailable(e))?;
        }
        writer.flush().map_err(|e| self.unavailable(e))?;

        info!(path = %self.path.display(), "Seeded starter catalog");
        Ok(true)
    }

    /// Header layout of the current file, or `None` when there is no content yet.
    fn existing_layout(&self) -> CatalogResult<Option<Layout>> {
        let has_content = fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !has_content {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(append_error)?;
        let headers = reader.headers().map_err(append_error)?;
        Layout::from_headers(headers)
            .map(Some)
            .ok_or_else(|| CatalogError::Append {
                reason: "existing catalog header lacks 'category' or 'prompt'".to_string(),
            })
    }

    fn unavailable(&self, e: impl std::fmt::Display) -> CatalogError {
        CatalogError::Unavailable {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

fn column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

fn optional_field(record: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn append_error(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::Append {
        reason: e.to_string(),
    }
}

fn ensure_trailing_newline(file: &mut File) -> std::io::Result<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        file.write_all(b"\n")?;
    }
    Ok(())
}
