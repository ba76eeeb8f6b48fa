//! Completed enhancements, oldest first. Entries are never edited or dropped;
//! any truncation happens in [`HistoryLog::recent`].

use crate::adapters::ToolId;
use crate::llm::{EnhancementOutcome, EnhancementResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub base_text: String,
    pub positive_text: String,
    pub negative_text: String,
    pub tool: ToolId,
    pub outcome: EnhancementOutcome,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    fn from_result(base_text: &str, result: &EnhancementResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            base_text: base_text.to_string(),
            positive_text: result.positive_text.clone(),
            negative_text: result.negative_text.clone(),
            tool: result.tool,
            outcome: result.outcome,
            timestamp: result.timestamp,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry for `result` and returns a copy of it.
    pub fn record(&mut self, base_text: &str, result: &EnhancementResult) -> HistoryEntry {
        let entry = HistoryEntry::from_result(base_text, result);
        self.entries.push(entry.clone());
        entry
    }

    /// The `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    /// All entries in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}
