//! The working prompt: an ordered list of fragments plus a companion negative.
//!
//! The negative belongs to the prompt it was derived from, so any change to
//! the fragments drops it.

use crate::llm::EnhancementResult;
use serde::Serialize;

const LINE_SEPARATOR: &str = "\n";
const PROMPT_SEPARATOR: &str = " ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionState {
    Empty,
    NonEmpty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    items: Vec<String>,
    negative: String,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        if self.items.is_empty() {
            SelectionState::Empty
        } else {
            SelectionState::NonEmpty
        }
    }

    /// Appends `text` unless it is already selected. Returns whether it was added.
    pub fn add(&mut self, text: &str) -> bool {
        if self.contains(text) {
            return false;
        }
        self.items.push(text.to_string());
        self.negative.clear();
        true
    }

    /// Removes every occurrence of `text`. Returns whether anything was removed.
    pub fn remove(&mut self, text: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item != text);
        let removed = self.items.len() != before;
        if removed {
            self.negative.clear();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.negative.clear();
    }

    /// Replaces the selection with the lines of a hand-edited text.
    ///
    /// Every line is kept verbatim, duplicates and blank lines included.
    pub fn replace_from_edited_text(&mut self, raw: &str) {
        self.items = split_lines(raw);
        self.negative.clear();
    }

    pub fn apply_enhancement(&mut self, result: &EnhancementResult) {
        self.items = vec![result.positive_text.clone()];
        self.negative = result.negative_text.clone();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn negative(&self) -> &str {
        &self.negative
    }

    pub fn contains(&self, text: &str) -> bool {
        self.items.iter().any(|item| item == text)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Editable view: fragments joined one per line.
    pub fn composed_text(&self) -> String {
        join_lines(&self.items)
    }

    /// The prompt itself: fragments exactly as selected, space separated.
    pub fn prompt_text(&self) -> String {
        self.items.join(PROMPT_SEPARATOR)
    }

    /// True when there is nothing but whitespace to send.
    pub fn is_blank(&self) -> bool {
        self.items.iter().all(|item| item.trim().is_empty())
    }
}

/// Splits edited text into fragments. `join_lines(&split_lines(t)) == t` for every `t`.
pub fn split_lines(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(LINE_SEPARATOR).map(str::to_string).collect()
}

pub fn join_lines(items: &[String]) -> String {
    items.join(LINE_SEPARATOR)
}
