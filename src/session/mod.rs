//! Session state and the controller that applies user actions to it.
//!
//! A [`Session`] holds everything that changes while the user works: the
//! catalog snapshot, the selection, the enhancement history and the
//! diagnostic log. [`SessionController::handle`] takes it by `&mut`, so
//! actions run one at a time and each runs to completion.

pub mod history;
pub mod selection;

pub use history::{HistoryEntry, HistoryLog};
pub use selection::{join_lines, split_lines, Selection, SelectionState};

use crate::adapters::{adapt_with_negative, ToolId};
use crate::catalog::{Catalog, CatalogEntry, CatalogError, CsvCatalogStore};
use crate::diagnostics::DiagnosticLog;
use crate::llm::{ChatBackend, EnhancementOutcome, EnhancementResult, Enhancer};
use thiserror::Error;
use tracing::{error, info, instrument};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("No fragment #{position} in category '{category}'")]
    UnknownFragment { category: String, position: usize },
}

impl SessionError {
    /// Fatal errors leave the session without a usable catalog.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Catalog(CatalogError::Unavailable { .. })
                | SessionError::Catalog(CatalogError::SchemaInvalid { .. })
        )
    }

    pub fn user_hint(&self) -> &'static str {
        match self {
            SessionError::Catalog(e) => e.user_hint(),
            SessionError::UnknownFragment { .. } => "Use 'list <category>' to see what is available.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Select(String),
    /// `position` is zero-based within the category.
    SelectFromCatalog { category: String, position: usize },
    Deselect(String),
    Edit(String),
    Clear,
    Optimize,
    SetTool(ToolId),
    /// Appended to the catalog file; the loaded snapshot is unchanged.
    AddFragment(CatalogEntry),
    ReloadCatalog,
}

/// User-facing feedback attached to an outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    /// Internal cause, only filled in when diagnostics are surfaced.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeReport {
    pub result: EnhancementResult,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Selected { added: bool },
    Deselected { removed: bool },
    Edited { lines: usize },
    Cleared,
    Optimized(OptimizeReport),
    NothingToOptimize,
    ToolChanged(ToolId),
    FragmentAdded,
    CatalogReloaded { entries: usize },
}

#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    selection: Selection,
    history: HistoryLog,
    diagnostics: DiagnosticLog,
    tool: ToolId,
}

impl Session {
    pub fn new(catalog: Catalog, diagnostics: DiagnosticLog) -> Self {
        Self {
            catalog,
            selection: Selection::new(),
            history: HistoryLog::new(),
            diagnostics,
            tool: ToolId::default(),
        }
    }

    pub fn with_tool(mut self, tool: ToolId) -> Self {
        self.tool = tool;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn tool(&self) -> ToolId {
        self.tool
    }

    /// The current prompt formatted for the active tool.
    pub fn formatted_output(&self) -> String {
        if self.selection.is_blank() {
            return String::new();
        }
        adapt_with_negative(
            &self.selection.prompt_text(),
            self.selection.negative(),
            self.tool,
        )
    }
}

pub struct SessionController<B> {
    store: CsvCatalogStore,
    enhancer: Enhancer<B>,
}

impl<B: ChatBackend> SessionController<B> {
    pub fn new(store: CsvCatalogStore, enhancer: Enhancer<B>) -> Self {
        Self { store, enhancer }
    }

    pub fn store(&self) -> &CsvCatalogStore {
        &self.store
    }

    /// Loads the catalog and starts a session. A load failure is fatal.
    pub fn open_session(&self, mut diagnostics: DiagnosticLog) -> Result<Session, SessionError> {
        match self.store.load() {
            Ok(catalog) => Ok(Session::new(catalog, diagnostics)),
            Err(e) => {
                error!(error = %e, "Catalog load failed");
                diagnostics.record("catalog.load", e.to_string());
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, session))]
    pub async fn handle(
        &self,
        session: &mut Session,
        action: Action,
    ) -> Result<Outcome, SessionError> {
        match action {
            Action::Select(text) => Ok(Outcome::Selected {
                added: session.selection.add(&text),
            }),
            Action::SelectFromCatalog { category, position } => {
                let text = match session.catalog.find(&category, position) {
                    Some(entry) => entry.text.clone(),
                    None => {
                        let err = SessionError::UnknownFragment { category, position: position + 1 };
                        session.diagnostics.record("session.select", err.to_string());
                        return Err(err);
                    }
                };
                Ok(Outcome::Selected {
                    added: session.selection.add(&text),
                })
            }
            Action::Deselect(text) => Ok(Outcome::Deselected {
                removed: session.selection.remove(&text),
            }),
            Action::Edit(raw) => {
                session.selection.replace_from_edited_text(&raw);
                Ok(Outcome::Edited {
                    lines: session.selection.len(),
                })
            }
            Action::Clear => {
                session.selection.clear();
                Ok(Outcome::Cleared)
            }
            Action::Optimize => Ok(self.optimize(session).await),
            Action::SetTool(tool) => {
                session.tool = tool;
                Ok(Outcome::ToolChanged(tool))
            }
            Action::AddFragment(entry) => match self.store.append(entry) {
                Ok(()) => Ok(Outcome::FragmentAdded),
                Err(e) => {
                    session.diagnostics.record("catalog.append", e.to_string());
                    Err(e.into())
                }
            },
            Action::ReloadCatalog => match self.store.load() {
                Ok(catalog) => {
                    let entries = catalog.len();
                    session.catalog = catalog;
                    Ok(Outcome::CatalogReloaded { entries })
                }
                Err(e) => {
                    error!(error = %e, "Catalog reload failed");
                    session.diagnostics.record("catalog.load", e.to_string());
                    Err(e.into())
                }
            },
        }
    }

    async fn optimize(&self, session: &mut Session) -> Outcome {
        if session.selection.is_blank() {
            return Outcome::NothingToOptimize;
        }
        let base_text = session.selection.prompt_text();

        let result = self
            .enhancer
            .enhance(&base_text, session.tool, &mut session.diagnostics)
            .await;

        session.selection.apply_enhancement(&result);
        session.history.record(&base_text, &result);
        info!(outcome = ?result.outcome, history = session.history.len(), "Prompt optimized");

        let notice = result.issue.as_ref().map(|issue| {
            let kept = match result.outcome {
                EnhancementOutcome::PartialFallback => {
                    "The prompt was improved, but a generic negative prompt is used."
                }
                _ => "Your original prompt was kept with a generic negative prompt.",
            };
            Notice {
                message: format!("{} {}", kept, issue.hint),
                detail: session
                    .diagnostics
                    .is_surfacing()
                    .then(|| issue.cause.clone()),
            }
        });

        Outcome::Optimized(OptimizeReport { result, notice })
    }
}
