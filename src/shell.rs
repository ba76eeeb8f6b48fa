//! Interactive terminal front end. Reads commands line by line, hands them
//! to the controller and prints the result.

use crate::adapters::ToolId;
use crate::commands::{Command, HELP};
use crate::llm::ChatBackend;
use crate::session::{Action, Outcome, Session, SessionController, SessionError};
use std::fmt::Write as _;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// Line that ends a multi-line `edit`.
const EDIT_TERMINATOR: &str = ".";

pub struct Shell<'a, B> {
    controller: &'a SessionController<B>,
    session: Session,
}

impl<'a, B: ChatBackend> Shell<'a, B> {
    pub fn new(controller: &'a SessionController<B>, session: Session) -> Self {
        Self {
            controller,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `quit`, end of input, or a fatal session error.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<(), SessionError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(input).lines();
        emit(output, &render_catalog(&self.session, None)).await;
        emit(output, "Type 'help' for commands.").await;

        loop {
            prompt(output, "> ").await;
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                _ => return Ok(()),
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    emit(output, &message).await;
                    continue;
                }
            };

            let action = match command {
                Command::Quit => return Ok(()),
                Command::Help => {
                    emit(output, HELP).await;
                    continue;
                }
                Command::List(category) => {
                    emit(output, &render_catalog(&self.session, category.as_deref())).await;
                    continue;
                }
                Command::Tool => {
                    emit(output, &format!("Current tool: {}", self.session.tool())).await;
                    continue;
                }
                Command::Tools => {
                    let names: Vec<&str> = ToolId::ALL.iter().map(|t| t.name()).collect();
                    emit(output, &names.join(", ")).await;
                    continue;
                }
                Command::Show => {
                    emit(output, &render_prompt(&self.session)).await;
                    continue;
                }
                Command::History(n) => {
                    emit(output, &render_history(&self.session, n)).await;
                    continue;
                }
                Command::BeginEdit => {
                    emit(output, "Current prompt, one fragment per line:").await;
                    emit(output, &self.session.selection().composed_text()).await;
                    emit(output, "Enter the new prompt, finish with a single '.' line.").await;
                    Action::Edit(read_edit(&mut lines).await)
                }
                Command::Act(action) => action,
            };

            match self.controller.handle(&mut self.session, action).await {
                Ok(outcome) => emit(output, &render_outcome(&self.session, &outcome)).await,
                Err(e) if e.is_fatal() => {
                    emit(output, &format!("{} {}", e, e.user_hint())).await;
                    return Err(e);
                }
                Err(e) => emit(output, &format!("{} {}", e, e.user_hint())).await,
            }
        }
    }
}

async fn read_edit<R: AsyncRead + Unpin>(lines: &mut Lines<BufReader<R>>) -> String {
    let mut edited = Vec::new();
    while let Ok(Some(line)) = lines.next_line().await {
        if line == EDIT_TERMINATOR {
            break;
        }
        edited.push(line);
    }
    edited.join("\n")
}

// Terminal writes are best effort: a closed stdout ends the session on the next read.
async fn emit<W: AsyncWrite + Unpin>(output: &mut W, text: &str) {
    let _ = output.write_all(text.as_bytes()).await;
    let _ = output.write_all(b"\n").await;
    let _ = output.flush().await;
}

async fn prompt<W: AsyncWrite + Unpin>(output: &mut W, text: &str) {
    let _ = output.write_all(text.as_bytes()).await;
    let _ = output.flush().await;
}

pub fn render_catalog(session: &Session, category: Option<&str>) -> String {
    let catalog = session.catalog();
    let mut out = String::new();

    match category {
        None => {
            if catalog.is_empty() {
                return "The catalog is empty. Use 'add' to create fragments.".to_string();
            }
            for group in catalog.groups() {
                let _ = writeln!(out, "{} ({})", group.name, group.entries.len());
            }
        }
        Some(name) => {
            let group = match catalog.group(name) {
                Some(group) => group,
                None => return format!("No fragments in category '{}'.", name),
            };
            for section in group.sections() {
                if let Some(subcategory) = section.subcategory {
                    let _ = writeln!(out, "-- {} --", subcategory);
                }
                for (offset, entry) in section.entries.iter().enumerate() {
                    let n = section.start + offset + 1;
                    let marker = if session.selection().contains(&entry.text) { "*" } else { " " };
                    let _ = match &entry.translation {
                        Some(t) => writeln!(out, "{}{:>3}. {}  ({})", marker, n, entry.text, t),
                        None => writeln!(out, "{}{:>3}. {}", marker, n, entry.text),
                    };
                }
            }
        }
    }

    out.trim_end().to_string()
}

pub fn render_prompt(session: &Session) -> String {
    let selection = session.selection();
    if selection.is_empty() {
        return "The prompt is empty.".to_string();
    }

    let mut out = format!("[{}]\n{}", session.tool(), session.formatted_output());
    if !selection.negative().is_empty() {
        let _ = write!(out, "\n\nNegative: {}", selection.negative());
    }
    out
}

pub fn render_history(session: &Session, n: usize) -> String {
    let recent = session.history().recent(n);
    if recent.is_empty() {
        return "No optimizations yet.".to_string();
    }

    let mut out = String::new();
    for entry in recent {
        let _ = writeln!(
            out,
            "{} [{}] {:?}\n  from: {}\n  to:   {}\n  neg:  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.tool,
            entry.outcome,
            entry.base_text,
            entry.positive_text,
            entry.negative_text
        );
    }
    out.trim_end().to_string()
}

pub fn render_outcome(session: &Session, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Selected { added: true } | Outcome::Deselected { removed: true } => {
            render_prompt(session)
        }
        Outcome::Selected { added: false } => "Already selected.".to_string(),
        Outcome::Deselected { removed: false } => "Not in the prompt.".to_string(),
        Outcome::Edited { lines } => format!("Prompt replaced ({} lines).", lines),
        Outcome::Cleared => "Prompt cleared.".to_string(),
        Outcome::NothingToOptimize => "Nothing to optimize: the prompt is empty.".to_string(),
        Outcome::ToolChanged(tool) => format!("Tool set to {}.", tool),
        Outcome::FragmentAdded => {
            "Fragment saved. Use 'reload' to see it in the catalog.".to_string()
        }
        Outcome::CatalogReloaded { entries } => format!("Catalog reloaded: {} fragments.", entries),
        Outcome::Optimized(report) => {
            let mut out = render_prompt(session);
            if let Some(notice) = &report.notice {
                let _ = write!(out, "\n\n{}", notice.message);
                if let Some(detail) = &notice.detail {
                    let _ = write!(out, "\n  cause: {}", detail);
                }
            }
            out
        }
    }
}
