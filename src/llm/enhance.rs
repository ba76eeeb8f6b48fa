use super::send::{ChatBackend, Message};
use super::EnhancementError;
use crate::adapters::{negative_instruction, positive_instruction, ToolId};
use crate::diagnostics::DiagnosticLog;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

/// Negative prompt used whenever the service could not provide one.
pub const FALLBACK_NEGATIVE: &str = "blurry, low quality, low resolution, distorted, deformed, \
bad anatomy, extra limbs, watermark, text, signature";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnhancementOutcome {
    /// Both calls succeeded.
    Enhanced,
    /// The positive prompt was improved but the negative fell back.
    PartialFallback,
    /// Nothing from the service was used.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnhancementStage {
    Positive,
    Negative,
}

impl EnhancementStage {
    fn source(&self) -> &'static str {
        match self {
            EnhancementStage::Positive => "enhance.positive",
            EnhancementStage::Negative => "enhance.negative",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancementIssue {
    pub stage: EnhancementStage,
    pub cause: String,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancementResult {
    pub positive_text: String,
    pub negative_text: String,
    pub tool: ToolId,
    pub timestamp: DateTime<Utc>,
    pub outcome: EnhancementOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<EnhancementIssue>,
}

impl EnhancementResult {
    fn fallback(base_text: &str, tool: ToolId, issue: EnhancementIssue) -> Self {
        Self {
            positive_text: base_text.to_string(),
            negative_text: FALLBACK_NEGATIVE.to_string(),
            tool,
            timestamp: Utc::now(),
            outcome: EnhancementOutcome::Fallback,
            issue: Some(issue),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.outcome != EnhancementOutcome::Enhanced
    }
}

/// Two-call prompt improvement with a fixed fallback policy.
pub struct Enhancer<B> {
    backend: B,
}

impl<B: ChatBackend> Enhancer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Improves `base_text` for `tool` and derives a negative prompt.
    ///
    /// Never fails. If the first call fails the base text is returned with
    /// [`FALLBACK_NEGATIVE`]; if only the second fails the improved prompt is
    /// kept and the negative falls back. Each failure is recorded in `diagnostics`.
    #[instrument(skip(self, base_text, tool, diagnostics), fields(tool = %tool, chars = base_text.len()))]
    pub async fn enhance(
        &self,
        base_text: &str,
        tool: ToolId,
        diagnostics: &mut DiagnosticLog,
    ) -> EnhancementResult {
        let positive_messages = [
            Message::system(positive_instruction(tool)),
            Message::user(base_text),
        ];
        let positive = match self.backend.complete(&positive_messages).await {
            Ok(text) => text,
            Err(e) => {
                let issue = record_failure(diagnostics, EnhancementStage::Positive, &e);
                return EnhancementResult::fallback(base_text, tool, issue);
            }
        };

        let negative_messages = [
            Message::system(negative_instruction(tool)),
            Message::user(positive.as_str()),
        ];
        let (negative, outcome, issue) = match self.backend.complete(&negative_messages).await {
            Ok(text) => (text, EnhancementOutcome::Enhanced, None),
            Err(e) => {
                let issue = record_failure(diagnostics, EnhancementStage::Negative, &e);
                (
                    FALLBACK_NEGATIVE.to_string(),
                    EnhancementOutcome::PartialFallback,
                    Some(issue),
                )
            }
        };

        info!(?outcome, "Enhancement finished");
        EnhancementResult {
            positive_text: positive,
            negative_text: negative,
            tool,
            timestamp: Utc::now(),
            outcome,
            issue,
        }
    }
}

fn record_failure(
    diagnostics: &mut DiagnosticLog,
    stage: EnhancementStage,
    error: &EnhancementError,
) -> EnhancementIssue {
    diagnostics.record(stage.source(), error.to_string());
    EnhancementIssue {
        stage,
        cause: error.to_string(),
        hint: error.user_hint(),
    }
}
