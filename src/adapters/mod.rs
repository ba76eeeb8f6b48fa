//! Formats a composed prompt for the syntax each image generator expects.

pub mod templates;
pub mod tool;

pub use templates::{negative_instruction, positive_instruction, NEGATIVE_PLACEHOLDER};
pub use tool::ToolId;

/// Formats `text` for `tool`. Pure: same input, same output.
///
/// Empty text stays empty for every tool.
pub fn adapt(text: &str, tool: ToolId) -> String {
    if text.is_empty() {
        return String::new();
    }
    templates::format_for(tool, text, None)
}

/// Like [`adapt`], but fills in a concrete negative prompt where the tool has
/// a place for one.
pub fn adapt_with_negative(text: &str, negative: &str, tool: ToolId) -> String {
    let negative = negative.trim();
    if text.is_empty() || negative.is_empty() {
        return adapt(text, tool);
    }

    match tool {
        ToolId::StableDiffusion => templates::format_for(tool, text, Some(negative)),
        ToolId::Midjourney => format!("{} --no {}", adapt(text, tool), negative),
        ToolId::DallE | ToolId::Leonardo | ToolId::Flux | ToolId::Generic => adapt(text, tool),
    }
}
