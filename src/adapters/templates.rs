//! Per-tool prompt skeletons and enhancement instructions.

use super::ToolId;

/// Marker left in adapted text where a negative prompt belongs.
pub const NEGATIVE_PLACEHOLDER: &str = "{negative}";

/// Fills the tool's skeleton. A Stable Diffusion negative goes straight into
/// its slot; without one the slot keeps [`NEGATIVE_PLACEHOLDER`].
pub fn format_for(tool: ToolId, text: &str, negative: Option<&str>) -> String {
    match tool {
        ToolId::Midjourney => format!("/imagine prompt: {} --v 6 --q 2", text),
        ToolId::StableDiffusion => format!(
            "{}, highly detailed, sharp focus\nNegative prompt: {}",
            text,
            negative.unwrap_or(NEGATIVE_PLACEHOLDER)
        ),
        ToolId::DallE => format!("Create an image of: \"{}\"", text),
        ToolId::Leonardo => format!("{} | cinematic, high resolution", text),
        ToolId::Flux => format!("{}. Rendered in natural light, fine detail.", text),
        ToolId::Generic => text.to_string(),
    }
}

/// System message for the "improve this prompt" call.
pub fn positive_instruction(tool: ToolId) -> String {
    let style = match tool {
        ToolId::Midjourney => {
            "Midjourney responds best to short, comma-separated visual descriptors: \
             subject first, then medium, lighting, composition and mood. \
             Do not add parameter flags such as --v or --ar."
        }
        ToolId::StableDiffusion => {
            "Stable Diffusion responds best to weighted keyword lists: \
             subject, style tags, quality tags (masterpiece, best quality), \
             camera and lighting terms, all comma-separated."
        }
        ToolId::DallE => {
            "DALL-E responds best to one or two fluent natural-language sentences \
             that describe the scene literally, including style and composition."
        }
        ToolId::Leonardo => {
            "Leonardo responds best to a descriptive sentence followed by style \
             keywords (art style, lighting, color palette, level of detail)."
        }
        ToolId::Flux => {
            "Flux responds best to precise natural-language descriptions with \
             explicit spatial relationships, materials and lighting."
        }
        ToolId::Generic => {
            "Write a clear, vivid description of the image with subject, \
             setting, style, lighting and composition."
        }
    };

    format!(
        "You are an expert prompt engineer for AI image generators. \
         Rewrite the user's prompt so it produces a better image in {}.\n\n{}\n\n\
         Keep every idea the user asked for. Reply with the improved prompt only, \
         without explanations, labels or quotes.",
        tool.name(),
        style
    )
}

/// System message for the "derive a negative prompt" call.
pub fn negative_instruction(tool: ToolId) -> String {
    let meaning = match tool {
        ToolId::Midjourney => {
            "It will be passed to the --no parameter, so list only short nouns or \
             adjectives separated by commas."
        }
        ToolId::StableDiffusion => {
            "It will be used as the negative prompt field: list artifacts and \
             defects to suppress (blurry, lowres, bad anatomy, extra fingers, \
             watermark) as comma-separated tags."
        }
        ToolId::DallE | ToolId::Flux => {
            "The generator has no negative field, so describe briefly what the \
             image must not contain as a comma-separated list."
        }
        ToolId::Leonardo => {
            "It will be used as Leonardo's negative prompt: comma-separated \
             elements, styles and defects to avoid."
        }
        ToolId::Generic => "List the elements, styles and defects to avoid, comma-separated.",
    };

    format!(
        "You write negative prompts for AI image generators. Given a positive \
         prompt for {}, list what should be avoided so the result matches it.\n\n{}\n\n\
         Reply with the negative prompt only.",
        tool.name(),
        meaning
    )
}
