use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Target image generator a prompt is formatted for.
///
/// The set is closed; names that match none of the known generators map to
/// [`ToolId::Generic`], which leaves text untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolId {
    Midjourney,
    StableDiffusion,
    DallE,
    Leonardo,
    Flux,
    #[default]
    Generic,
}

impl ToolId {
    pub const ALL: [ToolId; 6] = [
        ToolId::Midjourney,
        ToolId::StableDiffusion,
        ToolId::DallE,
        ToolId::Leonardo,
        ToolId::Flux,
        ToolId::Generic,
    ];

    /// Resolves a user-facing tool name. Case, spacing and punctuation are ignored.
    pub fn parse(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "midjourney" | "mj" => ToolId::Midjourney,
            "stablediffusion" | "sd" | "sdxl" | "automatic1111" | "comfyui" => {
                ToolId::StableDiffusion
            }
            "dalle" | "dalle2" | "dalle3" => ToolId::DallE,
            "leonardo" | "leonardoai" => ToolId::Leonardo,
            "flux" | "flux1" => ToolId::Flux,
            _ => ToolId::Generic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolId::Midjourney => "Midjourney",
            ToolId::StableDiffusion => "Stable Diffusion",
            ToolId::DallE => "DALL-E",
            ToolId::Leonardo => "Leonardo",
            ToolId::Flux => "Flux",
            ToolId::Generic => "Generic",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ToolId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ToolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ToolId::parse(&name))
    }
}
