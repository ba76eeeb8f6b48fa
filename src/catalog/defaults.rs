//! Starter fragments written when a catalog is seeded for the first time.

use super::CatalogEntry;

const STARTER: &[(&str, &str, &str, &str)] = &[
    ("Subject", "People", "portrait of an old fisherman", "retrato de um velho pescador"),
    ("Subject", "Places", "misty mountain village", "vilarejo nebuloso na montanha"),
    ("Style", "Painting", "oil painting", "pintura a óleo"),
    ("Style", "Painting", "watercolor illustration", "ilustração em aquarela"),
    ("Style", "Film", "cinematic still", "cena cinematográfica"),
    ("Lighting", "Studio", "dramatic rim light", "luz de contorno dramática"),
    ("Lighting", "Natural", "golden hour", "hora dourada"),
    ("Lighting", "Natural", "soft diffused light", "luz suave e difusa"),
    ("Camera", "Lens", "35mm lens", "lente 35mm"),
    ("Camera", "Lens", "shallow depth of field", "pouca profundidade de campo"),
    ("Mood", "Calm", "serene", "sereno"),
    ("Mood", "Dark", "melancholic", "melancólico"),
];

pub fn starter_entries() -> Vec<CatalogEntry> {
    STARTER
        .iter()
        .map(|(category, subcategory, text, translation)| {
            CatalogEntry::new(*category, *text)
                .with_subcategory(*subcategory)
                .with_translation(*translation)
        })
        .collect()
}
