use super::*;
use std::fs;
use tempfile::TempDir;

fn store_with(content: &str) -> (TempDir, CsvCatalogStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prompts.csv");
    fs::write(&path, content).unwrap();
    (dir, CsvCatalogStore::new(path))
}

#[test]
fn load_groups_by_category_in_file_order() {
    let (_dir, store) = store_with(
        "category,prompt\n\
         Lighting,dramatic rim light\n\
         Style,oil painting\n\
         Lighting,golden hour\n",
    );

    let catalog = store.load().unwrap();
    let categories: Vec<&str> = catalog.categories().collect();
    assert_eq!(categories, vec!["Lighting", "Style"]);
    assert_eq!(catalog.entries("Lighting")[0].text, "dramatic rim light");
    assert_eq!(catalog.entries("Lighting")[1].text, "golden hour");
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.skipped_rows(), 0);
}

#[test]
fn same_text_in_two_categories_is_kept_twice() {
    let (_dir, store) = store_with("category,prompt\nMood,serene\nStyle,serene\n");
    let catalog = store.load().unwrap();
    assert_eq!(catalog.len(), 2);
}

#[test]
fn malformed_rows_are_skipped() {
    let (_dir, store) = store_with(
        "category,prompt\n\
         Lighting,golden hour\n\
         ,orphan prompt\n\
         Style\n\
         Camera,35mm lens\n",
    );

    let catalog = store.load().unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.skipped_rows(), 2);
}

#[test]
fn header_is_case_insensitive_and_accepts_text_alias() {
    let (_dir, store) = store_with("Text, Category ,Translation\nsoft light,Lighting,luz suave\n");
    let catalog = store.load().unwrap();
    let entry = catalog.find("Lighting", 0).unwrap();
    assert_eq!(entry.text, "soft light");
    assert_eq!(entry.translation.as_deref(), Some("luz suave"));
}

#[test]
fn missing_required_column_is_schema_invalid() {
    let (_dir, store) = store_with("category,description\nLighting,golden hour\n");
    let err = store.load().unwrap_err();
    assert!(matches!(err, CatalogError::SchemaInvalid { .. }));
}

#[test]
fn empty_file_is_schema_invalid() {
    let (_dir, store) = store_with("");
    assert!(matches!(store.load(), Err(CatalogError::SchemaInvalid { .. })));
}

#[test]
fn missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvCatalogStore::new(dir.path().join("absent.csv"));
    assert!(matches!(store.load(), Err(CatalogError::Unavailable { .. })));
}

#[test]
fn append_does_not_touch_loaded_snapshot() {
    let (_dir, store) = store_with("category,prompt\nLighting,golden hour\n");
    let snapshot = store.load().unwrap();

    store.append(CatalogEntry::new("Lighting", "neon glow")).unwrap();

    assert_eq!(snapshot.entries("Lighting").len(), 1);
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.entries("Lighting").len(), 2);
    assert_eq!(reloaded.entries("Lighting")[1].text, "neon glow");
}

#[test]
fn append_respects_existing_column_order() {
    let (_dir, store) = store_with("prompt,category\ngolden hour,Lighting");

    store.append(CatalogEntry::new("Style", "ink sketch")).unwrap();

    let catalog = store.load().unwrap();
    assert_eq!(catalog.entries("Lighting")[0].text, "golden hour");
    assert_eq!(catalog.entries("Style")[0].text, "ink sketch");
}

#[test]
fn append_creates_file_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvCatalogStore::new(dir.path().join("new.csv"));

    store.append(CatalogEntry::new("Mood", "eerie, quiet").with_translation("sinistro")).unwrap();

    let catalog = store.load().unwrap();
    let entry = catalog.find("Mood", 0).unwrap();
    assert_eq!(entry.text, "eerie, quiet");
    assert_eq!(entry.translation.as_deref(), Some("sinistro"));
}

#[test]
fn append_rejects_blank_fields() {
    let (_dir, store) = store_with("category,prompt\n");
    let err = store.append(CatalogEntry::new("  ", "something")).unwrap_err();
    assert!(matches!(err, CatalogError::Append { .. }));
    assert!(store.append(CatalogEntry::new("Mood", "")).is_err());
}

#[test]
fn seed_defaults_only_writes_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvCatalogStore::new(dir.path().join("prompts.csv"));

    assert!(store.seed_defaults().unwrap());
    assert!(!store.seed_defaults().unwrap());

    let catalog = store.load().unwrap();
    assert_eq!(catalog.len(), defaults::starter_entries().len());
    assert!(catalog
        .entries("Lighting")
        .iter()
        .any(|e| e.text == "dramatic rim light"));
}

#[test]
fn find_out_of_range_is_none() {
    let catalog = Catalog::from_entries(vec![CatalogEntry::new("Style", "oil painting")]);
    assert!(catalog.find("Style", 1).is_none());
    assert!(catalog.find("Camera", 0).is_none());
    assert!(catalog.entries("Camera").is_empty());
}

#[test]
fn subcategory_column_groups_entries_under_subheadings() {
    let (_dir, store) = store_with(
        "category,subcategory,prompt\n\
         Lighting,Natural,golden hour\n\
         Lighting,Studio,rim light\n\
         Lighting,Natural,overcast\n\
         Lighting,,candle glow\n",
    );

    let catalog = store.load().unwrap();
    let texts: Vec<&str> = catalog
        .entries("Lighting")
        .iter()
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(texts, ["golden hour", "overcast", "rim light", "candle glow"]);

    let group = catalog.group("Lighting").unwrap();
    let sections = group.sections();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0].subcategory, Some("Natural"));
    assert_eq!(sections[0].entries.len(), 2);
    assert_eq!(sections[1].subcategory, Some("Studio"));
    assert_eq!(sections[1].start, 2);
    assert_eq!(sections[2].subcategory, None);
    assert_eq!(catalog.find("Lighting", 2).unwrap().text, "rim light");
}

#[test]
fn subcategory_is_optional_and_appended_when_present() {
    let (_dir, store) = store_with("category,prompt\nStyle,oil painting\n");
    assert_eq!(store.load().unwrap().find("Style", 0).unwrap().subcategory, None);

    store
        .append(CatalogEntry::new("Style", "ink sketch").with_subcategory("Drawing"))
        .unwrap();
    let catalog = store.load().unwrap();
    assert_eq!(catalog.find("Style", 1).unwrap().subcategory, None);

    let dir = tempfile::tempdir().unwrap();
    let fresh = CsvCatalogStore::new(dir.path().join("new.csv"));
    fresh
        .append(CatalogEntry::new("Style", "ink sketch").with_subcategory("Drawing"))
        .unwrap();
    let entry = fresh.load().unwrap().find("Style", 0).cloned().unwrap();
    assert_eq!(entry.subcategory.as_deref(), Some("Drawing"));
}
