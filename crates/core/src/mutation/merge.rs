//! Section-level merge-patch and whole-document replace.
//!
//! Both functions are pure: they take a snapshot and return the new state.
//! Persisting the result, and refreshing `updated_at`, is up to the caller.

use serde_json::Value;

use super::types::{ContentPatch, ReplaceWebsite};
use crate::document::{Content, Section, WebsiteDocument};

/// Apply `patch` to `existing` and return the merged content.
///
/// Sections are upserted by `type`: a matching section is shallow-merged in
/// place, an unknown type is appended in patch order. Sections the patch does
/// not name keep their value and position, as do sections without a `type`.
/// After the merge every `type` appears at most once.
pub fn merge_content(existing: &Content, patch: &ContentPatch) -> Content {
    let mut merged = existing.clone();
    merged.sections = collapse_duplicates(merged.sections);

    if let Some(entries) = &patch.sections {
        for (index, entry) in entries.iter().enumerate() {
            let Some(fields) = entry.as_object() else {
                tracing::warn!(index, "ignoring patch section that is not an object");
                continue;
            };
            let Some(section_type) = fields.get("type").and_then(Value::as_str) else {
                tracing::warn!(index, "ignoring patch section without a `type`");
                continue;
            };

            match merged
                .sections
                .iter_mut()
                .find(|section| section.section_type() == Some(section_type))
            {
                Some(current) => current.merge_fields(fields),
                None => {
                    let mut section = Section::new(section_type);
                    section.merge_fields(fields);
                    merged.sections.push(section);
                }
            }
        }
    }

    // A missing layout already defaulted when the content was decoded.
    if let Some(layout) = &patch.layout {
        merged.layout = layout.clone();
    }
    if let Some(title) = &patch.title {
        merged.title = title.clone();
    }

    merged
}

/// Fold repeated types into their first occurrence. Later duplicates are
/// shallow-merged over the first one, matching what a patch would do.
/// Untyped sections pass through in place.
fn collapse_duplicates(sections: Vec<Section>) -> Vec<Section> {
    let mut collapsed: Vec<Section> = Vec::with_capacity(sections.len());
    for section in sections {
        let Some(section_type) = section.section_type() else {
            collapsed.push(section);
            continue;
        };
        match collapsed
            .iter_mut()
            .find(|kept| kept.section_type() == Some(section_type))
        {
            Some(kept) => {
                tracing::debug!(section_type, "collapsing duplicate section");
                kept.merge_fields(&section.fields);
            }
            None => collapsed.push(section),
        }
    }
    collapsed
}

/// Replace every caller-editable field of `document` wholesale.
/// Identity, ownership, publish state and `created_at` are carried over.
pub fn replace_document(document: &WebsiteDocument, replacement: ReplaceWebsite) -> WebsiteDocument {
    WebsiteDocument {
        business_type: replacement.business_type,
        industry: replacement.industry,
        content: replacement.content,
        customizations: replacement.customizations,
        ..document.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{new_document, Customizations, OwnerId, WebsiteId};
    use serde_json::json;

    fn content(value: Value) -> Content {
        serde_json::from_value(value).unwrap()
    }

    fn patch(value: Value) -> ContentPatch {
        ContentPatch::from_value(value).unwrap()
    }

    fn types(content: &Content) -> Vec<&str> {
        content
            .sections
            .iter()
            .map(|s| s.section_type().unwrap_or("<untyped>"))
            .collect()
    }

    #[test]
    fn updates_in_place_and_appends_new_types() {
        let existing = content(json!({
            "sections": [
                { "type": "a", "body": "A" },
                { "type": "b", "body": "B" }
            ]
        }));
        let merged = merge_content(
            &existing,
            &patch(json!({
                "sections": [
                    { "type": "b", "body": "B2" },
                    { "type": "c", "body": "C" }
                ]
            })),
        );

        assert_eq!(types(&merged), vec!["a", "b", "c"]);
        assert_eq!(merged.section("a"), existing.section("a"));
        assert_eq!(merged.section("b").unwrap().fields["body"], json!("B2"));
        assert_eq!(merged.section("c").unwrap().fields["body"], json!("C"));
    }

    #[test]
    fn shallow_merge_retains_absent_keys() {
        let existing = content(json!({
            "sections": [{
                "type": "hero",
                "title": "Hero Section",
                "body": { "headline": "Old", "subheadline": "Sub" },
                "image_url": "hero.png"
            }]
        }));
        let merged = merge_content(
            &existing,
            &patch(json!({ "sections": [{ "type": "hero", "body": { "headline": "New" } }] })),
        );

        let hero = merged.section("hero").unwrap();
        assert_eq!(hero.title(), Some("Hero Section"));
        assert_eq!(hero.fields["image_url"], json!("hero.png"));
        // Shallow: the nested body object is replaced, not merged.
        assert_eq!(hero.fields["body"], json!({ "headline": "New" }));
    }

    #[test]
    fn merge_is_idempotent() {
        let existing = content(json!({
            "title": "T",
            "sections": [{ "type": "hero", "body": "x" }, { "type": "about", "body": "y" }]
        }));
        let p = patch(json!({
            "title": "T2",
            "layout": "wide",
            "sections": [
                { "type": "about", "body": "z" },
                { "type": "contact", "body": "mail" },
                { "body": "no type" }
            ]
        }));

        let once = merge_content(&existing, &p);
        let twice = merge_content(&once, &p);
        assert_eq!(once, twice);
    }

    #[test]
    fn untouched_sections_are_identical() {
        let existing = content(json!({
            "sections": [
                { "type": "hero", "body": { "headline": "H" }, "images": ["h.jpg"] },
                { "type": "services", "body": ["One", "Two"] },
                { "type": "contact", "body": "call us" }
            ]
        }));
        let merged = merge_content(
            &existing,
            &patch(json!({ "sections": [{ "type": "services", "body": ["Three"] }] })),
        );

        assert_eq!(merged.sections[0], existing.sections[0]);
        assert_eq!(merged.sections[2], existing.sections[2]);
        assert_eq!(types(&merged), vec!["hero", "services", "contact"]);
    }

    #[test]
    fn entries_without_type_are_skipped() {
        let existing = content(json!({ "sections": [{ "type": "hero" }] }));
        let merged = merge_content(
            &existing,
            &patch(json!({
                "sections": [
                    { "body": "orphan" },
                    { "type": 42, "body": "numeric type" },
                    "not an object",
                    { "type": "about", "body": "kept" }
                ]
            })),
        );
        assert_eq!(types(&merged), vec!["hero", "about"]);
    }

    #[test]
    fn repeated_new_type_in_patch_is_appended_once() {
        let merged = merge_content(
            &Content::default(),
            &patch(json!({
                "sections": [
                    { "type": "faq", "title": "FAQ" },
                    { "type": "faq", "body": ["Q1"] }
                ]
            })),
        );
        assert_eq!(types(&merged), vec!["faq"]);
        let faq = merged.section("faq").unwrap();
        assert_eq!(faq.title(), Some("FAQ"));
        assert_eq!(faq.fields["body"], json!(["Q1"]));
    }

    #[test]
    fn existing_duplicates_are_collapsed() {
        let existing = content(json!({
            "sections": [
                { "type": "hero", "title": "First" },
                { "type": "about" },
                { "type": "hero", "body": "second" }
            ]
        }));
        let merged = merge_content(&existing, &patch(json!({ "title": "x" })));
        assert_eq!(types(&merged), vec!["hero", "about"]);
        let hero = merged.section("hero").unwrap();
        assert_eq!(hero.title(), Some("First"));
        assert_eq!(hero.fields["body"], json!("second"));
    }

    #[test]
    fn title_only_patch_leaves_sections_and_layout() {
        let existing = content(json!({
            "title": "Old",
            "layout": "grid",
            "sections": [{ "type": "hero" }]
        }));
        let merged = merge_content(&existing, &patch(json!({ "title": "X" })));
        assert_eq!(merged.title, "X");
        assert_eq!(merged.layout, "grid");
        assert_eq!(merged.sections, existing.sections);
    }

    #[test]
    fn layout_and_title_defaulting() {
        let existing = content(json!({ "sections": [] }));
        let merged = merge_content(&existing, &patch(json!({ "sections": [] })));
        assert_eq!(merged.layout, "default");
        assert_eq!(merged.title, "");

        let merged = merge_content(&merged, &patch(json!({ "layout": "landing" })));
        assert_eq!(merged.layout, "landing");
    }

    #[test]
    fn patch_layout_is_stored_as_sent() {
        let merged = merge_content(&Content::default(), &patch(json!({ "layout": "" })));
        assert_eq!(merged.layout, "");

        let kept = merge_content(&merged, &patch(json!({ "title": "T" })));
        assert_eq!(kept.layout, "");
    }

    #[test]
    fn untyped_sections_are_left_alone() {
        let existing = content(json!({
            "sections": [
                { "title": "Loose block", "body": "x" },
                { "type": "hero", "body": "h" },
                { "title": "Loose block", "body": "x" }
            ]
        }));
        let merged = merge_content(
            &existing,
            &patch(json!({
                "sections": [
                    { "type": "hero", "body": "h2" },
                    { "type": "about", "body": "a" }
                ]
            })),
        );

        assert_eq!(types(&merged), vec!["<untyped>", "hero", "<untyped>", "about"]);
        assert_eq!(merged.sections[0], existing.sections[0]);
        assert_eq!(merged.sections[2], existing.sections[2]);
        assert_eq!(merged.section("hero").unwrap().fields["body"], json!("h2"));
    }

    #[test]
    fn unknown_content_keys_survive_merge() {
        let existing = content(json!({ "title": "T", "footer": { "year": 2024 } }));
        let merged = merge_content(&existing, &patch(json!({ "title": "U" })));
        assert_eq!(merged.extra.get("footer"), Some(&json!({ "year": 2024 })));
    }

    #[test]
    fn replace_resets_omitted_fields() {
        let mut document = new_document(
            OwnerId::new("owner"),
            "bakery",
            "food",
            content(json!({ "title": "Crumbs", "sections": [{ "type": "hero" }] })),
        )
        .into_document(WebsiteId::generate());
        document.customizations = Customizations {
            images: vec!["logo.png".into()],
            layout: "split".into(),
        };

        let replaced = replace_document(
            &document,
            ReplaceWebsite {
                business_type: "cafe".into(),
                ..ReplaceWebsite::default()
            },
        );

        assert_eq!(replaced.id, document.id);
        assert_eq!(replaced.owner_id, document.owner_id);
        assert_eq!(replaced.created_at, document.created_at);
        assert_eq!(replaced.business_type, "cafe");
        assert_eq!(replaced.industry, "");
        assert_eq!(replaced.content, Content::default());
        assert_eq!(replaced.customizations, Customizations::default());
    }
}
