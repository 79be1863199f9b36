use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::id::{OwnerId, WebsiteId};

pub const DEFAULT_LAYOUT: &str = "default";

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_layout<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_layout))
}

/// A generated marketing website owned by a single user.
/// Maps to the `websites` PostgreSQL table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteDocument {
    pub id: WebsiteId,
    pub owner_id: OwnerId,
    pub business_type: String,
    pub industry: String,
    pub content: Content,
    pub customizations: Customizations,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WebsiteDocument {
    /// Refresh `updated_at`, never letting it fall behind `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// A website that has not been persisted yet. The store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWebsite {
    pub owner_id: OwnerId,
    pub business_type: String,
    pub industry: String,
    pub content: Content,
    pub customizations: Customizations,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewWebsite {
    pub fn into_document(self, id: WebsiteId) -> WebsiteDocument {
        WebsiteDocument {
            id,
            owner_id: self.owner_id,
            business_type: self.business_type,
            industry: self.industry,
            content: self.content,
            customizations: self.customizations,
            is_published: self.is_published,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Build a fresh website with default customizations and both timestamps set
/// to now. `content` is stored as the generator produced it.
pub fn new_document(
    owner_id: OwnerId,
    business_type: impl Into<String>,
    industry: impl Into<String>,
    content: Content,
) -> NewWebsite {
    let now = Utc::now();
    NewWebsite {
        owner_id,
        business_type: business_type.into(),
        industry: industry.into(),
        content,
        customizations: Customizations::default(),
        is_published: false,
        created_at: now,
        updated_at: now,
    }
}

/// Structured page content. Keys the schema does not know about are kept
/// in `extra` so nothing the generator returned is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default = "default_layout", deserialize_with = "null_as_default_layout")]
    pub layout: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            title: String::new(),
            layout: default_layout(),
            sections: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Content {
    pub fn section(&self, section_type: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.section_type() == Some(section_type))
    }
}

/// A content block (`hero`, `about`, `services`, ...).
///
/// Only a string `type` is structural. Every other key (`title`, `body`,
/// `images`, `image_url`, ...) lives in `fields` and is treated as opaque
/// data. Blocks without a string `type` are kept as they came in; they are
/// never matched or merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Section {
    pub section_type: Option<String>,
    pub fields: Map<String, Value>,
}

impl From<Map<String, Value>> for Section {
    fn from(mut fields: Map<String, Value>) -> Self {
        let section_type = match fields.remove("type") {
            Some(Value::String(section_type)) => Some(section_type),
            Some(other) => {
                fields.insert("type".to_string(), other);
                None
            }
            None => None,
        };
        Self {
            section_type,
            fields,
        }
    }
}

impl From<Section> for Map<String, Value> {
    fn from(section: Section) -> Self {
        let mut map = section.fields;
        if let Some(section_type) = section.section_type {
            map.insert("type".to_string(), Value::String(section_type));
        }
        map
    }
}

impl Section {
    pub fn new(section_type: impl Into<String>) -> Self {
        Self {
            section_type: Some(section_type.into()),
            fields: Map::new(),
        }
    }

    /// The merge key, when the block has one.
    pub fn section_type(&self) -> Option<&str> {
        self.section_type.as_deref()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Overwrite this section's fields with `patch`, key by key.
    /// Keys missing from `patch` are retained; `type` is never rewritten.
    pub fn merge_fields(&mut self, patch: &Map<String, Value>) {
        for (key, value) in patch {
            if key == "type" {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Decode `body` into one of its known shapes.
    pub fn body(&self) -> Option<SectionBody> {
        self.fields
            .get("body")
            .and_then(|value| SectionBody::deserialize(value).ok())
    }

    /// All media references carried by this section, in field order
    /// `images`, `image_url`, `image_urls`.
    pub fn image_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        for key in ["images", "image_url", "image_urls"] {
            match self.fields.get(key) {
                Some(Value::String(url)) => refs.push(url.as_str()),
                Some(Value::Array(items)) => refs.extend(items.iter().filter_map(Value::as_str)),
                _ => {}
            }
        }
        refs
    }
}

/// The shapes a section body takes in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionBody {
    Text(String),
    List(Vec<String>),
    Structured(Map<String, Value>),
}

/// User-facing presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customizations {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_layout")]
    pub layout: String,
}

impl Default for Customizations {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            layout: default_layout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_content() -> Content {
        serde_json::from_value(json!({
            "title": "Bloom & Co",
            "sections": [
                {
                    "title": "Hero Section",
                    "type": "hero",
                    "body": { "headline": "Fresh flowers", "subheadline": "Daily" },
                    "images": ["hero1.jpg"]
                },
                { "title": "About Us", "type": "about", "body": "Family run", "images": [] },
                { "title": "Services", "type": "services", "body": ["Bouquets", "Events"] }
            ],
            "tagline": "kept as-is"
        }))
        .unwrap()
    }

    #[test]
    fn new_document_applies_defaults() {
        let doc = new_document(OwnerId::new("u1"), "florist", "retail", Content::default());
        assert_eq!(doc.customizations.layout, "default");
        assert!(doc.customizations.images.is_empty());
        assert!(!doc.is_published);
        assert_eq!(doc.created_at, doc.updated_at);
    }

    #[test]
    fn content_defaults_missing_keys() {
        let content: Content = serde_json::from_value(json!({})).unwrap();
        assert_eq!(content, Content::default());
        assert_eq!(content.layout, "default");
        assert_eq!(content.title, "");
    }

    #[test]
    fn content_preserves_unknown_keys() {
        let content = sample_content();
        assert_eq!(content.extra.get("tagline"), Some(&json!("kept as-is")));
        let back = serde_json::to_value(&content).unwrap();
        assert_eq!(back["tagline"], json!("kept as-is"));
        assert_eq!(back["sections"][0]["type"], json!("hero"));
    }

    #[test]
    fn section_body_shapes_are_decoded() {
        let content = sample_content();
        assert!(matches!(
            content.section("hero").unwrap().body(),
            Some(SectionBody::Structured(_))
        ));
        assert_eq!(
            content.section("about").unwrap().body(),
            Some(SectionBody::Text("Family run".into()))
        );
        assert_eq!(
            content.section("services").unwrap().body(),
            Some(SectionBody::List(vec!["Bouquets".into(), "Events".into()]))
        );
    }

    #[test]
    fn section_image_refs_cover_all_fields() {
        let section = Section::new("gallery")
            .with_field("images", json!(["a.jpg"]))
            .with_field("image_url", json!("b.jpg"))
            .with_field("image_urls", json!(["c.jpg", "d.jpg"]));
        assert_eq!(section.image_refs(), vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
        assert_eq!(section.title(), None);
    }

    #[test]
    fn merge_fields_keeps_absent_keys_and_type() {
        let mut section = Section::new("hero")
            .with_field("title", json!("Hero"))
            .with_field("image_url", json!("old.png"));
        let patch = json!({ "type": "ignored", "body": { "headline": "New" } });
        section.merge_fields(patch.as_object().unwrap());

        assert_eq!(section.section_type(), Some("hero"));
        assert_eq!(section.title(), Some("Hero"));
        assert_eq!(section.fields["image_url"], json!("old.png"));
        assert_eq!(section.fields["body"], json!({ "headline": "New" }));
    }

    #[test]
    fn touch_never_precedes_creation() {
        let mut doc = new_document(OwnerId::new("u1"), "a", "b", Content::default())
            .into_document(WebsiteId::generate());
        doc.created_at = Utc::now() + chrono::Duration::hours(1);
        doc.touch();
        assert!(doc.updated_at >= doc.created_at);
    }

    #[test]
    fn untyped_sections_are_kept_verbatim() {
        let raw = json!({
            "sections": [
                { "title": "No type", "body": "x" },
                { "type": 7, "body": "numeric" },
                { "type": "hero" }
            ]
        });
        let content: Content = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(content.sections[0].section_type(), None);
        assert_eq!(content.sections[1].section_type(), None);
        assert_eq!(content.sections[2].section_type(), Some("hero"));
        assert_eq!(serde_json::to_value(&content).unwrap()["sections"], raw["sections"]);
    }

    #[test]
    fn null_top_level_fields_fall_back_to_defaults() {
        let content: Content = serde_json::from_value(json!({
            "title": null,
            "layout": null,
            "sections": null
        }))
        .unwrap();
        assert_eq!(content, Content::default());
    }
}
