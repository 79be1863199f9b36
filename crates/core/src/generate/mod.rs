//! Boundary to the AI content generator.
//!
//! The core only builds the prompt and parses what comes back. Transport,
//! credentials and model choice belong to the implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::document::Content;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator request failed: {0}")]
    Upstream(String),

    #[error("generator returned no content")]
    EmptyResponse,

    #[error("generator returned unparsable content: {0}")]
    Unparsable(String),
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, business_type: &str, industry: &str)
        -> Result<Content, GenerationError>;
}

/// Prompt asking for site content in the JSON shape `Content` expects.
pub fn site_content_prompt(business_type: &str, industry: &str) -> String {
    format!(
        r#"Generate structured website content for:
Business Type: {business_type}
Industry: {industry}

Return only JSON in this shape:
{{
    "title": "...",
    "sections": [
        {{
            "title": "Hero Section",
            "type": "hero",
            "body": {{ "headline": "...", "subheadline": "..." }},
            "images": ["hero1.jpg"]
        }},
        {{ "title": "About Us", "type": "about", "body": "...", "images": [] }},
        {{ "title": "Services", "type": "services", "body": ["Service 1", "Service 2", "Service 3"], "images": [] }},
        {{ "title": "Contact", "type": "contact", "body": "...", "images": [] }}
    ]
}}"#
    )
}

/// Parse raw generator output into `Content`.
///
/// Models often wrap JSON in a Markdown code fence; one fence is stripped.
pub fn parse_generated_content(raw: &str) -> Result<Content, GenerationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let json = strip_code_fence(trimmed);
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| GenerationError::Unparsable(e.to_string()))?;
    if !value.is_object() {
        return Err(GenerationError::Unparsable(
            "top-level value is not an object".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| GenerationError::Unparsable(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip an optional language tag on the opening fence line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_inputs() {
        let prompt = site_content_prompt("bakery", "food");
        assert!(prompt.contains("Business Type: bakery"));
        assert!(prompt.contains("Industry: food"));
        assert!(prompt.contains("\"type\": \"hero\""));
    }

    #[test]
    fn parses_plain_json() {
        let content = parse_generated_content(
            r#" {"title": "Crumbs", "sections": [{"type": "hero", "body": {"headline": "Hi"}}]} "#,
        )
        .unwrap();
        assert_eq!(content.title, "Crumbs");
        assert_eq!(content.sections[0].section_type(), Some("hero"));
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"title\": \"Fenced\", \"sections\": []}\n```";
        assert_eq!(parse_generated_content(raw).unwrap().title, "Fenced");

        let raw = "```\n{\"title\": \"Bare fence\"}\n```\n";
        assert_eq!(parse_generated_content(raw).unwrap().title, "Bare fence");
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(matches!(
            parse_generated_content("   "),
            Err(GenerationError::EmptyResponse)
        ));
        assert!(matches!(
            parse_generated_content("Sure! Here is your site."),
            Err(GenerationError::Unparsable(_))
        ));
        assert!(matches!(
            parse_generated_content("[1, 2]"),
            Err(GenerationError::Unparsable(_))
        ));
    }

    #[test]
    fn accepts_loosely_shaped_content() {
        let content = parse_generated_content(
            r#"{"title": null, "sections": [{"type": "hero"}, {"title": "Untitled block", "body": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(content.title, "");
        assert_eq!(content.sections.len(), 2);
        assert_eq!(content.sections[1].section_type(), None);
        assert_eq!(content.sections[1].title(), Some("Untitled block"));
    }
}
