use std::collections::HashSet;

use serde_json::Value;

use super::model::{Block, BlockKind};
use crate::error::ApiError;

/// Decodes a page's stored `content` value into an ordered block list.
/// Accepts either a structured JSON array or a JSON-text encoding of one;
/// anything absent or invalid normalizes to the empty list.
pub fn decode_content(value: &Value) -> Vec<Block> {
    let value = match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(v) => v,
            Err(_) => return Vec::new(),
        },
        other => other.clone(),
    };
    serde_json::from_value(value).unwrap_or_default()
}

/// Serializes the whole block list as the single value persisted per save.
pub fn encode_content(blocks: &[Block]) -> Value {
    serde_json::to_value(blocks).unwrap_or_else(|_| Value::Array(Vec::new()))
}

fn allowed_fields(kind: BlockKind) -> &'static [&'static str] {
    match kind {
        BlockKind::Hero => &["title", "subtitle", "ctaText"],
        BlockKind::Text => &["heading", "body"],
        BlockKind::Image => &["url", "caption"],
        BlockKind::Features => &[
            "feature1Title",
            "feature1Desc",
            "feature2Title",
            "feature2Desc",
            "feature3Title",
            "feature3Desc",
        ],
    }
}

/// Strict write-boundary validation of an incoming `content` value, with
/// the offending field path reported back to the client. The lenient
/// [`decode_content`] is for reads; writes must not be able to persist
/// anything that would later normalize to an empty page.
pub fn validate_content(value: &Value) -> Result<(), ApiError> {
    let Some(items) = value.as_array() else {
        return Err(ApiError::validation(
            "Content must be an array of blocks",
            "content",
        ));
    };

    let mut seen_ids = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        let path = format!("content[{i}]");
        let Some(obj) = item.as_object() else {
            return Err(ApiError::validation("Block must be an object", path));
        };

        for key in obj.keys() {
            if key != "id" && key != "type" && key != "content" {
                return Err(ApiError::validation(
                    format!("Unknown block field '{key}'"),
                    format!("{path}.{key}"),
                ));
            }
        }

        let id = match obj.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err(ApiError::validation(
                    "Block id must be a non-empty string",
                    format!("{path}.id"),
                ))
            }
        };
        if !seen_ids.insert(id.to_string()) {
            return Err(ApiError::validation(
                format!("Duplicate block id '{id}'"),
                format!("{path}.id"),
            ));
        }

        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .and_then(BlockKind::from_str)
            .ok_or_else(|| {
                ApiError::validation("Unknown block type", format!("{path}.type"))
            })?;

        if let Some(content) = obj.get("content") {
            let Some(fields) = content.as_object() else {
                return Err(ApiError::validation(
                    "Block content must be an object",
                    format!("{path}.content"),
                ));
            };
            for (key, field_value) in fields {
                if !allowed_fields(kind).contains(&key.as_str()) {
                    return Err(ApiError::validation(
                        format!("Unknown field '{key}' for block type '{}'", kind.as_str()),
                        format!("{path}.content.{key}"),
                    ));
                }
                if !field_value.is_string() {
                    return Err(ApiError::validation(
                        format!("Field '{key}' must be a string"),
                        format!("{path}.content.{key}"),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::model::{BlockBody, HeroContent};
    use serde_json::json;

    #[test]
    fn round_trip_preserves_ids_types_and_content() {
        let blocks = vec![
            Block::new(BlockKind::Hero),
            Block::new(BlockKind::Text),
            Block {
                id: "custom".into(),
                body: BlockBody::Hero(HeroContent {
                    title: "T".into(),
                    subtitle: "S".into(),
                    cta_text: String::new(),
                }),
            },
        ];
        let decoded = decode_content(&encode_content(&blocks));
        assert_eq!(decoded, blocks);
    }

    #[test]
    fn decode_accepts_json_text_encoding() {
        let text = json!(r#"[{"id":"a","type":"text","content":{"body":"hi"}}]"#);
        let blocks = decode_content(&text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, "a");
    }

    #[test]
    fn invalid_or_absent_content_normalizes_to_empty() {
        assert!(decode_content(&Value::Null).is_empty());
        assert!(decode_content(&json!("not json")).is_empty());
        assert!(decode_content(&json!({"not": "an array"})).is_empty());
        assert!(decode_content(&json!([{"id": 42}])).is_empty());
    }

    #[test]
    fn validate_accepts_well_formed_content() {
        let content = json!([
            { "id": "a", "type": "hero", "content": { "title": "Hi" } },
            { "id": "b", "type": "features", "content": { "feature1Title": "X" } },
            { "id": "c", "type": "image" }
        ]);
        assert!(validate_content(&content).is_ok());
    }

    #[test]
    fn validate_reports_field_paths() {
        let err = validate_content(&json!({"nope": 1})).unwrap_err();
        assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "content"));

        let err = validate_content(&json!([{ "id": "a", "type": "video" }])).unwrap_err();
        assert!(
            matches!(err, ApiError::Validation { ref field, .. } if field == "content[0].type")
        );

        let err = validate_content(&json!([
            { "id": "a", "type": "text", "content": { "bogus": "x" } }
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ApiError::Validation { ref field, .. } if field == "content[0].content.bogus")
        );
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let content = json!([
            { "id": "same", "type": "text" },
            { "id": "same", "type": "hero" }
        ]);
        let err = validate_content(&content).unwrap_err();
        assert!(
            matches!(err, ApiError::Validation { ref field, .. } if field == "content[1].id")
        );
    }

    #[test]
    fn validate_rejects_non_string_field_values() {
        let content = json!([
            { "id": "a", "type": "text", "content": { "body": 7 } }
        ]);
        assert!(validate_content(&content).is_err());
    }
}
