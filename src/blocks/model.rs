use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// The four block types the editor knows how to place and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Hero,
    Text,
    Image,
    Features,
}

impl BlockKind {
    pub const ALL: [BlockKind; 4] = [
        BlockKind::Hero,
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Features,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Features => "features",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hero" => Some(BlockKind::Hero),
            "text" => Some(BlockKind::Text),
            "image" => Some(BlockKind::Image),
            "features" => Some(BlockKind::Features),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct HeroContent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cta_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct TextContent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub heading: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ImageContent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub caption: String,
}

/// Three fixed title/description pairs, stored under indexed keys
/// (`feature1Title`, `feature1Desc`, ...) to match the persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FeaturesContent {
    #[serde(rename = "feature1Title", skip_serializing_if = "String::is_empty")]
    pub feature1_title: String,
    #[serde(rename = "feature1Desc", skip_serializing_if = "String::is_empty")]
    pub feature1_desc: String,
    #[serde(rename = "feature2Title", skip_serializing_if = "String::is_empty")]
    pub feature2_title: String,
    #[serde(rename = "feature2Desc", skip_serializing_if = "String::is_empty")]
    pub feature2_desc: String,
    #[serde(rename = "feature3Title", skip_serializing_if = "String::is_empty")]
    pub feature3_title: String,
    #[serde(rename = "feature3Desc", skip_serializing_if = "String::is_empty")]
    pub feature3_desc: String,
}

/// Typed block payload. `Unknown` carries content written by a newer (or
/// older) schema verbatim, so it survives a load/save cycle untouched and
/// renders as a placeholder instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockBody {
    Hero(HeroContent),
    Text(TextContent),
    Image(ImageContent),
    Features(FeaturesContent),
    Unknown { kind: String, content: Value },
}

impl BlockBody {
    pub fn with_defaults(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Hero => BlockBody::Hero(HeroContent {
                title: "Your Hero Title".into(),
                subtitle: "Write a subtitle that explains your value proposition.".into(),
                cta_text: "Get Started".into(),
            }),
            BlockKind::Text => BlockBody::Text(TextContent {
                heading: "Section Heading".into(),
                body: "This is a text block. Write your content here.".into(),
            }),
            BlockKind::Image => BlockBody::Image(ImageContent::default()),
            BlockKind::Features => BlockBody::Features(FeaturesContent {
                feature1_title: "Feature 1".into(),
                feature1_desc: "Describe this feature in a few words.".into(),
                feature2_title: "Feature 2".into(),
                feature2_desc: "Describe this feature in a few words.".into(),
                feature3_title: "Feature 3".into(),
                feature3_desc: "Describe this feature in a few words.".into(),
            }),
        }
    }

    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            BlockBody::Hero(_) => Some(BlockKind::Hero),
            BlockBody::Text(_) => Some(BlockKind::Text),
            BlockBody::Image(_) => Some(BlockKind::Image),
            BlockBody::Features(_) => Some(BlockKind::Features),
            BlockBody::Unknown { .. } => None,
        }
    }

    pub fn kind_str(&self) -> &str {
        match self {
            BlockBody::Unknown { kind, .. } => kind.as_str(),
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }
}

/// One positionally-ordered content unit within a page. Wire shape:
/// `{"id": "...", "type": "hero", "content": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: String,
    pub body: BlockBody,
}

impl Block {
    /// A fresh block with a generated id and type-specific default fields.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            body: BlockBody::with_defaults(kind),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("Block", 3)?;
        st.serialize_field("id", &self.id)?;
        st.serialize_field("type", self.body.kind_str())?;
        match &self.body {
            BlockBody::Hero(c) => st.serialize_field("content", c)?,
            BlockBody::Text(c) => st.serialize_field("content", c)?,
            BlockBody::Image(c) => st.serialize_field("content", c)?,
            BlockBody::Features(c) => st.serialize_field("content", c)?,
            BlockBody::Unknown { content, .. } => st.serialize_field("content", content)?,
        }
        st.end()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBlock::deserialize(deserializer)?;
        let content = if raw.content.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            raw.content
        };
        let body = match BlockKind::from_str(&raw.kind) {
            Some(BlockKind::Hero) => {
                BlockBody::Hero(serde_json::from_value(content).map_err(D::Error::custom)?)
            }
            Some(BlockKind::Text) => {
                BlockBody::Text(serde_json::from_value(content).map_err(D::Error::custom)?)
            }
            Some(BlockKind::Image) => {
                BlockBody::Image(serde_json::from_value(content).map_err(D::Error::custom)?)
            }
            Some(BlockKind::Features) => {
                BlockBody::Features(serde_json::from_value(content).map_err(D::Error::custom)?)
            }
            None => BlockBody::Unknown {
                kind: raw.kind,
                content,
            },
        };
        Ok(Block { id: raw.id, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape_matches_contract() {
        let block = Block {
            id: "b1".into(),
            body: BlockBody::Hero(HeroContent {
                title: "Welcome".into(),
                subtitle: String::new(),
                cta_text: "Go".into(),
            }),
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({ "id": "b1", "type": "hero", "content": { "title": "Welcome", "ctaText": "Go" } })
        );
    }

    #[test]
    fn unknown_type_round_trips_verbatim() {
        let value = json!({ "id": "x", "type": "video", "content": { "src": "clip.mp4" } });
        let block: Block = serde_json::from_value(value.clone()).unwrap();
        assert!(matches!(block.body, BlockBody::Unknown { .. }));
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn known_type_rejects_unknown_content_fields() {
        let value = json!({ "id": "x", "type": "text", "content": { "heading": "Hi", "bogus": "1" } });
        assert!(serde_json::from_value::<Block>(value).is_err());
    }

    #[test]
    fn missing_content_defaults_to_empty_fields() {
        let value = json!({ "id": "x", "type": "image" });
        let block: Block = serde_json::from_value(value).unwrap();
        assert_eq!(block.body, BlockBody::Image(ImageContent::default()));
    }

    #[test]
    fn new_block_has_type_specific_defaults() {
        let hero = Block::new(BlockKind::Hero);
        assert!(!hero.id.is_empty());
        match hero.body {
            BlockBody::Hero(c) => {
                assert_eq!(c.title, "Your Hero Title");
                assert_eq!(c.cta_text, "Get Started");
            }
            other => panic!("expected hero, got {other:?}"),
        }
        let text = Block::new(BlockKind::Text);
        assert!(matches!(text.body, BlockBody::Text(_)));
    }
}
