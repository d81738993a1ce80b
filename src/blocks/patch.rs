use serde::Deserialize;
use thiserror::Error;

use super::model::BlockBody;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("patch for '{patch}' does not match block of type '{block}'")]
    TypeMismatch { block: String, patch: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextPatch {
    pub heading: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImagePatch {
    pub url: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeaturesPatch {
    #[serde(rename = "feature1Title")]
    pub feature1_title: Option<String>,
    #[serde(rename = "feature1Desc")]
    pub feature1_desc: Option<String>,
    #[serde(rename = "feature2Title")]
    pub feature2_title: Option<String>,
    #[serde(rename = "feature2Desc")]
    pub feature2_desc: Option<String>,
    #[serde(rename = "feature3Title")]
    pub feature3_title: Option<String>,
    #[serde(rename = "feature3Desc")]
    pub feature3_desc: Option<String>,
}

/// Partial field set for one block type. Fields left `None` are preserved
/// on merge (shallow merge semantics).
#[derive(Debug, Clone)]
pub enum BlockPatch {
    Hero(HeroPatch),
    Text(TextPatch),
    Image(ImagePatch),
    Features(FeaturesPatch),
}

impl BlockPatch {
    fn kind_str(&self) -> &'static str {
        match self {
            BlockPatch::Hero(_) => "hero",
            BlockPatch::Text(_) => "text",
            BlockPatch::Image(_) => "image",
            BlockPatch::Features(_) => "features",
        }
    }
}

fn merge(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

impl BlockBody {
    /// Shallow-merges `patch` into this block's content. A patch whose
    /// variant does not match the block's type is rejected.
    pub fn apply(&mut self, patch: &BlockPatch) -> Result<(), PatchError> {
        match (self, patch) {
            (BlockBody::Hero(c), BlockPatch::Hero(p)) => {
                merge(&mut c.title, &p.title);
                merge(&mut c.subtitle, &p.subtitle);
                merge(&mut c.cta_text, &p.cta_text);
                Ok(())
            }
            (BlockBody::Text(c), BlockPatch::Text(p)) => {
                merge(&mut c.heading, &p.heading);
                merge(&mut c.body, &p.body);
                Ok(())
            }
            (BlockBody::Image(c), BlockPatch::Image(p)) => {
                merge(&mut c.url, &p.url);
                merge(&mut c.caption, &p.caption);
                Ok(())
            }
            (BlockBody::Features(c), BlockPatch::Features(p)) => {
                merge(&mut c.feature1_title, &p.feature1_title);
                merge(&mut c.feature1_desc, &p.feature1_desc);
                merge(&mut c.feature2_title, &p.feature2_title);
                merge(&mut c.feature2_desc, &p.feature2_desc);
                merge(&mut c.feature3_title, &p.feature3_title);
                merge(&mut c.feature3_desc, &p.feature3_desc);
                Ok(())
            }
            (body, patch) => Err(PatchError::TypeMismatch {
                block: body.kind_str().to_string(),
                patch: patch.kind_str().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::model::HeroContent;

    #[test]
    fn patch_touches_only_named_fields() {
        let mut body = BlockBody::Hero(HeroContent {
            title: "Old".into(),
            subtitle: "Keep me".into(),
            cta_text: "Keep me too".into(),
        });
        body.apply(&BlockPatch::Hero(HeroPatch {
            title: Some("New".into()),
            ..Default::default()
        }))
        .unwrap();

        match body {
            BlockBody::Hero(c) => {
                assert_eq!(c.title, "New");
                assert_eq!(c.subtitle, "Keep me");
                assert_eq!(c.cta_text, "Keep me too");
            }
            other => panic!("expected hero, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_patch_is_rejected() {
        let mut body = BlockBody::Text(Default::default());
        let err = body
            .apply(&BlockPatch::Image(ImagePatch::default()))
            .unwrap_err();
        assert_eq!(
            err,
            PatchError::TypeMismatch {
                block: "text".into(),
                patch: "image".into()
            }
        );
    }
}
