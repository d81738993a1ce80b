use serde::Deserialize;
use serde_json::Value;

use super::repo::{NewPage, PageChanges};
use crate::blocks::validate_content;
use crate::error::ApiError;
use crate::sites::services::is_valid_slug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    pub title: String,
    pub slug: String,
    /// Ordered block array; defaults to empty.
    pub content: Option<Value>,
    pub order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<Value>,
    pub order: Option<i32>,
}

impl CreatePageRequest {
    /// Validates into an insertable row scoped to `site_id`. Content, when
    /// provided, must pass the strict block-schema check.
    pub fn into_new_page(self, site_id: i32) -> Result<NewPage, ApiError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::validation("Title is required", "title"));
        }
        if !is_valid_slug(&self.slug) {
            return Err(ApiError::validation(
                "Slug may only contain lowercase letters, digits and hyphens",
                "slug",
            ));
        }
        let content = match self.content {
            Some(content) => {
                validate_content(&content)?;
                content
            }
            None => Value::Array(Vec::new()),
        };
        Ok(NewPage {
            site_id,
            title,
            slug: self.slug,
            content,
            order: self.order.unwrap_or(0),
        })
    }
}

impl UpdatePageRequest {
    pub fn into_changes(self) -> Result<PageChanges, ApiError> {
        let title = match self.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(ApiError::validation("Title must not be empty", "title"));
                }
                Some(title)
            }
            None => None,
        };
        if let Some(slug) = &self.slug {
            if !is_valid_slug(slug) {
                return Err(ApiError::validation(
                    "Slug may only contain lowercase letters, digits and hyphens",
                    "slug",
                ));
            }
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        Ok(PageChanges {
            title,
            slug: self.slug,
            content: self.content,
            order: self.order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_defaults_to_empty_content_and_order_zero() {
        let page = CreatePageRequest {
            title: "Home".into(),
            slug: "home".into(),
            content: None,
            order: None,
        }
        .into_new_page(7)
        .unwrap();
        assert_eq!(page.site_id, 7);
        assert_eq!(page.content, json!([]));
        assert_eq!(page.order, 0);
    }

    #[test]
    fn create_rejects_invalid_content() {
        let err = CreatePageRequest {
            title: "Home".into(),
            slug: "home".into(),
            content: Some(json!([{ "id": "a", "type": "nope" }])),
            order: None,
        }
        .into_new_page(7)
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn update_validates_content_when_present() {
        let ok = UpdatePageRequest {
            content: Some(json!([{ "id": "a", "type": "text", "content": { "body": "x" } }])),
            ..Default::default()
        }
        .into_changes();
        assert!(ok.is_ok());

        let err = UpdatePageRequest {
            content: Some(json!("garbage")),
            ..Default::default()
        }
        .into_changes()
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "content"));
    }
}
