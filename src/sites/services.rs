use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use super::dto::{CreateSiteRequest, UpdateSiteRequest};
use super::repo::{NewSite, SiteChanges};
use crate::error::ApiError;

pub fn is_valid_slug(slug: &str) -> bool {
    lazy_static! {
        static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    }
    SLUG_RE.is_match(slug)
}

/// Derives a URL-safe slug: lowercase, runs of non-alphanumeric characters
/// collapse to a single hyphen, no leading or trailing hyphen.
pub fn derive_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

fn checked_slug(slug: String) -> Result<String, ApiError> {
    if !is_valid_slug(&slug) {
        return Err(ApiError::validation(
            "Slug may only contain lowercase letters, digits and hyphens",
            "slug",
        ));
    }
    Ok(slug)
}

/// Validates a create request into an insertable row. The owner id comes
/// from the authenticated caller, never the payload.
pub fn prepare_new_site(user_id: Uuid, payload: CreateSiteRequest) -> Result<NewSite, ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("Name is required", "name"));
    }
    let slug = match payload.slug {
        Some(slug) => checked_slug(slug)?,
        None => {
            let derived = derive_slug(&name);
            if derived.is_empty() {
                return Err(ApiError::validation(
                    "Slug could not be derived from name",
                    "slug",
                ));
            }
            derived
        }
    };
    Ok(NewSite {
        user_id,
        name,
        description: payload.description,
        slug,
        is_published: payload.is_published,
    })
}

pub fn prepare_site_changes(payload: UpdateSiteRequest) -> Result<SiteChanges, ApiError> {
    let name = match payload.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ApiError::validation("Name must not be empty", "name"));
            }
            Some(name)
        }
        None => None,
    };
    let slug = payload.slug.map(checked_slug).transpose()?;
    Ok(SiteChanges {
        name,
        description: payload.description,
        slug,
        is_published: payload.is_published,
    })
}
