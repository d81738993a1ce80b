//! Access control gate for sites and their pages.
//!
//! All decisions follow one fixed order: Unauthenticated, then NotFound,
//! then Forbidden. Private sites are hidden from non-owners on the public
//! read path (NotFound, never Forbidden), so outsiders cannot confirm that
//! a slug exists.

use uuid::Uuid;

use crate::error::ApiError;
use crate::sites::repo::Site;

/// Gate for mutations and owner-facing reads (dashboard/editor by id).
/// Requires an authenticated caller that owns the site.
pub fn authorize_owner<'a>(
    caller: Option<Uuid>,
    site: Option<&'a Site>,
) -> Result<&'a Site, ApiError> {
    let caller = caller.ok_or(ApiError::Unauthenticated)?;
    let site = site.ok_or_else(|| ApiError::not_found("Site"))?;
    if site.user_id != caller {
        return Err(ApiError::Forbidden);
    }
    Ok(site)
}

/// Gate for the public read path (slug preview, published page reads).
/// Published sites are readable by anyone; unpublished sites are readable
/// only by their owner and report NotFound to everyone else.
pub fn authorize_public_read<'a>(
    caller: Option<Uuid>,
    site: Option<&'a Site>,
) -> Result<&'a Site, ApiError> {
    let site = site.ok_or_else(|| ApiError::not_found("Site"))?;
    if site.is_published {
        return Ok(site);
    }
    match caller {
        Some(id) if site.user_id == id => Ok(site),
        _ => Err(ApiError::not_found("Site")),
    }
}
