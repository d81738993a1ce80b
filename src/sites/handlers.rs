use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CreateSiteRequest, UpdateSiteRequest};
use super::repo::{self, Site};
use super::services::{prepare_new_site, prepare_site_changes};
use crate::access::{authorize_owner, authorize_public_read};
use crate::auth::jwt::{AuthUser, MaybeAuthUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/sites", get(list_sites).post(create_site))
        .route("/sites/slug/:slug", get(get_site_by_slug))
        .route(
            "/sites/:id",
            get(get_site).put(update_site).delete(delete_site),
        )
}

#[instrument(skip(state))]
pub async fn list_sites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Site>>> {
    Ok(Json(repo::list_for_user(&state.db, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_site(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateSiteRequest>,
) -> ApiResult<(StatusCode, Json<Site>)> {
    let new_site = prepare_new_site(user_id, payload)?;
    let site = repo::create(&state.db, &new_site).await?;
    info!(site_id = site.id, %user_id, slug = %site.slug, "site created");
    Ok((StatusCode::CREATED, Json(site)))
}

/// Owner-facing path for the editor/dashboard. Always requires ownership,
/// regardless of publication state.
#[instrument(skip(state))]
pub async fn get_site(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Site>> {
    let site = repo::get(&state.db, id).await?;
    let site = authorize_owner(Some(user_id), site.as_ref())?;
    Ok(Json(site.clone()))
}

/// Public preview path. Published sites are visible to anyone; private
/// sites only to their owner, hidden as NotFound from everyone else.
#[instrument(skip(state))]
pub async fn get_site_by_slug(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<Site>> {
    let site = repo::get_by_slug(&state.db, &slug).await?;
    let site = authorize_public_read(caller, site.as_ref())?;
    Ok(Json(site.clone()))
}

#[instrument(skip(state, payload))]
pub async fn update_site(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSiteRequest>,
) -> ApiResult<Json<Site>> {
    let site = repo::get(&state.db, id).await?;
    authorize_owner(Some(user_id), site.as_ref())?;

    let changes = prepare_site_changes(payload)?;
    let updated = repo::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Site"))?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_site(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let site = repo::get(&state.db, id).await?;
    authorize_owner(Some(user_id), site.as_ref())?;

    repo::delete(&state.db, id).await?;
    info!(site_id = id, %user_id, "site deleted with pages");
    Ok(StatusCode::NO_CONTENT)
}
