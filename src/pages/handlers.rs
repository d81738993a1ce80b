use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CreatePageRequest, UpdatePageRequest};
use super::repo::{self, Page};
use crate::access::{authorize_owner, authorize_public_read};
use crate::auth::jwt::{AuthUser, MaybeAuthUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/sites/:id/pages", get(list_pages).post(create_page))
        .route(
            "/sites/:id/pages/:page_id",
            get(get_page).put(update_page).delete(delete_page),
        )
}

/// Readable by anyone when the site is published, otherwise only by the
/// owner; non-owners see NotFound either way.
#[instrument(skip(state))]
pub async fn list_pages(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Path(site_id): Path<i32>,
) -> ApiResult<Json<Vec<Page>>> {
    let site = crate::sites::repo::get(&state.db, site_id).await?;
    authorize_public_read(caller, site.as_ref())?;
    Ok(Json(repo::list_for_site(&state.db, site_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_page(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(site_id): Path<i32>,
    Json(payload): Json<CreatePageRequest>,
) -> ApiResult<(StatusCode, Json<Page>)> {
    let site = crate::sites::repo::get(&state.db, site_id).await?;
    authorize_owner(Some(user_id), site.as_ref())?;

    let new_page = payload.into_new_page(site_id)?;
    let page = repo::create(&state.db, &new_page).await?;
    info!(page_id = page.id, site_id, "page created");
    Ok((StatusCode::CREATED, Json(page)))
}

#[instrument(skip(state))]
pub async fn get_page(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Path((site_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<Json<Page>> {
    let site = crate::sites::repo::get(&state.db, site_id).await?;
    authorize_public_read(caller, site.as_ref())?;

    let page = repo::get_scoped(&state.db, site_id, page_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Page"))?;
    Ok(Json(page))
}

#[instrument(skip(state, payload))]
pub async fn update_page(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((site_id, page_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdatePageRequest>,
) -> ApiResult<Json<Page>> {
    let site = crate::sites::repo::get(&state.db, site_id).await?;
    authorize_owner(Some(user_id), site.as_ref())?;

    repo::get_scoped(&state.db, site_id, page_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Page"))?;

    let changes = payload.into_changes()?;
    let page = repo::update(&state.db, page_id, &changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Page"))?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn delete_page(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((site_id, page_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    let site = crate::sites::repo::get(&state.db, site_id).await?;
    authorize_owner(Some(user_id), site.as_ref())?;

    repo::get_scoped(&state.db, site_id, page_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Page"))?;

    repo::delete(&state.db, page_id).await?;
    info!(page_id, site_id, "page deleted");
    Ok(StatusCode::NO_CONTENT)
}
