use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// A user-owned website project with a globally unique public slug.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: i32,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_published: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewSite {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_published: bool,
}

/// Partial-field merge for updates; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct SiteChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub is_published: Option<bool>,
}

const SITE_COLUMNS: &str =
    "id, user_id, name, description, slug, is_published, created_at, updated_at";

fn slug_conflict(e: sqlx::Error) -> ApiError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ApiError::Conflict("A site with this slug already exists".into())
        }
        _ => ApiError::Database(e),
    }
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Site>> {
    sqlx::query_as::<_, Site>(&format!(
        "SELECT {SITE_COLUMNS} FROM sites WHERE user_id = $1 ORDER BY updated_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn get(db: &PgPool, id: i32) -> sqlx::Result<Option<Site>> {
    sqlx::query_as::<_, Site>(&format!("SELECT {SITE_COLUMNS} FROM sites WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn get_by_slug(db: &PgPool, slug: &str) -> sqlx::Result<Option<Site>> {
    sqlx::query_as::<_, Site>(&format!("SELECT {SITE_COLUMNS} FROM sites WHERE slug = $1"))
        .bind(slug)
        .fetch_optional(db)
        .await
}

/// Inserts a site. The owner id always comes from the caller context, never
/// from client input. A duplicate slug maps to `Conflict`.
pub async fn create(db: &PgPool, site: &NewSite) -> Result<Site, ApiError> {
    sqlx::query_as::<_, Site>(&format!(
        r#"
        INSERT INTO sites (user_id, name, description, slug, is_published)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {SITE_COLUMNS}
        "#
    ))
    .bind(site.user_id)
    .bind(&site.name)
    .bind(&site.description)
    .bind(&site.slug)
    .bind(site.is_published)
    .fetch_one(db)
    .await
    .map_err(slug_conflict)
}

/// Partial update; `updated_at` is refreshed on every call regardless of
/// which fields changed.
pub async fn update(db: &PgPool, id: i32, changes: &SiteChanges) -> Result<Option<Site>, ApiError> {
    sqlx::query_as::<_, Site>(&format!(
        r#"
        UPDATE sites SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            slug = COALESCE($4, slug),
            is_published = COALESCE($5, is_published),
            updated_at = now()
        WHERE id = $1
        RETURNING {SITE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(&changes.slug)
    .bind(changes.is_published)
    .fetch_optional(db)
    .await
    .map_err(slug_conflict)
}

/// Deletes a site and all of its pages in one transaction, so a crash
/// mid-delete can never leave pages referencing a missing site.
pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM pages WHERE site_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM sites WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
