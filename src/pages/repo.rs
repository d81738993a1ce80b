use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};

/// An ordered, named sub-unit of a site. `content` holds the whole block
/// list as one JSON value; blocks are not separately addressable in storage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: i32,
    pub site_id: i32,
    pub title: String,
    pub slug: String,
    pub content: Value,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct NewPage {
    pub site_id: i32,
    pub title: String,
    pub slug: String,
    pub content: Value,
    pub order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PageChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<Value>,
    pub order: Option<i32>,
}

const PAGE_COLUMNS: &str = r#"id, site_id, title, slug, content, "order""#;

/// Pages in display order: ascending by `order`, ties broken by id.
pub async fn list_for_site(db: &PgPool, site_id: i32) -> sqlx::Result<Vec<Page>> {
    sqlx::query_as::<_, Page>(&format!(
        r#"SELECT {PAGE_COLUMNS} FROM pages WHERE site_id = $1 ORDER BY "order" ASC, id ASC"#
    ))
    .bind(site_id)
    .fetch_all(db)
    .await
}

/// Fetches a page only if it belongs to the requested site; a page whose
/// `site_id` does not match the scope is treated as absent.
pub async fn get_scoped(db: &PgPool, site_id: i32, id: i32) -> sqlx::Result<Option<Page>> {
    sqlx::query_as::<_, Page>(&format!(
        "SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1 AND site_id = $2"
    ))
    .bind(id)
    .bind(site_id)
    .fetch_optional(db)
    .await
}

pub async fn create(db: &PgPool, page: &NewPage) -> sqlx::Result<Page> {
    sqlx::query_as::<_, Page>(&format!(
        r#"
        INSERT INTO pages (site_id, title, slug, content, "order")
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {PAGE_COLUMNS}
        "#
    ))
    .bind(page.site_id)
    .bind(&page.title)
    .bind(&page.slug)
    .bind(&page.content)
    .bind(page.order)
    .fetch_one(db)
    .await
}

pub async fn update(db: &PgPool, id: i32, changes: &PageChanges) -> sqlx::Result<Option<Page>> {
    sqlx::query_as::<_, Page>(&format!(
        r#"
        UPDATE pages SET
            title = COALESCE($2, title),
            slug = COALESCE($3, slug),
            content = COALESCE($4, content),
            "order" = COALESCE($5, "order")
        WHERE id = $1
        RETURNING {PAGE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.slug)
    .bind(&changes.content)
    .bind(changes.order)
    .fetch_optional(db)
    .await
}

/// The editing session's single bulk write: replaces the whole block list.
pub async fn replace_content(db: &PgPool, id: i32, content: &Value) -> sqlx::Result<()> {
    sqlx::query("UPDATE pages SET content = $2 WHERE id = $1")
        .bind(id)
        .bind(content)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM pages WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
