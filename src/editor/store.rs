use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// Persistence seam for the editing session. The unit of persistence is
/// always the whole block list; there is no field-level save.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn replace_content(&self, page_id: i32, content: Value) -> anyhow::Result<()>;
}

/// Store backed by the pages table.
pub struct DbContentStore {
    db: PgPool,
}

impl DbContentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentStore for DbContentStore {
    async fn replace_content(&self, page_id: i32, content: Value) -> anyhow::Result<()> {
        crate::pages::repo::replace_content(&self.db, page_id, &content).await?;
        Ok(())
    }
}
