//! Editing session for one page's block list.
//!
//! The session owns the in-memory ordered list, turns edit gestures into
//! block operations, and persists the whole list in a single write. States
//! move Unloaded -> Loaded -> Dirty -> Saving -> Loaded; a failed save
//! drops back to Dirty with the local edits intact so the caller can retry.

use serde_json::Value;
use thiserror::Error;

use super::store::ContentStore;
use crate::blocks::{decode_content, encode_content, Block, BlockKind, BlockPatch, PatchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loaded,
    Dirty,
    Saving,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no page loaded")]
    NoPage,
    #[error("block '{0}' not found")]
    BlockNotFound(String),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error("save failed: {0}")]
    SaveFailed(anyhow::Error),
}

pub struct EditorSession {
    state: SessionState,
    page_id: Option<i32>,
    blocks: Vec<Block>,
    editing: Option<String>,
    log: Vec<SessionState>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unloaded,
            page_id: None,
            blocks: Vec::new(),
            editing: None,
            log: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn page_id(&self) -> Option<i32> {
        self.page_id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block id currently open in the properties panel, if any.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Every state entered since the session was created, in order.
    pub fn transitions(&self) -> &[SessionState] {
        &self.log
    }

    fn transition(&mut self, next: SessionState) {
        self.state = next;
        self.log.push(next);
    }

    fn require_loaded(&self) -> Result<(), SessionError> {
        if self.page_id.is_none() {
            return Err(SessionError::NoPage);
        }
        Ok(())
    }

    /// Loads a page's stored content. Invalid or absent content normalizes
    /// to an empty list.
    pub fn load(&mut self, page_id: i32, content: &Value) {
        self.page_id = Some(page_id);
        self.blocks = decode_content(content);
        self.editing = None;
        self.transition(SessionState::Loaded);
    }

    /// Switches to another page. A dirty session first saves the current
    /// page and awaits completion; if that save fails, the switch is
    /// aborted and the session stays dirty on the current page.
    pub async fn switch_page(
        &mut self,
        store: &dyn ContentStore,
        page_id: i32,
        content: &Value,
    ) -> Result<(), SessionError> {
        if self.state == SessionState::Dirty {
            self.save(store).await?;
        }
        self.load(page_id, content);
        Ok(())
    }

    /// Appends a new block with a fresh id and type-specific defaults.
    /// Returns the generated id.
    pub fn add_block(&mut self, kind: BlockKind) -> Result<String, SessionError> {
        self.require_loaded()?;
        let block = Block::new(kind);
        let id = block.id.clone();
        self.blocks.push(block);
        self.transition(SessionState::Dirty);
        Ok(id)
    }

    pub fn open_for_editing(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.blocks.iter().any(|b| b.id == id) {
            return Err(SessionError::BlockNotFound(id.to_string()));
        }
        self.editing = Some(id.to_string());
        Ok(())
    }

    pub fn close_editing(&mut self) {
        self.editing = None;
    }

    /// Shallow-merges a partial field set into the matching block.
    pub fn update_block(&mut self, id: &str, patch: &BlockPatch) -> Result<(), SessionError> {
        self.require_loaded()?;
        let block = self
            .blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| SessionError::BlockNotFound(id.to_string()))?;
        block.body.apply(patch)?;
        self.transition(SessionState::Dirty);
        Ok(())
    }

    /// Removes the matching block. Clears editing focus if it pointed at
    /// the deleted block. Unknown ids are a no-op.
    pub fn delete_block(&mut self, id: &str) -> Result<(), SessionError> {
        self.require_loaded()?;
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        if self.blocks.len() == before {
            return Ok(());
        }
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        self.transition(SessionState::Dirty);
        Ok(())
    }

    /// Moves the block `source_id` to the position currently occupied by
    /// `target_id`, shifting the blocks between them. No-op if either id
    /// is missing or they are equal.
    pub fn reorder(&mut self, source_id: &str, target_id: &str) -> Result<(), SessionError> {
        self.require_loaded()?;
        if source_id == target_id {
            return Ok(());
        }
        let from = self.blocks.iter().position(|b| b.id == source_id);
        let to = self.blocks.iter().position(|b| b.id == target_id);
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(());
        };
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.transition(SessionState::Dirty);
        Ok(())
    }

    /// Serializes the whole block list and issues one replace-content call.
    /// On failure the state stays Dirty and the error is surfaced; the
    /// local edits are never dropped.
    pub async fn save(&mut self, store: &dyn ContentStore) -> Result<(), SessionError> {
        let Some(page_id) = self.page_id else {
            return Ok(());
        };
        if self.state != SessionState::Dirty {
            return Ok(());
        }
        self.transition(SessionState::Saving);
        match store.replace_content(page_id, encode_content(&self.blocks)).await {
            Ok(()) => {
                self.transition(SessionState::Loaded);
                Ok(())
            }
            Err(e) => {
                self.transition(SessionState::Dirty);
                Err(SessionError::SaveFailed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockBody, BlockPatch, HeroPatch, TextPatch};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Vec<(i32, Value)>>,
        fail_next: AtomicBool,
    }

    impl MemoryStore {
        fn last_saved(&self) -> Option<(i32, Value)> {
            self.saved.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl ContentStore for MemoryStore {
        async fn replace_content(&self, page_id: i32, content: Value) -> anyhow::Result<()> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                anyhow::bail!("store unavailable");
            }
            self.saved.lock().unwrap().push((page_id, content));
            Ok(())
        }
    }

    fn loaded_session(content: Value) -> EditorSession {
        let mut session = EditorSession::new();
        session.load(1, &content);
        session
    }

    fn three_blocks() -> Value {
        json!([
            { "id": "a", "type": "hero", "content": { "title": "A" } },
            { "id": "b", "type": "text", "content": { "body": "B" } },
            { "id": "c", "type": "image", "content": { "url": "c.png" } }
        ])
    }

    fn ids(session: &EditorSession) -> Vec<&str> {
        session.blocks().iter().map(|b| b.id.as_str()).collect()
    }

    #[tokio::test]
    async fn add_then_save_then_reload_yields_one_hero_with_defaults() {
        let store = MemoryStore::default();
        let mut session = loaded_session(json!([]));

        session.add_block(BlockKind::Hero).unwrap();
        assert_eq!(session.state(), SessionState::Dirty);
        session.save(&store).await.unwrap();
        assert_eq!(session.state(), SessionState::Loaded);

        let (page_id, saved) = store.last_saved().unwrap();
        assert_eq!(page_id, 1);

        let mut reloaded = EditorSession::new();
        reloaded.load(1, &saved);
        assert_eq!(reloaded.blocks().len(), 1);
        match &reloaded.blocks()[0].body {
            BlockBody::Hero(c) => assert_eq!(c.title, "Your Hero Title"),
            other => panic!("expected hero, got {other:?}"),
        }
    }

    #[test]
    fn reorder_moves_source_to_targets_prior_position() {
        let mut session = loaded_session(three_blocks());
        session.reorder("a", "c").unwrap();
        assert_eq!(ids(&session), ["b", "c", "a"]);

        let mut session = loaded_session(three_blocks());
        session.reorder("c", "a").unwrap();
        assert_eq!(ids(&session), ["c", "a", "b"]);
    }

    #[test]
    fn reorder_is_a_permutation_with_content_unchanged() {
        let mut session = loaded_session(three_blocks());
        let before = session.blocks().to_vec();
        session.reorder("b", "a").unwrap();
        let after = session.blocks();
        assert_eq!(after.len(), before.len());
        for block in &before {
            assert!(after.contains(block));
        }
    }

    #[test]
    fn reorder_with_missing_or_equal_ids_is_noop() {
        let mut session = loaded_session(three_blocks());
        session.reorder("a", "missing").unwrap();
        session.reorder("missing", "a").unwrap();
        session.reorder("b", "b").unwrap();
        assert_eq!(ids(&session), ["a", "b", "c"]);
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn update_changes_only_named_field_on_named_block() {
        let mut session = loaded_session(three_blocks());
        session
            .update_block(
                "a",
                &BlockPatch::Hero(HeroPatch {
                    title: Some("New title".into()),
                    ..Default::default()
                }),
            )
            .unwrap();

        match &session.blocks()[0].body {
            BlockBody::Hero(c) => {
                assert_eq!(c.title, "New title");
                assert!(c.subtitle.is_empty());
            }
            other => panic!("expected hero, got {other:?}"),
        }
        // Other blocks untouched.
        match &session.blocks()[1].body {
            BlockBody::Text(c) => assert_eq!(c.body, "B"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn update_of_absent_id_signals_not_found() {
        let mut session = loaded_session(three_blocks());
        let err = session
            .update_block("zzz", &BlockPatch::Text(TextPatch::default()))
            .unwrap_err();
        assert!(matches!(err, SessionError::BlockNotFound(_)));
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn delete_clears_editing_focus() {
        let mut session = loaded_session(three_blocks());
        session.open_for_editing("b").unwrap();
        session.delete_block("b").unwrap();
        assert_eq!(session.editing(), None);
        assert_eq!(ids(&session), ["a", "c"]);
        assert_eq!(session.state(), SessionState::Dirty);
    }

    #[tokio::test]
    async fn failed_save_stays_dirty_with_edits_intact() {
        let store = MemoryStore::default();
        store.fail_next.store(true, Ordering::SeqCst);

        let mut session = loaded_session(json!([]));
        session.add_block(BlockKind::Text).unwrap();

        let err = session.save(&store).await.unwrap_err();
        assert!(matches!(err, SessionError::SaveFailed(_)));
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.blocks().len(), 1);
        assert!(store.last_saved().is_none());

        // Retry succeeds and drains the dirty state.
        session.save(&store).await.unwrap();
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(store.last_saved().is_some());
    }

    #[tokio::test]
    async fn switch_page_awaits_save_of_previous_page() {
        let store = MemoryStore::default();
        let mut session = loaded_session(json!([]));
        session.add_block(BlockKind::Hero).unwrap();

        session.switch_page(&store, 2, &json!([])).await.unwrap();

        let (saved_page, _) = store.last_saved().unwrap();
        assert_eq!(saved_page, 1);
        assert_eq!(session.page_id(), Some(2));
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(session.blocks().is_empty());
    }

    #[tokio::test]
    async fn failed_save_aborts_page_switch() {
        let store = MemoryStore::default();
        store.fail_next.store(true, Ordering::SeqCst);

        let mut session = loaded_session(json!([]));
        session.add_block(BlockKind::Hero).unwrap();

        let err = session.switch_page(&store, 2, &json!([])).await.unwrap_err();
        assert!(matches!(err, SessionError::SaveFailed(_)));
        assert_eq!(session.page_id(), Some(1));
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.blocks().len(), 1);
    }

    #[tokio::test]
    async fn transition_log_records_intermediate_states() {
        let store = MemoryStore::default();
        let mut session = loaded_session(json!([]));
        session.add_block(BlockKind::Hero).unwrap();
        session.save(&store).await.unwrap();

        assert_eq!(
            session.transitions(),
            [
                SessionState::Loaded,
                SessionState::Dirty,
                SessionState::Saving,
                SessionState::Loaded,
            ]
        );
    }

    #[test]
    fn mutations_require_a_loaded_page() {
        let mut session = EditorSession::new();
        assert!(matches!(
            session.add_block(BlockKind::Hero),
            Err(SessionError::NoPage)
        ));
    }

    #[tokio::test]
    async fn save_without_changes_is_noop() {
        let store = MemoryStore::default();
        let mut session = loaded_session(three_blocks());
        session.save(&store).await.unwrap();
        assert!(store.last_saved().is_none());
        assert_eq!(session.state(), SessionState::Loaded);
    }
}
