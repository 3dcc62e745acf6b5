//! Highlight session - per-document lifecycle and the glue between the
//! highlight store, the renderer and storage.
//!
//! Documents move `Unloaded -> Loaded -> Active`. A document is loaded the
//! first time it is referenced (stored highlights are read and given fresh
//! handles) and becomes active when it gets editor focus. Every mutation
//! re-renders the active document and persists the changed set before the
//! method returns.

use std::collections::HashMap;

use crate::config::HighlighterConfig;
use crate::error::HighlightError;
use crate::highlight::adjust::{ordered_changes, TextChange};
use crate::highlight::overlap;
use crate::highlight::store::{AdjustStats, HighlightStore, ReplaceStats};
use crate::model::{Color, DocumentKey, DocumentText, Highlight, Position, Range, Selection};
use crate::persistence::{load_for, save_for, Storage};
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentState {
    #[default]
    Unloaded,
    Loaded,
    Active,
}

/// The focused editor as last reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditor {
    pub key: DocumentKey,
    pub selection: Selection,
}

/// Identifies one color-pick interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickToken(u64);

/// A color pick waiting for the user's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPick {
    pub token: PickToken,
    pub key: DocumentKey,
    pub range: Range,
}

pub struct Session<R: Renderer, S: Storage> {
    pub config: HighlighterConfig,
    store: HighlightStore<R::Handle>,
    states: HashMap<DocumentKey, DocumentState>,
    active: Option<ActiveEditor>,
    pending_pick: Option<PendingPick>,
    next_pick: u64,
    renderer: R,
    storage: S,
}

impl<R: Renderer, S: Storage> Session<R, S> {
    pub fn new(config: HighlighterConfig, renderer: R, storage: S) -> Self {
        Self {
            config,
            store: HighlightStore::new(),
            states: HashMap::new(),
            active: None,
            pending_pick: None,
            next_pick: 0,
            renderer,
            storage,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn state(&self, key: &DocumentKey) -> DocumentState {
        self.states.get(key).copied().unwrap_or_default()
    }

    pub fn active(&self) -> Option<&ActiveEditor> {
        self.active.as_ref()
    }

    pub fn pending_pick(&self) -> Option<&PendingPick> {
        self.pending_pick.as_ref()
    }

    /// Current highlights of a document (empty when none or unloaded)
    pub fn highlights(&self, key: &DocumentKey) -> Vec<Highlight> {
        self.store.highlights(key)
    }

    /// The highlight covering `pos` in `key`, if any
    pub fn highlight_at(&self, key: &DocumentKey, pos: Position) -> Option<&Highlight> {
        self.store.get(key)?.highlight_at(pos)
    }

    /// Number of documents holding at least one highlight in memory
    pub fn document_count(&self) -> usize {
        self.store.document_count()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Read stored highlights for `key` if it is not loaded yet.
    ///
    /// Entries that no longer fit `text` are skipped and returned; the rest
    /// load normally.
    pub fn load(&mut self, key: &DocumentKey, text: &dyn DocumentText) -> Vec<HighlightError> {
        if self.state(key) != DocumentState::Unloaded {
            return Vec::new();
        }

        let (records, mut skipped) = match load_for(&self.storage, key) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("Failed to read stored highlights for {}: {:#}", key, e);
                (Vec::new(), Vec::new())
            }
        };

        // Painting in stored order keeps the set disjoint even if the
        // stored data overlaps
        let mut highlights = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match record.to_highlight(text) {
                Ok(h) => highlights = overlap::paint(&highlights, h.range, &h.color),
                Err(reason) => skipped.push(HighlightError::CorruptPersistedEntry {
                    key: key.to_string(),
                    index,
                    reason,
                }),
            }
        }

        for error in &skipped {
            tracing::warn!("{}", error);
        }

        let count = highlights.len();
        self.store.replace(key, highlights, &mut self.renderer);
        self.states.insert(key.clone(), DocumentState::Loaded);
        tracing::info!(%key, count, skipped = skipped.len(), "document loaded");
        skipped
    }

    /// Give `key` editor focus, loading it first if needed
    pub fn activate(
        &mut self,
        key: &DocumentKey,
        text: &dyn DocumentText,
    ) -> Vec<HighlightError> {
        let skipped = self.load(key, text);

        if let Some(previous) = self.active.take() {
            if previous.key != *key {
                if let Some(state) = self.states.get_mut(&previous.key) {
                    *state = DocumentState::Loaded;
                }
            }
        }

        self.states.insert(key.clone(), DocumentState::Active);
        self.active = Some(ActiveEditor {
            key: key.clone(),
            selection: Selection::default(),
        });
        self.render(key);
        skipped
    }

    /// Record the active editor's selection
    pub fn set_selection(&mut self, selection: Selection) {
        match self.active.as_mut() {
            Some(active) => active.selection = selection,
            None => tracing::debug!("selection change without an active editor"),
        }
    }

    /// Release everything held for `key`. Stored highlights stay on disk.
    /// Returns the token of a color pick this cancelled.
    pub fn close(&mut self, key: &DocumentKey) -> Option<PickToken> {
        let released = self.store.clear(key, &mut self.renderer);
        self.states.remove(key);
        if self.active.as_ref().is_some_and(|a| a.key == *key) {
            self.active = None;
        }
        tracing::debug!(%key, released, "document closed");
        self.cancel_pick_for(key)
    }

    /// Release every handle held by the session
    pub fn dispose(&mut self) {
        let released = self.store.clear_all(&mut self.renderer);
        self.states.clear();
        self.active = None;
        self.pending_pick = None;
        tracing::debug!(released, "session disposed");
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Paint `color` over `range`. Returns whether anything changed.
    pub fn paint(&mut self, key: &DocumentKey, range: Range, color: &Color) -> bool {
        if !self.ensure_loaded(key) {
            return false;
        }
        let updated = overlap::paint(&self.store.highlights(key), range, color);
        let stats = self.store.replace(key, updated, &mut self.renderer);
        tracing::debug!(%key, %range, %color, ?stats, "painted");
        self.finish(key, stats)
    }

    /// Remove any color under `range`. Returns whether anything changed.
    pub fn clear_range(&mut self, key: &DocumentKey, range: Range) -> bool {
        if !self.ensure_loaded(key) {
            return false;
        }
        let updated = overlap::clear(&self.store.highlights(key), range);
        let stats = self.store.replace(key, updated, &mut self.renderer);
        tracing::debug!(%key, %range, ?stats, "cleared range");
        self.finish(key, stats)
    }

    /// Remove every highlight of `key`, including its stored entry
    pub fn clear_document(&mut self, key: &DocumentKey) -> usize {
        let released = self.store.clear(key, &mut self.renderer);
        self.persist(key);
        tracing::debug!(%key, released, "cleared document");
        released
    }

    /// Move the highlights of `key` through one edit batch
    pub fn apply_edits(
        &mut self,
        key: &DocumentKey,
        changes: &[TextChange],
    ) -> Option<AdjustStats> {
        let ordered = ordered_changes(changes, self.config.batch_coordinates);
        let stats = self.store.adjust(key, &ordered, &mut self.renderer)?;
        tracing::debug!(%key, changes = changes.len(), ?stats, "adjusted highlights");
        self.render(key);
        self.persist(key);
        Some(stats)
    }

    // =========================================================================
    // Color pick
    // =========================================================================

    /// Start a color pick for `range`. Nothing changes until it resolves.
    pub fn begin_pick(
        &mut self,
        key: &DocumentKey,
        range: Range,
    ) -> Result<PickToken, HighlightError> {
        if self.pending_pick.is_some() {
            return Err(HighlightError::PickerBusy);
        }
        if range.is_empty() {
            return Err(HighlightError::InvalidSelection);
        }
        self.next_pick += 1;
        let token = PickToken(self.next_pick);
        self.pending_pick = Some(PendingPick {
            token,
            key: key.clone(),
            range,
        });
        Ok(token)
    }

    /// Resolve the pending pick if `token` still names it
    pub fn take_pick(&mut self, token: PickToken) -> Option<PendingPick> {
        if self.pending_pick.as_ref().is_some_and(|p| p.token == token) {
            return self.pending_pick.take();
        }
        tracing::debug!(?token, "ignoring stale color pick");
        None
    }

    /// Drop a pending pick that targets `key`
    pub fn cancel_pick_for(&mut self, key: &DocumentKey) -> Option<PickToken> {
        if self.pending_pick.as_ref().is_some_and(|p| p.key == *key) {
            return self.pending_pick.take().map(|p| p.token);
        }
        None
    }

    /// Check store and session invariants (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        for key in self.store.keys() {
            debug_assert_ne!(
                self.state(key),
                DocumentState::Unloaded,
                "Highlights held for unloaded document {}",
                key
            );
            if let Some(document) = self.store.get(key) {
                document.assert_invariants();
            }
        }
        if let Some(active) = &self.active {
            debug_assert_eq!(self.state(&active.key), DocumentState::Active);
        }
        debug_assert!(
            self.states
                .values()
                .filter(|s| **s == DocumentState::Active)
                .count()
                <= 1,
            "At most one document may be active"
        );
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}

    // =========================================================================
    // Sync
    // =========================================================================

    fn ensure_loaded(&self, key: &DocumentKey) -> bool {
        let loaded = self.state(key) != DocumentState::Unloaded;
        if !loaded {
            tracing::warn!(%key, "ignoring highlight change for an unloaded document");
        }
        loaded
    }

    fn finish(&mut self, key: &DocumentKey, stats: ReplaceStats) -> bool {
        if !stats.changed() {
            return false;
        }
        self.render(key);
        self.persist(key);
        true
    }

    fn render(&mut self, key: &DocumentKey) {
        if self.state(key) != DocumentState::Active {
            return;
        }
        if let Some(document) = self.store.get(key) {
            document.render(&mut self.renderer);
        }
    }

    fn persist(&mut self, key: &DocumentKey) {
        let highlights = self.store.highlights(key);
        if let Err(e) = save_for(&mut self.storage, key, &highlights) {
            tracing::warn!("Failed to save highlights for {}: {:#}", key, e);
        }
    }
}

impl<R, S> std::fmt::Debug for Session<R, S>
where
    R: Renderer + std::fmt::Debug,
    S: Storage + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("states", &self.states)
            .field("active", &self.active)
            .field("pending_pick", &self.pending_pick)
            .field("renderer", &self.renderer)
            .field("storage", &self.storage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::render::DecorationTable;
    use ropey::Rope;

    fn session() -> Session<DecorationTable, MemoryStorage> {
        Session::new(
            HighlighterConfig::default(),
            DecorationTable::new(),
            MemoryStorage::new(),
        )
    }

    #[test]
    fn test_lifecycle_states() {
        let mut session = session();
        let a = DocumentKey::new("a");
        let b = DocumentKey::new("b");
        let text = Rope::from_str("some text\n");

        assert_eq!(session.state(&a), DocumentState::Unloaded);
        session.activate(&a, &text);
        assert_eq!(session.state(&a), DocumentState::Active);

        session.activate(&b, &text);
        assert_eq!(session.state(&a), DocumentState::Loaded);
        assert_eq!(session.state(&b), DocumentState::Active);

        session.close(&a);
        assert_eq!(session.state(&a), DocumentState::Unloaded);
    }

    #[test]
    fn test_paint_on_unloaded_document_is_refused() {
        let mut session = session();
        let key = DocumentKey::new("never-opened");
        assert!(!session.paint(&key, Range::from_coords(0, 0, 0, 3), &"c".into()));
        assert!(session.highlights(&key).is_empty());
        assert!(session.storage().blob(crate::persistence::HIGHLIGHTS_KEY).is_none());
    }

    #[test]
    fn test_highlight_at_is_half_open() {
        let mut session = session();
        let key = DocumentKey::new("a");
        session.activate(&key, &Rope::from_str("0123456789\n"));
        session.paint(&key, Range::from_coords(0, 2, 0, 5), &"c".into());

        assert!(session.highlight_at(&key, Position::new(0, 1)).is_none());
        assert!(session.highlight_at(&key, Position::new(0, 2)).is_some());
        assert!(session.highlight_at(&key, Position::new(0, 4)).is_some());
        assert!(session.highlight_at(&key, Position::new(0, 5)).is_none());
    }

    #[test]
    fn test_clear_document_removes_stored_entry() {
        let mut session = session();
        let key = DocumentKey::new("a");
        session.activate(&key, &Rope::from_str("0123456789\n"));
        session.paint(&key, Range::from_coords(0, 2, 0, 5), &"c".into());
        assert_eq!(session.clear_document(&key), 1);

        let blob = session.storage().blob(crate::persistence::HIGHLIGHTS_KEY).unwrap();
        assert!(blob.get(key.as_str()).is_none());
        assert_eq!(session.renderer().live_count(), 0);
    }

    #[test]
    fn test_second_pick_is_refused() {
        let mut session = session();
        let key = DocumentKey::new("a");
        let range = Range::from_coords(0, 0, 0, 3);
        let token = session.begin_pick(&key, range).unwrap();
        assert_eq!(session.begin_pick(&key, range), Err(HighlightError::PickerBusy));
        assert!(session.take_pick(token).is_some());
        assert!(session.take_pick(token).is_none());
    }
}
