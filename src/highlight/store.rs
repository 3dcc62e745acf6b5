//! Highlight store - per-document highlight sets and their decorations.
//!
//! Every stored highlight owns exactly one rendering handle. Handles are
//! only ever released through the renderer passed to a mutating method,
//! and each handle is moved into `release_handle`, so no handle can be
//! released twice.

use std::collections::HashMap;

use super::adjust::{adjust_through, Adjusted, TextChange};
use super::overlap;
use crate::model::{DocumentKey, Highlight, Position};
use crate::render::Renderer;

#[derive(Debug)]
struct Entry<H> {
    highlight: Highlight,
    handle: H,
}

/// Result of [`DocumentHighlights::replace_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceStats {
    pub kept: usize,
    pub created: usize,
    pub released: usize,
}

impl ReplaceStats {
    pub fn changed(&self) -> bool {
        self.created > 0 || self.released > 0
    }
}

/// Result of [`DocumentHighlights::adjust`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjustStats {
    /// Highlights whose whole range was edited away
    pub deleted: usize,
    /// Highlights split or trimmed to restore non-overlap
    pub repaired: usize,
}

/// The highlight set of one document. Ranges never overlap.
#[derive(Debug)]
pub struct DocumentHighlights<H> {
    entries: Vec<Entry<H>>,
}

impl<H> Default for DocumentHighlights<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: std::fmt::Debug> DocumentHighlights<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn all(&self) -> impl Iterator<Item = &Highlight> {
        self.entries.iter().map(|e| &e.highlight)
    }

    pub fn to_vec(&self) -> Vec<Highlight> {
        self.all().cloned().collect()
    }

    pub fn get(&self, index: usize) -> Option<&Highlight> {
        self.entries.get(index).map(|e| &e.highlight)
    }

    /// The highlight covering `pos`, if any
    pub fn highlight_at(&self, pos: Position) -> Option<&Highlight> {
        self.all().find(|h| h.range.contains(pos))
    }

    /// Store a highlight with a fresh handle.
    ///
    /// The caller keeps the set disjoint; use [`Self::replace_all`] with an
    /// [`overlap`] result when the new range may intersect existing ones.
    pub fn add<R: Renderer<Handle = H>>(&mut self, highlight: Highlight, renderer: &mut R) {
        let handle = renderer.create_handle(&highlight.color);
        self.entries.push(Entry { highlight, handle });
        self.assert_invariants();
    }

    /// Remove the highlight at `index`, releasing its handle
    pub fn remove_at<R: Renderer<Handle = H>>(
        &mut self,
        index: usize,
        renderer: &mut R,
    ) -> Option<Highlight> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        renderer.release_handle(entry.handle);
        Some(entry.highlight)
    }

    /// Swap in a new highlight set.
    ///
    /// Highlights present in both sets keep their handle. The rest of the
    /// old set is released and the rest of the new set gets new handles.
    /// Since ranges are disjoint and non-empty, a range identifies at most
    /// one highlight, so value equality is identity here.
    pub fn replace_all<R: Renderer<Handle = H>>(
        &mut self,
        new_set: Vec<Highlight>,
        renderer: &mut R,
    ) -> ReplaceStats {
        let mut old: Vec<Option<Entry<H>>> = self.entries.drain(..).map(Some).collect();
        let mut stats = ReplaceStats::default();
        let mut entries = Vec::with_capacity(new_set.len());

        for highlight in new_set {
            let reused = old
                .iter()
                .position(|slot| matches!(slot, Some(e) if e.highlight == highlight))
                .and_then(|idx| old[idx].take());

            let entry = match reused {
                Some(entry) => {
                    stats.kept += 1;
                    entry
                }
                None => {
                    stats.created += 1;
                    let handle = renderer.create_handle(&highlight.color);
                    Entry { highlight, handle }
                }
            };
            entries.push(entry);
        }

        for entry in old.into_iter().flatten() {
            renderer.release_handle(entry.handle);
            stats.released += 1;
        }

        self.entries = entries;
        self.assert_invariants();
        stats
    }

    /// Release every handle and empty the set. Returns how many were released.
    pub fn clear<R: Renderer<Handle = H>>(&mut self, renderer: &mut R) -> usize {
        let count = self.entries.len();
        for entry in self.entries.drain(..) {
            renderer.release_handle(entry.handle);
        }
        count
    }

    /// Translate every range through an ordered edit batch.
    ///
    /// Ranges the batch covered entirely are dropped. A range left in place
    /// by a partial overlap can end up overlapping a neighbour that moved;
    /// when that happens the moved ranges win and the stale ones are carved
    /// around them.
    pub fn adjust<R: Renderer<Handle = H>>(
        &mut self,
        changes: &[&TextChange],
        renderer: &mut R,
    ) -> AdjustStats {
        let mut stats = AdjustStats::default();
        let mut entries = Vec::with_capacity(self.entries.len());
        let mut stale = Vec::new();

        for mut entry in self.entries.drain(..) {
            match adjust_through(entry.highlight.range, changes) {
                Adjusted::Kept(range) => {
                    entry.highlight.range = range;
                    entries.push(entry);
                }
                Adjusted::Overlapped(range) => {
                    entry.highlight.range = range;
                    stale.push(entry.highlight.clone());
                    entries.push(entry);
                }
                Adjusted::Deleted => {
                    tracing::debug!(range = %entry.highlight.range, "highlight edited away");
                    renderer.release_handle(entry.handle);
                    stats.deleted += 1;
                }
            }
        }
        self.entries = entries;

        let current = self.to_vec();
        if !stale.is_empty() && !overlap::is_disjoint(&current) {
            let mut repaired = Vec::new();
            for highlight in &stale {
                repaired = overlap::paint(&repaired, highlight.range, &highlight.color);
            }
            for highlight in current.iter().filter(|h| !stale.contains(h)) {
                repaired = overlap::paint(&repaired, highlight.range, &highlight.color);
            }
            let replaced = self.replace_all(repaired, renderer);
            stats.repaired = replaced.released;
            tracing::debug!(?replaced, "restored non-overlap after edit");
        }

        self.assert_invariants();
        stats
    }

    /// Push every highlight's current range to its handle
    pub fn render<R: Renderer<Handle = H>>(&self, renderer: &mut R) {
        for entry in &self.entries {
            renderer.render(&entry.handle, std::slice::from_ref(&entry.highlight.range));
        }
    }

    /// Verify the set invariants (debug builds only)
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        let highlights = self.to_vec();
        debug_assert!(
            highlights.iter().all(|h| !h.range.is_empty()),
            "Stored highlights must not be empty"
        );
        debug_assert!(
            overlap::is_disjoint(&highlights),
            "Stored highlights must not overlap: {:?}",
            highlights
        );
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}

/// Process-wide table of highlight sets, keyed by document.
///
/// Sets are created lazily and removed when emptied or closed, so the table
/// never holds empty entries.
#[derive(Debug)]
pub struct HighlightStore<H> {
    documents: HashMap<DocumentKey, DocumentHighlights<H>>,
}

impl<H> Default for HighlightStore<H> {
    fn default() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }
}

impl<H: std::fmt::Debug> HighlightStore<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DocumentKey) -> Option<&DocumentHighlights<H>> {
        self.documents.get(key)
    }

    pub fn get_mut(&mut self, key: &DocumentKey) -> Option<&mut DocumentHighlights<H>> {
        self.documents.get_mut(key)
    }

    /// Highlights of `key` as plain values (empty when none are stored)
    pub fn highlights(&self, key: &DocumentKey) -> Vec<Highlight> {
        self.get(key).map(DocumentHighlights::to_vec).unwrap_or_default()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DocumentKey> {
        self.documents.keys()
    }

    /// Replace the set for `key`, creating or dropping the entry as needed
    pub fn replace<R: Renderer<Handle = H>>(
        &mut self,
        key: &DocumentKey,
        new_set: Vec<Highlight>,
        renderer: &mut R,
    ) -> ReplaceStats {
        if new_set.is_empty() && !self.documents.contains_key(key) {
            return ReplaceStats::default();
        }
        let document = self.documents.entry(key.clone()).or_default();
        let stats = document.replace_all(new_set, renderer);
        self.prune(key);
        stats
    }

    /// Adjust the set for `key` through an ordered edit batch
    pub fn adjust<R: Renderer<Handle = H>>(
        &mut self,
        key: &DocumentKey,
        changes: &[&TextChange],
        renderer: &mut R,
    ) -> Option<AdjustStats> {
        let stats = self.documents.get_mut(key)?.adjust(changes, renderer);
        self.prune(key);
        Some(stats)
    }

    /// Release every handle of `key` and drop its entry
    pub fn clear<R: Renderer<Handle = H>>(&mut self, key: &DocumentKey, renderer: &mut R) -> usize {
        match self.documents.remove(key) {
            Some(mut document) => document.clear(renderer),
            None => 0,
        }
    }

    /// Release every handle of every document
    pub fn clear_all<R: Renderer<Handle = H>>(&mut self, renderer: &mut R) -> usize {
        self.documents
            .drain()
            .map(|(_, mut document)| document.clear(renderer))
            .sum()
    }

    fn prune(&mut self, key: &DocumentKey) {
        if self.documents.get(key).is_some_and(DocumentHighlights::is_empty) {
            self.documents.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, Range};
    use crate::render::DecorationTable;

    fn h(sc: usize, ec: usize, color: &str) -> Highlight {
        Highlight::new(Range::from_coords(0, sc, 0, ec), color)
    }

    #[test]
    fn test_replace_all_keeps_handles_of_unchanged_highlights() {
        let mut table = DecorationTable::new();
        let mut doc = DocumentHighlights::new();
        doc.replace_all(vec![h(0, 5, "A"), h(10, 15, "B")], &mut table);
        assert_eq!(table.created_count(), 2);

        let stats = doc.replace_all(vec![h(10, 15, "B"), h(20, 25, "C")], &mut table);
        assert_eq!(
            stats,
            ReplaceStats {
                kept: 1,
                created: 1,
                released: 1
            }
        );
        assert_eq!(table.live_count(), 2);
    }

    #[test]
    fn test_recolor_same_range_replaces_handle() {
        let mut table = DecorationTable::new();
        let mut doc = DocumentHighlights::new();
        doc.replace_all(vec![h(0, 5, "A")], &mut table);
        let stats = doc.replace_all(vec![h(0, 5, "B")], &mut table);
        assert_eq!(stats.created, 1);
        assert_eq!(stats.released, 1);
        assert!(table.ranges_for(&Color::new("A")).is_empty());
    }

    #[test]
    fn test_remove_at_releases_handle() {
        let mut table = DecorationTable::new();
        let mut doc = DocumentHighlights::new();
        doc.add(h(0, 5, "A"), &mut table);
        doc.add(h(5, 9, "B"), &mut table);

        assert_eq!(doc.remove_at(0, &mut table), Some(h(0, 5, "A")));
        assert_eq!(doc.remove_at(7, &mut table), None);
        assert_eq!(table.live_count(), 1);
        assert_eq!(doc.get(0), Some(&h(5, 9, "B")));
    }

    #[test]
    fn test_adjust_drops_covered_ranges() {
        let mut table = DecorationTable::new();
        let mut doc = DocumentHighlights::new();
        doc.replace_all(vec![h(3, 8, "A"), h(20, 25, "B")], &mut table);

        let change = TextChange::delete(Range::from_coords(0, 2, 0, 9));
        let stats = doc.adjust(&[&change], &mut table);

        assert_eq!(stats.deleted, 1);
        assert_eq!(doc.to_vec(), vec![h(13, 18, "B")]);
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn test_adjust_restores_disjointness_after_partial_overlap() {
        // Deleting 2..6 leaves A alone (partial overlap) but pulls B left
        // into A's stale bounds; B wins and A is trimmed.
        let mut table = DecorationTable::new();
        let mut doc = DocumentHighlights::new();
        doc.replace_all(vec![h(0, 5, "A"), h(7, 10, "B")], &mut table);

        let change = TextChange::delete(Range::from_coords(0, 2, 0, 6));
        let stats = doc.adjust(&[&change], &mut table);

        let mut result = doc.to_vec();
        result.sort_by_key(|h| h.range.start());
        assert_eq!(result, vec![h(0, 3, "A"), h(3, 6, "B")]);
        assert_eq!(stats.repaired, 1);
        assert_eq!(table.live_count(), 2);
    }

    #[test]
    fn test_store_prunes_empty_documents() {
        let mut table = DecorationTable::new();
        let mut store = HighlightStore::new();
        let key = DocumentKey::new("doc");

        store.replace(&key, vec![h(0, 4, "A")], &mut table);
        assert_eq!(store.document_count(), 1);

        store.replace(&key, vec![], &mut table);
        assert_eq!(store.document_count(), 0);
        assert_eq!(table.live_count(), 0);
    }

    #[test]
    fn test_store_replace_with_nothing_creates_no_entry() {
        let mut table = DecorationTable::new();
        let mut store: HighlightStore<_> = HighlightStore::new();
        let stats = store.replace(&DocumentKey::new("doc"), vec![], &mut table);
        assert!(!stats.changed());
        assert_eq!(store.document_count(), 0);
    }

    #[test]
    fn test_clear_all_releases_everything_once() {
        let mut table = DecorationTable::new();
        let mut store = HighlightStore::new();
        store.replace(&DocumentKey::new("a"), vec![h(0, 4, "A")], &mut table);
        store.replace(&DocumentKey::new("b"), vec![h(0, 4, "A"), h(4, 8, "B")], &mut table);

        assert_eq!(store.clear_all(&mut table), 3);
        assert_eq!(table.live_count(), 0);
        assert_eq!(table.released_count(), table.created_count());
    }
}
