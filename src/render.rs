//! Rendering collaborator interface
//!
//! The host turns a handle into a visual decoration ("paint color C over
//! ranges R"). Handles are created per highlight, re-rendered with the
//! complete range list whenever that highlight moves, and released exactly
//! once. `release_handle` takes the handle by value, so a released handle
//! cannot be used again.

use std::collections::BTreeMap;

use crate::model::{Color, Range};

pub trait Renderer {
    type Handle: std::fmt::Debug;

    /// Create a decoration for `color`
    fn create_handle(&mut self, color: &Color) -> Self::Handle;

    /// Replace everything drawn for `handle` with `ranges`
    fn render(&mut self, handle: &Self::Handle, ranges: &[Range]);

    /// Dispose of a decoration
    fn release_handle(&mut self, handle: Self::Handle);
}

/// Handle issued by [`DecorationTable`]. Deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct DecorationId(u64);

impl DecorationId {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A live decoration as last rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub color: Color,
    pub ranges: Vec<Range>,
}

/// In-memory renderer that records what would be on screen.
///
/// Used by the CLI to print highlights and by tests to check handle
/// accounting.
#[derive(Debug, Default)]
pub struct DecorationTable {
    next_id: u64,
    live: BTreeMap<u64, Decoration>,
    created: usize,
    released: usize,
    renders: usize,
}

impl DecorationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created and not yet released
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created_count(&self) -> usize {
        self.created
    }

    pub fn released_count(&self) -> usize {
        self.released
    }

    /// Number of `render` calls so far
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn decorations(&self) -> impl Iterator<Item = &Decoration> {
        self.live.values()
    }

    /// Every range currently drawn in `color`, sorted
    pub fn ranges_for(&self, color: &Color) -> Vec<Range> {
        let mut ranges: Vec<Range> = self
            .live
            .values()
            .filter(|d| &d.color == color)
            .flat_map(|d| d.ranges.iter().copied())
            .collect();
        ranges.sort_by_key(|r| r.start());
        ranges
    }
}

impl Renderer for DecorationTable {
    type Handle = DecorationId;

    fn create_handle(&mut self, color: &Color) -> DecorationId {
        self.next_id += 1;
        self.created += 1;
        self.live.insert(
            self.next_id,
            Decoration {
                color: color.clone(),
                ranges: Vec::new(),
            },
        );
        tracing::trace!(id = self.next_id, %color, "decoration created");
        DecorationId(self.next_id)
    }

    fn render(&mut self, handle: &DecorationId, ranges: &[Range]) {
        self.renders += 1;
        match self.live.get_mut(&handle.0) {
            Some(decoration) => decoration.ranges = ranges.to_vec(),
            None => tracing::error!(id = handle.0, "render on released decoration"),
        }
    }

    fn release_handle(&mut self, handle: DecorationId) {
        let removed = self.live.remove(&handle.0);
        debug_assert!(removed.is_some(), "decoration {} released twice", handle.0);
        self.released += 1;
        tracing::trace!(id = handle.0, "decoration released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_render_release() {
        let mut table = DecorationTable::new();
        let color = Color::new("#ff000040");
        let handle = table.create_handle(&color);
        let range = Range::from_coords(0, 0, 0, 4);

        table.render(&handle, &[range]);
        assert_eq!(table.ranges_for(&color), vec![range]);
        assert_eq!(table.live_count(), 1);

        table.release_handle(handle);
        assert_eq!(table.live_count(), 0);
        assert_eq!(table.created_count(), 1);
        assert_eq!(table.released_count(), 1);
        assert!(table.ranges_for(&color).is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let mut table = DecorationTable::new();
        let a = table.create_handle(&"A".into());
        let b = table.create_handle(&"A".into());
        assert_ne!(a.id(), b.id());
    }
}
