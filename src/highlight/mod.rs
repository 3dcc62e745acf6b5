//! Highlight range maintenance
//!
//! - [`adjust`] moves stored ranges through document edits
//! - [`overlap`] paints or clears a color over a range
//! - [`store`] owns per-document highlight sets and their decorations

pub mod adjust;
pub mod overlap;
pub mod store;

pub use adjust::{adjust, adjust_through, ordered_changes, Adjusted, BatchOrder, TextChange};
pub use overlap::{carve, clear, paint};
pub use store::{DocumentHighlights, HighlightStore};
