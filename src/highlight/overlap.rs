//! Overlap resolution - painting or clearing a color over a range.
//!
//! Both operations start by carving the target out of every existing
//! highlight. A carved highlight leaves at most two remainders (before and
//! after the target), each keeping its original color. Highlights that do
//! not intersect the target come through untouched and in their original
//! order.

use crate::model::{Color, Highlight, Range};

/// Remove `target` from every highlight in `existing`
pub fn carve(existing: &[Highlight], target: Range) -> Vec<Highlight> {
    let mut carved = Vec::with_capacity(existing.len() + 1);

    for highlight in existing {
        if !highlight.range.intersects(&target) {
            carved.push(highlight.clone());
            continue;
        }

        let remainders = [highlight.range.before(&target), highlight.range.after(&target)];
        carved.extend(
            remainders
                .into_iter()
                .flatten()
                .filter(|range| !range.is_empty())
                .map(|range| Highlight::new(range, highlight.color.clone())),
        );
    }

    carved
}

/// Paint `color` over `target`; the new paint wins over anything under it
pub fn paint(existing: &[Highlight], target: Range, color: &Color) -> Vec<Highlight> {
    let mut painted = carve(existing, target);
    if !target.is_empty() {
        painted.push(Highlight::new(target, color.clone()));
    }
    painted
}

/// Remove any coloring under `target`
pub fn clear(existing: &[Highlight], target: Range) -> Vec<Highlight> {
    carve(existing, target)
}

/// Check the set invariant: no two highlights share a position
pub fn is_disjoint(highlights: &[Highlight]) -> bool {
    let mut ranges: Vec<Range> = highlights.iter().map(|h| h.range).collect();
    ranges.sort_by_key(|range| range.start());
    ranges.windows(2).all(|pair| pair[0].end() <= pair[1].start())
}
