use std::collections::BTreeMap;

use crate::ItemKind;

/// Memoized lane-run boundaries.
///
/// A lane-run is a maximal sequence of regular items between two groups (or the list
/// start). Each entry maps the first index of a run to the last index known to belong to
/// it. The cache is never a source of truth: every answer it gives matches
/// [`scan_lanes_start`] from index 0, and it must be cleared whenever the lane count or the
/// item data set changes.
#[derive(Clone, Debug, Default)]
pub struct LaneBoundaryCache {
    runs: BTreeMap<usize, usize>,
}

impl LaneBoundaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        if !self.runs.is_empty() {
            ltrace!(runs = self.runs.len(), "LaneBoundaryCache::clear");
        }
        self.runs.clear();
    }

    /// Returns the cached run with the greatest start `<= index`, as `(start, last_known)`.
    pub fn lookup(&self, index: usize) -> Option<(usize, usize)> {
        self.runs
            .range(..=index)
            .next_back()
            .map(|(&start, &last)| (start, last))
    }

    /// Returns the first index of the lane-run containing `index`.
    ///
    /// `kind_of(i)` reports the item at `i`, or `None` when no item exists there. Lookups are
    /// amortized O(1) once a run has been scanned.
    pub fn find_lanes_start_index(
        &mut self,
        index: usize,
        mut kind_of: impl FnMut(usize) -> Option<ItemKind>,
    ) -> usize {
        let Some((start, last)) = self.lookup(index) else {
            let start = scan_lanes_start(&mut kind_of, 0, index).unwrap_or(0);
            self.runs.insert(start, index);
            return start;
        };
        if last >= index {
            return start;
        }
        match scan_lanes_start(&mut kind_of, last, index) {
            Some(found) => {
                self.runs.insert(found, index);
                found
            }
            None => {
                self.runs.insert(start, index);
                start
            }
        }
    }
}

/// Linear scan for the start of the lane-run containing `index`, looking no further back
/// than `from`.
///
/// A group starts its own run, and the index right after a group (or after a missing item)
/// starts the next one. Returns `None` when no boundary lies in `(from, index]` and `from`
/// is not the list start, meaning the run continues from before `from`.
pub fn scan_lanes_start(
    kind_of: &mut impl FnMut(usize) -> Option<ItemKind>,
    from: usize,
    index: usize,
) -> Option<usize> {
    match kind_of(index) {
        None | Some(ItemKind::Group) => return Some(index),
        Some(ItemKind::Item) => {}
    }
    let mut idx = index;
    while idx > from {
        match kind_of(idx - 1) {
            None | Some(ItemKind::Group) => return Some(idx),
            Some(ItemKind::Item) => {}
        }
        idx -= 1;
    }
    (from == 0).then_some(0)
}
