// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Centered interval tree with lazy rebuild.

use alloc::vec::Vec;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::types::{Interval, Scalar};

/// Ranges with fewer entries than this become leaves by default.
pub const DEFAULT_MIN_NODE_SIZE: usize = 10;

#[derive(Clone)]
struct Entry<S, T> {
    start: S,
    end: S,
    item: T,
}

#[derive(Copy, Clone, Debug)]
struct Node<S> {
    // `None` for leaves: nothing was partitioned, there are no children.
    center: Option<S>,
    // Entries stored at this node: `entries[first..end]`.
    first: usize,
    end: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// An index from half-open time intervals to items.
///
/// Items are appended with [`add`][Self::add] and found with
/// [`intersects_with`][Self::intersects_with] (a point in time, e.g. the
/// playhead) or [`intersects_with_range`][Self::intersects_with_range] (a
/// visible time window). Mutations only mark the tree dirty; the node
/// structure is rebuilt from scratch on the first query that follows.
///
/// Items are snapshotted: the tree keeps the bounds it read at `add` time.
/// When items can move, call [`update_intervals`][Self::update_intervals]
/// to re-read every bound before querying.
///
/// There is no way to remove a single item. To drop items, [`clear`][Self::clear]
/// the tree and add the survivors again. Store handles (`&Clip`, `Rc<Clip>`,
/// `(Span, ClipId)`, ...) rather than large values; queries clone the stored
/// item into the caller's result vector.
///
/// The order of results is unspecified and may change across rebuilds.
#[derive(Clone)]
pub struct IntervalTree<T: Interval> {
    entries: Vec<Entry<T::Scalar, T>>,
    nodes: Vec<Node<T::Scalar>>,
    min_node_size: usize,
    dirty: bool,
}

impl<T: Interval> IntervalTree<T> {
    /// Create an empty tree with the default split threshold.
    pub fn new() -> Self {
        Self::with_min_node_size(DEFAULT_MIN_NODE_SIZE)
    }

    /// Create an empty tree that subdivides ranges of at least `min_node_size`
    /// entries.
    ///
    /// Smaller thresholds give deeper trees with fewer entries scanned per
    /// node. Values below 1 are treated as 1.
    pub fn with_min_node_size(min_node_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            nodes: Vec::new(),
            min_node_size: min_node_size.max(1),
            dirty: false,
        }
    }

    /// Create an empty tree with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Self::new();
        tree.reserve(capacity);
        tree
    }

    /// Reserve space for at least `additional` more items.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// The split threshold this tree was created with.
    pub fn min_node_size(&self) -> usize {
        self.min_node_size
    }

    /// Number of stored items, counting duplicates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no items are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of nodes produced by the last rebuild.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the next query will rebuild the tree.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Iterate the stored items in current entry order.
    ///
    /// Rebuilds permute entries, so this order is not insertion order once
    /// the tree has been queried.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|e| &e.item)
    }

    /// Add an item, snapshotting its current bounds.
    ///
    /// Accepts either `T` or `Option<T>`; `None` is ignored. Adding the same
    /// item twice stores it twice.
    pub fn add(&mut self, item: impl Into<Option<T>>) {
        let Some(item) = item.into() else {
            return;
        };
        self.entries.push(Entry {
            start: item.interval_start(),
            end: item.interval_end(),
            item,
        });
        self.dirty = true;
    }

    /// Re-read every item's bounds. Marks the tree dirty if any bound moved.
    ///
    /// This does not rebuild; the next query does.
    pub fn update_intervals(&mut self) {
        let mut moved = 0_usize;
        for entry in &mut self.entries {
            let start = entry.item.interval_start();
            let end = entry.item.interval_end();
            if entry.start != start || entry.end != end {
                moved += 1;
            }
            entry.start = start;
            entry.end = end;
        }
        if moved > 0 {
            tracing::debug!(moved, entries = self.entries.len(), "interval bounds changed");
            self.dirty = true;
        }
    }

    /// Drop all items and nodes. The tree is left empty and clean.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.nodes.clear();
        self.dirty = false;
    }

    /// Rebuild the node structure now instead of on the next query.
    pub fn rebuild(&mut self) {
        self.nodes.clear();
        if !self.entries.is_empty() {
            self.build();
        }
        self.dirty = false;
        tracing::trace!(
            entries = self.entries.len(),
            nodes = self.nodes.len(),
            "rebuilt interval tree"
        );
    }

    /// Append every item whose interval contains `point` (`start <= point < end`).
    pub fn intersects_with(&mut self, point: T::Scalar, results: &mut Vec<T>)
    where
        T: Clone,
    {
        self.visit_point(point, |item| results.push(item.clone()));
    }

    /// Append every item whose interval overlaps the query range.
    ///
    /// The test is `end >= item_start && start < item_end`. Nothing is
    /// appended when `start > end`.
    pub fn intersects_with_range(&mut self, start: T::Scalar, end: T::Scalar, results: &mut Vec<T>)
    where
        T: Clone,
    {
        self.visit_range(start, end, |item| results.push(item.clone()));
    }

    /// Visit items whose interval contains `point` (does not allocate result storage).
    pub fn visit_point<F: FnMut(&T)>(&mut self, point: T::Scalar, f: F) {
        if self.entries.is_empty() {
            return;
        }
        self.ensure_built();
        self.walk_point(point, f);
    }

    /// Visit items whose interval overlaps `[start, end)` (does not allocate
    /// result storage). Uses the same test as
    /// [`intersects_with_range`][Self::intersects_with_range].
    pub fn visit_range<F: FnMut(&T)>(&mut self, start: T::Scalar, end: T::Scalar, f: F) {
        if start > end || self.entries.is_empty() {
            return;
        }
        self.ensure_built();
        self.walk_range(start, end, f);
    }

    /// Query items whose interval contains `point`.
    pub fn query_point(&mut self, point: T::Scalar) -> impl Iterator<Item = &T> + '_ {
        let mut out = Vec::new();
        if !self.entries.is_empty() {
            self.ensure_built();
            let this: &Self = self;
            this.walk_point(point, |item| out.push(item));
        }
        out.into_iter()
    }

    /// Query items whose interval overlaps `[start, end)`.
    pub fn query_range(&mut self, start: T::Scalar, end: T::Scalar) -> impl Iterator<Item = &T> + '_ {
        let mut out = Vec::new();
        if start <= end && !self.entries.is_empty() {
            self.ensure_built();
            let this: &Self = self;
            this.walk_range(start, end, |item| out.push(item));
        }
        out.into_iter()
    }

    fn ensure_built(&mut self) {
        if self.dirty {
            self.rebuild();
        }
    }

    fn walk_point<'a, F: FnMut(&'a T)>(&'a self, point: T::Scalar, mut f: F) {
        let mut stack: SmallVec<[usize; 32]> = SmallVec::new();
        if !self.nodes.is_empty() {
            stack.push(0);
        }
        while let Some(idx) = stack.pop() {
            let node = self.nodes[idx];
            for entry in &self.entries[node.first..node.end] {
                if point >= entry.start && point < entry.end {
                    f(&entry.item);
                }
            }
            let Some(center) = node.center else {
                continue;
            };
            // A point equal to the center descends nowhere: everything that
            // touches the center is stored at this node.
            if let Some(right) = node.right
                && point > center
            {
                stack.push(right);
            }
            if let Some(left) = node.left
                && point < center
            {
                stack.push(left);
            }
        }
    }

    fn walk_range<'a, F: FnMut(&'a T)>(&'a self, start: T::Scalar, end: T::Scalar, mut f: F) {
        let mut stack: SmallVec<[usize; 32]> = SmallVec::new();
        if !self.nodes.is_empty() {
            stack.push(0);
        }
        while let Some(idx) = stack.pop() {
            let node = self.nodes[idx];
            for entry in &self.entries[node.first..node.end] {
                if end >= entry.start && start < entry.end {
                    f(&entry.item);
                }
            }
            let Some(center) = node.center else {
                continue;
            };
            if let Some(right) = node.right
                && end > center
            {
                stack.push(right);
            }
            if let Some(left) = node.left
                && start < center
            {
                stack.push(left);
            }
        }
    }

    /// Build the node store over all entries. Node 0 is the root.
    fn build(&mut self) {
        // (entry range start, entry range end, parent node, is left child)
        let mut pending: Vec<(usize, usize, Option<(usize, bool)>)> = Vec::new();
        pending.push((0, self.entries.len(), None));

        while let Some((start, end, parent)) = pending.pop() {
            let node = self.split(start, end);
            let idx = self.nodes.len();
            self.nodes.push(node);
            if let Some((parent, is_left)) = parent {
                if is_left {
                    self.nodes[parent].left = Some(idx);
                } else {
                    self.nodes[parent].right = Some(idx);
                }
            }
            if node.center.is_some() {
                if node.end < end {
                    pending.push((node.end, end, Some((idx, false))));
                }
                if start < node.first {
                    pending.push((start, node.first, Some((idx, true))));
                }
            }
        }
    }

    /// Partition `entries[start..end]` around its center and describe the
    /// resulting node. Children are filled in by the caller.
    fn split(&mut self, start: usize, end: usize) -> Node<T::Scalar> {
        let leaf = Node {
            center: None,
            first: start,
            end,
            left: None,
            right: None,
        };
        if end - start < self.min_node_size {
            return leaf;
        }

        let mut lo = self.entries[start].start;
        let mut hi = self.entries[start].end;
        for e in &self.entries[start + 1..end] {
            lo = Scalar::min(lo, e.start);
            hi = Scalar::max(hi, e.end);
        }
        let center = Scalar::mid(hi, lo);

        let range = &mut self.entries[start..end];
        // Everything ending before the center goes left.
        let left_len = partition(range, |e| e.end < center);
        // Of the rest, everything starting after the center goes right.
        let mid_len = partition(&mut range[left_len..], |e| e.start <= center);

        let first = start + left_len;
        let last = first + mid_len;

        // Inverted or unordered bounds can push every entry to one side.
        // Splitting again would not make progress, so keep them all here.
        if left_len == end - start || (left_len == 0 && mid_len == 0) {
            return leaf;
        }

        Node {
            center: Some(center),
            first,
            end: last,
            left: None,
            right: None,
        }
    }
}

/// Move elements matching `pred` to the front of `slice` (unstable) and
/// return how many there are.
fn partition<E>(slice: &mut [E], mut pred: impl FnMut(&E) -> bool) -> usize {
    let mut lo = 0;
    let mut hi = slice.len();
    loop {
        while lo < hi && pred(&slice[lo]) {
            lo += 1;
        }
        while lo < hi && !pred(&slice[hi - 1]) {
            hi -= 1;
        }
        if lo >= hi {
            return lo;
        }
        slice.swap(lo, hi - 1);
        lo += 1;
        hi -= 1;
    }
}

impl<T: Interval> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Interval> Debug for IntervalTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntervalTree")
            .field("entries", &self.entries.len())
            .field("nodes", &self.nodes.len())
            .field("min_node_size", &self.min_node_size)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl<T: Interval> Extend<T> for IntervalTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.entries.reserve(iter.size_hint().0);
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Interval> FromIterator<T> for IntervalTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
