// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_interval --heading-base-level=0

//! Understory Interval: a centered interval tree for timelines.
//!
//! Understory Interval indexes items that cover a half-open span of time
//! `[start, end)` (clips, markers, regions) and answers the two questions a
//! timeline view asks on every repaint:
//!
//! - which items are under the playhead ([`IntervalTree::intersects_with`]), and
//! - which items overlap the visible window ([`IntervalTree::intersects_with_range`]).
//!
//! Items are appended with [`IntervalTree::add`]. Mutations only mark the tree
//! dirty; the node structure is rebuilt from scratch on the next query, so
//! bursts of edits cost one rebuild. Items whose bounds move behind a shared
//! handle are re-read with [`IntervalTree::update_intervals`].
//!
//! Anything implementing [`Interval`] can be stored. [`Span`] and `(Span, payload)`
//! tuples work out of the box, and references, `Box`, `Rc` and `Arc` forward to
//! the item they point at.
//!
//! # Example
//!
//! ```rust
//! use understory_interval::{IntervalTree, Span};
//!
//! let mut tree = IntervalTree::new();
//! tree.add((Span::new(0_i64, 10), "intro"));
//! tree.add((Span::new(5_i64, 15), "music"));
//! tree.add((Span::new(20_i64, 30), "outro"));
//!
//! let mut hits = Vec::new();
//! tree.intersects_with(7, &mut hits);
//! let mut names: Vec<_> = hits.iter().map(|(_, name)| *name).collect();
//! names.sort_unstable();
//! assert_eq!(names, ["intro", "music"]);
//!
//! hits.clear();
//! tree.intersects_with_range(12, 22, &mut hits);
//! assert_eq!(hits.len(), 2);
//! ```
//!
//! Items that move in place are picked up by [`IntervalTree::update_intervals`]:
//!
//! ```rust
//! use core::cell::Cell;
//! use understory_interval::{Interval, IntervalTree};
//!
//! struct Clip {
//!     start: Cell<i64>,
//!     duration: i64,
//! }
//!
//! impl Interval for Clip {
//!     type Scalar = i64;
//!     fn interval_start(&self) -> i64 {
//!         self.start.get()
//!     }
//!     fn interval_end(&self) -> i64 {
//!         self.start.get() + self.duration
//!     }
//! }
//!
//! let clip = Clip { start: Cell::new(0), duration: 10 };
//! let mut tree = IntervalTree::new();
//! tree.add(&clip);
//!
//! clip.start.set(100);
//! tree.update_intervals();
//! assert!(tree.is_dirty());
//! assert_eq!(tree.query_point(5).count(), 0);
//! assert_eq!(tree.query_point(105).count(), 1);
//! ```
//!
//! ## Features
//!
//! - `std`: enables `std` support in `tracing`. The crate itself is `no_std` + `alloc`.
//!
//! ## Logging
//!
//! Rebuilds emit a `trace` event and detected movement a `debug` event through
//! `tracing`. Install a subscriber in the host to see them.
//!
//! ### Float semantics
//!
//! Float scalars assume no NaNs. Debug builds may assert.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod tree;
mod types;

pub use error::SpanError;
pub use tree::{DEFAULT_MIN_NODE_SIZE, IntervalTree};
pub use types::{Interval, Scalar, Span};
