// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Debug;

/// Rejection reasons for [`Span::try_new`][crate::Span::try_new].
///
/// The tree itself never fails; this only guards span construction for
/// callers who want inverted bounds caught early.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpanError<S: Debug> {
    /// `start` lies after `end`.
    #[error("span start {start:?} is after its end {end:?}")]
    Inverted {
        /// Requested start.
        start: S,
        /// Requested end.
        end: S,
    },
    /// The bounds cannot be ordered (a NaN float).
    #[error("span bounds {start:?} and {end:?} are unordered")]
    Unordered {
        /// Requested start.
        start: S,
        /// Requested end.
        end: S,
    },
}
