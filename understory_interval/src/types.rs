// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time scalars, half-open spans, and the [`Interval`] item capability.

use alloc::boxed::Box;
use alloc::rc::Rc;
#[cfg(target_has_atomic = "ptr")]
use alloc::sync::Arc;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::error::SpanError;

/// Numeric time value used for interval bounds.
///
/// Only ordering and a midpoint are needed to build and query an
/// [`IntervalTree`][crate::IntervalTree]. The reference scalar is `i64`
/// (discrete time ticks); floats are supported for hosts that keep time in
/// seconds.
///
/// Float scalars assume no NaNs. Debug builds may assert.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Min of the two scalar values.
    fn min(a: Self, b: Self) -> Self;

    /// Max of the two scalar values.
    fn max(a: Self, b: Self) -> Self;

    /// Midpoint between `a` and `b`, computed without overflow.
    ///
    /// Integer scalars round toward negative infinity.
    fn mid(a: Self, b: Self) -> Self;

    /// `end - start`, saturating for integers.
    fn distance(start: Self, end: Self) -> Self;
}

impl Scalar for i64 {
    #[inline]
    fn min(a: Self, b: Self) -> Self {
        core::cmp::min(a, b)
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        core::cmp::max(a, b)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn distance(start: Self, end: Self) -> Self {
        end.saturating_sub(start)
    }
}

impl Scalar for i32 {
    #[inline]
    fn min(a: Self, b: Self) -> Self {
        core::cmp::min(a, b)
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        core::cmp::max(a, b)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn distance(start: Self, end: Self) -> Self {
        end.saturating_sub(start)
    }
}

impl Scalar for f64 {
    #[inline]
    fn min(a: Self, b: Self) -> Self {
        min_t(a, b)
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        max_t(a, b)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        debug_assert!(!a.is_nan() && !b.is_nan(), "NaN interval bound");
        0.5 * a + 0.5 * b
    }

    #[inline]
    fn distance(start: Self, end: Self) -> Self {
        end - start
    }
}

impl Scalar for f32 {
    #[inline]
    fn min(a: Self, b: Self) -> Self {
        min_t(a, b)
    }

    #[inline]
    fn max(a: Self, b: Self) -> Self {
        max_t(a, b)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        debug_assert!(!a.is_nan() && !b.is_nan(), "NaN interval bound");
        0.5 * a + 0.5 * b
    }

    #[inline]
    fn distance(start: Self, end: Self) -> Self {
        end - start
    }
}

/// A half-open interval `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span<S> {
    /// Inclusive start.
    pub start: S,
    /// Exclusive end.
    pub end: S,
}

impl<S> Span<S> {
    /// Create a span without checking that `start <= end`.
    ///
    /// Inverted spans are accepted by the tree; they simply never match a
    /// point query.
    #[inline(always)]
    pub const fn new(start: S, end: S) -> Self {
        Self { start, end }
    }
}

impl<S: Scalar> Span<S> {
    /// Create a span, rejecting `start > end`.
    ///
    /// ```
    /// use understory_interval::{Span, SpanError};
    ///
    /// assert!(Span::try_new(0_i64, 10).is_ok());
    /// assert!(Span::try_new(5_i64, 5).is_ok());
    /// assert!(matches!(Span::try_new(10_i64, 0), Err(SpanError::Inverted { .. })));
    /// ```
    pub fn try_new(start: S, end: S) -> Result<Self, SpanError<S>> {
        match start.partial_cmp(&end) {
            Some(Ordering::Less | Ordering::Equal) => Ok(Self { start, end }),
            Some(Ordering::Greater) => Err(SpanError::Inverted { start, end }),
            None => Err(SpanError::Unordered { start, end }),
        }
    }

    /// Whether `start <= point < end`.
    #[inline]
    pub fn contains(&self, point: S) -> bool {
        self.start <= point && point < self.end
    }

    /// The range predicate used by
    /// [`IntervalTree::intersects_with_range`][crate::IntervalTree::intersects_with_range]:
    /// `query_end >= start && query_start < end`.
    ///
    /// The query end is treated as inclusive against the span start, so a
    /// query that stops exactly where a span begins still reports it.
    ///
    /// ```
    /// use understory_interval::Span;
    ///
    /// let clip = Span::new(20_i64, 30);
    /// assert!(clip.overlaps_query(12, 22));
    /// assert!(clip.overlaps_query(10, 20));
    /// assert!(!clip.overlaps_query(30, 40));
    /// ```
    #[inline]
    pub fn overlaps_query(&self, query_start: S, query_end: S) -> bool {
        query_end >= self.start && query_start < self.end
    }

    /// Whether the span covers no point (`end <= start`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// `end - start`.
    #[inline]
    pub fn length(&self) -> S {
        S::distance(self.start, self.end)
    }
}

/// Capability of exposing a half-open time interval `[start, end)`.
///
/// The tree reads both bounds when an item is added and again on every
/// [`update_intervals`][crate::IntervalTree::update_intervals]. Items whose
/// bounds change behind a shared handle (for example through a `Cell`) are
/// picked up by that call.
pub trait Interval {
    /// Time value type of the bounds.
    type Scalar: Scalar;

    /// Inclusive start.
    fn interval_start(&self) -> Self::Scalar;

    /// Exclusive end.
    fn interval_end(&self) -> Self::Scalar;

    /// Both bounds as a [`Span`].
    #[inline]
    fn span(&self) -> Span<Self::Scalar> {
        Span::new(self.interval_start(), self.interval_end())
    }
}

impl<S: Scalar> Interval for Span<S> {
    type Scalar = S;

    #[inline]
    fn interval_start(&self) -> S {
        self.start
    }

    #[inline]
    fn interval_end(&self) -> S {
        self.end
    }
}

/// A span tagged with a payload, e.g. a clip id.
impl<S: Scalar, P> Interval for (Span<S>, P) {
    type Scalar = S;

    #[inline]
    fn interval_start(&self) -> S {
        self.0.start
    }

    #[inline]
    fn interval_end(&self) -> S {
        self.0.end
    }
}

macro_rules! forward_interval {
    ($($handle:ty),* $(,)?) => {
        $(
            impl<T: Interval + ?Sized> Interval for $handle {
                type Scalar = T::Scalar;

                #[inline]
                fn interval_start(&self) -> Self::Scalar {
                    (**self).interval_start()
                }

                #[inline]
                fn interval_end(&self) -> Self::Scalar {
                    (**self).interval_end()
                }
            }
        )*
    };
}

forward_interval!(&T, &mut T, Box<T>, Rc<T>);

#[cfg(target_has_atomic = "ptr")]
forward_interval!(Arc<T>);

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}
