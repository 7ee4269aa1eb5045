// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Period Capabilities
//!
//! The `TimePeriod` trait is the single contract every period-like value
//! implements to take part in relation queries, the set-algebra operators and
//! the calendar visitor. `PeriodMapper` translates between a caller's
//! calendar-offset convention and the canonical half-open form the sweep
//! algorithms work on.
//!
//! ## Submodules
//!
//! - `relation`: `PeriodRelation` and the pure relation calculator
//!   (containment, intersection, overlap).
//! - `range`: `TimeRange`, the mutable general purpose period.

pub mod range;
pub mod relation;

pub use range::TimeRange;
pub use relation::PeriodRelation;

use crate::{
    error::PeriodError,
    moment::{MAX_MOMENT, MIN_MOMENT, Moment},
};
use chrono::TimeDelta;

/// A span of time between two moments with `start <= end`.
///
/// Only `start` and `end` are required; everything else is derived from
/// them. The relation methods take `&dyn TimePeriod` so that heterogeneous
/// period kinds can be compared with each other.
pub trait TimePeriod {
    /// The inclusive start moment.
    fn start(&self) -> Moment;

    /// The exclusive end moment.
    fn end(&self) -> Moment;

    #[inline]
    fn duration(&self) -> TimeDelta {
        self.end() - self.start()
    }

    #[inline]
    fn has_start(&self) -> bool {
        self.start() != MIN_MOMENT
    }

    #[inline]
    fn has_end(&self) -> bool {
        self.end() != MAX_MOMENT
    }

    /// Returns `true` if the period is a single instant (`start == end`).
    #[inline]
    fn is_moment(&self) -> bool {
        self.start() == self.end()
    }

    /// Returns `true` if the period is unbounded in both directions.
    #[inline]
    fn is_anytime(&self) -> bool {
        !self.has_start() && !self.has_end()
    }

    /// Whether `setup` is refused. Periods are read-only unless they say
    /// otherwise.
    #[inline]
    fn is_read_only(&self) -> bool {
        true
    }

    /// Replaces both bounds.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::ReadOnly` for read-only periods.
    fn setup(&mut self, start: Moment, end: Moment) -> Result<(), PeriodError> {
        let _ = (start, end);
        Err(PeriodError::ReadOnly)
    }

    #[inline]
    fn is_same_period(&self, other: &dyn TimePeriod) -> bool {
        self.start() == other.start() && self.end() == other.end()
    }

    /// See [`relation::has_inside_moment`].
    #[inline]
    fn has_inside_moment(&self, moment: Moment) -> bool {
        relation::has_inside_moment(self, moment)
    }

    /// See [`relation::has_inside`].
    #[inline]
    fn has_inside(&self, other: &dyn TimePeriod) -> bool {
        relation::has_inside(self, other)
    }

    /// See [`relation::intersects_with`].
    #[inline]
    fn intersects_with(&self, other: &dyn TimePeriod) -> bool {
        relation::intersects_with(self, other)
    }

    /// See [`relation::overlaps_with`].
    #[inline]
    fn overlaps_with(&self, other: &dyn TimePeriod) -> bool {
        relation::overlaps_with(self, other)
    }

    /// The relation of `self` relative to `other`.
    #[inline]
    fn relation(&self, other: &dyn TimePeriod) -> PeriodRelation {
        relation::relation(self, other)
    }

    /// Copies the bounds into a mutable `TimeRange`.
    #[inline]
    fn to_range(&self) -> TimeRange {
        TimeRange::new_unchecked(self.start(), self.end())
    }
}

impl<T> TimePeriod for &T
where
    T: TimePeriod + ?Sized,
{
    #[inline]
    fn start(&self) -> Moment {
        (**self).start()
    }

    #[inline]
    fn end(&self) -> Moment {
        (**self).end()
    }
}

impl<T> TimePeriod for Box<T>
where
    T: TimePeriod + ?Sized,
{
    #[inline]
    fn start(&self) -> Moment {
        (**self).start()
    }

    #[inline]
    fn end(&self) -> Moment {
        (**self).end()
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }

    fn setup(&mut self, start: Moment, end: Moment) -> Result<(), PeriodError> {
        (**self).setup(start, end)
    }
}

/// Translates moments between a calendar's offset convention and the
/// canonical half-open representation.
///
/// `unmap_*` must invert `map_*` for every moment the calendar produces.
pub trait PeriodMapper {
    fn map_start(&self, moment: Moment) -> Moment;
    fn map_end(&self, moment: Moment) -> Moment;
    fn unmap_start(&self, moment: Moment) -> Moment;
    fn unmap_end(&self, moment: Moment) -> Moment;
}

impl<M> PeriodMapper for &M
where
    M: PeriodMapper + ?Sized,
{
    #[inline]
    fn map_start(&self, moment: Moment) -> Moment {
        (**self).map_start(moment)
    }

    #[inline]
    fn map_end(&self, moment: Moment) -> Moment {
        (**self).map_end(moment)
    }

    #[inline]
    fn unmap_start(&self, moment: Moment) -> Moment {
        (**self).unmap_start(moment)
    }

    #[inline]
    fn unmap_end(&self, moment: Moment) -> Moment {
        (**self).unmap_end(moment)
    }
}
