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

use super::{TimePeriod, relation};
use crate::{
    error::PeriodError,
    moment::{MAX_MOMENT, MIN_MOMENT, Moment, saturating_add},
};
use chrono::TimeDelta;
use smallvec::SmallVec;
use std::{
    cmp::{max, min},
    ops::{BitAnd, BitOr},
};

/// A half-open period `[start, end)` between two moments.
///
/// `TimeRange` is the general purpose period value: it supports set
/// operations (intersection, union, difference, gap, split) and, unless it
/// was created read-only, in-place mutation of its bounds.
///
/// # Invariants
/// `start` must always be less than or equal to `end`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
    start: Moment,
    end: Moment,
    read_only: bool,
}

impl TimeRange {
    /// Creates a new `TimeRange`.
    ///
    /// Reversed bounds are swapped, so `new(b, a)` equals `new(a, b)`. Use
    /// [`TimeRange::try_new`] to reject them instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use timeperiod_core::period::{TimePeriod, TimeRange};
    /// # use chrono::{NaiveDate, TimeDelta};
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
    ///
    /// let r = TimeRange::new(day(10), day(1));
    /// assert_eq!(r.start(), day(1));
    /// assert_eq!(r.duration(), TimeDelta::days(9));
    /// ```
    #[inline]
    pub fn new(start: Moment, end: Moment) -> Self {
        if start <= end {
            Self::new_unchecked(start, end)
        } else {
            Self::new_unchecked(end, start)
        }
    }

    /// Creates a new `TimeRange` if `start <= end`.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidRange` if `end < start`.
    #[inline]
    pub fn try_new(start: Moment, end: Moment) -> Result<Self, PeriodError> {
        if start <= end {
            Ok(Self::new_unchecked(start, end))
        } else {
            Err(PeriodError::InvalidRange { start, end })
        }
    }

    /// Creates a new `TimeRange` without reordering the bounds.
    ///
    /// The caller must ensure `start <= end`; this is checked with a
    /// `debug_assert!` only.
    #[inline]
    pub fn new_unchecked(start: Moment, end: Moment) -> Self {
        debug_assert!(
            start <= end,
            "Invalid time range: start must be less than or equal to end"
        );
        Self {
            start,
            end,
            read_only: false,
        }
    }

    /// Creates the range starting at `start` and lasting `duration`.
    ///
    /// A negative duration yields the range ending at `start`. The end
    /// saturates at the sentinels.
    #[inline]
    pub fn from_duration(start: Moment, duration: TimeDelta) -> Self {
        Self::new(start, saturating_add(start, duration))
    }

    /// Creates the degenerate range `[moment, moment]`.
    #[inline]
    pub fn moment(moment: Moment) -> Self {
        Self::new_unchecked(moment, moment)
    }

    /// The unbounded range `[MIN_MOMENT, MAX_MOMENT)`.
    #[inline]
    pub fn anytime() -> Self {
        Self::new_unchecked(MIN_MOMENT, MAX_MOMENT)
    }

    /// Returns a copy with the read-only flag set to `read_only`.
    #[inline]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    #[inline]
    fn check_modification(&self) -> Result<(), PeriodError> {
        if self.read_only {
            Err(PeriodError::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Moves the start bound.
    ///
    /// # Errors
    ///
    /// `ReadOnly` for read-only ranges, `InvalidRange` if `start > end`.
    pub fn set_start(&mut self, start: Moment) -> Result<(), PeriodError> {
        self.check_modification()?;
        if start > self.end {
            return Err(PeriodError::InvalidRange {
                start,
                end: self.end,
            });
        }
        self.start = start;
        Ok(())
    }

    /// Moves the end bound.
    ///
    /// # Errors
    ///
    /// `ReadOnly` for read-only ranges, `InvalidRange` if `end < start`.
    pub fn set_end(&mut self, end: Moment) -> Result<(), PeriodError> {
        self.check_modification()?;
        if end < self.start {
            return Err(PeriodError::InvalidRange {
                start: self.start,
                end,
            });
        }
        self.end = end;
        Ok(())
    }

    /// Keeps the start and sets the end to `start + duration`.
    ///
    /// # Errors
    ///
    /// `ReadOnly` for read-only ranges, `InvalidRange` for a negative
    /// duration.
    pub fn set_duration(&mut self, duration: TimeDelta) -> Result<(), PeriodError> {
        self.check_modification()?;
        if duration < TimeDelta::zero() {
            return Err(PeriodError::InvalidRange {
                start: self.start,
                end: saturating_add(self.start, duration),
            });
        }
        self.end = saturating_add(self.start, duration);
        Ok(())
    }

    /// Shifts both bounds by `offset`. Unbounded sides stay unbounded.
    ///
    /// # Errors
    ///
    /// `ReadOnly` for read-only ranges, `OutOfRange` if a bounded side
    /// would leave the representable range.
    pub fn move_by(&mut self, offset: TimeDelta) -> Result<(), PeriodError> {
        self.check_modification()?;
        let shift = |m: Moment| -> Result<Moment, PeriodError> {
            if m == MIN_MOMENT || m == MAX_MOMENT {
                return Ok(m);
            }
            m.checked_add_signed(offset)
                .ok_or(PeriodError::OutOfRange { moment: m })
        };
        let start = shift(self.start)?;
        let end = shift(self.end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Moves the start earlier to `moment` if it lies before the start.
    pub fn expand_start_to(&mut self, moment: Moment) -> Result<(), PeriodError> {
        self.check_modification()?;
        if moment < self.start {
            self.start = moment;
        }
        Ok(())
    }

    /// Moves the end later to `moment` if it lies after the end.
    pub fn expand_end_to(&mut self, moment: Moment) -> Result<(), PeriodError> {
        self.check_modification()?;
        if moment > self.end {
            self.end = moment;
        }
        Ok(())
    }

    /// Grows the range to cover `period` as well.
    pub fn expand_to(&mut self, period: &dyn TimePeriod) -> Result<(), PeriodError> {
        self.check_modification()?;
        self.start = min(self.start, period.start());
        self.end = max(self.end, period.end());
        Ok(())
    }

    /// Moves the start later to `moment` if it lies within the range.
    pub fn shrink_start_to(&mut self, moment: Moment) -> Result<(), PeriodError> {
        self.check_modification()?;
        if self.start < moment && moment <= self.end {
            self.start = moment;
        }
        Ok(())
    }

    /// Moves the end earlier to `moment` if it lies within the range.
    pub fn shrink_end_to(&mut self, moment: Moment) -> Result<(), PeriodError> {
        self.check_modification()?;
        if self.start <= moment && moment < self.end {
            self.end = moment;
        }
        Ok(())
    }

    /// Shrinks both bounds towards `period` where `period`'s bounds fall
    /// inside the range.
    pub fn shrink_to(&mut self, period: &dyn TimePeriod) -> Result<(), PeriodError> {
        self.check_modification()?;
        self.shrink_start_to(period.start())?;
        self.shrink_end_to(period.end())
    }

    /// Resets the range to `anytime`.
    pub fn reset(&mut self) -> Result<(), PeriodError> {
        self.check_modification()?;
        self.start = MIN_MOMENT;
        self.end = MAX_MOMENT;
        Ok(())
    }

    /// Calculates the intersection of two ranges.
    ///
    /// Returns `None` unless the ranges intersect (see
    /// [`relation::intersects_with`]); touching ranges therefore have no
    /// intersection, while a moment on a boundary intersects to itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use timeperiod_core::period::TimeRange;
    /// # use chrono::NaiveDate;
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
    ///
    /// let a = TimeRange::new(day(1), day(10));
    /// let b = TimeRange::new(day(5), day(15));
    /// assert_eq!(a.intersection(&b), Some(TimeRange::new(day(5), day(10))));
    /// assert_eq!(a.intersection(&TimeRange::new(day(10), day(12))), None);
    /// ```
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if relation::intersects_with(self, other) {
            Some(Self::new_unchecked(
                max(self.start, other.start),
                min(self.end, other.end),
            ))
        } else {
            None
        }
    }

    /// Calculates the union of two ranges.
    ///
    /// Returns `None` if a gap separates them.
    #[inline]
    pub fn union(&self, other: &Self) -> Option<Self> {
        if self.start <= other.end && other.start <= self.end {
            Some(Self::new_unchecked(
                min(self.start, other.start),
                max(self.end, other.end),
            ))
        } else {
            None
        }
    }

    /// Calculates the set difference `self - other`.
    ///
    /// # Returns
    ///
    /// * 0 ranges: if `other` fully covers `self`.
    /// * 1 range: if `other` clips one side of `self` or does not overlap it.
    /// * 2 ranges: if `other` lies strictly inside `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use timeperiod_core::period::TimeRange;
    /// # use chrono::NaiveDate;
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
    ///
    /// let a = TimeRange::new(day(1), day(31));
    /// let diff = a.difference(&TimeRange::new(day(10), day(20)));
    /// assert_eq!(diff.len(), 2);
    /// assert_eq!(diff[0], TimeRange::new(day(1), day(10)));
    /// assert_eq!(diff[1], TimeRange::new(day(20), day(31)));
    /// ```
    pub fn difference(&self, other: &Self) -> SmallVec<Self, 2> {
        if other.is_moment() || !(self.start < other.end && other.start < self.end) {
            return smallvec::smallvec![*self];
        }

        let mut result = SmallVec::new();
        if self.start < other.start {
            result.push(Self::new_unchecked(self.start, other.start));
        }
        if self.end > other.end {
            result.push(Self::new_unchecked(other.end, self.end));
        }
        result
    }

    /// Returns the gap between two ranges separated by a positive distance.
    ///
    /// Returns `None` if the ranges overlap or touch.
    #[inline]
    pub fn gap(&self, other: &Self) -> Option<Self> {
        if self.end < other.start {
            Some(Self::new_unchecked(self.end, other.start))
        } else if other.end < self.start {
            Some(Self::new_unchecked(other.end, self.start))
        } else {
            None
        }
    }

    /// Splits the range into two at `moment`.
    ///
    /// Returns `None` unless `start < moment < end`.
    #[inline]
    pub fn split_at(&self, moment: Moment) -> Option<(Self, Self)> {
        if self.start < moment && moment < self.end {
            Some((
                Self::new_unchecked(self.start, moment),
                Self::new_unchecked(moment, self.end),
            ))
        } else {
            None
        }
    }
}

impl TimePeriod for TimeRange {
    #[inline]
    fn start(&self) -> Moment {
        self.start
    }

    #[inline]
    fn end(&self) -> Moment {
        self.end
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Replaces both bounds, swapping them if reversed.
    fn setup(&mut self, start: Moment, end: Moment) -> Result<(), PeriodError> {
        self.check_modification()?;
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.start = start;
        self.end = end;
        Ok(())
    }
}

impl BitAnd for TimeRange {
    type Output = Option<Self>;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(&rhs)
    }
}

impl BitOr for TimeRange {
    type Output = Option<Self>;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(&rhs)
    }
}

impl Default for TimeRange {
    #[inline]
    fn default() -> Self {
        Self::anytime()
    }
}

impl std::fmt::Debug for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeRange")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl std::ops::RangeBounds<Moment> for TimeRange {
    fn start_bound(&self) -> std::ops::Bound<&Moment> {
        std::ops::Bound::Included(&self.start)
    }

    fn end_bound(&self) -> std::ops::Bound<&Moment> {
        std::ops::Bound::Excluded(&self.end)
    }
}

impl From<std::ops::Range<Moment>> for TimeRange {
    #[inline]
    fn from(range: std::ops::Range<Moment>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<TimeRange> for std::ops::Range<Moment> {
    #[inline]
    fn from(range: TimeRange) -> Self {
        std::ops::Range {
            start: range.start,
            end: range.end,
        }
    }
}
