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

//! Moments on the timeline.
//!
//! A `Moment` is a naive (time-zone free) timestamp with nanosecond
//! precision. The two extreme representable values are reserved as sentinels:
//! a period starting at `MIN_MOMENT` has no start, a period ending at
//! `MAX_MOMENT` has no end.

use chrono::{NaiveDateTime, TimeDelta};

/// An instantaneous point on the timeline.
pub type Moment = NaiveDateTime;

/// Sentinel for the unbounded past.
pub const MIN_MOMENT: Moment = NaiveDateTime::MIN;

/// Sentinel for the unbounded future.
pub const MAX_MOMENT: Moment = NaiveDateTime::MAX;

/// Adds `delta` to `moment`, clamping to the sentinels instead of overflowing.
///
/// The sentinels themselves are absorbing: shifting an unbounded bound keeps
/// it unbounded.
///
/// # Examples
///
/// ```rust
/// # use timeperiod_core::moment::{saturating_add, MAX_MOMENT};
/// # use chrono::TimeDelta;
///
/// assert_eq!(saturating_add(MAX_MOMENT, TimeDelta::hours(-1)), MAX_MOMENT);
/// ```
#[inline]
pub fn saturating_add(moment: Moment, delta: TimeDelta) -> Moment {
    if moment == MIN_MOMENT || moment == MAX_MOMENT {
        return moment;
    }
    match moment.checked_add_signed(delta) {
        Some(m) => m,
        None if delta < TimeDelta::zero() => MIN_MOMENT,
        None => MAX_MOMENT,
    }
}

/// Returns `true` if `moment` is one of the two unbounded sentinels.
#[inline]
pub fn is_sentinel(moment: Moment) -> bool {
    moment == MIN_MOMENT || moment == MAX_MOMENT
}
