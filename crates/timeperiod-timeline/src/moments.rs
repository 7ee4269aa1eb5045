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

//! # Timeline Moment Index
//!
//! An ordered map from moment to `TimeLineMoment`, built by folding every
//! period's start and end into per-moment counters. Iteration is always in
//! ascending moment order, so a single pass answers overlap and gap queries.
//!
//! ## Slot Lifecycle
//!
//! A slot is created by the first start or end registered at its moment and
//! is dropped again as soon as both of its counters return to zero.

use crate::{error::TimeLineError, moment::TimeLineMoment};
use std::collections::BTreeMap;
use timeperiod_core::{moment::Moment, period::TimePeriod};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeLineMomentCollection {
    moments: BTreeMap<Moment, TimeLineMoment>,
}

impl TimeLineMomentCollection {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index for all `periods`.
    pub fn from_periods<I>(periods: I) -> Self
    where
        I: IntoIterator,
        I::Item: TimePeriod,
    {
        let mut collection = Self::new();
        collection.add_all(periods);
        collection
    }

    /// The number of distinct moments.
    #[inline]
    pub fn len(&self) -> usize {
        self.moments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moments.is_empty()
    }

    /// The earliest registered moment.
    #[inline]
    pub fn min(&self) -> Option<&TimeLineMoment> {
        self.moments.values().next()
    }

    /// The latest registered moment.
    #[inline]
    pub fn max(&self) -> Option<&TimeLineMoment> {
        self.moments.values().next_back()
    }

    #[inline]
    pub fn find(&self, moment: Moment) -> Option<&TimeLineMoment> {
        self.moments.get(&moment)
    }

    #[inline]
    pub fn contains(&self, moment: Moment) -> bool {
        self.moments.contains_key(&moment)
    }

    /// Iterates the moments in ascending order.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TimeLineMoment> + ExactSizeIterator {
        self.moments.values()
    }

    /// Registers the start and end of `period`. A moment period increments
    /// both counters of a single slot.
    pub fn add<P>(&mut self, period: &P)
    where
        P: TimePeriod + ?Sized,
    {
        let start = period.start();
        let end = period.end();
        self.slot_mut(start).add_start();
        self.slot_mut(end).add_end();
    }

    pub fn add_all<I>(&mut self, periods: I)
    where
        I: IntoIterator,
        I::Item: TimePeriod,
    {
        for period in periods {
            self.add(&period);
        }
    }

    /// Unregisters the start and end of `period`.
    ///
    /// Both slots are validated before anything is changed, so a failed
    /// removal leaves the index untouched.
    ///
    /// # Errors
    ///
    /// `UnknownMoment` if a bound has no slot, `CountUnderflow` if the slot
    /// holds no start (or end) to remove.
    pub fn remove<P>(&mut self, period: &P) -> Result<(), TimeLineError>
    where
        P: TimePeriod + ?Sized,
    {
        let start = period.start();
        let end = period.end();

        let mut start_slot = *self
            .moments
            .get(&start)
            .ok_or(TimeLineError::UnknownMoment { moment: start })?;
        start_slot.remove_start()?;

        let end_slot = if start == end {
            start_slot.remove_end()?;
            None
        } else {
            let mut end_slot = *self
                .moments
                .get(&end)
                .ok_or(TimeLineError::UnknownMoment { moment: end })?;
            end_slot.remove_end()?;
            Some(end_slot)
        };

        self.store(start_slot);
        if let Some(slot) = end_slot {
            self.store(slot);
        }
        Ok(())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.moments.clear();
    }

    /// Returns `true` if the registered periods overlap.
    ///
    /// The sweep alternates between expecting a period start and expecting a
    /// period end: a start moment must open exactly one period, an end moment
    /// must close exactly one, and the expectation flips back to "start" only
    /// once a moment closes more than it opens. Periods that merely touch
    /// therefore never overlap.
    pub fn has_overlaps(&self) -> bool {
        if self.moments.len() < 2 {
            return false;
        }

        let mut expect_start = true;
        for tlm in self.moments.values() {
            let starts = tlm.start_count();
            let ends = tlm.end_count();
            let conflict = if expect_start {
                starts != 1 || ends > 1
            } else {
                starts > 1 || ends != 1
            };
            if conflict {
                return true;
            }
            expect_start = ends > starts;
        }
        false
    }

    /// Returns `true` if the running concurrency returns to zero at any
    /// moment other than the first and the last.
    pub fn has_gaps(&self) -> bool {
        let len = self.moments.len();
        if len < 2 {
            return false;
        }

        let mut concurrency: isize = 0;
        for (index, tlm) in self.moments.values().enumerate() {
            concurrency += tlm.balance_count();
            if concurrency == 0 && index > 0 && index < len - 1 {
                return true;
            }
        }
        false
    }

    fn slot_mut(&mut self, moment: Moment) -> &mut TimeLineMoment {
        self.moments
            .entry(moment)
            .or_insert_with(|| TimeLineMoment::new(moment))
    }

    fn store(&mut self, slot: TimeLineMoment) {
        if slot.is_empty() {
            self.moments.remove(&slot.moment());
        } else {
            self.moments.insert(slot.moment(), slot);
        }
    }
}

impl<'a> IntoIterator for &'a TimeLineMomentCollection {
    type Item = &'a TimeLineMoment;
    type IntoIter = std::collections::btree_map::Values<'a, Moment, TimeLineMoment>;

    fn into_iter(self) -> Self::IntoIter {
        self.moments.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoundaryKind;
    use chrono::{NaiveDate, TimeDelta};
    use timeperiod_core::period::TimeRange;

    fn day(d: u32) -> Moment {
        NaiveDate::from_ymd_opt(2024, 4, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn hours(h: i64) -> TimeDelta {
        TimeDelta::hours(h)
    }

    fn index(periods: &[TimeRange]) -> TimeLineMomentCollection {
        TimeLineMomentCollection::from_periods(periods)
    }

    #[test]
    fn test_add_and_find() {
        let mut tl = TimeLineMomentCollection::new();
        tl.add(&TimeRange::new(day(1), day(2)));
        tl.add(&TimeRange::new(day(2), day(3)));
        assert_eq!(tl.len(), 3);
        let touching = tl.find(day(2)).unwrap();
        assert_eq!(touching.start_count(), 1);
        assert_eq!(touching.end_count(), 1);
        assert_eq!(tl.min().unwrap().moment(), day(1));
        assert_eq!(tl.max().unwrap().moment(), day(3));
    }

    #[test]
    fn test_moment_period_uses_single_slot() {
        let mut tl = TimeLineMomentCollection::new();
        tl.add(&TimeRange::moment(day(5)));
        assert_eq!(tl.len(), 1);
        let slot = tl.find(day(5)).unwrap();
        assert_eq!((slot.start_count(), slot.end_count()), (1, 1));
        tl.remove(&TimeRange::moment(day(5))).unwrap();
        assert!(tl.is_empty());
    }

    #[test]
    fn test_remove_drops_empty_slots() {
        let mut tl = index(&[
            TimeRange::new(day(1), day(3)),
            TimeRange::new(day(1), day(2)),
        ]);
        tl.remove(&TimeRange::new(day(1), day(2))).unwrap();
        assert_eq!(tl.len(), 2);
        assert!(!tl.contains(day(2)));
        assert_eq!(tl.find(day(1)).unwrap().start_count(), 1);
    }

    #[test]
    fn test_remove_unknown_fails_without_mutation() {
        let mut tl = index(&[TimeRange::new(day(1), day(3))]);
        let before = tl.clone();
        assert_eq!(
            tl.remove(&TimeRange::new(day(1), day(4))),
            Err(TimeLineError::UnknownMoment { moment: day(4) })
        );
        assert_eq!(tl, before);
        assert_eq!(
            tl.remove(&TimeRange::new(day(3), day(3))),
            Err(TimeLineError::CountUnderflow {
                moment: day(3),
                kind: BoundaryKind::Start
            })
        );
        assert_eq!(tl, before);
    }

    #[test]
    fn test_iteration_is_ascending() {
        let tl = index(&[
            TimeRange::new(day(7), day(9)),
            TimeRange::new(day(1), day(2)),
            TimeRange::new(day(4), day(8)),
        ]);
        let moments: Vec<_> = tl.iter().map(|m| m.moment()).collect();
        assert_eq!(moments, vec![day(1), day(2), day(4), day(7), day(8), day(9)]);
        assert_eq!(tl.iter().rev().next().unwrap().moment(), day(9));
    }

    #[test]
    fn test_has_overlaps_sequence() {
        let (start1, end1) = (day(1), day(2));
        let (start2, end2) = (end1, day(3));
        let base = TimeRange::new(start1, end1);

        assert!(!index(&[]).has_overlaps());
        assert!(!index(&[TimeRange::moment(start1)]).has_overlaps());
        assert!(!index(&[base]).has_overlaps());
        assert!(index(&[base, base]).has_overlaps());

        let shifted = |s: i64, e: i64| TimeRange::new(start1 + hours(s), end1 + hours(e));
        assert!(index(&[base, shifted(1, 1)]).has_overlaps());
        assert!(index(&[base, shifted(-1, -1)]).has_overlaps());
        assert!(index(&[base, shifted(-1, 1)]).has_overlaps());
        assert!(index(&[base, shifted(1, -1)]).has_overlaps());

        let second = TimeRange::new(start2, end2);
        assert!(!index(&[base, second]).has_overlaps());
        assert!(index(&[base, second, TimeRange::new(start2, end2 + hours(1))]).has_overlaps());
        assert!(index(&[base, second, TimeRange::new(start2, end2 - hours(1))]).has_overlaps());

        let spanning = TimeRange::new(start1, end2);
        assert!(index(&[base, second, spanning]).has_overlaps());
        assert!(index(&[second, spanning]).has_overlaps());
        assert!(!index(&[spanning]).has_overlaps());
    }

    #[test]
    fn test_has_gaps_sequence() {
        let p = |d: u32| TimeRange::new(day(d), day(d + 1));

        assert!(!index(&[]).has_gaps());
        assert!(!index(&[TimeRange::moment(day(1))]).has_gaps());
        assert!(!index(&[p(1)]).has_gaps());
        assert!(!index(&[p(1), p(1)]).has_gaps());
        assert!(!index(&[p(1), p(2)]).has_gaps());
        assert!(!index(&[p(1), p(2), TimeRange::new(day(1), day(3))]).has_gaps());
        assert!(!index(&[p(1), p(2), p(3), p(4)]).has_gaps());

        assert!(index(&[p(1), p(2), p(4)]).has_gaps());
        assert!(index(&[p(1), p(4)]).has_gaps());
        assert!(!index(&[p(1), p(2)]).has_gaps());
        assert!(!index(&[p(2)]).has_gaps());
    }

    #[test]
    fn test_back_to_back_days_neither_overlap_nor_gap() {
        let tl = index(&[
            TimeRange::new(day(1), day(2)),
            TimeRange::new(day(2), day(3)),
        ]);
        assert!(!tl.has_overlaps());
        assert!(!tl.has_gaps());
    }

    #[test]
    fn test_clear() {
        let mut tl = index(&[TimeRange::new(day(1), day(2))]);
        tl.clear();
        assert!(tl.is_empty());
        assert!(tl.min().is_none());
    }
}
