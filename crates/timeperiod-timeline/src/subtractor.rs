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

//! # Period Subtraction
//!
//! `source - subtracting`, composed from the other operators: the source is
//! combined, the gaps of the combined subtracting periods are computed within
//! the span of the source, and the combined source is intersected with those
//! gaps. The pieces of the source that survive are exactly the ones no
//! subtracting period covers.

use crate::{
    collection::TimePeriodCollection,
    combiner::TimePeriodCombiner,
    gaps::TimeGapCalculator,
    intersector::{IntersectionPolicy, TimePeriodIntersector},
};
use log::debug;
use timeperiod_core::period::{PeriodMapper, TimePeriod, TimeRange};

#[derive(Clone, Copy, Default)]
pub struct TimePeriodSubtractor<'m> {
    combiner: TimePeriodCombiner<'m>,
    gap_calculator: TimeGapCalculator<'m>,
    intersector: TimePeriodIntersector<'m>,
}

impl<'m> TimePeriodSubtractor<'m> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_mapper(mapper: &'m dyn PeriodMapper) -> Self {
        Self {
            combiner: TimePeriodCombiner::with_mapper(mapper),
            gap_calculator: TimeGapCalculator::with_mapper(mapper),
            intersector: TimePeriodIntersector::with_mapper(mapper)
                .with_policy(IntersectionPolicy::AnyOverlap),
        }
    }

    /// Removes every part of `source` covered by `subtracting`.
    ///
    /// An empty source yields an empty result. With no subtracting periods
    /// the source is returned as-is (or combined, if `combine_periods` is
    /// set). Otherwise the result is combined into maximal spans when
    /// `combine_periods` is set, and split at every boundary of the
    /// intermediate gap set when it is not.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use timeperiod_timeline::subtractor::TimePeriodSubtractor;
    /// # use timeperiod_core::period::TimeRange;
    /// # use chrono::NaiveDate;
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
    ///
    /// let source = [TimeRange::new(day(1), day(31))];
    /// let subtracting = [TimeRange::new(day(10), day(20))];
    /// let result = TimePeriodSubtractor::new().subtract_periods(&source, &subtracting, true);
    /// assert_eq!(
    ///     result.as_slice(),
    ///     &[TimeRange::new(day(1), day(10)), TimeRange::new(day(20), day(31))]
    /// );
    /// ```
    pub fn subtract_periods<S, T>(
        &self,
        source: S,
        subtracting: T,
        combine_periods: bool,
    ) -> TimePeriodCollection
    where
        S: IntoIterator,
        S::Item: TimePeriod,
        T: IntoIterator,
        T::Item: TimePeriod,
    {
        let source: Vec<TimeRange> = source.into_iter().map(|p| p.to_range()).collect();
        let subtracting: Vec<TimeRange> = subtracting.into_iter().map(|p| p.to_range()).collect();

        if source.is_empty() {
            return TimePeriodCollection::new();
        }
        if subtracting.is_empty() && !combine_periods {
            return source.into_iter().collect();
        }

        let mut combined_source = self.combiner.combine_periods(&source);
        if subtracting.is_empty() {
            return combined_source;
        }

        let combined_subtracting = self.combiner.combine_periods(&subtracting);
        let source_span = TimeRange::new(combined_source.start(), combined_source.end());
        let gaps = self
            .gap_calculator
            .gaps(&combined_subtracting, Some(&source_span));

        combined_source.extend(gaps);
        let result = self
            .intersector
            .intersect_periods(&combined_source, combine_periods);
        debug!(
            "event=subtract_periods module=timeline sources={} subtracting={} combine={} results={}",
            source.len(),
            subtracting.len(),
            combine_periods,
            result.len()
        );
        result
    }
}

impl std::fmt::Debug for TimePeriodSubtractor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimePeriodSubtractor")
            .field("mapped", &self.combiner.mapper().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use timeperiod_core::moment::Moment;

    fn h(hour: i64) -> Moment {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + TimeDelta::hours(hour)
    }

    fn r(s: i64, e: i64) -> TimeRange {
        TimeRange::new(h(s), h(e))
    }

    /// Merges sorted ranges in place, joining touching neighbours.
    fn merge_in_place(ranges: &mut Vec<TimeRange>) {
        ranges.sort();
        let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
        for range in ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if range.start() <= last.end() => {
                    *last = TimeRange::new(last.start(), last.end().max(range.end()));
                }
                _ => merged.push(range),
            }
        }
        *ranges = merged;
    }

    /// Direct two-pointer subtraction of merged interval lists.
    fn subtract_directly(source: &[TimeRange], subtracting: &[TimeRange]) -> Vec<TimeRange> {
        let mut source = source.iter().filter(|p| !p.is_moment()).copied().collect();
        let mut subtracting = subtracting.iter().filter(|p| !p.is_moment()).copied().collect();
        merge_in_place(&mut source);
        merge_in_place(&mut subtracting);

        let mut result = Vec::new();
        let mut j = 0;
        for s in &source {
            let mut cursor = s.start();
            while j < subtracting.len() && subtracting[j].end() <= cursor {
                j += 1;
            }
            let mut k = j;
            while k < subtracting.len() && subtracting[k].start() < s.end() {
                if subtracting[k].start() > cursor {
                    result.push(TimeRange::new(cursor, subtracting[k].start()));
                }
                cursor = cursor.max(subtracting[k].end());
                k += 1;
            }
            if cursor < s.end() {
                result.push(TimeRange::new(cursor, s.end()));
            }
        }
        result
    }

    fn random_periods(rng: &mut ChaCha8Rng, max_len: usize) -> Vec<TimeRange> {
        (0..rng.random_range(0..max_len))
            .map(|_| {
                let s = rng.random_range(0..200);
                r(s, s + rng.random_range(0..30))
            })
            .collect()
    }

    #[test]
    fn test_subtract_middle_of_month() {
        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let source = [TimeRange::new(day(1), day(31))];
        let subtracting = [TimeRange::new(day(10), day(20))];
        let result = TimePeriodSubtractor::new().subtract_periods(&source, &subtracting, true);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], TimeRange::new(day(1), day(10)));
        assert_eq!(result[1], TimeRange::new(day(20), day(31)));
    }

    #[test]
    fn test_subtract_empty_source() {
        let result =
            TimePeriodSubtractor::new().subtract_periods(Vec::<TimeRange>::new(), [r(0, 5)], true);
        assert!(result.is_empty());
    }

    #[test]
    fn test_subtract_nothing_returns_source() {
        let source = [r(5, 8), r(0, 6)];
        let raw =
            TimePeriodSubtractor::new().subtract_periods(&source, Vec::<TimeRange>::new(), false);
        assert_eq!(raw.as_slice(), &source);

        let combined =
            TimePeriodSubtractor::new().subtract_periods(&source, Vec::<TimeRange>::new(), true);
        assert_eq!(combined.as_slice(), &[r(0, 8)]);
    }

    #[test]
    fn test_subtract_everything() {
        let result = TimePeriodSubtractor::new().subtract_periods([r(2, 4)], [r(0, 10)], true);
        assert!(result.is_empty());
    }

    #[test]
    fn test_subtract_many_overlapping() {
        let source = [r(0, 10), r(20, 30)];
        let subtracting = [r(2, 4), r(3, 5), r(9, 21), r(25, 26), r(29, 40)];
        let result = TimePeriodSubtractor::new().subtract_periods(&source, &subtracting, true);
        assert_eq!(result.as_slice(), &[r(0, 2), r(5, 9), r(21, 25), r(26, 29)]);
    }

    #[test]
    fn test_subtract_disjoint_union_recovers_remainder() {
        let a = [r(0, 3), r(10, 12)];
        let b = [r(5, 8), r(20, 25)];
        let union: Vec<TimeRange> = a.iter().chain(b.iter()).copied().collect();
        let result = TimePeriodSubtractor::new().subtract_periods(&union, &b, true);
        let expected = TimePeriodCombiner::new().combine_periods(&a);
        assert_eq!(result.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_subtract_uncombined_keeps_slices() {
        let result = TimePeriodSubtractor::new().subtract_periods([r(0, 10)], [r(4, 6)], false);
        assert_eq!(result.as_slice(), &[r(0, 4), r(6, 10)]);
    }

    #[test]
    fn test_subtract_matches_direct_sweep() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let source = random_periods(&mut rng, 12);
            let subtracting = random_periods(&mut rng, 12);
            let composed = TimePeriodSubtractor::new().subtract_periods(&source, &subtracting, true);
            let direct = subtract_directly(&source, &subtracting);
            assert_eq!(
                composed.as_slice(),
                direct.as_slice(),
                "source {source:?} subtracting {subtracting:?}"
            );
        }
    }
}
