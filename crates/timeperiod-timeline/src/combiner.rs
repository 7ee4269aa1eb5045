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

use crate::{
    collection::TimePeriodCollection,
    evaluator::{PeriodEvaluator, SweepCommand, TimeLinePeriodEvaluator},
};
use log::debug;
use timeperiod_core::period::{PeriodMapper, TimePeriod, TimeRange};

/// Accumulates maximal covered spans while the sweep runs.
///
/// Slices are contiguous, so a covered slice extends the open span whenever
/// it starts where the span ends, and any uncovered slice closes it.
#[derive(Debug, Default)]
pub(crate) struct SpanCollector {
    spans: Vec<TimeRange>,
    open: Option<TimeRange>,
}

impl SpanCollector {
    pub(crate) fn push_covered(&mut self, slice: TimeRange) {
        match self.open.as_mut() {
            Some(open) if open.end() == slice.start() => {
                *open = TimeRange::new_unchecked(open.start(), slice.end());
            }
            _ => {
                if let Some(done) = self.open.replace(slice) {
                    self.spans.push(done);
                }
            }
        }
    }

    pub(crate) fn close(&mut self) {
        if let Some(done) = self.open.take() {
            self.spans.push(done);
        }
    }

    pub(crate) fn finish(mut self) -> Vec<TimeRange> {
        self.close();
        self.spans
    }
}

struct CombineEvaluator {
    spans: SpanCollector,
}

impl PeriodEvaluator for CombineEvaluator {
    fn evaluate_period(&mut self, period: TimeRange, concurrency: usize) -> SweepCommand {
        if concurrency > 0 {
            self.spans.push_covered(period);
        } else {
            self.spans.close();
        }
        SweepCommand::Continue
    }
}

/// Computes the union of a period collection.
///
/// The result holds the maximal covered spans in chronological order: any two
/// result periods are separated by a gap of positive length. Moment periods
/// cover no time and do not contribute.
///
/// # Examples
///
/// ```rust
/// # use timeperiod_timeline::combiner::TimePeriodCombiner;
/// # use timeperiod_core::period::TimeRange;
/// # use chrono::NaiveDate;
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let periods = [
///     TimeRange::new(day(1), day(5)),
///     TimeRange::new(day(3), day(8)),
///     TimeRange::new(day(8), day(10)),
///     TimeRange::new(day(20), day(25)),
/// ];
/// let combined = TimePeriodCombiner::new().combine_periods(&periods);
/// assert_eq!(combined.len(), 2);
/// assert_eq!(combined[0], TimeRange::new(day(1), day(10)));
/// assert_eq!(combined[1], TimeRange::new(day(20), day(25)));
/// ```
#[derive(Clone, Copy, Default)]
pub struct TimePeriodCombiner<'m> {
    mapper: Option<&'m dyn PeriodMapper>,
}

impl<'m> TimePeriodCombiner<'m> {
    #[inline]
    pub fn new() -> Self {
        Self { mapper: None }
    }

    #[inline]
    pub fn with_mapper(mapper: &'m dyn PeriodMapper) -> Self {
        Self {
            mapper: Some(mapper),
        }
    }

    #[inline]
    pub fn mapper(&self) -> Option<&'m dyn PeriodMapper> {
        self.mapper
    }

    pub fn combine_periods<I>(&self, periods: I) -> TimePeriodCollection
    where
        I: IntoIterator,
        I::Item: TimePeriod,
    {
        let timeline = TimeLinePeriodEvaluator::new(periods, self.mapper);
        let mut evaluator = CombineEvaluator {
            spans: SpanCollector::default(),
        };
        timeline.evaluate(&mut evaluator);

        let result: TimePeriodCollection = evaluator
            .spans
            .finish()
            .into_iter()
            .map(|span| timeline.map_period(span.start(), span.end()))
            .collect();
        debug!(
            "event=combine_periods module=timeline inputs={} results={}",
            timeline.period_count(),
            result.len()
        );
        result
    }
}

impl std::fmt::Debug for TimePeriodCombiner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimePeriodCombiner")
            .field("mapped", &self.mapper.is_some())
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

    #[test]
    fn test_combine_empty() {
        let combined = TimePeriodCombiner::new().combine_periods(Vec::<TimeRange>::new());
        assert!(combined.is_empty());
    }

    #[test]
    fn test_combine_single() {
        let combined = TimePeriodCombiner::new().combine_periods([r(1, 5)]);
        assert_eq!(combined.as_slice(), &[r(1, 5)]);
    }

    #[test]
    fn test_combine_touching_merges() {
        let combined = TimePeriodCombiner::new().combine_periods([r(0, 24), r(24, 48)]);
        assert_eq!(combined.as_slice(), &[r(0, 48)]);
    }

    #[test]
    fn test_combine_nested_and_disjoint() {
        let combined =
            TimePeriodCombiner::new().combine_periods([r(10, 12), r(0, 20), r(5, 6), r(30, 31)]);
        assert_eq!(combined.as_slice(), &[r(0, 20), r(30, 31)]);
    }

    #[test]
    fn test_combine_ignores_isolated_moments() {
        let combined = TimePeriodCombiner::new().combine_periods([
            r(0, 2),
            TimeRange::moment(h(5)),
            r(8, 9),
        ]);
        assert_eq!(combined.as_slice(), &[r(0, 2), r(8, 9)]);
    }

    #[test]
    fn test_combine_tiling_preserves_span() {
        let tiles: Vec<_> = (0..12).map(|i| r(2 * i, 2 * i + 2)).collect();
        let combined = TimePeriodCombiner::new().combine_periods(&tiles);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].duration(), TimeDelta::hours(24));
    }

    #[test]
    fn test_combine_result_is_disjoint_and_covers_inputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let periods: Vec<_> = (0..rng.random_range(1..15))
                .map(|_| {
                    let s = rng.random_range(0..100);
                    r(s, s + rng.random_range(1..20))
                })
                .collect();
            let combined = TimePeriodCombiner::new().combine_periods(&periods);
            for w in combined.as_slice().windows(2) {
                assert!(w[0].end() < w[1].start());
            }
            for p in &periods {
                assert!(combined.iter().any(|c| c.has_inside(p)));
            }
        }
    }
}
