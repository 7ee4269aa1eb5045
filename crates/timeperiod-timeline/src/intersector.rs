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
    combiner::SpanCollector,
    evaluator::{PeriodEvaluator, SweepCommand, TimeLinePeriodEvaluator},
};
use log::debug;
use timeperiod_core::period::{PeriodMapper, TimePeriod, TimeRange};

/// Which slices count as part of the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectionPolicy {
    /// Slices covered by at least two input periods.
    #[default]
    AnyOverlap,
    /// Slices covered by every input period.
    AllPeriods,
}

impl IntersectionPolicy {
    #[inline]
    fn accepts(self, concurrency: usize, period_count: usize) -> bool {
        match self {
            IntersectionPolicy::AnyOverlap => concurrency > 1,
            IntersectionPolicy::AllPeriods => concurrency > 0 && concurrency == period_count,
        }
    }
}

impl std::fmt::Display for IntersectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntersectionPolicy::AnyOverlap => f.write_str("any-overlap"),
            IntersectionPolicy::AllPeriods => f.write_str("all-periods"),
        }
    }
}

struct IntersectEvaluator {
    policy: IntersectionPolicy,
    period_count: usize,
    combine: bool,
    spans: SpanCollector,
    slices: Vec<TimeRange>,
}

impl PeriodEvaluator for IntersectEvaluator {
    fn evaluate_period(&mut self, period: TimeRange, concurrency: usize) -> SweepCommand {
        let accepted = self.policy.accepts(concurrency, self.period_count);
        match (accepted, self.combine) {
            (true, true) => self.spans.push_covered(period),
            (true, false) => self.slices.push(period),
            (false, true) => self.spans.close(),
            (false, false) => {}
        }
        SweepCommand::Continue
    }
}

/// Computes the intersection of a period collection.
///
/// With `combine_periods` the intersected slices are merged into maximal
/// spans. Without it every elementary slice between two consecutive
/// boundaries is returned on its own, which shows where the set of covering
/// periods changes.
///
/// # Examples
///
/// ```rust
/// # use timeperiod_timeline::intersector::TimePeriodIntersector;
/// # use timeperiod_core::period::TimeRange;
/// # use chrono::NaiveDate;
/// let at = |h| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(h, 0, 0).unwrap();
///
/// let periods = [TimeRange::new(at(0), at(12)), TimeRange::new(at(6), at(18))];
/// let intersection = TimePeriodIntersector::new().intersect_periods(&periods, true);
/// assert_eq!(intersection.as_slice(), &[TimeRange::new(at(6), at(12))]);
/// ```
#[derive(Clone, Copy, Default)]
pub struct TimePeriodIntersector<'m> {
    mapper: Option<&'m dyn PeriodMapper>,
    policy: IntersectionPolicy,
}

impl<'m> TimePeriodIntersector<'m> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_mapper(mapper: &'m dyn PeriodMapper) -> Self {
        Self {
            mapper: Some(mapper),
            policy: IntersectionPolicy::default(),
        }
    }

    #[inline]
    pub fn with_policy(mut self, policy: IntersectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn policy(&self) -> IntersectionPolicy {
        self.policy
    }

    #[inline]
    pub fn mapper(&self) -> Option<&'m dyn PeriodMapper> {
        self.mapper
    }

    pub fn intersect_periods<I>(&self, periods: I, combine_periods: bool) -> TimePeriodCollection
    where
        I: IntoIterator,
        I::Item: TimePeriod,
    {
        let timeline = TimeLinePeriodEvaluator::new(periods, self.mapper);
        let mut evaluator = IntersectEvaluator {
            policy: self.policy,
            period_count: timeline.period_count(),
            combine: combine_periods,
            spans: SpanCollector::default(),
            slices: Vec::new(),
        };
        timeline.evaluate(&mut evaluator);

        let raw = if combine_periods {
            evaluator.spans.finish()
        } else {
            evaluator.slices
        };
        let result: TimePeriodCollection = raw
            .into_iter()
            .map(|p| timeline.map_period(p.start(), p.end()))
            .collect();
        debug!(
            "event=intersect_periods module=timeline policy={} combine={} inputs={} results={}",
            self.policy,
            combine_periods,
            timeline.period_count(),
            result.len()
        );
        result
    }
}

impl std::fmt::Debug for TimePeriodIntersector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimePeriodIntersector")
            .field("mapped", &self.mapper.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combiner::TimePeriodCombiner;
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
    fn test_intersect_two_overlapping_periods() {
        let periods = [r(0, 12), r(6, 18)];
        let result = TimePeriodIntersector::new().intersect_periods(&periods, true);
        assert_eq!(result.as_slice(), &[r(6, 12)]);
    }

    #[test]
    fn test_intersect_touching_is_empty() {
        let result = TimePeriodIntersector::new().intersect_periods([r(0, 5), r(5, 9)], true);
        assert!(result.is_empty());
    }

    #[test]
    fn test_intersect_combines_contiguous_slices() {
        let periods = [r(0, 10), r(2, 6), r(4, 8)];
        let combined = TimePeriodIntersector::new().intersect_periods(&periods, true);
        assert_eq!(combined.as_slice(), &[r(2, 8)]);

        let raw = TimePeriodIntersector::new().intersect_periods(&periods, false);
        assert_eq!(raw.as_slice(), &[r(2, 4), r(4, 6), r(6, 8)]);
    }

    #[test]
    fn test_intersect_all_periods_policy() {
        let periods = [r(0, 10), r(2, 6), r(4, 8)];
        let all = TimePeriodIntersector::new()
            .with_policy(IntersectionPolicy::AllPeriods)
            .intersect_periods(&periods, true);
        assert_eq!(all.as_slice(), &[r(4, 6)]);

        let disjoint = TimePeriodIntersector::new()
            .with_policy(IntersectionPolicy::AllPeriods)
            .intersect_periods([r(0, 2), r(3, 4)], true);
        assert!(disjoint.is_empty());
    }

    #[test]
    fn test_intersect_all_periods_single_input() {
        let result = TimePeriodIntersector::new()
            .with_policy(IntersectionPolicy::AllPeriods)
            .intersect_periods([r(1, 3)], true);
        assert_eq!(result.as_slice(), &[r(1, 3)]);
    }

    #[test]
    fn test_intersect_combined_set_with_itself_is_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..40 {
            let periods: Vec<_> = (0..rng.random_range(1..12))
                .map(|_| {
                    let s = rng.random_range(0..80);
                    r(s, s + rng.random_range(1..15))
                })
                .collect();
            let combined = TimePeriodCombiner::new().combine_periods(&periods);
            let doubled: Vec<TimeRange> = combined.iter().chain(combined.iter()).copied().collect();
            let intersected = TimePeriodIntersector::new().intersect_periods(&doubled, true);
            assert_eq!(intersected.as_slice(), combined.as_slice());
        }
    }
}
