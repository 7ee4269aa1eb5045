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
    evaluator::{PeriodEvaluator, SweepCommand, TimeLinePeriodEvaluator, unmap_period},
};
use log::debug;
use timeperiod_core::period::{PeriodMapper, TimePeriod, TimeRange};

struct GapEvaluator {
    gaps: Vec<TimeRange>,
}

impl PeriodEvaluator for GapEvaluator {
    fn ignore_empty_periods(&self) -> bool {
        true
    }

    fn evaluate_period(&mut self, period: TimeRange, concurrency: usize) -> SweepCommand {
        if concurrency == 0 {
            self.gaps.push(period);
        }
        SweepCommand::Continue
    }
}

/// Computes the uncovered parts of a limiting period.
///
/// Periods are clipped to the limits first; parts outside the limits and
/// clips of zero length are ignored. When nothing remains the whole limiting
/// period is a single gap.
///
/// # Examples
///
/// ```rust
/// # use timeperiod_timeline::gaps::TimeGapCalculator;
/// # use timeperiod_core::period::TimeRange;
/// # use chrono::NaiveDate;
/// let at = |d, h| NaiveDate::from_ymd_opt(2015, 9, d).unwrap().and_hms_opt(h, 0, 0).unwrap();
///
/// let excluded = [TimeRange::new(at(15, 0), at(16, 0))];
/// let limits = TimeRange::new(at(14, 9), at(17, 18));
/// let gaps = TimeGapCalculator::new().gaps(&excluded, Some(&limits));
/// assert_eq!(
///     gaps.as_slice(),
///     &[TimeRange::new(at(14, 9), at(15, 0)), TimeRange::new(at(16, 0), at(17, 18))]
/// );
/// ```
#[derive(Clone, Copy, Default)]
pub struct TimeGapCalculator<'m> {
    mapper: Option<&'m dyn PeriodMapper>,
}

impl<'m> TimeGapCalculator<'m> {
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

    /// Returns the gaps of `periods` within `limits`, or within the span of
    /// `periods` if no limits are given.
    pub fn gaps<I>(&self, periods: I, limits: Option<&dyn TimePeriod>) -> TimePeriodCollection
    where
        I: IntoIterator,
        I::Item: TimePeriod,
    {
        let canonical: Vec<TimeRange> = periods
            .into_iter()
            .map(|p| unmap_period(self.mapper, &p))
            .collect();

        let bounds = match limits {
            Some(limits) => unmap_period(self.mapper, limits),
            None => match span_of(&canonical) {
                Some(span) => span,
                None => return TimePeriodCollection::new(),
            },
        };
        // Zero-width limits hold no gap, covered or not.
        if bounds.is_moment() {
            return TimePeriodCollection::new();
        }

        let clipped: Vec<TimeRange> = canonical
            .iter()
            .filter_map(|p| p.intersection(&bounds))
            .filter(|p| !p.is_moment())
            .collect();

        let timeline = TimeLinePeriodEvaluator::new(&clipped, None);
        let mut raw = Vec::new();
        match (timeline.moments().min(), timeline.moments().max()) {
            (Some(first), Some(last)) => {
                if bounds.start() < first.moment() {
                    raw.push(TimeRange::new_unchecked(bounds.start(), first.moment()));
                }
                let mut evaluator = GapEvaluator { gaps: Vec::new() };
                timeline.evaluate(&mut evaluator);
                raw.extend(evaluator.gaps);
                if last.moment() < bounds.end() {
                    raw.push(TimeRange::new_unchecked(last.moment(), bounds.end()));
                }
            }
            _ => raw.push(bounds),
        }

        let result: TimePeriodCollection = raw
            .into_iter()
            .map(|gap| map_period(self.mapper, gap))
            .collect();
        debug!(
            "event=calculate_gaps module=timeline inputs={} clipped={} limits={} results={}",
            canonical.len(),
            clipped.len(),
            bounds,
            result.len()
        );
        result
    }
}

fn span_of(periods: &[TimeRange]) -> Option<TimeRange> {
    let start = periods.iter().map(|p| p.start()).min()?;
    let end = periods.iter().map(|p| p.end()).max()?;
    Some(TimeRange::new(start, end))
}

fn map_period(mapper: Option<&dyn PeriodMapper>, period: TimeRange) -> TimeRange {
    match mapper {
        Some(mapper) => TimeRange::new(
            mapper.map_start(period.start()),
            mapper.map_end(period.end()),
        ),
        None => period,
    }
}

impl std::fmt::Debug for TimeGapCalculator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeGapCalculator")
            .field("mapped", &self.mapper.is_some())
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
    fn test_gaps_without_limits_use_span() {
        let gaps = TimeGapCalculator::new().gaps([r(0, 2), r(5, 6), r(1, 3), r(8, 9)], None);
        assert_eq!(gaps.as_slice(), &[r(3, 5), r(6, 8)]);
    }

    #[test]
    fn test_gaps_empty_input_without_limits() {
        assert!(TimeGapCalculator::new().gaps(Vec::<TimeRange>::new(), None).is_empty());
    }

    #[test]
    fn test_gaps_empty_input_returns_limits() {
        let limits = r(0, 10);
        let gaps = TimeGapCalculator::new().gaps(Vec::<TimeRange>::new(), Some(&limits));
        assert_eq!(gaps.as_slice(), &[limits]);
    }

    #[test]
    fn test_gaps_moment_limits_yield_no_gap() {
        let calculator = TimeGapCalculator::new();
        let covered = TimeRange::moment(h(2));
        assert!(calculator.gaps([r(1, 3)], Some(&covered)).is_empty());
        let uncovered = TimeRange::moment(h(5));
        assert!(calculator.gaps([r(1, 3)], Some(&uncovered)).is_empty());
        assert!(calculator.gaps(Vec::<TimeRange>::new(), Some(&uncovered)).is_empty());
    }

    #[test]
    fn test_gaps_periods_outside_limits_are_ignored() {
        let limits = r(10, 20);
        let gaps = TimeGapCalculator::new().gaps([r(0, 5), r(25, 30)], Some(&limits));
        assert_eq!(gaps.as_slice(), &[limits]);
    }

    #[test]
    fn test_gaps_clip_to_limits() {
        let limits = r(10, 20);
        let gaps = TimeGapCalculator::new().gaps([r(5, 12), r(14, 15), r(18, 30)], Some(&limits));
        assert_eq!(gaps.as_slice(), &[r(12, 14), r(15, 18)]);
    }

    #[test]
    fn test_gaps_fully_covered() {
        let limits = r(10, 20);
        let gaps = TimeGapCalculator::new().gaps([r(0, 30)], Some(&limits));
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_gaps_exclusion_day_inside_limits() {
        let at = |d: u32, hour: u32| {
            NaiveDate::from_ymd_opt(2015, 9, d)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap()
        };
        let excluded = [TimeRange::new(at(15, 0), at(16, 0))];
        let limits = TimeRange::new(at(14, 9), at(17, 18));
        let gaps = TimeGapCalculator::new().gaps(&excluded, Some(&limits));
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0], TimeRange::new(at(14, 9), at(15, 0)));
        assert_eq!(gaps[1], TimeRange::new(at(16, 0), at(17, 18)));
    }

    #[test]
    fn test_gaps_and_combine_tile_the_limits() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let limits = r(rng.random_range(0..20), rng.random_range(60..100));
            let periods: Vec<_> = (0..rng.random_range(0..10))
                .map(|_| {
                    let s = rng.random_range(0..110);
                    r(s, s + rng.random_range(1..15))
                })
                .collect();

            let clipped: Vec<_> = periods
                .iter()
                .filter_map(|p| p.intersection(&limits))
                .collect();
            let covered = TimePeriodCombiner::new().combine_periods(&clipped);
            let gaps = TimeGapCalculator::new().gaps(&periods, Some(&limits));

            let mut tiles: Vec<TimeRange> = covered.iter().chain(gaps.iter()).copied().collect();
            tiles.sort();
            assert_eq!(tiles.first().map(|t| t.start()), Some(limits.start()));
            assert_eq!(tiles.last().map(|t| t.end()), Some(limits.end()));
            for w in tiles.windows(2) {
                assert_eq!(w[0].end(), w[1].start(), "tiles {tiles:?}");
            }
        }
    }
}
