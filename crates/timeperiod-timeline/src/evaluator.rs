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

//! # Timeline Period Evaluator
//!
//! The sweep driver shared by every set-algebra operator. It replays a
//! `TimeLineMomentCollection` as the contiguous slices
//! `[moment[i], moment[i + 1])`, each tagged with the number of input periods
//! covering it, and hands them to a `PeriodEvaluator` callback.
//!
//! Inputs are unmapped into canonical form through the optional
//! `PeriodMapper` before the index is built. Slices are reported in
//! canonical form as well; operators map their final results back with
//! [`TimeLinePeriodEvaluator::map_period`].

use crate::moments::TimeLineMomentCollection;
use log::trace;
use timeperiod_core::{
    moment::Moment,
    period::{PeriodMapper, TimePeriod, TimeRange},
};

/// Tells the sweep driver whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepCommand {
    #[default]
    Continue,
    Stop,
}

/// Callback invoked once per sweep slice.
pub trait PeriodEvaluator {
    /// Whether zero-length slices are skipped.
    fn ignore_empty_periods(&self) -> bool {
        false
    }

    /// Receives the canonical slice and the number of input periods covering
    /// it.
    fn evaluate_period(&mut self, period: TimeRange, concurrency: usize) -> SweepCommand;
}

impl<F> PeriodEvaluator for F
where
    F: FnMut(TimeRange, usize) -> SweepCommand,
{
    fn evaluate_period(&mut self, period: TimeRange, concurrency: usize) -> SweepCommand {
        self(period, concurrency)
    }
}

/// Owns the moment index of one computation and drives evaluators over it.
pub struct TimeLinePeriodEvaluator<'m> {
    moments: TimeLineMomentCollection,
    period_count: usize,
    mapper: Option<&'m dyn PeriodMapper>,
}

impl<'m> TimeLinePeriodEvaluator<'m> {
    /// Unmaps `periods` and indexes them.
    pub fn new<I>(periods: I, mapper: Option<&'m dyn PeriodMapper>) -> Self
    where
        I: IntoIterator,
        I::Item: TimePeriod,
    {
        let mut moments = TimeLineMomentCollection::new();
        let mut period_count = 0;
        for period in periods {
            moments.add(&unmap_period(mapper, &period));
            period_count += 1;
        }
        Self {
            moments,
            period_count,
            mapper,
        }
    }

    /// The number of input periods.
    #[inline]
    pub fn period_count(&self) -> usize {
        self.period_count
    }

    #[inline]
    pub fn moments(&self) -> &TimeLineMomentCollection {
        &self.moments
    }

    #[inline]
    pub fn mapper(&self) -> Option<&'m dyn PeriodMapper> {
        self.mapper
    }

    /// Maps canonical bounds back into the caller's convention.
    pub fn map_period(&self, start: Moment, end: Moment) -> TimeRange {
        match self.mapper {
            Some(mapper) => TimeRange::new(mapper.map_start(start), mapper.map_end(end)),
            None => TimeRange::new(start, end),
        }
    }

    /// Replays the index slice by slice.
    ///
    /// Returns the number of slices handed to `evaluator`.
    pub fn evaluate<E>(&self, evaluator: &mut E) -> usize
    where
        E: PeriodEvaluator + ?Sized,
    {
        let ignore_empty = evaluator.ignore_empty_periods();
        let mut concurrency: usize = 0;
        let mut evaluated = 0;
        let mut iter = self.moments.iter().peekable();

        while let Some(left) = iter.next() {
            let Some(right) = iter.peek() else {
                break;
            };

            // Periods ending here started at or before this moment, so the
            // count never underflows when starts are added first.
            concurrency += left.start_count();
            concurrency -= left.end_count();

            let slice = TimeRange::new_unchecked(left.moment(), right.moment());
            // Index keys are distinct, so slices always have width. The flag
            // is still honored as part of the evaluator contract.
            if ignore_empty && slice.is_moment() {
                continue;
            }

            trace!(
                "event=evaluate_slice module=timeline start={} end={} concurrency={}",
                slice.start(),
                slice.end(),
                concurrency
            );
            evaluated += 1;
            if evaluator.evaluate_period(slice, concurrency) == SweepCommand::Stop {
                break;
            }
        }
        evaluated
    }
}

/// Moves a period into canonical form.
pub(crate) fn unmap_period<P>(mapper: Option<&dyn PeriodMapper>, period: &P) -> TimeRange
where
    P: TimePeriod + ?Sized,
{
    match mapper {
        Some(mapper) => TimeRange::new(
            mapper.unmap_start(period.start()),
            mapper.unmap_end(period.end()),
        ),
        None => TimeRange::new(period.start(), period.end()),
    }
}
