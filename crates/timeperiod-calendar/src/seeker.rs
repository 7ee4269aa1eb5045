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

//! Day seeking.
//!
//! `DaySeeker` walks day by day from a start day and returns the n-th day
//! passing its filter, which is how "five working days after" style
//! questions are answered. The start day itself never counts. A negative
//! offset seeks against the configured direction.

use crate::{
    calendar::TimeCalendar,
    error::CalendarError,
    filter::CalendarVisitorFilter,
    period::{CalendarPeriod, CalendarUnit},
    visitor::{CalendarVisitor, SeekDirection, VisitStep, start_day_visit},
};
use log::debug;
use timeperiod_core::period::{TimePeriod, TimeRange};

/// State of one `DaySeeker::find_day` run.
#[derive(Clone, Copy, Debug)]
pub struct DaySeekerContext {
    start: CalendarPeriod,
    direction: SeekDirection,
    remaining: u32,
    found: Option<CalendarPeriod>,
}

impl DaySeekerContext {
    #[inline]
    pub fn found(&self) -> Option<CalendarPeriod> {
        self.found
    }

    /// Matching days still to pass.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Finds the n-th matching day relative to a start day.
///
/// # Examples
///
/// ```rust
/// use timeperiod_calendar::{
///     calendar::TimeCalendar,
///     filter::CalendarVisitorFilter,
///     period::CalendarPeriod,
///     seeker::DaySeeker,
///     visitor::SeekDirection,
/// };
///
/// let calendar = TimeCalendar::default();
/// let mut filter = CalendarVisitorFilter::new();
/// filter.add_working_weekdays();
///
/// let mut seeker = DaySeeker::new(filter, SeekDirection::Forward, calendar);
/// // 2024-01-05 is a Friday.
/// let friday = CalendarPeriod::day(2024, 1, 5, calendar).unwrap();
/// let next = seeker.find_day(&friday, 1).unwrap().unwrap();
/// assert_eq!(next.day_value(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct DaySeeker {
    filter: CalendarVisitorFilter,
    limits: TimeRange,
    direction: SeekDirection,
    calendar: TimeCalendar,
}

impl DaySeeker {
    /// Creates a seeker without limits.
    pub fn new(
        filter: CalendarVisitorFilter,
        direction: SeekDirection,
        calendar: TimeCalendar,
    ) -> Self {
        Self {
            filter,
            limits: TimeRange::anytime(),
            direction,
            calendar,
        }
    }

    /// Restricts candidate days to `limits`. The seek gives up once it
    /// walks past them.
    pub fn with_limits(mut self, limits: &dyn TimePeriod) -> Self {
        self.limits = limits.to_range();
        self
    }

    /// Returns the day `offset` matching days away from `start`, `None` when
    /// the limits or the date range run out first. An offset of zero returns
    /// `start` unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::UnexpectedUnit` if `start` is not a day.
    pub fn find_day(
        &mut self,
        start: &CalendarPeriod,
        offset: i32,
    ) -> Result<Option<CalendarPeriod>, CalendarError> {
        if start.unit() != CalendarUnit::Day {
            return Err(CalendarError::UnexpectedUnit {
                expected: CalendarUnit::Day,
                found: start.unit(),
            });
        }
        if offset == 0 {
            return Ok(Some(*start));
        }

        let direction = if offset > 0 {
            self.direction
        } else {
            self.direction.reversed()
        };
        let mut context = DaySeekerContext {
            start: *start,
            direction,
            remaining: offset.unsigned_abs(),
            found: None,
        };
        start_day_visit(self, start, &mut context, direction)?;
        debug!(
            "event=find_day module=seeker start={} offset={} found={:?}",
            start.date(),
            offset,
            context.found.map(|day| day.date())
        );
        Ok(context.found)
    }

    fn is_past_limits(&self, day: &CalendarPeriod, direction: SeekDirection) -> bool {
        match direction {
            SeekDirection::Forward => day.start() >= self.limits.end(),
            SeekDirection::Backward => day.end() <= self.limits.start(),
        }
    }
}

impl CalendarVisitor for DaySeeker {
    type Context = DaySeekerContext;

    fn filter(&self) -> &CalendarVisitorFilter {
        &self.filter
    }

    fn limits(&self) -> &TimeRange {
        &self.limits
    }

    fn seek_direction(&self) -> SeekDirection {
        self.direction
    }

    fn calendar(&self) -> &TimeCalendar {
        &self.calendar
    }

    fn enter_years(&mut self, _years: &CalendarPeriod, context: &mut DaySeekerContext) -> bool {
        context.found.is_none()
    }

    fn enter_months(&mut self, _year: &CalendarPeriod, context: &mut DaySeekerContext) -> bool {
        context.found.is_none()
    }

    fn enter_days(&mut self, _month: &CalendarPeriod, context: &mut DaySeekerContext) -> bool {
        context.found.is_none()
    }

    fn enter_hours(&mut self, _day: &CalendarPeriod, _context: &mut DaySeekerContext) -> bool {
        false
    }

    fn on_visit_day(&mut self, day: &CalendarPeriod, context: &mut DaySeekerContext) -> VisitStep {
        if context.found.is_some() || self.is_past_limits(day, context.direction) {
            return VisitStep::Stop;
        }
        if day.is_same_period(&context.start) {
            return VisitStep::Descend;
        }
        if !self.is_matching_day(day) || !self.check_limits(day) {
            return VisitStep::Descend;
        }

        context.remaining -= 1;
        if context.remaining == 0 {
            context.found = Some(*day);
            return VisitStep::Stop;
        }
        VisitStep::Descend
    }
}
