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

//! # Calendar Period Collector
//!
//! `CalendarPeriodCollector` gathers the calendar periods within its limits
//! that pass a `CalendarPeriodCollectorFilter`, at one of four scopes:
//!
//! - years: every matching year.
//! - months: every matching month, or for each collecting month range one
//!   period spanning the range.
//! - days: every matching day, or for each collecting day range one period
//!   spanning the range (clamped to the month).
//! - hours: every matching hour, or for each matching day one period per
//!   collecting hour range and per collecting day-hour range of that
//!   weekday.
//!
//! A candidate is kept when it lies within the limits (closed containment)
//! and overlaps no exclusion period. Results accumulate across calls.

use crate::{
    calendar::TimeCalendar,
    error::CalendarError,
    filter::{CalendarPeriodCollectorFilter, CalendarVisitorFilter},
    period::CalendarPeriod,
    visitor::{CalendarVisitor, SeekDirection, VisitStep, ordered, start_period_visit},
};
use log::debug;
use timeperiod_core::period::{PeriodMapper, TimePeriod, TimeRange};
use timeperiod_timeline::collection::TimePeriodCollection;

/// Granularity of the periods a collection run emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectScope {
    Year,
    Month,
    Day,
    Hour,
}

/// Collects filtered calendar periods within fixed limits.
///
/// # Examples
///
/// ```rust
/// use chrono::{NaiveDate, Weekday};
/// use timeperiod_calendar::{
///     calendar::TimeCalendar,
///     collector::CalendarPeriodCollector,
///     filter::CalendarPeriodCollectorFilter,
///     range::HourRange,
///     visitor::SeekDirection,
/// };
/// use timeperiod_core::period::{TimePeriod, TimeRange};
///
/// let at = |d, h| NaiveDate::from_ymd_opt(2010, 1, d).unwrap().and_hms_opt(h, 0, 0).unwrap();
///
/// let mut filter = CalendarPeriodCollectorFilter::new();
/// filter.visitor_filter_mut().add_weekday(Weekday::Fri);
/// filter.add_collecting_hours(HourRange::from_hours(9, 17).unwrap());
///
/// let limits = TimeRange::new(at(1, 0), at(31, 0));
/// let mut collector = CalendarPeriodCollector::new(
///     filter,
///     &limits,
///     SeekDirection::Forward,
///     TimeCalendar::default(),
/// );
/// collector.collect_hours().unwrap();
///
/// let periods = collector.periods();
/// assert_eq!(periods.len(), 5);
/// assert_eq!(periods[0].start(), at(1, 9));
/// assert_eq!(periods[0].end(), at(1, 17));
/// ```
#[derive(Clone, Debug)]
pub struct CalendarPeriodCollector {
    filter: CalendarPeriodCollectorFilter,
    limits: TimeRange,
    direction: SeekDirection,
    calendar: TimeCalendar,
    periods: TimePeriodCollection<TimeRange>,
}

impl CalendarPeriodCollector {
    pub fn new(
        filter: CalendarPeriodCollectorFilter,
        limits: &dyn TimePeriod,
        direction: SeekDirection,
        calendar: TimeCalendar,
    ) -> Self {
        Self {
            filter,
            limits: limits.to_range(),
            direction,
            calendar,
            periods: TimePeriodCollection::new(),
        }
    }

    #[inline]
    pub fn collecting_filter(&self) -> &CalendarPeriodCollectorFilter {
        &self.filter
    }

    /// Periods collected so far.
    #[inline]
    pub fn periods(&self) -> &TimePeriodCollection<TimeRange> {
        &self.periods
    }

    #[inline]
    pub fn into_periods(self) -> TimePeriodCollection<TimeRange> {
        self.periods
    }

    pub fn collect_years(&mut self) -> Result<(), CalendarError> {
        self.collect(CollectScope::Year)
    }

    pub fn collect_months(&mut self) -> Result<(), CalendarError> {
        self.collect(CollectScope::Month)
    }

    pub fn collect_days(&mut self) -> Result<(), CalendarError> {
        self.collect(CollectScope::Day)
    }

    pub fn collect_hours(&mut self) -> Result<(), CalendarError> {
        self.collect(CollectScope::Hour)
    }

    fn collect(&mut self, scope: CollectScope) -> Result<(), CalendarError> {
        let limits = self.limits;
        let before = self.periods.len();
        let mut context = scope;
        start_period_visit(self, &limits, &mut context)?;
        debug!(
            "event=collect module=collector scope={:?} limits={} collected={}",
            scope,
            limits,
            self.periods.len() - before
        );
        Ok(())
    }

    /// Calendar year holding month `month` of the calendar year `year`
    /// starts in.
    fn year_of_month(&self, year: &CalendarPeriod, month: u32) -> i32 {
        if month >= self.calendar.year_base_month() {
            year.year_value()
        } else {
            year.year_value() + 1
        }
    }

    fn months_in(&self, year: &CalendarPeriod) -> Vec<TimeRange> {
        let ranges = self.filter.collecting_months();
        if ranges.is_empty() {
            return ordered(year.children(), self.direction)
                .into_iter()
                .filter(|month| self.is_matching_month(month) && self.check_limits(month))
                .map(|month| month.to_range())
                .collect();
        }

        let mut found = Vec::new();
        for range in ranges {
            let first_year = self.year_of_month(year, range.min());
            let count = range.max() - range.min() + 1;
            let Ok(months) = CalendarPeriod::months(first_year, range.min(), count, self.calendar)
            else {
                continue;
            };
            let matching = months
                .units()
                .iter()
                .all(|month| self.is_matching_month(month));
            if matching && self.check_limits(&months) {
                found.push(months.to_range());
            }
        }
        found.sort_by_key(|period| period.start());
        ordered(found, self.direction)
    }

    fn days_in(&self, month: &CalendarPeriod) -> Vec<TimeRange> {
        let ranges = self.filter.collecting_days();
        if ranges.is_empty() {
            return ordered(month.children(), self.direction)
                .into_iter()
                .filter(|day| self.is_matching_day(day) && self.check_limits(day))
                .map(|day| day.to_range())
                .collect();
        }

        let (year, month_value) = (month.year_value(), month.month_value());
        let Ok(month_length) = self.calendar.days_in_month(year, month_value) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for range in ranges {
            if range.min() > month_length {
                continue;
            }
            let count = range.max().min(month_length) - range.min() + 1;
            let Ok(days) =
                CalendarPeriod::days(year, month_value, range.min(), count, self.calendar)
            else {
                continue;
            };
            let matching = days.units().iter().all(|day| self.is_matching_day(day));
            if matching && self.check_limits(&days) {
                found.push(days.to_range());
            }
        }
        found.sort_by_key(|period| period.start());
        ordered(found, self.direction)
    }

    fn hours_in(&self, day: &CalendarPeriod) -> Vec<TimeRange> {
        let filter = &self.filter;
        if filter.collecting_hours().is_empty() && filter.collecting_day_hours().is_empty() {
            return ordered(day.children(), self.direction)
                .into_iter()
                .filter(|hour| self.is_matching_hour(hour) && self.check_limits(hour))
                .map(|hour| hour.to_range())
                .collect();
        }
        if !self.is_matching_day(day) {
            return Vec::new();
        }

        let weekday = day.weekday();
        let date = day.date();
        let ranges = filter.collecting_hours().iter().copied().chain(
            filter
                .collecting_day_hours()
                .iter()
                .filter(|range| range.weekday() == weekday)
                .map(|range| range.hours()),
        );

        let mut found = Vec::new();
        for range in ranges {
            let (Some(start), Some(end)) =
                (range.start().to_moment(date), range.end().to_moment(date))
            else {
                continue;
            };
            if start == end {
                continue;
            }
            let period = TimeRange::new(self.calendar.map_start(start), self.calendar.map_end(end));
            if self.check_exclude_periods(&period) && self.check_limits(&period) {
                found.push(period);
            }
        }
        found.sort_by_key(|period| period.start());
        ordered(found, self.direction)
    }
}

impl CalendarVisitor for CalendarPeriodCollector {
    type Context = CollectScope;

    fn filter(&self) -> &CalendarVisitorFilter {
        self.filter.visitor_filter()
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

    fn enter_years(&mut self, _years: &CalendarPeriod, scope: &mut CollectScope) -> bool {
        matches!(
            scope,
            CollectScope::Month | CollectScope::Day | CollectScope::Hour
        )
    }

    fn enter_months(&mut self, _year: &CalendarPeriod, scope: &mut CollectScope) -> bool {
        matches!(scope, CollectScope::Day | CollectScope::Hour)
    }

    fn enter_days(&mut self, _month: &CalendarPeriod, scope: &mut CollectScope) -> bool {
        *scope == CollectScope::Hour
    }

    fn enter_hours(&mut self, _day: &CalendarPeriod, _scope: &mut CollectScope) -> bool {
        false
    }

    fn on_visit_years(&mut self, years: &CalendarPeriod, scope: &mut CollectScope) -> VisitStep {
        if *scope != CollectScope::Year {
            return VisitStep::Descend;
        }
        let found: Vec<TimeRange> = ordered(years.units(), self.direction)
            .into_iter()
            .filter(|year| self.is_matching_year(year) && self.check_limits(year))
            .map(|year| year.to_range())
            .collect();
        self.periods.extend(found);
        VisitStep::Skip
    }

    fn on_visit_year(&mut self, year: &CalendarPeriod, scope: &mut CollectScope) -> VisitStep {
        if *scope != CollectScope::Month {
            return VisitStep::Descend;
        }
        let found = self.months_in(year);
        self.periods.extend(found);
        VisitStep::Skip
    }

    fn on_visit_month(&mut self, month: &CalendarPeriod, scope: &mut CollectScope) -> VisitStep {
        if *scope != CollectScope::Day {
            return VisitStep::Descend;
        }
        let found = self.days_in(month);
        self.periods.extend(found);
        VisitStep::Skip
    }

    fn on_visit_day(&mut self, day: &CalendarPeriod, scope: &mut CollectScope) -> VisitStep {
        if *scope != CollectScope::Hour {
            return VisitStep::Descend;
        }
        let found = self.hours_in(day);
        self.periods.extend(found);
        VisitStep::Skip
    }
}
