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

//! # Calendar Visitor
//!
//! Walks the calendar hierarchy
//! `Years -> Year -> Months -> Month -> Days -> Day -> Hours -> Hour`
//! covering a period and hands every node to a `CalendarVisitor`.
//!
//! For each node the driver first asks the matching `on_visit_*` hook:
//! `Descend` continues below the node, `Skip` moves on to the next sibling
//! and `Stop` aborts the whole traversal. Descending additionally requires
//! the `enter_*` hook of the level to agree. Children that do not overlap
//! the visited period are never presented. With `SeekDirection::Backward`
//! children are presented latest first.
//!
//! The unit drivers (`start_year_visit` and friends) walk sideways instead:
//! starting from a period they present it and its successors (or
//! predecessors) one by one until a hook returns `Stop` or the date range
//! runs out. `Descend` and `Skip` both mean "keep going" there.

use crate::{
    calendar::TimeCalendar,
    error::CalendarError,
    filter::CalendarVisitorFilter,
    period::{CalendarPeriod, CalendarUnit},
};
use log::trace;
use std::ops::ControlFlow;
use timeperiod_core::period::{TimePeriod, TimeRange};

/// Order in which siblings are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SeekDirection {
    #[default]
    Forward,
    Backward,
}

impl SeekDirection {
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Answer of an `on_visit_*` hook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisitStep {
    /// Continue below the node.
    #[default]
    Descend,
    /// Do not descend; continue with the next sibling.
    Skip,
    /// Abort the traversal.
    Stop,
}

/// Hooks invoked while walking the calendar hierarchy.
///
/// Implementors supply the filter, limits, direction and calendar; every
/// hook has a default that visits everything. The `Context` carries
/// per-traversal state.
pub trait CalendarVisitor {
    type Context;

    fn filter(&self) -> &CalendarVisitorFilter;

    fn limits(&self) -> &TimeRange;

    fn seek_direction(&self) -> SeekDirection;

    fn calendar(&self) -> &TimeCalendar;

    fn on_visit_start(&mut self, _context: &mut Self::Context) {}

    fn on_visit_end(&mut self, _context: &mut Self::Context) {}

    fn enter_years(&mut self, _years: &CalendarPeriod, _context: &mut Self::Context) -> bool {
        true
    }

    fn enter_months(&mut self, _year: &CalendarPeriod, _context: &mut Self::Context) -> bool {
        true
    }

    fn enter_days(&mut self, _month: &CalendarPeriod, _context: &mut Self::Context) -> bool {
        true
    }

    fn enter_hours(&mut self, _day: &CalendarPeriod, _context: &mut Self::Context) -> bool {
        true
    }

    fn on_visit_years(
        &mut self,
        _years: &CalendarPeriod,
        _context: &mut Self::Context,
    ) -> VisitStep {
        VisitStep::Descend
    }

    fn on_visit_year(&mut self, _year: &CalendarPeriod, _context: &mut Self::Context) -> VisitStep {
        VisitStep::Descend
    }

    fn on_visit_month(
        &mut self,
        _month: &CalendarPeriod,
        _context: &mut Self::Context,
    ) -> VisitStep {
        VisitStep::Descend
    }

    fn on_visit_day(&mut self, _day: &CalendarPeriod, _context: &mut Self::Context) -> VisitStep {
        VisitStep::Descend
    }

    fn on_visit_hour(&mut self, _hour: &CalendarPeriod, _context: &mut Self::Context) -> VisitStep {
        VisitStep::Descend
    }

    /// `test` lies within the limits (closed containment).
    fn check_limits(&self, test: &dyn TimePeriod) -> bool {
        self.limits().has_inside(test)
    }

    /// No exclusion period overlaps `test`.
    fn check_exclude_periods(&self, test: &dyn TimePeriod) -> bool {
        !self.filter().exclude_periods().has_overlap_period(test)
    }

    fn is_matching_year(&self, year: &CalendarPeriod) -> bool {
        self.filter().matches_year(year.year_value()) && self.check_exclude_periods(year)
    }

    fn is_matching_month(&self, month: &CalendarPeriod) -> bool {
        let filter = self.filter();
        filter.matches_year(month.year_value())
            && filter.matches_month(month.month_value())
            && self.check_exclude_periods(month)
    }

    fn is_matching_day(&self, day: &CalendarPeriod) -> bool {
        let filter = self.filter();
        filter.matches_year(day.year_value())
            && filter.matches_month(day.month_value())
            && filter.matches_day(day.day_value())
            && filter.matches_weekday(day.weekday())
            && self.check_exclude_periods(day)
    }

    fn is_matching_hour(&self, hour: &CalendarPeriod) -> bool {
        let filter = self.filter();
        filter.matches_year(hour.year_value())
            && filter.matches_month(hour.month_value())
            && filter.matches_day(hour.day_value())
            && filter.matches_weekday(hour.weekday())
            && filter.matches_hour(hour.hour_value())
            && self.check_exclude_periods(hour)
    }
}

/// Presents `periods` in the order `direction` asks for. `periods` must be
/// chronological.
#[inline]
pub(crate) fn ordered<T>(mut periods: Vec<T>, direction: SeekDirection) -> Vec<T> {
    if direction == SeekDirection::Backward {
        periods.reverse();
    }
    periods
}

fn visit_hook<V>(visitor: &mut V, node: &CalendarPeriod, context: &mut V::Context) -> VisitStep
where
    V: CalendarVisitor + ?Sized,
{
    match node.unit() {
        CalendarUnit::Year => visitor.on_visit_year(node, context),
        CalendarUnit::Month => visitor.on_visit_month(node, context),
        CalendarUnit::Day => visitor.on_visit_day(node, context),
        CalendarUnit::Hour => visitor.on_visit_hour(node, context),
    }
}

fn enter_hook<V>(visitor: &mut V, node: &CalendarPeriod, context: &mut V::Context) -> bool
where
    V: CalendarVisitor + ?Sized,
{
    match node.unit() {
        CalendarUnit::Year => visitor.enter_months(node, context),
        CalendarUnit::Month => visitor.enter_days(node, context),
        CalendarUnit::Day => visitor.enter_hours(node, context),
        CalendarUnit::Hour => false,
    }
}

fn visit_node<V>(
    visitor: &mut V,
    node: &CalendarPeriod,
    period: &dyn TimePeriod,
    context: &mut V::Context,
) -> ControlFlow<()>
where
    V: CalendarVisitor + ?Sized,
{
    if !node.overlaps_with(period) {
        return ControlFlow::Continue(());
    }
    trace!(
        "event=visit_node module=visitor unit={} start={}",
        node.unit(),
        node.first_moment()
    );
    match visit_hook(visitor, node, context) {
        VisitStep::Stop => return ControlFlow::Break(()),
        VisitStep::Skip => return ControlFlow::Continue(()),
        VisitStep::Descend => {}
    }
    if enter_hook(visitor, node, context) {
        for child in ordered(node.children(), visitor.seek_direction()) {
            visit_node(visitor, &child, period, context)?;
        }
    }
    ControlFlow::Continue(())
}

fn visit_years<V>(
    visitor: &mut V,
    years: &CalendarPeriod,
    period: &dyn TimePeriod,
    context: &mut V::Context,
) -> ControlFlow<()>
where
    V: CalendarVisitor + ?Sized,
{
    match visitor.on_visit_years(years, context) {
        VisitStep::Stop => return ControlFlow::Break(()),
        VisitStep::Skip => return ControlFlow::Continue(()),
        VisitStep::Descend => {}
    }
    if visitor.enter_years(years, context) {
        for year in ordered(years.units(), visitor.seek_direction()) {
            visit_node(visitor, &year, period, context)?;
        }
    }
    ControlFlow::Continue(())
}

/// Walks the hierarchy covering `period`.
///
/// The years node spans every calendar year touched by `period`. A moment
/// period is not visited at all.
///
/// # Errors
///
/// Returns `CalendarError::DateOutOfRange` when the years covering `period`
/// cannot be represented, which is the case for unbounded periods.
pub fn start_period_visit<V>(
    visitor: &mut V,
    period: &dyn TimePeriod,
    context: &mut V::Context,
) -> Result<(), CalendarError>
where
    V: CalendarVisitor + ?Sized,
{
    if period.is_moment() {
        return Ok(());
    }
    let calendar = *visitor.calendar();
    let first_year = calendar.base_year_of(period.start());
    let last_year = calendar.base_year_of(period.end());
    let count = u32::try_from(last_year - first_year + 1).map_err(|_| CalendarError::EmptyPeriod)?;
    let years = CalendarPeriod::years(first_year, count, calendar)?;

    trace!(
        "event=period_visit_start module=visitor first_year={} years={} direction={:?}",
        first_year,
        count,
        visitor.seek_direction()
    );
    visitor.on_visit_start(context);
    let flow = visit_years(visitor, &years, period, context);
    visitor.on_visit_end(context);
    trace!(
        "event=period_visit_end module=visitor stopped={}",
        flow.is_break()
    );
    Ok(())
}

fn visit_units<V>(
    visitor: &mut V,
    start: CalendarPeriod,
    context: &mut V::Context,
    direction: SeekDirection,
) -> Option<CalendarPeriod>
where
    V: CalendarVisitor + ?Sized,
{
    visitor.on_visit_start(context);
    let mut cursor = Some(start);
    let mut stopped_at = None;
    while let Some(current) = cursor {
        if visit_hook(visitor, &current, context) == VisitStep::Stop {
            stopped_at = Some(current);
            break;
        }
        cursor = match direction {
            SeekDirection::Forward => current.next(),
            SeekDirection::Backward => current.previous(),
        };
    }
    visitor.on_visit_end(context);
    trace!(
        "event=unit_visit_end module=visitor unit={} found={}",
        start.unit(),
        stopped_at.is_some()
    );
    stopped_at
}

fn start_unit_visit<V>(
    visitor: &mut V,
    start: &CalendarPeriod,
    expected: CalendarUnit,
    context: &mut V::Context,
    direction: SeekDirection,
) -> Result<Option<CalendarPeriod>, CalendarError>
where
    V: CalendarVisitor + ?Sized,
{
    if start.unit() != expected {
        return Err(CalendarError::UnexpectedUnit {
            expected,
            found: start.unit(),
        });
    }
    Ok(visit_units(visitor, *start, context, direction))
}

/// Presents `year` and its neighbors in `direction` to `on_visit_year`.
/// Returns the year at which the hook stopped, `None` when the date range
/// ran out first.
pub fn start_year_visit<V>(
    visitor: &mut V,
    year: &CalendarPeriod,
    context: &mut V::Context,
    direction: SeekDirection,
) -> Result<Option<CalendarPeriod>, CalendarError>
where
    V: CalendarVisitor + ?Sized,
{
    start_unit_visit(visitor, year, CalendarUnit::Year, context, direction)
}

/// Month counterpart of [`start_year_visit`].
pub fn start_month_visit<V>(
    visitor: &mut V,
    month: &CalendarPeriod,
    context: &mut V::Context,
    direction: SeekDirection,
) -> Result<Option<CalendarPeriod>, CalendarError>
where
    V: CalendarVisitor + ?Sized,
{
    start_unit_visit(visitor, month, CalendarUnit::Month, context, direction)
}

/// Day counterpart of [`start_year_visit`].
pub fn start_day_visit<V>(
    visitor: &mut V,
    day: &CalendarPeriod,
    context: &mut V::Context,
    direction: SeekDirection,
) -> Result<Option<CalendarPeriod>, CalendarError>
where
    V: CalendarVisitor + ?Sized,
{
    start_unit_visit(visitor, day, CalendarUnit::Day, context, direction)
}

/// Hour counterpart of [`start_year_visit`].
pub fn start_hour_visit<V>(
    visitor: &mut V,
    hour: &CalendarPeriod,
    context: &mut V::Context,
    direction: SeekDirection,
) -> Result<Option<CalendarPeriod>, CalendarError>
where
    V: CalendarVisitor + ?Sized,
{
    start_unit_visit(visitor, hour, CalendarUnit::Hour, context, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use timeperiod_core::moment::Moment;

    fn at(y: i32, m: u32, d: u32) -> Moment {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// Records every presented node as `(unit, raw start)`.
    struct Recorder {
        filter: CalendarVisitorFilter,
        limits: TimeRange,
        direction: SeekDirection,
        calendar: TimeCalendar,
        enter_days: bool,
        skip_month: Option<u32>,
        stop_on_weekday: Option<Weekday>,
    }

    impl Recorder {
        fn new(limits: TimeRange) -> Self {
            Self {
                filter: CalendarVisitorFilter::new(),
                limits,
                direction: SeekDirection::Forward,
                calendar: TimeCalendar::default(),
                enter_days: false,
                skip_month: None,
                stop_on_weekday: None,
            }
        }
    }

    impl CalendarVisitor for Recorder {
        type Context = Vec<(CalendarUnit, Moment)>;

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

        fn enter_days(&mut self, _month: &CalendarPeriod, _context: &mut Self::Context) -> bool {
            self.enter_days
        }

        fn on_visit_year(
            &mut self,
            year: &CalendarPeriod,
            context: &mut Self::Context,
        ) -> VisitStep {
            context.push((CalendarUnit::Year, year.first_moment()));
            VisitStep::Descend
        }

        fn on_visit_month(
            &mut self,
            month: &CalendarPeriod,
            context: &mut Self::Context,
        ) -> VisitStep {
            context.push((CalendarUnit::Month, month.first_moment()));
            if self.skip_month == Some(month.month_value()) {
                VisitStep::Skip
            } else {
                VisitStep::Descend
            }
        }

        fn on_visit_day(&mut self, day: &CalendarPeriod, context: &mut Self::Context) -> VisitStep {
            context.push((CalendarUnit::Day, day.first_moment()));
            if self.stop_on_weekday == Some(day.weekday()) {
                VisitStep::Stop
            } else {
                VisitStep::Skip
            }
        }
    }

    fn months_of(visits: &[(CalendarUnit, Moment)]) -> Vec<Moment> {
        visits
            .iter()
            .filter(|(unit, _)| *unit == CalendarUnit::Month)
            .map(|(_, start)| *start)
            .collect()
    }

    #[test]
    fn test_forward_visit_presents_overlapping_children_in_order() {
        let limits = TimeRange::new(at(2011, 3, 15), at(2011, 5, 10));
        let mut visitor = Recorder::new(limits);
        let mut visits = Vec::new();
        start_period_visit(&mut visitor, &limits, &mut visits).unwrap();

        assert_eq!(visits[0], (CalendarUnit::Year, at(2011, 1, 1)));
        assert_eq!(
            months_of(&visits),
            vec![at(2011, 3, 1), at(2011, 4, 1), at(2011, 5, 1)]
        );
    }

    #[test]
    fn test_backward_visit_reverses_siblings() {
        let limits = TimeRange::new(at(2010, 11, 1), at(2011, 2, 1));
        let mut visitor = Recorder::new(limits);
        visitor.direction = SeekDirection::Backward;
        let mut visits = Vec::new();
        start_period_visit(&mut visitor, &limits, &mut visits).unwrap();

        assert_eq!(visits[0], (CalendarUnit::Year, at(2011, 1, 1)));
        assert_eq!(
            months_of(&visits),
            vec![at(2011, 1, 1), at(2010, 12, 1), at(2010, 11, 1)]
        );
    }

    #[test]
    fn test_skip_prevents_descending_only_for_that_node() {
        let limits = TimeRange::new(at(2011, 1, 30), at(2011, 2, 3));
        let mut visitor = Recorder::new(limits);
        visitor.enter_days = true;
        visitor.skip_month = Some(1);
        let mut visits = Vec::new();
        start_period_visit(&mut visitor, &limits, &mut visits).unwrap();

        let days: Vec<_> = visits
            .iter()
            .filter(|(unit, _)| *unit == CalendarUnit::Day)
            .map(|(_, start)| *start)
            .collect();
        assert_eq!(days, vec![at(2011, 2, 1), at(2011, 2, 2)]);
    }

    #[test]
    fn test_stop_aborts_traversal() {
        let limits = TimeRange::new(at(2011, 1, 1), at(2012, 1, 1));
        let mut visitor = Recorder::new(limits);
        visitor.enter_days = true;
        // 2011-01-02 is the first Sunday.
        visitor.stop_on_weekday = Some(Weekday::Sun);
        let mut visits = Vec::new();
        start_period_visit(&mut visitor, &limits, &mut visits).unwrap();

        assert_eq!(visits.last(), Some(&(CalendarUnit::Day, at(2011, 1, 2))));
        assert_eq!(months_of(&visits), vec![at(2011, 1, 1)]);
    }

    #[test]
    fn test_moment_period_is_not_visited() {
        let limits = TimeRange::moment(at(2011, 1, 1));
        let mut visitor = Recorder::new(limits);
        let mut visits = Vec::new();
        start_period_visit(&mut visitor, &limits, &mut visits).unwrap();
        assert!(visits.is_empty());
    }

    #[test]
    fn test_unbounded_period_cannot_be_walked() {
        let limits = TimeRange::anytime();
        let mut visitor = Recorder::new(limits);
        let mut visits = Vec::new();
        assert!(start_period_visit(&mut visitor, &limits, &mut visits).is_err());
    }

    #[test]
    fn test_day_visit_walks_sideways() {
        let mut visitor = Recorder::new(TimeRange::anytime());
        visitor.stop_on_weekday = Some(Weekday::Sun);
        let start = CalendarPeriod::day(2011, 1, 5, TimeCalendar::default()).unwrap();

        let mut visits = Vec::new();
        let found = start_day_visit(&mut visitor, &start, &mut visits, SeekDirection::Forward)
            .unwrap()
            .unwrap();
        assert_eq!(found.first_moment(), at(2011, 1, 9));
        assert_eq!(visits.len(), 5);

        let mut visits = Vec::new();
        let found = start_day_visit(&mut visitor, &start, &mut visits, SeekDirection::Backward)
            .unwrap()
            .unwrap();
        assert_eq!(found.first_moment(), at(2011, 1, 2));
    }

    #[test]
    fn test_unit_visit_rejects_other_units() {
        let mut visitor = Recorder::new(TimeRange::anytime());
        let month = CalendarPeriod::month(2011, 1, TimeCalendar::default()).unwrap();
        let mut visits = Vec::new();
        assert_eq!(
            start_day_visit(&mut visitor, &month, &mut visits, SeekDirection::Forward),
            Err(CalendarError::UnexpectedUnit {
                expected: CalendarUnit::Day,
                found: CalendarUnit::Month,
            })
        );
    }

    #[test]
    fn test_provided_matching_honors_filter_and_exclusions() {
        let mut visitor = Recorder::new(TimeRange::anytime());
        visitor.filter.add_working_weekdays();
        visitor
            .filter
            .add_exclude_period(&TimeRange::new(at(2011, 1, 4), at(2011, 1, 5)));
        let calendar = TimeCalendar::default();
        let day = |d| CalendarPeriod::day(2011, 1, d, calendar).unwrap();

        assert!(visitor.is_matching_day(&day(3)));
        assert!(!visitor.is_matching_day(&day(4)));
        assert!(visitor.is_matching_day(&day(5)));
        // Saturday.
        assert!(!visitor.is_matching_day(&day(8)));
        assert!(visitor.check_limits(&day(8)));
        assert!(!visitor.is_matching_month(&CalendarPeriod::month(2011, 1, calendar).unwrap()));
    }
}
