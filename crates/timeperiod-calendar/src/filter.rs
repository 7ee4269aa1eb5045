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

//! # Calendar Filters
//!
//! `CalendarVisitorFilter` restricts which calendar units a visitor accepts.
//! Every dimension (years, months, days of month, weekdays, hours) is a set;
//! an empty set accepts every value. Exclusion periods reject any unit they
//! overlap.
//!
//! `CalendarPeriodCollectorFilter` extends the base filter with collecting
//! ranges that tell the collector what to emit below the current level:
//! month ranges inside a year, day ranges inside a month and hour ranges
//! (optionally per weekday) inside a day.

use crate::{
    error::CalendarError,
    range::{DayHourRange, DayRange, HourRange, MonthRange},
};
use chrono::Weekday;
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;
use timeperiod_core::period::{TimePeriod, TimeRange};
use timeperiod_timeline::collection::TimePeriodCollection;

const WORKING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

const WEEKEND_DAYS: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

#[inline]
fn weekday_bit(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// Filter applied by calendar visitors.
///
/// # Examples
///
/// ```rust
/// use chrono::Weekday;
/// use timeperiod_calendar::filter::CalendarVisitorFilter;
///
/// let mut filter = CalendarVisitorFilter::new();
/// filter.add_working_weekdays();
/// filter.add_month(1).unwrap();
///
/// assert!(filter.matches_weekday(Weekday::Fri));
/// assert!(!filter.matches_weekday(Weekday::Sun));
/// assert!(filter.matches_month(1));
/// assert!(!filter.matches_month(2));
/// // Unrestricted dimensions accept everything.
/// assert!(filter.matches_year(1999));
/// ```
#[derive(Clone, Debug)]
pub struct CalendarVisitorFilter {
    exclude_periods: TimePeriodCollection<TimeRange>,
    years: FxHashSet<i32>,
    months: FixedBitSet,
    days: FixedBitSet,
    weekdays: FixedBitSet,
    hours: FixedBitSet,
}

impl Default for CalendarVisitorFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarVisitorFilter {
    pub fn new() -> Self {
        Self {
            exclude_periods: TimePeriodCollection::new(),
            years: FxHashSet::default(),
            months: FixedBitSet::with_capacity(13),
            days: FixedBitSet::with_capacity(32),
            weekdays: FixedBitSet::with_capacity(7),
            hours: FixedBitSet::with_capacity(24),
        }
    }

    #[inline]
    pub fn exclude_periods(&self) -> &TimePeriodCollection<TimeRange> {
        &self.exclude_periods
    }

    /// Excludes every calendar unit overlapping `period`.
    #[inline]
    pub fn add_exclude_period(&mut self, period: &dyn TimePeriod) {
        self.exclude_periods.push(period.to_range());
    }

    #[inline]
    pub fn add_year(&mut self, year: i32) {
        self.years.insert(year);
    }

    pub fn add_month(&mut self, month: u32) -> Result<(), CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::MonthOutOfRange { month });
        }
        self.months.insert(month as usize);
        Ok(())
    }

    /// Adds a day of the month (1..=31).
    pub fn add_day(&mut self, day: u32) -> Result<(), CalendarError> {
        if !(1..=31).contains(&day) {
            return Err(CalendarError::DayOfMonthOutOfRange { day });
        }
        self.days.insert(day as usize);
        Ok(())
    }

    #[inline]
    pub fn add_weekday(&mut self, weekday: Weekday) {
        self.weekdays.insert(weekday_bit(weekday));
    }

    /// Adds Monday through Friday.
    pub fn add_working_weekdays(&mut self) {
        for weekday in WORKING_DAYS {
            self.add_weekday(weekday);
        }
    }

    /// Adds Saturday and Sunday.
    pub fn add_weekend_weekdays(&mut self) {
        for weekday in WEEKEND_DAYS {
            self.add_weekday(weekday);
        }
    }

    /// Adds an hour of the day (0..=23).
    pub fn add_hour(&mut self, hour: u32) -> Result<(), CalendarError> {
        if hour > 23 {
            return Err(CalendarError::HourOutOfRange { hour });
        }
        self.hours.insert(hour as usize);
        Ok(())
    }

    /// Removes every restriction, exclusion periods included.
    pub fn clear(&mut self) {
        self.exclude_periods.clear();
        self.years.clear();
        self.months.clear();
        self.days.clear();
        self.weekdays.clear();
        self.hours.clear();
    }

    #[inline]
    pub fn has_year_filter(&self) -> bool {
        !self.years.is_empty()
    }

    #[inline]
    pub fn has_month_filter(&self) -> bool {
        self.months.count_ones(..) > 0
    }

    #[inline]
    pub fn has_day_filter(&self) -> bool {
        self.days.count_ones(..) > 0
    }

    #[inline]
    pub fn has_weekday_filter(&self) -> bool {
        self.weekdays.count_ones(..) > 0
    }

    #[inline]
    pub fn has_hour_filter(&self) -> bool {
        self.hours.count_ones(..) > 0
    }

    #[inline]
    pub fn matches_year(&self, year: i32) -> bool {
        !self.has_year_filter() || self.years.contains(&year)
    }

    #[inline]
    pub fn matches_month(&self, month: u32) -> bool {
        !self.has_month_filter() || self.months.contains(month as usize)
    }

    #[inline]
    pub fn matches_day(&self, day: u32) -> bool {
        !self.has_day_filter() || self.days.contains(day as usize)
    }

    #[inline]
    pub fn matches_weekday(&self, weekday: Weekday) -> bool {
        !self.has_weekday_filter() || self.weekdays.contains(weekday_bit(weekday))
    }

    #[inline]
    pub fn matches_hour(&self, hour: u32) -> bool {
        !self.has_hour_filter() || self.hours.contains(hour as usize)
    }

    /// Years in the filter, in ascending order.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.years.iter().copied().collect();
        years.sort_unstable();
        years
    }

    pub fn months(&self) -> impl Iterator<Item = u32> + '_ {
        self.months.ones().map(|bit| bit as u32)
    }

    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.days.ones().map(|bit| bit as u32)
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> + '_ {
        self.hours.ones().map(|bit| bit as u32)
    }
}

/// Visitor filter plus the ranges a `CalendarPeriodCollector` emits.
#[derive(Clone, Debug, Default)]
pub struct CalendarPeriodCollectorFilter {
    base: CalendarVisitorFilter,
    collecting_months: Vec<MonthRange>,
    collecting_days: Vec<DayRange>,
    collecting_hours: Vec<HourRange>,
    collecting_day_hours: Vec<DayHourRange>,
}

impl CalendarPeriodCollectorFilter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn visitor_filter(&self) -> &CalendarVisitorFilter {
        &self.base
    }

    #[inline]
    pub fn visitor_filter_mut(&mut self) -> &mut CalendarVisitorFilter {
        &mut self.base
    }

    #[inline]
    pub fn collecting_months(&self) -> &[MonthRange] {
        &self.collecting_months
    }

    #[inline]
    pub fn collecting_days(&self) -> &[DayRange] {
        &self.collecting_days
    }

    #[inline]
    pub fn collecting_hours(&self) -> &[HourRange] {
        &self.collecting_hours
    }

    #[inline]
    pub fn collecting_day_hours(&self) -> &[DayHourRange] {
        &self.collecting_day_hours
    }

    #[inline]
    pub fn add_collecting_months(&mut self, range: MonthRange) {
        self.collecting_months.push(range);
    }

    #[inline]
    pub fn add_collecting_days(&mut self, range: DayRange) {
        self.collecting_days.push(range);
    }

    #[inline]
    pub fn add_collecting_hours(&mut self, range: HourRange) {
        self.collecting_hours.push(range);
    }

    #[inline]
    pub fn add_collecting_day_hours(&mut self, range: DayHourRange) {
        self.collecting_day_hours.push(range);
    }

    /// Clears the base filter and every collecting range.
    pub fn clear(&mut self) {
        self.base.clear();
        self.collecting_months.clear();
        self.collecting_days.clear();
        self.collecting_hours.clear();
        self.collecting_day_hours.clear();
    }
}

impl From<CalendarVisitorFilter> for CalendarPeriodCollectorFilter {
    fn from(base: CalendarVisitorFilter) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

impl AsRef<CalendarVisitorFilter> for CalendarPeriodCollectorFilter {
    fn as_ref(&self) -> &CalendarVisitorFilter {
        &self.base
    }
}
