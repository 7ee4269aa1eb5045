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

//! Calendar periods.
//!
//! A `CalendarPeriod` is a run of `count` consecutive whole units (years,
//! months, days or hours) of a `TimeCalendar`. It stores the raw, unshifted
//! boundaries and exposes the calendar-shifted ones through `TimePeriod`.
//! Calendar periods are read-only; navigation produces new values.

use crate::{calendar::TimeCalendar, error::CalendarError};
use chrono::{Datelike, Days, Months, NaiveDate, TimeDelta, Timelike, Weekday};
use timeperiod_core::{
    moment::Moment,
    period::{PeriodMapper, TimePeriod},
};

/// Granularity of a `CalendarPeriod`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CalendarUnit {
    Year,
    Month,
    Day,
    Hour,
}

impl CalendarUnit {
    /// The next finer unit, `None` for hours.
    #[inline]
    pub const fn finer(self) -> Option<Self> {
        match self {
            Self::Year => Some(Self::Month),
            Self::Month => Some(Self::Day),
            Self::Day => Some(Self::Hour),
            Self::Hour => None,
        }
    }
}

impl std::fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year => write!(f, "year"),
            Self::Month => write!(f, "month"),
            Self::Day => write!(f, "day"),
            Self::Hour => write!(f, "hour"),
        }
    }
}

/// Moves `moment` by `count` units; `None` when the result is not
/// representable.
fn advance(moment: Moment, unit: CalendarUnit, count: i64) -> Option<Moment> {
    let magnitude = u32::try_from(count.unsigned_abs()).ok()?;
    let shift_months = |months: u32| {
        if count >= 0 {
            moment.checked_add_months(Months::new(months))
        } else {
            moment.checked_sub_months(Months::new(months))
        }
    };
    match unit {
        CalendarUnit::Year => shift_months(magnitude.checked_mul(12)?),
        CalendarUnit::Month => shift_months(magnitude),
        CalendarUnit::Day => {
            let days = Days::new(u64::from(magnitude));
            if count >= 0 {
                moment.checked_add_days(days)
            } else {
                moment.checked_sub_days(days)
            }
        }
        CalendarUnit::Hour => moment.checked_add_signed(TimeDelta::try_hours(count)?),
    }
}

fn midnight(year: i32, month: u32, day: u32) -> Result<Moment, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or(CalendarError::DayOutOfRange { year, month, day })
}

fn check_month(month: u32) -> Result<(), CalendarError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CalendarError::MonthOutOfRange { month })
    }
}

fn check_hour(hour: u32) -> Result<(), CalendarError> {
    if hour < 24 {
        Ok(())
    } else {
        Err(CalendarError::HourOutOfRange { hour })
    }
}

/// A run of whole calendar units.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use timeperiod_calendar::{
///     calendar::TimeCalendar,
///     period::{CalendarPeriod, CalendarUnit},
/// };
/// use timeperiod_core::period::TimePeriod;
///
/// let calendar = TimeCalendar::default();
/// let feb = CalendarPeriod::month(2012, 2, calendar).unwrap();
/// assert_eq!(feb.children().len(), 29);
///
/// let next = feb.next().unwrap();
/// assert_eq!(next.unit(), CalendarUnit::Month);
/// assert_eq!(next.month_value(), 3);
/// assert_eq!(feb.end(), next.start());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CalendarPeriod {
    unit: CalendarUnit,
    first: Moment,
    last: Moment,
    count: u32,
    calendar: TimeCalendar,
}

impl CalendarPeriod {
    fn from_parts(
        unit: CalendarUnit,
        first: Moment,
        count: u32,
        calendar: TimeCalendar,
    ) -> Option<Self> {
        let last = advance(first, unit, i64::from(count))?;
        Some(Self {
            unit,
            first,
            last,
            count,
            calendar,
        })
    }

    fn build(
        unit: CalendarUnit,
        first: Moment,
        count: u32,
        calendar: TimeCalendar,
    ) -> Result<Self, CalendarError> {
        if count == 0 {
            return Err(CalendarError::EmptyPeriod);
        }
        Self::from_parts(unit, first, count, calendar).ok_or(CalendarError::DateOutOfRange {
            year: first.year(),
        })
    }

    /// The year `year` of `calendar`, starting at its base month.
    #[inline]
    pub fn year(year: i32, calendar: TimeCalendar) -> Result<Self, CalendarError> {
        Self::years(year, 1, calendar)
    }

    pub fn years(year: i32, count: u32, calendar: TimeCalendar) -> Result<Self, CalendarError> {
        let first = midnight(year, calendar.year_base_month(), 1)
            .map_err(|_| CalendarError::DateOutOfRange { year })?;
        Self::build(CalendarUnit::Year, first, count, calendar)
    }

    /// The calendar month `month` (1..=12) of calendar year `year`.
    #[inline]
    pub fn month(year: i32, month: u32, calendar: TimeCalendar) -> Result<Self, CalendarError> {
        Self::months(year, month, 1, calendar)
    }

    pub fn months(
        year: i32,
        month: u32,
        count: u32,
        calendar: TimeCalendar,
    ) -> Result<Self, CalendarError> {
        check_month(month)?;
        let first = midnight(year, month, 1).map_err(|_| CalendarError::DateOutOfRange { year })?;
        Self::build(CalendarUnit::Month, first, count, calendar)
    }

    #[inline]
    pub fn day(
        year: i32,
        month: u32,
        day: u32,
        calendar: TimeCalendar,
    ) -> Result<Self, CalendarError> {
        Self::days(year, month, day, 1, calendar)
    }

    pub fn days(
        year: i32,
        month: u32,
        day: u32,
        count: u32,
        calendar: TimeCalendar,
    ) -> Result<Self, CalendarError> {
        check_month(month)?;
        let first = midnight(year, month, day)?;
        Self::build(CalendarUnit::Day, first, count, calendar)
    }

    #[inline]
    pub fn hour(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        calendar: TimeCalendar,
    ) -> Result<Self, CalendarError> {
        Self::hours(year, month, day, hour, 1, calendar)
    }

    pub fn hours(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        count: u32,
        calendar: TimeCalendar,
    ) -> Result<Self, CalendarError> {
        check_month(month)?;
        check_hour(hour)?;
        let first = midnight(year, month, day)?
            .checked_add_signed(TimeDelta::hours(i64::from(hour)))
            .ok_or(CalendarError::DateOutOfRange { year })?;
        Self::build(CalendarUnit::Hour, first, count, calendar)
    }

    /// The single `unit` of `calendar` containing the raw `moment`.
    pub fn containing(
        unit: CalendarUnit,
        moment: Moment,
        calendar: TimeCalendar,
    ) -> Result<Self, CalendarError> {
        match unit {
            CalendarUnit::Year => Self::year(calendar.base_year_of(moment), calendar),
            CalendarUnit::Month => Self::month(moment.year(), moment.month(), calendar),
            CalendarUnit::Day => Self::day(moment.year(), moment.month(), moment.day(), calendar),
            CalendarUnit::Hour => Self::hour(
                moment.year(),
                moment.month(),
                moment.day(),
                moment.hour(),
                calendar,
            ),
        }
    }

    #[inline]
    pub fn unit(&self) -> CalendarUnit {
        self.unit
    }

    /// Number of units covered.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn calendar(&self) -> &TimeCalendar {
        &self.calendar
    }

    /// Raw start of the first unit, before the calendar offsets apply.
    #[inline]
    pub fn first_moment(&self) -> Moment {
        self.first
    }

    /// Raw end of the last unit, before the calendar offsets apply.
    #[inline]
    pub fn last_moment(&self) -> Moment {
        self.last
    }

    /// Calendar year of the first unit. For a year period this is the year
    /// number under the calendar's base month.
    #[inline]
    pub fn year_value(&self) -> i32 {
        self.first.year()
    }

    #[inline]
    pub fn month_value(&self) -> u32 {
        self.first.month()
    }

    #[inline]
    pub fn day_value(&self) -> u32 {
        self.first.day()
    }

    #[inline]
    pub fn hour_value(&self) -> u32 {
        self.first.hour()
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.first.weekday()
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.first.date()
    }

    /// The adjacent period of the same unit and count that follows this one.
    #[inline]
    pub fn next(&self) -> Option<Self> {
        Self::from_parts(self.unit, self.last, self.count, self.calendar)
    }

    /// The adjacent period of the same unit and count that precedes this one.
    #[inline]
    pub fn previous(&self) -> Option<Self> {
        let first = advance(self.first, self.unit, -i64::from(self.count))?;
        Self::from_parts(self.unit, first, self.count, self.calendar)
    }

    /// The single units making up this period, in chronological order.
    pub fn units(&self) -> Vec<Self> {
        self.split_into(self.unit)
    }

    /// The single units of the next finer granularity covering this period,
    /// in chronological order. Empty for hours.
    pub fn children(&self) -> Vec<Self> {
        match self.unit.finer() {
            Some(unit) => self.split_into(unit),
            None => Vec::new(),
        }
    }

    fn split_into(&self, unit: CalendarUnit) -> Vec<Self> {
        let mut parts = Vec::new();
        let mut cursor = Self::from_parts(unit, self.first, 1, self.calendar);
        while let Some(part) = cursor {
            if part.first >= self.last {
                break;
            }
            parts.push(part);
            cursor = part.next();
        }
        parts
    }
}

impl TimePeriod for CalendarPeriod {
    #[inline]
    fn start(&self) -> Moment {
        self.calendar.map_start(self.first)
    }

    #[inline]
    fn end(&self) -> Moment {
        self.calendar.map_end(self.last)
    }
}

impl std::fmt::Display for CalendarPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} x{} [{}, {})",
            self.unit,
            self.count,
            self.start(),
            self.end()
        )
    }
}
