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

//! Calendar conventions.
//!
//! A `TimeCalendar` decides where a year starts (`year_base_month`), which
//! weekday opens a week and how the bounds of calendar periods are shifted
//! when they are exposed as `TimePeriod`s. The offsets are applied through
//! the `PeriodMapper` implementation: `start_offset` is added to every start
//! and `end_offset` to every end. A common choice is an end offset of one
//! nanosecond back, which makes consecutive calendar periods disjoint even
//! under closed comparisons. The default calendar uses zero offsets.

use crate::error::CalendarError;
use chrono::{Datelike, Days, Months, NaiveDate, TimeDelta, Timelike, Weekday};
use timeperiod_core::{
    moment::{Moment, saturating_add},
    period::PeriodMapper,
};

/// Calendar conventions shared by every `CalendarPeriod` built on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeCalendar {
    year_base_month: u32,
    first_day_of_week: Weekday,
    start_offset: TimeDelta,
    end_offset: TimeDelta,
}

impl Default for TimeCalendar {
    fn default() -> Self {
        Self {
            year_base_month: 1,
            first_day_of_week: Weekday::Mon,
            start_offset: TimeDelta::zero(),
            end_offset: TimeDelta::zero(),
        }
    }
}

impl TimeCalendar {
    /// Creates a builder starting from the default conventions.
    #[inline]
    pub fn builder() -> TimeCalendarBuilder {
        TimeCalendarBuilder::default()
    }

    /// The calendar month (1..=12) in which a year of this calendar starts.
    #[inline]
    pub fn year_base_month(&self) -> u32 {
        self.year_base_month
    }

    #[inline]
    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    #[inline]
    pub fn start_offset(&self) -> TimeDelta {
        self.start_offset
    }

    #[inline]
    pub fn end_offset(&self) -> TimeDelta {
        self.end_offset
    }

    /// Calendar year of `moment`.
    #[inline]
    pub fn year_of(&self, moment: Moment) -> i32 {
        moment.year()
    }

    /// Calendar month (1..=12) of `moment`.
    #[inline]
    pub fn month_of(&self, moment: Moment) -> u32 {
        moment.month()
    }

    #[inline]
    pub fn day_of_month(&self, moment: Moment) -> u32 {
        moment.day()
    }

    #[inline]
    pub fn hour_of(&self, moment: Moment) -> u32 {
        moment.hour()
    }

    #[inline]
    pub fn day_of_week(&self, moment: Moment) -> Weekday {
        moment.weekday()
    }

    /// The year of this calendar containing `moment`.
    ///
    /// With a base month other than January, a year `Y` runs from the base
    /// month of `Y` up to the base month of `Y + 1`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use timeperiod_calendar::calendar::TimeCalendar;
    ///
    /// let fiscal = TimeCalendar::builder().year_base_month(10).build().unwrap();
    /// let sep = NaiveDate::from_ymd_opt(2011, 9, 30).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let oct = NaiveDate::from_ymd_opt(2011, 10, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// assert_eq!(fiscal.base_year_of(sep), 2010);
    /// assert_eq!(fiscal.base_year_of(oct), 2011);
    /// ```
    #[inline]
    pub fn base_year_of(&self, moment: Moment) -> i32 {
        if moment.month() >= self.year_base_month {
            moment.year()
        } else {
            moment.year() - 1
        }
    }

    /// Number of days of the given calendar month.
    pub fn days_in_month(&self, year: i32, month: u32) -> Result<u32, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::MonthOutOfRange { month });
        }
        let first =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::DateOutOfRange { year })?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or(CalendarError::DateOutOfRange { year })?;
        Ok((next - first).num_days() as u32)
    }

    /// The first day of the week containing `date`, honoring
    /// `first_day_of_week`.
    pub fn week_start_of(&self, date: NaiveDate) -> Option<NaiveDate> {
        let back = (date.weekday().num_days_from_monday() + 7
            - self.first_day_of_week.num_days_from_monday())
            % 7;
        date.checked_sub_days(Days::new(u64::from(back)))
    }
}

impl PeriodMapper for TimeCalendar {
    #[inline]
    fn map_start(&self, moment: Moment) -> Moment {
        saturating_add(moment, self.start_offset)
    }

    #[inline]
    fn map_end(&self, moment: Moment) -> Moment {
        saturating_add(moment, self.end_offset)
    }

    #[inline]
    fn unmap_start(&self, moment: Moment) -> Moment {
        saturating_add(moment, -self.start_offset)
    }

    #[inline]
    fn unmap_end(&self, moment: Moment) -> Moment {
        saturating_add(moment, -self.end_offset)
    }
}

impl std::fmt::Display for TimeCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimeCalendar(base_month: {}, first_day: {}, offsets: {}/{})",
            self.year_base_month, self.first_day_of_week, self.start_offset, self.end_offset
        )
    }
}

/// Validating builder for `TimeCalendar`.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeDelta, Weekday};
/// use timeperiod_calendar::calendar::TimeCalendar;
///
/// let calendar = TimeCalendar::builder()
///     .year_base_month(4)
///     .first_day_of_week(Weekday::Sun)
///     .end_offset(-TimeDelta::nanoseconds(1))
///     .build()
///     .unwrap();
/// assert_eq!(calendar.year_base_month(), 4);
///
/// assert!(TimeCalendar::builder().year_base_month(13).build().is_err());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TimeCalendarBuilder {
    calendar: TimeCalendar,
}

impl Default for TimeCalendarBuilder {
    fn default() -> Self {
        Self {
            calendar: TimeCalendar::default(),
        }
    }
}

impl TimeCalendarBuilder {
    #[inline]
    pub fn year_base_month(mut self, month: u32) -> Self {
        self.calendar.year_base_month = month;
        self
    }

    #[inline]
    pub fn first_day_of_week(mut self, weekday: Weekday) -> Self {
        self.calendar.first_day_of_week = weekday;
        self
    }

    /// Offset added to every start. Must not be negative.
    #[inline]
    pub fn start_offset(mut self, offset: TimeDelta) -> Self {
        self.calendar.start_offset = offset;
        self
    }

    /// Offset added to every end. Must not be positive.
    #[inline]
    pub fn end_offset(mut self, offset: TimeDelta) -> Self {
        self.calendar.end_offset = offset;
        self
    }

    pub fn build(self) -> Result<TimeCalendar, CalendarError> {
        let calendar = self.calendar;
        if !(1..=12).contains(&calendar.year_base_month) {
            return Err(CalendarError::MonthOutOfRange {
                month: calendar.year_base_month,
            });
        }
        if calendar.start_offset < TimeDelta::zero() {
            return Err(CalendarError::InvalidStartOffset {
                offset: calendar.start_offset,
            });
        }
        if calendar.end_offset > TimeDelta::zero() {
            return Err(CalendarError::InvalidEndOffset {
                offset: calendar.end_offset,
            });
        }
        Ok(calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeperiod_core::moment::{MAX_MOMENT, MIN_MOMENT};

    fn at(y: i32, m: u32, d: u32) -> Moment {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_default_calendar() {
        let calendar = TimeCalendar::default();
        assert_eq!(calendar.year_base_month(), 1);
        assert_eq!(calendar.first_day_of_week(), Weekday::Mon);
        assert_eq!(calendar.start_offset(), TimeDelta::zero());
        assert_eq!(calendar.end_offset(), TimeDelta::zero());
        assert_eq!(TimeCalendar::builder().build(), Ok(calendar));
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        assert_eq!(
            TimeCalendar::builder().year_base_month(0).build(),
            Err(CalendarError::MonthOutOfRange { month: 0 })
        );
        assert!(matches!(
            TimeCalendar::builder()
                .start_offset(TimeDelta::seconds(-1))
                .build(),
            Err(CalendarError::InvalidStartOffset { .. })
        ));
        assert!(matches!(
            TimeCalendar::builder().end_offset(TimeDelta::seconds(1)).build(),
            Err(CalendarError::InvalidEndOffset { .. })
        ));
    }

    #[test]
    fn test_base_year_of() {
        let calendar = TimeCalendar::default();
        assert_eq!(calendar.base_year_of(at(2011, 1, 1)), 2011);
        assert_eq!(calendar.base_year_of(at(2011, 12, 31)), 2011);

        let fiscal = TimeCalendar::builder().year_base_month(10).build().unwrap();
        assert_eq!(fiscal.base_year_of(at(2011, 1, 1)), 2010);
        assert_eq!(fiscal.base_year_of(at(2011, 9, 30)), 2010);
        assert_eq!(fiscal.base_year_of(at(2011, 10, 1)), 2011);
    }

    #[test]
    fn test_days_in_month() {
        let calendar = TimeCalendar::default();
        assert_eq!(calendar.days_in_month(2011, 2), Ok(28));
        assert_eq!(calendar.days_in_month(2012, 2), Ok(29));
        assert_eq!(calendar.days_in_month(2012, 4), Ok(30));
        assert_eq!(calendar.days_in_month(2012, 12), Ok(31));
        assert_eq!(
            calendar.days_in_month(2012, 13),
            Err(CalendarError::MonthOutOfRange { month: 13 })
        );
    }

    #[test]
    fn test_week_start_of() {
        let monday = TimeCalendar::default();
        let sunday = TimeCalendar::builder()
            .first_day_of_week(Weekday::Sun)
            .build()
            .unwrap();
        // 2024-01-03 is a Wednesday.
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(
            monday.week_start_of(date),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            sunday.week_start_of(date),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(monday.week_start_of(first), Some(first));
    }

    #[test]
    fn test_mapper_applies_offsets() {
        let tick = TimeDelta::nanoseconds(1);
        let calendar = TimeCalendar::builder()
            .start_offset(tick)
            .end_offset(-tick)
            .build()
            .unwrap();
        let moment = at(2011, 3, 1);
        assert_eq!(calendar.map_start(moment), moment + tick);
        assert_eq!(calendar.map_end(moment), moment - tick);
        assert_eq!(calendar.unmap_start(calendar.map_start(moment)), moment);
        assert_eq!(calendar.unmap_end(calendar.map_end(moment)), moment);
        assert_eq!(calendar.map_end(MAX_MOMENT), MAX_MOMENT);
        assert_eq!(calendar.map_start(MIN_MOMENT), MIN_MOMENT);
    }
}
