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

//! Validated building blocks for calendar filters: a time of day, hour
//! ranges (optionally bound to a weekday) and ranges of days and months.
//! Every constructor rejects out-of-range values instead of clamping.

use crate::error::CalendarError;
use chrono::{NaiveDate, TimeDelta, Weekday};
use timeperiod_core::moment::Moment;

/// A time of day between `00:00` and `24:00` inclusive, with millisecond
/// precision. `24:00` denotes the end of the day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    since_midnight: TimeDelta,
}

impl TimeOfDay {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self {
        since_midnight: TimeDelta::zero(),
    };

    /// Creates a time of day. Hour 24 is only allowed with all other
    /// components zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use timeperiod_calendar::range::TimeOfDay;
    ///
    /// let t = TimeOfDay::new(8, 30, 0, 0).unwrap();
    /// assert_eq!(t.hour(), 8);
    /// assert_eq!(t.minute(), 30);
    /// assert!(TimeOfDay::new(24, 0, 0, 0).unwrap().is_end_of_day());
    /// assert!(TimeOfDay::new(24, 1, 0, 0).is_err());
    /// ```
    pub fn new(
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<Self, CalendarError> {
        if hour > 24 {
            return Err(CalendarError::HourOutOfRange { hour });
        }
        if minute > 59 {
            return Err(CalendarError::MinuteOutOfRange { minute });
        }
        if second > 59 {
            return Err(CalendarError::SecondOutOfRange { second });
        }
        if millisecond > 999 {
            return Err(CalendarError::MillisecondOutOfRange { millisecond });
        }
        if hour == 24 && (minute, second, millisecond) != (0, 0, 0) {
            return Err(CalendarError::HourOutOfRange { hour });
        }
        let since_midnight = TimeDelta::hours(i64::from(hour))
            + TimeDelta::minutes(i64::from(minute))
            + TimeDelta::seconds(i64::from(second))
            + TimeDelta::milliseconds(i64::from(millisecond));
        Ok(Self { since_midnight })
    }

    #[inline]
    pub fn from_hour(hour: u32) -> Result<Self, CalendarError> {
        Self::new(hour, 0, 0, 0)
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        (self.since_midnight.num_hours()) as u32
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        (self.since_midnight.num_minutes() % 60) as u32
    }

    #[inline]
    pub fn second(&self) -> u32 {
        (self.since_midnight.num_seconds() % 60) as u32
    }

    #[inline]
    pub fn millisecond(&self) -> u32 {
        (self.since_midnight.num_milliseconds() % 1000) as u32
    }

    /// Offset from midnight.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.since_midnight
    }

    #[inline]
    pub fn is_end_of_day(&self) -> bool {
        self.since_midnight == TimeDelta::hours(24)
    }

    /// The moment this time of day falls on at `date`. `24:00` yields
    /// midnight of the following day.
    #[inline]
    pub fn to_moment(&self, date: NaiveDate) -> Option<Moment> {
        date.and_hms_opt(0, 0, 0)?
            .checked_add_signed(self.since_midnight)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour(),
            self.minute(),
            self.second(),
            self.millisecond()
        )
    }
}

/// A range of the day from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HourRange {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl HourRange {
    /// Fails when `end` lies before `start`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, CalendarError> {
        if end < start {
            return Err(CalendarError::InvalidHourRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range between two full hours, `end_hour` may be 24.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use timeperiod_calendar::range::HourRange;
    ///
    /// let office = HourRange::from_hours(9, 17).unwrap();
    /// assert_eq!(office.start().hour(), 9);
    /// assert!(HourRange::from_hours(17, 9).is_err());
    /// ```
    pub fn from_hours(start_hour: u32, end_hour: u32) -> Result<Self, CalendarError> {
        Self::new(
            TimeOfDay::from_hour(start_hour)?,
            TimeOfDay::from_hour(end_hour)?,
        )
    }

    #[inline]
    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    #[inline]
    pub fn is_moment(&self) -> bool {
        self.start == self.end
    }
}

impl std::fmt::Display for HourRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// An `HourRange` that only applies on one weekday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DayHourRange {
    weekday: Weekday,
    hours: HourRange,
}

impl DayHourRange {
    pub fn new(weekday: Weekday, start: TimeOfDay, end: TimeOfDay) -> Result<Self, CalendarError> {
        Ok(Self {
            weekday,
            hours: HourRange::new(start, end)?,
        })
    }

    pub fn from_hours(
        weekday: Weekday,
        start_hour: u32,
        end_hour: u32,
    ) -> Result<Self, CalendarError> {
        Ok(Self {
            weekday,
            hours: HourRange::from_hours(start_hour, end_hour)?,
        })
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    #[inline]
    pub fn hours(&self) -> HourRange {
        self.hours
    }
}

impl std::fmt::Display for DayHourRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.weekday, self.hours)
    }
}

/// An inclusive range of days of the month (1..=31).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DayRange {
    min: u32,
    max: u32,
}

impl DayRange {
    pub fn new(min: u32, max: u32) -> Result<Self, CalendarError> {
        for day in [min, max] {
            if !(1..=31).contains(&day) {
                return Err(CalendarError::DayOfMonthOutOfRange { day });
            }
        }
        if max < min {
            return Err(CalendarError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn single(day: u32) -> Result<Self, CalendarError> {
        Self::new(day, day)
    }

    #[inline]
    pub fn min(&self) -> u32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn is_single_day(&self) -> bool {
        self.min == self.max
    }

    #[inline]
    pub fn has_inside(&self, day: u32) -> bool {
        (self.min..=self.max).contains(&day)
    }
}

/// An inclusive range of calendar months (1..=12).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonthRange {
    min: u32,
    max: u32,
}

impl MonthRange {
    pub fn new(min: u32, max: u32) -> Result<Self, CalendarError> {
        for month in [min, max] {
            if !(1..=12).contains(&month) {
                return Err(CalendarError::MonthOutOfRange { month });
            }
        }
        if max < min {
            return Err(CalendarError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn single(month: u32) -> Result<Self, CalendarError> {
        Self::new(month, month)
    }

    #[inline]
    pub fn min(&self) -> u32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn is_single_month(&self) -> bool {
        self.min == self.max
    }

    #[inline]
    pub fn has_inside(&self, month: u32) -> bool {
        (self.min..=self.max).contains(&month)
    }
}
