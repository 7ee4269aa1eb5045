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

use crate::{period::CalendarUnit, range::TimeOfDay};
use chrono::TimeDelta;
use timeperiod_core::error::PeriodError;

/// Errors raised while building calendar configuration, calendar periods
/// and filter ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("month {month} is out of range (1..=12)")]
    MonthOutOfRange { month: u32 },
    #[error("day {day} is out of range for {year}-{month:02}")]
    DayOutOfRange { year: i32, month: u32, day: u32 },
    #[error("day of month {day} is out of range (1..=31)")]
    DayOfMonthOutOfRange { day: u32 },
    #[error("hour {hour} is out of range")]
    HourOutOfRange { hour: u32 },
    #[error("minute {minute} is out of range (0..=59)")]
    MinuteOutOfRange { minute: u32 },
    #[error("second {second} is out of range (0..=59)")]
    SecondOutOfRange { second: u32 },
    #[error("millisecond {millisecond} is out of range (0..=999)")]
    MillisecondOutOfRange { millisecond: u32 },
    #[error("invalid range: max {max} is less than min {min}")]
    InvalidRange { min: u32, max: u32 },
    #[error("invalid hour range: end {end} is before start {start}")]
    InvalidHourRange { start: TimeOfDay, end: TimeOfDay },
    #[error("start offset {offset} must not be negative")]
    InvalidStartOffset { offset: TimeDelta },
    #[error("end offset {offset} must not be positive")]
    InvalidEndOffset { offset: TimeDelta },
    #[error("a calendar period must span at least one unit")]
    EmptyPeriod,
    #[error("calendar period starting in year {year} leaves the representable date range")]
    DateOutOfRange { year: i32 },
    #[error("expected a {expected} period, found a {found} period")]
    UnexpectedUnit {
        expected: CalendarUnit,
        found: CalendarUnit,
    },
    #[error(transparent)]
    Period(#[from] PeriodError),
}
