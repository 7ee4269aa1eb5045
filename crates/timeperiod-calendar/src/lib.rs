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

//! # Timeperiod Calendar
//!
//! Calendar-aware periods and the machinery to walk them. A `TimeCalendar`
//! fixes the conventions (year base month, first day of week, start and end
//! offsets); `CalendarPeriod` is a run of whole years, months, days or hours
//! under such a calendar; the visitor walks the
//! `Years -> Year -> Months -> Month -> Days -> Day -> Hours -> Hour`
//! hierarchy and the collector and seeker build on it.
//!
//! ## Modules
//!
//! - `calendar`: `TimeCalendar` and its validating builder. Also the
//!   `PeriodMapper` used to apply the calendar offsets in the timeline
//!   operators.
//! - `period`: `CalendarUnit` and `CalendarPeriod` with navigation
//!   (`next`/`previous`) and decomposition (`units`/`children`).
//! - `range`: `TimeOfDay`, `HourRange`, `DayHourRange`, `DayRange` and
//!   `MonthRange`, validated at construction.
//! - `filter`: `CalendarVisitorFilter` (years, months, days, weekdays,
//!   hours, exclusion periods) and `CalendarPeriodCollectorFilter`, which
//!   adds the collecting ranges.
//! - `visitor`: the `CalendarVisitor` trait, `VisitStep`, `SeekDirection`
//!   and the traversal drivers.
//! - `collector`: `CalendarPeriodCollector`, gathering matching periods at
//!   year, month, day or hour granularity.
//! - `seeker`: `DaySeeker`, finding the n-th matching day from a start day.
//! - `error`: `CalendarError`.

pub mod calendar;
pub mod collector;
pub mod error;
pub mod filter;
pub mod period;
pub mod range;
pub mod seeker;
pub mod visitor;
