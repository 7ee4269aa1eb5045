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

//! # Timeperiod Core
//!
//! Foundational types for calendar period algebra. Every other crate in the
//! workspace consumes periods exclusively through the capabilities defined
//! here, never through a concrete period type.
//!
//! ## Modules
//!
//! - `moment`: The `Moment` instant type (a naive wall-clock timestamp) and
//!   the `MIN_MOMENT`/`MAX_MOMENT` sentinels that stand for the unbounded
//!   past and future, plus saturating moment arithmetic.
//! - `period`: The `TimePeriod` and `PeriodMapper` capabilities, the
//!   thirteen-way `PeriodRelation` with its calculator, and `TimeRange`, the
//!   general purpose mutable period with set operations
//!   (intersection/union/difference/gap/split).
//! - `error`: `PeriodError`, raised when a read-only period is mutated or an
//!   inverted range is requested through a checked constructor.
//!
//! ## Conventions
//!
//! Periods are half-open `[start, end)`. A period whose start equals its end
//! is a *moment* and contains exactly its own instant. Constructors that are
//! not explicitly checked normalize reversed bounds by swapping them; the
//! `try_*` constructors and the mutators reject them instead.

pub mod error;
pub mod moment;
pub mod period;
