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

//! # Timeperiod Timeline
//!
//! Sweep-line algorithms over collections of periods. Every operator folds
//! its input into a `TimeLineMomentCollection` (an ordered index of start
//! and end counts per moment) and replays it as contiguous slices tagged
//! with their concurrency count.
//!
//! ## Modules
//!
//! - `moment`: `TimeLineMoment`, the per-instant start/end counters.
//! - `moments`: `TimeLineMomentCollection`, the ordered moment index with
//!   overlap and gap detection.
//! - `evaluator`: `TimeLinePeriodEvaluator` (the sweep driver) and the
//!   `PeriodEvaluator` callback trait.
//! - `combiner`, `intersector`, `gaps`, `subtractor`: the set-algebra
//!   operators built on the sweep driver (union, intersection, gaps and
//!   difference).
//! - `collection`: `TimePeriodCollection`, the ordered owned period list the
//!   operators produce, with relation queries, sorting and overlap/gap
//!   predicates.
//! - `error`: `TimeLineError` for misuse of the moment index.
//!
//! ## Calendar Offsets
//!
//! Every operator accepts an optional `PeriodMapper`. Inputs are unmapped
//! into canonical half-open form before the sweep and the results are mapped
//! back, so calendar periods with an end offset (for example a day ending one
//! tick before midnight) combine without artificial gaps.

pub mod collection;
pub mod combiner;
pub mod error;
pub mod evaluator;
pub mod gaps;
pub mod intersector;
pub mod moment;
pub mod moments;
pub mod subtractor;
