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

//! # Period Relations
//!
//! Pure functions computing containment, intersection, overlap and the
//! discrete thirteen-way relation between two periods. All functions are
//! generic over `?Sized` periods so they accept trait objects as well as
//! concrete types.
//!
//! ## Boundary Conventions
//!
//! - `has_inside_moment`: half-open, `start <= m < end`. A moment period
//!   contains exactly its own instant.
//! - `has_inside`: closed containment of the test period's bounds.
//! - `intersects_with`: two proper periods intersect only on positive
//!   measure. A moment period intersects another period when it lies on that
//!   period's closed span `[start, end]`; two moments intersect when equal.
//! - `overlaps_with`: the relation is neither a touch nor a disjoint
//!   `Before`/`After`.

use super::TimePeriod;
use crate::moment::Moment;

/// Position of one period relative to another.
///
/// Variants read "`a` is ... `b`": `relation(a, b) == Before` means `a` ends
/// before `b` starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodRelation {
    /// `a` starts after `b` ends.
    After,
    /// `a` starts exactly where `b` ends.
    StartTouching,
    /// `a` starts inside `b` and ends after it.
    StartInside,
    /// `a` lies inside `b` and shares its start.
    InsideStartTouching,
    /// `a` encloses `b` and shares its start.
    EnclosingStartTouching,
    /// `a` strictly encloses `b`.
    Enclosing,
    /// `a` encloses `b` and shares its end.
    EnclosingEndTouching,
    /// Both bounds are equal.
    ExactMatch,
    /// `a` lies strictly inside `b`.
    Inside,
    /// `a` lies inside `b` and shares its end.
    InsideEndTouching,
    /// `a` starts before `b` and ends inside it.
    EndInside,
    /// `a` ends exactly where `b` starts.
    EndTouching,
    /// `a` ends before `b` starts.
    Before,
}

impl PeriodRelation {
    /// All relations in declaration order.
    pub const ALL: [PeriodRelation; 13] = [
        PeriodRelation::After,
        PeriodRelation::StartTouching,
        PeriodRelation::StartInside,
        PeriodRelation::InsideStartTouching,
        PeriodRelation::EnclosingStartTouching,
        PeriodRelation::Enclosing,
        PeriodRelation::EnclosingEndTouching,
        PeriodRelation::ExactMatch,
        PeriodRelation::Inside,
        PeriodRelation::InsideEndTouching,
        PeriodRelation::EndInside,
        PeriodRelation::EndTouching,
        PeriodRelation::Before,
    ];

    /// The relation seen from the other period: `relation(b, a)` given
    /// `relation(a, b)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use timeperiod_core::period::PeriodRelation;
    ///
    /// assert_eq!(PeriodRelation::After.inverse(), PeriodRelation::Before);
    /// assert_eq!(PeriodRelation::ExactMatch.inverse(), PeriodRelation::ExactMatch);
    /// ```
    pub const fn inverse(self) -> Self {
        match self {
            PeriodRelation::After => PeriodRelation::Before,
            PeriodRelation::StartTouching => PeriodRelation::EndTouching,
            PeriodRelation::StartInside => PeriodRelation::EndInside,
            PeriodRelation::InsideStartTouching => PeriodRelation::EnclosingStartTouching,
            PeriodRelation::EnclosingStartTouching => PeriodRelation::InsideStartTouching,
            PeriodRelation::Enclosing => PeriodRelation::Inside,
            PeriodRelation::EnclosingEndTouching => PeriodRelation::InsideEndTouching,
            PeriodRelation::ExactMatch => PeriodRelation::ExactMatch,
            PeriodRelation::Inside => PeriodRelation::Enclosing,
            PeriodRelation::InsideEndTouching => PeriodRelation::EnclosingEndTouching,
            PeriodRelation::EndInside => PeriodRelation::StartInside,
            PeriodRelation::EndTouching => PeriodRelation::StartTouching,
            PeriodRelation::Before => PeriodRelation::After,
        }
    }

    /// Returns `true` for relations in which the periods share interior time.
    #[inline]
    pub const fn is_overlapping(self) -> bool {
        !matches!(
            self,
            PeriodRelation::After
                | PeriodRelation::StartTouching
                | PeriodRelation::EndTouching
                | PeriodRelation::Before
        )
    }
}

impl std::fmt::Display for PeriodRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PeriodRelation::After => "After",
            PeriodRelation::StartTouching => "StartTouching",
            PeriodRelation::StartInside => "StartInside",
            PeriodRelation::InsideStartTouching => "InsideStartTouching",
            PeriodRelation::EnclosingStartTouching => "EnclosingStartTouching",
            PeriodRelation::Enclosing => "Enclosing",
            PeriodRelation::EnclosingEndTouching => "EnclosingEndTouching",
            PeriodRelation::ExactMatch => "ExactMatch",
            PeriodRelation::Inside => "Inside",
            PeriodRelation::InsideEndTouching => "InsideEndTouching",
            PeriodRelation::EndInside => "EndInside",
            PeriodRelation::EndTouching => "EndTouching",
            PeriodRelation::Before => "Before",
        };
        f.write_str(name)
    }
}

#[inline]
fn contains_closed<P>(period: &P, moment: Moment) -> bool
where
    P: TimePeriod + ?Sized,
{
    period.start() <= moment && moment <= period.end()
}

/// Returns `true` if `moment` lies in `[start, end)`, or equals the instant
/// of a moment period.
///
/// # Examples
///
/// ```rust
/// # use timeperiod_core::period::{relation::has_inside_moment, TimeRange};
/// # use chrono::NaiveDate;
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let p = TimeRange::new(day(1), day(3));
/// assert!(has_inside_moment(&p, day(1)));
/// assert!(!has_inside_moment(&p, day(3)));
/// assert!(has_inside_moment(&TimeRange::moment(day(3)), day(3)));
/// ```
#[inline]
pub fn has_inside_moment<P>(period: &P, moment: Moment) -> bool
where
    P: TimePeriod + ?Sized,
{
    if period.is_moment() {
        moment == period.start()
    } else {
        period.start() <= moment && moment < period.end()
    }
}

/// Returns `true` if `test` lies within `container` (closed bounds).
#[inline]
pub fn has_inside<C, T>(container: &C, test: &T) -> bool
where
    C: TimePeriod + ?Sized,
    T: TimePeriod + ?Sized,
{
    container.start() <= test.start() && test.end() <= container.end()
}

/// Returns `true` if the periods intersect.
///
/// Two proper periods intersect on positive measure only, so periods that
/// merely touch do not intersect. A moment period intersects a period whose
/// closed span contains it.
#[inline]
pub fn intersects_with<A, B>(a: &A, b: &B) -> bool
where
    A: TimePeriod + ?Sized,
    B: TimePeriod + ?Sized,
{
    match (a.is_moment(), b.is_moment()) {
        (true, true) => a.start() == b.start(),
        (true, false) => contains_closed(b, a.start()),
        (false, true) => contains_closed(a, b.start()),
        (false, false) => a.start() < b.end() && b.start() < a.end(),
    }
}

/// Returns `true` if the periods share interior time, which excludes the
/// `After`, `Before` and touching relations.
#[inline]
pub fn overlaps_with<A, B>(a: &A, b: &B) -> bool
where
    A: TimePeriod + ?Sized,
    B: TimePeriod + ?Sized,
{
    relation(a, b).is_overlapping()
}

/// Computes the relation of `a` relative to `b`.
///
/// Exact equality wins over everything else, touching boundaries win over
/// containment, and containment is tested before partial overlap.
///
/// # Examples
///
/// ```rust
/// # use timeperiod_core::period::{relation::relation, PeriodRelation, TimeRange};
/// # use chrono::NaiveDate;
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let a = TimeRange::new(day(1), day(10));
/// let b = TimeRange::new(day(1), day(5));
/// assert_eq!(relation(&a, &b), PeriodRelation::EnclosingStartTouching);
/// assert_eq!(relation(&b, &a), PeriodRelation::InsideStartTouching);
/// ```
pub fn relation<A, B>(a: &A, b: &B) -> PeriodRelation
where
    A: TimePeriod + ?Sized,
    B: TimePeriod + ?Sized,
{
    let (a_start, a_end) = (a.start(), a.end());
    let (b_start, b_end) = (b.start(), b.end());

    if b_end < a_start {
        return PeriodRelation::After;
    }
    if b_start > a_end {
        return PeriodRelation::Before;
    }
    if b_start == a_start && b_end == a_end {
        return PeriodRelation::ExactMatch;
    }
    if b_end == a_start {
        return PeriodRelation::StartTouching;
    }
    if b_start == a_end {
        return PeriodRelation::EndTouching;
    }

    if has_inside(a, b) {
        if b_start == a_start {
            return PeriodRelation::EnclosingStartTouching;
        }
        return if b_end == a_end {
            PeriodRelation::EnclosingEndTouching
        } else {
            PeriodRelation::Enclosing
        };
    }

    let b_contains_a_start = contains_closed(b, a_start);
    let b_contains_a_end = contains_closed(b, a_end);
    match (b_contains_a_start, b_contains_a_end) {
        (true, true) if b_start == a_start => PeriodRelation::InsideStartTouching,
        (true, true) if b_end == a_end => PeriodRelation::InsideEndTouching,
        (true, true) => PeriodRelation::Inside,
        (true, false) => PeriodRelation::StartInside,
        // `b` cannot miss both of `a`'s bounds here: the disjoint and
        // enclosing cases returned above.
        (false, _) => PeriodRelation::EndInside,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::TimeRange;
    use chrono::NaiveDate;

    fn h(hour: u32) -> Moment {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn r(s: u32, e: u32) -> TimeRange {
        TimeRange::new(h(s), h(e))
    }

    #[test]
    fn test_relation_all_variants() {
        let b = r(4, 8);
        let cases = [
            (r(9, 10), PeriodRelation::After),
            (r(8, 10), PeriodRelation::StartTouching),
            (r(6, 10), PeriodRelation::StartInside),
            (r(4, 6), PeriodRelation::InsideStartTouching),
            (r(4, 10), PeriodRelation::EnclosingStartTouching),
            (r(2, 10), PeriodRelation::Enclosing),
            (r(2, 8), PeriodRelation::EnclosingEndTouching),
            (r(4, 8), PeriodRelation::ExactMatch),
            (r(5, 7), PeriodRelation::Inside),
            (r(6, 8), PeriodRelation::InsideEndTouching),
            (r(2, 6), PeriodRelation::EndInside),
            (r(2, 4), PeriodRelation::EndTouching),
            (r(1, 3), PeriodRelation::Before),
        ];
        for (a, expected) in cases {
            assert_eq!(relation(&a, &b), expected, "relation({a}, {b})");
        }
    }

    #[test]
    fn test_relation_symmetry_exhaustive() {
        // Every pair of periods (including moments) over a small grid.
        let mut periods = Vec::new();
        for s in 0..6 {
            for e in s..6 {
                periods.push(r(s, e));
            }
        }
        for a in &periods {
            for b in &periods {
                let ab = relation(a, b);
                let ba = relation(b, a);
                assert_eq!(ab.inverse(), ba, "a = {a}, b = {b}");
                assert_eq!(overlaps_with(a, b), overlaps_with(b, a));
                assert_eq!(intersects_with(a, b), intersects_with(b, a));
            }
        }
    }

    #[test]
    fn test_inverse_is_involution() {
        for rel in PeriodRelation::ALL {
            assert_eq!(rel.inverse().inverse(), rel);
        }
        assert_eq!(PeriodRelation::ExactMatch.inverse(), PeriodRelation::ExactMatch);
    }

    #[test]
    fn test_has_inside_moment_half_open() {
        let p = r(2, 5);
        assert!(!has_inside_moment(&p, h(1)));
        assert!(has_inside_moment(&p, h(2)));
        assert!(has_inside_moment(&p, h(4)));
        assert!(!has_inside_moment(&p, h(5)));
    }

    #[test]
    fn test_has_inside_moment_degenerate() {
        let m = TimeRange::moment(h(3));
        assert!(has_inside_moment(&m, h(3)));
        assert!(!has_inside_moment(&m, h(4)));
    }

    #[test]
    fn test_has_inside_period_closed() {
        let p = r(2, 6);
        assert!(has_inside(&p, &r(2, 6)));
        assert!(has_inside(&p, &r(3, 4)));
        assert!(has_inside(&p, &TimeRange::moment(h(6))));
        assert!(!has_inside(&p, &r(1, 4)));
        assert!(!has_inside(&p, &r(5, 7)));
    }

    #[test]
    fn test_intersects_proper_periods() {
        assert!(intersects_with(&r(0, 4), &r(3, 6)));
        assert!(!intersects_with(&r(0, 4), &r(4, 6)));
        assert!(!intersects_with(&r(0, 4), &r(5, 6)));
        assert!(intersects_with(&r(0, 10), &r(3, 4)));
    }

    #[test]
    fn test_intersects_degenerate_on_boundary() {
        let p = r(2, 6);
        assert!(intersects_with(&p, &TimeRange::moment(h(2))));
        assert!(intersects_with(&p, &TimeRange::moment(h(6))));
        assert!(intersects_with(&p, &TimeRange::moment(h(4))));
        assert!(!intersects_with(&p, &TimeRange::moment(h(7))));
        assert!(intersects_with(&TimeRange::moment(h(3)), &TimeRange::moment(h(3))));
        assert!(!intersects_with(&TimeRange::moment(h(3)), &TimeRange::moment(h(4))));
    }

    #[test]
    fn test_overlaps_excludes_touching() {
        assert!(!overlaps_with(&r(0, 4), &r(4, 6)));
        assert!(!overlaps_with(&r(4, 6), &r(0, 4)));
        assert!(!overlaps_with(&r(0, 2), &r(4, 6)));
        assert!(overlaps_with(&r(0, 5), &r(4, 6)));
        assert!(overlaps_with(&r(0, 6), &TimeRange::moment(h(3))));
        assert!(!overlaps_with(&r(0, 6), &TimeRange::moment(h(6))));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PeriodRelation::EnclosingEndTouching.to_string(), "EnclosingEndTouching");
        assert_eq!(PeriodRelation::Before.to_string(), "Before");
    }
}
