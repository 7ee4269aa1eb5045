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

//! # Period Collections
//!
//! `TimePeriodCollection` is the ordered, owned list of periods every
//! operator returns and most callers build their input in. Besides the usual
//! list operations it answers relation queries against a test period and the
//! overlap/gap predicates of the timeline.

use crate::moments::TimeLineMomentCollection;
use chrono::TimeDelta;
use std::ops::Index;
use timeperiod_core::{
    moment::{MAX_MOMENT, MIN_MOMENT, Moment},
    period::{PeriodRelation, TimePeriod, TimeRange},
};

/// Sort order for the `sort_by_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// An ordered list of periods.
///
/// As a `TimePeriod` the collection spans from its earliest start to its
/// latest end; an empty collection is `anytime`. It is always read-only
/// through that capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimePeriodCollection<P = TimeRange> {
    periods: Vec<P>,
}

impl<P> Default for TimePeriodCollection<P> {
    fn default() -> Self {
        Self {
            periods: Vec::new(),
        }
    }
}

impl<P> TimePeriodCollection<P> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            periods: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    #[inline]
    pub fn push(&mut self, period: P) {
        self.periods.push(period);
    }

    /// Inserts at `index`, shifting later periods.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[inline]
    pub fn insert(&mut self, index: usize, period: P) {
        self.periods.insert(index, period);
    }

    /// Removes and returns the period at `index`, if any.
    #[inline]
    pub fn remove(&mut self, index: usize) -> Option<P> {
        if index < self.periods.len() {
            Some(self.periods.remove(index))
        } else {
            None
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.periods.clear();
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&P> {
        self.periods.get(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.periods.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[P] {
        &self.periods
    }

    #[inline]
    pub fn into_vec(self) -> Vec<P> {
        self.periods
    }
}

impl<P> TimePeriodCollection<P>
where
    P: TimePeriod,
{
    /// The span from the earliest start to the latest end, or `None` if the
    /// collection is empty.
    pub fn span(&self) -> Option<TimeRange> {
        let start = self.periods.iter().map(|p| p.start()).min()?;
        let end = self.periods.iter().map(|p| p.end()).max()?;
        Some(TimeRange::new(start, end))
    }

    /// The sum of all member durations (overlaps are counted repeatedly).
    pub fn total_duration(&self) -> TimeDelta {
        self.periods
            .iter()
            .fold(TimeDelta::zero(), |acc, p| acc + p.duration())
    }

    pub fn sort_by_start(&mut self, direction: SortDirection) {
        self.sort_by_key_directed(direction, |p| p.start());
    }

    pub fn sort_by_end(&mut self, direction: SortDirection) {
        self.sort_by_key_directed(direction, |p| p.end());
    }

    pub fn sort_by_duration(&mut self, direction: SortDirection) {
        self.sort_by_key_directed(direction, |p| p.duration());
    }

    fn sort_by_key_directed<K, F>(&mut self, direction: SortDirection, key: F)
    where
        K: Ord,
        F: Fn(&P) -> K,
    {
        match direction {
            SortDirection::Ascending => self.periods.sort_by(|a, b| key(a).cmp(&key(b))),
            SortDirection::Descending => self.periods.sort_by(|a, b| key(b).cmp(&key(a))),
        }
    }

    /// Returns `true` if some member has a period exactly equal to `test`.
    pub fn contains_same_period(&self, test: &dyn TimePeriod) -> bool {
        self.periods.iter().any(|p| p.is_same_period(test))
    }

    pub fn has_inside_period(&self, test: &dyn TimePeriod) -> bool {
        self.periods.iter().any(|p| p.has_inside(test))
    }

    /// Members that contain `test`.
    pub fn inside_periods<'a>(&'a self, test: &'a dyn TimePeriod) -> impl Iterator<Item = &'a P> {
        self.periods.iter().filter(move |p| p.has_inside(test))
    }

    pub fn has_overlap_period(&self, test: &dyn TimePeriod) -> bool {
        self.periods.iter().any(|p| p.overlaps_with(test))
    }

    /// Members that share interior time with `test`.
    pub fn overlap_periods<'a>(&'a self, test: &'a dyn TimePeriod) -> impl Iterator<Item = &'a P> {
        self.periods.iter().filter(move |p| p.overlaps_with(test))
    }

    pub fn has_intersection_period(&self, test: &dyn TimePeriod) -> bool {
        self.periods.iter().any(|p| p.intersects_with(test))
    }

    /// Members that intersect `test`.
    pub fn intersection_periods<'a>(
        &'a self,
        test: &'a dyn TimePeriod,
    ) -> impl Iterator<Item = &'a P> {
        self.periods.iter().filter(move |p| p.intersects_with(test))
    }

    /// Members that contain `moment` (half-open).
    pub fn moment_periods(&self, moment: Moment) -> impl Iterator<Item = &P> {
        self.periods
            .iter()
            .filter(move |p| p.has_inside_moment(moment))
    }

    /// Members whose relation to `test` is one of `relations`.
    pub fn relation_periods<'a>(
        &'a self,
        test: &'a dyn TimePeriod,
        relations: &'a [PeriodRelation],
    ) -> impl Iterator<Item = &'a P> {
        self.periods
            .iter()
            .filter(move |p| relations.contains(&p.relation(test)))
    }

    /// Returns `true` if any two members overlap.
    ///
    /// Two members are compared directly; larger collections are swept
    /// through the moment index, where touching members never overlap.
    pub fn has_overlaps(&self) -> bool {
        match self.periods.as_slice() {
            [] | [_] => false,
            [a, b] => a.overlaps_with(b),
            periods => TimeLineMomentCollection::from_periods(periods).has_overlaps(),
        }
    }

    /// Returns `true` if the members leave uncovered time between their
    /// earliest start and latest end.
    pub fn has_gaps(&self) -> bool {
        TimeLineMomentCollection::from_periods(&self.periods).has_gaps()
    }
}

impl<P> TimePeriod for TimePeriodCollection<P>
where
    P: TimePeriod,
{
    fn start(&self) -> Moment {
        self.periods
            .iter()
            .map(|p| p.start())
            .min()
            .unwrap_or(MIN_MOMENT)
    }

    fn end(&self) -> Moment {
        self.periods
            .iter()
            .map(|p| p.end())
            .max()
            .unwrap_or(MAX_MOMENT)
    }
}

impl<P> Index<usize> for TimePeriodCollection<P> {
    type Output = P;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.periods[index]
    }
}

impl<P> FromIterator<P> for TimePeriodCollection<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            periods: iter.into_iter().collect(),
        }
    }
}

impl<P> Extend<P> for TimePeriodCollection<P> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.periods.extend(iter);
    }
}

impl<P> From<Vec<P>> for TimePeriodCollection<P> {
    #[inline]
    fn from(periods: Vec<P>) -> Self {
        Self { periods }
    }
}

impl<P> IntoIterator for TimePeriodCollection<P> {
    type Item = P;
    type IntoIter = std::vec::IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.into_iter()
    }
}

impl<'a, P> IntoIterator for &'a TimePeriodCollection<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

impl<P> std::fmt::Display for TimePeriodCollection<P>
where
    P: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, p) in self.periods.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str("}")
    }
}
