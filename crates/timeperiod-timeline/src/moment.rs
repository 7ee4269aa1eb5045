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

use crate::error::{BoundaryKind, TimeLineError};
use timeperiod_core::moment::Moment;

/// The number of periods starting and ending at a single instant.
///
/// # Examples
///
/// ```rust
/// # use timeperiod_timeline::moment::TimeLineMoment;
/// # use chrono::NaiveDate;
/// let m = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let mut tlm = TimeLineMoment::new(m);
/// tlm.add_start();
/// tlm.add_start();
/// tlm.add_end();
/// assert_eq!(tlm.balance_count(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeLineMoment {
    moment: Moment,
    start_count: usize,
    end_count: usize,
}

impl TimeLineMoment {
    #[inline]
    pub fn new(moment: Moment) -> Self {
        Self {
            moment,
            start_count: 0,
            end_count: 0,
        }
    }

    #[inline]
    pub fn moment(&self) -> Moment {
        self.moment
    }

    #[inline]
    pub fn start_count(&self) -> usize {
        self.start_count
    }

    #[inline]
    pub fn end_count(&self) -> usize {
        self.end_count
    }

    /// `start_count - end_count`.
    #[inline]
    pub fn balance_count(&self) -> isize {
        self.start_count as isize - self.end_count as isize
    }

    /// Returns `true` once no period starts or ends here anymore.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_count == 0 && self.end_count == 0
    }

    #[inline]
    pub fn add_start(&mut self) {
        self.start_count += 1;
    }

    #[inline]
    pub fn add_end(&mut self) {
        self.end_count += 1;
    }

    /// # Errors
    ///
    /// `CountUnderflow` if no start is registered at this moment.
    #[inline]
    pub fn remove_start(&mut self) -> Result<(), TimeLineError> {
        self.start_count = self
            .start_count
            .checked_sub(1)
            .ok_or(TimeLineError::CountUnderflow {
                moment: self.moment,
                kind: BoundaryKind::Start,
            })?;
        Ok(())
    }

    /// # Errors
    ///
    /// `CountUnderflow` if no end is registered at this moment.
    #[inline]
    pub fn remove_end(&mut self) -> Result<(), TimeLineError> {
        self.end_count = self
            .end_count
            .checked_sub(1)
            .ok_or(TimeLineError::CountUnderflow {
                moment: self.moment,
                kind: BoundaryKind::End,
            })?;
        Ok(())
    }
}

impl std::fmt::Display for TimeLineMoment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [+{}/-{}]",
            self.moment, self.start_count, self.end_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn m() -> Moment {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_new_is_empty() {
        let tlm = TimeLineMoment::new(m());
        assert!(tlm.is_empty());
        assert_eq!(tlm.balance_count(), 0);
        assert_eq!(tlm.moment(), m());
    }

    #[test]
    fn test_counts_and_balance() {
        let mut tlm = TimeLineMoment::new(m());
        tlm.add_end();
        tlm.add_end();
        tlm.add_start();
        assert_eq!(tlm.start_count(), 1);
        assert_eq!(tlm.end_count(), 2);
        assert_eq!(tlm.balance_count(), -1);
        assert!(!tlm.is_empty());
    }

    #[test]
    fn test_remove_underflow_fails_without_mutation() {
        let mut tlm = TimeLineMoment::new(m());
        tlm.add_end();
        assert_eq!(
            tlm.remove_start(),
            Err(TimeLineError::CountUnderflow {
                moment: m(),
                kind: BoundaryKind::Start
            })
        );
        assert_eq!(tlm.end_count(), 1);
        tlm.remove_end().unwrap();
        assert!(tlm.is_empty());
    }

    #[test]
    fn test_display() {
        let mut tlm = TimeLineMoment::new(m());
        tlm.add_start();
        assert_eq!(tlm.to_string(), "2024-01-01 12:00:00 [+1/-0]");
    }
}
