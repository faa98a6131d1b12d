//! Timestamp spans with inclusive or exclusive bounds.

use crate::error::{Result, TemporaError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tempora_types::Timestamp;

/// A span of time `[lower, upper]`, `(lower, upper)` or any mix of the two.
///
/// An instantaneous period has `lower == upper` and both bounds inclusive.
///
/// # Examples
///
/// ```
/// use tempora::Period;
/// use tempora_types::Timestamp;
///
/// let t = Timestamp::from_secs;
/// let a = Period::new(t(0), t(10), true, false).unwrap();
/// let b = Period::new(t(5), t(20), true, true).unwrap();
/// let inter = a.intersection(&b).unwrap();
/// assert_eq!(inter, Period::new(t(5), t(10), true, false).unwrap());
/// assert!(!a.contains(t(10)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    lower: Timestamp,
    upper: Timestamp,
    lower_inc: bool,
    upper_inc: bool,
}

impl Period {
    pub fn new(lower: Timestamp, upper: Timestamp, lower_inc: bool, upper_inc: bool) -> Result<Self> {
        if lower > upper {
            return Err(TemporaError::InvalidArgument(format!(
                "The lower bound must be less than or equal to the upper bound: {}, {}",
                lower, upper
            )));
        }
        if lower == upper && !(lower_inc && upper_inc) {
            return Err(TemporaError::InvalidArgument(format!(
                "An instantaneous period must have inclusive bounds: {}",
                lower
            )));
        }
        Ok(Self {
            lower,
            upper,
            lower_inc,
            upper_inc,
        })
    }

    /// Caller guarantees the bounds are consistent.
    pub(crate) fn new_unchecked(
        lower: Timestamp,
        upper: Timestamp,
        lower_inc: bool,
        upper_inc: bool,
    ) -> Self {
        debug_assert!(lower < upper || (lower == upper && lower_inc && upper_inc));
        Self {
            lower,
            upper,
            lower_inc,
            upper_inc,
        }
    }

    pub fn instant(t: Timestamp) -> Self {
        Self::new_unchecked(t, t, true, true)
    }

    pub fn lower(&self) -> Timestamp {
        self.lower
    }

    pub fn upper(&self) -> Timestamp {
        self.upper
    }

    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }

    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    pub fn is_instant(&self) -> bool {
        self.lower == self.upper
    }

    /// Duration in microseconds.
    pub fn duration(&self) -> i128 {
        self.upper - self.lower
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        let after_lower = t > self.lower || (self.lower_inc && t == self.lower);
        let before_upper = t < self.upper || (self.upper_inc && t == self.upper);
        after_lower && before_upper
    }

    pub fn overlaps(&self, other: &Period) -> bool {
        let left = self.lower < other.upper
            || (self.lower == other.upper && self.lower_inc && other.upper_inc);
        let right = other.lower < self.upper
            || (other.lower == self.upper && other.lower_inc && self.upper_inc);
        left && right
    }

    /// True when the periods touch at a single bound without overlapping.
    pub fn is_adjacent(&self, other: &Period) -> bool {
        (self.upper == other.lower && self.upper_inc != other.lower_inc)
            || (other.upper == self.lower && other.upper_inc != self.lower_inc)
    }

    /// The common part of two periods, `None` when they do not overlap.
    pub fn intersection(&self, other: &Period) -> Option<Period> {
        if !self.overlaps(other) {
            return None;
        }
        let (lower, lower_inc) = match self.lower.cmp(&other.lower) {
            Ordering::Greater => (self.lower, self.lower_inc),
            Ordering::Less => (other.lower, other.lower_inc),
            Ordering::Equal => (self.lower, self.lower_inc && other.lower_inc),
        };
        let (upper, upper_inc) = match self.upper.cmp(&other.upper) {
            Ordering::Less => (self.upper, self.upper_inc),
            Ordering::Greater => (other.upper, other.upper_inc),
            Ordering::Equal => (self.upper, self.upper_inc && other.upper_inc),
        };
        Some(Period::new_unchecked(lower, upper, lower_inc, upper_inc))
    }

    /// Smallest period covering both.
    pub fn expand(&self, other: &Period) -> Period {
        let (lower, lower_inc) = match self.lower.cmp(&other.lower) {
            Ordering::Less => (self.lower, self.lower_inc),
            Ordering::Greater => (other.lower, other.lower_inc),
            Ordering::Equal => (self.lower, self.lower_inc || other.lower_inc),
        };
        let (upper, upper_inc) = match self.upper.cmp(&other.upper) {
            Ordering::Greater => (self.upper, self.upper_inc),
            Ordering::Less => (other.upper, other.upper_inc),
            Ordering::Equal => (self.upper, self.upper_inc || other.upper_inc),
        };
        Period::new_unchecked(lower, upper, lower_inc, upper_inc)
    }

    /// Total order on periods: lower bound first, an inclusive lower bound sorting
    /// before an exclusive one, then upper bound, an exclusive upper bound sorting
    /// before an inclusive one.
    pub fn span_cmp(&self, other: &Period) -> Ordering {
        self.lower
            .cmp(&other.lower)
            .then_with(|| other.lower_inc.cmp(&self.lower_inc))
            .then_with(|| self.upper.cmp(&other.upper))
            .then_with(|| self.upper_inc.cmp(&other.upper_inc))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.span_cmp(other)
    }
}
