//! Range collections and the minimal-cover merge.

use std::slice;
use std::vec;

use super::{Address, IpInterval};

/// An ordered collection of address ranges.
///
/// Insertion order does not matter. After [`Intervals::merge`] the
/// ranges are ascending by lower bound, each satisfies `from <= to`, and no
/// two ranges overlap or touch.
///
/// # Example
///
/// ```
/// use ipfilter::iprange::Intervals;
///
/// let mut intervals = Intervals::new();
/// intervals.append("10.0.0.0", "10.0.0.255");
/// intervals.append("10.0.1.0", "10.0.1.255");
/// intervals.append("not-an-ip", "10.0.0.1"); // dropped
///
/// let merged = intervals.merge();
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].to_string(), "[10.0.0.0, 10.0.1.255]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intervals(Vec<IpInterval>);

impl Intervals {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses both endpoints and adds the range.
    ///
    /// If either endpoint is not a valid address the pair is dropped and
    /// nothing is added. Returns whether the pair was accepted.
    pub fn append(&mut self, from: &str, to: &str) -> bool {
        let (Ok(from), Ok(to)) = (Address::parse(from), Address::parse(to)) else {
            return false;
        };
        self.0.push(IpInterval::new(from, to));
        true
    }

    /// Adds an already constructed range.
    pub fn push(&mut self, interval: IpInterval) {
        self.0.push(interval);
    }

    /// Returns the minimal sorted cover of all ranges.
    ///
    /// Every range is fixed, the ranges are stably sorted by lower bound,
    /// then a single sweep fuses each range into the running accumulator
    /// until one does not overlap or touch it.
    #[must_use]
    pub fn merge(self) -> Self {
        let mut sorted: Vec<IpInterval> = self.0.into_iter().map(IpInterval::fix).collect();
        sorted.sort_by_key(|interval| interval.from.to_integer());

        let mut iter = sorted.into_iter();
        let Some(mut current) = iter.next() else {
            return Self::new();
        };

        let mut result = Vec::new();
        for interval in iter {
            match current.merge(&interval) {
                Some(merged) => current = merged,
                None => {
                    result.push(current.fix());
                    current = interval;
                }
            }
        }
        result.push(current.fix());

        Self(result)
    }

    /// Returns the number of ranges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the collection holds no ranges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the ranges in their current order.
    pub fn iter(&self) -> slice::Iter<'_, IpInterval> {
        self.0.iter()
    }

    /// Returns the ranges as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[IpInterval] {
        &self.0
    }

    /// Total number of addresses covered, counting overlaps once.
    ///
    /// Saturates at `u128::MAX`.
    #[must_use]
    pub fn coverage(&self) -> u128 {
        self.clone()
            .merge()
            .iter()
            .fold(0u128, |acc, interval| acc.saturating_add(interval.size()))
    }
}

impl std::ops::Index<usize> for Intervals {
    type Output = IpInterval;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<IpInterval>> for Intervals {
    fn from(intervals: Vec<IpInterval>) -> Self {
        Self(intervals)
    }
}

impl FromIterator<IpInterval> for Intervals {
    fn from_iter<I: IntoIterator<Item = IpInterval>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<IpInterval> for Intervals {
    fn extend<I: IntoIterator<Item = IpInterval>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Intervals {
    type Item = IpInterval;
    type IntoIter = vec::IntoIter<IpInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Intervals {
    type Item = &'a IpInterval;
    type IntoIter = slice::Iter<'a, IpInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
