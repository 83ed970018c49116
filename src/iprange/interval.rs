//! Inclusive address ranges.

use std::fmt;

use super::Address;

/// An inclusive address range `[from, to]`.
///
/// Input ranges may arrive reversed; [`IpInterval::fix`] restores
/// `from <= to` and is applied by every operation that relies on ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpInterval {
    /// Lower bound (after [`IpInterval::fix`]).
    pub from: Address,
    /// Upper bound (after [`IpInterval::fix`]).
    pub to: Address,
}

impl IpInterval {
    /// Creates a range from two endpoints, in whatever order they came.
    #[must_use]
    pub const fn new(from: Address, to: Address) -> Self {
        Self { from, to }
    }

    /// Returns the range with its bounds swapped if `to < from`.
    #[must_use]
    pub fn fix(self) -> Self {
        if self.to.to_integer() < self.from.to_integer() {
            Self {
                from: self.to,
                to: self.from,
            }
        } else {
            self
        }
    }

    /// Returns true if `value` lies within the range widened by one on each side.
    ///
    /// The slack makes a value directly below `from` or directly above `to`
    /// count as contained, so that touching ranges merge.
    #[must_use]
    pub fn contains(&self, value: u128) -> bool {
        value.saturating_add(1) >= self.from.to_integer()
            && value.saturating_sub(1) <= self.to.to_integer()
    }

    /// Merges two ranges that overlap or touch.
    ///
    /// Returns `None` when the ranges are disjoint, i.e. no endpoint of
    /// either range falls within the other (with slack). The operation is
    /// symmetric and the result always satisfies `from <= to`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Option<Self> {
        let this = self.fix();
        let other = other.fix();
        let overlap = this.contains(other.from.to_integer())
            || this.contains(other.to.to_integer())
            || other.contains(this.from.to_integer());
        if !overlap {
            return None;
        }

        let mut result = this;
        if result.from.to_integer() > other.from.to_integer() {
            result.from = other.from;
        }
        if result.to.to_integer() < other.to.to_integer() {
            result.to = other.to;
        }
        Some(result)
    }

    /// Returns the number of addresses covered, saturating at `u128::MAX`.
    #[must_use]
    pub fn size(&self) -> u128 {
        let fixed = self.fix();
        (fixed.to.to_integer() - fixed.from.to_integer()).saturating_add(1)
    }
}

impl fmt::Display for IpInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}
