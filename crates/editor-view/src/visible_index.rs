//! Visual (post-wrap) line identity.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Ordinal of a visual line, i.e. one rendered row after soft wrapping.
///
/// Deliberately not interchangeable with a logical line number: there is no
/// `From<usize>`, construct it with [`VisibleIndex::new`]. Scroll and navigation
/// code walks visual lines, so offsetting by a signed amount is a first-class
/// operation ([`VisibleIndex::offset`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleIndex(usize);

impl VisibleIndex {
    /// Sentinel for "invalid / not computed".
    pub const INVALID: Self = Self(usize::MAX);

    /// The first visual line.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw visual line ordinal.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw visual line ordinal.
    pub const fn get(self) -> usize {
        self.0
    }

    /// Whether this is not the [`VisibleIndex::INVALID`] sentinel.
    pub const fn is_valid(self) -> bool {
        self.0 != usize::MAX
    }

    /// Move by `delta` visual lines, saturating at zero.
    ///
    /// The invalid sentinel stays invalid.
    pub fn offset(self, delta: isize) -> Self {
        if !self.is_valid() {
            return self;
        }
        let moved = if delta >= 0 {
            self.0.saturating_add(delta.unsigned_abs())
        } else {
            self.0.saturating_sub(delta.unsigned_abs())
        };
        Self(moved.min(usize::MAX - 1))
    }

    /// Move by `delta` visual lines, returning `None` on underflow or for the sentinel.
    pub fn checked_offset(self, delta: isize) -> Option<Self> {
        if !self.is_valid() {
            return None;
        }
        self.0
            .checked_add_signed(delta)
            .filter(|index| *index != usize::MAX)
            .map(Self)
    }

    /// Signed number of visual lines from `self` to `other`.
    pub fn distance(self, other: Self) -> isize {
        other.0 as isize - self.0 as isize
    }
}

impl Default for VisibleIndex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl Add<usize> for VisibleIndex {
    type Output = VisibleIndex;

    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<usize> for VisibleIndex {
    fn add_assign(&mut self, rhs: usize) {
        self.0 += rhs;
    }
}

impl Sub<usize> for VisibleIndex {
    type Output = VisibleIndex;

    fn sub(self, rhs: usize) -> Self::Output {
        Self(self.0 - rhs)
    }
}

impl SubAssign<usize> for VisibleIndex {
    fn sub_assign(&mut self, rhs: usize) {
        self.0 -= rhs;
    }
}

impl fmt::Display for VisibleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("invalid")
        }
    }
}
