/*!
Closed intervals over the alphabet.

The alphabet is the set of Unicode scalar values ordered by code point. It is
not contiguous: the surrogate block `U+D800..=U+DFFF` is not made of `char`s,
so stepping one symbol up or down skips over it. Every interval bound produced
here is therefore a valid `char`, and the low bound of a non-empty interval is
always a symbol the interval contains.
*/

use core::fmt;

/// The smallest symbol of the alphabet.
pub const ALPHABET_MIN: char = '\0';

/// The largest symbol of the alphabet.
pub const ALPHABET_MAX: char = char::MAX;

/// An inclusive range of symbols `low..=high`.
///
/// An interval whose high bound is below its low bound is empty. Empty
/// intervals are legal values: they are what [`Interval::intersect`] returns
/// for disjoint inputs.
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Interval {
    low: char,
    high: char,
}

impl Interval {
    /// Create the interval `low..=high`.
    pub fn new(low: char, high: char) -> Interval {
        Interval { low, high }
    }

    /// The interval containing exactly one symbol.
    pub fn singleton(c: char) -> Interval {
        Interval { low: c, high: c }
    }

    /// The interval covering the whole alphabet.
    pub fn full() -> Interval {
        Interval { low: ALPHABET_MIN, high: ALPHABET_MAX }
    }

    /// The low bound.
    pub fn low(&self) -> char {
        self.low
    }

    /// The high bound.
    pub fn high(&self) -> char {
        self.high
    }

    /// Whether `c` lies within this interval.
    pub fn contains(&self, c: char) -> bool {
        self.low <= c && c <= self.high
    }

    /// Whether every symbol of `other` lies within this interval.
    ///
    /// An empty `other` is contained in everything.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        other.is_empty() || (self.low <= other.low && other.high <= self.high)
    }

    /// The symbols common to both intervals. The result may be empty.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval {
            low: self.low.max(other.low),
            high: self.high.min(other.high),
        }
    }

    /// The intervals covering the rest of the alphabet.
    ///
    /// A full interval has no complement, an interval touching one end of
    /// the alphabet has one, and every other interval has two. The returned
    /// intervals are ordered and never empty.
    pub fn complement(&self) -> Vec<Interval> {
        let mut ranges = Vec::with_capacity(2);
        if self.is_empty() {
            ranges.push(Interval::full());
            return ranges;
        }
        if let Some(high) = decrement(self.low) {
            ranges.push(Interval::new(ALPHABET_MIN, high));
        }
        if let Some(low) = increment(self.high) {
            ranges.push(Interval::new(low, ALPHABET_MAX));
        }
        ranges
    }

    /// Whether this interval contains no symbols.
    pub fn is_empty(&self) -> bool {
        self.high < self.low
    }

    /// Whether this interval contains every symbol.
    pub fn is_full(&self) -> bool {
        self.low == ALPHABET_MIN && self.high == ALPHABET_MAX
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{:?}", self.low)
        } else {
            write!(f, "{:?}-{:?}", self.low, self.high)
        }
    }
}

/// The symbol immediately after `c`, or `None` at the top of the alphabet.
pub(crate) fn increment(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        ALPHABET_MAX => None,
        c => char::from_u32(u32::from(c) + 1),
    }
}

/// The symbol immediately before `c`, or `None` at the bottom of the alphabet.
pub(crate) fn decrement(c: char) -> Option<char> {
    match c {
        '\u{E000}' => Some('\u{D7FF}'),
        ALPHABET_MIN => None,
        c => char::from_u32(u32::from(c) - 1),
    }
}
