//! Positions and ranges in buffer or display space.
//!
//! Both coordinates are 1-based: the first character of the buffer sits at
//! line 1, column 1. A line of `n` characters has valid columns `1..=n + 1`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A (line, column) location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Create a position, clamping both coordinates to at least 1
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line: line.max(1),
            column: column.max(1),
        }
    }

    /// True if `self` comes strictly before `other`
    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    /// True if `self` comes before or at `other`
    pub fn is_before_or_equal(&self, other: &Position) -> bool {
        self <= other
    }

    /// Shift by a line and column delta, never going below (1, 1)
    pub fn delta(&self, line_delta: isize, column_delta: isize) -> Self {
        Self::new(
            self.line.saturating_add_signed(line_delta),
            self.column.saturating_add_signed(column_delta),
        )
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

/// An ordered pair of positions. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    /// Create a range from raw coordinates; the endpoints are swapped if needed
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self::from_positions(
            Position::new(start_line, start_column),
            Position::new(end_line, end_column),
        )
    }

    /// Create a range from two positions in any order
    pub fn from_positions(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Empty range at a single position
    pub fn collapsed(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the range spans more than one line
    pub fn is_multi_line(&self) -> bool {
        self.start.line != self.end.line
    }

    /// True if `other` lies inside the range, edges included
    pub fn contains_range(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if `other` lies inside the range without touching either edge
    pub fn strict_contains_range(&self, other: &Range) -> bool {
        self.start < other.start && other.end < self.end
    }

    /// Smallest range covering both
    pub fn plus_range(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Order by start position, then by end position
    pub fn compare_using_starts(a: &Range, b: &Range) -> Ordering {
        a.start.cmp(&b.start).then(a.end.cmp(&b.end))
    }

    /// Order by end position, then by start position
    pub fn compare_using_ends(a: &Range, b: &Range) -> Ordering {
        a.end.cmp(&b.end).then(a.start.cmp(&b.start))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.start, self.end)
    }
}
