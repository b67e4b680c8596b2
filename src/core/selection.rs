//! Selection Model
//!
//! Represents a directional text selection with support for:
//! - Point selections (a collapsed cursor)
//! - Forward (LTR) and backward (RTL) range selections
//! - Conversion to and from undirected ranges

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::position::{Position, Range};

// =============================================================================
// DIRECTION
// =============================================================================

/// Which end of the selection holds the caret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionDirection {
    /// Anchor before caret
    #[default]
    Ltr,
    /// Caret before anchor
    Rtl,
}

// =============================================================================
// SELECTION STRUCT
// =============================================================================

/// A text selection in the buffer
///
/// The anchor is where the selection started, the active position is where the
/// caret sits. They can be in any order; an empty selection has both equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Anchor position (where selection started)
    pub anchor: Position,
    /// Active position (where the caret is)
    pub active: Position,
}

impl Selection {
    /// Create a selection from raw anchor and active coordinates
    pub fn new(anchor_line: usize, anchor_column: usize, line: usize, column: usize) -> Self {
        Self {
            anchor: Position::new(anchor_line, anchor_column),
            active: Position::new(line, column),
        }
    }

    /// Create a new selection at a single point (no selection)
    pub fn point(pos: Position) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    /// Create a selection from anchor to active position
    pub fn from_positions(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// Create a selection covering `range` in the given direction
    pub fn from_range(range: Range, direction: SelectionDirection) -> Self {
        match direction {
            SelectionDirection::Ltr => Self::from_positions(range.start(), range.end()),
            SelectionDirection::Rtl => Self::from_positions(range.end(), range.start()),
        }
    }

    /// Check if this is a point selection (no range)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Get the start of the selection (smaller position)
    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    /// Get the end of the selection (larger position)
    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    /// Undirected range covered by the selection
    pub fn range(&self) -> Range {
        Range::from_positions(self.anchor, self.active)
    }

    /// Caret position
    pub fn position(&self) -> Position {
        self.active
    }

    pub fn direction(&self) -> SelectionDirection {
        if self.anchor <= self.active {
            SelectionDirection::Ltr
        } else {
            SelectionDirection::Rtl
        }
    }

    /// Check if the selection direction is forward (anchor <= active)
    pub fn is_forward(&self) -> bool {
        self.direction() == SelectionDirection::Ltr
    }

    /// Same selection with anchor and caret swapped
    pub fn swapped(&self) -> Self {
        Self {
            anchor: self.active,
            active: self.anchor,
        }
    }

    /// Union of both ranges, keeping the direction of `self`
    pub fn merge(&self, other: &Selection) -> Self {
        Self::from_range(self.range().plus_range(&other.range()), self.direction())
    }

    /// Check if two selections overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Selection) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

impl From<Range> for Selection {
    fn from(range: Range) -> Self {
        Self::from_range(range, SelectionDirection::Ltr)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.anchor, self.active)
    }
}

// =============================================================================
// TESTS
// =============================================================================
