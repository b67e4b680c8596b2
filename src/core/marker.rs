//! Tracked ranges (markers).
//!
//! A tracked range is a pair of character offsets that the buffer adjusts on
//! every edit. What happens when text is inserted exactly at one of its edges
//! is decided by its [`Stickiness`]. Ranges live in a slot arena addressed by
//! generation-checked [`MarkerId`]s.

use crate::core::id::MarkerId;

// =============================================================================
// STICKINESS
// =============================================================================

/// Whether a tracked range grows when text is typed at its edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stickiness {
    /// Text typed at either edge ends up inside the range
    #[default]
    AlwaysGrows,
    /// Text typed at either edge ends up outside the range
    NeverGrowsAtEdges,
    /// Only text typed at the start edge ends up inside
    GrowsBefore,
    /// Only text typed at the end edge ends up inside
    GrowsAfter,
}

impl Stickiness {
    /// Start offset stays put when text is inserted at it
    fn start_sticks_to_previous(self) -> bool {
        matches!(self, Stickiness::AlwaysGrows | Stickiness::GrowsBefore)
    }

    /// End offset stays put when text is inserted at it
    fn end_sticks_to_previous(self) -> bool {
        matches!(self, Stickiness::NeverGrowsAtEdges | Stickiness::GrowsBefore)
    }
}

/// Move one marker edge across a replacement of `[start, end)` by
/// `inserted` characters.
fn adjust_offset(
    offset: usize,
    start: usize,
    end: usize,
    inserted: usize,
    sticks_to_previous: bool,
    force_move: bool,
) -> usize {
    if offset < start {
        return offset;
    }
    if offset > end || (offset == end && end > start) {
        return offset - (end - start) + inserted;
    }
    // Inside the replaced text or exactly at an insertion point
    if sticks_to_previous && !force_move {
        start
    } else {
        start + inserted
    }
}

// =============================================================================
// ARENA
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct TrackedOffsets {
    start: usize,
    end: usize,
    stickiness: Stickiness,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    range: Option<TrackedOffsets>,
}

/// Arena of tracked ranges in character-offset space
#[derive(Debug, Default)]
pub(crate) struct TrackedRanges {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl TrackedRanges {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, start: usize, end: usize, stickiness: Stickiness) -> MarkerId {
        let range = TrackedOffsets {
            start: start.min(end),
            end: start.max(end),
            stickiness,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.range = Some(range);
            return MarkerId::new(index, slot.generation);
        }
        self.slots.push(Slot {
            generation: 0,
            range: Some(range),
        });
        MarkerId::new(self.slots.len() - 1, 0)
    }

    pub(crate) fn get(&self, id: MarkerId) -> Option<(usize, usize)> {
        let slot = self.slots.get(id.slot())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.range.map(|r| (r.start, r.end))
    }

    /// Release a marker. Stale or unknown ids are ignored.
    pub(crate) fn remove(&mut self, id: MarkerId) -> bool {
        match self.slots.get_mut(id.slot()) {
            Some(slot) if slot.generation == id.generation && slot.range.is_some() => {
                slot.range = None;
                self.free.push(id.slot());
                true
            }
            _ => false,
        }
    }

    /// Number of live markers
    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.range.is_some()).count()
    }

    /// Adjust every marker for a replacement of `[start, end)` by `inserted` chars
    pub(crate) fn accept_edit(&mut self, start: usize, end: usize, inserted: usize, force_move: bool) {
        for slot in &mut self.slots {
            let Some(range) = slot.range.as_mut() else {
                continue;
            };
            let new_start = adjust_offset(
                range.start,
                start,
                end,
                inserted,
                range.stickiness.start_sticks_to_previous(),
                force_move,
            );
            let new_end = adjust_offset(
                range.end,
                start,
                end,
                inserted,
                range.stickiness.end_sticks_to_previous(),
                force_move,
            );
            range.start = new_start.min(new_end);
            range.end = new_end;
        }
    }

    /// Collapse every marker to the start of the buffer (content flush)
    pub(crate) fn collapse_all(&mut self) {
        for range in self.slots.iter_mut().filter_map(|s| s.range.as_mut()) {
            range.start = 0;
            range.end = 0;
        }
    }
}
