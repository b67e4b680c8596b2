/// ID-based handle system for buffer-owned tracked ranges
/// The controller only ever holds these opaque handles, never references into the buffer
use std::fmt;

/// Handle to a tracked range (marker) owned by a buffer
///
/// The generation is bumped every time a slot is reused, so a stale handle
/// resolves to nothing instead of to someone else's marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl MarkerId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index as u32,
            generation,
        }
    }

    pub(crate) fn slot(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({}#{})", self.index, self.generation)
    }
}

/// Index of a selection registered with `EditOperationBuilder::track_selection`
/// during a single command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackedSelectionId(pub usize);

impl fmt::Display for TrackedSelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackedSelection({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_id() {
        let id1 = MarkerId::new(0, 0);
        let id2 = MarkerId::new(0, 1);
        assert_ne!(id1, id2);
        assert_eq!(id1.slot(), 0);
        assert_eq!(format!("{}", id2), "Marker(0#1)");
    }

    #[test]
    fn test_tracked_selection_id() {
        let id = TrackedSelectionId(3);
        assert_eq!(format!("{}", id), "TrackedSelection(3)");
    }

    #[test]
    fn test_id_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        let id = MarkerId::new(42, 7);
        map.insert(id, "test");
        assert_eq!(map.get(&id), Some(&"test"));
    }
}
