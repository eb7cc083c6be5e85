//! The fixed-size collection of photo slots filled during capture.

use crate::frame::Frame;

/// Ordered slots of optional frames.
///
/// The number of slots is fixed at creation. Every index-taking method
/// panics when the index is outside `0..len()`: an out-of-range slot is
/// a sequencing bug in the caller, not a runtime condition.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoSet {
    slots: Vec<Option<Frame>>,
}

impl PhotoSet {
    /// Create `n` empty slots.
    pub fn new(n: usize) -> Self {
        Self {
            slots: vec![None; n],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store a frame, replacing whatever the slot held.
    pub fn set(&mut self, index: usize, frame: Frame) -> Option<Frame> {
        self.check_index(index);
        self.slots[index].replace(frame)
    }

    /// Empty a slot, returning its previous frame.
    pub fn clear(&mut self, index: usize) -> Option<Frame> {
        self.check_index(index);
        self.slots[index].take()
    }

    /// Empty every slot. The size is unchanged.
    pub fn reset_all(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.check_index(index);
        self.slots[index].as_ref()
    }

    pub fn is_filled(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// True when no slot is empty.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Lowest empty slot, or `None` when complete.
    pub fn first_empty_index(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// All frames in slot order, or `None` if any slot is empty.
    pub fn frames(&self) -> Option<Vec<&Frame>> {
        self.slots.iter().map(Option::as_ref).collect()
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.slots.len(),
            "photo slot {index} out of range (set has {} slots)",
            self.slots.len()
        );
    }
}
