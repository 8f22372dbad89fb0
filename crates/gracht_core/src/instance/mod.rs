//! Instance Buffer Manager
//!
//! One fixed-capacity record buffer per [`ElementClass`]. Buffers never grow:
//! a claim that does not fit is refused and the caller simply places less.

mod buffer;
mod class;
mod cursor;
mod error;

pub use buffer::{InstanceBuffer, InstanceRecord};
pub use class::{ElementClass, CLASS_COUNT};
pub use cursor::GenerationCursor;
pub use error::InstanceError;

use std::ops::Range;

/// Classes whose GPU data must be (re)uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyUpload {
    pub class: ElementClass,
    /// Colour stream is dirty too (tinted classes only).
    pub colors: bool,
}

/// All instance buffers of the scene, indexed by element class.
pub struct InstanceBuffers {
    buffers: Vec<InstanceBuffer>,
}

impl InstanceBuffers {
    /// Build every buffer with the capacity reported by `capacity_of`.
    pub fn new(mut capacity_of: impl FnMut(ElementClass) -> usize) -> Self {
        Self {
            buffers: ElementClass::ALL
                .iter()
                .map(|&class| InstanceBuffer::with_capacity(class, capacity_of(class)))
                .collect(),
        }
    }

    /// Buffers sized with [`ElementClass::default_capacity`].
    pub fn with_default_capacities() -> Self {
        Self::new(ElementClass::default_capacity)
    }

    #[inline]
    pub fn buffer(&self, class: ElementClass) -> &InstanceBuffer {
        &self.buffers[class.index()]
    }

    #[inline]
    fn buffer_mut(&mut self, class: ElementClass) -> &mut InstanceBuffer {
        &mut self.buffers[class.index()]
    }

    /// Claim `count` consecutive slots, or `None` when the class is full.
    pub fn allocate(&mut self, class: ElementClass, count: usize) -> Option<Range<usize>> {
        self.buffer_mut(class).claim(count)
    }

    /// Write a record into an already claimed slot.
    pub fn write(
        &mut self,
        class: ElementClass,
        index: usize,
        record: InstanceRecord,
    ) -> Result<(), InstanceError> {
        self.buffer_mut(class).write(index, record)
    }

    /// Free slots left in `class`.
    pub fn remaining(&self, class: ElementClass) -> usize {
        self.buffer(class).cursor().remaining()
    }

    /// Written (claimed) records of `class`.
    pub fn len(&self, class: ElementClass) -> usize {
        self.buffer(class).len()
    }

    pub fn capacity(&self, class: ElementClass) -> usize {
        self.buffer(class).capacity()
    }

    pub fn records(&self, class: ElementClass) -> &[InstanceRecord] {
        self.buffer(class).records()
    }

    /// Total records across all classes.
    pub fn total_len(&self) -> usize {
        self.buffers.iter().map(InstanceBuffer::len).sum()
    }

    /// Note that a placement of `class` was dropped for lack of room.
    pub(crate) fn note_refused(&mut self, class: ElementClass) {
        self.buffer_mut(class).note_refused();
    }

    pub fn refused(&self, class: ElementClass) -> usize {
        self.buffer(class).refused()
    }

    /// Flag every buffer for upload. Called once when generation completes.
    pub fn finish_generation(&mut self) {
        for buffer in &mut self.buffers {
            buffer.mark_dirty();
        }
    }

    /// Drain the dirty flags; each flagged buffer is reported exactly once.
    pub fn take_dirty(&mut self) -> Vec<DirtyUpload> {
        self.buffers
            .iter_mut()
            .filter_map(|buffer| {
                buffer.take_dirty().then(|| DirtyUpload {
                    class: buffer.class(),
                    colors: buffer.class().is_tinted(),
                })
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstanceBuffer> {
        self.buffers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Transform, Vec3};

    fn small() -> InstanceBuffers {
        InstanceBuffers::new(|_| 4)
    }

    #[test]
    fn allocate_is_refused_beyond_capacity() {
        let mut buffers = small();
        assert_eq!(buffers.allocate(ElementClass::Tree, 3), Some(0..3));
        assert_eq!(buffers.allocate(ElementClass::Tree, 3), None);
        assert_eq!(buffers.allocate(ElementClass::Tree, 1), Some(3..4));
        assert_eq!(buffers.allocate(ElementClass::Tree, 1), None);
        assert_eq!(buffers.len(ElementClass::Tree), 4);
        // Other classes are untouched.
        assert_eq!(buffers.len(ElementClass::Pole), 0);
    }

    #[test]
    fn write_requires_claimed_slot() {
        let mut buffers = small();
        let record = InstanceRecord::plain(Transform::at(Vec3::ONE));
        assert!(matches!(
            buffers.write(ElementClass::Pole, 0, record),
            Err(InstanceError::Unclaimed { .. })
        ));
        let range = buffers.allocate(ElementClass::Pole, 1).unwrap();
        buffers.write(ElementClass::Pole, range.start, record).unwrap();
        assert_eq!(buffers.records(ElementClass::Pole)[0], record);
        assert!(matches!(
            buffers.write(ElementClass::Pole, 9, record),
            Err(InstanceError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn dirty_flags_drain_once() {
        let mut buffers = small();
        assert!(buffers.take_dirty().is_empty());
        buffers.finish_generation();
        let dirty = buffers.take_dirty();
        assert_eq!(dirty.len(), CLASS_COUNT);
        let building = dirty
            .iter()
            .find(|d| d.class == ElementClass::Building)
            .unwrap();
        assert!(building.colors);
        let pole = dirty.iter().find(|d| d.class == ElementClass::Pole).unwrap();
        assert!(!pole.colors);
        assert!(buffers.take_dirty().is_empty());
    }
}
