use super::{ElementClass, GenerationCursor, InstanceError};
use crate::math::{Tint, Transform};
use std::ops::Range;

/// One instance: transform plus optional tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceRecord {
    pub transform: Transform,
    pub tint: Option<Tint>,
}

impl InstanceRecord {
    pub fn plain(transform: Transform) -> Self {
        Self {
            transform,
            tint: None,
        }
    }

    pub fn tinted(transform: Transform, tint: Tint) -> Self {
        Self {
            transform,
            tint: Some(tint),
        }
    }
}

impl Default for InstanceRecord {
    fn default() -> Self {
        Self::plain(Transform::IDENTITY)
    }
}

/// Fixed-capacity record storage for a single element class.
pub struct InstanceBuffer {
    class: ElementClass,
    records: Box<[InstanceRecord]>,
    cursor: GenerationCursor,
    refused: usize,
    dirty: bool,
}

impl InstanceBuffer {
    pub fn with_capacity(class: ElementClass, capacity: usize) -> Self {
        Self {
            class,
            records: vec![InstanceRecord::default(); capacity].into_boxed_slice(),
            cursor: GenerationCursor::new(capacity),
            refused: 0,
            dirty: false,
        }
    }

    #[inline]
    pub fn class(&self) -> ElementClass {
        self.class
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cursor.position()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn cursor(&self) -> &GenerationCursor {
        &self.cursor
    }

    pub fn records(&self) -> &[InstanceRecord] {
        &self.records[..self.len()]
    }

    /// Placements dropped because the buffer was full.
    pub fn refused(&self) -> usize {
        self.refused
    }

    pub(crate) fn claim(&mut self, n: usize) -> Option<Range<usize>> {
        self.cursor.claim(n)
    }

    pub(crate) fn write(&mut self, index: usize, record: InstanceRecord) -> Result<(), InstanceError> {
        if index >= self.capacity() {
            return Err(InstanceError::OutOfBounds {
                class: self.class,
                index,
                capacity: self.capacity(),
            });
        }
        if index >= self.len() {
            return Err(InstanceError::Unclaimed {
                class: self.class,
                index,
                cursor: self.len(),
            });
        }
        self.records[index] = record;
        Ok(())
    }

    pub(crate) fn note_refused(&mut self) {
        if self.refused == 0 {
            tracing::debug!(class = %self.class, capacity = self.capacity(), "instance buffer exhausted");
        }
        self.refused += 1;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
