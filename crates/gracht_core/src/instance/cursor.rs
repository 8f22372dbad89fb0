use std::ops::Range;

/// Monotonic write index into one fixed-capacity buffer.
///
/// Invariant: `0 <= position <= capacity`. A claim either fits whole or is
/// refused without moving the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationCursor {
    position: usize,
    capacity: usize,
}

impl GenerationCursor {
    pub fn new(capacity: usize) -> Self {
        Self {
            position: 0,
            capacity,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.position
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.position == self.capacity
    }

    #[inline]
    pub fn claim(&mut self, n: usize) -> Option<Range<usize>> {
        let end = self.position.checked_add(n)?;
        if end <= self.capacity {
            let start = self.position;
            self.position = end;
            Some(start..end)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_are_contiguous() {
        let mut cursor = GenerationCursor::new(7);
        assert_eq!(cursor.claim(3), Some(0..3));
        assert_eq!(cursor.claim(3), Some(3..6));
        assert_eq!(cursor.claim(3), None);
        assert_eq!(cursor.position(), 6);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn overflowing_claim_is_refused() {
        let mut cursor = GenerationCursor::new(4);
        assert_eq!(cursor.claim(usize::MAX), None);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.claim(4), Some(0..4));
        assert!(cursor.is_full());
        assert_eq!(cursor.claim(0), Some(4..4));
    }
}
