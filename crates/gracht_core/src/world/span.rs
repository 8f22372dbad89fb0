/// Finite generated length `L` of the world along the travel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSpan {
    length: f32,
}

impl WorldSpan {
    pub fn new(length: f32) -> Self {
        debug_assert!(length > 0.0);
        Self { length }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Generation walks `[-L/2, L/2)`.
    #[inline]
    pub fn half(&self) -> f32 {
        self.length * 0.5
    }

    /// Offsets of the three tiled copies, in write order.
    #[inline]
    pub fn copy_offsets(&self) -> [f32; 3] {
        [-self.length, 0.0, self.length]
    }
}
