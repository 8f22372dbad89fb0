use crate::instance::ElementClass;
use thiserror::Error;

/// Errors from direct instance-buffer writes.
///
/// Running out of capacity is not one of them: claims are refused with `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("{class} slot {index} is outside capacity {capacity}")]
    OutOfBounds {
        class: ElementClass,
        index: usize,
        capacity: usize,
    },

    #[error("{class} slot {index} has not been claimed (cursor at {cursor})")]
    Unclaimed {
        class: ElementClass,
        index: usize,
        cursor: usize,
    },
}
