//! Periodic tiling
//!
//! Each logical placement is written three times, at `-L`, `0` and `+L`, into
//! three consecutive slots of its class buffer. A placement may span several
//! classes (trunk + canopy, the five parts of a bicycle); it is admitted only
//! when every class involved has room for all of its copies.

use super::WorldSpan;
use crate::instance::{ElementClass, InstanceBuffers, InstanceRecord, CLASS_COUNT};

/// Records written per logical placement.
pub const TILE_COPIES: usize = 3;

/// One component of a placement.
pub type Part = (ElementClass, InstanceRecord);

impl InstanceBuffers {
    /// Write all `parts` as tiled triples, or nothing at all.
    ///
    /// Returns `false` (and notes the refusal on every short class) when any
    /// class lacks room for its whole share.
    pub fn place_periodic(&mut self, span: WorldSpan, parts: &[Part]) -> bool {
        let mut demand = [0usize; CLASS_COUNT];
        for (class, _) in parts {
            demand[class.index()] += TILE_COPIES;
        }

        let mut fits = true;
        for class in ElementClass::ALL {
            let need = demand[class.index()];
            if need > 0 && need > self.remaining(class) {
                self.note_refused(class);
                fits = false;
            }
        }
        if !fits {
            return false;
        }

        for &(class, record) in parts {
            let Some(slots) = self.allocate(class, TILE_COPIES) else {
                debug_assert!(false, "{class} lost capacity after the fit check");
                return false;
            };
            for (slot, offset) in slots.zip(span.copy_offsets()) {
                let copy = InstanceRecord {
                    transform: record.transform.shifted_z(offset),
                    tint: record.tint,
                };
                if let Err(err) = self.write(class, slot, copy) {
                    debug_assert!(false, "claimed slot rejected: {err}");
                    return false;
                }
            }
        }
        true
    }
}
