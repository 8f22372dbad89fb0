//! World generation
//!
//! The finite, tiled stretch of canal: static bodies built once, and the
//! procedural façades and street furniture that fill the instance buffers.

mod environment;
mod facade;
mod furniture;
mod span;
mod tiling;

pub use environment::{StaticBody, StaticEnvironment, StaticShape};
pub use facade::{FacadeGenerator, FacadeReport, Side};
pub use furniture::{FurnitureGenerator, FurnitureReport};
pub use span::WorldSpan;
pub use tiling::{Part, TILE_COPIES};

use crate::instance::InstanceBuffers;
use crate::settings::SceneSettings;
use rand::rngs::StdRng;

/// Totals of one full generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub left: FacadeReport,
    pub right: FacadeReport,
    pub furniture: FurnitureReport,
}

/// Run both generators once over the span and flag every buffer for upload.
pub fn generate(
    buffers: &mut InstanceBuffers,
    settings: &SceneSettings,
    rng: &mut StdRng,
) -> GenerationReport {
    let span = WorldSpan::new(settings.world.span);
    let facade = FacadeGenerator::new(span, settings.world.row_offset, &settings.facade);
    let left = facade.populate_side(buffers, rng, Side::Left);
    let right = facade.populate_side(buffers, rng, Side::Right);
    let furniture = FurnitureGenerator::new(span, &settings.furniture).populate(buffers, rng);
    buffers.finish_generation();

    for buffer in buffers.iter() {
        tracing::debug!(
            class = %buffer.class(),
            records = buffer.len(),
            capacity = buffer.capacity(),
            refused = buffer.refused(),
            "class generated"
        );
    }
    tracing::info!(
        buildings = left.buildings + right.buildings,
        windows = left.windows + right.windows,
        records = buffers.total_len(),
        "world generated"
    );
    GenerationReport {
        left,
        right,
        furniture,
    }
}
