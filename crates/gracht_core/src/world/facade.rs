//! Procedural façades
//!
//! Walks one side of the canal and lays buildings end to end. Each building
//! gets a body, a hoisting beam, one of three rooflines and a grid of windows,
//! all sharing one tint picked from the palette.

use super::{Part, WorldSpan};
use crate::instance::{ElementClass, InstanceBuffers, InstanceRecord};
use crate::math::{Tint, Transform, Vec3};
use crate::rng::{chance, lerp_range};
use crate::settings::FacadeSettings;
use rand::rngs::StdRng;
use rand::RngExt;
use std::f32::consts::FRAC_PI_2;

const BEAM_DROP: f32 = 0.3;
const BEAM_STANDOFF: f32 = 0.2;
const STEP_TIERS: usize = 3;
const STEP_HEIGHT: f32 = 0.5;
const STEP_SHRINK: f32 = 0.25;
const NECK_WIDTH: f32 = 0.6;
const NECK_HEIGHT: f32 = 1.2;
const SPOUT_HEIGHT: f32 = 1.5;
const WINDOW_SILL: f32 = 0.5;
const WINDOW_STANDOFF: f32 = 0.05;

/// Side of the canal a building row stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Yaw that turns a façade's local +Z toward the canal.
    fn facing(self) -> f32 {
        match self {
            Side::Left => FRAC_PI_2,
            Side::Right => -FRAC_PI_2,
        }
    }
}

/// Roofline treatment, chosen with equal odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Roofline {
    Stepped,
    Neck,
    Spout,
}

impl Roofline {
    fn pick(rng: &mut StdRng) -> Self {
        let roll: f32 = rng.random();
        if roll < 1.0 / 3.0 {
            Roofline::Stepped
        } else if roll < 2.0 / 3.0 {
            Roofline::Neck
        } else {
            Roofline::Spout
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacadeReport {
    pub buildings: usize,
    pub windows: usize,
    pub lit_windows: usize,
    /// Details (beam, roofline pieces, windows) dropped for lack of room.
    pub details_skipped: usize,
}

/// Geometry of one building, fixed before any record is written.
struct Building {
    x: f32,
    z: f32,
    width: f32,
    height: f32,
    tint: Tint,
    side: Side,
}

pub struct FacadeGenerator<'a> {
    span: WorldSpan,
    row_offset: f32,
    settings: &'a FacadeSettings,
}

impl<'a> FacadeGenerator<'a> {
    pub fn new(span: WorldSpan, row_offset: f32, settings: &'a FacadeSettings) -> Self {
        Self {
            span,
            row_offset,
            settings,
        }
    }

    /// Fill one side until the span is covered or the building buffer is full.
    pub fn populate_side(
        &self,
        buffers: &mut InstanceBuffers,
        rng: &mut StdRng,
        side: Side,
    ) -> FacadeReport {
        let s = self.settings;
        let half = self.span.half();
        let mut report = FacadeReport::default();
        let mut cursor = -half;

        for width in self.row_widths(rng) {
            let height = lerp_range(rng, s.height_range.0, s.height_range.1);
            let tint = s.palette[rng.random_range(0..s.palette.len())];
            let building = Building {
                x: side.sign() * self.row_offset,
                z: cursor + width * 0.5,
                width,
                height,
                tint,
                side,
            };

            let body = Transform::at(Vec3::new(building.x, height * 0.5, building.z))
                .with_scale(Vec3::new(s.depth, height, width));
            if !self.place(buffers, &building, &[(ElementClass::Building, body)]) {
                break;
            }
            report.buildings += 1;

            self.beam(buffers, &building, &mut report);
            self.roofline(buffers, rng, &building, &mut report);
            self.windows(buffers, rng, &building, &mut report);

            cursor += width;
        }

        tracing::debug!(?side, buildings = report.buildings, windows = report.windows, "façade row generated");
        report
    }

    /// Widths for one row, each within `width_range`, summing to the span so
    /// the row meets its own next copy.
    ///
    /// Random widths are drawn until the span is covered, then the overshoot
    /// is shaved off every building in proportion to its room above the
    /// minimum. When that room is too small the last draw is dropped and the
    /// rest are widened instead. A span no combination can fill (shorter
    /// than the minimum width, or a fixed width that does not divide it)
    /// trims the last building.
    fn row_widths(&self, rng: &mut StdRng) -> Vec<f32> {
        let (min, max) = self.settings.width_range;
        let length = self.span.length();
        let mut widths = Vec::new();
        let mut sum = 0.0;
        while sum < length {
            let width = lerp_range(rng, min, max);
            widths.push(width);
            sum += width;
        }
        let overshoot = sum - length;

        let slack: f32 = widths.iter().map(|w| w - min).sum();
        if slack > 0.0 && overshoot <= slack {
            for width in &mut widths {
                *width -= overshoot * (*width - min) / slack;
            }
            return widths;
        }

        if let Some(last) = widths.pop() {
            let deficit = last - overshoot;
            let room: f32 = widths.iter().map(|w| max - w).sum();
            if room > 0.0 && deficit <= room {
                for width in &mut widths {
                    *width += deficit * (max - *width) / room;
                }
                return widths;
            }
            widths.push(last);
        }

        if let Some(last) = widths.last_mut() {
            *last -= overshoot;
        }
        widths
    }

    fn place(
        &self,
        buffers: &mut InstanceBuffers,
        building: &Building,
        parts: &[(ElementClass, Transform)],
    ) -> bool {
        let tinted: Vec<Part> = parts
            .iter()
            .map(|&(class, transform)| (class, InstanceRecord::tinted(transform, building.tint)))
            .collect();
        buffers.place_periodic(self.span, &tinted)
    }

    fn place_detail(
        &self,
        buffers: &mut InstanceBuffers,
        building: &Building,
        parts: &[(ElementClass, Transform)],
        report: &mut FacadeReport,
    ) -> bool {
        let placed = self.place(buffers, building, parts);
        if !placed {
            report.details_skipped += 1;
        }
        placed
    }

    fn beam(&self, buffers: &mut InstanceBuffers, b: &Building, report: &mut FacadeReport) {
        let standoff = -b.side.sign() * (self.settings.depth * 0.5 + BEAM_STANDOFF);
        let beam = Transform::at(Vec3::new(b.x + standoff, b.height - BEAM_DROP, b.z))
            .with_rotation(Vec3::new(0.0, b.side.facing(), 0.0));
        self.place_detail(buffers, b, &[(ElementClass::Beam, beam)], report);
    }

    fn roofline(
        &self,
        buffers: &mut InstanceBuffers,
        rng: &mut StdRng,
        b: &Building,
        report: &mut FacadeReport,
    ) {
        let depth = self.settings.depth;
        match Roofline::pick(rng) {
            Roofline::Stepped => {
                for tier in 0..STEP_TIERS {
                    let tier_width = b.width * (1.0 - tier as f32 * STEP_SHRINK);
                    let y = b.height + STEP_HEIGHT * tier as f32 + STEP_HEIGHT * 0.5;
                    let block = Transform::at(Vec3::new(b.x, y, b.z))
                        .with_scale(Vec3::new(depth, STEP_HEIGHT, tier_width));
                    let trim = Transform::at(Vec3::new(b.x, y + STEP_HEIGHT * 0.5 + 0.05, b.z))
                        .with_scale(Vec3::new(depth + 0.05, 0.1, tier_width + 0.1));
                    self.place_detail(buffers, b, &[(ElementClass::GableDetail, block)], report);
                    self.place_detail(buffers, b, &[(ElementClass::Trim, trim)], report);
                }
            }
            Roofline::Neck => {
                let neck_width = b.width * NECK_WIDTH;
                let neck = Transform::at(Vec3::new(b.x, b.height + NECK_HEIGHT * 0.5, b.z))
                    .with_scale(Vec3::new(depth, NECK_HEIGHT, neck_width));
                let trim = Transform::at(Vec3::new(b.x, b.height + NECK_HEIGHT + 0.1, b.z))
                    .with_scale(Vec3::new(depth + 0.1, 0.2, neck_width + 0.2));
                self.place_detail(buffers, b, &[(ElementClass::GableDetail, neck)], report);
                self.place_detail(buffers, b, &[(ElementClass::Trim, trim)], report);
            }
            Roofline::Spout => {
                let spout = Transform::at(Vec3::new(b.x, b.height + SPOUT_HEIGHT * 0.5, b.z))
                    .with_rotation(Vec3::new(0.0, b.side.facing(), 0.0))
                    .with_scale(Vec3::new(b.width, SPOUT_HEIGHT, depth));
                self.place_detail(buffers, b, &[(ElementClass::Spout, spout)], report);
            }
        }
    }

    fn windows(
        &self,
        buffers: &mut InstanceBuffers,
        rng: &mut StdRng,
        b: &Building,
        report: &mut FacadeReport,
    ) {
        let s = self.settings;
        let floors = (b.height / s.floor_height).floor() as usize;
        let columns = (b.width / s.column_pitch).floor() as usize;
        if columns == 0 {
            return;
        }
        let first = -((columns - 1) as f32 * s.column_pitch) * 0.5;
        let face_x = b.x - b.side.sign() * (s.depth * 0.5 + WINDOW_STANDOFF);
        let rotation = Vec3::new(0.0, b.side.facing(), 0.0);

        // Ground floor stays blank.
        for floor in 1..floors {
            let y = floor as f32 * s.floor_height + WINDOW_SILL;
            for column in 0..columns {
                let along = first + column as f32 * s.column_pitch;
                // Both rows read left to right as seen from the water.
                let z = b.z - b.side.sign() * along;
                let lit = chance(rng, s.lit_probability);
                let glass = if lit {
                    ElementClass::WindowGlassLit
                } else {
                    ElementClass::WindowGlassDark
                };
                let transform = Transform::at(Vec3::new(face_x, y, z)).with_rotation(rotation);
                let parts = [(ElementClass::WindowFrame, transform), (glass, transform)];
                if self.place_detail(buffers, b, &parts, report) {
                    report.windows += 1;
                    if lit {
                        report.lit_windows += 1;
                    }
                }
            }
        }
    }
}
