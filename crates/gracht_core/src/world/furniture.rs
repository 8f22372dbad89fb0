//! Street furniture
//!
//! Walks the span in fixed steps. Odd steps plant a tree pair with a cluster
//! of fairy lights, even steps a lantern pair. On top of that come bollards,
//! parked bicycles, catenary light strings and the odd moored boat.

use super::{Part, WorldSpan};
use crate::instance::{ElementClass, InstanceBuffers, InstanceRecord};
use crate::math::{Transform, Vec3};
use crate::rng::{chance, jitter};
use crate::settings::FurnitureSettings;
use rand::rngs::StdRng;
use rand::RngExt;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

const TRUNK_Y: f32 = 1.5;
const CANOPY_Y: f32 = 4.0;
const TREE_SPREAD: f32 = 2.0;
const LANTERN_POST_Y: f32 = 1.75;
const LANTERN_HEAD_Y: f32 = 3.6;
const BOLLARD_Y: f32 = 0.4;
const BIKE_SPREAD: f32 = 3.0;
const BIKE_LEAN: f32 = 0.4;
const WHEEL_Y: f32 = 0.95;
const HULL_Y: f32 = 0.2;
const COVER_Y: f32 = 0.45;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FurnitureReport {
    pub steps: usize,
    pub trees: usize,
    pub lanterns: usize,
    pub lights: usize,
    pub bollards: usize,
    pub bicycles: usize,
    pub strings: usize,
    pub boats: usize,
}

pub struct FurnitureGenerator<'a> {
    span: WorldSpan,
    settings: &'a FurnitureSettings,
}

impl<'a> FurnitureGenerator<'a> {
    pub fn new(span: WorldSpan, settings: &'a FurnitureSettings) -> Self {
        Self { span, settings }
    }

    pub fn populate(&self, buffers: &mut InstanceBuffers, rng: &mut StdRng) -> FurnitureReport {
        let s = self.settings;
        let half = self.span.half();
        let mut report = FurnitureReport::default();

        loop {
            let z = -half + report.steps as f32 * s.step;
            if z >= half {
                break;
            }
            report.steps += 1;
            let step = report.steps as u32;

            if step % 2 == 1 {
                self.trees(buffers, rng, z, &mut report);
            } else {
                self.lanterns(buffers, z, &mut report);
            }
            if is_due(step, s.bollard_every) {
                self.bollards(buffers, z, &mut report);
            }
            self.bicycles(buffers, rng, z, &mut report);
            if is_due(step, s.string_every) {
                self.catenary(buffers, z, &mut report);
            }
            if is_due(step, s.boat_every) && chance(rng, s.boat_chance) {
                self.docked_boat(buffers, rng, z, &mut report);
            }
        }

        tracing::debug!(?report, "street furniture generated");
        report
    }

    fn place(&self, buffers: &mut InstanceBuffers, parts: &[(ElementClass, Transform)]) -> bool {
        let records: Vec<Part> = parts
            .iter()
            .map(|&(class, transform)| (class, InstanceRecord::plain(transform)))
            .collect();
        buffers.place_periodic(self.span, &records)
    }

    fn light(&self, buffers: &mut InstanceBuffers, at: Vec3, size: f32, report: &mut FurnitureReport) {
        let bulb = Transform::at(at).with_uniform_scale(size);
        if self.place(buffers, &[(ElementClass::StringLight, bulb)]) {
            report.lights += 1;
        }
    }

    fn trees(&self, buffers: &mut InstanceBuffers, rng: &mut StdRng, z: f32, report: &mut FurnitureReport) {
        let s = self.settings;
        for x in [-s.tree_x, s.tree_x] {
            let yaw: f32 = rng.random();
            let trunk = Transform::at(Vec3::new(x, TRUNK_Y, z + rng.random::<f32>() * TREE_SPREAD))
                .with_rotation(Vec3::new(0.0, yaw, 0.0));
            let canopy = Transform::at(Vec3::new(x, CANOPY_Y, z + rng.random::<f32>() * TREE_SPREAD))
                .with_rotation(Vec3::new(0.0, yaw, 0.0))
                .with_scale(Vec3::new(1.0, 1.2, 1.0));
            if !self.place(buffers, &[(ElementClass::Tree, trunk), (ElementClass::TreeCanopy, canopy)]) {
                continue;
            }
            report.trees += 1;

            for _ in 0..s.lights_per_tree {
                let at = Vec3::new(
                    x + jitter(rng, 0.75),
                    3.5 + rng.random::<f32>() * 1.5,
                    z + jitter(rng, 0.75),
                );
                self.light(buffers, at, 0.6, report);
            }
        }
    }

    fn lanterns(&self, buffers: &mut InstanceBuffers, z: f32, report: &mut FurnitureReport) {
        let s = self.settings;
        for x in [-s.lantern_x, s.lantern_x] {
            let post = Transform::at(Vec3::new(x, LANTERN_POST_Y, z));
            let head = Transform::at(Vec3::new(x, LANTERN_HEAD_Y, z));
            if !self.place(buffers, &[(ElementClass::LanternPost, post), (ElementClass::LanternHead, head)]) {
                continue;
            }
            report.lanterns += 1;
            self.light(buffers, Vec3::new(x, LANTERN_HEAD_Y, z), 1.5, report);
        }
    }

    fn bollards(&self, buffers: &mut InstanceBuffers, z: f32, report: &mut FurnitureReport) {
        let s = self.settings;
        for x in [-s.bollard_x, s.bollard_x] {
            if self.place(buffers, &[(ElementClass::Pole, Transform::at(Vec3::new(x, BOLLARD_Y, z)))]) {
                report.bollards += 1;
            }
        }
    }

    fn bicycles(&self, buffers: &mut InstanceBuffers, rng: &mut StdRng, z: f32, report: &mut FurnitureReport) {
        let s = self.settings;
        for x in [-s.bike_x, s.bike_x] {
            for _ in 0..s.bikes_per_curb {
                // A full rack ends all clusters for this step.
                if buffers.remaining(ElementClass::BicycleFrame) < super::TILE_COPIES {
                    return;
                }
                let bz = z + rng.random::<f32>() * BIKE_SPREAD;
                let lean = jitter(rng, BIKE_LEAN);
                if !self.place(buffers, &bicycle(x, bz, lean)) {
                    break;
                }
                report.bicycles += 1;
            }
        }
    }

    fn catenary(&self, buffers: &mut InstanceBuffers, z: f32, report: &mut FurnitureReport) {
        let s = self.settings;
        let n = s.catenary_points.max(2);
        let bulbs: Vec<(ElementClass, Transform)> = (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                let x = -s.tree_x + 2.0 * s.tree_x * t;
                let y = s.catenary_height - (t * PI).sin() * s.catenary_sag;
                (ElementClass::StringLight, Transform::at(Vec3::new(x, y, z)))
            })
            .collect();
        if self.place(buffers, &bulbs) {
            report.strings += 1;
            report.lights += bulbs.len();
        }
    }

    fn docked_boat(&self, buffers: &mut InstanceBuffers, rng: &mut StdRng, z: f32, report: &mut FurnitureReport) {
        let s = self.settings;
        let sign = if chance(rng, 0.5) { -1.0 } else { 1.0 };
        let rotation = Vec3::new(rng.random::<f32>() * 0.1, sign * 0.1, rng.random::<f32>() * 0.1);
        let hull = Transform::at(Vec3::new(sign * s.boat_x, HULL_Y, z)).with_rotation(rotation);
        let cover = Transform::at(Vec3::new(sign * s.boat_x, COVER_Y, z)).with_rotation(rotation);
        if self.place(buffers, &[(ElementClass::DockedBoatHull, hull), (ElementClass::DockedBoatCover, cover)]) {
            report.boats += 1;
        }
    }
}

fn is_due(step: u32, every: u32) -> bool {
    every > 0 && step % every == 0
}

/// The five parts of one parked bicycle (two wheels, frame, handlebar,
/// saddle, carrier), facing along the quay.
fn bicycle(x: f32, z: f32, lean: f32) -> [(ElementClass, Transform); 6] {
    let toward_street = x.signum();
    let yaw = 0.1 * toward_street;
    let wide_yaw = 0.4 * toward_street;
    let part = |y: f32, dz: f32, rotation: Vec3| Transform::at(Vec3::new(x, y, z + dz)).with_rotation(rotation);
    [
        (ElementClass::BicycleWheel, part(WHEEL_Y, -0.45, Vec3::new(lean, yaw, 0.0))),
        (ElementClass::BicycleWheel, part(WHEEL_Y, 0.45, Vec3::new(lean + 0.1, wide_yaw, 0.0))),
        (ElementClass::BicycleFrame, part(1.15, 0.0, Vec3::new(lean + FRAC_PI_4, yaw, 0.0))),
        (ElementClass::BicycleHandlebar, part(1.6, 0.3, Vec3::new(lean - 0.5, wide_yaw, 0.0))),
        (ElementClass::BicycleSaddle, part(1.5, -0.2, Vec3::new(lean, yaw, 0.0))),
        (ElementClass::BicycleCarrier, part(1.35, -0.45, Vec3::new(lean, yaw, FRAC_PI_2))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    fn roomy() -> InstanceBuffers {
        InstanceBuffers::new(|class| class.default_capacity() * 4)
    }

    fn run(buffers: &mut InstanceBuffers, seed: u64) -> FurnitureReport {
        let settings = FurnitureSettings::default();
        let mut rng = create_rng(seed);
        FurnitureGenerator::new(WorldSpan::new(600.0), &settings).populate(buffers, &mut rng)
    }

    #[test]
    fn trees_and_lanterns_alternate() {
        let mut buffers = roomy();
        let report = run(&mut buffers, 4);
        assert_eq!(report.steps, 120);
        assert_eq!(report.trees, 120);
        assert_eq!(report.lanterns, 120);
        assert_eq!(report.bollards, 2 * 40);
        assert_eq!(report.strings, 4);

        // The first step is odd: trees, no lantern at the start of the span.
        let first_lantern = buffers
            .records(ElementClass::LanternPost)
            .iter()
            .map(|r| r.transform.position.z)
            .filter(|z| (-300.0..300.0).contains(z))
            .fold(f32::MAX, f32::min);
        assert_eq!(first_lantern, -295.0);
    }

    #[test]
    fn bicycles_are_whole() {
        let mut buffers = InstanceBuffers::with_default_capacities();
        let report = run(&mut buffers, 9);
        let frames = buffers.len(ElementClass::BicycleFrame);
        assert_eq!(frames, report.bicycles * 3);
        assert_eq!(buffers.len(ElementClass::BicycleWheel), 2 * frames);
        for class in [
            ElementClass::BicycleHandlebar,
            ElementClass::BicycleSaddle,
            ElementClass::BicycleCarrier,
        ] {
            assert_eq!(buffers.len(class), frames);
        }
        // The default rack is smaller than the walk asks for.
        assert_eq!(frames, ElementClass::BicycleFrame.default_capacity() / 3 * 3);
    }

    #[test]
    fn catenary_sags_between_curbs() {
        let mut buffers = roomy();
        let settings = FurnitureSettings {
            lights_per_tree: 0,
            ..FurnitureSettings::default()
        };
        let mut rng = create_rng(2);
        // Thirty steps: lantern lights on even steps plus one string at step 25.
        FurnitureGenerator::new(WorldSpan::new(150.0), &settings).populate(&mut buffers, &mut rng);
        let live: Vec<Vec3> = buffers
            .records(ElementClass::StringLight)
            .chunks(3)
            .map(|copies| copies[1].transform)
            // Lantern bulbs are drawn larger than string bulbs.
            .filter(|t| t.scale.x == 1.0)
            .map(|t| t.position)
            .collect();
        assert_eq!(live.len(), 16);
        let lowest = live.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!((lowest - 3.0).abs() < 0.05);
        assert!((live[0].y - 4.5).abs() < 1e-5);
    }

    #[test]
    fn boats_stay_within_capacity() {
        let mut buffers = InstanceBuffers::new(|class| match class {
            ElementClass::DockedBoatHull | ElementClass::DockedBoatCover => 6,
            _ => 3_000,
        });
        let settings = FurnitureSettings {
            boat_every: 1,
            boat_chance: 1.0,
            ..FurnitureSettings::default()
        };
        let mut rng = create_rng(12);
        let report = FurnitureGenerator::new(WorldSpan::new(600.0), &settings).populate(&mut buffers, &mut rng);
        assert_eq!(report.boats, 2);
        assert_eq!(buffers.len(ElementClass::DockedBoatHull), 6);
        assert_eq!(buffers.len(ElementClass::DockedBoatCover), 6);
        // The rest of the walk carried on.
        assert_eq!(report.lanterns, 120);
    }
}
