//! The tour boat as a fixed set of parts in the hull's local frame.

use crate::math::{Mat4, Tint, Transform, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// Unit primitive a part is scaled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartShape {
    /// 1×1×1 box centred on the origin.
    Cube,
    /// Unit-diameter, unit-height cylinder along Y.
    Cylinder,
    /// Ring of major radius 0.5 in the XY plane.
    Ring,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePart {
    pub shape: PartShape,
    pub local: Mat4,
    pub tint: Tint,
    pub emissive: bool,
}

#[derive(Debug, Clone)]
pub struct VehicleModel {
    parts: Vec<VehiclePart>,
}

const HULL: Tint = Tint::from_hex(0x3e2723);
const INSIDE: Tint = Tint::from_hex(0x5d4037);
const WOOD: Tint = Tint::from_hex(0x8d6e63);
const GLASS: Tint = Tint::from_hex(0x81d4fa);
const CUSHION: Tint = Tint::from_hex(0x37474f);
const STRIPE: Tint = Tint::from_hex(0x4e342e);
const GLOW: Tint = Tint::from_hex(0xffd54f);
const IRON: Tint = Tint::from_hex(0x1a1a1a);
const FLAG_RED: Tint = Tint::from_hex(0xd32f2f);
const FLAG_WHITE: Tint = Tint::from_hex(0xffffff);
const FLAG_BLACK: Tint = Tint::from_hex(0x111111);

impl VehicleModel {
    /// Glass-roofed canal tour boat centred on the hull origin.
    pub fn tour_boat() -> Self {
        let mut b = Builder::default();

        b.part(
            PartShape::Cylinder,
            Transform::at(Vec3::new(0.0, 0.5, 0.0))
                .with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0))
                .with_scale(Vec3::new(2.6, 9.5, 1.17)),
            HULL,
        );
        b.cube(Vec3::new(0.0, 0.6, 0.0), Vec3::new(2.2, 0.1, 8.0), INSIDE);
        b.cube(Vec3::new(0.0, 2.2, 0.5), Vec3::new(2.0, 0.1, 6.0), WOOD);
        b.cube(Vec3::new(0.0, 2.25, 0.5), Vec3::new(1.8, 0.05, 5.8), GLASS);
        for x in [-1.0, 1.0] {
            b.cube(Vec3::new(x, 1.7, 0.5), Vec3::new(0.05, 1.0, 6.0), GLASS);
            for i in 0..5 {
                let z = -2.0 + i as f32 * 1.2;
                b.cube(Vec3::new(x, 1.4, z), Vec3::new(0.1, 1.6, 0.1), WOOD);
            }
        }
        for z in [3.5, -2.5] {
            b.cube(Vec3::new(0.0, 1.7, z), Vec3::new(2.0, 1.0, 0.05), GLASS);
        }
        for row in 0..6 {
            let z = -2.0 + row as f32 * 0.9;
            for x in [-0.6, 0.6] {
                b.cube(Vec3::new(x, 0.8, z), Vec3::new(0.8, 0.4, 0.5), CUSHION);
                b.cube(Vec3::new(x, 1.1, z + 0.2), Vec3::new(0.8, 0.4, 0.1), CUSHION);
            }
        }
        b.cube(Vec3::new(0.0, 0.8, -3.5), Vec3::new(2.4, 0.1, 1.5), HULL);
        b.part(
            PartShape::Ring,
            Transform::at(Vec3::new(0.0, 1.5, -3.8))
                .with_rotation(Vec3::new(-0.2, 0.0, 0.0))
                .with_uniform_scale(0.6),
            IRON,
        );
        b.cube(Vec3::new(0.0, 0.9, 0.0), Vec3::new(2.9, 0.15, 8.6), STRIPE);
        b.glow(Vec3::new(0.0, 0.9, 4.2), Vec3::new(0.4, 0.2, 0.1));
        b.part(
            PartShape::Cylinder,
            Transform::at(Vec3::new(0.0, 2.7, -3.0)).with_scale(Vec3::new(0.3, 1.0, 0.3)),
            WOOD,
        );
        b.part(
            PartShape::Cylinder,
            Transform::at(Vec3::new(0.0, 2.8, -3.0))
                .with_rotation(Vec3::new(-0.1, 0.0, 0.0))
                .with_scale(Vec3::new(0.04, 1.2, 0.04)),
            IRON,
        );

        // Flag, hung across the pole.
        let flag = Transform::at(Vec3::new(0.0, 3.3, -3.1))
            .with_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0))
            .matrix();
        b.nested(flag, Transform::IDENTITY.with_scale(Vec3::new(0.02, 0.5, 0.8)), FLAG_RED);
        b.nested(flag, Transform::IDENTITY.with_scale(Vec3::new(0.022, 0.16, 0.8)), FLAG_BLACK);
        for i in 0..3 {
            let z = -0.25 + i as f32 * 0.25;
            for tilt in [FRAC_PI_4, -FRAC_PI_4] {
                b.nested(
                    flag,
                    Transform::at(Vec3::new(0.0, 0.0, z))
                        .with_rotation(Vec3::new(tilt, 0.0, 0.0))
                        .with_scale(Vec3::new(0.024, 0.12, 0.03)),
                    FLAG_WHITE,
                );
            }
        }

        Self { parts: b.parts }
    }

    pub fn parts(&self) -> &[VehiclePart] {
        &self.parts
    }

    /// Parts of one shape, for batching into a single draw.
    pub fn parts_of(&self, shape: PartShape) -> impl Iterator<Item = &VehiclePart> + '_ {
        self.parts.iter().filter(move |p| p.shape == shape)
    }

    /// Headlight position in the hull's local space.
    pub fn headlight(&self) -> Option<Vec3> {
        self.parts
            .iter()
            .find(|p| p.emissive)
            .map(|p| p.local.transform_point3(Vec3::ZERO))
    }
}

impl Default for VehicleModel {
    fn default() -> Self {
        Self::tour_boat()
    }
}

#[derive(Default)]
struct Builder {
    parts: Vec<VehiclePart>,
}

impl Builder {
    fn part(&mut self, shape: PartShape, transform: Transform, tint: Tint) {
        self.parts.push(VehiclePart {
            shape,
            local: transform.matrix(),
            tint,
            emissive: false,
        });
    }

    fn cube(&mut self, position: Vec3, size: Vec3, tint: Tint) {
        self.part(PartShape::Cube, Transform::at(position).with_scale(size), tint);
    }

    fn glow(&mut self, position: Vec3, size: Vec3) {
        self.cube(position, size, GLOW);
        if let Some(last) = self.parts.last_mut() {
            last.emissive = true;
        }
    }

    fn nested(&mut self, parent: Mat4, child: Transform, tint: Tint) {
        self.parts.push(VehiclePart {
            shape: PartShape::Cube,
            local: parent * child.matrix(),
            tint,
            emissive: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boat_has_every_part() {
        let model = VehicleModel::tour_boat();
        // hull, chimney, flag pole
        assert_eq!(model.parts_of(PartShape::Cylinder).count(), 3);
        assert_eq!(model.parts_of(PartShape::Ring).count(), 1);
        assert_eq!(model.parts().iter().filter(|p| p.emissive).count(), 1);
        assert_eq!(model.parts().len(), 56);
    }

    #[test]
    fn hull_lies_along_the_travel_axis() {
        let model = VehicleModel::tour_boat();
        let hull = model.parts()[0].local;
        let axis = hull.transform_vector3(Vec3::Y);
        assert!((axis.z.abs() - 9.5).abs() < 1e-4);
        assert!(axis.y.abs() < 1e-4);
    }

    #[test]
    fn headlight_sits_on_the_stripe() {
        let light = VehicleModel::tour_boat().headlight().unwrap();
        assert!((light - Vec3::new(0.0, 0.9, 4.2)).length() < 1e-5);
    }
}
