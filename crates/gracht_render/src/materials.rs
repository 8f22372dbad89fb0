//! Per-class meshes and surface colours

use crate::geometry::{self, Mesh};
use glam::Vec3;
use gracht_core::math::Tint;
use gracht_core::sim::PartShape;
use gracht_core::world::StaticShape;
use gracht_core::ElementClass;
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Tint,
    /// Drawn at full brightness, unaffected by lights and fog.
    pub emissive: bool,
}

impl Material {
    const fn lit(hex: u32) -> Self {
        Self {
            color: Tint::from_hex(hex),
            emissive: false,
        }
    }

    const fn glowing(hex: u32) -> Self {
        Self {
            color: Tint::from_hex(hex),
            emissive: true,
        }
    }
}

pub const SKY: Tint = Tint::from_hex(0x171717);
pub const WATER: Tint = Tint::from_hex(0x0055aa);
pub const WATER_OPACITY: f32 = 0.9;

/// Surface of an instanced class. Tinted classes multiply this by the
/// per-instance colour.
pub fn class_material(class: ElementClass) -> Material {
    use ElementClass::*;
    match class {
        Building | GableDetail | Spout => Material::lit(0xffffff),
        Trim => Material::lit(0xffecb3),
        WindowFrame => Material::lit(0xfff3e0),
        WindowGlassDark => Material::lit(0x0b0f14),
        WindowGlassLit => Material::glowing(0xffb74d),
        Beam | Tree => Material::lit(0x261612),
        TreeCanopy => Material::lit(0x1b3310),
        Pole => Material::lit(0x4a1212),
        LanternPost => Material::lit(0x1a1a1a),
        LanternHead => Material::glowing(0xffd54f),
        StringLight => Material::glowing(0xffca28),
        DockedBoatHull => Material::lit(0x3e2723),
        DockedBoatCover => Material::lit(0x4e342e),
        BicycleWheel | BicycleFrame | BicycleCarrier => Material::lit(0x050505),
        BicycleHandlebar => Material::lit(0xaaaaaa),
        BicycleSaddle => Material::lit(0x3e2723),
    }
}

/// Geometry drawn for every instance of `class`, before the instance
/// transform is applied.
pub fn class_mesh(class: ElementClass) -> Mesh {
    use ElementClass::*;
    match class {
        // Sized entirely by their instance scale.
        Building | GableDetail | Trim => geometry::cuboid(Vec3::ONE),
        Spout => geometry::prism(),
        WindowFrame => geometry::cuboid(Vec3::new(0.8, 1.4, 0.1)),
        WindowGlassDark | WindowGlassLit => {
            let mut mesh = geometry::cuboid(Vec3::new(0.65, 1.25, 0.05));
            // Proud of the frame so it is not hidden inside it.
            for v in &mut mesh.vertices {
                v.position[2] += 0.04;
            }
            mesh
        }
        Beam => geometry::cuboid(Vec3::new(0.1, 0.1, 1.2)),
        Tree => geometry::cylinder(0.15, 0.2, 3.0, 4),
        TreeCanopy => geometry::icosahedron(1.5),
        Pole => geometry::cylinder(0.12, 0.12, 0.8, 4),
        LanternPost => geometry::cylinder(0.1, 0.12, 3.5, 4),
        LanternHead => geometry::cuboid(Vec3::new(0.4, 0.6, 0.4)),
        StringLight => geometry::sphere(0.08, 4, 3),
        DockedBoatHull => geometry::cuboid(Vec3::new(1.6, 0.5, 4.0)),
        DockedBoatCover => geometry::cuboid(Vec3::new(1.4, 0.2, 3.0)),
        BicycleWheel => geometry::torus(0.35, 0.03, 5, 6, TAU),
        BicycleFrame => geometry::cylinder(0.04, 0.04, 1.2, 3),
        BicycleHandlebar => geometry::torus(0.25, 0.02, 3, 3, PI),
        BicycleSaddle => geometry::cuboid(Vec3::new(0.2, 0.08, 0.25)),
        BicycleCarrier => geometry::cuboid(Vec3::new(0.4, 0.02, 0.15)),
    }
}

pub fn static_material(shape: StaticShape) -> Material {
    match shape {
        StaticShape::CanalSurface => Material {
            color: WATER,
            emissive: false,
        },
        StaticShape::QuayEdge => Material::lit(0x3e2723),
        StaticShape::Road => Material::lit(0x5d4037),
    }
}

/// Unit mesh for a static body; its transform scales it to length.
pub fn static_mesh(shape: StaticShape) -> Mesh {
    match shape {
        StaticShape::CanalSurface => geometry::plane(1.0, 1.0, 4, 64),
        StaticShape::QuayEdge | StaticShape::Road => geometry::cuboid(Vec3::ONE),
    }
}

pub fn part_mesh(shape: PartShape) -> Mesh {
    match shape {
        PartShape::Cube => geometry::cuboid(Vec3::ONE),
        PartShape::Cylinder => geometry::cylinder(0.5, 0.5, 1.0, 12),
        PartShape::Ring => geometry::torus(0.5, 0.08, 6, 4, TAU),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_class_has_geometry() {
        for class in ElementClass::ALL {
            assert!(class_mesh(class).vertex_count() > 0, "{class} has no mesh");
        }
    }

    #[test]
    fn tinted_classes_start_white() {
        for class in ElementClass::ALL.into_iter().filter(|c| c.is_tinted()) {
            assert_eq!(class_material(class).color, Tint::WHITE);
            assert!(!class_material(class).emissive);
        }
    }

    #[test]
    fn lights_glow() {
        assert!(class_material(ElementClass::WindowGlassLit).emissive);
        assert!(class_material(ElementClass::StringLight).emissive);
        assert!(!class_material(ElementClass::WindowGlassDark).emissive);
    }
}
