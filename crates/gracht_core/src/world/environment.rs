//! Static environment: the canal surface and the two quays with their
//! streets. These bodies are not tiled; they are simply long enough to cover
//! every tiled copy of the generated content.

use super::WorldSpan;
use crate::math::{Transform, Vec3};

const QUAY_EDGE_WIDTH: f32 = 0.8;
const QUAY_EDGE_HEIGHT: f32 = 0.6;
const ROAD_WIDTH: f32 = 8.0;
const ROAD_HEIGHT: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticShape {
    /// Subdivided, wave-animated water plane.
    CanalSurface,
    /// Stone quay edge along the water.
    QuayEdge,
    /// Brick street behind the quay edge.
    Road,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBody {
    pub shape: StaticShape,
    /// Unit shape scaled to its final extent.
    pub transform: Transform,
}

pub struct StaticEnvironment {
    bodies: Vec<StaticBody>,
}

impl StaticEnvironment {
    pub fn build(span: WorldSpan, canal_width: f32) -> Self {
        let length = span.length() * 3.0;
        let half_canal = canal_width * 0.5;
        let edge_x = half_canal + QUAY_EDGE_WIDTH * 0.5;
        let road_x = half_canal + QUAY_EDGE_WIDTH + ROAD_WIDTH * 0.5;

        let mut bodies = vec![StaticBody {
            shape: StaticShape::CanalSurface,
            transform: Transform::IDENTITY.with_scale(Vec3::new(canal_width, 1.0, length)),
        }];
        for sign in [-1.0f32, 1.0] {
            bodies.push(StaticBody {
                shape: StaticShape::QuayEdge,
                transform: Transform::at(Vec3::new(sign * edge_x, QUAY_EDGE_HEIGHT * 0.5, 0.0))
                    .with_scale(Vec3::new(QUAY_EDGE_WIDTH, QUAY_EDGE_HEIGHT, length)),
            });
            bodies.push(StaticBody {
                shape: StaticShape::Road,
                transform: Transform::at(Vec3::new(sign * road_x, ROAD_HEIGHT * 0.5, 0.0))
                    .with_scale(Vec3::new(ROAD_WIDTH, ROAD_HEIGHT, length)),
            });
        }
        Self { bodies }
    }

    pub fn bodies(&self) -> &[StaticBody] {
        &self.bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canal_and_two_streets() {
        let env = StaticEnvironment::build(WorldSpan::new(600.0), 12.0);
        let bodies = env.bodies();
        assert_eq!(bodies.len(), 5);
        assert_eq!(
            bodies
                .iter()
                .filter(|b| b.shape == StaticShape::Road)
                .count(),
            2
        );
        let edge = bodies
            .iter()
            .find(|b| b.shape == StaticShape::QuayEdge)
            .unwrap();
        assert!((edge.transform.position.x.abs() - 6.4).abs() < 1e-5);
        let road = bodies.iter().find(|b| b.shape == StaticShape::Road).unwrap();
        assert!((road.transform.position.x.abs() - 10.8).abs() < 1e-5);
    }

    #[test]
    fn bodies_cover_every_tiled_copy() {
        let span = WorldSpan::new(600.0);
        let env = StaticEnvironment::build(span, 12.0);
        for body in env.bodies() {
            assert!(body.transform.scale.z * 0.5 >= span.length() * 1.5);
        }
    }
}
