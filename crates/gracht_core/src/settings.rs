//! Scene settings
//!
//! Every tunable of the scene, loadable from JSON. Missing fields fall back
//! to the defaults of the shipped canal scene.

use crate::instance::ElementClass;
use crate::math::{Tint, Vec3};
use crate::time::MAX_FRAME_DELTA;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("`{field}` must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` range is inverted ({lo} > {hi})")]
    InvertedRange { field: &'static str, lo: f32, hi: f32 },

    #[error("`{field}` must lie in {expected} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    #[error("capacity of {class} must be at least 3 (got {value})")]
    CapacityTooSmall { class: ElementClass, value: usize },

    #[error("façade palette is empty")]
    EmptyPalette,
}

/// Scene settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub world: WorldSettings,
    pub facade: FacadeSettings,
    pub furniture: FurnitureSettings,
    pub vehicle: VehicleSettings,
    pub camera: CameraSettings,
    pub quality: QualitySettings,
    /// Per-class record capacity overrides.
    pub capacities: BTreeMap<ElementClass, usize>,
    /// Fixed generation seed; a fresh one is drawn per mount when absent.
    pub seed: Option<u64>,
    /// Upper bound on one frame's delta (seconds).
    pub max_frame_delta: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Generated length `L` along the travel axis.
    pub span: f32,
    pub canal_width: f32,
    /// Distance of each building row from the canal centre line.
    pub row_offset: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeSettings {
    pub width_range: (f32, f32),
    pub height_range: (f32, f32),
    pub depth: f32,
    pub floor_height: f32,
    pub column_pitch: f32,
    pub lit_probability: f32,
    pub palette: Vec<Tint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FurnitureSettings {
    pub step: f32,
    pub tree_x: f32,
    pub lantern_x: f32,
    pub bollard_x: f32,
    pub bike_x: f32,
    pub boat_x: f32,
    pub bollard_every: u32,
    pub string_every: u32,
    pub boat_every: u32,
    pub boat_chance: f32,
    pub lights_per_tree: u32,
    pub bikes_per_curb: u32,
    pub catenary_points: u32,
    pub catenary_height: f32,
    pub catenary_sag: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSettings {
    pub max_speed: f32,
    pub accel_factor: f32,
    pub distance_scale: f32,
    /// Speeds below this snap to zero.
    pub speed_epsilon: f32,
    pub start_position: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub offset: Vec3,
    pub lerp: f32,
    pub look_ahead: f32,
    pub look_height: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySettings {
    pub floor: f32,
    /// Ceiling before the device pixel ratio is applied.
    pub max_ratio: f32,
    /// Frame time above which resolution decays (seconds).
    pub slow_frame: f32,
    /// Frame time below which resolution recovers (seconds).
    pub fast_frame: f32,
    pub decay: f32,
    pub recovery: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            world: WorldSettings::default(),
            facade: FacadeSettings::default(),
            furniture: FurnitureSettings::default(),
            vehicle: VehicleSettings::default(),
            camera: CameraSettings::default(),
            quality: QualitySettings::default(),
            capacities: BTreeMap::new(),
            seed: None,
            max_frame_delta: MAX_FRAME_DELTA,
        }
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            span: 600.0,
            canal_width: 12.0,
            row_offset: 16.0,
        }
    }
}

impl Default for FacadeSettings {
    fn default() -> Self {
        Self {
            width_range: (2.0, 3.8),
            height_range: (7.5, 12.0),
            depth: 6.0,
            floor_height: 1.7,
            column_pitch: 1.3,
            lit_probability: 0.5,
            palette: [0x8d3b2d, 0x5d2820, 0x3e1c14, 0x6d4c41, 0x4a2c2a, 0x1a2318]
                .into_iter()
                .map(Tint::from_hex)
                .collect(),
        }
    }
}

impl Default for FurnitureSettings {
    fn default() -> Self {
        Self {
            step: 5.0,
            tree_x: 7.8,
            lantern_x: 6.8,
            bollard_x: 6.4,
            bike_x: 6.2,
            boat_x: 5.4,
            bollard_every: 3,
            string_every: 25,
            boat_every: 15,
            boat_chance: 0.7,
            lights_per_tree: 5,
            bikes_per_curb: 2,
            catenary_points: 16,
            catenary_height: 4.5,
            catenary_sag: 1.5,
        }
    }
}

impl Default for VehicleSettings {
    fn default() -> Self {
        Self {
            max_speed: 2.0,
            accel_factor: 1.0,
            distance_scale: 5.0,
            speed_epsilon: 0.01,
            start_position: 25.0,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 2.4, 7.0),
            lerp: 5.0,
            look_ahead: 20.0,
            look_height: 1.0,
            fov_degrees: 50.0,
            near: 0.1,
            far: 120.0,
        }
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            floor: 0.75,
            max_ratio: 1.25,
            slow_frame: 0.04,
            fast_frame: 0.02,
            decay: 0.99,
            recovery: 0.001,
        }
    }
}

impl SceneSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Record capacity for `class`, honouring overrides.
    pub fn capacity(&self, class: ElementClass) -> usize {
        self.capacities
            .get(&class)
            .copied()
            .unwrap_or_else(|| class.default_capacity())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("world.span", self.world.span)?;
        positive("facade.depth", self.facade.depth)?;
        positive("facade.floor_height", self.facade.floor_height)?;
        positive("facade.column_pitch", self.facade.column_pitch)?;
        positive("furniture.step", self.furniture.step)?;
        positive("vehicle.max_speed", self.vehicle.max_speed)?;
        positive("vehicle.accel_factor", self.vehicle.accel_factor)?;
        positive("vehicle.distance_scale", self.vehicle.distance_scale)?;
        positive("camera.far", self.camera.far)?;
        positive("quality.floor", self.quality.floor)?;
        positive("max_frame_delta", self.max_frame_delta)?;
        ordered("facade.width_range", self.facade.width_range)?;
        ordered("facade.height_range", self.facade.height_range)?;
        positive("facade.width_range", self.facade.width_range.0)?;
        ordered("quality.floor..max_ratio", (self.quality.floor, self.quality.max_ratio))?;
        // Each step must move the ratio toward its bound.
        if self.quality.decay <= 0.0 || self.quality.decay > 1.0 {
            return Err(SettingsError::OutOfRange {
                field: "quality.decay",
                value: self.quality.decay,
                expected: "(0, 1]",
            });
        }
        if self.quality.recovery < 0.0 {
            return Err(SettingsError::OutOfRange {
                field: "quality.recovery",
                value: self.quality.recovery,
                expected: "[0, inf)",
            });
        }
        if self.facade.palette.is_empty() {
            return Err(SettingsError::EmptyPalette);
        }
        for class in ElementClass::ALL {
            let value = self.capacity(class);
            if value < 3 {
                return Err(SettingsError::CapacityTooSmall { class, value });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { field, value })
    }
}

fn ordered(field: &'static str, (lo, hi): (f32, f32)) -> Result<(), SettingsError> {
    if lo <= hi {
        Ok(())
    } else {
        Err(SettingsError::InvertedRange { field, lo, hi })
    }
}
