use serde::{Deserialize, Serialize};

/// Number of element classes (and instance buffers).
pub const CLASS_COUNT: usize = 21;

/// Every kind of generated, instanced scene element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementClass {
    Building,
    GableDetail,
    Trim,
    Spout,
    WindowFrame,
    WindowGlassDark,
    WindowGlassLit,
    Beam,
    Tree,
    TreeCanopy,
    Pole,
    LanternPost,
    LanternHead,
    StringLight,
    DockedBoatHull,
    DockedBoatCover,
    BicycleWheel,
    BicycleFrame,
    BicycleHandlebar,
    BicycleSaddle,
    BicycleCarrier,
}

impl ElementClass {
    pub const ALL: [ElementClass; CLASS_COUNT] = [
        Self::Building,
        Self::GableDetail,
        Self::Trim,
        Self::Spout,
        Self::WindowFrame,
        Self::WindowGlassDark,
        Self::WindowGlassLit,
        Self::Beam,
        Self::Tree,
        Self::TreeCanopy,
        Self::Pole,
        Self::LanternPost,
        Self::LanternHead,
        Self::StringLight,
        Self::DockedBoatHull,
        Self::DockedBoatCover,
        Self::BicycleWheel,
        Self::BicycleFrame,
        Self::BicycleHandlebar,
        Self::BicycleSaddle,
        Self::BicycleCarrier,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Classes that carry a per-instance colour stream on the GPU.
    pub fn is_tinted(self) -> bool {
        matches!(self, Self::Building | Self::GableDetail | Self::Spout)
    }

    /// Record capacity (each tiled placement uses three records).
    pub fn default_capacity(self) -> usize {
        match self {
            Self::Building | Self::Spout | Self::Beam => 1_500,
            Self::GableDetail | Self::Trim => 6_000,
            Self::WindowFrame | Self::WindowGlassDark | Self::WindowGlassLit => 15_000,
            Self::Tree | Self::TreeCanopy => 600,
            Self::Pole => 800,
            Self::LanternPost | Self::LanternHead => 400,
            Self::StringLight => 3_000,
            Self::DockedBoatHull | Self::DockedBoatCover => 60,
            Self::BicycleWheel => 1_600,
            Self::BicycleFrame
            | Self::BicycleHandlebar
            | Self::BicycleSaddle
            | Self::BicycleCarrier => 800,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::GableDetail => "gable_detail",
            Self::Trim => "trim",
            Self::Spout => "spout",
            Self::WindowFrame => "window_frame",
            Self::WindowGlassDark => "window_glass_dark",
            Self::WindowGlassLit => "window_glass_lit",
            Self::Beam => "beam",
            Self::Tree => "tree",
            Self::TreeCanopy => "tree_canopy",
            Self::Pole => "pole",
            Self::LanternPost => "lantern_post",
            Self::LanternHead => "lantern_head",
            Self::StringLight => "string_light",
            Self::DockedBoatHull => "docked_boat_hull",
            Self::DockedBoatCover => "docked_boat_cover",
            Self::BicycleWheel => "bicycle_wheel",
            Self::BicycleFrame => "bicycle_frame",
            Self::BicycleHandlebar => "bicycle_handlebar",
            Self::BicycleSaddle => "bicycle_saddle",
            Self::BicycleCarrier => "bicycle_carrier",
        }
    }
}

impl std::fmt::Display for ElementClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_matches_discriminants() {
        for (i, class) in ElementClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn default_capacities_hold_whole_triples() {
        for class in ElementClass::ALL {
            assert!(class.default_capacity() >= 3, "{class}");
        }
        // Two wheels per bicycle.
        assert_eq!(
            ElementClass::BicycleWheel.default_capacity(),
            2 * ElementClass::BicycleFrame.default_capacity()
        );
    }
}
