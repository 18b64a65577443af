//! Data-driven game balance
//!
//! Every per-variant number (size band, speed, steering, palette, body
//! shape) lives in one table so a new fish type is a data change.

use serde::{Deserialize, Serialize};

/// Fish archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Prey,
    Hunter,
    Dasher,
    Titan,
    Viper,
    Player,
}

impl Variant {
    /// Every enemy variant, in table order
    pub const ENEMIES: [Variant; 5] = [
        Variant::Prey,
        Variant::Hunter,
        Variant::Dasher,
        Variant::Titan,
        Variant::Viper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Prey => "prey",
            Variant::Hunter => "hunter",
            Variant::Dasher => "dasher",
            Variant::Titan => "titan",
            Variant::Viper => "viper",
            Variant::Player => "player",
        }
    }

    /// Balance entry for this variant
    pub fn config(&self) -> &'static VariantConfig {
        variant_config(*self)
    }
}

/// Silhouette width along the spine (0 = nose, 1 = tail root)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyProfile {
    /// Round head, fast taper
    Teardrop,
    /// Near-constant width, rounded ends
    Cylinder,
    /// Narrow and pointed at both ends
    Tapered,
    /// Keeps its bulk far back toward the tail
    ThickTailed,
}

impl BodyProfile {
    /// Half-width of the body at spine position `t` as a fraction of size
    pub fn half_width(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let w = match self {
            BodyProfile::Teardrop => {
                let nose = (t / 0.3).min(1.0).sqrt();
                let tail = 1.0 - ((t - 0.3).max(0.0) / 0.7).powf(1.4);
                nose * tail * 0.62
            }
            BodyProfile::Cylinder => {
                let nose = (t / 0.12).min(1.0).sqrt();
                let tail = 1.0 - ((t - 0.75).max(0.0) / 0.25).powi(2) * 0.8;
                nose * tail * 0.32
            }
            BodyProfile::Tapered => (std::f32::consts::PI * t).sin().powf(0.8) * 0.42,
            BodyProfile::ThickTailed => {
                let nose = (t / 0.25).min(1.0).sqrt();
                let tail = 1.0 - ((t - 0.6).max(0.0) / 0.4).powi(3) * 0.75;
                nose * tail * 0.55
            }
        };
        w.max(0.02)
    }
}

/// Caudal fin geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailShape {
    Forked,
    Pointed,
    Fan,
}

/// Rendering parameters for the procedural fish generator
#[derive(Debug, Clone, Copy)]
pub struct BodyShape {
    pub profile: BodyProfile,
    pub tail: TailShape,
    /// Body length as a multiple of size
    pub length: f32,
    /// Swim wave temporal frequency (rad/ms)
    pub wave_frequency: f32,
    /// Swim wave spatial frequency along the spine (rad per body length)
    pub wave_length: f32,
    /// Lateral displacement at the tail as a fraction of size
    pub wave_amplitude: f32,
    /// Dorsal fin height as a fraction of size (0 = none)
    pub dorsal_fin: f32,
    /// Pectoral fin length as a fraction of size
    pub pectoral_fin: f32,
}

/// Per-variant tuning (distances and speeds before scaling)
#[derive(Debug, Clone, Copy)]
pub struct VariantConfig {
    pub variant: Variant,
    /// Spawn size range as a multiple of the player's current size
    pub size_range: (f32, f32),
    /// Cruising speed range (px/tick)
    pub speed_range: (f32, f32),
    /// Chase starts inside this distance (0 = never chases)
    pub detection_radius: f32,
    /// Chase speed multiplier over cruising speed
    pub chase_multiplier: f32,
    /// Velocity blend per tick while chasing
    pub steering: f32,
    /// Flat damage dealt per hit
    pub damage: f32,
    /// Dorsal (dark) and ventral (light) body colors
    pub color: [u8; 3],
    pub belly_color: [u8; 3],
    pub shape: BodyShape,
}

/// Viper weave: perpendicular oscillation layered on pursuit
pub const VIPER_WEAVE_FREQUENCY: f32 = 0.006;
pub const VIPER_WEAVE_AMPLITUDE: f32 = 0.9;

/// Titan suction (before scaling)
pub const TITAN_PULL_RADIUS: f32 = 260.0;
pub const TITAN_PULL_STRENGTH: f32 = 0.9;
pub const TITAN_SHAKE: f32 = 4.0;
/// Wander speed multiplier for titans
pub const TITAN_WANDER_FACTOR: f32 = 0.5;

/// Danger reaches 1.0 this close (before scaling, plus both sizes)
pub const DANGER_INNER_RADIUS: f32 = 80.0;

/// Prey size clamp (before scaling)
pub const PREY_MIN_SIZE: f32 = 10.0;
pub const PREY_MAX_SIZE: f32 = 300.0;

const PREY: VariantConfig = VariantConfig {
    variant: Variant::Prey,
    size_range: (0.3, 0.8),
    speed_range: (1.0, 2.2),
    detection_radius: 0.0,
    chase_multiplier: 1.0,
    steering: 0.05,
    damage: crate::consts::BASE_DAMAGE,
    color: [64, 196, 190],
    belly_color: [236, 226, 120],
    shape: BodyShape {
        profile: BodyProfile::Teardrop,
        tail: TailShape::Fan,
        length: 2.2,
        wave_frequency: 0.012,
        wave_length: 5.0,
        wave_amplitude: 0.22,
        dorsal_fin: 0.35,
        pectoral_fin: 0.35,
    },
};

const HUNTER: VariantConfig = VariantConfig {
    variant: Variant::Hunter,
    size_range: (1.1, 2.0),
    speed_range: (1.8, 2.8),
    detection_radius: 320.0,
    chase_multiplier: 1.0,
    steering: 0.06,
    damage: crate::consts::BASE_DAMAGE,
    color: [178, 44, 52],
    belly_color: [232, 150, 130],
    shape: BodyShape {
        profile: BodyProfile::Tapered,
        tail: TailShape::Forked,
        length: 2.6,
        wave_frequency: 0.009,
        wave_length: 4.0,
        wave_amplitude: 0.18,
        dorsal_fin: 0.55,
        pectoral_fin: 0.45,
    },
};

const DASHER: VariantConfig = VariantConfig {
    variant: Variant::Dasher,
    size_range: (1.0, 1.4),
    speed_range: (3.2, 4.4),
    detection_radius: 280.0,
    chase_multiplier: 1.5,
    steering: 0.12,
    damage: crate::consts::BASE_DAMAGE,
    color: [224, 118, 30],
    belly_color: [250, 210, 150],
    shape: BodyShape {
        profile: BodyProfile::Tapered,
        tail: TailShape::Forked,
        length: 2.9,
        wave_frequency: 0.018,
        wave_length: 3.5,
        wave_amplitude: 0.12,
        dorsal_fin: 0.3,
        pectoral_fin: 0.3,
    },
};

const TITAN: VariantConfig = VariantConfig {
    variant: Variant::Titan,
    size_range: (1.8, 3.0),
    speed_range: (0.8, 1.4),
    detection_radius: 420.0,
    chase_multiplier: 0.9,
    steering: 0.03,
    damage: crate::consts::TITAN_DAMAGE,
    color: [62, 72, 96],
    belly_color: [150, 160, 178],
    shape: BodyShape {
        profile: BodyProfile::ThickTailed,
        tail: TailShape::Fan,
        length: 2.4,
        wave_frequency: 0.005,
        wave_length: 3.0,
        wave_amplitude: 0.1,
        dorsal_fin: 0.45,
        pectoral_fin: 0.55,
    },
};

const VIPER: VariantConfig = VariantConfig {
    variant: Variant::Viper,
    size_range: (1.1, 1.6),
    speed_range: (2.2, 3.0),
    detection_radius: 300.0,
    chase_multiplier: 1.2,
    steering: 0.08,
    damage: crate::consts::BASE_DAMAGE,
    color: [112, 52, 160],
    belly_color: [196, 160, 230],
    shape: BodyShape {
        profile: BodyProfile::Cylinder,
        tail: TailShape::Pointed,
        length: 3.6,
        wave_frequency: 0.01,
        wave_length: 8.0,
        wave_amplitude: 0.35,
        dorsal_fin: 0.15,
        pectoral_fin: 0.0,
    },
};

const PLAYER: VariantConfig = VariantConfig {
    variant: Variant::Player,
    size_range: (1.0, 1.0),
    speed_range: (0.0, 0.0),
    detection_radius: 0.0,
    chase_multiplier: 0.0,
    steering: 0.0,
    damage: 0.0,
    color: [255, 150, 40],
    belly_color: [255, 236, 200],
    shape: BodyShape {
        profile: BodyProfile::Teardrop,
        tail: TailShape::Fan,
        length: 2.3,
        wave_frequency: 0.014,
        wave_length: 5.0,
        wave_amplitude: 0.2,
        dorsal_fin: 0.4,
        pectoral_fin: 0.4,
    },
};

/// Look up the balance entry for a variant
pub fn variant_config(variant: Variant) -> &'static VariantConfig {
    match variant {
        Variant::Prey => &PREY,
        Variant::Hunter => &HUNTER,
        Variant::Dasher => &DASHER,
        Variant::Titan => &TITAN,
        Variant::Viper => &VIPER,
        Variant::Player => &PLAYER,
    }
}

/// Predator branch selection bands (cumulative upper bounds)
pub const PREDATOR_BANDS: [(f32, Variant); 4] = [
    (0.35, Variant::Hunter),
    (0.65, Variant::Dasher),
    (0.85, Variant::Viper),
    (1.0, Variant::Titan),
];

/// Chance a spawn takes the predator branch
pub const PREDATOR_CHANCE: f32 = 0.6;

/// Map a uniform roll in [0, 1) onto the predator bands
pub fn predator_for_roll(roll: f32) -> Variant {
    PREDATOR_BANDS
        .iter()
        .find(|(upper, _)| roll < *upper)
        .map(|(_, v)| *v)
        .unwrap_or(Variant::Titan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_keyed_by_variant() {
        for v in Variant::ENEMIES {
            assert_eq!(v.config().variant, v);
        }
        assert_eq!(Variant::Player.config().variant, Variant::Player);
    }

    #[test]
    fn test_damage_split() {
        assert_eq!(Variant::Titan.config().damage, 60.0);
        for v in [Variant::Prey, Variant::Hunter, Variant::Dasher, Variant::Viper] {
            assert_eq!(v.config().damage, 35.0);
        }
    }

    #[test]
    fn test_predator_bands() {
        assert_eq!(predator_for_roll(0.0), Variant::Hunter);
        assert_eq!(predator_for_roll(0.349), Variant::Hunter);
        assert_eq!(predator_for_roll(0.35), Variant::Dasher);
        assert_eq!(predator_for_roll(0.64), Variant::Dasher);
        assert_eq!(predator_for_roll(0.7), Variant::Viper);
        assert_eq!(predator_for_roll(0.9), Variant::Titan);
        assert_eq!(predator_for_roll(0.9999), Variant::Titan);
    }

    #[test]
    fn test_profiles_stay_positive() {
        for profile in [
            BodyProfile::Teardrop,
            BodyProfile::Cylinder,
            BodyProfile::Tapered,
            BodyProfile::ThickTailed,
        ] {
            for i in 0..=20 {
                let w = profile.half_width(i as f32 / 20.0);
                assert!(w > 0.0 && w < 1.0, "{profile:?} at {i}: {w}");
            }
        }
    }
}
