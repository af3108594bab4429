/// Level generator.
///
/// ## Sources:
///   1. Levels 1–3: hand-authored presets (standard basis, then two
///      skewed bases).
///   2. Level 4+: random basis — two vectors of length 2 at independent
///      uniform angles in [0, 2π), target uniform in [-4, 4]².
///
/// Randomness comes only from the `Rng` passed in, so a seeded
/// `Pcg32` replays the same sequence of levels.
///
/// Random bases are never re-rolled: two angles that happen to line up
/// give a parallel basis, and the hint reports it as not representable.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use crate::domain::combination::Basis;

/// Length of every randomly generated basis vector.
pub const RANDOM_BASIS_LENGTH: f64 = 2.0;
/// Random targets lie in [-TARGET_EXTENT, TARGET_EXTENT] per axis.
pub const TARGET_EXTENT: f64 = 4.0;

/// Number of hand-authored levels before random generation takes over.
pub const PRESET_COUNT: u32 = 3;

/// One generated level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDef {
    pub target: DVec2,
    pub basis: Basis,
    pub description: String,
}

struct Preset {
    target: (f64, f64),
    b1: (f64, f64),
    b2: (f64, f64),
    description: &'static str,
}

const PRESETS: [Preset; PRESET_COUNT as usize] = [
    Preset {
        target: (2.0, 3.0),
        b1: (1.0, 0.0),
        b2: (0.0, 1.0),
        description: "Use the standard basis e1, e2\nto reach the target vector!",
    },
    Preset {
        target: (1.0, 3.0),
        b1: (1.0, 1.0),
        b2: (1.0, -1.0),
        description: "Use the new basis v1, v2\nto express the target vector!",
    },
    Preset {
        target: (4.0, 2.0),
        b1: (2.0, 1.0),
        b2: (1.0, 2.0),
        description: "Find the linear combination\nin a different basis!",
    },
];

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Build the level for `level` (1-based; 0 is treated as 1).
pub fn generate_level<R: Rng + ?Sized>(level: u32, rng: &mut R) -> LevelDef {
    let level = level.max(1);
    if level <= PRESET_COUNT {
        preset_level(level)
    } else {
        random_level(level, rng)
    }
}

/// Is `level` one of the hand-authored ones?
pub fn is_preset(level: u32) -> bool {
    (1..=PRESET_COUNT).contains(&level)
}

// ══════════════════════════════════════════════════════════════
// Internals
// ══════════════════════════════════════════════════════════════

fn preset_level(level: u32) -> LevelDef {
    let p = &PRESETS[(level - 1) as usize];
    LevelDef {
        target: DVec2::new(p.target.0, p.target.1),
        basis: Basis::new(DVec2::new(p.b1.0, p.b1.1), DVec2::new(p.b2.0, p.b2.1)),
        description: p.description.to_string(),
    }
}

fn random_level<R: Rng + ?Sized>(level: u32, rng: &mut R) -> LevelDef {
    let angle1 = rng.random_range(0.0..TAU);
    let angle2 = rng.random_range(0.0..TAU);
    let basis = Basis::new(
        RANDOM_BASIS_LENGTH * DVec2::from_angle(angle1),
        RANDOM_BASIS_LENGTH * DVec2::from_angle(angle2),
    );
    let target = DVec2::new(
        rng.random_range(-TARGET_EXTENT..TARGET_EXTENT),
        rng.random_range(-TARGET_EXTENT..TARGET_EXTENT),
    );
    LevelDef {
        target,
        basis,
        description: format!("Level {}\nChallenge a random basis!", level),
    }
}
