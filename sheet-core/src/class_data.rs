//! Pathfinder class progression data.
//!
//! Base attack bonus and base save progressions for the core classes, used
//! to derive a character's combat bases from its class levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base attack bonus progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BabProgression {
    /// +1 per level.
    Full,
    /// +3 per 4 levels.
    Medium,
    /// +1 per 2 levels.
    Low,
}

impl BabProgression {
    /// Base attack bonus granted by `level` levels in a class.
    pub fn bonus(&self, level: u32) -> i32 {
        let level = u64::from(level);
        let bonus = match self {
            BabProgression::Full => level,
            BabProgression::Medium => level * 3 / 4,
            BabProgression::Low => level / 2,
        };
        clamp_bonus(bonus)
    }
}

/// Base save progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveProgression {
    Good,
    Poor,
}

impl SaveProgression {
    /// Base save granted by `level` levels in a class.
    pub fn bonus(&self, level: u32) -> i32 {
        let level = u64::from(level);
        let bonus = match self {
            SaveProgression::Good => 2 + level / 2,
            SaveProgression::Poor => level / 3,
        };
        clamp_bonus(bonus)
    }
}

fn clamp_bonus(bonus: u64) -> i32 {
    i32::try_from(bonus).unwrap_or(i32::MAX)
}

/// Levels in one class together with its progressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub name: String,
    pub level: u32,
    pub bab: BabProgression,
    pub fortitude: SaveProgression,
    pub reflex: SaveProgression,
    pub will: SaveProgression,
}

impl ClassLevel {
    /// Levels in a core class.
    pub fn new(class: PathfinderClass, level: u32) -> Self {
        let data = class.data();
        Self {
            name: class.name().to_string(),
            level,
            bab: data.bab,
            fortitude: data.fortitude,
            reflex: data.reflex,
            will: data.will,
        }
    }

    /// Levels in a class outside the core list (archetypes, prestige classes).
    pub fn custom(
        name: impl Into<String>,
        level: u32,
        bab: BabProgression,
        [fortitude, reflex, will]: [SaveProgression; 3],
    ) -> Self {
        Self {
            name: name.into(),
            level,
            bab,
            fortitude,
            reflex,
            will,
        }
    }
}

// ============================================================================
// Core Classes
// ============================================================================

/// The Pathfinder core rulebook classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathfinderClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Wizard,
}

/// Progressions for a core class.
pub struct ClassData {
    pub bab: BabProgression,
    pub fortitude: SaveProgression,
    pub reflex: SaveProgression,
    pub will: SaveProgression,
}

impl PathfinderClass {
    pub fn all() -> [PathfinderClass; 11] {
        [
            PathfinderClass::Barbarian,
            PathfinderClass::Bard,
            PathfinderClass::Cleric,
            PathfinderClass::Druid,
            PathfinderClass::Fighter,
            PathfinderClass::Monk,
            PathfinderClass::Paladin,
            PathfinderClass::Ranger,
            PathfinderClass::Rogue,
            PathfinderClass::Sorcerer,
            PathfinderClass::Wizard,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PathfinderClass::Barbarian => "Barbarian",
            PathfinderClass::Bard => "Bard",
            PathfinderClass::Cleric => "Cleric",
            PathfinderClass::Druid => "Druid",
            PathfinderClass::Fighter => "Fighter",
            PathfinderClass::Monk => "Monk",
            PathfinderClass::Paladin => "Paladin",
            PathfinderClass::Ranger => "Ranger",
            PathfinderClass::Rogue => "Rogue",
            PathfinderClass::Sorcerer => "Sorcerer",
            PathfinderClass::Wizard => "Wizard",
        }
    }

    pub fn data(&self) -> ClassData {
        use BabProgression::{Full, Low, Medium};
        use SaveProgression::{Good, Poor};

        let (bab, fortitude, reflex, will) = match self {
            PathfinderClass::Barbarian => (Full, Good, Poor, Poor),
            PathfinderClass::Bard => (Medium, Poor, Good, Good),
            PathfinderClass::Cleric => (Medium, Good, Poor, Good),
            PathfinderClass::Druid => (Medium, Good, Poor, Good),
            PathfinderClass::Fighter => (Full, Good, Poor, Poor),
            PathfinderClass::Monk => (Medium, Good, Good, Good),
            PathfinderClass::Paladin => (Full, Good, Poor, Good),
            PathfinderClass::Ranger => (Full, Good, Good, Poor),
            PathfinderClass::Rogue => (Medium, Poor, Good, Poor),
            PathfinderClass::Sorcerer => (Low, Poor, Poor, Good),
            PathfinderClass::Wizard => (Low, Poor, Poor, Good),
        };

        ClassData {
            bab,
            fortitude,
            reflex,
            will,
        }
    }
}

impl fmt::Display for PathfinderClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
