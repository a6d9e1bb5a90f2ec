//! Character record types.
//!
//! The [`Character`] is the root aggregate: raw ability scores, the bonus
//! ledger, active conditions, class levels and the combat bases derived
//! from them. Subsystems read and write it by reference; none of them keep
//! a copy of their own.

use crate::bonus::{BonusEntry, BonusLedger};
use crate::class_data::{ClassLevel, PathfinderClass};
use crate::combat::{self, BaseSaves};
use crate::conditions::ConditionState;
use crate::error::SheetError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Abilities
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    /// Lowercase name, as used in targets and saved files.
    pub fn key(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    /// The bonus ledger target holding bonuses to this score.
    pub fn target(&self) -> String {
        format!("ability_{}", self.key())
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = SheetError;

    /// Accepts full names or abbreviations, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Ability::all()
            .into_iter()
            .find(|a| a.key() == lower || a.abbreviation().eq_ignore_ascii_case(&lower))
            .ok_or_else(|| SheetError::UnknownAbility(s.to_string()))
    }
}

/// Raw ability scores. An ability that was never set is absent, which is
/// distinct from one explicitly set to 10.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityScores {
    scores: BTreeMap<Ability, i32>,
}

impl AbilityScores {
    /// Score of an unset ability.
    pub const DEFAULT_SCORE: i32 = 10;

    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        let mut scores = Self::default();
        for (ability, value) in Ability::all().into_iter().zip([str, dex, con, int, wis, cha]) {
            scores.set(ability, value);
        }
        scores
    }

    /// The stored score, or `None` if it was never set.
    pub fn stored(&self, ability: Ability) -> Option<i32> {
        self.scores.get(&ability).copied()
    }

    /// The stored score, or 10.
    pub fn get(&self, ability: Ability) -> i32 {
        self.stored(ability).unwrap_or(Self::DEFAULT_SCORE)
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        self.scores.insert(ability, value);
    }

    pub fn is_set(&self, ability: Ability) -> bool {
        self.scores.contains_key(&ability)
    }
}

// ============================================================================
// Character
// ============================================================================

/// A character sheet's mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,

    #[serde(default)]
    pub ability_scores: AbilityScores,
    #[serde(default)]
    pub bonuses: BonusLedger,
    #[serde(default)]
    pub conditions: ConditionState,

    // Combat bases
    #[serde(default)]
    pub classes: Vec<ClassLevel>,
    #[serde(default)]
    pub base_attack_bonus: i32,
    #[serde(default)]
    pub base_saves: BaseSaves,

    pub updated_at: DateTime<Utc>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            ability_scores: AbilityScores::default(),
            bonuses: BonusLedger::new(),
            conditions: ConditionState::default(),
            classes: Vec::new(),
            base_attack_bonus: 0,
            base_saves: BaseSaves::default(),
            updated_at: Utc::now(),
        }
    }

    /// Record that the character changed.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Total character level across all classes.
    pub fn level(&self) -> u32 {
        self.classes.iter().map(|c| c.level).sum()
    }
}

/// Create a sample 3rd-level fighter for testing and demos.
///
/// Combat bases are derived from the class levels; equipment bonuses are
/// recorded the way a source-data loader would.
pub fn create_sample_fighter(name: &str) -> Character {
    let mut character = Character::new(name);

    character.ability_scores = AbilityScores::new(16, 14, 14, 10, 12, 8);
    character
        .classes
        .push(ClassLevel::new(PathfinderClass::Fighter, 3));
    combat::initialize_combat(&mut character);

    let ledger = &mut character.bonuses;
    for target in ["armor_class", "flat_footed_ac"] {
        ledger.add(target, BonusEntry::new(6.0, "armor", "Breastplate"));
        ledger.add(target, BonusEntry::new(2.0, "shield", "Heavy Steel Shield"));
    }
    for target in ["armor_class", "touch_ac", "flat_footed_ac", "cmd"] {
        ledger.add(target, BonusEntry::new(1.0, "deflection", "Ring of Protection +1"));
    }
    for save in ["save_fortitude", "save_reflex", "save_will"] {
        ledger.add(save, BonusEntry::new(1.0, "resistance", "Cloak of Resistance +1"));
    }
    ledger.add("melee_attack", BonusEntry::new(1.0, "enhancement", "Longsword +1"));
    ledger.add("initiative", BonusEntry::new(4.0, "untyped", "Improved Initiative"));

    character
}
