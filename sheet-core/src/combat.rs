//! Combat statistics.
//!
//! Every statistic is a fixed base plus ability modifiers plus the resolved
//! bonuses of its ledger target:
//!
//! | Statistic      | Formula                                         | Target           |
//! |----------------|-------------------------------------------------|------------------|
//! | Armor class    | 10 + DEX                                        | `armor_class`    |
//! | Touch AC       | 10 + DEX                                        | `touch_ac`       |
//! | Flat-footed AC | 10                                              | `flat_footed_ac` |
//! | Attack         | BAB + STR (melee) or DEX (ranged)               | `<kind>_attack`  |
//! | Saving throw   | base save + CON / DEX / WIS                     | `save_<kind>`    |
//! | CMB            | BAB + STR                                       | `cmb`            |
//! | CMD            | 10 + BAB + STR + DEX                            | `cmd`            |
//! | Initiative     | DEX                                             | `initiative`     |
//!
//! Which bonuses belong on `touch_ac` and `flat_footed_ac` is decided when
//! they are recorded, not here.

use crate::ability::{Abilities, AbilityProvider};
use crate::bonus::BonusLedger;
use crate::character::{Ability, Character};
use crate::class_data::ClassLevel;
use crate::error::SheetError;
use crate::stacking::{BonusProvider, Breakdown};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base of AC and CMD.
const BASE_DEFENSE: f64 = 10.0;

/// Size modifier. Size is not modeled yet, so it is always zero.
const SIZE_MODIFIER: i32 = 0;

// ============================================================================
// Kinds
// ============================================================================

/// The three saving throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    Fortitude,
    Reflex,
    Will,
}

impl SaveKind {
    pub fn all() -> [SaveKind; 3] {
        [SaveKind::Fortitude, SaveKind::Reflex, SaveKind::Will]
    }

    pub fn key(&self) -> &'static str {
        match self {
            SaveKind::Fortitude => "fortitude",
            SaveKind::Reflex => "reflex",
            SaveKind::Will => "will",
        }
    }

    /// The ability whose modifier applies to this save.
    pub fn ability(&self) -> Ability {
        match self {
            SaveKind::Fortitude => Ability::Constitution,
            SaveKind::Reflex => Ability::Dexterity,
            SaveKind::Will => Ability::Wisdom,
        }
    }

    pub fn target(&self) -> String {
        format!("save_{}", self.key())
    }
}

impl fmt::Display for SaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SaveKind {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fortitude" | "fort" => Ok(SaveKind::Fortitude),
            "reflex" | "ref" => Ok(SaveKind::Reflex),
            "will" => Ok(SaveKind::Will),
            _ => Err(SheetError::UnknownSave(s.to_string())),
        }
    }
}

/// Melee or ranged attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    Melee,
    Ranged,
}

impl AttackKind {
    pub fn key(&self) -> &'static str {
        match self {
            AttackKind::Melee => "melee",
            AttackKind::Ranged => "ranged",
        }
    }

    pub fn ability(&self) -> Ability {
        match self {
            AttackKind::Melee => Ability::Strength,
            AttackKind::Ranged => Ability::Dexterity,
        }
    }

    pub fn target(&self) -> String {
        format!("{}_attack", self.key())
    }
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for AttackKind {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "melee" => Ok(AttackKind::Melee),
            "ranged" => Ok(AttackKind::Ranged),
            _ => Err(SheetError::UnknownAttack(s.to_string())),
        }
    }
}

// ============================================================================
// Bases
// ============================================================================

/// Base saving throw values before modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSaves {
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

impl BaseSaves {
    pub fn get(&self, save: SaveKind) -> i32 {
        match save {
            SaveKind::Fortitude => self.fortitude,
            SaveKind::Reflex => self.reflex,
            SaveKind::Will => self.will,
        }
    }

    pub fn set(&mut self, save: SaveKind, value: i32) {
        match save {
            SaveKind::Fortitude => self.fortitude = value,
            SaveKind::Reflex => self.reflex = value,
            SaveKind::Will => self.will = value,
        }
    }
}

/// Base attack bonus summed over class levels.
pub fn base_attack_bonus(classes: &[ClassLevel]) -> i32 {
    classes
        .iter()
        .fold(0, |bab: i32, c| bab.saturating_add(c.bab.bonus(c.level)))
}

/// Base saves summed over class levels.
pub fn base_saves(classes: &[ClassLevel]) -> BaseSaves {
    classes.iter().fold(BaseSaves::default(), |mut saves, c| {
        saves.fortitude = saves.fortitude.saturating_add(c.fortitude.bonus(c.level));
        saves.reflex = saves.reflex.saturating_add(c.reflex.bonus(c.level));
        saves.will = saves.will.saturating_add(c.will.bonus(c.level));
        saves
    })
}

/// Derive the character's base attack bonus and base saves from its classes.
pub fn initialize_combat(character: &mut Character) {
    character.base_attack_bonus = base_attack_bonus(&character.classes);
    character.base_saves = base_saves(&character.classes);
    character.touch();
}

// ============================================================================
// Breakdowns
// ============================================================================

/// Itemized armor class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcBreakdown {
    pub total: f64,
    pub touch: f64,
    pub flat_footed: f64,
    pub base: f64,
    pub dex_modifier: i32,
    pub size_modifier: i32,
    /// Everything not covered by the named parts.
    pub other: f64,
    pub bonuses: Breakdown,
}

/// Itemized saving throw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveBreakdown {
    pub save: SaveKind,
    pub total: f64,
    pub base: i32,
    pub ability: Ability,
    pub ability_modifier: i32,
    pub other: f64,
    pub bonuses: Breakdown,
}

/// Itemized attack bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackBreakdown {
    pub attack: AttackKind,
    pub total: f64,
    pub base_attack_bonus: i32,
    pub ability: Ability,
    pub ability_modifier: i32,
    pub size_modifier: i32,
    pub other: f64,
    pub bonuses: Breakdown,
}

/// Every combat statistic at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSummary {
    pub armor_class: f64,
    pub touch_ac: f64,
    pub flat_footed_ac: f64,
    pub melee_attack: f64,
    pub ranged_attack: f64,
    pub fortitude: f64,
    pub reflex: f64,
    pub will: f64,
    pub cmb: f64,
    pub cmd: f64,
    pub initiative: f64,
}

// ============================================================================
// Combat
// ============================================================================

/// Read-only combat derivation over abilities and bonuses.
pub struct Combat<'a, A: AbilityProvider, B: BonusProvider> {
    base_attack_bonus: i32,
    base_saves: BaseSaves,
    abilities: A,
    bonuses: &'a B,
}

impl<'a, A: AbilityProvider, B: BonusProvider> Combat<'a, A, B> {
    pub fn new(base_attack_bonus: i32, base_saves: BaseSaves, abilities: A, bonuses: &'a B) -> Self {
        Self {
            base_attack_bonus,
            base_saves,
            abilities,
            bonuses,
        }
    }

    fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.ability_modifier(ability)
    }

    fn bab(&self) -> f64 {
        f64::from(self.base_attack_bonus)
    }

    pub fn armor_class(&self) -> f64 {
        BASE_DEFENSE
            + f64::from(self.modifier(Ability::Dexterity))
            + self.bonuses.calculate_total("armor_class")
    }

    pub fn touch_ac(&self) -> f64 {
        BASE_DEFENSE
            + f64::from(self.modifier(Ability::Dexterity))
            + self.bonuses.calculate_total("touch_ac")
    }

    pub fn flat_footed_ac(&self) -> f64 {
        BASE_DEFENSE + self.bonuses.calculate_total("flat_footed_ac")
    }

    pub fn attack_bonus(&self, attack: AttackKind) -> f64 {
        self.bab()
            + f64::from(self.modifier(attack.ability()))
            + self.bonuses.calculate_total(&attack.target())
    }

    pub fn saving_throw(&self, save: SaveKind) -> f64 {
        f64::from(self.base_saves.get(save))
            + f64::from(self.modifier(save.ability()))
            + self.bonuses.calculate_total(&save.target())
    }

    /// Combat maneuver bonus.
    pub fn cmb(&self) -> f64 {
        self.bab() + f64::from(self.modifier(Ability::Strength)) + self.bonuses.calculate_total("cmb")
    }

    /// Combat maneuver defense.
    pub fn cmd(&self) -> f64 {
        BASE_DEFENSE
            + self.bab()
            + f64::from(self.modifier(Ability::Strength))
            + f64::from(self.modifier(Ability::Dexterity))
            + self.bonuses.calculate_total("cmd")
    }

    pub fn initiative(&self) -> f64 {
        f64::from(self.modifier(Ability::Dexterity)) + self.bonuses.calculate_total("initiative")
    }

    pub fn ac_breakdown(&self) -> AcBreakdown {
        let total = self.armor_class();
        let dex_modifier = self.modifier(Ability::Dexterity);
        AcBreakdown {
            total,
            touch: self.touch_ac(),
            flat_footed: self.flat_footed_ac(),
            base: BASE_DEFENSE,
            dex_modifier,
            size_modifier: SIZE_MODIFIER,
            other: total - BASE_DEFENSE - f64::from(dex_modifier) - f64::from(SIZE_MODIFIER),
            bonuses: self.bonuses.breakdown("armor_class"),
        }
    }

    pub fn save_breakdown(&self, save: SaveKind) -> SaveBreakdown {
        let total = self.saving_throw(save);
        let base = self.base_saves.get(save);
        let ability = save.ability();
        let ability_modifier = self.modifier(ability);
        SaveBreakdown {
            save,
            total,
            base,
            ability,
            ability_modifier,
            other: total - f64::from(base) - f64::from(ability_modifier),
            bonuses: self.bonuses.breakdown(&save.target()),
        }
    }

    pub fn attack_breakdown(&self, attack: AttackKind) -> AttackBreakdown {
        let total = self.attack_bonus(attack);
        let ability = attack.ability();
        let ability_modifier = self.modifier(ability);
        AttackBreakdown {
            attack,
            total,
            base_attack_bonus: self.base_attack_bonus,
            ability,
            ability_modifier,
            size_modifier: SIZE_MODIFIER,
            other: total
                - self.bab()
                - f64::from(ability_modifier)
                - f64::from(SIZE_MODIFIER),
            bonuses: self.bonuses.breakdown(&attack.target()),
        }
    }

    pub fn summary(&self) -> CombatSummary {
        CombatSummary {
            armor_class: self.armor_class(),
            touch_ac: self.touch_ac(),
            flat_footed_ac: self.flat_footed_ac(),
            melee_attack: self.attack_bonus(AttackKind::Melee),
            ranged_attack: self.attack_bonus(AttackKind::Ranged),
            fortitude: self.saving_throw(SaveKind::Fortitude),
            reflex: self.saving_throw(SaveKind::Reflex),
            will: self.saving_throw(SaveKind::Will),
            cmb: self.cmb(),
            cmd: self.cmd(),
            initiative: self.initiative(),
        }
    }
}

impl<'a> Combat<'a, Abilities<'a, BonusLedger>, BonusLedger> {
    /// Combat statistics of a character, using its own scores and ledger.
    pub fn of(character: &'a Character) -> Self {
        Self::new(
            character.base_attack_bonus,
            character.base_saves,
            Abilities::of(character),
            &character.bonuses,
        )
    }
}
