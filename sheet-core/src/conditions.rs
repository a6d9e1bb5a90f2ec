//! Condition effects.
//!
//! A condition is a named status from a fixed catalog. Applying one records
//! it as active and injects its effects into the bonus ledger as
//! `condition` entries sourced `"Condition: <name>"`; removing it retracts
//! them. Conditions applied with a duration count down once per round in
//! [`ConditionEngine::update_durations`] and expire at zero.
//!
//! Effects are plain numbers on named targets. Most are deltas; `movement`
//! and `dex_to_ac` are multipliers, which the stacking resolver treats like
//! any other number.
//!
//! Effect targets are condition-level names (`attack`, `saves`,
//! `dexterity`, `ac_melee`) and differ from the targets combat and ability
//! derivation read (`melee_attack`, `save_will`, `ability_dexterity`). Only
//! effects on `armor_class` and `initiative` change a derived statistic;
//! the rest are visible through the ledger and breakdowns of their own
//! targets.

use crate::bonus::{BonusEntry, BonusType};
use crate::character::Character;
use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

// ============================================================================
// Catalog
// ============================================================================

/// A catalog condition and the effects it injects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub effects: &'static [(&'static str, f64)],
}

/// Every condition the engine knows.
pub const CONDITIONS: &[ConditionDefinition] = &[
    ConditionDefinition {
        name: "prone",
        description: "Lying on the ground. Penalty on attacks and to AC against melee attacks, bonus to AC against ranged attacks.",
        effects: &[("ac_melee", -4.0), ("ac_ranged", 4.0), ("attack", -2.0)],
    },
    ConditionDefinition {
        name: "grappled",
        description: "Held by a creature, trap or effect. Cannot move; penalty on attacks, combat maneuvers and Dexterity.",
        effects: &[("attack", -2.0), ("cmb", -2.0), ("dexterity", -4.0)],
    },
    ConditionDefinition {
        name: "entangled",
        description: "Ensnared. Moves at half speed with penalties on attacks and Dexterity.",
        effects: &[("attack", -2.0), ("dexterity", -4.0), ("movement", 0.5)],
    },
    ConditionDefinition {
        name: "blinded",
        description: "Cannot see. Penalty to AC and on Perception checks relying on sight.",
        effects: &[("armor_class", -2.0), ("perception", -4.0)],
    },
    ConditionDefinition {
        name: "deafened",
        description: "Cannot hear. Penalty on initiative and opposed Perception checks.",
        effects: &[("initiative", -4.0), ("perception", -4.0)],
    },
    ConditionDefinition {
        name: "fatigued",
        description: "Tired. Cannot run or charge; penalty to Strength and Dexterity.",
        effects: &[("strength", -2.0), ("dexterity", -2.0)],
    },
    ConditionDefinition {
        name: "exhausted",
        description: "Worn out. Moves at half speed with a heavy penalty to Strength and Dexterity.",
        effects: &[("strength", -6.0), ("dexterity", -6.0), ("movement", 0.5)],
    },
    ConditionDefinition {
        name: "sickened",
        description: "Nauseous. Penalty on attacks, damage, saves, skill checks and ability checks.",
        effects: &[
            ("attack", -2.0),
            ("damage", -2.0),
            ("saves", -2.0),
            ("skills", -2.0),
            ("ability_checks", -2.0),
        ],
    },
    ConditionDefinition {
        name: "frightened",
        description: "Afraid and fleeing. Penalty on attacks, saves, skill checks and ability checks.",
        effects: &[
            ("attack", -2.0),
            ("saves", -2.0),
            ("skills", -2.0),
            ("ability_checks", -2.0),
        ],
    },
    ConditionDefinition {
        name: "flat-footed",
        description: "Not yet acted in combat. Loses Dexterity bonus to AC and CMD.",
        effects: &[("dex_to_ac", 0.0)],
    },
    ConditionDefinition {
        name: "stunned",
        description: "Drops everything held and can take no actions. Penalty to AC and loses Dexterity bonus to AC.",
        effects: &[("armor_class", -2.0), ("dex_to_ac", 0.0)],
    },
];

lazy_static::lazy_static! {
    static ref CATALOG: HashMap<&'static str, &'static ConditionDefinition> =
        CONDITIONS.iter().map(|c| (c.name, c)).collect();
}

/// Look up a catalog condition by name.
pub fn condition_effect(name: &str) -> Result<&'static ConditionDefinition> {
    CATALOG
        .get(name)
        .copied()
        .ok_or_else(|| SheetError::UnknownCondition(name.to_string()))
}

/// Ledger source label for a condition's effects.
pub fn condition_source(name: &str) -> String {
    format!("Condition: {name}")
}

// ============================================================================
// State
// ============================================================================

/// Active conditions of a character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionState {
    /// Active condition names in application order, without duplicates.
    #[serde(default)]
    pub active: Vec<String>,
    /// Remaining rounds for conditions applied with a duration.
    #[serde(default)]
    pub durations: BTreeMap<String, i32>,
}

impl ConditionState {
    pub fn contains(&self, name: &str) -> bool {
        self.active.iter().any(|c| c == name)
    }

    pub fn remaining(&self, name: &str) -> Option<i32> {
        self.durations.get(name).copied()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// What applying an already active condition does to its effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReapplyPolicy {
    /// Inject the effects again; repeated applications accumulate entries.
    #[default]
    Stack,
    /// Retract the previous entries first, the same way removal does, so
    /// under [`RemovalPolicy::AllTargets`] one set of effects remains.
    Refresh,
}

/// How removing a condition retracts its effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Remove the condition's entries from every target.
    #[default]
    AllTargets,
    /// Remove entries only from the literal `"*"` target. Effects on real
    /// targets are left in place; kept for sheets that rely on it.
    LiteralWildcard,
}

/// Applies, removes and expires conditions on a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionEngine {
    pub reapply: ReapplyPolicy,
    pub removal: RemovalPolicy,
}

impl ConditionEngine {
    pub fn new(reapply: ReapplyPolicy, removal: RemovalPolicy) -> Self {
        Self { reapply, removal }
    }

    /// Activate a condition and inject its effects.
    ///
    /// Unknown names fail before anything is changed.
    pub fn apply(&self, character: &mut Character, name: &str, duration: Option<i32>) -> Result<()> {
        let definition = condition_effect(name).inspect_err(|_| {
            warn!(condition = name, "rejected unknown condition");
        })?;
        let source = condition_source(definition.name);

        let already_active = character.conditions.contains(name);
        if already_active {
            if self.reapply == ReapplyPolicy::Refresh {
                self.retract(character, &source);
            }
        } else {
            character.conditions.active.push(name.to_string());
        }
        if let Some(rounds) = duration {
            character.conditions.durations.insert(name.to_string(), rounds);
        }

        for (target, value) in definition.effects {
            character.bonuses.add(
                *target,
                BonusEntry::new(*value, BonusType::Condition, source.clone()),
            );
        }
        character.touch();

        info!(
            condition = name,
            duration = ?duration,
            reapplied = already_active,
            "condition applied"
        );
        Ok(())
    }

    /// Deactivate a condition and retract its effects.
    ///
    /// Returns whether the condition was active.
    pub fn remove(&self, character: &mut Character, name: &str) -> bool {
        let before = character.conditions.active.len();
        character.conditions.active.retain(|c| c != name);
        let was_active = character.conditions.active.len() != before;
        character.conditions.durations.remove(name);

        let retracted = self.retract(character, &condition_source(name));
        character.touch();

        info!(condition = name, was_active, retracted, "condition removed");
        was_active
    }

    fn retract(&self, character: &mut Character, source: &str) -> usize {
        match self.removal {
            RemovalPolicy::AllTargets => character.bonuses.remove_by_source(source),
            RemovalPolicy::LiteralWildcard => character.bonuses.remove("*", source),
        }
    }

    /// Advance every tracked duration by one round.
    ///
    /// Conditions whose duration reaches zero are removed and returned, in
    /// the order they were applied.
    pub fn update_durations(&self, character: &mut Character) -> Vec<String> {
        for rounds in character.conditions.durations.values_mut() {
            *rounds = rounds.saturating_sub(1);
        }

        let mut expired: Vec<String> = character
            .conditions
            .durations
            .iter()
            .filter(|(_, rounds)| **rounds <= 0)
            .map(|(name, _)| name.clone())
            .collect();
        let active = &character.conditions.active;
        expired.sort_by_key(|name| active.iter().position(|a| a == name).unwrap_or(usize::MAX));

        for name in &expired {
            self.remove(character, name);
        }
        if !expired.is_empty() {
            info!(expired = ?expired, "conditions expired");
        } else {
            debug!(
                tracked = character.conditions.durations.len(),
                "durations advanced"
            );
        }
        expired
    }

    /// Remove every active condition.
    pub fn clear(&self, character: &mut Character) -> Vec<String> {
        let active = character.conditions.active.clone();
        for name in &active {
            self.remove(character, name);
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stacking::BonusProvider;

    #[test]
    fn test_catalog_has_every_condition() {
        let names: Vec<_> = CONDITIONS.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "prone",
                "grappled",
                "entangled",
                "blinded",
                "deafened",
                "fatigued",
                "exhausted",
                "sickened",
                "frightened",
                "flat-footed",
                "stunned",
            ]
        );
        for name in names {
            assert_eq!(condition_effect(name).unwrap().name, name);
        }
    }

    #[test]
    fn test_unknown_condition_effect() {
        assert_eq!(
            condition_effect("invisible"),
            Err(SheetError::UnknownCondition("invisible".to_string()))
        );
    }

    #[test]
    fn test_apply_injects_effects() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();

        engine.apply(&mut character, "prone", None).unwrap();

        assert_eq!(character.conditions.active, vec!["prone".to_string()]);
        let attack = character.bonuses.entries("attack");
        assert_eq!(attack.len(), 1);
        assert_eq!(attack[0].value, -2.0);
        assert_eq!(attack[0].bonus_type, BonusType::Condition);
        assert_eq!(attack[0].source, "Condition: prone");
        assert_eq!(character.bonuses.calculate_total("attack"), -2.0);
    }

    #[test]
    fn test_apply_unknown_changes_nothing() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();
        let before = character.clone();

        let err = engine.apply(&mut character, "invisible", Some(3)).unwrap_err();

        assert_eq!(err, SheetError::UnknownCondition("invisible".to_string()));
        assert_eq!(character.bonuses, before.bonuses);
        assert_eq!(character.conditions, before.conditions);
    }

    #[test]
    fn test_stack_policy_duplicates_entries() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();

        engine.apply(&mut character, "sickened", None).unwrap();
        engine.apply(&mut character, "sickened", None).unwrap();

        assert_eq!(character.conditions.active.len(), 1);
        assert_eq!(character.bonuses.entries("attack").len(), 2);
        assert_eq!(character.bonuses.calculate_total("attack"), -4.0);
    }

    #[test]
    fn test_refresh_policy_keeps_one_set() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::new(ReapplyPolicy::Refresh, RemovalPolicy::AllTargets);

        engine.apply(&mut character, "sickened", None).unwrap();
        engine.apply(&mut character, "sickened", Some(2)).unwrap();

        assert_eq!(character.bonuses.entries("attack").len(), 1);
        assert_eq!(character.conditions.remaining("sickened"), Some(2));
    }

    #[test]
    fn test_remove_retracts_from_all_targets() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();
        character
            .bonuses
            .add("attack", BonusEntry::new(1.0, "morale", "Bless"));

        engine.apply(&mut character, "grappled", Some(4)).unwrap();
        assert!(engine.remove(&mut character, "grappled"));

        assert!(!character.conditions.contains("grappled"));
        assert_eq!(character.conditions.remaining("grappled"), None);
        assert!(!character.bonuses.has("attack", "Condition: grappled"));
        assert!(!character.bonuses.has("dexterity", "Condition: grappled"));
        assert!(character.bonuses.has("attack", "Bless"));
    }

    #[test]
    fn test_refresh_follows_removal_policy() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::new(ReapplyPolicy::Refresh, RemovalPolicy::LiteralWildcard);

        engine.apply(&mut character, "sickened", None).unwrap();
        engine.apply(&mut character, "sickened", None).unwrap();

        assert_eq!(character.bonuses.entries("attack").len(), 2);
    }

    #[test]
    fn test_literal_wildcard_removal_leaves_effects() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::new(ReapplyPolicy::Stack, RemovalPolicy::LiteralWildcard);

        engine.apply(&mut character, "prone", None).unwrap();
        engine.remove(&mut character, "prone");

        assert!(!character.conditions.contains("prone"));
        assert!(character.bonuses.has("attack", "Condition: prone"));
    }

    #[test]
    fn test_remove_inactive_condition() {
        let mut character = Character::new("Test");
        assert!(!ConditionEngine::default().remove(&mut character, "prone"));
    }

    #[test]
    fn test_durations_count_down_and_expire() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();
        engine.apply(&mut character, "frightened", Some(2)).unwrap();
        engine.apply(&mut character, "deafened", Some(1)).unwrap();
        engine.apply(&mut character, "prone", None).unwrap();

        assert_eq!(engine.update_durations(&mut character), vec!["deafened"]);
        assert_eq!(character.conditions.remaining("frightened"), Some(1));
        assert!(!character.bonuses.has("initiative", "Condition: deafened"));

        assert_eq!(engine.update_durations(&mut character), vec!["frightened"]);
        assert_eq!(character.conditions.active, vec!["prone".to_string()]);
        assert!(engine.update_durations(&mut character).is_empty());
    }

    #[test]
    fn test_extreme_durations_expire_without_overflow() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();
        engine.apply(&mut character, "prone", Some(i32::MIN)).unwrap();
        engine.apply(&mut character, "blinded", Some(0)).unwrap();
        engine.apply(&mut character, "deafened", Some(i32::MAX)).unwrap();

        assert_eq!(engine.update_durations(&mut character), vec!["prone", "blinded"]);
        assert_eq!(character.conditions.remaining("deafened"), Some(i32::MAX - 1));
        assert!(character.bonuses.has("initiative", "Condition: deafened"));
    }

    #[test]
    fn test_effects_on_unread_targets() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();
        engine.apply(&mut character, "frightened", None).unwrap();

        assert_eq!(character.bonuses.calculate_total("saves"), -2.0);
        assert_eq!(character.bonuses.calculate_total("save_will"), 0.0);
    }

    #[test]
    fn test_expired_in_application_order() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();
        engine.apply(&mut character, "stunned", Some(1)).unwrap();
        engine.apply(&mut character, "blinded", Some(1)).unwrap();

        assert_eq!(
            engine.update_durations(&mut character),
            vec!["stunned", "blinded"]
        );
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut character = Character::new("Test");
        let engine = ConditionEngine::default();
        engine.apply(&mut character, "fatigued", None).unwrap();
        engine.apply(&mut character, "entangled", Some(3)).unwrap();

        assert_eq!(engine.clear(&mut character), vec!["fatigued", "entangled"]);
        assert!(character.conditions.active.is_empty());
        assert!(character.conditions.durations.is_empty());
        assert!(character.bonuses.is_empty());
    }
}
