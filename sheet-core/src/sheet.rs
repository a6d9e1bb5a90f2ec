//! CharacterSheet - the primary public API for a character's statistics.
//!
//! A sheet owns one [`Character`] and routes every mutation and query
//! through the ledger, ability, condition and combat modules, so all of
//! them see the same state.

use crate::ability::{Abilities, AbilityBreakdown, AbilityProvider};
use crate::bonus::{BonusEntry, BonusLedger, BonusType, DEFAULT_SOURCE};
use crate::character::{Ability, Character};
use crate::combat::{
    self, AcBreakdown, AttackBreakdown, AttackKind, Combat, CombatSummary, SaveBreakdown, SaveKind,
};
use crate::conditions::{
    self, ConditionDefinition, ConditionEngine, ReapplyPolicy, RemovalPolicy,
};
use crate::error::Result;
use crate::stacking::{BonusProvider, Breakdown, Component};
use std::collections::BTreeMap;
use tracing::debug;

/// Configuration for a character sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    /// What re-applying an active condition does.
    pub reapply: ReapplyPolicy,

    /// How removing a condition retracts its effects.
    pub removal: RemovalPolicy,

    /// Source label for bonuses added without one.
    pub default_source: String,
}

impl SheetConfig {
    pub fn new() -> Self {
        Self {
            reapply: ReapplyPolicy::default(),
            removal: RemovalPolicy::default(),
            default_source: DEFAULT_SOURCE.to_string(),
        }
    }

    /// Set the condition re-application policy.
    pub fn with_reapply(mut self, reapply: ReapplyPolicy) -> Self {
        self.reapply = reapply;
        self
    }

    /// Set the condition removal policy.
    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// Set the source label for unattributed bonuses.
    pub fn with_default_source(mut self, source: impl Into<String>) -> Self {
        self.default_source = source.into();
        self
    }

    fn condition_engine(&self) -> ConditionEngine {
        ConditionEngine::new(self.reapply, self.removal)
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A character together with the rules that derive its statistics.
#[derive(Debug, Clone)]
pub struct CharacterSheet {
    character: Character,
    config: SheetConfig,
}

impl CharacterSheet {
    pub fn new(character: Character) -> Self {
        Self::with_config(character, SheetConfig::default())
    }

    pub fn with_config(character: Character, config: SheetConfig) -> Self {
        Self { character, config }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn into_character(self) -> Character {
        self.character
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    // ========================================================================
    // Bonus ledger
    // ========================================================================

    /// Record a bonus against a target.
    pub fn add_bonus(
        &mut self,
        target: &str,
        value: f64,
        bonus_type: impl Into<BonusType>,
        source: impl Into<String>,
    ) {
        let entry = BonusEntry::new(value, bonus_type, source);
        debug!(
            target_name = target,
            value,
            bonus_type = %entry.bonus_type,
            source = %entry.source,
            "bonus added"
        );
        self.character.bonuses.add(target, entry);
        self.character.touch();
    }

    /// Record an untyped bonus from the configured default source.
    pub fn add_untyped_bonus(&mut self, target: &str, value: f64) {
        let source = self.config.default_source.clone();
        self.add_bonus(target, value, BonusType::Untyped, source);
    }

    /// Remove every bonus at `target` from `source`. Returns how many were removed.
    pub fn remove_bonus(&mut self, target: &str, source: &str) -> usize {
        let removed = self.character.bonuses.remove(target, source);
        debug!(target_name = target, source, removed, "bonus removed");
        if removed > 0 {
            self.character.touch();
        }
        removed
    }

    /// Remove every bonus from `source`, whatever its target.
    pub fn remove_bonus_by_source(&mut self, source: &str) -> usize {
        let removed = self.character.bonuses.remove_by_source(source);
        debug!(source, removed, "bonuses removed by source");
        if removed > 0 {
            self.character.touch();
        }
        removed
    }

    pub fn has_bonus(&self, target: &str, source: &str) -> bool {
        self.character.bonuses.has(target, source)
    }

    pub fn breakdown(&self, target: &str) -> Breakdown {
        self.character.bonuses.breakdown(target)
    }

    pub fn total(&self, target: &str) -> f64 {
        self.character.bonuses.calculate_total(target)
    }

    pub fn components(&self, target: &str) -> Vec<Component> {
        self.character.bonuses.components(target)
    }

    /// Breakdown of every target with recorded bonuses.
    pub fn all_bonuses(&self) -> BTreeMap<String, Breakdown> {
        self.character.bonuses.all_breakdowns()
    }

    pub fn ledger(&self) -> &BonusLedger {
        &self.character.bonuses
    }

    // ========================================================================
    // Abilities
    // ========================================================================

    fn abilities(&self) -> Abilities<'_, BonusLedger> {
        Abilities::of(&self.character)
    }

    pub fn set_ability_score(&mut self, ability: Ability, value: i32) {
        debug!(%ability, value, "ability score set");
        crate::ability::set_ability_score(&mut self.character, ability, value);
    }

    /// Set an ability score by name (`"strength"`, `"DEX"`, ...).
    pub fn set_ability_score_by_name(&mut self, name: &str, value: i32) -> Result<()> {
        let ability: Ability = name.parse()?;
        self.set_ability_score(ability, value);
        Ok(())
    }

    /// Apply source-data ability scores, defaulting unset ones to 10.
    pub fn initialize_abilities(&mut self, supplied: impl IntoIterator<Item = (Ability, i32)>) {
        crate::ability::initialize_abilities(&mut self.character, supplied);
    }

    pub fn base_ability_score(&self, ability: Ability) -> i32 {
        self.abilities().base_ability_score(ability)
    }

    pub fn ability_score(&self, ability: Ability) -> f64 {
        self.abilities().ability_score(ability)
    }

    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        self.abilities().ability_modifier(ability)
    }

    pub fn ability_breakdown(&self, ability: Ability) -> AbilityBreakdown {
        self.abilities().breakdown(ability)
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    /// Apply a catalog condition, optionally for a number of rounds.
    pub fn apply_condition(&mut self, name: &str, duration: Option<i32>) -> Result<()> {
        self.config
            .condition_engine()
            .apply(&mut self.character, name, duration)
    }

    /// Remove a condition. Returns whether it was active.
    pub fn remove_condition(&mut self, name: &str) -> bool {
        self.config
            .condition_engine()
            .remove(&mut self.character, name)
    }

    pub fn has_condition(&self, name: &str) -> bool {
        self.character.conditions.contains(name)
    }

    pub fn active_conditions(&self) -> &[String] {
        &self.character.conditions.active
    }

    pub fn condition_effect(&self, name: &str) -> Result<&'static ConditionDefinition> {
        conditions::condition_effect(name)
    }

    /// Advance condition durations by one round, returning the expired ones.
    pub fn update_durations(&mut self) -> Vec<String> {
        self.config
            .condition_engine()
            .update_durations(&mut self.character)
    }

    /// Remove every active condition, returning their names.
    pub fn clear_conditions(&mut self) -> Vec<String> {
        self.config.condition_engine().clear(&mut self.character)
    }

    // ========================================================================
    // Combat
    // ========================================================================

    /// Combat view over the current state.
    pub fn combat(&self) -> Combat<'_, Abilities<'_, BonusLedger>, BonusLedger> {
        Combat::of(&self.character)
    }

    /// Recompute base attack bonus and base saves from class levels.
    pub fn initialize_combat(&mut self) {
        combat::initialize_combat(&mut self.character);
        debug!(
            bab = self.character.base_attack_bonus,
            fortitude = self.character.base_saves.fortitude,
            reflex = self.character.base_saves.reflex,
            will = self.character.base_saves.will,
            "combat bases initialized"
        );
    }

    pub fn armor_class(&self) -> f64 {
        self.combat().armor_class()
    }

    pub fn touch_ac(&self) -> f64 {
        self.combat().touch_ac()
    }

    pub fn flat_footed_ac(&self) -> f64 {
        self.combat().flat_footed_ac()
    }

    pub fn attack_bonus(&self, attack: AttackKind) -> f64 {
        self.combat().attack_bonus(attack)
    }

    /// Attack bonus by name (`"melee"` or `"ranged"`).
    pub fn attack_bonus_by_name(&self, attack: &str) -> Result<f64> {
        let attack: AttackKind = attack.parse()?;
        Ok(self.attack_bonus(attack))
    }

    pub fn saving_throw(&self, save: SaveKind) -> f64 {
        self.combat().saving_throw(save)
    }

    /// Saving throw by name (`"fortitude"`, `"reflex"` or `"will"`).
    pub fn saving_throw_by_name(&self, save: &str) -> Result<f64> {
        let save: SaveKind = save.parse()?;
        Ok(self.saving_throw(save))
    }

    pub fn cmb(&self) -> f64 {
        self.combat().cmb()
    }

    pub fn cmd(&self) -> f64 {
        self.combat().cmd()
    }

    pub fn initiative(&self) -> f64 {
        self.combat().initiative()
    }

    pub fn ac_breakdown(&self) -> AcBreakdown {
        self.combat().ac_breakdown()
    }

    pub fn save_breakdown(&self, save: SaveKind) -> SaveBreakdown {
        self.combat().save_breakdown(save)
    }

    pub fn attack_breakdown(&self, attack: AttackKind) -> AttackBreakdown {
        self.combat().attack_breakdown(attack)
    }

    pub fn combat_summary(&self) -> CombatSummary {
        self.combat().summary()
    }
}
