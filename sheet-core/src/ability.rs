//! Ability score derivation.
//!
//! An ability's score is its raw base plus the resolved bonuses at the
//! `ability_<name>` target. The modifier is always recomputed from the
//! score, never stored.

use crate::bonus::BonusLedger;
use crate::character::{Ability, AbilityScores, Character};
use crate::stacking::{BonusProvider, Breakdown};
use serde::{Deserialize, Serialize};

/// Modifier for an ability score: `floor((score - 10) / 2)`.
pub fn modifier(score: f64) -> i32 {
    ((score - 10.0) / 2.0).floor() as i32
}

/// Read access to a character's ability scores.
pub trait AbilityProvider {
    /// Raw score before bonuses (10 if unset).
    fn base_ability_score(&self, ability: Ability) -> i32;

    /// Score including resolved bonuses.
    fn ability_score(&self, ability: Ability) -> f64;

    fn ability_modifier(&self, ability: Ability) -> i32 {
        modifier(self.ability_score(ability))
    }
}

/// Itemized ability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityBreakdown {
    pub ability: Ability,
    pub base: i32,
    pub bonuses: Breakdown,
    pub total: f64,
    pub modifier: i32,
}

/// Ability scores combined with a bonus source.
pub struct Abilities<'a, B: BonusProvider> {
    scores: &'a AbilityScores,
    bonuses: &'a B,
}

impl<'a, B: BonusProvider> Abilities<'a, B> {
    pub fn new(scores: &'a AbilityScores, bonuses: &'a B) -> Self {
        Self { scores, bonuses }
    }

    pub fn breakdown(&self, ability: Ability) -> AbilityBreakdown {
        let base = self.base_ability_score(ability);
        let bonuses = self.bonuses.breakdown(&ability.target());
        let total = f64::from(base) + bonuses.total;
        AbilityBreakdown {
            ability,
            base,
            bonuses,
            total,
            modifier: modifier(total),
        }
    }
}

impl<'a> Abilities<'a, BonusLedger> {
    /// Abilities of a character, using its own ledger.
    pub fn of(character: &'a Character) -> Self {
        Self::new(&character.ability_scores, &character.bonuses)
    }
}

impl<B: BonusProvider> AbilityProvider for Abilities<'_, B> {
    fn base_ability_score(&self, ability: Ability) -> i32 {
        self.scores.get(ability)
    }

    fn ability_score(&self, ability: Ability) -> f64 {
        f64::from(self.base_ability_score(ability)) + self.bonuses.calculate_total(&ability.target())
    }
}

/// Write a raw ability score. No range check is applied.
pub fn set_ability_score(character: &mut Character, ability: Ability, value: i32) {
    character.ability_scores.set(ability, value);
    character.touch();
}

/// Fill in ability scores supplied by source data.
///
/// Supplied scores are written as given. Abilities that were neither
/// supplied nor previously set are recorded as 10; previously set scores
/// are kept, including an explicit 10.
pub fn initialize_abilities(
    character: &mut Character,
    supplied: impl IntoIterator<Item = (Ability, i32)>,
) {
    for (ability, value) in supplied {
        character.ability_scores.set(ability, value);
    }
    for ability in Ability::all() {
        if !character.ability_scores.is_set(ability) {
            character
                .ability_scores
                .set(ability, AbilityScores::DEFAULT_SCORE);
        }
    }
    character.touch();
}
