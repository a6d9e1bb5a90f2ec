//! Bonus stacking resolution.
//!
//! Resolves the entries recorded against one target into a total and an
//! itemized list of the components that produced it. Resolution runs in
//! fixed passes:
//!
//! 1. **Typed**: for each typed category, the single highest positive
//!    entry applies. Ties go to the earliest entry.
//! 2. **Automatic Bonus Progression**: the highest positive entry of each
//!    ABP category applies and replaces the component of the typed
//!    category it stands in for.
//! 3. **Untyped**: every untyped entry applies.
//! 4. **Penalties**: every negative entry applies, whatever its type.
//!
//! Entries of any other category (`condition`, unrecognized names) only
//! contribute through the penalty pass.

use crate::bonus::{BonusEntry, BonusLedger, BonusType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One applied bonus in a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub value: f64,
    #[serde(rename = "type")]
    pub bonus_type: BonusType,
    pub source: String,
}

impl From<&BonusEntry> for Component {
    fn from(entry: &BonusEntry) -> Self {
        Self {
            value: entry.value,
            bonus_type: entry.bonus_type.clone(),
            source: entry.source.clone(),
        }
    }
}

/// The resolved value of a target with its contributing components.
///
/// `total` is always `base` plus the sum of the component values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub total: f64,
    pub base: f64,
    pub components: Vec<Component>,
}

impl Breakdown {
    /// Sum of the component values, excluding `base`.
    pub fn component_sum(&self) -> f64 {
        self.components.iter().map(|c| c.value).sum()
    }
}

/// Resolve a target's entries into a breakdown.
pub fn resolve(entries: &[BonusEntry]) -> Breakdown {
    let mut total = 0.0;
    let mut components: Vec<Component> = Vec::new();

    for bonus_type in BonusType::TYPED.iter() {
        if let Some(best) = strongest(entries, bonus_type) {
            total += best.value;
            components.push(Component::from(best));
        }
    }

    for abp_type in BonusType::ABP.iter() {
        let Some(best) = strongest(entries, abp_type) else {
            continue;
        };
        total += best.value;
        components.push(Component::from(best));

        if let Some(ordinary) = abp_type.replaces() {
            if let Some(pos) = components.iter().position(|c| c.bonus_type == ordinary) {
                total -= components.remove(pos).value;
            }
        }
    }

    for entry in entries.iter().filter(|e| e.bonus_type == BonusType::Untyped) {
        total += entry.value;
        components.push(Component::from(entry));
    }

    for entry in entries.iter().filter(|e| e.is_penalty()) {
        total += entry.value;
        components.push(Component::from(entry));
    }

    Breakdown {
        total,
        base: 0.0,
        components,
    }
}

/// The first entry holding the highest value of a category, if positive.
fn strongest<'a>(entries: &'a [BonusEntry], bonus_type: &BonusType) -> Option<&'a BonusEntry> {
    let mut best: Option<&BonusEntry> = None;
    for entry in entries.iter().filter(|e| &e.bonus_type == bonus_type) {
        if best.map_or(true, |b| entry.value > b.value) {
            best = Some(entry);
        }
    }
    best.filter(|b| b.value > 0.0)
}

// ============================================================================
// Bonus Provider
// ============================================================================

/// Anything that can answer "what bonuses apply to this target".
pub trait BonusProvider {
    /// Raw entries recorded against a target.
    fn bonus_entries(&self, target: &str) -> &[BonusEntry];

    fn breakdown(&self, target: &str) -> Breakdown {
        resolve(self.bonus_entries(target))
    }

    fn calculate_total(&self, target: &str) -> f64 {
        self.breakdown(target).total
    }

    /// Applied components for display.
    fn components(&self, target: &str) -> Vec<Component> {
        self.breakdown(target).components
    }
}

impl BonusProvider for BonusLedger {
    fn bonus_entries(&self, target: &str) -> &[BonusEntry] {
        self.entries(target)
    }
}

impl BonusLedger {
    /// Breakdown of every target in the ledger.
    pub fn all_breakdowns(&self) -> BTreeMap<String, Breakdown> {
        self.targets()
            .map(|target| (target.to_string(), self.breakdown(target)))
            .collect()
    }
}
