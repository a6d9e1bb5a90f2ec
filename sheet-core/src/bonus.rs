//! Bonus entries and the per-character bonus ledger.
//!
//! The ledger maps a target name (`"armor_class"`, `"save_will"`,
//! `"ability_strength"`, ...) to the bonus entries recorded against it, in
//! insertion order. Storage never deduplicates; stacking is applied only
//! when a target is resolved (see [`crate::stacking`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Source label used when a caller does not name one.
pub const DEFAULT_SOURCE: &str = "unknown";

// ============================================================================
// Bonus Types
// ============================================================================

/// The category of a bonus, which decides how it stacks.
///
/// Serialized as its plain string name (`"enhancement"`, `"abp_armor"`,
/// ...). Names outside the known catalogs round-trip through
/// [`BonusType::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BonusType {
    // Typed: only the highest of each type applies.
    Armor,
    Shield,
    Enhancement,
    Deflection,
    Natural,
    Dodge,
    Circumstance,
    Morale,
    Resistance,
    Insight,
    Sacred,
    Profane,

    // Automatic Bonus Progression: replaces the matching typed bonus.
    AbpArmor,
    AbpShield,
    AbpWeapon,
    AbpResistance,
    AbpDeflection,
    AbpNatural,
    AbpEnhancement,

    /// Always stacks.
    #[default]
    Untyped,

    /// Injected by the condition engine.
    Condition,

    /// Any other category, carried verbatim.
    Other(String),
}

impl BonusType {
    /// Typed categories, in resolution order.
    pub const TYPED: [BonusType; 12] = [
        BonusType::Armor,
        BonusType::Shield,
        BonusType::Enhancement,
        BonusType::Deflection,
        BonusType::Natural,
        BonusType::Dodge,
        BonusType::Circumstance,
        BonusType::Morale,
        BonusType::Resistance,
        BonusType::Insight,
        BonusType::Sacred,
        BonusType::Profane,
    ];

    /// Automatic Bonus Progression categories, in resolution order.
    pub const ABP: [BonusType; 7] = [
        BonusType::AbpArmor,
        BonusType::AbpShield,
        BonusType::AbpWeapon,
        BonusType::AbpResistance,
        BonusType::AbpDeflection,
        BonusType::AbpNatural,
        BonusType::AbpEnhancement,
    ];

    pub fn name(&self) -> &str {
        match self {
            BonusType::Armor => "armor",
            BonusType::Shield => "shield",
            BonusType::Enhancement => "enhancement",
            BonusType::Deflection => "deflection",
            BonusType::Natural => "natural",
            BonusType::Dodge => "dodge",
            BonusType::Circumstance => "circumstance",
            BonusType::Morale => "morale",
            BonusType::Resistance => "resistance",
            BonusType::Insight => "insight",
            BonusType::Sacred => "sacred",
            BonusType::Profane => "profane",
            BonusType::AbpArmor => "abp_armor",
            BonusType::AbpShield => "abp_shield",
            BonusType::AbpWeapon => "abp_weapon",
            BonusType::AbpResistance => "abp_resistance",
            BonusType::AbpDeflection => "abp_deflection",
            BonusType::AbpNatural => "abp_natural",
            BonusType::AbpEnhancement => "abp_enhancement",
            BonusType::Untyped => "untyped",
            BonusType::Condition => "condition",
            BonusType::Other(name) => name,
        }
    }

    /// Returns true for categories where only the highest bonus applies.
    pub fn is_typed(&self) -> bool {
        Self::TYPED.contains(self)
    }

    /// Returns true for Automatic Bonus Progression categories.
    pub fn is_abp(&self) -> bool {
        Self::ABP.contains(self)
    }

    /// The ordinary typed category an ABP category replaces.
    ///
    /// `abp_weapon` has no ordinary counterpart in the typed catalog.
    pub fn replaces(&self) -> Option<BonusType> {
        match self {
            BonusType::AbpArmor => Some(BonusType::Armor),
            BonusType::AbpShield => Some(BonusType::Shield),
            BonusType::AbpResistance => Some(BonusType::Resistance),
            BonusType::AbpDeflection => Some(BonusType::Deflection),
            BonusType::AbpNatural => Some(BonusType::Natural),
            BonusType::AbpEnhancement => Some(BonusType::Enhancement),
            _ => None,
        }
    }
}

impl From<&str> for BonusType {
    fn from(name: &str) -> Self {
        match name {
            "armor" => BonusType::Armor,
            "shield" => BonusType::Shield,
            "enhancement" => BonusType::Enhancement,
            "deflection" => BonusType::Deflection,
            "natural" => BonusType::Natural,
            "dodge" => BonusType::Dodge,
            "circumstance" => BonusType::Circumstance,
            "morale" => BonusType::Morale,
            "resistance" => BonusType::Resistance,
            "insight" => BonusType::Insight,
            "sacred" => BonusType::Sacred,
            "profane" => BonusType::Profane,
            "abp_armor" => BonusType::AbpArmor,
            "abp_shield" => BonusType::AbpShield,
            "abp_weapon" => BonusType::AbpWeapon,
            "abp_resistance" => BonusType::AbpResistance,
            "abp_deflection" => BonusType::AbpDeflection,
            "abp_natural" => BonusType::AbpNatural,
            "abp_enhancement" => BonusType::AbpEnhancement,
            "untyped" => BonusType::Untyped,
            "condition" => BonusType::Condition,
            other => BonusType::Other(other.to_string()),
        }
    }
}

impl From<String> for BonusType {
    fn from(name: String) -> Self {
        match BonusType::from(name.as_str()) {
            BonusType::Other(_) => BonusType::Other(name),
            known => known,
        }
    }
}

impl From<BonusType> for String {
    fn from(bonus_type: BonusType) -> Self {
        match bonus_type {
            BonusType::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for BonusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Bonus Entries
// ============================================================================

/// A single modifier recorded against a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusEntry {
    pub value: f64,
    #[serde(rename = "type")]
    pub bonus_type: BonusType,
    pub source: String,
}

impl BonusEntry {
    pub fn new(value: f64, bonus_type: impl Into<BonusType>, source: impl Into<String>) -> Self {
        Self {
            value,
            bonus_type: bonus_type.into(),
            source: source.into(),
        }
    }

    /// An untyped entry from an unnamed source.
    pub fn untyped(value: f64) -> Self {
        Self::new(value, BonusType::Untyped, DEFAULT_SOURCE)
    }

    pub fn is_penalty(&self) -> bool {
        self.value < 0.0
    }
}

// ============================================================================
// Bonus Ledger
// ============================================================================

/// Target name to insertion-ordered bonus entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BonusLedger {
    targets: BTreeMap<String, Vec<BonusEntry>>,
}

impl BonusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to a target, creating the target if needed.
    pub fn add(&mut self, target: impl Into<String>, entry: BonusEntry) {
        self.targets.entry(target.into()).or_default().push(entry);
    }

    /// Remove every entry at `target` whose source equals `source`.
    ///
    /// The target is matched literally. Returns the number of entries
    /// removed; a target left without entries is dropped.
    pub fn remove(&mut self, target: &str, source: &str) -> usize {
        let Some(entries) = self.targets.get_mut(target) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|e| e.source != source);
        let removed = before - entries.len();
        if entries.is_empty() {
            self.targets.remove(target);
        }
        removed
    }

    /// Remove every entry with the given source from all targets.
    pub fn remove_by_source(&mut self, source: &str) -> usize {
        let mut removed = 0;
        for entries in self.targets.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.source != source);
            removed += before - entries.len();
        }
        self.targets.retain(|_, entries| !entries.is_empty());
        removed
    }

    pub fn has(&self, target: &str, source: &str) -> bool {
        self.entries(target).iter().any(|e| e.source == source)
    }

    /// Entries at a target, or an empty slice.
    pub fn entries(&self, target: &str) -> &[BonusEntry] {
        self.targets.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Target names currently present, in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Total number of entries across all targets.
    pub fn len(&self) -> usize {
        self.targets.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
