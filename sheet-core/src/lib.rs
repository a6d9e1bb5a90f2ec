//! Pathfinder character sheet engine.
//!
//! This crate provides:
//! - A per-character bonus ledger with Pathfinder stacking rules (typed
//!   bonuses don't stack, untyped bonuses and penalties do, Automatic Bonus
//!   Progression replaces its ordinary counterpart)
//! - Ability, saving throw, armor class, attack and combat maneuver
//!   derivation with source-attributed breakdowns
//! - A condition catalog with round-based durations
//! - Versioned JSON persistence of the character record
//!
//! # Quick Start
//!
//! ```ignore
//! use sheet_core::{create_sample_fighter, CharacterSheet};
//!
//! let mut sheet = CharacterSheet::new(create_sample_fighter("Valeros"));
//! sheet.add_bonus("armor_class", 2.0, "natural", "Barkskin");
//! sheet.apply_condition("prone", Some(1))?;
//!
//! println!("AC {}", sheet.armor_class());
//! for component in sheet.components("armor_class") {
//!     println!("  {:+} {} ({})", component.value, component.source, component.bonus_type);
//! }
//! ```

pub mod ability;
pub mod bonus;
pub mod character;
pub mod class_data;
pub mod combat;
pub mod conditions;
pub mod error;
pub mod persist;
pub mod sheet;
pub mod stacking;

// Primary public API
pub use ability::{AbilityBreakdown, AbilityProvider};
pub use bonus::{BonusEntry, BonusLedger, BonusType};
pub use character::{create_sample_fighter, Ability, Character, CharacterId};
pub use class_data::{BabProgression, ClassLevel, PathfinderClass, SaveProgression};
pub use combat::{AttackKind, CombatSummary, SaveKind};
pub use conditions::{ConditionDefinition, ReapplyPolicy, RemovalPolicy};
pub use error::SheetError;
pub use persist::{PersistError, SavedCharacter};
pub use sheet::{CharacterSheet, SheetConfig};
pub use stacking::{BonusProvider, Breakdown, Component};
