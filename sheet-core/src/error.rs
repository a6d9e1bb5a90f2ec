//! Error types for sheet operations.
//!
//! Every failure in the rules core is a caller error (a name outside one of
//! the closed catalogs). They are raised before any state is touched, so a
//! rejected operation never leaves a partially applied change behind.

/// Errors raised by sheet operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    /// The condition name is not in the static catalog.
    #[error("Unknown condition: {0}")]
    UnknownCondition(String),

    /// The ability name is not one of the six abilities.
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    /// The save name is not fortitude, reflex or will.
    #[error("Unknown saving throw: {0}")]
    UnknownSave(String),

    /// The attack kind is not melee or ranged.
    #[error("Unknown attack type: {0}")]
    UnknownAttack(String),
}

/// Convenience alias for sheet results.
pub type Result<T> = std::result::Result<T, SheetError>;
