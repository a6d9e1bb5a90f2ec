//! Integration tests for the character sheet API.
//!
//! Run with: `cargo test -p sheet-core --test sheet_integration`

use sheet_core::{
    create_sample_fighter, Ability, AttackKind, BonusType, Character, CharacterSheet,
    ClassLevel, PathfinderClass, ReapplyPolicy, RemovalPolicy, SaveKind, SheetConfig,
    SheetError,
};

fn blank_sheet() -> CharacterSheet {
    CharacterSheet::new(Character::new("Test Subject"))
}

// =============================================================================
// Stacking
// =============================================================================

#[test]
fn test_typed_bonuses_take_the_highest() {
    let mut sheet = blank_sheet();
    sheet.add_bonus("t", 2.0, "enhancement", "Ring");
    sheet.add_bonus("t", 1.0, "enhancement", "Cloak");

    let breakdown = sheet.breakdown("t");
    assert_eq!(breakdown.total, 2.0);
    assert_eq!(breakdown.components.len(), 1);
    assert_eq!(breakdown.components[0].source, "Ring");
    assert_eq!(breakdown.components[0].bonus_type, BonusType::Enhancement);
}

#[test]
fn test_abp_overrides_armor() {
    let mut sheet = blank_sheet();
    sheet.add_bonus("t", 2.0, "armor", "Armor+2");
    sheet.add_bonus("t", 3.0, "abp_armor", "ABP Attunement");

    let breakdown = sheet.breakdown("t");
    assert_eq!(breakdown.total, 3.0);
    assert!(!breakdown
        .components
        .iter()
        .any(|c| c.bonus_type == BonusType::Armor));
}

#[test]
fn test_untyped_and_penalties_stack() {
    let mut sheet = blank_sheet();
    sheet.add_bonus("u", 1.0, "untyped", "Trait A");
    sheet.add_bonus("u", 2.0, "untyped", "Feat B");
    sheet.add_bonus("p", -2.0, "morale", "Fear");
    sheet.add_bonus("p", -1.0, "morale", "Sickened");

    assert_eq!(sheet.total("u"), 3.0);
    assert_eq!(sheet.components("u").len(), 2);
    assert_eq!(sheet.total("p"), -3.0);
    assert_eq!(sheet.components("p").len(), 2);
}

#[test]
fn test_reads_are_stable_and_consistent() {
    let mut sheet = CharacterSheet::new(create_sample_fighter("Valeros"));
    sheet.add_bonus("armor_class", -1.0, "dodge", "Cursed Boots");
    sheet.add_bonus("armor_class", 3.0, "abp_deflection", "ABP Deflection");

    for (target, breakdown) in sheet.all_bonuses() {
        assert_eq!(sheet.total(&target), breakdown.total, "target {target}");
        assert_eq!(sheet.breakdown(&target), breakdown, "target {target}");
        assert_eq!(breakdown.total, breakdown.base + breakdown.component_sum());
    }
}

#[test]
fn test_remove_bonus_by_source() {
    let mut sheet = blank_sheet();
    sheet.add_bonus("save_will", 2.0, "morale", "Heroism");
    sheet.add_bonus("melee_attack", 2.0, "morale", "Heroism");
    sheet.add_bonus("melee_attack", 1.0, "luck", "Prayer");

    assert_eq!(sheet.remove_bonus("save_will", "Heroism"), 1);
    assert!(sheet.has_bonus("melee_attack", "Heroism"));

    assert_eq!(sheet.remove_bonus_by_source("Heroism"), 1);
    assert!(!sheet.has_bonus("melee_attack", "Heroism"));
    assert!(sheet.has_bonus("melee_attack", "Prayer"));
}

// =============================================================================
// Abilities
// =============================================================================

#[test]
fn test_ability_modifiers() {
    let mut sheet = blank_sheet();
    for (score, expected) in [(16, 3), (10, 0), (7, -2), (9, -1)] {
        sheet.set_ability_score(Ability::Intelligence, score);
        assert_eq!(sheet.ability_modifier(Ability::Intelligence), expected);
    }
}

#[test]
fn test_ability_bonus_target() {
    let mut sheet = blank_sheet();
    sheet.set_ability_score(Ability::Constitution, 13);
    sheet.add_bonus("ability_constitution", 2.0, "enhancement", "Bear's Endurance");

    let breakdown = sheet.ability_breakdown(Ability::Constitution);
    assert_eq!(breakdown.base, 13);
    assert_eq!(breakdown.total, 15.0);
    assert_eq!(breakdown.modifier, 2);
    assert_eq!(sheet.saving_throw(SaveKind::Fortitude), 2.0);
}

#[test]
fn test_initialize_abilities_respects_explicit_ten() {
    let mut sheet = blank_sheet();
    sheet.set_ability_score(Ability::Charisma, 10);
    sheet.initialize_abilities([(Ability::Strength, 14)]);

    assert_eq!(sheet.base_ability_score(Ability::Strength), 14);
    assert_eq!(sheet.base_ability_score(Ability::Charisma), 10);
    assert_eq!(sheet.base_ability_score(Ability::Dexterity), 10);
}

// =============================================================================
// Conditions
// =============================================================================

#[test]
fn test_apply_prone() {
    let mut sheet = blank_sheet();
    sheet.apply_condition("prone", None).unwrap();

    assert!(sheet.has_condition("prone"));
    assert!(sheet.active_conditions().contains(&"prone".to_string()));
    let components = sheet.components("attack");
    assert!(components
        .iter()
        .any(|c| c.source == "Condition: prone" && c.value == -2.0));
}

#[test]
fn test_unknown_condition_leaves_ledger_untouched() {
    let mut sheet = CharacterSheet::new(create_sample_fighter("Valeros"));
    let before = sheet.ledger().clone();

    let result = sheet.apply_condition("invisible", None);

    assert_eq!(
        result,
        Err(SheetError::UnknownCondition("invisible".to_string()))
    );
    assert_eq!(sheet.ledger(), &before);
    assert!(sheet.active_conditions().is_empty());
    assert!(sheet.condition_effect("invisible").is_err());
}

#[test]
fn test_condition_lifecycle_through_rounds() {
    let mut sheet = CharacterSheet::new(create_sample_fighter("Valeros"));
    let initiative = sheet.initiative();

    sheet.apply_condition("deafened", Some(2)).unwrap();
    assert_eq!(sheet.initiative(), initiative - 4.0);

    assert!(sheet.update_durations().is_empty());
    assert_eq!(sheet.update_durations(), vec!["deafened".to_string()]);
    assert!(!sheet.has_condition("deafened"));
    assert_eq!(sheet.initiative(), initiative);
}

#[test]
fn test_legacy_wildcard_removal() {
    let config = SheetConfig::new()
        .with_reapply(ReapplyPolicy::Stack)
        .with_removal(RemovalPolicy::LiteralWildcard);
    let mut sheet = CharacterSheet::with_config(Character::new("Legacy"), config);

    sheet.apply_condition("blinded", None).unwrap();
    assert!(sheet.remove_condition("blinded"));

    assert!(!sheet.has_condition("blinded"));
    assert_eq!(sheet.armor_class(), 8.0);
}

#[test]
fn test_condition_effect_lookup() {
    let sheet = blank_sheet();
    let entangled = sheet.condition_effect("entangled").unwrap();
    assert!(entangled.effects.contains(&("movement", 0.5)));
}

// =============================================================================
// Combat
// =============================================================================

#[test]
fn test_melee_attack_from_parts() {
    let mut character = Character::new("Brute");
    character.ability_scores.set(Ability::Strength, 14);
    character.base_attack_bonus = 5;
    let sheet = CharacterSheet::new(character);

    assert_eq!(sheet.attack_bonus(AttackKind::Melee), 7.0);
}

#[test]
fn test_initialize_combat_from_classes() {
    let mut character = Character::new("Multiclass");
    character
        .classes
        .push(ClassLevel::new(PathfinderClass::Cleric, 5));
    character
        .classes
        .push(ClassLevel::new(PathfinderClass::Wizard, 2));
    let mut sheet = CharacterSheet::new(character);

    sheet.initialize_combat();

    let character = sheet.character();
    assert_eq!(character.base_attack_bonus, 3 + 1);
    assert_eq!(character.base_saves.fortitude, 4);
    assert_eq!(character.base_saves.reflex, 1);
    assert_eq!(character.base_saves.will, 4 + 3);
}

#[test]
fn test_breakdowns_match_totals() {
    let mut sheet = CharacterSheet::new(create_sample_fighter("Valeros"));
    sheet.apply_condition("stunned", None).unwrap();

    let ac = sheet.ac_breakdown();
    assert_eq!(ac.total, sheet.armor_class());
    assert_eq!(ac.total, ac.base + f64::from(ac.dex_modifier) + ac.other);

    for save in SaveKind::all() {
        let breakdown = sheet.save_breakdown(save);
        assert_eq!(breakdown.total, sheet.saving_throw(save));
        assert_eq!(
            breakdown.total,
            f64::from(breakdown.base) + f64::from(breakdown.ability_modifier) + breakdown.other
        );
    }

    let ranged = sheet.attack_breakdown(AttackKind::Ranged);
    assert_eq!(ranged.total, sheet.attack_bonus(AttackKind::Ranged));
    assert_eq!(ranged.ability, Ability::Dexterity);
}

#[test]
fn test_combat_summary() {
    let sheet = CharacterSheet::new(create_sample_fighter("Valeros"));
    let summary = sheet.combat_summary();

    assert_eq!(summary.armor_class, 21.0);
    assert_eq!(summary.touch_ac, 13.0);
    assert_eq!(summary.flat_footed_ac, 19.0);
    assert_eq!(summary.melee_attack, 7.0);
    assert_eq!(summary.cmb, 6.0);
    assert_eq!(summary.cmd, 19.0);
}
