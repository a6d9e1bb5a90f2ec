//! Print a full sheet dump for a sample character.
//!
//! Run with: `RUST_LOG=sheet_core=debug cargo run -p sheet-core --example sheet_dump`

use sheet_core::{create_sample_fighter, Ability, AttackKind, CharacterSheet, SaveKind};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut sheet = CharacterSheet::new(create_sample_fighter("Valeros"));
    sheet.add_bonus("armor_class", 2.0, "natural", "Barkskin");
    sheet.add_bonus("armor_class", 1.0, "abp_armor", "ABP Armor Attunement");
    sheet.apply_condition("sickened", Some(2))?;

    println!("=== {} ===", sheet.character().name);
    for ability in Ability::all() {
        let breakdown = sheet.ability_breakdown(ability);
        println!(
            "{ability} {:>2} ({:+})",
            breakdown.total, breakdown.modifier
        );
    }

    let ac = sheet.ac_breakdown();
    println!(
        "\nAC {} (touch {}, flat-footed {})",
        ac.total, ac.touch, ac.flat_footed
    );
    for component in &ac.bonuses.components {
        println!(
            "  {:+} {} [{}]",
            component.value, component.source, component.bonus_type
        );
    }

    for save in SaveKind::all() {
        let breakdown = sheet.save_breakdown(save);
        println!(
            "{save}: {:+} (base {}, {} {:+}, other {:+})",
            breakdown.total,
            breakdown.base,
            breakdown.ability,
            breakdown.ability_modifier,
            breakdown.other
        );
    }

    for attack in [AttackKind::Melee, AttackKind::Ranged] {
        println!("{attack} attack: {:+}", sheet.attack_bonus(attack));
    }
    println!("CMB {:+}  CMD {}", sheet.cmb(), sheet.cmd());
    println!("Initiative {:+}", sheet.initiative());

    println!("\nRound ends...");
    for round in 1..=2 {
        let expired = sheet.update_durations();
        println!("round {round}: expired {expired:?}");
    }

    println!("\nAll bonuses:");
    for (target, breakdown) in sheet.all_bonuses() {
        println!("  {target}: {:+}", breakdown.total);
    }

    Ok(())
}
