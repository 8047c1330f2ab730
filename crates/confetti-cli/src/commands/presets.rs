//! Preset listing command

use anyhow::Result;
use confetti_particles::presets;

pub fn run() -> Result<()> {
    println!("Built-in presets:");
    for name in presets::NAMES {
        let parties = presets::by_name(name)?;
        let total: u64 = parties.iter().map(|p| p.emitter.total_particles()).sum();
        println!(
            "  {:<8} {} parties, {} particle(s)",
            name,
            parties.len(),
            total
        );
    }
    Ok(())
}
