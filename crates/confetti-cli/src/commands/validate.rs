//! Party file validation command

use anyhow::Result;
use confetti_particles::load_parties;

pub fn run(file: &str) -> Result<()> {
    let parties = match load_parties(file) {
        Ok(parties) => parties,
        Err(e) => {
            println!("INVALID {file}: {e}");
            std::process::exit(1);
        }
    };

    println!("{file}: {} valid parties", parties.len());
    for (i, party) in parties.iter().enumerate() {
        println!(
            "  #{:<2} {:>6} particle(s) over {:.0}ms, delay {}ms, {} shape(s), {} color(s)",
            i + 1,
            party.emitter.total_particles(),
            party.emitter.emitting_time_ms(),
            party.delay_ms,
            party.shapes.len(),
            party.colors.len()
        );
    }
    Ok(())
}
