//! Party system: one party bound to its emitter and live particles

use crate::emitter::{Emitter, PartyEmitter};
use crate::party::Party;
use crate::particle::{Particle, ParticleSnapshot};
use crate::rand::ParticleRng;
use confetti_core::{ConfettiError, Rect, Result};

/// Runtime state of one party.
///
/// Each tick runs, in order: emission, update of the particles carried over
/// from earlier ticks, removal of dead particles, snapshot of the visible
/// ones. Particles born this tick were already advanced to the end of the
/// tick by the emitter and are not updated a second time.
pub struct PartySystem {
    party: Party,
    enabled: bool,
    emitter: Box<dyn Emitter>,
    active: Vec<Particle>,
}

impl PartySystem {
    /// Validates `party` and seeds the emitter from entropy
    pub fn new(party: Party, pixel_density: f32) -> Result<Self> {
        Self::with_rng(party, pixel_density, ParticleRng::from_entropy())
    }

    /// Reproducible variant of [`PartySystem::new`]
    pub fn with_seed(party: Party, pixel_density: f32, seed: u64) -> Result<Self> {
        Self::with_rng(party, pixel_density, ParticleRng::new(seed))
    }

    fn with_rng(party: Party, pixel_density: f32, rng: ParticleRng) -> Result<Self> {
        if !pixel_density.is_finite() || pixel_density <= 0.0 {
            return Err(ConfettiError::invalid(format!(
                "pixel density must be greater than 0, got {pixel_density}"
            )));
        }
        let emitter = PartyEmitter::new(party.emitter, pixel_density, rng);
        Self::with_emitter(party, Box::new(emitter))
    }

    /// Drive the party with a custom emitter
    pub fn with_emitter(party: Party, emitter: Box<dyn Emitter>) -> Result<Self> {
        party.validate()?;
        Ok(Self {
            party,
            enabled: true,
            emitter,
            active: Vec::new(),
        })
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled system stops emitting; live particles keep animating
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Advance one tick and return snapshots of every visible particle
    pub fn render(&mut self, delta_time: f32, area: &Rect) -> Vec<ParticleSnapshot> {
        let mut out = Vec::with_capacity(self.active.len());
        self.render_into(delta_time, area, &mut out);
        out
    }

    /// Like [`PartySystem::render`], appending to `out`
    pub fn render_into(&mut self, delta_time: f32, area: &Rect, out: &mut Vec<ParticleSnapshot>) {
        let delta_time = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };

        let carried = self.active.len();
        if self.enabled {
            let born = self.emitter.create_particles(delta_time, &self.party, area);
            self.active.extend(born);
        }

        for particle in &mut self.active[..carried] {
            particle.update(delta_time, area);
        }

        self.active.retain(|p| !p.is_dead());

        out.extend(
            self.active
                .iter()
                .filter(|p| p.should_draw())
                .map(ParticleSnapshot::from_particle),
        );
        log::trace!(
            "party system tick: {} live, {} carried over",
            self.active.len(),
            carried
        );
    }

    /// True once the effect has fully ended: nothing left to emit and nothing alive
    pub fn is_done_emitting(&self) -> bool {
        (self.emitter.is_finished() || !self.enabled) && self.active.is_empty()
    }

    /// Live particles, including ones currently outside the draw area
    pub fn active_particle_count(&self) -> usize {
        self.active.len()
    }
}

impl std::fmt::Debug for PartySystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartySystem")
            .field("enabled", &self.enabled)
            .field("finished", &self.emitter.is_finished())
            .field("active", &self.active.len())
            .finish()
    }
}
