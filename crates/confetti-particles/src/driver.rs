//! Drives many party systems from a host frame loop

use crate::particle::ParticleSnapshot;
use crate::party::Party;
use crate::system::PartySystem;
use confetti_core::{Rect, Result, SystemId};

/// Notification that a party system has fully ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemEnded {
    pub id: SystemId,
    /// Systems still running after this one ended
    pub active_systems: usize,
}

/// Snapshots of one party system for the current frame
pub struct SystemDrawData<'a> {
    pub id: SystemId,
    pub snapshots: &'a [ParticleSnapshot],
}

struct TrackedSystem {
    id: SystemId,
    system: PartySystem,
    /// Driver time when the system was added, in milliseconds
    added_at_ms: f64,
    ended: bool,
}

impl TrackedSystem {
    fn delay_ms(&self) -> f64 {
        self.system.party().delay_ms as f64
    }
}

/// Owns a set of party systems and advances them together.
///
/// The host calls [`ConfettiDriver::tick`] once per animation frame with the
/// frame delta and the current draw area, paints the returned snapshots and
/// drains [`SystemEnded`] events to chain effects.
pub struct ConfettiDriver {
    systems: Vec<TrackedSystem>,
    pixel_density: f32,
    seed: Option<u64>,
    systems_added: u64,
    elapsed_ms: f64,
    /// Snapshots of all systems for the last tick
    snapshot_buffer: Vec<ParticleSnapshot>,
    /// Per-system ranges into `snapshot_buffer`: (id, start, count)
    snapshot_ranges: Vec<(SystemId, usize, usize)>,
    events: Vec<SystemEnded>,
}

impl ConfettiDriver {
    pub fn new(pixel_density: f32) -> Self {
        Self {
            systems: Vec::new(),
            pixel_density,
            seed: None,
            systems_added: 0,
            elapsed_ms: 0.0,
            snapshot_buffer: Vec::new(),
            snapshot_ranges: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Every system added later gets a seed derived from `seed`
    pub fn with_seed(pixel_density: f32, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(pixel_density)
        }
    }

    /// Start a party. Its delay counts from now.
    pub fn add_party(&mut self, party: Party) -> Result<SystemId> {
        let system = match self.seed {
            Some(seed) => PartySystem::with_seed(
                party,
                self.pixel_density,
                seed.wrapping_add(self.systems_added),
            )?,
            None => PartySystem::new(party, self.pixel_density)?,
        };
        Ok(self.add_system(system))
    }

    /// Start several parties at once. Nothing is added if any party is invalid.
    pub fn add_parties(&mut self, parties: impl IntoIterator<Item = Party>) -> Result<Vec<SystemId>> {
        let parties: Vec<Party> = parties.into_iter().collect();
        for party in &parties {
            party.validate()?;
        }
        parties.into_iter().map(|p| self.add_party(p)).collect()
    }

    /// Track an already constructed system
    pub fn add_system(&mut self, system: PartySystem) -> SystemId {
        let id = SystemId::new();
        self.systems_added += 1;
        self.systems.push(TrackedSystem {
            id,
            system,
            added_at_ms: self.elapsed_ms,
            ended: false,
        });
        id
    }

    /// Advance every started system by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32, area: &Rect) -> &[ParticleSnapshot] {
        let delta_time = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };
        self.elapsed_ms += (delta_time * 1000.0) as f64;
        self.snapshot_buffer.clear();
        self.snapshot_ranges.clear();

        let mut newly_ended = Vec::new();
        for tracked in &mut self.systems {
            if tracked.ended {
                continue;
            }
            // Waiting for the party's delay
            let running_ms = self.elapsed_ms - tracked.added_at_ms - tracked.delay_ms();
            if running_ms <= 0.0 {
                continue;
            }
            // A system that started mid-frame only sees the part after its delay
            let system_delta = delta_time.min((running_ms / 1000.0) as f32);

            let start = self.snapshot_buffer.len();
            tracked
                .system
                .render_into(system_delta, area, &mut self.snapshot_buffer);
            let count = self.snapshot_buffer.len() - start;
            if count > 0 {
                self.snapshot_ranges.push((tracked.id, start, count));
            }

            if tracked.system.is_done_emitting() {
                tracked.ended = true;
                newly_ended.push(tracked.id);
            }
        }

        if !newly_ended.is_empty() {
            let active_systems = self.running_count();
            for id in newly_ended {
                log::info!("party system {id} ended, {active_systems} still running");
                self.events.push(SystemEnded { id, active_systems });
            }
        }

        &self.snapshot_buffer
    }

    /// Snapshots produced by the last tick
    pub fn snapshots(&self) -> &[ParticleSnapshot] {
        &self.snapshot_buffer
    }

    /// Last tick's snapshots grouped by system
    pub fn draw_data(&self) -> Vec<SystemDrawData<'_>> {
        self.snapshot_ranges
            .iter()
            .map(|(id, start, count)| SystemDrawData {
                id: *id,
                snapshots: &self.snapshot_buffer[*start..*start + *count],
            })
            .collect()
    }

    /// Take the end-of-effect notifications gathered since the last call
    pub fn drain_events(&mut self) -> Vec<SystemEnded> {
        std::mem::take(&mut self.events)
    }

    pub fn system(&self, id: SystemId) -> Option<&PartySystem> {
        self.systems.iter().find(|t| t.id == id).map(|t| &t.system)
    }

    pub fn system_mut(&mut self, id: SystemId) -> Option<&mut PartySystem> {
        self.systems
            .iter_mut()
            .find(|t| t.id == id)
            .map(|t| &mut t.system)
    }

    pub fn remove(&mut self, id: SystemId) -> Option<PartySystem> {
        let index = self.systems.iter().position(|t| t.id == id)?;
        Some(self.systems.remove(index).system)
    }

    /// Drop systems that have ended. Returns how many were removed.
    pub fn prune_ended(&mut self) -> usize {
        let before = self.systems.len();
        self.systems.retain(|t| !t.ended);
        before - self.systems.len()
    }

    /// Clear all systems and buffers
    pub fn clear(&mut self) {
        self.systems.clear();
        self.snapshot_buffer.clear();
        self.snapshot_ranges.clear();
        self.events.clear();
    }

    /// Number of tracked systems, ended ones included until pruned
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Systems that have not ended yet, waiting ones included
    pub fn running_count(&self) -> usize {
        self.systems.iter().filter(|t| !t.ended).count()
    }

    /// Total live particles across all systems
    pub fn total_alive(&self) -> usize {
        self.systems
            .iter()
            .map(|t| t.system.active_particle_count())
            .sum()
    }

    /// True when every system has ended
    pub fn is_idle(&self) -> bool {
        self.running_count() == 0
    }

    /// Driver time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

impl Default for ConfettiDriver {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::{Position, Rotation};
    use crate::schedule::EmissionSchedule;
    use crate::shape::{Shape, Size};
    use std::time::Duration;

    fn area() -> Rect {
        Rect::from_size(1000.0, 1000.0)
    }

    fn quick_party(count: u32) -> Party {
        let schedule = EmissionSchedule::max_count(Duration::from_millis(100), count).unwrap();
        Party::new(schedule)
            .with_position(Position::absolute(500.0, 100.0))
            .with_spread(0.0)
            .with_speed(0.0)
            .with_damping(1.0)
            .with_rotation(Rotation::disabled())
            .with_shapes(vec![Shape::Square])
            .with_sizes(vec![Size::new(8.0, 5.0, 0.0).unwrap()])
            .with_time_to_live(200)
            .with_fade_out(false, 0)
    }

    #[test]
    fn tick_collects_snapshots_from_every_system() {
        let mut driver = ConfettiDriver::with_seed(1.0, 7);
        let a = driver.add_party(quick_party(5)).unwrap();
        let b = driver.add_party(quick_party(3)).unwrap();

        let count = driver.tick(0.1, &area()).len();
        assert_eq!(count, 8);
        assert_eq!(driver.total_alive(), 8);

        let draw = driver.draw_data();
        assert_eq!(draw.len(), 2);
        assert_eq!(draw[0].id, a);
        assert_eq!(draw[0].snapshots.len(), 5);
        assert_eq!(draw[1].id, b);
        assert_eq!(draw[1].snapshots.len(), 3);
    }

    #[test]
    fn delay_postpones_the_start() {
        let mut driver = ConfettiDriver::with_seed(1.0, 7);
        driver.add_party(quick_party(4).with_delay(250)).unwrap();

        assert!(driver.tick(0.1, &area()).is_empty());
        assert!(driver.tick(0.1, &area()).is_empty());
        // Starts 50 ms into this tick, so half the emitter window has passed
        assert_eq!(driver.tick(0.1, &area()).len(), 2);
        // Ends exactly on the emitter window: two new, two carried
        assert_eq!(driver.tick(0.05, &area()).len(), 4);
    }

    #[test]
    fn ended_event_fires_once() {
        let mut driver = ConfettiDriver::with_seed(1.0, 7);
        let quick = driver.add_party(quick_party(2)).unwrap();
        let slow = driver
            .add_party(quick_party(2).with_time_to_live(5_000))
            .unwrap();

        for _ in 0..5 {
            driver.tick(0.1, &area());
        }
        let events = driver.drain_events();
        assert_eq!(
            events,
            vec![SystemEnded {
                id: quick,
                active_systems: 1
            }]
        );
        assert!(driver.system(quick).unwrap().is_done_emitting());
        assert!(!driver.system(slow).unwrap().is_done_emitting());

        driver.tick(0.1, &area());
        assert!(driver.drain_events().is_empty());
        assert!(!driver.is_idle());
    }

    #[test]
    fn prune_and_idle() {
        let mut driver = ConfettiDriver::with_seed(1.0, 7);
        driver.add_party(quick_party(1)).unwrap();
        driver.add_party(quick_party(1)).unwrap();
        assert_eq!(driver.running_count(), 2);

        for _ in 0..5 {
            driver.tick(0.1, &area());
        }
        assert!(driver.is_idle());
        assert_eq!(driver.drain_events().len(), 2);
        assert_eq!(driver.prune_ended(), 2);
        assert_eq!(driver.system_count(), 0);
    }

    #[test]
    fn invalid_party_adds_nothing() {
        let mut driver = ConfettiDriver::new(1.0);
        let result = driver.add_parties(vec![quick_party(1), quick_party(1).with_spread(400.0)]);
        assert!(result.is_err());
        assert_eq!(driver.system_count(), 0);
    }

    #[test]
    fn disabling_through_the_driver() {
        let mut driver = ConfettiDriver::with_seed(1.0, 7);
        let id = driver.add_party(quick_party(10)).unwrap();
        driver.tick(0.05, &area());
        driver.system_mut(id).unwrap().set_enabled(false);

        let alive = driver.total_alive();
        driver.tick(0.05, &area());
        assert_eq!(driver.total_alive(), alive);
        assert!(driver.remove(id).is_some());
        assert!(driver.system(id).is_none());
    }
}
