//! Emitters decide when particles are born and what they look like

use crate::party::{Party, DEFAULT_COLORS};
use crate::particle::{Particle, ParticleInit};
use crate::rand::ParticleRng;
use crate::schedule::{spawn_index, EmissionSchedule};
use crate::shape::{Shape, Size};
use confetti_core::{Rect, Vec2};

/// Source of new particles for a party system.
///
/// Called once per tick, so keep `create_particles` cheap.
pub trait Emitter {
    /// Particles due in the tick that just lasted `delta_time` seconds.
    /// Returned particles have already been advanced to the end of the tick.
    fn create_particles(&mut self, delta_time: f32, party: &Party, area: &Rect) -> Vec<Particle>;

    /// True once the emitter will never create another particle
    fn is_finished(&self) -> bool;
}

/// Lifecycle of a [`PartyEmitter`]. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    Active,
    Finished,
}

/// Emits particles on the fixed cadence of an [`EmissionSchedule`].
///
/// Spawn instants sit on the grid `k * interval` of the emitter's own
/// timeline. A tick spawns every instant it covers, so frame-rate variance
/// never loses or duplicates particles and a stalled frame catches up in one
/// batch. Each particle is advanced by the time between its instant and the
/// end of the tick, so a batch fans out instead of stacking on one point.
#[derive(Debug)]
pub struct PartyEmitter {
    schedule: EmissionSchedule,
    pixel_density: f32,
    elapsed_ms: f64,
    state: EmitterState,
    particles_created: u64,
    rng: ParticleRng,
}

impl PartyEmitter {
    pub fn new(schedule: EmissionSchedule, pixel_density: f32, rng: ParticleRng) -> Self {
        Self {
            schedule,
            pixel_density,
            elapsed_ms: 0.0,
            state: EmitterState::Active,
            particles_created: 0,
            rng,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    /// Time since creation in milliseconds, including the overshoot of the last tick
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn particles_created(&self) -> u64 {
        self.particles_created
    }

    fn finish(&mut self) {
        if self.state == EmitterState::Active {
            self.state = EmitterState::Finished;
            log::debug!(
                "emitter finished after {:.1} ms, {} particle(s) created",
                self.elapsed_ms,
                self.particles_created
            );
        }
    }

    fn create_particle(&mut self, party: &Party, area: &Rect) -> Particle {
        self.particles_created += 1;
        let rng = &mut self.rng;

        let size = rng.pick(&party.sizes).copied().unwrap_or(Size::MEDIUM);
        let color = rng.pick(&party.colors).copied().unwrap_or(DEFAULT_COLORS[0]);
        let shape = rng.pick(&party.shapes).copied().unwrap_or(Shape::Square);

        let speed = if party.max_speed > 0.0 {
            rng.range(party.speed, party.max_speed)
        } else {
            party.speed
        };
        let half_spread = party.spread / 2.0;
        let angle = rng.range(party.angle - half_spread, party.angle + half_spread);

        let rotation_speed_2d = party.rotation.speed_for(rng.next_signed()) * party.rotation.multiplier_2d;
        let rotation_speed_3d = party.rotation.speed_for(rng.next_signed()) * party.rotation.multiplier_3d;

        Particle::new(ParticleInit {
            position: party.position.resolve(area, rng),
            velocity: Vec2::from_angle_degrees(angle) * speed,
            color,
            width: size.size * self.pixel_density,
            mass: size.mass_with_variance(rng.next_f32()),
            shape,
            lifespan_ms: party.time_to_live_ms as f32,
            fade_out: party.fade_out_enabled,
            fade_out_duration_ms: party.fade_out_duration_ms as f32,
            damping: party.damping,
            rotation_speed_2d,
            rotation_speed_3d,
            pixel_density: self.pixel_density,
        })
    }
}

impl Emitter for PartyEmitter {
    fn create_particles(&mut self, delta_time: f32, party: &Party, area: &Rect) -> Vec<Particle> {
        if self.state == EmitterState::Finished {
            return Vec::new();
        }
        let emitting_time_ms = self.schedule.emitting_time_ms();
        if self.elapsed_ms >= emitting_time_ms {
            self.finish();
            return Vec::new();
        }
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return Vec::new();
        }

        // Same f32 conversion the particles use for their lifespans
        let delta_ms = (delta_time * 1000.0) as f64;
        let previous_ms = self.elapsed_ms;
        let tick_end_ms = previous_ms + delta_ms;
        self.elapsed_ms = tick_end_ms;

        // The whole tick counts, including any overshoot past the emitting
        // time; only the state transition looks at the emitting time
        let interval_ms = self.schedule.interval_ms();
        let (first, last) = if interval_ms > 0.0 {
            (
                spawn_index(previous_ms, interval_ms) + 1,
                spawn_index(tick_end_ms, interval_ms),
            )
        } else {
            (1, 0)
        };

        let mut particles = Vec::with_capacity(last.saturating_sub(first - 1) as usize);
        for k in first..=last {
            let spawned_at_ms = k as f64 * interval_ms;
            let age_ms = (tick_end_ms - spawned_at_ms).max(0.0);
            let mut particle = self.create_particle(party, area);
            particle.update((age_ms / 1000.0) as f32, area);
            particles.push(particle);
        }

        if particles.len() > 1 {
            log::debug!(
                "emitted {} particles in one {:.1} ms tick",
                particles.len(),
                delta_ms
            );
        }

        if self.elapsed_ms >= emitting_time_ms {
            self.finish();
        }
        particles
    }

    fn is_finished(&self) -> bool {
        self.state == EmitterState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::{Position, Rotation};
    use std::time::Duration;

    fn area() -> Rect {
        Rect::from_size(1000.0, 1000.0)
    }

    /// Every random range collapsed to a single value
    fn still_party(schedule: EmissionSchedule) -> Party {
        Party::new(schedule)
            .with_position(Position::absolute(0.0, 0.0))
            .with_spread(0.0)
            .with_speed(0.0)
            .with_damping(1.0)
            .with_rotation(Rotation::disabled())
            .with_shapes(vec![Shape::Square])
            .with_colors(vec![0xffffff])
            .with_sizes(vec![Size::new(8.0, 5.0, 0.0).unwrap()])
            .with_time_to_live(10_000)
            .with_fade_out(false, 0)
    }

    fn ten_per_second() -> EmissionSchedule {
        EmissionSchedule::per_second(Duration::from_secs(1), 10.0).unwrap()
    }

    fn emitter(schedule: EmissionSchedule) -> PartyEmitter {
        PartyEmitter::new(schedule, 1.0, ParticleRng::new(42))
    }

    #[test]
    fn large_delta_creates_particles_with_different_ages() {
        let schedule = ten_per_second();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        let created = emitter.create_particles(0.25, &party, &area());

        assert_eq!(created.len(), 2);
        let y0 = created[0].position().y;
        let y1 = created[1].position().y;
        assert!(y0 > y1, "older particle should move further (y0={y0}, y1={y1})");
    }

    #[test]
    fn particle_due_at_tick_end_is_not_advanced() {
        let schedule = ten_per_second();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        let created = emitter.create_particles(0.1, &party, &area());

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].position(), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn small_ticks_accumulate_until_due() {
        let schedule = ten_per_second();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        assert!(emitter.create_particles(0.0625, &party, &area()).is_empty());
        let created = emitter.create_particles(0.0625, &party, &area());
        assert_eq!(created.len(), 1);
        // Due at 100 ms, tick ended at 125 ms
        assert!(created[0].position().y > 0.0);
    }

    #[test]
    fn stalled_frame_spawns_the_whole_backlog() {
        let schedule = EmissionSchedule::per_second(Duration::from_secs(5), 10.0).unwrap();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        let created = emitter.create_particles(2.0, &party, &area());

        assert_eq!(created.len(), 20);
        for pair in created.windows(2) {
            assert!(pair[0].position().y > pair[1].position().y);
        }
        assert_eq!(created[19].position().y, 0.0);
    }

    #[test]
    fn irregular_frames_neither_lose_nor_duplicate() {
        let schedule = EmissionSchedule::per_second(Duration::from_secs(1), 30.0).unwrap();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        let frames = [0.016, 0.033, 0.007, 0.25, 0.001, 0.016, 0.1, 0.3, 0.05, 0.5];
        let total: usize = frames
            .iter()
            .map(|dt| emitter.create_particles(*dt, &party, &area()).len())
            .sum();

        // Every 33.3 ms instant up to the 1273 ms the frames add up to
        assert_eq!(total, 38);
        assert_eq!(
            total as u64,
            spawn_index(emitter.elapsed_ms(), schedule.interval_ms())
        );
        assert!(emitter.is_finished());
    }

    #[test]
    fn max_count_emits_the_maximum_on_short_frames() {
        let schedule = EmissionSchedule::max_count(Duration::from_secs(1), 7).unwrap();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        let mut total = 0;
        for _ in 0..120 {
            total += emitter.create_particles(1.0 / 60.0, &party, &area()).len();
        }
        assert_eq!(total, 7);
        assert_eq!(emitter.particles_created(), 7);
    }

    #[test]
    fn overshooting_tick_spawns_for_the_full_delta() {
        let schedule = ten_per_second();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        let created = emitter.create_particles(5.0, &party, &area());
        assert_eq!(created.len(), 50);
        assert!(emitter.is_finished());
        assert!(emitter.elapsed_ms() >= 5000.0);
        // Newest instant sits on the tick end
        assert_eq!(created[49].position().y, 0.0);
        assert!(emitter.create_particles(5.0, &party, &area()).is_empty());
    }

    #[test]
    fn finished_is_idempotent() {
        let schedule = ten_per_second();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        emitter.create_particles(1.0, &party, &area());
        assert!(emitter.is_finished());
        for _ in 0..5 {
            assert!(emitter.create_particles(1.0, &party, &area()).is_empty());
            assert!(emitter.is_finished());
            assert_eq!(emitter.state(), EmitterState::Finished);
        }
    }

    #[test]
    fn non_positive_delta_is_a_no_op() {
        let schedule = ten_per_second();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        assert!(emitter.create_particles(0.0, &party, &area()).is_empty());
        assert!(emitter.create_particles(-1.0, &party, &area()).is_empty());
        assert!(emitter.create_particles(f32::NAN, &party, &area()).is_empty());
        assert_eq!(emitter.elapsed_ms(), 0.0);
        assert_eq!(emitter.state(), EmitterState::Active);
    }

    #[test]
    fn zero_duration_finishes_without_emitting() {
        let schedule = EmissionSchedule::max_count(Duration::ZERO, 10).unwrap();
        let party = still_party(schedule);
        let mut emitter = emitter(schedule);

        assert!(emitter.create_particles(0.1, &party, &area()).is_empty());
        assert!(emitter.is_finished());
    }

    #[test]
    fn attributes_come_from_the_party() {
        let schedule = ten_per_second();
        let party = Party::new(schedule)
            .with_colors(vec![0x112233, 0x445566])
            .with_shapes(vec![Shape::Circle, Shape::custom(9)])
            .with_sizes(vec![Size::LARGE])
            .with_speed_range(10.0, 20.0)
            .with_angle(90.0)
            .with_spread(30.0)
            .with_position(Position::relative(0.5, 0.0));
        let mut emitter = PartyEmitter::new(schedule, 2.0, ParticleRng::new(1));

        let created = emitter.create_particles(1.0, &party, &area());
        assert_eq!(created.len(), 10);
        for p in &created {
            assert_eq!(p.width(), 20.0);
            assert!(p.mass() >= 5.0 && p.mass() <= 6.0);
            assert!(matches!(p.shape(), Shape::Circle | Shape::Custom(_)));
            let rgb = p.alpha_color() & 0x00FF_FFFF;
            assert!(rgb == 0x112233 || rgb == 0x445566);
        }
    }

    #[test]
    fn spread_bounds_the_launch_direction() {
        let schedule = EmissionSchedule::max_count(Duration::from_secs(1), 50).unwrap();
        let party = still_party(schedule)
            .with_speed(10.0)
            .with_angle(90.0)
            .with_spread(60.0);
        let mut emitter = emitter(schedule);

        let created = emitter.create_particles(1.0, &party, &area());
        assert_eq!(created.len(), 50);
        for p in &created {
            let v = p.velocity();
            let angle = v.y.atan2(v.x).to_degrees();
            assert!(angle >= 59.0 && angle <= 121.0, "angle {angle} outside spread");
        }
    }
}
