//! Confetti Particles - frame-driven confetti emission and simulation
//!
//! Provides the renderer-agnostic core of a confetti effect:
//! - Declarative [`Party`] descriptions with validation and TOML loading
//! - Frame-rate independent emission that catches up after stalled frames
//! - Per-particle physics (gravity, damping, rotation, fade out)
//! - [`PartySystem`] producing draw-ready [`ParticleSnapshot`]s each frame
//! - [`ConfettiDriver`] running many parties with start delays and end events

pub mod clock;
pub mod config;
pub mod curves;
pub mod driver;
pub mod emitter;
pub mod particle;
pub mod party;
pub mod presets;
pub mod rand;
pub mod schedule;
pub mod shape;
pub mod system;

pub use clock::FrameClock;
pub use config::{load_parties, parties_from_str};
pub use driver::{ConfettiDriver, SystemDrawData, SystemEnded};
pub use emitter::{Emitter, EmitterState, PartyEmitter};
pub use particle::{Particle, ParticleInit, ParticleSnapshot};
pub use party::{Angle, Party, Position, Rotation, Spread, DEFAULT_COLORS};
pub use schedule::EmissionSchedule;
pub use shape::{Shape, ShapeHandle, Size};
pub use system::PartySystem;
