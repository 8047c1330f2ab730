//! Confetti Core - Foundational types for the confetti engine
//!
//! This crate provides the core types that the particle crates depend on:
//! - `Vec2` - 2D vector with in-place arithmetic used by the integrator
//! - `Rect` - The draw area particles are simulated and culled against
//! - `SystemId` - Identifiers for party systems owned by a driver
//! - Packed ARGB color helpers
//! - Error types and Result alias

mod color;
mod error;
mod id;
mod types;

pub use color::{rgb_of, with_alpha, MAX_ALPHA};
pub use error::{ConfettiError, Result};
pub use id::SystemId;
pub use types::{Rect, Vec2};
