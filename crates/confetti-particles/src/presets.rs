//! Ready-made effects

use crate::party::{Angle, Party, Position, Spread};
use crate::schedule::EmissionSchedule;
use crate::shape::{Shape, ShapeHandle, Size};
use confetti_core::{ConfettiError, Result};
use std::time::Duration;

/// Handles the presets use for renderer-provided shapes
pub const HEART: ShapeHandle = ShapeHandle(1);
pub const ROUNDED_SQUARE: ShapeHandle = ShapeHandle(2);
pub const IMAGE: ShapeHandle = ShapeHandle(3);
pub const VECTOR: ShapeHandle = ShapeHandle(4);

/// Names accepted by [`by_name`]
pub const NAMES: &[&str] = &["festive", "explode", "parade", "rain"];

/// Look up a preset by name
pub fn by_name(name: &str) -> Result<Vec<Party>> {
    match name {
        "festive" => festive(),
        "explode" => explode(),
        "parade" => parade(),
        "rain" => rain(),
        other => Err(ConfettiError::invalid(format!(
            "unknown preset '{other}'; available: {}",
            NAMES.join(", ")
        ))),
    }
}

/// Upward burst from the bottom center with two slower side bursts
pub fn festive() -> Result<Vec<Party>> {
    let main = Party::new(EmissionSchedule::max_count(Duration::from_millis(100), 30)?)
        .with_speed_range(30.0, 50.0)
        .with_angle(Angle::TOP)
        .with_spread(45.0)
        .with_sizes(vec![Size::SMALL, Size::LARGE])
        .with_time_to_live(3000)
        .with_position(Position::relative(0.5, 1.0));

    let side = main
        .clone()
        .with_speed_range(10.0, 30.0)
        .with_spread(10.0)
        .with_emitter(EmissionSchedule::max_count(Duration::from_millis(100), 10)?);

    Ok(vec![
        main,
        side.clone().with_angle(Angle::TOP - 45.0),
        side.with_angle(Angle::TOP + 45.0),
    ])
}

/// Short round burst from the center
pub fn explode() -> Result<Vec<Party>> {
    Ok(vec![Party::new(EmissionSchedule::max_count(
        Duration::from_millis(100),
        100,
    )?)
    .with_speed_range(0.0, 30.0)
    .with_damping(0.9)
    .with_spread(Spread::ROUND)
    .with_shapes(vec![
        Shape::Circle,
        Shape::Custom(HEART),
        Shape::Custom(ROUNDED_SQUARE),
    ])])
}

/// Two streams shooting inward from the left and right edges
pub fn parade() -> Result<Vec<Party>> {
    let left = Party::new(EmissionSchedule::per_second(Duration::from_secs(5), 30.0)?)
        .with_speed_range(10.0, 30.0)
        .with_damping(0.9)
        .with_angle(Angle::RIGHT - 45.0)
        .with_spread(Spread::SMALL)
        .with_position(Position::relative(0.0, 0.5));

    let right = left
        .clone()
        .with_angle(left.angle - 90.0)
        .with_position(Position::relative(1.0, 0.5));

    Ok(vec![left, right])
}

/// Slow fall along the whole top edge
pub fn rain() -> Result<Vec<Party>> {
    Ok(vec![Party::new(EmissionSchedule::per_second(
        Duration::from_secs(5),
        100.0,
    )?)
    .with_speed_range(0.0, 15.0)
    .with_damping(0.9)
    .with_angle(Angle::BOTTOM)
    .with_spread(Spread::ROUND)
    .with_shapes(vec![Shape::Custom(IMAGE), Shape::Custom(VECTOR)])
    .with_position(Position::relative(0.0, 0.0).between(Position::relative(1.0, 0.0)))])
}
