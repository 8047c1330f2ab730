//! Party files: parties described in TOML
//!
//! ```toml
//! [[party]]
//! angle = "top"
//! spread = 45
//! speed = 30
//! max_speed = 50
//! colors = [0xfce18a, "#ff726d"]
//! shapes = ["square", "circle", { rectangle = 0.5 }, { custom = 3 }]
//! sizes = ["small", { size = 12, mass = 6.0, mass_variance = 0.1 }]
//! position = { between = [{ relative = [0.0, 0.0] }, { relative = [1.0, 0.0] }] }
//! rotation = { speed = 1.0, variance = 0.5 }
//!
//! [party.emitter]
//! duration_ms = 5000
//! per_second = 30
//! ```

use crate::party::{Angle, Party, Position, Rotation, Spread};
use crate::schedule::EmissionSchedule;
use crate::shape::{Shape, Size};
use confetti_core::{ConfettiError, Result};
use std::path::Path;
use std::time::Duration;
use toml::value::Table;
use toml::Value;

const PARTY_KEYS: &[&str] = &[
    "angle",
    "spread",
    "speed",
    "max_speed",
    "damping",
    "sizes",
    "colors",
    "shapes",
    "time_to_live_ms",
    "fade_out",
    "fade_out_duration_ms",
    "position",
    "delay_ms",
    "rotation",
    "emitter",
];

/// Read every `[[party]]` table from a party file
pub fn load_parties(path: impl AsRef<Path>) -> Result<Vec<Party>> {
    let content = std::fs::read_to_string(path)?;
    parties_from_str(&content)
}

/// Parse every `[[party]]` table from TOML source
pub fn parties_from_str(source: &str) -> Result<Vec<Party>> {
    let root: Table = toml::from_str(source)?;
    let Some(parties) = root.get("party") else {
        return Err(ConfettiError::ParseError(
            "party file has no [[party]] tables".to_string(),
        ));
    };
    let Some(parties) = parties.as_array() else {
        return Err(ConfettiError::ParseError(
            "'party' must be an array of tables ([[party]])".to_string(),
        ));
    };

    parties
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let table = value.as_table().ok_or_else(|| {
                ConfettiError::ParseError(format!("party #{} is not a table", i + 1))
            })?;
            Party::from_toml(table).map_err(|e| match e {
                ConfettiError::ParseError(msg) => {
                    ConfettiError::ParseError(format!("party #{}: {msg}", i + 1))
                }
                other => other,
            })
        })
        .collect()
}

impl Party {
    /// Build and validate a party from one `[[party]]` table
    pub fn from_toml(table: &Table) -> Result<Self> {
        for key in table.keys() {
            if !PARTY_KEYS.contains(&key.as_str()) {
                log::warn!("ignoring unknown party key '{key}'");
            }
        }

        let emitter = table
            .get("emitter")
            .ok_or_else(|| ConfettiError::ParseError("missing [party.emitter] table".to_string()))?;
        let mut party = Party::new(parse_schedule(emitter)?);

        if let Some(v) = table.get("angle") {
            party.angle = parse_angle(v)?;
        }
        if let Some(v) = table.get("spread") {
            party.spread = parse_spread(v)?;
        }
        if let Some(v) = table.get("speed") {
            party.speed = expect_f32(v, "speed")?;
        }
        if let Some(v) = table.get("max_speed") {
            party.max_speed = expect_f32(v, "max_speed")?;
        }
        if let Some(v) = table.get("damping") {
            party.damping = expect_f32(v, "damping")?;
        }
        if let Some(v) = table.get("sizes") {
            party.sizes = expect_array(v, "sizes")?
                .iter()
                .map(parse_size)
                .collect::<Result<_>>()?;
        }
        if let Some(v) = table.get("colors") {
            party.colors = expect_array(v, "colors")?
                .iter()
                .map(parse_color)
                .collect::<Result<_>>()?;
        }
        if let Some(v) = table.get("shapes") {
            party.shapes = expect_array(v, "shapes")?
                .iter()
                .map(parse_shape)
                .collect::<Result<_>>()?;
        }
        if let Some(v) = table.get("time_to_live_ms") {
            party.time_to_live_ms = expect_millis(v, "time_to_live_ms")?;
        }
        if let Some(v) = table.get("fade_out") {
            party.fade_out_enabled = expect_bool(v, "fade_out")?;
        }
        if let Some(v) = table.get("fade_out_duration_ms") {
            party.fade_out_duration_ms = expect_millis(v, "fade_out_duration_ms")?;
        }
        if let Some(v) = table.get("position") {
            party.position = parse_position(v)?;
        }
        if let Some(v) = table.get("delay_ms") {
            party.delay_ms = expect_millis(v, "delay_ms")?;
        }
        if let Some(v) = table.get("rotation") {
            party.rotation = parse_rotation(v)?;
        }

        party.validate()?;
        Ok(party)
    }
}

fn parse_schedule(value: &Value) -> Result<EmissionSchedule> {
    let table = value
        .as_table()
        .ok_or_else(|| parse_error("'emitter' must be a table"))?;
    let duration_ms = table
        .get("duration_ms")
        .ok_or_else(|| parse_error("emitter needs 'duration_ms'"))
        .and_then(|v| expect_millis(v, "emitter.duration_ms"))?;
    let duration = Duration::from_millis(duration_ms);

    match (table.get("max"), table.get("per_second")) {
        (Some(max), None) => {
            let count = max
                .as_integer()
                .ok_or_else(|| parse_error("emitter.max must be an integer"))?;
            let count = u32::try_from(count).map_err(|_| {
                ConfettiError::invalid(format!("emitter.max must be between 1 and {}, got {count}", u32::MAX))
            })?;
            EmissionSchedule::max_count(duration, count)
        }
        (None, Some(rate)) => EmissionSchedule::per_second(duration, expect_f64(rate, "emitter.per_second")?),
        (Some(_), Some(_)) => Err(parse_error("emitter takes either 'max' or 'per_second', not both")),
        (None, None) => Err(parse_error("emitter needs 'max' or 'per_second'")),
    }
}

fn parse_angle(value: &Value) -> Result<f32> {
    if let Some(name) = value.as_str() {
        return match name {
            "top" => Ok(Angle::TOP),
            "right" => Ok(Angle::RIGHT),
            "bottom" => Ok(Angle::BOTTOM),
            "left" => Ok(Angle::LEFT),
            other => Err(parse_error(format!(
                "unknown angle '{other}'; expected top, right, bottom, left or degrees"
            ))),
        };
    }
    expect_f32(value, "angle")
}

fn parse_spread(value: &Value) -> Result<f32> {
    if let Some(name) = value.as_str() {
        return match name {
            "small" => Ok(Spread::SMALL),
            "wide" => Ok(Spread::WIDE),
            "round" => Ok(Spread::ROUND),
            other => Err(parse_error(format!(
                "unknown spread '{other}'; expected small, wide, round or degrees"
            ))),
        };
    }
    expect_f32(value, "spread")
}

fn parse_size(value: &Value) -> Result<Size> {
    if let Some(name) = value.as_str() {
        return match name {
            "small" => Ok(Size::SMALL),
            "medium" => Ok(Size::MEDIUM),
            "large" => Ok(Size::LARGE),
            other => Err(parse_error(format!("unknown size '{other}'"))),
        };
    }
    let table = value
        .as_table()
        .ok_or_else(|| parse_error("size must be a name or a table"))?;
    let size = table
        .get("size")
        .ok_or_else(|| parse_error("size table needs 'size'"))
        .and_then(|v| expect_f32(v, "size"))?;
    let mass = match table.get("mass") {
        Some(v) => expect_f32(v, "mass")?,
        None => Size::DEFAULT_MASS,
    };
    let mass_variance = match table.get("mass_variance") {
        Some(v) => expect_f32(v, "mass_variance")?,
        None => Size::DEFAULT_MASS_VARIANCE,
    };
    Size::new(size, mass, mass_variance)
}

fn parse_color(value: &Value) -> Result<u32> {
    if let Some(i) = value.as_integer() {
        return u32::try_from(i)
            .ok()
            .filter(|c| *c <= 0xFF_FFFF)
            .ok_or_else(|| parse_error(format!("color {i} is not a 0xRRGGBB value")));
    }
    if let Some(s) = value.as_str() {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() == 6 {
            if let Ok(c) = u32::from_str_radix(hex, 16) {
                return Ok(c);
            }
        }
        return Err(parse_error(format!("color '{s}' is not a #rrggbb value")));
    }
    Err(parse_error("colors must be integers or \"#rrggbb\" strings"))
}

fn parse_shape(value: &Value) -> Result<Shape> {
    if let Some(name) = value.as_str() {
        return match name {
            "square" => Ok(Shape::Square),
            "circle" => Ok(Shape::Circle),
            other => Err(parse_error(format!("unknown shape '{other}'"))),
        };
    }
    let table = value
        .as_table()
        .ok_or_else(|| parse_error("shape must be a name or a table"))?;
    if let Some(ratio) = table.get("rectangle") {
        return Shape::rectangle(expect_f32(ratio, "rectangle")?);
    }
    if let Some(handle) = table.get("custom") {
        let handle = handle
            .as_integer()
            .and_then(|h| u64::try_from(h).ok())
            .ok_or_else(|| parse_error("custom shape handle must be a non-negative integer"))?;
        return Ok(Shape::custom(handle));
    }
    Err(parse_error("shape table needs 'rectangle' or 'custom'"))
}

fn parse_position(value: &Value) -> Result<Position> {
    let table = value
        .as_table()
        .ok_or_else(|| parse_error("position must be a table"))?;
    if let Some(v) = table.get("absolute") {
        let [x, y] = expect_pair(v, "absolute")?;
        return Ok(Position::absolute(x, y));
    }
    if let Some(v) = table.get("relative") {
        let [x, y] = expect_pair(v, "relative")?;
        return Ok(Position::relative(x, y));
    }
    if let Some(v) = table.get("between") {
        let ends = expect_array(v, "between")?;
        if ends.len() != 2 {
            return Err(parse_error("'between' needs exactly two positions"));
        }
        return Ok(parse_position(&ends[0])?.between(parse_position(&ends[1])?));
    }
    Err(parse_error("position needs 'absolute', 'relative' or 'between'"))
}

fn parse_rotation(value: &Value) -> Result<Rotation> {
    if let Some(enabled) = value.as_bool() {
        return Ok(if enabled {
            Rotation::enabled()
        } else {
            Rotation::disabled()
        });
    }
    let table = value
        .as_table()
        .ok_or_else(|| parse_error("rotation must be a boolean or a table"))?;
    let mut rotation = Rotation::default();
    if let Some(v) = table.get("enabled") {
        rotation.enabled = expect_bool(v, "rotation.enabled")?;
    }
    if let Some(v) = table.get("speed") {
        rotation.speed = expect_f32(v, "rotation.speed")?;
    }
    if let Some(v) = table.get("variance") {
        rotation.variance = expect_f32(v, "rotation.variance")?;
    }
    if let Some(v) = table.get("multiplier_2d") {
        rotation.multiplier_2d = expect_f32(v, "rotation.multiplier_2d")?;
    }
    if let Some(v) = table.get("multiplier_3d") {
        rotation.multiplier_3d = expect_f32(v, "rotation.multiplier_3d")?;
    }
    Ok(rotation)
}

// ── TOML helpers (handle integer/float coercion) ──

fn parse_error(msg: impl Into<String>) -> ConfettiError {
    ConfettiError::ParseError(msg.into())
}

fn toml_f64(v: &Value) -> Option<f64> {
    v.as_float().or_else(|| v.as_integer().map(|i| i as f64))
}

fn expect_f64(v: &Value, field: &str) -> Result<f64> {
    toml_f64(v).ok_or_else(|| parse_error(format!("'{field}' must be a number")))
}

fn expect_f32(v: &Value, field: &str) -> Result<f32> {
    expect_f64(v, field).map(|f| f as f32)
}

fn expect_millis(v: &Value, field: &str) -> Result<u64> {
    v.as_integer()
        .and_then(|i| u64::try_from(i).ok())
        .ok_or_else(|| parse_error(format!("'{field}' must be a non-negative integer of milliseconds")))
}

fn expect_bool(v: &Value, field: &str) -> Result<bool> {
    v.as_bool()
        .ok_or_else(|| parse_error(format!("'{field}' must be true or false")))
}

fn expect_array<'a>(v: &'a Value, field: &str) -> Result<&'a Vec<Value>> {
    v.as_array()
        .ok_or_else(|| parse_error(format!("'{field}' must be an array")))
}

fn expect_pair(v: &Value, field: &str) -> Result<[f32; 2]> {
    let arr = expect_array(v, field)?;
    if arr.len() != 2 {
        return Err(parse_error(format!("'{field}' needs exactly two numbers")));
    }
    Ok([expect_f32(&arr[0], field)?, expect_f32(&arr[1], field)?])
}
