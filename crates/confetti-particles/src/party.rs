//! Party: the declarative description of one confetti effect

use crate::curves::lerp_f32;
use crate::rand::ParticleRng;
use crate::schedule::EmissionSchedule;
use crate::shape::{Shape, Size};
use confetti_core::{ConfettiError, Rect, Result, Vec2};

/// Named directions in degrees. Screen space, so 90 points down.
pub struct Angle;

impl Angle {
    pub const TOP: f32 = 270.0;
    pub const RIGHT: f32 = 0.0;
    pub const BOTTOM: f32 = 90.0;
    pub const LEFT: f32 = 180.0;
}

/// Common spreads in degrees
pub struct Spread;

impl Spread {
    pub const SMALL: f32 = 30.0;
    pub const WIDE: f32 = 100.0;
    pub const ROUND: f32 = 360.0;
}

/// Where particles spawn
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    /// Pixel coordinates
    Absolute(Vec2),
    /// Fractions of the draw area: (0, 0) top-left, (1, 1) bottom-right
    Relative { x: f32, y: f32 },
    /// A uniformly random point on the box spanned by two positions
    Between(Box<Position>, Box<Position>),
}

impl Position {
    pub fn absolute(x: f32, y: f32) -> Self {
        Position::Absolute(Vec2::new(x, y))
    }

    pub fn relative(x: f32, y: f32) -> Self {
        Position::Relative { x, y }
    }

    pub fn between(self, other: Position) -> Self {
        Position::Between(Box::new(self), Box::new(other))
    }

    /// Resolve to a concrete pixel point for one spawn
    pub fn resolve(&self, area: &Rect, rng: &mut ParticleRng) -> Vec2 {
        match self {
            Position::Absolute(point) => *point,
            Position::Relative { x, y } => area.relative_point(*x, *y),
            Position::Between(min, max) => {
                let min = min.resolve(area, rng);
                let max = max.resolve(area, rng);
                Vec2::new(
                    lerp_f32(min.x, max.x, rng.next_f32()),
                    lerp_f32(min.y, max.y, rng.next_f32()),
                )
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Position::Absolute(p) => finite_pair("absolute position", p.x, p.y),
            Position::Relative { x, y } => finite_pair("relative position", *x, *y),
            Position::Between(a, b) => {
                a.validate()?;
                b.validate()
            }
        }
    }
}

fn finite_pair(what: &str, x: f32, y: f32) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(ConfettiError::invalid(format!(
            "{what} must be finite, got ({x}, {y})"
        )))
    }
}

/// 2D spin and 3D flip settings.
///
/// Each particle draws its own speed as `speed ± speed * variance`,
/// separately for the 2D and 3D components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub enabled: bool,
    pub speed: f32,
    pub variance: f32,
    /// Degrees per reference frame around the particle center
    pub multiplier_2d: f32,
    /// Width shrink per reference frame for the flip illusion
    pub multiplier_3d: f32,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 1.0,
            variance: 0.5,
            multiplier_2d: 8.0,
            multiplier_3d: 1.5,
        }
    }
}

impl Rotation {
    pub fn enabled() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Speed for a signed unit sample in `[-1, 1)`
    pub fn speed_for(&self, signed_unit: f32) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        self.speed + self.speed * self.variance * signed_unit
    }
}

/// Default palette: yellow, coral, pink, lavender
pub const DEFAULT_COLORS: [u32; 4] = [0xfce18a, 0xff726d, 0xf4306d, 0xb48def];

/// Declarative description of one confetti effect
#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    /// Direction in degrees, see [`Angle`]
    pub angle: f32,
    /// Cone width in degrees, 0..=360
    pub spread: f32,
    pub speed: f32,
    /// When greater than 0, each particle picks a speed in `[speed, max_speed)`
    pub max_speed: f32,
    /// Velocity multiplier per reference frame, in (0, 1]
    pub damping: f32,
    pub sizes: Vec<Size>,
    /// `0xRRGGBB`
    pub colors: Vec<u32>,
    pub shapes: Vec<Shape>,
    /// Fully visible lifetime in milliseconds
    pub time_to_live_ms: u64,
    pub fade_out_enabled: bool,
    pub fade_out_duration_ms: u64,
    pub position: Position,
    /// Milliseconds a driver waits before starting this party
    pub delay_ms: u64,
    pub rotation: Rotation,
    pub emitter: EmissionSchedule,
}

impl Party {
    pub fn new(emitter: EmissionSchedule) -> Self {
        Self {
            angle: 0.0,
            spread: Spread::ROUND,
            speed: 30.0,
            max_speed: 0.0,
            damping: 0.9,
            sizes: vec![Size::SMALL, Size::MEDIUM, Size::LARGE],
            colors: DEFAULT_COLORS.to_vec(),
            shapes: vec![Shape::Square, Shape::Circle],
            time_to_live_ms: 2000,
            fade_out_enabled: true,
            fade_out_duration_ms: 850,
            position: Position::relative(0.5, 0.5),
            delay_ms: 0,
            rotation: Rotation::default(),
            emitter,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_speed_range(mut self, speed: f32, max_speed: f32) -> Self {
        self.speed = speed;
        self.max_speed = max_speed;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_sizes(mut self, sizes: Vec<Size>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_colors(mut self, colors: Vec<u32>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_shapes(mut self, shapes: Vec<Shape>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_time_to_live(mut self, ms: u64) -> Self {
        self.time_to_live_ms = ms;
        self
    }

    pub fn with_fade_out(mut self, enabled: bool, duration_ms: u64) -> Self {
        self.fade_out_enabled = enabled;
        self.fade_out_duration_ms = duration_ms;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_emitter(mut self, emitter: EmissionSchedule) -> Self {
        self.emitter = emitter;
        self
    }

    /// Reject descriptions that cannot produce a sensible effect
    pub fn validate(&self) -> Result<()> {
        if !self.angle.is_finite() {
            return Err(ConfettiError::invalid("angle must be finite"));
        }
        ConfettiError::check_range("spread", self.spread as f64, 0.0, 360.0)?;
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfettiError::ValueOutOfRange {
                field: "damping".to_string(),
                min: 0.0,
                max: 1.0,
                value: self.damping as f64,
            });
        }
        if !self.speed.is_finite() || !self.max_speed.is_finite() {
            return Err(ConfettiError::invalid("speed and max_speed must be finite"));
        }
        if self.sizes.is_empty() {
            return Err(ConfettiError::invalid("party needs at least one size"));
        }
        if self.colors.is_empty() {
            return Err(ConfettiError::invalid("party needs at least one color"));
        }
        if self.shapes.is_empty() {
            return Err(ConfettiError::invalid("party needs at least one shape"));
        }
        for size in &self.sizes {
            size.validate()?;
        }
        for shape in &self.shapes {
            shape.validate()?;
        }
        if !self.rotation.speed.is_finite()
            || !self.rotation.variance.is_finite()
            || !self.rotation.multiplier_2d.is_finite()
            || !self.rotation.multiplier_3d.is_finite()
        {
            return Err(ConfettiError::invalid("rotation settings must be finite"));
        }
        self.position.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn schedule() -> EmissionSchedule {
        EmissionSchedule::per_second(Duration::from_secs(1), 10.0).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let party = Party::new(schedule());
        assert!(party.validate().is_ok());
        assert_eq!(party.spread, 360.0);
        assert_eq!(party.colors.len(), 4);
        assert_eq!(party.time_to_live_ms, 2000);
        assert_eq!(party.fade_out_duration_ms, 850);
    }

    #[test]
    fn spread_must_be_within_circle() {
        assert!(Party::new(schedule()).with_spread(0.0).validate().is_ok());
        assert!(Party::new(schedule()).with_spread(361.0).validate().is_err());
        assert!(Party::new(schedule()).with_spread(-1.0).validate().is_err());
    }

    #[test]
    fn damping_excludes_zero() {
        assert!(Party::new(schedule()).with_damping(1.0).validate().is_ok());
        assert!(Party::new(schedule()).with_damping(0.0).validate().is_err());
        assert!(Party::new(schedule()).with_damping(1.01).validate().is_err());
    }

    #[test]
    fn empty_sets_are_rejected() {
        assert!(Party::new(schedule()).with_colors(vec![]).validate().is_err());
        assert!(Party::new(schedule()).with_shapes(vec![]).validate().is_err());
        assert!(Party::new(schedule()).with_sizes(vec![]).validate().is_err());
    }

    #[test]
    fn invalid_rectangle_is_rejected() {
        let party = Party::new(schedule()).with_shapes(vec![Shape::Rectangle {
            height_ratio: 2.0,
        }]);
        assert!(party.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn relative_position_scales_with_area() {
        let mut rng = ParticleRng::new(1);
        let area = Rect::from_size(200.0, 100.0);
        let point = Position::relative(0.25, 1.0).resolve(&area, &mut rng);
        assert_eq!(point, Vec2::new(50.0, 100.0));
    }

    #[test]
    fn between_stays_inside_its_box() {
        let mut rng = ParticleRng::new(7);
        let area = Rect::from_size(1000.0, 500.0);
        let position = Position::relative(0.0, 0.0).between(Position::relative(1.0, 0.0));
        for _ in 0..200 {
            let p = position.resolve(&area, &mut rng);
            assert!(p.x >= 0.0 && p.x <= 1000.0);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn disabled_rotation_has_no_speed() {
        assert_eq!(Rotation::disabled().speed_for(0.7), 0.0);
        let r = Rotation::default();
        assert!((r.speed_for(0.0) - 1.0).abs() < 1e-6);
        assert!((r.speed_for(1.0) - 1.5).abs() < 1e-6);
        assert!((r.speed_for(-1.0) - 0.5).abs() < 1e-6);
    }
}
