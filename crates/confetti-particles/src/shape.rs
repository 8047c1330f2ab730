//! Particle shapes and sizes

use confetti_core::{ConfettiError, Result};
use serde::{Deserialize, Serialize};

/// Opaque reference to a host-supplied drawable (outline, image, vector icon).
///
/// The simulation never interprets the value; it only picks it at random and
/// hands it back on each snapshot so the host can look up what to draw.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeHandle(pub u64);

/// The shape a particle is drawn with
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Square,
    Circle,
    /// Rectangle whose height is `height_ratio` times its width
    Rectangle { height_ratio: f32 },
    Custom(ShapeHandle),
}

impl Shape {
    /// Rectangle with a validated height/width ratio in `[0, 1]`
    pub fn rectangle(height_ratio: f32) -> Result<Self> {
        let shape = Shape::Rectangle { height_ratio };
        shape.validate()?;
        Ok(shape)
    }

    pub fn custom(handle: u64) -> Self {
        Shape::Custom(ShapeHandle(handle))
    }

    pub fn validate(&self) -> Result<()> {
        if let Shape::Rectangle { height_ratio } = *self {
            ConfettiError::check_range("rectangle height_ratio", height_ratio as f64, 0.0, 1.0)?;
        }
        Ok(())
    }

    /// Drawn height for a particle of `width` pixels
    pub fn height_for(&self, width: f32) -> f32 {
        match *self {
            Shape::Rectangle { height_ratio } => width * height_ratio,
            _ => width,
        }
    }
}

/// Size of a confetti piece and how heavy it is.
///
/// `size` is in density-independent pixels; the drawn width is
/// `size * pixel_density`. Heavier particles react less to gravity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub size: f32,
    pub mass: f32,
    pub mass_variance: f32,
}

impl Size {
    pub const DEFAULT_MASS: f32 = 5.0;
    pub const DEFAULT_MASS_VARIANCE: f32 = 0.2;

    pub const SMALL: Self = Self::preset(6.0);
    pub const MEDIUM: Self = Self::preset(8.0);
    pub const LARGE: Self = Self::preset(10.0);

    const fn preset(size: f32) -> Self {
        Self {
            size,
            mass: Self::DEFAULT_MASS,
            mass_variance: Self::DEFAULT_MASS_VARIANCE,
        }
    }

    pub fn new(size: f32, mass: f32, mass_variance: f32) -> Result<Self> {
        let value = Self {
            size,
            mass,
            mass_variance,
        };
        value.validate()?;
        Ok(value)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(ConfettiError::invalid(format!(
                "particle size must be a non-negative number, got {}",
                self.size
            )));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(ConfettiError::invalid(format!(
                "particle mass must be greater than 0, got {}",
                self.mass
            )));
        }
        if !self.mass_variance.is_finite() || self.mass_variance < 0.0 {
            return Err(ConfettiError::invalid(format!(
                "mass variance must be a non-negative number, got {}",
                self.mass_variance
            )));
        }
        Ok(())
    }

    /// Mass increased by `unit * mass_variance`, where `unit` is in `[0, 1)`
    pub fn mass_with_variance(&self, unit: f32) -> f32 {
        self.mass + self.mass * unit * self.mass_variance
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::MEDIUM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_ratio_must_be_unit() {
        assert!(Shape::rectangle(0.0).is_ok());
        assert!(Shape::rectangle(0.5).is_ok());
        assert!(Shape::rectangle(1.0).is_ok());
        assert!(Shape::rectangle(1.5).is_err());
        assert!(Shape::rectangle(-0.1).is_err());
        assert!(Shape::rectangle(f32::NAN).is_err());
    }

    #[test]
    fn rectangle_height_follows_ratio() {
        let shape = Shape::rectangle(0.25).unwrap();
        assert!((shape.height_for(8.0) - 2.0).abs() < 1e-6);
        assert!((Shape::Circle.height_for(8.0) - 8.0).abs() < 1e-6);
        assert!((Shape::custom(3).height_for(8.0) - 8.0).abs() < 1e-6);
    }

    #[test]
    fn size_presets() {
        assert_eq!(Size::SMALL.size, 6.0);
        assert_eq!(Size::MEDIUM.size, 8.0);
        assert_eq!(Size::LARGE.size, 10.0);
        assert!(Size::LARGE.validate().is_ok());
    }

    #[test]
    fn size_rejects_massless_particles() {
        assert!(Size::new(8.0, 0.0, 0.0).is_err());
        assert!(Size::new(8.0, -1.0, 0.0).is_err());
        assert!(Size::new(8.0, 5.0, -0.2).is_err());
        assert!(Size::new(-1.0, 5.0, 0.2).is_err());
        assert!(Size::new(8.0, 5.0, 0.0).is_ok());
    }

    #[test]
    fn mass_variance_only_adds() {
        let size = Size::new(8.0, 5.0, 0.2).unwrap();
        assert!((size.mass_with_variance(0.0) - 5.0).abs() < 1e-6);
        assert!((size.mass_with_variance(0.5) - 5.5).abs() < 1e-6);
    }
}
