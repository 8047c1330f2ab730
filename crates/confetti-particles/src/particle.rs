//! Particle types: simulation state and per-frame render snapshots

use crate::curves::fade_alpha;
use crate::shape::Shape;
use confetti_core::{with_alpha, Rect, Vec2, MAX_ALPHA};
use serde::Serialize;

/// Motion is tuned for this frame rate and scaled for any other
pub const REFERENCE_FRAME_RATE: f32 = 60.0;
/// Downward force applied every update, divided by mass
pub const GRAVITY: Vec2 = Vec2::new(0.0, 0.02);

const FULL_CIRCLE: f32 = 360.0;
const MILLIS_PER_SECOND: f32 = 1000.0;

/// Starting values for a new particle, resolved by the emitter
#[derive(Debug, Clone, Copy)]
pub struct ParticleInit {
    pub position: Vec2,
    pub velocity: Vec2,
    /// `0xRRGGBB`; any alpha byte is ignored
    pub color: u32,
    /// Drawn width in pixels
    pub width: f32,
    pub mass: f32,
    pub shape: Shape,
    /// Fully visible time in milliseconds
    pub lifespan_ms: f32,
    pub fade_out: bool,
    pub fade_out_duration_ms: f32,
    pub damping: f32,
    pub rotation_speed_2d: f32,
    pub rotation_speed_3d: f32,
    pub pixel_density: f32,
}

/// One simulated confetti piece
#[derive(Debug, Clone)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    color: u32,
    width: f32,
    mass: f32,
    shape: Shape,
    lifespan_ms: f32,
    fade_out: bool,
    fade_out_duration_ms: f32,
    damping: f32,
    rotation_speed_2d: f32,
    rotation_speed_3d: f32,
    pixel_density: f32,
    rotation: f32,
    rotation_width: f32,
    scale_x: f32,
    alpha: u8,
    alpha_color: u32,
    should_draw: bool,
}

impl Particle {
    pub fn new(init: ParticleInit) -> Self {
        let width = init.width.max(0.0);
        Self {
            position: init.position,
            velocity: init.velocity,
            acceleration: Vec2::ZERO,
            color: init.color,
            width,
            mass: init.mass,
            shape: init.shape,
            lifespan_ms: init.lifespan_ms,
            fade_out: init.fade_out,
            fade_out_duration_ms: init.fade_out_duration_ms,
            damping: init.damping,
            rotation_speed_2d: init.rotation_speed_2d,
            rotation_speed_3d: init.rotation_speed_3d,
            pixel_density: init.pixel_density,
            rotation: 0.0,
            rotation_width: width,
            scale_x: 1.0,
            alpha: MAX_ALPHA,
            alpha_color: with_alpha(init.color, MAX_ALPHA),
            should_draw: true,
        }
    }

    /// Advance the particle by `delta_time` seconds inside `area`
    pub fn update(&mut self, delta_time: f32, area: &Rect) {
        let time_scale = delta_time * REFERENCE_FRAME_RATE;

        // Fell below the area's height: nothing left to animate
        if self.position.y > area.height {
            self.kill();
            return;
        }

        self.acceleration.clear();
        self.acceleration.add_scaled(GRAVITY, 1.0 / self.mass);

        self.velocity += self.acceleration * time_scale;
        self.velocity.scale(self.damping.powf(time_scale));
        self.position
            .add_scaled(self.velocity, time_scale * self.pixel_density);

        self.lifespan_ms -= delta_time * MILLIS_PER_SECOND;
        if self.lifespan_ms <= 0.0 {
            self.alpha = if self.fade_out {
                fade_alpha(-self.lifespan_ms, self.fade_out_duration_ms)
            } else {
                0
            };
        }

        self.rotation = (self.rotation + self.rotation_speed_2d * time_scale).rem_euclid(FULL_CIRCLE);

        // Shrinking width, reset when flat, reads as a flip in 3D
        self.rotation_width -= self.rotation_speed_3d.abs() * time_scale;
        if self.rotation_width < 0.0 {
            self.rotation_width = self.width;
        }
        self.scale_x = if self.width > 0.0 {
            (self.rotation_width / self.width - 0.5).abs() * 2.0
        } else {
            1.0
        };

        self.alpha_color = with_alpha(self.color, self.alpha);
        self.should_draw = area.contains(self.position);
    }

    fn kill(&mut self) {
        self.alpha = 0;
        self.alpha_color = with_alpha(self.color, 0);
        self.should_draw = false;
    }

    pub fn is_dead(&self) -> bool {
        self.alpha == 0
    }

    /// Whether the last update left the particle inside the draw area
    pub fn should_draw(&self) -> bool {
        self.should_draw
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn lifespan_ms(&self) -> f32 {
        self.lifespan_ms
    }

    /// `0xAARRGGBB` with the current alpha
    pub fn alpha_color(&self) -> u32 {
        self.alpha_color
    }
}

/// Immutable per-frame description of a particle for the host to paint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// `0xAARRGGBB`
    pub color: u32,
    /// Degrees around the particle center
    pub rotation: f32,
    /// Horizontal scale for the flip illusion, 0..=1
    pub scale_x: f32,
    pub shape: Shape,
    pub alpha: u8,
}

impl ParticleSnapshot {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            x: p.position.x,
            y: p.position.y,
            width: p.width,
            height: p.shape.height_for(p.width),
            color: p.alpha_color,
            rotation: p.rotation,
            scale_x: p.scale_x,
            shape: p.shape,
            alpha: p.alpha,
        }
    }
}

impl From<&Particle> for ParticleSnapshot {
    fn from(p: &Particle) -> Self {
        Self::from_particle(p)
    }
}
