//! Interpolation helpers shared by spawning and fading

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fade-out alpha: 255 at `elapsed_ms == 0`, 0 once `elapsed_ms >= duration_ms`.
///
/// A zero duration disappears instantly.
pub fn fade_alpha(elapsed_ms: f32, duration_ms: f32) -> u8 {
    if duration_ms <= 0.0 {
        return 0;
    }
    let progress = (elapsed_ms / duration_ms).clamp(0.0, 1.0);
    lerp_f32(255.0, 0.0, progress).round() as u8
}
