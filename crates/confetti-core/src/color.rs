//! Packed ARGB32 color helpers
//!
//! Colors are configured as `0xRRGGBB` integers. The alpha byte is owned by
//! the simulation and composed in each frame.

/// Fully opaque alpha
pub const MAX_ALPHA: u8 = 255;

/// Replace the alpha byte of `color`, keeping its RGB channels
pub const fn with_alpha(color: u32, alpha: u8) -> u32 {
    ((alpha as u32) << 24) | rgb_of(color)
}

/// Strip the alpha byte
pub const fn rgb_of(color: u32) -> u32 {
    color & 0x00FF_FFFF
}
