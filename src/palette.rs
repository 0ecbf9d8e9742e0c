/// RGBA color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    pub fn rgb(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// 8-bit RGB channels, used by both renderers
    pub fn to_rgb8(&self) -> [u8; 3] {
        self.rgb().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

pub const PALETTE_LEN: usize = 4;

/// Snowflake palette: icy blue, mint, lavender, blush
pub const SNOW_PALETTE: [Rgba; PALETTE_LEN] = [
    Rgba::new(0.6, 0.9, 1.0, 0.6),
    Rgba::new(0.7, 0.95, 0.9, 0.6),
    Rgba::new(0.9, 0.8, 1.0, 0.6),
    Rgba::new(1.0, 0.9, 0.95, 0.6),
];

pub fn palette() -> [Rgba; PALETTE_LEN] {
    SNOW_PALETTE
}

/// Palette slot for the blob at `arm`, `layer`
pub fn palette_index(arm: usize, layer: usize) -> usize {
    (arm + layer) % PALETTE_LEN
}
