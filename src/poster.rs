// src/poster.rs
use crate::blob::{blob, BlobShape, BLOB_POINTS};
use crate::palette::{palette, palette_index, Rgba};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Radial step between consecutive layers along an arm
pub const LAYER_SPACING: f64 = 2.5;
pub const ARM_RADIUS_RANGE: (f64, f64) = (1.5, 3.0);
pub const ARM_FILL_ALPHA: f64 = 0.6;

pub const CENTER_RADIUS: f64 = 2.5;
pub const CENTER_WOBBLE: f64 = 0.1;
pub const CENTER_FILL_ALPHA: f64 = 0.7;

pub const CAPTION_TEXT: &str = "Week3 Arts & Advanced Big Data";

#[derive(Debug, Clone, PartialEq)]
pub struct PosterParameters {
    pub seed: Option<u64>,
    pub n_arms: usize,
    pub n_layers: usize,
    pub wobble_min: f64,
    pub wobble_max: f64,
}

impl Default for PosterParameters {
    fn default() -> Self {
        PosterParameters {
            seed: None,
            n_arms: 6,
            n_layers: 4,
            wobble_min: 0.05,
            wobble_max: 0.15,
        }
    }
}

/// Random state for one poster.
///
/// `normal` feeds the blob outlines, `uniform` the per-blob radius and wobble.
pub struct PosterRng {
    normal: ChaCha8Rng,
    uniform: ChaCha8Rng,
}

impl PosterRng {
    pub fn seeded(seed: u64) -> Self {
        let normal = ChaCha8Rng::seed_from_u64(seed);
        let mut uniform = ChaCha8Rng::seed_from_u64(seed);
        uniform.set_stream(1);
        PosterRng { normal, uniform }
    }

    pub fn from_entropy() -> Self {
        PosterRng {
            normal: ChaCha8Rng::from_entropy(),
            uniform: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn for_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// `lo + (hi - lo) * u` with `u` in [0, 1); an inverted range is not rejected
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.uniform.gen::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Arm { arm: usize, layer: usize },
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Rgba,
    pub alpha: f64,
}

impl Fill {
    /// Embedded color alpha compounded with the fill alpha
    pub fn opacity(&self) -> f64 {
        self.color.a * self.alpha
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlob {
    pub placement: Placement,
    pub center: (f64, f64),
    pub radius: f64,
    pub wobble: f64,
    pub shape: BlobShape,
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: &'static str,
    /// Left/top anchor in world coordinates
    pub anchor: (f64, f64),
    pub font_size_pt: f64,
    pub bold: bool,
}

impl Default for Caption {
    fn default() -> Self {
        Caption {
            text: CAPTION_TEXT,
            anchor: (-9.5, 9.5),
            font_size_pt: 14.0,
            bold: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ViewBounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

impl Default for ViewBounds {
    fn default() -> Self {
        ViewBounds {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

/// Composed poster: blobs in draw order, caption and view window
#[derive(Debug, Clone, PartialEq)]
pub struct Poster {
    pub blobs: Vec<PlacedBlob>,
    pub caption: Caption,
    pub view: ViewBounds,
}

impl Poster {
    pub fn arm_blobs(&self) -> impl Iterator<Item = &PlacedBlob> {
        self.blobs
            .iter()
            .filter(|b| matches!(b.placement, Placement::Arm { .. }))
    }

    pub fn center_blob(&self) -> Option<&PlacedBlob> {
        self.blobs
            .iter()
            .find(|b| b.placement == Placement::Center)
    }
}

/// Generate a poster, seeding both random sources from `params.seed` when given
pub fn generate(params: &PosterParameters) -> Poster {
    let mut rng = PosterRng::for_seed(params.seed);
    compose(params, &mut rng)
}

/// Lay out arm blobs radially, then the center blob on top
pub fn compose(params: &PosterParameters, rng: &mut PosterRng) -> Poster {
    let colors = palette();
    let (center_x, center_y) = (0.0, 0.0);
    let mut blobs = Vec::with_capacity(params.n_arms * params.n_layers + 1);

    for arm in 0..params.n_arms {
        let theta = 2.0 * PI * arm as f64 / params.n_arms as f64;
        for layer in 1..=params.n_layers {
            let distance = layer as f64 * LAYER_SPACING;
            let x_center = center_x + distance * theta.cos();
            let y_center = center_y + distance * theta.sin();

            let radius = rng.uniform(ARM_RADIUS_RANGE.0, ARM_RADIUS_RANGE.1);
            let wobble = rng.uniform(params.wobble_min, params.wobble_max);

            let shape = blob(&mut rng.normal, x_center, y_center, radius, wobble, BLOB_POINTS);
            blobs.push(PlacedBlob {
                placement: Placement::Arm { arm, layer },
                center: (x_center, y_center),
                radius,
                wobble,
                shape,
                fill: Fill {
                    color: colors[palette_index(arm, layer)],
                    alpha: ARM_FILL_ALPHA,
                },
            });
        }
    }

    let shape = blob(
        &mut rng.normal,
        center_x,
        center_y,
        CENTER_RADIUS,
        CENTER_WOBBLE,
        BLOB_POINTS,
    );
    blobs.push(PlacedBlob {
        placement: Placement::Center,
        center: (center_x, center_y),
        radius: CENTER_RADIUS,
        wobble: CENTER_WOBBLE,
        shape,
        fill: Fill {
            color: colors[0],
            alpha: CENTER_FILL_ALPHA,
        },
    });

    log::debug!(
        "composed poster: {} arms x {} layers, {} blobs",
        params.n_arms,
        params.n_layers,
        blobs.len()
    );

    Poster {
        blobs,
        caption: Caption::default(),
        view: ViewBounds::default(),
    }
}
