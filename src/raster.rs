// src/raster.rs
use crate::palette::Rgba;
use crate::poster::{Caption, PlacedBlob, Poster, ViewBounds};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageBuffer, ImageOutputFormat, ImageResult, Rgb, RgbImage};
use ndarray::{s, Array2, Array3, ArrayViewMut1, ArrayViewMut3, Axis, Zip};
use std::io::Cursor;
use std::path::Path;

/// Vertical samples per pixel row when accumulating coverage
const SUBSAMPLES: usize = 4;

/// Side of the square plot area in inches: a 6x8 in figure with default
/// subplot margins and equal aspect leaves about 4.65 in per side
pub const CANVAS_INCHES: f64 = 4.65;

const BACKGROUND: [f64; 3] = [1.0, 1.0, 1.0];
const CAPTION_COLOR: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Side length of the square canvas in pixels
    pub size: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        // CANVAS_INCHES at 300 dpi
        RasterOptions { size: 1395 }
    }
}

/// Maps world coordinates onto a square pixel grid
#[derive(Debug, Clone, Copy)]
struct Viewport {
    view: ViewBounds,
    size: usize,
}

impl Viewport {
    fn new(view: ViewBounds, size: u32) -> Self {
        Viewport {
            view,
            size: size as usize,
        }
    }

    fn px_per_unit_x(&self) -> f64 {
        self.size as f64 / self.view.width()
    }

    fn px_per_unit_y(&self) -> f64 {
        self.size as f64 / self.view.height()
    }

    /// World point to continuous pixel coordinates, y pointing down
    fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.view.x_min) * self.px_per_unit_x(),
            (self.view.y_max - y) * self.px_per_unit_y(),
        )
    }
}

/// Anti-aliased nonzero-winding coverage of a closed polygon given in pixel space
pub fn polygon_coverage(points: &[(f64, f64)], width: usize, height: usize) -> Array2<f32> {
    let mut coverage = Array2::<f32>::zeros((height, width));
    if points.len() < 3 || width == 0 || height == 0 {
        return coverage;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    let row_start = min_y.floor().max(0.0) as usize;
    let row_end = (max_y.ceil().max(0.0) as usize).min(height);

    let weight = 1.0 / SUBSAMPLES as f32;
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for py in row_start..row_end {
        let mut row = coverage.row_mut(py);
        for sub in 0..SUBSAMPLES {
            let scan_y = py as f64 + (sub as f64 + 0.5) / SUBSAMPLES as f64;

            crossings.clear();
            for i in 0..points.len() {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % points.len()];
                let dir = if y0 <= scan_y && scan_y < y1 {
                    1
                } else if y1 <= scan_y && scan_y < y0 {
                    -1
                } else {
                    continue;
                };
                let t = (scan_y - y0) / (y1 - y0);
                crossings.push((x0 + t * (x1 - x0), dir));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding != 0 {
                    accumulate_span(&mut row, pair[0].0, pair[1].0, weight);
                }
            }
        }
    }

    coverage.mapv_inplace(|c| c.min(1.0));
    coverage
}

/// Adds `weight` times the horizontal overlap of [x0, x1) with each pixel
fn accumulate_span(row: &mut ArrayViewMut1<f32>, x0: f64, x1: f64, weight: f32) {
    let start = x0.floor().max(0.0) as usize;
    let end = (x1.ceil().max(0.0) as usize).min(row.len());
    for px in start..end {
        let overlap = x1.min(px as f64 + 1.0) - x0.max(px as f64);
        if overlap > 0.0 {
            row[px] += overlap as f32 * weight;
        }
    }
}

/// Alpha-composite `color` over `canvas` weighted by `coverage`
fn composite(mut canvas: ArrayViewMut3<f64>, coverage: &Array2<f32>, color: [f64; 3], opacity: f64) {
    Zip::from(canvas.lanes_mut(Axis(2)))
        .and(coverage)
        .par_for_each(|mut px, &cov| {
            if cov <= 0.0 {
                return;
            }
            let a = opacity * cov as f64;
            for (c, &src) in px.iter_mut().zip(color.iter()) {
                *c = *c * (1.0 - a) + src * a;
            }
        });
}

/// Pixel window (x0, y0, x1, y1) covering `points`, clipped to the canvas
fn pixel_window(points: &[(f64, f64)], size: usize) -> Option<(usize, usize, usize, usize)> {
    let (min_x, min_y, max_x, max_y) = points.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(lx, ly, hx, hy), &(x, y)| (lx.min(x), ly.min(y), hx.max(x), hy.max(y)),
    );
    let x0 = min_x.floor().max(0.0) as usize;
    let y0 = min_y.floor().max(0.0) as usize;
    let x1 = (max_x.ceil().max(0.0) as usize).min(size);
    let y1 = (max_y.ceil().max(0.0) as usize).min(size);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0, y0, x1, y1))
}

fn fill_blob(canvas: &mut Array3<f64>, viewport: &Viewport, blob: &PlacedBlob) {
    let points: Vec<(f64, f64)> = blob
        .shape
        .points()
        .map(|(x, y)| viewport.to_pixel(x, y))
        .collect();
    let Some((x0, y0, x1, y1)) = pixel_window(&points, viewport.size) else {
        log::trace!("blob at {:?} lies outside the view", blob.center);
        return;
    };

    // coverage and compositing only touch the blob's own window
    let local: Vec<(f64, f64)> = points
        .iter()
        .map(|&(x, y)| (x - x0 as f64, y - y0 as f64))
        .collect();
    let coverage = polygon_coverage(&local, x1 - x0, y1 - y0);
    composite(
        canvas.slice_mut(s![y0..y1, x0..x1, ..]),
        &coverage,
        blob.fill.color.rgb(),
        blob.fill.opacity(),
    );
}

/// Integer scale for the 8x8 font so its height matches the caption's point size
fn caption_scale(caption: &Caption, size: u32) -> usize {
    let dpi = size as f64 / CANVAS_INCHES;
    let height_px = caption.font_size_pt / 72.0 * dpi;
    ((height_px / 8.0).round() as usize).max(1)
}

/// Bitmap mask of the caption text, one bool per pixel
fn caption_mask(caption: &Caption, scale: usize) -> Array2<bool> {
    let glyph_w = 8 * scale;
    let chars: Vec<char> = caption.text.chars().collect();
    let mut mask = Array2::from_elem((8 * scale, (chars.len() * glyph_w + scale).max(1)), false);

    for (i, &c) in chars.iter().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(c) else {
            continue;
        };
        for (gy, &bits) in glyph.iter().enumerate() {
            // one-column smear for bold
            let bits = if caption.bold {
                bits as u16 | ((bits as u16) << 1)
            } else {
                bits as u16
            };
            for gx in 0..9 {
                if bits & (1 << gx) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        mask[[gy * scale + dy, i * glyph_w + gx * scale + dx]] = true;
                    }
                }
            }
        }
    }
    mask
}

fn draw_caption(canvas: &mut Array3<f64>, viewport: &Viewport, caption: &Caption) {
    let scale = caption_scale(caption, viewport.size as u32);
    let mask = caption_mask(caption, scale);
    let (ax, ay) = viewport.to_pixel(caption.anchor.0, caption.anchor.1);
    let (left, top) = (ax.round() as isize, ay.round() as isize);
    let color = CAPTION_COLOR.rgb();

    for ((my, mx), &on) in mask.indexed_iter() {
        if !on {
            continue;
        }
        let (px, py) = (left + mx as isize, top + my as isize);
        if px < 0 || py < 0 || px as usize >= viewport.size || py as usize >= viewport.size {
            continue;
        }
        let mut lane = canvas.slice_mut(s![py as usize, px as usize, ..]);
        for (c, &src) in lane.iter_mut().zip(color.iter()) {
            *c = *c * (1.0 - CAPTION_COLOR.a) + src * CAPTION_COLOR.a;
        }
    }
}

/// Rasterize the poster: blobs in draw order, then the caption
pub fn render(poster: &Poster, options: &RasterOptions) -> RgbImage {
    let viewport = Viewport::new(poster.view, options.size);
    let size = viewport.size;

    let mut canvas = Array3::from_shape_fn((size, size, 3), |(_, _, c)| BACKGROUND[c]);

    for blob in &poster.blobs {
        fill_blob(&mut canvas, &viewport, blob);
    }
    draw_caption(&mut canvas, &viewport, &poster.caption);

    log::debug!("rasterized {} blobs at {size}x{size}", poster.blobs.len());

    let mut img = ImageBuffer::new(options.size, options.size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let (x, y) = (x as usize, y as usize);
        *pixel = Rgb([0usize, 1, 2].map(|c| (canvas[[y, x, c]].clamp(0.0, 1.0) * 255.0).round() as u8));
    }
    img
}

pub fn encode_png(img: &RgbImage) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)?;
    Ok(buf)
}

pub fn save<P: AsRef<Path>>(poster: &Poster, path: P, options: &RasterOptions) -> ImageResult<()> {
    render(poster, options).save(path)
}
