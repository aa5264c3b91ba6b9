//! Perceptual pixel matcher.
//!
//! Pixels are compared by a weighted distance in YIQ space, with translucent
//! pixels blended onto white first. Differences that look like anti-aliasing
//! (an edge pixel sitting between a darker and a brighter neighbour that both
//! belong to flat regions in both images) are not counted unless requested.

use image::RgbaImage;

use crate::error::{DiffError, Result};
use crate::types::MatchOptions;

/// Largest possible value of [`color_delta`] for opaque pixels.
const MAX_YIQ_DELTA: f64 = 35215.0;

#[derive(Debug, Clone)]
pub struct Comparison {
    pub diff_count: u64,
    pub diff_image: RgbaImage,
}

/// Compares two images of equal size, rendering the differences into a new image.
pub fn compare(img1: &RgbaImage, img2: &RgbaImage, options: &MatchOptions) -> Result<Comparison> {
    if img1.dimensions() != img2.dimensions() {
        return Err(DiffError::Comparison(format!(
            "image dimensions do not match: {}x{} vs {}x{}",
            img1.width(),
            img1.height(),
            img2.width(),
            img2.height()
        )));
    }

    let (width, height) = img1.dimensions();
    let mut diff_image = RgbaImage::new(width, height);
    let diff_count = pixelmatch(
        img1.as_raw(),
        img2.as_raw(),
        Some(&mut *diff_image),
        width,
        height,
        options,
    )?;
    log::debug!("{} of {} pixels differ", diff_count, u64::from(width) * u64::from(height));

    Ok(Comparison { diff_count, diff_image })
}

/// Counts the pixels that differ between two RGBA8 buffers.
///
/// When `output` is given it receives the diff rendering: differing pixels in
/// `diff_color`, ignored anti-aliasing in `aa_color`, everything else as a
/// faded greyscale copy of `img1`.
pub fn pixelmatch(
    img1: &[u8],
    img2: &[u8],
    mut output: Option<&mut [u8]>,
    width: u32,
    height: u32,
    options: &MatchOptions,
) -> Result<u64> {
    if img1.len() != img2.len() || output.as_ref().is_some_and(|out| out.len() != img1.len()) {
        return Err(DiffError::Comparison("image sizes do not match".to_string()));
    }
    let width = width as usize;
    let height = height as usize;
    if img1.len() != width * height * 4 {
        return Err(DiffError::Comparison(format!(
            "image data size {} does not match {}x{}",
            img1.len(),
            width,
            height
        )));
    }

    if img1 == img2 {
        if let Some(out) = output.as_deref_mut() {
            if !options.diff_mask {
                for pos in (0..img1.len()).step_by(4) {
                    draw_gray_pixel(img1, pos, options.alpha, out);
                }
            }
        }
        return Ok(0);
    }

    let max_delta = MAX_YIQ_DELTA * options.threshold * options.threshold;
    let mut diff = 0;

    for y in 0..height {
        for x in 0..width {
            let pos = (y * width + x) * 4;
            let delta = color_delta(img1, img2, pos, pos, false);

            if delta.abs() > max_delta {
                let is_aa = !options.include_aa
                    && (antialiased(img1, x, y, width, height, img2)
                        || antialiased(img2, x, y, width, height, img1));
                if is_aa {
                    if let Some(out) = output.as_deref_mut() {
                        if !options.diff_mask {
                            draw_pixel(out, pos, options.aa_color);
                        }
                    }
                } else {
                    if let Some(out) = output.as_deref_mut() {
                        let color = match options.diff_color_alt {
                            Some(alt) if delta < 0.0 => alt,
                            _ => options.diff_color,
                        };
                        draw_pixel(out, pos, color);
                    }
                    diff += 1;
                }
            } else if let Some(out) = output.as_deref_mut() {
                if !options.diff_mask {
                    draw_gray_pixel(img1, pos, options.alpha, out);
                }
            }
        }
    }

    Ok(diff)
}

/// Clamped 3x3 window around (x, y), and whether (x, y) touches the image border.
fn neighbourhood(x: usize, y: usize, width: usize, height: usize) -> (usize, usize, usize, usize, bool) {
    let x0 = x.saturating_sub(1);
    let y0 = y.saturating_sub(1);
    let x2 = (x + 1).min(width - 1);
    let y2 = (y + 1).min(height - 1);
    let on_border = x == x0 || x == x2 || y == y0 || y == y2;
    (x0, y0, x2, y2, on_border)
}

fn antialiased(img: &[u8], x1: usize, y1: usize, width: usize, height: usize, img2: &[u8]) -> bool {
    let (x0, y0, x2, y2, on_border) = neighbourhood(x1, y1, width, height);
    let pos = (y1 * width + x1) * 4;

    // the border counts as one equal neighbour
    let mut zeroes = usize::from(on_border);
    let mut min = 0.0;
    let mut max = 0.0;
    let mut min_at = (0, 0);
    let mut max_at = (0, 0);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }

            let delta = color_delta(img, img, pos, (y * width + x) * 4, true);
            if delta == 0.0 {
                zeroes += 1;
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_at = (x, y);
            } else if delta > max {
                max = delta;
                max_at = (x, y);
            }
        }
    }

    // no darker or no brighter neighbour
    if min == 0.0 || max == 0.0 {
        return false;
    }

    (has_many_siblings(img, min_at.0, min_at.1, width, height)
        && has_many_siblings(img2, min_at.0, min_at.1, width, height))
        || (has_many_siblings(img, max_at.0, max_at.1, width, height)
            && has_many_siblings(img2, max_at.0, max_at.1, width, height))
}

/// True if more than two pixels around (x1, y1) are identical to it.
fn has_many_siblings(img: &[u8], x1: usize, y1: usize, width: usize, height: usize) -> bool {
    let (x0, y0, x2, y2, on_border) = neighbourhood(x1, y1, width, height);
    let pos = (y1 * width + x1) * 4;
    let mut zeroes = usize::from(on_border);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }

            let pos2 = (y * width + x) * 4;
            if img[pos..pos + 4] == img[pos2..pos2 + 4] {
                zeroes += 1;
            }
            if zeroes > 2 {
                return true;
            }
        }
    }

    false
}

/// Squared YIQ distance between pixel `k` of `img1` and pixel `m` of `img2`.
///
/// Negative when the first pixel is the brighter one. With `y_only` only the
/// signed brightness difference is returned.
fn color_delta(img1: &[u8], img2: &[u8], k: usize, m: usize, y_only: bool) -> f64 {
    if img1[k..k + 4] == img2[m..m + 4] {
        return 0.0;
    }

    let (r1, g1, b1) = blended_rgb(&img1[k..k + 4]);
    let (r2, g2, b2) = blended_rgb(&img2[m..m + 4]);

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;

    if y_only {
        return y;
    }

    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;
    if y1 > y2 { -delta } else { delta }
}

/// Composites a translucent pixel onto white.
fn blended_rgb(px: &[u8]) -> (f64, f64, f64) {
    let (r, g, b, a) = (px[0] as f64, px[1] as f64, px[2] as f64, px[3]);
    if a < 255 {
        let a = a as f64 / 255.0;
        (blend(r, a), blend(g, a), blend(b, a))
    } else {
        (r, g, b)
    }
}

fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}

fn blend(c: f64, a: f64) -> f64 {
    255.0 + (c - 255.0) * a
}

fn draw_pixel(output: &mut [u8], pos: usize, [r, g, b]: [u8; 3]) {
    output[pos] = r;
    output[pos + 1] = g;
    output[pos + 2] = b;
    output[pos + 3] = 255;
}

fn draw_gray_pixel(img: &[u8], pos: usize, alpha: f64, output: &mut [u8]) {
    let y = rgb2y(img[pos] as f64, img[pos + 1] as f64, img[pos + 2] as f64);
    let val = blend(y, alpha * img[pos + 3] as f64 / 255.0) as u8;
    draw_pixel(output, pos, [val, val, val]);
}
