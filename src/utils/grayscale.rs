/// Luminance helpers over 4-channel RGBA sample buffers.
///
/// Locator luminance: Y = 0.299*R + 0.587*G + 0.114*B, computed as
/// Y = (76*R + 150*G + 29*B) >> 8 and ignoring alpha.
///
/// The retry transform uses Rec. 709 weights after flattening alpha onto a
/// white background, so transparent or tinted captures binarize differently
/// on the second attempt.
use rayon::prelude::*;

const COEF_R: i32 = 76;
const COEF_G: i32 = 150;
const COEF_B: i32 = 29;

// Rec. 709 in 1/10000 units
const REC709_R: u32 = 2126;
const REC709_G: u32 = 7152;
const REC709_B: u32 = 722;

/// Luminance of one RGBA pixel (alpha ignored).
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as i32 + COEF_G * g as i32 + COEF_B * b as i32) >> 8;
    lum.min(255) as u8
}

/// Convert RGBA to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = Vec::with_capacity(pixel_count);
    for px in rgba.chunks_exact(4).take(pixel_count) {
        gray.push(luma(px[0], px[1], px[2]));
    }
    gray
}

/// Convert RGBA to grayscale, processing rows in parallel
pub fn rgba_to_grayscale_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    if width == 0 || rgba.len() < pixel_count * 4 {
        return rgba_to_grayscale(rgba, width, height);
    }

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * 4;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * 4;
            *out = luma(rgba[idx], rgba[idx + 1], rgba[idx + 2]);
        }
    });

    gray
}

/// Flatten alpha onto white and replace every pixel with its Rec. 709
/// luminance, in place. The buffer stays 4-channel and fully opaque.
pub fn desaturate_rgba_in_place(rgba: &mut [u8], width: usize) {
    if width == 0 {
        return;
    }
    rgba.par_chunks_mut(width * 4).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let alpha = px[3] as u32;
            let over_white = |c: u8| (c as u32 * alpha + 255 * (255 - alpha)) / 255;
            let (r, g, b) = (over_white(px[0]), over_white(px[1]), over_white(px[2]));
            let lum = ((REC709_R * r + REC709_G * g + REC709_B * b + 5000) / 10000).min(255) as u8;
            px[0] = lum;
            px[1] = lum;
            px[2] = lum;
            px[3] = 255;
        }
    });
}
