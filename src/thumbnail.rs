//! Fast low-resolution previews straight from the mosaic.
//!
//! Every thumbnail pixel averages each colour channel over the
//! `scale` x `scale` block of photosites under it and uses those means
//! as the pixel's sensor RGB. This is a statistical approximation rather
//! than a demosaic: detail finer than a block is lost and colour edges
//! are softened, which is acceptable for a preview.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::debug;

use crate::bayer::CFA;
use crate::color::{to_code, ColorMatrix};
use crate::config::Backend;
use crate::frame::Frame;
use crate::raster::{Image, RawImage, Size, RGB_BYTES_PER_PIXEL};
use crate::tone::ToneCurve;
use crate::DevelopConfig;

/// Integer downscale factor and even-aligned crop origin for fitting a
/// `size` thumbnail into a `w` x `h` source, or `None` if it doesn't fit.
pub fn thumbnail_geometry(w: usize, h: usize, size: Size) -> Option<(usize, (usize, usize))> {
    if size.width == 0 || size.height == 0 {
        return None;
    }

    let scale = (w / size.width).min(h / size.height);
    if scale == 0 {
        return None;
    }

    let crop_x = ((w - scale * size.width) / 2) & !1;
    let crop_y = ((h - scale * size.height) / 2) & !1;
    Some((scale, (crop_x, crop_y)))
}

/// Mean sensor RGB over the `scale` x `scale` block at (`x0`, `y0`).
fn block_mean(src: &RawImage, cfa: CFA, x0: usize, y0: usize, scale: usize) -> [f32; 3] {
    let mut sums = [0u64; 3];
    let mut counts = [0u32; 3];

    for y in y0..y0 + scale {
        for x in x0..x0 + scale {
            let c = cfa.channel_at(x, y) as usize;
            sums[c] += src.sample(x, y) as u64;
            counts[c] += 1;
        }
    }

    let mut mean = [0.0f32; 3];
    for c in 0..3 {
        if counts[c] > 0 {
            mean[c] = sums[c] as f32 / counts[c] as f32;
        }
    }
    mean
}

/// Build a `size` RGB24 thumbnail of a raw frame by box filtering.
///
/// Returns an empty image, without reporting an error, when the sensor
/// is not a Bayer sensor or the thumbnail is larger than the frame.
pub fn make_thumbnail_raw(frame: &Frame, size: Size, config: &DevelopConfig) -> Image {
    let src = &frame.image;
    let cfa = match frame.platform.bayer_pattern() {
        Some(cfa) => cfa,
        None => return Image::empty(),
    };
    if !src.is_valid() {
        return Image::empty();
    }

    let (scale, (crop_x, crop_y)) = match thumbnail_geometry(src.width(), src.height(), size) {
        Some(g) => g,
        None => {
            debug!(
                "can't fit a {}x{} thumbnail in a {}x{} frame",
                size.width,
                size.height,
                src.width(),
                src.height()
            );
            return Image::empty();
        }
    };
    debug!(scale, crop_x, crop_y, "thumbnailing {}x{} raw", src.width(), src.height());

    let platform = frame.platform;
    let curve = ToneCurve::new(
        platform.min_raw_value(),
        platform.max_raw_value(),
        config.black_level,
        config.contrast,
        config.gamma,
    );
    let cm = ColorMatrix::for_frame(frame);

    let mut thumb = Image::new(size.width, size.height);
    let stride = thumb.bytes_per_row();

    let develop_row = |ty: usize, row: &mut [u8]| {
        let y0 = crop_y + ty * scale;
        for (tx, px) in row.chunks_mut(RGB_BYTES_PER_PIXEL).enumerate() {
            let x0 = crop_x + tx * scale;
            let rgb = cm.apply(block_mean(src, cfa, x0, y0, scale));
            for (d, v) in px.iter_mut().zip(rgb) {
                *d = curve.lookup(to_code(v, curve.max_code()));
            }
        }
    };

    match config.backend {
        #[cfg(feature = "rayon")]
        Backend::Parallel => {
            thumb
                .as_bytes_mut()
                .par_chunks_mut(stride)
                .enumerate()
                .for_each(|(ty, row)| develop_row(ty, row));
        }
        _ => {
            for (ty, row) in thumb.as_bytes_mut().chunks_mut(stride).enumerate() {
                develop_row(ty, row);
            }
        }
    }

    thumb
}
