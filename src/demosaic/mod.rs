//! Full-resolution demosaic.

use tracing::{debug, warn};

use crate::bayer::normalize;
use crate::color::ColorMatrix;
use crate::event::{Event, EventSink};
use crate::frame::Frame;
use crate::raster::Image;
use crate::tone::ToneCurve;
use crate::{DevelopConfig, DevelopError, DevelopResult};

pub mod block;

pub use self::block::{BLOCK_HEIGHT, BLOCK_WIDTH, BORDER};

/// Output size for a GRBG-aligned input of `w` x `h`: the border is
/// dropped and each axis rounded down to whole tiles.
pub fn output_size(w: usize, h: usize) -> (usize, usize) {
    (
        w.saturating_sub(BORDER) / BLOCK_WIDTH * BLOCK_WIDTH,
        h.saturating_sub(BORDER) / BLOCK_HEIGHT * BLOCK_HEIGHT,
    )
}

/// Demosaic `frame`, reporting failures to `sink`.
///
/// Returns an empty image on failure; check [`Image::is_valid`].
pub fn demosaic<S: EventSink + ?Sized>(frame: &Frame, config: &DevelopConfig, sink: &S) -> Image {
    match try_demosaic(frame, config) {
        Ok(image) => image,
        Err(err) => {
            warn!("demosaic failed: {}", err);
            sink.post(Event::demosaic_error(&err));
            Image::empty()
        }
    }
}

/// Demosaic `frame` into an RGB24 image.
pub fn try_demosaic(frame: &Frame, config: &DevelopConfig) -> DevelopResult<Image> {
    let src = &frame.image;
    if !src.is_valid() {
        return Err(DevelopError::InvalidInput(
            "cannot demosaic an invalid image".to_string(),
        ));
    }
    if src.bytes_per_row() % 2 == 1 {
        return Err(DevelopError::UnsupportedLayout(
            "cannot demosaic an image with bytes per row not divisible by 2".to_string(),
        ));
    }

    let input = normalize(src, frame.platform.bayer_pattern())?;

    let (out_w, out_h) = output_size(input.width(), input.height());
    if out_w == 0 || out_h == 0 {
        return Err(DevelopError::InvalidInput(format!(
            "a {}x{} image is too small to demosaic",
            src.width(),
            src.height()
        )));
    }

    // Centre the tiled area, keeping the CFA phase.
    let off_x = ((input.width() - BORDER - out_w) / 2) & !1;
    let off_y = ((input.height() - BORDER - out_h) / 2) & !1;
    let input = input.sub_image(off_x, off_y, out_w + BORDER, out_h + BORDER);
    debug!(out_w, out_h, off_x, off_y, "demosaicing {}x{} raw", src.width(), src.height());

    let platform = frame.platform;
    let curve = ToneCurve::new(
        platform.min_raw_value(),
        platform.max_raw_value(),
        config.black_level,
        config.contrast,
        config.gamma,
    );
    let cm = ColorMatrix::for_frame(frame);

    let mut out = Image::new(out_w, out_h);
    block::run(&input, &cm, &curve, config.denoise, config.backend, &mut out);
    Ok(out)
}
