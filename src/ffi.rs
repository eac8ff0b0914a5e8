//! Foreign function interface.

use std::ptr;
use std::slice;

use libc::{c_float, c_int, c_uchar, c_ushort, size_t};
use tracing::error;

use crate::bayer::{SampleOrder, CFA};
use crate::color::{ColorMatrix, COLOR_MATRIX_LEN};
use crate::config::{Backend, DevelopConfig};
use crate::demosaic::try_demosaic;
use crate::dispatch::make_thumbnail;
use crate::frame::{CalibratedPlatform, Frame, Shot};
use crate::raster::{Image, RawImage, Size, RGB_BYTES_PER_PIXEL};

/// Raw frame description passed from C.
///
/// `cfa` is 0 = BGGR, 1 = GBRG, 2 = GRBG, 3 = RGGB; any other value
/// marks a non-Bayer sensor. `color_matrix` points to 12 floats, or is
/// null to use the identity matrix.
#[repr(C)]
pub struct CRawFrame {
    pub buf: *const c_uchar,
    pub buf_len: size_t,
    pub width: size_t,
    pub height: size_t,
    pub stride: size_t,
    pub big_endian: c_int,
    pub cfa: c_int,
    pub min_raw: c_ushort,
    pub max_raw: c_ushort,
    pub color_matrix: *const c_float,
}

/// Development parameters passed from C.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct CDevelopParams {
    pub contrast: c_float,
    pub denoise: c_int,
    pub black_level: c_int,
    pub gamma: c_float,
    pub parallel: c_int,
}

impl From<&CDevelopParams> for DevelopConfig {
    fn from(p: &CDevelopParams) -> Self {
        DevelopConfig {
            contrast: p.contrast,
            denoise: p.denoise != 0,
            black_level: p.black_level,
            gamma: p.gamma,
            backend: if p.parallel != 0 {
                Backend::Parallel
            } else {
                Backend::Scalar
            },
        }
    }
}

fn cfa_from_code(code: c_int) -> Option<CFA> {
    match code {
        0 => Some(CFA::BGGR),
        1 => Some(CFA::GBRG),
        2 => Some(CFA::GRBG),
        3 => Some(CFA::RGGB),
        _ => None,
    }
}

/// Hand an image's pixels over to C, or null if the image is empty.
fn into_c_buffer(image: Image, out_w: *mut size_t, out_h: *mut size_t) -> *mut c_uchar {
    if !image.is_valid() {
        return ptr::null_mut();
    }

    unsafe {
        if !out_w.is_null() {
            *out_w = image.width();
        }
        if !out_h.is_null() {
            *out_h = image.height();
        }
    }

    Box::into_raw(image.into_vec().into_boxed_slice()) as *mut c_uchar
}

/// Run `f` on a frame and config built from the C structures.
///
/// # Safety
///
/// `frame` must describe `buf_len` readable bytes, and `color_matrix` must
/// be null or point to 12 floats.
unsafe fn with_frame<F>(
    frame: *const CRawFrame,
    params: *const CDevelopParams,
    f: F,
) -> Option<Image>
where
    F: FnOnce(&Frame, &DevelopConfig) -> Option<Image>,
{
    if frame.is_null() {
        error!("bad input parameters: null frame");
        return None;
    }
    let frame = &*frame;
    if frame.buf.is_null() {
        error!("bad input parameters: null buffer");
        return None;
    }

    let config = if params.is_null() {
        DevelopConfig::default()
    } else {
        DevelopConfig::from(&*params)
    };

    let color_matrix = if frame.color_matrix.is_null() {
        Vec::new()
    } else {
        slice::from_raw_parts(frame.color_matrix, COLOR_MATRIX_LEN).to_vec()
    };

    let order = if frame.big_endian != 0 {
        SampleOrder::BigEndian
    } else {
        SampleOrder::LittleEndian
    };
    let buf = slice::from_raw_parts(frame.buf, frame.buf_len);
    let image = RawImage::new(buf, frame.width, frame.height, frame.stride, order);

    let platform = CalibratedPlatform::fixed(
        cfa_from_code(frame.cfa),
        frame.min_raw,
        frame.max_raw,
        ColorMatrix::identity(),
    );
    let shot = Shot {
        color_matrix,
        ..Shot::default()
    };

    f(&Frame::new(image, &platform, shot), &config)
}

/// Demosaic a raw frame.
///
/// Returns a width x height x 3 RGB24 buffer and writes its dimensions
/// to `out_w` and `out_h`, or returns null on failure. A null `params`
/// selects the default parameters. Release the buffer with
/// [`cfadev_image_free`].
///
/// # Safety
///
/// `frame` must be null or point to a valid [`CRawFrame`]; `params` must be
/// null or point to a valid [`CDevelopParams`].
#[no_mangle]
pub unsafe extern "C" fn cfadev_demosaic(
    frame: *const CRawFrame,
    params: *const CDevelopParams,
    out_w: *mut size_t,
    out_h: *mut size_t,
) -> *mut c_uchar {
    let image = with_frame(frame, params, |frame, config| match try_demosaic(frame, config) {
        Ok(image) => Some(image),
        Err(e) => {
            error!("{}", e);
            None
        }
    });

    match image {
        Some(image) => into_c_buffer(image, out_w, out_h),
        None => ptr::null_mut(),
    }
}

/// Build a `thumb_w` x `thumb_h` RGB24 thumbnail of a raw frame.
///
/// Returns null if no thumbnail can be made. Release the buffer with
/// [`cfadev_image_free`].
///
/// # Safety
///
/// Same requirements as [`cfadev_demosaic`].
#[no_mangle]
pub unsafe extern "C" fn cfadev_thumbnail(
    frame: *const CRawFrame,
    params: *const CDevelopParams,
    thumb_w: size_t,
    thumb_h: size_t,
) -> *mut c_uchar {
    let size = Size::new(thumb_w, thumb_h);
    match with_frame(frame, params, |frame, config| Some(make_thumbnail(frame, size, config))) {
        Some(image) => into_c_buffer(image, ptr::null_mut(), ptr::null_mut()),
        None => ptr::null_mut(),
    }
}

/// The default development parameters.
#[no_mangle]
pub extern "C" fn cfadev_default_params() -> CDevelopParams {
    let config = DevelopConfig::default();
    CDevelopParams {
        contrast: config.contrast,
        denoise: config.denoise as c_int,
        black_level: config.black_level,
        gamma: config.gamma,
        parallel: (config.backend == Backend::Parallel) as c_int,
    }
}

/// Free a buffer returned by [`cfadev_demosaic`] or [`cfadev_thumbnail`].
///
/// # Safety
///
/// `buf` must be null or a buffer returned by this library for an image
/// of `w` x `h` pixels, not already freed.
#[no_mangle]
pub unsafe extern "C" fn cfadev_image_free(buf: *mut c_uchar, w: size_t, h: size_t) {
    if buf.is_null() {
        return;
    }

    let len = w * h * RGB_BYTES_PER_PIXEL;
    let _image = Box::from_raw(ptr::slice_from_raw_parts_mut(buf, len));
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::{
        cfadev_default_params, cfadev_demosaic, cfadev_image_free, cfadev_thumbnail, CRawFrame,
    };

    fn raw_frame(buf: &[u8], w: usize, h: usize, cfa: i32) -> CRawFrame {
        CRawFrame {
            buf: buf.as_ptr(),
            buf_len: buf.len(),
            width: w,
            height: h,
            stride: 2 * w,
            big_endian: 0,
            cfa,
            min_raw: 0,
            max_raw: 1023,
            color_matrix: ptr::null(),
        }
    }

    #[test]
    fn test_demosaic_roundtrip() {
        let buf = vec![0u8; 2 * 48 * 32];
        let frame = raw_frame(&buf, 48, 32, 2);
        let params = cfadev_default_params();
        let (mut w, mut h) = (0, 0);

        unsafe {
            let out = cfadev_demosaic(&frame, &params, &mut w, &mut h);
            assert!(!out.is_null());
            assert_eq!((w, h), (40, 24));
            cfadev_image_free(out, w, h);
        }
    }

    #[test]
    fn test_bad_input_is_null() {
        let buf = vec![0u8; 2 * 48 * 32];
        let (mut w, mut h) = (0, 0);

        unsafe {
            assert!(cfadev_demosaic(ptr::null(), ptr::null(), &mut w, &mut h).is_null());

            let frame = raw_frame(&buf, 48, 32, 7);
            assert!(cfadev_demosaic(&frame, ptr::null(), &mut w, &mut h).is_null());
            assert_eq!((w, h), (0, 0));
        }
    }

    #[test]
    fn test_thumbnail_with_matrix() {
        let buf = vec![0u8; 2 * 16 * 16];
        let matrix = [1.0f32, 0.0, 0.0, 10.0, 0.0, 1.0, 0.0, 20.0, 0.0, 0.0, 1.0, 30.0];
        let mut frame = raw_frame(&buf, 16, 16, 3);
        frame.max_raw = 255;
        frame.color_matrix = matrix.as_ptr();
        let mut params = cfadev_default_params();
        params.contrast = 0.0;
        params.gamma = 1.0;
        params.black_level = 0;

        unsafe {
            let out = cfadev_thumbnail(&frame, &params, 4, 4);
            assert!(!out.is_null());
            let pixels = std::slice::from_raw_parts(out, 4 * 4 * 3);
            assert!(pixels.chunks(3).all(|p| p == [10, 20, 30]));
            cfadev_image_free(out, 4, 4);

            assert!(cfadev_thumbnail(&frame, &params, 32, 32).is_null());
        }
    }
}
