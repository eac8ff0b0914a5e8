//! Captured frames and the sensor platform that produced them.

use crate::bayer::CFA;
use crate::color::{ColorMatrix, COLOR_MATRIX_LEN};
use crate::raster::RawImage;

/// Pixel type of a frame's image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelFormat {
    Raw,
    Rgb24,
    Rgb16,
    Uyvy,
    Yuv24,
    Unknown,
}

/// Static description of the sensor a frame came from.
pub trait Platform {
    /// The sensor's CFA, or `None` when it is not a Bayer sensor.
    fn bayer_pattern(&self) -> Option<CFA>;

    /// Smallest code value the sensor produces.
    fn min_raw_value(&self) -> u16;

    /// Largest code value the sensor produces.
    fn max_raw_value(&self) -> u16;

    /// Sensor RGB to display RGB matrix for a white balance in kelvin.
    fn raw_to_rgb_color_matrix(&self, white_balance: u32) -> ColorMatrix;
}

/// A [`Platform`] calibrated under two illuminants.
///
/// The matrix for an arbitrary white balance is interpolated linearly in
/// inverse colour temperature between the two calibration points, and
/// held at the nearer one outside their span.
#[derive(Clone, Debug)]
pub struct CalibratedPlatform {
    pub cfa: Option<CFA>,
    pub min_raw: u16,
    pub max_raw: u16,
    /// (colour temperature in kelvin, matrix) for the warmer illuminant.
    pub warm: (u32, ColorMatrix),
    /// (colour temperature in kelvin, matrix) for the cooler illuminant.
    pub cool: (u32, ColorMatrix),
}

impl CalibratedPlatform {
    /// A platform whose matrix is `matrix` at every white balance.
    pub fn fixed(cfa: Option<CFA>, min_raw: u16, max_raw: u16, matrix: ColorMatrix) -> Self {
        CalibratedPlatform {
            cfa,
            min_raw,
            max_raw,
            warm: (3200, matrix),
            cool: (7000, matrix),
        }
    }
}

impl Platform for CalibratedPlatform {
    fn bayer_pattern(&self) -> Option<CFA> {
        self.cfa
    }

    fn min_raw_value(&self) -> u16 {
        self.min_raw
    }

    fn max_raw_value(&self) -> u16 {
        self.max_raw
    }

    fn raw_to_rgb_color_matrix(&self, white_balance: u32) -> ColorMatrix {
        let (k0, m0) = self.warm;
        let (k1, m1) = self.cool;
        if white_balance == 0 || k0 == 0 || k1 == 0 || k0 == k1 {
            return m0;
        }

        let inv = |k: u32| 1.0 / k as f32;
        let alpha = ((inv(white_balance) - inv(k0)) / (inv(k1) - inv(k0))).clamp(0.0, 1.0);

        let mut coeffs = [0.0f32; COLOR_MATRIX_LEN];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = alpha * m1.coeffs()[i] + (1.0 - alpha) * m0.coeffs()[i];
        }
        ColorMatrix::new(coeffs)
    }
}

/// Capture parameters reported with a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shot {
    /// Explicit colour matrix. Only used when it has exactly 12 entries.
    pub color_matrix: Vec<f32>,
    /// White balance in kelvin.
    pub white_balance: u32,
    /// Exposure time in microseconds.
    pub exposure: u32,
    pub gain: f32,
}

/// An immutable capture handed over by the capture side.
#[derive(Clone)]
pub struct Frame<'a> {
    pub image: RawImage<'a>,
    pub format: PixelFormat,
    pub platform: &'a dyn Platform,
    pub shot: Shot,
}

impl<'a> Frame<'a> {
    pub fn new(image: RawImage<'a>, platform: &'a dyn Platform, shot: Shot) -> Self {
        Frame {
            image,
            format: PixelFormat::Raw,
            platform,
            shot,
        }
    }
}
