//! Sensor to display colour conversion.

use crate::frame::Frame;

/// Number of coefficients in a 3x4 colour matrix.
pub const COLOR_MATRIX_LEN: usize = 12;

/// A 3x4 affine map from sensor RGB to display RGB.
///
/// Rows are R, G, B; each row holds three multipliers followed by an
/// offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix([f32; COLOR_MATRIX_LEN]);

impl ColorMatrix {
    pub fn new(coeffs: [f32; COLOR_MATRIX_LEN]) -> Self {
        ColorMatrix(coeffs)
    }

    #[rustfmt::skip]
    pub fn identity() -> Self {
        ColorMatrix([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Build from a slice of exactly 12 coefficients.
    pub fn from_slice(coeffs: &[f32]) -> Option<Self> {
        let coeffs: [f32; COLOR_MATRIX_LEN] = coeffs.try_into().ok()?;
        Some(ColorMatrix(coeffs))
    }

    pub fn coeffs(&self) -> [f32; COLOR_MATRIX_LEN] {
        self.0
    }

    /// The shot's own matrix when it has one, otherwise the platform
    /// default for the shot's white balance.
    pub fn for_frame(frame: &Frame) -> Self {
        match ColorMatrix::from_slice(&frame.shot.color_matrix) {
            Some(m) => m,
            None => frame
                .platform
                .raw_to_rgb_color_matrix(frame.shot.white_balance),
        }
    }

    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        let [r, g, b] = rgb;
        [
            m[0] * r + m[1] * g + m[2] * b + m[3],
            m[4] * r + m[5] * g + m[6] * b + m[7],
            m[8] * r + m[9] * g + m[10] * b + m[11],
        ]
    }
}

/// Round half up and clamp to `[0, max]`.
#[inline]
pub fn to_code(v: f32, max: u16) -> u16 {
    if v.is_nan() || v <= 0.0 {
        0
    } else if v > max as f32 {
        max
    } else {
        (v + 0.5).floor().min(max as f32) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::{to_code, ColorMatrix};

    #[test]
    fn test_apply() {
        let m = ColorMatrix::new([
            1.0, 2.0, 0.0, 10.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.5, 0.0, 0.5, -4.0,
        ]);
        assert_eq!(m.apply([1.0, 2.0, 3.0]), [15.0, 2.0, -2.0]);
        assert_eq!(ColorMatrix::identity().apply([7.0, 8.0, 9.0]), [7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_from_slice_needs_twelve() {
        assert!(ColorMatrix::from_slice(&[]).is_none());
        assert!(ColorMatrix::from_slice(&[0.0; 9]).is_none());
        assert_eq!(
            ColorMatrix::from_slice(&ColorMatrix::identity().coeffs()),
            Some(ColorMatrix::identity())
        );
    }

    #[test]
    fn test_to_code_clamps_and_rounds() {
        assert_eq!(to_code(-3.0, 1023), 0);
        assert_eq!(to_code(2000.0, 1023), 1023);
        assert_eq!(to_code(1022.6, 1023), 1023);
        assert_eq!(to_code(10.49, 1023), 10);
        assert_eq!(to_code(10.5, 1023), 11);
        assert_eq!(to_code(f32::NAN, 1023), 0);
    }
}
