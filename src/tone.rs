//! Tone curve: black level, gamma and contrast folded into one table.
//!
//! ```text
//!   y = ((v - min) / (max - min)) ^ (1 / gamma)
//!   b = 2 - 2 ^ (contrast / 100),  a = 2 - 2b
//!   y <= 0.5 :  y = a y^2 + b y
//!   y >  0.5 :  y = 1 - (a (1-y)^2 + b (1-y))
//! ```

/// Number of entries in the table; code values are at most 12 bits.
pub const TONE_LUT_SIZE: usize = 4096;

/// Linear code value to display byte lookup table.
///
/// Built for exactly one combination of raw range, black level,
/// contrast and gamma.
#[derive(Clone)]
pub struct ToneCurve {
    lut: [u8; TONE_LUT_SIZE],
    max_code: u16,
}

impl ToneCurve {
    /// Build the table for the sensor range `[min_raw + black_level, max_raw]`.
    ///
    /// Both bounds are clamped into `[0, 4095]`. A sensor reporting a
    /// `max_raw` above 4095 gets the curve spread over `[lo, 4095]`, and
    /// [`ToneCurve::max_code`] is 4095 rather than `max_raw`.
    pub fn new(min_raw: u16, max_raw: u16, black_level: i32, contrast: f32, gamma: f32) -> Self {
        let top = TONE_LUT_SIZE as i32 - 1;
        let lo = (min_raw as i32 + black_level).clamp(0, top) as usize;
        let hi = (max_raw as i32).clamp(0, top) as usize;

        let mut lut = [0u8; TONE_LUT_SIZE];

        if hi > lo {
            let inv_range = 1.0f32 / (hi - lo) as f32;
            let b = 2.0 - 2.0f32.powf(contrast / 100.0);
            let a = 2.0 - 2.0 * b;

            for (i, e) in lut.iter_mut().enumerate().take(hi + 1).skip(lo + 1) {
                let mut y = (i - lo) as f32 * inv_range;
                y = y.powf(1.0 / gamma);
                if y > 0.5 {
                    y = 1.0 - y;
                    y = a * y * y + b * y;
                    y = 1.0 - y;
                } else {
                    y = a * y * y + b * y;
                }
                *e = (y * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8;
            }
        }

        // Guard band.
        for e in lut.iter_mut().skip(hi.max(lo) + 1) {
            *e = 255;
        }

        ToneCurve {
            lut,
            max_code: hi as u16,
        }
    }

    /// Largest code value with its own entry; colour-matrix output is
    /// clamped to this.
    pub fn max_code(&self) -> u16 {
        self.max_code
    }

    #[inline]
    pub fn lookup(&self, code: u16) -> u8 {
        self.lut[(code as usize).min(TONE_LUT_SIZE - 1)]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.lut
    }
}
