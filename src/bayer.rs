//! Bayer pattern definitions and pattern normalisation.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::raster::RawImage;
use crate::{DevelopError, DevelopResult};

/// The 2x2 colour filter array (CFA) pattern.
///
/// The sequence of R, G, B describe the colours of the top-left,
/// top-right, bottom-left, and bottom-right pixels in the 2x2 block,
/// in that order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CFA {
    BGGR,
    GBRG,
    GRBG,
    RGGB,
}

/// Colour of a single photosite.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

/// Byte order of the 16-bit raw samples.
///
/// Many sensors only capture 10 or 12 bits per pixel, but still store
/// the data as 16 bits per pixel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleOrder {
    BigEndian,
    LittleEndian,
}

impl SampleOrder {
    /// Decode the sample stored in the first two bytes of `buf`.
    #[inline]
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            SampleOrder::BigEndian => BigEndian::read_u16(buf),
            SampleOrder::LittleEndian => LittleEndian::read_u16(buf),
        }
    }

    /// Encode `v` into the first two bytes of `buf`.
    #[inline]
    pub fn write_u16(self, buf: &mut [u8], v: u16) {
        match self {
            SampleOrder::BigEndian => BigEndian::write_u16(buf, v),
            SampleOrder::LittleEndian => LittleEndian::write_u16(buf, v),
        }
    }
}

impl CFA {
    /// The 2x2 pixel block obtained when moving right 1 column.
    pub fn next_x(self) -> Self {
        match self {
            CFA::BGGR => CFA::GBRG,
            CFA::GBRG => CFA::BGGR,
            CFA::GRBG => CFA::RGGB,
            CFA::RGGB => CFA::GRBG,
        }
    }

    /// The 2x2 pixel block obtained when moving down 1 row.
    pub fn next_y(self) -> Self {
        match self {
            CFA::BGGR => CFA::GRBG,
            CFA::GBRG => CFA::RGGB,
            CFA::GRBG => CFA::BGGR,
            CFA::RGGB => CFA::GBRG,
        }
    }

    /// Colour of the photosite at column `x`, row `y`.
    pub fn channel_at(self, x: usize, y: usize) -> Channel {
        let top = match self {
            CFA::BGGR => [Channel::Blue, Channel::Green, Channel::Green, Channel::Red],
            CFA::GBRG => [Channel::Green, Channel::Blue, Channel::Red, Channel::Green],
            CFA::GRBG => [Channel::Green, Channel::Red, Channel::Blue, Channel::Green],
            CFA::RGGB => [Channel::Red, Channel::Green, Channel::Green, Channel::Blue],
        };
        top[(y & 1) * 2 + (x & 1)]
    }

    /// Leading (column, row) crop that brings this pattern to GRBG.
    pub fn grbg_offset(self) -> (usize, usize) {
        match (self, self.next_x(), self.next_y()) {
            (CFA::GRBG, _, _) => (0, 0),
            (_, CFA::GRBG, _) => (1, 0),
            (_, _, CFA::GRBG) => (0, 1),
            _ => (1, 1),
        }
    }
}

/// Crop `image` so that its top-left 2x2 block is GRBG.
///
/// Patterns that need realigning lose one leading row and/or column,
/// plus one trailing row and/or column so the cropped axes stay even.
pub fn normalize<'a>(image: &RawImage<'a>, pattern: Option<CFA>) -> DevelopResult<RawImage<'a>> {
    let cfa = pattern.ok_or_else(|| {
        DevelopError::UnsupportedLayout("can't demosaic from a non-bayer sensor".to_string())
    })?;

    match cfa.grbg_offset() {
        (0, 0) => Ok(image.clone()),
        (dx, dy) => {
            let w = image.width().saturating_sub(2 * dx);
            let h = image.height().saturating_sub(2 * dy);
            Ok(image.sub_image(dx, dy, w, h))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, Channel, SampleOrder, CFA};
    use crate::raster::RawImage;
    use crate::{DevelopError, ErrorKind};

    const ALL: [CFA; 4] = [CFA::BGGR, CFA::GBRG, CFA::GRBG, CFA::RGGB];

    #[test]
    fn test_next_xy_consistent_with_channel_at() {
        for cfa in ALL {
            for y in 0..2 {
                for x in 0..2 {
                    assert_eq!(cfa.next_x().channel_at(x, y), cfa.channel_at(x + 1, y));
                    assert_eq!(cfa.next_y().channel_at(x, y), cfa.channel_at(x, y + 1));
                }
            }
        }
    }

    #[test]
    fn test_grbg_offset() {
        assert_eq!(CFA::GRBG.grbg_offset(), (0, 0));
        assert_eq!(CFA::RGGB.grbg_offset(), (1, 0));
        assert_eq!(CFA::BGGR.grbg_offset(), (0, 1));
        assert_eq!(CFA::GBRG.grbg_offset(), (1, 1));
    }

    #[test]
    fn test_normalize_aligns_every_pattern() {
        const W: usize = 6;
        const H: usize = 4;

        for cfa in ALL {
            // Encode the channel of each photosite as its sample value.
            let mut buf = vec![0u8; 2 * W * H];
            for y in 0..H {
                for x in 0..W {
                    let i = 2 * (y * W + x);
                    let v = cfa.channel_at(x, y) as u16;
                    SampleOrder::LittleEndian.write_u16(&mut buf[i..], v);
                }
            }

            let raw = RawImage::new(&buf, W, H, 2 * W, SampleOrder::LittleEndian);
            let norm = normalize(&raw, Some(cfa)).unwrap();
            let (dx, dy) = cfa.grbg_offset();

            assert_eq!(norm.width(), W - 2 * dx);
            assert_eq!(norm.height(), H - 2 * dy);
            assert_eq!(norm.sample(0, 0), Channel::Green as u16);
            assert_eq!(norm.sample(1, 0), Channel::Red as u16);
            assert_eq!(norm.sample(0, 1), Channel::Blue as u16);
            assert_eq!(norm.sample(1, 1), Channel::Green as u16);
        }
    }

    #[test]
    fn test_normalize_rejects_non_bayer() {
        let buf = [0u8; 8];
        let raw = RawImage::new(&buf, 2, 2, 4, SampleOrder::LittleEndian);
        let err: DevelopError = normalize(&raw, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedLayout);
    }
}
