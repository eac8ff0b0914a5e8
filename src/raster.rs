//! Raster implementation.

use crate::bayer::SampleOrder;

/// Bytes per raw sample.
const RAW_BYTES_PER_SAMPLE: usize = 2;

/// Bytes per output pixel (RGB24).
pub const RGB_BYTES_PER_PIXEL: usize = 3;

/// Read-only view of a 16-bit raw buffer.
///
/// Coordinates passed to [`RawImage::sample`] are relative to the view's
/// origin, so cropping with [`RawImage::sub_image`] never copies.
#[derive(Clone, Debug)]
pub struct RawImage<'a> {
    buf: &'a [u8],
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    stride: usize,
    order: SampleOrder,
}

impl<'a> RawImage<'a> {
    /// Wrap a raw buffer. Stride is in number of bytes.
    ///
    /// No checks are made here; use [`RawImage::is_valid`] before
    /// reading samples.
    ///
    /// # Examples
    ///
    /// ```
    /// const IMG_W: usize = 64;
    /// const IMG_H: usize = 48;
    /// let buf = [0u8; 2 * IMG_W * IMG_H];
    ///
    /// let raw = cfa_develop::RawImage::new(
    ///     &buf,
    ///     IMG_W,
    ///     IMG_H,
    ///     2 * IMG_W,
    ///     cfa_develop::SampleOrder::LittleEndian,
    /// );
    /// assert!(raw.is_valid());
    /// ```
    pub fn new(buf: &'a [u8], w: usize, h: usize, stride: usize, order: SampleOrder) -> Self {
        Self::with_offset(buf, 0, 0, w, h, stride, order)
    }

    pub fn with_offset(
        buf: &'a [u8],
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        stride: usize,
        order: SampleOrder,
    ) -> Self {
        RawImage {
            buf,
            x,
            y,
            w,
            h,
            stride,
            order,
        }
    }

    /// An image with no pixels.
    pub fn invalid() -> Self {
        Self::new(&[], 0, 0, 0, SampleOrder::LittleEndian)
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn bytes_per_row(&self) -> usize {
        self.stride
    }

    /// True when the view is non-empty and every sample it addresses lies
    /// inside the buffer.
    pub fn is_valid(&self) -> bool {
        if self.w == 0 || self.h == 0 {
            return false;
        }

        let row_end = match self
            .x
            .checked_add(self.w)
            .and_then(|x1| x1.checked_mul(RAW_BYTES_PER_SAMPLE))
        {
            Some(v) => v,
            None => return false,
        };
        if row_end > self.stride {
            return false;
        }

        match self
            .y
            .checked_add(self.h - 1)
            .and_then(|last_row| last_row.checked_mul(self.stride))
            .and_then(|v| v.checked_add(row_end))
        {
            Some(end) => end <= self.buf.len(),
            None => false,
        }
    }

    /// A view of the `w` x `h` rectangle at (`x`, `y`) of this view.
    pub fn sub_image(&self, x: usize, y: usize, w: usize, h: usize) -> Self {
        RawImage {
            x: self.x + x,
            y: self.y + y,
            w,
            h,
            ..self.clone()
        }
    }

    /// The sample at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the sample lies outside the underlying buffer.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u16 {
        let start = self.stride * (self.y + y) + RAW_BYTES_PER_SAMPLE * (self.x + x);
        self.order
            .read_u16(&self.buf[start..start + RAW_BYTES_PER_SAMPLE])
    }
}

/// Requested output dimensions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub fn new(width: usize, height: usize) -> Self {
        Size { width, height }
    }
}

/// Owned interleaved RGB24 image.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Image {
    w: usize,
    h: usize,
    buf: Vec<u8>,
}

impl Image {
    /// Allocate a black image.
    pub fn new(w: usize, h: usize) -> Self {
        let len = w
            .checked_mul(h)
            .and_then(|n| n.checked_mul(RGB_BYTES_PER_PIXEL))
            .expect("overflow");
        Image {
            w,
            h,
            buf: vec![0; len],
        }
    }

    /// The invalid image returned on failure.
    pub fn empty() -> Self {
        Image::default()
    }

    pub fn is_valid(&self) -> bool {
        self.w > 0 && self.h > 0
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn bytes_per_row(&self) -> usize {
        RGB_BYTES_PER_PIXEL * self.w
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = RGB_BYTES_PER_PIXEL * (y * self.w + x);
        [self.buf[i], self.buf[i + 1], self.buf[i + 2]]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::{Image, RawImage};
    use crate::bayer::SampleOrder;

    #[test]
    fn test_raw_validity() {
        let buf = [0u8; 2 * 4 * 3];

        assert!(RawImage::new(&buf, 4, 3, 8, SampleOrder::LittleEndian).is_valid());
        assert!(!RawImage::new(&buf, 4, 4, 8, SampleOrder::LittleEndian).is_valid());
        assert!(!RawImage::new(&buf, 5, 3, 8, SampleOrder::LittleEndian).is_valid());
        assert!(!RawImage::new(&buf, 0, 3, 8, SampleOrder::LittleEndian).is_valid());
        assert!(!RawImage::new(&buf, usize::MAX, 1, 8, SampleOrder::LittleEndian).is_valid());
        assert!(!RawImage::invalid().is_valid());
    }

    #[test]
    fn test_sample_and_sub_image() {
        // 3x2 image with 2 bytes of row padding, big-endian.
        #[rustfmt::skip]
        let buf = [
            0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0xFF, 0xFF,
            0x01, 0x04, 0x01, 0x05, 0x01, 0x06, 0xFF, 0xFF,
        ];
        let raw = RawImage::new(&buf, 3, 2, 8, SampleOrder::BigEndian);
        assert!(raw.is_valid());
        assert_eq!(raw.sample(0, 0), 0x0001);
        assert_eq!(raw.sample(2, 1), 0x0106);

        let sub = raw.sub_image(1, 1, 2, 1);
        assert!(sub.is_valid());
        assert_eq!(sub.sample(0, 0), 0x0105);
        assert_eq!(sub.sample(1, 0), 0x0106);

        assert!(!raw.sub_image(2, 0, 3, 1).is_valid());
        assert!(!raw.sub_image(0, 1, 3, 2).is_valid());
    }

    #[test]
    fn test_image_rows() {
        let mut img = Image::new(2, 2);
        let row = img.bytes_per_row();
        img.as_bytes_mut()[row + 3..row + 6].copy_from_slice(&[1, 2, 3]);
        assert_eq!(img.pixel(1, 1), [1, 2, 3]);
        assert_eq!(img.pixel(0, 0), [0, 0, 0]);
        assert!(img.is_valid());
        assert!(!Image::empty().is_valid());
    }
}
