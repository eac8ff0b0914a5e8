//! Entry points that pick the demosaic or thumbnail path.

use tracing::debug;

use crate::demosaic::demosaic;
use crate::event::EventSink;
use crate::frame::{Frame, PixelFormat};
use crate::raster::{Image, Size};
use crate::thumbnail::make_thumbnail_raw;
use crate::DevelopConfig;

/// Build a thumbnail of any frame.
///
/// Only raw frames can be thumbnailed; every other pixel format, an
/// invalid image, or a zero-sized thumbnail yields an empty image.
pub fn make_thumbnail(frame: &Frame, size: Size, config: &DevelopConfig) -> Image {
    if !frame.image.is_valid() {
        return Image::empty();
    }
    if size.width == 0 || size.height == 0 {
        return Image::empty();
    }

    match frame.format {
        PixelFormat::Raw => make_thumbnail_raw(frame, size, config),
        other => {
            debug!("thumbnails of {:?} frames are not supported", other);
            Image::empty()
        }
    }
}

/// What to produce from a frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Request {
    /// Full-resolution demosaic.
    Full,
    /// Box-filtered preview of the given size.
    Thumbnail(Size),
}

/// Development parameters together with the sink errors are reported to.
pub struct Developer<S: EventSink> {
    config: DevelopConfig,
    sink: S,
}

impl<S: EventSink> Developer<S> {
    pub fn new(config: DevelopConfig, sink: S) -> Self {
        Developer { config, sink }
    }

    /// Give back the sink, e.g. to drain queued events.
    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn demosaic(&self, frame: &Frame) -> Image {
        demosaic(frame, &self.config, &self.sink)
    }

    pub fn thumbnail(&self, frame: &Frame, size: Size) -> Image {
        make_thumbnail(frame, size, &self.config)
    }

    pub fn develop(&self, frame: &Frame, request: Request) -> Image {
        match request {
            Request::Full => self.demosaic(frame),
            Request::Thumbnail(size) => self.thumbnail(frame, size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{make_thumbnail, Developer, Request};
    use crate::bayer::{SampleOrder, CFA};
    use crate::color::ColorMatrix;
    use crate::config::DevelopConfig;
    use crate::event::{EventCode, EventQueue};
    use crate::frame::{CalibratedPlatform, Frame, PixelFormat, Shot};
    use crate::raster::{RawImage, Size};

    #[test]
    fn test_only_raw_is_thumbnailed() {
        let platform = CalibratedPlatform::fixed(Some(CFA::GRBG), 0, 1023, ColorMatrix::identity());
        let buf = vec![0u8; 2 * 16 * 16];
        let mut frame = Frame::new(
            RawImage::new(&buf, 16, 16, 32, SampleOrder::LittleEndian),
            &platform,
            Shot::default(),
        );
        let config = DevelopConfig::default();

        assert!(make_thumbnail(&frame, Size::new(4, 4), &config).is_valid());
        assert!(!make_thumbnail(&frame, Size::new(0, 4), &config).is_valid());

        for format in [
            PixelFormat::Rgb24,
            PixelFormat::Rgb16,
            PixelFormat::Uyvy,
            PixelFormat::Yuv24,
            PixelFormat::Unknown,
        ] {
            frame.format = format;
            assert!(!make_thumbnail(&frame, Size::new(4, 4), &config).is_valid());
        }
    }

    #[test]
    fn test_invalid_image_is_empty() {
        let platform = CalibratedPlatform::fixed(Some(CFA::GRBG), 0, 1023, ColorMatrix::identity());
        let frame = Frame::new(RawImage::invalid(), &platform, Shot::default());
        assert!(!make_thumbnail(&frame, Size::new(4, 4), &DevelopConfig::default()).is_valid());
    }

    #[test]
    fn test_developer_routes_requests() {
        let platform = CalibratedPlatform::fixed(Some(CFA::BGGR), 0, 1023, ColorMatrix::identity());
        let buf = vec![0u8; 2 * 96 * 64];
        let frame = Frame::new(
            RawImage::new(&buf, 96, 64, 192, SampleOrder::LittleEndian),
            &platform,
            Shot::default(),
        );
        let dev = Developer::new(DevelopConfig::default(), EventQueue::new());

        let full = dev.develop(&frame, Request::Full);
        assert_eq!((full.width(), full.height()), (80, 48));

        let thumb = dev.develop(&frame, Request::Thumbnail(Size::new(24, 16)));
        assert_eq!((thumb.width(), thumb.height()), (24, 16));

        let bad = Frame::new(RawImage::invalid(), &platform, Shot::default());
        assert!(!dev.demosaic(&bad).is_valid());
        assert!(!dev.thumbnail(&bad, Size::new(4, 4)).is_valid());

        let events = dev.into_sink();
        assert_eq!(events.len(), 1);
        assert!(events.next_event(EventCode::DemosaicError).is_some());
    }
}
