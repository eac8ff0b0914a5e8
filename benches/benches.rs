//! Develop benchmarks.

#![cfg_attr(feature = "bench", feature(test))]

#[cfg(all(feature = "bench", test))]
mod bench {
    extern crate test;

    use cfa_develop::*;

    const IMG_W: usize = 648;
    const IMG_H: usize = 488;
    const SRC_U16: [u8; 2 * IMG_W * IMG_H] = [0u8; 2 * IMG_W * IMG_H];

    fn platform() -> CalibratedPlatform {
        CalibratedPlatform::fixed(Some(CFA::RGGB), 0, 1023, ColorMatrix::identity())
    }

    fn config(backend: Backend) -> DevelopConfig {
        DevelopConfig::builder().backend(backend).build()
    }

    #[bench]
    fn bench_demosaic_scalar(b: &mut test::Bencher) {
        let platform = platform();
        let raw = RawImage::new(&SRC_U16, IMG_W, IMG_H, 2 * IMG_W, SampleOrder::LittleEndian);
        let frame = Frame::new(raw, &platform, Shot::default());
        let config = config(Backend::Scalar);
        b.iter(|| demosaic(&frame, &config, &DiscardEvents));
    }

    #[bench]
    fn bench_demosaic_parallel(b: &mut test::Bencher) {
        let platform = platform();
        let raw = RawImage::new(&SRC_U16, IMG_W, IMG_H, 2 * IMG_W, SampleOrder::LittleEndian);
        let frame = Frame::new(raw, &platform, Shot::default());
        let config = config(Backend::Parallel);
        b.iter(|| demosaic(&frame, &config, &DiscardEvents));
    }

    #[bench]
    fn bench_thumbnail_scalar(b: &mut test::Bencher) {
        let platform = platform();
        let raw = RawImage::new(&SRC_U16, IMG_W, IMG_H, 2 * IMG_W, SampleOrder::LittleEndian);
        let frame = Frame::new(raw, &platform, Shot::default());
        let config = config(Backend::Scalar);
        b.iter(|| make_thumbnail(&frame, Size::new(160, 120), &config));
    }

    #[bench]
    fn bench_thumbnail_parallel(b: &mut test::Bencher) {
        let platform = platform();
        let raw = RawImage::new(&SRC_U16, IMG_W, IMG_H, 2 * IMG_W, SampleOrder::LittleEndian);
        let frame = Frame::new(raw, &platform, Shot::default());
        let config = config(Backend::Parallel);
        b.iter(|| make_thumbnail(&frame, Size::new(160, 120), &config));
    }

    #[bench]
    fn bench_tone_curve(b: &mut test::Bencher) {
        b.iter(|| ToneCurve::new(0, 1023, 25, 50.0, 2.2));
    }
}
