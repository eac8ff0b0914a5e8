//! Edge-directed demosaic over overlapping tiles.
//!
//! The GRBG-aligned input is cut into 40x24 output tiles. Each tile is
//! loaded with a 4 pixel halo on every side and split into its four
//! same-phase planes, so plane index (y, x) holds the 2x2 cell whose
//! top-left raw sample is (2x, 2y) of the tile:
//!
//! ```text
//!   gr r
//!   b  gb
//! ```
//!
//! Green at r and b is taken from the direction with the smaller
//! gradient. Red and blue at green are averaged along the sub-phase axis
//! and corrected by the local green difference. Red at b and blue at r
//! take the diagonal with the smaller gradient, corrected the same way.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::trace;

use crate::color::{to_code, ColorMatrix};
use crate::config::Backend;
use crate::raster::{Image, RawImage, RGB_BYTES_PER_PIXEL};
use crate::tone::ToneCurve;

/// Output tile width in pixels.
pub const BLOCK_WIDTH: usize = 40;
/// Output tile height in pixels.
pub const BLOCK_HEIGHT: usize = 24;
/// Raw pixels lost to interpolation support, per axis.
pub const BORDER: usize = 8;

/// Plane width: half a tile plus two cells of halo each side.
const PW: usize = BLOCK_WIDTH / 2 + 4;
/// Plane height: half a tile plus two cells of halo each side.
const PH: usize = BLOCK_HEIGHT / 2 + 4;

type Plane = [[i32; PW]; PH];

// Sites within a 2x2 cell.
const GR: usize = 0;
const R: usize = 1;
const B: usize = 2;
const GB: usize = 3;

// Output channels.
const RED: usize = 0;
const GREEN: usize = 1;
const BLUE: usize = 2;

/// An interpolation candidate: (value, gradient).
type Candidate = (i32, i32);

#[inline]
fn average(a: i32, b: i32) -> i32 {
    (a + b) / 2
}

#[inline]
fn candidate(a: i32, b: i32) -> Candidate {
    (average(a, b), (a - b).abs())
}

/// Take `first` only if its gradient is strictly smaller.
#[inline]
fn select(first: Candidate, second: Candidate) -> i32 {
    if first.1 < second.1 {
        first.0
    } else {
        second.0
    }
}

/// Scratch planes for one tile plus halo.
pub struct Tile {
    raw: [Plane; 4],
    /// Linear values indexed by [channel][site].
    linear: [[Plane; 4]; 3],
}

impl Tile {
    pub fn new() -> Box<Self> {
        Box::new(Tile {
            raw: [[[0; PW]; PH]; 4],
            linear: [[[[0; PW]; PH]; 4]; 3],
        })
    }

    /// Split the raw tile whose output origin is (`bx`, `by`) into planes.
    fn load(&mut self, input: &RawImage, bx: usize, by: usize) {
        for y in 0..PH {
            for x in 0..PW {
                let (rx, ry) = (bx + 2 * x, by + 2 * y);
                self.raw[GR][y][x] = input.sample(rx, ry) as i32;
                self.raw[R][y][x] = input.sample(rx + 1, ry) as i32;
                self.raw[B][y][x] = input.sample(rx, ry + 1) as i32;
                self.raw[GB][y][x] = input.sample(rx + 1, ry + 1) as i32;
            }
        }
    }

    /// Copy the raw planes into place, optionally clamping every interior
    /// sample to the largest of its four same-phase neighbours.
    fn suppress_hot_pixels(&mut self, denoise: bool) {
        for (site, channel) in [(GR, GREEN), (R, RED), (B, BLUE), (GB, GREEN)] {
            let src = &self.raw[site];
            let dst = &mut self.linear[channel][site];
            *dst = *src;

            if !denoise {
                continue;
            }

            for y in 1..PH - 1 {
                for x in 1..PW - 1 {
                    let limit = src[y - 1][x]
                        .max(src[y + 1][x])
                        .max(src[y][x - 1])
                        .max(src[y][x + 1]);
                    dst[y][x] = src[y][x].min(limit);
                }
            }
        }
    }

    /// Horizontal and vertical green candidates at the r site of cell (y, x).
    fn green_at_r(&self, y: usize, x: usize) -> [Candidate; 2] {
        let gr = &self.linear[GREEN][GR];
        let gb = &self.linear[GREEN][GB];
        [
            candidate(gr[y][x], gr[y][x + 1]),
            candidate(gb[y - 1][x], gb[y][x]),
        ]
    }

    /// Horizontal and vertical green candidates at the b site of cell (y, x).
    fn green_at_b(&self, y: usize, x: usize) -> [Candidate; 2] {
        let gr = &self.linear[GREEN][GR];
        let gb = &self.linear[GREEN][GB];
        [
            candidate(gb[y][x], gb[y][x - 1]),
            candidate(gr[y + 1][x], gr[y][x]),
        ]
    }

    fn interpolate_green(&mut self) {
        for y in 1..PH - 1 {
            for x in 1..PW - 1 {
                let [h, v] = self.green_at_r(y, x);
                self.linear[GREEN][R][y][x] = select(h, v);

                let [h, v] = self.green_at_b(y, x);
                self.linear[GREEN][B][y][x] = select(h, v);
            }
        }
    }

    /// Red and blue at both green sites.
    fn interpolate_at_green(&mut self) {
        for y in 1..PH - 1 {
            for x in 1..PW - 1 {
                let [r, b] = [&self.linear[RED][R], &self.linear[BLUE][B]];
                let [g_r, g_b] = [&self.linear[GREEN][R], &self.linear[GREEN][B]];
                let g_gr = self.linear[GREEN][GR][y][x];
                let g_gb = self.linear[GREEN][GB][y][x];

                let r_gr = average(r[y][x - 1], r[y][x]) + g_gr - average(g_r[y][x - 1], g_r[y][x]);
                let b_gr = average(b[y - 1][x], b[y][x]) + g_gr - average(g_b[y - 1][x], g_b[y][x]);
                let r_gb = average(r[y][x], r[y + 1][x]) + g_gb - average(g_r[y][x], g_r[y + 1][x]);
                let b_gb = average(b[y][x], b[y][x + 1]) + g_gb - average(g_b[y][x], g_b[y][x + 1]);

                self.linear[RED][GR][y][x] = r_gr;
                self.linear[BLUE][GR][y][x] = b_gr;
                self.linear[RED][GB][y][x] = r_gb;
                self.linear[BLUE][GB][y][x] = b_gb;
            }
        }
    }

    /// Red at b and blue at r, each from the better of two diagonals.
    fn interpolate_diagonal(&mut self) {
        for y in 1..PH - 1 {
            for x in 1..PW - 1 {
                let [r, b] = [&self.linear[RED][R], &self.linear[BLUE][B]];
                let [g_r, g_b] = [&self.linear[GREEN][R], &self.linear[GREEN][B]];

                let rp = (
                    average(r[y + 1][x - 1], r[y][x]) + g_b[y][x]
                        - average(g_r[y + 1][x - 1], g_r[y][x]),
                    (r[y + 1][x - 1] - r[y][x]).abs(),
                );
                let rn = (
                    average(r[y][x - 1], r[y + 1][x]) + g_b[y][x]
                        - average(g_r[y][x - 1], g_r[y + 1][x]),
                    (r[y][x - 1] - r[y + 1][x]).abs(),
                );

                let bp = (
                    average(b[y - 1][x + 1], b[y][x]) + g_r[y][x]
                        - average(g_b[y - 1][x + 1], g_b[y][x]),
                    (b[y - 1][x + 1] - b[y][x]).abs(),
                );
                let bn = (
                    average(b[y][x + 1], b[y - 1][x]) + g_r[y][x]
                        - average(g_b[y][x + 1], g_b[y - 1][x]),
                    (b[y][x + 1] - b[y - 1][x]).abs(),
                );

                self.linear[RED][B][y][x] = select(rp, rn);
                self.linear[BLUE][R][y][x] = select(bp, bn);
            }
        }
    }

    /// Colour-correct and tone the interior cells into the output rows of
    /// this tile row, starting at column `bx`.
    fn store(
        &self,
        rows: &mut [u8],
        stride: usize,
        bx: usize,
        cm: &ColorMatrix,
        curve: &ToneCurve,
    ) {
        for y in 2..PH - 2 {
            for x in 2..PW - 2 {
                let ox = bx + (x - 2) * 2;
                let oy = (y - 2) * 2;

                for (site, dx, dy) in [(GR, 0, 0), (R, 1, 0), (B, 0, 1), (GB, 1, 1)] {
                    let i = (oy + dy) * stride + (ox + dx) * RGB_BYTES_PER_PIXEL;
                    let rgb = [
                        self.linear[RED][site][y][x],
                        self.linear[GREEN][site][y][x],
                        self.linear[BLUE][site][y][x],
                    ];
                    develop_pixel(&mut rows[i..i + RGB_BYTES_PER_PIXEL], rgb, cm, curve);
                }
            }
        }
    }

    /// Demosaic every tile of the tile row at output row `by`.
    #[allow(clippy::too_many_arguments)]
    fn develop_row(
        &mut self,
        input: &RawImage,
        by: usize,
        rows: &mut [u8],
        stride: usize,
        denoise: bool,
        cm: &ColorMatrix,
        curve: &ToneCurve,
    ) {
        let out_w = stride / RGB_BYTES_PER_PIXEL;
        for bx in (0..out_w).step_by(BLOCK_WIDTH) {
            self.load(input, bx, by);
            self.suppress_hot_pixels(denoise);
            self.interpolate_green();
            self.interpolate_at_green();
            self.interpolate_diagonal();
            self.store(rows, stride, bx, cm, curve);
        }
    }
}

/// Sensor RGB to a toned display pixel.
#[inline]
fn develop_pixel(dst: &mut [u8], rgb: [i32; 3], cm: &ColorMatrix, curve: &ToneCurve) {
    let out = cm.apply([rgb[0] as f32, rgb[1] as f32, rgb[2] as f32]);
    for (d, v) in dst.iter_mut().zip(out) {
        *d = curve.lookup(to_code(v, curve.max_code()));
    }
}

/// Demosaic `input` into `out`.
///
/// `input` must be GRBG-aligned and exactly `BORDER` pixels wider and
/// taller than `out`, whose dimensions are multiples of the tile size.
pub fn run(
    input: &RawImage,
    cm: &ColorMatrix,
    curve: &ToneCurve,
    denoise: bool,
    backend: Backend,
    out: &mut Image,
) {
    debug_assert_eq!(input.width(), out.width() + BORDER);
    debug_assert_eq!(input.height(), out.height() + BORDER);
    debug_assert_eq!(out.width() % BLOCK_WIDTH, 0);
    debug_assert_eq!(out.height() % BLOCK_HEIGHT, 0);

    let stride = out.bytes_per_row();
    let tile_rows = BLOCK_HEIGHT * stride;

    match backend {
        #[cfg(feature = "rayon")]
        Backend::Parallel => {
            out.as_bytes_mut()
                .par_chunks_mut(tile_rows)
                .enumerate()
                .for_each_init(Tile::new, |tile, (ty, rows)| {
                    trace!(tile_row = ty, "demosaic");
                    tile.develop_row(input, ty * BLOCK_HEIGHT, rows, stride, denoise, cm, curve);
                });
        }
        _ => {
            let mut tile = Tile::new();
            for (ty, rows) in out.as_bytes_mut().chunks_mut(tile_rows).enumerate() {
                trace!(tile_row = ty, "demosaic");
                tile.develop_row(input, ty * BLOCK_HEIGHT, rows, stride, denoise, cm, curve);
            }
        }
    }
}
