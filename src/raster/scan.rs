//! Polygon scan conversion: edge walking into per-row span tables.
//!
//! Each edge is stepped along its major axis in a sub-pixel DDA; every row
//! it crosses competes for that row's left and right boundary.  Which
//! physical edge produced a boundary is irrelevant - only the resulting x
//! matters - so the walk is orientation-agnostic and handles any convex or
//! near-convex clipped polygon.

use crate::raster::clip::{clip_edge_y, clip_poly_x};
use crate::raster::frame::Viewport;
use crate::raster::{SCAN_FRAC_BITS, SCAN_HALF, Z_FRAC_BITS};

/// Interpolated attribute snapshot at a span boundary.
///
/// `z` carries [`Z_FRAC_BITS`] extra precision; `u`/`v` are only meaningful
/// for textured streams and stay zero otherwise.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub(crate) struct Attr {
    pub z: i32,
    pub u: i32,
    pub v: i32,
}

/// Record `x` as the row's left boundary iff strictly smaller than the
/// current one.  Ties keep the first writer.
#[inline(always)]
pub(crate) fn claim_left(slot: &mut i32, x: i32) -> bool {
    if *slot > x {
        *slot = x;
        true
    } else {
        false
    }
}

/// Record `x` as the row's right boundary iff strictly larger than the
/// current one.  Ties keep the first writer.
#[inline(always)]
pub(crate) fn claim_right(slot: &mut i32, x: i32) -> bool {
    if *slot < x {
        *slot = x;
        true
    } else {
        false
    }
}

/// Per-row span boundaries and boundary attribute snapshots for the polygon
/// currently being scan-converted.  Sized once for the full vertical
/// resolution; reset to sentinels at the start of every conversion so the
/// first edge visiting a row establishes both boundaries.
pub(crate) struct ScanTables {
    pub x_left: Vec<i32>,
    pub x_right: Vec<i32>,
    pub attr_left: Vec<Attr>,
    pub attr_right: Vec<Attr>,
    pub min_y: i32,
    pub max_y: i32,
}

impl ScanTables {
    pub fn new(vres: usize) -> Self {
        Self {
            x_left: vec![i32::MAX; vres],
            x_right: vec![i32::MIN; vres],
            attr_left: vec![Attr::default(); vres],
            attr_right: vec![Attr::default(); vres],
            min_y: i32::MAX,
            max_y: i32::MIN,
        }
    }

    /// Scan-convert one polygon stream (`stride` 3 or 5) into the tables.
    ///
    /// Returns `true` when the polygon produced no visible row, which
    /// includes polygons collapsing to a single row.
    pub fn convert(&mut self, stream: &[i32], stride: usize, vp: &Viewport) -> bool {
        debug_assert_eq!(stream.len() % stride, 0);
        // attributes are everything past x,y
        let rdim = stride - 2;

        self.min_y = i32::MAX;
        self.max_y = i32::MIN;
        self.x_left.fill(i32::MAX);
        self.x_right.fill(i32::MIN);

        let clipped = clip_poly_x(stream, stride, vp.min_x, vp.max_x);
        let n = clipped.len() / stride;
        for e in 0..n {
            let a = &clipped[e * stride..][..stride];
            let b = &clipped[((e + 1) % n) * stride..][..stride];
            let Some((va, vb)) = clip_edge_y(a, b, stride, vp.min_y, vp.max_y) else {
                continue;
            };

            let x = va[0];
            let y = va[1];
            self.min_y = self.min_y.min(y).min(vb[1]);
            self.max_y = self.max_y.max(y).max(vb[1]);

            let dx = vb[0] - x;
            let dy = vb[1] - y;
            let major = dx.abs().max(dy.abs());
            if major <= 0 {
                continue;
            }

            // depth gets its extra precision before the per-step division;
            // the remaining attributes divide with whatever they carry
            let mut at = [0i32; 3];
            let mut dt = [0i32; 3];
            at[0] = va[2] << Z_FRAC_BITS;
            dt[0] = ((vb[2] - va[2]) << Z_FRAC_BITS) / major;
            for i in 1..rdim {
                at[i] = va[2 + i];
                dt[i] = (vb[2 + i] - va[2 + i]) / major;
            }

            // half-step rounding on the positional accumulators only
            let mut fx = (x << SCAN_FRAC_BITS) + SCAN_HALF;
            let mut fy = (y << SCAN_FRAC_BITS) + SCAN_HALF;
            let step_x = (dx << SCAN_FRAC_BITS) / major;
            let step_y = (dy << SCAN_FRAC_BITS) / major;

            let mut remaining = major;
            loop {
                let sx = fx >> SCAN_FRAC_BITS;
                let sy = (fy >> SCAN_FRAC_BITS) as usize;
                let snapshot = Attr {
                    z: at[0],
                    u: at[1],
                    v: at[2],
                };
                if claim_left(&mut self.x_left[sy], sx) {
                    self.attr_left[sy] = snapshot;
                }
                if claim_right(&mut self.x_right[sy], sx) {
                    self.attr_right[sy] = snapshot;
                }
                fx += step_x;
                fy += step_y;
                for i in 0..rdim {
                    at[i] += dt[i];
                }
                if remaining == 0 {
                    break;
                }
                remaining -= 1;
            }
        }
        self.min_y >= self.max_y
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
