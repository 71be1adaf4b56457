//! Scan conversion and span filling.
//!
//! [`Raster`] owns the per-polygon scratch tables and borrows the caller's
//! color and depth buffers; the draw entry points (one per fill policy) live
//! in `fill`, the edge walk in `scan`, the viewport clipper it feeds from in
//! `clip`.

mod clip;
mod fill;
mod frame;
mod scan;

pub use frame::{Raster, RasterError, Viewport};

/// Fractional bits of the sub-pixel DDA accumulator the edge walk steps in.
pub const SCAN_FRAC_BITS: u32 = 18;

/// Half-step rounding offset applied to the x,y accumulators before a walk.
pub(crate) const SCAN_HALF: i32 = 1 << (SCAN_FRAC_BITS - 1);

/// Extra precision bits given to depth before per-step division, and kept
/// through span interpolation.  Distinct from the sub-pixel DDA precision:
/// this governs what the depth test compares, not where the edge walks.
pub const Z_FRAC_BITS: u32 = 15;

/// Most vertices a polygon may carry after clipping.
pub const MAX_POLY_VERTS: usize = 8;

/// Vertex stream stride for untextured polygons: X, Y, Z.
pub const STRIDE_FLAT: usize = 3;

/// Vertex stream stride for textured polygons: X, Y, Z, U, V.
pub const STRIDE_TEX: usize = 5;
