//! Depth-buffer edge detection, run after a frame is rasterized.
//!
//! Two stateless passes that stamp an edge color into an output buffer
//! wherever neighboring depth samples differ by more than a threshold; used
//! to composite silhouette outlines over the color buffer.

/// `true` when `a` and `b` differ by strictly less than `delta`.
///
/// Symmetric in `a` and `b`; a difference of exactly `delta` counts as
/// *not* equal.
#[inline(always)]
pub fn delta_eq(a: i32, b: i32, delta: i32) -> bool {
    // widened so a full-range sample next to a sentinel cannot overflow
    let (a, b, delta) = (a as i64, b as i64, delta as i64);
    a > b - delta && a < b + delta
}

/// 1-D edge pass: compares each sample to its immediate predecessor and
/// stamps `edge` into `out` at every index whose difference reaches `delta`.
///
/// Index 0 has no predecessor and is never evaluated.
pub fn mark_edges<I, T>(input: &[I], out: &mut [T], delta: i32, edge: T)
where
    I: Copy + Into<i32>,
    T: Copy,
{
    for i in 1..input.len() {
        if !delta_eq(input[i].into(), input[i - 1].into(), delta) {
            out[i] = edge;
        }
    }
}

/// 2-D edge pass over a row-major buffer of row length `width`: flags a
/// sample when either its left neighbor or the neighbor one row along the
/// buffer differs by `delta` or more.
///
/// Index 0 and the final `width` samples lack a neighbor and are never
/// evaluated.
pub fn mark_edges_2d<I, T>(input: &[I], out: &mut [T], width: usize, delta: i32, edge: T)
where
    I: Copy + Into<i32>,
    T: Copy,
{
    for i in 1..input.len().saturating_sub(width) {
        let here: i32 = input[i].into();
        if !delta_eq(here, input[i - 1].into(), delta) || !delta_eq(here, input[i + width].into(), delta)
        {
            out[i] = edge;
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
