//! 2-D viewport clipping for vertex streams.
//!
//! The scan converter trusts these results without re-validating: a polygon
//! comes back with every x inside the viewport, and a y-clipped edge with
//! both endpoints inside the row range.  Attribute values are interpolated
//! at the cut with 64-bit intermediates so large fixed-point Z/U/V deltas
//! cannot overflow.

use smallvec::SmallVec;

use crate::raster::{MAX_POLY_VERTS, STRIDE_TEX};

/// A clipped vertex stream.  Inline capacity covers the worst post-clip
/// vertex count of a textured polygon so the hot path stays on the stack.
pub(crate) type ClippedStream = SmallVec<[i32; 64]>;

/// One vertex with room for the widest stride.
type Vert = [i32; STRIDE_TEX];

#[inline]
fn load(stream: &[i32], stride: usize, idx: usize) -> Vert {
    let mut v = [0; STRIDE_TEX];
    v[..stride].copy_from_slice(&stream[idx * stride..][..stride]);
    v
}

/// Attribute-interpolated point on segment `a`->`b` where component `axis`
/// equals `bound`.
fn cut(a: &Vert, b: &Vert, stride: usize, axis: usize, bound: i32) -> Vert {
    let run = (b[axis] - a[axis]) as i64;
    let num = (bound - a[axis]) as i64;
    let mut out = [0; STRIDE_TEX];
    for i in 0..stride {
        out[i] = a[i] + (((b[i] - a[i]) as i64 * num) / run) as i32;
    }
    out[axis] = bound;
    out
}

/// Sutherland-Hodgman pass against a single bound of one axis.
fn clip_axis(
    input: &[Vert],
    stride: usize,
    axis: usize,
    bound: i32,
    keep_high: bool,
) -> SmallVec<[Vert; MAX_POLY_VERTS + 2]> {
    let inside = |v: &Vert| {
        if keep_high {
            v[axis] >= bound
        } else {
            v[axis] <= bound
        }
    };
    let mut out = SmallVec::new();
    for (i, a) in input.iter().enumerate() {
        let b = &input[(i + 1) % input.len()];
        match (inside(a), inside(b)) {
            (true, true) => out.push(*b),
            (true, false) => out.push(cut(a, b, stride, axis, bound)),
            (false, true) => {
                out.push(cut(a, b, stride, axis, bound));
                out.push(*b);
            }
            (false, false) => {}
        }
    }
    out
}

/// Clip a polygon stream against the viewport x-bounds.
///
/// Returns an empty stream when the polygon lies fully outside.
pub(crate) fn clip_poly_x(
    stream: &[i32],
    stride: usize,
    min_x: i32,
    max_x: i32,
) -> ClippedStream {
    let n = stream.len() / stride;
    let verts: SmallVec<[Vert; MAX_POLY_VERTS + 2]> =
        (0..n).map(|i| load(stream, stride, i)).collect();
    let verts = clip_axis(&verts, stride, 0, min_x, true);
    let verts = clip_axis(&verts, stride, 0, max_x, false);
    let mut out = ClippedStream::new();
    for v in &verts {
        out.extend_from_slice(&v[..stride]);
    }
    out
}

/// Clip one edge against the viewport y-bounds.
///
/// `None` when the edge lies fully above or below the row range; otherwise
/// both returned endpoints have y inside `[min_y, max_y]` with attributes
/// interpolated at any cut.
pub(crate) fn clip_edge_y(
    a: &[i32],
    b: &[i32],
    stride: usize,
    min_y: i32,
    max_y: i32,
) -> Option<(Vert, Vert)> {
    let mut va = [0; STRIDE_TEX];
    let mut vb = [0; STRIDE_TEX];
    va[..stride].copy_from_slice(&a[..stride]);
    vb[..stride].copy_from_slice(&b[..stride]);

    if (va[1] < min_y && vb[1] < min_y) || (va[1] > max_y && vb[1] > max_y) {
        return None;
    }
    if va[1] < min_y {
        va = cut(&va, &vb, stride, 1, min_y);
    } else if va[1] > max_y {
        va = cut(&va, &vb, stride, 1, max_y);
    }
    if vb[1] < min_y {
        vb = cut(&va, &vb, stride, 1, min_y);
    } else if vb[1] > max_y {
        vb = cut(&va, &vb, stride, 1, max_y);
    }
    Some((va, vb))
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::STRIDE_FLAT;

    #[test]
    fn edge_fully_outside_is_discarded() {
        let a = [5, -10, 100];
        let b = [9, -2, 200];
        assert!(clip_edge_y(&a, &b, STRIDE_FLAT, 0, 63).is_none());
        let c = [5, 70, 100];
        let d = [9, 90, 200];
        assert!(clip_edge_y(&c, &d, STRIDE_FLAT, 0, 63).is_none());
    }

    #[test]
    fn edge_inside_passes_through_unchanged() {
        let a = [5, 3, 100];
        let b = [9, 40, 200];
        let (ca, cb) = clip_edge_y(&a, &b, STRIDE_FLAT, 0, 63).unwrap();
        assert_eq!(&ca[..3], &a);
        assert_eq!(&cb[..3], &b);
    }

    #[test]
    fn edge_cut_interpolates_attributes() {
        // y runs -10 -> 10, so the midpoint sits at y == 0
        let a = [0, -10, 0];
        let b = [20, 10, 1000];
        let (ca, cb) = clip_edge_y(&a, &b, STRIDE_FLAT, 0, 63).unwrap();
        assert_eq!(ca[1], 0);
        assert_eq!(ca[0], 10);
        assert_eq!(ca[2], 500);
        assert_eq!(&cb[..3], &b);
    }

    #[test]
    fn poly_outside_x_range_vanishes() {
        let stream = [
            -30, 0, 1, //
            -20, 10, 1, //
            -25, 20, 1,
        ];
        assert!(clip_poly_x(&stream, STRIDE_FLAT, 0, 63).is_empty());
    }

    #[test]
    fn poly_straddling_min_x_is_cut() {
        let stream = [
            -10, 0, 0, //
            10, 0, 100, //
            10, 20, 100, //
            -10, 20, 0,
        ];
        let out = clip_poly_x(&stream, STRIDE_FLAT, 0, 63);
        let n = out.len() / STRIDE_FLAT;
        assert!(n >= 4);
        for v in out.chunks_exact(STRIDE_FLAT) {
            assert!(v[0] >= 0 && v[0] <= 63);
        }
        // a vertex cut at x == 0 carries the midpoint attribute
        assert!(
            out.chunks_exact(STRIDE_FLAT)
                .any(|v| v[0] == 0 && v[2] == 50)
        );
    }
}
