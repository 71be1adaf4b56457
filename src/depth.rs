//! Compile-time depth-buffer element policy.
//!
//! The scan converter interpolates depth with [`crate::raster::Z_FRAC_BITS`]
//! extra precision bits; a [`DepthFormat`] decides how much of that survives
//! in the stored element.  [`Depth16`] halves the buffer footprint, which on
//! a 256x128 target frees 8 KiB.

/// Depth buffer element policy.
///
/// The engine's depth convention is *strictly less is nearer*: a pixel is
/// only touched when the incoming interpolated value is less than the stored
/// one after both are aligned into the full precision domain.  Equal values
/// never overwrite, so re-drawing the same surface cannot flicker.
pub trait DepthFormat {
    /// One depth buffer element.
    type Elem: Copy + PartialEq + core::fmt::Debug;

    /// Farthest representable value; what [`crate::Raster::clear_depth`]
    /// fills with.
    const FAR: Self::Elem;

    /// Strict nearer-test against `slot`; on pass, stores `candidate`
    /// (dropping the reduced bits) and returns `true`.
    fn test_and_set(slot: &mut Self::Elem, candidate: i32) -> bool;
}

/// Full-precision depth: one `i32` per pixel.
pub enum DepthFull {}

impl DepthFormat for DepthFull {
    type Elem = i32;
    const FAR: i32 = i32::MAX;

    #[inline(always)]
    fn test_and_set(slot: &mut i32, candidate: i32) -> bool {
        if candidate < *slot {
            *slot = candidate;
            true
        } else {
            false
        }
    }
}

/// Reduced-precision depth: one `i16` per pixel, aligned by a 16-bit shift
/// for comparison.
pub enum Depth16 {}

impl DepthFormat for Depth16 {
    type Elem = i16;
    const FAR: i16 = i16::MAX;

    #[inline(always)]
    fn test_and_set(slot: &mut i16, candidate: i32) -> bool {
        if candidate < (*slot as i32) << 16 {
            *slot = (candidate >> 16) as i16;
            true
        } else {
            false
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
