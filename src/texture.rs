//! Square power-of-two textures for the affine-mapped kernels.
//!
//! Texels are stored in whatever element type the active pixel format uses,
//! so sampling is a plain copy with no conversion in the span loop.

use thiserror::Error;

/// Fractional bits of the fixed-point U,V interpolation domain.
pub const TEX_FRAC_BITS: u32 = 12;

/// Things that can go wrong when building a texture.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    /// Side length below the 4-texel minimum the addressing scheme needs.
    #[error("texture side 1<<{0} is below the minimum of 1<<2")]
    SideTooSmall(u32),

    /// Texel vector does not hold exactly `side * side` elements.
    #[error("expected {expected} texels for a {side}x{side} bitmap, got {got}")]
    WrongTexelCount {
        side: usize,
        expected: usize,
        got: usize,
    },
}

/// A square bitmap whose side is `1 << log_dim`.
///
/// Squareness and the power-of-two side are what make the sampling math
/// valid: row and column indices occupy disjoint bit ranges, so they can be
/// combined with a bitwise OR instead of a multiply.
#[derive(Clone, Debug)]
pub struct Texture<T> {
    log_dim: u32,
    mask: i32,
    texels: Vec<T>,
}

impl<T: Copy> Texture<T> {
    /// Build a texture with side `1 << log_dim` from row-major texels.
    pub fn new(log_dim: u32, texels: Vec<T>) -> Result<Self, TextureError> {
        if log_dim < 2 {
            return Err(TextureError::SideTooSmall(log_dim));
        }
        let side = 1usize << log_dim;
        if texels.len() != side * side {
            return Err(TextureError::WrongTexelCount {
                side,
                expected: side * side,
                got: texels.len(),
            });
        }
        Ok(Self {
            log_dim,
            mask: (1 << (log_dim + TEX_FRAC_BITS)) - 1,
            texels,
        })
    }

    /// Side length in texels.
    #[inline]
    pub fn side(&self) -> usize {
        1 << self.log_dim
    }

    /// Wrap mask for the fixed-point U,V accumulators.
    #[inline(always)]
    pub(crate) fn mask(&self) -> i32 {
        self.mask
    }

    /// Texel at already-masked fixed-point coordinates.
    #[inline(always)]
    pub(crate) fn texel(&self, u_masked: i32, v_masked: i32) -> T {
        let idx = (u_masked >> TEX_FRAC_BITS) | (v_masked >> TEX_FRAC_BITS << self.log_dim);
        self.texels[idx as usize]
    }

    /// Nearest-neighbor sample at fixed-point `u`, `v`
    /// ([`TEX_FRAC_BITS`] fractional bits, wrapping by masking).
    #[inline]
    pub fn sample(&self, u: i32, v: i32) -> T {
        self.texel(u & self.mask, v & self.mask)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
