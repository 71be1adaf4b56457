//! Compile-time pixel-format policy and the 8-bit multiply table.
//!
//! The rasterizer is generic over [`PixelFormat`]; picking [`Argb32`],
//! [`Rgb565`] or [`Gray8`] at construction time selects the color buffer
//! element width and the packing/attenuation arithmetic in one place instead
//! of scattering it through the kernels.

use once_cell::sync::Lazy;

/// `mul8(i, j) == (i * j) >> 8`, precomputed once.
///
/// Replaces a per-pixel multiply + shift with a lookup; on the CPUs this
/// library targets that is the difference between shading being free and
/// shading dominating the span loop.
static MUL8: Lazy<Box<[[u8; 256]; 256]>> = Lazy::new(|| {
    let mut table = Box::new([[0u8; 256]; 256]);
    for i in 0..256 {
        for j in 0..256 {
            table[i][j] = ((i * j) >> 8) as u8;
        }
    }
    table
});

/// Scaled 8-bit product `(a * b) >> 8` via the precomputed table.
#[inline(always)]
pub fn mul8(a: u8, b: u8) -> u8 {
    MUL8[a as usize][b as usize]
}

/// Intensity factor for distance shading, derived from an interpolated
/// depth value in the span loop's precision domain.
///
/// Values of 256 and above mean "draw at full brightness" - lit kernels
/// must not feed them to the multiply table.
#[inline(always)]
pub(crate) fn falloff(z: i32) -> i32 {
    (z >> 20) * 3 / 2
}

/// Color buffer element policy: packing and intensity scaling for one
/// packed-pixel representation.
pub trait PixelFormat {
    /// One color buffer element.
    type Texel: Copy + PartialEq + core::fmt::Debug;

    /// Pack an 8-bit RGB triple into a texel.
    fn pack(r: u8, g: u8, b: u8) -> Self::Texel;

    /// Scale a texel by `d / 256`.  `d >= 256` returns the texel unchanged
    /// (full brightness, and keeps the table lookup in range).
    fn attenuate(t: Self::Texel, d: i32) -> Self::Texel;
}

/// 32-bit `0x00RRGGBB` packed color.
pub enum Argb32 {}

impl PixelFormat for Argb32 {
    type Texel = u32;

    #[inline(always)]
    fn pack(r: u8, g: u8, b: u8) -> u32 {
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    #[inline(always)]
    fn attenuate(t: u32, d: i32) -> u32 {
        if d >= 256 {
            return t;
        }
        let d = d as u8;
        (mul8(d, (t >> 16) as u8) as u32) << 16
            | (mul8(d, (t >> 8) as u8) as u32) << 8
            | mul8(d, t as u8) as u32
    }
}

/// 16-bit RGB565 packed color.
pub enum Rgb565 {}

impl PixelFormat for Rgb565 {
    type Texel = u16;

    #[inline(always)]
    fn pack(r: u8, g: u8, b: u8) -> u16 {
        ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
    }

    #[inline(always)]
    fn attenuate(t: u16, d: i32) -> u16 {
        if d >= 256 {
            return t;
        }
        let d = d as u8;
        // widen each channel to its 8-bit position, scale, repack
        let r = mul8(d, ((t >> 8) & 0xF8) as u8) as u16;
        let g = mul8(d, ((t >> 3) & 0xFC) as u8) as u16;
        let b = mul8(d, ((t << 3) & 0xF8) as u8) as u16;
        ((r & 0xF8) << 8) | ((g & 0xFC) << 3) | (b >> 3)
    }
}

/// 8-bit single-channel (luminance) color.
pub enum Gray8 {}

impl PixelFormat for Gray8 {
    type Texel = u8;

    /// Only the first channel is meaningful for a luminance buffer.
    #[inline(always)]
    fn pack(r: u8, _g: u8, _b: u8) -> u8 {
        r
    }

    #[inline(always)]
    fn attenuate(t: u8, d: i32) -> u8 {
        if d >= 256 { t } else { mul8(d as u8, t) }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul8_identity() {
        for i in 0..=255u16 {
            for j in 0..=255u16 {
                assert_eq!(mul8(i as u8, j as u8) as u16, (i * j) >> 8);
            }
        }
    }

    #[test]
    fn attenuate_full_brightness_is_exact() {
        let t = Argb32::pack(0x12, 0x84, 0xFE);
        assert_eq!(Argb32::attenuate(t, 256), t);
        assert_eq!(Argb32::attenuate(t, 1000), t);
    }

    #[test]
    fn attenuate_zero_is_black() {
        assert_eq!(Argb32::attenuate(Argb32::pack(0xFF, 0xFF, 0xFF), 0), 0);
        assert_eq!(Rgb565::attenuate(Rgb565::pack(0xFF, 0xFF, 0xFF), 0), 0);
        assert_eq!(Gray8::attenuate(0xFF, 0), 0);
    }

    #[test]
    fn attenuate_scales_channels_independently() {
        let t = Argb32::pack(0x80, 0x40, 0x20);
        let half = Argb32::attenuate(t, 128);
        assert_eq!(half, Argb32::pack(0x40, 0x20, 0x10));
    }

    #[test]
    fn falloff_crosses_full_brightness() {
        // (z >> 20) * 3 / 2 == 256  <=>  z >> 20 >= 171
        assert!(falloff(171 << 20) >= 256);
        assert!(falloff(170 << 20) < 256);
        assert_eq!(falloff(0), 0);
    }

    #[test]
    fn rgb565_pack_layout() {
        assert_eq!(Rgb565::pack(0xFF, 0, 0), 0xF800);
        assert_eq!(Rgb565::pack(0, 0xFF, 0), 0x07E0);
        assert_eq!(Rgb565::pack(0, 0, 0xFF), 0x001F);
    }
}
