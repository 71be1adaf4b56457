//! Frame state: resolution, viewport, borrowed buffers, per-frame counters.

use thiserror::Error;

use crate::depth::DepthFormat;
use crate::pixel::PixelFormat;
use crate::raster::scan::ScanTables;

/// Errors raised while binding an engine context to its buffers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    /// Zero-sized resolutions have no pixels to own.
    #[error("resolution {0}x{1} is not positive")]
    BadResolution(usize, usize),

    /// A buffer cannot back the requested resolution.
    #[error("{what} buffer holds {got} elements, {needed} required")]
    BufferTooSmall {
        what: &'static str,
        got: usize,
        needed: usize,
    },
}

/// Active drawing rectangle, inclusive on all sides, always contained in
/// the resolution rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
    /// Perspective focal point; only moved when the caller asks.
    pub center_x: i32,
    pub center_y: i32,
}

/// The rasterizer context.
///
/// Borrows externally owned color and depth buffers for its whole lifetime;
/// every scratch table is sized once here so the per-polygon path never
/// allocates.  One context equals one drawing "thread": draw calls run to
/// completion and the scratch tables are rebuilt per polygon.
pub struct Raster<'b, P: PixelFormat, D: DepthFormat> {
    pub(crate) color: &'b mut [P::Texel],
    pub(crate) depth: &'b mut [D::Elem],
    pub(crate) hres: usize,
    pub(crate) vres: usize,
    pub(crate) vp: Viewport,
    pub(crate) scan: ScanTables,
    polygon_count: u64,
}

impl<'b, P: PixelFormat, D: DepthFormat> core::fmt::Debug for Raster<'b, P, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Raster")
            .field("hres", &self.hres)
            .field("vres", &self.vres)
            .field("vp", &self.vp)
            .field("polygon_count", &self.polygon_count)
            .finish_non_exhaustive()
    }
}

impl<'b, P: PixelFormat, D: DepthFormat> Raster<'b, P, D> {
    /// Bind buffers and derive viewport/resolution state.
    ///
    /// The viewport starts as the full resolution rectangle with the
    /// perspective center in the middle.
    pub fn new(
        color: &'b mut [P::Texel],
        depth: &'b mut [D::Elem],
        hres: usize,
        vres: usize,
    ) -> Result<Self, RasterError> {
        if hres == 0 || vres == 0 {
            return Err(RasterError::BadResolution(hres, vres));
        }
        let needed = hres * vres;
        if color.len() < needed {
            return Err(RasterError::BufferTooSmall {
                what: "color",
                got: color.len(),
                needed,
            });
        }
        if depth.len() < needed {
            return Err(RasterError::BufferTooSmall {
                what: "depth",
                got: depth.len(),
                needed,
            });
        }
        let mut raster = Self {
            color,
            depth,
            hres,
            vres,
            vp: Viewport {
                min_x: 0,
                min_y: 0,
                max_x: 0,
                max_y: 0,
                center_x: 0,
                center_y: 0,
            },
            scan: ScanTables::new(vres),
            polygon_count: 0,
        };
        raster.set_viewport(0, 0, hres as i32 - 1, vres as i32 - 1, true);
        Ok(raster)
    }

    /// Restrict drawing to an inclusive rectangle.
    ///
    /// `update_center` moves the perspective focal point to the middle of
    /// the new rectangle; leaving it keeps off-center projection setups
    /// intact across letterboxing changes.
    pub fn set_viewport(
        &mut self,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        update_center: bool,
    ) {
        assert!(
            0 <= min_x && min_x <= max_x && (max_x as usize) < self.hres,
            "viewport x range {min_x}..={max_x} outside 0..{}",
            self.hres
        );
        assert!(
            0 <= min_y && min_y <= max_y && (max_y as usize) < self.vres,
            "viewport y range {min_y}..={max_y} outside 0..{}",
            self.vres
        );
        self.vp.min_x = min_x;
        self.vp.min_y = min_y;
        self.vp.max_x = max_x;
        self.vp.max_y = max_y;
        if update_center {
            self.vp.center_x = min_x + (max_x - min_x) / 2;
            self.vp.center_y = min_y + (max_y - min_y) / 2;
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.vp
    }

    #[inline]
    pub fn hres(&self) -> usize {
        self.hres
    }

    #[inline]
    pub fn vres(&self) -> usize {
        self.vres
    }

    /// Read-only view of the bound color buffer (for presentation).
    #[inline]
    pub fn color(&self) -> &[P::Texel] {
        self.color
    }

    /// Read-only view of the bound depth buffer (for post-filtering).
    #[inline]
    pub fn depth(&self) -> &[D::Elem] {
        self.depth
    }

    /// Fill the viewport's color rectangle with a solid color.
    pub fn clear_color(&mut self, r: u8, g: u8, b: u8) {
        let texel = P::pack(r, g, b);
        for y in self.vp.min_y..=self.vp.max_y {
            let row = y as usize * self.hres;
            let (lo, hi) = (row + self.vp.min_x as usize, row + self.vp.max_x as usize);
            self.color[lo..=hi].fill(texel);
        }
    }

    /// Reset the viewport's depth rectangle to the farthest value.
    pub fn clear_depth(&mut self) {
        for y in self.vp.min_y..=self.vp.max_y {
            let row = y as usize * self.hres;
            let (lo, hi) = (row + self.vp.min_x as usize, row + self.vp.max_x as usize);
            self.depth[lo..=hi].fill(D::FAR);
        }
    }

    /// Clear color and depth in one call.
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        self.clear_color(r, g, b);
        self.clear_depth();
    }

    /// Polygons submitted since the last reset, visible or not.
    #[inline]
    pub fn polygon_count(&self) -> u64 {
        self.polygon_count
    }

    pub fn reset_polygon_count(&mut self) {
        self.polygon_count = 0;
    }

    #[inline(always)]
    pub(crate) fn count_polygon(&mut self) {
        self.polygon_count += 1;
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthFull;
    use crate::pixel::{Argb32, PixelFormat as _};

    #[test]
    fn rejects_short_buffers() {
        let mut color = vec![0u32; 10];
        let mut depth = vec![0i32; 64];
        let err = Raster::<Argb32, DepthFull>::new(&mut color, &mut depth, 8, 8).unwrap_err();
        assert_eq!(
            err,
            RasterError::BufferTooSmall {
                what: "color",
                got: 10,
                needed: 64
            }
        );
    }

    #[test]
    fn rejects_zero_resolution() {
        let mut color = vec![0u32; 0];
        let mut depth = vec![0i32; 0];
        let err = Raster::<Argb32, DepthFull>::new(&mut color, &mut depth, 0, 8).unwrap_err();
        assert_eq!(err, RasterError::BadResolution(0, 8));
    }

    #[test]
    fn initial_viewport_covers_resolution() {
        let mut color = vec![0u32; 256 * 128];
        let mut depth = vec![0i32; 256 * 128];
        let r = Raster::<Argb32, DepthFull>::new(&mut color, &mut depth, 256, 128).unwrap();
        let vp = r.viewport();
        assert_eq!((vp.min_x, vp.min_y, vp.max_x, vp.max_y), (0, 0, 255, 127));
        assert_eq!((vp.center_x, vp.center_y), (127, 63));
    }

    #[test]
    fn set_viewport_keeps_center_when_asked() {
        let mut color = vec![0u32; 64 * 64];
        let mut depth = vec![0i32; 64 * 64];
        let mut r = Raster::<Argb32, DepthFull>::new(&mut color, &mut depth, 64, 64).unwrap();
        let old_center = (r.viewport().center_x, r.viewport().center_y);
        r.set_viewport(10, 10, 20, 20, false);
        assert_eq!((r.viewport().center_x, r.viewport().center_y), old_center);
        r.set_viewport(10, 10, 20, 20, true);
        assert_eq!((r.viewport().center_x, r.viewport().center_y), (15, 15));
    }

    #[test]
    fn clear_touches_only_the_viewport() {
        let mut color = vec![0u32; 16 * 16];
        let mut depth = vec![0i32; 16 * 16];
        let mut r = Raster::<Argb32, DepthFull>::new(&mut color, &mut depth, 16, 16).unwrap();
        r.set_viewport(4, 4, 11, 11, true);
        r.clear(0xAA, 0xBB, 0xCC);
        let texel = Argb32::pack(0xAA, 0xBB, 0xCC);
        assert_eq!(r.color()[4 * 16 + 4], texel);
        assert_eq!(r.color()[11 * 16 + 11], texel);
        assert_eq!(r.color()[0], 0);
        assert_eq!(r.color()[3 * 16 + 4], 0);
        assert_eq!(r.depth()[5 * 16 + 5], i32::MAX);
        assert_eq!(r.depth()[0], 0);
    }
}
