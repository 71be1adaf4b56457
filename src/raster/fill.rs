//! Span-filling pixel kernels, one public draw entry point per fill policy.
//!
//! Every span kernel shares the same row procedure: read the row's
//! boundaries, derive per-pixel attribute deltas from the boundary
//! snapshots, then walk the span depth-testing each pixel.  A zero-length
//! span still covers one pixel, so the delta divisor is bumped to 1 rather
//! than signalling anything.

use crate::depth::DepthFormat;
use crate::pixel::{PixelFormat, falloff};
use crate::raster::frame::Raster;
use crate::raster::{STRIDE_FLAT, STRIDE_TEX};
use crate::texture::Texture;

impl<'b, P: PixelFormat, D: DepthFormat> Raster<'b, P, D> {
    /// Solid fill with distance falloff.  Stream stride 3 (X,Y,Z).
    pub fn draw_flat(&mut self, stream: &[i32], color: P::Texel) {
        self.count_polygon();
        if self.scan.convert(stream, STRIDE_FLAT, &self.vp) {
            return;
        }
        for y in self.scan.min_y..=self.scan.max_y {
            let row = y as usize;
            let beg = self.scan.x_left[row];
            let len = self.scan.x_right[row] - beg;
            let dlen = len + (len == 0) as i32;
            let mut sz = self.scan.attr_left[row].z;
            let dz = (self.scan.attr_right[row].z - sz) / dlen;
            let mut idx = (row * self.hres) as i32 + beg;
            for _ in 0..=len {
                let i = idx as usize;
                if D::test_and_set(&mut self.depth[i], sz) {
                    self.color[i] = P::attenuate(color, falloff(sz));
                }
                sz += dz;
                idx += 1;
            }
        }
    }

    /// Solid fill, no falloff.  Stream stride 3.
    pub fn draw_flat_unlit(&mut self, stream: &[i32], color: P::Texel) {
        self.count_polygon();
        if self.scan.convert(stream, STRIDE_FLAT, &self.vp) {
            return;
        }
        for y in self.scan.min_y..=self.scan.max_y {
            let row = y as usize;
            let beg = self.scan.x_left[row];
            let len = self.scan.x_right[row] - beg;
            let dlen = len + (len == 0) as i32;
            let mut sz = self.scan.attr_left[row].z;
            let dz = (self.scan.attr_right[row].z - sz) / dlen;
            let mut idx = (row * self.hres) as i32 + beg;
            for _ in 0..=len {
                let i = idx as usize;
                if D::test_and_set(&mut self.depth[i], sz) {
                    self.color[i] = color;
                }
                sz += dz;
                idx += 1;
            }
        }
    }

    /// Depth-only fill for z-prepass / occluder polygons.  Stream stride 3.
    pub fn draw_depth_only(&mut self, stream: &[i32]) {
        self.count_polygon();
        if self.scan.convert(stream, STRIDE_FLAT, &self.vp) {
            return;
        }
        for y in self.scan.min_y..=self.scan.max_y {
            let row = y as usize;
            let beg = self.scan.x_left[row];
            let len = self.scan.x_right[row] - beg;
            let dlen = len + (len == 0) as i32;
            let mut sz = self.scan.attr_left[row].z;
            let dz = (self.scan.attr_right[row].z - sz) / dlen;
            let mut idx = (row * self.hres) as i32 + beg;
            for _ in 0..=len {
                D::test_and_set(&mut self.depth[idx as usize], sz);
                sz += dz;
                idx += 1;
            }
        }
    }

    /// Full depth fill, but color only on the span's boundary pixels: the
    /// first/last column of every row plus the first and last two rows.
    /// Approximates a wireframe outline that still occludes correctly.
    /// Stream stride 3.
    pub fn draw_silhouette(&mut self, stream: &[i32], color: P::Texel) {
        self.count_polygon();
        if self.scan.convert(stream, STRIDE_FLAT, &self.vp) {
            return;
        }
        let (min_y, max_y) = (self.scan.min_y, self.scan.max_y);
        for y in min_y..=max_y {
            let row = y as usize;
            let beg = self.scan.x_left[row];
            let len = self.scan.x_right[row] - beg;
            let dlen = len + (len == 0) as i32;
            let mut sz = self.scan.attr_left[row].z;
            let dz = (self.scan.attr_right[row].z - sz) / dlen;
            let boundary_row = y <= min_y + 1 || y >= max_y - 1;
            let mut idx = (row * self.hres) as i32 + beg;
            for step in 0..=len {
                let i = idx as usize;
                if D::test_and_set(&mut self.depth[i], sz)
                    && (boundary_row || step == 0 || step == len)
                {
                    self.color[i] = color;
                }
                sz += dz;
                idx += 1;
            }
        }
    }

    /// Affine texture fill with distance falloff.  Stream stride 5
    /// (X,Y,Z,U,V).
    pub fn draw_textured(&mut self, stream: &[i32], tex: &Texture<P::Texel>) {
        self.count_polygon();
        if self.scan.convert(stream, STRIDE_TEX, &self.vp) {
            return;
        }
        let mask = tex.mask();
        for y in self.scan.min_y..=self.scan.max_y {
            let row = y as usize;
            let beg = self.scan.x_left[row];
            let len = self.scan.x_right[row] - beg;
            let dlen = len + (len == 0) as i32;
            let left = self.scan.attr_left[row];
            let right = self.scan.attr_right[row];
            let mut sz = left.z;
            let dz = (right.z - sz) / dlen;
            let mut su = left.u;
            let du = (right.u - su) / dlen;
            let mut sv = left.v;
            let dv = (right.v - sv) / dlen;
            let mut idx = (row * self.hres) as i32 + beg;
            for _ in 0..=len {
                let i = idx as usize;
                if D::test_and_set(&mut self.depth[i], sz) {
                    su &= mask;
                    sv &= mask;
                    self.color[i] = P::attenuate(tex.texel(su, sv), falloff(sz));
                }
                su += du;
                sv += dv;
                sz += dz;
                idx += 1;
            }
        }
    }

    /// Affine texture fill, no falloff.  Stream stride 5.
    pub fn draw_textured_unlit(&mut self, stream: &[i32], tex: &Texture<P::Texel>) {
        self.count_polygon();
        if self.scan.convert(stream, STRIDE_TEX, &self.vp) {
            return;
        }
        let mask = tex.mask();
        for y in self.scan.min_y..=self.scan.max_y {
            let row = y as usize;
            let beg = self.scan.x_left[row];
            let len = self.scan.x_right[row] - beg;
            let dlen = len + (len == 0) as i32;
            let left = self.scan.attr_left[row];
            let right = self.scan.attr_right[row];
            let mut sz = left.z;
            let dz = (right.z - sz) / dlen;
            let mut su = left.u;
            let du = (right.u - su) / dlen;
            let mut sv = left.v;
            let dv = (right.v - sv) / dlen;
            let mut idx = (row * self.hres) as i32 + beg;
            for _ in 0..=len {
                let i = idx as usize;
                if D::test_and_set(&mut self.depth[i], sz) {
                    su &= mask;
                    sv &= mask;
                    self.color[i] = tex.texel(su, sv);
                }
                su += du;
                sv += dv;
                sz += dz;
                idx += 1;
            }
        }
    }

    /// Line wireframe: straight lines between consecutive vertices plus the
    /// closing edge.  Bypasses scan conversion and the depth buffer
    /// entirely.  Stream stride 3.
    pub fn draw_wireframe(&mut self, stream: &[i32], color: P::Texel) {
        self.count_polygon();
        let n = stream.len() / STRIDE_FLAT;
        for i in 0..n {
            let a = &stream[i * STRIDE_FLAT..];
            let b = &stream[((i + 1) % n) * STRIDE_FLAT..];
            self.plot_line(a[0], a[1], b[0], b[1], color);
        }
    }

    /// Bresenham line bounded by the open interval of the viewport.
    fn plot_line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, color: P::Texel) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if self.vp.min_x < x0 && x0 < self.vp.max_x && self.vp.min_y < y0 && y0 < self.vp.max_y
            {
                self.color[y0 as usize * self.hres + x0 as usize] = color;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::{Depth16, DepthFull};
    use crate::pixel::Argb32;
    use crate::texture::{TEX_FRAC_BITS, Texture};

    const W: usize = 256;
    const H: usize = 128;

    struct Buffers {
        color: Vec<u32>,
        depth: Vec<i32>,
    }

    impl Buffers {
        fn new() -> Self {
            Self {
                color: vec![0; W * H],
                depth: vec![0; W * H],
            }
        }
    }

    fn raster<'b>(b: &'b mut Buffers) -> Raster<'b, Argb32, DepthFull> {
        let mut r = Raster::new(&mut b.color, &mut b.depth, W, H).unwrap();
        r.clear_depth();
        r
    }

    /// The right-triangle scenario: vertices (10,10) (10,20) (20,10).
    fn tri(z: i32) -> [i32; 9] {
        [10, 10, z, 10, 20, z, 20, 10, z]
    }

    #[test]
    fn flat_unlit_fills_exactly_the_triangle() {
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        let color = Argb32::pack(0x10, 0x20, 0x30);
        r.draw_flat_unlit(&tri(1000), color);
        for y in 0..H {
            for x in 0..W {
                let inside =
                    (10..=20).contains(&y) && x >= 10 && x <= 10 + (20 - y) && y <= 20;
                assert_eq!(
                    r.color()[y * W + x] == color,
                    inside,
                    "pixel ({x},{y}) inside={inside}"
                );
            }
        }
        assert_eq!(r.polygon_count(), 1);
    }

    #[test]
    fn equal_depth_does_not_overwrite() {
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        let first = Argb32::pack(0xFF, 0, 0);
        let second = Argb32::pack(0, 0xFF, 0);
        r.draw_flat_unlit(&tri(1000), first);
        r.draw_flat_unlit(&tri(1000), second);
        assert_eq!(r.color()[15 * W + 12], first);
    }

    #[test]
    fn nearer_depth_overwrites_regardless_of_order() {
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        let far = Argb32::pack(0xFF, 0, 0);
        let near = Argb32::pack(0, 0xFF, 0);
        r.draw_flat_unlit(&tri(1000), far);
        r.draw_flat_unlit(&tri(999), near);
        assert_eq!(r.color()[15 * W + 12], near);

        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        r.draw_flat_unlit(&tri(999), near);
        r.draw_flat_unlit(&tri(1000), far);
        assert_eq!(r.color()[15 * W + 12], near);
    }

    #[test]
    fn depth_only_never_touches_color() {
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        r.draw_depth_only(&tri(500));
        assert!(r.color().iter().all(|&c| c == 0));
        // but it occludes a later, farther polygon
        r.draw_flat_unlit(&tri(501), Argb32::pack(0xFF, 0xFF, 0xFF));
        assert_eq!(r.color()[15 * W + 12], 0);
    }

    #[test]
    fn flat_lit_full_brightness_and_black_ends() {
        // d >= 256 <=> (z << 15) >> 20 >= 171 <=> z >= 171 << 5
        let bright_z = 171 << 5;
        let color = Argb32::pack(0x40, 0x80, 0xC0);

        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        r.draw_flat(&tri(bright_z), color);
        assert_eq!(r.color()[15 * W + 12], color);

        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        r.draw_flat(&tri(0), color);
        assert_eq!(r.color()[15 * W + 12], 0);
    }

    #[test]
    fn silhouette_colors_boundary_only() {
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        let color = Argb32::pack(0xFF, 0xFF, 0xFF);
        r.draw_silhouette(&tri(1000), color);
        // interior pixel of a middle row: depth written, color untouched
        assert_eq!(r.color()[15 * W + 12], 0);
        assert!(r.depth()[15 * W + 12] < i32::MAX);
        // row boundaries and the first two rows carry color
        assert_eq!(r.color()[15 * W + 10], color);
        assert_eq!(r.color()[15 * W + 15], color);
        assert_eq!(r.color()[10 * W + 12], color);
        assert_eq!(r.color()[11 * W + 12], color);
    }

    #[test]
    fn textured_unlit_samples_checker() {
        let mut texels = vec![0u32; 32 * 32];
        for y in 0..32 {
            for x in 0..32 {
                texels[y * 32 + x] = if (x ^ y) & 1 == 0 { 0xFFFFFF } else { 0x0000FF };
            }
        }
        let tex = Texture::new(5, texels).unwrap();

        // screen-aligned square with U,V spanning one texture period
        let p = 32 << TEX_FRAC_BITS;
        let z = 1000;
        #[rustfmt::skip]
        let quad = [
            40, 40, z, 0, 0,
            72, 40, z, p, 0,
            72, 72, z, p, p,
            40, 72, z, 0, p,
        ];
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        r.draw_textured_unlit(&quad, &tex);
        // top-left of the quad maps to texel (0,0)
        assert_eq!(r.color()[40 * W + 40], 0xFFFFFF);
        // one texel step to the right flips the checker cell
        assert_eq!(r.color()[40 * W + 41], 0x0000FF);
    }

    #[test]
    fn wireframe_ignores_depth_and_stays_inside_viewport() {
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        // occlude everything first
        let cover: [i32; 12] = [0, 0, 0, 255, 0, 0, 255, 127, 0, 0, 127, 0];
        r.draw_depth_only(&cover);

        let color = Argb32::pack(0xFF, 0, 0);
        let line_poly = [5, 5, 9999, 50, 5, 9999, 50, 40, 9999];
        r.draw_wireframe(&line_poly, color);
        // drawn despite losing every depth test a span kernel would run
        assert_eq!(r.color()[5 * W + 20], color);

        // a polygon leaning on the viewport edge never writes the border
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        let hugging = [0, 0, 1, 100, 0, 1, 100, 60, 1];
        r.draw_wireframe(&hugging, color);
        for x in 0..W {
            assert_eq!(r.color()[x], 0, "row 0 is outside the open interval");
        }
    }

    #[test]
    fn invisible_polygons_still_count() {
        let mut b = Buffers::new();
        let mut r = raster(&mut b);
        let offscreen = [300, 10, 1, 320, 30, 1, 310, 50, 1];
        r.draw_flat_unlit(&offscreen, 0xFFFFFF);
        assert_eq!(r.polygon_count(), 1);
        r.reset_polygon_count();
        assert_eq!(r.polygon_count(), 0);
    }

    #[test]
    fn reduced_depth_precision_round_trips() {
        let mut color = vec![0u32; W * H];
        let mut depth = vec![0i16; W * H];
        let mut r: Raster<Argb32, Depth16> = Raster::new(&mut color, &mut depth, W, H).unwrap();
        r.clear_depth();
        let texel = Argb32::pack(0, 0xFF, 0);
        r.draw_flat_unlit(&tri(3 << 10), texel);
        assert_eq!(r.color()[15 * W + 12], texel);
        // stored element keeps only the top bits: (z << Z_FRAC_BITS) >> 16
        assert_eq!(r.depth()[15 * W + 12], ((3i32 << 10) << 15 >> 16) as i16);
    }
}
