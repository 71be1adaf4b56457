//! Fixed-point span rasterizer for memory-constrained framebuffers.
//!
//! Everything here runs on integers: vertex streams arrive already projected
//! into screen space, get scan-converted into per-row spans with a sub-pixel
//! DDA, and a family of pixel kernels walks those spans to depth-test, shade
//! and write.  There is no heap allocation from the per-polygon hot path and
//! no floating point anywhere in the library.
//!
//! The entry point is [`Raster`], which borrows the caller's color and depth
//! buffers for its lifetime.  The color element width is a compile-time
//! policy ([`pixel::PixelFormat`]), as is the depth element width
//! ([`depth::DepthFormat`]).

pub mod depth;
pub mod pixel;
pub mod postfx;
pub mod raster;
pub mod texture;

pub use depth::{Depth16, DepthFormat, DepthFull};
pub use pixel::{Argb32, Gray8, PixelFormat, Rgb565};
pub use raster::{
    MAX_POLY_VERTS, Raster, RasterError, SCAN_FRAC_BITS, STRIDE_FLAT, STRIDE_TEX, Viewport,
    Z_FRAC_BITS,
};
pub use texture::{TEX_FRAC_BITS, Texture, TextureError};
