//! Interactive demo: animates hand-built screen-space polygons through every
//! fill policy and composites a depth-edge outline on top.
//!
//! ```bash
//! cargo run --release -- --width 256 --height 128
//! ```

use clap::Parser;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};
use std::time::{Duration, Instant};

use spanrast::{
    Argb32, Depth16, PixelFormat, Raster, TEX_FRAC_BITS, Texture, postfx::mark_edges_2d,
};

#[derive(Parser)]
#[command(about = "spanrast demo viewer")]
struct Args {
    /// Horizontal resolution of the render target.
    #[arg(long, default_value_t = 256)]
    width: usize,

    /// Vertical resolution of the render target.
    #[arg(long, default_value_t = 128)]
    height: usize,

    /// Start with the depth-edge outline pass enabled.
    #[arg(long)]
    outline: bool,
}

/// Fill policies the demo cycles through with the space bar.
#[derive(Clone, Copy)]
enum Mode {
    Textured,
    TexturedUnlit,
    Flat,
    FlatUnlit,
    Silhouette,
    Wireframe,
}

impl Mode {
    fn next(self) -> Self {
        match self {
            Mode::Textured => Mode::TexturedUnlit,
            Mode::TexturedUnlit => Mode::Flat,
            Mode::Flat => Mode::FlatUnlit,
            Mode::FlatUnlit => Mode::Silhouette,
            Mode::Silhouette => Mode::Wireframe,
            Mode::Wireframe => Mode::Textured,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Mode::Textured => "textured",
            Mode::TexturedUnlit => "textured-unlit",
            Mode::Flat => "flat",
            Mode::FlatUnlit => "flat-unlit",
            Mode::Silhouette => "silhouette",
            Mode::Wireframe => "wireframe",
        }
    }
}

/// 32x32 two-tone checker texture.
fn checker() -> Texture<u32> {
    let mut texels = vec![0u32; 32 * 32];
    for y in 0..32 {
        for x in 0..32 {
            texels[y * 32 + x] = if ((x >> 2) ^ (y >> 2)) & 1 == 0 {
                Argb32::pack(0xD0, 0xD0, 0xD0)
            } else {
                Argb32::pack(0x40, 0x30, 0x80)
            };
        }
    }
    Texture::new(5, texels).expect("checker dimensions are valid")
}

/// A textured quad spinning around (cx, cy).  Z varies across the quad so
/// falloff and the depth test have something to chew on.
fn spinning_quad(cx: i32, cy: i32, radius: f32, phase: f32, z_near: i32, z_far: i32) -> [i32; 20] {
    let period = 32 << TEX_FRAC_BITS;
    let mut quad = [0i32; 20];
    for (i, corner) in [0.125f32, 0.375, 0.625, 0.875].iter().enumerate() {
        let a = phase + corner * std::f32::consts::TAU;
        quad[i * 5] = cx + (a.cos() * radius) as i32;
        quad[i * 5 + 1] = cy + (a.sin() * radius) as i32;
        quad[i * 5 + 2] = if i % 2 == 0 { z_near } else { z_far };
        quad[i * 5 + 3] = if i == 1 || i == 2 { period } else { 0 };
        quad[i * 5 + 4] = if i >= 2 { period } else { 0 };
    }
    quad
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (w, h) = (args.width, args.height);

    let mut color = vec![0u32; w * h];
    let mut depth = vec![0i16; w * h];
    let mut raster: Raster<Argb32, Depth16> = Raster::new(&mut color, &mut depth, w, h)?;

    let tex = checker();
    let mut mode = Mode::Textured;
    let mut outline = args.outline;

    let mut win = Window::new(
        "spanrast demo  [space: policy, o: outline]",
        w,
        h,
        WindowOptions {
            scale: Scale::X4,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    let mut presented = vec![0u32; w * h];
    let mut t = 0.0f32;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            mode = mode.next();
            println!("fill policy: {}", mode.name());
        }
        if win.is_key_pressed(Key::O, KeyRepeat::No) {
            outline = !outline;
        }

        let t0 = Instant::now();
        raster.clear(0x10, 0x10, 0x18);

        let (cx, cy) = (w as i32 / 2, h as i32 / 2);
        let radius = (h as f32) * 0.35;
        // two interleaved quads so the depth test resolves an overlap
        let front = spinning_quad(cx - 20, cy, radius, t, 140 << 5, 200 << 5);
        let back = spinning_quad(cx + 20, cy, radius, -t * 0.7, 160 << 5, 240 << 5);

        for quad in [&front, &back] {
            match mode {
                Mode::Textured => raster.draw_textured(quad, &tex),
                Mode::TexturedUnlit => raster.draw_textured_unlit(quad, &tex),
                _ => {
                    // untextured policies take the stride-3 stream
                    let mut flat = [0i32; 12];
                    for v in 0..4 {
                        flat[v * 3..][..3].copy_from_slice(&quad[v * 5..][..3]);
                    }
                    let texel = Argb32::pack(0xC8, 0x96, 0x3C);
                    match mode {
                        Mode::Flat => raster.draw_flat(&flat, texel),
                        Mode::FlatUnlit => raster.draw_flat_unlit(&flat, texel),
                        Mode::Silhouette => raster.draw_silhouette(&flat, texel),
                        Mode::Wireframe => raster.draw_wireframe(&flat, texel),
                        _ => unreachable!(),
                    }
                }
            }
        }

        presented.copy_from_slice(raster.color());
        if outline {
            mark_edges_2d(
                raster.depth(),
                &mut presented,
                w,
                300,
                Argb32::pack(0xFF, 0xFF, 0xFF),
            );
        }

        acc_time += t0.elapsed();
        acc_frames += 1;
        win.update_with_buffer(&presented, w, h)?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            println!(
                "avg render: {:.2} ms  ({} polygons submitted)",
                avg_ms,
                raster.polygon_count()
            );
            raster.reset_polygon_count();
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }

        t += 0.01;
    }
    Ok(())
}
