//! Render the backgrounds of the picker widgets to PNG files.
//!
//! Usage: `tincture-preview [OUTPUT_DIR] [COLOR]`. Set `RUST_LOG=debug` to see
//! skipped pixels and GPU program compilation.

use std::{
    error::Error,
    path::{Path, PathBuf},
};

use image::{Rgba, RgbaImage};
use log::info;
use tincture::{
    geometry::Triangle,
    registry,
    sampler::{self, ChannelAxis, Corners},
    Color, Component, Space,
};

const SIZE: u32 = 256;
const STRIP_HEIGHT: u32 = 32;
const SPACES: [Space; 8] = [
    Space::Srgb,
    Space::SrgbLinear,
    Space::Hsl,
    Space::Lab,
    Space::Lch,
    Space::Oklab,
    Space::Oklch,
    Space::DisplayP3,
];

fn save(image: &RgbaImage, dir: &Path, name: &str) -> Result<(), Box<dyn Error>> {
    let path = dir.join(name);
    image.save(&path)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// An HSL area with saturation across and lightness down.
fn area(base: &Color) -> RgbaImage {
    let saturation = registry::lookup_channel("hsl", "s").map_or((0.0, 1.0), |c| c.internal_range());
    let lightness = registry::lookup_channel("hsl", "l").map_or((0.0, 1.0), |c| c.internal_range());
    sampler::sample_channel_grid(
        base,
        Space::Hsl,
        ChannelAxis::new("s", saturation.0, saturation.1),
        ChannelAxis::new("l", lightness.1, lightness.0),
        SIZE,
        SIZE,
        false,
    )
}

/// An OKLCh hue wheel with chroma growing outwards.
fn wheel(base: &Color) -> RgbaImage {
    let chroma = registry::lookup_channel("oklch", "c").map_or(0.4, |c| c.max);
    sampler::sample_polar_grid(
        base,
        Space::Oklch,
        ChannelAxis::new("h", 0.0, 360.0),
        ChannelAxis::new("c", 0.0, chroma / 2.0),
        SIZE,
        SIZE,
        0.0,
        false,
    )
}

/// An HSV triangle of saturation and value.
fn triangle(base: &Color) -> RgbaImage {
    let triangle = Triangle::inscribed(1.0, 1.0, 0.0);
    sampler::sample_triangle_grid(
        base,
        Space::Hsv,
        ChannelAxis::new("s", 0.0, 1.0),
        ChannelAxis::new("v", 0.0, 1.0),
        None,
        &triangle,
        SIZE,
        SIZE,
        false,
    )
}

/// A hue ring starting at 12 o'clock.
fn ring(base: &Color) -> RgbaImage {
    sampler::sample_conic_ring(
        base,
        Space::Hsl,
        ChannelAxis::new("h", 0.0, 360.0),
        SIZE,
        SIZE,
        0.0,
        false,
    )
}

fn to_rgba(color: &Color) -> Rgba<u8> {
    let byte = |value: Option<Component>| (value.unwrap_or_default().clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([byte(color.c0()), byte(color.c1()), byte(color.c2()), 255])
}

/// One strip per space, interpolating from `left` to `right`.
fn strips(left: &Color, right: &Color) -> RgbaImage {
    let mut image = RgbaImage::new(SIZE, STRIP_HEIGHT * SPACES.len() as u32);
    for (row, space) in SPACES.iter().enumerate() {
        let stops = sampler::interpolate_stops(&[left.clone(), right.clone()], SIZE as usize, *space);
        for (x, stop) in stops.iter().enumerate() {
            let pixel = to_rgba(stop);
            for y in 0..STRIP_HEIGHT {
                image.put_pixel(x as u32, row as u32 * STRIP_HEIGHT + y, pixel);
            }
        }
    }
    image
}

fn corners(base: &Color) -> Result<Corners, Box<dyn Error>> {
    Ok(Corners {
        top_left: Color::new(Space::Srgb, 1.0, 1.0, 1.0, 1.0),
        top_right: base.convert(Space::Srgb)?,
        bottom_left: Color::new(Space::Srgb, 0.0, 0.0, 0.0, 1.0),
        bottom_right: Color::new(Space::Srgb, 0.0, 0.0, 0.0, 1.0),
    })
}

#[cfg(feature = "wgpu")]
fn gpu_previews(base: &Color, dir: &Path) -> Result<(), Box<dyn Error>> {
    use tincture::gpu::{wgpu_surface::OffscreenSurface, GradientRenderer};

    let size = SIZE as Component;
    let mut surface = pollster::block_on(OffscreenSurface::request(size, size, 1.0))?;
    let mut renderer = GradientRenderer::new();

    renderer.draw_gradient(&mut surface, &corners(base)?, false, false, false)?;
    save(&surface.read_pixels()?, dir, "gpu-area.png")?;

    let stops = [
        Color::new(Space::Hsl, 0.0, 1.0, 0.5, 1.0),
        base.clone(),
        Color::new(Space::Hsl, 240.0, 1.0, 0.5, 1.0),
    ];
    renderer.draw_linear_gradient(&mut surface, &stops, 45.0, false, false, false)?;
    save(&surface.read_pixels()?, dir, "gpu-linear.png")?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dir = PathBuf::from(args.next().unwrap_or_else(|| "preview".to_string()));
    let base = Color::parse(&args.next().unwrap_or_else(|| "#d2691e".to_string()))?;
    std::fs::create_dir_all(&dir)?;
    info!("rendering previews of {} into {}", base.to_hex(), dir.display());

    save(&area(&base), &dir, "area.png")?;
    save(&wheel(&base), &dir, "wheel.png")?;
    save(&triangle(&base), &dir, "triangle.png")?;
    save(&ring(&base), &dir, "ring.png")?;
    save(
        &sampler::sample_bilinear_grid(&corners(&base)?, SIZE, SIZE, Space::Oklab, false),
        &dir,
        "bilinear.png",
    )?;
    save(
        &strips(&base, &Color::new(Space::Srgb, 0.0, 0.0, 1.0, 1.0)),
        &dir,
        "strips.png",
    )?;

    #[cfg(feature = "wgpu")]
    gpu_previews(&base, &dir)?;

    Ok(())
}
