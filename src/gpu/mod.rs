//! Shader based gradient rendering onto drawable surfaces.
//!
//! A [`Surface`] abstracts the backend: it compiles the gradient programs and
//! runs a full surface draw with a uniform block. [`GradientRenderer`] keeps
//! one compiled program per surface and program kind, so repeated draws onto
//! the same surface reuse it until [`GradientRenderer::release`] is called.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use bytemuck::Zeroable;
use log::debug;
use thiserror::Error;

use crate::{
    color::{Color, ColorError, Component, Space},
    geometry::normalize_angle,
    sampler::Corners,
};

mod uniforms;
#[cfg(feature = "wgpu")]
pub mod wgpu_surface;

pub use uniforms::{BilinearUniforms, LinearUniforms, MAX_STOPS};

use uniforms::flag;

/// Errors produced while rendering a gradient.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A linear gradient needs between 2 and [`MAX_STOPS`] stops.
    #[error("a linear gradient requires 2 to 16 color stops, got {0}")]
    InvalidStopCount(usize),
    /// The surface cannot provide a rendering context.
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),
    /// A gradient program could not be built.
    #[error("failed to build gradient program: {0}")]
    ProgramFailed(String),
    /// The draw call failed.
    #[error("draw failed: {0}")]
    DrawFailed(String),
    /// A gradient color could not be converted to sRGB.
    #[error(transparent)]
    Color(#[from] ColorError),
}

/// A stable handle identifying a surface for the lifetime of the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Allocate a handle that no other surface in the process uses.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The gradient programs a surface can compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Four corner bilinear gradient, fed [`BilinearUniforms`].
    Bilinear,
    /// Multi-stop linear gradient, fed [`LinearUniforms`].
    Linear,
}

impl ProgramKind {
    /// The WGSL source of the program. Both shaders use `vs_main` and
    /// `fs_main` as entry points and draw a 4 vertex triangle strip.
    pub fn source(&self) -> &'static str {
        match self {
            ProgramKind::Bilinear => include_str!("shaders/bilinear.wgsl"),
            ProgramKind::Linear => include_str!("shaders/linear.wgsl"),
        }
    }

    /// A label for debugging.
    pub fn label(&self) -> &'static str {
        match self {
            ProgramKind::Bilinear => "bilinear gradient",
            ProgramKind::Linear => "linear gradient",
        }
    }
}

/// A drawable target for the gradient programs.
pub trait Surface {
    /// A compiled program, owned by the renderer's cache.
    type Program;

    /// The stable handle of this surface.
    fn id(&self) -> SurfaceId;

    /// Size in logical (layout) pixels.
    fn logical_size(&self) -> (Component, Component);

    /// Physical pixels per logical pixel.
    fn device_pixel_ratio(&self) -> Component;

    /// Size of the backing store in physical pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing store.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Compile `kind` for this surface.
    fn compile(&mut self, kind: ProgramKind) -> Result<Self::Program, RenderError>;

    /// Draw `program` over the whole backing store with the given uniform
    /// block.
    fn draw(&mut self, program: &Self::Program, uniforms: &[u8]) -> Result<(), RenderError>;
}

/// Renders gradients and caches the compiled programs of each surface.
pub struct GradientRenderer<S: Surface> {
    bilinear: HashMap<SurfaceId, S::Program>,
    linear: HashMap<SurfaceId, S::Program>,
}

impl<S: Surface> Default for GradientRenderer<S> {
    fn default() -> Self {
        Self {
            bilinear: HashMap::new(),
            linear: HashMap::new(),
        }
    }
}

impl<S: Surface> GradientRenderer<S> {
    /// Create a renderer with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a program of `kind` is cached for the surface `id`.
    pub fn is_cached(&self, id: SurfaceId, kind: ProgramKind) -> bool {
        self.cache(kind).contains_key(&id)
    }

    /// Drop every program compiled for the surface `id`. Call this when the
    /// surface goes away.
    pub fn release(&mut self, id: SurfaceId) {
        let bilinear = self.bilinear.remove(&id).is_some();
        let linear = self.linear.remove(&id).is_some();
        if bilinear || linear {
            debug!("released gradient programs of surface {id:?}");
        }
    }

    /// Draw a bilinear gradient between four corner colors, interpolated in
    /// sRGB.
    ///
    /// `mirror_x` and `mirror_y` flip the horizontal and vertical axes.
    pub fn draw_gradient(
        &mut self,
        surface: &mut S,
        corners: &Corners,
        alpha: bool,
        mirror_x: bool,
        mirror_y: bool,
    ) -> Result<(), RenderError> {
        self.ensure_program(surface, ProgramKind::Bilinear)?;
        match_backing_size(surface);

        let uniforms = BilinearUniforms {
            top_left: color_to_vec4(&corners.top_left, alpha)?,
            top_right: color_to_vec4(&corners.top_right, alpha)?,
            bottom_left: color_to_vec4(&corners.bottom_left, alpha)?,
            bottom_right: color_to_vec4(&corners.bottom_right, alpha)?,
            mirror: [flag(mirror_x), flag(mirror_y), 0.0, 0.0],
        };

        self.draw(surface, ProgramKind::Bilinear, bytemuck::bytes_of(&uniforms))
    }

    /// Draw a linear gradient through 2 to [`MAX_STOPS`] evenly spaced stops,
    /// interpolated in sRGB.
    ///
    /// An `angle` of 0 runs left to right; other angles rotate the gradient
    /// axis by `angle` degrees around the center.
    pub fn draw_linear_gradient(
        &mut self,
        surface: &mut S,
        colors: &[Color],
        angle: Component,
        alpha: bool,
        mirror_x: bool,
        mirror_y: bool,
    ) -> Result<(), RenderError> {
        if !(2..=MAX_STOPS).contains(&colors.len()) {
            return Err(RenderError::InvalidStopCount(colors.len()));
        }

        self.ensure_program(surface, ProgramKind::Linear)?;
        match_backing_size(surface);

        let mut uniforms = LinearUniforms::zeroed();
        let last = (colors.len() - 1) as f32;
        for (index, color) in colors.iter().enumerate() {
            uniforms.colors[index] = color_to_vec4(color, alpha)?;
            uniforms.set_position(index, index as f32 / last);
        }
        uniforms.params = [
            normalize_angle(angle, 0.0).to_radians() as f32,
            colors.len() as f32,
            flag(mirror_x),
            flag(mirror_y),
        ];

        self.draw(surface, ProgramKind::Linear, bytemuck::bytes_of(&uniforms))
    }

    fn cache(&self, kind: ProgramKind) -> &HashMap<SurfaceId, S::Program> {
        match kind {
            ProgramKind::Bilinear => &self.bilinear,
            ProgramKind::Linear => &self.linear,
        }
    }

    fn cache_mut(&mut self, kind: ProgramKind) -> &mut HashMap<SurfaceId, S::Program> {
        match kind {
            ProgramKind::Bilinear => &mut self.bilinear,
            ProgramKind::Linear => &mut self.linear,
        }
    }

    fn ensure_program(&mut self, surface: &mut S, kind: ProgramKind) -> Result<(), RenderError> {
        let id = surface.id();
        if !self.cache(kind).contains_key(&id) {
            let program = surface.compile(kind)?;
            debug!("compiled {} program for surface {id:?}", kind.label());
            self.cache_mut(kind).insert(id, program);
        }
        Ok(())
    }

    fn draw(&self, surface: &mut S, kind: ProgramKind, uniforms: &[u8]) -> Result<(), RenderError> {
        let program = self.cache(kind).get(&surface.id()).ok_or_else(|| {
            RenderError::ProgramFailed(format!("no {} program cached", kind.label()))
        })?;
        surface.draw(program, uniforms)
    }
}

/// Resize the backing store to the logical size times the device pixel
/// ratio, if it differs.
fn match_backing_size<S: Surface>(surface: &mut S) {
    let (width, height) = surface.logical_size();
    let ratio = surface.device_pixel_ratio();
    let target = (
        (width * ratio).round().max(0.0) as u32,
        (height * ratio).round().max(0.0) as u32,
    );

    if surface.backing_size() != target {
        debug!(
            "resizing surface {:?} backing store to {}x{}",
            surface.id(),
            target.0,
            target.1
        );
        surface.set_backing_size(target.0, target.1);
    }
}

/// Straight sRGB RGBA for a uniform. Alpha is 1 unless `alpha` is set.
fn color_to_vec4(color: &Color, alpha: bool) -> Result<[f32; 4], ColorError> {
    let rgb = color.convert(Space::Srgb)?;
    let a = if alpha { rgb.alpha().unwrap_or(1.0) } else { 1.0 };
    Ok([
        rgb.c0().unwrap_or_default() as f32,
        rgb.c1().unwrap_or_default() as f32,
        rgb.c2().unwrap_or_default() as f32,
        a as f32,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records compile and draw calls instead of rendering.
    struct RecordingSurface {
        id: SurfaceId,
        logical: (Component, Component),
        ratio: Component,
        backing: (u32, u32),
        has_context: bool,
        compiled: Vec<ProgramKind>,
        draws: Vec<(ProgramKind, Vec<u8>)>,
    }

    impl RecordingSurface {
        fn new(width: Component, height: Component, ratio: Component) -> Self {
            Self {
                id: SurfaceId::next(),
                logical: (width, height),
                ratio,
                backing: (300, 150),
                has_context: true,
                compiled: vec![],
                draws: vec![],
            }
        }

        fn last_bilinear(&self) -> BilinearUniforms {
            let (kind, bytes) = self.draws.last().unwrap();
            assert_eq!(*kind, ProgramKind::Bilinear);
            bytemuck::pod_read_unaligned(bytes)
        }

        fn last_linear(&self) -> LinearUniforms {
            let (kind, bytes) = self.draws.last().unwrap();
            assert_eq!(*kind, ProgramKind::Linear);
            bytemuck::pod_read_unaligned(bytes)
        }
    }

    impl Surface for RecordingSurface {
        type Program = ProgramKind;

        fn id(&self) -> SurfaceId {
            self.id
        }

        fn logical_size(&self) -> (Component, Component) {
            self.logical
        }

        fn device_pixel_ratio(&self) -> Component {
            self.ratio
        }

        fn backing_size(&self) -> (u32, u32) {
            self.backing
        }

        fn set_backing_size(&mut self, width: u32, height: u32) {
            self.backing = (width, height);
        }

        fn compile(&mut self, kind: ProgramKind) -> Result<ProgramKind, RenderError> {
            if !self.has_context {
                return Err(RenderError::ContextUnavailable("no context".to_string()));
            }
            self.compiled.push(kind);
            Ok(kind)
        }

        fn draw(&mut self, program: &ProgramKind, uniforms: &[u8]) -> Result<(), RenderError> {
            self.draws.push((*program, uniforms.to_vec()));
            Ok(())
        }
    }

    fn rgb(r: Component, g: Component, b: Component) -> Color {
        Color::new(Space::Srgb, r, g, b, 0.5)
    }

    fn corners() -> Corners {
        Corners {
            top_left: rgb(1.0, 0.0, 0.0),
            top_right: rgb(0.0, 1.0, 0.0),
            bottom_left: rgb(0.0, 0.0, 1.0),
            bottom_right: Color::new(Space::Hsl, 0.0, 0.0, 1.0, 0.5),
        }
    }

    #[test]
    fn too_many_stops_fail_without_drawing() {
        let mut renderer = GradientRenderer::new();
        let mut surface = RecordingSurface::new(100.0, 20.0, 1.0);
        let stops = vec![rgb(1.0, 0.0, 0.0); 17];

        let result = renderer.draw_linear_gradient(&mut surface, &stops, 0.0, false, false, false);
        assert!(matches!(result, Err(RenderError::InvalidStopCount(17))));
        assert!(surface.compiled.is_empty());
        assert!(surface.draws.is_empty());

        let result =
            renderer.draw_linear_gradient(&mut surface, &stops[..1], 0.0, false, false, false);
        assert!(matches!(result, Err(RenderError::InvalidStopCount(1))));
        assert!(surface.draws.is_empty());
    }

    #[test]
    fn programs_are_cached_per_surface() {
        let mut renderer = GradientRenderer::new();
        let mut surface = RecordingSurface::new(100.0, 100.0, 1.0);

        for _ in 0..3 {
            renderer
                .draw_gradient(&mut surface, &corners(), false, false, false)
                .unwrap();
        }
        assert_eq!(surface.compiled, vec![ProgramKind::Bilinear]);
        assert_eq!(surface.draws.len(), 3);
        assert!(renderer.is_cached(surface.id, ProgramKind::Bilinear));
        assert!(!renderer.is_cached(surface.id, ProgramKind::Linear));

        let mut other = RecordingSurface::new(100.0, 100.0, 1.0);
        renderer
            .draw_gradient(&mut other, &corners(), false, false, false)
            .unwrap();
        assert_eq!(other.compiled, vec![ProgramKind::Bilinear]);
    }

    #[test]
    fn release_drops_the_programs() {
        let mut renderer = GradientRenderer::new();
        let mut surface = RecordingSurface::new(100.0, 100.0, 1.0);
        let stops = [rgb(1.0, 0.0, 0.0), rgb(0.0, 0.0, 1.0)];

        renderer
            .draw_gradient(&mut surface, &corners(), false, false, false)
            .unwrap();
        renderer
            .draw_linear_gradient(&mut surface, &stops, 0.0, false, false, false)
            .unwrap();
        assert_eq!(surface.compiled.len(), 2);

        renderer.release(surface.id);
        assert!(!renderer.is_cached(surface.id, ProgramKind::Bilinear));
        assert!(!renderer.is_cached(surface.id, ProgramKind::Linear));

        renderer
            .draw_gradient(&mut surface, &corners(), false, false, false)
            .unwrap();
        assert_eq!(
            surface.compiled,
            vec![ProgramKind::Bilinear, ProgramKind::Linear, ProgramKind::Bilinear]
        );
    }

    #[test]
    fn missing_context_fails_at_first_use() {
        let mut renderer = GradientRenderer::new();
        let mut surface = RecordingSurface::new(100.0, 100.0, 1.0);
        surface.has_context = false;

        let result = renderer.draw_gradient(&mut surface, &corners(), false, false, false);
        assert!(matches!(result, Err(RenderError::ContextUnavailable(_))));
        assert!(!renderer.is_cached(surface.id, ProgramKind::Bilinear));
        assert!(surface.draws.is_empty());
    }

    #[test]
    fn backing_store_follows_the_pixel_ratio() {
        let mut renderer = GradientRenderer::new();
        let mut surface = RecordingSurface::new(100.0, 50.3, 2.0);

        renderer
            .draw_gradient(&mut surface, &corners(), false, false, false)
            .unwrap();
        assert_eq!(surface.backing, (200, 101));

        surface.ratio = 1.5;
        renderer
            .draw_gradient(&mut surface, &corners(), false, false, false)
            .unwrap();
        assert_eq!(surface.backing, (150, 75));
    }

    #[test]
    fn corner_uniforms() {
        let mut renderer = GradientRenderer::new();
        let mut surface = RecordingSurface::new(10.0, 10.0, 1.0);

        renderer
            .draw_gradient(&mut surface, &corners(), false, true, false)
            .unwrap();
        let uniforms = surface.last_bilinear();
        assert_eq!(uniforms.top_left, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms.top_right, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(uniforms.bottom_left, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(uniforms.bottom_right, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniforms.mirror, [1.0, 0.0, 0.0, 0.0]);

        renderer
            .draw_gradient(&mut surface, &corners(), true, false, true)
            .unwrap();
        let uniforms = surface.last_bilinear();
        assert_eq!(uniforms.top_left[3], 0.5);
        assert_eq!(uniforms.mirror, [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn linear_uniforms() {
        let mut renderer = GradientRenderer::new();
        let mut surface = RecordingSurface::new(10.0, 10.0, 1.0);
        let stops = [rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0), rgb(0.0, 0.0, 1.0)];

        renderer
            .draw_linear_gradient(&mut surface, &stops, -90.0, false, false, true)
            .unwrap();
        let uniforms = surface.last_linear();

        assert_eq!(uniforms.count(), 3);
        assert_eq!(uniforms.position(0), 0.0);
        assert_eq!(uniforms.position(1), 0.5);
        assert_eq!(uniforms.position(2), 1.0);
        assert_eq!(uniforms.colors[1], [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(uniforms.colors[3], [0.0; 4]);
        assert!((uniforms.params[0] - 270f32.to_radians()).abs() < 1.0e-5);
        assert_eq!(&uniforms.params[2..], &[0.0, 1.0]);
    }

    #[test]
    fn unconvertible_colors_fail() {
        let mut renderer = GradientRenderer::new();
        let mut surface = RecordingSurface::new(10.0, 10.0, 1.0);
        let stops = [
            rgb(1.0, 0.0, 0.0),
            Color::new(Space::Srgb, Component::INFINITY, 0.0, 0.0, 1.0),
        ];

        let result = renderer.draw_linear_gradient(&mut surface, &stops, 0.0, false, false, false);
        assert!(matches!(result, Err(RenderError::Color(_))));
        assert!(surface.draws.is_empty());
    }
}
