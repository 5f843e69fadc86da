//! Uniform blocks shared with the WGSL gradient shaders.
//!
//! Every field is a 16 byte vector so the layout matches WGSL uniform
//! alignment without padding fields.

use bytemuck::{Pod, Zeroable};

/// The most stops a linear gradient can have.
pub const MAX_STOPS: usize = 16;

/// Uniforms of the bilinear gradient shader.
///
/// Total size: 80 bytes (5 * 16 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BilinearUniforms {
    /// Top left corner color, straight RGBA (offset 0)
    pub top_left: [f32; 4],
    /// Top right corner color (offset 16)
    pub top_right: [f32; 4],
    /// Bottom left corner color (offset 32)
    pub bottom_left: [f32; 4],
    /// Bottom right corner color (offset 48)
    pub bottom_right: [f32; 4],
    /// [mirror_x, mirror_y, unused, unused], 1.0 when set (offset 64)
    pub mirror: [f32; 4],
}

const _: () = assert!(
    std::mem::size_of::<BilinearUniforms>() == 80,
    "BilinearUniforms must be 80 bytes"
);

/// Uniforms of the linear gradient shader.
///
/// Total size: 336 bytes (21 * 16 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LinearUniforms {
    /// Stop colors, straight RGBA (offset 0, size 256)
    pub colors: [[f32; 4]; MAX_STOPS],
    /// Stop positions in `[0, 1]`, four per vector (offset 256, size 64)
    pub positions: [[f32; 4]; MAX_STOPS / 4],
    /// [angle in radians, stop count, mirror_x, mirror_y] (offset 320)
    pub params: [f32; 4],
}

const _: () = assert!(
    std::mem::size_of::<LinearUniforms>() == 336,
    "LinearUniforms must be 336 bytes"
);

impl LinearUniforms {
    /// The position of stop `index`.
    pub fn position(&self, index: usize) -> f32 {
        self.positions[index / 4][index % 4]
    }

    pub(crate) fn set_position(&mut self, index: usize, position: f32) {
        self.positions[index / 4][index % 4] = position;
    }

    /// The number of stops in use.
    pub fn count(&self) -> usize {
        self.params[1] as usize
    }
}

pub(crate) fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}
