//! tincture provides the non-UI core of a set of color picker widgets:
//!
//! - a [`Color`] type with conversion, interpolation and parsing over a
//!   fixed set of CSS color spaces,
//! - the [`registry`] of color models and the display ranges of their
//!   channels,
//! - the [`geometry`] that places thumbs on circular and triangular pickers,
//! - software rasterization of picker backgrounds in [`sampler`],
//! - shader based gradients in [`gpu`].
//!
//! ```rust
//! use tincture::{Color, Space};
//!
//! let color = Color::parse("#3b82f6").unwrap();
//! let oklch = color.convert(Space::Oklch).unwrap();
//! assert_eq!(oklch.space, Space::Oklch);
//! ```

#![deny(missing_docs)]

mod color;
mod convert;
mod interpolate;
mod math;
mod parse;

pub mod geometry;
pub mod gpu;
pub mod models;
pub mod registry;
pub mod sampler;
pub mod steps;

#[cfg(test)]
mod test;

pub use color::{Color, ColorError, Component, ComponentDetails, Components, Flags, HasSpace, Space};
pub use interpolate::Interpolation;
