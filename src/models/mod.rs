//! Models are structs that represent a color in a specified color space or
//! form. They represent a type safe way to convert between different color
//! spaces and forms.

use crate::color::{Color, Component};

mod base;
mod hsl;
mod hwb;
mod lab;
mod rgb;
mod xyz;

pub use base::{Base, ToBase};
pub use hsl::{Hsl, Hsv};
pub use hwb::Hwb;
pub use lab::{space::LabSpace, Lab, Lch, Oklab, Oklch, Polar, Rectangular};
pub use rgb::{
    encoding, space::RgbSpace, A98Rgb, A98RgbLinear, DisplayP3, DisplayP3Linear, ProPhotoRgb, ProPhotoRgbLinear, Rec2020,
    Rec2020Linear, Rgb, Srgb, SrgbLinear,
};
pub use xyz::{ToXyz, TransferWhitePoint, WhitePoint, Xyz, XyzD50, XyzD65, D50, D65};

/// A trait implemented for color models that can be converted to and from a
/// generic [`Color`].
pub trait Model {
    /// Convert a model to a generic [`Color`]. NaN components are marked as
    /// missing.
    fn to_color(&self, alpha: Option<Component>) -> Color;

    /// Read the components of a generic [`Color`] into the model. The space
    /// of the color is not checked.
    fn from_color(color: &Color) -> Self;
}
