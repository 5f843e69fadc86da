//! Conversion of every model to CIE-XYZ relative to D65, the space all
//! indirect conversions pass through.

use crate::models::{
    lab::space::LabSpace,
    rgb::{
        encoding::{GammaEncoded, LinearLight},
        space::RgbSpace,
    },
    Hsl, Hsv, Hwb, Polar, Rectangular, Rgb, ToXyz, TransferWhitePoint, WhitePoint, Xyz, XyzD65,
    D65,
};

/// The space common to all models.
pub type Base = XyzD65;

/// Used to convert any model to the base color space.
pub trait ToBase {
    /// Convert the model to the base color space.
    fn to_base(&self) -> Base;
}

impl<S: RgbSpace> ToBase for Rgb<S, LinearLight>
where
    S::WhitePoint: TransferWhitePoint<D65>,
{
    fn to_base(&self) -> Base {
        self.to_xyz().transfer()
    }
}

impl<S: RgbSpace> ToBase for Rgb<S, GammaEncoded>
where
    S::WhitePoint: TransferWhitePoint<D65>,
{
    fn to_base(&self) -> Base {
        self.to_linear_light().to_base()
    }
}

impl ToBase for Hsl {
    fn to_base(&self) -> Base {
        self.to_srgb().to_base()
    }
}

impl ToBase for Hsv {
    fn to_base(&self) -> Base {
        self.to_srgb().to_base()
    }
}

impl ToBase for Hwb {
    fn to_base(&self) -> Base {
        self.to_srgb().to_base()
    }
}

impl<S: LabSpace> ToBase for Rectangular<S>
where
    Rectangular<S>: ToXyz,
    <Rectangular<S> as ToXyz>::WhitePoint: TransferWhitePoint<D65>,
{
    fn to_base(&self) -> Base {
        self.to_xyz().transfer()
    }
}

impl<S: LabSpace> ToBase for Polar<S>
where
    Rectangular<S>: ToBase,
{
    fn to_base(&self) -> Base {
        self.to_rectangular().to_base()
    }
}

impl<W: WhitePoint + TransferWhitePoint<D65>> ToBase for Xyz<W> {
    fn to_base(&self) -> Base {
        self.transfer()
    }
}
