//! Model a color in the CIE-XYZ color space.

use crate::{
    color::{Component, Components, HasSpace, Space},
    math::{transform, transform_3x3, Transform},
};

/// A reference white point.
pub trait WhitePoint: Clone {
    /// The XYZ coordinates of the white point.
    const WHITE_POINT: Components;
}

/// CIE-XYZ color with a D50 white point reference.
#[derive(Clone, Debug)]
pub struct D50;

impl WhitePoint for D50 {
    #[allow(clippy::excessive_precision)]
    const WHITE_POINT: Components = Components(0.9642956764295677, 1.0, 0.8251046025104602);
}

/// CIE-XYZ color with a D65 white point reference.
#[derive(Clone, Debug)]
pub struct D65;

impl WhitePoint for D65 {
    #[allow(clippy::excessive_precision)]
    const WHITE_POINT: Components = Components(0.9504559270516716, 1.0, 1.0890577507598784);
}

/// Specify that a color model supports conversion to CIE-XYZ.
pub trait ToXyz {
    /// The white point of the resulting XYZ color.
    type WhitePoint: WhitePoint;

    /// Convert this color to CIE-XYZ.
    fn to_xyz(&self) -> Xyz<Self::WhitePoint>;
}

/// Chromatic adaptation from one white point to another (Bradford).
pub trait TransferWhitePoint<To: WhitePoint>: WhitePoint {
    /// Adapt XYZ components from this white point to `To`.
    fn transfer(from: Components) -> Components;
}

impl TransferWhitePoint<D50> for D50 {
    fn transfer(from: Components) -> Components {
        from
    }
}

impl TransferWhitePoint<D65> for D65 {
    fn transfer(from: Components) -> Components {
        from
    }
}

impl TransferWhitePoint<D65> for D50 {
    fn transfer(from: Components) -> Components {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const D50_TO_D65: Transform = transform_3x3(
             0.955473421488075,   -0.0283697093338637,  0.012314014864481998,
            -0.02309845494876471,  1.0099953980813041, -0.020507649298898964,
             0.06325924320057072,  0.021041441191917323, 1.330365926242124,
        );

        transform(&D50_TO_D65, from)
    }
}

impl TransferWhitePoint<D50> for D65 {
    fn transfer(from: Components) -> Components {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const D65_TO_D50: Transform = transform_3x3(
             1.0479297925449969,   0.02962780877005599, -0.009243040646204504,
             0.022946870601609652, 0.9904344267538799,   0.015055191490298152,
            -0.05019226628920524, -0.017073799063418826, 0.7518742814281371,
        );

        transform(&D65_TO_D50, from)
    }
}

tincture_macros::gen_model! {
    /// A model for a color in the CIE-XYZ color space with a specified white point reference.
    pub struct Xyz<W: WhitePoint> {
        /// The X component of the color.
        pub x: Component,
        /// The Y component of the color.
        pub y: Component,
        /// The Z component of the color.
        pub z: Component,
    }
}

impl<W: WhitePoint> Xyz<W> {
    /// Adapt this color to another white point.
    pub fn transfer<To: WhitePoint>(&self) -> Xyz<To>
    where
        W: TransferWhitePoint<To>,
    {
        W::transfer(self.to_components()).into()
    }
}

/// Model for a color in the CIE-XYZ color space with a D50 white point.
pub type XyzD50 = Xyz<D50>;

impl HasSpace for XyzD50 {
    const SPACE: Space = Space::XyzD50;
}

/// Model for a color in the CIE-XYZ color space with a D65 white point.
pub type XyzD65 = Xyz<D65>;

impl HasSpace for XyzD65 {
    const SPACE: Space = Space::XyzD65;
}
