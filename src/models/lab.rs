//! Models for rectangular and polar coordinate systems used to model CIE-Lab,
//! CIE-LCh, Oklab and Oklch.

use crate::{
    color::{Component, Components, HasSpace, Space},
    math::{almost_zero, normalize, normalize_hue, transform, transform_3x3, Transform},
    models::xyz::{ToXyz, WhitePoint, Xyz, XyzD50, XyzD65, D50, D65},
};

pub mod space {
    //! Tags for the two Lab-like spaces.

    /// Identifies a Lab-like space.
    pub trait LabSpace: Clone {}

    /// CIE-Lab, relative to D50.
    #[derive(Clone, Debug)]
    pub struct CieLab;
    impl LabSpace for CieLab {}

    /// Oklab, relative to D65.
    #[derive(Clone, Debug)]
    pub struct OkLab;
    impl LabSpace for OkLab {}
}

use space::LabSpace;

tincture_macros::gen_model! {
    /// The model for a color specified in the rectangular orthogonal form.
    pub struct Rectangular<S: LabSpace> {
        /// The lightness component.
        pub lightness: Component,
        /// The a component.
        pub a: Component,
        /// The b component.
        pub b: Component,
    }
}

impl<S: LabSpace> Rectangular<S> {
    /// Convert this orthogonal rectangular model into its cylindrical polar
    /// form. The hue is NaN (powerless) for achromatic colors.
    pub fn to_polar(&self) -> Polar<S> {
        let chroma = (self.a * self.a + self.b * self.b).sqrt();
        let hue = if almost_zero(chroma) {
            Component::NAN
        } else {
            normalize_hue(self.b.atan2(self.a).to_degrees())
        };

        Polar::new(self.lightness, chroma, hue)
    }
}

tincture_macros::gen_model! {
    /// The model for a color specified in the cylindrical polar form.
    pub struct Polar<S: LabSpace> {
        /// The lightness component.
        pub lightness: Component,
        /// The chroma component.
        pub chroma: Component,
        /// The hue component.
        pub hue: Component,
    }
}

impl<S: LabSpace> Polar<S> {
    /// Convert this cylindrical polar model into its orthogonal rectangular
    /// form. A missing hue is treated as zero.
    pub fn to_rectangular(&self) -> Rectangular<S> {
        let hue = normalize(self.hue).to_radians();
        Rectangular::new(
            self.lightness,
            self.chroma * hue.cos(),
            self.chroma * hue.sin(),
        )
    }
}

const KAPPA: Component = 24389.0 / 27.0;
const EPSILON: Component = 216.0 / 24389.0;

/// The model for a color specified in the CIE-Lab color space.
pub type Lab = Rectangular<space::CieLab>;

impl HasSpace for Lab {
    const SPACE: Space = Space::Lab;
}

impl ToXyz for Lab {
    type WhitePoint = D50;

    fn to_xyz(&self) -> Xyz<D50> {
        let f1 = (self.lightness + 16.0) / 116.0;
        let f0 = f1 + self.a / 500.0;
        let f2 = f1 - self.b / 200.0;

        let inverse = |f: Component| {
            let cubed = f * f * f;
            if cubed > EPSILON {
                cubed
            } else {
                (116.0 * f - 16.0) / KAPPA
            }
        };

        let y = if self.lightness > KAPPA * EPSILON {
            f1 * f1 * f1
        } else {
            self.lightness / KAPPA
        };

        Xyz::new(
            inverse(f0) * D50::WHITE_POINT.0,
            y * D50::WHITE_POINT.1,
            inverse(f2) * D50::WHITE_POINT.2,
        )
    }
}

impl From<XyzD50> for Lab {
    fn from(value: XyzD50) -> Self {
        let relative = Components(
            value.x / D50::WHITE_POINT.0,
            value.y / D50::WHITE_POINT.1,
            value.z / D50::WHITE_POINT.2,
        );

        let Components(f0, f1, f2) = relative.map(|v| {
            if v > EPSILON {
                v.cbrt()
            } else {
                (KAPPA * v + 16.0) / 116.0
            }
        });

        Lab::new(116.0 * f1 - 16.0, 500.0 * (f0 - f1), 200.0 * (f1 - f2))
    }
}

/// The model for a color specified in the CIE-LCh color space.
pub type Lch = Polar<space::CieLab>;

impl HasSpace for Lch {
    const SPACE: Space = Space::Lch;
}

/// The model for a color specified in the Oklab color space.
pub type Oklab = Rectangular<space::OkLab>;

impl HasSpace for Oklab {
    const SPACE: Space = Space::Oklab;
}

impl From<XyzD65> for Oklab {
    fn from(value: XyzD65) -> Self {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const XYZ_TO_LMS: Transform = transform_3x3(
             0.8190224432164319,  0.0329836671980271,  0.048177199566046255,
             0.3619062562801221,  0.9292868468965546,  0.26423952494422764,
            -0.12887378261216414, 0.03614466816999844, 0.6335478258136937,
        );

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const LMS_TO_OKLAB: Transform = transform_3x3(
             0.2104542553,  1.9779984951,  0.0259040371,
             0.7936177850, -2.4285922050,  0.7827717662,
            -0.0040720468,  0.4505937099, -0.8086757660,
        );

        let lms = transform(&XYZ_TO_LMS, value.to_components()).map(Component::cbrt);
        transform(&LMS_TO_OKLAB, lms).into()
    }
}

impl ToXyz for Oklab {
    type WhitePoint = D65;

    fn to_xyz(&self) -> Xyz<D65> {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const OKLAB_TO_LMS: Transform = transform_3x3(
            0.99999999845051981432,  1.0000000088817607767,    1.0000000546724109177,
            0.39633779217376785678, -0.1055613423236563494,   -0.089484182094965759684,
            0.21580375806075880339, -0.063854174771705903402, -1.2914855378640917399,
        );

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const LMS_TO_XYZ: Transform = transform_3x3(
             1.2268798733741557,  -0.04057576262431372, -0.07637294974672142,
            -0.5578149965554813,   1.1122868293970594,  -0.4214933239627914,
             0.28139105017721583, -0.07171106666151701,  1.5869240244272418,
        );

        let lms = transform(&OKLAB_TO_LMS, self.to_components()).map(|v| v * v * v);
        transform(&LMS_TO_XYZ, lms).into()
    }
}

/// The model for a color specified in the Oklch color space.
pub type Oklch = Polar<space::OkLab>;

impl HasSpace for Oklch {
    const SPACE: Space = Space::Oklch;
}
