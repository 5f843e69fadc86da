//! Model a color in one of the RGB color spaces.
//!
//! Every RGB space is a tag type implementing [`space::RgbSpace`], which
//! carries the transfer function and the matrices to and from CIE-XYZ.

use crate::{
    color::{Component, HasSpace, Space},
    math::transform,
    models::xyz::{ToXyz, Xyz},
};

pub mod encoding {
    //! Tags marking whether components are gamma encoded.

    /// This trait is used to identity tags that specify gamma encoding.
    pub trait Encoding: Clone {}

    /// Components are gamma encoded.
    #[derive(Clone, Debug)]
    pub struct GammaEncoded;
    impl Encoding for GammaEncoded {}

    /// Components are linear light.
    #[derive(Clone, Debug)]
    pub struct LinearLight;
    impl Encoding for LinearLight {}
}

pub mod space {
    //! Tags for the supported RGB color spaces.

    use crate::{
        color::Component,
        math::{transform_3x3, Transform},
        models::xyz::{WhitePoint, D50, D65},
    };

    /// An RGB color space with its transfer function and primaries.
    pub trait RgbSpace: Clone {
        /// The reference white of the space.
        type WhitePoint: WhitePoint;

        /// Linear light RGB to XYZ relative to [`Self::WhitePoint`].
        const TO_XYZ: Transform;

        /// XYZ relative to [`Self::WhitePoint`] to linear light RGB.
        const FROM_XYZ: Transform;

        /// Apply the transfer function to a linear light value.
        fn encode(value: Component) -> Component;

        /// Undo the transfer function of a gamma encoded value.
        fn decode(value: Component) -> Component;
    }

    /// Tag for the sRGB color space.
    #[derive(Clone, Debug)]
    pub struct Srgb;

    impl RgbSpace for Srgb {
        type WhitePoint = D65;

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const TO_XYZ: Transform = transform_3x3(
            0.4123907992659595,  0.21263900587151036, 0.01933081871559185,
            0.35758433938387796, 0.7151686787677559,  0.11919477979462599,
            0.1804807884018343,  0.07219231536073371, 0.9505321522496606,
        );

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const FROM_XYZ: Transform = transform_3x3(
             3.2409699419045213, -0.9692436362808798,  0.05563007969699361,
            -1.5373831775700935,  1.8759675015077206, -0.20397695888897657,
            -0.4986107602930033,  0.04155505740717561, 1.0569715142428786,
        );

        fn encode(value: Component) -> Component {
            let abs = value.abs();
            if abs > 0.0031308 {
                value.signum() * (1.055 * abs.powf(1.0 / 2.4) - 0.055)
            } else {
                12.92 * value
            }
        }

        fn decode(value: Component) -> Component {
            let abs = value.abs();
            if abs < 0.04045 {
                value / 12.92
            } else {
                value.signum() * ((abs + 0.055) / 1.055).powf(2.4)
            }
        }
    }

    /// Tag for the Display P3 color space. Shares the sRGB transfer function.
    #[derive(Clone, Debug)]
    pub struct DisplayP3;

    impl RgbSpace for DisplayP3 {
        type WhitePoint = D65;

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const TO_XYZ: Transform = transform_3x3(
            0.48657094864821626, 0.22897456406974884, 0.0,
            0.26566769316909294, 0.6917385218365062,  0.045113381858902575,
            0.1982172852343625,  0.079286914093745,   1.0439443689009757,
        );

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const FROM_XYZ: Transform = transform_3x3(
             2.4934969119414245,  -0.829488969561575,    0.035845830243784335,
            -0.9313836179191236,   1.7626640603183468,  -0.07617238926804171,
            -0.40271078445071684,  0.02362468584194359,  0.9568845240076873,
        );

        fn encode(value: Component) -> Component {
            Srgb::encode(value)
        }

        fn decode(value: Component) -> Component {
            Srgb::decode(value)
        }
    }

    /// Tag for the A98 RGB color space.
    #[derive(Clone, Debug)]
    pub struct A98Rgb;

    impl RgbSpace for A98Rgb {
        type WhitePoint = D65;

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const TO_XYZ: Transform = transform_3x3(
            0.5766690429101308,  0.29734497525053616, 0.027031361386412378,
            0.18555823790654627, 0.627363566255466,   0.07068885253582714,
            0.18822864623499472, 0.07529145849399789, 0.9913375368376389,
        );

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const FROM_XYZ: Transform = transform_3x3(
             2.041587903810746,  -0.9692436362808798,   0.013444280632031024,
            -0.5650069742788596,  1.8759675015077206,  -0.11836239223101824,
            -0.3447313507783295,  0.04155505740717561,  1.0151749943912054,
        );

        fn encode(value: Component) -> Component {
            value.signum() * value.abs().powf(256.0 / 563.0)
        }

        fn decode(value: Component) -> Component {
            value.signum() * value.abs().powf(563.0 / 256.0)
        }
    }

    /// Tag for the ProPhoto RGB color space, the only one relative to D50.
    #[derive(Clone, Debug)]
    pub struct ProPhotoRgb;

    impl RgbSpace for ProPhotoRgb {
        type WhitePoint = D50;

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const TO_XYZ: Transform = transform_3x3(
            0.7977604896723027,  0.2880711282292934,     0.0,
            0.13518583717574031, 0.7118432178101014,     0.0,
            0.0313493495815248,  0.00008565396060525902, 0.8251046025104601,
        );

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const FROM_XYZ: Transform = transform_3x3(
             1.3457989731028281,  -0.5446224939028347,  0.0,
            -0.25558010007997534,  1.5082327413132781,  0.0,
            -0.05110628506753401,  0.02053603239147973, 1.2119675456389454,
        );

        fn encode(value: Component) -> Component {
            const E: Component = 1.0 / 512.0;
            let abs = value.abs();
            if abs >= E {
                value.signum() * abs.powf(1.0 / 1.8)
            } else {
                16.0 * value
            }
        }

        fn decode(value: Component) -> Component {
            const E: Component = 16.0 / 512.0;
            let abs = value.abs();
            if abs <= E {
                value / 16.0
            } else {
                value.signum() * abs.powf(1.8)
            }
        }
    }

    /// Tag for the Rec. 2020 color space.
    #[derive(Clone, Debug)]
    pub struct Rec2020;

    #[allow(clippy::excessive_precision)]
    const REC2020_ALPHA: Component = 1.09929682680944;
    #[allow(clippy::excessive_precision)]
    const REC2020_BETA: Component = 0.018053968510807;

    impl RgbSpace for Rec2020 {
        type WhitePoint = D65;

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const TO_XYZ: Transform = transform_3x3(
            0.6369580483012913,  0.26270021201126703,  0.0,
            0.14461690358620838, 0.677998071518871,    0.028072693049087508,
            0.16888097516417205, 0.059301716469861945, 1.0609850577107909,
        );

        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const FROM_XYZ: Transform = transform_3x3(
             1.7166511879712676, -0.666684351832489,    0.017639857445310915,
            -0.3556707837763924,  1.616481236634939,   -0.042770613257808655,
            -0.2533662813736598,  0.01576854581391113,  0.942103121235474,
        );

        fn encode(value: Component) -> Component {
            let abs = value.abs();
            if abs > REC2020_BETA {
                value.signum() * (REC2020_ALPHA * abs.powf(0.45) - (REC2020_ALPHA - 1.0))
            } else {
                4.5 * value
            }
        }

        fn decode(value: Component) -> Component {
            let abs = value.abs();
            if abs < REC2020_BETA * 4.5 {
                value / 4.5
            } else {
                value.signum() * ((abs + REC2020_ALPHA - 1.0) / REC2020_ALPHA).powf(1.0 / 0.45)
            }
        }
    }
}

use encoding::{Encoding, GammaEncoded, LinearLight};
use space::RgbSpace;

tincture_macros::gen_model! {
    /// A color specified in one of the RGB color spaces.
    pub struct Rgb<S: RgbSpace, E: Encoding> {
        /// The red component of the color.
        pub red: Component,
        /// The green component of the color.
        pub green: Component,
        /// The blue component of the color.
        pub blue: Component,
    }
}

impl<S: RgbSpace> Rgb<S, GammaEncoded> {
    /// Convert this model from gamma encoded to linear light.
    pub fn to_linear_light(&self) -> Rgb<S, LinearLight> {
        self.to_components().map(S::decode).into()
    }
}

impl<S: RgbSpace> Rgb<S, LinearLight> {
    /// Convert this model from linear light to gamma encoded.
    pub fn to_gamma_encoded(&self) -> Rgb<S, GammaEncoded> {
        self.to_components().map(S::encode).into()
    }
}

impl<S: RgbSpace> ToXyz for Rgb<S, LinearLight> {
    type WhitePoint = S::WhitePoint;

    fn to_xyz(&self) -> Xyz<S::WhitePoint> {
        transform(&S::TO_XYZ, self.to_components()).into()
    }
}

impl<S: RgbSpace> From<Xyz<S::WhitePoint>> for Rgb<S, LinearLight> {
    fn from(value: Xyz<S::WhitePoint>) -> Self {
        transform(&S::FROM_XYZ, value.to_components()).into()
    }
}

/// Model for a color in the sRGB color space with gamma encoding.
pub type Srgb = Rgb<space::Srgb, GammaEncoded>;

impl HasSpace for Srgb {
    const SPACE: Space = Space::Srgb;
}

/// Model for a color in the sRGB color space with no gamma encoding.
pub type SrgbLinear = Rgb<space::Srgb, LinearLight>;

impl HasSpace for SrgbLinear {
    const SPACE: Space = Space::SrgbLinear;
}

/// Model for a color in the Display P3 color space with gamma encoding.
pub type DisplayP3 = Rgb<space::DisplayP3, GammaEncoded>;

/// Model for a color in the Display P3 color space without gamma encoding.
pub type DisplayP3Linear = Rgb<space::DisplayP3, LinearLight>;

impl HasSpace for DisplayP3 {
    const SPACE: Space = Space::DisplayP3;
}

/// Model for a color in the A98 RGB color space with gamma encoding.
pub type A98Rgb = Rgb<space::A98Rgb, GammaEncoded>;

/// Model for a color in the A98 RGB color space without gamma encoding.
pub type A98RgbLinear = Rgb<space::A98Rgb, LinearLight>;

impl HasSpace for A98Rgb {
    const SPACE: Space = Space::A98Rgb;
}

/// Model for a color in the ProPhoto RGB color space with gamma encoding.
pub type ProPhotoRgb = Rgb<space::ProPhotoRgb, GammaEncoded>;

/// Model for a color in the ProPhoto RGB color space without gamma encoding.
pub type ProPhotoRgbLinear = Rgb<space::ProPhotoRgb, LinearLight>;

impl HasSpace for ProPhotoRgb {
    const SPACE: Space = Space::ProPhotoRgb;
}

/// Model for a color in the Rec. 2020 color space with gamma encoding.
pub type Rec2020 = Rgb<space::Rec2020, GammaEncoded>;

/// Model for a color in the Rec. 2020 color space without gamma encoding.
pub type Rec2020Linear = Rgb<space::Rec2020, LinearLight>;

impl HasSpace for Rec2020 {
    const SPACE: Space = Space::Rec2020;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn srgb_white_is_d65() {
        let xyz = Srgb::new(1.0, 1.0, 1.0).to_linear_light().to_xyz();
        assert_component_eq!(xyz.x, 0.9504559270516716);
        assert_component_eq!(xyz.y, 1.0);
        assert_component_eq!(xyz.z, 1.0890577507598784);
    }

    #[test]
    fn transfer_functions_invert() {
        fn check<S: RgbSpace>() {
            for value in [-0.5, 0.0, 0.001, 0.2, 0.5, 1.0] {
                let encoded = Rgb::<S, LinearLight>::new(value, value, value).to_gamma_encoded();
                let decoded = encoded.to_linear_light();
                assert_component_eq!(decoded.red, value);
            }
        }

        check::<space::Srgb>();
        check::<space::DisplayP3>();
        check::<space::A98Rgb>();
        check::<space::ProPhotoRgb>();
        check::<space::Rec2020>();
    }

    #[test]
    fn prophoto_is_relative_to_d50() {
        let xyz = ProPhotoRgbLinear::new(1.0, 1.0, 1.0).to_xyz();
        assert_component_eq!(xyz.x, 0.9642956764295677);
        assert_component_eq!(xyz.z, 0.8251046025104602);
    }

    #[test]
    fn components_survive_a_trip_through_xyz() {
        let rec = Rec2020Linear::new(0.25, 0.5, 0.75);
        let back = Rec2020Linear::from(rec.to_xyz());
        assert_component_eq!(back.red, 0.25);
        assert_component_eq!(back.green, 0.5);
        assert_component_eq!(back.blue, 0.75);
    }
}
