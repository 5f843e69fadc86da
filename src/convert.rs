//! Each color space/form is modeled with its own type. Conversions are only
//! implemented on relevant models, making conversion paths accurate and
//! performant.
//!
//! Conversions only operate on the 3 color components. Alpha is carried over
//! unchanged.
//!
//! NOTE: When a conversion yields a NaN value, the component is powerless and
//!       is marked as missing on the resulting [`Color`].
//! NOTE: The reverse is not the same. A missing component on the source color
//!       takes part in the conversion as 0.0.
//!
//! ```rust
//! use tincture::models::{Lab, Srgb, ToXyz};
//! let blue_in_lch = Lab::from(    // create color in lab.
//!     Srgb::new(0.0, 0.0, 1.0)
//!         .to_linear_light()      // convert to srgb-linear.
//!         .to_xyz()               // convert to xyz-d65.
//!         .transfer(),            // convert to xyz-d50.
//! )
//! .to_polar();                    // convert to lch.
//! ```

use crate::{
    color::{Color, ColorError, Components, Space},
    models::{
        A98RgbLinear, Base, DisplayP3Linear, Hsl, Hsv, Hwb, Lab, Lch, Model, Oklab, Oklch,
        ProPhotoRgbLinear, Rec2020Linear, Srgb, SrgbLinear, ToBase, XyzD50, XyzD65, D50, D65,
    },
};

impl Color {
    /// Read the components of this color into the model `M`.
    fn model<M: Model>(&self) -> M {
        M::from_color(self)
    }

    /// Convert this color from its current color space/notation to the
    /// specified color space/notation.
    pub fn to_space(&self, space: Space) -> Self {
        use Space as S;

        if self.space == space {
            return self.clone();
        }

        let alpha = self.alpha();

        // Conversions that do not need to pass through XYZ.
        match (self.space, space) {
            (S::Srgb, S::SrgbLinear) => {
                return self.model::<Srgb>().to_linear_light().to_color(alpha)
            }
            (S::SrgbLinear, S::Srgb) => {
                return self.model::<SrgbLinear>().to_gamma_encoded().to_color(alpha)
            }
            (S::Srgb, S::Hsl) => return self.model::<Srgb>().to_hsl().to_color(alpha),
            (S::Srgb, S::Hsv) => return self.model::<Srgb>().to_hsv().to_color(alpha),
            (S::Srgb, S::Hwb) => return self.model::<Srgb>().to_hwb().to_color(alpha),
            (S::Hsl | S::Hsv | S::Hwb, S::Srgb) => return self.to_srgb().to_color(alpha),
            (S::Hsl | S::Hsv | S::Hwb, S::Hsl) => {
                return self.to_srgb().to_hsl().to_color(alpha)
            }
            (S::Hsl | S::Hsv | S::Hwb, S::Hsv) => {
                return self.to_srgb().to_hsv().to_color(alpha)
            }
            (S::Hsl | S::Hsv | S::Hwb, S::Hwb) => {
                return self.to_srgb().to_hwb().to_color(alpha)
            }
            (S::XyzD50, S::XyzD65) => {
                return self.model::<XyzD50>().transfer::<D65>().to_color(alpha)
            }
            (S::XyzD65, S::XyzD50) => {
                return self.model::<XyzD65>().transfer::<D50>().to_color(alpha)
            }
            (S::Lab, S::Lch) => return self.model::<Lab>().to_polar().to_color(alpha),
            (S::Lch, S::Lab) => return self.model::<Lch>().to_rectangular().to_color(alpha),
            (S::Oklab, S::Oklch) => return self.model::<Oklab>().to_polar().to_color(alpha),
            (S::Oklch, S::Oklab) => {
                return self.model::<Oklch>().to_rectangular().to_color(alpha)
            }
            _ => {}
        }

        let base = self.to_base();

        match space {
            S::Srgb => SrgbLinear::from(base).to_gamma_encoded().to_color(alpha),
            S::SrgbLinear => SrgbLinear::from(base).to_color(alpha),
            S::Hsl => SrgbLinear::from(base)
                .to_gamma_encoded()
                .to_hsl()
                .to_color(alpha),
            S::Hsv => SrgbLinear::from(base)
                .to_gamma_encoded()
                .to_hsv()
                .to_color(alpha),
            S::Hwb => SrgbLinear::from(base)
                .to_gamma_encoded()
                .to_hwb()
                .to_color(alpha),
            S::Lab => Lab::from(base.transfer::<D50>()).to_color(alpha),
            S::Lch => Lab::from(base.transfer::<D50>()).to_polar().to_color(alpha),
            S::Oklab => Oklab::from(base).to_color(alpha),
            S::Oklch => Oklab::from(base).to_polar().to_color(alpha),
            S::DisplayP3 => DisplayP3Linear::from(base)
                .to_gamma_encoded()
                .to_color(alpha),
            S::A98Rgb => A98RgbLinear::from(base).to_gamma_encoded().to_color(alpha),
            S::ProPhotoRgb => ProPhotoRgbLinear::from(base.transfer::<D50>())
                .to_gamma_encoded()
                .to_color(alpha),
            S::Rec2020 => Rec2020Linear::from(base).to_gamma_encoded().to_color(alpha),
            S::XyzD50 => base.transfer::<D50>().to_color(alpha),
            S::XyzD65 => base.to_color(alpha),
        }
    }

    /// Convert this color to `space`, failing if the result has a NaN or
    /// infinite component that is not marked missing.
    pub fn convert(&self, space: Space) -> Result<Color, ColorError> {
        self.to_space(space).checked()
    }

    /// Convert this color to gamma encoded sRGB.
    pub fn to_rgb(&self) -> Color {
        self.to_space(Space::Srgb)
    }

    fn to_srgb(&self) -> Srgb {
        match self.space {
            Space::Hsl => self.model::<Hsl>().to_srgb(),
            Space::Hsv => self.model::<Hsv>().to_srgb(),
            Space::Hwb => self.model::<Hwb>().to_srgb(),
            _ => SrgbLinear::from(self.to_base()).to_gamma_encoded(),
        }
    }

    fn to_base(&self) -> Base {
        use Space as S;

        match self.space {
            S::Srgb => self.model::<Srgb>().to_base(),
            S::SrgbLinear => self.model::<SrgbLinear>().to_base(),
            S::Hsl => self.model::<Hsl>().to_base(),
            S::Hsv => self.model::<Hsv>().to_base(),
            S::Hwb => self.model::<Hwb>().to_base(),
            S::Lab => self.model::<Lab>().to_base(),
            S::Lch => self.model::<Lch>().to_base(),
            S::Oklab => self.model::<Oklab>().to_base(),
            S::Oklch => self.model::<Oklch>().to_base(),
            S::DisplayP3 => self.model::<crate::models::DisplayP3>().to_base(),
            S::A98Rgb => self.model::<crate::models::A98Rgb>().to_base(),
            S::ProPhotoRgb => self.model::<crate::models::ProPhotoRgb>().to_base(),
            S::Rec2020 => self.model::<crate::models::Rec2020>().to_base(),
            S::XyzD50 => self.model::<XyzD50>().to_base(),
            S::XyzD65 => self.model::<XyzD65>(),
        }
    }
}

impl Srgb {
    /// Convert a color specified in the sRGB color space to the HSL notation.
    pub fn to_hsl(&self) -> Hsl {
        util::rgb_to_hsl(&self.to_components()).into()
    }

    /// Convert a color specified in the sRGB color space to the HSV notation.
    pub fn to_hsv(&self) -> Hsv {
        util::rgb_to_hsv(&self.to_components()).into()
    }

    /// Convert a color specified in the sRGB color space to the HWB notation.
    pub fn to_hwb(&self) -> Hwb {
        util::rgb_to_hwb(&self.to_components()).into()
    }
}

impl Hsl {
    /// Convert this color from the HSL notation to the sRGB color space.
    pub fn to_srgb(&self) -> Srgb {
        util::hsl_to_rgb(&self.to_components()).into()
    }
}

impl Hsv {
    /// Convert this color from the HSV notation to the sRGB color space.
    pub fn to_srgb(&self) -> Srgb {
        util::hsv_to_rgb(&self.to_components()).into()
    }
}

impl Hwb {
    /// Convert this color from the HWB notation to the sRGB color space.
    pub fn to_srgb(&self) -> Srgb {
        util::hwb_to_rgb(&self.to_components()).into()
    }
}

mod util {
    use super::Components;
    use crate::{
        color::Component,
        math::{almost_zero, normalize, normalize_hue},
    };

    /// Calculate the hue from RGB components and return it along with the min
    /// and max RGB values. The hue is NaN for achromatic colors.
    fn rgb_to_hue_with_min_max(from: &Components) -> (Component, Component, Component) {
        let Components(red, green, blue) = *from;

        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);

        let delta = max - min;

        let hue = if delta != 0.0 {
            60.0 * if max == red {
                (green - blue) / delta + if green < blue { 6.0 } else { 0.0 }
            } else if max == green {
                (blue - red) / delta + 2.0
            } else {
                (red - green) / delta + 4.0
            }
        } else {
            Component::NAN
        };

        (hue, min, max)
    }

    /// Convert from RGB notation to HSL notation.
    /// <https://drafts.csswg.org/css-color-4/#rgb-to-hsl>
    pub fn rgb_to_hsl(from: &Components) -> Components {
        let (hue, min, max) = rgb_to_hue_with_min_max(from);

        let lightness = (min + max) / 2.0;
        let delta = max - min;

        let saturation =
            if almost_zero(delta) || almost_zero(lightness) || almost_zero(1.0 - lightness) {
                0.0
            } else {
                (max - lightness) / lightness.min(1.0 - lightness)
            };

        Components(hue, saturation, lightness)
    }

    /// Convert from HSL notation to RGB notation.
    /// <https://drafts.csswg.org/css-color-4/#hsl-to-rgb>
    pub fn hsl_to_rgb(from: &Components) -> Components {
        let Components(hue, saturation, lightness) = from.map(normalize);

        if saturation <= 0.0 {
            return Components(lightness, lightness, lightness);
        }

        let hue = normalize_hue(hue);
        let a = saturation * lightness.min(1.0 - lightness);
        let f = |n: Component| {
            let k = (n + hue / 30.0) % 12.0;
            lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
        };

        Components(f(0.0), f(8.0), f(4.0))
    }

    /// Convert from RGB notation to HSV notation.
    pub fn rgb_to_hsv(from: &Components) -> Components {
        let (hue, min, max) = rgb_to_hue_with_min_max(from);

        let saturation = if almost_zero(max) {
            0.0
        } else {
            (max - min) / max
        };

        Components(hue, saturation, max)
    }

    /// Convert from HSV notation to RGB notation.
    pub fn hsv_to_rgb(from: &Components) -> Components {
        let Components(hue, saturation, value) = from.map(normalize);

        let hue = normalize_hue(hue);
        let f = |n: Component| {
            let k = (n + hue / 60.0) % 6.0;
            value - value * saturation * k.min(4.0 - k).clamp(0.0, 1.0)
        };

        Components(f(5.0), f(3.0), f(1.0))
    }

    /// Convert from RGB notation to HWB notation.
    /// <https://drafts.csswg.org/css-color-4/#rgb-to-hwb>
    pub fn rgb_to_hwb(from: &Components) -> Components {
        let (hue, min, max) = rgb_to_hue_with_min_max(from);

        Components(hue, min, 1.0 - max)
    }

    /// Convert from HWB notation to RGB notation.
    /// <https://drafts.csswg.org/css-color-4/#hwb-to-rgb>
    pub fn hwb_to_rgb(from: &Components) -> Components {
        let Components(hue, whiteness, blackness) = from.map(normalize);

        if whiteness + blackness >= 1.0 {
            let gray = whiteness / (whiteness + blackness);
            return Components(gray, gray, gray);
        }

        let rgb = hsl_to_rgb(&Components(hue, 1.0, 0.5));
        rgb.map(|v| v * (1.0 - whiteness - blackness) + whiteness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;
    use crate::color::Component;

    /// CSS `chocolate` expressed in every supported space.
    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const CHOCOLATE: &[(Space, Component, Component, Component)] = &[
        (Space::Srgb,        0.823529,  0.411765,  0.117647),
        (Space::SrgbLinear,  0.644480,  0.141263,  0.012983),
        (Space::Hsl,        25.000000,  0.750000,  0.470588),
        (Space::Hsv,        25.000000,  0.857143,  0.823529),
        (Space::Hwb,        25.000000,  0.117647,  0.176471),
        (Space::Lab,        56.629300, 39.237080, 57.553769),
        (Space::Lch,        56.629300, 69.656190, 55.715927),
        (Space::Oklab,       0.634398,  0.099074,  0.119193),
        (Space::Oklch,       0.634398,  0.154992, 50.266483),
        (Space::DisplayP3,   0.770569,  0.434015,  0.199849),
        (Space::A98Rgb,      0.730405,  0.410688,  0.162005),
        (Space::ProPhotoRgb, 0.592311,  0.394149,  0.164286),
        (Space::Rec2020,     0.669266,  0.401900,  0.142716),
        (Space::XyzD50,      0.337301,  0.245449,  0.031959),
        (Space::XyzD65,      0.318634,  0.239006,  0.041637),
    ];

    #[test]
    fn every_space_converts_to_every_other_space() {
        for &(source_space, s0, s1, s2) in CHOCOLATE {
            let source = Color::new(source_space, s0, s1, s2, 1.0);
            for &(dest_space, d0, d1, d2) in CHOCOLATE {
                println!("{:?} -> {:?}", source_space, dest_space);
                let dest = source.to_space(dest_space);
                assert_eq!(dest.space, dest_space);
                assert_component_eq!(dest.components.0, d0);
                assert_component_eq!(dest.components.1, d1);
                assert_component_eq!(dest.components.2, d2);
            }
        }
    }

    #[test]
    fn hue_is_powerless_if_there_is_no_chroma() {
        assert!(Srgb::new(1.0, 1.0, 1.0).to_hsl().hue.is_nan());
        assert!(Srgb::new(0.0, 0.0, 0.0).to_hsv().hue.is_nan());
        assert!(Srgb::new(0.5, 0.5, 0.5).to_hwb().hue.is_nan());

        let gray = Color::new(Space::Srgb, 0.5, 0.5, 0.5, 1.0).to_space(Space::Hsv);
        assert_eq!(gray.c0(), None);
        assert_eq!(gray.c2(), Some(0.5));
    }

    #[test]
    fn hwb_to_rgb() {
        // hwb(40deg 30% 40%) is rgb(153, 128, 77)
        let hwb = Color::new(Space::Hwb, 40.0, 0.3, 0.4, 1.0);
        let srgb = hwb.to_rgb();

        assert_component_eq!(srgb.components.0, 0.6);
        assert_component_eq!(srgb.components.1, 0.5);
        assert_component_eq!(srgb.components.2, 0.3);
    }

    #[test]
    fn hsv_primaries() {
        let red = Color::new(Space::Hsv, 0.0, 1.0, 1.0, 1.0).to_rgb();
        assert_eq!(red.components, Components(1.0, 0.0, 0.0));

        let blue = Color::new(Space::Hsv, 240.0, 1.0, 1.0, 1.0).to_rgb();
        assert_component_eq!(blue.components.0, 0.0);
        assert_component_eq!(blue.components.1, 0.0);
        assert_component_eq!(blue.components.2, 1.0);

        let dark = Color::new(Space::Hsv, 120.0, 0.5, 0.5, 1.0).to_rgb();
        assert_component_eq!(dark.components.0, 0.25);
        assert_component_eq!(dark.components.1, 0.5);
        assert_component_eq!(dark.components.2, 0.25);
    }

    #[test]
    fn converting_a_color_should_maintain_source_alpha() {
        let hsl = Color::new(Space::Hsl, 120.0, 0.4, 0.4, None);
        let srgb = hsl.to_space(Space::Srgb);
        assert!(srgb.alpha().is_none());

        let lab = Color::new(Space::Lab, 50.0, 10.0, 10.0, 0.25).to_space(Space::DisplayP3);
        assert_eq!(lab.alpha(), Some(0.25));
    }

    #[test]
    fn rgb_to_hsl() {
        // color(srgb 0.46 0.52 0.28 / 0.5)
        let srgb = Color::new(Space::Srgb, 0.46, 0.52, 0.28, 0.5);
        let hsl = srgb.to_space(Space::Hsl);
        assert_component_eq!(hsl.components.0, 75.0);
        assert_component_eq!(hsl.components.1, 0.3);
        assert_component_eq!(hsl.components.2, 0.4);
    }

    #[test]
    fn convert_rejects_non_finite_results() {
        let color = Color::new(Space::Srgb, Component::INFINITY, 0.0, 0.0, 1.0);
        assert_eq!(
            color.convert(Space::XyzD65),
            Err(ColorError::NonFinite(Space::XyzD65))
        );

        let ok = Color::new(Space::Srgb, 1.0, 0.0, 0.0, 1.0).convert(Space::Oklch);
        assert!(ok.is_ok());
    }
}
