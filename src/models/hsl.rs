//! Model colors with the HSL and HSV notations of the sRGB color space.

use crate::color::{Component, HasSpace, Space};

tincture_macros::gen_model! {
    /// A color specified with the HSL notation in the sRGB color space.
    pub struct Hsl {
        /// The hue component of the color, in degrees.
        pub hue: Component,
        /// The saturation component of the color, in [0..1].
        pub saturation: Component,
        /// The lightness component of the color, in [0..1].
        pub lightness: Component,
    }
}

impl HasSpace for Hsl {
    const SPACE: Space = Space::Hsl;
}

tincture_macros::gen_model! {
    /// A color specified with the HSV notation in the sRGB color space.
    pub struct Hsv {
        /// The hue component of the color, in degrees.
        pub hue: Component,
        /// The saturation component of the color, in [0..1].
        pub saturation: Component,
        /// The value component of the color, in [0..1].
        pub value: Component,
    }
}

impl HasSpace for Hsv {
    const SPACE: Space = Space::Hsv;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Model, Flags};

    #[test]
    fn nan_components_are_missing() {
        let c = Hsl::new(Component::NAN, Component::NAN, Component::NAN).to_color(None);
        assert_eq!(
            c.flags,
            Flags::C0_IS_NONE | Flags::C1_IS_NONE | Flags::C2_IS_NONE | Flags::ALPHA_IS_NONE
        );
    }

    #[test]
    fn hsv_keeps_its_space() {
        let c = Hsv::new(Component::NAN, 0.0, 0.5).to_color(Some(1.0));
        assert_eq!(c.space, Space::Hsv);
        assert_eq!(c.c0(), None);
        assert_eq!(c.c2(), Some(0.5));
    }
}
