//! Interpolation between two colors in a chosen color space.

use crate::{
    color::{Color, ColorError, Component, Components, Flags, Space},
    math::{lerp, normalize_hue},
};

/// Two colors prepared for interpolation in a common color space.
///
/// Preparing converts both colors, fills in components that are missing on
/// only one side and fixes up the hue so that it travels along the shorter
/// arc.
#[derive(Clone, Debug)]
pub struct Interpolation {
    left: Color,
    right: Color,
}

impl Interpolation {
    /// Prepare `left` and `right` for interpolation in `space`.
    pub fn new(left: &Color, right: &Color, space: Space) -> Self {
        let mut left = left.to_space(space);
        let mut right = right.to_space(space);

        for index in 0..3 {
            let flag = Flags::component(index);
            match (left.flags.contains(flag), right.flags.contains(flag)) {
                (true, false) => {
                    left.components
                        .set(index, right.components.get(index).unwrap_or_default());
                    left.flags.remove(flag);
                }
                (false, true) => {
                    right
                        .components
                        .set(index, left.components.get(index).unwrap_or_default());
                    right.flags.remove(flag);
                }
                _ => {}
            }
        }

        match (left.alpha(), right.alpha()) {
            (None, Some(alpha)) => left = left.with_alpha(alpha),
            (Some(alpha), None) => right = right.with_alpha(alpha),
            _ => {}
        }

        if let Some(index) = space.hue_index() {
            let hue_missing = left.flags.contains(Flags::component(index));
            if !hue_missing {
                let (a, b) = shorter_arc(
                    left.components.get(index).unwrap_or_default(),
                    right.components.get(index).unwrap_or_default(),
                );
                left.components.set(index, a);
                right.components.set(index, b);
            }
        }

        Self { left, right }
    }

    /// Return the color at `t`, where 0 is the left color and 1 the right.
    pub fn at(&self, t: Component) -> Color {
        let l = &self.left;
        let r = &self.right;

        let mut color = Color {
            components: Components(
                lerp(l.components.0, r.components.0, t),
                lerp(l.components.1, r.components.1, t),
                lerp(l.components.2, r.components.2, t),
            ),
            alpha: lerp(l.alpha, r.alpha, t).clamp(0.0, 1.0),
            // Components missing on both sides stay missing.
            flags: l.flags & r.flags,
            space: l.space,
        };

        if let Some(index) = color.space.hue_index() {
            let hue = color.components.get(index).unwrap_or_default();
            color.components.set(index, normalize_hue(hue));
        }

        color
    }
}

/// Adjust two hues so that interpolating between them takes the shorter way
/// around the hue circle.
fn shorter_arc(a: Component, b: Component) -> (Component, Component) {
    let delta = b - a;
    if delta > 180.0 {
        (a + 360.0, b)
    } else if delta < -180.0 {
        (a, b + 360.0)
    } else {
        (a, b)
    }
}

impl Color {
    /// Prepare to interpolate from this color to `other` in `space`.
    pub fn interpolate(&self, other: &Self, space: Space) -> Interpolation {
        Interpolation::new(self, other, space)
    }

    /// Mix this color with `other` in `space`, `t` being the weight of
    /// `other`.
    pub fn mix(&self, other: &Self, t: Component, space: Space) -> Result<Color, ColorError> {
        self.interpolate(other, space).at(t).checked()
    }
}
