//! A [`Color`] represents a color that was specified in any of the supported
//! color spaces.

use std::str::FromStr;

use bitflags::bitflags;
use thiserror::Error;

#[cfg(not(feature = "f64"))]
/// A 32-bit floating point value that all components are stored as.
pub type Component = f32;

#[cfg(feature = "f64")]
/// A 64-bit floating point value that all components are stored as.
pub type Component = f64;

/// Represent the three components that describe any color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Components(pub Component, pub Component, pub Component);

impl Components {
    /// Return new components with each component mapped with the given
    /// function.
    pub fn map(&self, f: impl Fn(Component) -> Component) -> Self {
        Self(f(self.0), f(self.1), f(self.2))
    }

    /// Return the component at `index` (0, 1 or 2).
    pub fn get(&self, index: usize) -> Option<Component> {
        match index {
            0 => Some(self.0),
            1 => Some(self.1),
            2 => Some(self.2),
            _ => None,
        }
    }

    /// Replace the component at `index`; indices past 2 set the last one.
    pub(crate) fn set(&mut self, index: usize, value: Component) {
        match index {
            0 => self.0 = value,
            1 => self.1 = value,
            _ => self.2 = value,
        }
    }
}

bitflags! {
    /// Flags to mark any missing components on a [`Color`]
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Flags : u8 {
        /// Set when the first component of a [`Color`] is missing.
        const C0_IS_NONE = 1 << 0;
        /// Set when the second component of a [`Color`] is missing.
        const C1_IS_NONE = 1 << 1;
        /// Set when the third component of a [`Color`] is missing.
        const C2_IS_NONE = 1 << 2;
        /// Set when the alpha component of a [`Color`] is missing.
        const ALPHA_IS_NONE = 1 << 3;
    }
}

impl Flags {
    /// The flag marking the component at `index` as missing.
    pub fn component(index: usize) -> Flags {
        match index {
            0 => Flags::C0_IS_NONE,
            1 => Flags::C1_IS_NONE,
            _ => Flags::C2_IS_NONE,
        }
    }
}

/// Errors produced by color operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// The name does not identify a supported color space.
    #[error("unknown color space: {0}")]
    UnknownSpace(String),
    /// The channel key does not exist in the color space.
    #[error("color space {space:?} has no channel {key:?}")]
    UnknownChannel {
        /// The space that was searched.
        space: Space,
        /// The key that was not found.
        key: String,
    },
    /// An operation produced a NaN or infinite component.
    #[error("non-finite component in {0:?} color")]
    NonFinite(Space),
    /// The text could not be parsed as a color.
    #[error("could not parse color: {0}")]
    Parse(String),
}

/// The color spaces and notations a [`Color`] can be specified in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Space {
    /// The sRGB color space.
    Srgb = 0,
    /// The sRGB color space with no gamma encoding.
    SrgbLinear = 1,
    /// The HSL (hue, saturation, lightness) notation of sRGB.
    Hsl = 2,
    /// The HSV (hue, saturation, value) notation of sRGB.
    Hsv = 3,
    /// The HWB (hue, whiteness, blackness) notation of sRGB.
    Hwb = 4,
    /// CIE-Lab.
    Lab = 5,
    /// CIE-LCh, the polar form of CIE-Lab.
    Lch = 6,
    /// Oklab.
    Oklab = 7,
    /// Oklch, the polar form of Oklab.
    Oklch = 8,
    /// display-p3
    DisplayP3 = 9,
    /// a98-rgb
    A98Rgb = 10,
    /// prophoto-rgb
    ProPhotoRgb = 11,
    /// rec2020
    Rec2020 = 12,
    /// xyz-d50
    XyzD50 = 13,
    /// xyz-d65
    XyzD65 = 14,
}

impl Space {
    /// Every supported space.
    pub const ALL: [Space; 15] = [
        Space::Srgb,
        Space::SrgbLinear,
        Space::Hsl,
        Space::Hsv,
        Space::Hwb,
        Space::Lab,
        Space::Lch,
        Space::Oklab,
        Space::Oklch,
        Space::DisplayP3,
        Space::A98Rgb,
        Space::ProPhotoRgb,
        Space::Rec2020,
        Space::XyzD50,
        Space::XyzD65,
    ];

    /// The short mode name of the space, e.g. `"hsl"` or `"p3"`.
    pub fn name(&self) -> &'static str {
        match self {
            Space::Srgb => "rgb",
            Space::SrgbLinear => "lrgb",
            Space::Hsl => "hsl",
            Space::Hsv => "hsv",
            Space::Hwb => "hwb",
            Space::Lab => "lab",
            Space::Lch => "lch",
            Space::Oklab => "oklab",
            Space::Oklch => "oklch",
            Space::DisplayP3 => "p3",
            Space::A98Rgb => "a98",
            Space::ProPhotoRgb => "prophoto",
            Space::Rec2020 => "rec2020",
            Space::XyzD50 => "xyz50",
            Space::XyzD65 => "xyz65",
        }
    }

    /// The channel keys of the space, in component order.
    pub fn channels(&self) -> [&'static str; 3] {
        match self {
            Space::Srgb
            | Space::SrgbLinear
            | Space::DisplayP3
            | Space::A98Rgb
            | Space::ProPhotoRgb
            | Space::Rec2020 => ["r", "g", "b"],
            Space::Hsl => ["h", "s", "l"],
            Space::Hsv => ["h", "s", "v"],
            Space::Hwb => ["h", "w", "b"],
            Space::Lab | Space::Oklab => ["l", "a", "b"],
            Space::Lch | Space::Oklch => ["l", "c", "h"],
            Space::XyzD50 | Space::XyzD65 => ["x", "y", "z"],
        }
    }

    /// The component index of the channel `key`.
    pub fn channel_index(&self, key: &str) -> Option<usize> {
        self.channels().iter().position(|c| *c == key)
    }

    /// The component index of the hue channel, for spaces that have one.
    pub fn hue_index(&self) -> Option<usize> {
        match self {
            Space::Hsl | Space::Hsv | Space::Hwb => Some(0),
            Space::Lch | Space::Oklch => Some(2),
            _ => None,
        }
    }
}

impl FromStr for Space {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let space = match s.to_ascii_lowercase().as_str() {
            "rgb" | "srgb" => Space::Srgb,
            "lrgb" | "srgb-linear" => Space::SrgbLinear,
            "hsl" => Space::Hsl,
            "hsv" => Space::Hsv,
            "hwb" => Space::Hwb,
            "lab" => Space::Lab,
            "lch" => Space::Lch,
            "oklab" => Space::Oklab,
            "oklch" => Space::Oklch,
            "p3" | "display-p3" => Space::DisplayP3,
            "a98" | "a98-rgb" => Space::A98Rgb,
            "prophoto" | "prophoto-rgb" => Space::ProPhotoRgb,
            "rec2020" => Space::Rec2020,
            "xyz50" | "xyz-d50" => Space::XyzD50,
            "xyz65" | "xyz-d65" | "xyz" => Space::XyzD65,
            _ => return Err(ColorError::UnknownSpace(s.to_string())),
        };
        Ok(space)
    }
}

/// Implemented by models to name the space they are specified in.
pub trait HasSpace {
    /// The space of the model.
    const SPACE: Space;
}

/// Struct that can hold a color of any color space.
#[derive(Clone, Debug, PartialEq)]
pub struct Color {
    /// The three components that make up any color.
    pub components: Components,
    /// The alpha component of the color.
    pub alpha: Component,
    /// Holds any flags that might be enabled for this color.
    pub flags: Flags,
    /// The color space in which the components are set.
    pub space: Space,
}

impl Color {
    /// Create a new [`Color`]. Each color or alpha component can take values
    /// that can be converted into a [`ComponentDetails`]. Passing `None`
    /// marks the component as missing:
    /// ```rust
    /// use tincture::{Color, Space};
    /// let c = Color::new(Space::Srgb, None, None, None, 1.0);
    /// ```
    pub fn new(
        space: Space,
        c0: impl Into<ComponentDetails>,
        c1: impl Into<ComponentDetails>,
        c2: impl Into<ComponentDetails>,
        alpha: impl Into<ComponentDetails>,
    ) -> Self {
        let mut flags = Flags::empty();

        let c0 = c0.into().value_and_flag(&mut flags, Flags::C0_IS_NONE);
        let c1 = c1.into().value_and_flag(&mut flags, Flags::C1_IS_NONE);
        let c2 = c2.into().value_and_flag(&mut flags, Flags::C2_IS_NONE);
        let alpha = alpha
            .into()
            .value_and_flag(&mut flags, Flags::ALPHA_IS_NONE);

        Self {
            components: Components(c0, c1, c2),
            alpha,
            flags,
            space,
        }
    }

    /// Return the first component of the color.
    pub fn c0(&self) -> Option<Component> {
        self.component(0)
    }

    /// Return the second component of the color.
    pub fn c1(&self) -> Option<Component> {
        self.component(1)
    }

    /// Return the third component of the color.
    pub fn c2(&self) -> Option<Component> {
        self.component(2)
    }

    /// Return the component at `index`, or `None` if it is missing.
    pub fn component(&self, index: usize) -> Option<Component> {
        if self.flags.contains(Flags::component(index)) {
            None
        } else {
            self.components.get(index)
        }
    }

    /// Return the alpha component of the color.
    pub fn alpha(&self) -> Option<Component> {
        if self.flags.contains(Flags::ALPHA_IS_NONE) {
            None
        } else {
            Some(self.alpha)
        }
    }

    /// Return the value of the channel `key` in this color's own space.
    ///
    /// Returns `None` when the channel does not exist or is missing.
    pub fn channel(&self, key: &str) -> Option<Component> {
        self.space
            .channel_index(key)
            .and_then(|index| self.component(index))
    }

    /// Convert this color to `space` and set the given channels there.
    ///
    /// Channels that were missing become present.
    pub fn set_channels(
        &self,
        space: Space,
        channels: &[(&str, Component)],
    ) -> Result<Color, ColorError> {
        let mut color = self.to_space(space);

        for &(key, value) in channels {
            let index = space
                .channel_index(key)
                .ok_or_else(|| ColorError::UnknownChannel {
                    space,
                    key: key.to_string(),
                })?;
            color.components.set(index, value);
            color.flags.remove(Flags::component(index));
        }

        color.checked()
    }

    /// Return a copy of this color with the given alpha.
    pub fn with_alpha(&self, alpha: Component) -> Color {
        let mut color = self.clone();
        color.alpha = alpha;
        color.flags.remove(Flags::ALPHA_IS_NONE);
        color
    }

    /// Returns the color unchanged when all present components and the alpha
    /// are finite.
    pub fn checked(self) -> Result<Color, ColorError> {
        let components_finite = (0..3).all(|index| {
            self.component(index)
                .map_or(true, |value| value.is_finite())
        });
        let alpha_finite = self.alpha().map_or(true, |value| value.is_finite());

        if components_finite && alpha_finite {
            Ok(self)
        } else {
            Err(ColorError::NonFinite(self.space))
        }
    }
}

/// A struct that holds details about a component passed to any of the `new`
/// functions for color models. Any components that can be passed implements
/// a `From<?> for ComponentDetails`.
pub struct ComponentDetails {
    value: Component,
    is_none: bool,
}

impl ComponentDetails {
    /// Extract the value and set the given flag if the component is none.
    pub fn value_and_flag(&self, flags: &mut Flags, flag: Flags) -> Component {
        if self.is_none {
            *flags |= flag;
        }
        self.value
    }
}

impl From<Component> for ComponentDetails {
    fn from(value: Component) -> Self {
        Self {
            value,
            is_none: false,
        }
    }
}

impl From<Option<Component>> for ComponentDetails {
    fn from(value: Option<Component>) -> Self {
        if let Some(value) = value {
            Self::from(value)
        } else {
            Self {
                value: 0.0,
                is_none: true,
            }
        }
    }
}
