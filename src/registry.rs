//! The fixed table of color models offered by the pickers, with the display
//! ranges of their channels.
//!
//! Widgets show channel values in a display range (hue in degrees,
//! saturation in percent, ...) while the color math works on an internal
//! range (saturation in [0..1]). [`Channel::display_to_internal`] and
//! [`Channel::internal_to_display`] map between the two.

use crate::{
    color::{Color, ColorError, Component, Space},
    steps::{decimal_count, round_to, snap_to_step},
};

/// How a channel value is presented to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelFormat {
    /// A plain number.
    Number,
    /// An angle in degrees.
    Degree,
    /// A percentage.
    Percentage,
}

/// Describes one channel of a [`ModelDescriptor`].
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    /// The channel key, matching the channel keys of the model's [`Space`].
    pub key: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Minimum display value.
    pub min: Component,
    /// Maximum display value.
    pub max: Component,
    /// Display granularity.
    pub step: Component,
    /// Presentation of display values.
    pub format: ChannelFormat,
    /// The internal `(min, max)` range, when it differs from the display
    /// range.
    pub internal: Option<(Component, Component)>,
}

impl Channel {
    const fn hue() -> Channel {
        Channel {
            key: "h",
            label: "Hue",
            min: 0.0,
            max: 360.0,
            step: 1.0,
            format: ChannelFormat::Degree,
            internal: None,
        }
    }

    /// A 0-100% channel stored as 0-1.
    const fn unit_percent(key: &'static str, label: &'static str) -> Channel {
        Channel {
            key,
            label,
            min: 0.0,
            max: 100.0,
            step: 1.0,
            format: ChannelFormat::Percentage,
            internal: Some((0.0, 1.0)),
        }
    }

    const fn number(
        key: &'static str,
        label: &'static str,
        min: Component,
        max: Component,
        step: Component,
    ) -> Channel {
        Channel {
            key,
            label,
            min,
            max,
            step,
            format: ChannelFormat::Number,
            internal: None,
        }
    }

    /// The internal range, which is the display range unless the channel
    /// declares its own.
    pub fn internal_range(&self) -> (Component, Component) {
        self.internal.unwrap_or((self.min, self.max))
    }

    fn has_distinct_internal_range(&self) -> bool {
        self.internal_range() != (self.min, self.max)
    }

    /// Map a display value to the internal range. Values outside the display
    /// range extrapolate linearly.
    pub fn display_to_internal(&self, display: Component) -> Component {
        if !self.has_distinct_internal_range() {
            return display;
        }

        let (internal_min, internal_max) = self.internal_range();
        let t = (display - self.min) / (self.max - self.min);
        internal_min + t * (internal_max - internal_min)
    }

    /// Map an internal value to the display range, rounded to the precision
    /// of the step.
    pub fn internal_to_display(&self, internal: Component) -> Component {
        let display = if self.has_distinct_internal_range() {
            let (internal_min, internal_max) = self.internal_range();
            let t = (internal - internal_min) / (internal_max - internal_min);
            self.min + t * (self.max - self.min)
        } else {
            internal
        };

        round_to(display, self.decimals())
    }

    /// The number of decimals the step is written with.
    pub fn decimals(&self) -> usize {
        decimal_count(self.step)
    }

    /// Clamp a display value into the display range.
    pub fn clamp_display(&self, display: Component) -> Component {
        display.clamp(self.min, self.max)
    }

    /// Snap a display value to the nearest step, clamped to the display
    /// range.
    pub fn snap_display(&self, display: Component) -> Component {
        snap_to_step(display, self.min, self.max, self.step)
    }

    /// Format a display value with its unit, e.g. `"120°"` or `"50%"`.
    pub fn format_display(&self, display: Component) -> String {
        let decimals = self.decimals();
        let value = round_to(display, decimals);
        match self.format {
            ChannelFormat::Number => format!("{value:.decimals$}"),
            ChannelFormat::Degree => format!("{value:.decimals$}°"),
            ChannelFormat::Percentage => format!("{value:.decimals$}%"),
        }
    }
}

/// Describes a color model a picker can operate in.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelDescriptor {
    /// The identifier of the model, e.g. `"oklch"`.
    pub id: &'static str,
    /// The color space the model's channels live in.
    pub space: Space,
    /// Human readable label.
    pub label: &'static str,
    /// The channels, in the order of the space's components.
    pub channels: [Channel; 3],
}

impl ModelDescriptor {
    /// Find a channel by key.
    pub fn channel(&self, key: &str) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.key == key)
    }
}

macro_rules! rgb_unit_model {
    ($id:literal, $space:expr, $label:literal) => {
        ModelDescriptor {
            id: $id,
            space: $space,
            label: $label,
            channels: [
                Channel::number("r", "Red", 0.0, 1.0, 0.01),
                Channel::number("g", "Green", 0.0, 1.0, 0.01),
                Channel::number("b", "Blue", 0.0, 1.0, 0.01),
            ],
        }
    };
}

static MODELS: [ModelDescriptor; 12] = [
    ModelDescriptor {
        id: "hsl",
        space: Space::Hsl,
        label: "HSL",
        channels: [
            Channel::hue(),
            Channel::unit_percent("s", "Saturation"),
            Channel::unit_percent("l", "Lightness"),
        ],
    },
    ModelDescriptor {
        id: "hsv",
        space: Space::Hsv,
        label: "HSV",
        channels: [
            Channel::hue(),
            Channel::unit_percent("s", "Saturation"),
            Channel::unit_percent("v", "Value"),
        ],
    },
    ModelDescriptor {
        id: "hwb",
        space: Space::Hwb,
        label: "HWB",
        channels: [
            Channel::hue(),
            Channel::unit_percent("w", "Whiteness"),
            Channel::unit_percent("b", "Blackness"),
        ],
    },
    ModelDescriptor {
        id: "oklch",
        space: Space::Oklch,
        label: "OKLCh",
        channels: [
            Channel::unit_percent("l", "Lightness"),
            Channel::number("c", "Chroma", 0.0, 0.4, 0.01),
            Channel::hue(),
        ],
    },
    ModelDescriptor {
        id: "oklab",
        space: Space::Oklab,
        label: "OKLab",
        channels: [
            Channel::unit_percent("l", "Lightness"),
            Channel::number("a", "a", -0.4, 0.4, 0.01),
            Channel::number("b", "b", -0.4, 0.4, 0.01),
        ],
    },
    ModelDescriptor {
        id: "lch",
        space: Space::Lch,
        label: "LCh",
        channels: [
            Channel {
                format: ChannelFormat::Percentage,
                ..Channel::number("l", "Lightness", 0.0, 100.0, 1.0)
            },
            Channel::number("c", "Chroma", 0.0, 150.0, 1.0),
            Channel::hue(),
        ],
    },
    ModelDescriptor {
        id: "lab",
        space: Space::Lab,
        label: "Lab",
        channels: [
            Channel {
                format: ChannelFormat::Percentage,
                ..Channel::number("l", "Lightness", 0.0, 100.0, 1.0)
            },
            Channel::number("a", "a", -125.0, 125.0, 1.0),
            Channel::number("b", "b", -125.0, 125.0, 1.0),
        ],
    },
    ModelDescriptor {
        id: "rgb",
        space: Space::Srgb,
        label: "RGB",
        channels: [
            Channel {
                internal: Some((0.0, 1.0)),
                ..Channel::number("r", "Red", 0.0, 255.0, 1.0)
            },
            Channel {
                internal: Some((0.0, 1.0)),
                ..Channel::number("g", "Green", 0.0, 255.0, 1.0)
            },
            Channel {
                internal: Some((0.0, 1.0)),
                ..Channel::number("b", "Blue", 0.0, 255.0, 1.0)
            },
        ],
    },
    rgb_unit_model!("p3", Space::DisplayP3, "Display P3"),
    rgb_unit_model!("a98", Space::A98Rgb, "A98 RGB"),
    rgb_unit_model!("prophoto", Space::ProPhotoRgb, "ProPhoto RGB"),
    rgb_unit_model!("rec2020", Space::Rec2020, "Rec. 2020"),
];

/// Iterate all models in their declared order.
pub fn models() -> impl Iterator<Item = &'static ModelDescriptor> {
    MODELS.iter()
}

/// Find a model by identifier.
pub fn model(id: &str) -> Option<&'static ModelDescriptor> {
    MODELS.iter().find(|model| model.id == id)
}

/// Find a channel of a model. Absent when either the model or the channel
/// does not exist.
pub fn lookup_channel(model_id: &str, key: &str) -> Option<&'static Channel> {
    model(model_id)?.channel(key)
}

/// Read a channel of `color` in the model `model_id` as a display value.
/// Missing components read as zero.
pub fn display_channel(color: &Color, model_id: &str, key: &str) -> Option<Component> {
    let model = model(model_id)?;
    let index = model.channels.iter().position(|c| c.key == key)?;
    let channel = &model.channels[index];

    let internal = color
        .to_space(model.space)
        .component(index)
        .filter(|value| !value.is_nan())
        .unwrap_or(0.0);

    Some(channel.internal_to_display(internal))
}

/// Set a channel of `color` in the model `model_id` from a display value.
/// The returned color is in the model's space.
pub fn with_display_channel(
    color: &Color,
    model_id: &str,
    key: &str,
    display: Component,
) -> Result<Color, ColorError> {
    let model = model(model_id).ok_or_else(|| ColorError::UnknownSpace(model_id.to_string()))?;
    let channel = model.channel(key).ok_or_else(|| ColorError::UnknownChannel {
        space: model.space,
        key: key.to_string(),
    })?;

    color.set_channels(model.space, &[(key, channel.display_to_internal(display))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn table_is_consistent() {
        assert_eq!(models().count(), 12);
        for model in models() {
            for (channel, key) in model.channels.iter().zip(model.space.channels()) {
                assert_eq!(channel.key, key, "{}", model.id);
                assert!(channel.max > channel.min);
                if let Some((min, max)) = channel.internal {
                    assert_ne!(min, max);
                }
            }
        }

        let ids = models().map(|m| m.id).collect::<Vec<_>>();
        assert_eq!(
            ids,
            [
                "hsl", "hsv", "hwb", "oklch", "oklab", "lch", "lab", "rgb", "p3", "a98",
                "prophoto", "rec2020"
            ]
        );
    }

    #[test]
    fn saturation_maps_between_percent_and_unit() {
        let s = lookup_channel("hsl", "s").unwrap();
        assert_component_eq!(s.display_to_internal(50.0), 0.5);
        assert_eq!(s.internal_to_display(0.5), 50.0);
    }

    #[test]
    fn distinct_ranges_round_trip_to_step_precision() {
        for model in models() {
            for channel in model.channels.iter().filter(|c| c.internal.is_some()) {
                for i in 0..=10 {
                    let x = round_to(
                        channel.min + (channel.max - channel.min) * i as Component / 10.0,
                        channel.decimals(),
                    );
                    let back = channel.internal_to_display(channel.display_to_internal(x));
                    assert_component_eq!(back, x);
                }
            }
        }
    }

    #[test]
    fn same_ranges_are_identity_up_to_rounding() {
        let chroma = lookup_channel("oklch", "c").unwrap();
        assert_eq!(chroma.display_to_internal(0.123), 0.123);
        assert_component_eq!(chroma.internal_to_display(0.123), 0.12);

        let hue = lookup_channel("lch", "h").unwrap();
        assert_eq!(hue.display_to_internal(400.0), 400.0);
        assert_eq!(hue.internal_to_display(12.5), 13.0);
    }

    #[test]
    fn no_clamping_when_mapping() {
        let red = lookup_channel("rgb", "r").unwrap();
        assert_component_eq!(red.display_to_internal(510.0), 2.0);
        assert_component_eq!(red.display_to_internal(-255.0), -1.0);
    }

    #[test]
    fn unknown_lookups_are_absent() {
        assert!(model("cmyk").is_none());
        assert!(lookup_channel("hsl", "v").is_none());
        assert!(lookup_channel("cmyk", "c").is_none());
        assert!(lookup_channel("hsv", "v").is_some());
    }

    #[test]
    fn formats_with_units() {
        assert_eq!(lookup_channel("hsl", "h").unwrap().format_display(120.4), "120°");
        assert_eq!(lookup_channel("hsl", "s").unwrap().format_display(50.0), "50%");
        assert_eq!(lookup_channel("oklab", "a").unwrap().format_display(0.25), "0.25");
        assert_eq!(lookup_channel("oklab", "a").unwrap().format_display(-0.1), "-0.10");
    }

    #[test]
    fn clamps_and_snaps_display_values() {
        let chroma = lookup_channel("oklch", "c").unwrap();
        assert_eq!(chroma.clamp_display(0.5), 0.4);
        assert_eq!(chroma.clamp_display(-1.0), 0.0);

        let hue = lookup_channel("hsv", "h").unwrap();
        assert_eq!(hue.snap_display(359.7), 360.0);
        assert_eq!(hue.snap_display(12.4), 12.0);
    }

    #[test]
    fn display_channels_round_trip_through_colors() {
        let color = Color::new(crate::Space::Srgb, 1.0, 0.0, 0.0, 1.0);
        assert_eq!(display_channel(&color, "hsl", "s"), Some(100.0));
        assert_eq!(display_channel(&color, "rgb", "r"), Some(255.0));
        assert_eq!(display_channel(&color, "hsl", "q"), None);

        let set = with_display_channel(&color, "oklch", "l", 40.0).unwrap();
        assert_eq!(set.space, Space::Oklch);
        assert_eq!(display_channel(&set, "oklch", "l"), Some(40.0));

        let gray = Color::new(Space::Srgb, 0.5, 0.5, 0.5, 1.0);
        assert_eq!(display_channel(&gray, "hsl", "h"), Some(0.0));

        assert!(matches!(
            with_display_channel(&color, "cmyk", "c", 1.0),
            Err(ColorError::UnknownSpace(_))
        ));
        assert!(matches!(
            with_display_channel(&color, "hsl", "q", 1.0),
            Err(ColorError::UnknownChannel { .. })
        ));
    }
}
