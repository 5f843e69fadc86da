//! Parse colors from CSS-like text and serialize them back to hex.
//!
//! Supported forms are hex notation (`#rgb`, `#rgba`, `#rrggbb`,
//! `#rrggbbaa`), the functional notations `rgb()`, `rgba()`, `hsl()`,
//! `hsla()`, `hsv()`, `hwb()`, `lab()`, `lch()`, `oklab()`, `oklch()` and
//! `color(<space> ...)`. Components may be `none`, percentages or, for hues,
//! angles with a `deg`, `rad`, `grad` or `turn` unit.

use std::str::FromStr;

use crate::color::{Color, ColorError, Component, Space};

/// One component as written in the source text.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(Component),
    Percentage(Component),
    /// An angle, already converted to degrees.
    Angle(Component),
    None,
}

impl Token {
    fn parse(text: &str) -> Result<Token, ColorError> {
        if text.eq_ignore_ascii_case("none") {
            return Ok(Token::None);
        }

        let number = |value: &str| {
            value
                .parse::<Component>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| ColorError::Parse(format!("invalid number {text:?}")))
        };

        let lower = text.to_ascii_lowercase();
        if let Some(value) = lower.strip_suffix('%') {
            Ok(Token::Percentage(number(value)?))
        } else if let Some(value) = lower.strip_suffix("deg") {
            Ok(Token::Angle(number(value)?))
        } else if let Some(value) = lower.strip_suffix("grad") {
            Ok(Token::Angle(number(value)? * 0.9))
        } else if let Some(value) = lower.strip_suffix("rad") {
            Ok(Token::Angle(number(value)?.to_degrees()))
        } else if let Some(value) = lower.strip_suffix("turn") {
            Ok(Token::Angle(number(value)? * 360.0))
        } else {
            Ok(Token::Number(number(&lower)?))
        }
    }

    /// Resolve a component where 100% equals `percent_ref` and plain numbers
    /// are divided by `number_scale`.
    fn resolve(
        self,
        percent_ref: Component,
        number_scale: Component,
    ) -> Result<Option<Component>, ColorError> {
        match self {
            Token::Number(value) => Ok(Some(value / number_scale)),
            Token::Percentage(value) => Ok(Some(value / 100.0 * percent_ref)),
            Token::Angle(_) => Err(ColorError::Parse("unexpected angle".to_string())),
            Token::None => Ok(None),
        }
    }

    fn hue(self) -> Result<Option<Component>, ColorError> {
        match self {
            Token::Number(degrees) | Token::Angle(degrees) => Ok(Some(degrees)),
            Token::Percentage(_) => Err(ColorError::Parse("hue can not be a percentage".into())),
            Token::None => Ok(None),
        }
    }

    fn alpha(self) -> Result<Option<Component>, ColorError> {
        Ok(self.resolve(1.0, 1.0)?.map(|alpha| alpha.clamp(0.0, 1.0)))
    }
}

/// The three components and optional alpha inside a function's parentheses.
struct Arguments {
    components: [Token; 3],
    alpha: Option<Token>,
}

impl Arguments {
    fn parse(body: &str) -> Result<Arguments, ColorError> {
        let (components, alpha) = match body.split_once('/') {
            Some((components, alpha)) => (components, Some(alpha)),
            None => (body, None),
        };

        let mut tokens = components
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(Token::parse)
            .collect::<Result<Vec<_>, _>>()?;

        let alpha = match alpha {
            Some(alpha) => Some(Token::parse(alpha.trim())?),
            // The legacy comma syntax carries alpha as a fourth argument.
            None if tokens.len() == 4 => tokens.pop(),
            None => None,
        };

        match tokens.as_slice() {
            &[c0, c1, c2] => Ok(Arguments {
                components: [c0, c1, c2],
                alpha,
            }),
            _ => Err(ColorError::Parse(format!(
                "expected 3 components, found {}",
                tokens.len()
            ))),
        }
    }

    fn alpha(&self) -> Result<Option<Component>, ColorError> {
        match self.alpha {
            Some(alpha) => alpha.alpha(),
            None => Ok(Some(1.0)),
        }
    }
}

fn parse_hex(hex: &str) -> Result<Color, ColorError> {
    fn digit(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    }

    let bytes = hex.as_bytes();
    let values = match bytes.len() {
        3 | 4 => bytes
            .iter()
            .map(|&c| digit(c).map(|d| d << 4 | d))
            .collect::<Option<Vec<_>>>(),
        6 | 8 => bytes
            .chunks(2)
            .map(|pair| Some(digit(pair[0])? << 4 | digit(pair[1])?))
            .collect::<Option<Vec<_>>>(),
        _ => None,
    }
    .ok_or_else(|| ColorError::Parse(format!("invalid hex color #{hex}")))?;

    let channel = |index: usize| values.get(index).map(|&v| v as Component / 255.0);

    Ok(Color::new(
        Space::Srgb,
        channel(0).unwrap_or_default(),
        channel(1).unwrap_or_default(),
        channel(2).unwrap_or_default(),
        channel(3).unwrap_or(1.0),
    ))
}

fn parse_function(name: &str, body: &str) -> Result<Color, ColorError> {
    if name == "color" {
        let body = body.trim_start();
        let (space, rest) = body
            .split_once(char::is_whitespace)
            .ok_or_else(|| ColorError::Parse("color() needs a space".to_string()))?;
        let space = match space.to_ascii_lowercase().as_str() {
            "srgb" => Space::Srgb,
            "srgb-linear" => Space::SrgbLinear,
            "display-p3" => Space::DisplayP3,
            "a98-rgb" => Space::A98Rgb,
            "prophoto-rgb" => Space::ProPhotoRgb,
            "rec2020" => Space::Rec2020,
            "xyz" | "xyz-d65" => Space::XyzD65,
            "xyz-d50" => Space::XyzD50,
            other => return Err(ColorError::UnknownSpace(other.to_string())),
        };
        let args = Arguments::parse(rest)?;
        let [c0, c1, c2] = args.components;
        return Ok(Color::new(
            space,
            c0.resolve(1.0, 1.0)?,
            c1.resolve(1.0, 1.0)?,
            c2.resolve(1.0, 1.0)?,
            args.alpha()?,
        ));
    }

    let args = Arguments::parse(body)?;
    let [c0, c1, c2] = args.components;
    let alpha = args.alpha()?;

    let color = match name {
        "rgb" | "rgba" => Color::new(
            Space::Srgb,
            c0.resolve(1.0, 255.0)?,
            c1.resolve(1.0, 255.0)?,
            c2.resolve(1.0, 255.0)?,
            alpha,
        ),
        "hsl" | "hsla" | "hsv" | "hwb" => {
            let space = match name {
                "hsv" => Space::Hsv,
                "hwb" => Space::Hwb,
                _ => Space::Hsl,
            };
            Color::new(
                space,
                c0.hue()?,
                c1.resolve(1.0, 100.0)?,
                c2.resolve(1.0, 100.0)?,
                alpha,
            )
        }
        "lab" => Color::new(
            Space::Lab,
            c0.resolve(100.0, 1.0)?,
            c1.resolve(125.0, 1.0)?,
            c2.resolve(125.0, 1.0)?,
            alpha,
        ),
        "lch" => Color::new(
            Space::Lch,
            c0.resolve(100.0, 1.0)?,
            c1.resolve(150.0, 1.0)?,
            c2.hue()?,
            alpha,
        ),
        "oklab" => Color::new(
            Space::Oklab,
            c0.resolve(1.0, 1.0)?,
            c1.resolve(0.4, 1.0)?,
            c2.resolve(0.4, 1.0)?,
            alpha,
        ),
        "oklch" => Color::new(
            Space::Oklch,
            c0.resolve(1.0, 1.0)?,
            c1.resolve(0.4, 1.0)?,
            c2.hue()?,
            alpha,
        ),
        other => return Err(ColorError::Parse(format!("unknown function {other}()"))),
    };

    Ok(color)
}

impl Color {
    /// Parse a color from text.
    pub fn parse(input: &str) -> Result<Color, ColorError> {
        let input = input.trim();

        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex);
        }

        let (name, rest) = input
            .split_once('(')
            .ok_or_else(|| ColorError::Parse(format!("unrecognized color {input:?}")))?;
        let body = rest
            .strip_suffix(')')
            .ok_or_else(|| ColorError::Parse(format!("missing ) in {input:?}")))?;

        parse_function(name.trim().to_ascii_lowercase().as_str(), body)?.checked()
    }

    /// Serialize the color as `#rrggbb`, or `#rrggbbaa` when it is not fully
    /// opaque. Out of gamut components are clamped.
    pub fn to_hex(&self) -> String {
        let rgb = self.to_rgb();
        let byte = |value: Option<Component>| {
            (value.unwrap_or_default().clamp(0.0, 1.0) * 255.0).round() as u8
        };

        let (r, g, b) = (byte(rgb.c0()), byte(rgb.c1()), byte(rgb.c2()));
        let alpha = rgb.alpha().unwrap_or(1.0);
        if alpha < 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}{:02x}", byte(Some(alpha)))
        } else {
            format!("#{r:02x}{g:02x}{b:02x}")
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}
