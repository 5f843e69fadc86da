//! Software rasterization of picker backgrounds into RGBA pixel buffers.
//!
//! Every sampler evaluates each pixel independently and writes opaque sRGB
//! bytes, or the color's own alpha when `alpha` is set. A pixel whose color
//! cannot be computed is left transparent black.

use image::{Rgba, RgbaImage};
use log::{debug, warn};

use crate::{
    color::{Color, ColorError, Component, Space},
    geometry::{normalize_angle, Triangle},
};

/// A channel driven along one axis of a sampled grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelAxis<'a> {
    /// The channel key within the sampled space, e.g. `"h"`.
    pub channel: &'a str,
    /// The value at the start of the axis.
    pub min: Component,
    /// The value at the end of the axis.
    pub max: Component,
}

impl<'a> ChannelAxis<'a> {
    /// Create a new axis.
    pub fn new(channel: &'a str, min: Component, max: Component) -> Self {
        Self { channel, min, max }
    }

    /// The channel value at `t` along the axis, 0 being `min`.
    pub fn at(&self, t: Component) -> Component {
        self.min + t * (self.max - self.min)
    }
}

/// The four corner colors of a bilinear gradient.
#[derive(Clone, Debug)]
pub struct Corners {
    /// Top left.
    pub top_left: Color,
    /// Top right.
    pub top_right: Color,
    /// Bottom left.
    pub bottom_left: Color,
    /// Bottom right.
    pub bottom_right: Color,
}

/// Position of index `i` in `0..n` mapped to `[0, 1]`. A single sample sits
/// at 0.
fn normalized(i: u32, n: u32) -> Component {
    if n <= 1 {
        0.0
    } else {
        i as Component / (n - 1) as Component
    }
}

fn to_byte(value: Component) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn to_pixel(rgb: &Color, alpha: bool) -> Rgba<u8> {
    let channel = |value: Option<Component>| to_byte(value.unwrap_or_default());
    let a = if alpha {
        to_byte(rgb.alpha().unwrap_or(1.0))
    } else {
        u8::MAX
    };
    Rgba([channel(rgb.c0()), channel(rgb.c1()), channel(rgb.c2()), a])
}

/// Fill a `width` x `height` buffer by evaluating `f` for every pixel.
fn sample(
    name: &str,
    width: u32,
    height: u32,
    alpha: bool,
    mut f: impl FnMut(u32, u32) -> Result<Color, ColorError>,
) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    let mut skipped = 0_usize;

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        match f(x, y).and_then(|color| color.convert(Space::Srgb)) {
            Ok(rgb) => *pixel = to_pixel(&rgb, alpha),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("{name}: skipped {skipped} of {} pixels", width as usize * height as usize);
    }

    image
}

/// Interpolate four corner colors across the buffer in `space`.
///
/// Each row mixes the top and bottom edges at the pixel's x position, then
/// mixes the two results at its y position.
pub fn sample_bilinear_grid(
    corners: &Corners,
    width: u32,
    height: u32,
    space: Space,
    alpha: bool,
) -> RgbaImage {
    let top = corners.top_left.interpolate(&corners.top_right, space);
    let bottom = corners.bottom_left.interpolate(&corners.bottom_right, space);

    sample("bilinear grid", width, height, alpha, |x, y| {
        let vx = normalized(x, width);
        let vy = normalized(y, height);
        let top = top.at(vx).checked()?;
        let bottom = bottom.at(vx).checked()?;
        top.mix(&bottom, vy, space)
    })
}

/// Evaluate `base` with two channels set from the pixel position.
///
/// Unlike [`sample_bilinear_grid`] every pixel is computed directly, which
/// keeps cyclic channels like hue correct across the whole range.
pub fn sample_channel_grid(
    base: &Color,
    space: Space,
    x_axis: ChannelAxis,
    y_axis: ChannelAxis,
    width: u32,
    height: u32,
    alpha: bool,
) -> RgbaImage {
    sample("channel grid", width, height, alpha, |x, y| {
        base.set_channels(
            space,
            &[
                (x_axis.channel, x_axis.at(normalized(x, width))),
                (y_axis.channel, y_axis.at(normalized(y, height))),
            ],
        )
    })
}

/// Evaluate `base` over a triangle given in normalized `[0, 1]` buffer
/// coordinates.
///
/// Pixels outside the triangle take the value of the closest point in weight
/// space. With two axes, `v0` is `(x.max, y.max)`, `v1` is `(x.min, y.max)`
/// and `v2` is `(x.min, y.min)`. With a third axis, `v0`, `v1` and `v2` drive
/// the maximum of x, y and z respectively, and the remaining weight pulls each
/// channel towards its minimum.
#[allow(clippy::too_many_arguments)]
pub fn sample_triangle_grid(
    base: &Color,
    space: Space,
    x_axis: ChannelAxis,
    y_axis: ChannelAxis,
    z_axis: Option<ChannelAxis>,
    triangle: &Triangle,
    width: u32,
    height: u32,
    alpha: bool,
) -> RgbaImage {
    sample("triangle grid", width, height, alpha, |px, py| {
        let point = (normalized(px, width), normalized(py, height)).into();
        let weights = triangle.barycentric(point).clamped();

        match z_axis {
            Some(z_axis) => base.set_channels(
                space,
                &[
                    (x_axis.channel, x_axis.at(weights.u)),
                    (y_axis.channel, y_axis.at(weights.v)),
                    (z_axis.channel, z_axis.at(weights.w)),
                ],
            ),
            None => base.set_channels(
                space,
                &[
                    (x_axis.channel, x_axis.at(weights.u)),
                    (y_axis.channel, y_axis.at(weights.u + weights.v)),
                ],
            ),
        }
    })
}

/// The angle of pixel `(x, y)` around the buffer center as a fraction of a
/// full turn in `[0, 1)`, clockwise from the top and offset by `start_angle`
/// degrees, together with its distance from the center relative to the
/// inscribed ellipse.
fn polar_position(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    start_angle: Component,
) -> (Component, Component) {
    let cx = (width as Component - 1.0) / 2.0;
    let cy = (height as Component - 1.0) / 2.0;
    let dx = if cx > 0.0 { (x as Component - cx) / cx } else { 0.0 };
    let dy = if cy > 0.0 { (y as Component - cy) / cy } else { 0.0 };

    let angle = normalize_angle(dx.atan2(-dy).to_degrees(), start_angle);
    (angle / 360.0, dx.hypot(dy))
}

/// Evaluate `base` with one channel following the angle around the center
/// and another the distance from it.
///
/// The radius is measured against the ellipse inscribed in the buffer and
/// saturates at its edge. `start_angle` is in degrees.
#[allow(clippy::too_many_arguments)]
pub fn sample_polar_grid(
    base: &Color,
    space: Space,
    angle_axis: ChannelAxis,
    radius_axis: ChannelAxis,
    width: u32,
    height: u32,
    start_angle: Component,
    alpha: bool,
) -> RgbaImage {
    sample("polar grid", width, height, alpha, |x, y| {
        let (turn, radius) = polar_position(x, y, width, height, start_angle);
        base.set_channels(
            space,
            &[
                (angle_axis.channel, angle_axis.at(turn)),
                (radius_axis.channel, radius_axis.at(radius.min(1.0))),
            ],
        )
    })
}

/// Evaluate `base` with one channel following the angle around the center,
/// e.g. a hue ring.
pub fn sample_conic_ring(
    base: &Color,
    space: Space,
    axis: ChannelAxis,
    width: u32,
    height: u32,
    start_angle: Component,
    alpha: bool,
) -> RgbaImage {
    sample("conic ring", width, height, alpha, |x, y| {
        let (turn, _) = polar_position(x, y, width, height, start_angle);
        base.set_channels(space, &[(axis.channel, axis.at(turn))])
    })
}

/// Produce `steps` evenly spaced sRGB colors along the path through `colors`,
/// mixing neighbouring stops in `space`.
///
/// Fewer than two colors are returned unchanged. A step that cannot be mixed
/// is left out.
pub fn interpolate_stops(colors: &[Color], steps: usize, space: Space) -> Vec<Color> {
    if colors.len() < 2 {
        return colors.to_vec();
    }

    let segments = colors.len() - 1;
    let mut result = Vec::with_capacity(steps);
    for i in 0..steps {
        let t = if steps > 1 {
            i as Component / (steps - 1) as Component
        } else {
            0.0
        };
        let segment = t * segments as Component;
        let index = (segment.floor() as usize).min(segments - 1);
        let local = segment - index as Component;

        match colors[index].mix(&colors[index + 1], local, space) {
            Ok(mixed) => result.push(mixed.convert(Space::Srgb).unwrap_or(mixed)),
            Err(err) => warn!("skipping gradient step {i}: {err}"),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_component_eq, geometry::triangle_vertices};

    fn rgb(r: Component, g: Component, b: Component) -> Color {
        Color::new(Space::Srgb, r, g, b, 1.0)
    }

    fn rgba(image: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
        image.get_pixel(x, y).0
    }

    #[test]
    fn buffer_size() {
        let corners = Corners {
            top_left: rgb(1.0, 0.0, 0.0),
            top_right: rgb(0.0, 1.0, 0.0),
            bottom_left: rgb(0.0, 0.0, 1.0),
            bottom_right: rgb(1.0, 1.0, 1.0),
        };
        let image = sample_bilinear_grid(&corners, 7, 5, Space::Srgb, false);
        assert_eq!(image.dimensions(), (7, 5));
        assert_eq!(image.into_raw().len(), 7 * 5 * 4);
    }

    #[test]
    fn bilinear_corners_and_center() {
        let corners = Corners {
            top_left: rgb(1.0, 0.0, 0.0),
            top_right: rgb(0.0, 1.0, 0.0),
            bottom_left: rgb(0.0, 0.0, 1.0),
            bottom_right: rgb(1.0, 1.0, 1.0),
        };
        let image = sample_bilinear_grid(&corners, 3, 3, Space::Srgb, false);

        assert_eq!(rgba(&image, 0, 0), [255, 0, 0, 255]);
        assert_eq!(rgba(&image, 2, 0), [0, 255, 0, 255]);
        assert_eq!(rgba(&image, 0, 2), [0, 0, 255, 255]);
        assert_eq!(rgba(&image, 2, 2), [255, 255, 255, 255]);
        assert_eq!(rgba(&image, 1, 1), [128, 128, 128, 255]);
    }

    #[test]
    fn channel_grid_evaluates_hue_directly() {
        let base = Color::new(Space::Hsl, 0.0, 1.0, 0.5, 1.0);
        let image = sample_channel_grid(
            &base,
            Space::Hsl,
            ChannelAxis::new("h", 0.0, 360.0),
            ChannelAxis::new("l", 0.5, 0.0),
            3,
            2,
            false,
        );

        // Interpolating the red corners would give red everywhere.
        assert_eq!(rgba(&image, 0, 0), [255, 0, 0, 255]);
        assert_eq!(rgba(&image, 1, 0), [0, 255, 255, 255]);
        assert_eq!(rgba(&image, 2, 0), [255, 0, 0, 255]);
        assert_eq!(rgba(&image, 1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn alpha_is_written_on_request() {
        let base = Color::new(Space::Hsl, 0.0, 1.0, 0.5, 0.5);
        let axis = ChannelAxis::new("h", 0.0, 360.0);
        let lightness = ChannelAxis::new("l", 0.5, 0.5);

        let opaque = sample_channel_grid(&base, Space::Hsl, axis, lightness, 2, 2, false);
        assert_eq!(rgba(&opaque, 0, 0)[3], 255);

        let translucent = sample_channel_grid(&base, Space::Hsl, axis, lightness, 2, 2, true);
        assert_eq!(rgba(&translucent, 0, 0)[3], 128);
    }

    #[test]
    fn failed_pixels_stay_blank() {
        let base = rgb(1.0, 0.0, 0.0);
        let image = sample_channel_grid(
            &base,
            Space::Srgb,
            ChannelAxis::new("q", 0.0, 1.0),
            ChannelAxis::new("g", 0.0, 1.0),
            4,
            4,
            false,
        );
        assert!(image.into_raw().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn single_pixel_dimension() {
        let base = Color::new(Space::Hsl, 0.0, 1.0, 0.5, 1.0);
        let image = sample_channel_grid(
            &base,
            Space::Hsl,
            ChannelAxis::new("h", 120.0, 240.0),
            ChannelAxis::new("l", 0.5, 0.5),
            1,
            1,
            false,
        );
        assert_eq!(rgba(&image, 0, 0), [0, 255, 0, 255]);
    }

    fn unit_triangle() -> Triangle {
        let [v0, v1, v2] = triangle_vertices(1.0, 1.0, 0.0);
        Triangle::new(v0, v1, v2)
    }

    #[test]
    fn two_channel_triangle() {
        let base = Color::new(Space::Hsv, 0.0, 1.0, 1.0, 1.0);
        let image = sample_triangle_grid(
            &base,
            Space::Hsv,
            ChannelAxis::new("s", 0.0, 1.0),
            ChannelAxis::new("v", 0.0, 1.0),
            None,
            &unit_triangle(),
            101,
            101,
            false,
        );

        // The top vertex is fully saturated.
        assert_eq!(rgba(&image, 50, 0), [255, 0, 0, 255]);

        // Below the bottom edge, halfway between white and black.
        let [r, g, b, a] = rgba(&image, 50, 100);
        for channel in [r, g, b] {
            assert!((127..=128).contains(&channel), "{channel}");
        }
        assert_eq!(r, g);
        assert_eq!(a, 255);
    }

    #[test]
    fn three_channel_triangle() {
        let base = rgb(0.0, 0.0, 0.0);
        let image = sample_triangle_grid(
            &base,
            Space::Srgb,
            ChannelAxis::new("r", 0.0, 1.0),
            ChannelAxis::new("g", 0.0, 1.0),
            Some(ChannelAxis::new("b", 0.0, 1.0)),
            &unit_triangle(),
            101,
            101,
            false,
        );

        assert_eq!(rgba(&image, 50, 0), [255, 0, 0, 255]);

        // Far outside to the top left the first and last vertex share the
        // weight.
        let [r, g, b, _] = rgba(&image, 0, 0);
        assert!(r > 0 && b > 0);
        assert_eq!(g, 0);
    }

    /// A triangle with its vertices on pixel centers of a 21 x 21 buffer:
    /// v0 at (10, 0), v1 at (20, 20) and v2 at (0, 20).
    fn pixel_triangle() -> Triangle {
        Triangle::new(
            (0.5, 0.0).into(),
            (1.0, 1.0).into(),
            (0.0, 1.0).into(),
        )
    }

    #[test]
    fn two_channel_vertex_roles() {
        let base = Color::new(Space::Hsv, 0.0, 1.0, 1.0, 1.0);
        let image = sample_triangle_grid(
            &base,
            Space::Hsv,
            ChannelAxis::new("s", 0.0, 1.0),
            ChannelAxis::new("v", 0.0, 1.0),
            None,
            &pixel_triangle(),
            21,
            21,
            false,
        );

        // v0 is (s max, v max), v1 is (s min, v max), v2 is (s min, v min).
        assert_eq!(rgba(&image, 10, 0), [255, 0, 0, 255]);
        assert_eq!(rgba(&image, 20, 20), [255, 255, 255, 255]);
        assert_eq!(rgba(&image, 0, 20), [0, 0, 0, 255]);
    }

    #[test]
    fn three_channel_vertex_roles() {
        let base = rgb(0.0, 0.0, 0.0);
        let image = sample_triangle_grid(
            &base,
            Space::Srgb,
            ChannelAxis::new("r", 0.2, 1.0),
            ChannelAxis::new("g", 0.2, 1.0),
            Some(ChannelAxis::new("b", 0.2, 1.0)),
            &pixel_triangle(),
            21,
            21,
            false,
        );

        // Each vertex drives one channel to its maximum, the others rest at
        // their minimum of 0.2.
        assert_eq!(rgba(&image, 10, 0), [255, 51, 51, 255]);
        assert_eq!(rgba(&image, 20, 20), [51, 255, 51, 255]);
        assert_eq!(rgba(&image, 0, 20), [51, 51, 255, 255]);

        // Halfway between v0 and v1.
        assert_eq!(rgba(&image, 15, 10), [153, 153, 51, 255]);
    }

    #[test]
    fn polar_grid() {
        let base = Color::new(Space::Hsl, 0.0, 1.0, 0.5, 1.0);
        let image = sample_polar_grid(
            &base,
            Space::Hsl,
            ChannelAxis::new("h", 0.0, 360.0),
            ChannelAxis::new("s", 0.0, 1.0),
            101,
            101,
            0.0,
            false,
        );

        // Center is unsaturated, the top is red at full saturation.
        assert_eq!(rgba(&image, 50, 50), [128, 128, 128, 255]);
        assert_eq!(rgba(&image, 50, 0), [255, 0, 0, 255]);
        // Corners are past the radius and stay saturated.
        let [r, g, _, _] = rgba(&image, 100, 100);
        assert_eq!((r, g), (0, 255));
    }

    #[test]
    fn polar_grid_follows_the_aspect_ratio() {
        let base = Color::new(Space::Hsl, 0.0, 1.0, 0.5, 1.0);
        let image = sample_polar_grid(
            &base,
            Space::Hsl,
            ChannelAxis::new("h", 0.0, 360.0),
            ChannelAxis::new("s", 0.0, 1.0),
            201,
            51,
            0.0,
            false,
        );

        let assert_near = |x: u32, y: u32, expected: [u8; 3]| {
            let [r, g, b, a] = rgba(&image, x, y);
            for (actual, expected) in [r, g, b].into_iter().zip(expected) {
                assert!(actual.abs_diff(expected) <= 1, "({x}, {y}): {:?}", [r, g, b]);
            }
            assert_eq!(a, 255);
        };

        // Both the top and the right edge lie on the ellipse.
        assert_eq!(rgba(&image, 100, 0), [255, 0, 0, 255]);
        assert_near(200, 25, [128, 255, 0]);

        // Halfway to the right edge is half saturated.
        assert_near(150, 25, [128, 191, 64]);
    }

    #[test]
    fn turns_stay_below_one() {
        let (turn, radius) = polar_position(50, 0, 101, 101, 1.0e-5);
        assert!((0.0..1.0).contains(&turn), "{turn}");
        assert_component_eq!(radius, 1.0);

        for x in 0..101 {
            let (turn, _) = polar_position(x, 0, 101, 101, 0.0);
            assert!((0.0..1.0).contains(&turn), "{x}: {turn}");
        }
    }

    #[test]
    fn conic_ring_start_angle() {
        let base = Color::new(Space::Hsl, 0.0, 1.0, 0.5, 1.0);
        let image = sample_conic_ring(
            &base,
            Space::Hsl,
            ChannelAxis::new("h", 0.0, 360.0),
            101,
            101,
            90.0,
            false,
        );

        // The ring starts at 3 o'clock.
        assert_eq!(rgba(&image, 100, 50), [255, 0, 0, 255]);
        assert_eq!(rgba(&image, 0, 50), [0, 255, 255, 255]);
    }

    #[test]
    fn stops_mix_evenly() {
        let red = rgb(1.0, 0.0, 0.0);
        let blue = rgb(0.0, 0.0, 1.0);
        let stops = interpolate_stops(&[red, blue], 3, Space::Srgb);

        assert_eq!(stops.len(), 3);
        assert_component_eq!(stops[0].components.0, 1.0);
        assert_component_eq!(stops[1].components.0, 0.5);
        assert_component_eq!(stops[1].components.1, 0.0);
        assert_component_eq!(stops[1].components.2, 0.5);
        assert_component_eq!(stops[2].components.2, 1.0);
        assert!(stops.iter().all(|stop| stop.space == Space::Srgb));
    }

    #[test]
    fn stops_are_converted_to_srgb() {
        let red = Color::new(Space::Hsl, 0.0, 1.0, 0.5, 1.0);
        let green = Color::new(Space::Hsl, 120.0, 1.0, 0.5, 1.0);
        let stops = interpolate_stops(&[red, green], 3, Space::Hsl);

        // Halfway around the hue circle is yellow.
        assert_eq!(stops[1].space, Space::Srgb);
        assert_component_eq!(stops[1].components.0, 1.0);
        assert_component_eq!(stops[1].components.1, 1.0);
        assert_component_eq!(stops[1].components.2, 0.0);
    }

    #[test]
    fn too_few_stops_are_returned_unchanged() {
        let red = Color::new(Space::Hsl, 0.0, 1.0, 0.5, 1.0);
        let stops = interpolate_stops(std::slice::from_ref(&red), 5, Space::Srgb);
        assert_eq!(stops, vec![red]);
    }
}
