//! Helpers for stepping slider and area values.

use crate::color::Component;

/// The number of decimals `step` is written with, e.g. 2 for `0.01` and 0 for
/// `1`.
pub fn decimal_count(step: Component) -> usize {
    let formatted = format!("{}", step);
    formatted
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

/// Round `value` to `decimals` decimals, halves away from zero.
pub fn round_to(value: Component, decimals: usize) -> Component {
    let rounder = (10.0 as Component).powi(decimals as i32);
    (value * rounder).round() / rounder
}

/// Snap `value` to the nearest multiple of `step` counted from `min`, then
/// clamp it into `[min, max]`.
pub fn snap_to_step(value: Component, min: Component, max: Component, step: Component) -> Component {
    if step <= 0.0 {
        return value.clamp(min, max);
    }

    let snapped = ((value - min) / step).round() * step + min;
    round_to(snapped, decimal_count(step)).clamp(min, max)
}

/// Return a function mapping the `input` range linearly onto `output`.
///
/// A degenerate range on either side maps everything to the start of
/// `output`.
pub fn linear_scale(
    input: (Component, Component),
    output: (Component, Component),
) -> impl Fn(Component) -> Component {
    move |value| {
        if input.0 == input.1 || output.0 == output.1 {
            return output.0;
        }
        let ratio = (output.1 - output.0) / (input.1 - input.0);
        output.0 + ratio * (value - input.0)
    }
}

/// The position of `value` within `[min, max]` as a percentage in
/// `[0, 100]`.
pub fn value_to_percentage(value: Component, min: Component, max: Component) -> Component {
    if min == max {
        return 0.0;
    }
    (100.0 / (max - min) * (value - min)).clamp(0.0, 100.0)
}

/// Index of the thumb in `thumbs` closest to `point`.
///
/// Distances are measured after normalizing each axis by its range so that
/// axes with different units weigh the same. Returns `None` when there are no
/// thumbs; ties go to the first thumb.
pub fn closest_thumb_index(
    thumbs: &[(Component, Component)],
    point: (Component, Component),
    x_range: (Component, Component),
    y_range: (Component, Component),
) -> Option<usize> {
    let span = |(min, max): (Component, Component)| {
        let span = max - min;
        if span == 0.0 {
            1.0
        } else {
            span
        }
    };
    let range_x = span(x_range);
    let range_y = span(y_range);

    let mut closest = None;
    let mut closest_distance = Component::INFINITY;
    for (index, &(x, y)) in thumbs.iter().enumerate() {
        let dx = (x - point.0) / range_x;
        let dy = (y - point.1) / range_y;
        let distance = dx.hypot(dy);
        if distance < closest_distance {
            closest = Some(index);
            closest_distance = distance;
        }
    }

    closest
}
