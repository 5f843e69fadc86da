/// Check for equality between two components allowing for 16-bit rounding
/// errors, or a small relative error for large magnitudes.
#[macro_export]
macro_rules! assert_component_eq {
    ($actual:expr, $expected:expr) => {{
        approx::assert_relative_eq!(
            $actual,
            $expected,
            epsilon = 1.0 / i16::MAX as $crate::Component,
            max_relative = 1.0e-4
        );
    }};
}
