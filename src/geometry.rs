//! Geometry used to place thumbs on circular and triangular pickers.
//!
//! Angles are in degrees, with 0 pointing up (12 o'clock) and increasing
//! clockwise, matching screen coordinates where y grows downwards.

use crate::color::Component;

/// A point in picker (pixel) space.
pub type Point = euclid::default::Point2D<Component>;

type Vector = euclid::default::Vector2D<Component>;

/// A position relative to a center point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarCoord {
    /// Degrees clockwise from the top, in `[0, 360)`.
    pub angle: Component,
    /// Distance from the center.
    pub radius: Component,
}

/// Barycentric weights of a point relative to a [`Triangle`]. The weights
/// always sum to 1; the point is inside the triangle when none is negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Barycentric {
    /// Weight of `v0`.
    pub u: Component,
    /// Weight of `v1`.
    pub v: Component,
    /// Weight of `v2`.
    pub w: Component,
}

impl Barycentric {
    /// Clamp negative weights to zero and renormalize so the weights sum to
    /// 1 again. A point far outside the triangle snaps to the closest vertex
    /// or edge in weight space.
    pub fn clamped(self) -> Barycentric {
        let u = self.u.max(0.0);
        let v = self.v.max(0.0);
        let w = self.w.max(0.0);
        let sum = u + v + w;
        if sum > 0.0 {
            Barycentric {
                u: u / sum,
                v: v / sum,
                w: w / sum,
            }
        } else {
            Barycentric { u, v, w }
        }
    }
}

/// Convert a polar position around `(cx, cy)` to a point.
pub fn polar_to_cartesian(angle: Component, radius: Component, cx: Component, cy: Component) -> Point {
    let rad = (angle - 90.0).to_radians();
    Point::new(cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// Convert the point `(x, y)` to a polar position around `(cx, cy)`.
pub fn cartesian_to_polar(x: Component, y: Component, cx: Component, cy: Component) -> PolarCoord {
    let dx = x - cx;
    let dy = y - cy;
    PolarCoord {
        angle: normalize_angle(dx.atan2(-dy).to_degrees(), 0.0),
        radius: dx.hypot(dy),
    }
}

/// Keep `(x, y)` within the circle of radius `r` around `(cx, cy)`. Points
/// outside are projected onto the circle.
pub fn clamp_to_circle(x: Component, y: Component, cx: Component, cy: Component, r: Component) -> Point {
    let offset = Vector::new(x - cx, y - cy);
    let distance = offset.length();
    if distance <= r {
        return Point::new(x, y);
    }
    Point::new(cx, cy) + offset * (r / distance)
}

/// Wrap `angle - start_angle` into `[0, 360)`.
pub fn normalize_angle(angle: Component, start_angle: Component) -> Component {
    ((angle - start_angle) % 360.0 + 360.0) % 360.0
}

/// A triangle given by its three vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// The first vertex.
    pub v0: Point,
    /// The second vertex.
    pub v1: Point,
    /// The third vertex.
    pub v2: Point,
}

impl Triangle {
    /// Create a triangle from three vertices.
    pub fn new(v0: Point, v1: Point, v2: Point) -> Self {
        Self { v0, v1, v2 }
    }

    /// The equilateral triangle inscribed in a `width` x `height` box. See
    /// [`triangle_vertices`].
    pub fn inscribed(width: Component, height: Component, rotation: Component) -> Self {
        let [v0, v1, v2] = triangle_vertices(width, height, rotation);
        Self { v0, v1, v2 }
    }

    /// The vertices as an array.
    pub fn vertices(&self) -> [Point; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Barycentric weights of `point`.
    pub fn barycentric(&self, point: Point) -> Barycentric {
        barycentric_coords(point.x, point.y, self.v0, self.v1, self.v2)
    }

    /// The point with the given weights.
    pub fn at(&self, weights: Barycentric) -> Point {
        barycentric_to_cartesian(weights.u, weights.v, weights.w, self.v0, self.v1, self.v2)
    }

    /// Returns true if `point` lies inside or on the triangle.
    pub fn contains(&self, point: Point) -> bool {
        point_in_triangle(point.x, point.y, self.v0, self.v1, self.v2)
    }

    /// The triangle shrunk towards its centroid. See [`inset_triangle`].
    pub fn inset(&self, inset: Component) -> Triangle {
        let [v0, v1, v2] = inset_triangle(self.v0, self.v1, self.v2, inset);
        Triangle { v0, v1, v2 }
    }

    /// The closest point to `point` inside the triangle.
    pub fn clamp(&self, point: Point) -> Point {
        clamp_to_triangle(point.x, point.y, self.v0, self.v1, self.v2)
    }
}

/// Vertices of the equilateral triangle centered in a `width` x `height` box
/// with circumradius `min(width, height) / 2`. The vertices sit at 0, 120 and
/// 240 degrees plus `rotation`.
pub fn triangle_vertices(width: Component, height: Component, rotation: Component) -> [Point; 3] {
    let cx = width / 2.0;
    let cy = height / 2.0;
    let r = width.min(height) / 2.0;
    [0.0, 120.0, 240.0].map(|angle| polar_to_cartesian(angle + rotation, r, cx, cy))
}

/// Barycentric weights of `(x, y)` relative to `(v0, v1, v2)`.
///
/// A degenerate triangle yields non-finite weights.
pub fn barycentric_coords(x: Component, y: Component, v0: Point, v1: Point, v2: Point) -> Barycentric {
    let d = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
    let u = ((v1.y - v2.y) * (x - v2.x) + (v2.x - v1.x) * (y - v2.y)) / d;
    let v = ((v2.y - v0.y) * (x - v2.x) + (v0.x - v2.x) * (y - v2.y)) / d;
    Barycentric { u, v, w: 1.0 - u - v }
}

/// The point with weights `(u, v, w)` relative to `(v0, v1, v2)`.
pub fn barycentric_to_cartesian(
    u: Component,
    v: Component,
    w: Component,
    v0: Point,
    v1: Point,
    v2: Point,
) -> Point {
    Point::new(
        u * v0.x + v * v1.x + w * v2.x,
        u * v0.y + v * v1.y + w * v2.y,
    )
}

/// Returns true if `(x, y)` lies inside or on the edges of the triangle.
pub fn point_in_triangle(x: Component, y: Component, v0: Point, v1: Point, v2: Point) -> bool {
    let Barycentric { u, v, w } = barycentric_coords(x, y, v0, v1, v2);
    u >= 0.0 && v >= 0.0 && w >= 0.0
}

/// The closest point to `p` on the segment from `a` to `b`.
fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let length_squared = ab.square_length();
    if length_squared == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / length_squared).clamp(0.0, 1.0);
    a + ab * t
}

/// Shrink the triangle towards its centroid so that its edges move inwards
/// by `inset`.
///
/// The scale factor is `(r - inset) / r` where `r` is the inradius. An inset
/// that would collapse the triangle is limited to 90% of the inradius. A
/// degenerate triangle has no inradius and is returned unchanged.
pub fn inset_triangle(v0: Point, v1: Point, v2: Point, inset: Component) -> [Point; 3] {
    let centroid = Point::new((v0.x + v1.x + v2.x) / 3.0, (v0.y + v1.y + v2.y) / 3.0);

    // Heron's formula.
    let a = (v1 - v2).length();
    let b = (v0 - v2).length();
    let c = (v0 - v1).length();
    let s = (a + b + c) / 2.0;
    let area = (s * (s - a) * (s - b) * (s - c)).sqrt();
    let inradius = area / s;
    if inradius.is_nan() || inradius <= 0.0 {
        return [v0, v1, v2];
    }

    let inset = if inset >= inradius { inradius * 0.9 } else { inset };
    let scale = (inradius - inset) / inradius;

    [v0, v1, v2].map(|vertex| centroid + (vertex - centroid) * scale)
}

/// Keep `(x, y)` within the triangle. Points outside move to the closest
/// point on the nearest edge.
pub fn clamp_to_triangle(x: Component, y: Component, v0: Point, v1: Point, v2: Point) -> Point {
    let point = Point::new(x, y);
    if point_in_triangle(x, y, v0, v1, v2) {
        return point;
    }

    let mut best = v0;
    let mut best_distance = Component::INFINITY;
    for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
        let candidate = closest_point_on_segment(point, a, b);
        let distance = (candidate - point).square_length();
        if distance < best_distance {
            best_distance = distance;
            best = candidate;
        }
    }

    best
}
