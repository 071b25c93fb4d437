use std::fmt;
use std::ops::{Neg, Sub};

/// Angles at or below this value (radians) are treated as "no rotation".
pub const MIN_ROTATION_ANGLE: f64 = 0.01;

/// Default axis of a rendered cylinder before it is aligned with a bond.
pub const VERTICAL: Vector = Vector::new(0.0, 1.0, 0.0);

/// A location in Cartesian space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const ORIGIN: Point = Point::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns this point shifted by `v`.
    pub fn moved(self, v: Vector) -> Point {
        Point::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }

    pub fn translate(&mut self, v: Vector) {
        *self = self.moved(v);
    }

    pub fn midpoint(p1: Point, p2: Point) -> Point {
        Point::new(
            (p1.x + p2.x) / 2.0,
            (p1.y + p2.y) / 2.0,
            (p1.z + p2.z) / 2.0,
        )
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).magnitude()
    }

    /// The vector that moves this point onto the origin.
    pub fn to_origin(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, start: Point) -> Vector {
        Vector::new(self.x - start.x, self.y - start.y, self.z - start.z)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// A direction with length.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn along_x(dx: f64) -> Self {
        Self::new(dx, 0.0, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product of `v1` and `v2`.
    pub fn normal(v1: Vector, v2: Vector) -> Vector {
        Vector::new(
            v1.y * v2.z - v1.z * v2.y,
            v1.z * v2.x - v1.x * v2.z,
            v1.x * v2.y - v1.y * v2.x,
        )
    }

    /// Normal of the plane through three points, `normal(p2 - p1, p3 - p1)`.
    pub fn normal_of(p1: Point, p2: Point, p3: Point) -> Vector {
        Vector::normal(p2 - p1, p3 - p1)
    }

    /// Angle between two vectors in radians.
    ///
    /// Undefined (NaN) when either vector has zero length; callers guard with
    /// a magnitude threshold.
    pub fn angle(self, other: Vector) -> f64 {
        let cos = self.dot(other) / (self.magnitude() * other.magnitude());
        cos.clamp(-1.0, 1.0).acos()
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Axis-angle rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub axis: Vector,
    pub angle: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        axis: Vector::new(0.0, 0.0, 1.0),
        angle: 0.0,
    };

    /// Rotation that turns `from` onto `to`, or `None` when the two are
    /// already aligned within [`MIN_ROTATION_ANGLE`] or `to` has no length.
    pub fn aligning(from: Vector, to: Vector) -> Option<Rotation> {
        if to.magnitude() == 0.0 {
            return None;
        }
        let angle = from.angle(to);
        if angle.is_nan() || angle <= MIN_ROTATION_ANGLE {
            return None;
        }
        let mut axis = Vector::normal(from, to);
        if axis.magnitude() < f64::EPSILON {
            // antiparallel: any axis perpendicular to `from` works
            axis = Vector::normal(from, Vector::new(1.0, 0.0, 0.0));
            if axis.magnitude() < f64::EPSILON {
                axis = Vector::normal(from, Vector::new(0.0, 0.0, 1.0));
            }
        }
        Some(Rotation { axis, angle })
    }

    /// Rotation of a vertical cylinder onto the segment `start`→`end`.
    pub fn for_segment(start: Point, end: Point) -> Option<Rotation> {
        Rotation::aligning(VERTICAL, end - start)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.axis, self.angle)
    }
}

/// Axis-aligned box enclosing a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn around(p: Point) -> Self {
        Self { min: p, max: p }
    }

    pub fn include(&mut self, p: Point) {
        self.min = Point::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn translate(&mut self, v: Vector) {
        self.min.translate(v);
        self.max.translate(v);
    }

    pub fn middle(&self) -> Point {
        Point::midpoint(self.min, self.max)
    }

    /// Extent along the x axis.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn vec_approx_eq(a: Vector, b: Vector) -> bool {
        approx_eq(a.x, b.x, 1e-12) && approx_eq(a.y, b.y, 1e-12) && approx_eq(a.z, b.z, 1e-12)
    }

    #[test]
    fn point_difference_is_vector_from_start_to_end() {
        let v = Point::new(2.0, 3.0, 4.0) - Point::new(1.0, 1.0, 1.0);
        assert_eq!(v, Vector::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn midpoint_is_mean_per_axis() {
        let m = Point::midpoint(Point::new(0.0, 2.0, -4.0), Point::new(1.0, 0.0, 4.0));
        assert_eq!(m, Point::new(0.5, 1.0, 0.0));
    }

    #[test]
    fn moved_leaves_original_untouched() {
        let p = Point::new(1.0, 1.0, 1.0);
        let q = p.moved(Vector::new(1.0, -1.0, 0.5));
        assert_eq!(p, Point::new(1.0, 1.0, 1.0));
        assert_eq!(q, Point::new(2.0, 0.0, 1.5));
    }

    #[test]
    fn normal_of_unit_axes() {
        let x = Vector::new(1.0, 0.0, 0.0);
        let y = Vector::new(0.0, 1.0, 0.0);
        let z = Vector::new(0.0, 0.0, 1.0);
        assert_eq!(Vector::normal(x, y), z);
        assert_eq!(Vector::normal(y, x), -z);
        assert_eq!(Vector::normal(y, z), x);
        assert_eq!(Vector::normal(x, x), Vector::default());
    }

    #[test]
    fn normal_of_three_points_matches_difference_vectors() {
        let p1 = Point::new(1.0, 1.0, 0.0);
        let p2 = Point::new(2.0, 1.0, 0.0);
        let p3 = Point::new(1.0, 2.0, 0.0);
        assert_eq!(Vector::normal_of(p1, p2, p3), Vector::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn magnitude_and_angle() {
        assert!(approx_eq(Vector::new(3.0, 4.0, 0.0).magnitude(), 5.0, 1e-12));
        let a = Vector::new(1.0, 0.0, 0.0);
        assert!(approx_eq(a.angle(Vector::new(0.0, 2.0, 0.0)), FRAC_PI_2, 1e-12));
        assert!(approx_eq(a.angle(Vector::new(-1.0, 0.0, 0.0)), PI, 1e-12));
        assert!(approx_eq(a.angle(Vector::new(5.0, 0.0, 0.0)), 0.0, 1e-12));
    }

    #[test]
    fn aligning_with_vertical_segment_is_none() {
        let r = Rotation::for_segment(Point::ORIGIN, Point::new(0.0, 2.0, 0.0));
        assert!(r.is_none());
    }

    #[test]
    fn aligning_below_threshold_is_none() {
        let tiny = Vector::new(0.005, 1.0, 0.0);
        assert!(Rotation::aligning(VERTICAL, tiny).is_none());
    }

    #[test]
    fn aligning_horizontal_bond_rotates_about_z() {
        let r = Rotation::for_segment(Point::ORIGIN, Point::new(1.0, 0.0, 0.0)).unwrap();
        assert!(vec_approx_eq(r.axis, Vector::new(0.0, 0.0, -1.0)));
        assert!(approx_eq(r.angle, FRAC_PI_2, 1e-12));
    }

    #[test]
    fn aligning_antiparallel_uses_perpendicular_axis() {
        let r = Rotation::aligning(VERTICAL, Vector::new(0.0, -3.0, 0.0)).unwrap();
        assert!(approx_eq(r.angle, PI, 1e-12));
        assert!(approx_eq(r.axis.dot(VERTICAL), 0.0, 1e-12));
        assert!(r.axis.magnitude() > 0.5);
    }

    #[test]
    fn aligning_zero_length_target_is_none() {
        assert!(Rotation::aligning(VERTICAL, Vector::default()).is_none());
    }

    #[test]
    fn bounding_box_grows_and_shifts() {
        let mut bb = BoundingBox::around(Point::new(1.0, 1.0, 1.0));
        bb.include(Point::new(-1.0, 3.0, 0.0));
        assert_eq!(bb.min, Point::new(-1.0, 1.0, 0.0));
        assert_eq!(bb.max, Point::new(1.0, 3.0, 1.0));
        assert_eq!(bb.middle(), Point::new(0.0, 2.0, 0.5));
        assert!(approx_eq(bb.width(), 2.0, 1e-12));

        bb.translate(Vector::new(1.0, 0.0, 0.0));
        assert_eq!(bb.min, Point::new(0.0, 1.0, 0.0));
        assert!(approx_eq(bb.width(), 2.0, 1e-12));
    }

    #[test]
    fn display_formats_space_separated() {
        assert_eq!(Point::new(1.5, 0.0, -2.0).to_string(), "1.5 0 -2");
        assert_eq!(Rotation::IDENTITY.to_string(), "0 0 1 0");
    }
}
