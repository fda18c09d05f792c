pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;

pub const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Point at `radius` along `angle`, where `angle` is already in SVG path space (zero at
/// 3 o'clock, clockwise because y grows downwards).
pub fn polar(radius: f64, angle: f64) -> Point {
    point(radius * angle.cos(), radius * angle.sin())
}

/// Converts a diagram angle (zero at 12 o'clock) into path space.
pub fn path_angle(diagram_angle: f64) -> f64 {
    diagram_angle - HALF_PI
}
