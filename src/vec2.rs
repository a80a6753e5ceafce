//! Minimal 2D vector for positions, directions and view planes.
//! Coordinates follow the map convention: +x = east, +y = north.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Rotate counter-clockwise by `rad` radians.
    #[inline]
    pub fn rotated(self, rad: f64) -> Self {
        let (sin, cos) = rad.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// The perpendicular pointing to the right of this vector
    /// (for a heading, the strafe-right direction). No trig involved,
    /// so `v.dot(v.perp())` is exactly zero.
    #[inline]
    pub fn perp(self) -> Self {
        Self { x: self.y, y: -self.x }
    }

    /// Heading in degrees, in [0, 360). 0 = east, 90 = north.
    pub fn angle_deg(self) -> f64 {
        self.y.atan2(self.x).to_degrees().rem_euclid(360.0)
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_is_counter_clockwise() {
        let east = Vec2::new(1.0, 0.0);
        let north = east.rotated(std::f64::consts::FRAC_PI_2);
        assert!((north.x).abs() < 1e-12);
        assert!((north.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perp_is_exactly_orthogonal() {
        let v = Vec2::new(0.3137, -2.71828);
        assert_eq!(v.dot(v.perp()), 0.0);
        // facing north, right hand points east
        let right = Vec2::new(0.0, 1.0).perp();
        assert_eq!(right, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_angle_covers_all_quadrants() {
        let angle = |x, y| Vec2::new(x, y).angle_deg();
        assert_eq!(angle(1.0, 0.0), 0.0);
        assert!((angle(0.0, 1.0) - 90.0).abs() < 1e-9);
        assert!((angle(-1.0, 0.0) - 180.0).abs() < 1e-9);
        assert!((angle(0.0, -1.0) - 270.0).abs() < 1e-9);
        assert!((angle(1.0, -1.0) - 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_ops() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(0.5, -1.0);
        assert_eq!(a + b, Vec2::new(1.5, 1.0));
        assert_eq!(a - b, Vec2::new(0.5, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }
}
