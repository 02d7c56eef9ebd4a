//! 2D Vector
//!
//! Continuous 2D vector used for agent positions and velocities.
//! World units are pixels; the y axis grows downward (row order).

use std::fmt;
use std::ops::{Add, Sub, Neg};
use serde::{Serialize, Deserialize};

/// 2D vector with `f32` components.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component (column direction)
    pub x: f32,
    /// Y component (row direction)
    pub y: f32,
}

impl Vec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Add another vector.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtract another vector.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Scale by a scalar.
    #[inline]
    pub fn scale(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    /// Squared length (avoids sqrt - prefer this for comparisons).
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Rotate by `angle` radians, keeping the original length.
    ///
    /// The rotated vector is rescaled to the pre-rotation length so that
    /// repeated rotations never drift the magnitude.
    pub fn rotate(self, angle: f32) -> Self {
        let speed = self.length();
        if speed == 0.0 {
            return self;
        }

        let (sin, cos) = angle.sin_cos();
        let rotated = Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        };

        let rotated_len = rotated.length();
        if rotated_len == 0.0 {
            return self;
        }
        rotated.scale(speed / rotated_len)
    }

    /// Clamp each component into `[min, max]` of the matching axis.
    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self {
            x: self.x.max(min.x).min(max.x),
            y: self.y.max(min.y).min(max.y),
        }
    }

    /// Negate both components.
    #[inline]
    pub fn negate(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }

    /// Raw bit patterns of both components (for hashing).
    #[inline]
    pub fn to_bits(self) -> (u32, u32) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Vec2::add(self, rhs)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Vec2::sub(self, rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec2({:.3}, {:.3})", self.x, self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_add_sub() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, 2.0);
        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(a - b, Vec2::new(2.0, 2.0));
        assert_eq!(-a, Vec2::new(-3.0, -4.0));
    }

    #[test]
    fn test_vec2_length() {
        // 3-4-5 triangle
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.length_squared(), 25.0);
        assert!((v.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_rotate_preserves_length() {
        let v = Vec2::new(5.0, -5.0);
        for step in -10..=10 {
            let angle = step as f32 * 0.0087;
            let rotated = v.rotate(angle);
            assert!((rotated.length() - v.length()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_vec2_rotate_quarter_turn() {
        let v = Vec2::new(1.0, 0.0);
        let rotated = v.rotate(std::f32::consts::FRAC_PI_2);
        assert!(rotated.x.abs() < 1e-6);
        assert!((rotated.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_rotate_zero_vector() {
        assert_eq!(Vec2::ZERO.rotate(0.5), Vec2::ZERO);
    }

    #[test]
    fn test_vec2_clamp() {
        let min = Vec2::new(0.0, 0.0);
        let max = Vec2::new(775.0, 575.0);

        let inside = Vec2::new(10.0, 20.0);
        assert_eq!(inside.clamp(min, max), inside);

        let outside = Vec2::new(-3.0, 600.0);
        assert_eq!(outside.clamp(min, max), Vec2::new(0.0, 575.0));
    }
}
