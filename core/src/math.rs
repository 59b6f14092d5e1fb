//! Math type aliases and helper functions.
//!
//! Positions are always `f32`, matching the flat buffers handed to the
//! rendering layer.

pub use nalgebra;

/// 2D vector (f32), used for texture coordinates.
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32), used for positions and offsets.
pub type Vec3 = nalgebra::Vector3<f32>;

/// A 3D position carrying an extra scalar `value`.
///
/// The scalar travels with a mesh instance into the merged buffers as its
/// per-vertex field value, where the rendering layer maps it to a color
/// (typically a hue).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldPoint {
    /// Position in world space.
    pub position: Vec3,
    /// Scalar field value.
    pub value: f32,
}

impl Default for FieldPoint {
    fn default() -> Self {
        Self::from_position(Vec3::zeros(), 0.0)
    }
}

impl FieldPoint {
    /// Create a field point from coordinates and a value.
    pub fn new(x: f32, y: f32, z: f32, value: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            value,
        }
    }

    /// Create a field point from a position vector and a value.
    pub fn from_position(position: Vec3, value: f32) -> Self {
        Self { position, value }
    }
}

/// Midpoint of two 3D points.
#[inline]
pub fn midpoint3(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}

/// Midpoint of two 2D points.
#[inline]
pub fn midpoint2(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Read the `index`-th 3-component vector from a flat buffer.
#[inline]
pub fn vec3_at(buffer: &[f32], index: usize) -> Option<Vec3> {
    let s = buffer.get(index * 3..index * 3 + 3)?;
    Some(Vec3::new(s[0], s[1], s[2]))
}

/// Read the `index`-th 2-component vector from a flat buffer.
#[inline]
pub fn vec2_at(buffer: &[f32], index: usize) -> Option<Vec2> {
    let s = buffer.get(index * 2..index * 2 + 2)?;
    Some(Vec2::new(s[0], s[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_is_average() {
        let m = midpoint3(Vec3::new(0.0, 2.0, -4.0), Vec3::new(2.0, 4.0, 4.0));
        assert_eq!(m, Vec3::new(1.0, 3.0, 0.0));
        let m = midpoint2(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert_eq!(m, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn flat_buffer_access() {
        let buf = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(vec3_at(&buf, 1), Some(Vec3::new(4.0, 5.0, 6.0)));
        assert_eq!(vec3_at(&buf, 2), None);
        assert_eq!(vec2_at(&buf, 2), Some(Vec2::new(5.0, 6.0)));
        assert_eq!(vec2_at(&buf, 3), None);
    }

    #[test]
    fn field_point_constructors() {
        let p = FieldPoint::new(1.0, 2.0, 3.0, 0.5);
        assert_eq!(p, FieldPoint::from_position(Vec3::new(1.0, 2.0, 3.0), 0.5));
        assert_eq!(FieldPoint::default().value, 0.0);
    }
}
