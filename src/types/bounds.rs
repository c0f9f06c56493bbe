use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in 3-D (the authored or computed mesh extent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Zero-size box at the origin, used for meshes without points.
    pub const ZERO: BoundingBox = BoundingBox {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Box spanning two arbitrary corners; each axis is re-sorted.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point, or [`BoundingBox::ZERO`] if empty.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::ZERO;
        };

        points.iter().skip(1).fold(
            Self {
                min: *first,
                max: *first,
            },
            |bb, p| Self {
                min: bb.min.min(*p),
                max: bb.max.max(*p),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_basic() {
        let bb = BoundingBox::from_points(&[
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(-1.0, -2.0, -3.0),
        ]);
        assert_eq!(bb.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bb.max, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn from_points_empty() {
        assert_eq!(BoundingBox::from_points(&[]), BoundingBox::ZERO);
    }

    #[test]
    fn from_corners_sorts_axes() {
        let bb = BoundingBox::from_corners(Vec3::new(1.0, -1.0, 0.0), Vec3::new(-1.0, 1.0, 2.0));
        assert_eq!(bb.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(bb.max, Vec3::new(1.0, 1.0, 2.0));
    }
}
