use glam::{Mat3, Vec3, Vec4};
use tracing::debug;

use crate::config::{Axis, Handedness, SanitizeConfig};
use crate::types::{AttributeRole, AttributeValues, BoundingBox, Orientation, ResolvedAttribute};

/// Linear change of basis applied to positions, normals and tangents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisChange {
    matrix: Mat3,
    normal_matrix: Mat3,
}

impl BasisChange {
    pub const IDENTITY: BasisChange = BasisChange {
        matrix: Mat3::IDENTITY,
        normal_matrix: Mat3::IDENTITY,
    };

    /// Negate a single axis.
    pub fn reflection(axis: Axis) -> Self {
        let scale = match axis {
            Axis::X => Vec3::new(-1.0, 1.0, 1.0),
            Axis::Y => Vec3::new(1.0, -1.0, 1.0),
            Axis::Z => Vec3::new(1.0, 1.0, -1.0),
        };
        Self::from_matrix(Mat3::from_diagonal(scale))
    }

    /// Arbitrary invertible linear map.
    pub fn from_matrix(matrix: Mat3) -> Self {
        Self {
            matrix,
            normal_matrix: matrix.inverse().transpose(),
        }
    }

    pub fn matrix(&self) -> Mat3 {
        self.matrix
    }

    /// Odd number of effective sign flips (negative determinant).
    pub fn changes_handedness(&self) -> bool {
        self.matrix.determinant() < 0.0
    }

    /// Diagonal of the map, reported as the object scale in negative-scale mode.
    pub fn scale(&self) -> Vec3 {
        Vec3::new(self.matrix.x_axis.x, self.matrix.y_axis.y, self.matrix.z_axis.z)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.matrix * p
    }

    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        self.normal_matrix * n
    }

    /// Transform a tangent's direction; `w` (bitangent sign) passes through.
    pub fn transform_tangent(&self, t: Vec4) -> Vec4 {
        (self.matrix * t.truncate()).extend(t.w)
    }

    /// Map all eight corners and re-fit an axis-aligned box around them.
    pub fn transform_bounds(&self, bb: &BoundingBox) -> BoundingBox {
        let corners: Vec<Vec3> = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { bb.min.x } else { bb.max.x },
                    if i & 2 == 0 { bb.min.y } else { bb.max.y },
                    if i & 4 == 0 { bb.min.z } else { bb.max.z },
                )
            })
            .map(|c| self.transform_point(c))
            .collect();
        BoundingBox::from_points(&corners)
    }
}

/// Winding must flip when the conversion and the authored orientation
/// disagree about handedness.
pub fn winding_flip(changes_handedness: bool, orientation: Orientation) -> bool {
    changes_handedness ^ (orientation == Orientation::LeftHanded)
}

/// What the basis stage decided for the rest of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisOutcome {
    pub winding_flip: bool,
    pub object_scale: Option<Vec3>,
}

/// Stage 3: apply the configured handedness conversion in place.
pub fn convert_basis(
    config: &SanitizeConfig,
    orientation: Orientation,
    points: &mut [Vec3],
    attributes: &mut [ResolvedAttribute],
    extent: Option<&mut BoundingBox>,
) -> BasisOutcome {
    let change = BasisChange::reflection(config.reflection_axis);

    match config.handedness {
        Handedness::None => BasisOutcome {
            winding_flip: winding_flip(false, orientation),
            object_scale: None,
        },
        Handedness::NegativeScaleOnly => BasisOutcome {
            winding_flip: winding_flip(false, orientation),
            object_scale: Some(change.scale()),
        },
        Handedness::FullReflection => {
            apply_basis_change(&change, points, attributes, extent);
            BasisOutcome {
                winding_flip: winding_flip(change.changes_handedness(), orientation),
                object_scale: None,
            }
        }
    }
}

/// Transform positions, normal/tangent attributes and the extent.
pub fn apply_basis_change(
    change: &BasisChange,
    points: &mut [Vec3],
    attributes: &mut [ResolvedAttribute],
    extent: Option<&mut BoundingBox>,
) {
    for p in points.iter_mut() {
        *p = change.transform_point(*p);
    }

    for attr in attributes.iter_mut() {
        match (attr.role, &mut attr.values) {
            (AttributeRole::Normal, AttributeValues::Vec3(normals)) => {
                for n in normals.iter_mut() {
                    *n = change.transform_normal(*n);
                }
            }
            (AttributeRole::Normal, AttributeValues::Vec4(normals)) => {
                for n in normals.iter_mut() {
                    *n = change.transform_normal(n.truncate()).extend(n.w);
                }
            }
            (AttributeRole::Tangent, AttributeValues::Vec3(tangents)) => {
                for t in tangents.iter_mut() {
                    *t = change.transform_point(*t);
                }
            }
            (AttributeRole::Tangent, AttributeValues::Vec4(tangents)) => {
                for t in tangents.iter_mut() {
                    *t = change.transform_tangent(*t);
                }
            }
            (AttributeRole::Normal | AttributeRole::Tangent, values) => {
                debug!(
                    attribute = %attr.name,
                    value_type = values.type_name(),
                    "Skipping basis change for non-vector attribute"
                );
            }
            _ => {}
        }
    }

    if let Some(bb) = extent {
        *bb = change.transform_bounds(bb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interpolation;

    fn attribute(name: &str, role: AttributeRole, values: AttributeValues) -> ResolvedAttribute {
        ResolvedAttribute {
            name: name.into(),
            values,
            element_size: 1,
            role,
            domain: Interpolation::Vertex,
            authored: None,
        }
    }

    #[test]
    fn single_axis_reflection_changes_handedness() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert!(BasisChange::reflection(axis).changes_handedness());
        }
        assert!(!BasisChange::IDENTITY.changes_handedness());
    }

    #[test]
    fn even_reflections_keep_handedness() {
        let x = BasisChange::reflection(Axis::X).matrix();
        let y = BasisChange::reflection(Axis::Y).matrix();
        assert!(!BasisChange::from_matrix(x * y).changes_handedness());
        assert!(BasisChange::from_matrix(Mat3::from_diagonal(Vec3::splat(-1.0))).changes_handedness());
    }

    #[test]
    fn winding_flip_truth_table() {
        assert!(!winding_flip(false, Orientation::RightHanded));
        assert!(winding_flip(false, Orientation::LeftHanded));
        assert!(winding_flip(true, Orientation::RightHanded));
        assert!(!winding_flip(true, Orientation::LeftHanded));
    }

    #[test]
    fn reflection_transforms_vectors() {
        let change = BasisChange::reflection(Axis::X);
        let mut points = vec![Vec3::new(1.0, 2.0, 3.0)];
        let mut attrs = vec![
            attribute("normals", AttributeRole::Normal, AttributeValues::Vec3(vec![Vec3::X])),
            attribute(
                "tangents",
                AttributeRole::Tangent,
                AttributeValues::Vec4(vec![Vec4::new(1.0, 1.0, 0.0, -1.0)]),
            ),
            attribute("st", AttributeRole::TexCoord, AttributeValues::Vec3(vec![Vec3::X])),
        ];
        let mut extent = BoundingBox::from_corners(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));

        apply_basis_change(&change, &mut points, &mut attrs, Some(&mut extent));

        assert_eq!(points[0], Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(attrs[0].values, AttributeValues::Vec3(vec![Vec3::NEG_X]));
        assert_eq!(
            attrs[1].values,
            AttributeValues::Vec4(vec![Vec4::new(-1.0, 1.0, 0.0, -1.0)])
        );
        // Non-geometric roles are untouched.
        assert_eq!(attrs[2].values, AttributeValues::Vec3(vec![Vec3::X]));
        assert_eq!(extent.min, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(extent.max, Vec3::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn reflection_transforms_vec4_normals_and_vec3_tangents() {
        let change = BasisChange::reflection(Axis::Y);
        let mut points = vec![Vec3::ZERO];
        let mut attrs = vec![
            attribute(
                "normals",
                AttributeRole::Normal,
                AttributeValues::Vec4(vec![Vec4::new(0.0, 1.0, 0.0, 0.5)]),
            ),
            attribute(
                "tangents",
                AttributeRole::Tangent,
                AttributeValues::Vec3(vec![Vec3::new(1.0, 1.0, 0.0)]),
            ),
            attribute("weight", AttributeRole::Normal, AttributeValues::Float(vec![2.0])),
        ];

        apply_basis_change(&change, &mut points, &mut attrs, None);

        // xyz reflected, w carried through.
        assert_eq!(
            attrs[0].values,
            AttributeValues::Vec4(vec![Vec4::new(0.0, -1.0, 0.0, 0.5)])
        );
        assert_eq!(
            attrs[1].values,
            AttributeValues::Vec3(vec![Vec3::new(1.0, -1.0, 0.0)])
        );
        // Scalar values cannot be reflected and are left alone.
        assert_eq!(attrs[2].values, AttributeValues::Float(vec![2.0]));
    }

    #[test]
    fn reflection_twice_restores_positions() {
        let change = BasisChange::reflection(Axis::Z);
        let original = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, -6.0)];
        let mut points = original.clone();
        apply_basis_change(&change, &mut points, &mut [], None);
        assert_ne!(points, original);
        apply_basis_change(&change, &mut points, &mut [], None);
        assert_eq!(points, original);
    }

    #[test]
    fn convert_basis_modes() {
        let base = vec![Vec3::new(1.0, 0.0, 0.0)];

        let mut points = base.clone();
        let config = SanitizeConfig::default();
        let out = convert_basis(&config, Orientation::RightHanded, &mut points, &mut [], None);
        assert!(!out.winding_flip);
        assert_eq!(out.object_scale, None);
        assert_eq!(points, base);

        let mut points = base.clone();
        let config = SanitizeConfig {
            handedness: Handedness::NegativeScaleOnly,
            ..Default::default()
        };
        let out = convert_basis(&config, Orientation::RightHanded, &mut points, &mut [], None);
        assert!(!out.winding_flip);
        assert_eq!(out.object_scale, Some(Vec3::new(-1.0, 1.0, 1.0)));
        assert_eq!(points, base);

        let mut points = base.clone();
        let config = SanitizeConfig {
            handedness: Handedness::FullReflection,
            ..Default::default()
        };
        let out = convert_basis(&config, Orientation::RightHanded, &mut points, &mut [], None);
        assert!(out.winding_flip);
        assert_eq!(points, vec![Vec3::new(-1.0, 0.0, 0.0)]);

        let mut points = base.clone();
        let out = convert_basis(&config, Orientation::LeftHanded, &mut points, &mut [], None);
        assert!(!out.winding_flip);
    }
}
