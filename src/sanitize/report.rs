use glam::Vec3;
use serde::Serialize;

use crate::types::Interpolation;

/// Non-fatal problem found while sanitizing; the mesh still completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SanitizeWarning {
    /// Element count matches no interpolation domain; attribute dropped.
    Unclassified { attribute: String, elements: usize },
    /// Fewer elements than points and not constant/uniform; attribute dropped.
    FidelityLoss {
        attribute: String,
        elements: usize,
        points: usize,
    },
    /// Authored interpolation disagrees with the element count.
    InterpolationMismatch {
        attribute: String,
        authored: Interpolation,
        inferred: Interpolation,
    },
    /// Face subset references a face the mesh does not have.
    SubsetFaceOutOfRange {
        subset: String,
        face: u32,
        face_count: usize,
    },
}

impl std::fmt::Display for SanitizeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SanitizeWarning::Unclassified {
                attribute,
                elements,
            } => write!(
                f,
                "attribute '{attribute}' has {elements} elements matching no interpolation; dropped"
            ),
            SanitizeWarning::FidelityLoss {
                attribute,
                elements,
                points,
            } => write!(
                f,
                "attribute '{attribute}' has {elements} elements for {points} points; dropped"
            ),
            SanitizeWarning::InterpolationMismatch {
                attribute,
                authored,
                inferred,
            } => write!(
                f,
                "attribute '{attribute}' authored {authored} but sized as {inferred}"
            ),
            SanitizeWarning::SubsetFaceOutOfRange {
                subset,
                face,
                face_count,
            } => write!(
                f,
                "subset '{subset}' references face {face} of {face_count}; skipped"
            ),
        }
    }
}

/// Summary of what sanitizing did to one mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SanitizeReport {
    pub warnings: Vec<SanitizeWarning>,
    pub unwelded: bool,
    pub winding_flipped: bool,
    /// Object-level scale the caller must apply (negative-scale handedness).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_scale: Option<Vec3>,
    pub computed_normals: bool,
    /// Face-varying attributes stored per point because they never varied
    /// across corners sharing a point.
    pub welded_attributes: Vec<String>,
    pub original_face_count: usize,
    pub triangle_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display_strings() {
        let w = SanitizeWarning::Unclassified {
            attribute: "st".into(),
            elements: 7,
        };
        assert_eq!(
            w.to_string(),
            "attribute 'st' has 7 elements matching no interpolation; dropped"
        );

        let w = SanitizeWarning::FidelityLoss {
            attribute: "weights".into(),
            elements: 2,
            points: 8,
        };
        assert_eq!(
            w.to_string(),
            "attribute 'weights' has 2 elements for 8 points; dropped"
        );

        let w = SanitizeWarning::InterpolationMismatch {
            attribute: "n".into(),
            authored: Interpolation::FaceVarying,
            inferred: Interpolation::Vertex,
        };
        assert_eq!(
            w.to_string(),
            "attribute 'n' authored face_varying but sized as vertex"
        );

        let w = SanitizeWarning::SubsetFaceOutOfRange {
            subset: "mat".into(),
            face: 9,
            face_count: 2,
        };
        assert_eq!(w.to_string(), "subset 'mat' references face 9 of 2; skipped");
    }

    #[test]
    fn warning_serializes_with_kind_tag() {
        let w = SanitizeWarning::Unclassified {
            attribute: "st".into(),
            elements: 7,
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"], "unclassified");
        assert_eq!(json["attribute"], "st");
        assert_eq!(json["elements"], 7);
    }
}
