use tracing::warn;

use super::report::SanitizeWarning;
use crate::types::{FaceMapping, FaceSubset};

/// Rewrite face subsets from original face indices to triangle indices.
///
/// Faces outside the original face range are skipped with a warning.
pub fn remap_face_subsets(
    subsets: &mut [FaceSubset],
    face_mapping: &FaceMapping,
    warnings: &mut Vec<SanitizeWarning>,
) {
    let face_count = face_mapping.face_count();

    for subset in subsets.iter_mut() {
        let mut triangles = Vec::with_capacity(subset.faces.len() * 2);
        for &face in &subset.faces {
            if face as usize >= face_count {
                warn!(subset = %subset.name, face, face_count, "Face subset index out of range");
                warnings.push(SanitizeWarning::SubsetFaceOutOfRange {
                    subset: subset.name.clone(),
                    face,
                    face_count,
                });
                continue;
            }
            triangles.extend(face_mapping.triangles(face as usize));
        }
        subset.faces = triangles;
    }
}
