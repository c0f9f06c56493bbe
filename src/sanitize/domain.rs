use crate::pool::ScratchPool;
use crate::types::{AttributeValues, FaceMapping, Interpolation};

/// Triangulated topology as seen by the domain converter.
#[derive(Debug, Clone, Copy)]
pub struct CornerLayout<'a> {
    /// Triangulated corner -> point.
    pub face_vertex_indices: &'a [u32],
    /// Triangulated corner -> original corner (same fan order and winding).
    pub corner_sources: &'a [u32],
    pub face_mapping: &'a FaceMapping,
}

impl CornerLayout<'_> {
    pub fn corner_count(&self) -> usize {
        self.face_vertex_indices.len()
    }
}

/// Stage 5: re-express values of `domain` as one element per triangulated
/// corner.
///
/// Constant values are returned as-is; consumers special-case them. Element
/// counts must already match `domain` (see the classifier).
pub fn to_corners(
    values: &AttributeValues,
    element_size: usize,
    domain: Interpolation,
    layout: &CornerLayout<'_>,
    scratch: &ScratchPool<u32>,
) -> AttributeValues {
    match domain {
        Interpolation::Constant => values.clone(),
        Interpolation::Uniform => {
            let mut faces = scratch.take(layout.corner_count());
            for (face, triangles) in layout.face_mapping.iter() {
                for _ in triangles {
                    faces.extend_from_slice(&[face as u32; 3]);
                }
            }
            let out = values.gather(element_size, &faces);
            scratch.give(faces);
            out
        }
        Interpolation::Vertex => values.gather(element_size, layout.face_vertex_indices),
        // Indexed by original corner, not by point: follow the fan order.
        Interpolation::FaceVarying => values.gather(element_size, layout.corner_sources),
    }
}
