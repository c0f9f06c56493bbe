use crate::error::{Result, SanitizeError};
use crate::types::FaceMapping;

/// Output of fan triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    /// All 3.
    pub face_vertex_counts: Vec<u32>,
    pub face_vertex_indices: Vec<u32>,
    pub face_mapping: FaceMapping,
    /// Original corner index behind each triangulated corner.
    pub corner_sources: Vec<u32>,
    pub winding_flipped: bool,
}

impl Triangulation {
    pub fn triangle_count(&self) -> usize {
        self.face_vertex_counts.len()
    }
}

/// Check every face degree and return the total corner count.
pub fn validate_face_counts(face_vertex_counts: &[u32]) -> Result<usize> {
    let mut corners = 0usize;
    for (face, &degree) in face_vertex_counts.iter().enumerate() {
        if degree < 3 {
            return Err(SanitizeError::InvalidFaceDegree { face, degree });
        }
        corners += degree as usize;
    }
    Ok(corners)
}

/// Fan order over original corners: for each face `v0..v(n-1)`, triangles
/// `(v0, vi, vi+1)`, or `(vi, v0, vi+1)` when `winding_flip` is set. The
/// flipped order swaps the first two corners, so each triangle keeps its
/// vertex set and reverses its winding.
///
/// Face degrees must already be validated (>= 3). Only correct for convex,
/// planar polygons.
pub fn fan_corner_order(face_vertex_counts: &[u32], winding_flip: bool) -> (Vec<u32>, FaceMapping) {
    let triangles: usize = face_vertex_counts
        .iter()
        .map(|&n| n.saturating_sub(2) as usize)
        .sum();

    let mut corner_sources = Vec::with_capacity(triangles * 3);
    let mut face_mapping = FaceMapping::with_capacity(face_vertex_counts.len());
    let mut offset = 0u32;

    for &degree in face_vertex_counts {
        debug_assert!(degree >= 3, "face degree must be validated before triangulating");

        for i in 1..degree.saturating_sub(1) {
            let (v0, vi, vj) = (offset, offset + i, offset + i + 1);
            if winding_flip {
                corner_sources.extend_from_slice(&[vi, v0, vj]);
            } else {
                corner_sources.extend_from_slice(&[v0, vi, vj]);
            }
        }

        face_mapping.push_face(degree.saturating_sub(2));
        offset += degree;
    }

    (corner_sources, face_mapping)
}

/// Stage 4: fan-triangulate every face, recording face -> triangle provenance.
pub fn triangulate(
    face_vertex_counts: &[u32],
    face_vertex_indices: &[u32],
    point_count: usize,
    winding_flip: bool,
) -> Result<Triangulation> {
    let corners = validate_face_counts(face_vertex_counts)?;
    if corners != face_vertex_indices.len() {
        return Err(SanitizeError::TopologyMismatch {
            expected: corners,
            actual: face_vertex_indices.len(),
        });
    }

    if let Some(&bad) = face_vertex_indices
        .iter()
        .find(|&&i| i as usize >= point_count)
    {
        return Err(SanitizeError::IndexOutOfBounds {
            context: "face vertex indices".into(),
            index: bad as usize,
            len: point_count,
        });
    }

    let (corner_sources, face_mapping) = fan_corner_order(face_vertex_counts, winding_flip);
    let new_indices: Vec<u32> = corner_sources
        .iter()
        .map(|&c| face_vertex_indices[c as usize])
        .collect();

    Ok(Triangulation {
        face_vertex_counts: vec![3; new_indices.len() / 3],
        face_vertex_indices: new_indices,
        face_mapping,
        corner_sources,
        winding_flipped: winding_flip,
    })
}
