use std::collections::BTreeMap;

use tracing::debug;

use super::domain::{CornerLayout, to_corners};
use crate::pool::{ScratchBuffers, ScratchPool};
use crate::types::{
    Canonical, FaceMapping, Interpolation, Mesh, ResolvedAttribute, Triangulated, VertexLayout,
};

const UNSET: u32 = u32::MAX;

/// Stage 6: does any attribute need more than one value per point?
///
/// Uniform and face-varying data always do. With `binding_required`, an
/// attribute authored face-varying also does, even when its values were
/// welded down to one per point.
pub fn should_unweld(attributes: &[ResolvedAttribute], binding_required: bool) -> bool {
    attributes.iter().any(|attr| match attr.domain {
        Interpolation::Uniform | Interpolation::FaceVarying => true,
        Interpolation::Vertex => {
            binding_required && attr.authored == Some(Interpolation::FaceVarying)
        }
        Interpolation::Constant => false,
    })
}

/// Store a face-varying attribute per point when every corner sharing a
/// point carries the same element.
///
/// Returns whether the attribute was welded. Points no corner references
/// take element 0.
pub fn weld_face_varying(
    attr: &mut ResolvedAttribute,
    layout: &CornerLayout<'_>,
    point_count: usize,
    scratch: &ScratchPool<u32>,
) -> bool {
    if attr.domain != Interpolation::FaceVarying {
        return false;
    }

    let mut point_sources = scratch.take(point_count);
    point_sources.resize(point_count, UNSET);

    for (&point, &corner) in layout.face_vertex_indices.iter().zip(layout.corner_sources) {
        let existing = point_sources[point as usize];
        if existing == UNSET {
            point_sources[point as usize] = corner;
        } else if existing != corner
            && !attr
                .values
                .elements_equal(attr.element_size, existing as usize, corner as usize)
        {
            scratch.give(point_sources);
            return false;
        }
    }

    for source in point_sources.iter_mut().filter(|s| **s == UNSET) {
        *source = 0;
    }

    attr.values = attr.values.gather(attr.element_size, &point_sources);
    attr.domain = Interpolation::Vertex;
    scratch.give(point_sources);
    true
}

/// Stages 5 and 7: lay every attribute out for the renderer.
///
/// When `unweld` is set every non-constant attribute becomes one element per
/// triangulated corner, positions are duplicated last and the index buffer
/// becomes the identity. Otherwise vertex attributes stay point-indexed.
pub fn finalize(
    mesh: Mesh<Triangulated>,
    unweld: bool,
    scratch: &ScratchBuffers,
) -> (Mesh<Canonical>, FaceMapping) {
    let Mesh {
        points,
        face_vertex_counts,
        face_vertex_indices,
        extent,
        orientation,
        face_subsets,
        state,
    } = mesh;
    let Triangulated {
        attributes: resolved,
        face_mapping,
        corner_sources,
        ..
    } = state;

    if !unweld {
        let attributes: BTreeMap<_, _> = resolved
            .into_iter()
            .map(|attr| {
                debug_assert!(
                    matches!(attr.domain, Interpolation::Constant | Interpolation::Vertex),
                    "welded layout with {} attribute '{}'",
                    attr.domain,
                    attr.name
                );
                let domain = attr.domain;
                attr.into_attribute(domain)
            })
            .collect();

        let mesh = Mesh {
            points,
            face_vertex_counts,
            face_vertex_indices,
            extent,
            orientation,
            face_subsets,
            state: Canonical {
                attributes,
                layout: VertexLayout::Welded,
            },
        };
        return (mesh, face_mapping);
    }

    let layout = CornerLayout {
        face_vertex_indices: &face_vertex_indices,
        corner_sources: &corner_sources,
        face_mapping: &face_mapping,
    };

    let mut attributes = BTreeMap::new();
    for attr in resolved {
        let (name, attribute) = match attr.domain {
            Interpolation::Constant => attr.into_attribute(Interpolation::Constant),
            domain => {
                debug!(attribute = %attr.name, %domain, "Flattening attribute per corner");
                let values = to_corners(&attr.values, attr.element_size, domain, &layout, &scratch.indices);
                ResolvedAttribute { values, ..attr }.into_attribute(Interpolation::Vertex)
            }
        };
        attributes.insert(name, attribute);
    }

    // Positions last: everything above was classified against the original points.
    let points = face_vertex_indices.iter().map(|&i| points[i as usize]).collect();
    let identity = (0..face_vertex_indices.len() as u32).collect();

    let mesh = Mesh {
        points,
        face_vertex_counts,
        face_vertex_indices: identity,
        extent,
        orientation,
        face_subsets,
        state: Canonical {
            attributes,
            layout: VertexLayout::Unwelded,
        },
    };
    (mesh, face_mapping)
}
