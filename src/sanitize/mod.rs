//! The sanitize pipeline: polygon mesh with mixed-scope attributes in,
//! strictly triangulated mesh with uniformly laid-out attributes out.
//!
//! Stages, in order:
//! 1. resolve secondary attribute indices ([`indexed`])
//! 2. classify each attribute's interpolation domain ([`classify`])
//! 3. change of basis and winding decision ([`basis`])
//! 4. fan triangulation with face provenance ([`triangulate`])
//! 5. per-corner domain conversion ([`domain`])
//! 6. the mesh-global unweld decision ([`unweld`])
//! 7. flattening to one vertex per corner ([`unweld::finalize`])

pub mod basis;
pub mod classify;
pub mod domain;
pub mod indexed;
pub mod normals;
pub mod report;
pub mod subsets;
pub mod triangulate;
pub mod unweld;

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::SanitizeConfig;
use crate::error::{Result, SanitizeError};
use crate::pool::ScratchBuffers;
use crate::types::{
    AttributeRole, AttributeValues, BoundingBox, Canonical, FaceMapping, Interpolation, Mesh, Raw,
    ResolvedAttribute, Triangulated,
};

pub use basis::{BasisChange, BasisOutcome};
pub use classify::{Domain, TopologyCounts, classify};
pub use domain::{CornerLayout, to_corners};
pub use indexed::resolve_indexed;
pub use report::{SanitizeReport, SanitizeWarning};
pub use triangulate::{Triangulation, triangulate};
pub use unweld::should_unweld;

/// Attribute name given to generated normals.
pub const NORMALS: &str = "normals";

/// A sanitized mesh plus the provenance needed to remap face-indexed data.
#[derive(Debug, Clone)]
pub struct SanitizedMesh {
    pub mesh: Mesh<Canonical>,
    pub face_mapping: FaceMapping,
    pub report: SanitizeReport,
}

/// Result for one named sample of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<SanitizedMesh>,
}

/// Classification-only summary of a raw mesh (dry runs).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub faces: usize,
    pub points: usize,
    pub corners: usize,
    pub triangles: usize,
    pub domains: BTreeMap<String, Domain>,
    /// A uniform or face-varying attribute is present.
    pub forces_unweld: bool,
}

/// Sanitizes mesh samples with one configuration.
///
/// Holds the scratch pools shared by every mesh it processes; safe to use
/// from many threads at once.
#[derive(Debug, Default)]
pub struct Sanitizer {
    config: SanitizeConfig,
    scratch: ScratchBuffers,
}

impl Sanitizer {
    pub fn new(config: SanitizeConfig) -> Self {
        Self {
            config,
            scratch: ScratchBuffers::default(),
        }
    }

    pub fn config(&self) -> &SanitizeConfig {
        &self.config
    }

    pub fn scratch(&self) -> &ScratchBuffers {
        &self.scratch
    }

    /// Run every stage on one mesh.
    ///
    /// Consumes the raw mesh, so a sample can only be sanitized once.
    pub fn sanitize(&self, mesh: Mesh<Raw>) -> Result<SanitizedMesh> {
        if mesh.points.is_empty() {
            return Err(SanitizeError::MissingPositions);
        }

        let counts = TopologyCounts {
            faces: mesh.face_count(),
            points: mesh.point_count(),
            corners: mesh.corner_count(),
        };
        debug!(
            faces = counts.faces,
            points = counts.points,
            corners = counts.corners,
            attributes = mesh.state.attributes.len(),
            "Sanitizing mesh"
        );

        let Mesh {
            mut points,
            face_vertex_counts,
            face_vertex_indices,
            mut extent,
            orientation,
            face_subsets,
            state: Raw { attributes },
        } = mesh;

        let mut report = SanitizeReport {
            original_face_count: counts.faces,
            ..Default::default()
        };

        let mut resolved = classify::resolve_attributes(attributes, counts, &mut report.warnings)?;

        let basis = basis::convert_basis(
            &self.config,
            orientation,
            &mut points,
            &mut resolved,
            extent.as_mut(),
        );

        let tri = triangulate(
            &face_vertex_counts,
            &face_vertex_indices,
            points.len(),
            basis.winding_flip,
        )?;
        debug!(
            triangles = tri.triangle_count(),
            winding_flipped = tri.winding_flipped,
            "Triangulated"
        );

        let mut mesh = Mesh {
            points,
            face_vertex_counts: tri.face_vertex_counts,
            face_vertex_indices: tri.face_vertex_indices,
            extent,
            orientation,
            face_subsets,
            state: Triangulated {
                attributes: resolved,
                face_mapping: tri.face_mapping,
                corner_sources: tri.corner_sources,
                winding_flipped: tri.winding_flipped,
            },
        };

        report.computed_normals = self.add_missing_normals(&mut mesh);
        report.welded_attributes = self.weld_face_varying(&mut mesh);

        let unweld = should_unweld(
            &mesh.state.attributes,
            self.config.bind_materials_requiring_face_varying,
        );
        report.winding_flipped = mesh.state.winding_flipped;

        subsets::remap_face_subsets(
            &mut mesh.face_subsets,
            &mesh.state.face_mapping,
            &mut report.warnings,
        );

        let (mut mesh, face_mapping) = unweld::finalize(mesh, unweld, &self.scratch);
        if mesh.extent.is_none() {
            mesh.extent = Some(BoundingBox::from_points(&mesh.points));
        }

        report.unwelded = unweld;
        report.object_scale = basis.object_scale;
        report.triangle_count = mesh.triangle_count();

        debug!(
            triangles = report.triangle_count,
            unwelded = report.unwelded,
            warnings = report.warnings.len(),
            "Sanitized mesh"
        );

        Ok(SanitizedMesh {
            mesh,
            face_mapping,
            report,
        })
    }

    /// Sanitize independent samples in parallel; one failure does not stop
    /// the others. Output order matches input order.
    pub fn sanitize_batch(&self, samples: Vec<(String, Mesh<Raw>)>) -> Vec<BatchOutcome> {
        samples
            .into_par_iter()
            .map(|(name, mesh)| {
                let result = self.sanitize(mesh);
                if let Err(e) = &result {
                    error!(mesh = %name, %e, "Sanitize failed");
                }
                BatchOutcome { name, result }
            })
            .collect()
    }

    fn add_missing_normals(&self, mesh: &mut Mesh<Triangulated>) -> bool {
        if !self.config.compute_missing_normals
            || mesh
                .state
                .attributes
                .iter()
                .any(|a| a.role == AttributeRole::Normal || a.name == NORMALS)
        {
            return false;
        }

        let normals = normals::compute_vertex_normals(
            &mesh.points,
            &mesh.face_vertex_indices,
            &self.scratch.vectors,
        );
        debug!(points = normals.len(), "Computed missing normals");

        mesh.state.attributes.push(ResolvedAttribute {
            name: NORMALS.to_string(),
            values: AttributeValues::Vec3(normals),
            element_size: 1,
            role: AttributeRole::Normal,
            domain: Interpolation::Vertex,
            authored: None,
        });
        true
    }

    /// Demote face-varying attributes that never vary at a point, unless
    /// material binding needs face-varying fidelity or a uniform attribute
    /// forces unwelding anyway.
    fn weld_face_varying(&self, mesh: &mut Mesh<Triangulated>) -> Vec<String> {
        let attributes = &mut mesh.state.attributes;
        if self.config.bind_materials_requiring_face_varying
            || attributes
                .iter()
                .any(|a| a.domain == Interpolation::Uniform)
        {
            return Vec::new();
        }

        let layout = CornerLayout {
            face_vertex_indices: &mesh.face_vertex_indices,
            corner_sources: &mesh.state.corner_sources,
            face_mapping: &mesh.state.face_mapping,
        };

        let mut welded = Vec::new();
        for attr in attributes.iter_mut() {
            if unweld::weld_face_varying(attr, &layout, mesh.points.len(), &self.scratch.indices) {
                debug!(attribute = %attr.name, "Welded face-varying attribute");
                welded.push(attr.name.clone());
            }
        }
        welded
    }
}

/// Sanitize one mesh with a throwaway [`Sanitizer`].
pub fn sanitize(mesh: Mesh<Raw>, config: &SanitizeConfig) -> Result<SanitizedMesh> {
    Sanitizer::new(config.clone()).sanitize(mesh)
}

/// Classify a raw mesh's attributes without sanitizing it.
pub fn inspect(mesh: &Mesh<Raw>) -> MeshStats {
    let counts = TopologyCounts {
        faces: mesh.face_count(),
        points: mesh.point_count(),
        corners: mesh.corner_count(),
    };

    let mut ignored = Vec::new();
    let domains: BTreeMap<String, Domain> = mesh
        .attributes()
        .iter()
        .map(|(name, attr)| {
            let resolved_len = match attr.indices.as_deref() {
                None | Some([]) => attr.values.len(),
                Some(indices) => indices.len() * attr.element_size as usize,
            };
            let size = attr.element_size as usize;
            let domain = if size == 0 || resolved_len % size != 0 {
                Domain::Unknown
            } else {
                classify::classify_attribute(name, attr.interpolation, resolved_len / size, counts, &mut ignored)
            };
            (name.clone(), domain)
        })
        .collect();

    let forces_unweld = domains
        .values()
        .any(|d| matches!(d, Domain::Uniform | Domain::FaceVarying));

    MeshStats {
        faces: counts.faces,
        points: counts.points,
        corners: counts.corners,
        triangles: mesh
            .face_vertex_counts()
            .iter()
            .map(|&n| n.saturating_sub(2) as usize)
            .sum(),
        domains,
        forces_unweld,
    }
}
