//! JSON interchange for mesh sample batches.
//!
//! A debugging and test surface for the CLI: upstream readers normally build
//! [`Mesh<Raw>`] values directly.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SanitizeError};
use crate::sanitize::{BatchOutcome, SanitizeReport, SanitizedMesh};
use crate::types::{Attribute, BoundingBox, FaceSubset, Mesh, Orientation, Raw, VertexLayout};

/// Input document: a list of independent mesh samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleBatch {
    pub samples: Vec<MeshSample>,
}

/// One authored mesh sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSample {
    pub name: String,
    pub points: Vec<Vec3>,
    pub face_vertex_counts: Vec<u32>,
    pub face_vertex_indices: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<BoundingBox>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
    #[serde(default)]
    pub face_subsets: Vec<FaceSubset>,
}

impl MeshSample {
    /// Build the raw mesh, keeping the sample name for batch reporting.
    pub fn into_mesh(self) -> (String, Mesh<Raw>) {
        let mut mesh = Mesh::new(self.points, self.face_vertex_counts, self.face_vertex_indices)
            .with_orientation(self.orientation);
        if let Some(extent) = self.extent {
            mesh = mesh.with_extent(extent);
        }
        for (name, attribute) in self.attributes {
            mesh = mesh.with_attribute(name, attribute);
        }
        for subset in self.face_subsets {
            mesh = mesh.with_face_subset(subset.name, subset.faces);
        }
        (self.name, mesh)
    }
}

/// A sanitized sample as written to the output document.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalSample {
    pub points: Vec<Vec3>,
    pub face_vertex_counts: Vec<u32>,
    pub face_vertex_indices: Vec<u32>,
    pub layout: VertexLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<BoundingBox>,
    pub attributes: BTreeMap<String, Attribute>,
    pub face_subsets: Vec<FaceSubset>,
    pub face_mapping: Vec<Vec<u32>>,
    pub report: SanitizeReport,
}

impl From<SanitizedMesh> for CanonicalSample {
    fn from(s: SanitizedMesh) -> Self {
        let mesh = s.mesh;
        CanonicalSample {
            points: mesh.points().to_vec(),
            face_vertex_counts: mesh.face_vertex_counts().to_vec(),
            face_vertex_indices: mesh.face_vertex_indices().to_vec(),
            layout: mesh.layout(),
            extent: mesh.extent().copied(),
            attributes: mesh.attributes().clone(),
            face_subsets: mesh.face_subsets().to_vec(),
            face_mapping: s.face_mapping.to_lists(),
            report: s.report,
        }
    }
}

/// Per-sample entry of the output document: the mesh or the error.
#[derive(Debug, Clone, Serialize)]
pub struct SampleResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<CanonicalSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<BatchOutcome> for SampleResult {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome.result {
            Ok(sanitized) => SampleResult {
                name: outcome.name,
                mesh: Some(sanitized.into()),
                error: None,
            },
            Err(e) => SampleResult {
                name: outcome.name,
                mesh: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Output document.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    pub summary: BatchSummary,
    pub samples: Vec<SampleResult>,
}

impl BatchOutput {
    pub fn from_outcomes(outcomes: Vec<BatchOutcome>) -> Self {
        let samples: Vec<SampleResult> = outcomes.into_iter().map(SampleResult::from).collect();
        let failed = samples.iter().filter(|s| s.error.is_some()).count();
        BatchOutput {
            summary: BatchSummary {
                succeeded: samples.len() - failed,
                failed,
            },
            samples,
        }
    }
}

/// Read and parse a sample batch.
pub fn load_batch(path: &Path) -> Result<SampleBatch> {
    if !path.exists() {
        return Err(SanitizeError::Input(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let data = fs::read_to_string(path)?;
    let batch: SampleBatch = serde_json::from_str(&data)
        .map_err(|e| SanitizeError::Input(format!("Failed to parse sample batch: {e}")))?;

    debug!(samples = batch.samples.len(), path = %path.display(), "Loaded sample batch");
    Ok(batch)
}

/// Write the output document as pretty-printed JSON.
pub fn write_output(output: &BatchOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            SanitizeError::Output(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }

    let json = serde_json::to_string_pretty(output)?;
    fs::write(path, json)
        .map_err(|e| SanitizeError::Output(format!("Failed to write {}: {e}", path.display())))?;
    Ok(())
}
