use std::collections::BTreeMap;
use std::ops::Range;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::attribute::{Attribute, ResolvedAttribute};
use super::bounds::BoundingBox;

/// Winding convention the mesh was authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    RightHanded,
    LeftHanded,
}

/// Named group of faces (e.g. a material subset).
///
/// Holds original face indices on input and triangle indices once sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceSubset {
    pub name: String,
    pub faces: Vec<u32>,
}

/// Provenance of the triangulation: which triangles each original face became.
///
/// Fan triangulation emits a face's triangles contiguously, so the mapping is
/// stored as offsets into the triangle list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceMapping {
    offsets: Vec<u32>,
}

impl Default for FaceMapping {
    fn default() -> Self {
        Self { offsets: vec![0] }
    }
}

impl FaceMapping {
    pub fn with_capacity(faces: usize) -> Self {
        let mut offsets = Vec::with_capacity(faces + 1);
        offsets.push(0);
        Self { offsets }
    }

    /// Record the next original face as having produced `triangles` triangles.
    pub fn push_face(&mut self, triangles: u32) {
        let last = self.offsets.last().copied().unwrap_or(0);
        self.offsets.push(last + triangles);
    }

    /// Number of original faces.
    pub fn face_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0) as usize
    }

    /// Triangle indices produced by original face `face`, in emission order.
    pub fn triangles(&self, face: usize) -> Range<u32> {
        self.offsets[face]..self.offsets[face + 1]
    }

    /// Iterate `(face, triangles)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Range<u32>)> + '_ {
        self.offsets
            .windows(2)
            .enumerate()
            .map(|(face, w)| (face, w[0]..w[1]))
    }

    /// Expanded list-of-lists form.
    pub fn to_lists(&self) -> Vec<Vec<u32>> {
        self.iter().map(|(_, tris)| tris.collect()).collect()
    }
}

/// Typestate markers for [`Mesh`].
pub trait MeshState: private::Sealed {}

mod private {
    pub trait Sealed {}
}

/// Freshly authored mesh: arbitrary polygons, attributes as authored.
#[derive(Debug, Clone, Default)]
pub struct Raw {
    pub(crate) attributes: BTreeMap<String, Attribute>,
}

/// Topology is triangulated; attributes are classified but still laid out
/// against the original faces and corners.
#[derive(Debug, Clone)]
pub struct Triangulated {
    pub(crate) attributes: Vec<ResolvedAttribute>,
    pub(crate) face_mapping: FaceMapping,
    /// Original corner that produced each triangulated corner.
    pub(crate) corner_sources: Vec<u32>,
    pub(crate) winding_flipped: bool,
}

/// Storage layout of a canonical mesh's non-constant attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexLayout {
    /// One value per point, shared through the triangle index buffer.
    Welded,
    /// One value per corner, identity index buffer.
    Unwelded,
}

/// Final, strictly triangulated mesh ready for a renderer mesh builder.
#[derive(Debug, Clone)]
pub struct Canonical {
    pub(crate) attributes: BTreeMap<String, Attribute>,
    pub(crate) layout: VertexLayout,
}

impl private::Sealed for Raw {}
impl private::Sealed for Triangulated {}
impl private::Sealed for Canonical {}
impl MeshState for Raw {}
impl MeshState for Triangulated {}
impl MeshState for Canonical {}

/// Polygon mesh moving through the sanitize stages.
///
/// `Mesh<Raw>` is consumed by sanitizing, so a mesh cannot be sanitized twice.
#[derive(Debug, Clone)]
pub struct Mesh<S: MeshState = Raw> {
    pub(crate) points: Vec<Vec3>,
    pub(crate) face_vertex_counts: Vec<u32>,
    pub(crate) face_vertex_indices: Vec<u32>,
    pub(crate) extent: Option<BoundingBox>,
    pub(crate) orientation: Orientation,
    pub(crate) face_subsets: Vec<FaceSubset>,
    pub(crate) state: S,
}

impl<S: MeshState> Mesh<S> {
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn face_vertex_counts(&self) -> &[u32] {
        &self.face_vertex_counts
    }

    pub fn face_vertex_indices(&self) -> &[u32] {
        &self.face_vertex_indices
    }

    pub fn face_count(&self) -> usize {
        self.face_vertex_counts.len()
    }

    pub fn corner_count(&self) -> usize {
        self.face_vertex_indices.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn extent(&self) -> Option<&BoundingBox> {
        self.extent.as_ref()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn face_subsets(&self) -> &[FaceSubset] {
        &self.face_subsets
    }
}

impl Mesh<Raw> {
    pub fn new(points: Vec<Vec3>, face_vertex_counts: Vec<u32>, face_vertex_indices: Vec<u32>) -> Self {
        Self {
            points,
            face_vertex_counts,
            face_vertex_indices,
            extent: None,
            orientation: Orientation::default(),
            face_subsets: Vec::new(),
            state: Raw::default(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.state.attributes.insert(name.into(), attribute);
        self
    }

    pub fn with_extent(mut self, extent: BoundingBox) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_face_subset(mut self, name: impl Into<String>, faces: Vec<u32>) -> Self {
        self.face_subsets.push(FaceSubset {
            name: name.into(),
            faces,
        });
        self
    }

    pub fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.state.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.state.attributes.get(name)
    }
}

impl Mesh<Triangulated> {
    pub fn face_mapping(&self) -> &FaceMapping {
        &self.state.face_mapping
    }

    pub fn winding_flipped(&self) -> bool {
        self.state.winding_flipped
    }

    pub fn resolved_attributes(&self) -> &[ResolvedAttribute] {
        &self.state.attributes
    }
}

impl Mesh<Canonical> {
    pub fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.state.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.state.attributes.get(name)
    }

    pub fn layout(&self) -> VertexLayout {
        self.state.layout
    }

    pub fn is_unwelded(&self) -> bool {
        self.state.layout == VertexLayout::Unwelded
    }

    pub fn triangle_count(&self) -> usize {
        self.face_vertex_indices.len() / 3
    }

    /// Positions as a flat `[x, y, z, x, y, z, ...]` slice.
    pub fn positions_f32(&self) -> &[f32] {
        bytemuck::cast_slice(&self.points)
    }
}
