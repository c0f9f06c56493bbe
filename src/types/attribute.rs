use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SanitizeError};

/// Granularity at which an attribute's values are authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// One value for the whole mesh.
    Constant,
    /// One value per face.
    Uniform,
    /// One value per point.
    Vertex,
    /// One value per face corner.
    FaceVarying,
}

impl Interpolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpolation::Constant => "constant",
            Interpolation::Uniform => "uniform",
            Interpolation::Vertex => "vertex",
            Interpolation::FaceVarying => "face_varying",
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic role; decides how the basis converter treats the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeRole {
    #[default]
    Generic,
    Normal,
    Tangent,
    TexCoord,
    Color,
}

/// Attribute payload, tagged by component count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AttributeValues {
    Float(Vec<f32>),
    Vec2(Vec<Vec2>),
    Vec3(Vec<Vec3>),
    Vec4(Vec<Vec4>),
}

impl AttributeValues {
    /// Number of stored values (not elements; see [`Attribute::element_size`]).
    pub fn len(&self) -> usize {
        match self {
            AttributeValues::Float(v) => v.len(),
            AttributeValues::Vec2(v) => v.len(),
            AttributeValues::Vec3(v) => v.len(),
            AttributeValues::Vec4(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValues::Float(_) => "float",
            AttributeValues::Vec2(_) => "float2",
            AttributeValues::Vec3(_) => "float3",
            AttributeValues::Vec4(_) => "float4",
        }
    }

    /// Gather whole elements: output element `k` is input element `sources[k]`.
    ///
    /// Every source must be in range; callers validate beforehand or use
    /// [`AttributeValues::try_gather`].
    pub fn gather(&self, element_size: usize, sources: &[u32]) -> AttributeValues {
        match self {
            AttributeValues::Float(v) => AttributeValues::Float(gather_elements(v, element_size, sources)),
            AttributeValues::Vec2(v) => AttributeValues::Vec2(gather_elements(v, element_size, sources)),
            AttributeValues::Vec3(v) => AttributeValues::Vec3(gather_elements(v, element_size, sources)),
            AttributeValues::Vec4(v) => AttributeValues::Vec4(gather_elements(v, element_size, sources)),
        }
    }

    /// Bounds-checked [`AttributeValues::gather`].
    pub fn try_gather(
        &self,
        element_size: usize,
        sources: &[u32],
        context: &str,
    ) -> Result<AttributeValues> {
        let element_count = self.len() / element_size.max(1);
        if let Some(&bad) = sources.iter().find(|&&s| s as usize >= element_count) {
            return Err(SanitizeError::IndexOutOfBounds {
                context: context.to_string(),
                index: bad as usize,
                len: element_count,
            });
        }
        Ok(self.gather(element_size, sources))
    }

    /// Whether elements `a` and `b` hold identical values.
    pub fn elements_equal(&self, element_size: usize, a: usize, b: usize) -> bool {
        match self {
            AttributeValues::Float(v) => element(v, element_size, a) == element(v, element_size, b),
            AttributeValues::Vec2(v) => element(v, element_size, a) == element(v, element_size, b),
            AttributeValues::Vec3(v) => element(v, element_size, a) == element(v, element_size, b),
            AttributeValues::Vec4(v) => element(v, element_size, a) == element(v, element_size, b),
        }
    }
}

impl From<Vec<f32>> for AttributeValues {
    fn from(v: Vec<f32>) -> Self {
        AttributeValues::Float(v)
    }
}

impl From<Vec<Vec2>> for AttributeValues {
    fn from(v: Vec<Vec2>) -> Self {
        AttributeValues::Vec2(v)
    }
}

impl From<Vec<Vec3>> for AttributeValues {
    fn from(v: Vec<Vec3>) -> Self {
        AttributeValues::Vec3(v)
    }
}

impl From<Vec<Vec4>> for AttributeValues {
    fn from(v: Vec<Vec4>) -> Self {
        AttributeValues::Vec4(v)
    }
}

fn element<T>(values: &[T], element_size: usize, index: usize) -> &[T] {
    &values[index * element_size..(index + 1) * element_size]
}

fn gather_elements<T: Copy>(values: &[T], element_size: usize, sources: &[u32]) -> Vec<T> {
    if element_size == 1 {
        return sources.iter().map(|&s| values[s as usize]).collect();
    }

    let mut out = Vec::with_capacity(sources.len() * element_size);
    for &s in sources {
        out.extend_from_slice(element(values, element_size, s as usize));
    }
    out
}

/// A named per-mesh attribute (primvar) as authored by the upstream reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub values: AttributeValues,
    /// Secondary indirection into `values`, independent of the mesh indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
    /// Authored interpolation; `None` means it is inferred from the element count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<Interpolation>,
    /// Consecutive values forming one element (e.g. several UV sets per corner).
    #[serde(default = "default_element_size")]
    pub element_size: u32,
    #[serde(default)]
    pub role: AttributeRole,
}

fn default_element_size() -> u32 {
    1
}

impl Attribute {
    pub fn new(values: impl Into<AttributeValues>) -> Self {
        Self {
            values: values.into(),
            indices: None,
            interpolation: None,
            element_size: 1,
            role: AttributeRole::Generic,
        }
    }

    /// Authored normals (`role = Normal`).
    pub fn normals(values: Vec<Vec3>) -> Self {
        Self::new(values).with_role(AttributeRole::Normal)
    }

    /// Authored tangents; `w` of a `Vec4` tangent is the bitangent sign.
    pub fn tangents(values: impl Into<AttributeValues>) -> Self {
        Self::new(values).with_role(AttributeRole::Tangent)
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = Some(interpolation);
        self
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_element_size(mut self, element_size: u32) -> Self {
        self.element_size = element_size;
        self
    }

    pub fn with_role(mut self, role: AttributeRole) -> Self {
        self.role = role;
        self
    }

    /// Element count, or `None` if the value count is not a multiple of
    /// `element_size`.
    pub fn element_count(&self) -> Option<usize> {
        let size = self.element_size as usize;
        if size == 0 || self.values.len() % size != 0 {
            return None;
        }
        Some(self.values.len() / size)
    }
}

/// An attribute after index resolution and domain classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAttribute {
    pub name: String,
    pub values: AttributeValues,
    pub element_size: usize,
    pub role: AttributeRole,
    /// Domain the values are currently laid out in.
    pub domain: Interpolation,
    /// Interpolation as authored, kept for the material-binding unweld rule.
    pub authored: Option<Interpolation>,
}

impl ResolvedAttribute {
    pub fn element_count(&self) -> usize {
        self.values.len() / self.element_size
    }

    /// Finalized public attribute in the given storage domain.
    pub(crate) fn into_attribute(self, interpolation: Interpolation) -> (String, Attribute) {
        (
            self.name,
            Attribute {
                values: self.values,
                indices: None,
                interpolation: Some(interpolation),
                element_size: self.element_size as u32,
                role: self.role,
            },
        )
    }
}
