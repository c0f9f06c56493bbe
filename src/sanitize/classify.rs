use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::indexed::resolve_indexed;
use super::report::SanitizeWarning;
use crate::error::Result;
use crate::types::{Attribute, AttributeRole, Interpolation, ResolvedAttribute};

/// Classification result; `Unknown` means the element count fits no domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Constant,
    Uniform,
    Vertex,
    FaceVarying,
    Unknown,
}

impl Domain {
    pub fn interpolation(self) -> Option<Interpolation> {
        match self {
            Domain::Constant => Some(Interpolation::Constant),
            Domain::Uniform => Some(Interpolation::Uniform),
            Domain::Vertex => Some(Interpolation::Vertex),
            Domain::FaceVarying => Some(Interpolation::FaceVarying),
            Domain::Unknown => None,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.interpolation() {
            Some(interpolation) => write!(f, "{interpolation}"),
            None => f.write_str("unknown"),
        }
    }
}

impl From<Interpolation> for Domain {
    fn from(interpolation: Interpolation) -> Self {
        match interpolation {
            Interpolation::Constant => Domain::Constant,
            Interpolation::Uniform => Domain::Uniform,
            Interpolation::Vertex => Domain::Vertex,
            Interpolation::FaceVarying => Domain::FaceVarying,
        }
    }
}

/// Element counts of the pre-triangulation topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyCounts {
    pub faces: usize,
    pub points: usize,
    pub corners: usize,
}

impl TopologyCounts {
    /// Element count an attribute of the given interpolation must have.
    pub fn expected_len(&self, interpolation: Interpolation) -> usize {
        match interpolation {
            Interpolation::Constant => 1,
            Interpolation::Uniform => self.faces,
            Interpolation::Vertex => self.points,
            Interpolation::FaceVarying => self.corners,
        }
    }
}

/// Infer an attribute's domain from its element count alone.
///
/// Ties resolve in the order constant, uniform, vertex, face-varying.
/// `corner_count` is the pre-triangulation corner count.
pub fn classify(length: usize, face_count: usize, point_count: usize, corner_count: usize) -> Domain {
    if length == 0 {
        Domain::Unknown
    } else if length == 1 {
        Domain::Constant
    } else if length == face_count {
        Domain::Uniform
    } else if length == point_count {
        Domain::Vertex
    } else if length == corner_count {
        Domain::FaceVarying
    } else {
        Domain::Unknown
    }
}

/// Classify one attribute, preferring its authored interpolation when the
/// element count agrees with it.
pub fn classify_attribute(
    name: &str,
    authored: Option<Interpolation>,
    elements: usize,
    counts: TopologyCounts,
    warnings: &mut Vec<SanitizeWarning>,
) -> Domain {
    if elements == 0 {
        return Domain::Unknown;
    }

    let inferred = classify(elements, counts.faces, counts.points, counts.corners);
    let Some(authored) = authored else {
        return inferred;
    };

    if counts.expected_len(authored) == elements {
        return authored.into();
    }

    if let Some(inferred) = inferred.interpolation() {
        warn!(
            attribute = name,
            %authored,
            %inferred,
            "Authored interpolation does not match element count"
        );
        warnings.push(SanitizeWarning::InterpolationMismatch {
            attribute: name.to_string(),
            authored,
            inferred,
        });
    }
    inferred
}

/// Stages 1 and 2: resolve secondary indices, then classify every attribute.
///
/// Attributes that cannot be classified are dropped with a warning. An
/// out-of-range secondary index aborts the mesh.
pub fn resolve_attributes(
    attributes: BTreeMap<String, Attribute>,
    counts: TopologyCounts,
    warnings: &mut Vec<SanitizeWarning>,
) -> Result<Vec<ResolvedAttribute>> {
    let mut resolved = Vec::with_capacity(attributes.len());

    for (name, attr) in attributes {
        let element_size = attr.element_size as usize;
        if element_size == 0 {
            drop_unclassified(&name, attr.values.len(), counts, warnings);
            continue;
        }

        let context = format!("attribute '{name}'");
        let values = resolve_indexed(attr.values, attr.indices.as_deref(), element_size, &context)?;

        if values.len() % element_size != 0 {
            drop_unclassified(&name, values.len(), counts, warnings);
            continue;
        }
        let elements = values.len() / element_size;

        let domain = classify_attribute(&name, attr.interpolation, elements, counts, warnings);
        let Some(domain) = domain.interpolation() else {
            drop_unclassified(&name, elements, counts, warnings);
            continue;
        };

        debug!(
            attribute = %name,
            value_type = values.type_name(),
            elements,
            %domain,
            "Classified attribute"
        );

        let role = effective_role(&name, attr.role);
        resolved.push(ResolvedAttribute {
            name,
            values,
            element_size,
            role,
            domain,
            authored: attr.interpolation,
        });
    }

    Ok(resolved)
}

/// Well-known names imply a role when none was authored.
fn effective_role(name: &str, role: AttributeRole) -> AttributeRole {
    match (role, name) {
        (AttributeRole::Generic, "normals") => AttributeRole::Normal,
        (AttributeRole::Generic, "tangents") => AttributeRole::Tangent,
        _ => role,
    }
}

fn drop_unclassified(
    name: &str,
    elements: usize,
    counts: TopologyCounts,
    warnings: &mut Vec<SanitizeWarning>,
) {
    let warning = if elements > 1 && elements < counts.points {
        SanitizeWarning::FidelityLoss {
            attribute: name.to_string(),
            elements,
            points: counts.points,
        }
    } else {
        SanitizeWarning::Unclassified {
            attribute: name.to_string(),
            elements,
        }
    };
    warn!(attribute = name, "{warning}");
    warnings.push(warning);
}
