pub mod attribute;
pub mod bounds;
pub mod mesh;

pub use attribute::{Attribute, AttributeRole, AttributeValues, Interpolation, ResolvedAttribute};
pub use bounds::BoundingBox;
pub use mesh::{
    Canonical, FaceMapping, FaceSubset, Mesh, MeshState, Orientation, Raw, Triangulated,
    VertexLayout,
};
