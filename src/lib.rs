pub mod config;
pub mod error;
pub mod interchange;
pub mod pipeline;
pub mod pool;
pub mod sanitize;
pub mod types;

pub use config::{Axis, Handedness, PipelineConfig, SanitizeConfig};
pub use error::{Result, SanitizeError};
pub use pipeline::Pipeline;
pub use sanitize::{SanitizeReport, SanitizeWarning, SanitizedMesh, Sanitizer, sanitize};
pub use types::{
    Attribute, AttributeRole, AttributeValues, BoundingBox, FaceMapping, Interpolation, Mesh,
    Orientation,
};
