use crate::error::Result;
use crate::types::AttributeValues;

/// Resolve an attribute's secondary index array into direct values.
///
/// Returns `values` untouched when there are no indices (or an empty index
/// array); otherwise `result[i] = values[indices[i]]`, element-wise. An index
/// past the end is fatal for the mesh.
pub fn resolve_indexed(
    values: AttributeValues,
    indices: Option<&[u32]>,
    element_size: usize,
    context: &str,
) -> Result<AttributeValues> {
    match indices {
        None | Some([]) => Ok(values),
        Some(indices) => values.try_gather(element_size, indices, context),
    }
}
