use glam::Vec3;

use crate::pool::ScratchPool;

/// Compute per-point normals for a triangle list.
///
/// At each triangle corner the cross product of the two edges leaving that
/// corner is accumulated into the corner's point, then every accumulator is
/// normalized. Points no triangle touches get a zero normal. Indices must be
/// in range for `points`.
pub fn compute_vertex_normals(
    points: &[Vec3],
    triangle_indices: &[u32],
    scratch: &ScratchPool<Vec3>,
) -> Vec<Vec3> {
    let mut accum = scratch.take(points.len());
    accum.resize(points.len(), Vec3::ZERO);

    for tri in triangle_indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (pa, pb, pc) = (points[a], points[b], points[c]);

        accum[a] += (pb - pa).cross(pc - pa);
        accum[b] += (pc - pb).cross(pa - pb);
        accum[c] += (pa - pc).cross(pb - pc);
    }

    let normals = accum.iter().map(|n| n.normalize_or_zero()).collect();
    scratch.give(accum);
    normals
}
