use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Vec2, Vec3};
use mesh_sanitizer::config::SanitizeConfig;
use mesh_sanitizer::sanitize::{Sanitizer, triangulate};
use mesh_sanitizer::types::{Attribute, Interpolation, Mesh};

/// Generate a flat grid mesh with `n x n` quad faces.
fn make_grid(n: usize) -> Mesh {
    let verts_per_side = n + 1;
    let mut points = Vec::with_capacity(verts_per_side * verts_per_side);

    for y in 0..verts_per_side {
        for x in 0..verts_per_side {
            let fx = x as f32 / n as f32;
            let fy = y as f32 / n as f32;
            points.push(Vec3::new(fx, fy, 0.0));
        }
    }

    let mut indices = Vec::with_capacity(n * n * 4);
    for y in 0..n {
        for x in 0..n {
            let tl = (y * verts_per_side + x) as u32;
            let tr = tl + 1;
            let bl = tl + verts_per_side as u32;
            let br = bl + 1;
            indices.extend_from_slice(&[tl, tr, br, bl]);
        }
    }

    Mesh::new(points, vec![4; n * n], indices)
}

/// Grid plus per-corner UVs, which forces the unwelded layout.
fn make_uv_grid(n: usize) -> Mesh {
    let mesh = make_grid(n);
    let st: Vec<Vec2> = mesh
        .face_vertex_indices()
        .iter()
        .map(|&i| mesh.points()[i as usize].truncate())
        .collect();
    mesh.with_attribute(
        "st",
        Attribute::new(st).with_interpolation(Interpolation::FaceVarying),
    )
}

fn bench_triangulate(c: &mut Criterion) {
    // 224x224 grid = 50176 quads = 100352 triangles
    let mesh = make_grid(224);

    c.bench_function("triangulate_fan_100k", |b| {
        b.iter(|| {
            triangulate(
                mesh.face_vertex_counts(),
                mesh.face_vertex_indices(),
                mesh.point_count(),
                false,
            )
        });
    });
}

fn bench_sanitize(c: &mut Criterion) {
    let welded = make_grid(224);
    let unwelded = make_uv_grid(224);
    let sanitizer = Sanitizer::new(SanitizeConfig::default());

    c.bench_function("sanitize_welded_100k", |b| {
        b.iter(|| sanitizer.sanitize(welded.clone()));
    });

    c.bench_function("sanitize_unwelded_100k", |b| {
        b.iter(|| sanitizer.sanitize(unwelded.clone()));
    });
}

fn bench_batch(c: &mut Criterion) {
    let sanitizer = Sanitizer::new(SanitizeConfig::default());
    let samples: Vec<_> = (0..16)
        .map(|i| (format!("grid_{i}"), make_uv_grid(64)))
        .collect();

    c.bench_function("sanitize_batch_16x8k", |b| {
        b.iter(|| sanitizer.sanitize_batch(samples.clone()));
    });
}

criterion_group!(benches, bench_triangulate, bench_sanitize, bench_batch);
criterion_main!(benches);
