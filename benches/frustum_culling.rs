use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starmath::{intersector, Angle, BoundingBox, Frustum, HighPrecisionVector3, Matrix4, Vector3};

fn camera_frustum() -> Frustum {
    let mut view = Matrix4::new();
    view.set_to_look_at_target(
        &Vector3::new(0.0, 5.0, 20.0),
        &Vector3::ZERO,
        &Vector3::Y,
    );
    let mut combined = Matrix4::new();
    combined.set_to_projection(0.5, 500.0, Angle::from_degrees(60.0), 16.0 / 9.0);
    combined.mul(&view);
    combined.inv().expect("camera matrix is invertible");
    let mut frustum = Frustum::new();
    frustum.update(&combined);
    frustum
}

fn random_points(count: usize) -> Vec<Vector3> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            Vector3::new(
                rng.gen_range(-300.0..300.0),
                rng.gen_range(-300.0..300.0),
                rng.gen_range(-300.0..300.0),
            )
        })
        .collect()
}

fn frustum_update(c: &mut Criterion) {
    let mut combined = Matrix4::new();
    combined.set_to_projection(0.5, 500.0, Angle::from_degrees(60.0), 16.0 / 9.0);
    combined.inv().expect("projection is invertible");
    let mut frustum = Frustum::new();
    c.bench_function("frustum/update", |b| {
        b.iter(|| frustum.update(black_box(&combined)))
    });
}

fn frustum_queries(c: &mut Criterion) {
    let frustum = camera_frustum();
    let points = random_points(1024);
    let boxes: Vec<BoundingBox> = points
        .iter()
        .map(|p| {
            let mut max = *p;
            max.add_xyz(4.0, 4.0, 4.0);
            BoundingBox::new(p, &max)
        })
        .collect();

    let mut group = c.benchmark_group("frustum/cull_1024");
    group.bench_function("points", |b| {
        b.iter(|| points.iter().filter(|p| frustum.point_in_frustum(p)).count())
    });
    group.bench_function("spheres", |b| {
        b.iter(|| {
            points
                .iter()
                .filter(|p| frustum.sphere_in_frustum(p, 2.0))
                .count()
        })
    });
    group.bench_function("boxes", |b| {
        b.iter(|| boxes.iter().filter(|bb| frustum.bounds_in_frustum(bb)).count())
    });
    group.finish();
}

fn camera_relative(c: &mut Criterion) {
    let camera = HighPrecisionVector3::from_f64s(1.5e20, -2.0e19, 3.0e18);
    let objects: Vec<HighPrecisionVector3> = random_points(1024)
        .iter()
        .map(|p| {
            let mut absolute = camera.clone();
            absolute.add_double(p);
            absolute
        })
        .collect();
    let frustum = camera_frustum();

    c.bench_function("frustum/camera_relative_1024", |b| {
        b.iter(|| {
            objects
                .iter()
                .filter(|o| frustum.sphere_in_frustum(&o.relative_to(&camera), 2.0))
                .count()
        })
    });
}

fn ray_sphere(c: &mut Criterion) {
    let origin = Vector3::ZERO;
    let through = Vector3::new(0.0, 0.0, -1.0);
    let center = Vector3::new(0.3, -0.2, -5.0);
    c.bench_function("intersector/ray_sphere", |b| {
        b.iter(|| {
            intersector::intersect_ray_sphere(
                black_box(&origin),
                black_box(&through),
                black_box(&center),
                1.0,
            )
        })
    });
}

criterion_group!(benches, frustum_update, frustum_queries, camera_relative, ray_sphere);
criterion_main!(benches);
