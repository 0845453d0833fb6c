use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use ugrid::store::{ContainerStore, FileStore, MemoryStore, OpenMode};
use ugrid::{Entities, Entity, Mesh2D, Mesh2DData, TopologyData};

/// Structured `n x n` grid of quadrilaterals as an unstructured mesh.
fn grid(n: usize) -> Mesh2DData {
    let nodes_per_row = n + 1;
    let index = |i: usize, j: usize| (j * nodes_per_row + i) as i32;

    let mut data = Mesh2DData {
        name: "mesh2d".to_owned(),
        num_nodes: nodes_per_row * nodes_per_row,
        num_faces: n * n,
        ..Mesh2DData::default()
    };

    for j in 0..nodes_per_row {
        for i in 0..nodes_per_row {
            data.node_x.push(i as f64);
            data.node_y.push(j as f64);
        }
    }
    for j in 0..n {
        for i in 0..n {
            data.face_nodes.extend([
                index(i, j),
                index(i + 1, j),
                index(i + 1, j + 1),
                index(i, j + 1),
            ]);
        }
    }

    data
}

fn mesh_store(n: usize) -> MemoryStore {
    let mut store = MemoryStore::new();
    let data = grid(n);
    let mesh = Mesh2D::define(&mut store, &data).unwrap();
    mesh.put(&mut store, &data).unwrap();
    store
}

pub fn discovery(c: &mut Criterion) {
    //prepare the variables for benchmark
    let store = mesh_store(100);

    c.bench_function("topology discovery", |b| {
        b.iter(|| Entities::discover(black_box(&store)).unwrap())
    });

    let entities = Entities::discover(&store).unwrap();
    let mesh = &entities.mesh2d[0];

    c.bench_function("mesh2d get", |b| {
        b.iter(|| {
            let mut data = Mesh2DData::default();
            mesh.inquire(black_box(&store), &mut data).unwrap();
            data.start_index = 1;
            data.allocate();
            mesh.get(black_box(&store), &mut data).unwrap();
            data
        })
    });
}

pub fn file_round_trip(c: &mut Criterion) {
    let data = grid(100);
    let path = std::env::temp_dir().join("ugrid_bench_mesh2d.nc");

    c.bench_function("mesh2d file write", |b| {
        b.iter(|| {
            let mut store = FileStore::open(black_box(&path), OpenMode::Replace).unwrap();
            let mesh = Mesh2D::define(&mut store, &data).unwrap();
            mesh.put(&mut store, &data).unwrap();
            store.close().unwrap();
        })
    });

    c.bench_function("mesh2d file read", |b| {
        b.iter(|| {
            let store = FileStore::open(black_box(&path), OpenMode::Read).unwrap();
            store.variables().len()
        })
    });

    std::fs::remove_file(&path).unwrap();
}

criterion_group!(benches, discovery, file_round_trip);
criterion_main!(benches);
