use std::path::PathBuf;

use anyhow::{Context, Result};
use float_cmp::assert_approx_eq;
use rand::Rng;
use ugrid::store::{AttributeRead, ContainerStore, OpenMode};
use ugrid::{Mesh2D, Mesh2DData, Registry, TopologyData, TopologyKind};

fn temp_path(name: &str) -> PathBuf {
    let suffix: u32 = rand::thread_rng().gen();
    std::env::temp_dir().join(format!("ugrid_{name}_{suffix}.nc"))
}

/// 4x4 nodes on a unit grid, 23 edges and 9 quadrilateral faces.
fn grid() -> Mesh2DData {
    let edge_nodes = vec![
        1, 2, 3, 4, 5, 6, 7, 8, 2, 9, 4, 10, 6, 11, 8, 12, 9, 13, 10, 14, 11, 15, 12, 16, 1, 3, 3,
        5, 5, 7, 2, 4, 4, 6, 6, 8, 9, 10, 10, 11, 11, 12, 13, 14, 14, 15,
    ];
    let face_nodes = vec![
        1, 2, 4, 3, 3, 4, 6, 5, 5, 6, 8, 7, 2, 9, 10, 4, 4, 10, 11, 6, 6, 11, 12, 8, 9, 13, 14,
        10, 10, 14, 15, 11, 11, 15, 16, 12,
    ];

    Mesh2DData {
        name: "mesh2d".to_owned(),
        node_x: vec![
            0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0,
        ],
        node_y: vec![
            0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0,
        ],
        edge_nodes: edge_nodes.into_iter().map(|node| node - 1).collect(),
        face_nodes: face_nodes.into_iter().map(|node| node - 1).collect(),
        face_x: vec![0.5, 0.5, 0.5, 1.5, 1.5, 1.5, 2.5, 2.5, 2.5],
        face_y: vec![0.5, 1.5, 2.5, 0.5, 1.5, 2.5, 0.5, 1.5, 2.5],
        num_nodes: 16,
        num_edges: 23,
        num_faces: 9,
        num_face_nodes_max: 4,
        ..Mesh2DData::default()
    }
}

#[test]
fn mesh2d_file_round_trip() -> Result<()> {
    testing_logger::setup();
    let path = temp_path("mesh2d");
    let written = grid();

    let mut registry: Registry = Registry::new();
    let file = registry.open(&path, OpenMode::Replace)?;
    let id = registry.define::<Mesh2D>(file, &written)?;
    registry.put::<Mesh2D>(file, id, &written)?;
    registry.close(file)?;

    let file = registry.open(&path, OpenMode::Read)?;
    assert_eq!(registry.topology_count(file, TopologyKind::Mesh2D)?, 1);
    assert_eq!(registry.topology_count(file, TopologyKind::Network1D)?, 0);

    let mut read = Mesh2DData::default();
    registry.inquire::<Mesh2D>(file, 0, &mut read)?;
    assert_eq!(
        (read.num_nodes, read.num_edges, read.num_faces, read.num_face_nodes_max),
        (16, 23, 9, 4)
    );

    read.allocate();
    registry.get::<Mesh2D>(file, 0, &mut read)?;

    assert_eq!(read.name, "mesh2d");
    for (read, written) in read.node_x.iter().zip(&written.node_x) {
        assert_approx_eq!(f64, *read, *written, epsilon = 0.000_1);
    }
    for (read, written) in read.face_y.iter().zip(&written.face_y) {
        assert_approx_eq!(f64, *read, *written, epsilon = 0.000_1);
    }
    assert_eq!(read.edge_nodes, written.edge_nodes);
    assert_eq!(read.face_nodes, written.face_nodes);
    assert!(!read.is_spherical);

    registry.close(file)?;
    std::fs::remove_file(&path)?;

    testing_logger::validate(|captured_logs| {
        assert!(captured_logs
            .iter()
            .all(|entry| entry.level > log::Level::Warn));
    });

    Ok(())
}

#[test]
fn one_based_read_of_zero_based_file() -> Result<()> {
    let path = temp_path("mesh2d_one_based");
    let written = grid();

    let mut registry: Registry = Registry::new();
    let file = registry.open(&path, OpenMode::Replace)?;
    let id = registry.define::<Mesh2D>(file, &written)?;
    registry.put::<Mesh2D>(file, id, &written)?;
    registry.close(file)?;

    let file = registry.open(&path, OpenMode::Read)?;
    let mut read = Mesh2DData::default();
    registry.inquire::<Mesh2D>(file, 0, &mut read)?;
    read.start_index = 1;
    read.allocate();
    registry.get::<Mesh2D>(file, 0, &mut read)?;

    let expected: Vec<i32> = written.face_nodes.iter().map(|node| node + 1).collect();
    assert_eq!(read.face_nodes, expected);
    assert_eq!(read.edge_nodes.first(), Some(&1));

    // the file itself still holds zero-based indices
    assert_eq!(registry.ints(file, "mesh2d_face_nodes")?, written.face_nodes);

    registry.close(file)?;
    std::fs::remove_file(&path)?;

    Ok(())
}

#[test]
fn coordinate_attributes_name_the_pair() -> Result<()> {
    let path = temp_path("mesh2d_attributes");

    let mut registry: Registry = Registry::new();
    let file = registry.open(&path, OpenMode::Replace)?;
    registry.define::<Mesh2D>(file, &grid())?;

    let store = registry.store(file)?;
    let topology = store
        .variable("mesh2d")
        .context("Topology variable not defined")?;
    let node_coordinates: String = store.read_attribute(topology.into(), "node_coordinates")?;
    assert_eq!(node_coordinates, "mesh2d_node_x mesh2d_node_y");
    let face_coordinates: String = store.read_attribute(topology.into(), "face_coordinates")?;
    assert_eq!(face_coordinates, "mesh2d_face_x mesh2d_face_y");
    let face_nodes: String = store.read_attribute(topology.into(), "face_node_connectivity")?;
    assert_eq!(face_nodes, "mesh2d_face_nodes");

    let face_nodes = store.require_variable("mesh2d_face_nodes")?;
    let fill: i32 = store.read_attribute(face_nodes.into(), "_FillValue")?;
    assert_eq!(fill, -999);
    assert_eq!(registry.dimension_sizes(file, "mesh2d_face_nodes")?, vec![9, 4]);

    registry.close(file)?;
    std::fs::remove_file(&path)?;

    Ok(())
}

#[test]
fn spherical_changes_coordinate_names_only() -> Result<()> {
    let path = temp_path("mesh2d_spherical");

    let mut registry: Registry = Registry::new();
    let file = registry.open(&path, OpenMode::Replace)?;
    let spherical = Mesh2DData {
        is_spherical: true,
        ..grid()
    };
    let id = registry.define::<Mesh2D>(file, &spherical)?;
    registry.put::<Mesh2D>(file, id, &spherical)?;

    assert!(registry.variable_exists(file, "mesh2d_node_lon")?);
    assert!(!registry.variable_exists(file, "mesh2d_node_x")?);
    assert!(registry.variable_exists(file, "mesh2d_face_nodes")?);

    let values = registry.attribute_values(file, "mesh2d_node_lat")?;
    assert!(values.iter().any(|value| value == "latitude"));
    assert!(values.iter().any(|value| value == "degrees_north"));
    registry.close(file)?;

    let file = registry.open(&path, OpenMode::Read)?;
    let mut read = Mesh2DData::default();
    registry.inquire::<Mesh2D>(file, 0, &mut read)?;
    read.allocate();
    registry.get::<Mesh2D>(file, 0, &mut read)?;
    assert!(read.is_spherical);
    assert_eq!(read.node_y, spherical.node_y);

    registry.close(file)?;
    std::fs::remove_file(&path)?;

    Ok(())
}

#[test]
fn ragged_faces_read_back_padded() -> Result<()> {
    let mut registry = Registry::new();
    let file = registry.attach(ugrid::store::MemoryStore::new())?;

    let written = Mesh2DData {
        name: "ragged".to_owned(),
        node_x: vec![0.0, 1.0, 1.0, 0.0, 2.0],
        node_y: vec![0.0, 0.0, 1.0, 1.0, 0.5],
        face_nodes: vec![0, 1, 2, 3, 1, 4, 2, -999],
        num_nodes: 5,
        num_faces: 2,
        ..Mesh2DData::default()
    };
    let id = registry.define::<Mesh2D>(file, &written)?;
    registry.put::<Mesh2D>(file, id, &written)?;

    let mut read = Mesh2DData::default();
    registry.inquire::<Mesh2D>(file, id, &mut read)?;
    read.start_index = 1;
    read.allocate();
    registry.get::<Mesh2D>(file, id, &mut read)?;
    assert_eq!(read.face_nodes, vec![1, 2, 3, 4, 2, 5, 3, -999]);

    Ok(())
}
