use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use float_cmp::assert_approx_eq;
use rand::Rng;
use ugrid::errors::StoreError;
use ugrid::store::{AttributeRead, AttributeTarget, ContainerStore, FileStore, OpenMode};
use ugrid::{Entities, Entity, Location, Mesh2D, Mesh2DData, Registry, TopologyKind, UgridError};

fn temp_path(name: &str) -> PathBuf {
    let suffix: u32 = rand::thread_rng().gen();
    std::env::temp_dir().join(format!("ugrid_{name}_{suffix}.nc"))
}

fn triangles() -> Mesh2DData {
    Mesh2DData {
        name: "mesh2d".to_owned(),
        node_x: vec![0.0, 1.0, 1.0, 0.0],
        node_y: vec![0.0, 0.0, 1.0, 1.0],
        edge_nodes: vec![0, 1, 1, 2, 2, 3, 3, 0, 0, 2],
        face_nodes: vec![0, 1, 2, 0, 2, 3],
        num_nodes: 4,
        num_edges: 5,
        num_faces: 2,
        num_face_nodes_max: 3,
        ..Mesh2DData::default()
    }
}

fn write_triangles(path: &Path) -> Result<()> {
    let mut registry: Registry = Registry::new();
    let file = registry.open(path, OpenMode::Replace)?;
    let data = triangles();
    let id = registry.define::<Mesh2D>(file, &data)?;
    registry.put::<Mesh2D>(file, id, &data)?;
    registry.define_global_attribute(file, "Conventions", "CF-1.8 UGRID-1.0")?;
    registry.close(file)?;
    Ok(())
}

#[test]
fn written_file_is_classic_netcdf() -> Result<()> {
    let path = temp_path("classic_bytes");
    write_triangles(&path)?;

    let bytes = std::fs::read(&path)?;
    assert_eq!(&bytes[..4], b"CDF\x01");

    let store = FileStore::open(&path, OpenMode::Read)?;
    let conventions: String = store.read_attribute(AttributeTarget::Global, "Conventions")?;
    assert_eq!(conventions, "CF-1.8 UGRID-1.0");

    let entities = Entities::discover(&store)?;
    assert_eq!(entities.count(TopologyKind::Mesh2D), 1);
    assert_eq!(entities.mesh2d[0].topology().name, "mesh2d");
    let face_nodes = store.require_variable("mesh2d_face_nodes")?;
    let fill: i32 = store.read_attribute(face_nodes.into(), "_FillValue")?;
    assert_eq!(fill, -999);
    drop(store);

    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn write_mode_appends_data_variables() -> Result<()> {
    let path = temp_path("classic_append");
    write_triangles(&path)?;

    let mut registry: Registry = Registry::new();
    let file = registry.open(&path, OpenMode::Write)?;
    assert_eq!(registry.topology_count(file, TopologyKind::Mesh2D)?, 1);
    let var = registry.define_double_variable_on_location(
        file,
        TopologyKind::Mesh2D,
        0,
        Location::Node,
        "mesh2d_bed_level",
        "nLevels",
        2,
    )?;
    registry
        .store_mut(file)?
        .put_values(var, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5].into())?;
    registry.close(file)?;

    let file = registry.open(&path, OpenMode::Read)?;
    assert_eq!(
        registry.data_variables(file, TopologyKind::Mesh2D, 0, Location::Node)?,
        vec!["mesh2d_bed_level"]
    );
    assert_eq!(registry.dimension_sizes(file, "mesh2d_bed_level")?, vec![2, 4]);
    let levels = registry.doubles(file, "mesh2d_bed_level")?;
    assert_approx_eq!(f64, levels[7], 3.5, epsilon = 0.000_1);
    assert_eq!(
        registry.ints(file, "mesh2d_face_nodes")?,
        triangles().face_nodes
    );

    registry.close(file)?;
    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn read_mode_rejects_definitions() -> Result<()> {
    let path = temp_path("classic_read_only");
    write_triangles(&path)?;
    let before = std::fs::read(&path)?;

    let mut registry: Registry = Registry::new();
    let file = registry.open(&path, OpenMode::Read)?;
    let err = registry
        .define::<Mesh2D>(
            file,
            &Mesh2DData {
                name: "other".to_owned(),
                ..triangles()
            },
        )
        .unwrap_err();
    assert!(matches!(err, UgridError::Store(StoreError::ReadOnly)));
    assert_eq!(registry.topology_count(file, TopologyKind::Mesh2D)?, 1);
    registry.close(file)?;

    let after = std::fs::read(&path).context("reading file back")?;
    assert_eq!(before, after);

    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn foreign_files_are_rejected() -> Result<()> {
    let path = temp_path("classic_foreign");
    std::fs::write(&path, b"GRIB0000")?;

    let mut registry: Registry = Registry::new();
    let err = registry.open(&path, OpenMode::Read).unwrap_err();
    assert!(matches!(err, UgridError::NetCdf(_)));

    std::fs::remove_file(&path)?;
    Ok(())
}
