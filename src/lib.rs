#![cfg_attr(docsrs, feature(doc_cfg))]
//!# Reading and writing UGRID mesh topologies in netCDF classic files
//!
//!This crate implements the [UGRID conventions](https://ugrid-conventions.github.io/ugrid-conventions/)
//!for unstructured grids on top of the netCDF classic data model.
//!It discovers topologies in existing files, defines new ones and copies
//!their data between flat caller-side arrays and the file variables.
//!
//!Four kinds of topology are supported:
//!
//!- [`Network1D`] - a network of branches with node coordinates and polyline geometry,
//!- [`Mesh1D`] - nodes and edges placed along the branches of a network,
//!- [`Mesh2D`] - nodes, edges and faces of a 2D unstructured mesh,
//!- [`Contacts`] - index pairs linking the locations of two topologies.
//!
//!## Usage
//!
//!Files are opened through a [`Registry`], which owns every open store and the entities
//!found in it. Each file is addressed by a [`FileId`] and each topology by its kind and
//!its index among the topologies of that kind.
//!
//!Reading follows the same steps for every kind: [`inquire()`](Registry::inquire) the counts,
//![`allocate()`](TopologyData::allocate) the arrays, then [`get()`](Registry::get) them.
//!Arrays left empty are skipped, so only the needed data is read.
//!
//!### Example
//!
//!```
//!use ugrid::{Mesh2D, Mesh2DData, Registry, TopologyData, TopologyKind};
//!use ugrid::store::OpenMode;
//!# fn main() -> anyhow::Result<()> {
//!let path = std::env::temp_dir().join("ugrid_lib_doc.nc");
//!
//!let mut registry: Registry = Registry::new();
//!let file = registry.open(&path, OpenMode::Replace)?;
//!let written = Mesh2DData {
//!    name: "mesh2d".to_owned(),
//!    node_x: vec![0.0, 1.0, 1.0, 0.0],
//!    node_y: vec![0.0, 0.0, 1.0, 1.0],
//!    face_nodes: vec![0, 1, 2, 3],
//!    num_nodes: 4,
//!    num_faces: 1,
//!    ..Mesh2DData::default()
//!};
//!let id = registry.define::<Mesh2D>(file, &written)?;
//!registry.put::<Mesh2D>(file, id, &written)?;
//!registry.close(file)?;
//!
//!let file = registry.open(&path, OpenMode::Read)?;
//!assert_eq!(registry.topology_count(file, TopologyKind::Mesh2D)?, 1);
//!
//!let mut mesh = Mesh2DData::default();
//!registry.inquire::<Mesh2D>(file, 0, &mut mesh)?;
//!mesh.allocate();
//!registry.get::<Mesh2D>(file, 0, &mut mesh)?;
//!assert_eq!(mesh.face_nodes, vec![0, 1, 2, 3]);
//!# registry.close(file)?;
//!# std::fs::remove_file(&path)?;
//!# Ok(())
//!# }
//!```
//!
//!### Storage
//!
//!Entities never touch files directly, they work on any [`ContainerStore`](store::ContainerStore).
//![`FileStore`](store::FileStore) reads netCDF files with the [`netcdf`] crate and writes them
//!in the classic format,
//![`MemoryStore`](store::MemoryStore) keeps everything in memory.
//!
//!### Features
//!
//!- `mesh_ndarray` - enables views of connectivity and coordinate arrays as
//![`ndarray::Array2`](https://docs.rs/ndarray/0.15/ndarray/type.Array2.html). Enabled by default.
//!

pub mod constants;
pub mod entity;
pub mod errors;
pub mod location;
#[cfg(feature = "mesh_ndarray")]
pub mod mesh_ndarray;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod strings;

pub use entity::{
    Contacts, ContactsData, Entities, Entity, Mesh1D, Mesh1DData, Mesh2D, Mesh2DData, Network1D,
    Network1DData, Topology, TopologyData,
};
pub use errors::UgridError;
pub use fallible_iterator::FallibleIterator;
pub use location::{DimensionRole, Location, TopologyKind};
pub use registry::{FileId, ProjectedCoordinateSystem, Registry};
