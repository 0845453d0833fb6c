//! 2D meshes: nodes, edges and faces with their adjacency

use crate::{
    constants::{
        CF_ROLE, DOUBLE_MISSING, EDGE_FACE_CONNECTIVITY, EDGE_NODE_CONNECTIVITY,
        FACE_EDGE_CONNECTIVITY, FACE_FACE_CONNECTIVITY, FACE_NODE_CONNECTIVITY, INT_MISSING,
        LONG_NAME, NUM_FACE_NODES_MAX, STANDARD_NAME, TWO_DIMENSION, UNITS,
    },
    errors::UgridError,
    location::{DimensionRole, Location, TopologyKind},
    store::{ContainerStore, VarId},
};

use super::{
    coordinates::define_coordinates,
    marshal::{put_doubles, put_ints, Reader},
    roles::{EDGE_COORDINATES, FACE_COORDINATES, NODE_COORDINATES},
    topology::{Schema, Topology},
    Entities, Entity, TopologyData,
};

const ENTITY: &str = "Mesh2D";

/// Caller-side description of a 2D mesh.
///
/// Connectivity arrays are flattened row-major: `face_nodes` holds `num_face_nodes_max`
/// entries per face, shorter faces padded with `int_fill_value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh2DData {
    pub name: String,
    pub node_x: Vec<f64>,
    pub node_y: Vec<f64>,
    pub node_z: Vec<f64>,
    pub edge_nodes: Vec<i32>,
    pub edge_x: Vec<f64>,
    pub edge_y: Vec<f64>,
    pub edge_z: Vec<f64>,
    pub face_nodes: Vec<i32>,
    pub face_x: Vec<f64>,
    pub face_y: Vec<f64>,
    pub face_z: Vec<f64>,
    pub edge_faces: Vec<i32>,
    pub face_edges: Vec<i32>,
    pub face_faces: Vec<i32>,
    pub num_nodes: usize,
    pub num_edges: usize,
    pub num_faces: usize,
    pub num_face_nodes_max: usize,
    /// Accepted for layered meshes but not written.
    pub num_layers: usize,
    pub is_spherical: bool,
    pub start_index: i32,
    pub int_fill_value: i32,
    pub double_fill_value: f64,
}

impl Default for Mesh2DData {
    fn default() -> Self {
        Self {
            name: String::new(),
            node_x: Vec::new(),
            node_y: Vec::new(),
            node_z: Vec::new(),
            edge_nodes: Vec::new(),
            edge_x: Vec::new(),
            edge_y: Vec::new(),
            edge_z: Vec::new(),
            face_nodes: Vec::new(),
            face_x: Vec::new(),
            face_y: Vec::new(),
            face_z: Vec::new(),
            edge_faces: Vec::new(),
            face_edges: Vec::new(),
            face_faces: Vec::new(),
            num_nodes: 0,
            num_edges: 0,
            num_faces: 0,
            num_face_nodes_max: NUM_FACE_NODES_MAX,
            num_layers: 0,
            is_spherical: false,
            start_index: 0,
            int_fill_value: INT_MISSING,
            double_fill_value: DOUBLE_MISSING,
        }
    }
}

impl TopologyData for Mesh2DData {
    fn allocate(&mut self) {
        let face_corners = self.num_faces * self.num_face_nodes_max;

        self.node_x = vec![0.0; self.num_nodes];
        self.node_y = vec![0.0; self.num_nodes];
        self.node_z = vec![0.0; self.num_nodes];
        self.edge_nodes = vec![0; self.num_edges * 2];
        self.edge_x = vec![0.0; self.num_edges];
        self.edge_y = vec![0.0; self.num_edges];
        self.edge_z = vec![0.0; self.num_edges];
        self.face_nodes = vec![0; face_corners];
        self.face_x = vec![0.0; self.num_faces];
        self.face_y = vec![0.0; self.num_faces];
        self.face_z = vec![0.0; self.num_faces];
        self.edge_faces = vec![0; self.num_edges * 2];
        self.face_edges = vec![0; face_corners];
        self.face_faces = vec![0; face_corners];
    }
}

/// A 2D mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh2D {
    topology: Topology,
    node_z: Option<VarId>,
    edge_z: Option<VarId>,
    face_z: Option<VarId>,
}

/// Plans `<name>_<location>_z`, linked to the mesh through `mesh`/`location` attributes.
fn define_z(schema: &mut Schema, location: Location, dimension: &str, coordinates: &[String]) {
    let mesh = schema.name().to_owned();
    let element = location.as_str();
    let variable = schema
        .double_variable(&format!("{element}_z"), &[dimension])
        .attribute(STANDARD_NAME, "altitude")
        .attribute(LONG_NAME, format!("z-coordinate of mesh {element}"))
        .attribute(UNITS, "m")
        .attribute("mesh", mesh)
        .attribute("location", element);
    if !coordinates.is_empty() {
        variable.attribute("coordinates", coordinates.join(" "));
    }
}

/// Plans the coordinate pair of `location` when both arrays are given and links it to the topology.
fn define_optional_coordinates(
    schema: &mut Schema,
    location: Location,
    dimension: &str,
    long_name_pattern: &str,
    x: &[f64],
    y: &[f64],
) -> Vec<String> {
    if x.is_empty() || y.is_empty() {
        return Vec::new();
    }
    let names = define_coordinates(schema, location, dimension, long_name_pattern);
    schema.role(&format!("{}_coordinates", location.as_str()), &names);
    names.to_vec()
}

impl Entity for Mesh2D {
    type Data = Mesh2DData;

    const KIND: TopologyKind = TopologyKind::Mesh2D;

    fn from_store<S: ContainerStore + ?Sized>(
        store: &S,
        variable: VarId,
    ) -> Result<Self, UgridError> {
        let topology = Topology::from_store(store, variable)?;
        let node_z = topology.related_variable(store, &["node_z"]);
        let edge_z = topology.related_variable(store, &["edge_z"]);
        let face_z = topology.related_variable(store, &["face_z"]);

        Ok(Self {
            topology,
            node_z,
            edge_z,
            face_z,
        })
    }

    fn define<S: ContainerStore + ?Sized>(
        store: &mut S,
        data: &Mesh2DData,
    ) -> Result<Self, UgridError> {
        let mut schema = Schema::new(ENTITY, &data.name, data.start_index, data.is_spherical)?
            .fill_values(data.int_fill_value, data.double_fill_value);
        if data.num_faces > 0 {
            schema.require("num_face_nodes_max", data.num_face_nodes_max > 0)?;
        }
        if !data.edge_faces.is_empty() {
            schema.require("num_edges", data.num_edges > 0)?;
        }

        schema.mesh_topology("Topology data of 2D mesh", 2);

        if data.num_nodes > 0 {
            let nodes = schema.location_dimension("node_dimension", "nNodes", data.num_nodes);
            let coordinates = define_optional_coordinates(
                &mut schema,
                Location::Node,
                &nodes,
                "{} of mesh node",
                &data.node_x,
                &data.node_y,
            );
            if !data.node_z.is_empty() {
                define_z(&mut schema, Location::Node, &nodes, &coordinates);
            }
        }

        let mut edges = None;
        if data.num_edges > 0 {
            let dimension = schema.location_dimension("edge_dimension", "nEdges", data.num_edges);
            schema.link(EDGE_NODE_CONNECTIVITY, "edge_nodes");
            schema
                .index_variable("edge_nodes", &[dimension.as_str(), TWO_DIMENSION], false)
                .attribute(CF_ROLE, EDGE_NODE_CONNECTIVITY)
                .attribute(LONG_NAME, "Start and end node of mesh edge");

            let coordinates = define_optional_coordinates(
                &mut schema,
                Location::Edge,
                &dimension,
                "characteristic {} of the mesh edge (e.g. midpoint)",
                &data.edge_x,
                &data.edge_y,
            );
            if !data.edge_z.is_empty() {
                define_z(&mut schema, Location::Edge, &dimension, &coordinates);
            }
            edges = Some(dimension);
        }

        if data.num_faces > 0 {
            let faces = schema.location_dimension("face_dimension", "nFaces", data.num_faces);
            let corners = schema.location_dimension(
                "max_face_nodes_dimension",
                "nMax_face_nodes",
                data.num_face_nodes_max,
            );
            let face_shape = [faces.as_str(), corners.as_str()];

            schema.link(FACE_NODE_CONNECTIVITY, "face_nodes");
            schema
                .index_variable("face_nodes", &face_shape, true)
                .attribute(CF_ROLE, FACE_NODE_CONNECTIVITY)
                .attribute(LONG_NAME, "Vertex node of mesh face (counterclockwise)");

            let coordinates = define_optional_coordinates(
                &mut schema,
                Location::Face,
                &faces,
                "characteristic {} of the mesh face",
                &data.face_x,
                &data.face_y,
            );
            if !data.face_z.is_empty() {
                define_z(&mut schema, Location::Face, &faces, &coordinates);
            }

            if !data.face_edges.is_empty() {
                schema.link(FACE_EDGE_CONNECTIVITY, "face_edges");
                schema
                    .index_variable("face_edges", &face_shape, true)
                    .attribute(CF_ROLE, FACE_EDGE_CONNECTIVITY)
                    .attribute(LONG_NAME, "Side edge of mesh face (counterclockwise)");
            }
            if !data.face_faces.is_empty() {
                schema.link(FACE_FACE_CONNECTIVITY, "face_links");
                schema
                    .index_variable("face_links", &face_shape, true)
                    .attribute(CF_ROLE, FACE_FACE_CONNECTIVITY)
                    .attribute(LONG_NAME, "Neighboring face of mesh face (counterclockwise)");
            }
            if let (false, Some(edges)) = (data.edge_faces.is_empty(), &edges) {
                schema.link(EDGE_FACE_CONNECTIVITY, "edge_faces");
                schema
                    .index_variable("edge_faces", &[edges.as_str(), TWO_DIMENSION], true)
                    .attribute(CF_ROLE, EDGE_FACE_CONNECTIVITY)
                    .attribute(LONG_NAME, "Neighboring face of mesh edge");
            }
        }

        let variable = schema.apply(store)?;
        Self::from_store(&*store, variable)
    }

    fn put<S: ContainerStore + ?Sized>(
        &self,
        store: &mut S,
        data: &Mesh2DData,
    ) -> Result<(), UgridError> {
        let topology = &self.topology;

        put_doubles(store, topology.role_variable(NODE_COORDINATES, 0), &data.node_x)?;
        put_doubles(store, topology.role_variable(NODE_COORDINATES, 1), &data.node_y)?;
        put_doubles(store, self.node_z, &data.node_z)?;

        put_ints(
            store,
            topology.resolved.first(EDGE_NODE_CONNECTIVITY),
            &data.edge_nodes,
        )?;
        put_doubles(store, topology.role_variable(EDGE_COORDINATES, 0), &data.edge_x)?;
        put_doubles(store, topology.role_variable(EDGE_COORDINATES, 1), &data.edge_y)?;
        put_doubles(store, self.edge_z, &data.edge_z)?;

        put_ints(
            store,
            topology.resolved.first(FACE_NODE_CONNECTIVITY),
            &data.face_nodes,
        )?;
        put_doubles(store, topology.role_variable(FACE_COORDINATES, 0), &data.face_x)?;
        put_doubles(store, topology.role_variable(FACE_COORDINATES, 1), &data.face_y)?;
        put_doubles(store, self.face_z, &data.face_z)?;

        put_ints(
            store,
            topology.resolved.first(EDGE_FACE_CONNECTIVITY),
            &data.edge_faces,
        )?;
        put_ints(
            store,
            topology.resolved.first(FACE_EDGE_CONNECTIVITY),
            &data.face_edges,
        )?;
        put_ints(
            store,
            topology.resolved.first(FACE_FACE_CONNECTIVITY),
            &data.face_faces,
        )
    }

    fn inquire<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        data: &mut Mesh2DData,
    ) -> Result<(), UgridError> {
        data.num_nodes = self.topology.count(store, DimensionRole::Node)?;
        data.num_edges = self.topology.count(store, DimensionRole::Edge)?;
        data.num_faces = self.topology.count(store, DimensionRole::Face)?;
        data.num_face_nodes_max = self.topology.count(store, DimensionRole::MaxFaceNode)?;
        Ok(())
    }

    fn get<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        data: &mut Mesh2DData,
    ) -> Result<(), UgridError> {
        let topology = &self.topology;
        let reader = Reader {
            store,
            entity: ENTITY,
        };
        let (start_index, fill) = (data.start_index, data.int_fill_value);

        data.name.clone_from(&topology.name);
        data.is_spherical = topology.spherical;

        reader.doubles("node_x", topology.role_variable(NODE_COORDINATES, 0), &mut data.node_x)?;
        reader.doubles("node_y", topology.role_variable(NODE_COORDINATES, 1), &mut data.node_y)?;
        reader.doubles("node_z", self.node_z, &mut data.node_z)?;

        reader.indices(
            "edge_nodes",
            topology.resolved.first(EDGE_NODE_CONNECTIVITY),
            start_index,
            fill,
            &mut data.edge_nodes,
        )?;
        reader.doubles("edge_x", topology.role_variable(EDGE_COORDINATES, 0), &mut data.edge_x)?;
        reader.doubles("edge_y", topology.role_variable(EDGE_COORDINATES, 1), &mut data.edge_y)?;
        reader.doubles("edge_z", self.edge_z, &mut data.edge_z)?;

        reader.indices(
            "face_nodes",
            topology.resolved.first(FACE_NODE_CONNECTIVITY),
            start_index,
            fill,
            &mut data.face_nodes,
        )?;
        reader.doubles("face_x", topology.role_variable(FACE_COORDINATES, 0), &mut data.face_x)?;
        reader.doubles("face_y", topology.role_variable(FACE_COORDINATES, 1), &mut data.face_y)?;
        reader.doubles("face_z", self.face_z, &mut data.face_z)?;

        // edge faces are never shifted to the caller's start index
        reader.ints(
            "edge_faces",
            topology.resolved.first(EDGE_FACE_CONNECTIVITY),
            &mut data.edge_faces,
        )?;
        reader.indices(
            "face_edges",
            topology.resolved.first(FACE_EDGE_CONNECTIVITY),
            start_index,
            fill,
            &mut data.face_edges,
        )?;
        reader.indices(
            "face_faces",
            topology.resolved.first(FACE_FACE_CONNECTIVITY),
            start_index,
            fill,
            &mut data.face_faces,
        )
    }

    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn collection(entities: &Entities) -> &[Self] {
        &entities.mesh2d
    }

    fn collection_mut(entities: &mut Entities) -> &mut Vec<Self> {
        &mut entities.mesh2d
    }
}
