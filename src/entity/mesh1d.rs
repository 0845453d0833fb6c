//! 1D meshes laid on the branches of a network

use crate::{
    constants::{
        CF_ROLE, DOUBLE_MISSING, EDGE_NODE_CONNECTIVITY, INT_MISSING, LONG_NAME,
        NAME_LENGTH_DIMENSION, NAME_LONG_LENGTH_DIMENSION, TWO_DIMENSION,
    },
    errors::UgridError,
    location::{DimensionRole, Location, TopologyKind},
    store::{ContainerStore, DataType, VarId},
    strings,
};

use super::{
    coordinates::define_coordinates,
    marshal::{put_doubles, put_ints, put_strings, Reader},
    roles::{self, COORDINATE_SPACE, EDGE_COORDINATES, NODE_COORDINATES},
    topology::{Schema, Topology},
    Entities, Entity, TopologyData,
};

const ENTITY: &str = "Mesh1D";

/// Caller-side description of a 1D mesh.
///
/// Every node and edge sits on a branch of the network named `network_name`,
/// given by the branch index and the offset along it.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh1DData {
    pub name: String,
    pub network_name: String,
    pub node_x: Vec<f64>,
    pub node_y: Vec<f64>,
    pub node_edge_id: Vec<i32>,
    pub node_edge_offset: Vec<f64>,
    pub node_id: Vec<String>,
    pub node_long_name: Vec<String>,
    pub edge_nodes: Vec<i32>,
    pub edge_edge_id: Vec<i32>,
    pub edge_edge_offset: Vec<f64>,
    pub edge_x: Vec<f64>,
    pub edge_y: Vec<f64>,
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_spherical: bool,
    pub start_index: i32,
    pub int_fill_value: i32,
    pub double_fill_value: f64,
}

impl Default for Mesh1DData {
    fn default() -> Self {
        Self {
            name: String::new(),
            network_name: String::new(),
            node_x: Vec::new(),
            node_y: Vec::new(),
            node_edge_id: Vec::new(),
            node_edge_offset: Vec::new(),
            node_id: Vec::new(),
            node_long_name: Vec::new(),
            edge_nodes: Vec::new(),
            edge_edge_id: Vec::new(),
            edge_edge_offset: Vec::new(),
            edge_x: Vec::new(),
            edge_y: Vec::new(),
            num_nodes: 0,
            num_edges: 0,
            is_spherical: false,
            start_index: 0,
            int_fill_value: INT_MISSING,
            double_fill_value: DOUBLE_MISSING,
        }
    }
}

impl TopologyData for Mesh1DData {
    fn allocate(&mut self) {
        self.node_x = vec![0.0; self.num_nodes];
        self.node_y = vec![0.0; self.num_nodes];
        self.node_edge_id = vec![0; self.num_nodes];
        self.node_edge_offset = vec![0.0; self.num_nodes];
        self.node_id = vec![String::new(); self.num_nodes];
        self.node_long_name = vec![String::new(); self.num_nodes];
        self.edge_nodes = vec![0; self.num_edges * 2];
        self.edge_edge_id = vec![0; self.num_edges];
        self.edge_edge_offset = vec![0.0; self.num_edges];
        self.edge_x = vec![0.0; self.num_edges];
        self.edge_y = vec![0.0; self.num_edges];
    }
}

/// A 1D mesh.
///
/// `node_coordinates` names the branch index and offset variables, followed by the
/// x/y pair when the mesh has one; `edge_coordinates` follows the same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh1D {
    topology: Topology,
}

impl Mesh1D {
    /// Name of the network the mesh is laid on, from `coordinate_space`.
    #[must_use]
    pub fn network_name(&self) -> Option<&str> {
        self.topology
            .resolved
            .tokens(COORDINATE_SPACE)
            .first()
            .map(|name| strings::trim(name))
    }

    /// Branch index, branch offset, x and y variables named by a coordinates role.
    ///
    /// A two-variable role is the branch pair when its first variable is integer.
    fn coordinates<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        role: &str,
    ) -> Result<[Option<VarId>; 4], UgridError> {
        let variables = self.topology.resolved.role(role);
        let at = |index: usize| variables.get(index).copied();

        let has_branch = match variables.first() {
            Some(&first) => store.variable_info(first)?.data_type == DataType::Int,
            None => false,
        };
        Ok(match coordinate_layout(variables.len(), has_branch) {
            (Some(branch), Some(x)) => [at(branch), at(branch + 1), at(x), at(x + 1)],
            (Some(branch), None) => [at(branch), at(branch + 1), None, None],
            (None, Some(x)) => [None, None, at(x), at(x + 1)],
            (None, None) => [None; 4],
        })
    }
}

/// Plans the branch index and offset pair of one location, returns both names.
fn define_branch_position(
    schema: &mut Schema,
    location: Location,
    dimension: &str,
) -> [String; 2] {
    let element = location.as_str();
    let branch = schema
        .variable(&format!("{element}_edge"), DataType::Int, &[dimension])
        .attribute(
            LONG_NAME,
            format!("Index of branch on which mesh {element} are located"),
        )
        .name()
        .to_owned();
    let offset = schema
        .double_variable(&format!("{element}_edge_offset"), &[dimension])
        .attribute(LONG_NAME, format!("Offset along branch of mesh {element}"))
        .name()
        .to_owned();
    [branch, offset]
}

impl Entity for Mesh1D {
    type Data = Mesh1DData;

    const KIND: TopologyKind = TopologyKind::Mesh1D;

    fn from_store<S: ContainerStore + ?Sized>(
        store: &S,
        variable: VarId,
    ) -> Result<Self, UgridError> {
        Ok(Self {
            topology: Topology::from_store(store, variable)?,
        })
    }

    fn define<S: ContainerStore + ?Sized>(
        store: &mut S,
        data: &Mesh1DData,
    ) -> Result<Self, UgridError> {
        let mut schema = Schema::new(ENTITY, &data.name, data.start_index, data.is_spherical)?
            .fill_values(data.int_fill_value, data.double_fill_value);
        let network_name = strings::trim(&data.network_name);
        schema.require("network_name", !network_name.is_empty())?;
        schema.require("node_edge_id", !data.node_edge_id.is_empty())?;
        schema.require("node_edge_offset", !data.node_edge_offset.is_empty())?;

        schema.mesh_topology("Topology data of 1D mesh", 1);
        schema.topology_attribute(COORDINATE_SPACE, network_name);

        if data.num_nodes > 0 {
            let nodes = schema.location_dimension("node_dimension", "nNodes", data.num_nodes);
            let mut coordinates = define_branch_position(&mut schema, Location::Node, &nodes).to_vec();
            if !data.node_x.is_empty() && !data.node_y.is_empty() {
                coordinates.extend(define_coordinates(
                    &mut schema,
                    Location::Node,
                    &nodes,
                    "{} of mesh node",
                ));
            }
            schema.role(NODE_COORDINATES, &coordinates);

            schema.link("node_id", "node_id");
            schema
                .variable("node_id", DataType::Char, &[nodes.as_str(), NAME_LENGTH_DIMENSION])
                .attribute(LONG_NAME, "ID of mesh node");
            schema.link("node_long_name", "node_long_name");
            schema
                .variable(
                    "node_long_name",
                    DataType::Char,
                    &[nodes.as_str(), NAME_LONG_LENGTH_DIMENSION],
                )
                .attribute(LONG_NAME, "Long name of mesh node");
        }

        if data.num_edges > 0 {
            let edges = schema.location_dimension("edge_dimension", "nEdges", data.num_edges);
            schema.link(EDGE_NODE_CONNECTIVITY, "edge_nodes");
            schema
                .index_variable("edge_nodes", &[edges.as_str(), TWO_DIMENSION], false)
                .attribute(CF_ROLE, EDGE_NODE_CONNECTIVITY)
                .attribute(LONG_NAME, "Maps every edge to the two node that it connects");

            let mut coordinates = Vec::new();
            if !data.edge_edge_id.is_empty() && !data.edge_edge_offset.is_empty() {
                coordinates.extend(define_branch_position(&mut schema, Location::Edge, &edges));
            }
            if !data.edge_x.is_empty() && !data.edge_y.is_empty() {
                coordinates.extend(define_coordinates(
                    &mut schema,
                    Location::Edge,
                    &edges,
                    "{} of mesh edge",
                ));
            }
            if !coordinates.is_empty() {
                schema.role(EDGE_COORDINATES, &coordinates);
            }
        }

        let variable = schema.apply(store)?;
        Self::from_store(&*store, variable)
    }

    fn put<S: ContainerStore + ?Sized>(
        &self,
        store: &mut S,
        data: &Mesh1DData,
    ) -> Result<(), UgridError> {
        let topology = &self.topology;
        let [branch, offset, x, y] = self.coordinates(&*store, NODE_COORDINATES)?;

        let branch = topology.alias_variable(roles::NODE_EDGE_ID).or(branch);
        put_ints(store, branch, &data.node_edge_id)?;
        put_doubles(store, offset, &data.node_edge_offset)?;
        put_doubles(store, x, &data.node_x)?;
        put_doubles(store, y, &data.node_y)?;
        put_strings(store, topology.alias_variable(roles::NODE_ID), &data.node_id)?;
        put_strings(
            store,
            topology.alias_variable(roles::NODE_LONG_NAME),
            &data.node_long_name,
        )?;

        put_ints(
            store,
            topology.resolved.first(EDGE_NODE_CONNECTIVITY),
            &data.edge_nodes,
        )?;
        let [branch, offset, x, y] = self.coordinates(&*store, EDGE_COORDINATES)?;
        put_ints(store, branch, &data.edge_edge_id)?;
        put_doubles(store, offset, &data.edge_edge_offset)?;
        put_doubles(store, x, &data.edge_x)?;
        put_doubles(store, y, &data.edge_y)?;
        Ok(())
    }

    fn inquire<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        data: &mut Mesh1DData,
    ) -> Result<(), UgridError> {
        data.num_nodes = self.topology.count(store, DimensionRole::Node)?;
        data.num_edges = self.topology.count(store, DimensionRole::Edge)?;
        Ok(())
    }

    fn get<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        data: &mut Mesh1DData,
    ) -> Result<(), UgridError> {
        let topology = &self.topology;
        let reader = Reader {
            store,
            entity: ENTITY,
        };

        data.name.clone_from(&topology.name);
        data.is_spherical = topology.spherical;
        if let Some(network_name) = self.network_name() {
            network_name.clone_into(&mut data.network_name);
        }

        let [branch, offset, x, y] = self.coordinates(store, NODE_COORDINATES)?;
        let branch = topology.alias_variable(roles::NODE_EDGE_ID).or(branch);
        reader.ints("node_edge_id", branch, &mut data.node_edge_id)?;
        reader.doubles("node_edge_offset", offset, &mut data.node_edge_offset)?;
        reader.doubles("node_x", x, &mut data.node_x)?;
        reader.doubles("node_y", y, &mut data.node_y)?;
        reader.strings("node_id", topology.alias_variable(roles::NODE_ID), &mut data.node_id)?;
        reader.strings(
            "node_long_name",
            topology.alias_variable(roles::NODE_LONG_NAME),
            &mut data.node_long_name,
        )?;

        reader.indices(
            "edge_nodes",
            topology.resolved.first(EDGE_NODE_CONNECTIVITY),
            data.start_index,
            data.int_fill_value,
            &mut data.edge_nodes,
        )?;

        let [branch, offset, x, y] = self.coordinates(store, EDGE_COORDINATES)?;
        reader.ints("edge_edge_id", branch, &mut data.edge_edge_id)?;
        reader.doubles("edge_edge_offset", offset, &mut data.edge_edge_offset)?;
        reader.doubles("edge_x", x, &mut data.edge_x)?;
        reader.doubles("edge_y", y, &mut data.edge_y)?;
        Ok(())
    }

    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn collection(entities: &Entities) -> &[Self] {
        &entities.mesh1d
    }

    fn collection_mut(entities: &mut Entities) -> &mut Vec<Self> {
        &mut entities.mesh1d
    }
}

/// Positions of the branch pair and of the x/y pair inside a coordinates role.
///
/// With two variables the pair is the branch position when `has_branch`, x/y otherwise.
fn coordinate_layout(len: usize, has_branch: bool) -> (Option<usize>, Option<usize>) {
    match (len, has_branch) {
        (4.., _) => (Some(0), Some(2)),
        (2..=3, true) => (Some(0), None),
        (2..=3, false) => (None, Some(0)),
        _ => (None, None),
    }
}
