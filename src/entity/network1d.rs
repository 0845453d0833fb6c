//! 1D networks: branches between network nodes, with a polyline geometry per branch

use crate::{
    constants::{
        CF_ROLE, DOUBLE_MISSING, EDGE_GEOMETRY, EDGE_NODE_CONNECTIVITY, INT_MISSING, LONG_NAME,
        NAME_LENGTH_DIMENSION, NAME_LONG_LENGTH_DIMENSION, TWO_DIMENSION,
    },
    errors::UgridError,
    location::{DimensionRole, Location, TopologyKind},
    resolver::{self, ResolvedTopology},
    store::{ContainerStore, DataType, VarId},
};

use super::{
    coordinates::define_coordinates,
    marshal::{put_doubles, put_ints, put_strings, Reader},
    roles::{self, NODE_COORDINATES, PART_NODE_COUNT},
    topology::{Schema, Topology},
    Entities, Entity, TopologyData,
};

const ENTITY: &str = "Network1D";

/// Caller-side description of a 1D network.
///
/// Branch geometries are packed: `num_edge_geometry_nodes[i]` consecutive points of
/// `geometry_nodes_x`/`geometry_nodes_y` belong to branch `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Network1DData {
    pub name: String,
    pub node_x: Vec<f64>,
    pub node_y: Vec<f64>,
    pub node_id: Vec<String>,
    pub node_long_name: Vec<String>,
    /// Start and end node of every branch, flattened `[num_edges, 2]`.
    pub edge_nodes: Vec<i32>,
    pub edge_length: Vec<f64>,
    pub edge_order: Vec<i32>,
    pub edge_type: Vec<i32>,
    pub edge_id: Vec<String>,
    pub edge_long_name: Vec<String>,
    pub geometry_nodes_x: Vec<f64>,
    pub geometry_nodes_y: Vec<f64>,
    pub num_edge_geometry_nodes: Vec<i32>,
    pub num_nodes: usize,
    pub num_edges: usize,
    pub num_geometry_nodes: usize,
    pub is_spherical: bool,
    pub start_index: i32,
    pub int_fill_value: i32,
    pub double_fill_value: f64,
}

impl Default for Network1DData {
    fn default() -> Self {
        Self {
            name: String::new(),
            node_x: Vec::new(),
            node_y: Vec::new(),
            node_id: Vec::new(),
            node_long_name: Vec::new(),
            edge_nodes: Vec::new(),
            edge_length: Vec::new(),
            edge_order: Vec::new(),
            edge_type: Vec::new(),
            edge_id: Vec::new(),
            edge_long_name: Vec::new(),
            geometry_nodes_x: Vec::new(),
            geometry_nodes_y: Vec::new(),
            num_edge_geometry_nodes: Vec::new(),
            num_nodes: 0,
            num_edges: 0,
            num_geometry_nodes: 0,
            is_spherical: false,
            start_index: 0,
            int_fill_value: INT_MISSING,
            double_fill_value: DOUBLE_MISSING,
        }
    }
}

impl TopologyData for Network1DData {
    fn allocate(&mut self) {
        self.node_x = vec![0.0; self.num_nodes];
        self.node_y = vec![0.0; self.num_nodes];
        self.node_id = vec![String::new(); self.num_nodes];
        self.node_long_name = vec![String::new(); self.num_nodes];
        self.edge_nodes = vec![0; self.num_edges * 2];
        self.edge_length = vec![0.0; self.num_edges];
        self.edge_order = vec![0; self.num_edges];
        self.edge_type = vec![0; self.num_edges];
        self.edge_id = vec![String::new(); self.num_edges];
        self.edge_long_name = vec![String::new(); self.num_edges];
        self.geometry_nodes_x = vec![0.0; self.num_geometry_nodes];
        self.geometry_nodes_y = vec![0.0; self.num_geometry_nodes];
        self.num_edge_geometry_nodes = vec![0; self.num_edges];
    }
}

/// A 1D network and its branch geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Network1D {
    topology: Topology,
    /// Variable named by `edge_geometry`, anchor of the geometry roles.
    pub geometry: VarId,
    pub geometry_resolved: ResolvedTopology,
    edge_order: Option<VarId>,
    edge_type: Option<VarId>,
}

impl Network1D {
    fn geometry_coordinate(&self, index: usize) -> Option<VarId> {
        self.geometry_resolved
            .role(NODE_COORDINATES)
            .get(index)
            .copied()
    }
}

impl Entity for Network1D {
    type Data = Network1DData;

    const KIND: TopologyKind = TopologyKind::Network1D;

    fn from_store<S: ContainerStore + ?Sized>(
        store: &S,
        variable: VarId,
    ) -> Result<Self, UgridError> {
        let mut topology = Topology::from_store(store, variable)?;

        let unresolved = |reference: &str| UgridError::UnresolvedReference {
            entity: topology.name.clone(),
            reference: reference.to_owned(),
        };
        let geometry_name = topology
            .resolved
            .tokens(EDGE_GEOMETRY)
            .first()
            .ok_or_else(|| unresolved(EDGE_GEOMETRY))?;
        let geometry = topology
            .resolved
            .first(EDGE_GEOMETRY)
            .ok_or_else(|| unresolved(geometry_name))?;

        let geometry_resolved = resolver::resolve(store, geometry)?;
        if let Some(x) = geometry_resolved.first(NODE_COORDINATES) {
            if let Some(&dim) = store.variable_info(x)?.dimensions.first() {
                topology
                    .resolved
                    .dimensions
                    .insert(DimensionRole::GeometryNode, dim);
            }
        }

        let edge_order = topology.related_variable(store, roles::EDGE_ORDER);
        let edge_type = topology.related_variable(store, roles::EDGE_TYPE);

        Ok(Self {
            topology,
            geometry,
            geometry_resolved,
            edge_order,
            edge_type,
        })
    }

    fn define<S: ContainerStore + ?Sized>(
        store: &mut S,
        data: &Network1DData,
    ) -> Result<Self, UgridError> {
        let mut schema = Schema::new(ENTITY, &data.name, data.start_index, data.is_spherical)?
            .fill_values(data.int_fill_value, data.double_fill_value);
        schema.require("num_nodes", data.num_nodes > 0)?;
        schema.require("node_x", !data.node_x.is_empty())?;
        schema.require("node_y", !data.node_y.is_empty())?;
        schema.require("num_edges", data.num_edges > 0)?;
        schema.require("edge_nodes", !data.edge_nodes.is_empty())?;
        schema.require("num_geometry_nodes", data.num_geometry_nodes > 0)?;
        schema.require("geometry_nodes_x", !data.geometry_nodes_x.is_empty())?;
        schema.require("geometry_nodes_y", !data.geometry_nodes_y.is_empty())?;

        schema.mesh_topology("Topology data of 1D network", 1);
        let name = schema.name().to_owned();

        let nodes = schema.location_dimension("node_dimension", "nNodes", data.num_nodes);
        let coordinates =
            define_coordinates(&mut schema, Location::Node, &nodes, "{} of network node");
        schema.role(NODE_COORDINATES, &coordinates);

        schema.link("node_id", "node_id");
        schema
            .variable("node_id", DataType::Char, &[nodes.as_str(), NAME_LENGTH_DIMENSION])
            .attribute(LONG_NAME, "ID of network node");
        schema.link("node_long_name", "node_long_name");
        schema
            .variable(
                "node_long_name",
                DataType::Char,
                &[nodes.as_str(), NAME_LONG_LENGTH_DIMENSION],
            )
            .attribute(LONG_NAME, "Long name of network node");

        let edges = schema.location_dimension("edge_dimension", "nEdges", data.num_edges);
        schema.link(EDGE_NODE_CONNECTIVITY, "edge_nodes");
        schema
            .index_variable("edge_nodes", &[edges.as_str(), TWO_DIMENSION], false)
            .attribute(CF_ROLE, EDGE_NODE_CONNECTIVITY)
            .attribute(LONG_NAME, "Start and end node of network edge");

        schema.link("edge_length", "edge_length");
        schema
            .variable("edge_length", DataType::Double, &[edges.as_str()])
            .attribute(LONG_NAME, "Real length of branch geometries");

        for (suffix, long_name) in [
            ("edge_order", "Order of branches for interpolation"),
            ("edge_type", "Type of branches"),
        ] {
            schema
                .variable(suffix, DataType::Int, &[edges.as_str()])
                .attribute(LONG_NAME, long_name)
                .attribute("mesh", name.as_str())
                .attribute("location", Location::Edge.as_str());
        }

        schema.link("edge_id", "edge_id");
        schema
            .variable("edge_id", DataType::Char, &[edges.as_str(), NAME_LENGTH_DIMENSION])
            .attribute(LONG_NAME, "ID of branch geometries");
        schema.link("edge_long_name", "edge_long_name");
        schema
            .variable(
                "edge_long_name",
                DataType::Char,
                &[edges.as_str(), NAME_LONG_LENGTH_DIMENSION],
            )
            .attribute(LONG_NAME, "Long name of branch geometries");

        let geometry_nodes = schema.dimension("nGeometryNodes", data.num_geometry_nodes);
        let part_node_count = schema.prefixed("geom_part_node_count");
        let geometry_coordinates = [schema.prefixed("geom_x"), schema.prefixed("geom_y")].join(" ");
        schema.link(EDGE_GEOMETRY, "geometry");
        schema
            .variable("geometry", DataType::Int, &[])
            .attribute("geometry_type", "multiline")
            .attribute(LONG_NAME, "1D Geometry")
            .attribute("node_count", geometry_nodes.as_str())
            .attribute(PART_NODE_COUNT, part_node_count)
            .attribute(NODE_COORDINATES, geometry_coordinates);
        schema
            .variable("geom_part_node_count", DataType::Int, &[edges.as_str()])
            .attribute("node_count", geometry_nodes.as_str())
            .attribute(LONG_NAME, "Number of geometry node per branch");
        for (suffix, long_name) in [
            ("geom_x", "x-coordinate of branch geometry node"),
            ("geom_y", "y-coordinate of branch geometry node"),
        ] {
            schema
                .variable(suffix, DataType::Double, &[geometry_nodes.as_str()])
                .attribute(LONG_NAME, long_name);
        }

        let variable = schema.apply(store)?;
        Self::from_store(&*store, variable)
    }

    fn put<S: ContainerStore + ?Sized>(
        &self,
        store: &mut S,
        data: &Network1DData,
    ) -> Result<(), UgridError> {
        let topology = &self.topology;

        put_doubles(store, topology.role_variable(NODE_COORDINATES, 0), &data.node_x)?;
        put_doubles(store, topology.role_variable(NODE_COORDINATES, 1), &data.node_y)?;
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
        put_doubles(
            store,
            topology.alias_variable(roles::EDGE_LENGTH),
            &data.edge_length,
        )?;
        put_ints(store, self.edge_order, &data.edge_order)?;
        put_ints(store, self.edge_type, &data.edge_type)?;
        put_strings(store, topology.alias_variable(roles::EDGE_ID), &data.edge_id)?;
        put_strings(
            store,
            topology.alias_variable(roles::EDGE_LONG_NAME),
            &data.edge_long_name,
        )?;

        put_doubles(store, self.geometry_coordinate(0), &data.geometry_nodes_x)?;
        put_doubles(store, self.geometry_coordinate(1), &data.geometry_nodes_y)?;
        put_ints(
            store,
            self.geometry_resolved.first(PART_NODE_COUNT),
            &data.num_edge_geometry_nodes,
        )
    }

    fn inquire<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        data: &mut Network1DData,
    ) -> Result<(), UgridError> {
        data.num_nodes = self.topology.count(store, DimensionRole::Node)?;
        data.num_edges = self.topology.count(store, DimensionRole::Edge)?;
        data.num_geometry_nodes = self.topology.count(store, DimensionRole::GeometryNode)?;
        Ok(())
    }

    fn get<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        data: &mut Network1DData,
    ) -> Result<(), UgridError> {
        let topology = &self.topology;
        let reader = Reader {
            store,
            entity: ENTITY,
        };

        data.name.clone_from(&topology.name);
        data.is_spherical = topology.spherical;

        reader.doubles("node_x", topology.role_variable(NODE_COORDINATES, 0), &mut data.node_x)?;
        reader.doubles("node_y", topology.role_variable(NODE_COORDINATES, 1), &mut data.node_y)?;
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
        reader.doubles(
            "edge_length",
            topology.alias_variable(roles::EDGE_LENGTH),
            &mut data.edge_length,
        )?;
        reader.ints("edge_order", self.edge_order, &mut data.edge_order)?;
        reader.ints("edge_type", self.edge_type, &mut data.edge_type)?;
        reader.strings("edge_id", topology.alias_variable(roles::EDGE_ID), &mut data.edge_id)?;
        reader.strings(
            "edge_long_name",
            topology.alias_variable(roles::EDGE_LONG_NAME),
            &mut data.edge_long_name,
        )?;

        reader.doubles(
            "geometry_nodes_x",
            self.geometry_coordinate(0),
            &mut data.geometry_nodes_x,
        )?;
        reader.doubles(
            "geometry_nodes_y",
            self.geometry_coordinate(1),
            &mut data.geometry_nodes_y,
        )?;
        reader.ints(
            "num_edge_geometry_nodes",
            self.geometry_resolved.first(PART_NODE_COUNT),
            &mut data.num_edge_geometry_nodes,
        )
    }

    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn collection(entities: &Entities) -> &[Self] {
        &entities.network1d
    }

    fn collection_mut(entities: &mut Entities) -> &mut Vec<Self> {
        &mut entities.network1d
    }
}

#[cfg(test)]
mod tests {
    use super::{Network1D, Network1DData};
    use crate::entity::{Entity, TopologyData};
    use crate::errors::UgridError;
    use crate::store::{AttributeRead, AttributeTarget, ContainerStore, MemoryStore};
    use anyhow::Result;

    fn branches() -> Network1DData {
        Network1DData {
            name: "network".to_owned(),
            node_x: vec![293.78, 538.89, 1_074.19],
            node_y: vec![27.48, 956.75, 213.27],
            node_id: vec!["node_1".into(), "node_2".into(), "node_3".into()],
            node_long_name: vec!["first".into(), "second".into(), "third".into()],
            edge_nodes: vec![0, 1, 1, 2],
            edge_length: vec![1_165.29, 980.21],
            edge_order: vec![1, 2],
            edge_type: vec![0, 0],
            edge_id: vec!["branch_1".into(), "branch_2".into()],
            edge_long_name: vec!["upstream".into(), "downstream".into()],
            geometry_nodes_x: vec![293.78, 400.0, 538.89, 800.0, 1_074.19],
            geometry_nodes_y: vec![27.48, 500.0, 956.75, 600.0, 213.27],
            num_edge_geometry_nodes: vec![3, 2],
            num_nodes: 3,
            num_edges: 2,
            num_geometry_nodes: 5,
            ..Default::default()
        }
    }

    #[test]
    fn network_round_trip() -> Result<()> {
        let mut store = MemoryStore::new();
        let written = branches();

        let network = Network1D::define(&mut store, &written)?;
        network.put(&mut store, &written)?;

        let mut read = Network1DData::default();
        network.inquire(&store, &mut read)?;
        assert_eq!(read.num_nodes, 3);
        assert_eq!(read.num_edges, 2);
        assert_eq!(read.num_geometry_nodes, 5);

        read.allocate();
        network.get(&store, &mut read)?;

        assert_eq!(read.name, "network");
        assert_eq!(read.node_id, written.node_id);
        assert_eq!(read.edge_long_name, written.edge_long_name);
        assert_eq!(read.edge_nodes, written.edge_nodes);
        assert_eq!(read.edge_order, written.edge_order);
        assert_eq!(read.num_edge_geometry_nodes, written.num_edge_geometry_nodes);
        for (a, b) in read.geometry_nodes_y.iter().zip(&written.geometry_nodes_y) {
            float_cmp::assert_approx_eq!(f64, *a, *b, epsilon = 0.000_1);
        }

        let geometry = store.require_variable("network_geometry")?;
        let node_count: String =
            store.read_attribute(AttributeTarget::Variable(geometry), "node_count")?;
        assert_eq!(node_count, "network_nGeometryNodes");

        Ok(())
    }

    #[test]
    fn edge_nodes_shift_by_start_index() -> Result<()> {
        let mut store = MemoryStore::new();
        let written = Network1DData {
            start_index: 1,
            ..branches()
        };

        let network = Network1D::define(&mut store, &written)?;
        network.put(&mut store, &written)?;
        assert_eq!(network.topology().start_index, 1);

        let mut read = Network1DData {
            num_edges: 2,
            start_index: 1,
            ..Default::default()
        };
        read.allocate();
        network.get(&store, &mut read)?;

        // stored as given, shifted on read
        assert_eq!(read.edge_nodes, vec![1, 2, 2, 3]);

        Ok(())
    }

    #[test]
    fn geometry_is_required() -> Result<()> {
        let mut store = MemoryStore::new();
        let incomplete = Network1DData {
            geometry_nodes_x: Vec::new(),
            ..branches()
        };

        let err = Network1D::define(&mut store, &incomplete).unwrap_err();
        assert!(matches!(
            err,
            UgridError::MissingField {
                field: "geometry_nodes_x",
                ..
            }
        ));
        assert!(store.variables().is_empty());

        Ok(())
    }

    #[test]
    fn dangling_edge_geometry() -> Result<()> {
        let mut store = MemoryStore::new();
        let network = store.add_variable("network", crate::store::DataType::Char, &[])?;
        store.put_attribute(network.into(), "cf_role", "mesh_topology".into())?;
        store.put_attribute(network.into(), "edge_geometry", "network_geometry".into())?;

        let err = Network1D::from_store(&store, network).unwrap_err();
        assert!(matches!(
            err,
            UgridError::UnresolvedReference { reference, .. } if reference == "network_geometry"
        ));

        Ok(())
    }
}
