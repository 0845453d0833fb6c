//! Definition of the `Topology` descriptor shared by all entity kinds
//! and of the schema planner used to define new entities

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::{
    constants::{
        CF_ROLE, DOUBLE_INVALID, FILL_VALUE, INT_INVALID, LONG_NAME, MESH_TOPOLOGY,
        MESH_TOPOLOGY_CONTACT, NAME_LENGTH, NAME_LENGTH_DIMENSION, NAME_LONG_LENGTH,
        NAME_LONG_LENGTH_DIMENSION, START_INDEX, STANDARD_NAME, TOPOLOGY_DIMENSION, TWO_DIMENSION,
    },
    errors::{StoreError, UgridError},
    location::DimensionRole,
    resolver::{self, ResolvedTopology},
    store::{AttributeTarget, AttributeValue, ContainerStore, DataType, DimId, VarId},
    strings,
};

/// Descriptor of one topology inside a file.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    /// Name of the topology variable, right-trimmed.
    pub name: String,
    pub variable: VarId,
    pub resolved: ResolvedTopology,
    /// Coordinates are longitude/latitude instead of projected x/y.
    pub spherical: bool,
    /// Index base declared in the file, 0 when absent.
    pub start_index: i32,
}

impl Topology {
    pub(crate) fn from_store<S: ContainerStore + ?Sized>(
        store: &S,
        variable: VarId,
    ) -> Result<Self, UgridError> {
        let name = strings::trim(&store.variable_name(variable)?).to_owned();
        let mut resolved = resolver::resolve(store, variable)?;

        for (role, dimension) in [
            (DimensionRole::Id, NAME_LENGTH_DIMENSION),
            (DimensionRole::LongName, NAME_LONG_LENGTH_DIMENSION),
            (DimensionRole::Two, TWO_DIMENSION),
        ] {
            if let Some(dim) = store.dimension(dimension) {
                resolved.dimensions.entry(role).or_insert(dim);
            }
        }

        let start_index = store
            .attribute(variable.into(), START_INDEX)?
            .and_then(|value| value.to_ints())
            .and_then(|values| values.first().copied())
            .unwrap_or(0);

        let mut spherical = false;
        for &coordinate in resolved.role("node_coordinates") {
            if store
                .attribute(coordinate.into(), STANDARD_NAME)?
                .is_some_and(|value| value.as_str() == Some("longitude"))
            {
                spherical = true;
                break;
            }
        }

        Ok(Self {
            name,
            variable,
            resolved,
            spherical,
            start_index,
        })
    }

    /// Variable at `index` of a role.
    #[must_use]
    pub fn role_variable(&self, role: &str, index: usize) -> Option<VarId> {
        self.resolved.role(role).get(index).copied()
    }

    /// First variable of the first alias that resolved.
    #[must_use]
    pub fn alias_variable(&self, aliases: &[&str]) -> Option<VarId> {
        aliases
            .iter()
            .find_map(|alias| self.resolved.first(alias))
    }

    #[must_use]
    pub fn dimension(&self, role: DimensionRole) -> Option<DimId> {
        self.resolved.dimension(role)
    }

    /// Size of a logical dimension, 0 when the entity has no such dimension.
    pub(crate) fn count<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        role: DimensionRole,
    ) -> Result<usize, UgridError> {
        match self.dimension(role) {
            Some(dim) => store.dimension_len(dim),
            None => Ok(0),
        }
    }

    /// Variable named `<name>_<suffix>` for the first suffix present in the store.
    pub(crate) fn related_variable<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        suffixes: &[&str],
    ) -> Option<VarId> {
        suffixes
            .iter()
            .find_map(|suffix| store.variable(&format!("{}_{suffix}", self.name)))
    }
}

#[derive(Clone, Debug)]
struct PlannedDimension {
    name: String,
    len: usize,
    shared: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct PlannedVariable {
    name: String,
    data_type: DataType,
    dimensions: Vec<String>,
    attributes: Vec<(String, AttributeValue)>,
}

impl PlannedVariable {
    pub(crate) fn attribute(
        &mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> &mut Self {
        self.attributes.push((name.to_owned(), value.into()));
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

/// Schema of a new entity, built completely in memory and validated against
/// the store before anything is written.
#[derive(Clone, Debug)]
pub(crate) struct Schema {
    entity: &'static str,
    name: String,
    pub(crate) spherical: bool,
    start_index: i32,
    int_fill: Option<i32>,
    double_fill: Option<f64>,
    dimensions: Vec<PlannedDimension>,
    topology: PlannedVariable,
    variables: Vec<PlannedVariable>,
}

impl Schema {
    /// # Errors
    ///
    /// Returns [`UgridError::MissingField`] for an empty name.
    pub(crate) fn new(
        entity: &'static str,
        name: &str,
        start_index: i32,
        spherical: bool,
    ) -> Result<Self, UgridError> {
        let name = strings::trim(name);
        if name.is_empty() {
            return Err(UgridError::MissingField {
                entity,
                field: "name",
            });
        }

        Ok(Self {
            entity,
            name: name.to_owned(),
            spherical,
            start_index,
            int_fill: None,
            double_fill: None,
            dimensions: Vec::new(),
            topology: PlannedVariable {
                name: name.to_owned(),
                data_type: DataType::Char,
                dimensions: Vec::new(),
                attributes: Vec::new(),
            },
            variables: Vec::new(),
        })
    }

    /// Fill values written as `_FillValue`; the invalid sentinels disable them.
    pub(crate) fn fill_values(mut self, int_fill: i32, double_fill: f64) -> Self {
        self.int_fill = (int_fill != INT_INVALID).then_some(int_fill);
        // exact comparison against the sentinel
        #[allow(clippy::float_cmp)]
        let has_double = double_fill != DOUBLE_INVALID;
        self.double_fill = has_double.then_some(double_fill);
        self
    }

    /// # Errors
    ///
    /// Returns [`UgridError::MissingField`] naming `field` when `present` is false.
    pub(crate) fn require(&self, field: &'static str, present: bool) -> Result<(), UgridError> {
        if present {
            Ok(())
        } else {
            Err(UgridError::MissingField {
                entity: self.entity,
                field,
            })
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn prefixed(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.name)
    }

    fn shared_dimensions(&mut self) {
        for (name, len) in [
            (TWO_DIMENSION, 2),
            (NAME_LENGTH_DIMENSION, NAME_LENGTH),
            (NAME_LONG_LENGTH_DIMENSION, NAME_LONG_LENGTH),
        ] {
            self.dimensions.push(PlannedDimension {
                name: name.to_owned(),
                len,
                shared: true,
            });
        }
    }

    /// Character topology variable of a mesh or network.
    pub(crate) fn mesh_topology(&mut self, long_name: &str, topology_dimension: i32) {
        self.shared_dimensions();
        self.topology.data_type = DataType::Char;
        self.topology
            .attribute(CF_ROLE, MESH_TOPOLOGY)
            .attribute(LONG_NAME, long_name)
            .attribute(TOPOLOGY_DIMENSION, topology_dimension);
        self.start_index_attribute(true);
    }

    /// Integer `[contacts, Two]` topology variable of a contacts entity.
    pub(crate) fn contact_topology(&mut self, contacts: &str) {
        self.shared_dimensions();
        self.topology.data_type = DataType::Int;
        self.topology.dimensions = vec![contacts.to_owned(), TWO_DIMENSION.to_owned()];
        self.topology.attribute(CF_ROLE, MESH_TOPOLOGY_CONTACT);
        self.start_index_attribute(true);
    }

    fn start_index_attribute(&mut self, on_topology: bool) {
        if self.start_index == 0 {
            return;
        }
        let start_index = self.start_index;
        let target = if on_topology {
            &mut self.topology
        } else {
            match self.variables.last_mut() {
                Some(variable) => variable,
                None => return,
            }
        };
        target.attribute(START_INDEX, start_index);
    }

    pub(crate) fn topology_attribute(&mut self, name: &str, value: impl Into<AttributeValue>) {
        self.topology.attribute(name, value);
    }

    /// Role attribute naming `variables`, space separated.
    pub(crate) fn role<T: AsRef<str>>(&mut self, role: &str, variables: &[T]) {
        let joined = variables
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        self.topology.attribute(role, joined);
    }

    /// Role attribute naming the single variable `<name>_<suffix>`.
    pub(crate) fn link(&mut self, role: &str, suffix: &str) {
        let name = self.prefixed(suffix);
        self.topology.attribute(role, name);
    }

    /// Dimension `<name>_<suffix>`, returns its full name.
    pub(crate) fn dimension(&mut self, suffix: &str, len: usize) -> String {
        let name = self.prefixed(suffix);
        self.dimensions.push(PlannedDimension {
            name: name.clone(),
            len,
            shared: false,
        });
        name
    }

    /// Dimension `<name>_<suffix>` declared on the topology through `attribute`.
    pub(crate) fn location_dimension(&mut self, attribute: &str, suffix: &str, len: usize) -> String {
        let name = self.dimension(suffix, len);
        self.topology.attribute(attribute, name.as_str());
        name
    }

    /// Variable `<name>_<suffix>` over the named dimensions.
    pub(crate) fn variable(
        &mut self,
        suffix: &str,
        data_type: DataType,
        dimensions: &[&str],
    ) -> &mut PlannedVariable {
        let name = self.prefixed(suffix);
        self.variables.push(PlannedVariable {
            name,
            data_type,
            dimensions: dimensions.iter().map(|&d| d.to_owned()).collect(),
            attributes: Vec::new(),
        });
        let last = self.variables.len() - 1;
        &mut self.variables[last]
    }

    /// Integer index variable carrying the entity `start_index`, with the int fill when `filled`.
    pub(crate) fn index_variable(
        &mut self,
        suffix: &str,
        dimensions: &[&str],
        filled: bool,
    ) -> &mut PlannedVariable {
        let int_fill = self.int_fill;
        self.variable(suffix, DataType::Int, dimensions);
        self.start_index_attribute(false);

        let last = self.variables.len() - 1;
        let variable = &mut self.variables[last];
        if let (true, Some(fill)) = (filled, int_fill) {
            variable.attribute(FILL_VALUE, fill);
        }
        variable
    }

    /// Double variable with the double fill.
    pub(crate) fn double_variable(&mut self, suffix: &str, dimensions: &[&str]) -> &mut PlannedVariable {
        let double_fill = self.double_fill;
        let variable = self.variable(suffix, DataType::Double, dimensions);
        if let Some(fill) = double_fill {
            variable.attribute(FILL_VALUE, fill);
        }
        variable
    }

    /// Checks every name against the store, then writes the schema and leaves define mode.
    ///
    /// A store failure after validation is not rolled back.
    pub(crate) fn apply<S: ContainerStore + ?Sized>(self, store: &mut S) -> Result<VarId, UgridError> {
        self.validate(store)?;
        debug!(
            "Defining {} `{}` with {} variables",
            self.entity,
            self.name,
            self.variables.len() + 1
        );

        let mut dimensions = BTreeMap::new();
        for dimension in &self.dimensions {
            let id = match store.dimension(&dimension.name) {
                Some(id) => id,
                None => store.add_dimension(&dimension.name, dimension.len)?,
            };
            dimensions.insert(dimension.name.clone(), id);
        }

        let mut topology = None;
        for planned in std::iter::once(&self.topology).chain(&self.variables) {
            let shape = planned
                .dimensions
                .iter()
                .map(|name| {
                    dimensions
                        .get(name)
                        .copied()
                        .ok_or_else(|| StoreError::DimensionNotFound(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let var = store.add_variable(&planned.name, planned.data_type, &shape)?;
            for (name, value) in &planned.attributes {
                store.put_attribute(AttributeTarget::Variable(var), name, value.clone())?;
            }
            topology.get_or_insert(var);
        }

        store.end_define()?;
        topology.ok_or_else(|| StoreError::VariableNotFound(self.name.clone()).into())
    }

    fn validate<S: ContainerStore + ?Sized>(&self, store: &S) -> Result<(), UgridError> {
        if !store.mode().is_writable() {
            return Err(StoreError::ReadOnly.into());
        }

        let mut planned = BTreeSet::new();
        for dimension in &self.dimensions {
            if !planned.insert(dimension.name.as_str()) && !dimension.shared {
                return Err(UgridError::NameCollision(dimension.name.clone()));
            }
            match store.dimension(&dimension.name) {
                Some(id) if dimension.shared => {
                    let existing = store.dimension_len(id)?;
                    if existing != dimension.len {
                        return Err(StoreError::DimensionSizeConflict {
                            name: dimension.name.clone(),
                            existing,
                            requested: dimension.len,
                        }
                        .into());
                    }
                }
                Some(_) => return Err(UgridError::NameCollision(dimension.name.clone())),
                None => {}
            }
        }

        let mut planned = BTreeSet::new();
        for variable in std::iter::once(&self.topology).chain(&self.variables) {
            if !planned.insert(variable.name.as_str()) || store.variable(&variable.name).is_some() {
                return Err(UgridError::NameCollision(variable.name.clone()));
            }
            if let Some(missing) = variable
                .dimensions
                .iter()
                .find(|name| !self.dimensions.iter().any(|d| &d.name == *name))
            {
                return Err(StoreError::DimensionNotFound(missing.clone()).into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Schema;
    use crate::errors::{StoreError, UgridError};
    use crate::store::{AttributeRead, ContainerStore, DataType, MemoryStore};
    use anyhow::Result;

    #[test]
    fn schema_reuses_shared_dimensions() -> Result<()> {
        let mut store = MemoryStore::new();

        for name in ["first", "second"] {
            let mut schema = Schema::new("Mesh2D", name, 1, false)?.fill_values(-999, -999.0);
            schema.mesh_topology("Topology data of 2D mesh", 2);
            let edges = schema.location_dimension("edge_dimension", "nEdges", 3);
            schema.index_variable("edge_nodes", &[edges.as_str(), "Two"], false);
            schema.apply(&mut store)?;
        }

        assert_eq!(store.dimensions().len(), 5);
        let edge_nodes = store.require_variable("second_edge_nodes")?;
        let start_index: i32 = store.read_attribute(edge_nodes.into(), "start_index")?;
        assert_eq!(start_index, 1);
        assert!(!store.in_define_mode());

        Ok(())
    }

    #[test]
    fn schema_validates_before_writing() -> Result<()> {
        let mut store = MemoryStore::new();
        store.add_dimension("Two", 3)?;
        store.add_variable("taken_node_x", DataType::Double, &[])?;

        let err = Schema::new("Mesh2D", "  ", 0, false).unwrap_err();
        assert!(matches!(
            err,
            UgridError::MissingField { field: "name", .. }
        ));

        let mut schema = Schema::new("Mesh2D", "mesh", 0, false)?;
        schema.mesh_topology("Topology data of 2D mesh", 2);
        let err = schema.apply(&mut store).unwrap_err();
        assert!(matches!(
            err,
            UgridError::Store(StoreError::DimensionSizeConflict { existing: 3, requested: 2, .. })
        ));

        let mut schema = Schema::new("Network1D", "taken", 0, false)?;
        schema.variable("node_x", DataType::Double, &[]);
        let err = schema.apply(&mut store).unwrap_err();
        assert!(matches!(err, UgridError::NameCollision(name) if name == "taken_node_x"));

        // nothing was added by the rejected schemas
        assert_eq!(store.dimensions().len(), 1);
        assert_eq!(store.variables().len(), 1);

        Ok(())
    }
}
