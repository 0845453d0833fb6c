//! Recognition of topology variables and resolution of their role attributes
//!
//! A topology variable carries role attributes whose values are whitespace separated
//! names of other variables (`node_coordinates = "mesh2d_node_x mesh2d_node_y"`) or,
//! for `<location>_dimension` attributes, the name of a dimension.
//! [`resolve()`] turns those attributes into handles, [`TopologyScan`] finds
//! every topology variable of a store.

use std::collections::BTreeMap;

use fallible_iterator::FallibleIterator;

use crate::{
    constants::{CF_ROLE, EDGE_GEOMETRY, MESH_TOPOLOGY_CONTACT, TOPOLOGY_DIMENSION},
    errors::{StoreError, UgridError},
    location::{DimensionRole, Location, TopologyKind},
    store::{AttributeTarget, AttributeValue, ContainerStore, DimId, VarId},
};

/// Attributes of a topology variable resolved against the store content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedTopology {
    /// Role name to the variables it names, in attribute order.
    /// Roles naming no existing variable are absent.
    pub variables: BTreeMap<String, Vec<VarId>>,
    /// Role name to every token of its value, resolved or not.
    pub tokens: BTreeMap<String, Vec<String>>,
    pub dimensions: BTreeMap<DimensionRole, DimId>,
}

impl ResolvedTopology {
    /// Variables of a role, empty when the role is absent.
    #[must_use]
    pub fn role(&self, role: &str) -> &[VarId] {
        self.variables.get(role).map_or(&[], Vec::as_slice)
    }

    /// First variable of a role.
    #[must_use]
    pub fn first(&self, role: &str) -> Option<VarId> {
        self.role(role).first().copied()
    }

    /// Raw tokens of a role, empty when the attribute is absent.
    #[must_use]
    pub fn tokens(&self, role: &str) -> &[String] {
        self.tokens.get(role).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn dimension(&self, role: DimensionRole) -> Option<DimId> {
        self.dimensions.get(&role).copied()
    }
}

/// Decides whether `var` is a topology variable and of which kind.
///
/// - a network has `cf_role` and `edge_geometry`,
/// - a mesh has `cf_role` and `topology_dimension` (1 or 2) but no `edge_geometry`,
/// - contacts have `cf_role = mesh_topology_contact`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidVariable`] for an unknown handle.
pub fn classify<S: ContainerStore + ?Sized>(
    store: &S,
    var: VarId,
) -> Result<Option<TopologyKind>, UgridError> {
    let target = AttributeTarget::Variable(var);

    let Some(cf_role) = store.attribute(target, CF_ROLE)? else {
        return Ok(None);
    };

    if store.attribute(target, EDGE_GEOMETRY)?.is_some() {
        return Ok(Some(TopologyKind::Network1D));
    }

    if let Some(dimension) = store.attribute(target, TOPOLOGY_DIMENSION)? {
        return Ok(match dimension.to_ints().as_deref() {
            Some([1, ..]) => Some(TopologyKind::Mesh1D),
            Some([2, ..]) => Some(TopologyKind::Mesh2D),
            _ => None,
        });
    }

    if cf_role.as_str() == Some(MESH_TOPOLOGY_CONTACT) {
        return Ok(Some(TopologyKind::Contacts));
    }

    Ok(None)
}

/// Resolves the character attributes of `var` into variables, tokens and dimensions.
///
/// Dimensions not declared through a `<location>_dimension` attribute are taken
/// from the shapes of the node coordinate, edge-node and face-node variables.
///
/// # Errors
///
/// Returns [`StoreError`] when the store can not be read.
pub fn resolve<S: ContainerStore + ?Sized>(
    store: &S,
    var: VarId,
) -> Result<ResolvedTopology, UgridError> {
    let mut resolved = ResolvedTopology::default();
    let mut attributes = AttributeIter::new(store, var.into())?;

    while let Some((name, value)) = attributes.next()? {
        let AttributeValue::Str(value) = value else {
            continue;
        };

        if let Some(role) = DimensionRole::from_dimension_attribute(&name) {
            if let Some(dim) = store.dimension(value.trim()) {
                resolved.dimensions.insert(role, dim);
            }
            continue;
        }

        // e.g. the `node_count` of a geometry
        if store.dimension(value.trim()).is_some() {
            continue;
        }

        let tokens: Vec<String> = value.split_whitespace().map(str::to_owned).collect();
        let variables: Vec<VarId> = tokens
            .iter()
            .filter_map(|token| store.variable(token))
            .collect();

        if !variables.is_empty() {
            resolved.variables.insert(name.clone(), variables);
        }
        resolved.tokens.insert(name, tokens);
    }

    let derived = [
        (DimensionRole::Node, "node_coordinates", 0),
        (DimensionRole::Edge, "edge_node_connectivity", 0),
        (DimensionRole::Face, "face_coordinates", 0),
        (DimensionRole::Face, "face_node_connectivity", 0),
        (DimensionRole::MaxFaceNode, "face_node_connectivity", 1),
    ];
    for (role, attribute, axis) in derived {
        if resolved.dimensions.contains_key(&role) {
            continue;
        }
        if let Some(source) = resolved.first(attribute) {
            if let Some(&dim) = store.variable_info(source)?.dimensions.get(axis) {
                resolved.dimensions.insert(role, dim);
            }
        }
    }

    Ok(resolved)
}

/// Names of the data variables defined on `location` of the topology `mesh`,
/// matched through their own `mesh` and `location` attributes.
///
/// # Errors
///
/// Returns [`StoreError`] when the store can not be read.
pub fn data_variables<S: ContainerStore + ?Sized>(
    store: &S,
    mesh: &str,
    location: Location,
) -> Result<Vec<String>, UgridError> {
    let mut names = Vec::new();

    for var in store.variables() {
        let target = AttributeTarget::Variable(var);
        let on_mesh = store.attribute(target, "mesh")?;
        let on_location = store.attribute(target, "location")?;

        if on_mesh.as_ref().and_then(AttributeValue::as_str) == Some(mesh)
            && on_location.as_ref().and_then(AttributeValue::as_str) == Some(location.as_str())
        {
            names.push(store.variable_name(var)?);
        }
    }

    Ok(names)
}

/// Iterator over the topology variables of a store, in variable order.
///
/// Implements [`FallibleIterator`] because reading attributes can fail mid-scan.
///
/// ## Example
///
/// ```
/// use ugrid::resolver::TopologyScan;
/// use ugrid::store::{ContainerStore, DataType, MemoryStore};
/// use ugrid::{FallibleIterator, TopologyKind};
/// # fn main() -> anyhow::Result<()> {
/// let mut store = MemoryStore::new();
/// let mesh = store.add_variable("mesh2d", DataType::Char, &[])?;
/// store.put_attribute(mesh.into(), "cf_role", "mesh_topology".into())?;
/// store.put_attribute(mesh.into(), "topology_dimension", 2_i32.into())?;
///
/// let found: Vec<_> = TopologyScan::new(&store).collect()?;
/// assert_eq!(found, vec![(mesh, TopologyKind::Mesh2D)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TopologyScan<'a, S: ?Sized> {
    store: &'a S,
    variables: std::vec::IntoIter<VarId>,
}

impl<'a, S: ContainerStore + ?Sized> TopologyScan<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            variables: store.variables().into_iter(),
        }
    }
}

impl<S: ContainerStore + ?Sized> FallibleIterator for TopologyScan<'_, S> {
    type Item = (VarId, TopologyKind);
    type Error = UgridError;

    fn next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        for var in self.variables.by_ref() {
            if let Some(kind) = classify(self.store, var)? {
                return Ok(Some((var, kind)));
            }
        }
        Ok(None)
    }
}

/// Iterator over the attributes of a variable or of the file, in definition order.
#[derive(Debug)]
pub struct AttributeIter<'a, S: ?Sized> {
    store: &'a S,
    target: AttributeTarget,
    names: std::vec::IntoIter<String>,
}

impl<'a, S: ContainerStore + ?Sized> AttributeIter<'a, S> {
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVariable`] for an unknown target.
    pub fn new(store: &'a S, target: AttributeTarget) -> Result<Self, UgridError> {
        Ok(Self {
            store,
            target,
            names: store.attribute_names(target)?.into_iter(),
        })
    }
}

impl<S: ContainerStore + ?Sized> FallibleIterator for AttributeIter<'_, S> {
    type Item = (String, AttributeValue);
    type Error = UgridError;

    fn next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        let Some(name) = self.names.next() else {
            return Ok(None);
        };

        let value = self
            .store
            .attribute(self.target, &name)?
            .ok_or_else(|| StoreError::AttributeNotFound(name.clone()))?;

        Ok(Some((name, value)))
    }
}
