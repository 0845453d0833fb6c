//! Definition of the [`Registry`] owning open stores and their entities
//!
//! Every store attached to a registry is addressed through an opaque [`FileId`].
//! The registry keeps, per file, the entities discovered on attach or created later,
//! indexed by kind in discovery then creation order. That index is the topology id
//! taken by the per-entity operations.

use std::{collections::BTreeMap, fmt::Debug, path::Path};

use fallible_iterator::FallibleIterator;
use log::debug;

use crate::{
    entity::{Entities, Entity, Topology},
    errors::{StoreError, UgridError},
    location::{Location, TopologyKind},
    resolver::{self, AttributeIter},
    store::{
        read_strings, AttributeTarget, AttributeValue, ContainerStore, DataType, DimId, FileStore,
        OpenMode, ValuesRead, VarId,
    },
    strings,
};

/// Opaque identifier of a file attached to a [`Registry`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct FileId(usize);

impl FileId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct FileEntry<S> {
    store: S,
    entities: Entities,
    /// Dimensions added for data variables, not tied to any topology.
    dimensions: BTreeMap<String, DimId>,
}

/// Attributes of a projected coordinate reference system variable.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedCoordinateSystem {
    pub name: String,
    pub epsg: i32,
    pub grid_mapping_name: String,
    pub longitude_of_prime_meridian: f64,
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub inverse_flattening: f64,
    pub proj4_params: String,
    pub epsg_code: String,
    pub projection_name: String,
    pub wkt: String,
}

impl Default for ProjectedCoordinateSystem {
    fn default() -> Self {
        Self {
            name: "Unknown projected".to_owned(),
            epsg: 0,
            grid_mapping_name: "Unknown projected".to_owned(),
            longitude_of_prime_meridian: 0.0,
            semi_major_axis: 6_378_137.0,
            semi_minor_axis: 6_356_752.314_245,
            inverse_flattening: 298.257_223_563,
            proj4_params: String::new(),
            epsg_code: "EPSG:0".to_owned(),
            projection_name: String::new(),
            wkt: String::new(),
        }
    }
}

/// Owner of open stores and of the entities found or created in them.
///
/// The registry owns each store exclusively. Entities hold only handles,
/// so every operation goes through the registry to reach the store.
///
/// # Example
///
/// ```
/// use ugrid::{Mesh2D, Mesh2DData, Registry, TopologyData, TopologyKind};
/// use ugrid::store::MemoryStore;
/// # fn main() -> anyhow::Result<()> {
/// let mut registry = Registry::new();
/// let file = registry.attach(MemoryStore::new())?;
///
/// let written = Mesh2DData {
///     name: "mesh2d".to_owned(),
///     node_x: vec![0.0, 1.0, 1.0],
///     node_y: vec![0.0, 0.0, 1.0],
///     edge_nodes: vec![0, 1, 1, 2, 2, 0],
///     num_nodes: 3,
///     num_edges: 3,
///     ..Mesh2DData::default()
/// };
/// let id = registry.define::<Mesh2D>(file, &written)?;
/// registry.put::<Mesh2D>(file, id, &written)?;
/// assert_eq!(registry.topology_count(file, TopologyKind::Mesh2D)?, 1);
///
/// let mut read = Mesh2DData::default();
/// registry.inquire::<Mesh2D>(file, id, &mut read)?;
/// read.allocate();
/// registry.get::<Mesh2D>(file, id, &mut read)?;
/// assert_eq!(read.edge_nodes, written.edge_nodes);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Registry<S = FileStore> {
    files: BTreeMap<FileId, FileEntry<S>>,
    next_id: usize,
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self {
            files: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl Registry<FileStore> {
    /// Opens the netCDF classic file at `path` and attaches it.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::Io`], [`UgridError::NetCdf`] or [`UgridError::Format`]
    /// when the file can not be opened.
    pub fn open<P: AsRef<Path> + Debug>(
        &mut self,
        path: P,
        mode: OpenMode,
    ) -> Result<FileId, UgridError> {
        let store = FileStore::open(path, mode)?;
        self.attach(store)
    }
}

impl<S: ContainerStore> Registry<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `store` and discovers the topologies it holds.
    /// A store in [`OpenMode::Replace`] starts without entities.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::errors::StoreError) when the store can not be scanned.
    pub fn attach(&mut self, store: S) -> Result<FileId, UgridError> {
        let entities = if store.mode() == OpenMode::Replace {
            Entities::default()
        } else {
            Entities::discover(&store)?
        };

        let file = FileId(self.next_id);
        self.next_id += 1;

        debug!(
            "Attached file {} with {} topologies",
            file.0,
            [
                TopologyKind::Network1D,
                TopologyKind::Mesh1D,
                TopologyKind::Mesh2D,
                TopologyKind::Contacts
            ]
            .iter()
            .map(|&kind| entities.count(kind))
            .sum::<usize>()
        );

        self.files.insert(
            file,
            FileEntry {
                store,
                entities,
                dimensions: BTreeMap::new(),
            },
        );
        Ok(file)
    }

    /// Forgets the file and closes its store. Writable file stores persist their content.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] for an id not attached and any error of
    /// [`ContainerStore::close()`].
    pub fn close(&mut self, file: FileId) -> Result<(), UgridError> {
        let mut entry = self
            .files
            .remove(&file)
            .ok_or(UgridError::UnknownFile(file.0))?;
        debug!("Closing file {}", file.0);
        entry.store.close()
    }

    /// Forgets the file and hands its store back without closing it.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] for an id not attached.
    pub fn detach(&mut self, file: FileId) -> Result<S, UgridError> {
        self.files
            .remove(&file)
            .map(|entry| entry.store)
            .ok_or(UgridError::UnknownFile(file.0))
    }

    fn entry(&self, file: FileId) -> Result<&FileEntry<S>, UgridError> {
        self.files.get(&file).ok_or(UgridError::UnknownFile(file.0))
    }

    fn entry_mut(&mut self, file: FileId) -> Result<&mut FileEntry<S>, UgridError> {
        self.files
            .get_mut(&file)
            .ok_or(UgridError::UnknownFile(file.0))
    }

    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] for an id not attached.
    pub fn store(&self, file: FileId) -> Result<&S, UgridError> {
        Ok(&self.entry(file)?.store)
    }

    /// Mutable access to the store. Topologies created through it are not registered.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] for an id not attached.
    pub fn store_mut(&mut self, file: FileId) -> Result<&mut S, UgridError> {
        Ok(&mut self.entry_mut(file)?.store)
    }

    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] for an id not attached.
    pub fn entities(&self, file: FileId) -> Result<&Entities, UgridError> {
        Ok(&self.entry(file)?.entities)
    }

    /// Number of topologies of `kind` in the file.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] for an id not attached.
    pub fn topology_count(&self, file: FileId, kind: TopologyKind) -> Result<usize, UgridError> {
        Ok(self.entities(file)?.count(kind))
    }

    /// Descriptor of the topology `id` of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] or [`UgridError::TopologyOutOfRange`].
    pub fn topology(
        &self,
        file: FileId,
        kind: TopologyKind,
        id: usize,
    ) -> Result<&Topology, UgridError> {
        topology_of(&self.entry(file)?.entities, kind, id)
    }

    /// The entity `id` of kind `E`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] or [`UgridError::TopologyOutOfRange`].
    pub fn entity<E: Entity>(&self, file: FileId, id: usize) -> Result<&E, UgridError> {
        lookup(&self.entry(file)?.entities, id)
    }

    /// Defines a new entity of kind `E` and returns its topology id.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] and any error of [`Entity::define()`].
    pub fn define<E: Entity>(&mut self, file: FileId, data: &E::Data) -> Result<usize, UgridError> {
        let entry = self.entry_mut(file)?;
        let entity = E::define(&mut entry.store, data)?;

        let collection = E::collection_mut(&mut entry.entities);
        collection.push(entity);
        Ok(collection.len() - 1)
    }

    /// Writes the arrays of `data` to the entity `id`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`], [`UgridError::TopologyOutOfRange`]
    /// and any error of [`Entity::put()`].
    pub fn put<E: Entity>(
        &mut self,
        file: FileId,
        id: usize,
        data: &E::Data,
    ) -> Result<(), UgridError> {
        let FileEntry {
            store, entities, ..
        } = self.entry_mut(file)?;
        lookup::<E>(entities, id)?.put(store, data)
    }

    /// Sets the counts of `data` from the entity `id`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] or [`UgridError::TopologyOutOfRange`].
    pub fn inquire<E: Entity>(
        &self,
        file: FileId,
        id: usize,
        data: &mut E::Data,
    ) -> Result<(), UgridError> {
        let entry = self.entry(file)?;
        lookup::<E>(&entry.entities, id)?.inquire(&entry.store, data)
    }

    /// Fills the sized arrays of `data` from the entity `id`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`], [`UgridError::TopologyOutOfRange`]
    /// and any error of [`Entity::get()`].
    pub fn get<E: Entity>(
        &self,
        file: FileId,
        id: usize,
        data: &mut E::Data,
    ) -> Result<(), UgridError> {
        let entry = self.entry(file)?;
        lookup::<E>(&entry.entities, id)?.get(&entry.store, data)
    }

    /// Names of the variables defined on `location` of the topology `id` of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] or [`UgridError::TopologyOutOfRange`].
    pub fn data_variables(
        &self,
        file: FileId,
        kind: TopologyKind,
        id: usize,
        location: Location,
    ) -> Result<Vec<String>, UgridError> {
        let entry = self.entry(file)?;
        let topology = topology_of(&entry.entities, kind, id)?;
        resolver::data_variables(&entry.store, &topology.name, location)
    }

    /// Adds a double variable shaped `[dimension_name, <location dimension>]` to a topology.
    ///
    /// The extra dimension is created on first use and reused by name afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnresolvedReference`] when the topology has no dimension
    /// for `location`, [`UgridError::MissingField`] for a blank variable or dimension name
    /// and [`UgridError::NameCollision`] when the variable exists. Nothing is defined on error.
    #[allow(clippy::too_many_arguments)]
    pub fn define_double_variable_on_location(
        &mut self,
        file: FileId,
        kind: TopologyKind,
        id: usize,
        location: Location,
        variable_name: &str,
        dimension_name: &str,
        dimension_len: usize,
    ) -> Result<VarId, UgridError> {
        let entry = self.entry_mut(file)?;
        let topology = topology_of(&entry.entities, kind, id)?;

        let mesh = topology.name.clone();
        let location_dimension = location
            .dimension_role()
            .and_then(|role| topology.dimension(role))
            .ok_or_else(|| UgridError::UnresolvedReference {
                entity: mesh.clone(),
                reference: location.to_string(),
            })?;
        let coordinates = topology
            .resolved
            .tokens(&format!("{location}_coordinates"))
            .join(" ");

        let variable_name = strings::trim(variable_name);
        let dimension_name = strings::trim(dimension_name);
        for (field, value) in [
            ("variable_name", variable_name),
            ("dimension_name", dimension_name),
        ] {
            if value.is_empty() {
                return Err(UgridError::MissingField {
                    entity: "data variable",
                    field,
                });
            }
        }
        if !entry.store.mode().is_writable() {
            return Err(StoreError::ReadOnly.into());
        }
        if entry.store.variable(variable_name).is_some() {
            return Err(UgridError::NameCollision(variable_name.to_owned()));
        }

        let extra = match entry
            .dimensions
            .get(dimension_name)
            .copied()
            .or_else(|| entry.store.dimension(dimension_name))
        {
            Some(dim) => dim,
            None => entry.store.add_dimension(dimension_name, dimension_len)?,
        };
        let store = &mut entry.store;
        let var = store.add_variable(
            variable_name,
            DataType::Double,
            &[extra, location_dimension],
        )?;
        entry.dimensions.insert(dimension_name.to_owned(), extra);
        store.put_attribute(var.into(), "mesh", mesh.into())?;
        store.put_attribute(var.into(), "location", location.as_str().into())?;
        store.put_attribute(var.into(), "coordinates", coordinates.into())?;
        store.end_define()?;

        debug!("Defined `{variable_name}` on {location} of {kind:?} topology {id}");
        Ok(var)
    }

    fn variable(&self, file: FileId, name: &str) -> Result<VarId, UgridError> {
        self.store(file)?.require_variable(strings::trim(name))
    }

    /// # Errors
    ///
    /// Returns [`UgridError::UnknownFile`] for an id not attached.
    pub fn variable_exists(&self, file: FileId, name: &str) -> Result<bool, UgridError> {
        Ok(self.store(file)?.variable(strings::trim(name)).is_some())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable.
    pub fn attribute_count(&self, file: FileId, variable: &str) -> Result<usize, UgridError> {
        Ok(self.attribute_names(file, variable)?.len())
    }

    /// Attribute names of a variable in definition order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable.
    pub fn attribute_names(&self, file: FileId, variable: &str) -> Result<Vec<String>, UgridError> {
        let var = self.variable(file, variable)?;
        self.store(file)?.attribute_names(var.into())
    }

    /// Attribute values of a variable rendered as strings, numbers joined by spaces.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable.
    pub fn attribute_values(
        &self,
        file: FileId,
        variable: &str,
    ) -> Result<Vec<String>, UgridError> {
        let var = self.variable(file, variable)?;
        AttributeIter::new(self.store(file)?, var.into())?
            .map(|(_, value)| Ok(value.to_string()))
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable.
    pub fn dimension_count(&self, file: FileId, variable: &str) -> Result<usize, UgridError> {
        Ok(self.dimension_sizes(file, variable)?.len())
    }

    /// Sizes of the dimensions of a variable, outermost first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable.
    pub fn dimension_sizes(&self, file: FileId, variable: &str) -> Result<Vec<usize>, UgridError> {
        let var = self.variable(file, variable)?;
        self.store(file)?.variable_shape(var)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable and [`StoreError::TypeMismatch`](crate::errors::StoreError::TypeMismatch)
    /// for a non numeric one.
    pub fn doubles(&self, file: FileId, variable: &str) -> Result<Vec<f64>, UgridError> {
        let var = self.variable(file, variable)?;
        self.store(file)?.read_values(var)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable and [`StoreError::TypeMismatch`](crate::errors::StoreError::TypeMismatch)
    /// for a non integer one.
    pub fn ints(&self, file: FileId, variable: &str) -> Result<Vec<i32>, UgridError> {
        let var = self.variable(file, variable)?;
        self.store(file)?.read_values(var)
    }

    /// Reads a character variable as trimmed strings, one per row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable and [`StoreError::TypeMismatch`](crate::errors::StoreError::TypeMismatch)
    /// for a non character one.
    pub fn strings(&self, file: FileId, variable: &str) -> Result<Vec<String>, UgridError> {
        let var = self.variable(file, variable)?;
        read_strings(self.store(file)?, var)
    }

    /// Defines a scalar integer variable, typically a container for metadata attributes.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::NameCollision`] when the variable exists.
    pub fn define_int_variable(&mut self, file: FileId, name: &str) -> Result<VarId, UgridError> {
        let name = strings::trim(name);
        let store = self.store_mut(file)?;
        if store.variable(name).is_some() {
            return Err(UgridError::NameCollision(name.to_owned()));
        }

        let var = store.add_variable(name, DataType::Int, &[])?;
        store.end_define()?;
        Ok(var)
    }

    /// Creates or replaces an attribute of a named variable.
    ///
    /// Accepts text, integers and doubles, single or as slices.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`](crate::errors::StoreError::VariableNotFound)
    /// for an unknown variable.
    pub fn define_variable_attribute<V: Into<AttributeValue>>(
        &mut self,
        file: FileId,
        variable: &str,
        name: &str,
        value: V,
    ) -> Result<(), UgridError> {
        let var = self.variable(file, variable)?;
        let store = self.store_mut(file)?;
        store.put_attribute(var.into(), strings::trim(name), value.into())?;
        store.end_define()
    }

    /// Creates or replaces a global text attribute such as `Conventions`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReadOnly`](crate::errors::StoreError::ReadOnly) in read mode.
    pub fn define_global_attribute(
        &mut self,
        file: FileId,
        name: &str,
        value: &str,
    ) -> Result<(), UgridError> {
        let store = self.store_mut(file)?;
        store.put_attribute(AttributeTarget::Global, strings::trim(name), value.into())?;
        store.end_define()
    }

    /// Defines a `projected_coordinate_system` variable carrying `crs`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::NameCollision`] when the variable exists.
    pub fn define_projected_coordinate_system(
        &mut self,
        file: FileId,
        crs: &ProjectedCoordinateSystem,
    ) -> Result<VarId, UgridError> {
        let var = self.define_int_variable(file, "projected_coordinate_system")?;

        let attributes: [(&str, AttributeValue); 11] = [
            ("name", crs.name.as_str().into()),
            ("epsg", crs.epsg.into()),
            ("grid_mapping_name", crs.grid_mapping_name.as_str().into()),
            (
                "longitude_of_prime_meridian",
                crs.longitude_of_prime_meridian.into(),
            ),
            ("semi_major_axis", crs.semi_major_axis.into()),
            ("semi_minor_axis", crs.semi_minor_axis.into()),
            ("inverse_flattening", crs.inverse_flattening.into()),
            ("proj4_params", crs.proj4_params.as_str().into()),
            ("EPSG_code", crs.epsg_code.as_str().into()),
            ("projection_name", crs.projection_name.as_str().into()),
            ("wkt", crs.wkt.as_str().into()),
        ];

        let store = self.store_mut(file)?;
        for (name, value) in attributes {
            store.put_attribute(var.into(), name, value)?;
        }
        store.put_attribute(var.into(), "value", "value is equal to EPSG code".into())?;
        store.end_define()?;

        Ok(var)
    }
}

fn lookup<E: Entity>(entities: &Entities, id: usize) -> Result<&E, UgridError> {
    let collection = E::collection(entities);
    collection
        .get(id)
        .ok_or(UgridError::TopologyOutOfRange {
            kind: E::KIND,
            id,
            count: collection.len(),
        })
}

fn topology_of(
    entities: &Entities,
    kind: TopologyKind,
    id: usize,
) -> Result<&Topology, UgridError> {
    entities
        .topology(kind, id)
        .ok_or(UgridError::TopologyOutOfRange {
            kind,
            id,
            count: entities.count(kind),
        })
}

#[cfg(test)]
mod tests {
    use super::{ProjectedCoordinateSystem, Registry};
    use crate::entity::{Contacts, ContactsData, Mesh2D, Mesh2DData, TopologyData};
    use crate::errors::{StoreError, UgridError};
    use crate::location::{Location, TopologyKind};
    use crate::store::{ContainerStore, MemoryStore, OpenMode};
    use anyhow::Result;

    fn triangle() -> Mesh2DData {
        Mesh2DData {
            name: "mesh2d".to_owned(),
            node_x: vec![0.0, 1.0, 0.0],
            node_y: vec![0.0, 0.0, 1.0],
            edge_nodes: vec![0, 1, 1, 2, 2, 0],
            face_nodes: vec![0, 1, 2],
            face_x: vec![0.3],
            face_y: vec![0.3],
            num_nodes: 3,
            num_edges: 3,
            num_faces: 1,
            num_face_nodes_max: 3,
            ..Mesh2DData::default()
        }
    }

    #[test]
    fn unknown_ids_fail_before_entities() -> Result<()> {
        let mut registry = Registry::<MemoryStore>::new();
        let file = registry.attach(MemoryStore::new())?;

        let mut data = Mesh2DData::default();
        let err = registry.inquire::<Mesh2D>(file, 0, &mut data).unwrap_err();
        assert!(matches!(
            err,
            UgridError::TopologyOutOfRange {
                kind: TopologyKind::Mesh2D,
                id: 0,
                count: 0
            }
        ));

        registry.close(file)?;
        assert!(matches!(
            registry.topology_count(file, TopologyKind::Mesh2D),
            Err(UgridError::UnknownFile(0))
        ));
        assert!(matches!(registry.close(file), Err(UgridError::UnknownFile(0))));

        Ok(())
    }

    #[test]
    fn detach_then_attach_rediscovers() -> Result<()> {
        let mut registry = Registry::<MemoryStore>::new();
        let file = registry.attach(MemoryStore::new())?;

        let written = triangle();
        let id = registry.define::<Mesh2D>(file, &written)?;
        registry.put::<Mesh2D>(file, id, &written)?;
        let links = registry.define::<Contacts>(
            file,
            &ContactsData {
                name: "links".to_owned(),
                mesh_from_name: "mesh2d".to_owned(),
                mesh_to_name: "mesh2d".to_owned(),
                num_contacts: 1,
                ..ContactsData::default()
            },
        )?;
        assert_eq!((id, links), (0, 0));

        let store = registry.detach(file)?.reopen(OpenMode::Read);
        let file = registry.attach(store)?;
        assert_eq!(file.index(), 1);
        assert_eq!(registry.topology_count(file, TopologyKind::Mesh2D)?, 1);
        assert_eq!(registry.topology_count(file, TopologyKind::Contacts)?, 1);
        assert_eq!(registry.topology(file, TopologyKind::Mesh2D, 0)?.name, "mesh2d");

        let mut read = Mesh2DData::default();
        registry.inquire::<Mesh2D>(file, 0, &mut read)?;
        read.allocate();
        registry.get::<Mesh2D>(file, 0, &mut read)?;
        assert_eq!(read.face_nodes, written.face_nodes);

        Ok(())
    }

    #[test]
    fn variable_on_location() -> Result<()> {
        let mut registry = Registry::<MemoryStore>::new();
        let file = registry.attach(MemoryStore::new())?;
        let id = registry.define::<Mesh2D>(file, &triangle())?;

        registry.define_double_variable_on_location(
            file,
            TopologyKind::Mesh2D,
            id,
            Location::Face,
            "mesh2d_water_level",
            "nTimes",
            5,
        )?;
        registry.define_double_variable_on_location(
            file,
            TopologyKind::Mesh2D,
            id,
            Location::Face,
            "mesh2d_velocity",
            "nTimes",
            5,
        )?;

        assert_eq!(registry.dimension_sizes(file, "mesh2d_water_level")?, vec![5, 1]);
        assert_eq!(
            registry.data_variables(file, TopologyKind::Mesh2D, id, Location::Face)?,
            vec!["mesh2d_water_level", "mesh2d_velocity"]
        );
        assert_eq!(
            registry.attribute_values(file, "mesh2d_velocity")?,
            vec!["mesh2d", "face", "mesh2d_face_x mesh2d_face_y"]
        );

        let err = registry
            .define_double_variable_on_location(
                file,
                TopologyKind::Mesh2D,
                id,
                Location::Face,
                "mesh2d_velocity",
                "nTimes",
                5,
            )
            .unwrap_err();
        assert!(matches!(err, UgridError::NameCollision(_)));

        let dimensions = registry.store(file)?.dimensions().len();
        let err = registry
            .define_double_variable_on_location(
                file,
                TopologyKind::Mesh2D,
                id,
                Location::Face,
                "  ",
                "nLayers",
                3,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            UgridError::MissingField {
                field: "variable_name",
                ..
            }
        ));
        // the rejected definition leaves no dimension behind
        assert_eq!(registry.store(file)?.dimensions().len(), dimensions);
        assert!(registry.store(file)?.dimension("nLayers").is_none());

        Ok(())
    }

    #[test]
    fn metadata_variables() -> Result<()> {
        let mut registry = Registry::<MemoryStore>::new();
        let file = registry.attach(MemoryStore::new())?;

        registry.define_global_attribute(file, "Conventions", "CF-1.8 UGRID-1.0")?;
        registry.define_projected_coordinate_system(file, &ProjectedCoordinateSystem::default())?;
        registry.define_variable_attribute(
            file,
            "projected_coordinate_system",
            "epsg",
            28992_i32,
        )?;

        assert!(registry.variable_exists(file, "projected_coordinate_system")?);
        assert_eq!(registry.attribute_count(file, "projected_coordinate_system")?, 12);
        let names = registry.attribute_names(file, "projected_coordinate_system")?;
        let values = registry.attribute_values(file, "projected_coordinate_system")?;
        let epsg = names.iter().position(|name| name == "epsg");
        assert_eq!(epsg.map(|index| values[index].as_str()), Some("28992"));
        assert_eq!(registry.dimension_count(file, "projected_coordinate_system")?, 0);

        let err = registry
            .define_variable_attribute(file, "missing", "units", "m")
            .unwrap_err();
        assert!(matches!(
            err,
            UgridError::Store(StoreError::VariableNotFound(_))
        ));
        assert!(registry.store(file)?.variable("missing").is_none());

        Ok(())
    }
}
