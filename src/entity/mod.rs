//! Definition of the UGRID entity kinds and their common interface
//!
//! Each kind ([`Network1D`], [`Mesh1D`], [`Mesh2D`], [`Contacts`]) is built either
//! from an existing topology variable ([`Entity::from_store()`]) or by allocating
//! a new schema ([`Entity::define()`]). Entities keep only handles into the store,
//! the store itself is passed to every operation.

use fallible_iterator::FallibleIterator;
use log::{debug, warn};

use crate::{
    errors::UgridError,
    location::TopologyKind,
    resolver::TopologyScan,
    store::{ContainerStore, VarId},
};

pub use contacts::{Contacts, ContactsData};
pub use mesh1d::{Mesh1D, Mesh1DData};
pub use mesh2d::{Mesh2D, Mesh2DData};
pub use network1d::{Network1D, Network1DData};
pub use topology::Topology;

mod contacts;
mod coordinates;
mod marshal;
mod mesh1d;
mod mesh2d;
mod network1d;
mod roles;
mod topology;

/// Operations shared by all topology kinds.
///
/// The data type is the caller-side description of the entity: counts, flags and flat
/// arrays. [`put()`](Entity::put) writes only the non-empty arrays and
/// [`get()`](Entity::get) fills only the arrays the caller has sized, usually
/// after [`inquire()`](Entity::inquire) and [`allocate()`](TopologyData::allocate).
pub trait Entity: Sized {
    type Data: TopologyData;

    const KIND: TopologyKind;

    /// Builds the entity from an existing topology variable.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::UnresolvedReference`] or [`UgridError::InvalidContactAttribute`]
    /// when a role the kind requires is absent or malformed.
    fn from_store<S: ContainerStore + ?Sized>(store: &S, variable: VarId)
        -> Result<Self, UgridError>;

    /// Allocates dimensions, variables and attributes for a new entity and leaves define mode.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::MissingField`] or [`UgridError::NameCollision`] before
    /// touching the store when the description is incomplete or clashes with the file.
    fn define<S: ContainerStore + ?Sized>(store: &mut S, data: &Self::Data)
        -> Result<Self, UgridError>;

    /// Writes every non-empty array of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::errors::StoreError) when an array does not fit its variable.
    fn put<S: ContainerStore + ?Sized>(&self, store: &mut S, data: &Self::Data)
        -> Result<(), UgridError>;

    /// Sets the count fields of `data` from the dimension sizes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::errors::StoreError) when the store can not be read.
    fn inquire<S: ContainerStore + ?Sized>(&self, store: &S, data: &mut Self::Data)
        -> Result<(), UgridError>;

    /// Sets the names of `data` and fills every non-empty array.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::LengthMismatch`] when a sized array does not match its variable.
    fn get<S: ContainerStore + ?Sized>(&self, store: &S, data: &mut Self::Data)
        -> Result<(), UgridError>;

    fn topology(&self) -> &Topology;

    fn name(&self) -> &str {
        &self.topology().name
    }

    fn collection(entities: &Entities) -> &[Self];

    fn collection_mut(entities: &mut Entities) -> &mut Vec<Self>;
}

/// Caller-side description of an entity.
pub trait TopologyData: Default {
    /// Sizes every array field from the counts, filled with zeros or empty strings.
    fn allocate(&mut self);
}

/// Entities of one file, indexed by discovery then creation order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entities {
    pub network1d: Vec<Network1D>,
    pub mesh1d: Vec<Mesh1D>,
    pub mesh2d: Vec<Mesh2D>,
    pub contacts: Vec<Contacts>,
}

impl Entities {
    /// Scans the store and builds one entity per topology variable.
    ///
    /// A topology variable that fails construction is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::errors::StoreError) when attributes can not be read.
    pub fn discover<S: ContainerStore + ?Sized>(store: &S) -> Result<Self, UgridError> {
        let mut entities = Self::default();
        let mut scan = TopologyScan::new(store);

        while let Some((variable, kind)) = scan.next()? {
            let added = match kind {
                TopologyKind::Network1D => entities.add_from_store::<Network1D, S>(store, variable),
                TopologyKind::Mesh1D => entities.add_from_store::<Mesh1D, S>(store, variable),
                TopologyKind::Mesh2D => entities.add_from_store::<Mesh2D, S>(store, variable),
                TopologyKind::Contacts => entities.add_from_store::<Contacts, S>(store, variable),
            };

            match added {
                Ok(name) => debug!("Found {kind:?} topology `{name}`"),
                Err(err) => warn!(
                    "Skipping {kind:?} topology `{}`: {err}",
                    store.variable_name(variable).unwrap_or_default()
                ),
            }
        }

        Ok(entities)
    }

    fn add_from_store<E: Entity, S: ContainerStore + ?Sized>(
        &mut self,
        store: &S,
        variable: VarId,
    ) -> Result<String, UgridError> {
        let entity = E::from_store(store, variable)?;
        let name = entity.name().to_owned();
        E::collection_mut(self).push(entity);
        Ok(name)
    }

    #[must_use]
    pub fn count(&self, kind: TopologyKind) -> usize {
        match kind {
            TopologyKind::Network1D => self.network1d.len(),
            TopologyKind::Mesh1D => self.mesh1d.len(),
            TopologyKind::Mesh2D => self.mesh2d.len(),
            TopologyKind::Contacts => self.contacts.len(),
        }
    }

    /// Topology descriptor of the entity `id` of the given kind.
    #[must_use]
    pub fn topology(&self, kind: TopologyKind, id: usize) -> Option<&Topology> {
        match kind {
            TopologyKind::Network1D => self.network1d.get(id).map(Entity::topology),
            TopologyKind::Mesh1D => self.mesh1d.get(id).map(Entity::topology),
            TopologyKind::Mesh2D => self.mesh2d.get(id).map(Entity::topology),
            TopologyKind::Contacts => self.contacts.get(id).map(Entity::topology),
        }
    }
}
