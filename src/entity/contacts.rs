//! Contacts: index pairs linking the locations of two topologies

use crate::{
    constants::{
        CONTACT_TYPE_FILL, FILL_VALUE, LONG_NAME, NAME_LENGTH_DIMENSION,
        NAME_LONG_LENGTH_DIMENSION,
    },
    errors::UgridError,
    location::{DimensionRole, Location, TopologyKind},
    store::{ContainerStore, DataType, VarId},
    strings,
};

use super::{
    marshal::{put_ints, put_strings, Reader},
    roles::{self, CONTACT, CONTACT_TYPE},
    topology::{Schema, Topology},
    Entities, Entity, TopologyData,
};

const ENTITY: &str = "Contacts";

/// Caller-side description of a set of contacts.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactsData {
    pub name: String,
    /// Index in the `from` topology then index in the `to` topology, per contact.
    pub edges: Vec<i32>,
    pub contact_type: Vec<i32>,
    pub contact_name_id: Vec<String>,
    pub contact_name_long: Vec<String>,
    pub mesh_from_name: String,
    pub mesh_to_name: String,
    pub mesh_from_location: Location,
    pub mesh_to_location: Location,
    pub num_contacts: usize,
    pub start_index: i32,
}

impl Default for ContactsData {
    fn default() -> Self {
        Self {
            name: String::new(),
            edges: Vec::new(),
            contact_type: Vec::new(),
            contact_name_id: Vec::new(),
            contact_name_long: Vec::new(),
            mesh_from_name: String::new(),
            mesh_to_name: String::new(),
            mesh_from_location: Location::Node,
            mesh_to_location: Location::Node,
            num_contacts: 0,
            start_index: 0,
        }
    }
}

impl TopologyData for ContactsData {
    fn allocate(&mut self) {
        self.edges = vec![0; self.num_contacts * 2];
        self.contact_type = vec![0; self.num_contacts];
        self.contact_name_id = vec![String::new(); self.num_contacts];
        self.contact_name_long = vec![String::new(); self.num_contacts];
    }
}

/// A set of contacts. The topology variable itself holds the index pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct Contacts {
    topology: Topology,
    pub mesh_from_name: String,
    pub mesh_to_name: String,
    pub mesh_from_location: Location,
    pub mesh_to_location: Location,
}

/// Splits `"<from>: <location> <to>: <location>"`.
fn parse_contact(tokens: &[String]) -> Result<(String, Location, String, Location), UgridError> {
    let invalid = || UgridError::InvalidContactAttribute(tokens.join(" "));

    let [from, from_location, to, to_location, ..] = tokens else {
        return Err(invalid());
    };
    let name = |token: &str| strings::trim(token.strip_suffix(':').unwrap_or(token)).to_owned();
    let location = |token: &str| token.parse::<Location>().map_err(|_| invalid());

    Ok((
        name(from),
        location(from_location)?,
        name(to),
        location(to_location)?,
    ))
}

impl Entity for Contacts {
    type Data = ContactsData;

    const KIND: TopologyKind = TopologyKind::Contacts;

    fn from_store<S: ContainerStore + ?Sized>(
        store: &S,
        variable: VarId,
    ) -> Result<Self, UgridError> {
        let mut topology = Topology::from_store(store, variable)?;

        let tokens = topology.resolved.tokens(CONTACT);
        if tokens.is_empty() {
            return Err(UgridError::UnresolvedReference {
                entity: topology.name.clone(),
                reference: CONTACT.to_owned(),
            });
        }
        let (mesh_from_name, mesh_from_location, mesh_to_name, mesh_to_location) =
            parse_contact(tokens)?;

        if let Some(&dim) = store.variable_info(variable)?.dimensions.first() {
            topology
                .resolved
                .dimensions
                .insert(DimensionRole::Contact, dim);
        }

        Ok(Self {
            topology,
            mesh_from_name,
            mesh_to_name,
            mesh_from_location,
            mesh_to_location,
        })
    }

    fn define<S: ContainerStore + ?Sized>(
        store: &mut S,
        data: &ContactsData,
    ) -> Result<Self, UgridError> {
        let mut schema = Schema::new(ENTITY, &data.name, data.start_index, false)?;
        let from = strings::trim(&data.mesh_from_name);
        let to = strings::trim(&data.mesh_to_name);
        schema.require("mesh_from_name", !from.is_empty())?;
        schema.require("mesh_to_name", !to.is_empty())?;
        schema.require("num_contacts", data.num_contacts > 0)?;

        let contacts = schema.dimension("nContacts", data.num_contacts);
        schema.contact_topology(&contacts);
        schema.topology_attribute(
            CONTACT,
            format!(
                "{from}: {} {to}: {}",
                data.mesh_from_location, data.mesh_to_location
            ),
        );

        schema.link(CONTACT_TYPE, "contact_type");
        schema
            .variable("contact_type", DataType::Int, &[contacts.as_str()])
            .attribute(FILL_VALUE, CONTACT_TYPE_FILL)
            .attribute("valid_range", vec![3_i32, 4])
            .attribute("flag_values", vec![3_i32, 4])
            .attribute("flag_meanings", "lateral_1d2d_link longitudinal_1d2d_link");

        schema.link("contact_id", "contact_id");
        schema
            .variable(
                "contact_id",
                DataType::Char,
                &[contacts.as_str(), NAME_LENGTH_DIMENSION],
            )
            .attribute(LONG_NAME, "id of the contact");
        schema.link("contact_long_name", "contact_long_name");
        schema
            .variable(
                "contact_long_name",
                DataType::Char,
                &[contacts.as_str(), NAME_LONG_LENGTH_DIMENSION],
            )
            .attribute(LONG_NAME, "long names of the contact");

        let variable = schema.apply(store)?;
        Self::from_store(&*store, variable)
    }

    fn put<S: ContainerStore + ?Sized>(
        &self,
        store: &mut S,
        data: &ContactsData,
    ) -> Result<(), UgridError> {
        let topology = &self.topology;

        put_ints(store, Some(topology.variable), &data.edges)?;
        put_ints(store, topology.resolved.first(CONTACT_TYPE), &data.contact_type)?;
        put_strings(
            store,
            topology.alias_variable(roles::CONTACT_ID),
            &data.contact_name_id,
        )?;
        put_strings(
            store,
            topology.alias_variable(roles::CONTACT_LONG_NAME),
            &data.contact_name_long,
        )
    }

    fn inquire<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        data: &mut ContactsData,
    ) -> Result<(), UgridError> {
        data.num_contacts = self.topology.count(store, DimensionRole::Contact)?;
        Ok(())
    }

    fn get<S: ContainerStore + ?Sized>(
        &self,
        store: &S,
        data: &mut ContactsData,
    ) -> Result<(), UgridError> {
        let topology = &self.topology;
        let reader = Reader {
            store,
            entity: ENTITY,
        };

        data.name.clone_from(&topology.name);
        data.mesh_from_name.clone_from(&self.mesh_from_name);
        data.mesh_to_name.clone_from(&self.mesh_to_name);
        data.mesh_from_location = self.mesh_from_location;
        data.mesh_to_location = self.mesh_to_location;

        // contact indices are returned as stored
        reader.ints("edges", Some(topology.variable), &mut data.edges)?;
        reader.ints(
            "contact_type",
            topology.resolved.first(CONTACT_TYPE),
            &mut data.contact_type,
        )?;
        reader.strings(
            "contact_name_id",
            topology.alias_variable(roles::CONTACT_ID),
            &mut data.contact_name_id,
        )?;
        reader.strings(
            "contact_name_long",
            topology.alias_variable(roles::CONTACT_LONG_NAME),
            &mut data.contact_name_long,
        )
    }

    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn collection(entities: &Entities) -> &[Self] {
        &entities.contacts
    }

    fn collection_mut(entities: &mut Entities) -> &mut Vec<Self> {
        &mut entities.contacts
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_contact, Contacts, ContactsData};
    use crate::entity::{roles, Entity, TopologyData};
    use crate::errors::UgridError;
    use crate::location::Location;
    use crate::store::{AttributeRead, ContainerStore, DataType, MemoryStore};
    use anyhow::Result;

    fn links() -> ContactsData {
        ContactsData {
            name: "2d1dlinks".to_owned(),
            edges: vec![13, 1, 13, 2, 13, 3, 14, 4],
            contact_type: vec![3, 3, 3, 4],
            contact_name_id: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            contact_name_long: vec!["first".into(), "second".into(), "third".into(), "fourth".into()],
            mesh_from_name: "mesh2d".to_owned(),
            mesh_to_name: "1dmesh".to_owned(),
            mesh_from_location: Location::Face,
            mesh_to_location: Location::Node,
            num_contacts: 4,
            start_index: 0,
        }
    }

    #[test]
    fn contacts_round_trip() -> Result<()> {
        let mut store = MemoryStore::new();
        let written = links();

        let contacts = Contacts::define(&mut store, &written)?;
        contacts.put(&mut store, &written)?;

        let topology = store.require_variable("2d1dlinks")?;
        let contact: String = store.read_attribute(topology.into(), "contact")?;
        assert_eq!(contact, "mesh2d: face 1dmesh: node");
        let contact_type = store.require_variable("2d1dlinks_contact_type")?;
        let fill: i32 = store.read_attribute(contact_type.into(), "_FillValue")?;
        assert_eq!(fill, -1);

        let mut read = ContactsData::default();
        contacts.inquire(&store, &mut read)?;
        assert_eq!(read.num_contacts, 4);
        read.start_index = 1;
        read.allocate();
        contacts.get(&store, &mut read)?;

        assert_eq!(read.edges, written.edges);
        assert_eq!(read.contact_type, written.contact_type);
        assert_eq!(read.contact_name_long, written.contact_name_long);
        assert_eq!(read.mesh_from_name, "mesh2d");
        assert_eq!(read.mesh_from_location, Location::Face);
        assert_eq!(read.mesh_to_location, Location::Node);

        Ok(())
    }

    #[test]
    fn contact_id_wins_over_contact_ids() -> Result<()> {
        let mut store = MemoryStore::new();
        let written = links();
        let contacts = Contacts::define(&mut store, &written)?;
        contacts.put(&mut store, &written)?;

        // an older writer also left the plural role on the same topology
        let topology = store.require_variable("2d1dlinks")?;
        let ids = store.require_variable("2d1dlinks_contact_id")?;
        let shape = store.variable_info(ids)?.dimensions;
        let older = store.add_variable("2d1dlinks_old_ids", DataType::Char, &shape)?;
        store.put_attribute(topology.into(), "contact_ids", "2d1dlinks_old_ids".into())?;
        store.end_define()?;
        let width = store.variable_shape(older)?[1];
        store.put_values(older, vec![b'x'; 4 * width].into())?;

        let contacts = Contacts::from_store(&store, topology)?;
        assert_eq!(
            contacts.topology().alias_variable(roles::CONTACT_ID),
            Some(ids)
        );

        let mut read = ContactsData {
            contact_name_id: vec![String::new(); 4],
            ..Default::default()
        };
        contacts.get(&store, &mut read)?;
        assert_eq!(read.contact_name_id, written.contact_name_id);

        // with only the plural role left, it is found through the alias chain
        store.put_attribute(topology.into(), "contact_id", "missing".into())?;
        store.end_define()?;
        let contacts = Contacts::from_store(&store, topology)?;
        assert_eq!(
            contacts.topology().alias_variable(roles::CONTACT_ID),
            Some(older)
        );

        Ok(())
    }

    #[test]
    fn contact_attribute_parsing() {
        let tokens = |value: &str| value.split_whitespace().map(str::to_owned).collect::<Vec<_>>();

        let (from, from_location, to, to_location) =
            parse_contact(&tokens("network: edge mesh2d: face")).unwrap();
        assert_eq!((from.as_str(), from_location), ("network", Location::Edge));
        assert_eq!((to.as_str(), to_location), ("mesh2d", Location::Face));

        assert!(matches!(
            parse_contact(&tokens("network: edge mesh2d:")),
            Err(UgridError::InvalidContactAttribute(_))
        ));
        assert!(matches!(
            parse_contact(&tokens("network: corner mesh2d: face")),
            Err(UgridError::InvalidContactAttribute(_))
        ));
    }

    #[test]
    fn target_names_are_required() -> Result<()> {
        let mut store = MemoryStore::new();
        let err = Contacts::define(
            &mut store,
            &ContactsData {
                mesh_to_name: String::new(),
                ..links()
            },
        )
        .unwrap_err();

        assert!(matches!(
            err,
            UgridError::MissingField {
                field: "mesh_to_name",
                ..
            }
        ));
        assert!(store.variables().is_empty());

        Ok(())
    }
}
