//! Integer-coded enumerations of mesh locations, topology kinds and logical dimensions

use std::fmt;
use std::str::FromStr;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::errors::UgridError;

/// Location on a topology where data can be defined.
///
/// The integer codes are the ones used by other UGRID libraries, so that callers
/// exchanging codes across a language boundary can use [`Location::from_code()`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, FromPrimitive)]
pub enum Location {
    Node = 0,
    Edge = 1,
    Face = 2,
    Layer = 3,
    LayerInterface = 4,
    Vertical = 5,
    Contact = 6,
}

impl Location {
    /// Converts an integer code to a `Location`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::InvalidLocation`] for codes outside `0..=6`.
    pub fn from_code(code: i32) -> Result<Self, UgridError> {
        FromPrimitive::from_i32(code).ok_or_else(|| UgridError::InvalidLocation(code.to_string()))
    }

    /// Name of the location as written in `location` attributes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Node => "node",
            Location::Edge => "edge",
            Location::Face => "face",
            Location::Layer => "layer",
            Location::LayerInterface => "layer_interface",
            Location::Vertical => "vertical",
            Location::Contact => "contact",
        }
    }

    /// Logical dimension holding one entry per element at this location, if any.
    #[must_use]
    pub fn dimension_role(self) -> Option<DimensionRole> {
        match self {
            Location::Node => Some(DimensionRole::Node),
            Location::Edge => Some(DimensionRole::Edge),
            Location::Face => Some(DimensionRole::Face),
            Location::Contact => Some(DimensionRole::Contact),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = UgridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Location::Node),
            "edge" => Ok(Location::Edge),
            "face" => Ok(Location::Face),
            "layer" => Ok(Location::Layer),
            "layer_interface" => Ok(Location::LayerInterface),
            "vertical" => Ok(Location::Vertical),
            "contact" => Ok(Location::Contact),
            other => Err(UgridError::InvalidLocation(other.to_owned())),
        }
    }
}

/// Kind of a UGRID topology held by a file.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, FromPrimitive)]
pub enum TopologyKind {
    Network1D = 0,
    Mesh1D = 1,
    Mesh2D = 2,
    Contacts = 3,
}

impl TopologyKind {
    /// Converts an integer code to a `TopologyKind`.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::InvalidTopologyKind`] for codes outside `0..=3`.
    pub fn from_code(code: i32) -> Result<Self, UgridError> {
        FromPrimitive::from_i32(code).ok_or(UgridError::InvalidTopologyKind(code))
    }
}

/// Closed set of logical dimensions an entity can own.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum DimensionRole {
    Node,
    Edge,
    Face,
    MaxFaceNode,
    Contact,
    GeometryNode,
    Id,
    LongName,
    Two,
}

impl DimensionRole {
    /// Maps the attribute name of a `<location>_dimension` role to its logical dimension.
    pub(crate) fn from_dimension_attribute(attribute_name: &str) -> Option<Self> {
        match attribute_name.strip_suffix("_dimension")? {
            "node" | "nodes" => Some(DimensionRole::Node),
            "edge" | "edges" => Some(DimensionRole::Edge),
            "face" | "faces" => Some(DimensionRole::Face),
            "max_face_node" | "max_face_nodes" => Some(DimensionRole::MaxFaceNode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DimensionRole, Location, TopologyKind};
    use anyhow::Result;

    #[test]
    fn location_codes() -> Result<()> {
        assert_eq!(Location::from_code(0)?, Location::Node);
        assert_eq!(Location::from_code(2)?, Location::Face);
        assert_eq!(Location::from_code(6)?, Location::Contact);
        assert!(Location::from_code(7).is_err());
        assert!(Location::from_code(-1).is_err());

        Ok(())
    }

    #[test]
    fn location_strings() -> Result<()> {
        for location in [Location::Node, Location::Edge, Location::Face] {
            assert_eq!(location.as_str().parse::<Location>()?, location);
        }
        assert!("nodes".parse::<Location>().is_err());

        Ok(())
    }

    #[test]
    fn topology_kind_codes() -> Result<()> {
        assert_eq!(TopologyKind::from_code(3)?, TopologyKind::Contacts);
        assert!(TopologyKind::from_code(4).is_err());

        Ok(())
    }

    #[test]
    fn dimension_attribute_names() {
        assert_eq!(
            DimensionRole::from_dimension_attribute("max_face_nodes_dimension"),
            Some(DimensionRole::MaxFaceNode)
        );
        assert_eq!(
            DimensionRole::from_dimension_attribute("node_dimension"),
            Some(DimensionRole::Node)
        );
        assert_eq!(DimensionRole::from_dimension_attribute("node_coordinates"), None);
        assert_eq!(DimensionRole::from_dimension_attribute("layer_dimension"), None);
    }
}
