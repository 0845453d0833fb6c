//! Role names of the topology attributes, with the aliases used by older files
//!
//! Every list starts with the preferred name; lookups try each name in order
//! and the first role that resolved wins.

pub(crate) const NODE_ID: &[&str] = &["node_id", "node_ids"];
pub(crate) const NODE_LONG_NAME: &[&str] = &["node_long_name", "node_long_names"];
pub(crate) const EDGE_ID: &[&str] = &["edge_id", "branch_id", "branch_ids"];
pub(crate) const EDGE_LONG_NAME: &[&str] =
    &["branch_long_name", "branch_long_names", "edge_long_name"];
pub(crate) const CONTACT_ID: &[&str] = &["contact_id", "contact_ids"];
pub(crate) const CONTACT_LONG_NAME: &[&str] = &["contact_long_name", "contact_long_names"];
pub(crate) const EDGE_LENGTH: &[&str] = &["edge_length", "branch_length", "branch_lengths"];
pub(crate) const NODE_EDGE_ID: &[&str] = &["branch_id", "branch_ids", "edge_id", "node_edge_id"];

// Variables linked to a topology by name only, `<name>_<suffix>`.
pub(crate) const EDGE_ORDER: &[&str] = &["edge_order", "branch_order"];
pub(crate) const EDGE_TYPE: &[&str] = &["edge_type", "branch_type"];

pub(crate) const NODE_COORDINATES: &str = "node_coordinates";
pub(crate) const EDGE_COORDINATES: &str = "edge_coordinates";
pub(crate) const FACE_COORDINATES: &str = "face_coordinates";
pub(crate) const PART_NODE_COUNT: &str = "part_node_count";
pub(crate) const CONTACT_TYPE: &str = "contact_type";
pub(crate) const CONTACT: &str = "contact";
pub(crate) const COORDINATE_SPACE: &str = "coordinate_space";
