//! Constants of the UGRID conventions shared by all topology kinds

/// Width of fixed-width id strings (node ids, branch ids, contact ids).
pub const NAME_LENGTH: usize = 40;

/// Width of fixed-width long name strings.
pub const NAME_LONG_LENGTH: usize = 80;

/// Marks "no integer fill value" when defining variables. Never written to a file.
pub const INT_INVALID: i32 = i32::MAX;

/// Marks "no double fill value" when defining variables. Never written to a file.
pub const DOUBLE_INVALID: f64 = f64::MAX;

/// Default integer `_FillValue`.
pub const INT_MISSING: i32 = -999;

/// Default double `_FillValue`.
pub const DOUBLE_MISSING: f64 = -999.0;

/// Default maximum number of nodes per face.
pub const NUM_FACE_NODES_MAX: usize = 4;

/// `_FillValue` of the contact type variable.
pub const CONTACT_TYPE_FILL: i32 = -1;

pub const TWO_DIMENSION: &str = "Two";
pub const NAME_LENGTH_DIMENSION: &str = "name_length_dimension";
pub const NAME_LONG_LENGTH_DIMENSION: &str = "name_long_length_dimension";

pub const CF_ROLE: &str = "cf_role";
pub const MESH_TOPOLOGY: &str = "mesh_topology";
pub const MESH_TOPOLOGY_CONTACT: &str = "mesh_topology_contact";
pub const TOPOLOGY_DIMENSION: &str = "topology_dimension";
pub const EDGE_GEOMETRY: &str = "edge_geometry";
pub const EDGE_NODE_CONNECTIVITY: &str = "edge_node_connectivity";
pub const FACE_NODE_CONNECTIVITY: &str = "face_node_connectivity";
pub const FACE_EDGE_CONNECTIVITY: &str = "face_edge_connectivity";
pub const FACE_FACE_CONNECTIVITY: &str = "face_face_connectivity";
pub const EDGE_FACE_CONNECTIVITY: &str = "edge_face_connectivity";
pub const START_INDEX: &str = "start_index";
pub const FILL_VALUE: &str = "_FillValue";
pub const LONG_NAME: &str = "long_name";
pub const STANDARD_NAME: &str = "standard_name";
pub const UNITS: &str = "units";

/// `netCDF` default fill values, used for data never written.
pub(crate) mod netcdf_fill {
    pub const BYTE: i8 = -127;
    pub const CHAR: u8 = 0;
    pub const SHORT: i16 = -32767;
    pub const INT: i32 = -2_147_483_647;
    pub const FLOAT: f32 = 9.969_209_968_386_869e36;
    pub const DOUBLE: f64 = 9.969_209_968_386_869e36;
}
