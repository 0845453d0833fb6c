//! Definition of errors returned by this crate
//!
//! The crate uses one top-level [`UgridError`] that nests the failures of
//! the container store ([`StoreError`]), of file content this crate can not represent
//! ([`FormatError`]) and of the netCDF library itself.

use thiserror::Error;

use crate::location::TopologyKind;

/// Errors returned by all functions in this crate.
#[derive(Error, Debug)]
pub enum UgridError {
    /// A field that the operation requires is absent or empty.
    /// Raised before any schema mutation happens.
    #[error("{entity}: required field `{field}` is missing")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A role attribute or a named variable could not be resolved in the file.
    #[error("{entity}: `{reference}` can not be resolved")]
    UnresolvedReference { entity: String, reference: String },

    /// The requested topology id does not exist for the given kind.
    #[error("{kind:?} topology id {id} is out of range, the file holds {count}")]
    TopologyOutOfRange {
        kind: TopologyKind,
        id: usize,
        count: usize,
    },

    /// The file handle is not registered (never opened or already closed).
    #[error("File id {0} is not open")]
    UnknownFile(usize),

    /// Integer or string code that does not name a location.
    #[error("`{0}` is not a valid mesh location")]
    InvalidLocation(String),

    /// Integer code that does not name a topology kind.
    #[error("{0} is not a valid topology kind")]
    InvalidTopologyKind(i32),

    /// The `contact` attribute of a contacts topology is not `"<from>: <loc> <to>: <loc>"`.
    #[error("Contact attribute `{0}` is malformed")]
    InvalidContactAttribute(String),

    /// A variable that an entity would define already exists in the file.
    #[error("A variable named `{0}` already exists")]
    NameCollision(String),

    /// Connectivity value read from the file overflows when shifted to the caller's `start_index`.
    #[error("{entity}: `{field}` value {value} overflows with start index {start_index}")]
    IndexOverflow {
        entity: &'static str,
        field: &'static str,
        value: i32,
        start_index: i32,
    },

    /// Supplied buffer length does not match the counts declared for the entity.
    #[error("{entity}: `{field}` holds {actual} values, expected {expected}")]
    LengthMismatch {
        entity: &'static str,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("netCDF library returned an error")]
    NetCdf(#[from] netcdf::Error),

    #[error("Error occured while accessing the file")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "mesh_ndarray")]
    #[error("error occured while converting to ndarray")]
    MeshNdarray(#[from] MeshNdarrayError),
}

impl UgridError {
    /// True for every error caused by the caller's input rather than by the file itself.
    ///
    /// The C-style interface of other UGRID libraries reports all of these as a single
    /// "invalid argument" status.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            UgridError::MissingField { .. }
                | UgridError::UnresolvedReference { .. }
                | UgridError::TopologyOutOfRange { .. }
                | UgridError::UnknownFile(_)
                | UgridError::InvalidLocation(_)
                | UgridError::InvalidTopologyKind(_)
                | UgridError::InvalidContactAttribute(_)
                | UgridError::NameCollision(_)
                | UgridError::LengthMismatch { .. }
        )
    }
}

/// Errors raised by a [`ContainerStore`](crate::store::ContainerStore) implementation.
#[derive(Clone, Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Variable `{0}` not found")]
    VariableNotFound(String),

    #[error("Dimension `{0}` not found")]
    DimensionNotFound(String),

    #[error("Attribute `{0}` not found")]
    AttributeNotFound(String),

    #[error("Invalid variable handle {0}")]
    InvalidVariable(usize),

    #[error("Invalid dimension handle {0}")]
    InvalidDimension(usize),

    #[error("Name `{0}` is already in use")]
    NameInUse(String),

    #[error("Dimension `{name}` already exists with size {existing}, requested {requested}")]
    DimensionSizeConflict {
        name: String,
        existing: usize,
        requested: usize,
    },

    #[error("Variable `{0}` is {1:?}, requested {2:?}")]
    TypeMismatch(String, crate::store::DataType, crate::store::DataType),

    #[error("Variable `{0}` holds more values than can be addressed")]
    ShapeOverflow(String),

    #[error("Variable `{name}` holds {expected} values, got {actual}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Attribute `{0}` has an unexpected type")]
    AttributeType(String),

    #[error("Data can not be written while the file is in define mode")]
    DefineMode,

    #[error("The file is opened read-only")]
    ReadOnly,

    #[error("The store has been closed")]
    Closed,
}

/// File content outside the netCDF classic data model.
#[derive(Clone, Error, Debug, PartialEq)]
pub enum FormatError {
    #[error("Variable `{0}` has a type outside the netCDF classic model")]
    UnsupportedVariableType(String),

    #[error("Attribute `{0}` has a type outside the netCDF classic model")]
    UnsupportedAttributeType(String),
}

#[cfg(feature = "mesh_ndarray")]
#[derive(Error, Debug, PartialEq)]
pub enum MeshNdarrayError {
    #[error("Array holds {0} values, which do not form rows of {1}")]
    UnexpectedValuesLength(usize, usize),

    #[error("Error occured while converting to ndarray: {0}")]
    InvalidShape(#[from] ndarray::ShapeError),
}
