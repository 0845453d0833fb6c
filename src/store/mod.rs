//! Definition of the container store contract and its implementations
//!
//! A container store is a self-describing collection of named dimensions,
//! typed multi-dimensional variables and attributes (the netCDF data model).
//! Everything above this module talks to a store only through [`ContainerStore`].
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`] keeps the whole dataset in memory,
//! - [`FileStore`] binds a [`MemoryStore`] to a netCDF classic file on disk,
//!   loaded through [`netcdf`] on open and written back on [`close()`](ContainerStore::close).

use crate::errors::{StoreError, UgridError};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use read::{AttributeRead, ValuesRead};
pub use values::{AttributeValue, Values};
pub use write::ValuesWrite;

pub(crate) use read::read_strings;
pub(crate) use write::write_strings;

mod file;
mod memory;
mod read;
mod values;
mod write;

/// Handle of a dimension inside one store.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DimId(pub(crate) usize);

/// Handle of a variable inside one store.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct VarId(pub(crate) usize);

impl DimId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl VarId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// External data types of the netCDF classic model.
/// Discriminants are the netCDF type codes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum DataType {
    Byte = 1,
    Char = 2,
    Short = 3,
    Int = 4,
    Float = 5,
    Double = 6,
}

/// Mode in which a store is opened.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum OpenMode {
    /// Existing file, no modification allowed.
    Read,
    /// Existing file, schema and data can be added.
    Write,
    /// New empty file, overwriting any existing one.
    #[default]
    Replace,
}

impl OpenMode {
    #[must_use]
    pub fn is_writable(self) -> bool {
        self != OpenMode::Read
    }
}

/// Owner of an attribute: the file itself or one variable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AttributeTarget {
    Global,
    Variable(VarId),
}

impl From<VarId> for AttributeTarget {
    fn from(var: VarId) -> Self {
        AttributeTarget::Variable(var)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DimensionInfo {
    pub name: String,
    pub len: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    pub data_type: DataType,
    pub dimensions: Vec<DimId>,
}

/// Access to a dimensioned-array container.
///
/// Schema changes (dimensions, variables, attributes) happen in define mode,
/// data is written in data mode. Implementations enter define mode implicitly
/// on the first schema change and leave it on [`end_define()`](ContainerStore::end_define).
pub trait ContainerStore {
    fn mode(&self) -> OpenMode;

    /// Adds a dimension.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NameInUse`] when a dimension of that name exists
    /// and [`StoreError::ReadOnly`] in read mode.
    fn add_dimension(&mut self, name: &str, len: usize) -> Result<DimId, UgridError>;

    fn dimension(&self, name: &str) -> Option<DimId>;

    /// All dimensions in definition order.
    fn dimensions(&self) -> Vec<DimId>;

    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDimension`] for a handle from another store.
    fn dimension_info(&self, dim: DimId) -> Result<DimensionInfo, UgridError>;

    /// Adds a variable with the given shape. An empty shape defines a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NameInUse`] when a variable of that name exists,
    /// [`StoreError::InvalidDimension`] for unknown dimension handles
    /// and [`StoreError::ReadOnly`] in read mode.
    fn add_variable(
        &mut self,
        name: &str,
        data_type: DataType,
        dimensions: &[DimId],
    ) -> Result<VarId, UgridError>;

    fn variable(&self, name: &str) -> Option<VarId>;

    /// All variables in definition order.
    fn variables(&self) -> Vec<VarId>;

    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVariable`] for a handle from another store.
    fn variable_info(&self, var: VarId) -> Result<VariableInfo, UgridError>;

    /// Creates or replaces an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReadOnly`] in read mode and [`StoreError::InvalidVariable`]
    /// for an unknown target.
    fn put_attribute(
        &mut self,
        target: AttributeTarget,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), UgridError>;

    /// Returns `None` when the attribute does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVariable`] for an unknown target.
    fn attribute(
        &self,
        target: AttributeTarget,
        name: &str,
    ) -> Result<Option<AttributeValue>, UgridError>;

    /// Attribute names in definition order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVariable`] for an unknown target.
    fn attribute_names(&self, target: AttributeTarget) -> Result<Vec<String>, UgridError>;

    /// Writes the whole variable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DefineMode`] while in define mode, [`StoreError::TypeMismatch`]
    /// and [`StoreError::ShapeMismatch`] when the values do not fit the variable.
    fn put_values(&mut self, var: VarId, values: Values) -> Result<(), UgridError>;

    /// Reads the whole variable. Values never written read as the fill value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVariable`] for an unknown handle.
    fn values(&self, var: VarId) -> Result<Values, UgridError>;

    /// Leaves define mode.
    ///
    /// # Errors
    ///
    /// Implementations backed by external resources may fail to commit the schema.
    fn end_define(&mut self) -> Result<(), UgridError>;

    /// Leaves define mode and releases the store. Writable file stores persist their content.
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::NetCdf`] when the content can not be written.
    fn close(&mut self) -> Result<(), UgridError>;

    /// Looks up a variable by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VariableNotFound`] when there is none.
    fn require_variable(&self, name: &str) -> Result<VarId, UgridError> {
        self.variable(name)
            .ok_or_else(|| StoreError::VariableNotFound(name.to_owned()).into())
    }

    /// Name of the variable behind a handle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVariable`] for an unknown handle.
    fn variable_name(&self, var: VarId) -> Result<String, UgridError> {
        Ok(self.variable_info(var)?.name)
    }

    /// Sizes of the variable dimensions, outermost first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVariable`] for an unknown handle.
    fn variable_shape(&self, var: VarId) -> Result<Vec<usize>, UgridError> {
        self.variable_info(var)?
            .dimensions
            .into_iter()
            .map(|dim| Ok(self.dimension_info(dim)?.len))
            .collect()
    }

    /// Size of a dimension.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDimension`] for an unknown handle.
    fn dimension_len(&self, dim: DimId) -> Result<usize, UgridError> {
        Ok(self.dimension_info(dim)?.len)
    }
}

/// Number of values a variable of the given shape holds; a scalar holds one.
/// `None` when the count does not fit in `usize`.
pub(crate) fn shape_len(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1_usize, |len, &dim| len.checked_mul(dim))
}
