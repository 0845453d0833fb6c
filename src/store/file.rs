//! Definition and constructors of `FileStore`
//! used for accessing netCDF classic files on disk

use std::{
    fmt::{self, Debug},
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error};
use netcdf::types::{FloatType, IntType, NcVariableType};

use crate::errors::{FormatError, StoreError, UgridError};

use super::{
    AttributeTarget, AttributeValue, ContainerStore, DataType, DimId, DimensionInfo, MemoryStore,
    OpenMode, VarId, VariableInfo, Values,
};

/// Creation mode of written files: netCDF classic (CDF-1), replacing any existing file.
const CLASSIC_FORMAT: netcdf::Options = netcdf::Options::empty();

/// Container bound to a netCDF classic file, taking full ownership of its content.
///
/// The whole file is loaded into memory on open. Writable stores write the content
/// back to the same path on [`close()`](ContainerStore::close); a store in [`OpenMode::Replace`]
/// also creates the (empty) file immediately, so the path exists while the store is open.
///
/// Destructor for this structure does not panic. A writable store dropped without
/// being closed is written out in the destructor and failures are reported with [`log`].
pub struct FileStore {
    inner: MemoryStore,
    path: PathBuf,
    closed: bool,
}

impl Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("mode", &self.inner.mode())
            .field("closed", &self.closed)
            .finish()
    }
}

impl FileStore {
    /// Opens the file at given [`Path`] in selected [`OpenMode`].
    ///
    /// # Example
    ///
    /// ```
    /// use ugrid::store::{ContainerStore, FileStore, OpenMode};
    /// # fn main() -> anyhow::Result<()> {
    /// let path = std::env::temp_dir().join("ugrid_file_store_doc.nc");
    /// let mut store = FileStore::open(&path, OpenMode::Replace)?;
    /// store.add_dimension("mesh2d_nNodes", 4)?;
    /// store.close()?;
    ///
    /// let store = FileStore::open(&path, OpenMode::Read)?;
    /// assert!(store.dimension("mesh2d_nNodes").is_some());
    /// # std::fs::remove_file(&path)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`UgridError::Io`] when the file does not exist, [`UgridError::NetCdf`] when
    /// the netCDF library can not open or create it and [`UgridError::Format`] when it holds
    /// types outside the classic model.
    pub fn open<P: AsRef<Path> + Debug>(path: P, mode: OpenMode) -> Result<Self, UgridError> {
        let path = path.as_ref().to_path_buf();

        let inner = match mode {
            OpenMode::Read | OpenMode::Write => {
                // netCDF reports a missing file as a generic status
                fs::metadata(&path)?;
                let file = netcdf::open(&path)?;
                load(&file)?.reopen(mode)
            }
            OpenMode::Replace => {
                drop(netcdf::create_with(&path, CLASSIC_FORMAT)?);
                MemoryStore::new()
            }
        };

        debug!("Opened {:?} in {:?} mode", path, mode);
        Ok(Self {
            inner,
            path,
            closed: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the whole content as a new classic file at the store path.
    fn flush(&self) -> Result<(), UgridError> {
        let mut file = netcdf::create_with(&self.path, CLASSIC_FORMAT)?;
        save(&mut file, &self.inner)
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

/// Copies dimensions, variables with their attributes and data, and global attributes
/// of a netCDF file into a new [`MemoryStore`].
fn load(file: &netcdf::File) -> Result<MemoryStore, UgridError> {
    let mut store = MemoryStore::new();

    for dimension in file.dimensions() {
        store.add_dimension(&dimension.name(), dimension.len())?;
    }
    for attribute in file.attributes() {
        store.put_attribute(AttributeTarget::Global, &attribute.name(), from_netcdf(&attribute)?)?;
    }

    let mut data = Vec::new();
    for variable in file.variables() {
        let name = variable.name();
        let data_type = data_type(&variable.vartype())
            .ok_or_else(|| FormatError::UnsupportedVariableType(name.to_string()))?;
        let shape = variable
            .dimensions()
            .iter()
            .map(|dimension| {
                let dimension = dimension.name();
                store
                    .dimension(&dimension)
                    .ok_or_else(|| StoreError::DimensionNotFound(dimension.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let var = store.add_variable(&name, data_type, &shape)?;
        for attribute in variable.attributes() {
            store.put_attribute(var.into(), &attribute.name(), from_netcdf(&attribute)?)?;
        }
        data.push((var, read_values(&variable, data_type)?));
    }

    store.end_define()?;
    for (var, values) in data {
        store.put_values(var, values)?;
    }

    Ok(store)
}

/// Defines the whole schema of `store` in a freshly created file, then writes every
/// variable that holds data. Variables never written are left to the netCDF fill.
fn save(file: &mut netcdf::FileMut, store: &MemoryStore) -> Result<(), UgridError> {
    for dim in store.dimensions() {
        let dimension = store.dimension_info(dim)?;
        file.add_dimension(&dimension.name, dimension.len)?;
    }
    for name in store.attribute_names(AttributeTarget::Global)? {
        if let Some(value) = store.attribute(AttributeTarget::Global, &name)? {
            file.add_attribute(&name, to_netcdf(&value))?;
        }
    }

    for var in store.variables() {
        let info = store.variable_info(var)?;
        let dimensions = info
            .dimensions
            .iter()
            .map(|&dim| Ok(store.dimension_info(dim)?.name))
            .collect::<Result<Vec<_>, UgridError>>()?;
        let dimensions: Vec<&str> = dimensions.iter().map(String::as_str).collect();

        let mut variable =
            file.add_variable_with_type(&info.name, &dimensions, &netcdf_type(info.data_type))?;
        for name in store.attribute_names(var.into())? {
            if let Some(value) = store.attribute(var.into(), &name)? {
                variable.put_attribute(&name, to_netcdf(&value))?;
            }
        }
    }

    for entry in &store.variables {
        let Some(values) = entry.values.as_ref().filter(|values| !values.is_empty()) else {
            continue;
        };
        let mut variable = file
            .variable_mut(&entry.info.name)
            .ok_or_else(|| StoreError::VariableNotFound(entry.info.name.clone()))?;
        write_values(&mut variable, values)?;
    }

    Ok(())
}

fn data_type(vartype: &NcVariableType) -> Option<DataType> {
    match vartype {
        NcVariableType::Int(IntType::I8) => Some(DataType::Byte),
        NcVariableType::Char => Some(DataType::Char),
        NcVariableType::Int(IntType::I16) => Some(DataType::Short),
        NcVariableType::Int(IntType::I32) => Some(DataType::Int),
        NcVariableType::Float(FloatType::F32) => Some(DataType::Float),
        NcVariableType::Float(FloatType::F64) => Some(DataType::Double),
        _ => None,
    }
}

fn netcdf_type(data_type: DataType) -> NcVariableType {
    match data_type {
        DataType::Byte => NcVariableType::Int(IntType::I8),
        DataType::Char => NcVariableType::Char,
        DataType::Short => NcVariableType::Int(IntType::I16),
        DataType::Int => NcVariableType::Int(IntType::I32),
        DataType::Float => NcVariableType::Float(FloatType::F32),
        DataType::Double => NcVariableType::Float(FloatType::F64),
    }
}

fn from_netcdf(attribute: &netcdf::Attribute) -> Result<AttributeValue, UgridError> {
    use netcdf::AttributeValue as Nc;

    Ok(match attribute.value()? {
        Nc::Schar(v) => AttributeValue::Byte(vec![v]),
        Nc::Schars(v) => AttributeValue::Byte(v),
        Nc::Str(v) => AttributeValue::Str(v),
        Nc::Short(v) => AttributeValue::Short(vec![v]),
        Nc::Shorts(v) => AttributeValue::Short(v),
        Nc::Int(v) => AttributeValue::Int(vec![v]),
        Nc::Ints(v) => AttributeValue::Int(v),
        Nc::Float(v) => AttributeValue::Float(vec![v]),
        Nc::Floats(v) => AttributeValue::Float(v),
        Nc::Double(v) => AttributeValue::Double(vec![v]),
        Nc::Doubles(v) => AttributeValue::Double(v),
        _ => {
            return Err(FormatError::UnsupportedAttributeType(attribute.name().to_string()).into())
        }
    })
}

fn to_netcdf(value: &AttributeValue) -> netcdf::AttributeValue {
    use netcdf::AttributeValue as Nc;

    match value {
        AttributeValue::Byte(v) => Nc::Schars(v.clone()),
        AttributeValue::Str(v) => Nc::Str(v.clone()),
        AttributeValue::Short(v) => Nc::Shorts(v.clone()),
        AttributeValue::Int(v) => Nc::Ints(v.clone()),
        AttributeValue::Float(v) => Nc::Floats(v.clone()),
        AttributeValue::Double(v) => Nc::Doubles(v.clone()),
    }
}

fn read_values(variable: &netcdf::Variable, data_type: DataType) -> Result<Values, UgridError> {
    Ok(match data_type {
        DataType::Byte => Values::Byte(variable.get_values::<i8, _>(..)?),
        DataType::Char => Values::Char(variable.get_raw_values(..)?),
        DataType::Short => Values::Short(variable.get_values::<i16, _>(..)?),
        DataType::Int => Values::Int(variable.get_values::<i32, _>(..)?),
        DataType::Float => Values::Float(variable.get_values::<f32, _>(..)?),
        DataType::Double => Values::Double(variable.get_values::<f64, _>(..)?),
    })
}

fn write_values(variable: &mut netcdf::VariableMut, values: &Values) -> Result<(), UgridError> {
    match values {
        Values::Byte(v) => variable.put_values(v, ..)?,
        Values::Char(v) => variable.put_raw_values(v, ..)?,
        Values::Short(v) => variable.put_values(v, ..)?,
        Values::Int(v) => variable.put_values(v, ..)?,
        Values::Float(v) => variable.put_values(v, ..)?,
        Values::Double(v) => variable.put_values(v, ..)?,
    }
    Ok(())
}

impl ContainerStore for FileStore {
    fn mode(&self) -> OpenMode {
        self.inner.mode()
    }

    fn add_dimension(&mut self, name: &str, len: usize) -> Result<DimId, UgridError> {
        self.check_open()?;
        self.inner.add_dimension(name, len)
    }

    fn dimension(&self, name: &str) -> Option<DimId> {
        self.inner.dimension(name)
    }

    fn dimensions(&self) -> Vec<DimId> {
        self.inner.dimensions()
    }

    fn dimension_info(&self, dim: DimId) -> Result<DimensionInfo, UgridError> {
        self.inner.dimension_info(dim)
    }

    fn add_variable(
        &mut self,
        name: &str,
        data_type: DataType,
        dimensions: &[DimId],
    ) -> Result<VarId, UgridError> {
        self.check_open()?;
        self.inner.add_variable(name, data_type, dimensions)
    }

    fn variable(&self, name: &str) -> Option<VarId> {
        self.inner.variable(name)
    }

    fn variables(&self) -> Vec<VarId> {
        self.inner.variables()
    }

    fn variable_info(&self, var: VarId) -> Result<VariableInfo, UgridError> {
        self.inner.variable_info(var)
    }

    fn put_attribute(
        &mut self,
        target: AttributeTarget,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), UgridError> {
        self.check_open()?;
        self.inner.put_attribute(target, name, value)
    }

    fn attribute(
        &self,
        target: AttributeTarget,
        name: &str,
    ) -> Result<Option<AttributeValue>, UgridError> {
        self.inner.attribute(target, name)
    }

    fn attribute_names(&self, target: AttributeTarget) -> Result<Vec<String>, UgridError> {
        self.inner.attribute_names(target)
    }

    fn put_values(&mut self, var: VarId, values: Values) -> Result<(), UgridError> {
        self.check_open()?;
        self.inner.put_values(var, values)
    }

    fn values(&self, var: VarId) -> Result<Values, UgridError> {
        self.check_open()?;
        self.inner.values(var)
    }

    fn end_define(&mut self) -> Result<(), UgridError> {
        self.check_open()?;
        self.inner.end_define()
    }

    /// Writes the content back to the file when the store is writable.
    /// Closing twice is a no-op.
    fn close(&mut self) -> Result<(), UgridError> {
        if self.closed {
            return Ok(());
        }

        self.inner.close()?;
        if self.inner.mode().is_writable() {
            self.flush()?;
        }
        self.closed = true;

        debug!("Closed {:?}", self.path);
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        if self.closed || !self.inner.mode().is_writable() {
            return;
        }

        if let Err(err) = self.flush() {
            error!(
                "FileStore destructor failed to write {:?}: {}",
                self.path, err
            );
        }
    }
}
