//! Definition of `MemoryStore`, the in-memory container

use crate::{
    constants::FILL_VALUE,
    errors::{StoreError, UgridError},
};

use super::{
    shape_len, AttributeTarget, AttributeValue, ContainerStore, DataType, DimId, DimensionInfo,
    OpenMode, VarId, VariableInfo, Values,
};

/// Container keeping the whole dataset in memory.
///
/// Follows the netCDF define/data phase rules: any schema change puts the store in
/// define mode, data can only be written after [`end_define()`](ContainerStore::end_define).
/// A store in [`OpenMode::Read`] rejects every modification.
///
/// ```
/// use ugrid::store::{ContainerStore, DataType, MemoryStore, ValuesRead, ValuesWrite};
/// # fn main() -> anyhow::Result<()> {
/// let mut store = MemoryStore::new();
/// let nodes = store.add_dimension("mesh2d_nNodes", 3)?;
/// let x = store.add_variable("mesh2d_node_x", DataType::Double, &[nodes])?;
/// store.end_define()?;
///
/// store.write_values(x, &[0.0, 1.0, 2.0][..])?;
/// let read: Vec<f64> = store.read_values(x)?;
/// assert_eq!(read, vec![0.0, 1.0, 2.0]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    pub(crate) mode: OpenMode,
    pub(crate) define_mode: bool,
    pub(crate) dimensions: Vec<DimensionInfo>,
    pub(crate) variables: Vec<VariableEntry>,
    pub(crate) global_attributes: Vec<(String, AttributeValue)>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct VariableEntry {
    pub(crate) info: VariableInfo,
    pub(crate) attributes: Vec<(String, AttributeValue)>,
    pub(crate) values: Option<Values>,
}

impl MemoryStore {
    /// Creates an empty store in [`OpenMode::Replace`], in define mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: OpenMode::Replace,
            define_mode: true,
            ..Self::default()
        }
    }

    /// Reopens the same content in another mode, starting in data mode.
    #[must_use]
    pub fn reopen(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self.define_mode = false;
        self
    }

    #[must_use]
    pub fn in_define_mode(&self) -> bool {
        self.define_mode
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.mode.is_writable() {
            Ok(())
        } else {
            Err(StoreError::ReadOnly)
        }
    }

    fn entry(&self, var: VarId) -> Result<&VariableEntry, StoreError> {
        self.variables
            .get(var.0)
            .ok_or(StoreError::InvalidVariable(var.0))
    }

    fn attributes(
        &self,
        target: AttributeTarget,
    ) -> Result<&Vec<(String, AttributeValue)>, StoreError> {
        match target {
            AttributeTarget::Global => Ok(&self.global_attributes),
            AttributeTarget::Variable(var) => Ok(&self.entry(var)?.attributes),
        }
    }

    fn attributes_mut(
        &mut self,
        target: AttributeTarget,
    ) -> Result<&mut Vec<(String, AttributeValue)>, StoreError> {
        match target {
            AttributeTarget::Global => Ok(&mut self.global_attributes),
            AttributeTarget::Variable(var) => self
                .variables
                .get_mut(var.0)
                .map(|entry| &mut entry.attributes)
                .ok_or(StoreError::InvalidVariable(var.0)),
        }
    }

    pub(crate) fn shape(&self, info: &VariableInfo) -> Result<Vec<usize>, StoreError> {
        info.dimensions
            .iter()
            .map(|dim| {
                self.dimensions
                    .get(dim.0)
                    .map(|d| d.len)
                    .ok_or(StoreError::InvalidDimension(dim.0))
            })
            .collect()
    }

    /// Values of an entry, materializing the fill value for data never written.
    pub(crate) fn entry_values(&self, entry: &VariableEntry) -> Result<Values, StoreError> {
        if let Some(values) = &entry.values {
            return Ok(values.clone());
        }

        let len = shape_len(&self.shape(&entry.info)?)
            .ok_or_else(|| StoreError::ShapeOverflow(entry.info.name.clone()))?;
        let fill = entry
            .attributes
            .iter()
            .find(|(name, _)| name == FILL_VALUE)
            .map(|(_, value)| value);

        Ok(Values::filled(entry.info.data_type, len, fill))
    }
}

impl ContainerStore for MemoryStore {
    fn mode(&self) -> OpenMode {
        self.mode
    }

    fn add_dimension(&mut self, name: &str, len: usize) -> Result<DimId, UgridError> {
        self.check_writable()?;
        if self.dimension(name).is_some() {
            return Err(StoreError::NameInUse(name.to_owned()).into());
        }

        self.define_mode = true;
        self.dimensions.push(DimensionInfo {
            name: name.to_owned(),
            len,
        });

        Ok(DimId(self.dimensions.len() - 1))
    }

    fn dimension(&self, name: &str) -> Option<DimId> {
        self.dimensions
            .iter()
            .position(|d| d.name == name)
            .map(DimId)
    }

    fn dimensions(&self) -> Vec<DimId> {
        (0..self.dimensions.len()).map(DimId).collect()
    }

    fn dimension_info(&self, dim: DimId) -> Result<DimensionInfo, UgridError> {
        self.dimensions
            .get(dim.0)
            .cloned()
            .ok_or_else(|| StoreError::InvalidDimension(dim.0).into())
    }

    fn add_variable(
        &mut self,
        name: &str,
        data_type: DataType,
        dimensions: &[DimId],
    ) -> Result<VarId, UgridError> {
        self.check_writable()?;
        if self.variable(name).is_some() {
            return Err(StoreError::NameInUse(name.to_owned()).into());
        }
        if let Some(dim) = dimensions.iter().find(|d| d.0 >= self.dimensions.len()) {
            return Err(StoreError::InvalidDimension(dim.0).into());
        }

        self.define_mode = true;
        self.variables.push(VariableEntry {
            info: VariableInfo {
                name: name.to_owned(),
                data_type,
                dimensions: dimensions.to_vec(),
            },
            attributes: Vec::new(),
            values: None,
        });

        Ok(VarId(self.variables.len() - 1))
    }

    fn variable(&self, name: &str) -> Option<VarId> {
        self.variables
            .iter()
            .position(|v| v.info.name == name)
            .map(VarId)
    }

    fn variables(&self) -> Vec<VarId> {
        (0..self.variables.len()).map(VarId).collect()
    }

    fn variable_info(&self, var: VarId) -> Result<VariableInfo, UgridError> {
        Ok(self.entry(var)?.info.clone())
    }

    fn put_attribute(
        &mut self,
        target: AttributeTarget,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), UgridError> {
        self.check_writable()?;
        let attributes = self.attributes_mut(target)?;

        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => attributes.push((name.to_owned(), value)),
        }

        self.define_mode = true;
        Ok(())
    }

    fn attribute(
        &self,
        target: AttributeTarget,
        name: &str,
    ) -> Result<Option<AttributeValue>, UgridError> {
        Ok(self
            .attributes(target)?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.clone()))
    }

    fn attribute_names(&self, target: AttributeTarget) -> Result<Vec<String>, UgridError> {
        Ok(self
            .attributes(target)?
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn put_values(&mut self, var: VarId, values: Values) -> Result<(), UgridError> {
        self.check_writable()?;
        if self.define_mode {
            return Err(StoreError::DefineMode.into());
        }

        let entry = self.entry(var)?;
        let expected = shape_len(&self.shape(&entry.info)?)
            .ok_or_else(|| StoreError::ShapeOverflow(entry.info.name.clone()))?;

        if values.data_type() != entry.info.data_type {
            return Err(StoreError::TypeMismatch(
                entry.info.name.clone(),
                entry.info.data_type,
                values.data_type(),
            )
            .into());
        }
        if values.len() != expected {
            return Err(StoreError::ShapeMismatch {
                name: entry.info.name.clone(),
                expected,
                actual: values.len(),
            }
            .into());
        }

        self.variables[var.0].values = Some(values);
        Ok(())
    }

    fn values(&self, var: VarId) -> Result<Values, UgridError> {
        Ok(self.entry_values(self.entry(var)?)?)
    }

    fn end_define(&mut self) -> Result<(), UgridError> {
        self.define_mode = false;
        Ok(())
    }

    fn close(&mut self) -> Result<(), UgridError> {
        self.end_define()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::errors::{StoreError, UgridError};
    use crate::store::{
        AttributeRead, AttributeTarget, ContainerStore, DataType, OpenMode, Values, ValuesRead,
        ValuesWrite,
    };
    use anyhow::Result;

    #[test]
    fn define_then_write() -> Result<()> {
        let mut store = MemoryStore::new();
        let edges = store.add_dimension("mesh_nEdges", 2)?;
        let two = store.add_dimension("Two", 2)?;
        let var = store.add_variable("mesh_edge_nodes", DataType::Int, &[edges, two])?;

        assert!(store.in_define_mode());
        let err = store.write_values(var, &[0, 1, 1, 2][..]).unwrap_err();
        assert!(matches!(err, UgridError::Store(StoreError::DefineMode)));

        store.end_define()?;
        store.write_values(var, &[0, 1, 1, 2][..])?;
        let read: Vec<i32> = store.read_values(var)?;
        assert_eq!(read, vec![0, 1, 1, 2]);
        assert_eq!(store.variable_shape(var)?, vec![2, 2]);

        Ok(())
    }

    #[test]
    fn unwritten_reads_fill() -> Result<()> {
        let mut store = MemoryStore::new();
        let faces = store.add_dimension("nFaces", 3)?;
        let var = store.add_variable("face_nodes", DataType::Int, &[faces])?;
        store.put_attribute(var.into(), "_FillValue", (-999_i32).into())?;
        let scalar = store.add_variable("mesh", DataType::Char, &[])?;

        assert_eq!(store.values(var)?, Values::Int(vec![-999; 3]));
        assert_eq!(store.values(scalar)?, Values::Char(vec![0]));

        Ok(())
    }

    #[test]
    fn rejects_bad_writes() -> Result<()> {
        let mut store = MemoryStore::new();
        let nodes = store.add_dimension("nNodes", 2)?;
        let var = store.add_variable("x", DataType::Double, &[nodes])?;
        store.end_define()?;

        let err = store.write_values(var, &[1, 2][..]).unwrap_err();
        assert!(matches!(
            err,
            UgridError::Store(StoreError::TypeMismatch(..))
        ));

        let err = store.write_values(var, &[1.0][..]).unwrap_err();
        assert!(matches!(
            err,
            UgridError::Store(StoreError::ShapeMismatch { expected: 2, actual: 1, .. })
        ));

        let err = store.add_dimension("nNodes", 4).unwrap_err();
        assert!(matches!(err, UgridError::Store(StoreError::NameInUse(_))));

        Ok(())
    }

    #[test]
    fn read_mode_is_immutable() -> Result<()> {
        let mut store = MemoryStore::new();
        store.put_attribute(AttributeTarget::Global, "Conventions", "CF-1.8".into())?;
        let mut store = store.reopen(OpenMode::Read);

        let err = store.add_dimension("n", 1).unwrap_err();
        assert!(matches!(err, UgridError::Store(StoreError::ReadOnly)));

        let conventions: String = store.read_attribute(AttributeTarget::Global, "Conventions")?;
        assert_eq!(conventions, "CF-1.8");

        Ok(())
    }

    #[test]
    fn oversized_shape_is_an_error() -> Result<()> {
        let mut store = MemoryStore::new();
        let huge = store.add_dimension("huge", usize::MAX / 2)?;
        let other = store.add_dimension("other", 4)?;
        let var = store.add_variable("v", DataType::Int, &[huge, huge, other])?;
        store.end_define()?;

        let err = store.values(var).unwrap_err();
        assert!(matches!(err, UgridError::Store(StoreError::ShapeOverflow(_))));
        let err = store.put_values(var, Values::Int(Vec::new())).unwrap_err();
        assert!(matches!(err, UgridError::Store(StoreError::ShapeOverflow(_))));

        Ok(())
    }

    #[test]
    fn attributes_keep_order() -> Result<()> {
        let mut store = MemoryStore::new();
        let var = store.add_variable("mesh2d", DataType::Char, &[])?;
        store.put_attribute(var.into(), "cf_role", "mesh_topology".into())?;
        store.put_attribute(var.into(), "long_name", "first".into())?;
        store.put_attribute(var.into(), "topology_dimension", 2_i32.into())?;
        store.put_attribute(var.into(), "long_name", "second".into())?;

        assert_eq!(
            store.attribute_names(var.into())?,
            vec!["cf_role", "long_name", "topology_dimension"]
        );
        let long_name: String = store.read_attribute(var.into(), "long_name")?;
        assert_eq!(long_name, "second");
        let dimension: i32 = store.read_attribute(var.into(), "topology_dimension")?;
        assert_eq!(dimension, 2);

        Ok(())
    }
}
