use crate::{
    errors::{StoreError, UgridError},
    store::{AttributeTarget, AttributeValue, ContainerStore, VarId, Values},
    strings,
};

/// Provides typed reading of attributes from any [`ContainerStore`].
///
/// Numeric attributes are widened to the requested type where that is lossless.
///
/// # Example
///
/// ```
/// use ugrid::store::{AttributeRead, AttributeTarget, ContainerStore, MemoryStore};
/// # fn main() -> anyhow::Result<()> {
/// let mut store = MemoryStore::new();
/// store.put_attribute(AttributeTarget::Global, "Conventions", "CF-1.8 UGRID-1.0".into())?;
///
/// let conventions: String = store.read_attribute(AttributeTarget::Global, "Conventions")?;
/// assert_eq!(conventions, "CF-1.8 UGRID-1.0");
/// # Ok(())
/// # }
/// ```
pub trait AttributeRead<T> {
    /// Reads the attribute `name` of `target` as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AttributeNotFound`] when the attribute is absent and
    /// [`StoreError::AttributeType`] when it can not be represented as `T`.
    fn read_attribute(&self, target: AttributeTarget, name: &str) -> Result<T, UgridError>;
}

/// Provides typed reading of whole variables from any [`ContainerStore`].
pub trait ValuesRead<T> {
    /// Reads every value of `var`, flattened in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TypeMismatch`] when the variable can not be represented as `T`.
    fn read_values(&self, var: VarId) -> Result<Vec<T>, UgridError>;
}

fn required<S: ContainerStore + ?Sized>(
    store: &S,
    target: AttributeTarget,
    name: &str,
) -> Result<AttributeValue, UgridError> {
    store
        .attribute(target, name)?
        .ok_or_else(|| StoreError::AttributeNotFound(name.to_owned()).into())
}

impl<S: ContainerStore + ?Sized> AttributeRead<String> for S {
    fn read_attribute(&self, target: AttributeTarget, name: &str) -> Result<String, UgridError> {
        match required(self, target, name)? {
            AttributeValue::Str(value) => Ok(value),
            _ => Err(StoreError::AttributeType(name.to_owned()).into()),
        }
    }
}

impl<S: ContainerStore + ?Sized> AttributeRead<Vec<i32>> for S {
    fn read_attribute(&self, target: AttributeTarget, name: &str) -> Result<Vec<i32>, UgridError> {
        required(self, target, name)?
            .to_ints()
            .ok_or_else(|| StoreError::AttributeType(name.to_owned()).into())
    }
}

impl<S: ContainerStore + ?Sized> AttributeRead<i32> for S {
    fn read_attribute(&self, target: AttributeTarget, name: &str) -> Result<i32, UgridError> {
        let values: Vec<i32> = self.read_attribute(target, name)?;
        values
            .first()
            .copied()
            .ok_or_else(|| StoreError::AttributeType(name.to_owned()).into())
    }
}

impl<S: ContainerStore + ?Sized> AttributeRead<Vec<f64>> for S {
    fn read_attribute(&self, target: AttributeTarget, name: &str) -> Result<Vec<f64>, UgridError> {
        required(self, target, name)?
            .to_doubles()
            .ok_or_else(|| StoreError::AttributeType(name.to_owned()).into())
    }
}

impl<S: ContainerStore + ?Sized> AttributeRead<f64> for S {
    fn read_attribute(&self, target: AttributeTarget, name: &str) -> Result<f64, UgridError> {
        let values: Vec<f64> = self.read_attribute(target, name)?;
        values
            .first()
            .copied()
            .ok_or_else(|| StoreError::AttributeType(name.to_owned()).into())
    }
}

fn type_mismatch<S: ContainerStore + ?Sized>(
    store: &S,
    var: VarId,
    found: &Values,
    requested: crate::store::DataType,
) -> UgridError {
    let name = store
        .variable_name(var)
        .unwrap_or_else(|_| format!("#{}", var.index()));
    StoreError::TypeMismatch(name, found.data_type(), requested).into()
}

impl<S: ContainerStore + ?Sized> ValuesRead<f64> for S {
    fn read_values(&self, var: VarId) -> Result<Vec<f64>, UgridError> {
        match self.values(var)? {
            Values::Double(v) => Ok(v),
            Values::Float(v) => Ok(v.into_iter().map(f64::from).collect()),
            Values::Int(v) => Ok(v.into_iter().map(f64::from).collect()),
            Values::Short(v) => Ok(v.into_iter().map(f64::from).collect()),
            Values::Byte(v) => Ok(v.into_iter().map(f64::from).collect()),
            other => Err(type_mismatch(self, var, &other, crate::store::DataType::Double)),
        }
    }
}

impl<S: ContainerStore + ?Sized> ValuesRead<i32> for S {
    fn read_values(&self, var: VarId) -> Result<Vec<i32>, UgridError> {
        match self.values(var)? {
            Values::Int(v) => Ok(v),
            Values::Short(v) => Ok(v.into_iter().map(i32::from).collect()),
            Values::Byte(v) => Ok(v.into_iter().map(i32::from).collect()),
            other => Err(type_mismatch(self, var, &other, crate::store::DataType::Int)),
        }
    }
}

impl<S: ContainerStore + ?Sized> ValuesRead<u8> for S {
    fn read_values(&self, var: VarId) -> Result<Vec<u8>, UgridError> {
        match self.values(var)? {
            Values::Char(v) => Ok(v),
            other => Err(type_mismatch(self, var, &other, crate::store::DataType::Char)),
        }
    }
}

/// Reads a character variable of shape `[n, width]` as `n` trimmed strings.
pub(crate) fn read_strings<S: ContainerStore + ?Sized>(
    store: &S,
    var: VarId,
) -> Result<Vec<String>, UgridError> {
    let width = store.variable_shape(var)?.last().copied().unwrap_or(1);
    let bytes: Vec<u8> = store.read_values(var)?;
    Ok(strings::unpack_strings(&bytes, width))
}
