use crate::{
    errors::UgridError,
    store::{ContainerStore, VarId, Values},
    strings,
};

/// Provides typed writing of whole variables to any [`ContainerStore`].
///
/// The value type must match the variable type, no conversion is done on write.
pub trait ValuesWrite<T> {
    /// Writes every value of `var`, flattened in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::errors::StoreError) when the values do not match
    /// the variable type or shape, or the store is in define mode.
    fn write_values(&mut self, var: VarId, values: T) -> Result<(), UgridError>;
}

impl<S: ContainerStore + ?Sized> ValuesWrite<&[f64]> for S {
    fn write_values(&mut self, var: VarId, values: &[f64]) -> Result<(), UgridError> {
        self.put_values(var, Values::Double(values.to_vec()))
    }
}

impl<S: ContainerStore + ?Sized> ValuesWrite<&[i32]> for S {
    fn write_values(&mut self, var: VarId, values: &[i32]) -> Result<(), UgridError> {
        self.put_values(var, Values::Int(values.to_vec()))
    }
}

impl<S: ContainerStore + ?Sized> ValuesWrite<&[u8]> for S {
    fn write_values(&mut self, var: VarId, values: &[u8]) -> Result<(), UgridError> {
        self.put_values(var, Values::Char(values.to_vec()))
    }
}

impl<S: ContainerStore + ?Sized> ValuesWrite<&Vec<f64>> for S {
    fn write_values(&mut self, var: VarId, values: &Vec<f64>) -> Result<(), UgridError> {
        self.put_values(var, Values::Double(values.clone()))
    }
}

impl<S: ContainerStore + ?Sized> ValuesWrite<&Vec<i32>> for S {
    fn write_values(&mut self, var: VarId, values: &Vec<i32>) -> Result<(), UgridError> {
        self.put_values(var, Values::Int(values.clone()))
    }
}

/// Writes `values` into a character variable of shape `[n, width]`, one padded string per row.
pub(crate) fn write_strings<S: ContainerStore + ?Sized>(
    store: &mut S,
    var: VarId,
    values: &[String],
) -> Result<(), UgridError> {
    let width = store.variable_shape(var)?.last().copied().unwrap_or(1);
    store.put_values(var, Values::Char(strings::pack_strings(values, width)))
}
