//! Copies between caller arrays and store variables
//!
//! Writers skip empty arrays and absent variables. Readers skip empty destinations
//! and absent variables, and require a sized destination to match the variable.

use crate::{
    constants::FILL_VALUE,
    errors::UgridError,
    store::{read_strings, write_strings, ContainerStore, ValuesRead, ValuesWrite, VarId},
};

pub(crate) fn put_doubles<S: ContainerStore + ?Sized>(
    store: &mut S,
    var: Option<VarId>,
    values: &[f64],
) -> Result<(), UgridError> {
    match var {
        Some(var) if !values.is_empty() => store.write_values(var, values),
        _ => Ok(()),
    }
}

pub(crate) fn put_ints<S: ContainerStore + ?Sized>(
    store: &mut S,
    var: Option<VarId>,
    values: &[i32],
) -> Result<(), UgridError> {
    match var {
        Some(var) if !values.is_empty() => store.write_values(var, values),
        _ => Ok(()),
    }
}

pub(crate) fn put_strings<S: ContainerStore + ?Sized>(
    store: &mut S,
    var: Option<VarId>,
    values: &[String],
) -> Result<(), UgridError> {
    match var {
        Some(var) if !values.is_empty() => write_strings(store, var, values),
        _ => Ok(()),
    }
}

/// Reader for the fields of one entity kind.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Reader<'a, S: ?Sized> {
    pub(crate) store: &'a S,
    pub(crate) entity: &'static str,
}

impl<S: ContainerStore + ?Sized> Reader<'_, S> {
    fn check<T>(
        &self,
        field: &'static str,
        read: Vec<T>,
        dest: &mut Vec<T>,
    ) -> Result<(), UgridError> {
        if read.len() != dest.len() {
            return Err(UgridError::LengthMismatch {
                entity: self.entity,
                field,
                expected: read.len(),
                actual: dest.len(),
            });
        }
        *dest = read;
        Ok(())
    }

    pub(crate) fn doubles(
        &self,
        field: &'static str,
        var: Option<VarId>,
        dest: &mut Vec<f64>,
    ) -> Result<(), UgridError> {
        match var {
            Some(var) if !dest.is_empty() => {
                let values: Vec<f64> = self.store.read_values(var)?;
                self.check(field, values, dest)
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn ints(
        &self,
        field: &'static str,
        var: Option<VarId>,
        dest: &mut Vec<i32>,
    ) -> Result<(), UgridError> {
        match var {
            Some(var) if !dest.is_empty() => {
                let values: Vec<i32> = self.store.read_values(var)?;
                self.check(field, values, dest)
            }
            _ => Ok(()),
        }
    }

    /// Reads connectivity, adding `start_index` to every value that is not the fill value.
    ///
    /// The fill value is the variable `_FillValue`, or `default_fill` when it has none.
    pub(crate) fn indices(
        &self,
        field: &'static str,
        var: Option<VarId>,
        start_index: i32,
        default_fill: i32,
        dest: &mut Vec<i32>,
    ) -> Result<(), UgridError> {
        let Some(var) = var.filter(|_| !dest.is_empty()) else {
            return Ok(());
        };

        let mut values: Vec<i32> = self.store.read_values(var)?;
        if start_index != 0 {
            let fill = self
                .store
                .attribute(var.into(), FILL_VALUE)?
                .and_then(|value| value.to_ints())
                .and_then(|values| values.first().copied())
                .unwrap_or(default_fill);

            for value in values.iter_mut().filter(|value| **value != fill) {
                *value = value
                    .checked_add(start_index)
                    .ok_or(UgridError::IndexOverflow {
                        entity: self.entity,
                        field,
                        value: *value,
                        start_index,
                    })?;
            }
        }

        self.check(field, values, dest)
    }

    pub(crate) fn strings(
        &self,
        field: &'static str,
        var: Option<VarId>,
        dest: &mut Vec<String>,
    ) -> Result<(), UgridError> {
        match var {
            Some(var) if !dest.is_empty() => self.check(field, read_strings(self.store, var)?, dest),
            _ => Ok(()),
        }
    }
}
