//! Attribute and variable value containers

use std::fmt;

use crate::constants::netcdf_fill;

use super::DataType;

/// Value of an attribute. All numeric attributes are arrays, a single value is an array of one.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Byte(Vec<i8>),
    Str(String),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl AttributeValue {
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            AttributeValue::Byte(_) => DataType::Byte,
            AttributeValue::Str(_) => DataType::Char,
            AttributeValue::Short(_) => DataType::Short,
            AttributeValue::Int(_) => DataType::Int,
            AttributeValue::Float(_) => DataType::Float,
            AttributeValue::Double(_) => DataType::Double,
        }
    }

    /// Number of elements; bytes for strings.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            AttributeValue::Byte(v) => v.len(),
            AttributeValue::Str(v) => v.len(),
            AttributeValue::Short(v) => v.len(),
            AttributeValue::Int(v) => v.len(),
            AttributeValue::Float(v) => v.len(),
            AttributeValue::Double(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer elements, widening bytes and shorts.
    #[must_use]
    pub fn to_ints(&self) -> Option<Vec<i32>> {
        match self {
            AttributeValue::Byte(v) => Some(v.iter().map(|&x| i32::from(x)).collect()),
            AttributeValue::Short(v) => Some(v.iter().map(|&x| i32::from(x)).collect()),
            AttributeValue::Int(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Floating point elements, widening every numeric type.
    #[must_use]
    pub fn to_doubles(&self) -> Option<Vec<f64>> {
        match self {
            AttributeValue::Float(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            AttributeValue::Double(v) => Some(v.clone()),
            AttributeValue::Str(_) => None,
            other => other
                .to_ints()
                .map(|ints| ints.into_iter().map(f64::from).collect()),
        }
    }
}

/// Strings are shown verbatim, numeric arrays as their elements joined with single spaces.
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{value}")?;
            }
            Ok(())
        }

        match self {
            AttributeValue::Str(s) => f.write_str(s),
            AttributeValue::Byte(v) => join(f, v),
            AttributeValue::Short(v) => join(f, v),
            AttributeValue::Int(v) => join(f, v),
            AttributeValue::Float(v) => join(f, v),
            AttributeValue::Double(v) => join(f, v),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<&String> for AttributeValue {
    fn from(value: &String) -> Self {
        AttributeValue::Str(value.clone())
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(vec![value])
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(vec![value])
    }
}

impl From<&[i32]> for AttributeValue {
    fn from(value: &[i32]) -> Self {
        AttributeValue::Int(value.to_vec())
    }
}

impl From<Vec<i32>> for AttributeValue {
    fn from(value: Vec<i32>) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<&[f64]> for AttributeValue {
    fn from(value: &[f64]) -> Self {
        AttributeValue::Double(value.to_vec())
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(value: Vec<f64>) -> Self {
        AttributeValue::Double(value)
    }
}

/// Data of a whole variable, flattened in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub enum Values {
    Byte(Vec<i8>),
    Char(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Values {
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Values::Byte(_) => DataType::Byte,
            Values::Char(_) => DataType::Char,
            Values::Short(_) => DataType::Short,
            Values::Int(_) => DataType::Int,
            Values::Float(_) => DataType::Float,
            Values::Double(_) => DataType::Double,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Values::Byte(v) => v.len(),
            Values::Char(v) => v.len(),
            Values::Short(v) => v.len(),
            Values::Int(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::Double(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `len` copies of the fill value: `fill` when it has a usable type, the netCDF default otherwise.
    pub(crate) fn filled(data_type: DataType, len: usize, fill: Option<&AttributeValue>) -> Self {
        match data_type {
            DataType::Byte => {
                let fill = match fill {
                    Some(AttributeValue::Byte(v)) if !v.is_empty() => v[0],
                    _ => netcdf_fill::BYTE,
                };
                Values::Byte(vec![fill; len])
            }
            DataType::Char => {
                let fill = match fill {
                    Some(AttributeValue::Str(s)) if !s.is_empty() => s.as_bytes()[0],
                    _ => netcdf_fill::CHAR,
                };
                Values::Char(vec![fill; len])
            }
            DataType::Short => {
                let fill = match fill {
                    Some(AttributeValue::Short(v)) if !v.is_empty() => v[0],
                    _ => netcdf_fill::SHORT,
                };
                Values::Short(vec![fill; len])
            }
            DataType::Int => {
                let fill = match fill {
                    Some(AttributeValue::Int(v)) if !v.is_empty() => v[0],
                    _ => netcdf_fill::INT,
                };
                Values::Int(vec![fill; len])
            }
            DataType::Float => {
                let fill = match fill {
                    Some(AttributeValue::Float(v)) if !v.is_empty() => v[0],
                    _ => netcdf_fill::FLOAT,
                };
                Values::Float(vec![fill; len])
            }
            DataType::Double => {
                let fill = match fill {
                    Some(AttributeValue::Double(v)) if !v.is_empty() => v[0],
                    _ => netcdf_fill::DOUBLE,
                };
                Values::Double(vec![fill; len])
            }
        }
    }
}

impl From<Vec<f64>> for Values {
    fn from(value: Vec<f64>) -> Self {
        Values::Double(value)
    }
}

impl From<Vec<i32>> for Values {
    fn from(value: Vec<i32>) -> Self {
        Values::Int(value)
    }
}

impl From<Vec<u8>> for Values {
    fn from(value: Vec<u8>) -> Self {
        Values::Char(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeValue, Values};
    use crate::store::DataType;

    #[test]
    fn attribute_display() {
        assert_eq!(AttributeValue::from("mesh_topology").to_string(), "mesh_topology");
        assert_eq!(AttributeValue::from(vec![3, 4]).to_string(), "3 4");
        assert_eq!(AttributeValue::from(-999.5).to_string(), "-999.5");
    }

    #[test]
    fn attribute_widening() {
        let shorts = AttributeValue::Short(vec![1, -2]);
        assert_eq!(shorts.to_ints(), Some(vec![1, -2]));
        assert_eq!(shorts.to_doubles(), Some(vec![1.0, -2.0]));
        assert_eq!(AttributeValue::from("x").to_doubles(), None);
    }

    #[test]
    fn fill_uses_attribute() {
        let fill = AttributeValue::from(-999_i32);
        assert_eq!(
            Values::filled(DataType::Int, 3, Some(&fill)),
            Values::Int(vec![-999; 3])
        );

        // fill attribute of a different type falls back to the default
        let fill = AttributeValue::from(-999.0);
        assert_eq!(
            Values::filled(DataType::Int, 1, Some(&fill)),
            Values::Int(vec![-2_147_483_647])
        );
        assert_eq!(Values::filled(DataType::Char, 2, None), Values::Char(vec![0, 0]));
    }
}
