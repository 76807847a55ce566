use crate::codec::CellCodec;
use crate::core::error::{Error, Result};
use crate::core::types::{IndexedField, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Long,
    Float,
    Double,
}

/// Codec for numeric columns. Values are encoded as fixed-width lowercase
/// hex with the sign bit adjusted so that lexicographic order on the
/// encoding equals numeric order on the value.
#[derive(Debug)]
pub struct NumericCodec {
    kind: NumericKind,
    boost: f32,
}

impl NumericCodec {
    pub fn new(kind: NumericKind, boost: f32) -> Self {
        NumericCodec { kind, boost }
    }

    fn to_f64(&self, value: &Value) -> Result<f64> {
        match value {
            Value::Int(v) => Ok(*v as f64),
            Value::Bigint(v) => Ok(*v as f64),
            Value::Float(v) => Ok(*v as f64),
            Value::Double(v) => Ok(*v),
            Value::Text(s) => s
                .parse::<f64>()
                .map_err(|_| Error::invalid_value(format!("'{}' is not a number", s))),
            other => Err(Error::invalid_value(format!(
                "value {:?} cannot be cast to a number",
                other
            ))),
        }
    }

    fn to_i64(&self, value: &Value) -> Result<i64> {
        match value {
            Value::Int(v) => Ok(*v as i64),
            Value::Bigint(v) => Ok(*v),
            Value::Float(v) => Ok(*v as i64),
            Value::Double(v) => Ok(*v as i64),
            Value::Text(s) => s
                .parse::<i64>()
                .map_err(|_| Error::invalid_value(format!("'{}' is not an integer", s))),
            other => Err(Error::invalid_value(format!(
                "value {:?} cannot be cast to an integer",
                other
            ))),
        }
    }

    fn encode(&self, value: &Value) -> Result<String> {
        match self.kind {
            NumericKind::Integer => {
                let v = i32::try_from(self.to_i64(value)?)
                    .map_err(|_| Error::invalid_value(format!("{:?} overflows integer", value)))?;
                Ok(encode_i32(v))
            }
            NumericKind::Long => Ok(encode_i64(self.to_i64(value)?)),
            NumericKind::Float => Ok(encode_f32(self.to_f64(value)? as f32)),
            NumericKind::Double => Ok(encode_f64(self.to_f64(value)?)),
        }
    }
}

/// Sign-flipped hex, so negative values sort below positive ones
pub fn encode_i32(v: i32) -> String {
    format!("{:08x}", (v as u32) ^ 0x8000_0000)
}

pub fn encode_i64(v: i64) -> String {
    format!("{:016x}", (v as u64) ^ 0x8000_0000_0000_0000)
}

/// IEEE 754 sortable-bits trick: flip all bits of negatives, flip only the
/// sign bit of non-negatives
pub fn encode_f32(v: f32) -> String {
    let bits = v.to_bits();
    let sortable = if bits & 0x8000_0000 != 0 {
        !bits
    } else {
        bits ^ 0x8000_0000
    };
    format!("{:08x}", sortable)
}

pub fn encode_f64(v: f64) -> String {
    let bits = v.to_bits();
    let sortable = if bits & 0x8000_0000_0000_0000 != 0 {
        !bits
    } else {
        bits ^ 0x8000_0000_0000_0000
    };
    format!("{:016x}", sortable)
}

impl CellCodec for NumericCodec {
    fn index_value(&self, value: &Value) -> Result<String> {
        self.encode(value)
    }

    fn query_value(&self, raw: &str) -> Result<String> {
        self.encode(&Value::Text(raw.to_string()))
    }

    fn field(&self, name: &str, value: &Value) -> Result<IndexedField> {
        Ok(IndexedField::keyword(name, self.index_value(value)?, self.boost))
    }

    fn kind(&self) -> &'static str {
        match self.kind {
            NumericKind::Integer => "integer",
            NumericKind::Long => "long",
            NumericKind::Float => "float",
            NumericKind::Double => "double",
        }
    }
}
