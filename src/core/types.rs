use std::collections::HashMap;
use std::net::IpAddr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{Error, Result};

/// Logical type tags for row store values, as declared by the row schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    Boolean,
    Int,
    Bigint,
    Float,
    Double,
    Text,
    Blob,
    Uuid,
    Timestamp,
    Inet,
}

impl LogicalType {
    /// Decode the row store's binary representation of one value.
    /// Numerics are big-endian, timestamps are epoch milliseconds.
    pub fn compose(&self, bytes: &[u8]) -> Result<Value> {
        match self {
            LogicalType::Boolean => {
                let b = exact::<1>(bytes, "boolean")?;
                Ok(Value::Boolean(b[0] != 0))
            }
            LogicalType::Int => {
                let b = exact::<4>(bytes, "int")?;
                Ok(Value::Int(i32::from_be_bytes(b)))
            }
            LogicalType::Bigint => {
                let b = exact::<8>(bytes, "bigint")?;
                Ok(Value::Bigint(i64::from_be_bytes(b)))
            }
            LogicalType::Float => {
                let b = exact::<4>(bytes, "float")?;
                Ok(Value::Float(f32::from_be_bytes(b)))
            }
            LogicalType::Double => {
                let b = exact::<8>(bytes, "double")?;
                Ok(Value::Double(f64::from_be_bytes(b)))
            }
            LogicalType::Text => match std::str::from_utf8(bytes) {
                Ok(s) => Ok(Value::Text(s.to_string())),
                Err(e) => Err(Error::invalid_value(format!("invalid UTF-8 text: {}", e))),
            },
            LogicalType::Blob => Ok(Value::Bytes(bytes.to_vec())),
            LogicalType::Uuid => {
                let b = exact::<16>(bytes, "uuid")?;
                Ok(Value::Uuid(Uuid::from_bytes(b)))
            }
            LogicalType::Timestamp => {
                let b = exact::<8>(bytes, "timestamp")?;
                let millis = i64::from_be_bytes(b);
                match DateTime::from_timestamp_millis(millis) {
                    Some(ts) => Ok(Value::Timestamp(ts)),
                    None => Err(Error::invalid_value(format!(
                        "timestamp out of range: {} ms",
                        millis
                    ))),
                }
            }
            LogicalType::Inet => match bytes.len() {
                4 => {
                    let mut b = [0u8; 4];
                    b.copy_from_slice(bytes);
                    Ok(Value::Inet(IpAddr::from(b)))
                }
                16 => {
                    let mut b = [0u8; 16];
                    b.copy_from_slice(bytes);
                    Ok(Value::Inet(IpAddr::from(b)))
                }
                n => Err(Error::invalid_value(format!(
                    "inet value must be 4 or 16 bytes, got {}",
                    n
                ))),
            },
        }
    }
}

fn exact<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N]> {
    if bytes.len() != N {
        return Err(Error::invalid_value(format!(
            "{} value must be {} bytes, got {}",
            what,
            N,
            bytes.len()
        )));
    }
    let mut b = [0u8; N];
    b.copy_from_slice(bytes);
    Ok(b)
}

/// One decoded scalar value extracted from a row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Inet(IpAddr),
}

impl Value {
    /// Canonical textual form, used for map entry field names and for
    /// codecs that accept any value as text
    pub fn canonical_text(&self) -> String {
        match self {
            Value::Boolean(b) => b.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Bigint(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::Text(s) => s.clone(),
            Value::Bytes(b) => hex(b),
            Value::Uuid(u) => u.to_string(),
            Value::Timestamp(ts) => ts.timestamp_millis().to_string(),
            Value::Inet(ip) => ip.to_string(),
        }
    }
}

/// Lowercase hex of a byte slice
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// The value side of a cell: a scalar or a reconstituted collection
#[derive(Debug, Clone, PartialEq)]
pub enum CellData {
    Scalar(Value),
    Set(Vec<Value>),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

/// One (name, typed value) pair extracted from a row
#[derive(Debug, Clone, PartialEq)]
pub struct CellValue {
    pub name: String,
    pub value: CellData,
}

impl CellValue {
    pub fn scalar(name: impl Into<String>, value: Value) -> Self {
        CellValue {
            name: name.into(),
            value: CellData::Scalar(value),
        }
    }
}

/// Ordered sequence of cells: partition key columns, then clustering key
/// columns, then regular columns in storage order
#[derive(Debug, Clone, Default)]
pub struct Cells(Vec<CellValue>);

impl Cells {
    pub fn new() -> Self {
        Cells(Vec::new())
    }

    pub fn push(&mut self, cell: CellValue) {
        self.0.push(cell);
    }

    pub fn extend(&mut self, other: Cells) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Cells {
    type Item = &'a CellValue;
    type IntoIter = std::slice::Iter<'a, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One indexable field instance produced by a codec
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedField {
    pub name: String,
    pub value: String,
    pub weight: f32,
    /// Whether the search engine should run the field through an analyzer
    pub analyzed: bool,
}

impl IndexedField {
    pub fn keyword(name: impl Into<String>, value: String, weight: f32) -> Self {
        IndexedField {
            name: name.into(),
            value,
            weight,
            analyzed: false,
        }
    }

    pub fn analyzed(name: impl Into<String>, value: String, weight: f32) -> Self {
        IndexedField {
            name: name.into(),
            value,
            weight,
            analyzed: true,
        }
    }
}

/// The search engine's indexable unit for one row. Fields map a name to one
/// or more instances; construction is append-only.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Raw partition key of the source row, kept so result collection can
    /// re-derive the placement token
    pub partition_key: Option<Bytes>,
    pub fields: HashMap<String, Vec<IndexedField>>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn with_partition_key(key: Bytes) -> Self {
        Document {
            partition_key: Some(key),
            fields: HashMap::new(),
        }
    }

    pub fn add(&mut self, field: IndexedField) {
        self.fields.entry(field.name.clone()).or_default().push(field);
    }

    pub fn get(&self, name: &str) -> &[IndexedField] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of field instances
    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
