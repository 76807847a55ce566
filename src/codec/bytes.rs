use crate::codec::CellCodec;
use crate::core::error::{Error, Result};
use crate::core::types::{hex, IndexedField, Value};

/// Codec for blob columns. Raw bytes are indexed as lowercase hex, which
/// preserves unsigned byte-wise order.
#[derive(Debug)]
pub struct BytesCodec {
    boost: f32,
}

impl BytesCodec {
    pub fn new(boost: f32) -> Self {
        BytesCodec { boost }
    }

    fn encode(&self, value: &Value) -> Result<String> {
        match value {
            Value::Bytes(b) => Ok(hex(b)),
            Value::Text(s) => {
                let trimmed = s.strip_prefix("0x").unwrap_or(s);
                if trimmed.len() % 2 != 0
                    || !trimmed.chars().all(|c| c.is_ascii_hexdigit())
                {
                    return Err(Error::invalid_value(format!(
                        "'{}' is not a valid hex byte string",
                        s
                    )));
                }
                Ok(trimmed.to_ascii_lowercase())
            }
            other => Err(Error::invalid_value(format!(
                "value {:?} cannot be cast to bytes",
                other
            ))),
        }
    }
}

impl CellCodec for BytesCodec {
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
        "bytes"
    }
}
