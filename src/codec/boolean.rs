use crate::codec::CellCodec;
use crate::core::error::{Error, Result};
use crate::core::types::{IndexedField, Value};

/// Codec for boolean columns. "false" sorts before "true", matching the
/// native order.
#[derive(Debug)]
pub struct BooleanCodec {
    boost: f32,
}

impl BooleanCodec {
    pub fn new(boost: f32) -> Self {
        BooleanCodec { boost }
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let b = match value {
            Value::Boolean(b) => *b,
            Value::Text(s) if s.eq_ignore_ascii_case("true") => true,
            Value::Text(s) if s.eq_ignore_ascii_case("false") => false,
            other => {
                return Err(Error::invalid_value(format!(
                    "value {:?} cannot be cast to boolean",
                    other
                )));
            }
        };
        Ok(b.to_string())
    }
}

impl CellCodec for BooleanCodec {
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
        "boolean"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_native_and_text() {
        let codec = BooleanCodec::new(1.0);
        assert_eq!(codec.index_value(&Value::Boolean(true)).unwrap(), "true");
        assert_eq!(codec.query_value("FALSE").unwrap(), "false");
    }

    #[test]
    fn false_sorts_before_true() {
        let codec = BooleanCodec::new(1.0);
        let f = codec.index_value(&Value::Boolean(false)).unwrap();
        let t = codec.index_value(&Value::Boolean(true)).unwrap();
        assert!(f < t);
    }

    #[test]
    fn rejects_other_types() {
        let codec = BooleanCodec::new(1.0);
        assert!(codec.index_value(&Value::Int(1)).is_err());
        assert!(codec.query_value("yes").is_err());
    }
}
