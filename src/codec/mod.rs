pub mod boolean;
pub mod bytes;
pub mod date;
pub mod inet;
pub mod numeric;
pub mod text;
pub mod uuid;

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as Json;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{IndexedField, Value};

/// Per-logical-type encode/compare/analyze contract. Index encodings are
/// strings whose lexicographic order reproduces the native order of the
/// codec's logical type.
pub trait CellCodec: Send + Sync + fmt::Debug {
    /// Order-preserving index representation of a native value
    fn index_value(&self, value: &Value) -> Result<String>;

    /// Same representation derived from user-supplied query text, so that
    /// indexed and queried terms compare consistently
    fn query_value(&self, raw: &str) -> Result<String>;

    /// A named, weighted field instance for the search engine
    fn field(&self, name: &str, value: &Value) -> Result<IndexedField>;

    /// Analyzer selected by this codec, if any. None means the field is
    /// indexed verbatim and the schema default does not apply.
    fn analyzer(&self) -> Option<&str> {
        None
    }

    /// Whether fields of this codec are tokenized by an analyzer
    fn analyzed(&self) -> bool {
        false
    }

    fn kind(&self) -> &'static str;
}

/// Generic first-phase parse of one field definition: a codec kind plus a
/// bag of kind-specific options
#[derive(Debug, Clone, Deserialize)]
pub struct CodecSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub options: serde_json::Map<String, Json>,
}

impl CodecSpec {
    pub fn boost(&self) -> Result<f32> {
        match self.options.get("boost") {
            None => Ok(1.0),
            Some(Json::Number(n)) => match n.as_f64() {
                Some(v) => Ok(v as f32),
                None => Err(Error::new(
                    ErrorKind::SchemaParse,
                    format!("boost is not a valid number: {}", n),
                )),
            },
            Some(other) => Err(Error::new(
                ErrorKind::SchemaParse,
                format!("boost must be a number, got {}", other),
            )),
        }
    }

    pub fn string_option(&self, key: &str) -> Result<Option<String>> {
        match self.options.get(key) {
            None => Ok(None),
            Some(Json::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Error::new(
                ErrorKind::SchemaParse,
                format!("{} must be a string, got {}", key, other),
            )),
        }
    }
}

/// Second-phase construction through the fixed kind table. Unknown kinds are
/// rejected here, at schema build time, never at first use.
pub fn build_codec(column: &str, spec: &CodecSpec) -> Result<Arc<dyn CellCodec>> {
    let boost = spec.boost()?;
    match spec.kind.as_str() {
        "boolean" => Ok(Arc::new(boolean::BooleanCodec::new(boost))),
        "bytes" => Ok(Arc::new(bytes::BytesCodec::new(boost))),
        "date" => Ok(Arc::new(date::DateCodec::new(
            boost,
            spec.string_option("pattern")?,
        ))),
        "double" => Ok(Arc::new(numeric::NumericCodec::new(
            numeric::NumericKind::Double,
            boost,
        ))),
        "float" => Ok(Arc::new(numeric::NumericCodec::new(
            numeric::NumericKind::Float,
            boost,
        ))),
        "inet" => Ok(Arc::new(inet::InetCodec::new(boost))),
        "integer" => Ok(Arc::new(numeric::NumericCodec::new(
            numeric::NumericKind::Integer,
            boost,
        ))),
        "long" => Ok(Arc::new(numeric::NumericCodec::new(
            numeric::NumericKind::Long,
            boost,
        ))),
        "string" => Ok(Arc::new(text::StringCodec::new(boost))),
        "text" => Ok(Arc::new(text::TextCodec::new(
            boost,
            spec.string_option("analyzer")?,
        ))),
        "uuid" => Ok(Arc::new(uuid::UuidCodec::new(boost))),
        other => Err(Error::new(
            ErrorKind::UnknownCodec,
            format!("unknown codec kind '{}' for column '{}'", other, column),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> CodecSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builds_every_kind_in_the_table() {
        for kind in [
            "boolean", "bytes", "date", "double", "float", "inet", "integer", "long", "string",
            "text", "uuid",
        ] {
            let codec = build_codec("c", &spec(&format!("{{\"type\":\"{}\"}}", kind))).unwrap();
            assert_eq!(codec.kind(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected_eagerly() {
        let err = build_codec("c", &spec("{\"type\":\"geo\"}")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownCodec);
    }

    #[test]
    fn boost_option_is_read() {
        let s = spec("{\"type\":\"double\",\"boost\":2.5}");
        assert_eq!(s.boost().unwrap(), 2.5);
    }

    #[test]
    fn bad_boost_fails_at_parse() {
        let s = spec("{\"type\":\"double\",\"boost\":\"high\"}");
        assert_eq!(s.boost().unwrap_err().kind, ErrorKind::SchemaParse);
    }
}
