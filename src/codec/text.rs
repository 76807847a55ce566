use crate::codec::CellCodec;
use crate::core::error::Result;
use crate::core::types::{IndexedField, Value};

/// Codec for string columns indexed verbatim as a single keyword term
#[derive(Debug)]
pub struct StringCodec {
    boost: f32,
}

impl StringCodec {
    pub fn new(boost: f32) -> Self {
        StringCodec { boost }
    }
}

impl CellCodec for StringCodec {
    fn index_value(&self, value: &Value) -> Result<String> {
        Ok(value.canonical_text())
    }

    fn query_value(&self, raw: &str) -> Result<String> {
        Ok(raw.to_string())
    }

    fn field(&self, name: &str, value: &Value) -> Result<IndexedField> {
        Ok(IndexedField::keyword(name, self.index_value(value)?, self.boost))
    }

    fn kind(&self) -> &'static str {
        "string"
    }
}

/// Codec for full-text columns. The value is handed to the search engine
/// verbatim and tokenized there by the analyzer this codec selects.
#[derive(Debug)]
pub struct TextCodec {
    boost: f32,
    analyzer: Option<String>,
}

impl TextCodec {
    pub fn new(boost: f32, analyzer: Option<String>) -> Self {
        TextCodec { boost, analyzer }
    }
}

impl CellCodec for TextCodec {
    fn index_value(&self, value: &Value) -> Result<String> {
        Ok(value.canonical_text())
    }

    fn query_value(&self, raw: &str) -> Result<String> {
        Ok(raw.to_string())
    }

    fn field(&self, name: &str, value: &Value) -> Result<IndexedField> {
        Ok(IndexedField::analyzed(name, self.index_value(value)?, self.boost))
    }

    fn analyzer(&self) -> Option<&str> {
        self.analyzer.as_deref()
    }

    fn analyzed(&self) -> bool {
        true
    }

    fn kind(&self) -> &'static str {
        "text"
    }
}
