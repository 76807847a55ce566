use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use crate::analysis::analyzer::{Analyzer, PerFieldAnalyzer};
use crate::codec::{build_codec, CellCodec, CodecSpec};
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::parser::QueryParser;

/// First-phase shape of the declarative schema document
#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    default_analyzer: Option<String>,
    #[serde(default)]
    fields: HashMap<String, CodecSpec>,
}

/// Immutable binding of column name to codec plus the shared default
/// analyzer. Built once from a schema document and shared read-only across
/// concurrent document builds and query parses; never mutated afterwards.
pub struct SchemaMapping {
    default_analyzer: String,
    codecs: HashMap<String, Arc<dyn CellCodec>>,
    analyzer: PerFieldAnalyzer,
}

impl SchemaMapping {
    /// Parse and validate a schema document. Malformed JSON fails with
    /// SchemaParse, unknown codec kinds with UnknownCodec. An empty field
    /// map is a valid schema that indexes nothing.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: SchemaDocument = serde_json::from_str(json)?;

        let default_name = doc
            .default_analyzer
            .unwrap_or_else(|| "standard".to_string());
        let default = resolve_analyzer(&default_name)?;

        let mut codecs: HashMap<String, Arc<dyn CellCodec>> = HashMap::new();
        let mut per_field: HashMap<String, Arc<Analyzer>> = HashMap::new();
        for (column, spec) in &doc.fields {
            let codec = build_codec(column, spec)?;
            if let Some(name) = codec.analyzer() {
                per_field.insert(column.clone(), Arc::new(resolve_analyzer(name)?));
            }
            codecs.insert(column.clone(), codec);
        }

        debug!(
            "schema mapping built: {} columns, default analyzer '{}'",
            codecs.len(),
            default_name
        );

        Ok(SchemaMapping {
            default_analyzer: default_name,
            codecs,
            analyzer: PerFieldAnalyzer::new(default, per_field),
        })
    }

    /// Codec bound to a column, or None when the column is unindexed
    pub fn codec(&self, column: &str) -> Option<&Arc<dyn CellCodec>> {
        self.codecs.get(column)
    }

    /// The composed analyzer dispatching per field with default fallback
    pub fn analyzer(&self) -> &PerFieldAnalyzer {
        &self.analyzer
    }

    pub fn default_analyzer_name(&self) -> &str {
        &self.default_analyzer
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// A query parser configured against this field map: leading wildcards
    /// allowed, expanded terms kept case-sensitive
    pub fn query_parser(self: &Arc<Self>, default_field: &str) -> QueryParser {
        QueryParser::new(Arc::clone(self), default_field)
    }
}

// The composed analyzer holds trait objects without Debug, so only the
// column bindings are rendered
impl fmt::Debug for SchemaMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaMapping")
            .field("default_analyzer", &self.default_analyzer)
            .field("codecs", &self.codecs)
            .finish_non_exhaustive()
    }
}

fn resolve_analyzer(name: &str) -> Result<Analyzer> {
    Analyzer::by_name(name).ok_or_else(|| {
        Error::new(
            ErrorKind::SchemaParse,
            format!("unknown analyzer '{}'", name),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_map_with_options() {
        let mapping = SchemaMapping::from_json(
            r#"{
                "default_analyzer": "english",
                "fields": {
                    "id": {"type": "uuid"},
                    "body": {"type": "text", "analyzer": "standard"},
                    "price": {"type": "double", "boost": 2.0}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(mapping.codec("id").unwrap().kind(), "uuid");
        assert_eq!(mapping.codec("price").unwrap().kind(), "double");
        assert!(mapping.codec("absent").is_none());
        assert_eq!(mapping.default_analyzer_name(), "english");
        assert_eq!(mapping.analyzer().analyzer_for("body").name, "standard");
        assert_eq!(mapping.analyzer().analyzer_for("other").name, "english");
    }

    #[test]
    fn empty_field_map_is_valid() {
        let mapping = SchemaMapping::from_json(r#"{"fields": {}}"#).unwrap();
        assert!(mapping.is_empty());
        assert!(mapping.codec("any").is_none());
    }

    #[test]
    fn malformed_document_fails_to_parse() {
        let err = SchemaMapping::from_json(r#"{"fields": {"age": {}}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SchemaParse);
    }

    #[test]
    fn field_without_type_fails_to_parse() {
        let err = SchemaMapping::from_json(r#"{"fields": {"age": {}}}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SchemaParse);
    }

    #[test]
    fn unknown_codec_kind_is_fatal_at_build() {
        let err =
            SchemaMapping::from_json(r#"{"fields": {"age": {"type": "quaternion"}}}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownCodec);
    }

    #[test]
    fn debug_renders_the_column_bindings() {
        let mapping =
            SchemaMapping::from_json(r#"{"fields": {"id": {"type": "uuid"}}}"#).unwrap();
        let rendered = format!("{:?}", mapping);
        assert!(rendered.contains("SchemaMapping"));
        assert!(rendered.contains("id"));
    }

    #[test]
    fn mapping_is_shareable_across_threads() {
        let mapping =
            Arc::new(SchemaMapping::from_json(r#"{"fields": {"id": {"type": "uuid"}}}"#).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&mapping);
                std::thread::spawn(move || m.codec("id").is_some())
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    }
}
