use std::collections::HashMap;

use log::debug;

use crate::core::error::{Error, Result};
use crate::core::types::{CellData, CellValue, Cells, LogicalType, Value};
use crate::row::composite;

/// Declared shape of a regular column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Scalar(LogicalType),
    /// Element type; the element value travels in the cell's trailing key
    /// component
    Set(LogicalType),
    /// Element type; elements travel in cell values in append order
    List(LogicalType),
    /// Key type (trailing key component) and value type (cell value)
    Map(LogicalType, LogicalType),
}

/// The row layout the extractor needs: key column names and types plus the
/// declared kinds of regular columns
#[derive(Debug, Clone, Default)]
pub struct RowSchema {
    pub partition_key: Vec<(String, LogicalType)>,
    pub clustering_key: Vec<(String, LogicalType)>,
    pub regular: HashMap<String, ColumnKind>,
}

/// One storage cell of a row, in storage order
#[derive(Debug, Clone, Copy)]
pub struct RawCell<'a> {
    pub column: &'a str,
    /// Trailing key component carrying a set item or map key, if the cell
    /// belongs to a multi-cell collection
    pub key: Option<&'a [u8]>,
    pub value: &'a [u8],
}

/// Running aggregate for the collection column currently being scanned
enum Aggregate {
    Set(Vec<Value>),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Aggregate {
    fn into_cell(self, name: String) -> CellValue {
        let value = match self {
            Aggregate::Set(items) => CellData::Set(items),
            Aggregate::List(items) => CellData::List(items),
            Aggregate::Map(entries) => CellData::Map(entries),
        };
        CellValue { name, value }
    }
}

/// Decomposes a row's keys and storage cells into an ordered sequence of
/// typed cell values, reconstituting multi-cell collections
#[derive(Debug, Clone)]
pub struct RowCellExtractor {
    schema: RowSchema,
}

impl RowCellExtractor {
    pub fn new(schema: RowSchema) -> Self {
        RowCellExtractor { schema }
    }

    pub fn schema(&self) -> &RowSchema {
        &self.schema
    }

    /// Extract cells in order: partition key columns, clustering key
    /// columns, then regular columns in storage-cell order
    pub fn extract(
        &self,
        partition_key: &[u8],
        clustering_key: Option<&[u8]>,
        cells: &[RawCell],
    ) -> Result<Cells> {
        let mut out = Cells::new();
        out.extend(self.partition_key_cells(partition_key)?);
        out.extend(self.clustering_key_cells(clustering_key)?);
        out.extend(self.regular_cells(cells)?);
        Ok(out)
    }

    /// Split the partition key into one component per partition key column
    fn partition_key_cells(&self, partition_key: &[u8]) -> Result<Cells> {
        self.key_cells(partition_key, &self.schema.partition_key, "partition")
    }

    /// Split the representative clustering blob, identical algorithm. The
    /// blob may carry trailing components beyond the clustering columns;
    /// those are ignored here.
    fn clustering_key_cells(&self, clustering_key: Option<&[u8]>) -> Result<Cells> {
        if self.schema.clustering_key.is_empty() {
            return Ok(Cells::new());
        }
        match clustering_key {
            Some(blob) => self.key_cells(blob, &self.schema.clustering_key, "clustering"),
            None => Err(Error::decode(
                "row with clustering columns has no clustering key".to_string(),
            )),
        }
    }

    fn key_cells(
        &self,
        blob: &[u8],
        columns: &[(String, LogicalType)],
        what: &str,
    ) -> Result<Cells> {
        let components = composite::split(blob)?;
        let mut cells = Cells::new();
        for (position, (name, logical_type)) in columns.iter().enumerate() {
            let component = components.get(position).ok_or_else(|| {
                Error::decode(format!(
                    "{} key has {} components but column '{}' is at position {}",
                    what,
                    components.len(),
                    name,
                    position
                ))
            })?;
            if component.is_empty() {
                continue; // null key component, nothing to index
            }
            cells.push(CellValue::scalar(name.clone(), logical_type.compose(component)?));
        }
        Ok(cells)
    }

    /// Walk regular cells in storage order, grouping the cells of a
    /// multi-cell collection under one cell value. The pending aggregate is
    /// flushed on every column-name transition and once at the end.
    fn regular_cells(&self, cells: &[RawCell]) -> Result<Cells> {
        let mut out = Cells::new();
        let mut pending: Option<(String, Aggregate)> = None;

        for cell in cells {
            let Some(kind) = self.schema.regular.get(cell.column) else {
                debug!("skipping cell of unknown column '{}'", cell.column);
                continue;
            };

            if let Some((name, _)) = &pending {
                if name.as_str() != cell.column {
                    let (name, aggregate) = pending.take().unwrap();
                    out.push(aggregate.into_cell(name));
                }
            }

            match kind {
                ColumnKind::Scalar(logical_type) => {
                    if cell.value.is_empty() {
                        continue; // null cell emits no value
                    }
                    out.push(CellValue::scalar(
                        cell.column,
                        logical_type.compose(cell.value)?,
                    ));
                }
                ColumnKind::Set(element_type) => {
                    let component = self.collection_key(cell)?;
                    let item = element_type.compose(component)?;
                    match &mut pending {
                        Some((_, Aggregate::Set(items))) => items.push(item),
                        _ => pending = Some((cell.column.to_string(), Aggregate::Set(vec![item]))),
                    }
                }
                ColumnKind::List(element_type) => {
                    if cell.value.is_empty() {
                        continue;
                    }
                    let item = element_type.compose(cell.value)?;
                    match &mut pending {
                        Some((_, Aggregate::List(items))) => items.push(item),
                        _ => pending = Some((cell.column.to_string(), Aggregate::List(vec![item]))),
                    }
                }
                ColumnKind::Map(key_type, value_type) => {
                    if cell.value.is_empty() {
                        continue;
                    }
                    let component = self.collection_key(cell)?;
                    let entry = (key_type.compose(component)?, value_type.compose(cell.value)?);
                    match &mut pending {
                        Some((_, Aggregate::Map(entries))) => entries.push(entry),
                        _ => {
                            pending = Some((cell.column.to_string(), Aggregate::Map(vec![entry])))
                        }
                    }
                }
            }
        }

        if let Some((name, aggregate)) = pending {
            out.push(aggregate.into_cell(name));
        }

        Ok(out)
    }

    fn collection_key<'a>(&self, cell: &RawCell<'a>) -> Result<&'a [u8]> {
        cell.key.ok_or_else(|| {
            Error::decode(format!(
                "collection cell of column '{}' is missing its element component",
                cell.column
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::row::composite::compose;

    fn schema() -> RowSchema {
        let mut regular = HashMap::new();
        regular.insert("name".to_string(), ColumnKind::Scalar(LogicalType::Text));
        regular.insert("tags".to_string(), ColumnKind::Set(LogicalType::Text));
        regular.insert("scores".to_string(), ColumnKind::List(LogicalType::Int));
        regular.insert(
            "attrs".to_string(),
            ColumnKind::Map(LogicalType::Text, LogicalType::Int),
        );
        RowSchema {
            partition_key: vec![
                ("id".to_string(), LogicalType::Bigint),
                ("shard".to_string(), LogicalType::Int),
            ],
            clustering_key: vec![("when".to_string(), LogicalType::Bigint)],
            regular,
        }
    }

    fn pk() -> Vec<u8> {
        compose(&[&7i64.to_be_bytes(), &3i32.to_be_bytes()])
    }

    fn ck() -> Vec<u8> {
        // Trailing component mimics the regular column name carried by the
        // storage cell name; it must be ignored
        compose(&[&99i64.to_be_bytes(), b"name"])
    }

    fn names(cells: &Cells) -> Vec<&str> {
        cells.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn keys_then_regular_in_order() {
        let extractor = RowCellExtractor::new(schema());
        let pk = pk();
        let ck = ck();
        let cells = [
            RawCell {
                column: "name",
                key: None,
                value: b"ada",
            },
            RawCell {
                column: "tags",
                key: Some(b"fast"),
                value: b"",
            },
        ];
        let out = extractor.extract(&pk, Some(&ck), &cells).unwrap();
        assert_eq!(names(&out), vec!["id", "shard", "when", "name", "tags"]);
        assert_eq!(out.iter().next().unwrap().value, CellData::Scalar(Value::Bigint(7)));
    }

    #[test]
    fn set_cells_group_into_one_cell_value() {
        let extractor = RowCellExtractor::new(schema());
        let pk = pk();
        let ck = ck();
        let cells = [
            RawCell { column: "tags", key: Some(b"a"), value: b"" },
            RawCell { column: "tags", key: Some(b"b"), value: b"" },
            RawCell { column: "tags", key: Some(b"c"), value: b"" },
        ];
        let out = extractor.extract(&pk, Some(&ck), &cells).unwrap();
        let tags = out.iter().find(|c| c.name == "tags").unwrap();
        assert_eq!(
            tags.value,
            CellData::Set(vec![
                Value::Text("a".to_string()),
                Value::Text("b".to_string()),
                Value::Text("c".to_string()),
            ])
        );
    }

    #[test]
    fn list_preserves_append_order() {
        let extractor = RowCellExtractor::new(schema());
        let pk = pk();
        let ck = ck();
        let (a, b) = (30i32.to_be_bytes(), 10i32.to_be_bytes());
        let cells = [
            RawCell { column: "scores", key: Some(b"t0"), value: &a },
            RawCell { column: "scores", key: Some(b"t1"), value: &b },
        ];
        let out = extractor.extract(&pk, Some(&ck), &cells).unwrap();
        let scores = out.iter().find(|c| c.name == "scores").unwrap();
        assert_eq!(
            scores.value,
            CellData::List(vec![Value::Int(30), Value::Int(10)])
        );
    }

    #[test]
    fn aggregate_flushes_on_column_transition() {
        let extractor = RowCellExtractor::new(schema());
        let pk = pk();
        let ck = ck();
        let v = 1i32.to_be_bytes();
        let cells = [
            RawCell { column: "tags", key: Some(b"x"), value: b"" },
            RawCell { column: "attrs", key: Some(b"k"), value: &v },
            RawCell { column: "name", key: None, value: b"ada" },
        ];
        let out = extractor.extract(&pk, Some(&ck), &cells).unwrap();
        let regular: Vec<&str> = names(&out)[3..].to_vec();
        assert_eq!(regular, vec!["tags", "attrs", "name"]);
        let attrs = out.iter().find(|c| c.name == "attrs").unwrap();
        assert_eq!(
            attrs.value,
            CellData::Map(vec![(Value::Text("k".to_string()), Value::Int(1))])
        );
    }

    #[test]
    fn unknown_columns_are_skipped_silently() {
        let extractor = RowCellExtractor::new(schema());
        let pk = pk();
        let ck = ck();
        let cells = [
            RawCell { column: "ghost", key: None, value: b"??" },
            RawCell { column: "name", key: None, value: b"ada" },
        ];
        let out = extractor.extract(&pk, Some(&ck), &cells).unwrap();
        assert_eq!(names(&out), vec!["id", "shard", "when", "name"]);
    }

    #[test]
    fn missing_partition_component_is_decode_error() {
        let extractor = RowCellExtractor::new(schema());
        let short = compose(&[&7i64.to_be_bytes()]); // one component, two declared
        let ck = ck();
        let err = extractor.extract(&short, Some(&ck), &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[test]
    fn null_scalar_cell_emits_nothing() {
        let extractor = RowCellExtractor::new(schema());
        let pk = pk();
        let ck = ck();
        let cells = [RawCell { column: "name", key: None, value: b"" }];
        let out = extractor.extract(&pk, Some(&ck), &cells).unwrap();
        assert_eq!(names(&out), vec!["id", "shard", "when"]);
    }

    #[test]
    fn missing_clustering_key_is_decode_error() {
        let extractor = RowCellExtractor::new(schema());
        let pk = pk();
        let err = extractor.extract(&pk, None, &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }
}
