use std::sync::Arc;

use bytes::Bytes;
use log::debug;

use crate::core::error::Result;
use crate::core::types::{CellData, CellValue, Cells, Document, Value};
use crate::schema::mapping::SchemaMapping;

/// Combines extracted cells with the schema mapping to produce one
/// indexable document per row. Collection-valued cells expand into multiple
/// field instances; map entries qualify the field name with the entry key.
///
/// Construction is append-only: a failing cell never corrupts fields already
/// appended, so callers are free to drop the bad field and keep going.
pub struct DocumentBuilder {
    mapping: Arc<SchemaMapping>,
}

impl DocumentBuilder {
    pub fn new(mapping: Arc<SchemaMapping>) -> Self {
        DocumentBuilder { mapping }
    }

    pub fn mapping(&self) -> &SchemaMapping {
        &self.mapping
    }

    /// Append the fields of one cell. Cells of unmapped columns are skipped
    /// and produce no field.
    pub fn add_cell(&self, document: &mut Document, cell: &CellValue) -> Result<()> {
        let Some(codec) = self.mapping.codec(&cell.name) else {
            debug!("column '{}' is not mapped, no field emitted", cell.name);
            return Ok(());
        };

        match &cell.value {
            CellData::Scalar(value) => {
                document.add(codec.field(&cell.name, value)?);
            }
            CellData::Set(items) | CellData::List(items) => {
                for item in items {
                    document.add(codec.field(&cell.name, item)?);
                }
            }
            CellData::Map(entries) => {
                for (key, value) in entries {
                    let entry_name = map_entry_name(&cell.name, key);
                    document.add(codec.field(&entry_name, value)?);
                }
            }
        }
        Ok(())
    }

    /// Append all cells, aborting on the first invalid value. Callers that
    /// prefer dropping bad fields iterate with add_cell themselves.
    pub fn add_cells(&self, document: &mut Document, cells: &Cells) -> Result<()> {
        for cell in cells {
            self.add_cell(document, cell)?;
        }
        Ok(())
    }

    /// Build the complete document for one row
    pub fn document(&self, partition_key: &[u8], cells: &Cells) -> Result<Document> {
        let mut document = Document::with_partition_key(Bytes::copy_from_slice(partition_key));
        self.add_cells(&mut document, cells)?;
        Ok(document)
    }
}

fn map_entry_name(column: &str, key: &Value) -> String {
    format!("{}.{}", column, key.canonical_text())
}
