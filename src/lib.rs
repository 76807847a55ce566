pub mod analysis;
pub mod codec;
pub mod core;
pub mod index;
pub mod query;
pub mod row;
pub mod schema;
pub mod search;

/*
┌──────────────────────────────────────────────────────────────────────────┐
│                        ROWLUX DATA FLOW                                  │
└──────────────────────────────────────────────────────────────────────────┘

  row store bytes
       │  partition key + clustering key + storage cells
       ▼
  ┌──────────────────────┐   composite::split on declared key columns,
  │ row::RowCellExtractor│   collection cells grouped per column
  └──────────┬───────────┘
             │ Cells (CellValue: name + scalar/set/list/map)
             ▼
  ┌──────────────────────┐   per-column CellCodec lookup, collections
  │ index::DocumentBuilder│  expand to one field instance per element
  └──────────┬───────────┘
             │ Document (field name → encoded value + weight)
             ▼
       search engine index

  schema::SchemaMapping ──── built once from the JSON schema document,
       │                     immutable, shared read-only
       ├── codec::build_codec (fixed kind table: boolean, bytes, date,
       │                       double, float, inet, integer, long,
       │                       string, text, uuid)
       ├── analysis::PerFieldAnalyzer (per-field dispatch + default)
       └── query::QueryParser (terms/ranges rewritten into index encodings)

  query time:
  search::TokenOrderComparator ── per-pass slot array, orders candidates
       └── search::partition_token (Murmur3 placement hash over the raw
                                    partition key bytes)
*/
