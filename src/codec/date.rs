use chrono::NaiveDateTime;

use crate::codec::numeric::encode_i64;
use crate::codec::CellCodec;
use crate::core::error::{Error, Result};
use crate::core::types::{IndexedField, Value};

pub const DEFAULT_PATTERN: &str = "%Y/%m/%d %H:%M:%S";

/// Codec for timestamp columns. Values are reduced to epoch milliseconds and
/// encoded with the sortable long encoding; string inputs are parsed with a
/// configurable chrono pattern.
#[derive(Debug)]
pub struct DateCodec {
    boost: f32,
    pattern: String,
}

impl DateCodec {
    pub fn new(boost: f32, pattern: Option<String>) -> Self {
        DateCodec {
            boost,
            pattern: pattern.unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
        }
    }

    fn millis(&self, value: &Value) -> Result<i64> {
        match value {
            Value::Timestamp(ts) => Ok(ts.timestamp_millis()),
            Value::Bigint(v) => Ok(*v),
            Value::Int(v) => Ok(*v as i64),
            Value::Text(s) => match NaiveDateTime::parse_from_str(s, &self.pattern) {
                Ok(naive) => Ok(naive.and_utc().timestamp_millis()),
                // Fall back to raw epoch milliseconds
                Err(_) => s.parse::<i64>().map_err(|_| {
                    Error::invalid_value(format!(
                        "'{}' matches neither pattern '{}' nor epoch millis",
                        s, self.pattern
                    ))
                }),
            },
            other => Err(Error::invalid_value(format!(
                "value {:?} cannot be cast to date",
                other
            ))),
        }
    }
}

impl CellCodec for DateCodec {
    fn index_value(&self, value: &Value) -> Result<String> {
        Ok(encode_i64(self.millis(value)?))
    }

    fn query_value(&self, raw: &str) -> Result<String> {
        self.index_value(&Value::Text(raw.to_string()))
    }

    fn field(&self, name: &str, value: &Value) -> Result<IndexedField> {
        Ok(IndexedField::keyword(name, self.index_value(value)?, self.boost))
    }

    fn kind(&self) -> &'static str {
        "date"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn codec() -> DateCodec {
        DateCodec::new(1.0, None)
    }

    #[test]
    fn chronological_order_preserved() {
        let early: DateTime<Utc> = "1969-07-20T20:17:00Z".parse().unwrap();
        let late: DateTime<Utc> = "2015-01-01T00:00:00Z".parse().unwrap();
        let a = codec().index_value(&Value::Timestamp(early)).unwrap();
        let b = codec().index_value(&Value::Timestamp(late)).unwrap();
        assert!(a < b); // pre-epoch sorts below post-epoch
    }

    #[test]
    fn string_input_uses_pattern() {
        let ts: DateTime<Utc> = "2014-12-22T10:00:00Z".parse().unwrap();
        assert_eq!(
            codec().query_value("2014/12/22 10:00:00").unwrap(),
            codec().index_value(&Value::Timestamp(ts)).unwrap()
        );
    }

    #[test]
    fn custom_pattern_option() {
        let codec = DateCodec::new(1.0, Some("%Y-%m-%d %H:%M".to_string()));
        assert!(codec.query_value("2014-12-22 10:00").is_ok());
        assert!(codec.query_value("22/12/2014").is_err());
    }

    #[test]
    fn epoch_millis_string_fallback() {
        let equal = codec()
            .index_value(&Value::Bigint(1_419_242_400_000))
            .unwrap();
        assert_eq!(codec().query_value("1419242400000").unwrap(), equal);
    }

    #[test]
    fn rejects_other_types() {
        assert!(codec().index_value(&Value::Boolean(true)).is_err());
    }
}
