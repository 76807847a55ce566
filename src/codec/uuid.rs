use uuid::Uuid;

use crate::codec::CellCodec;
use crate::core::error::{Error, Result};
use crate::core::types::{IndexedField, Value};

/// Codec for UUID columns.
///
/// The index representation is a fixed-layout lowercase hex string whose
/// lexicographic order reproduces the row store's native UUID order, both
/// within a version and across versions:
///
/// - two hex digits of the version, so cross-version comparisons resolve on
///   the version tie-break first;
/// - version 1 (time-based) appends the 60-bit timestamp with its hi/mid/low
///   fields rearranged into chronological byte order, then the raw 128 bits;
/// - every other version appends the raw 128 bits unchanged.
#[derive(Debug)]
pub struct UuidCodec {
    boost: f32,
}

impl UuidCodec {
    pub fn new(boost: f32) -> Self {
        UuidCodec { boost }
    }

    fn parse(&self, value: &Value) -> Result<Uuid> {
        match value {
            Value::Uuid(u) => Ok(*u),
            Value::Text(s) => Uuid::parse_str(s)
                .map_err(|_| Error::invalid_value(format!("'{}' is not a valid UUID", s))),
            other => Err(Error::invalid_value(format!(
                "value {:?} cannot be cast to UUID",
                other
            ))),
        }
    }
}

/// Lexicographically order-preserving serialization of a UUID
pub fn serialize(uuid: &Uuid) -> String {
    let (msb, lsb) = uuid.as_u64_pair();
    let version = uuid.get_version_num();

    let mut out = String::with_capacity(50);
    out.push_str(&format!("{:02x}", version));
    if version == 1 {
        // Raw layout stores the timestamp low field first; rebuild the
        // 60-bit value as hi | mid | low so hex order is chronological
        let timestamp = ((msb & 0x0fff) << 48) | (((msb >> 16) & 0xffff) << 32) | (msb >> 32);
        out.push_str(&format!("{:016x}", timestamp));
    }
    out.push_str(&format!("{:016x}", msb));
    out.push_str(&format!("{:016x}", lsb));
    out
}

impl CellCodec for UuidCodec {
    fn index_value(&self, value: &Value) -> Result<String> {
        Ok(serialize(&self.parse(value)?))
    }

    fn query_value(&self, raw: &str) -> Result<String> {
        self.index_value(&Value::Text(raw.to_string()))
    }

    fn field(&self, name: &str, value: &Value) -> Result<IndexedField> {
        Ok(IndexedField::keyword(name, self.index_value(value)?, self.boost))
    }

    fn kind(&self) -> &'static str {
        "uuid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn codec() -> UuidCodec {
        UuidCodec::new(1.0)
    }

    fn encode(s: &str) -> String {
        codec().index_value(&Value::Text(s.to_string())).unwrap()
    }

    /// Native UUID order of the row store: version first, then timestamp for
    /// two time-based values, then unsigned byte order
    fn native_cmp(a: &Uuid, b: &Uuid) -> Ordering {
        let (va, vb) = (a.get_version_num(), b.get_version_num());
        if va != vb {
            return va.cmp(&vb);
        }
        if va == 1 {
            let ts = |u: &Uuid| {
                let (msb, _) = u.as_u64_pair();
                ((msb & 0x0fff) << 48) | (((msb >> 16) & 0xffff) << 32) | (msb >> 32)
            };
            match ts(a).cmp(&ts(b)) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        a.as_bytes().cmp(b.as_bytes())
    }

    #[test]
    fn random_uuid_literal_encoding() {
        assert_eq!(
            encode("550e8400-e29b-41d4-a716-446655440000"),
            "04550e8400e29b41d4a716446655440000"
        );
    }

    #[test]
    fn time_based_uuid_literal_encoding() {
        assert_eq!(
            encode("c4c61dc4-89d7-11e4-b116-123b93f75cba"),
            "0101e489d7c4c61dc4c4c61dc489d711e4b116123b93f75cba"
        );
    }

    #[test]
    fn accepts_native_uuid_value() {
        let u = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            codec().index_value(&Value::Uuid(u)).unwrap(),
            "04550e8400e29b41d4a716446655440000"
        );
    }

    #[test]
    fn rejects_integer_input() {
        let err = codec().index_value(&Value::Int(3)).unwrap_err();
        assert_eq!(err.kind, crate::core::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn rejects_truncated_string() {
        assert!(codec().query_value("550e840").is_err());
    }

    #[test]
    fn cross_version_order_matches_version_tie_break() {
        // Same raw bytes except the version nibble
        let time_based = Uuid::parse_str("c4c61dc4-89d7-11e4-b116-123b93f75cba").unwrap();
        let random = Uuid::parse_str("c4c61dc4-89d7-41e4-b116-123b93f75cba").unwrap();

        let native = native_cmp(&time_based, &random);
        let encoded = serialize(&time_based).cmp(&serialize(&random));
        assert_eq!(native, encoded);
        assert_eq!(encoded, Ordering::Less);
    }

    #[test]
    fn time_based_sort_is_chronological() {
        // Same node and clock sequence, increasing timestamps; raw byte order
        // would sort these incorrectly because the low field comes first
        let mut uuids: Vec<Uuid> = [
            "d9b602c0-89d8-11e4-b116-123b93f75cba",
            "c4c61dc4-89d7-11e4-b116-123b93f75cba",
            "00b602c0-99d8-11e4-b116-123b93f75cba",
            "ffb602c0-89d8-11e3-b116-123b93f75cba",
            "d9b6ff0e-89d8-11e4-b116-123b93f75cba",
        ]
        .iter()
        .map(|s| Uuid::parse_str(s).unwrap())
        .collect();

        let mut by_encoding = uuids.clone();
        by_encoding.sort_by_key(|u| serialize(u));
        uuids.sort_by(|a, b| native_cmp(a, b));
        assert_eq!(uuids, by_encoding);
    }

    #[test]
    fn random_sort_matches_byte_order() {
        let mut uuids: Vec<Uuid> = (0..64).map(|_| Uuid::new_v4()).collect();
        let mut by_encoding = uuids.clone();
        by_encoding.sort_by_key(serialize);
        uuids.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        assert_eq!(uuids, by_encoding);
    }

    #[test]
    fn sampled_pairs_preserve_native_order() {
        let pool: Vec<Uuid> = [
            "c4c61dc4-89d7-11e4-b116-123b93f75cba",
            "d9b602c0-89d8-11e4-b116-123b93f75cba",
            "550e8400-e29b-41d4-a716-446655440000",
            "5e9384d7-c72b-402a-aa13-2745f9b6b318",
            "eddfdc0d-76ee-4a5c-a155-3e5dd16ce1ae",
            "00000000-0000-1000-8000-000000000000",
        ]
        .iter()
        .map(|s| Uuid::parse_str(s).unwrap())
        .collect();

        for a in &pool {
            for b in &pool {
                assert_eq!(
                    native_cmp(a, b),
                    serialize(a).cmp(&serialize(b)),
                    "a={} b={}",
                    a,
                    b
                );
            }
        }
    }
}
