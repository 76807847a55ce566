use std::net::IpAddr;

use crate::codec::CellCodec;
use crate::core::error::{Error, Result};
use crate::core::types::{hex, IndexedField, Value};

/// Codec for network address columns. Addresses are indexed as the hex of
/// their raw octets (4 for IPv4, 16 for IPv6), reproducing the native
/// byte-wise order across both families.
#[derive(Debug)]
pub struct InetCodec {
    boost: f32,
}

impl InetCodec {
    pub fn new(boost: f32) -> Self {
        InetCodec { boost }
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let addr = match value {
            Value::Inet(ip) => *ip,
            Value::Text(s) => s
                .parse::<IpAddr>()
                .map_err(|_| Error::invalid_value(format!("'{}' is not an IP address", s)))?,
            other => {
                return Err(Error::invalid_value(format!(
                    "value {:?} cannot be cast to inet",
                    other
                )));
            }
        };
        Ok(match addr {
            IpAddr::V4(v4) => hex(&v4.octets()),
            IpAddr::V6(v6) => hex(&v6.octets()),
        })
    }
}

impl CellCodec for InetCodec {
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
        "inet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_encoding() {
        let codec = InetCodec::new(1.0);
        assert_eq!(codec.query_value("127.0.0.1").unwrap(), "7f000001");
    }

    #[test]
    fn v4_order_preserved() {
        let codec = InetCodec::new(1.0);
        let a = codec.query_value("10.0.0.1").unwrap();
        let b = codec.query_value("10.0.1.0").unwrap();
        assert!(a < b);
    }

    #[test]
    fn v6_is_32_hex_chars() {
        let codec = InetCodec::new(1.0);
        let encoded = codec.query_value("2001:db8::1").unwrap();
        assert_eq!(encoded.len(), 32);
        assert!(encoded.starts_with("20010db8"));
    }

    #[test]
    fn rejects_non_addresses() {
        let codec = InetCodec::new(1.0);
        assert!(codec.query_value("localhost").is_err());
        assert!(codec.index_value(&Value::Int(1)).is_err());
    }
}
