use crate::core::error::{Error, Result};

/// Composite key byte layout: for each component, a 16-bit big-endian
/// length, the component bytes, and one end-of-component byte.

/// Split a composite blob into its components. Fails with Decode if the
/// byte layout is truncated mid-component.
pub fn split(bytes: &[u8]) -> Result<Vec<&[u8]>> {
    let mut components = Vec::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        if rest.len() < 2 {
            return Err(Error::decode(format!(
                "truncated component length at offset {}",
                bytes.len() - rest.len()
            )));
        }
        let len = u16::from_be_bytes([rest[0], rest[1]]) as usize;
        rest = &rest[2..];

        if rest.len() < len + 1 {
            return Err(Error::decode(format!(
                "component of {} bytes does not fit in remaining {}",
                len,
                rest.len()
            )));
        }
        components.push(&rest[..len]);
        rest = &rest[len + 1..]; // skip the end-of-component byte
    }

    Ok(components)
}

/// Inverse of split, used when synthesizing keys
pub fn compose(components: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    for component in components {
        out.extend_from_slice(&(component.len() as u16).to_be_bytes());
        out.extend_from_slice(component);
        out.push(0);
    }
    out
}
