use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed schema document, fatal at index build time
    SchemaParse,
    /// Schema names a codec kind outside the fixed type table
    UnknownCodec,
    /// Row references a column absent from the schema (non-fatal, callers skip)
    UnknownColumn,
    /// Value does not match its declared logical type, fatal to that field only
    InvalidValue,
    /// Composite key byte layout inconsistent with the declared component count
    Decode,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn invalid_value(context: String) -> Self {
        Error::new(ErrorKind::InvalidValue, context)
    }

    pub fn decode(context: String) -> Self {
        Error::new(ErrorKind::Decode, context)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::SchemaParse,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
