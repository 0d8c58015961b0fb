//! Error types for record encoding and decoding.
//!
//! Every public codec entry point reports a single [`CodecError`]. The
//! structural reason for the failure is the wrapped [`Fault`], reachable through
//! [`CodecError::fault`] or `std::error::Error::source`.

use thiserror::Error;

/// The structural reason a tree walk was aborted.
#[derive(Error, Debug)]
pub enum Fault {
    /// The value is not a record instance, or the target type is not a record type.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// A required wire key was absent and the field carries no default.
    #[error("missing field '{key}'")]
    MissingField { key: String },

    /// The wire value does not have the shape the declared type requires.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A field's custom encoder or decoder rejected its input.
    #[error("hook for field '{field}' failed: {message}")]
    Hook { field: String, message: String },

    /// The text boundary could not parse or render JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Fault {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Fault::MalformedInput(message.into())
    }
}

/// The stage of a codec call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Encode,
    Decode,
    Serialize,
    Deserialize,
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Op::Encode => "encoding object",
            Op::Decode => "decoding data",
            Op::Serialize => "serializing object",
            Op::Deserialize => "deserializing JSON",
        })
    }
}

/// The single error kind callers of the codec see.
#[derive(Error, Debug)]
#[error("error {op}: {cause}")]
pub struct CodecError {
    op: Op,
    #[source]
    cause: Fault,
}

impl CodecError {
    pub fn new(op: Op, cause: Fault) -> Self {
        Self { op, cause }
    }

    /// The stage that failed.
    pub fn op(&self) -> Op {
        self.op
    }

    /// The underlying structural failure.
    pub fn fault(&self) -> &Fault {
        &self.cause
    }

    pub fn into_fault(self) -> Fault {
        self.cause
    }
}

/// Errors raised while defining a record type.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("record type '{record}' declares field '{field}' more than once")]
    DuplicateField { record: String, field: String },

    #[error("record type '{0}' declares a field with an empty name")]
    EmptyName(String),

    /// Two fields resolve to one wire key, so encoding would drop one of them.
    #[error("record type '{record}' maps fields '{first}' and '{second}' to wire key '{key}'")]
    WireKeyCollision {
        record: String,
        first: String,
        second: String,
        key: String,
    },
}

/// Result of a single tree walk, before it is wrapped at the entry point.
pub type Result<T> = std::result::Result<T, Fault>;
