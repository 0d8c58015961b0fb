//! The codec contract and the tree codec that implements it.
//!
//! [`TreeCodec`] converts records to a `serde_json::Value` wire tree and back,
//! and renders that tree to JSON text at its outer boundary. Every entry point
//! wraps internal failures in one [`CodecError`]; nothing partial escapes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decoder::decode_record;
use crate::encoder::encode_value;
use crate::error::{CodecError, Fault, Op};
use crate::schema::TypeDesc;
use crate::value::Value;

/// A strategy that encodes record values to some wire form and back.
pub trait Codec {
    /// What `encode` produces and `decode` consumes.
    type Wire;

    /// Encode a record instance. Anything else is an unsupported input.
    fn encode(&self, value: &Value, options: &CodecOptions) -> Result<Self::Wire, CodecError>;

    /// Decode `data` into an instance of `target`, which must be a record type.
    fn decode(
        &self,
        target: &TypeDesc,
        data: &Self::Wire,
        options: &CodecOptions,
    ) -> Result<Value, CodecError>;
}

/// Per-engine defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Apply the `snake_case` → `camelCase` convention in both directions.
    pub camel_case: bool,
}

/// Per-call options. Unset flags fall back to the engine's [`CodecConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// Convert field names to `camelCase` when encoding.
    pub convention_out: Option<bool>,
    /// Look fields up by their `camelCase` name when decoding.
    pub convention_in: Option<bool>,
    /// Pretty-print at the text boundary.
    pub pretty: bool,
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camel_out(mut self, on: bool) -> Self {
        self.convention_out = Some(on);
        self
    }

    pub fn camel_in(mut self, on: bool) -> Self {
        self.convention_in = Some(on);
        self
    }

    /// Same convention in both directions.
    pub fn camel_case(self, on: bool) -> Self {
        self.camel_out(on).camel_in(on)
    }

    pub fn pretty(mut self, on: bool) -> Self {
        self.pretty = on;
        self
    }
}

/// Converts records to and from a JSON wire tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeCodec {
    config: CodecConfig,
}

impl TreeCodec {
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// An engine that applies the naming convention unless a call says otherwise.
    pub const fn camel_case() -> Self {
        Self::new(CodecConfig { camel_case: true })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn convention_out(&self, options: &CodecOptions) -> bool {
        options.convention_out.unwrap_or(self.config.camel_case)
    }

    fn convention_in(&self, options: &CodecOptions) -> bool {
        options.convention_in.unwrap_or(self.config.camel_case)
    }

    /// Encode a record instance into a wire tree.
    pub fn to_dict(
        &self,
        value: &Value,
        options: &CodecOptions,
    ) -> Result<serde_json::Value, CodecError> {
        let record = value.as_record().ok_or_else(|| {
            CodecError::new(
                Op::Encode,
                Fault::UnsupportedInput(format!(
                    "value is not a record instance, found: {}",
                    value.type_name()
                )),
            )
        })?;
        let camel_case = self.convention_out(options);
        debug!(record = record.record_type().name(), camel_case, "encoding record");
        encode_value(value, camel_case).map_err(|cause| fail(Op::Encode, cause))
    }

    /// Decode a wire tree into an instance of the record type `target`.
    pub fn from_dict(
        &self,
        target: &TypeDesc,
        data: &serde_json::Value,
        options: &CodecOptions,
    ) -> Result<Value, CodecError> {
        let TypeDesc::Record(record_type) = target else {
            return Err(CodecError::new(
                Op::Decode,
                Fault::UnsupportedInput(format!(
                    "target type is not a record type, found: {target}"
                )),
            ));
        };
        let camel_case = self.convention_in(options);
        debug!(record = record_type.name(), camel_case, "decoding record");
        decode_record(record_type, data, camel_case)
            .map(Value::Record)
            .map_err(|cause| fail(Op::Decode, cause))
    }

    /// Encode any value, record or not, into a wire tree.
    ///
    /// With the convention on, plain map keys are converted at every depth.
    pub fn encode_value(
        &self,
        value: &Value,
        options: &CodecOptions,
    ) -> Result<serde_json::Value, CodecError> {
        encode_value(value, self.convention_out(options))
            .map_err(|cause| fail(Op::Encode, cause))
    }

    /// Encode a record instance and render it as JSON text.
    pub fn to_text(&self, value: &Value, options: &CodecOptions) -> Result<String, CodecError> {
        let tree = self.to_dict(value, options)?;
        render(&tree, options.pretty)
    }

    /// Parse JSON text and decode it into an instance of `target`.
    pub fn from_text(
        &self,
        target: &TypeDesc,
        text: &str,
        options: &CodecOptions,
    ) -> Result<Value, CodecError> {
        let tree = parse(text)?;
        self.from_dict(target, &tree, options)
    }
}

impl Codec for TreeCodec {
    type Wire = serde_json::Value;

    fn encode(&self, value: &Value, options: &CodecOptions) -> Result<Self::Wire, CodecError> {
        self.to_dict(value, options)
    }

    fn decode(
        &self,
        target: &TypeDesc,
        data: &Self::Wire,
        options: &CodecOptions,
    ) -> Result<Value, CodecError> {
        self.from_dict(target, data, options)
    }
}

/// Render a wire tree as JSON text.
pub fn render(tree: &serde_json::Value, pretty: bool) -> Result<String, CodecError> {
    let text = if pretty {
        serde_json::to_string_pretty(tree)
    } else {
        serde_json::to_string(tree)
    };
    text.map_err(|e| fail(Op::Serialize, Fault::Json(e)))
}

/// Parse JSON text into a wire tree.
pub fn parse(text: &str) -> Result<serde_json::Value, CodecError> {
    serde_json::from_str(text).map_err(|e| fail(Op::Deserialize, Fault::Json(e)))
}

fn fail(op: Op, cause: Fault) -> CodecError {
    debug!(%op, %cause, "codec call failed");
    CodecError::new(op, cause)
}
