use thiserror::Error;

/// Errors surfaced while translating a write step to or from its portable payload.
///
/// None of these are transient: a payload that fails once fails every time, so
/// callers should abort the step instead of retrying.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The sink holds state that cannot be represented on the wire.
    #[error("cannot serialize sink '{sink}': {reason}")]
    Serialization { sink: String, reason: String },

    /// Payload bytes were corrupt, truncated or referenced an unknown sink definition.
    #[error("cannot deserialize {field}: {source}")]
    Deserialization {
        field: &'static str,
        #[source]
        source: DecodeFailure,
    },

    /// The decoded value is well formed but lacks a capability the caller needs.
    #[error("decoded sink '{sink}' does not provide the {capability} capability")]
    TypeMismatch {
        sink: String,
        capability: &'static str,
    },

    /// The stored sharding flag disagrees with the one derived from the configuration.
    #[error(
        "payload says runner_determined_sharding={stored} but the configuration implies {derived}"
    )]
    InvariantViolation { stored: bool, derived: bool },
}

impl TranslationError {
    pub(crate) fn deserialization(field: &'static str, source: impl Into<DecodeFailure>) -> Self {
        TranslationError::Deserialization {
            field,
            source: source.into(),
        }
    }
}

/// Why a byte sequence could not be turned back into a value.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("malformed bytes: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported format '{format}' version {version}")]
    UnsupportedFormat { format: String, version: u32 },

    #[error("sink definition '{urn}' is not registered in this process")]
    UnknownSinkDefinition { urn: String },

    #[error("extension '{urn}' rejected its state: {source}")]
    Extension {
        urn: String,
        #[source]
        source: ExtensionError,
    },

    #[error("invalid resource '{spec}'")]
    InvalidResource { spec: String },

    #[error("expected urn '{expected}', found '{found}'")]
    UnexpectedUrn { expected: String, found: String },
}

/// Errors reported by user-defined sink extensions while handling their own state.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The sink holds a live runtime reference that has no byte representation.
    #[error("state is not reproducible: {0}")]
    NotReproducible(String),

    #[error("state version {found} is not supported (max {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to turn a locator into a concrete resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// The value is only provided once the pipeline runs.
    #[error("locator '{option}' is not accessible at pipeline construction time")]
    NotAccessible { option: String },

    #[error("invalid resource specification '{spec}': {source}")]
    InvalidSpec {
        spec: String,
        #[source]
        source: url::ParseError,
    },

    /// Parsed, but not something a sink can write under.
    #[error("unusable resource '{spec}': {reason}")]
    Unusable { spec: String, reason: &'static str },
}

/// Result type for translation operations.
pub type Result<T> = std::result::Result<T, TranslationError>;
