//! Self-describing byte encoding for [`SinkHandle`]s.
//!
//! The blob is a JSON envelope `{format, version, sink}` where `sink` is a tagged
//! record. Built-in sinks are written field by field; extension sinks are written
//! as `(urn, version, state)` and can only be read back if the urn is registered.
//!
//! Every value is written from a single source. Derived state (the temp directory)
//! is recomputed after decoding and the naming policy is decoded into one `Arc`,
//! so a decoded handle can't hold two diverging copies of the same thing.

pub mod registry;

use crate::core::error::{DecodeFailure, Result, TranslationError};
use crate::core::resource::{LocatorProvider, ResourceId};
use crate::core::sink::naming::{CustomFilenamePolicy, DefaultFilenamePolicy, FilenamePolicy};
use crate::core::sink::{Compression, FileBasedSink, SinkHandle};
use crate::core::Record;
use registry::SinkRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Format tag written into every sink blob.
pub const SINK_FORMAT: &str = "scrivener/sink";

/// Current envelope version.
pub const SINK_FORMAT_VERSION: u32 = 1;

const SINK_FIELD: &str = "sink";

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    format: String,
    version: u32,
    sink: SinkRecord,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SinkRecord {
    Files {
        destination: LocatorRecord,
        naming: Option<NamingRecord>,
        compression: Compression,
    },
    Extension {
        urn: String,
        version: u32,
        state: Vec<u8>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
enum LocatorRecord {
    Static { resource: String, directory: bool },
    Deferred { option: String },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
enum NamingRecord {
    Template {
        prefix: String,
        shard_template: String,
        suffix: String,
    },
    Custom {
        urn: String,
        state: Record,
    },
}

/// Encodes and decodes sink handles against a fixed registry of sink definitions.
#[derive(Debug, Clone, Default)]
pub struct SinkCodec {
    registry: Arc<SinkRegistry>,
}

impl SinkCodec {
    pub fn new(registry: Arc<SinkRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SinkRegistry {
        &self.registry
    }

    /// Produces a blob from which an equal handle can be decoded.
    pub fn encode(&self, handle: &SinkHandle) -> Result<Vec<u8>> {
        let record = match handle {
            SinkHandle::Files(sink) => SinkRecord::Files {
                destination: locator_record(&sink.destination),
                naming: sink.naming.as_deref().map(naming_record),
                compression: sink.compression,
            },
            SinkHandle::Extension(extension) => {
                let state =
                    extension
                        .encode_state()
                        .map_err(|e| TranslationError::Serialization {
                            sink: extension.urn().to_string(),
                            reason: e.to_string(),
                        })?;
                SinkRecord::Extension {
                    urn: extension.urn().to_string(),
                    version: extension.version(),
                    state,
                }
            }
        };

        let envelope = Envelope {
            format: SINK_FORMAT.to_string(),
            version: SINK_FORMAT_VERSION,
            sink: record,
        };
        let bytes = serde_json::to_vec(&envelope).map_err(|e| TranslationError::Serialization {
            sink: handle.urn().to_string(),
            reason: e.to_string(),
        })?;
        log::debug!("Encoded sink '{}' into {} bytes", handle.urn(), bytes.len());
        Ok(bytes)
    }

    /// Rebuilds a handle. Nothing is returned unless the whole blob is valid.
    pub fn decode(&self, bytes: &[u8]) -> Result<SinkHandle> {
        let envelope: Envelope = serde_json::from_slice(bytes)
            .map_err(|e| TranslationError::deserialization(SINK_FIELD, e))?;

        if envelope.format != SINK_FORMAT || envelope.version != SINK_FORMAT_VERSION {
            return Err(TranslationError::deserialization(
                SINK_FIELD,
                DecodeFailure::UnsupportedFormat {
                    format: envelope.format,
                    version: envelope.version,
                },
            ));
        }

        match envelope.sink {
            SinkRecord::Files {
                destination,
                naming,
                compression,
            } => Ok(SinkHandle::Files(FileBasedSink {
                destination: locator_from_record(destination)?,
                naming: naming.map(|record| Arc::new(naming_from_record(record))),
                compression,
            })),
            SinkRecord::Extension {
                urn,
                version,
                state,
            } => self.decode_extension(urn, version, &state),
        }
    }

    fn decode_extension(&self, urn: String, version: u32, state: &[u8]) -> Result<SinkHandle> {
        let Some(decoder) = self.registry.decoder(&urn) else {
            log::warn!(
                "Sink definition '{}' is not registered; known definitions: {:?}",
                urn,
                self.registry.urns()
            );
            return Err(TranslationError::deserialization(
                SINK_FIELD,
                DecodeFailure::UnknownSinkDefinition { urn },
            ));
        };

        let extension = (**decoder)(version, state).map_err(|source| {
            TranslationError::deserialization(
                SINK_FIELD,
                DecodeFailure::Extension {
                    urn: urn.clone(),
                    source,
                },
            )
        })?;

        if extension.urn() != urn {
            return Err(TranslationError::deserialization(
                SINK_FIELD,
                DecodeFailure::UnexpectedUrn {
                    expected: urn,
                    found: extension.urn().to_string(),
                },
            ));
        }
        log::debug!("Decoded extension sink '{}' (state v{})", urn, version);
        Ok(SinkHandle::Extension(extension))
    }
}

fn locator_record(locator: &LocatorProvider) -> LocatorRecord {
    match locator {
        LocatorProvider::Static(resource) => LocatorRecord::Static {
            resource: resource.to_string(),
            directory: resource.is_directory(),
        },
        LocatorProvider::Deferred { option } => LocatorRecord::Deferred {
            option: option.clone(),
        },
    }
}

fn locator_from_record(record: LocatorRecord) -> Result<LocatorProvider> {
    match record {
        LocatorRecord::Static {
            resource,
            directory,
        } => ResourceId::new_resource(&resource, directory)
            .map(LocatorProvider::Static)
            .map_err(|_| {
                TranslationError::deserialization(
                    SINK_FIELD,
                    DecodeFailure::InvalidResource { spec: resource },
                )
            }),
        LocatorRecord::Deferred { option } => Ok(LocatorProvider::Deferred { option }),
    }
}

fn naming_record(policy: &FilenamePolicy) -> NamingRecord {
    match policy {
        FilenamePolicy::Template(p) => NamingRecord::Template {
            prefix: p.prefix.clone(),
            shard_template: p.shard_template.clone(),
            suffix: p.suffix.clone(),
        },
        FilenamePolicy::Custom(p) => NamingRecord::Custom {
            urn: p.urn.clone(),
            state: p.state.clone(),
        },
    }
}

fn naming_from_record(record: NamingRecord) -> FilenamePolicy {
    match record {
        NamingRecord::Template {
            prefix,
            shard_template,
            suffix,
        } => FilenamePolicy::Template(DefaultFilenamePolicy {
            prefix,
            shard_template,
            suffix,
        }),
        NamingRecord::Custom { urn, state } => {
            FilenamePolicy::Custom(CustomFilenamePolicy { urn, state })
        }
    }
}
