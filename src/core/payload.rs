//! Wire records for the write-files step.

use crate::core::error::{DecodeFailure, Result, TranslationError};
use serde::{Deserialize, Serialize};

/// Urn identifying a write-files step inside a pipeline descriptor.
pub const WRITE_FILES_URN: &str = "beam:transform:write_files:v1";

/// The portable form of a [`WriteFiles`](crate::WriteFiles) configuration.
///
/// Only the flattened sharding decision travels; the shard count and sharding
/// function it was derived from cannot be recovered from a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteFilesPayload {
    sink: Vec<u8>,
    windowed_writes: bool,
    runner_determined_sharding: bool,
}

impl WriteFilesPayload {
    pub fn new(sink: Vec<u8>, windowed_writes: bool, runner_determined_sharding: bool) -> Self {
        Self {
            sink,
            windowed_writes,
            runner_determined_sharding,
        }
    }

    /// The encoded sink blob.
    pub fn sink(&self) -> &[u8] {
        &self.sink
    }

    pub fn windowed_writes(&self) -> bool {
        self.windowed_writes
    }

    pub fn runner_determined_sharding(&self) -> bool {
        self.runner_determined_sharding
    }

    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| TranslationError::Serialization {
            sink: WRITE_FILES_URN.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| TranslationError::deserialization("payload", e))
    }
}

/// A step as stored in the enclosing pipeline descriptor: an urn plus its payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub urn: String,
    pub payload: Vec<u8>,
}

impl FunctionSpec {
    /// Decodes the payload of a write-files step, refusing any other urn.
    pub fn write_files_payload(&self) -> Result<WriteFilesPayload> {
        if self.urn != WRITE_FILES_URN {
            return Err(TranslationError::deserialization(
                "transform",
                DecodeFailure::UnexpectedUrn {
                    expected: WRITE_FILES_URN.to_string(),
                    found: self.urn.clone(),
                },
            ));
        }
        WriteFilesPayload::decode(&self.payload)
    }
}
