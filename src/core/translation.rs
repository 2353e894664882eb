use crate::core::codec::SinkCodec;
use crate::core::codec::registry::SinkRegistry;
use crate::core::error::{Result, TranslationError};
use crate::core::graph::{AppliedWriteNode, NodeBody};
use crate::core::payload::{FunctionSpec, WRITE_FILES_URN, WriteFilesPayload};
use crate::core::sink::SinkHandle;
use crate::core::write::{WriteFiles, runner_determined};
use std::sync::Arc;

/// Capability a decoded sink must have to back a write-files step.
const FILE_SINK_CAPABILITY: &str = "file sink (destination + output naming)";

/// Turns a step found in a pipeline graph into the `FunctionSpec` stored in a pipeline descriptor.
pub trait TransformPayloadTranslator {
    type Node;

    /// Urn written next to the payload.
    fn urn(&self) -> &'static str;

    fn translate(&self, node: &Self::Node) -> Result<FunctionSpec>;
}

/// A sink and the two flags recovered from a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWrite {
    pub sink: SinkHandle,
    pub windowed_writes: bool,
    pub runner_determined_sharding: bool,
}

/// Translates write-files configurations to and from [`WriteFilesPayload`]s.
#[derive(Debug, Clone, Default)]
pub struct WriteFilesTranslation {
    codec: SinkCodec,
}

impl WriteFilesTranslation {
    pub fn new(registry: Arc<SinkRegistry>) -> Self {
        Self {
            codec: SinkCodec::new(registry),
        }
    }

    pub fn codec(&self) -> &SinkCodec {
        &self.codec
    }

    /// Builds the portable payload. The sharding decision is taken here, once.
    ///
    /// Sinks that cannot write files are refused here, so no payload exists that
    /// would only fail once restored.
    pub fn to_payload(&self, write: &WriteFiles) -> Result<WriteFilesPayload> {
        require_file_sink(write.sink())?;
        let sink = self.codec.encode(write.sink())?;
        let payload = WriteFilesPayload::new(
            sink,
            write.is_windowed_writes(),
            runner_determined(write.num_shards(), write.sharding()),
        );
        log::debug!(
            "Translated write to '{}': windowed_writes={}, runner_determined_sharding={}",
            write.sink().urn(),
            payload.windowed_writes(),
            payload.runner_determined_sharding()
        );
        Ok(payload)
    }

    /// Decodes the sink and returns it with the payload's flags unchanged.
    pub fn from_payload(&self, payload: &WriteFilesPayload) -> Result<DecodedWrite> {
        let sink = self.codec.decode(payload.sink())?;
        require_file_sink(&sink)?;
        Ok(DecodedWrite {
            sink,
            windowed_writes: payload.windowed_writes(),
            runner_determined_sharding: payload.runner_determined_sharding(),
        })
    }

    pub fn sink_from_payload(&self, payload: &WriteFilesPayload) -> Result<SinkHandle> {
        self.from_payload(payload).map(|decoded| decoded.sink)
    }

    /// The node's sink: cloned from a live configuration, decoded from a restored payload.
    /// Both forms refuse sinks without the file capability.
    pub fn get_sink(&self, node: &AppliedWriteNode) -> Result<SinkHandle> {
        match node.body() {
            NodeBody::Live(write) => {
                require_file_sink(write.sink())?;
                Ok(write.sink().clone())
            }
            NodeBody::Restored(payload) => self.sink_from_payload(payload),
        }
    }
}

impl TransformPayloadTranslator for WriteFilesTranslation {
    type Node = AppliedWriteNode;

    fn urn(&self) -> &'static str {
        WRITE_FILES_URN
    }

    /// Restored payloads are passed through untouched rather than re-derived.
    fn translate(&self, node: &AppliedWriteNode) -> Result<FunctionSpec> {
        let payload = match node.body() {
            NodeBody::Live(write) => self.to_payload(write)?,
            NodeBody::Restored(payload) => payload.clone(),
        };
        Ok(FunctionSpec {
            urn: self.urn().to_string(),
            payload: payload.encode_to_vec()?,
        })
    }
}

fn require_file_sink(sink: &SinkHandle) -> Result<()> {
    if sink.as_file_sink().is_none() {
        log::warn!("Sink '{}' cannot back a write-files step", sink.urn());
        return Err(TranslationError::TypeMismatch {
            sink: sink.urn().to_string(),
            capability: FILE_SINK_CAPABILITY,
        });
    }
    Ok(())
}

/// Checks a payload's sharding flag against the configuration it claims to come from.
pub fn verify_sharding(payload: &WriteFilesPayload, write: &WriteFiles) -> Result<()> {
    let derived = runner_determined(write.num_shards(), write.sharding());
    let stored = payload.runner_determined_sharding();
    if stored != derived {
        log::error!(
            "Payload for sink '{}' has runner_determined_sharding={} but its configuration implies {}",
            write.sink().urn(),
            stored,
            derived
        );
        return Err(TranslationError::InvariantViolation { stored, derived });
    }
    Ok(())
}
