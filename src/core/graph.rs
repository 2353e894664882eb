use crate::core::error::Result;
use crate::core::payload::{FunctionSpec, WriteFilesPayload};
use crate::core::write::{WriteFiles, runner_determined};

/// What an applied write node carries.
#[derive(Debug, Clone)]
pub enum NodeBody {
    /// The configuration the caller built.
    Live(WriteFiles),
    /// Only the payload, e.g. after the graph was rebuilt from a descriptor.
    Restored(WriteFilesPayload),
}

/// The operational flags of a write step, whichever form it is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteProperties {
    pub windowed_writes: bool,
    pub runner_determined_sharding: bool,
}

impl WriteProperties {
    /// Single place where both node forms are reduced to flags.
    pub fn of(body: &NodeBody) -> Self {
        match body {
            NodeBody::Live(write) => Self {
                windowed_writes: write.is_windowed_writes(),
                runner_determined_sharding: runner_determined(write.num_shards(), write.sharding()),
            },
            NodeBody::Restored(payload) => Self {
                windowed_writes: payload.windowed_writes(),
                runner_determined_sharding: payload.runner_determined_sharding(),
            },
        }
    }
}

/// A write-files step attached to a pipeline graph.
#[derive(Debug, Clone)]
pub struct AppliedWriteNode {
    label: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    body: NodeBody,
}

impl AppliedWriteNode {
    pub fn builder() -> AppliedWriteNodeBuilder {
        AppliedWriteNodeBuilder::default()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn properties(&self) -> WriteProperties {
        WriteProperties::of(&self.body)
    }
}

/// Whether the runner picks the shard count for this step.
pub fn is_runner_determined_sharding(node: &AppliedWriteNode) -> bool {
    node.properties().runner_determined_sharding
}

/// Whether this step writes one set of files per window.
pub fn is_windowed_writes(node: &AppliedWriteNode) -> bool {
    node.properties().windowed_writes
}

/// Builder for [`AppliedWriteNode`].
#[derive(Debug, Default)]
pub struct AppliedWriteNodeBuilder {
    label: Option<String>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl AppliedWriteNodeBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(output.into());
        self
    }

    /// Attaches a live configuration.
    pub fn build(self, write: WriteFiles) -> AppliedWriteNode {
        self.finish(NodeBody::Live(write))
    }

    /// Attaches a payload that was decoded earlier.
    pub fn restore(self, payload: WriteFilesPayload) -> AppliedWriteNode {
        self.finish(NodeBody::Restored(payload))
    }

    /// Rebuilds a node from a descriptor's step spec.
    pub fn from_spec(self, spec: &FunctionSpec) -> Result<AppliedWriteNode> {
        let payload = spec.write_files_payload()?;
        Ok(self.restore(payload))
    }

    fn finish(self, body: NodeBody) -> AppliedWriteNode {
        let label = self.label.unwrap_or_else(|| {
            let label = format!("write_files_{}", uuid::Uuid::new_v4().simple());
            log::warn!(
                "Auto-generated label '{}'. For stable graph identity, use .label().",
                label
            );
            label
        });
        AppliedWriteNode {
            label,
            inputs: self.inputs,
            outputs: self.outputs,
            body,
        }
    }
}
