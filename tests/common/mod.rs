#![allow(dead_code)]

use scrivener::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU32;
use std::sync::Arc;

pub const DUMMY_SINK_URN: &str = "urn:scrivener:test:dummy_sink:v1";
pub const METRICS_SINK_URN: &str = "urn:scrivener:test:metrics_sink:v1";
pub const LIVE_SINK_URN: &str = "urn:scrivener:test:live_sink:v1";
pub const DUMMY_NAMING_URN: &str = "urn:scrivener:test:dummy_naming:v1";

pub fn shards(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

pub fn dir(spec: &str) -> ResourceId {
    ResourceId::new_resource(spec, true).unwrap()
}

/// A minimal user-defined file sink. Equal to another dummy sink whenever both
/// destinations resolve to the same resource.
#[derive(Debug, Clone)]
pub struct DummySink {
    destination: LocatorProvider,
    naming: FilenamePolicy,
}

#[derive(Serialize, Deserialize)]
struct DummyState {
    destination: String,
}

impl DummySink {
    pub fn new() -> Self {
        Self::at(LocatorProvider::of(dir("nowhere")))
    }

    pub fn at(destination: LocatorProvider) -> Self {
        Self {
            destination,
            naming: CustomFilenamePolicy::new(DUMMY_NAMING_URN, json!(null)).into(),
        }
    }
}

impl SinkExtension for DummySink {
    fn urn(&self) -> &str {
        DUMMY_SINK_URN
    }

    fn encode_state(&self) -> Result<Vec<u8>, ExtensionError> {
        let destination = match self.destination.resolve() {
            Ok(resource) => resource.to_string(),
            Err(e) => return Err(ExtensionError::NotReproducible(e.to_string())),
        };
        Ok(serde_json::to_vec(&DummyState { destination })?)
    }

    fn dyn_eq(&self, other: &dyn SinkExtension) -> bool {
        other
            .as_any()
            .downcast_ref::<DummySink>()
            .is_some_and(|that| self.destination.same_resource(&that.destination))
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.destination.resolve().ok().hash(&mut state);
    }

    fn as_file_sink(&self) -> Option<&dyn FileSink> {
        Some(self)
    }
}

impl FileSink for DummySink {
    fn destination(&self) -> &LocatorProvider {
        &self.destination
    }

    fn filename_policy(&self) -> Option<&FilenamePolicy> {
        Some(&self.naming)
    }
}

/// An extension that decodes fine but cannot write files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricsSink {
    pub endpoint: String,
}

impl SinkExtension for MetricsSink {
    fn urn(&self) -> &str {
        METRICS_SINK_URN
    }

    fn encode_state(&self) -> Result<Vec<u8>, ExtensionError> {
        Ok(serde_json::to_vec(self)?)
    }

    fn dyn_eq(&self, other: &dyn SinkExtension) -> bool {
        other.as_any().downcast_ref::<MetricsSink>() == Some(self)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// An extension holding an in-process handle that has no byte representation.
#[derive(Debug, Clone)]
pub struct LiveSink {
    pub connection: Arc<()>,
}

impl SinkExtension for LiveSink {
    fn urn(&self) -> &str {
        LIVE_SINK_URN
    }

    fn encode_state(&self) -> Result<Vec<u8>, ExtensionError> {
        Err(ExtensionError::NotReproducible(
            "open connection handle".to_string(),
        ))
    }

    fn dyn_eq(&self, other: &dyn SinkExtension) -> bool {
        other
            .as_any()
            .downcast_ref::<LiveSink>()
            .is_some_and(|that| Arc::ptr_eq(&self.connection, &that.connection))
    }

    fn dyn_hash(&self, state: &mut dyn Hasher) {
        state.write_usize(Arc::as_ptr(&self.connection) as usize);
    }
}

fn decode_dummy(version: u32, bytes: &[u8]) -> Result<Arc<dyn SinkExtension>, ExtensionError> {
    if version != 1 {
        return Err(ExtensionError::UnsupportedVersion {
            found: version,
            supported: 1,
        });
    }
    let state: DummyState = serde_json::from_slice(bytes)?;
    let destination = ResourceId::new_resource(&state.destination, true)
        .map_err(|e| ExtensionError::InvalidState(e.to_string()))?;
    Ok(Arc::new(DummySink::at(LocatorProvider::of(destination))))
}

fn decode_metrics(_version: u32, bytes: &[u8]) -> Result<Arc<dyn SinkExtension>, ExtensionError> {
    let sink: MetricsSink = serde_json::from_slice(bytes)?;
    Ok(Arc::new(sink))
}

/// Registry knowing the dummy and metrics sinks, as a worker process would build it.
pub fn test_registry() -> Arc<SinkRegistry> {
    Arc::new(
        SinkRegistry::builder()
            .register(DUMMY_SINK_URN, decode_dummy)
            .register(METRICS_SINK_URN, decode_metrics)
            .build(),
    )
}

pub fn translation() -> WriteFilesTranslation {
    WriteFilesTranslation::new(test_registry())
}

pub fn file_sink() -> SinkHandle {
    FileBasedSink::builder(dir("/tmp/scrivener/out"))
        .naming(DefaultFilenamePolicy::new("part").with_suffix(".txt"))
        .compression(Compression::Gzip)
        .build()
        .into()
}

pub fn dummy_sink() -> SinkHandle {
    SinkHandle::extension(DummySink::new())
}

/// The four write configurations every translation test runs against.
pub fn scenarios(sink: fn() -> SinkHandle) -> Vec<WriteFiles> {
    vec![
        WriteFiles::to(sink()),
        WriteFiles::to(sink()).with_windowed_writes(),
        WriteFiles::to(sink()).with_num_shards(shards(17)),
        WriteFiles::to(sink())
            .with_windowed_writes()
            .with_num_shards(shards(42)),
    ]
}
