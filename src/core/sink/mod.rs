//! Sink handles: where a write step puts its output and how the files are named.
//!
//! - [`SinkHandle`] is the closed union carried by a write configuration
//! - [`FileBasedSink`] is the well-known variant with explicit fields
//! - [`SinkExtension`] lets user code add sink kinds without touching the wire schema
//! - [`FileSink`] is the capability a decoded sink must offer to be written to

pub mod extension;
pub mod naming;

use crate::core::error::LocatorError;
use crate::core::resource::{LocatorProvider, ResourceId};
use extension::SinkExtension;
use naming::FilenamePolicy;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identifier of the built-in file based sink definition.
pub const FILE_BASED_SINK_URN: &str = "beam:sink:file_based:v1";

/// Directory, relative to the destination, where shards are staged before commit.
pub const TEMP_DIRECTORY_NAME: &str = ".temp-write";

/// The capability a sink needs to be usable by a write-files step: a destination
/// to locate and a naming policy to enumerate output files with.
pub trait FileSink: Send + Sync {
    fn destination(&self) -> &LocatorProvider;

    /// `None` when names are produced per window by the runner.
    fn filename_policy(&self) -> Option<&FilenamePolicy>;

    /// Suffix appended to every produced file name.
    fn suggested_suffix(&self) -> &str {
        ""
    }

    /// Lists the unwindowed output files for `num_shards` shards.
    ///
    /// Empty when the naming policy cannot be evaluated locally.
    fn output_files(&self, num_shards: u32) -> Result<Vec<ResourceId>, LocatorError> {
        let directory = self.destination().resolve()?;
        let Some(policy) = self.filename_policy() else {
            return Ok(Vec::new());
        };
        let mut files = Vec::new();
        for shard in 0..num_shards {
            let Some(name) = policy.unwindowed_filename(shard, num_shards) else {
                return Ok(Vec::new());
            };
            files.push(directory.child(&format!("{}{}", name, self.suggested_suffix()), false)?);
        }
        Ok(files)
    }
}

/// Compression applied to written files. Part of the sink's identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    #[default]
    Uncompressed,
    Gzip,
    Deflate,
    Zstd,
}

impl Compression {
    pub fn suffix(&self) -> &'static str {
        match self {
            Compression::Uncompressed => "",
            Compression::Gzip => ".gz",
            Compression::Deflate => ".deflate",
            Compression::Zstd => ".zst",
        }
    }
}

/// Writes files under a destination directory, named by an optional policy.
#[derive(Debug, Clone)]
pub struct FileBasedSink {
    pub(crate) destination: LocatorProvider,
    pub(crate) naming: Option<Arc<FilenamePolicy>>,
    pub(crate) compression: Compression,
}

impl FileBasedSink {
    pub fn builder(destination: impl Into<LocatorProvider>) -> FileBasedSinkBuilder {
        FileBasedSinkBuilder {
            destination: destination.into(),
            naming: None,
            compression: Compression::default(),
        }
    }

    pub fn naming(&self) -> Option<&Arc<FilenamePolicy>> {
        self.naming.as_ref()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Staging directory derived from the destination; never stored separately.
    pub fn temp_directory(&self) -> Result<ResourceId, LocatorError> {
        self.destination.resolve()?.child(TEMP_DIRECTORY_NAME, true)
    }
}

impl FileSink for FileBasedSink {
    fn destination(&self) -> &LocatorProvider {
        &self.destination
    }

    fn filename_policy(&self) -> Option<&FilenamePolicy> {
        self.naming.as_deref()
    }

    fn suggested_suffix(&self) -> &str {
        self.compression.suffix()
    }
}

/// Equal when both destinations resolve to the same resource and naming and
/// compression match. An unresolvable destination is never equal to anything.
impl PartialEq for FileBasedSink {
    fn eq(&self, other: &Self) -> bool {
        self.destination.same_resource(&other.destination)
            && self.naming == other.naming
            && self.compression == other.compression
    }
}

impl Hash for FileBasedSink {
    fn hash<H: Hasher>(&self, state: &mut H) {
        FILE_BASED_SINK_URN.hash(state);
        self.destination.resolve().ok().hash(state);
        self.naming.hash(state);
        self.compression.hash(state);
    }
}

/// Builder for [`FileBasedSink`].
pub struct FileBasedSinkBuilder {
    destination: LocatorProvider,
    naming: Option<Arc<FilenamePolicy>>,
    compression: Compression,
}

impl FileBasedSinkBuilder {
    pub fn naming(mut self, policy: impl Into<FilenamePolicy>) -> Self {
        self.naming = Some(Arc::new(policy.into()));
        self
    }

    /// Uses an already shared policy instance.
    pub fn shared_naming(mut self, policy: Arc<FilenamePolicy>) -> Self {
        self.naming = Some(policy);
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn build(self) -> FileBasedSink {
        FileBasedSink {
            destination: self.destination,
            naming: self.naming,
            compression: self.compression,
        }
    }
}

/// Where and how a write step emits output.
#[derive(Debug, Clone)]
pub enum SinkHandle {
    Files(FileBasedSink),
    Extension(Arc<dyn SinkExtension>),
}

impl SinkHandle {
    pub fn extension<E: SinkExtension>(extension: E) -> Self {
        SinkHandle::Extension(Arc::new(extension))
    }

    /// Identifier of the sink definition behind this handle.
    pub fn urn(&self) -> &str {
        match self {
            SinkHandle::Files(_) => FILE_BASED_SINK_URN,
            SinkHandle::Extension(extension) => extension.urn(),
        }
    }

    pub fn as_file_sink(&self) -> Option<&dyn FileSink> {
        match self {
            SinkHandle::Files(sink) => Some(sink as &dyn FileSink),
            SinkHandle::Extension(extension) => extension.as_file_sink(),
        }
    }
}

impl From<FileBasedSink> for SinkHandle {
    fn from(sink: FileBasedSink) -> Self {
        SinkHandle::Files(sink)
    }
}

impl PartialEq for SinkHandle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SinkHandle::Files(a), SinkHandle::Files(b)) => a == b,
            (SinkHandle::Extension(a), SinkHandle::Extension(b)) => {
                a.urn() == b.urn() && a.dyn_eq(&**b)
            }
            _ => false,
        }
    }
}

impl Hash for SinkHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            SinkHandle::Files(sink) => sink.hash(state),
            SinkHandle::Extension(extension) => {
                extension.urn().hash(state);
                extension.dyn_hash(state);
            }
        }
    }
}
