//! # Scrivener
//!
//! Translation of write-files pipeline steps into portable payloads, and back.
//!
//! A [`WriteFiles`] step names a [`SinkHandle`] (where output goes and how files
//! are named), an optional shard count or [`ShardingFunction`], and whether writes
//! are windowed. [`WriteFilesTranslation`] flattens it into a three-field
//! [`WriteFilesPayload`] that can cross a process boundary, and rebuilds an equal
//! sink from it on the other side.
//!
//! ## Features
//!
//! - **Closed wire schema, open sinks**: user sink kinds plug in through
//!   [`SinkExtension`] and a [`SinkRegistry`] without touching the payload layout
//! - **One source of truth**: the sharding decision is taken once, at encode time
//! - **Path-independent accessors**: a graph node answers the same questions whether it
//!   holds the live configuration or only a restored payload
//!
//! ## Quick Start
//!
//! ```rust
//! use scrivener::prelude::*;
//! use std::num::NonZeroU32;
//!
//! let out = ResourceId::new_resource("/data/out", true).unwrap();
//! let sink = FileBasedSink::builder(out)
//!     .naming(DefaultFilenamePolicy::new("part").with_suffix(".txt"))
//!     .build();
//! let write = WriteFiles::to(sink).with_num_shards(NonZeroU32::new(17).unwrap());
//!
//! let translation = WriteFilesTranslation::default();
//! let payload = translation.to_payload(&write).unwrap();
//! assert!(!payload.runner_determined_sharding());
//!
//! let restored = AppliedWriteNode::builder().label("write").restore(payload);
//! assert_eq!(&translation.get_sink(&restored).unwrap(), write.sink());
//! ```
//!
//! ## Module Organization
//!
//! - [`prelude`]: Commonly used types and functions (import with `use scrivener::prelude::*`)
//! - [`codec`]: Sink blob encoding and the registry of extension sinks
//! - [`naming`]: File naming policies

// ============================================================================
// Core Module
// ============================================================================

mod core;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

pub use crate::core::{AsAny, Record};

// Errors
pub use crate::core::error::{DecodeFailure, ExtensionError, LocatorError, Result, TranslationError};

// Sinks
pub use crate::core::resource::{LocatorProvider, ResourceId};
pub use crate::core::sink::extension::SinkExtension;
pub use crate::core::sink::naming;
pub use crate::core::sink::naming::{CustomFilenamePolicy, DefaultFilenamePolicy, FilenamePolicy};
pub use crate::core::sink::{
    Compression, FILE_BASED_SINK_URN, FileBasedSink, FileBasedSinkBuilder, FileSink, SinkHandle,
};

// Codec
pub use crate::core::codec;
pub use crate::core::codec::SinkCodec;
pub use crate::core::codec::registry::{SinkDecoder, SinkRegistry, SinkRegistryBuilder};

// Configuration and payloads
pub use crate::core::payload::{FunctionSpec, WRITE_FILES_URN, WriteFilesPayload};
pub use crate::core::write::{HashSharding, ShardingFunction, WriteFiles, runner_determined};

// Translation and graph access
pub use crate::core::graph::{
    AppliedWriteNode, AppliedWriteNodeBuilder, NodeBody, WriteProperties,
    is_runner_determined_sharding, is_windowed_writes,
};
pub use crate::core::translation::{
    DecodedWrite, TransformPayloadTranslator, WriteFilesTranslation, verify_sharding,
};

// ============================================================================
// Prelude Module - Convenient Bulk Imports
// ============================================================================

/// Imports everything needed to configure, translate and inspect write steps.
///
/// # Example
/// ```rust
/// use scrivener::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        AppliedWriteNode,
        AsAny,
        Compression,
        CustomFilenamePolicy,
        DecodedWrite,
        DefaultFilenamePolicy,
        ExtensionError,
        FileBasedSink,
        FileSink,
        FilenamePolicy,
        FunctionSpec,
        HashSharding,
        LocatorProvider,
        ResourceId,
        ShardingFunction,
        SinkExtension,
        SinkHandle,
        SinkRegistry,
        TransformPayloadTranslator,
        TranslationError,
        WriteFiles,
        WriteFilesPayload,
        WriteFilesTranslation,
        WriteProperties,
        is_runner_determined_sharding,
        is_windowed_writes,
        verify_sharding,
    };
}

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
