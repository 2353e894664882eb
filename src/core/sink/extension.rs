use crate::core::AsAny;
use crate::core::error::ExtensionError;
use crate::core::sink::FileSink;
use std::fmt::Debug;
use std::hash::Hasher;

/// A user-defined sink kind carried through the wire format as opaque, versioned bytes.
///
/// The extension owns its byte layout. It is decoded again only through a decoder
/// registered under the same urn in a [`SinkRegistry`](crate::SinkRegistry).
pub trait SinkExtension: AsAny + Debug + Send + Sync + 'static {
    /// Stable identifier of this sink definition.
    fn urn(&self) -> &str;

    /// Version of the state layout written by [`encode_state`](Self::encode_state).
    fn version(&self) -> u32 {
        1
    }

    /// Serializes the sink's state.
    fn encode_state(&self) -> Result<Vec<u8>, ExtensionError>;

    /// Value equality with another extension. Implementations usually downcast via `as_any`.
    fn dyn_eq(&self, other: &dyn SinkExtension) -> bool;

    /// Feeds the identity used by `dyn_eq` into `state`.
    fn dyn_hash(&self, state: &mut dyn Hasher);

    /// Optional: Returns the file sink interface if this extension writes files.
    fn as_file_sink(&self) -> Option<&dyn FileSink> {
        None
    }
}
