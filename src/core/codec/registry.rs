use crate::core::error::ExtensionError;
use crate::core::sink::FILE_BASED_SINK_URN;
use crate::core::sink::extension::SinkExtension;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Rebuilds an extension sink from `(state_version, state_bytes)`.
pub type SinkDecoder =
    Arc<dyn Fn(u32, &[u8]) -> Result<Arc<dyn SinkExtension>, ExtensionError> + Send + Sync>;

/// Sink definitions this process knows how to decode.
///
/// Built once at start-up and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct SinkRegistry {
    decoders: HashMap<String, SinkDecoder>,
}

impl SinkRegistry {
    pub fn builder() -> SinkRegistryBuilder {
        SinkRegistryBuilder::default()
    }

    /// A registry that only knows the built-in sinks.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, urn: &str) -> bool {
        urn == FILE_BASED_SINK_URN || self.decoders.contains_key(urn)
    }

    /// Registered extension urns, sorted.
    pub fn urns(&self) -> Vec<&str> {
        let mut urns: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        urns.sort_unstable();
        urns
    }

    pub(crate) fn decoder(&self, urn: &str) -> Option<&SinkDecoder> {
        self.decoders.get(urn)
    }
}

impl fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("urns", &self.urns())
            .finish()
    }
}

/// Builder for [`SinkRegistry`].
#[derive(Default)]
pub struct SinkRegistryBuilder {
    decoders: HashMap<String, SinkDecoder>,
}

impl SinkRegistryBuilder {
    /// Registers the decoder for an extension urn.
    pub fn register<F>(mut self, urn: impl Into<String>, decoder: F) -> Self
    where
        F: Fn(u32, &[u8]) -> Result<Arc<dyn SinkExtension>, ExtensionError>
            + Send
            + Sync
            + 'static,
    {
        let urn = urn.into();
        if urn == FILE_BASED_SINK_URN {
            log::warn!(
                "Ignoring decoder for '{}': the built-in file sink cannot be overridden.",
                urn
            );
            return self;
        }
        if self.decoders.contains_key(&urn) {
            log::warn!(
                "Warning: Sink definition {} was already registered, overwriting its decoder.",
                &urn
            );
        }
        self.decoders.insert(urn, Arc::new(decoder));
        self
    }

    pub fn build(self) -> SinkRegistry {
        SinkRegistry {
            decoders: self.decoders,
        }
    }
}
