use crate::core::Record;
use crate::core::sink::SinkHandle;
use std::fmt::Debug;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Decides which shard a record is written to.
pub trait ShardingFunction: Debug + Send + Sync + 'static {
    /// Returns a shard index in `0..shard_count`.
    fn assign_shard(&self, record: &Record, shard_count: NonZeroU32) -> u32;
}

/// Spreads records over shards by a BLAKE3 digest of their JSON text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashSharding;

impl ShardingFunction for HashSharding {
    fn assign_shard(&self, record: &Record, shard_count: NonZeroU32) -> u32 {
        let digest = blake3::hash(record.to_string().as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest.as_bytes()[..8]);
        (u64::from_le_bytes(prefix) % u64::from(shard_count.get())) as u32
    }
}

/// Whether the runner picks the shard count. True only when neither an explicit
/// count nor a custom sharding function was configured.
pub fn runner_determined(
    num_shards: Option<NonZeroU32>,
    sharding: Option<&Arc<dyn ShardingFunction>>,
) -> bool {
    num_shards.is_none() && sharding.is_none()
}

/// Configuration of a write-files step.
#[derive(Debug, Clone)]
pub struct WriteFiles {
    sink: SinkHandle,
    num_shards: Option<NonZeroU32>,
    sharding: Option<Arc<dyn ShardingFunction>>,
    windowed_writes: bool,
}

impl WriteFiles {
    /// Writes to `sink` with runner-determined sharding and unwindowed output.
    pub fn to(sink: impl Into<SinkHandle>) -> Self {
        Self {
            sink: sink.into(),
            num_shards: None,
            sharding: None,
            windowed_writes: false,
        }
    }

    /// Fixes the number of output shards.
    pub fn with_num_shards(mut self, num_shards: NonZeroU32) -> Self {
        self.num_shards = Some(num_shards);
        self
    }

    pub fn with_sharding<F: ShardingFunction>(mut self, sharding: F) -> Self {
        self.sharding = Some(Arc::new(sharding));
        self
    }

    /// Clears any explicit shard count or sharding function.
    pub fn with_runner_determined_sharding(mut self) -> Self {
        self.num_shards = None;
        self.sharding = None;
        self
    }

    pub fn with_windowed_writes(mut self) -> Self {
        self.windowed_writes = true;
        self
    }

    pub fn sink(&self) -> &SinkHandle {
        &self.sink
    }

    pub fn num_shards(&self) -> Option<NonZeroU32> {
        self.num_shards
    }

    pub fn sharding(&self) -> Option<&Arc<dyn ShardingFunction>> {
        self.sharding.as_ref()
    }

    pub fn is_windowed_writes(&self) -> bool {
        self.windowed_writes
    }

    pub fn is_runner_determined_sharding(&self) -> bool {
        runner_determined(self.num_shards, self.sharding.as_ref())
    }
}
