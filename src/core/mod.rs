pub mod codec;
pub mod error;
pub mod graph;
pub mod payload;
pub mod resource;
pub mod sink;
pub mod translation;
pub mod write;

use std::any::Any;

/// Records handed to sharding functions and carried as opaque naming state.
pub type Record = serde_json::Value;

/// A helper trait that just provides the `as_any` method.
/// Needed for downcasting extension sinks when comparing them.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
