//! Media storage backends.

mod local;

pub use local::LocalMediaStore;
