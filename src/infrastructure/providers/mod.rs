//! Provider backends

mod local_cloud;

pub use local_cloud::{InvalidationEntry, LocalCloud, ProviderCall};
