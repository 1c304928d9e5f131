pub mod registry_search;

pub use registry_search::{search_registry, RegistryHit};
