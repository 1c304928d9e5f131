//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod registry;
pub mod test_dependencies;
pub mod traits;

pub use ai::GeminiAI;
pub use deps::ServerDeps;
pub use registry::RegistryAdapter;
pub use test_dependencies::{MockAI, MockRegistry, TestDependencies};
pub use traits::*;
