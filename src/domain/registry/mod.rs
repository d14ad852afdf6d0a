//! Registry domain - static pool metadata grouped into cohorts

mod pool_registry;

pub use pool_registry::{Cohort, PoolRegistry, RegistryEntry};
