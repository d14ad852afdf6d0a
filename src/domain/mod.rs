//! Domain layer - rewards pools and the registry that describes them

pub mod pool;
pub mod registry;
