//! Infrastructure layer - network bindings

pub mod chain;
