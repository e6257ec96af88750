// Adapters layer: concrete implementations for external systems.

pub mod notion;
pub mod storage;
