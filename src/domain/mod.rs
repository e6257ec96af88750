// Domain layer: project model and ports.

pub mod model;
pub mod ports;
