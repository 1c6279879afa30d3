// Domain layer: set models and ports (interfaces).

pub mod model;
pub mod ports;
