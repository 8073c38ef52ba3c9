// Domain layer: content models, typed section blocks, and ports (interfaces).

pub mod model;
pub mod ports;
pub mod section;
