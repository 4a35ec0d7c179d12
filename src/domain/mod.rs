// Domain layer: product model and ports (storage, clock). No I/O here.

pub mod model;
pub mod ports;
