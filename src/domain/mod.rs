// Domain layer: API payload shapes, scorer rows and the ports the pipeline is built on.

pub mod model;
pub mod ports;
