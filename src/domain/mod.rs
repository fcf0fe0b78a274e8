// Domain layer: models and ports. The remote service and the filesystem stay behind the ports.

pub mod model;
pub mod ports;
