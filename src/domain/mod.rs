// Domain layer: photometric types, the classifier contract and the storage/config ports.

pub mod model;
pub mod ports;
