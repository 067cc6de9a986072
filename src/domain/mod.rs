// Domain layer: value types, request/response payloads and ports.

pub mod model;
pub mod ports;
