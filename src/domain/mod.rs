// Domain layer: phone numbers, the upstream schema, risk tiers and the upstream port.

pub mod model;
pub mod phone;
pub mod ports;
pub mod risk;
