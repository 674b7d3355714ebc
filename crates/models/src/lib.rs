//! Domain entities shared by the service and HTTP layers.

pub mod errors;
pub mod review;
