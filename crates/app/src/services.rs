//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod crop_service;
pub mod farm_service;
pub mod harvest_service;
pub mod planting_service;
pub mod producer_service;
