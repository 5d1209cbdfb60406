//! # farmledger-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ProducerRepository`, `FarmRepository`, `CropRepository`,
//!     `HarvestRepository` — CRUD plus lookups used for uniqueness checks
//!   - `PlantingRepository` — reads plus the atomic capacity reservation
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ProducerService` — fiscal-identifier validation and uniqueness
//!   - `FarmService` — producer reference and land-area invariant
//!   - `CropService`, `HarvestService` — unique names
//!   - `PlantingService` — references, then capacity reservation
//! - Merge partial updates into complete candidates before validating them
//!
//! ## Dependency rule
//! Depends on `farmledger-domain` only (plus `tracing`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
