//! # farmledger-domain
//!
//! Pure domain model for the farmledger rural-producer registry.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps, paging
//! - Validate and format fiscal identifiers (CPF / CNPJ)
//! - Define **Producers**, **Farms**, **Crops**, **Harvests** and **Crop plantings**
//! - Enforce the land-area invariant of a farm
//! - Enforce the planting capacity rule against a farm's cultivable area
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod page;
pub mod time;

mod field;

pub mod crop;
pub mod document;
pub mod farm;
pub mod harvest;
pub mod planting;
pub mod producer;
