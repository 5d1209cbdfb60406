//! # farmledger-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **REST-ish JSON API** under `/api` for producers, farms, crops,
//!   harvests and plantings, plus a `/health` probe
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and [`LedgerError`](farmledger_domain::error::LedgerError)s
//!   into HTTP responses
//!
//! ## Dependency rule
//! Depends on `farmledger-app` (for port traits and services) and
//! `farmledger-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
