//! Customer module composed from `result-pipeline` handlers.
//!
//! Layers follow the hexagonal layout: [`domain`] holds the aggregate, its
//! rules, and the driven ports; [`application`] composes requests and
//! handlers; [`inbound`] and [`outbound`] hold the adapters.

pub mod application;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod telemetry;
