//! Customer domain: aggregate, value types, events, rules, and ports.
//!
//! Purpose: keep business invariants free of transport and storage concerns.
//! Aggregate factories and change methods return
//! [`result_pipeline::Outcome`]s so application handlers compose them
//! without `?` or panics.
//!
//! Public surface:
//! - [`Customer`]: the aggregate root.
//! - [`CustomerStatus`]: lifecycle status with stable identifiers.
//! - [`CustomerEvent`]: domain events pending publication.
//! - [`EmailShouldBeUniqueRule`]: repository-backed business rule.
//! - [`StatusTransitionShouldBeAllowedRule`]: lifecycle transition guard.
//! - [`TraceId`]: per-request correlation identifier.

mod customer;
mod customer_events;
mod customer_rules;
mod customer_status;
mod customer_values;
pub mod ports;
mod trace_id;

pub use self::customer::Customer;
pub use self::customer_events::CustomerEvent;
pub use self::customer_rules::{
    EmailShouldBeUniqueRule, StatusTransitionShouldBeAllowedRule,
};
pub use self::customer_status::CustomerStatus;
pub use self::customer_values::{
    Address, AddressDraft, AddressId, CustomerId, CustomerNumber, CustomerValidationError,
    EmailAddress, PERSON_NAME_MAX, PersonName, validated,
};
pub use self::trace_id::TraceId;
