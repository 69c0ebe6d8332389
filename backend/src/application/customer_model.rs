//! Read model returned by customer commands and queries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Address, Customer};

/// Address as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressModel {
    /// Address identifier.
    pub id: String,
    /// Addressee or label.
    pub name: String,
    /// First street line.
    pub line1: String,
    /// Second street line.
    pub line2: Option<String>,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// Country.
    pub country: String,
    /// Whether this is the primary address.
    pub is_primary: bool,
}

impl From<&Address> for AddressModel {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id().to_string(),
            name: address.name().to_owned(),
            line1: address.line1().to_owned(),
            line2: address.line2().map(str::to_owned),
            postal_code: address.postal_code().to_owned(),
            city: address.city().to_owned(),
            country: address.country().to_owned(),
            is_primary: address.is_primary(),
        }
    }
}

/// Customer as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerModel {
    /// Customer identifier.
    pub id: String,
    /// Customer number, e.g. `CUS-2026-100000`.
    pub number: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Normalised email address.
    pub email: String,
    /// Status display name.
    pub status: String,
    /// Status identifier.
    pub status_id: i32,
    /// Birth date, when known.
    pub birth_date: Option<NaiveDate>,
    /// Attached addresses.
    pub addresses: Vec<AddressModel>,
    /// Token to send back with the next update.
    pub concurrency_version: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last change.
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerModel {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id().to_string(),
            number: customer.number().to_string(),
            first_name: customer.first_name().to_string(),
            last_name: customer.last_name().to_string(),
            email: customer.email().to_string(),
            status: customer.status().name().to_owned(),
            status_id: customer.status().id(),
            birth_date: customer.birth_date(),
            addresses: customer.addresses().iter().map(AddressModel::from).collect(),
            concurrency_version: customer.concurrency_version(),
            created_at: customer.created_at(),
            updated_at: customer.updated_at(),
        }
    }
}
