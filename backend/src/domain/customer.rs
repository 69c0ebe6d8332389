//! Customer aggregate.
//!
//! Every factory and change method consumes the aggregate and returns an
//! [`Outcome`], so handlers can chain them with `bind`. Changes record
//! [`CustomerEvent`]s which stay pending until the application layer
//! publishes them.

use chrono::{DateTime, NaiveDate, Utc};
use result_pipeline::{Outcome, ResultError};
use uuid::Uuid;

use super::customer_values::validated;
use super::{
    Address, AddressDraft, AddressId, CustomerEvent, CustomerId, CustomerNumber, CustomerStatus,
    CustomerValidationError, EmailAddress, PersonName,
};

/// Customer aggregate root.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    number: CustomerNumber,
    first_name: PersonName,
    last_name: PersonName,
    email: EmailAddress,
    status: CustomerStatus,
    birth_date: Option<NaiveDate>,
    addresses: Vec<Address>,
    concurrency_version: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted: bool,
    events: Vec<CustomerEvent>,
}

impl Customer {
    /// Register a new customer in the [`CustomerStatus::Lead`] status.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Customer, CustomerNumber, CustomerStatus};
    ///
    /// let number = CustomerNumber::new("CUS", 2026, 100_000).expect("valid number");
    /// let customer = Customer::create("John", "Doe", "John.Doe@example.com", number)
    ///     .into_value()
    ///     .expect("valid customer");
    /// assert_eq!(customer.email().as_str(), "john.doe@example.com");
    /// assert_eq!(customer.status(), CustomerStatus::Lead);
    /// assert_eq!(customer.events().len(), 1);
    /// ```
    pub fn create(
        first_name: &str,
        last_name: &str,
        email: &str,
        number: CustomerNumber,
    ) -> Outcome<Self> {
        validated(PersonName::new("first_name", first_name))
            .bind(|first| {
                validated(PersonName::new("last_name", last_name)).map(|last| (first, last))
            })
            .bind(|names| validated(EmailAddress::new(email)).map(|email| (names, email)))
            .map(|((first_name, last_name), email)| {
                let now = Utc::now();
                let id = CustomerId::random();
                let created = CustomerEvent::Created {
                    customer_id: id,
                    number: number.clone(),
                    email: email.clone(),
                };
                Self {
                    id,
                    number,
                    first_name,
                    last_name,
                    email,
                    status: CustomerStatus::Lead,
                    birth_date: None,
                    addresses: Vec::new(),
                    concurrency_version: Uuid::new_v4(),
                    created_at: now,
                    updated_at: now,
                    deleted: false,
                    events: vec![created],
                }
            })
    }

    fn modifiable(self) -> Outcome<Self> {
        let id = self.id;
        Outcome::success(self).ensure(
            |customer| !customer.deleted,
            ResultError::conflict(format!("customer '{id}' has been deleted")),
        )
    }

    fn touched(mut self, event: CustomerEvent) -> Self {
        self.updated_at = Utc::now();
        self.events.push(event);
        self
    }

    fn updated(self) -> Self {
        let customer_id = self.id;
        self.touched(CustomerEvent::Updated { customer_id })
    }

    /// Replace first and last name.
    pub fn change_name(self, first_name: &str, last_name: &str) -> Outcome<Self> {
        self.modifiable()
            .bind(|customer| {
                validated(PersonName::new("first_name", first_name)).map(|first| (customer, first))
            })
            .bind(|(customer, first)| {
                validated(PersonName::new("last_name", last_name))
                    .map(|last| (customer, first, last))
            })
            .map(|(mut customer, first, last)| {
                if customer.first_name == first && customer.last_name == last {
                    return customer;
                }
                customer.first_name = first;
                customer.last_name = last;
                customer.updated()
            })
    }

    /// Replace the email address.
    pub fn change_email(self, email: &str) -> Outcome<Self> {
        self.modifiable()
            .bind(|customer| validated(EmailAddress::new(email)).map(|email| (customer, email)))
            .map(|(mut customer, email)| {
                if customer.email == email {
                    return customer;
                }
                customer.email = email;
                customer.updated()
            })
    }

    /// Move to another lifecycle status.
    pub fn change_status(self, status: CustomerStatus) -> Outcome<Self> {
        self.modifiable().map(|mut customer| {
            let from = customer.status;
            if from == status {
                return customer;
            }
            customer.status = status;
            let customer_id = customer.id;
            customer.touched(CustomerEvent::StatusChanged {
                customer_id,
                from,
                to: status,
            })
        })
    }

    /// Set or clear the birth date.
    pub fn change_birth_date(self, birth_date: Option<NaiveDate>) -> Outcome<Self> {
        let today = Utc::now().date_naive();
        self.modifiable()
            .ensure(
                |_| birth_date.is_none_or(|date| date <= today),
                CustomerValidationError::BirthDateInFuture,
            )
            .map(|mut customer| {
                if customer.birth_date == birth_date {
                    return customer;
                }
                customer.birth_date = birth_date;
                customer.updated()
            })
    }

    /// Attach an address. A new primary address demotes the previous one.
    pub fn add_address(self, draft: AddressDraft) -> Outcome<Self> {
        self.modifiable()
            .bind(|customer| validated(Address::new(draft)).map(|address| (customer, address)))
            .map(|(mut customer, address)| {
                if address.is_primary() {
                    for existing in &mut customer.addresses {
                        existing.set_primary(false);
                    }
                }
                customer.addresses.push(address);
                customer.updated()
            })
    }

    /// Detach an address.
    pub fn remove_address(self, address_id: AddressId) -> Outcome<Self> {
        self.modifiable()
            .ensure_with(
                |customer| customer.addresses.iter().any(|a| a.id() == address_id),
                |_| ResultError::entity_not_found("Address", address_id),
            )
            .map(|mut customer| {
                customer.addresses.retain(|a| a.id() != address_id);
                customer.updated()
            })
    }

    /// Flag the customer as deleted.
    pub fn mark_deleted(self) -> Outcome<Self> {
        self.modifiable().map(|mut customer| {
            customer.deleted = true;
            let customer_id = customer.id;
            customer.touched(CustomerEvent::Deleted { customer_id })
        })
    }

    /// Issue a fresh optimistic concurrency token. Called by repositories on
    /// every successful write.
    pub fn renew_concurrency_version(&mut self) -> Uuid {
        self.concurrency_version = Uuid::new_v4();
        self.concurrency_version
    }

    /// Remove and return the pending domain events.
    pub fn take_events(&mut self) -> Vec<CustomerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// Customer number.
    #[must_use]
    pub const fn number(&self) -> &CustomerNumber {
        &self.number
    }

    /// First name.
    #[must_use]
    pub const fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Last name.
    #[must_use]
    pub const fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> CustomerStatus {
        self.status
    }

    /// Birth date, when known.
    #[must_use]
    pub const fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    /// Attached addresses in insertion order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Current optimistic concurrency token.
    #[must_use]
    pub const fn concurrency_version(&self) -> Uuid {
        self.concurrency_version
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last change.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the customer was deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Domain events recorded since the last [`Customer::take_events`].
    #[must_use]
    pub fn events(&self) -> &[CustomerEvent] {
        &self.events
    }
}
