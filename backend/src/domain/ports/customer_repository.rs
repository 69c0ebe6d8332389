//! Port for customer persistence.

use async_trait::async_trait;
use result_pipeline::Outcome;
use serde::Serialize;

use crate::domain::{Customer, CustomerId, CustomerStatus, EmailAddress};

/// Effect of a repository write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryActionResult {
    /// The entity was removed.
    Deleted,
    /// Nothing matched the given identifier.
    NotFound,
}

/// Criteria for [`CustomerRepository::find_all`] and
/// [`CustomerRepository::count`]. Unset criteria match every customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    status: Option<CustomerStatus>,
    email: Option<EmailAddress>,
    email_contains: Option<String>,
    exclude: Option<CustomerId>,
}

impl CustomerFilter {
    /// Filter matching every customer.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Only customers in `status`.
    #[must_use]
    pub fn with_status(mut self, status: CustomerStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only the customer owning exactly `email`.
    #[must_use]
    pub fn with_email(mut self, email: EmailAddress) -> Self {
        self.email = Some(email);
        self
    }

    /// Only customers whose email contains `fragment`, ignoring case.
    #[must_use]
    pub fn email_containing(mut self, fragment: impl AsRef<str>) -> Self {
        self.email_contains = Some(fragment.as_ref().trim().to_lowercase());
        self
    }

    /// Skip the customer identified by `id`.
    #[must_use]
    pub fn excluding(mut self, id: CustomerId) -> Self {
        self.exclude = Some(id);
        self
    }

    /// Whether `customer` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, customer: &Customer) -> bool {
        self.status.is_none_or(|status| customer.status() == status)
            && self
                .email
                .as_ref()
                .is_none_or(|email| customer.email() == email)
            && self
                .email_contains
                .as_deref()
                .is_none_or(|fragment| customer.email().as_str().contains(fragment))
            && self.exclude.is_none_or(|id| customer.id() != id)
    }
}

/// Port for storing and loading customer aggregates.
///
/// Writes enforce optimistic concurrency: `update` fails with a concurrency
/// error when the stored token differs from the aggregate's, and every
/// successful write issues a fresh token on the returned aggregate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Load a customer; fails with an entity-not-found error when absent.
    async fn find_one(&self, id: CustomerId) -> Outcome<Customer>;

    /// Load every customer matching `filter`, ordered by customer number.
    async fn find_all(&self, filter: &CustomerFilter) -> Outcome<Vec<Customer>>;

    /// Count customers matching `filter`.
    async fn count(&self, filter: &CustomerFilter) -> Outcome<usize>;

    /// Store a new customer.
    async fn insert(&self, customer: Customer) -> Outcome<Customer>;

    /// Replace a stored customer.
    async fn update(&self, customer: Customer) -> Outcome<Customer>;

    /// Remove a customer.
    async fn delete(&self, id: CustomerId) -> Outcome<RepositoryActionResult>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for customer filters.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::CustomerNumber;

    #[fixture]
    fn customer() -> Customer {
        let number = CustomerNumber::new("CUS", 2026, 100_001).expect("valid number");
        Customer::create("Ada", "Lovelace", "ada@analytical.org", number)
            .into_value()
            .expect("valid customer")
    }

    fn email(value: &str) -> EmailAddress {
        EmailAddress::new(value).expect("valid email")
    }

    #[rstest]
    fn empty_filter_matches(customer: Customer) {
        assert!(CustomerFilter::all().matches(&customer));
    }

    #[rstest]
    #[case(CustomerFilter::all().with_status(CustomerStatus::Lead), true)]
    #[case(CustomerFilter::all().with_status(CustomerStatus::Retired), false)]
    #[case(CustomerFilter::all().with_email(email("ada@analytical.org")), true)]
    #[case(CustomerFilter::all().with_email(email("bob@analytical.org")), false)]
    #[case(CustomerFilter::all().email_containing("ANALYTICAL"), true)]
    #[case(CustomerFilter::all().email_containing("example"), false)]
    fn criteria_are_combined(
        customer: Customer,
        #[case] filter: CustomerFilter,
        #[case] expected: bool,
    ) {
        assert_eq!(filter.matches(&customer), expected);
    }

    #[rstest]
    fn excluded_customer_does_not_match(customer: Customer) {
        let filter = CustomerFilter::all().excluding(customer.id());
        assert!(!filter.matches(&customer));
    }
}
