//! Business rules checked by the customer handlers.

use std::sync::Arc;

use async_trait::async_trait;
use result_pipeline::{AsyncRule, Rule, RuleCheckError};

use super::ports::{CustomerFilter, CustomerRepository};
use super::{CustomerId, CustomerStatus, EmailAddress};

/// No two customers may share an email address.
pub struct EmailShouldBeUniqueRule<R: ?Sized> {
    email: EmailAddress,
    exclude: Option<CustomerId>,
    repository: Arc<R>,
}

impl<R> EmailShouldBeUniqueRule<R>
where
    R: CustomerRepository + ?Sized,
{
    /// Rule for registering a new customer with `email`.
    pub fn new(email: EmailAddress, repository: Arc<R>) -> Self {
        Self {
            email,
            exclude: None,
            repository,
        }
    }

    /// Ignore `customer_id` when looking for duplicates, so a customer can
    /// keep its own address on update.
    #[must_use]
    pub fn excluding(mut self, customer_id: CustomerId) -> Self {
        self.exclude = Some(customer_id);
        self
    }

    fn filter(&self) -> CustomerFilter {
        let filter = CustomerFilter::all().with_email(self.email.clone());
        match self.exclude {
            Some(id) => filter.excluding(id),
            None => filter,
        }
    }
}

#[async_trait]
impl<R> AsyncRule for EmailShouldBeUniqueRule<R>
where
    R: CustomerRepository + ?Sized,
{
    fn rule_name(&self) -> String {
        "EmailShouldBeUniqueRule".to_owned()
    }

    fn failure_message(&self) -> String {
        format!("email '{}' is already in use", self.email)
    }

    async fn evaluate(&self) -> Result<bool, RuleCheckError> {
        let count = self
            .repository
            .count(&self.filter())
            .await
            .into_result()
            .map_err(|failure| -> RuleCheckError { Box::new(failure) })?;
        Ok(count == 0)
    }
}

/// A retired customer may be reactivated but never demoted back to a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransitionShouldBeAllowedRule {
    from: CustomerStatus,
    to: CustomerStatus,
}

impl StatusTransitionShouldBeAllowedRule {
    /// Rule for moving a customer from `from` to `to`.
    #[must_use]
    pub const fn new(from: CustomerStatus, to: CustomerStatus) -> Self {
        Self { from, to }
    }
}

impl Rule for StatusTransitionShouldBeAllowedRule {
    fn message(&self) -> String {
        format!("status cannot change from {} to {}", self.from, self.to)
    }

    fn is_satisfied(&self) -> bool {
        !matches!(
            (self.from, self.to),
            (CustomerStatus::Retired, CustomerStatus::Lead)
        )
    }
}
