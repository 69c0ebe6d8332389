//! List customers matching optional criteria.

use async_trait::async_trait;
use result_pipeline::rules::is_one_of;
use result_pipeline::{Outcome, ResultError, RuleSet};
use serde::Deserialize;

use crate::application::{CustomerModel, CustomerPorts, Request, RequestHandler};
use crate::domain::CustomerStatus;
use crate::domain::ports::CustomerFilter;

/// List customers ordered by customer number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerFindAllQuery {
    /// Only customers with this status identifier.
    #[serde(default)]
    pub status: Option<i32>,
    /// Only customers whose email contains this fragment.
    #[serde(default)]
    pub email_contains: Option<String>,
}

impl CustomerFindAllQuery {
    fn filter(&self) -> CustomerFilter {
        let by_status = match self.status.and_then(CustomerStatus::from_id) {
            Some(status) => CustomerFilter::all().with_status(status),
            None => CustomerFilter::all(),
        };
        match self.email_contains.as_deref().map(str::trim) {
            Some(fragment) if !fragment.is_empty() => by_status.email_containing(fragment),
            _ => by_status,
        }
    }
}

impl Request for CustomerFindAllQuery {
    type Response = Vec<CustomerModel>;
    const NAME: &'static str = "CustomerFindAllQuery";

    fn validate(&self) -> Outcome {
        let Some(status) = self.status else {
            return Outcome::ok();
        };
        RuleSet::new()
            .add(is_one_of(
                status,
                CustomerStatus::get_all().iter().map(|known| known.id()),
            ))
            .check()
            .map_errors(|error| {
                ResultError::invalid_field("status", format!("invalid status: {}", error.message()))
            })
    }
}

/// Handler for [`CustomerFindAllQuery`].
pub struct CustomerFindAllQueryHandler {
    ports: CustomerPorts,
}

impl CustomerFindAllQueryHandler {
    /// Create the handler.
    #[must_use]
    pub const fn new(ports: CustomerPorts) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl RequestHandler<CustomerFindAllQuery> for CustomerFindAllQueryHandler {
    async fn handle(&self, query: CustomerFindAllQuery) -> Outcome<Vec<CustomerModel>> {
        self.ports
            .repository
            .find_all(&query.filter())
            .await
            .map(|customers| customers.into_iter().map(CustomerModel::from).collect())
    }
}
