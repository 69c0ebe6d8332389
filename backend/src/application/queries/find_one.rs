//! Look up a single customer.

use async_trait::async_trait;
use result_pipeline::Outcome;
use serde::Deserialize;

use crate::application::{CustomerModel, CustomerPorts, Request, RequestHandler};
use crate::domain::CustomerId;

/// Fetch one customer by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CustomerFindOneQuery {
    /// Customer to fetch.
    pub id: CustomerId,
}

impl Request for CustomerFindOneQuery {
    type Response = CustomerModel;
    const NAME: &'static str = "CustomerFindOneQuery";
}

/// Handler for [`CustomerFindOneQuery`].
pub struct CustomerFindOneQueryHandler {
    ports: CustomerPorts,
}

impl CustomerFindOneQueryHandler {
    /// Create the handler.
    #[must_use]
    pub const fn new(ports: CustomerPorts) -> Self {
        Self { ports }
    }
}

#[async_trait]
impl RequestHandler<CustomerFindOneQuery> for CustomerFindOneQueryHandler {
    async fn handle(&self, query: CustomerFindOneQuery) -> Outcome<CustomerModel> {
        self.ports
            .repository
            .find_one(query.id)
            .await
            .map_into()
    }
}
