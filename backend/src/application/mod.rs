//! Application layer: requests, handlers, and the dispatcher wiring them.
//!
//! Handlers depend only on domain ports bundled in [`CustomerPorts`], so the
//! same wiring serves the in-memory adapters and test doubles alike.

mod commands;
mod customer_model;
mod ports;
mod queries;
mod requester;

pub use commands::{
    CustomerCreateCommand, CustomerCreateCommandHandler, CustomerDeleteCommand,
    CustomerDeleteCommandHandler, CustomerUpdateCommand, CustomerUpdateCommandHandler,
    CustomerUpdateStatusCommand, CustomerUpdateStatusCommandHandler,
};
pub use customer_model::{AddressModel, CustomerModel};
pub use ports::CustomerPorts;
pub use queries::{
    CustomerFindAllQuery, CustomerFindAllQueryHandler, CustomerFindOneQuery,
    CustomerFindOneQueryHandler,
};
pub use requester::{DispatchError, Request, RequestHandler, Requester};

/// Requester with every customer command and query handler registered.
#[must_use]
pub fn customer_requester(ports: &CustomerPorts) -> Requester {
    Requester::new()
        .register::<CustomerCreateCommand, _>(CustomerCreateCommandHandler::new(ports.clone()))
        .register::<CustomerUpdateCommand, _>(CustomerUpdateCommandHandler::new(ports.clone()))
        .register::<CustomerUpdateStatusCommand, _>(CustomerUpdateStatusCommandHandler::new(
            ports.clone(),
        ))
        .register::<CustomerDeleteCommand, _>(CustomerDeleteCommandHandler::new(ports.clone()))
        .register::<CustomerFindOneQuery, _>(CustomerFindOneQueryHandler::new(ports.clone()))
        .register::<CustomerFindAllQuery, _>(CustomerFindAllQueryHandler::new(ports.clone()))
}
