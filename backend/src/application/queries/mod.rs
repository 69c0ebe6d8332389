//! Customer queries and their handlers.

mod find_all;
mod find_one;

pub use find_all::{CustomerFindAllQuery, CustomerFindAllQueryHandler};
pub use find_one::{CustomerFindOneQuery, CustomerFindOneQueryHandler};

#[cfg(test)]
mod tests;
