//! Outbound adapters implementing the domain ports.
//!
//! Only in-memory adapters exist. They keep state behind async locks and
//! report expected failures as failed outcomes, exactly like a storage
//! backend would, so handlers cannot tell them apart.

pub mod memory;
