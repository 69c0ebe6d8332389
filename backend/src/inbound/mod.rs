//! Inbound adapters translating external input into application requests.
//!
//! The [`script`] adapter reads JSON command scripts and renders every
//! outcome as a JSON line.

pub mod script;
