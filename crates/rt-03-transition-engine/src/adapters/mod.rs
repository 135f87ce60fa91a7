//! Adapters for the outbound ports.

pub mod bus;
pub mod time;
