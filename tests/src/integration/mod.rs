//! Cross-subsystem integration flows.

pub mod concurrency;
pub mod flows;
pub mod projection;
