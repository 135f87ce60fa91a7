//! Property-based tests.

pub mod codec;
