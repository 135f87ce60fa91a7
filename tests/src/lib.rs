//! # Rootra Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Shared fixtures: wired service, mock clock
//! │
//! ├── integration/      # Cross-subsystem flows
//! │   ├── flows.rs      # End-to-end journeys and rejection paths
//! │   ├── concurrency.rs# Racing writers on one batch
//! │   └── projection.rs # Consumer timeline over real engine state
//! │
//! └── properties/       # Property-based tests
//!     └── codec.rs      # QR payload round-trip
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rootra-tests
//!
//! # By category
//! cargo test -p rootra-tests integration::
//! cargo test -p rootra-tests properties::
//! ```

#![allow(dead_code)]

pub mod harness;
pub mod integration;
pub mod properties;
