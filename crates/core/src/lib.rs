//! Mithai Mahal Core - Shared types library.
//!
//! This crate provides common types used across all Mithai Mahal components:
//! - `cart` - Shopping cart state engine
//! - `integration-tests` - Cross-crate scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and the
//!   catalog/identity records supplied by external collaborators

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
