//! Core types for Mithai Mahal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use user::{CurrentUser, Role};
