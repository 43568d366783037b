//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL user store using Diesel.
//! - **provider**: HTTP client for the external identity provider.
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod persistence;
pub mod provider;
