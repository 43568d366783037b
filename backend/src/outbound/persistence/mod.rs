//! PostgreSQL persistence adapters using Diesel.
//!
//! - `schema` and `models` are internal; the domain only sees
//!   [`DieselUserRepository`] through the `UserRepository` port.
//! - Connections come from a `bb8` pool of `diesel-async` connections.
//! - Every Diesel or pool failure is mapped to `UserPersistenceError`.
//!
//! # Example
//!
//! ```ignore
//! use user_service::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
