//! # Sample Database Crate
//!
//! The persistence adapter of the API. It owns the MySQL connection pool and
//! every SQL statement the HTTP surface can issue.
//!
//! ## Public API
//!
//! - `connect`: builds the bounded, lazily-connecting pool from settings.
//! - `probe`: checks out one connection and reports its server-side id.
//! - `run_migrations`: applies the embedded schema of the sample tables.
//! - `Repository`: one async method per statement, implemented by
//!   `DbRepository` (MySQL) and `mock::MockRepository` (in memory).
//! - `Record` / `WriteOutcome`: what reads and writes hand back.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod mock;
pub mod outcome;
pub mod repository;
pub mod row;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, probe, run_migrations};
pub use error::DbError;
pub use outcome::WriteOutcome;
pub use repository::{DbRepository, Repository};
pub use row::Record;
