//! Common utilities and shared types for stayhub-rs.
//!
//! This crate provides foundational components used across all stayhub-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Cryptography**: Password hashing, reset-token digests, JWT issuing
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use stayhub_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod id;

pub use config::Config;
pub use crypto::{
    JwtClaims, hash_password, hash_reset_token, issue_jwt, generate_reset_token, verify_jwt,
    verify_password,
};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
