//! Users Domain
//!
//! User management with role associations: CRUD operations, argon2 password
//! hashing on insert, and an explicit email-uniqueness validator that runs
//! before a new user is constructed.
//!
//! The password is write-only: it is hashed on insert, never updated, and no
//! read path ever returns it in any form.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{CreateUser, NewUser, RoleDto, UpdateUser, UserDto};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
