//! SeaORM entities for the users schema.

pub mod role;
pub mod user;
pub mod user_role;
