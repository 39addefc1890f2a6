//! Application state shared with request handlers.

/// Shared application state.
///
/// Cloned per use (the database connection is an inexpensive pool handle).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}
