//! Products Domain
//!
//! Catalog products and their categories: CRUD operations over a relational
//! store, with the category association maintained as a many-to-many set.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Write-path orchestration, input validation
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + PostgreSQL / in-memory impls)
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │  Entities   │  ← SeaORM models, DTO conversions
//! └─────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use models::{CategoryDto, CreateProduct, ProductDto, UpdateProduct};
pub use postgres::{PgCategoryRepository, PgProductRepository};
pub use repository::{
    CategoryRepository, InMemoryCategoryRepository, InMemoryProductRepository, ProductRepository,
};
pub use service::{CategoryService, ProductService};
