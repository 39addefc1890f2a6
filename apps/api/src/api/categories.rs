use axum::Router;
use domain_products::{handlers, CategoryService, PgCategoryRepository};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgCategoryRepository::new(state.db.clone());
    let service = CategoryService::new(repository);
    handlers::categories_router(service)
}
