use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "CRUD API for products, categories, users and roles"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/products", api = domain_products::handlers::ProductsApiDoc),
        (path = "/categories", api = domain_products::handlers::CategoriesApiDoc),
        (path = "/users", api = domain_users::handlers::UsersApiDoc)
    )
)]
pub struct ApiDoc;
