use axum_helpers::{Page, PageParams};
use std::sync::Arc;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CategoryDto, CreateProduct, ProductDto, UpdateProduct};
use crate::repository::{CategoryRepository, ProductRepository};

/// Write-path service for Product business logic.
///
/// Every operation is a single unit of work: the repository wraps each write
/// in one transaction, and all failures are resolved into [`ProductError`]
/// before they reach the caller.
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Get one page of products
    pub async fn find_all_paged(&self, params: PageParams) -> ProductResult<Page<ProductDto>> {
        self.repository.find_all(params).await
    }

    /// Get a product by id
    pub async fn find_by_id(&self, id: i64) -> ProductResult<ProductDto> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Insert a new product
    pub async fn insert(&self, input: CreateProduct) -> ProductResult<ProductDto> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Update an existing product: scalars are overwritten, the category set
    /// is replaced with the incoming ids.
    pub async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<ProductDto> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a product by id. Existence is checked first; a referential
    /// integrity failure from the store is reported distinctly.
    pub async fn delete(&self, id: i64) -> ProductResult<()> {
        if !self.repository.exists(id).await? {
            return Err(ProductError::NotFound(id));
        }

        self.repository.delete(id).await
    }
}

/// Read-only service over the category reference data.
#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List all categories
    pub async fn find_all(&self) -> ProductResult<Vec<CategoryDto>> {
        self.repository.find_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockCategoryRepository, MockProductRepository};
    use chrono::TimeZone;
    use mockall::predicate::eq;

    const EXISTING_ID: i64 = 1;
    const NON_EXISTING_ID: i64 = 1000;
    const DEPENDENT_ID: i64 = 20;

    fn sample_product() -> ProductDto {
        ProductDto {
            id: EXISTING_ID,
            name: "Phone".to_string(),
            description: "Good Phone".to_string(),
            price: 800.0,
            img_url: Some("https://img.com/img.png".to_string()),
            date: chrono::Utc.with_ymd_and_hms(2023, 12, 3, 10, 15, 30).unwrap(),
            categories: vec![CategoryDto {
                id: 1,
                name: "Electronics".to_string(),
            }],
        }
    }

    fn sample_update(name: &str) -> UpdateProduct {
        UpdateProduct {
            name: name.to_string(),
            description: "Good Phone".to_string(),
            price: 800.0,
            img_url: Some("https://img.com/img.png".to_string()),
            date: None,
            category_ids: vec![1],
        }
    }

    #[tokio::test]
    async fn test_find_by_id_returns_dto_when_id_exists() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .with(eq(EXISTING_ID))
            .returning(|_| Ok(Some(sample_product())));

        let service = ProductService::new(repo);
        let result = service.find_by_id(EXISTING_ID).await.unwrap();

        assert_eq!(result.id, EXISTING_ID);
        assert_eq!(result.categories[0].name, "Electronics");
    }

    #[tokio::test]
    async fn test_find_by_id_fails_when_id_does_not_exist() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .with(eq(NON_EXISTING_ID))
            .returning(|_| Ok(None));

        let service = ProductService::new(repo);
        let result = service.find_by_id(NON_EXISTING_ID).await;

        assert!(matches!(result, Err(ProductError::NotFound(NON_EXISTING_ID))));
    }

    #[tokio::test]
    async fn test_find_all_paged_returns_page() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_all()
            .times(1)
            .returning(|params| Ok(Page::new(vec![sample_product()], params.page, params.size, 1)));

        let service = ProductService::new(repo);
        let page = service.find_all_paged(PageParams::default()).await.unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].name, "Phone");
    }

    #[tokio::test]
    async fn test_insert_returns_created_dto() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Ok(sample_product()));

        let service = ProductService::new(repo);
        let input = CreateProduct {
            name: "Phone".to_string(),
            description: "Good Phone".to_string(),
            price: 800.0,
            img_url: Some("https://img.com/img.png".to_string()),
            date: None,
            category_ids: vec![1],
        };

        let result = service.insert(input).await.unwrap();
        assert_eq!(result.name, "Phone");
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_input_without_touching_store() {
        // No expectations set: any repository call would panic the test.
        let repo = MockProductRepository::new();

        let service = ProductService::new(repo);
        let input = CreateProduct {
            name: String::new(),
            description: "Good Phone".to_string(),
            price: 800.0,
            img_url: None,
            date: None,
            category_ids: vec![],
        };

        let result = service.insert(input).await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_returns_dto_when_id_exists() {
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .with(eq(EXISTING_ID), mockall::predicate::always())
            .returning(|_, input| {
                let mut dto = sample_product();
                dto.name = input.name;
                Ok(dto)
            });

        let service = ProductService::new(repo);
        let result = service.update(EXISTING_ID, sample_update("OK")).await.unwrap();

        assert_eq!(result.id, EXISTING_ID);
        assert_eq!(result.name, "OK");
    }

    #[tokio::test]
    async fn test_update_fails_when_id_does_not_exist() {
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .returning(|id, _| Err(ProductError::NotFound(id)));

        let service = ProductService::new(repo);
        let result = service.update(NON_EXISTING_ID, sample_update("OK")).await;

        assert!(matches!(result, Err(ProductError::NotFound(NON_EXISTING_ID))));
    }

    #[tokio::test]
    async fn test_delete_does_nothing_when_id_exists() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists()
            .with(eq(EXISTING_ID))
            .returning(|_| Ok(true));
        repo.expect_delete()
            .with(eq(EXISTING_ID))
            .times(1)
            .returning(|_| Ok(()));

        let service = ProductService::new(repo);
        assert!(service.delete(EXISTING_ID).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_fails_with_not_found_when_id_does_not_exist() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists()
            .with(eq(NON_EXISTING_ID))
            .returning(|_| Ok(false));
        // expect_delete is never registered: the store must not be touched.

        let service = ProductService::new(repo);
        let result = service.delete(NON_EXISTING_ID).await;

        assert!(matches!(result, Err(ProductError::NotFound(NON_EXISTING_ID))));
    }

    #[tokio::test]
    async fn test_delete_fails_with_integrity_violation_when_id_has_dependents() {
        let mut repo = MockProductRepository::new();
        repo.expect_exists()
            .with(eq(DEPENDENT_ID))
            .returning(|_| Ok(true));
        repo.expect_delete()
            .with(eq(DEPENDENT_ID))
            .returning(|id| Err(ProductError::IntegrityViolation(id)));

        let service = ProductService::new(repo);
        let result = service.delete(DEPENDENT_ID).await;

        assert!(matches!(
            result,
            Err(ProductError::IntegrityViolation(DEPENDENT_ID))
        ));
    }

    #[tokio::test]
    async fn test_category_service_lists_all() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_all().returning(|| {
            Ok(vec![CategoryDto {
                id: 1,
                name: "Electronics".to_string(),
            }])
        });

        let service = CategoryService::new(repo);
        let categories = service.find_all().await.unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Electronics");
    }
}
