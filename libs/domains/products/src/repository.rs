use async_trait::async_trait;
use axum_helpers::{Page, PageParams, SortDirection};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{dedup_ids, CategoryDto, CreateProduct, ProductDto, UpdateProduct};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product by id, with its category set resolved
    async fn find_by_id(&self, id: i64) -> ProductResult<Option<ProductDto>>;

    /// Find one page of products
    async fn find_all(&self, params: PageParams) -> ProductResult<Page<ProductDto>>;

    /// Check whether a product exists
    async fn exists(&self, id: i64) -> ProductResult<bool>;

    /// Create a new product and link its categories
    async fn create(&self, input: CreateProduct) -> ProductResult<ProductDto>;

    /// Overwrite an existing product's scalars and replace its category set
    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<ProductDto>;

    /// Delete a product by id
    async fn delete(&self, id: i64) -> ProductResult<()>;
}

/// Repository trait for Category reference data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List all categories
    async fn find_all(&self) -> ProductResult<Vec<CategoryDto>>;
}

/// In-memory implementation of ProductRepository (for development/testing)
///
/// Pre-seeded with the same category reference data the migrations install.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<i64, ProductDto>>>,
    categories: Arc<RwLock<HashMap<i64, CategoryDto>>>,
    next_id: Arc<AtomicI64>,
}

pub(crate) fn seed_categories() -> HashMap<i64, CategoryDto> {
    [
        (1, "Electronics"),
        (2, "Books"),
        (3, "Computers"),
    ]
    .into_iter()
    .map(|(id, name)| {
        (
            id,
            CategoryDto {
                id,
                name: name.to_string(),
            },
        )
    })
    .collect()
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            categories: Arc::new(RwLock::new(seed_categories())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    async fn resolve_categories(&self, ids: &[i64]) -> ProductResult<Vec<CategoryDto>> {
        let categories = self.categories.read().await;
        dedup_ids(ids)
            .into_iter()
            .map(|id| {
                categories
                    .get(&id)
                    .cloned()
                    .ok_or(ProductError::CategoryNotFound(id))
            })
            .collect()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: i64) -> ProductResult<Option<ProductDto>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn find_all(&self, params: PageParams) -> ProductResult<Page<ProductDto>> {
        let products = self.products.read().await;

        let mut result: Vec<ProductDto> = products.values().cloned().collect();

        match params.sort_spec() {
            None | Some(("id", _)) => {
                let descending =
                    matches!(params.sort_spec(), Some(("id", SortDirection::Desc)));
                result.sort_by_key(|p| p.id);
                if descending {
                    result.reverse();
                }
            }
            Some(("name", direction)) => {
                result.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
                if direction == SortDirection::Desc {
                    result.reverse();
                }
            }
            Some(("price", direction)) => {
                result.sort_by(|a, b| {
                    a.price
                        .partial_cmp(&b.price)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.id.cmp(&b.id))
                });
                if direction == SortDirection::Desc {
                    result.reverse();
                }
            }
            Some(("date", direction)) => {
                result.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
                if direction == SortDirection::Desc {
                    result.reverse();
                }
            }
            Some((other, _)) => {
                return Err(ProductError::Validation(format!(
                    "Unknown sort field '{}'",
                    other
                )));
            }
        }

        let total = result.len() as u64;
        let content: Vec<ProductDto> = result
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.size as usize)
            .collect();

        Ok(Page::new(content, params.page, params.size, total))
    }

    async fn exists(&self, id: i64) -> ProductResult<bool> {
        let products = self.products.read().await;
        Ok(products.contains_key(&id))
    }

    async fn create(&self, input: CreateProduct) -> ProductResult<ProductDto> {
        let categories = self.resolve_categories(&input.category_ids).await?;

        let mut products = self.products.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let product = ProductDto {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            img_url: input.img_url,
            date: input.date.unwrap_or_else(Utc::now),
            categories,
        };

        products.insert(id, product.clone());

        tracing::info!(product_id = %id, "Created product");
        Ok(product)
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<ProductDto> {
        let categories = self.resolve_categories(&input.category_ids).await?;

        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;

        product.name = input.name;
        product.description = input.description;
        product.price = input.price;
        product.img_url = input.img_url;
        if let Some(date) = input.date {
            product.date = date;
        }
        product.categories = categories;

        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> ProductResult<()> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_none() {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }
}

/// In-memory implementation of CategoryRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<i64, CategoryDto>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(seed_categories())),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_all(&self) -> ProductResult<Vec<CategoryDto>> {
        let categories = self.categories.read().await;
        let mut result: Vec<CategoryDto> = categories.values().cloned().collect();
        result.sort_by_key(|c| c.id);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(name: &str, category_ids: Vec<i64>) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: "Good Phone".to_string(),
            price: 800.0,
            img_url: Some("https://img.com/img.png".to_string()),
            date: None,
            category_ids,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let repo = InMemoryProductRepository::new();

        let product = repo.create(create_input("Phone", vec![1])).await.unwrap();
        assert_eq!(product.name, "Phone");
        assert_eq!(product.categories.len(), 1);
        assert_eq!(product.categories[0].name, "Electronics");

        let fetched = repo.find_by_id(product.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, product.id);
    }

    #[tokio::test]
    async fn test_create_with_empty_category_set() {
        let repo = InMemoryProductRepository::new();

        let product = repo.create(create_input("Phone", vec![])).await.unwrap();
        assert!(product.categories.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_category() {
        let repo = InMemoryProductRepository::new();

        let result = repo.create(create_input("Phone", vec![99])).await;
        assert!(matches!(result, Err(ProductError::CategoryNotFound(99))));
    }

    #[tokio::test]
    async fn test_create_dedups_category_ids() {
        let repo = InMemoryProductRepository::new();

        let product = repo
            .create(create_input("Phone", vec![1, 1, 2]))
            .await
            .unwrap();
        assert_eq!(product.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_category_set() {
        let repo = InMemoryProductRepository::new();

        let created = repo.create(create_input("Phone", vec![1])).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateProduct {
                    name: "OK".to_string(),
                    description: created.description.clone(),
                    price: created.price,
                    img_url: created.img_url.clone(),
                    date: None,
                    category_ids: vec![2, 3],
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "OK");
        let ids: Vec<i64> = updated.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let repo = InMemoryProductRepository::new();

        let result = repo
            .update(
                1000,
                UpdateProduct {
                    name: "OK".to_string(),
                    description: "x".to_string(),
                    price: 1.0,
                    img_url: None,
                    date: None,
                    category_ids: vec![],
                },
            )
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(1000))));
    }

    #[tokio::test]
    async fn test_delete_then_find_returns_none() {
        let repo = InMemoryProductRepository::new();

        let created = repo.create(create_input("Phone", vec![1])).await.unwrap();
        repo.delete(created.id).await.unwrap();

        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(created.id).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_all_pagination_and_sort() {
        let repo = InMemoryProductRepository::new();

        for name in ["Phone", "Amplifier", "Zoom Lens"] {
            repo.create(create_input(name, vec![1])).await.unwrap();
        }

        let page = repo
            .find_all(PageParams {
                page: 0,
                size: 2,
                sort: Some("name".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].name, "Amplifier");

        // Out-of-range page is empty, not an error
        let empty = repo
            .find_all(PageParams {
                page: 9,
                size: 2,
                sort: None,
            })
            .await
            .unwrap();
        assert!(empty.content.is_empty());
        assert_eq!(empty.total_elements, 3);
    }

    #[tokio::test]
    async fn test_find_all_unknown_sort_field() {
        let repo = InMemoryProductRepository::new();

        let result = repo
            .find_all(PageParams {
                page: 0,
                size: 10,
                sort: Some("owner".to_string()),
            })
            .await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_category_repository_lists_seed_data() {
        let repo = InMemoryCategoryRepository::new();

        let categories = repo.find_all().await.unwrap();
        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].name, "Electronics");
    }
}
