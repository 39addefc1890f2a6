//! Integration tests for the products domain
//!
//! These run against real PostgreSQL via testcontainers and verify schema
//! round-trips, transactional clear-and-rebuild of the category set, and
//! pagination over the seeded catalog. Marked `#[ignore]` so they only run
//! where Docker is available: `cargo test -- --ignored`.

use axum_helpers::PageParams;
use domain_products::*;
use test_utils::TestDatabase;

fn phone_input(category_ids: Vec<i64>) -> CreateProduct {
    CreateProduct {
        name: "Phone".to_string(),
        description: "Good Phone".to_string(),
        price: 800.0,
        img_url: Some("https://img.com/img.png".to_string()),
        date: None,
        category_ids,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_resolves_seeded_categories() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let created = repo.create(phone_input(vec![1])).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.name, "Phone");
    assert_eq!(created.categories.len(), 1);
    assert_eq!(created.categories[0].name, "Electronics");

    let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.categories[0].id, 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_with_unknown_category_rolls_back() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let before = repo.find_all(PageParams::default()).await.unwrap();

    let result = repo.create(phone_input(vec![999])).await;
    assert!(matches!(result, Err(ProductError::CategoryNotFound(999))));

    let after = repo.find_all(PageParams::default()).await.unwrap();
    assert_eq!(before.total_elements, after.total_elements);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_rebuilds_category_set() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let created = repo.create(phone_input(vec![1, 2])).await.unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateProduct {
                name: "OK".to_string(),
                description: created.description.clone(),
                price: created.price,
                img_url: created.img_url.clone(),
                date: None,
                category_ids: vec![3],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "OK");
    let ids: Vec<i64> = updated.categories.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3]);

    let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.categories.len(), 1);
    assert_eq!(fetched.categories[0].name, "Computers");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_removes_row_and_links() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let created = repo.create(phone_input(vec![1])).await.unwrap();

    repo.delete(created.id).await.unwrap();
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());

    let result = repo.delete(created.id).await;
    assert!(matches!(result, Err(ProductError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_pages_over_seeded_catalog() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    // The seed migration installs 5 products.
    let page = repo
        .find_all(PageParams {
            page: 0,
            size: 2,
            sort: Some("name".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(page.total_elements, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[0].name, "Macbook Pro");

    let out_of_range = repo
        .find_all(PageParams {
            page: 99,
            size: 2,
            sort: None,
        })
        .await
        .unwrap();
    assert!(out_of_range.content.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_categories_list_seed_data() {
    let db = TestDatabase::new().await;
    let repo = PgCategoryRepository::new(db.connection());

    let categories = repo.find_all().await.unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0].name, "Electronics");
    assert_eq!(categories[1].name, "Books");
}
