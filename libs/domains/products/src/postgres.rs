use async_trait::async_trait;
use axum_helpers::{Page, PageParams, SortDirection};
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, TransactionTrait,
};

use crate::entity::{category, product, product_category};
use crate::error::{ProductError, ProductResult};
use crate::models::{dedup_ids, CategoryDto, CreateProduct, ProductDto, UpdateProduct};
use crate::repository::{CategoryRepository, ProductRepository};

/// PostgreSQL implementation of ProductRepository using SeaORM
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn internal(e: DbErr) -> ProductError {
    ProductError::Internal(format!("Database error: {}", e))
}

/// Classify a deletion failure: a foreign-key restriction means the row is
/// still referenced elsewhere, everything else is an internal error.
fn map_delete_error(e: DbErr, id: i64) -> ProductError {
    let err_str = e.to_string();
    if err_str.contains("foreign key") || err_str.contains("violates") {
        ProductError::IntegrityViolation(id)
    } else {
        internal(e)
    }
}

fn apply_sort(
    query: Select<product::Entity>,
    params: &PageParams,
) -> ProductResult<Select<product::Entity>> {
    let Some((field, direction)) = params.sort_spec() else {
        return Ok(query.order_by_asc(product::Column::Id));
    };

    let column = match field {
        "id" => product::Column::Id,
        "name" => product::Column::Name,
        "price" => product::Column::Price,
        "date" => product::Column::Date,
        other => {
            return Err(ProductError::Validation(format!(
                "Unknown sort field '{}'",
                other
            )));
        }
    };

    Ok(match direction {
        SortDirection::Asc => query.order_by_asc(column),
        SortDirection::Desc => query.order_by_desc(column),
    })
}

/// Resolve each incoming category id to its row, eagerly, inside the current
/// transaction. A missing id aborts the write with a not-found error.
async fn resolve_categories<C: ConnectionTrait>(
    conn: &C,
    ids: &[i64],
) -> ProductResult<Vec<category::Model>> {
    let mut categories = Vec::with_capacity(ids.len());
    for id in dedup_ids(ids) {
        let category = category::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(internal)?
            .ok_or(ProductError::CategoryNotFound(id))?;
        categories.push(category);
    }
    Ok(categories)
}

async fn link_categories<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    categories: &[category::Model],
) -> ProductResult<()> {
    for category in categories {
        product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(category.id),
        }
        .insert(conn)
        .await
        .map_err(internal)?;
    }
    Ok(())
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: i64) -> ProductResult<Option<ProductDto>> {
        let Some(model) = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(internal)?
        else {
            return Ok(None);
        };

        let categories = model
            .find_related(category::Entity)
            .all(&self.db)
            .await
            .map_err(internal)?;

        Ok(Some(ProductDto::from((model, categories))))
    }

    async fn find_all(&self, params: PageParams) -> ProductResult<Page<ProductDto>> {
        let query = apply_sort(product::Entity::find(), &params)?;

        let paginator = query.paginate(&self.db, params.size.max(1));
        let total = paginator.num_items().await.map_err(internal)?;
        let models = paginator.fetch_page(params.page).await.map_err(internal)?;

        let mut content = Vec::with_capacity(models.len());
        for model in models {
            let categories = model
                .find_related(category::Entity)
                .all(&self.db)
                .await
                .map_err(internal)?;
            content.push(ProductDto::from((model, categories)));
        }

        Ok(Page::new(content, params.page, params.size, total))
    }

    async fn exists(&self, id: i64) -> ProductResult<bool> {
        let count = product::Entity::find()
            .filter(product::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(internal)?;

        Ok(count > 0)
    }

    async fn create(&self, input: CreateProduct) -> ProductResult<ProductDto> {
        let txn = self.db.begin().await.map_err(internal)?;

        let categories = resolve_categories(&txn, &input.category_ids).await?;

        let model = product::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            img_url: Set(input.img_url),
            date: Set(input.date.unwrap_or_else(Utc::now).into()),
        }
        .insert(&txn)
        .await
        .map_err(internal)?;

        link_categories(&txn, model.id, &categories).await?;

        txn.commit().await.map_err(internal)?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(ProductDto::from((model, categories)))
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> ProductResult<ProductDto> {
        let txn = self.db.begin().await.map_err(internal)?;

        let existing = product::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(internal)?
            .ok_or(ProductError::NotFound(id))?;

        let categories = resolve_categories(&txn, &input.category_ids).await?;

        let mut active: product::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.img_url = Set(input.img_url);
        if let Some(date) = input.date {
            active.date = Set(date.into());
        }

        let model = active.update(&txn).await.map_err(internal)?;

        // Clear and rebuild the association set
        product_category::Entity::delete_many()
            .filter(product_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(internal)?;
        link_categories(&txn, id, &categories).await?;

        txn.commit().await.map_err(internal)?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(ProductDto::from((model, categories)))
    }

    async fn delete(&self, id: i64) -> ProductResult<()> {
        let txn = self.db.begin().await.map_err(internal)?;

        // The category links belong to the product and go with it; any other
        // reference to the row surfaces as an integrity violation.
        product_category::Entity::delete_many()
            .filter(product_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(internal)?;

        let result = product::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| map_delete_error(e, id))?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id));
        }

        txn.commit().await.map_err(|e| map_delete_error(e, id))?;

        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }
}

/// PostgreSQL implementation of CategoryRepository using SeaORM
#[derive(Clone)]
pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_all(&self) -> ProductResult<Vec<CategoryDto>> {
        let categories = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(internal)?;

        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }
}
