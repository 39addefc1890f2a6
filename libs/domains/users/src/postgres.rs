use async_trait::async_trait;
use axum_helpers::{Page, PageParams, SortDirection};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, TransactionTrait,
};

use crate::entity::{role, user, user_role};
use crate::error::{UserError, UserResult};
use crate::models::{dedup_ids, NewUser, UpdateUser, UserDto};
use crate::repository::UserRepository;

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn internal(e: DbErr) -> UserError {
    UserError::Internal(format!("Database error: {}", e))
}

/// The unique index on users.email is the backstop for the advisory
/// uniqueness check; its violation is reported as the same field failure.
fn map_save_error(e: DbErr, email: &str) -> UserError {
    let err_str = e.to_string();
    if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
        UserError::DuplicateEmail(email.to_string())
    } else {
        internal(e)
    }
}

fn map_delete_error(e: DbErr, id: i64) -> UserError {
    let err_str = e.to_string();
    if err_str.contains("foreign key") || err_str.contains("violates") {
        UserError::IntegrityViolation(id)
    } else {
        internal(e)
    }
}

fn apply_sort(
    query: Select<user::Entity>,
    params: &PageParams,
) -> UserResult<Select<user::Entity>> {
    let Some((field, direction)) = params.sort_spec() else {
        return Ok(query.order_by_asc(user::Column::Id));
    };

    let column = match field {
        "id" => user::Column::Id,
        "first_name" => user::Column::FirstName,
        "last_name" => user::Column::LastName,
        "email" => user::Column::Email,
        other => {
            return Err(UserError::Validation(format!(
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

/// Resolve each incoming role id eagerly inside the current transaction.
async fn resolve_roles<C: ConnectionTrait>(conn: &C, ids: &[i64]) -> UserResult<Vec<role::Model>> {
    let mut roles = Vec::with_capacity(ids.len());
    for id in dedup_ids(ids) {
        let role = role::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(internal)?
            .ok_or(UserError::RoleNotFound(id))?;
        roles.push(role);
    }
    Ok(roles)
}

async fn link_roles<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    roles: &[role::Model],
) -> UserResult<()> {
    for role in roles {
        user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role.id),
        }
        .insert(conn)
        .await
        .map_err(internal)?;
    }
    Ok(())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<UserDto>> {
        let Some(model) = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(internal)?
        else {
            return Ok(None);
        };

        let roles = model
            .find_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(internal)?;

        Ok(Some(UserDto::from((model, roles))))
    }

    async fn find_all(&self, params: PageParams) -> UserResult<Page<UserDto>> {
        let query = apply_sort(user::Entity::find(), &params)?;

        let paginator = query.paginate(&self.db, params.size.max(1));
        let total = paginator.num_items().await.map_err(internal)?;
        let models = paginator.fetch_page(params.page).await.map_err(internal)?;

        let mut content = Vec::with_capacity(models.len());
        for model in models {
            let roles = model
                .find_related(role::Entity)
                .all(&self.db)
                .await
                .map_err(internal)?;
            content.push(UserDto::from((model, roles)));
        }

        Ok(Page::new(content, params.page, params.size, total))
    }

    async fn exists(&self, id: i64) -> UserResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(internal)?;

        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(internal)?;

        Ok(count > 0)
    }

    async fn create(&self, input: NewUser) -> UserResult<UserDto> {
        let txn = self.db.begin().await.map_err(internal)?;

        let roles = resolve_roles(&txn, &input.role_ids).await?;

        let email = input.email.clone();
        let model = user::ActiveModel {
            id: NotSet,
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            password: Set(input.password_hash),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_save_error(e, &email))?;

        link_roles(&txn, model.id, &roles).await?;

        txn.commit().await.map_err(internal)?;

        tracing::info!(user_id = %model.id, email = %model.email, "Created user");
        Ok(UserDto::from((model, roles)))
    }

    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<UserDto> {
        let txn = self.db.begin().await.map_err(internal)?;

        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(internal)?
            .ok_or(UserError::NotFound(id))?;

        let roles = resolve_roles(&txn, &input.role_ids).await?;

        let email = input.email.clone();
        let mut active: user::ActiveModel = existing.into();
        active.first_name = Set(input.first_name);
        active.last_name = Set(input.last_name);
        active.email = Set(input.email);
        // password is never Set here: updates cannot touch it

        let model = active
            .update(&txn)
            .await
            .map_err(|e| map_save_error(e, &email))?;

        // Clear and rebuild the association set
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(internal)?;
        link_roles(&txn, id, &roles).await?;

        txn.commit().await.map_err(internal)?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(UserDto::from((model, roles)))
    }

    async fn delete(&self, id: i64) -> UserResult<()> {
        let txn = self.db.begin().await.map_err(internal)?;

        // The role links belong to the user; any other reference to the row
        // surfaces as an integrity violation.
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(internal)?;

        let result = user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| map_delete_error(e, id))?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }

        txn.commit().await.map_err(|e| map_delete_error(e, id))?;

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}
