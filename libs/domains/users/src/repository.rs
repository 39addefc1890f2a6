use async_trait::async_trait;
use axum_helpers::{Page, PageParams, SortDirection};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{dedup_ids, NewUser, RoleDto, UpdateUser, UserDto};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id, with the role set resolved
    async fn find_by_id(&self, id: i64) -> UserResult<Option<UserDto>>;

    /// Find one page of users
    async fn find_all(&self, params: PageParams) -> UserResult<Page<UserDto>>;

    /// Check whether a user exists
    async fn exists(&self, id: i64) -> UserResult<bool>;

    /// Check whether a user with this exact email already exists
    async fn email_exists(&self, email: &str) -> UserResult<bool>;

    /// Persist a new user (password already hashed) and link its roles
    async fn create(&self, input: NewUser) -> UserResult<UserDto>;

    /// Overwrite an existing user's scalars and replace its role set.
    /// The password column is never touched.
    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<UserDto>;

    /// Delete a user by id
    async fn delete(&self, id: i64) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Pre-seeded with the same role reference data the migrations install.
/// The password hash is stored next to the DTO and never leaves the repo.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, (UserDto, String)>>>,
    roles: Arc<RwLock<HashMap<i64, RoleDto>>>,
    next_id: Arc<AtomicI64>,
}

fn seed_roles() -> HashMap<i64, RoleDto> {
    [(1, "ROLE_OPERATOR"), (2, "ROLE_ADMIN")]
        .into_iter()
        .map(|(id, authority)| {
            (
                id,
                RoleDto {
                    id,
                    authority: authority.to_string(),
                },
            )
        })
        .collect()
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            roles: Arc::new(RwLock::new(seed_roles())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    async fn resolve_roles(&self, ids: &[i64]) -> UserResult<Vec<RoleDto>> {
        let roles = self.roles.read().await;
        dedup_ids(ids)
            .into_iter()
            .map(|id| roles.get(&id).cloned().ok_or(UserError::RoleNotFound(id)))
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<UserDto>> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|(dto, _)| dto.clone()))
    }

    async fn find_all(&self, params: PageParams) -> UserResult<Page<UserDto>> {
        let users = self.users.read().await;

        let mut result: Vec<UserDto> = users.values().map(|(dto, _)| dto.clone()).collect();

        match params.sort_spec() {
            None | Some(("id", SortDirection::Asc)) => result.sort_by_key(|u| u.id),
            Some(("id", SortDirection::Desc)) => {
                result.sort_by_key(|u| u.id);
                result.reverse();
            }
            Some(("first_name", direction)) => {
                result.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.id.cmp(&b.id)));
                if direction == SortDirection::Desc {
                    result.reverse();
                }
            }
            Some(("last_name", direction)) => {
                result.sort_by(|a, b| a.last_name.cmp(&b.last_name).then(a.id.cmp(&b.id)));
                if direction == SortDirection::Desc {
                    result.reverse();
                }
            }
            Some(("email", direction)) => {
                result.sort_by(|a, b| a.email.cmp(&b.email).then(a.id.cmp(&b.id)));
                if direction == SortDirection::Desc {
                    result.reverse();
                }
            }
            Some((other, _)) => {
                return Err(UserError::Validation(format!(
                    "Unknown sort field '{}'",
                    other
                )));
            }
        }

        let total = result.len() as u64;
        let content: Vec<UserDto> = result
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.size as usize)
            .collect();

        Ok(Page::new(content, params.page, params.size, total))
    }

    async fn exists(&self, id: i64) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.contains_key(&id))
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|(dto, _)| dto.email.eq_ignore_ascii_case(email)))
    }

    async fn create(&self, input: NewUser) -> UserResult<UserDto> {
        let roles = self.resolve_roles(&input.role_ids).await?;

        let mut users = self.users.write().await;

        // Unique-constraint backstop, same as the store would enforce
        if users
            .values()
            .any(|(dto, _)| dto.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = UserDto {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            roles,
        };

        users.insert(id, (user.clone(), input.password_hash));

        tracing::info!(user_id = %id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<UserDto> {
        let roles = self.resolve_roles(&input.role_ids).await?;

        let mut users = self.users.write().await;

        if !users.contains_key(&id) {
            return Err(UserError::NotFound(id));
        }

        // Unique-constraint backstop (excluding the row being updated)
        if users.values().any(|(dto, _)| {
            dto.id != id && dto.email.eq_ignore_ascii_case(&input.email)
        }) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let (user, _hash) = users.get_mut(&id).unwrap();
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.email = input.email;
        user.roles = roles;

        let updated = user.clone();

        tracing::info!(user_id = %id, "Updated user");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> UserResult<()> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_none() {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Alex".to_string(),
            last_name: "Brown".to_string(),
            email: email.to_string(),
            password_hash: "hashed_password".to_string(),
            role_ids: vec![1],
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(new_user("alex@example.com")).await.unwrap();
        assert_eq!(created.email, "alex@example.com");
        assert_eq!(created.roles[0].authority, "ROLE_OPERATOR");

        let fetched = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();

        repo.create(new_user("alex@example.com")).await.unwrap();

        let result = repo.create(new_user("alex@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_email_exists_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();

        repo.create(new_user("alex@example.com")).await.unwrap();

        assert!(repo.email_exists("ALEX@EXAMPLE.COM").await.unwrap());
        assert!(!repo.email_exists("maria@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_with_unknown_role() {
        let repo = InMemoryUserRepository::new();

        let mut input = new_user("alex@example.com");
        input.role_ids = vec![42];

        let result = repo.create(input).await;
        assert!(matches!(result, Err(UserError::RoleNotFound(42))));
    }

    #[tokio::test]
    async fn test_update_replaces_role_set_and_keeps_hash() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(new_user("alex@example.com")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateUser {
                    first_name: "Alexandra".to_string(),
                    last_name: "Brown".to_string(),
                    email: "alexandra@example.com".to_string(),
                    role_ids: vec![1, 2],
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Alexandra");
        assert_eq!(updated.roles.len(), 2);

        // Password hash untouched by the update
        let users = repo.users.read().await;
        assert_eq!(users.get(&created.id).unwrap().1, "hashed_password");
    }

    #[tokio::test]
    async fn test_update_to_taken_email_fails() {
        let repo = InMemoryUserRepository::new();

        repo.create(new_user("alex@example.com")).await.unwrap();
        let maria = repo.create(new_user("maria@example.com")).await.unwrap();

        let result = repo
            .update(
                maria.id,
                UpdateUser {
                    first_name: "Maria".to_string(),
                    last_name: "Green".to_string(),
                    email: "alex@example.com".to_string(),
                    role_ids: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.delete(1000).await,
            Err(UserError::NotFound(1000))
        ));
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_email() {
        let repo = InMemoryUserRepository::new();

        repo.create(new_user("zoe@example.com")).await.unwrap();
        repo.create(new_user("alex@example.com")).await.unwrap();

        let page = repo
            .find_all(PageParams {
                page: 0,
                size: 10,
                sort: Some("email".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(page.total_elements, 2);
        assert_eq!(page.content[0].email, "alex@example.com");
    }
}
