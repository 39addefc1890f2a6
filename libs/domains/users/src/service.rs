use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum_helpers::{Page, PageParams};
use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, NewUser, UpdateUser, UserDto};
use crate::repository::UserRepository;
use crate::validation::validate_new_user;

/// Write-path service for User business logic.
///
/// Insert is the only operation that sees a plaintext password: it is
/// validated, hashed with argon2id, and handed to the repository as a hash.
/// Update never carries a password at all.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Get one page of users
    pub async fn find_all_paged(&self, params: PageParams) -> UserResult<Page<UserDto>> {
        self.repository.find_all(params).await
    }

    /// Get a user by id
    pub async fn find_by_id(&self, id: i64) -> UserResult<UserDto> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Insert a new user.
    ///
    /// Runs the explicit insert validator (email uniqueness) before the
    /// entity is constructed; a violation aborts with a field-level error
    /// and nothing is persisted.
    pub async fn insert(&self, input: CreateUser) -> UserResult<UserDto> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;
        self.validate_password(&input.password)?;

        let violations = validate_new_user(self.repository.as_ref(), &input).await?;
        if !violations.is_empty() {
            return Err(UserError::FieldValidation(violations));
        }

        let password_hash = self.hash_password(&input.password)?;

        let new_user = NewUser {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash,
            role_ids: input.role_ids,
        };

        self.repository.create(new_user).await
    }

    /// Update an existing user: scalars are overwritten and the role set is
    /// replaced. The password is untouched.
    pub async fn update(&self, id: i64, input: UpdateUser) -> UserResult<UserDto> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a user by id. Existence is checked first; a referential
    /// integrity failure from the store is reported distinctly.
    pub async fn delete(&self, id: i64) -> UserResult<()> {
        if !self.repository.exists(id).await? {
            return Err(UserError::NotFound(id));
        }

        self.repository.delete(id).await
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn validate_password(&self, password: &str) -> UserResult<()> {
        if password.len() < 8 {
            return Err(UserError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if password.len() > 128 {
            return Err(UserError::Validation(
                "Password cannot exceed 128 characters".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleDto;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    const EXISTING_ID: i64 = 1;
    const NON_EXISTING_ID: i64 = 1000;
    const DEPENDENT_ID: i64 = 20;

    fn sample_user() -> UserDto {
        UserDto {
            id: EXISTING_ID,
            first_name: "Alex".to_string(),
            last_name: "Brown".to_string(),
            email: "alex@example.com".to_string(),
            roles: vec![RoleDto {
                id: 1,
                authority: "ROLE_OPERATOR".to_string(),
            }],
        }
    }

    fn create_input(email: &str) -> CreateUser {
        CreateUser {
            first_name: "Alex".to_string(),
            last_name: "Brown".to_string(),
            email: email.to_string(),
            password: "changeit123".to_string(),
            role_ids: vec![1],
        }
    }

    #[tokio::test]
    async fn test_insert_hashes_password_before_persisting() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|input: &NewUser| {
                input.password_hash.starts_with("$argon2")
                    && input.password_hash != "changeit123"
            })
            .times(1)
            .returning(|_| Ok(sample_user()));

        let service = UserService::new(repo);
        let result = service.insert(create_input("alex@example.com")).await.unwrap();

        assert_eq!(result.email, "alex@example.com");
    }

    #[tokio::test]
    async fn test_insert_response_carries_no_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_create().returning(|_| Ok(sample_user()));

        let service = UserService::new(repo);
        let result = service.insert(create_input("alex@example.com")).await.unwrap();

        let value = serde_json::to_value(&result).unwrap();
        let serialized = value.to_string();
        assert!(!serialized.contains("password"));
        assert!(!serialized.contains("changeit123"));
        assert!(!serialized.contains("argon2"));
    }

    #[tokio::test]
    async fn test_insert_with_used_email_fails_without_persisting() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists()
            .withf(|email| email == "alex@example.com")
            .returning(|_| Ok(true));
        // expect_create is never registered: nothing may be persisted.

        let service = UserService::new(repo);
        let result = service.insert(create_input("alex@example.com")).await;

        match result {
            Err(UserError::FieldValidation(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "email");
                assert_eq!(violations[0].message, "email already exists");
            }
            other => panic!("expected field validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_short_password() {
        let repo = MockUserRepository::new();

        let service = UserService::new(repo);
        let mut input = create_input("alex@example.com");
        input.password = "short".to_string();

        let result = service.insert(input).await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_email() {
        let repo = MockUserRepository::new();

        let service = UserService::new(repo);
        let result = service.insert(create_input("not-an-email")).await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_find_by_id_fails_when_id_does_not_exist() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(NON_EXISTING_ID))
            .returning(|_| Ok(None));

        let service = UserService::new(repo);
        let result = service.find_by_id(NON_EXISTING_ID).await;

        assert!(matches!(result, Err(UserError::NotFound(NON_EXISTING_ID))));
    }

    #[tokio::test]
    async fn test_update_fails_when_id_does_not_exist() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .returning(|id, _| Err(UserError::NotFound(id)));

        let service = UserService::new(repo);
        let result = service
            .update(
                NON_EXISTING_ID,
                UpdateUser {
                    first_name: "Alex".to_string(),
                    last_name: "Brown".to_string(),
                    email: "alex@example.com".to_string(),
                    role_ids: vec![1],
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::NotFound(NON_EXISTING_ID))));
    }

    #[tokio::test]
    async fn test_delete_fails_with_not_found_when_id_does_not_exist() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists()
            .with(eq(NON_EXISTING_ID))
            .returning(|_| Ok(false));

        let service = UserService::new(repo);
        let result = service.delete(NON_EXISTING_ID).await;

        assert!(matches!(result, Err(UserError::NotFound(NON_EXISTING_ID))));
    }

    #[tokio::test]
    async fn test_delete_fails_with_integrity_violation_when_id_has_dependents() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists()
            .with(eq(DEPENDENT_ID))
            .returning(|_| Ok(true));
        repo.expect_delete()
            .with(eq(DEPENDENT_ID))
            .returning(|id| Err(UserError::IntegrityViolation(id)));

        let service = UserService::new(repo);
        let result = service.delete(DEPENDENT_ID).await;

        assert!(matches!(
            result,
            Err(UserError::IntegrityViolation(DEPENDENT_ID))
        ));
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_id_exists() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists()
            .with(eq(EXISTING_ID))
            .returning(|_| Ok(true));
        repo.expect_delete()
            .with(eq(EXISTING_ID))
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(repo);
        assert!(service.delete(EXISTING_ID).await.is_ok());
    }
}
