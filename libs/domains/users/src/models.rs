use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Flattened id/authority pair for a role association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub id: i64,
    pub authority: String,
}

/// Wire-level projection of a user. Carries no password in any form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<RoleDto>,
}

/// DTO for creating a new user. The only write shape that carries a
/// password, and the only moment a password can be set.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
    /// Ids of the roles to associate; an empty list is valid
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

/// DTO for updating an existing user. Deliberately has no password field:
/// updates overwrite scalars and replace the role set, nothing else.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

/// Internal insert shape handed to repositories: the password has already
/// been hashed by the service layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role_ids: Vec<i64>,
}

/// Deduplicate association ids while preserving first-seen order.
pub(crate) fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_never_serializes_a_password() {
        let dto = UserDto {
            id: 1,
            first_name: "Alex".to_string(),
            last_name: "Brown".to_string(),
            email: "alex@example.com".to_string(),
            roles: vec![RoleDto {
                id: 1,
                authority: "ROLE_OPERATOR".to_string(),
            }],
        };

        let value = serde_json::to_value(&dto).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert!(!keys.iter().any(|k| k.contains("password")));
    }

    #[test]
    fn test_create_user_validation() {
        let valid = CreateUser {
            first_name: "Alex".to_string(),
            last_name: "Brown".to_string(),
            email: "alex@example.com".to_string(),
            password: "changeit123".to_string(),
            role_ids: vec![1],
        };
        assert!(valid.validate().is_ok());

        let bad_email = CreateUser {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_name = CreateUser {
            first_name: String::new(),
            ..valid
        };
        assert!(empty_name.validate().is_err());
    }
}
