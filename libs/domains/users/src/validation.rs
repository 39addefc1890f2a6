//! Explicit insert-time validation.
//!
//! The email-uniqueness check runs only on insert-shaped input, before the
//! entity is constructed, and has no side effects beyond the read query.
//! The result is a list of field/message violations so the caller can
//! surface them all at once.

use axum_helpers::FieldMessage;

use crate::models::CreateUser;
use crate::repository::UserRepository;
use crate::UserResult;

/// Validate insert-shaped input against the store.
///
/// Returns the collected violations; an empty list means the input may
/// proceed to entity construction. The check is advisory with respect to
/// concurrent inserts: the store's unique constraint is the backstop.
pub async fn validate_new_user<R: UserRepository + ?Sized>(
    repository: &R,
    input: &CreateUser,
) -> UserResult<Vec<FieldMessage>> {
    let mut violations = Vec::new();

    if repository.email_exists(&input.email).await? {
        violations.push(FieldMessage::new("email", "email already exists"));
    }

    Ok(violations)
}
