use std::future::Future;

use crate::error::AppError;
use crate::models::user::Role;

/// Subject id of the built-in doctor account.
///
/// SECURITY: this id paired with role `doctor` is accepted without a user
/// store lookup, i.e. anyone who can spell the token is a doctor. Kept for
/// compatibility with existing clients; needs review before any real
/// deployment.
pub const PRIVILEGED_DOCTOR_ID: &str = "doc-123";

pub const TOKEN_SCHEME: &str = "fake-token";

const SEPARATOR: &str = "::";

/// Shape-checked `scheme::subject::role` triple. Nothing here has been
/// checked against the user store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub scheme: String,
    pub subject_id: String,
    pub role: String,
}

/// A resolved caller, stored in request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub subject_id: String,
    pub role: Role,
}

impl Caller {
    pub fn require_patient(&self) -> Result<&str, AppError> {
        match self.role {
            Role::Patient => Ok(&self.subject_id),
            _ => Err(AppError::Forbidden("Requires patient role".to_string())),
        }
    }

    pub fn require_doctor(&self) -> Result<&str, AppError> {
        match self.role {
            Role::Doctor => Ok(&self.subject_id),
            _ => Err(AppError::Forbidden("Requires doctor role".to_string())),
        }
    }
}

pub fn issue_token(subject_id: &str, role: Role) -> String {
    format!("{}{sep}{}{sep}{}", TOKEN_SCHEME, subject_id, role, sep = SEPARATOR)
}

pub fn parse_credential(raw: &str) -> Result<Credential, AppError> {
    let parts: Vec<&str> = raw.split(SEPARATOR).collect();
    match parts.as_slice() {
        [scheme, subject_id, role] => Ok(Credential {
            scheme: scheme.to_string(),
            subject_id: subject_id.to_string(),
            role: role.to_string(),
        }),
        _ => Err(AppError::Unauthorized("Invalid token".to_string())),
    }
}

/// Strip the `Bearer ` prefix from an Authorization header value.
pub fn bearer_credential(header_value: &str) -> Result<&str, AppError> {
    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))?
        .trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized("Empty token".to_string()));
    }
    Ok(token)
}

/// Resolve a raw credential into a caller.
///
/// `lookup_role` returns the stored role for a subject, or `None` when the
/// subject does not exist. A stored role that differs from the credential's
/// role is `Unauthorized`, not `Forbidden`.
pub async fn resolve_credential<F, Fut>(raw: &str, lookup_role: F) -> Result<Caller, AppError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Option<Role>, AppError>>,
{
    let credential = parse_credential(raw)?;

    if credential.subject_id == PRIVILEGED_DOCTOR_ID && credential.role == Role::Doctor.as_str() {
        tracing::warn!("Privileged doctor token accepted without store lookup");
        return Ok(Caller {
            subject_id: credential.subject_id,
            role: Role::Doctor,
        });
    }

    let stored_role = lookup_role(credential.subject_id.clone())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid user".to_string()))?;

    if stored_role.as_str() != credential.role {
        tracing::info!(
            "Role mismatch for subject {}: token says '{}', store says '{}'",
            credential.subject_id,
            credential.role,
            stored_role
        );
        return Err(AppError::Unauthorized("Role mismatch".to_string()));
    }

    Ok(Caller {
        subject_id: credential.subject_id,
        role: stored_role,
    })
}
