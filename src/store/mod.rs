//! Persistence boundary: one contract, two interchangeable backends.
//!
//! [`PgStore`](postgres::PgStore) keeps each record as a JSONB document in
//! Postgres; [`FileStore`](file::FileStore) keeps everything in a single
//! on-disk JSON file. Which one backs the process is decided once at startup
//! from configuration, and callers only ever see `Arc<dyn Store>`.

pub mod file;
pub mod postgres;
pub mod types;

use async_trait::async_trait;

use types::{Assessment, NewAssessment, NewPortfolio, NewUser, Portfolio, User, UserUpdate};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // The unique index on users.email is the authoritative duplicate
            // check; a concurrent signup loses here rather than at the
            // read-then-write check in the handler.
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            e => StoreError::Backend(e.into()),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Backend(err.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The persistence contract shared by both backends.
///
/// Lookup misses are `Ok(None)` / empty `Vec`, never errors; only backend
/// failures and constraint violations surface as `Err`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, data: NewUser) -> StoreResult<User>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn user_by_id(&self, id: &str) -> StoreResult<Option<User>>;
    /// Merges the provided fields and refreshes `updatedAt`; `Ok(None)` when
    /// no user has this id.
    async fn update_user(&self, id: &str, update: UserUpdate) -> StoreResult<Option<User>>;

    /// Creates the assessment, then appends its id to the owner's
    /// denormalized `assessments` list. A missing owner is not an error.
    async fn create_assessment(&self, data: NewAssessment) -> StoreResult<Assessment>;
    async fn assessments_by_user(&self, user_id: &str) -> StoreResult<Vec<Assessment>>;

    async fn create_portfolio(&self, data: NewPortfolio) -> StoreResult<Portfolio>;
    async fn portfolios_by_user(&self, user_id: &str) -> StoreResult<Vec<Portfolio>>;
}

pub(crate) fn validate_new_user(data: &NewUser) -> StoreResult<()> {
    for (field, value) in [
        ("name", &data.name),
        ("email", &data.email),
        ("password", &data.password),
    ] {
        if value.trim().is_empty() {
            return Err(StoreError::Validation(format!("{field} is required")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::types::Role;
    use super::*;

    fn new_user(name: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: Role::User,
            current_role: None,
            experience_level: None,
            interests: vec![],
            skills: vec![],
            education: vec![],
            certifications: vec![],
        }
    }

    #[test]
    fn validation_names_the_missing_field() {
        let err = validate_new_user(&new_user("Ana", "", "hash")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref m) if m == "email is required"));
        assert!(validate_new_user(&new_user("Ana", "a@x.com", "hash")).is_ok());
    }
}
