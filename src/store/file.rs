//! Flat-file persistence: the whole database is one JSON document with
//! top-level `users`, `assessments`, and `portfolios` arrays, rewritten on
//! every mutation. Single-process use only; a tokio mutex serializes access
//! within the process and the temp-file-plus-rename replace is all the
//! protection the file itself gets.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    types::{Assessment, NewAssessment, NewPortfolio, NewUser, Portfolio, User, UserUpdate},
    validate_new_user, Store, StoreError, StoreResult,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileDb {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    assessments: Vec<Assessment>,
    #[serde(default)]
    portfolios: Vec<Portfolio>,
}

pub struct FileStore {
    path: PathBuf,
    db: Mutex<FileDb>,
}

impl FileStore {
    /// Loads the database file, creating it (and its parent directory) with
    /// empty collections when absent.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let db = if path.exists() {
            let raw = std::fs::read(&path)?;
            serde_json::from_slice(&raw)?
        } else {
            FileDb::default()
        };
        // Write defaults up front so the file exists from the first run.
        write_db(&path, &db)?;
        Ok(Self {
            path,
            db: Mutex::new(db),
        })
    }

    fn persist(&self, db: &FileDb) -> StoreResult<()> {
        write_db(&self.path, db)
    }
}

fn write_db(path: &Path, db: &FileDb) -> StoreResult<()> {
    let tmp = path.with_extension("tmp");
    let raw = serde_json::to_vec_pretty(db)?;
    std::fs::write(&tmp, raw)?;
    std::fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "flat-file store persisted");
    Ok(())
}

/// Ids in the style of the flat-file layout: millisecond timestamp in base 36
/// plus a short random alphanumeric suffix.
fn generate_id() -> String {
    let millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64;
    let mut id = to_base36(millis);
    let mut rng = rand::thread_rng();
    for _ in 0..7 {
        let n = rng.gen_range(0..36u32);
        id.push(char::from_digit(n, 36).unwrap_or('0'));
    }
    id
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}

#[async_trait]
impl Store for FileStore {
    async fn create_user(&self, data: NewUser) -> StoreResult<User> {
        validate_new_user(&data)?;
        let mut db = self.db.lock().await;
        if db.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = data.into_user(generate_id(), OffsetDateTime::now_utc());
        db.users.push(user.clone());
        self.persist(&db)?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let db = self.db.lock().await;
        Ok(db.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let db = self.db.lock().await;
        Ok(db.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_user(&self, id: &str, update: UserUpdate) -> StoreResult<Option<User>> {
        let mut db = self.db.lock().await;
        // Keep the email-uniqueness invariant on update too (the postgres
        // backend gets this from its unique index).
        if let Some(email) = &update.email {
            if db.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let Some(user) = db.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        update.apply(user);
        user.updated_at = OffsetDateTime::now_utc();
        let updated = user.clone();
        self.persist(&db)?;
        Ok(Some(updated))
    }

    async fn create_assessment(&self, data: NewAssessment) -> StoreResult<Assessment> {
        let mut db = self.db.lock().await;
        let assessment = data.into_assessment(generate_id(), OffsetDateTime::now_utc());
        db.assessments.push(assessment.clone());
        // Best-effort owner linkage; an unknown userId leaves the record
        // unattached.
        if let Some(owner) = db.users.iter_mut().find(|u| u.id == assessment.user_id) {
            owner.assessments.push(assessment.id.clone());
        }
        self.persist(&db)?;
        Ok(assessment)
    }

    async fn assessments_by_user(&self, user_id: &str) -> StoreResult<Vec<Assessment>> {
        let db = self.db.lock().await;
        Ok(db
            .assessments
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_portfolio(&self, data: NewPortfolio) -> StoreResult<Portfolio> {
        let mut db = self.db.lock().await;
        let portfolio = data.into_portfolio(generate_id(), OffsetDateTime::now_utc());
        db.portfolios.push(portfolio.clone());
        if let Some(owner) = db.users.iter_mut().find(|u| u.id == portfolio.user_id) {
            owner.projects.push(portfolio.id.clone());
        }
        self.persist(&db)?;
        Ok(portfolio)
    }

    async fn portfolios_by_user(&self, user_id: &str) -> StoreResult<Vec<Portfolio>> {
        let db = self.db.lock().await;
        Ok(db
            .portfolios
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}
