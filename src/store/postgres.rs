//! Postgres-backed store. Each entity is kept as a JSONB document alongside
//! the columns that need indexing (`email`, `user_id`); the unique index on
//! `users.email` enforces the duplicate-email invariant.

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use super::{
    types::{Assessment, NewAssessment, NewPortfolio, NewUser, Portfolio, User, UserUpdate},
    validate_new_user, Store, StoreResult,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_user(&self, id: &str) -> StoreResult<Option<User>> {
        let doc = sqlx::query_scalar::<_, Json<User>>("SELECT doc FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(|Json(user)| user))
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query("UPDATE users SET email = $2, doc = $3 WHERE id = $1")
            .bind(&user.id)
            .bind(&user.email)
            .bind(Json(user))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Appends a child id to one of the owner's denormalized lists. This is a
    /// separate write from the child insert; a crash in between leaves the
    /// child unlinked, which the callers tolerate.
    async fn link_child(&self, user_id: &str, child_id: &str, kind: ChildKind) -> StoreResult<()> {
        let Some(mut owner) = self.fetch_user(user_id).await? else {
            return Ok(());
        };
        match kind {
            ChildKind::Assessment => owner.assessments.push(child_id.to_string()),
            ChildKind::Portfolio => owner.projects.push(child_id.to_string()),
        }
        self.save_user(&owner).await
    }
}

#[derive(Clone, Copy)]
enum ChildKind {
    Assessment,
    Portfolio,
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, data: NewUser) -> StoreResult<User> {
        validate_new_user(&data)?;
        let user = data.into_user(Uuid::new_v4().to_string(), OffsetDateTime::now_utc());
        sqlx::query("INSERT INTO users (id, email, doc) VALUES ($1, $2, $3)")
            .bind(&user.id)
            .bind(&user.email)
            .bind(Json(&user))
            .execute(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let doc = sqlx::query_scalar::<_, Json<User>>("SELECT doc FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(|Json(user)| user))
    }

    async fn user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        self.fetch_user(id).await
    }

    async fn update_user(&self, id: &str, update: UserUpdate) -> StoreResult<Option<User>> {
        let Some(mut user) = self.fetch_user(id).await? else {
            return Ok(None);
        };
        update.apply(&mut user);
        user.updated_at = OffsetDateTime::now_utc();
        self.save_user(&user).await?;
        Ok(Some(user))
    }

    async fn create_assessment(&self, data: NewAssessment) -> StoreResult<Assessment> {
        let assessment =
            data.into_assessment(Uuid::new_v4().to_string(), OffsetDateTime::now_utc());
        sqlx::query("INSERT INTO assessments (id, user_id, doc) VALUES ($1, $2, $3)")
            .bind(&assessment.id)
            .bind(&assessment.user_id)
            .bind(Json(&assessment))
            .execute(&self.pool)
            .await?;
        if let Err(e) = self
            .link_child(&assessment.user_id, &assessment.id, ChildKind::Assessment)
            .await
        {
            warn!(error = %e, assessment_id = %assessment.id, "owner linkage failed");
        }
        Ok(assessment)
    }

    async fn assessments_by_user(&self, user_id: &str) -> StoreResult<Vec<Assessment>> {
        let rows = sqlx::query_scalar::<_, Json<Assessment>>(
            "SELECT doc FROM assessments WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(a)| a).collect())
    }

    async fn create_portfolio(&self, data: NewPortfolio) -> StoreResult<Portfolio> {
        let portfolio = data.into_portfolio(Uuid::new_v4().to_string(), OffsetDateTime::now_utc());
        sqlx::query("INSERT INTO portfolios (id, user_id, doc) VALUES ($1, $2, $3)")
            .bind(&portfolio.id)
            .bind(&portfolio.user_id)
            .bind(Json(&portfolio))
            .execute(&self.pool)
            .await?;
        if let Err(e) = self
            .link_child(&portfolio.user_id, &portfolio.id, ChildKind::Portfolio)
            .await
        {
            warn!(error = %e, portfolio_id = %portfolio.id, "owner linkage failed");
        }
        Ok(portfolio)
    }

    async fn portfolios_by_user(&self, user_id: &str) -> StoreResult<Vec<Portfolio>> {
        let rows = sqlx::query_scalar::<_, Json<Portfolio>>(
            "SELECT doc FROM portfolios WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(p)| p).collect())
    }
}
