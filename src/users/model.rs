use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A row of `user_account`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for `create_user`; validated before it touches the database.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub password: String,
}

/// Partial profile update; `None` fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub password: Option<String>,
}
