use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

/// Sign-up state of a user. Only confirmed users may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
    Pending,
    Confirmed,
}

impl UserState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserState::Pending => "pending",
            UserState::Confirmed => "confirmed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "confirmed" => UserState::Confirmed,
            _ => UserState::Pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub state: UserState,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    state: String,
    created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            state: UserState::from_str(&row.state),
            created_at: row.created_at,
        }
    }
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new pending user. Returns the user ID.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, state) VALUES (?, ?, 'pending')",
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a user by email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, state, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, state, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// Set the sign-up state for a user.
    pub async fn set_state(&self, id: i64, state: UserState) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET state = ? WHERE id = ?")
            .bind(state.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a sign-up confirmation nonce for a user.
    pub async fn create_confirmation(&self, nonce: &str, user_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO signup_confirmations (nonce, user_id) VALUES (?, ?)")
            .bind(nonce)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Look up the user a confirmation nonce was issued for.
    pub async fn lookup_confirmation(&self, nonce: &str) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT user_id FROM signup_confirmations WHERE nonce = ?")
                .bind(nonce)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| r.0))
    }

    /// Remove a consumed confirmation nonce.
    pub async fn delete_confirmation(&self, nonce: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM signup_confirmations WHERE nonce = ?")
            .bind(nonce)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
