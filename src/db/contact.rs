use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct ContactStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Contact {
    pub id: i64,
    #[serde(rename = "user_id")]
    pub user_id: i64,
    pub name: String,
    pub phone: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i64,
    user_id: i64,
    name: String,
    phone: String,
    created_at: String,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

impl ContactStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a contact owned by a user. Returns the contact ID.
    pub async fn create(&self, user_id: i64, name: &str, phone: &str) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO contacts (user_id, name, phone) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(name)
            .bind(phone)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a contact by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Contact>, sqlx::Error> {
        let row: Option<ContactRow> = sqlx::query_as(
            "SELECT id, user_id, name, phone, created_at FROM contacts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Contact::from))
    }

    /// List a user's contacts, oldest first.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Contact>, sqlx::Error> {
        let rows: Vec<ContactRow> = sqlx::query_as(
            "SELECT id, user_id, name, phone, created_at FROM contacts
             WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }
}
