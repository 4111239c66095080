use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct CardTransactionStore {
    pool: SqlitePool,
}

/// A stored card transaction. Amounts are fixed-point: `amount` is the
/// integer value, `currency_scale` the number of decimal places.
#[derive(Debug, Clone)]
pub struct CardTransaction {
    pub id: i64,
    pub user_id: i64,
    pub occurred_at: String,
    pub amount: i64,
    pub currency_scale: i32,
    pub currency_code: String,
    pub reference: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub merchant_country_code: String,
    pub merchant_country_name: String,
    pub merchant_category_code: String,
    pub merchant_category_name: String,
    pub created_at: String,
}

/// Fields for a transaction about to be recorded.
#[derive(Debug, Clone)]
pub struct NewCardTransaction {
    pub user_id: i64,
    pub occurred_at: String,
    pub amount: i64,
    pub currency_scale: i32,
    pub currency_code: String,
    pub reference: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub merchant_country_code: String,
    pub merchant_country_name: String,
    pub merchant_category_code: String,
    pub merchant_category_name: String,
}

#[derive(sqlx::FromRow)]
struct CardTransactionRow {
    id: i64,
    user_id: i64,
    occurred_at: String,
    amount: i64,
    currency_scale: i32,
    currency_code: String,
    reference: String,
    merchant_name: String,
    merchant_city: String,
    merchant_country_code: String,
    merchant_country_name: String,
    merchant_category_code: String,
    merchant_category_name: String,
    created_at: String,
}

impl From<CardTransactionRow> for CardTransaction {
    fn from(row: CardTransactionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            occurred_at: row.occurred_at,
            amount: row.amount,
            currency_scale: row.currency_scale,
            currency_code: row.currency_code,
            reference: row.reference,
            merchant_name: row.merchant_name,
            merchant_city: row.merchant_city,
            merchant_country_code: row.merchant_country_code,
            merchant_country_name: row.merchant_country_name,
            merchant_category_code: row.merchant_category_code,
            merchant_category_name: row.merchant_category_name,
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, user_id, occurred_at, amount, currency_scale, currency_code, \
     reference, merchant_name, merchant_city, merchant_country_code, merchant_country_name, \
     merchant_category_code, merchant_category_name, created_at";

impl CardTransactionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a card transaction. Returns the transaction ID.
    pub async fn create(&self, tx: &NewCardTransaction) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO card_transactions (
                user_id, occurred_at, amount, currency_scale, currency_code, reference,
                merchant_name, merchant_city, merchant_country_code, merchant_country_name,
                merchant_category_code, merchant_category_name
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(tx.user_id)
        .bind(&tx.occurred_at)
        .bind(tx.amount)
        .bind(tx.currency_scale)
        .bind(&tx.currency_code)
        .bind(&tx.reference)
        .bind(&tx.merchant_name)
        .bind(&tx.merchant_city)
        .bind(&tx.merchant_country_code)
        .bind(&tx.merchant_country_name)
        .bind(&tx.merchant_category_code)
        .bind(&tx.merchant_category_name)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get a transaction by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<CardTransaction>, sqlx::Error> {
        let query = format!("SELECT {} FROM card_transactions WHERE id = ?", SELECT_COLUMNS);
        let row: Option<CardTransactionRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CardTransaction::from))
    }

    /// List a user's transactions, oldest first.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<CardTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM card_transactions WHERE user_id = ? ORDER BY id",
            SELECT_COLUMNS
        );
        let rows: Vec<CardTransactionRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CardTransaction::from).collect())
    }
}
