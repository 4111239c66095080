//! Card transactions recorded against the authenticated user.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::error::{ApiError, ResultExt};
use super::response::Envelope;
use crate::auth::CurrentUser;
use crate::db::{CardTransaction, Database, NewCardTransaction};

#[derive(Clone)]
pub struct CardTransactionsState {
    pub db: Database,
}

pub fn router(state: CardTransactionsState) -> Router {
    Router::new()
        .route(
            "/card-transactions",
            get(list_card_transactions).post(create_card_transaction),
        )
        .with_state(state)
}

/// Fixed-point monetary amount: `value` scaled by 10^-`scale`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CurrencyValue {
    value: i64,
    scale: i32,
}

#[derive(Deserialize)]
struct CreateCardTransactionRequest {
    #[serde(rename = "dateTime")]
    date_time: String,
    amount: CurrencyValue,
    #[serde(rename = "currencyCode")]
    currency_code: String,
    #[serde(default)]
    reference: String,
    #[serde(rename = "merchantName", default)]
    merchant_name: String,
    #[serde(rename = "merchantCity", default)]
    merchant_city: String,
    #[serde(rename = "merchantCountryCode", default)]
    merchant_country_code: String,
    #[serde(rename = "merchantCountryName", default)]
    merchant_country_name: String,
    #[serde(rename = "merchantCategoryCode", default)]
    merchant_category_code: String,
    #[serde(rename = "merchantCategoryName", default)]
    merchant_category_name: String,
}

fn card_transaction_json(tx: &CardTransaction) -> Value {
    json!({
        "id": tx.id,
        "user_id": tx.user_id,
        "dateTime": tx.occurred_at,
        "amount": CurrencyValue { value: tx.amount, scale: tx.currency_scale },
        "currencyCode": tx.currency_code,
        "reference": tx.reference,
        "merchantName": tx.merchant_name,
        "merchantCity": tx.merchant_city,
        "merchantCountryCode": tx.merchant_country_code,
        "merchantCountryName": tx.merchant_country_name,
        "merchantCategoryCode": tx.merchant_category_code,
        "merchantCategoryName": tx.merchant_category_name,
        "createdAt": tx.created_at,
    })
}

async fn create_card_transaction(
    State(state): State<CardTransactionsState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<CreateCardTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.currency_code.is_empty() {
        return Err(ApiError::bad_request("Currency code should be on the payload"));
    }

    if payload.date_time.is_empty() {
        return Err(ApiError::bad_request("Transaction date should be on the payload"));
    }

    let store = state.db.card_transactions();
    let id = store
        .create(&NewCardTransaction {
            user_id,
            occurred_at: payload.date_time,
            amount: payload.amount.value,
            currency_scale: payload.amount.scale,
            currency_code: payload.currency_code,
            reference: payload.reference,
            merchant_name: payload.merchant_name,
            merchant_city: payload.merchant_city,
            merchant_country_code: payload.merchant_country_code,
            merchant_country_name: payload.merchant_country_name,
            merchant_category_code: payload.merchant_category_code,
            merchant_category_name: payload.merchant_category_name,
        })
        .await
        .db_err("Failed to create card transaction")?;

    let tx = store
        .get_by_id(id)
        .await
        .db_err("Failed to load created card transaction")?
        .ok_or_else(|| ApiError::internal("Card transaction vanished after creation"))?;

    Ok(Envelope::ok("success").with("cardTransaction", card_transaction_json(&tx)))
}

async fn list_card_transactions(
    State(state): State<CardTransactionsState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state
        .db
        .card_transactions()
        .list_by_user(user_id)
        .await
        .db_err("Could not get user's card transactions")?;

    let body: Vec<Value> = transactions.iter().map(card_transaction_json).collect();

    Ok(Envelope::ok("success").with("cardTransactions", json!(body)))
}
