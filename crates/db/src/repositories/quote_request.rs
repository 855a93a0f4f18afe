use sqlx::Row;

use ringforge_core::domain::configuration::RingConfiguration;
use ringforge_core::domain::quote::{
    CustomerDetails, QuoteRequest, QuoteRequestId, QuoteRequestStatus,
};

use super::{corrupt_record, parse_timestamp, QuoteRequestRepository, RepositoryError};
use crate::DbPool;

/// Append-only store for submitted quote requests.
///
/// Each row embeds `configuration_json`, the configuration exactly as it was
/// priced at submission. Reads decode that snapshot; they never re-join the
/// live catalog, so later price or availability edits leave submitted
/// requests untouched.
pub struct SqlQuoteRequestRepository {
    pool: DbPool,
}

impl SqlQuoteRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_quote_request(row: &sqlx::sqlite::SqliteRow) -> Result<QuoteRequest, RepositoryError> {
    let id: String =
        row.try_get("id").map_err(|e| corrupt_record("quote_request", "?", e.to_string()))?;
    let status_str: String =
        row.try_get("status").map_err(|e| corrupt_record("quote_request", &id, e.to_string()))?;
    let estimated_response: String = row
        .try_get("estimated_response")
        .map_err(|e| corrupt_record("quote_request", &id, e.to_string()))?;
    let configuration_json: String = row
        .try_get("configuration_json")
        .map_err(|e| corrupt_record("quote_request", &id, e.to_string()))?;
    let customer_name: String = row
        .try_get("customer_name")
        .map_err(|e| corrupt_record("quote_request", &id, e.to_string()))?;
    let customer_email: String = row
        .try_get("customer_email")
        .map_err(|e| corrupt_record("quote_request", &id, e.to_string()))?;
    let customer_phone: Option<String> = row
        .try_get("customer_phone")
        .map_err(|e| corrupt_record("quote_request", &id, e.to_string()))?;
    let customer_message: Option<String> = row
        .try_get("customer_message")
        .map_err(|e| corrupt_record("quote_request", &id, e.to_string()))?;
    let created_at_str: String = row
        .try_get("created_at")
        .map_err(|e| corrupt_record("quote_request", &id, e.to_string()))?;

    let status = status_str
        .parse::<QuoteRequestStatus>()
        .map_err(|e| corrupt_record("quote_request", &id, e))?;
    let configuration: RingConfiguration = serde_json::from_str(&configuration_json)
        .map_err(|e| corrupt_record("quote_request", &id, format!("configuration_json: {e}")))?;
    let created_at = parse_timestamp("quote_request", &id, "created_at", &created_at_str)?;

    Ok(QuoteRequest {
        id: QuoteRequestId(id),
        status,
        estimated_response,
        configuration,
        customer_details: CustomerDetails {
            name: customer_name,
            email: customer_email,
            phone: customer_phone,
            message: customer_message,
        },
        created_at,
    })
}

#[async_trait::async_trait]
impl QuoteRequestRepository for SqlQuoteRequestRepository {
    async fn insert(&self, request: QuoteRequest) -> Result<(), RepositoryError> {
        let configuration_json = serde_json::to_string(&request.configuration).map_err(|e| {
            corrupt_record("quote_request", &request.id.0, format!("configuration_json encode: {e}"))
        })?;

        sqlx::query(
            "INSERT INTO quote_request
                (id, configuration_id, status, estimated_response, configuration_json,
                 customer_name, customer_email, customer_phone, customer_message, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.id.0)
        .bind(&request.configuration.id.0)
        .bind(request.status.as_str())
        .bind(&request.estimated_response)
        .bind(&configuration_json)
        .bind(&request.customer_details.name)
        .bind(&request.customer_details.email)
        .bind(&request.customer_details.phone)
        .bind(&request.customer_details.message)
        .bind(request.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, configuration_id, status, estimated_response, configuration_json,
                    customer_name, customer_email, customer_phone, customer_message, created_at
             FROM quote_request WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_quote_request(r)?)),
            None => Ok(None),
        }
    }
}
