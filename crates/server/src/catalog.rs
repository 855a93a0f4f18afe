//! Read-only catalog routes.
//!
//! - `GET /stones`                    — active stones with their size ladders
//! - `GET /settings`                  — active settings
//! - `GET /metals`                    — active metals
//! - `GET /stones/{stone_id}/price`   — price of one stone at `?carat=`

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use ringforge_core::{Availability, DomainError, Metal, Setting, Stone, StoneId};
use ringforge_db::repositories::{CatalogRepository, SqlCatalogRepository};
use ringforge_db::DbPool;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ApiReply};

#[derive(Clone)]
pub struct CatalogState {
    catalog: Arc<dyn CatalogRepository>,
}

/// Carat arrives as a raw string so a malformed value can be rejected with a
/// useful message instead of a generic extractor failure.
#[derive(Debug, Deserialize)]
pub struct StonePriceQuery {
    pub carat: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StonePriceResponse {
    pub stone_id: String,
    pub carat: Decimal,
    pub price: Decimal,
    pub availability: Availability,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new()
        .route("/stones", get(list_stones))
        .route("/settings", get(list_settings))
        .route("/metals", get(list_metals))
        .route("/stones/{stone_id}/price", get(stone_price))
        .with_state(CatalogState { catalog: Arc::new(SqlCatalogRepository::new(db_pool)) })
}

async fn list_stones(State(state): State<CatalogState>) -> Result<Json<Vec<Stone>>, ApiReply> {
    let correlation_id = errors::correlation_id();
    let stones = state
        .catalog
        .list_active_stones()
        .await
        .map_err(|error| errors::persistence(&correlation_id, error))?;
    Ok(Json(stones))
}

async fn list_settings(State(state): State<CatalogState>) -> Result<Json<Vec<Setting>>, ApiReply> {
    let correlation_id = errors::correlation_id();
    let settings = state
        .catalog
        .list_active_settings()
        .await
        .map_err(|error| errors::persistence(&correlation_id, error))?;
    Ok(Json(settings))
}

async fn list_metals(State(state): State<CatalogState>) -> Result<Json<Vec<Metal>>, ApiReply> {
    let correlation_id = errors::correlation_id();
    let metals = state
        .catalog
        .list_active_metals()
        .await
        .map_err(|error| errors::persistence(&correlation_id, error))?;
    Ok(Json(metals))
}

async fn stone_price(
    Path(stone_id): Path<String>,
    Query(query): Query<StonePriceQuery>,
    State(state): State<CatalogState>,
) -> Result<Json<StonePriceResponse>, ApiReply> {
    let correlation_id = errors::correlation_id();

    let raw_carat = match query.carat.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(errors::bad_request(&correlation_id, "carat query parameter is required"))
        }
    };
    let carat = Decimal::from_str(raw_carat).map_err(|_| {
        errors::bad_request(&correlation_id, format!("carat `{raw_carat}` is not a decimal number"))
    })?;

    let stone_id = StoneId(stone_id);
    let stone = state
        .catalog
        .stone_by_id(&stone_id)
        .await
        .map_err(|error| errors::persistence(&correlation_id, error))?
        .ok_or_else(|| {
            errors::domain(
                &correlation_id,
                DomainError::NotFound { kind: "stone", id: stone_id.0.clone() },
            )
        })?;

    let size = stone.size_for_carat(carat).ok_or_else(|| {
        errors::domain(
            &correlation_id,
            DomainError::InvalidCarat { stone_id: stone.id.0.clone(), carat },
        )
    })?;

    Ok(Json(StonePriceResponse {
        stone_id: stone.id.0.clone(),
        carat,
        price: size.price,
        availability: size.availability,
    }))
}
