//! Ring builder routes: pricing, configuration save/load, quote submission.
//!
//! - `POST /calculate-price`              — price a (stone, carat, setting, metal) pick
//! - `POST /configurations`               — price and persist a configuration
//! - `GET  /configurations/{config_id}`   — fetch a saved configuration
//! - `POST /quote-request`                — submit a quote request for a saved configuration

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use ringforge_core::pricing::{self, PriceBreakdown, PriceDetails};
use ringforge_core::{
    ConfigurationId, CustomerDetails, CustomerInfo, DomainError, Metal, MetalId, QuoteRequest,
    RingConfiguration, Setting, SettingId, Stone, StoneId,
};
use ringforge_db::repositories::{
    CatalogRepository, ConfigurationRepository, QuoteRequestRepository, SqlCatalogRepository,
    SqlConfigurationRepository, SqlQuoteRequestRepository,
};
use ringforge_db::DbPool;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{self, ApiReply};

#[derive(Clone)]
pub struct BuilderState {
    catalog: Arc<dyn CatalogRepository>,
    configurations: Arc<dyn ConfigurationRepository>,
    quote_requests: Arc<dyn QuoteRequestRepository>,
}

impl BuilderState {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            catalog: Arc::new(SqlCatalogRepository::new(db_pool.clone())),
            configurations: Arc::new(SqlConfigurationRepository::new(db_pool.clone())),
            quote_requests: Arc::new(SqlQuoteRequestRepository::new(db_pool)),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub stone_id: String,
    pub setting_id: String,
    pub metal_id: String,
    pub carat: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub total_price: Decimal,
    pub breakdown: PriceBreakdown,
    pub details: PriceDetails,
}

#[derive(Debug, Deserialize)]
pub struct SaveConfigurationRequest {
    pub stone_id: String,
    pub setting_id: String,
    pub metal_id: String,
    pub carat: Decimal,
    #[serde(default)]
    pub personality_type: Option<String>,
    #[serde(default)]
    pub customer_info: Option<CustomerInfo>,
}

#[derive(Debug, Serialize)]
pub struct ConfigurationSaved {
    pub configuration_id: String,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSubmission {
    pub configuration_id: String,
    pub customer_details: CustomerDetails,
}

#[derive(Debug, Serialize)]
pub struct QuoteSubmitted {
    pub quote_request_id: String,
    pub status: &'static str,
    pub estimated_response: String,
    pub configuration: RingConfiguration,
    pub customer_details: CustomerDetails,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(db_pool: DbPool) -> Router {
    Router::new()
        .route("/calculate-price", post(calculate_price))
        .route("/configurations", post(save_configuration))
        .route("/configurations/{config_id}", get(get_configuration))
        .route("/quote-request", post(submit_quote_request))
        .with_state(BuilderState::new(db_pool))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn calculate_price(
    State(state): State<BuilderState>,
    Json(body): Json<PriceRequest>,
) -> Result<Json<PriceResponse>, ApiReply> {
    let correlation_id = errors::correlation_id();

    let (stone, setting, metal) = resolve_components(
        &state,
        &correlation_id,
        &body.stone_id,
        &body.setting_id,
        &body.metal_id,
    )
    .await?;

    let quote = pricing::price_ring(&stone, body.carat, &setting, &metal)
        .map_err(|error| errors::domain(&correlation_id, error))?;

    Ok(Json(PriceResponse {
        total_price: quote.total,
        breakdown: quote.breakdown,
        details: quote.details,
    }))
}

async fn save_configuration(
    State(state): State<BuilderState>,
    Json(body): Json<SaveConfigurationRequest>,
) -> Result<Json<ConfigurationSaved>, ApiReply> {
    let correlation_id = errors::correlation_id();

    let customer_info = match body.customer_info {
        Some(info) => Some(validated_customer_info(&correlation_id, info)?),
        None => None,
    };

    let (stone, setting, metal) = resolve_components(
        &state,
        &correlation_id,
        &body.stone_id,
        &body.setting_id,
        &body.metal_id,
    )
    .await?;

    let quote = pricing::price_ring(&stone, body.carat, &setting, &metal)
        .map_err(|error| errors::domain(&correlation_id, error))?;

    let now = Utc::now();
    let configuration = RingConfiguration {
        id: ConfigurationId::generate(),
        stone_id: stone.id.clone(),
        setting_id: setting.id.clone(),
        metal_id: metal.id.clone(),
        carat: body.carat,
        personality_type: normalized(body.personality_type),
        total_price: quote.total,
        customer_info,
        created_at: now,
        updated_at: now,
    };

    state
        .configurations
        .save(configuration.clone())
        .await
        .map_err(|error| errors::persistence(&correlation_id, error))?;

    info!(
        event_name = "api.configuration.saved",
        correlation_id = %correlation_id,
        configuration_id = %configuration.id.0,
        total_price = %configuration.total_price,
        "ring configuration saved"
    );

    Ok(Json(ConfigurationSaved {
        configuration_id: configuration.id.0,
        total_price: configuration.total_price,
        created_at: configuration.created_at,
    }))
}

async fn get_configuration(
    Path(config_id): Path<String>,
    State(state): State<BuilderState>,
) -> Result<Json<RingConfiguration>, ApiReply> {
    let correlation_id = errors::correlation_id();
    let id = ConfigurationId(config_id);

    let configuration = state
        .configurations
        .find_by_id(&id)
        .await
        .map_err(|error| errors::persistence(&correlation_id, error))?
        .ok_or_else(|| {
            errors::domain(
                &correlation_id,
                DomainError::NotFound { kind: "configuration", id: id.0.clone() },
            )
        })?;

    Ok(Json(configuration))
}

async fn submit_quote_request(
    State(state): State<BuilderState>,
    Json(body): Json<QuoteSubmission>,
) -> Result<Json<QuoteSubmitted>, ApiReply> {
    let correlation_id = errors::correlation_id();

    if body.customer_details.name.trim().is_empty()
        || body.customer_details.email.trim().is_empty()
    {
        return Err(errors::bad_request(&correlation_id, "customer name and email are required"));
    }
    let customer_details = CustomerDetails {
        name: body.customer_details.name.trim().to_string(),
        email: body.customer_details.email.trim().to_string(),
        phone: body.customer_details.phone,
        message: body.customer_details.message,
    };

    let configuration_id = ConfigurationId(body.configuration_id.trim().to_string());
    if configuration_id.0.is_empty() {
        return Err(errors::bad_request(&correlation_id, "configuration_id is required"));
    }

    let configuration = state
        .configurations
        .find_by_id(&configuration_id)
        .await
        .map_err(|error| errors::persistence(&correlation_id, error))?
        .ok_or_else(|| {
            errors::domain(
                &correlation_id,
                DomainError::ConfigurationNotFound { id: configuration_id.0.clone() },
            )
        })?;

    let request = QuoteRequest::submit(configuration, customer_details);
    state
        .quote_requests
        .insert(request.clone())
        .await
        .map_err(|error| errors::persistence(&correlation_id, error))?;

    info!(
        event_name = "api.quote.submitted",
        correlation_id = %correlation_id,
        quote_request_id = %request.id.0,
        configuration_id = %request.configuration.id.0,
        "quote request submitted"
    );

    Ok(Json(QuoteSubmitted {
        quote_request_id: request.id.0,
        status: request.status.as_str(),
        estimated_response: request.estimated_response,
        configuration: request.configuration,
        customer_details: request.customer_details,
        created_at: request.created_at,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the three component references, rejecting blank or unknown ids.
/// Lookups intentionally ignore the active flag so a configuration built
/// around a just-retired component still prices.
async fn resolve_components(
    state: &BuilderState,
    correlation_id: &str,
    stone_id: &str,
    setting_id: &str,
    metal_id: &str,
) -> Result<(Stone, Setting, Metal), ApiReply> {
    let stone_id = stone_id.trim();
    let setting_id = setting_id.trim();
    let metal_id = metal_id.trim();
    if stone_id.is_empty() || setting_id.is_empty() || metal_id.is_empty() {
        return Err(errors::bad_request(
            correlation_id,
            "stone_id, setting_id, and metal_id are required",
        ));
    }

    let stone = state
        .catalog
        .stone_by_id(&StoneId(stone_id.to_string()))
        .await
        .map_err(|error| errors::persistence(correlation_id, error))?
        .ok_or_else(|| {
            errors::domain(
                correlation_id,
                DomainError::InvalidReference { kind: "stone", id: stone_id.to_string() },
            )
        })?;

    let setting = state
        .catalog
        .setting_by_id(&SettingId(setting_id.to_string()))
        .await
        .map_err(|error| errors::persistence(correlation_id, error))?
        .ok_or_else(|| {
            errors::domain(
                correlation_id,
                DomainError::InvalidReference { kind: "setting", id: setting_id.to_string() },
            )
        })?;

    let metal = state
        .catalog
        .metal_by_id(&MetalId(metal_id.to_string()))
        .await
        .map_err(|error| errors::persistence(correlation_id, error))?
        .ok_or_else(|| {
            errors::domain(
                correlation_id,
                DomainError::InvalidReference { kind: "metal", id: metal_id.to_string() },
            )
        })?;

    Ok((stone, setting, metal))
}

fn validated_customer_info(
    correlation_id: &str,
    info: CustomerInfo,
) -> Result<CustomerInfo, ApiReply> {
    if info.name.trim().is_empty() || info.email.trim().is_empty() {
        return Err(errors::bad_request(
            correlation_id,
            "customer_info requires a name and email",
        ));
    }
    Ok(CustomerInfo {
        name: info.name.trim().to_string(),
        email: info.email.trim().to_string(),
        phone: info.phone,
        notes: info.notes,
    })
}

fn normalized(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;
    use ringforge_db::{connect_with_settings, migrations, CatalogSeedDataset, DbPool};
    use rust_decimal::Decimal;

    use super::*;

    async fn setup() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        CatalogSeedDataset::load(&pool).await.expect("seed");
        pool
    }

    fn state(pool: DbPool) -> State<BuilderState> {
        State(BuilderState::new(pool))
    }

    fn price_request(stone: &str, setting: &str, metal: &str, carat: Decimal) -> PriceRequest {
        PriceRequest {
            stone_id: stone.to_string(),
            setting_id: setting.to_string(),
            metal_id: metal.to_string(),
            carat,
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Avery Quinn".to_string(),
            email: "avery@example.com".to_string(),
            phone: Some("+1-555-0100".to_string()),
            message: Some("Engraving options?".to_string()),
        }
    }

    #[tokio::test]
    async fn calculate_price_sums_stone_setting_and_adjustment() {
        let pool = setup().await;

        let Json(payload) = calculate_price(
            state(pool.clone()),
            Json(price_request(
                "stone-round",
                "setting-solitaire",
                "metal-white-gold",
                Decimal::from(1),
            )),
        )
        .await
        .expect("price");

        assert_eq!(payload.total_price, Decimal::new(93000, 2));
        assert_eq!(payload.breakdown.stone, Decimal::from(750));
        assert_eq!(payload.breakdown.setting, Decimal::from(180));
        assert_eq!(payload.breakdown.metal_adjustment, Decimal::ZERO);
        assert_eq!(payload.details.stone.id.0, "stone-round");
        assert_eq!(payload.details.carat, Decimal::from(1));

        let Json(platinum) = calculate_price(
            state(pool),
            Json(price_request(
                "stone-round",
                "setting-solitaire",
                "metal-platinum",
                Decimal::from(1),
            )),
        )
        .await
        .expect("price");

        assert_eq!(platinum.breakdown.metal_adjustment, Decimal::new(32550, 2));
        assert_eq!(platinum.total_price, Decimal::new(125550, 2));
    }

    #[tokio::test]
    async fn calculate_price_rejects_unknown_components() {
        let pool = setup().await;

        let (status, Json(body)) = calculate_price(
            state(pool),
            Json(price_request(
                "stone-missing",
                "setting-solitaire",
                "metal-white-gold",
                Decimal::from(1),
            )),
        )
        .await
        .expect_err("unknown stone should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("stone-missing"));
    }

    #[tokio::test]
    async fn calculate_price_rejects_unlisted_carat() {
        let pool = setup().await;

        let (status, Json(body)) = calculate_price(
            state(pool),
            Json(price_request(
                "stone-round",
                "setting-solitaire",
                "metal-white-gold",
                Decimal::new(9, 1),
            )),
        )
        .await
        .expect_err("unlisted carat should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("0.9"));
    }

    #[tokio::test]
    async fn save_configuration_persists_and_round_trips() {
        let pool = setup().await;

        let Json(saved) = save_configuration(
            state(pool.clone()),
            Json(SaveConfigurationRequest {
                stone_id: "stone-oval".to_string(),
                setting_id: "setting-halo".to_string(),
                metal_id: "metal-rose-gold".to_string(),
                carat: Decimal::new(15, 1),
                personality_type: Some("glamorous".to_string()),
                customer_info: Some(CustomerInfo {
                    name: "Avery Quinn".to_string(),
                    email: "avery@example.com".to_string(),
                    phone: None,
                    notes: Some("Surprise proposal".to_string()),
                }),
            }),
        )
        .await
        .expect("save");

        assert!(saved.configuration_id.starts_with("RCFG-"));
        // (1120 + 280) * 1.08 = 1512.00
        assert_eq!(saved.total_price, Decimal::new(151200, 2));

        let Json(fetched) =
            get_configuration(Path(saved.configuration_id.clone()), state(pool))
                .await
                .expect("fetch");

        assert_eq!(fetched.id.0, saved.configuration_id);
        assert_eq!(fetched.stone_id.0, "stone-oval");
        assert_eq!(fetched.setting_id.0, "setting-halo");
        assert_eq!(fetched.metal_id.0, "metal-rose-gold");
        assert_eq!(fetched.carat, Decimal::new(15, 1));
        assert_eq!(fetched.personality_type.as_deref(), Some("glamorous"));
        assert_eq!(fetched.total_price, saved.total_price);
        assert_eq!(fetched.customer_info.expect("customer info").name, "Avery Quinn");
    }

    #[tokio::test]
    async fn save_configuration_normalizes_blank_personality_to_none() {
        let pool = setup().await;

        let Json(saved) = save_configuration(
            state(pool.clone()),
            Json(SaveConfigurationRequest {
                stone_id: "stone-round".to_string(),
                setting_id: "setting-solitaire".to_string(),
                metal_id: "metal-white-gold".to_string(),
                carat: Decimal::from(1),
                personality_type: Some("   ".to_string()),
                customer_info: None,
            }),
        )
        .await
        .expect("save");

        let Json(fetched) =
            get_configuration(Path(saved.configuration_id), state(pool)).await.expect("fetch");

        assert_eq!(fetched.personality_type, None);
        assert_eq!(fetched.customer_info, None);
    }

    #[tokio::test]
    async fn get_configuration_unknown_id_is_not_found() {
        let pool = setup().await;

        let (status, Json(body)) =
            get_configuration(Path("RCFG-missing".to_string()), state(pool))
                .await
                .expect_err("unknown configuration should be rejected");

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.contains("RCFG-missing"));
    }

    #[tokio::test]
    async fn submit_quote_request_embeds_the_configuration_snapshot() {
        let pool = setup().await;

        let Json(saved) = save_configuration(
            state(pool.clone()),
            Json(SaveConfigurationRequest {
                stone_id: "stone-round".to_string(),
                setting_id: "setting-solitaire".to_string(),
                metal_id: "metal-platinum".to_string(),
                carat: Decimal::from(1),
                personality_type: None,
                customer_info: None,
            }),
        )
        .await
        .expect("save");

        let Json(quote) = submit_quote_request(
            state(pool.clone()),
            Json(QuoteSubmission {
                configuration_id: saved.configuration_id.clone(),
                customer_details: customer(),
            }),
        )
        .await
        .expect("submit");

        assert!(quote.quote_request_id.starts_with("RQR-"));
        assert_eq!(quote.status, "submitted");
        assert_eq!(quote.estimated_response, "24-48 hours");
        assert_eq!(quote.configuration.id.0, saved.configuration_id);
        assert_eq!(quote.configuration.total_price, Decimal::new(125550, 2));
        assert_eq!(quote.customer_details.name, "Avery Quinn");

        let persisted: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quote_request WHERE id = ?")
            .bind(&quote.quote_request_id)
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(persisted, 1);
    }

    #[tokio::test]
    async fn submit_quote_request_unknown_configuration_persists_nothing() {
        let pool = setup().await;

        let (status, Json(body)) = submit_quote_request(
            state(pool.clone()),
            Json(QuoteSubmission {
                configuration_id: "RCFG-missing".to_string(),
                customer_details: customer(),
            }),
        )
        .await
        .expect_err("unknown configuration should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("RCFG-missing"));

        let persisted: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quote_request")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(persisted, 0);
    }

    #[tokio::test]
    async fn submit_quote_request_requires_contact_details() {
        let pool = setup().await;

        let (status, Json(body)) = submit_quote_request(
            state(pool),
            Json(QuoteSubmission {
                configuration_id: "RCFG-any".to_string(),
                customer_details: CustomerDetails {
                    name: "  ".to_string(),
                    email: "avery@example.com".to_string(),
                    phone: None,
                    message: None,
                },
            }),
        )
        .await
        .expect_err("blank name should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("name and email"));
    }
}
