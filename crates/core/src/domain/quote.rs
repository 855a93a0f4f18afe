use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::configuration::RingConfiguration;

/// Turnaround promise quoted back to the customer on submission.
pub const QUOTE_RESPONSE_SLA: &str = "24-48 hours";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteRequestId(pub String);

impl QuoteRequestId {
    pub fn generate() -> Self {
        Self(format!("RQR-{}", &Uuid::new_v4().simple().to_string()[..12]))
    }
}

/// Only `Submitted` is ever assigned by this service; the later states belong
/// to the sales team working the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteRequestStatus {
    Submitted,
    InReview,
    Closed,
}

impl QuoteRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::InReview => "in_review",
            Self::Closed => "closed",
        }
    }
}

impl std::str::FromStr for QuoteRequestStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "submitted" => Ok(Self::Submitted),
            "in_review" => Ok(Self::InReview),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown quote request status `{other}`")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A request for human follow-up. Embeds the configuration as it stood at
/// submission time, not a live reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub id: QuoteRequestId,
    pub status: QuoteRequestStatus,
    pub estimated_response: String,
    pub configuration: RingConfiguration,
    pub customer_details: CustomerDetails,
    pub created_at: DateTime<Utc>,
}

impl QuoteRequest {
    pub fn submit(configuration: RingConfiguration, customer_details: CustomerDetails) -> Self {
        Self {
            id: QuoteRequestId::generate(),
            status: QuoteRequestStatus::Submitted,
            estimated_response: QUOTE_RESPONSE_SLA.to_string(),
            configuration,
            customer_details,
            created_at: Utc::now(),
        }
    }
}
