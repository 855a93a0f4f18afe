use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::metal::MetalId;
use crate::domain::setting::SettingId;
use crate::domain::stone::StoneId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigurationId(pub String);

impl ConfigurationId {
    pub fn generate() -> Self {
        Self(format!("RCFG-{}", &Uuid::new_v4().simple().to_string()[..12]))
    }
}

/// Optional contact block a shopper can stash on a configuration before
/// requesting a quote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A finalized ring choice: the three catalog references, the chosen carat,
/// and the price computed at save time. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfiguration {
    pub id: ConfigurationId,
    pub stone_id: StoneId,
    pub setting_id: SettingId,
    pub metal_id: MetalId,
    pub carat: Decimal,
    pub personality_type: Option<String>,
    pub total_price: Decimal,
    pub customer_info: Option<CustomerInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
