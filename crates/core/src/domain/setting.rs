use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettingId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub id: SettingId,
    pub name: String,
    pub base_price: Decimal,
    pub images: Vec<String>,
    pub description: String,
    /// Free-form labels consumed by the quiz recommendation mapping; not
    /// cross-validated against it.
    pub personality_tags: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
