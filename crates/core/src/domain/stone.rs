use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoneId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GemType {
    Moissanite,
    Diamond,
    LabDiamond,
}

impl GemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moissanite => "moissanite",
            Self::Diamond => "diamond",
            Self::LabDiamond => "lab_diamond",
        }
    }
}

impl std::str::FromStr for GemType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "moissanite" => Ok(Self::Moissanite),
            "diamond" => Ok(Self::Diamond),
            "lab_diamond" => Ok(Self::LabDiamond),
            other => Err(format!("unknown gem type `{other}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoneCut {
    Round,
    Oval,
    Princess,
    Cushion,
    Emerald,
    Pear,
}

impl StoneCut {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Oval => "oval",
            Self::Princess => "princess",
            Self::Cushion => "cushion",
            Self::Emerald => "emerald",
            Self::Pear => "pear",
        }
    }
}

impl std::str::FromStr for StoneCut {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "round" => Ok(Self::Round),
            "oval" => Ok(Self::Oval),
            "princess" => Ok(Self::Princess),
            "cushion" => Ok(Self::Cushion),
            "emerald" => Ok(Self::Emerald),
            "pear" => Ok(Self::Pear),
            other => Err(format!("unknown stone cut `{other}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    InStock,
    OutOfStock,
}

/// One priced size variant of a stone. Carat values are unique within a stone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoneSize {
    pub carat: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub availability: Availability,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stone {
    pub id: StoneId,
    pub name: String,
    pub gem_type: GemType,
    pub cut: StoneCut,
    pub sizes: Vec<StoneSize>,
    pub images: Vec<String>,
    pub description: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Stone {
    /// Size entry whose carat equals the request exactly. Never nearest-match.
    pub fn size_for_carat(&self, carat: Decimal) -> Option<&StoneSize> {
        self.sizes.iter().find(|size| size.carat == carat)
    }
}
