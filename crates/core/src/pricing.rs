use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::metal::Metal;
use crate::domain::setting::Setting;
use crate::domain::stone::Stone;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub stone: Decimal,
    pub setting: Decimal,
    pub metal_adjustment: Decimal,
}

/// Echo of the resolved records behind a quote, for display by callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceDetails {
    pub stone: Stone,
    pub setting: Setting,
    pub metal: Metal,
    pub carat: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub total: Decimal,
    pub breakdown: PriceBreakdown,
    pub details: PriceDetails,
}

/// Price of the size entry matching `carat` exactly.
pub fn stone_price_for_carat(stone: &Stone, carat: Decimal) -> Result<Decimal, DomainError> {
    stone
        .size_for_carat(carat)
        .map(|size| size.price)
        .ok_or(DomainError::InvalidCarat { stone_id: stone.id.0.clone(), carat })
}

/// Deterministic price for a (stone, carat, setting, metal) combination.
///
/// The metal adjustment scales the combined stone + setting price by
/// `multiplier - 1`, so a 1.0 multiplier contributes nothing. Adjustment and
/// total are each rounded to 2 decimal places.
pub fn price_ring(
    stone: &Stone,
    carat: Decimal,
    setting: &Setting,
    metal: &Metal,
) -> Result<PriceQuote, DomainError> {
    let stone_price = stone_price_for_carat(stone, carat)?;
    let setting_price = setting.base_price;

    let metal_adjustment =
        ((stone_price + setting_price) * (metal.multiplier - Decimal::ONE)).round_dp(2);
    let total = (stone_price + setting_price + metal_adjustment).round_dp(2);

    Ok(PriceQuote {
        total,
        breakdown: PriceBreakdown {
            stone: stone_price,
            setting: setting_price,
            metal_adjustment,
        },
        details: PriceDetails {
            stone: stone.clone(),
            setting: setting.clone(),
            metal: metal.clone(),
            carat,
        },
    })
}
