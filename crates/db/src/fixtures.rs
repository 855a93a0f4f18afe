use serde_json::Value;
use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Canonical seed catalog and verification contract for the ring builder.
///
/// Ids, cuts, and spot prices here must stay in sync with
/// `config/fixtures/catalog_seed_data.sql`.
const SEED_STONES: &[SeedStoneContract] = &[
    SeedStoneContract {
        id: "stone-round",
        name: "Round Brilliant Moissanite",
        cut: "round",
        one_carat_price: "750",
    },
    SeedStoneContract {
        id: "stone-oval",
        name: "Oval Moissanite",
        cut: "oval",
        one_carat_price: "770",
    },
    SeedStoneContract {
        id: "stone-princess",
        name: "Princess Cut Moissanite",
        cut: "princess",
        one_carat_price: "740",
    },
    SeedStoneContract {
        id: "stone-cushion",
        name: "Cushion Cut Moissanite",
        cut: "cushion",
        one_carat_price: "780",
    },
    SeedStoneContract {
        id: "stone-emerald",
        name: "Emerald Cut Moissanite",
        cut: "emerald",
        one_carat_price: "790",
    },
    SeedStoneContract {
        id: "stone-pear",
        name: "Pear Shaped Moissanite",
        cut: "pear",
        one_carat_price: "775",
    },
];

const SEED_SETTINGS: &[SeedSettingContract] = &[
    SeedSettingContract { id: "setting-solitaire", base_price: "180", lead_tag: "classic" },
    SeedSettingContract { id: "setting-halo", base_price: "280", lead_tag: "glamorous" },
    SeedSettingContract { id: "setting-vintage", base_price: "320", lead_tag: "romantic" },
    SeedSettingContract { id: "setting-three-stone", base_price: "380", lead_tag: "sentimental" },
    SeedSettingContract { id: "setting-pave", base_price: "250", lead_tag: "modern" },
    SeedSettingContract { id: "setting-tension", base_price: "420", lead_tag: "modern" },
];

const SEED_METALS: &[SeedMetalContract] = &[
    SeedMetalContract { id: "metal-white-gold", metal_type: "gold", multiplier: "1.0" },
    SeedMetalContract { id: "metal-yellow-gold", metal_type: "gold", multiplier: "1.05" },
    SeedMetalContract { id: "metal-rose-gold", metal_type: "gold", multiplier: "1.08" },
    SeedMetalContract { id: "metal-platinum", metal_type: "platinum", multiplier: "1.35" },
];

const SIZES_PER_STONE: usize = 6;

/// Fixed catalog dataset the builder sells from.
///
/// Loaded once at process bootstrap (server startup and the CLI `seed`
/// command). Every statement in the fixture is keyed on a fixed id, so
/// reloading is a no-op rather than a duplicate.
pub struct CatalogSeedDataset;

impl CatalogSeedDataset {
    /// SQL fixture content for the seed catalog.
    pub const SQL: &str = include_str!("../../../config/fixtures/catalog_seed_data.sql");

    /// Load the seed catalog into the database.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            stones: SEED_STONES.len(),
            settings: SEED_SETTINGS.len(),
            metals: SEED_METALS.len(),
        })
    }

    /// Verify that seeded rows exist and match the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for stone in SEED_STONES {
            let exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM stone WHERE id = ?1 AND name = ?2 AND cut = ?3 AND active = 1)",
            )
            .bind(stone.id)
            .bind(stone.name)
            .bind(stone.cut)
            .fetch_one(pool)
            .await?;
            checks.push((stone.id, exists == 1));

            checks.push((stone.sizes_label(), Self::verify_stone_sizes(pool, stone).await?));
        }

        for setting in SEED_SETTINGS {
            let exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM setting
                  WHERE id = ?1 AND base_price = ?2 AND active = 1
                    AND json_extract(personality_tags_json, '$[0]') = ?3)",
            )
            .bind(setting.id)
            .bind(setting.base_price)
            .bind(setting.lead_tag)
            .fetch_one(pool)
            .await?;
            checks.push((setting.id, exists == 1));
        }

        for metal in SEED_METALS {
            let exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM metal
                  WHERE id = ?1 AND metal_type = ?2 AND multiplier = ?3 AND active = 1)",
            )
            .bind(metal.id)
            .bind(metal.metal_type)
            .bind(metal.multiplier)
            .fetch_one(pool)
            .await?;
            checks.push((metal.id, exists == 1));
        }

        let all_present = checks.iter().all(|(_, exists)| *exists);
        Ok(VerificationResult { all_present, checks })
    }

    async fn verify_stone_sizes(
        pool: &DbPool,
        stone: &SeedStoneContract,
    ) -> Result<bool, RepositoryError> {
        let sizes_json: Option<String> =
            sqlx::query_scalar("SELECT sizes_json FROM stone WHERE id = ?1")
                .bind(stone.id)
                .fetch_optional(pool)
                .await?;
        let Some(sizes_json) = sizes_json else {
            return Ok(false);
        };

        let sizes: Value =
            serde_json::from_str(&sizes_json).map_err(|error| RepositoryError::CorruptRecord {
                entity: "stone",
                id: stone.id.to_string(),
                reason: format!("sizes_json: {error}"),
            })?;
        let Some(sizes) = sizes.as_array() else {
            return Ok(false);
        };
        if sizes.len() != SIZES_PER_STONE {
            return Ok(false);
        }

        // Spot-check the 1.0 carat tier against the contract price.
        Ok(sizes.iter().any(|size| {
            size.get("carat").and_then(Value::as_str) == Some("1.0")
                && size.get("price").and_then(Value::as_str) == Some(stone.one_carat_price)
        }))
    }

    /// Remove seeded rows (and anything built on them) from a test database.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        let quoted_stones = sql_array_from_ids(&seed_stone_ids());
        let quoted_settings = sql_array_from_ids(&seed_setting_ids());
        let quoted_metals = sql_array_from_ids(&seed_metal_ids());

        sqlx::query(&format!(
            "DELETE FROM quote_request WHERE configuration_id IN
                (SELECT id FROM ring_configuration WHERE stone_id IN {quoted_stones})"
        ))
        .execute(&mut *tx)
        .await?;
        sqlx::query(&format!(
            "DELETE FROM ring_configuration WHERE stone_id IN {quoted_stones}"
        ))
        .execute(&mut *tx)
        .await?;
        sqlx::query(&format!("DELETE FROM metal WHERE id IN {quoted_metals}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM setting WHERE id IN {quoted_settings}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM stone WHERE id IN {quoted_stones}"))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedStoneContract {
    id: &'static str,
    name: &'static str,
    cut: &'static str,
    one_carat_price: &'static str,
}

impl SeedStoneContract {
    fn sizes_label(&self) -> &'static str {
        match self.id {
            "stone-round" => "stone-round-sizes",
            "stone-oval" => "stone-oval-sizes",
            "stone-princess" => "stone-princess-sizes",
            "stone-cushion" => "stone-cushion-sizes",
            "stone-emerald" => "stone-emerald-sizes",
            _ => "stone-pear-sizes",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedSettingContract {
    id: &'static str,
    base_price: &'static str,
    lead_tag: &'static str,
}

#[derive(Debug, Clone, Copy)]
struct SeedMetalContract {
    id: &'static str,
    metal_type: &'static str,
    multiplier: &'static str,
}

fn seed_stone_ids() -> Vec<&'static str> {
    SEED_STONES.iter().map(|stone| stone.id).collect()
}

fn seed_setting_ids() -> Vec<&'static str> {
    SEED_SETTINGS.iter().map(|setting| setting.id).collect()
}

fn seed_metal_ids() -> Vec<&'static str> {
    SEED_METALS.iter().map(|metal| metal.id).collect()
}

fn sql_array_from_ids(ids: &[&str]) -> String {
    let quoted = ids.iter().map(|id| format!("'{}'", id)).collect::<Vec<_>>().join(",");
    format!("({quoted})")
}

#[derive(Debug)]
pub struct SeedResult {
    pub stones: usize,
    pub settings: usize,
    pub metals: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
