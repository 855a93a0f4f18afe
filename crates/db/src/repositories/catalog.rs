use sqlx::Row;

use ringforge_core::domain::metal::{Metal, MetalId, MetalType};
use ringforge_core::domain::setting::{Setting, SettingId};
use ringforge_core::domain::stone::{GemType, Stone, StoneCut, StoneId, StoneSize};

use super::{corrupt_record, parse_stored_decimal, parse_timestamp, CatalogRepository, RepositoryError};
use crate::DbPool;

/// Read-side access to the component catalog.
///
/// Writes happen only through migrations and the seed fixture; the builder
/// itself never mutates stones, settings, or metals.
pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_stone(row: &sqlx::sqlite::SqliteRow) -> Result<Stone, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| corrupt_record("stone", "?", e.to_string()))?;
    let name: String =
        row.try_get("name").map_err(|e| corrupt_record("stone", &id, e.to_string()))?;
    let gem_type_str: String =
        row.try_get("gem_type").map_err(|e| corrupt_record("stone", &id, e.to_string()))?;
    let cut_str: String =
        row.try_get("cut").map_err(|e| corrupt_record("stone", &id, e.to_string()))?;
    let sizes_json: String =
        row.try_get("sizes_json").map_err(|e| corrupt_record("stone", &id, e.to_string()))?;
    let images_json: String =
        row.try_get("images_json").map_err(|e| corrupt_record("stone", &id, e.to_string()))?;
    let description: String =
        row.try_get("description").map_err(|e| corrupt_record("stone", &id, e.to_string()))?;
    let active: i64 =
        row.try_get("active").map_err(|e| corrupt_record("stone", &id, e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| corrupt_record("stone", &id, e.to_string()))?;

    let gem_type = gem_type_str.parse::<GemType>().map_err(|e| corrupt_record("stone", &id, e))?;
    let cut = cut_str.parse::<StoneCut>().map_err(|e| corrupt_record("stone", &id, e))?;
    let sizes: Vec<StoneSize> = serde_json::from_str(&sizes_json)
        .map_err(|e| corrupt_record("stone", &id, format!("sizes_json: {e}")))?;
    let images: Vec<String> = serde_json::from_str(&images_json)
        .map_err(|e| corrupt_record("stone", &id, format!("images_json: {e}")))?;
    let created_at = parse_timestamp("stone", &id, "created_at", &created_at_str)?;

    Ok(Stone {
        id: StoneId(id),
        name,
        gem_type,
        cut,
        sizes,
        images,
        description,
        active: active != 0,
        created_at,
    })
}

fn row_to_setting(row: &sqlx::sqlite::SqliteRow) -> Result<Setting, RepositoryError> {
    let id: String =
        row.try_get("id").map_err(|e| corrupt_record("setting", "?", e.to_string()))?;
    let name: String =
        row.try_get("name").map_err(|e| corrupt_record("setting", &id, e.to_string()))?;
    let base_price_str: String =
        row.try_get("base_price").map_err(|e| corrupt_record("setting", &id, e.to_string()))?;
    let images_json: String =
        row.try_get("images_json").map_err(|e| corrupt_record("setting", &id, e.to_string()))?;
    let description: String =
        row.try_get("description").map_err(|e| corrupt_record("setting", &id, e.to_string()))?;
    let tags_json: String = row
        .try_get("personality_tags_json")
        .map_err(|e| corrupt_record("setting", &id, e.to_string()))?;
    let active: i64 =
        row.try_get("active").map_err(|e| corrupt_record("setting", &id, e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| corrupt_record("setting", &id, e.to_string()))?;

    let base_price = parse_stored_decimal("setting", &id, "base_price", &base_price_str)?;
    let images: Vec<String> = serde_json::from_str(&images_json)
        .map_err(|e| corrupt_record("setting", &id, format!("images_json: {e}")))?;
    let personality_tags: Vec<String> = serde_json::from_str(&tags_json)
        .map_err(|e| corrupt_record("setting", &id, format!("personality_tags_json: {e}")))?;
    let created_at = parse_timestamp("setting", &id, "created_at", &created_at_str)?;

    Ok(Setting {
        id: SettingId(id),
        name,
        base_price,
        images,
        description,
        personality_tags,
        active: active != 0,
        created_at,
    })
}

fn row_to_metal(row: &sqlx::sqlite::SqliteRow) -> Result<Metal, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| corrupt_record("metal", "?", e.to_string()))?;
    let name: String =
        row.try_get("name").map_err(|e| corrupt_record("metal", &id, e.to_string()))?;
    let metal_type_str: String =
        row.try_get("metal_type").map_err(|e| corrupt_record("metal", &id, e.to_string()))?;
    let multiplier_str: String =
        row.try_get("multiplier").map_err(|e| corrupt_record("metal", &id, e.to_string()))?;
    let images_json: String =
        row.try_get("images_json").map_err(|e| corrupt_record("metal", &id, e.to_string()))?;
    let description: String =
        row.try_get("description").map_err(|e| corrupt_record("metal", &id, e.to_string()))?;
    let active: i64 =
        row.try_get("active").map_err(|e| corrupt_record("metal", &id, e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| corrupt_record("metal", &id, e.to_string()))?;

    let metal_type =
        metal_type_str.parse::<MetalType>().map_err(|e| corrupt_record("metal", &id, e))?;
    let multiplier = parse_stored_decimal("metal", &id, "multiplier", &multiplier_str)?;
    let images: Vec<String> = serde_json::from_str(&images_json)
        .map_err(|e| corrupt_record("metal", &id, format!("images_json: {e}")))?;
    let created_at = parse_timestamp("metal", &id, "created_at", &created_at_str)?;

    Ok(Metal {
        id: MetalId(id),
        name,
        metal_type,
        multiplier,
        images,
        description,
        active: active != 0,
        created_at,
    })
}

#[async_trait::async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn list_active_stones(&self) -> Result<Vec<Stone>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, gem_type, cut, sizes_json, images_json, description, active, created_at
             FROM stone WHERE active = 1 ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_stone).collect()
    }

    async fn list_active_settings(&self) -> Result<Vec<Setting>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, base_price, images_json, description, personality_tags_json, active, created_at
             FROM setting WHERE active = 1 ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_setting).collect()
    }

    async fn list_active_metals(&self) -> Result<Vec<Metal>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, metal_type, multiplier, images_json, description, active, created_at
             FROM metal WHERE active = 1 ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_metal).collect()
    }

    async fn stone_by_id(&self, id: &StoneId) -> Result<Option<Stone>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, gem_type, cut, sizes_json, images_json, description, active, created_at
             FROM stone WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_stone(r)?)),
            None => Ok(None),
        }
    }

    async fn setting_by_id(&self, id: &SettingId) -> Result<Option<Setting>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, base_price, images_json, description, personality_tags_json, active, created_at
             FROM setting WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_setting(r)?)),
            None => Ok(None),
        }
    }

    async fn metal_by_id(&self, id: &MetalId) -> Result<Option<Metal>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, metal_type, multiplier, images_json, description, active, created_at
             FROM metal WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_metal(r)?)),
            None => Ok(None),
        }
    }
}
