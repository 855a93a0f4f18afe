use sqlx::Row;

use ringforge_core::domain::configuration::{
    ConfigurationId, CustomerInfo, RingConfiguration,
};
use ringforge_core::domain::metal::MetalId;
use ringforge_core::domain::setting::SettingId;
use ringforge_core::domain::stone::StoneId;

use super::{corrupt_record, parse_stored_decimal, parse_timestamp, ConfigurationRepository, RepositoryError};
use crate::DbPool;

pub struct SqlConfigurationRepository {
    pool: DbPool,
}

impl SqlConfigurationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_configuration(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<RingConfiguration, RepositoryError> {
    let id: String =
        row.try_get("id").map_err(|e| corrupt_record("configuration", "?", e.to_string()))?;
    let stone_id: String =
        row.try_get("stone_id").map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;
    let setting_id: String = row
        .try_get("setting_id")
        .map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;
    let metal_id: String =
        row.try_get("metal_id").map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;
    let carat_str: String =
        row.try_get("carat").map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;
    let personality_type: Option<String> = row
        .try_get("personality_type")
        .map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;
    let total_price_str: String = row
        .try_get("total_price")
        .map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;
    let customer_info_json: Option<String> = row
        .try_get("customer_info_json")
        .map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;
    let created_at_str: String = row
        .try_get("created_at")
        .map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;
    let updated_at_str: String = row
        .try_get("updated_at")
        .map_err(|e| corrupt_record("configuration", &id, e.to_string()))?;

    let carat = parse_stored_decimal("configuration", &id, "carat", &carat_str)?;
    let total_price = parse_stored_decimal("configuration", &id, "total_price", &total_price_str)?;
    let customer_info: Option<CustomerInfo> = customer_info_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| corrupt_record("configuration", &id, format!("customer_info_json: {e}")))?;
    let created_at = parse_timestamp("configuration", &id, "created_at", &created_at_str)?;
    let updated_at = parse_timestamp("configuration", &id, "updated_at", &updated_at_str)?;

    Ok(RingConfiguration {
        id: ConfigurationId(id),
        stone_id: StoneId(stone_id),
        setting_id: SettingId(setting_id),
        metal_id: MetalId(metal_id),
        carat,
        personality_type,
        total_price,
        customer_info,
        created_at,
        updated_at,
    })
}

#[async_trait::async_trait]
impl ConfigurationRepository for SqlConfigurationRepository {
    async fn save(&self, configuration: RingConfiguration) -> Result<(), RepositoryError> {
        let customer_info_json = configuration
            .customer_info
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| {
                corrupt_record(
                    "configuration",
                    &configuration.id.0,
                    format!("customer_info_json encode: {e}"),
                )
            })?;

        sqlx::query(
            "INSERT INTO ring_configuration
                (id, stone_id, setting_id, metal_id, carat, personality_type,
                 total_price, customer_info_json, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 stone_id = excluded.stone_id,
                 setting_id = excluded.setting_id,
                 metal_id = excluded.metal_id,
                 carat = excluded.carat,
                 personality_type = excluded.personality_type,
                 total_price = excluded.total_price,
                 customer_info_json = excluded.customer_info_json,
                 updated_at = excluded.updated_at",
        )
        .bind(&configuration.id.0)
        .bind(&configuration.stone_id.0)
        .bind(&configuration.setting_id.0)
        .bind(&configuration.metal_id.0)
        .bind(configuration.carat.to_string())
        .bind(&configuration.personality_type)
        .bind(configuration.total_price.to_string())
        .bind(&customer_info_json)
        .bind(configuration.created_at.to_rfc3339())
        .bind(configuration.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ConfigurationId,
    ) -> Result<Option<RingConfiguration>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, stone_id, setting_id, metal_id, carat, personality_type,
                    total_price, customer_info_json, created_at, updated_at
             FROM ring_configuration WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_configuration(r)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use ringforge_core::domain::configuration::{
        ConfigurationId, CustomerInfo, RingConfiguration,
    };
    use ringforge_core::domain::metal::MetalId;
    use ringforge_core::domain::setting::SettingId;
    use ringforge_core::domain::stone::StoneId;

    use super::SqlConfigurationRepository;
    use crate::fixtures::CatalogSeedDataset;
    use crate::repositories::{ConfigurationRepository, RepositoryError};
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        CatalogSeedDataset::load(&pool).await.expect("seed catalog");
        pool
    }

    fn sample_configuration(id: &str) -> RingConfiguration {
        let now = Utc::now();
        RingConfiguration {
            id: ConfigurationId(id.to_string()),
            stone_id: StoneId("stone-round".to_string()),
            setting_id: SettingId("setting-solitaire".to_string()),
            metal_id: MetalId("metal-white-gold".to_string()),
            carat: Decimal::from(1),
            personality_type: Some("classic".to_string()),
            total_price: Decimal::new(93000, 2),
            customer_info: Some(CustomerInfo {
                name: "Avery Quinn".to_string(),
                email: "avery@example.com".to_string(),
                phone: None,
                notes: Some("Surprise proposal in June".to_string()),
            }),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn save_and_find_round_trips_decimals_and_customer_info() {
        let pool = setup().await;
        let repo = SqlConfigurationRepository::new(pool);

        let configuration = sample_configuration("RCFG-test-0001");
        repo.save(configuration.clone()).await.expect("save");

        let found = repo
            .find_by_id(&ConfigurationId("RCFG-test-0001".to_string()))
            .await
            .expect("find")
            .expect("should exist");

        assert_eq!(found.stone_id, configuration.stone_id);
        assert_eq!(found.carat, Decimal::from(1));
        assert_eq!(found.total_price, Decimal::new(93000, 2));
        assert_eq!(found.personality_type.as_deref(), Some("classic"));
        let info = found.customer_info.expect("customer info survives");
        assert_eq!(info.name, "Avery Quinn");
        assert_eq!(info.phone, None);
    }

    #[tokio::test]
    async fn find_unknown_returns_none() {
        let pool = setup().await;
        let repo = SqlConfigurationRepository::new(pool);

        let found = repo
            .find_by_id(&ConfigurationId("RCFG-missing".to_string()))
            .await
            .expect("find");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn save_upserts_on_conflict() {
        let pool = setup().await;
        let repo = SqlConfigurationRepository::new(pool);

        let configuration = sample_configuration("RCFG-test-0002");
        repo.save(configuration.clone()).await.expect("save");

        let mut updated = configuration;
        updated.metal_id = MetalId("metal-platinum".to_string());
        updated.total_price = Decimal::new(125550, 2);
        updated.updated_at = Utc::now();
        repo.save(updated).await.expect("upsert");

        let found = repo
            .find_by_id(&ConfigurationId("RCFG-test-0002".to_string()))
            .await
            .expect("find")
            .expect("should exist");
        assert_eq!(found.metal_id.0, "metal-platinum");
        assert_eq!(found.total_price, Decimal::new(125550, 2));
    }

    #[tokio::test]
    async fn foreign_keys_reject_unknown_components() {
        let pool = setup().await;
        let repo = SqlConfigurationRepository::new(pool);

        let mut configuration = sample_configuration("RCFG-test-0003");
        configuration.stone_id = StoneId("stone-missing".to_string());

        let error = repo.save(configuration).await.expect_err("FK must reject");
        assert!(matches!(error, RepositoryError::Database(_)));
    }

    #[tokio::test]
    async fn corrupt_customer_info_surfaces_entity_and_id() {
        let pool = setup().await;
        let repo = SqlConfigurationRepository::new(pool.clone());

        repo.save(sample_configuration("RCFG-test-0004")).await.expect("save");

        sqlx::query(
            "UPDATE ring_configuration SET customer_info_json = '{' WHERE id = 'RCFG-test-0004'",
        )
        .execute(&pool)
        .await
        .expect("corrupt row");

        let error = repo
            .find_by_id(&ConfigurationId("RCFG-test-0004".to_string()))
            .await
            .expect_err("corrupt row must not decode");

        match error {
            RepositoryError::CorruptRecord { entity, id, .. } => {
                assert_eq!(entity, "configuration");
                assert_eq!(id, "RCFG-test-0004");
            }
            other => panic!("expected CorruptRecord, got {other:?}"),
        }
    }
}
