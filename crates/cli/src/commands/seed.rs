use crate::commands::CommandResult;
use ringforge_core::config::{AppConfig, LoadOptions};
use ringforge_db::{connect_with_settings, migrations, CatalogSeedDataset};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 3u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 4u8))?;

        let loaded = CatalogSeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_load", error.to_string(), 5u8))?;

        let verification = CatalogSeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 5u8))?;

        let run_result = if verification.all_present {
            Ok(loaded)
        } else {
            Err(("seed_verification", verification_failure_message(&verification.checks), 5u8))
        };

        pool.close().await;
        run_result
    });

    match result {
        Ok(loaded) => CommandResult::success(
            "seed",
            format!(
                "catalog fixture loaded and verified: {} stones, {} settings, {} metals",
                loaded.stones, loaded.settings, loaded.metals
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn verification_failure_message(checks: &[(&'static str, bool)]) -> String {
    let failed = checks
        .iter()
        .filter_map(|(check, passed)| (!passed).then_some(*check))
        .collect::<Vec<_>>();

    if failed.is_empty() {
        "some seed rows failed to load".to_string()
    } else {
        format!("seed verification failed for checks: {}", failed.join(", "))
    }
}
