use std::time::Instant;

use crate::commands::CommandResult;
use ringforge_core::config::{AppConfig, LoadOptions};
use ringforge_core::pricing;
use ringforge_core::{MetalId, SettingId, StoneId};
use ringforge_db::repositories::{CatalogRepository, SqlCatalogRepository};
use ringforge_db::{connect_with_settings, migrations, CatalogSeedDataset, DbPool};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, config)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Pass,
                elapsed_ms,
                message: "configuration loaded and validated".to_string(),
            });
            config
        }
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            checks.push(skipped("db_connectivity"));
            checks.push(skipped("migration_visibility"));
            checks.push(skipped("seed_catalog"));
            checks.push(skipped("pricing_spot_check"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.push(skipped("migration_visibility"));
            checks.push(skipped("seed_catalog"));
            checks.push(skipped("pricing_spot_check"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let db_started = Instant::now();
    let db_result = runtime.block_on(async {
        connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
    });

    let pool = match db_result {
        Ok(pool) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Pass,
                elapsed_ms: db_started.elapsed().as_millis() as u64,
                message: format!("connected using `{}`", config.database.url),
            });
            pool
        }
        Err(error) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Fail,
                elapsed_ms: db_started.elapsed().as_millis() as u64,
                message: format!("failed to connect: {error}"),
            });
            checks.push(skipped("migration_visibility"));
            checks.push(skipped("seed_catalog"));
            checks.push(skipped("pricing_spot_check"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let migration_started = Instant::now();
    let migration_result = runtime.block_on(async { migrations::run_pending(&pool).await });
    if let Err(error) = migration_result {
        checks.push(SmokeCheck {
            name: "migration_visibility",
            status: SmokeStatus::Fail,
            elapsed_ms: migration_started.elapsed().as_millis() as u64,
            message: format!("migration execution failed: {error}"),
        });
        checks.push(skipped("seed_catalog"));
        checks.push(skipped("pricing_spot_check"));
        runtime.block_on(async { pool.close().await });
        return finalize_report(checks, started.elapsed().as_millis() as u64);
    }
    checks.push(SmokeCheck {
        name: "migration_visibility",
        status: SmokeStatus::Pass,
        elapsed_ms: migration_started.elapsed().as_millis() as u64,
        message: "migrations are visible and executable".to_string(),
    });

    let seed_started = Instant::now();
    let seed_result = runtime.block_on(async {
        CatalogSeedDataset::load(&pool).await?;
        CatalogSeedDataset::verify(&pool).await
    });
    let seed_elapsed = seed_started.elapsed().as_millis() as u64;
    match seed_result {
        Ok(verification) if verification.all_present => {
            checks.push(SmokeCheck {
                name: "seed_catalog",
                status: SmokeStatus::Pass,
                elapsed_ms: seed_elapsed,
                message: "catalog fixture loaded and verified".to_string(),
            });
        }
        Ok(_) => {
            checks.push(SmokeCheck {
                name: "seed_catalog",
                status: SmokeStatus::Fail,
                elapsed_ms: seed_elapsed,
                message: "seed rows were missing after load".to_string(),
            });
            checks.push(skipped("pricing_spot_check"));
            runtime.block_on(async { pool.close().await });
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
        Err(error) => {
            checks.push(SmokeCheck {
                name: "seed_catalog",
                status: SmokeStatus::Fail,
                elapsed_ms: seed_elapsed,
                message: format!("seed load failed: {error}"),
            });
            checks.push(skipped("pricing_spot_check"));
            runtime.block_on(async { pool.close().await });
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    }

    let pricing_started = Instant::now();
    let pricing_result = runtime.block_on(pricing_spot_check(&pool));
    runtime.block_on(async { pool.close().await });
    match pricing_result {
        Ok(total) => checks.push(SmokeCheck {
            name: "pricing_spot_check",
            status: SmokeStatus::Pass,
            elapsed_ms: pricing_started.elapsed().as_millis() as u64,
            message: format!("1.0 carat round solitaire in white gold prices at {total}"),
        }),
        Err(message) => checks.push(SmokeCheck {
            name: "pricing_spot_check",
            status: SmokeStatus::Fail,
            elapsed_ms: pricing_started.elapsed().as_millis() as u64,
            message,
        }),
    }

    finalize_report(checks, started.elapsed().as_millis() as u64)
}

/// Price the canonical 930.00 combination against the seeded catalog.
async fn pricing_spot_check(pool: &DbPool) -> Result<Decimal, String> {
    let catalog = SqlCatalogRepository::new(pool.clone());

    let stone = catalog
        .stone_by_id(&StoneId("stone-round".to_string()))
        .await
        .map_err(|error| format!("stone lookup failed: {error}"))?
        .ok_or_else(|| "seed stone `stone-round` is missing".to_string())?;
    let setting = catalog
        .setting_by_id(&SettingId("setting-solitaire".to_string()))
        .await
        .map_err(|error| format!("setting lookup failed: {error}"))?
        .ok_or_else(|| "seed setting `setting-solitaire` is missing".to_string())?;
    let metal = catalog
        .metal_by_id(&MetalId("metal-white-gold".to_string()))
        .await
        .map_err(|error| format!("metal lookup failed: {error}"))?
        .ok_or_else(|| "seed metal `metal-white-gold` is missing".to_string())?;

    let quote = pricing::price_ring(&stone, Decimal::from(1), &setting, &metal)
        .map_err(|error| format!("pricing failed: {error}"))?;

    let expected = Decimal::new(93000, 2);
    if quote.total != expected {
        return Err(format!(
            "expected a {expected} total for the spot check, got {}",
            quote.total
        ));
    }

    Ok(quote.total)
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped due to a previous failure".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
