use ringforge_core::config::{AppConfig, LoadOptions};
use ringforge_db::{connect_with_settings, migrations, CatalogSeedDataset, DbPool};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });

            match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => checks.extend(runtime.block_on(database_checks(&config))),
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "database_connectivity",
                        status: CheckStatus::Fail,
                        details: format!("failed to initialize async runtime: {error}"),
                    });
                    checks.push(skipped(
                        "migration_freshness",
                        "skipped because the database was not reachable",
                    ));
                    checks.push(skipped(
                        "catalog_seed",
                        "skipped because the database was not reachable",
                    ));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped(
                "database_connectivity",
                "skipped because configuration did not load",
            ));
            checks.push(skipped(
                "migration_freshness",
                "skipped because configuration did not load",
            ));
            checks.push(skipped("catalog_seed", "skipped because configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

async fn database_checks(config: &AppConfig) -> Vec<DoctorCheck> {
    let mut checks = Vec::new();

    let pool = match connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    {
        Ok(pool) => {
            checks.push(DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Pass,
                details: format!("connected using `{}`", config.database.url),
            });
            pool
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to connect to database: {error}"),
            });
            checks.push(skipped(
                "migration_freshness",
                "skipped because the database was not reachable",
            ));
            checks.push(skipped("catalog_seed", "skipped because the database was not reachable"));
            return checks;
        }
    };

    checks.push(migration_freshness(&pool).await);
    checks.push(catalog_seed(&pool).await);
    pool.close().await;

    checks
}

async fn migration_freshness(pool: &DbPool) -> DoctorCheck {
    let known = migrations::known_count() as i64;

    match migrations::applied_count(pool).await {
        Ok(applied) if applied == known => DoctorCheck {
            name: "migration_freshness",
            status: CheckStatus::Pass,
            details: format!("{applied} of {known} migrations applied"),
        },
        Ok(applied) => DoctorCheck {
            name: "migration_freshness",
            status: CheckStatus::Fail,
            details: format!("{applied} of {known} migrations applied; run `ringforge migrate`"),
        },
        Err(error) => DoctorCheck {
            name: "migration_freshness",
            status: CheckStatus::Fail,
            details: format!("could not read the migration ledger: {error}"),
        },
    }
}

async fn catalog_seed(pool: &DbPool) -> DoctorCheck {
    match CatalogSeedDataset::verify(pool).await {
        Ok(verification) if verification.all_present => DoctorCheck {
            name: "catalog_seed",
            status: CheckStatus::Pass,
            details: format!("{} fixture checks passed", verification.checks.len()),
        },
        Ok(verification) => {
            let failed = verification.checks.iter().filter(|check| !check.1).count();
            DoctorCheck {
                name: "catalog_seed",
                status: CheckStatus::Fail,
                details: format!("{failed} fixture checks failed; run `ringforge seed`"),
            }
        }
        Err(error) => DoctorCheck {
            name: "catalog_seed",
            status: CheckStatus::Fail,
            details: format!("could not verify the seed catalog: {error}"),
        },
    }
}

fn skipped(name: &'static str, details: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: details.to_string() }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
