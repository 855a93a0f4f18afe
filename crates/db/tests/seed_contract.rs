use serde_json::Value;

type SeedContractTestResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
    ($left:expr, $right:expr, $($arg:tt)*) => {
        if $left != $right {
            return Err(format!($($arg)*));
        }
    };
}

const FIXTURE_SQL: &str = include_str!("../../../config/fixtures/catalog_seed_data.sql");

const EXPECTED_CARATS: [&str; 6] = ["0.5", "0.75", "1.0", "1.25", "1.5", "2.0"];

/// Stone ids paired with their full price ladder, in fixture order.
const EXPECTED_STONE_PRICES: [(&str, [i64; 6]); 6] = [
    ("stone-round", [450, 580, 750, 920, 1100, 1480]),
    ("stone-oval", [460, 590, 770, 940, 1120, 1500]),
    ("stone-princess", [440, 570, 740, 910, 1090, 1460]),
    ("stone-cushion", [470, 600, 780, 950, 1130, 1510]),
    ("stone-emerald", [480, 610, 790, 960, 1140, 1520]),
    ("stone-pear", [465, 595, 775, 945, 1125, 1505]),
];

const EXPECTED_SETTING_IDS: [&str; 6] = [
    "setting-solitaire",
    "setting-halo",
    "setting-vintage",
    "setting-three-stone",
    "setting-pave",
    "setting-tension",
];

const EXPECTED_METAL_MULTIPLIERS: [(&str, &str); 4] = [
    ("metal-white-gold", "1.0"),
    ("metal-yellow-gold", "1.05"),
    ("metal-rose-gold", "1.08"),
    ("metal-platinum", "1.35"),
];

/// SQL string literals in the fixture, in order of appearance.
///
/// The fixture deliberately avoids embedded apostrophes, so splitting on
/// single quotes yields literals at the odd positions.
fn fixture_string_literals() -> Vec<&'static str> {
    FIXTURE_SQL.split('\'').skip(1).step_by(2).collect()
}

fn sizes_blobs() -> Vec<&'static str> {
    fixture_string_literals()
        .into_iter()
        .filter(|literal| literal.starts_with("[{\"carat\""))
        .collect()
}

#[test]
fn fixture_covers_the_full_catalog() -> SeedContractTestResult {
    for (stone_id, _) in EXPECTED_STONE_PRICES {
        require!(
            FIXTURE_SQL.contains(&format!("'{stone_id}'")),
            "seed fixture should insert {stone_id}"
        );
    }
    for setting_id in EXPECTED_SETTING_IDS {
        require!(
            FIXTURE_SQL.contains(&format!("'{setting_id}'")),
            "seed fixture should insert {setting_id}"
        );
    }
    for (metal_id, multiplier) in EXPECTED_METAL_MULTIPLIERS {
        require!(
            FIXTURE_SQL.contains(&format!("'{metal_id}'")),
            "seed fixture should insert {metal_id}"
        );
        require!(
            FIXTURE_SQL.contains(&format!("'{multiplier}'")),
            "seed fixture should carry multiplier {multiplier} for {metal_id}"
        );
    }

    // Idempotency is load-bearing: the fixture runs on every boot.
    require!(
        !FIXTURE_SQL.contains("INSERT INTO"),
        "every fixture statement must be INSERT OR IGNORE"
    );
    Ok(())
}

#[test]
fn stone_size_ladders_match_the_published_price_grid() -> SeedContractTestResult {
    let blobs = sizes_blobs();
    require_eq!(blobs.len(), EXPECTED_STONE_PRICES.len());

    for ((stone_id, expected_prices), blob) in EXPECTED_STONE_PRICES.iter().zip(blobs) {
        let sizes: Value = serde_json::from_str(blob)
            .map_err(|error| format!("sizes_json for {stone_id} should parse: {error}"))?;
        let sizes = sizes
            .as_array()
            .ok_or_else(|| format!("sizes_json for {stone_id} should be an array"))?;
        require_eq!(sizes.len(), 6, "{stone_id} should list six sizes");

        for (index, size) in sizes.iter().enumerate() {
            let carat = size["carat"].as_str().unwrap_or_default();
            let price = size["price"].as_str().unwrap_or_default();
            let availability = size["availability"].as_str().unwrap_or_default();

            require_eq!(
                carat,
                EXPECTED_CARATS[index],
                "{stone_id} size {index} should be {} carat, got {carat}",
                EXPECTED_CARATS[index]
            );
            require_eq!(
                price,
                expected_prices[index].to_string(),
                "{stone_id} at {carat} carat should cost {}, got {price}",
                expected_prices[index]
            );
            require_eq!(availability, "in_stock");
        }

        // Larger stones always cost more within a cut.
        for pair in expected_prices.windows(2) {
            require!(
                pair[0] < pair[1],
                "{stone_id} prices should rise with carat ({} then {})",
                pair[0],
                pair[1]
            );
        }
    }
    Ok(())
}

#[test]
fn quiz_recommendations_are_fulfillable_from_the_seed() -> SeedContractTestResult {
    let answers = ["classic", "glamorous", "romantic", "modern", "artistic"];

    for personality in answers {
        let analysis = ringforge_core::quiz::analyze(&[personality.to_string()])
            .map_err(|error| format!("analysis for {personality} should succeed: {error:?}"))?;
        let recommendation = analysis.recommendation;

        require!(
            FIXTURE_SQL.contains(&format!("'setting-{}'", recommendation.setting)),
            "recommended setting `{}` for {personality} should be seeded",
            recommendation.setting
        );
        require!(
            FIXTURE_SQL.contains(&format!("'metal-{}'", recommendation.metal)),
            "recommended metal `{}` for {personality} should be seeded",
            recommendation.metal
        );
        require!(
            FIXTURE_SQL.contains(&format!("'{}'", recommendation.stone.as_str())),
            "a stone with the recommended `{}` cut should be seeded for {personality}",
            recommendation.stone.as_str()
        );
    }
    Ok(())
}

#[test]
fn personality_tags_in_fixture_cover_every_quiz_option() -> SeedContractTestResult {
    let tag_literals: Vec<&str> = fixture_string_literals()
        .into_iter()
        .filter(|literal| literal.starts_with("[\""))
        .collect();
    require_eq!(tag_literals.len(), EXPECTED_SETTING_IDS.len());

    let mut seeded_tags: Vec<String> = Vec::new();
    for literal in tag_literals {
        let tags: Vec<String> = serde_json::from_str(literal)
            .map_err(|error| format!("personality tags should parse: {error}"))?;
        require!(!tags.is_empty(), "every setting should carry at least one tag");
        seeded_tags.extend(tags);
    }

    // Every personality the quiz can produce appears on some setting, so the
    // analyzer's pick always has at least one matching setting family.
    for question in ringforge_core::quiz::quiz_questions() {
        require_eq!(question.options.len(), 5);
    }
    for personality in ["classic", "glamorous", "romantic", "modern", "artistic"] {
        require!(
            seeded_tags.iter().any(|tag| tag == personality),
            "personality `{personality}` should appear in seeded setting tags"
        );
    }
    Ok(())
}
