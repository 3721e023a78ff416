//! Sequential pipeline orchestration: load → enrich → score → store.

use dialoguer::Input;
use rent_scout_models::{AnalyzerConfig, ScoreWeights};

/// Runs one full scoring pass and prints the top-ranked neighborhoods.
///
/// # Errors
///
/// Returns an error if a source file is missing or the store fails; API
/// enrichment failures degrade to fallback constants instead.
pub async fn run(config: &AnalyzerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let weights = prompt_weights()?;

    let mut records = rent_scout_dataset::load_merged(config)?;

    let enricher = rent_scout_enrich::from_config(config);
    let incomes = enricher.county_incomes().await;
    let populations = enricher.county_populations().await;
    rent_scout_enrich::apply_enrichment(&mut records, &incomes, &populations);

    let scored = rent_scout_scoring::score(records, weights);

    let conn = rent_scout_database::open(&config.db_path)?;
    rent_scout_database::replace_all(&conn, &scored)?;

    let indicators = enricher.economic_indicators().await;
    if let Some(rate) = indicators.unemployment_rate {
        println!("US unemployment rate: {rate}%");
    }
    if let Some(rate) = indicators.mortgage_rate {
        println!("30-year mortgage rate: {rate}%");
    }
    if let Some(trend) = indicators.housing_price_trend {
        println!("CA housing price trend: {trend:+.2}%");
    }

    println!();
    println!("Top neighborhoods by value score:");
    println!("{:<5} {:<35} {:>8} {:>8}", "Rank", "Neighborhood", "Rent", "Score");
    for record in scored.iter().take(10) {
        println!(
            "{:<5} {:<35} {:>8.0} {:>8.1}",
            record.rank, record.name, record.median_rent, record.value_score,
        );
    }

    println!();
    println!("Stored {} neighborhoods in {}", scored.len(), config.db_path.display());

    Ok(())
}

/// Refreshes `amenities.csv` from the Overpass API using the coordinates
/// in the rent source.
///
/// # Errors
///
/// Returns an error if the sources cannot be loaded or the CSV cannot be
/// written; individual Overpass failures keep existing counts.
pub async fn refresh_amenities(config: &AnalyzerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let records = rent_scout_dataset::load_merged(config)?;

    println!(
        "Refreshing amenity counts for {} neighborhoods (3 queries each, 1s pause)...",
        records.len(),
    );

    rent_scout_amenities::refresh_amenities(
        &config.overpass_url,
        &records,
        &config.amenities_path(),
    )
    .await?;

    println!("Wrote {}", config.amenities_path().display());
    Ok(())
}

/// Prompts for the three priority sliders (0-100 each).
fn prompt_weights() -> Result<ScoreWeights, dialoguer::Error> {
    let affordability: u32 = Input::new()
        .with_prompt("Affordability priority (0-100)")
        .default(40)
        .interact_text()?;
    let amenities: u32 = Input::new()
        .with_prompt("Amenities priority (0-100)")
        .default(30)
        .interact_text()?;
    let safety: u32 = Input::new()
        .with_prompt("Safety priority (0-100)")
        .default(30)
        .interact_text()?;

    Ok(ScoreWeights {
        affordability: f64::from(affordability),
        amenities: f64::from(amenities),
        safety: f64::from(safety),
    })
}
