#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure scoring and ranking engine.
//!
//! `(records, weights) -> ranked records`, deterministic, no I/O. The
//! arithmetic reproduces the production dashboard's formulas exactly,
//! including the affordability saturation quirk (see [`score`]); the
//! ranking users see depends on these exact shapes.

use rent_scout_models::{NeighborhoodRecord, ScoreWeights};

/// Scores and ranks the records with the given weight triple.
///
/// Steps, in order:
///
/// 1. **Affordability**: `ratio = median_rent * 12 / median_income`;
///    `affordability = 100 - clamp(ratio * 100, 0, 100)`. The ratio is
///    scaled straight to percentage points, so the score saturates to 0
///    once annual rent reaches annual income. That is much gentler than a
///    rent-burden formula, but it is what the dashboard has always shown
///    and what the ranking depends on, so it is reproduced verbatim.
/// 2. **Amenity**: `total_amenities / max(total_amenities) * 100`. If the
///    maximum is 0, every record scores 0.
/// 3. **Safety**: missing crime rates are filled with the dataset median,
///    then `100 - crime_rate / max(crime_rate) * 100`. If no record has a
///    crime rate, every record scores 100 (no data must not penalize, and
///    a constant term leaves the ranking unchanged).
/// 4. **Value**: weighted sum using `weights.normalized()`.
/// 5. **Rank**: stable descending sort by value score, ranks `1..=N`.
///
/// Empty input yields empty output. Negative rents or incomes can push
/// scores outside `[0, 100]`; validating inputs is the caller's job.
#[must_use]
pub fn score(mut records: Vec<NeighborhoodRecord>, weights: ScoreWeights) -> Vec<NeighborhoodRecord> {
    if records.is_empty() {
        return records;
    }

    let weights = weights.normalized();

    fill_missing_crime_rates(&mut records);

    let max_amenities = records.iter().map(|r| r.total_amenities).max().unwrap_or(0);
    let max_crime = records
        .iter()
        .filter_map(|r| r.crime_rate)
        .fold(None::<f64>, |acc, v| Some(acc.map_or(v, |m| m.max(v))));

    for record in &mut records {
        record.affordability = affordability_score(record.median_rent, record.median_income);
        record.amenity_score = amenity_score(record.total_amenities, max_amenities);
        record.safety_score = safety_score(record.crime_rate, max_crime);
        record.value_score = record.affordability * weights.affordability
            + record.amenity_score * weights.amenities
            + record.safety_score * weights.safety;
    }

    // Stable sort keeps input order for equal value scores.
    records.sort_by(|a, b| {
        b.value_score
            .partial_cmp(&a.value_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (i, record) in records.iter_mut().enumerate() {
        record.rank = i64::try_from(i).unwrap_or(i64::MAX - 1) + 1;
    }

    records
}

/// Fills missing crime rates with the median of the observed rates.
///
/// When no record has a crime rate, all rates stay `None` and the safety
/// score falls back to 100 for everyone.
fn fill_missing_crime_rates(records: &mut [NeighborhoodRecord]) {
    let mut observed: Vec<f64> = records.iter().filter_map(|r| r.crime_rate).collect();
    if observed.is_empty() {
        log::warn!("No crime rates in dataset; safety scores default to 100");
        return;
    }

    observed.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = observed.len() / 2;
    let median = if observed.len() % 2 == 0 {
        f64::midpoint(observed[mid - 1], observed[mid])
    } else {
        observed[mid]
    };

    for record in records.iter_mut() {
        if record.crime_rate.is_none() {
            record.crime_rate = Some(median);
        }
    }
}

fn affordability_score(median_rent: f64, median_income: f64) -> f64 {
    let ratio = (median_rent * 12.0) / median_income;
    100.0 - (ratio * 100.0).clamp(0.0, 100.0)
}

#[allow(clippy::cast_precision_loss)]
fn amenity_score(total_amenities: i64, max_amenities: i64) -> f64 {
    if max_amenities <= 0 {
        return 0.0;
    }
    total_amenities as f64 / max_amenities as f64 * 100.0
}

fn safety_score(crime_rate: Option<f64>, max_crime: Option<f64>) -> f64 {
    match (crime_rate, max_crime) {
        (Some(rate), Some(max)) if max > 0.0 => 100.0 - rate / max * 100.0,
        _ => 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rent_scout_models::DEFAULT_WEIGHTS;

    fn record(name: &str, rent: f64, income: f64, amenities: i64, crime: Option<f64>) -> NeighborhoodRecord {
        let mut r = NeighborhoodRecord::new(name, rent);
        r.median_income = income;
        r.total_amenities = amenities;
        r.crime_rate = crime;
        r
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(score(Vec::new(), DEFAULT_WEIGHTS).is_empty());
    }

    #[test]
    fn ranks_are_a_contiguous_permutation() {
        let records = vec![
            record("A (Kern)", 1000.0, 60_000.0, 10, Some(2.0)),
            record("B (Kern)", 2000.0, 80_000.0, 5, Some(5.0)),
            record("C (Kern)", 1500.0, 70_000.0, 8, Some(3.0)),
        ];
        let scored = score(records, DEFAULT_WEIGHTS);

        let mut ranks: Vec<i64> = scored.iter().map(|r| r.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);

        for pair in scored.windows(2) {
            assert!(pair[0].value_score >= pair[1].value_score);
            assert_eq!(pair[0].rank + 1, pair[1].rank);
        }
    }

    #[test]
    fn sub_scores_stay_in_bounds() {
        let records = vec![
            record("A (Kern)", 900.0, 55_000.0, 40, Some(1.5)),
            record("B (Kern)", 4800.0, 48_000.0, 0, Some(9.0)),
            record("C (Kern)", 2400.0, 120_000.0, 12, None),
        ];
        for r in score(records, DEFAULT_WEIGHTS) {
            for s in [r.affordability, r.amenity_score, r.safety_score, r.value_score] {
                assert!((0.0..=100.0).contains(&s), "score out of bounds: {s}");
            }
        }
    }

    #[test]
    fn affordability_saturates_when_rent_consumes_income() {
        // 5000 * 12 = 60000 >= 50000 income: ratio >= 1, score pins to 0.
        let scored = score(
            vec![record("A (Kern)", 5000.0, 50_000.0, 0, Some(1.0))],
            DEFAULT_WEIGHTS,
        );
        assert!(scored[0].affordability.abs() < f64::EPSILON);
    }

    #[test]
    fn worked_example_orders_a_above_b() {
        let records = vec![
            record("A", 1000.0, 60_000.0, 10, Some(2.0)),
            record("B", 2000.0, 80_000.0, 5, Some(5.0)),
        ];
        let scored = score(records, DEFAULT_WEIGHTS);

        let a = scored.iter().find(|r| r.name == "A").unwrap();
        let b = scored.iter().find(|r| r.name == "B").unwrap();

        assert!((a.amenity_score - 100.0).abs() < 1e-9);
        assert!((b.amenity_score - 50.0).abs() < 1e-9);
        assert!((a.safety_score - 60.0).abs() < 1e-9);
        assert!(b.safety_score.abs() < 1e-9);
        assert_eq!(a.rank, 1);
        assert_eq!(b.rank, 2);
    }

    #[test]
    fn missing_crime_rate_gets_dataset_median() {
        let records = vec![
            record("A (Kern)", 1000.0, 60_000.0, 1, Some(2.0)),
            record("B (Kern)", 1000.0, 60_000.0, 1, Some(6.0)),
            record("C (Kern)", 1000.0, 60_000.0, 1, None),
        ];
        let scored = score(records, DEFAULT_WEIGHTS);
        let c = scored.iter().find(|r| r.name == "C (Kern)").unwrap();
        assert_eq!(c.crime_rate, Some(4.0));
    }

    #[test]
    fn all_missing_crime_rates_default_safety_to_100() {
        let records = vec![
            record("A (Kern)", 1000.0, 60_000.0, 1, None),
            record("B (Kern)", 1200.0, 60_000.0, 2, None),
        ];
        for r in score(records, DEFAULT_WEIGHTS) {
            assert!((r.safety_score - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn zero_amenity_maximum_scores_zero() {
        let records = vec![
            record("A (Kern)", 1000.0, 60_000.0, 0, Some(1.0)),
            record("B (Kern)", 1200.0, 60_000.0, 0, Some(2.0)),
        ];
        for r in score(records, DEFAULT_WEIGHTS) {
            assert!(r.amenity_score.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let records = vec![
            record("First (Kern)", 1000.0, 60_000.0, 5, Some(2.0)),
            record("Second (Kern)", 1000.0, 60_000.0, 5, Some(2.0)),
        ];
        let scored = score(records, DEFAULT_WEIGHTS);
        assert_eq!(scored[0].name, "First (Kern)");
        assert_eq!(scored[0].rank, 1);
        assert_eq!(scored[1].name, "Second (Kern)");
        assert_eq!(scored[1].rank, 2);
    }

    #[test]
    fn scoring_is_idempotent() {
        let records = vec![
            record("A (Kern)", 1000.0, 60_000.0, 10, Some(2.0)),
            record("B (Kern)", 2000.0, 80_000.0, 5, Some(5.0)),
        ];
        let once = score(records.clone(), DEFAULT_WEIGHTS);
        let twice = score(once.clone(), DEFAULT_WEIGHTS);
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_weight_triple_uses_default_weights() {
        let zero = ScoreWeights {
            affordability: 0.0,
            amenities: 0.0,
            safety: 0.0,
        };
        let records = vec![
            record("A (Kern)", 1000.0, 60_000.0, 10, Some(2.0)),
            record("B (Kern)", 2000.0, 80_000.0, 5, Some(5.0)),
        ];
        let with_zero = score(records.clone(), zero);
        let with_default = score(records, DEFAULT_WEIGHTS);
        assert_eq!(with_zero, with_default);
    }
}
