//! Table operations for the ranked neighborhood store.

use std::path::Path;

use duckdb::Connection;
use rent_scout_models::NeighborhoodRecord;

use crate::StoreError;

/// Sentinel county value meaning "no county filter".
pub const ALL_COUNTIES: &str = "All California";

/// Number of rows per INSERT chunk.
const CHUNK_SIZE: usize = 500;

/// Columns of the `neighborhoods` table, in insert order. `rank` is
/// quoted because it is a reserved word in `DuckDB`.
const COLUMNS: &str = "name, county, latitude, longitude, median_rent, median_income, \
     population, crime_rate, restaurant_count, shop_count, grocery_count, \
     total_amenities, affordability, amenity_score, safety_score, value_score, \"rank\"";

/// Per-county aggregates over the ranked table.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyStats {
    /// County name.
    pub county: String,
    /// Number of neighborhoods in the county.
    pub neighborhood_count: i64,
    /// Average median rent.
    pub avg_rent: f64,
    /// Average crime rate.
    pub avg_crime_rate: Option<f64>,
    /// Average composite value score.
    pub avg_value_score: f64,
}

/// Opens (or creates) the store file and ensures the schema exists.
///
/// # Errors
///
/// Returns [`StoreError`] if the connection or schema creation fails.
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Opens an in-memory store with the schema created. Used by tests and
/// ephemeral runs.
///
/// # Errors
///
/// Returns [`StoreError`] if the connection or schema creation fails.
pub fn open_in_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS neighborhoods (
            name TEXT NOT NULL PRIMARY KEY,
            county TEXT,
            latitude DOUBLE,
            longitude DOUBLE,
            median_rent DOUBLE NOT NULL,
            median_income DOUBLE NOT NULL,
            population BIGINT NOT NULL,
            crime_rate DOUBLE,
            restaurant_count BIGINT NOT NULL,
            shop_count BIGINT NOT NULL,
            grocery_count BIGINT NOT NULL,
            total_amenities BIGINT NOT NULL,
            affordability DOUBLE NOT NULL,
            amenity_score DOUBLE NOT NULL,
            safety_score DOUBLE NOT NULL,
            value_score DOUBLE NOT NULL,
            \"rank\" BIGINT NOT NULL
        );",
    )?;
    Ok(())
}

/// Replaces the entire table contents with the given records.
///
/// Wholesale DELETE + chunked multi-row INSERT; no transactional
/// atomicity is needed with a single writer per process.
///
/// # Errors
///
/// Returns [`StoreError`] if any database operation fails.
pub fn replace_all(conn: &Connection, records: &[NeighborhoodRecord]) -> Result<(), StoreError> {
    conn.execute("DELETE FROM neighborhoods", [])?;

    for chunk in records.chunks(CHUNK_SIZE) {
        let mut sql = format!("INSERT INTO neighborhoods ({COLUMNS}) VALUES ");

        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str("(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
        }

        let mut stmt = conn.prepare(&sql)?;
        let mut param_idx = 1usize;

        for record in chunk {
            stmt.raw_bind_parameter(param_idx, &record.name)?;
            stmt.raw_bind_parameter(param_idx + 1, record.county.as_deref())?;
            stmt.raw_bind_parameter(param_idx + 2, record.latitude)?;
            stmt.raw_bind_parameter(param_idx + 3, record.longitude)?;
            stmt.raw_bind_parameter(param_idx + 4, record.median_rent)?;
            stmt.raw_bind_parameter(param_idx + 5, record.median_income)?;
            stmt.raw_bind_parameter(param_idx + 6, record.population)?;
            stmt.raw_bind_parameter(param_idx + 7, record.crime_rate)?;
            stmt.raw_bind_parameter(param_idx + 8, record.restaurant_count)?;
            stmt.raw_bind_parameter(param_idx + 9, record.shop_count)?;
            stmt.raw_bind_parameter(param_idx + 10, record.grocery_count)?;
            stmt.raw_bind_parameter(param_idx + 11, record.total_amenities)?;
            stmt.raw_bind_parameter(param_idx + 12, record.affordability)?;
            stmt.raw_bind_parameter(param_idx + 13, record.amenity_score)?;
            stmt.raw_bind_parameter(param_idx + 14, record.safety_score)?;
            stmt.raw_bind_parameter(param_idx + 15, record.value_score)?;
            stmt.raw_bind_parameter(param_idx + 16, record.rank)?;
            param_idx += 17;
        }

        stmt.raw_execute()?;
    }

    log::info!("Replaced neighborhoods table with {} records", records.len());
    Ok(())
}

/// Returns all records ordered by value score, best first.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub fn query_all(conn: &Connection) -> Result<Vec<NeighborhoodRecord>, StoreError> {
    let sql = format!("SELECT {COLUMNS} FROM neighborhoods ORDER BY value_score DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Returns records at or under `max_rent`, optionally restricted to one
/// county, ordered by value score descending.
///
/// `None` and the [`ALL_COUNTIES`] sentinel both mean "every county".
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub fn query_filtered(
    conn: &Connection,
    county: Option<&str>,
    max_rent: f64,
) -> Result<Vec<NeighborhoodRecord>, StoreError> {
    let county = county.filter(|c| *c != ALL_COUNTIES);

    let rows = if let Some(county) = county {
        let sql = format!(
            "SELECT {COLUMNS} FROM neighborhoods
             WHERE county = ? AND median_rent <= ?
             ORDER BY value_score DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        stmt.query_map(duckdb::params![county, max_rent], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let sql = format!(
            "SELECT {COLUMNS} FROM neighborhoods
             WHERE median_rent <= ?
             ORDER BY value_score DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        stmt.query_map(duckdb::params![max_rent], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(rows)
}

/// Per-county aggregates, ordered by average value score descending.
///
/// Rows with no derivable county are excluded.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub fn county_stats(conn: &Connection) -> Result<Vec<CountyStats>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT
            county,
            COUNT(*) AS neighborhood_count,
            AVG(median_rent) AS avg_rent,
            AVG(crime_rate) AS avg_crime_rate,
            AVG(value_score) AS avg_value_score
         FROM neighborhoods
         WHERE county IS NOT NULL
         GROUP BY county
         ORDER BY avg_value_score DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(CountyStats {
                county: row.get(0)?,
                neighborhood_count: row.get(1)?,
                avg_rent: row.get(2)?,
                avg_crime_rate: row.get(3)?,
                avg_value_score: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn row_to_record(row: &duckdb::Row<'_>) -> Result<NeighborhoodRecord, duckdb::Error> {
    Ok(NeighborhoodRecord {
        name: row.get(0)?,
        county: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        median_rent: row.get(4)?,
        median_income: row.get(5)?,
        population: row.get(6)?,
        crime_rate: row.get(7)?,
        restaurant_count: row.get(8)?,
        shop_count: row.get(9)?,
        grocery_count: row.get(10)?,
        total_amenities: row.get(11)?,
        affordability: row.get(12)?,
        amenity_score: row.get(13)?,
        safety_score: row.get(14)?,
        value_score: row.get(15)?,
        rank: row.get(16)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, county: &str, rent: f64, value_score: f64, rank: i64) -> NeighborhoodRecord {
        let mut r = NeighborhoodRecord::new(name, rent);
        r.county = Some(county.to_string());
        r.value_score = value_score;
        r.rank = rank;
        r
    }

    #[test]
    fn replace_all_rewrites_the_table() {
        let conn = open_in_memory().unwrap();

        replace_all(&conn, &[record("A (Kern)", "Kern", 1000.0, 80.0, 1)]).unwrap();
        replace_all(
            &conn,
            &[
                record("B (Kern)", "Kern", 1200.0, 70.0, 1),
                record("C (Kern)", "Kern", 1400.0, 60.0, 2),
            ],
        )
        .unwrap();

        let all = query_all(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "B (Kern)");
    }

    #[test]
    fn query_all_orders_by_value_score() {
        let conn = open_in_memory().unwrap();
        replace_all(
            &conn,
            &[
                record("Low (Kern)", "Kern", 1000.0, 20.0, 2),
                record("High (Kern)", "Kern", 2000.0, 90.0, 1),
            ],
        )
        .unwrap();

        let all = query_all(&conn).unwrap();
        assert_eq!(all[0].name, "High (Kern)");
        assert_eq!(all[1].name, "Low (Kern)");
    }

    #[test]
    fn filtered_query_applies_rent_and_county() {
        let conn = open_in_memory().unwrap();
        replace_all(
            &conn,
            &[
                record("Cheap LA (Los Angeles)", "Los Angeles", 1500.0, 80.0, 1),
                record("Pricey LA (Los Angeles)", "Los Angeles", 4000.0, 75.0, 2),
                record("Cheap SD (San Diego)", "San Diego", 1400.0, 70.0, 3),
            ],
        )
        .unwrap();

        let la_only = query_filtered(&conn, Some("Los Angeles"), 2000.0).unwrap();
        assert_eq!(la_only.len(), 1);
        assert_eq!(la_only[0].name, "Cheap LA (Los Angeles)");

        let sentinel = query_filtered(&conn, Some(ALL_COUNTIES), 2000.0).unwrap();
        assert_eq!(sentinel.len(), 2);
    }

    #[test]
    fn filtered_query_is_an_ordered_subset_of_query_all() {
        let conn = open_in_memory().unwrap();
        replace_all(
            &conn,
            &[
                record("A (Kern)", "Kern", 900.0, 95.0, 1),
                record("B (Kern)", "Kern", 2600.0, 85.0, 2),
                record("C (Kern)", "Kern", 1100.0, 75.0, 3),
            ],
        )
        .unwrap();

        let all = query_all(&conn).unwrap();
        let filtered = query_filtered(&conn, None, 1500.0).unwrap();

        let expected: Vec<&NeighborhoodRecord> =
            all.iter().filter(|r| r.median_rent <= 1500.0).collect();
        assert_eq!(filtered.len(), expected.len());
        for (got, want) in filtered.iter().zip(expected) {
            assert_eq!(got.name, want.name);
        }
    }

    #[test]
    fn county_stats_aggregates_per_county() {
        let conn = open_in_memory().unwrap();
        let mut with_crime = record("A (Kern)", "Kern", 1000.0, 80.0, 1);
        with_crime.crime_rate = Some(4.0);
        let mut no_county = record("Nowhere", "x", 1000.0, 10.0, 3);
        no_county.county = None;

        replace_all(
            &conn,
            &[
                with_crime,
                record("B (Kern)", "Kern", 2000.0, 60.0, 2),
                no_county,
            ],
        )
        .unwrap();

        let stats = county_stats(&conn).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].county, "Kern");
        assert_eq!(stats[0].neighborhood_count, 2);
        assert!((stats[0].avg_rent - 1500.0).abs() < 1e-9);
        assert!((stats[0].avg_value_score - 70.0).abs() < 1e-9);
    }

    #[test]
    fn empty_replace_leaves_an_empty_table() {
        let conn = open_in_memory().unwrap();
        replace_all(&conn, &[record("A (Kern)", "Kern", 1000.0, 80.0, 1)]).unwrap();
        replace_all(&conn, &[]).unwrap();
        assert!(query_all(&conn).unwrap().is_empty());
    }
}
