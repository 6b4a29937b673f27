// 📊 Aggregator - city and province rankings
// Pure functions over a StoreTable

use crate::locations::table::{StoreTable, CITY, COUNTRY, STATE_PROVINCE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

pub const CITY_TOP_N: usize = 20;
pub const PROVINCE_TOP_N: usize = 10;

/// Country code the province ranking and the map are restricted to
pub const THAILAND: &str = "TH";

// ============================================================================
// RANKING RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ranking {
    /// `(value, count)` pairs, most frequent first
    Counts { counts: Vec<(String, usize)> },

    /// The aggregation was skipped because a column is absent
    MissingColumn { column: String },

    /// The input had no rows to rank
    NoData,
}

impl Ranking {
    pub fn counts(&self) -> Option<&[(String, usize)]> {
        match self {
            Ranking::Counts { counts } => Some(counts.as_slice()),
            _ => None,
        }
    }
}

// ============================================================================
// COUNTING
// ============================================================================

/// Count non-missing values, most frequent first.
///
/// Ties keep the order in which values first appeared.
pub fn value_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for value in values.into_iter().flatten() {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|v| (v.to_string(), counts[v]))
        .collect();

    // sort_by is stable: equal counts stay in first-occurrence order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn top_counts(table: &StoreTable, column: &str, limit: usize) -> Ranking {
    let Some(values) = table.column(column) else {
        warn!(column, "column missing, ranking skipped");
        return Ranking::MissingColumn {
            column: column.to_string(),
        };
    };

    let mut counts = value_counts(values);
    counts.truncate(limit);
    Ranking::Counts { counts }
}

/// Rows located in Thailand; `None` when there is no `country` column
pub fn thailand_rows(table: &StoreTable) -> Option<StoreTable> {
    table.filter_eq(COUNTRY, THAILAND)
}

/// Top 20 cities by number of stores
pub fn city_ranking(table: &StoreTable) -> Ranking {
    top_counts(table, CITY, CITY_TOP_N)
}

/// Top 10 Thai provinces by number of stores
pub fn province_ranking(table: &StoreTable) -> Ranking {
    match thailand_rows(table) {
        None => {
            warn!(column = COUNTRY, "column missing, province ranking skipped");
            Ranking::MissingColumn {
                column: COUNTRY.to_string(),
            }
        }
        Some(thai) if thai.is_empty() => Ranking::NoData,
        Some(thai) => top_counts(&thai, STATE_PROVINCE, PROVINCE_TOP_N),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> StoreTable {
        StoreTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_value_counts_orders_by_count_then_first_seen() {
        let counts = value_counts(vec![
            Some("Chiang Mai"),
            Some("Bangkok"),
            Some("Phuket"),
            Some("Bangkok"),
            None,
            Some("Phuket"),
            Some("Krabi"),
        ]);

        assert_eq!(
            counts,
            vec![
                ("Bangkok".to_string(), 2),
                ("Phuket".to_string(), 2),
                ("Chiang Mai".to_string(), 1),
                ("Krabi".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_city_ranking_keeps_top_twenty() {
        let cities: Vec<String> = (0..25).map(|i| format!("City {}", i)).collect();
        let rows: Vec<Vec<&str>> = cities.iter().map(|c| vec![c.as_str()]).collect();
        let row_refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();

        let ranking = city_ranking(&table(&["City"], &row_refs));

        assert_eq!(ranking.counts().unwrap().len(), CITY_TOP_N);
    }

    #[test]
    fn test_city_ranking_skipped_without_city_column() {
        let ranking = city_ranking(&table(&["Country"], &[&["TH"]]));

        assert_eq!(
            ranking,
            Ranking::MissingColumn {
                column: "city".to_string()
            }
        );
    }

    #[test]
    fn test_province_ranking_only_counts_thailand() {
        let t = table(
            &["Country", "State/Province"],
            &[
                &["TH", "10"],
                &["JP", "13"],
                &["TH", "10"],
                &["TH", "50"],
                &["JP", "13"],
                &["JP", "13"],
            ],
        );

        let ranking = province_ranking(&t);

        assert_eq!(
            ranking.counts().unwrap(),
            &[("10".to_string(), 2), ("50".to_string(), 1)]
        );
    }

    #[test]
    fn test_province_ranking_skipped_without_country_column() {
        let ranking = province_ranking(&table(&["State/Province"], &[&["10"]]));

        assert!(matches!(ranking, Ranking::MissingColumn { ref column } if column == "country"));
    }

    #[test]
    fn test_province_ranking_skipped_without_province_column() {
        let ranking = province_ranking(&table(&["Country"], &[&["TH"]]));

        assert!(matches!(ranking, Ranking::MissingColumn { ref column } if column == "state/province"));
    }

    #[test]
    fn test_province_ranking_no_thai_rows_is_no_data() {
        let ranking = province_ranking(&table(&["Country", "State/Province"], &[&["JP", "13"]]));

        assert_eq!(ranking, Ranking::NoData);
    }

    #[test]
    fn test_province_ranking_keeps_top_ten() {
        let provinces: Vec<String> = (0..15).map(|i| format!("{}", i)).collect();
        let rows: Vec<Vec<&str>> = provinces.iter().map(|p| vec!["TH", p.as_str()]).collect();
        let row_refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();

        let ranking = province_ranking(&table(&["Country", "State/Province"], &row_refs));

        assert_eq!(ranking.counts().unwrap().len(), PROVINCE_TOP_N);
    }
}
