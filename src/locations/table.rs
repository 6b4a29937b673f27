// 📋 Store Table - tabular view of the locations CSV
// Column names are lowercase; an empty cell is a missing value

use serde::{Deserialize, Serialize};

// ============================================================================
// COLUMN NAMES
// ============================================================================

pub const BRAND: &str = "brand";
pub const STORE_NAME: &str = "store name";
pub const CITY: &str = "city";
pub const STATE_PROVINCE: &str = "state/province";
pub const COUNTRY: &str = "country";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

// ============================================================================
// STORE TABLE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl StoreTable {
    /// Build a table, lowercasing column names. Names and cells are otherwise kept verbatim.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| c.to_lowercase()).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value, `None` when the column is absent or the cell is empty
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Every cell of a column, `None` when the column is absent
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(name)?;
        Some((0..self.rows.len()).map(|row| self.cell(row, index)).collect())
    }

    /// Rows whose `column` equals `value`; `None` when the column is absent
    pub fn filter_eq(&self, column: &str, value: &str) -> Option<StoreTable> {
        let index = self.column_index(column)?;

        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(row, _)| self.cell(*row, index) == Some(value))
            .map(|(_, r)| r.clone())
            .collect();

        Some(StoreTable {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Projection onto the wanted columns that exist, in the wanted order
    pub fn select_available(&self, wanted: &[&str]) -> StoreTable {
        let picked: Vec<(usize, &str)> = wanted
            .iter()
            .filter_map(|name| self.column_index(name).map(|i| (i, *name)))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|r| {
                picked
                    .iter()
                    .map(|(i, _)| r.get(*i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        StoreTable {
            columns: picked.iter().map(|(_, name)| name.to_string()).collect(),
            rows,
        }
    }

    /// Typed view of each row
    pub fn records(&self) -> Vec<StoreRecord> {
        let idx = |name| self.column_index(name);
        let (brand, store_name, city, state, country, lat, lon) = (
            idx(BRAND),
            idx(STORE_NAME),
            idx(CITY),
            idx(STATE_PROVINCE),
            idx(COUNTRY),
            idx(LATITUDE),
            idx(LONGITUDE),
        );

        (0..self.rows.len())
            .map(|row| {
                let text = |col: Option<usize>| col.and_then(|c| self.cell(row, c)).map(String::from);
                let number = |col: Option<usize>| {
                    col.and_then(|c| self.cell(row, c))
                        .and_then(|v| v.trim().parse::<f64>().ok())
                        .filter(|v| v.is_finite())
                };

                StoreRecord {
                    brand: text(brand),
                    store_name: text(store_name),
                    city: text(city),
                    state_province: text(state),
                    country: text(country),
                    latitude: number(lat),
                    longitude: number(lon),
                }
            })
            .collect()
    }
}

// ============================================================================
// STORE RECORD
// ============================================================================

/// One store location. Read-only; identity is the row position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub brand: Option<String>,
    pub store_name: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StoreRecord {
    /// `(latitude, longitude)` when both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> StoreTable {
        StoreTable::new(
            vec!["Brand".into(), "City".into(), "Country".into(), "Latitude".into(), "Longitude".into()],
            vec![
                vec!["Starbucks".into(), "Bangkok".into(), "TH".into(), "13.75".into(), "100.5".into()],
                vec!["Starbucks".into(), "Tokyo".into(), "JP".into(), "".into(), "139.7".into()],
                vec!["Starbucks".into(), "".into(), "TH".into(), "abc".into(), "98.9".into()],
            ],
        )
    }

    #[test]
    fn test_columns_are_lowercased() {
        let table = sample_table();

        assert_eq!(table.columns, vec!["brand", "city", "country", "latitude", "longitude"]);
        assert!(table.has_column(CITY));
        assert!(!table.has_column("City"));
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let table = sample_table();
        let cities = table.column(CITY).unwrap();

        assert_eq!(cities, vec![Some("Bangkok"), Some("Tokyo"), None]);
        assert!(table.column(STATE_PROVINCE).is_none());
    }

    #[test]
    fn test_filter_eq_keeps_matching_rows() {
        let table = sample_table();
        let thai = table.filter_eq(COUNTRY, "TH").unwrap();

        assert_eq!(thai.len(), 2);
        assert_eq!(thai.columns, table.columns);
        assert!(table.filter_eq(STATE_PROVINCE, "Bangkok").is_none());
    }

    #[test]
    fn test_padded_values_are_not_normalized() {
        let table = StoreTable::new(
            vec!["City ".into(), "Country".into()],
            vec![
                vec!["Bangkok ".into(), "TH ".into()],
                vec!["Bangkok".into(), "TH".into()],
            ],
        );

        assert_eq!(table.columns, vec!["city ", "country"]);
        assert!(!table.has_column(CITY), "Padded header is a different column");
        assert_eq!(table.filter_eq(COUNTRY, "TH").unwrap().len(), 1);
        assert_eq!(table.column(COUNTRY).unwrap(), vec![Some("TH "), Some("TH")]);
    }

    #[test]
    fn test_select_available_skips_missing_columns() {
        let table = sample_table();
        let detail = table.select_available(&[BRAND, STORE_NAME, CITY, LATITUDE]);

        assert_eq!(detail.columns, vec!["brand", "city", "latitude"]);
        assert_eq!(detail.rows[0], vec!["Starbucks", "Bangkok", "13.75"]);
    }

    #[test]
    fn test_records_parse_coordinates() {
        let records = sample_table().records();

        assert_eq!(records[0].coordinates(), Some((13.75, 100.5)));
        assert_eq!(records[1].coordinates(), None, "Missing latitude");
        assert_eq!(records[2].coordinates(), None, "Unparseable latitude");
        assert_eq!(records[2].city, None);
        assert_eq!(records[0].store_name, None, "Absent column reads as None");
    }
}
