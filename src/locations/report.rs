// 🗺️ Location Report - ordered sections for the presenter
// Raw table → city chart → Thailand notice → map → detail table → province chart

use crate::locations::aggregate::{city_ranking, province_ranking, thailand_rows, Ranking};
use crate::locations::table::{
    StoreTable, BRAND, CITY, LATITUDE, LONGITUDE, STATE_PROVINCE, STORE_NAME,
};
use crate::notice::Notice;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Preferred columns of the Thailand detail table
pub const DETAIL_COLUMNS: [&str; 6] = [BRAND, STORE_NAME, CITY, STATE_PROVINCE, LATITUDE, LONGITUDE];

// ============================================================================
// SECTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Section {
    RawTable { table: StoreTable },
    CityChart { counts: Vec<(String, usize)> },
    Notice { notice: Notice },
    Map { points: Vec<(f64, f64)> },
    DetailTable { table: StoreTable },
    ProvinceChart { counts: Vec<(String, usize)> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    pub sections: Vec<Section>,
}

impl LocationReport {
    /// Build the report; `show_details` is the detail-table toggle
    pub fn build(table: &StoreTable, show_details: bool) -> Self {
        let mut sections = vec![Section::RawTable { table: table.clone() }];

        match city_ranking(table) {
            Ranking::Counts { counts } => sections.push(Section::CityChart { counts }),
            Ranking::MissingColumn { column } => sections.push(Section::Notice {
                notice: Notice::warning(format!("Column '{}' not found, city ranking skipped", column)),
            }),
            Ranking::NoData => {}
        }

        let thai = match thailand_rows(table) {
            Some(thai) => thai,
            None => {
                sections.push(Section::Notice {
                    notice: Notice::error("No 'country' column, Thailand stores cannot be selected"),
                });
                return Self { sections };
            }
        };

        if thai.is_empty() {
            sections.push(Section::Notice {
                notice: Notice::error("No Thailand stores found (country = 'TH')"),
            });
            return Self { sections };
        }

        sections.push(Section::Notice {
            notice: Notice::success(format!("Found {} stores in Thailand", thai.len())),
        });

        if !(thai.has_column(LATITUDE) && thai.has_column(LONGITUDE)) {
            sections.push(Section::Notice {
                notice: Notice::warning(format!(
                    "No latitude/longitude columns to draw the map. Available columns: {}",
                    thai.columns.join(", ")
                )),
            });
            return Self { sections };
        }

        let points = thai.records().iter().filter_map(|r| r.coordinates()).collect();
        sections.push(Section::Map { points });

        if show_details {
            sections.push(Section::DetailTable {
                table: thai.select_available(&DETAIL_COLUMNS),
            });
        }

        match province_ranking(table) {
            Ranking::Counts { counts } => sections.push(Section::ProvinceChart { counts }),
            Ranking::MissingColumn { column } => sections.push(Section::Notice {
                notice: Notice::warning(format!("Column '{}' not found, province ranking skipped", column)),
            }),
            Ranking::NoData => {}
        }

        Self { sections }
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.sections.iter().filter_map(|s| match s {
            Section::Notice { notice } => Some(notice),
            _ => None,
        })
    }

    pub fn map_points(&self) -> Option<&[(f64, f64)]> {
        self.sections.iter().find_map(|s| match s {
            Section::Map { points } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn city_counts(&self) -> Option<&[(String, usize)]> {
        self.sections.iter().find_map(|s| match s {
            Section::CityChart { counts } => Some(counts.as_slice()),
            _ => None,
        })
    }

    pub fn province_counts(&self) -> Option<&[(String, usize)]> {
        self.sections.iter().find_map(|s| match s {
            Section::ProvinceChart { counts } => Some(counts.as_slice()),
            _ => None,
        })
    }

    pub fn detail_table(&self) -> Option<&StoreTable> {
        self.sections.iter().find_map(|s| match s {
            Section::DetailTable { table } => Some(table),
            _ => None,
        })
    }
}

// ============================================================================
// PLAIN TEXT RENDERING
// ============================================================================

const BAR_WIDTH: usize = 40;
const RAW_PREVIEW_ROWS: usize = 10;

fn write_table(out: &mut String, table: &StoreTable, limit: Option<usize>) {
    let _ = writeln!(out, "  {}", table.columns.join(" | "));
    let shown = limit.unwrap_or(table.len()).min(table.len());
    for row in &table.rows[..shown] {
        let _ = writeln!(out, "  {}", row.join(" | "));
    }
    if shown < table.len() {
        let _ = writeln!(out, "  ... {} more rows", table.len() - shown);
    }
}

fn write_bars(out: &mut String, counts: &[(String, usize)]) {
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);
    let label_width = counts.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    for (label, count) in counts {
        let bar = "█".repeat((count * BAR_WIDTH).div_ceil(max));
        let _ = writeln!(out, "  {:<width$} {:>5} {}", label, count, bar, width = label_width);
    }
}

/// Render the report for a plain terminal
pub fn render_text(report: &LocationReport) -> String {
    let mut out = String::new();

    for section in &report.sections {
        match section {
            Section::RawTable { table } => {
                let _ = writeln!(out, "━━ Raw data ({} rows) ━━", table.len());
                write_table(&mut out, table, Some(RAW_PREVIEW_ROWS));
            }
            Section::CityChart { counts } => {
                let _ = writeln!(out, "\n━━ Top {} store locations by city ━━", counts.len());
                write_bars(&mut out, counts);
            }
            Section::Notice { notice } => {
                let _ = writeln!(out, "\n{}", notice);
            }
            Section::Map { points } => {
                let _ = writeln!(out, "\n━━ 📍 Store map of Thailand ({} points) ━━", points.len());
                for (lat, lon) in points.iter().take(RAW_PREVIEW_ROWS) {
                    let _ = writeln!(out, "  {:>9.4}, {:>9.4}", lat, lon);
                }
                if points.len() > RAW_PREVIEW_ROWS {
                    let _ = writeln!(out, "  ... {} more points", points.len() - RAW_PREVIEW_ROWS);
                }
            }
            Section::DetailTable { table } => {
                let _ = writeln!(out, "\n━━ Thailand stores ━━");
                write_table(&mut out, table, None);
            }
            Section::ProvinceChart { counts } => {
                let _ = writeln!(out, "\n━━ 🏆 Top {} provinces by store count ━━", counts.len());
                write_bars(&mut out, counts);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;

    fn table(columns: &[&str], rows: &[&[&str]]) -> StoreTable {
        StoreTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    fn full_table() -> StoreTable {
        table(
            &["Brand", "Store Name", "City", "State/Province", "Country", "Latitude", "Longitude"],
            &[
                &["Starbucks", "Siam Paragon", "Bangkok", "10", "TH", "13.746", "100.534"],
                &["Starbucks", "Nimman", "Chiang Mai", "50", "TH", "18.799", "98.967"],
                &["Starbucks", "Old Town", "Phuket", "83", "TH", "", "98.388"],
                &["Starbucks", "Shibuya", "Tokyo", "13", "JP", "35.659", "139.700"],
            ],
        )
    }

    #[test]
    fn test_sections_follow_display_order() {
        let report = LocationReport::build(&full_table(), true);

        let kinds: Vec<&str> = report
            .sections
            .iter()
            .map(|s| match s {
                Section::RawTable { .. } => "raw",
                Section::CityChart { .. } => "cities",
                Section::Notice { .. } => "notice",
                Section::Map { .. } => "map",
                Section::DetailTable { .. } => "detail",
                Section::ProvinceChart { .. } => "provinces",
            })
            .collect();

        assert_eq!(kinds, vec!["raw", "cities", "notice", "map", "detail", "provinces"]);
    }

    #[test]
    fn test_success_notice_counts_thai_rows() {
        let report = LocationReport::build(&full_table(), false);
        let notice = report.notices().next().unwrap();

        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(notice.text.contains('3'), "Three Thai rows: {}", notice.text);
    }

    #[test]
    fn test_map_drops_missing_coordinates() {
        let report = LocationReport::build(&full_table(), false);

        assert_eq!(
            report.map_points().unwrap(),
            &[(13.746, 100.534), (18.799, 98.967)]
        );
    }

    #[test]
    fn test_detail_table_hidden_unless_toggled() {
        let hidden = LocationReport::build(&full_table(), false);
        let shown = LocationReport::build(&full_table(), true);

        assert!(hidden.detail_table().is_none());
        let detail = shown.detail_table().unwrap();
        assert_eq!(detail.columns, DETAIL_COLUMNS.to_vec());
        assert_eq!(detail.len(), 3);
    }

    #[test]
    fn test_detail_table_omits_missing_columns() {
        let t = table(
            &["City", "Country", "Latitude", "Longitude"],
            &[&["Bangkok", "TH", "13.7", "100.5"]],
        );

        let report = LocationReport::build(&t, true);

        assert_eq!(
            report.detail_table().unwrap().columns,
            vec!["city", "latitude", "longitude"]
        );
        assert!(report.province_counts().is_none(), "No province column");

        let skipped = report
            .notices()
            .find(|n| n.level == NoticeLevel::Warning)
            .expect("Skipped province ranking must be reported");
        assert!(skipped.text.contains("state/province"), "{}", skipped.text);
    }

    #[test]
    fn test_report_serializes_tagged_sections() {
        let report = LocationReport::build(&full_table(), false);

        let json = serde_json::to_value(&report).unwrap();
        let sections = json["sections"].as_array().unwrap();

        assert_eq!(sections[0]["section"], "raw_table");
        assert_eq!(sections[1]["section"], "city_chart");
        assert_eq!(sections[2]["notice"]["level"], "success");
        assert_eq!(sections[3]["points"][0][0], 13.746);
    }

    #[test]
    fn test_no_thailand_rows_shows_error_and_no_map() {
        let t = table(
            &["City", "Country", "Latitude", "Longitude"],
            &[&["Tokyo", "JP", "35.6", "139.7"]],
        );

        let report = LocationReport::build(&t, true);
        let notices: Vec<&Notice> = report.notices().collect();

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].text.contains("No Thailand"));
        assert!(report.map_points().is_none(), "Map must not be rendered");
        assert!(report.province_counts().is_none());
        assert!(report.city_counts().is_some(), "City chart is independent of Thailand");
    }

    #[test]
    fn test_missing_coordinate_columns_lists_available_columns() {
        let t = table(&["City", "Country"], &[&["Bangkok", "TH"]]);

        let report = LocationReport::build(&t, true);
        let warning = report
            .notices()
            .find(|n| n.level == NoticeLevel::Warning)
            .unwrap();

        assert!(warning.text.contains("city, country"));
        assert!(report.map_points().is_none());
        assert!(report.detail_table().is_none());
    }

    #[test]
    fn test_missing_country_and_city_columns_do_not_panic() {
        let t = table(&["Brand"], &[&["Starbucks"]]);

        let report = LocationReport::build(&t, false);

        assert!(report.city_counts().is_none());
        assert_eq!(report.notices().count(), 2);
    }

    #[test]
    fn test_render_text_contains_every_section() {
        let report = LocationReport::build(&full_table(), true);
        let text = render_text(&report);

        assert!(text.contains("Raw data (4 rows)"));
        assert!(text.contains("Bangkok"));
        assert!(text.contains("Found 3 stores in Thailand"));
        assert!(text.contains("(2 points)"));
        assert!(text.contains("Top 3 provinces"));
    }
}
