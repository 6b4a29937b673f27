// Location Report - CSV of store locations rendered as rankings and a map
//
// Data Loader → Aggregator → Presenter

pub mod table;
pub mod loader;
pub mod aggregate;
pub mod report;

pub use table::{StoreRecord, StoreTable};
pub use loader::{fetch_table, parse_csv, LocationLoader};
pub use aggregate::{city_ranking, province_ranking, thailand_rows, value_counts, Ranking};
pub use report::{render_text, LocationReport, Section, DETAIL_COLUMNS};
