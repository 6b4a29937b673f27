// Report Desk - Core Library
// Exposes both flows for use in the CLI, API server, and tests

pub mod cache;
pub mod config;
pub mod notice;
pub mod locations;  // Flow A: store locations report
pub mod pets;       // Flow B: pet record editor

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use cache::KeyedCache;
pub use config::{ConfigError, LocationSettings, MongoSecrets, Settings};
pub use notice::{Notice, NoticeLevel};
pub use locations::{
    LocationLoader, LocationReport, Ranking, Section, StoreRecord, StoreTable,
    city_ranking, province_ranking,
};
pub use pets::{
    EditForm, MongoPetStore, PetDesk, PetListing, PetRecord, PetStore, QueryFilter,
    SearchInput, StoreError, UpdateOutcome, build_filter, selection_label,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
