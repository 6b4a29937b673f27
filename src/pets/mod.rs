// Record Editor - search, list and edit pet documents
//
// Connection Manager → Query Builder → Data Fetcher → List Presenter → Edit Form → Updater

pub mod record;
pub mod query;
pub mod store;
pub mod desk;
pub mod listing;
pub mod form;

pub use record::{parse_id, PetRecord, PetView};
pub use query::{build_filter, Criterion, QueryFilter, SearchInput, ALL_PETS, FILTER_OPTIONS};
pub use store::{connect, MongoPetStore, PetStore, StoreError, COLLECTION_NAME, DATABASE_NAME};
pub use desk::{PetDesk, UpdateOutcome, FETCH_TTL_MINUTES};
pub use listing::{selection_label, ListingView, PetListing, SelectionOption};
pub use form::{EditForm, PET_OPTIONS};
