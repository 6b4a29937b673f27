// 🔍 Query Builder - search inputs → QueryFilter

use crate::pets::record::{PetRecord, FIELD_NAME, FIELD_PET};
use mongodb::bson::{doc, Bson, Document};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dropdown value meaning "do not filter on pet"
pub const ALL_PETS: &str = "all";

/// Choices offered by the pet dropdown, sentinel first
pub const FILTER_OPTIONS: [&str; 5] = [ALL_PETS, "cat", "dog", "fish", "bird"];

// ============================================================================
// QUERY FILTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Criterion {
    /// Field equals the value
    Exact(String),

    /// Field matches the pattern, ignoring case
    Pattern(String),
}

impl Criterion {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Criterion::Exact(expected) => value == expected,
            Criterion::Pattern(pattern) => RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(|re| re.is_match(value))
                .unwrap_or(false),
        }
    }

    fn to_bson(&self) -> Bson {
        match self {
            Criterion::Exact(value) => Bson::String(value.clone()),
            Criterion::Pattern(pattern) => Bson::Document(doc! { "$regex": pattern.as_str(), "$options": "i" }),
        }
    }
}

/// Field name → criterion. An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryFilter {
    criteria: BTreeMap<String, Criterion>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the criterion for `field`, replacing any earlier one
    pub fn set(&mut self, field: &str, criterion: Criterion) {
        self.criteria.insert(field.to_string(), criterion);
    }

    pub fn get(&self, field: &str) -> Option<&Criterion> {
        self.criteria.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn to_document(&self) -> Document {
        self.criteria
            .iter()
            .map(|(field, criterion)| (field.clone(), criterion.to_bson()))
            .collect()
    }

    /// Evaluate the filter locally; a missing field never matches
    pub fn matches(&self, record: &PetRecord) -> bool {
        self.criteria.iter().all(|(field, criterion)| {
            let value = match field.as_str() {
                FIELD_NAME => record.name.as_deref(),
                FIELD_PET => record.pet.as_deref(),
                _ => None,
            };
            value.is_some_and(|v| criterion.matches(v))
        })
    }
}

// ============================================================================
// SEARCH INPUTS
// ============================================================================

/// Current values of the search widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchInput {
    #[serde(default)]
    pub search_name: String,
    #[serde(default)]
    pub search_pet_text: String,
    #[serde(default = "default_selected_pet")]
    pub selected_pet: String,
}

fn default_selected_pet() -> String {
    ALL_PETS.to_string()
}

impl Default for SearchInput {
    fn default() -> Self {
        Self {
            search_name: String::new(),
            search_pet_text: String::new(),
            selected_pet: default_selected_pet(),
        }
    }
}

/// Build the filter for the current inputs.
///
/// The free-text pet search is applied after the dropdown, so when both are
/// filled the pattern replaces the exact match on `pet`.
pub fn build_filter(input: &SearchInput) -> QueryFilter {
    let mut filter = QueryFilter::new();

    if !input.search_name.is_empty() {
        filter.set(FIELD_NAME, Criterion::Pattern(input.search_name.clone()));
    }
    if input.selected_pet != ALL_PETS {
        filter.set(FIELD_PET, Criterion::Exact(input.selected_pet.clone()));
    }
    if !input.search_pet_text.is_empty() {
        filter.set(FIELD_PET, Criterion::Pattern(input.search_pet_text.clone()));
    }

    filter
}
