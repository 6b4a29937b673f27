// 📜 List Presenter - match count, record list and selection labels

use crate::notice::Notice;
use crate::pets::record::{PetRecord, PetView};
use serde::Serialize;
use std::fmt::Write;

/// Menu label of a record: `"{name} (Pet: {pet}) [ID: {last 4 of id}]"`.
/// A missing field reads `None` here, unlike the `Unknown`/`-` of the entry list.
pub fn selection_label(record: &PetRecord) -> String {
    let id: Vec<char> = record.id_text().chars().collect();
    let suffix: String = id[id.len().saturating_sub(4)..].iter().collect();

    format!(
        "{} (Pet: {}) [ID: {}]",
        record.name.as_deref().unwrap_or("None"),
        record.pet.as_deref().unwrap_or("None"),
        suffix
    )
}

/// One entry of the selection menu
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOption {
    pub label: String,
    pub record: PetRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetListing {
    pub records: Vec<PetRecord>,
}

impl PetListing {
    pub fn new(records: Vec<PetRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count_notice(&self) -> Notice {
        Notice::info(format!("Found {} records", self.records.len()))
    }

    /// Shown instead of the list when nothing matched
    pub fn empty_notice(&self) -> Option<Notice> {
        self.is_empty()
            .then(|| Notice::warning("No records match the search"))
    }

    /// `- {name} (Pet: {pet})` lines
    pub fn entries(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| format!("- {} (Pet: {})", r.display_name(), r.display_pet()))
            .collect()
    }

    /// Selection menu keyed by label.
    ///
    /// Records sharing a label collapse into one option: it keeps the position
    /// of the first record and points at the last one.
    pub fn selection_options(&self) -> Vec<SelectionOption> {
        let mut options: Vec<SelectionOption> = Vec::with_capacity(self.records.len());

        for record in &self.records {
            let label = selection_label(record);
            match options.iter_mut().find(|o| o.label == label) {
                Some(existing) => existing.record = record.clone(),
                None => options.push(SelectionOption {
                    label,
                    record: record.clone(),
                }),
            }
        }

        options
    }

    pub fn to_view(&self) -> ListingView {
        ListingView {
            count: self.len(),
            notice: self.empty_notice().unwrap_or_else(|| self.count_notice()),
            records: self.records.iter().map(PetView::from).collect(),
            labels: self.selection_options().into_iter().map(|o| o.label).collect(),
        }
    }
}

/// Wire shape of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub count: usize,
    pub notice: Notice,
    pub records: Vec<PetView>,
    pub labels: Vec<String>,
}

impl ListingView {
    /// Empty listing carrying `diagnostic` in place of the match count
    pub fn unavailable(diagnostic: Notice) -> Self {
        Self {
            notice: diagnostic,
            ..PetListing::default().to_view()
        }
    }
}

/// Render the listing for a plain terminal
pub fn render_text(listing: &PetListing) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", listing.count_notice());
    match listing.empty_notice() {
        Some(notice) => {
            let _ = writeln!(out, "{}", notice);
        }
        None => {
            for entry in listing.entries() {
                let _ = writeln!(out, "  {}", entry);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use mongodb::bson::{oid::ObjectId, Bson};

    #[test]
    fn test_label_uses_last_four_id_chars() {
        let oid = ObjectId::parse_str("64f0a1b2c3d4e5f6a7b8c9d0").unwrap();
        let record = PetRecord::new(oid, "Milo", "cat");

        assert_eq!(selection_label(&record), "Milo (Pet: cat) [ID: c9d0]");
    }

    #[test]
    fn test_label_with_short_id_keeps_whole_id() {
        let record = PetRecord::new("7", "Rex", "dog");

        assert_eq!(selection_label(&record), "Rex (Pet: dog) [ID: 7]");
    }

    #[test]
    fn test_label_spells_missing_fields_as_none() {
        let record = PetRecord {
            id: Bson::String("0042".into()),
            name: None,
            pet: None,
        };
        let listing = PetListing::new(vec![record.clone()]);

        assert_eq!(selection_label(&record), "None (Pet: None) [ID: 0042]");
        assert_eq!(listing.entries(), vec!["- Unknown (Pet: -)"]);
    }

    #[test]
    fn test_labels_collide_when_only_early_id_chars_differ() {
        let a = PetRecord::new("aaaa0000ffff", "Milo", "cat");
        let b = PetRecord::new("bbbb1111ffff", "Milo", "cat");

        assert_eq!(selection_label(&a), selection_label(&b), "Known ambiguity");

        let options = PetListing::new(vec![a, b.clone()]).selection_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].record, b, "Later record wins the shared label");
    }

    #[test]
    fn test_distinct_labels_keep_order() {
        let listing = PetListing::new(vec![
            PetRecord::new("0001", "Milo", "cat"),
            PetRecord::new("0002", "Rex", "dog"),
        ]);

        let labels: Vec<String> = listing.selection_options().into_iter().map(|o| o.label).collect();

        assert_eq!(labels, vec!["Milo (Pet: cat) [ID: 0001]", "Rex (Pet: dog) [ID: 0002]"]);
    }

    #[test]
    fn test_empty_listing_warns() {
        let listing = PetListing::default();

        assert_eq!(listing.count_notice().text, "Found 0 records");
        assert_eq!(listing.empty_notice().unwrap().level, NoticeLevel::Warning);
        assert!(listing.selection_options().is_empty());
        assert!(render_text(&listing).contains("No records match"));
    }

    #[test]
    fn test_entries_show_name_and_pet() {
        let listing = PetListing::new(vec![PetRecord::new("0001", "Milo", "cat")]);

        assert_eq!(listing.entries(), vec!["- Milo (Pet: cat)"]);
        assert!(listing.empty_notice().is_none());
        assert_eq!(listing.to_view().count, 1);
    }
}
