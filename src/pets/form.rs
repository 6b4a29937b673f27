// 📝 Edit Form - new name/pet values for one selected record

use crate::pets::desk::{PetDesk, UpdateOutcome};
use crate::pets::record::PetRecord;
use crate::pets::store::PetStore;
use mongodb::bson::Bson;

/// Choices offered by the pet selector of the form
pub const PET_OPTIONS: [&str; 5] = ["cat", "dog", "fish", "bird", "other"];

#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    /// Shown read-only
    pub id: Bson,
    pub name: String,
    pub pet_index: usize,
}

impl EditForm {
    /// Prefill from the stored values.
    ///
    /// A stored pet outside `PET_OPTIONS` preselects the first option.
    pub fn from_record(record: &PetRecord) -> Self {
        let current_pet = record.pet.as_deref().unwrap_or("other");

        Self {
            id: record.id.clone(),
            name: record.name.clone().unwrap_or_default(),
            pet_index: PET_OPTIONS.iter().position(|p| *p == current_pet).unwrap_or(0),
        }
    }

    pub fn id_text(&self) -> String {
        PetRecord {
            id: self.id.clone(),
            name: None,
            pet: None,
        }
        .id_text()
    }

    pub fn pet(&self) -> &'static str {
        PET_OPTIONS[self.pet_index % PET_OPTIONS.len()]
    }

    pub fn next_pet(&mut self) {
        self.pet_index = (self.pet_index + 1) % PET_OPTIONS.len();
    }

    pub fn previous_pet(&mut self) {
        self.pet_index = (self.pet_index + PET_OPTIONS.len() - 1) % PET_OPTIONS.len();
    }

    /// Send the form through the updater
    pub fn submit<S: PetStore>(&self, desk: &mut PetDesk<S>) -> UpdateOutcome {
        desk.update(&self.id, &self.name, self.pet())
    }
}
