// 🐾 Pet Record - transient copy of a stored pet document

use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;

pub const FIELD_ID: &str = "_id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_PET: &str = "pet";

/// One pet document. `id` is assigned by the store and never changes;
/// `name` and `pet` are only changed through the updater.
#[derive(Debug, Clone, PartialEq)]
pub struct PetRecord {
    pub id: Bson,
    pub name: Option<String>,
    pub pet: Option<String>,
}

fn text_of(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}

impl PetRecord {
    pub fn new(id: impl Into<Bson>, name: &str, pet: &str) -> Self {
        Self {
            id: id.into(),
            name: Some(name.to_string()),
            pet: Some(pet.to_string()),
        }
    }

    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.get(FIELD_ID).cloned().unwrap_or(Bson::Null),
            name: doc.get(FIELD_NAME).filter(|v| !matches!(v, Bson::Null)).map(text_of),
            pet: doc.get(FIELD_PET).filter(|v| !matches!(v, Bson::Null)).map(text_of),
        }
    }

    /// Identifier as text (hex for ObjectIds)
    pub fn id_text(&self) -> String {
        text_of(&self.id)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn display_pet(&self) -> &str {
        self.pet.as_deref().unwrap_or("-")
    }
}

/// Turn identifier text back into the value the store assigned
pub fn parse_id(text: &str) -> Bson {
    match ObjectId::parse_str(text) {
        Ok(oid) => Bson::ObjectId(oid),
        Err(_) => Bson::String(text.to_string()),
    }
}

/// Wire shape of a record (identifier flattened to text)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetView {
    pub id: String,
    pub name: String,
    pub pet: String,
}

impl From<&PetRecord> for PetView {
    fn from(record: &PetRecord) -> Self {
        Self {
            id: record.id_text(),
            name: record.display_name().to_string(),
            pet: record.display_pet().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_from_document_reads_fields() {
        let oid = ObjectId::new();
        let record = PetRecord::from_document(&doc! { "_id": oid, "name": "Milo", "pet": "cat" });

        assert_eq!(record.id, Bson::ObjectId(oid));
        assert_eq!(record.id_text(), oid.to_hex());
        assert_eq!(record.display_name(), "Milo");
        assert_eq!(record.display_pet(), "cat");
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let record = PetRecord::from_document(&doc! { "_id": "abc", "name": null });

        assert_eq!(record.name, None);
        assert_eq!(record.display_name(), "Unknown");
        assert_eq!(record.display_pet(), "-");
        assert_eq!(record.id_text(), "abc");
    }

    #[test]
    fn test_parse_id_recovers_object_ids() {
        let oid = ObjectId::new();

        assert_eq!(parse_id(&oid.to_hex()), Bson::ObjectId(oid));
        assert_eq!(parse_id("pet-7"), Bson::String("pet-7".to_string()));
    }
}
