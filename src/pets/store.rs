// 🔌 Connection Manager - the document store behind the pet editor
// One client per process; database and collection are fixed

use crate::config::MongoSecrets;
use crate::pets::query::QueryFilter;
use crate::pets::record::PetRecord;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::sync::{Client, Collection};
use tracing::{info, warn};

pub const DATABASE_NAME: &str = "mydb";
pub const COLLECTION_NAME: &str = "mycollection";

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("Connection settings need either a uri or a host.")]
    MissingHost,
    #[error("Mongo client creation failed with error: {source}")]
    Connect {
        #[source]
        source: mongodb::error::Error,
    },
    #[error("Mongo find failed with error: {source}")]
    Find {
        #[source]
        source: mongodb::error::Error,
    },
    #[error("Mongo update failed with error: {source}")]
    Update {
        #[source]
        source: mongodb::error::Error,
    },
}

// ============================================================================
// STORE SEAM
// ============================================================================

/// Read and single-document update access to pet records
pub trait PetStore {
    /// Every record matching `filter`
    fn find(&self, filter: &QueryFilter) -> Result<Vec<PetRecord>, StoreError>;

    /// Set `name` and `pet` on the record with `id`; returns the modified count
    fn update(&self, id: &Bson, name: &str, pet: &str) -> Result<u64, StoreError>;
}

// ============================================================================
// MONGO STORE
// ============================================================================

pub struct MongoPetStore {
    collection: Collection<Document>,
}

fn client_options(secrets: &MongoSecrets) -> Result<ClientOptions, StoreError> {
    let host = secrets
        .host
        .as_ref()
        .filter(|h| !h.is_empty())
        .ok_or(StoreError::MissingHost)?;

    let credential = secrets.username.as_ref().map(|username| {
        Credential::builder()
            .username(username.clone())
            .password(secrets.password.clone())
            .build()
    });

    Ok(ClientOptions::builder()
        .hosts(vec![ServerAddress::Tcp {
            host: host.clone(),
            port: secrets.port,
        }])
        .credential(credential)
        .build())
}

impl MongoPetStore {
    /// Build the client from the connection descriptor
    pub fn connect(secrets: &MongoSecrets) -> Result<Self, StoreError> {
        let client = match secrets.uri.as_deref().filter(|u| !u.is_empty()) {
            Some(uri) => Client::with_uri_str(uri).map_err(|source| StoreError::Connect { source })?,
            None => Client::with_options(client_options(secrets)?)
                .map_err(|source| StoreError::Connect { source })?,
        };

        info!(database = DATABASE_NAME, collection = COLLECTION_NAME, "document store client ready");

        Ok(Self {
            collection: client.database(DATABASE_NAME).collection(COLLECTION_NAME),
        })
    }
}

impl PetStore for MongoPetStore {
    fn find(&self, filter: &QueryFilter) -> Result<Vec<PetRecord>, StoreError> {
        let cursor = self
            .collection
            .find(filter.to_document())
            .run()
            .map_err(|source| StoreError::Find { source })?;

        let mut records = Vec::new();
        for doc in cursor {
            let doc = doc.map_err(|source| StoreError::Find { source })?;
            records.push(PetRecord::from_document(&doc));
        }
        Ok(records)
    }

    fn update(&self, id: &Bson, name: &str, pet: &str) -> Result<u64, StoreError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.clone() },
                doc! { "$set": { "name": name, "pet": pet } },
            )
            .run()
            .map_err(|source| StoreError::Update { source })?;

        Ok(result.modified_count)
    }
}

/// Connect when a descriptor is configured.
///
/// `Ok(None)` means no descriptor: callers treat it as "no data".
pub fn connect(secrets: Option<&MongoSecrets>) -> Result<Option<MongoPetStore>, StoreError> {
    match secrets {
        Some(secrets) => MongoPetStore::connect(secrets).map(Some),
        None => {
            warn!("no [mongo] settings, pet editor runs without a store");
            Ok(None)
        }
    }
}

// ============================================================================
// IN-MEMORY STORE (tests)
// ============================================================================

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Evaluates filters locally and counts calls, standing in for a server
    #[derive(Default)]
    pub struct MemoryPetStore {
        pub records: RefCell<Vec<PetRecord>>,
        pub find_calls: Cell<usize>,
        pub fail_updates: Cell<bool>,
    }

    impl MemoryPetStore {
        pub fn with_records(records: Vec<PetRecord>) -> Self {
            Self {
                records: RefCell::new(records),
                ..Self::default()
            }
        }
    }

    impl PetStore for MemoryPetStore {
        fn find(&self, filter: &QueryFilter) -> Result<Vec<PetRecord>, StoreError> {
            self.find_calls.set(self.find_calls.get() + 1);
            Ok(self
                .records
                .borrow()
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect())
        }

        fn update(&self, id: &Bson, name: &str, pet: &str) -> Result<u64, StoreError> {
            if self.fail_updates.get() {
                let rejected = std::io::Error::new(std::io::ErrorKind::Other, "write rejected");
                return Err(StoreError::Update {
                    source: rejected.into(),
                });
            }

            let mut records = self.records.borrow_mut();
            let Some(record) = records.iter_mut().find(|r| &r.id == id) else {
                return Ok(0);
            };

            if record.name.as_deref() == Some(name) && record.pet.as_deref() == Some(pet) {
                return Ok(0);
            }

            record.name = Some(name.to_string());
            record.pet = Some(pet.to_string());
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_secrets_means_no_connection() {
        let store = connect(None).unwrap();

        assert!(store.is_none());
    }

    #[test]
    fn test_host_is_required_without_uri() {
        let secrets = MongoSecrets {
            username: Some("reporter".to_string()),
            ..MongoSecrets::default()
        };

        assert!(matches!(client_options(&secrets), Err(StoreError::MissingHost)));
    }

    #[test]
    fn test_client_options_from_host_and_credentials() {
        let secrets = MongoSecrets {
            host: Some("db.internal".to_string()),
            port: Some(27018),
            username: Some("reporter".to_string()),
            password: Some("s3cret".to_string()),
            uri: None,
        };

        let options = client_options(&secrets).unwrap();

        assert_eq!(
            options.hosts,
            vec![ServerAddress::Tcp {
                host: "db.internal".to_string(),
                port: Some(27018)
            }]
        );
        let credential = options.credential.unwrap();
        assert_eq!(credential.username.as_deref(), Some("reporter"));
        assert_eq!(credential.password.as_deref(), Some("s3cret"));
    }
}
