// file: src/records/mongo.rs
// description: MongoDB client wrapper with connection management and record loading
// reference: https://docs.rs/mongodb

use super::source::{RecordSource, format_number};
use crate::config::DatabaseConfig;
use crate::error::{Result, ReviewError};
use crate::models::CaseRecord;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Collection};
use std::time::Duration;
use tracing::{debug, info};

pub const CASE_NUMBER_FIELD: &str = "numero";
pub const DOCKET_ID_FIELD: &str = "radicado";

/// Connection to the record database, owned by the caller for the length of a run.
#[derive(Clone)]
pub struct MongoRecordClient {
    client: Client,
    database: String,
}

impl MongoRecordClient {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to MongoDB database {}", config.database);

        let mut options = ClientOptions::parse(config.connection_uri())
            .await
            .map_err(|e| ReviewError::Database(format!("Invalid connection string: {}", e)))?;

        if let Some((username, password)) = config.credentials() {
            options.credential = Some(
                Credential::builder()
                    .username(username.to_string())
                    .password(password.to_string())
                    .build(),
            );
        }

        let timeout = Duration::from_secs(config.connect_timeout_secs);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)
            .map_err(|e| ReviewError::Database(format!("Failed to create client: {}", e)))?;

        let connected = Self {
            client,
            database: config.database.clone(),
        };
        connected.ping().await?;

        Ok(connected)
    }

    pub async fn ping(&self) -> Result<()> {
        debug!("Checking MongoDB connection");

        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ReviewError::Database(format!("MongoDB connection failed: {}", e)))?;

        info!("MongoDB connection successful");
        Ok(())
    }

    pub fn source(&self, collection: &str) -> MongoRecordSource {
        MongoRecordSource {
            collection: self
                .client
                .database(&self.database)
                .collection::<Document>(collection),
        }
    }

    pub async fn close(self) {
        debug!("Closing MongoDB connection");
        self.client.shutdown().await;
    }
}

/// Records of one office, stored as one collection.
pub struct MongoRecordSource {
    collection: Collection<Document>,
}

impl RecordSource for MongoRecordSource {
    fn describe(&self) -> String {
        format!("mongodb collection {}", self.collection.name())
    }

    async fn fetch_records(&self) -> Result<Vec<CaseRecord>> {
        let name = self.collection.name().to_string();

        let mut cursor = self.collection.find(doc! {}).await.map_err(|e| {
            ReviewError::Database(format!("Failed to query collection {}: {}", name, e))
        })?;

        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(|e| {
            ReviewError::Database(format!("Failed to read collection {}: {}", name, e))
        })? {
            records.push(record_from_document(&document));
        }

        debug!("Loaded {} records from collection {}", records.len(), name);
        Ok(records)
    }
}

pub fn record_from_document(document: &Document) -> CaseRecord {
    let source_id = document
        .get("_id")
        .map(|id| bson_to_text(Some(id)))
        .filter(|id| !id.is_empty());

    CaseRecord {
        case_number: bson_to_text(document.get(CASE_NUMBER_FIELD)),
        docket_id: bson_to_text(document.get(DOCKET_ID_FIELD)),
        source_id,
    }
}

fn bson_to_text(value: Option<&Bson>) -> String {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => String::new(),
        Some(Bson::String(text)) => text.clone(),
        Some(Bson::Int32(n)) => n.to_string(),
        Some(Bson::Int64(n)) => n.to_string(),
        Some(Bson::Double(n)) => format_number(*n),
        Some(Bson::Boolean(b)) => b.to_string(),
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_record_from_document() {
        let oid = ObjectId::new();
        let document = doc! {
            "_id": oid,
            "numero": "2023-00123",
            "radicado": "52001311000120230012300",
        };

        let record = record_from_document(&document);

        assert_eq!(record.case_number, "2023-00123");
        assert_eq!(record.docket_id, "52001311000120230012300");
        assert_eq!(record.source_id, Some(oid.to_hex()));
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let record = record_from_document(&doc! { "numero": Bson::Null });

        assert_eq!(record.case_number, "");
        assert_eq!(record.docket_id, "");
        assert_eq!(record.source_id, None);
    }

    #[test]
    fn test_numeric_fields_are_coerced() {
        let record = record_from_document(&doc! {
            "numero": 123_i32,
            "radicado": 2023.0_f64,
        });

        assert_eq!(record.case_number, "123");
        assert_eq!(record.docket_id, "2023");

        let record = record_from_document(&doc! { "numero": 9_000_000_000_i64, "radicado": true });
        assert_eq!(record.case_number, "9000000000");
        assert_eq!(record.docket_id, "true");
    }
}
