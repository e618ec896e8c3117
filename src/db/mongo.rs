use chrono::Utc;
use futures::TryStreamExt;
use log::{info, warn};
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, IndexModel,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::store::{LoyaltyStore, StoreError, VacationStore};
use crate::models::{
    loyalty::{LoyaltyAccount, Tier},
    vacation::{Vacation, VacationProgress},
};

const VACATIONS_COLLECTION: &str = "Vacations";
const LOYALTY_COLLECTION: &str = "LoyaltyAccounts";
const DUPLICATE_KEY: i32 = 11000;

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, StoreError> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client
        .database("admin")
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => info!("Connected to MongoDB and verified with ping command"),
        Err(e) => warn!(
            "Connected to MongoDB but ping failed, some functionality might be impaired: {}",
            e
        ),
    }

    Ok(Arc::new(client))
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[derive(Debug, Serialize, Deserialize)]
struct LoyaltyRecord {
    #[serde(rename = "_id")]
    traveler_id: String,
    total_points: u64,
    tier: Tier,
}

pub struct MongoStore {
    client: Arc<Client>,
    database: String,
}

impl MongoStore {
    pub fn new(client: Arc<Client>, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    fn vacations(&self) -> Collection<Vacation> {
        self.client
            .database(&self.database)
            .collection(VACATIONS_COLLECTION)
    }

    fn accounts(&self) -> Collection<LoyaltyRecord> {
        self.client
            .database(&self.database)
            .collection(LOYALTY_COLLECTION)
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "traveler_id": 1, "created_at": -1 })
            .build();
        self.vacations().create_index(index).await?;
        Ok(())
    }
}

impl VacationStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database(&self.database)
            .run_command(doc! {"ping": 1})
            .await?;
        Ok(())
    }

    async fn insert_vacation(&self, vacation: &Vacation) -> Result<(), StoreError> {
        self.vacations().insert_one(vacation).await?;
        Ok(())
    }

    async fn get_vacation(&self, id: &str) -> Result<Option<Vacation>, StoreError> {
        Ok(self.vacations().find_one(doc! { "_id": id }).await?)
    }

    async fn list_vacations(&self, traveler_id: &str) -> Result<Vec<Vacation>, StoreError> {
        let cursor = self
            .vacations()
            .find(doc! { "traveler_id": traveler_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn swap_progress(
        &self,
        id: &str,
        expected: &VacationProgress,
        new: &VacationProgress,
    ) -> Result<bool, StoreError> {
        // A single-document update is atomic, so matching on the expected
        // progress makes this a compare-and-set.
        let filter = doc! {
            "_id": id,
            "progress.current_leg_index": i64::from(expected.current_leg_index),
            "progress.has_active_ride": expected.has_active_ride,
            "progress.active_ride_id": expected.active_ride_id.as_deref(),
            "progress.claim_id": expected.claim_id.as_deref(),
        };
        let update = doc! {
            "$set": {
                "progress": bson::to_bson(new)?,
                "updated_at": bson::to_bson(&Utc::now())?,
            }
        };

        let result = self.vacations().update_one(filter, update).await?;
        Ok(result.modified_count == 1)
    }
}

impl LoyaltyStore for MongoStore {
    async fn get_account(&self, traveler_id: &str) -> Result<LoyaltyAccount, StoreError> {
        let record = self.accounts().find_one(doc! { "_id": traveler_id }).await?;
        Ok(record
            .map(|record| LoyaltyAccount {
                total_points: record.total_points,
                tier: record.tier,
            })
            .unwrap_or_default())
    }

    async fn swap_account(
        &self,
        traveler_id: &str,
        expected: &LoyaltyAccount,
        new: &LoyaltyAccount,
    ) -> Result<bool, StoreError> {
        let expected_points = i64::try_from(expected.total_points)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let filter = doc! { "_id": traveler_id, "total_points": expected_points };
        let update = doc! {
            "$set": {
                "total_points": bson::to_bson(&new.total_points)?,
                "tier": bson::to_bson(&new.tier)?,
            }
        };

        // A first award creates the account; losing that insert race shows up
        // as a duplicate key and is just a failed swap.
        let creating = *expected == LoyaltyAccount::default();
        match self
            .accounts()
            .update_one(filter, update)
            .upsert(creating)
            .await
        {
            Ok(result) => Ok(result.modified_count == 1 || result.upserted_id.is_some()),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
