use thiserror::Error;

use crate::models::{
    loyalty::LoyaltyAccount,
    vacation::{Vacation, VacationProgress},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("store lock poisoned")]
    Poisoned,
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Persistence for vacation records.
///
/// Progress is only ever written through `swap_progress`, which is the
/// per-vacation critical section: the write lands only if the stored
/// progress still equals `expected`.
#[allow(async_fn_in_trait)]
pub trait VacationStore {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert_vacation(&self, vacation: &Vacation) -> Result<(), StoreError>;

    async fn get_vacation(&self, id: &str) -> Result<Option<Vacation>, StoreError>;

    async fn list_vacations(&self, traveler_id: &str) -> Result<Vec<Vacation>, StoreError>;

    /// Returns `false` when another writer got there first (or the vacation is gone).
    async fn swap_progress(
        &self,
        id: &str,
        expected: &VacationProgress,
        new: &VacationProgress,
    ) -> Result<bool, StoreError>;
}

/// Persistence for loyalty balances, keyed by traveler.
#[allow(async_fn_in_trait)]
pub trait LoyaltyStore {
    /// Missing accounts read as an empty bronze account.
    async fn get_account(&self, traveler_id: &str) -> Result<LoyaltyAccount, StoreError>;

    async fn swap_account(
        &self,
        traveler_id: &str,
        expected: &LoyaltyAccount,
        new: &LoyaltyAccount,
    ) -> Result<bool, StoreError>;
}
