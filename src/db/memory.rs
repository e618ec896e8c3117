use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use super::store::{LoyaltyStore, StoreError, VacationStore};
use crate::models::{
    loyalty::LoyaltyAccount,
    vacation::{Vacation, VacationProgress},
};

/// Process-local store used by tests and by local runs without `MONGODB_URI`.
#[derive(Default)]
pub struct MemoryStore {
    vacations: Mutex<HashMap<String, Vacation>>,
    accounts: Mutex<HashMap<String, LoyaltyAccount>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VacationStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.vacations.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(())
    }

    async fn insert_vacation(&self, vacation: &Vacation) -> Result<(), StoreError> {
        let mut vacations = self.vacations.lock().map_err(|_| StoreError::Poisoned)?;
        vacations.insert(vacation.id.clone(), vacation.clone());
        Ok(())
    }

    async fn get_vacation(&self, id: &str) -> Result<Option<Vacation>, StoreError> {
        let vacations = self.vacations.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(vacations.get(id).cloned())
    }

    async fn list_vacations(&self, traveler_id: &str) -> Result<Vec<Vacation>, StoreError> {
        let vacations = self.vacations.lock().map_err(|_| StoreError::Poisoned)?;
        let mut found: Vec<Vacation> = vacations
            .values()
            .filter(|vacation| vacation.traveler_id == traveler_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn swap_progress(
        &self,
        id: &str,
        expected: &VacationProgress,
        new: &VacationProgress,
    ) -> Result<bool, StoreError> {
        let mut vacations = self.vacations.lock().map_err(|_| StoreError::Poisoned)?;
        match vacations.get_mut(id) {
            Some(vacation) if vacation.progress == *expected => {
                vacation.progress = new.clone();
                vacation.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl LoyaltyStore for MemoryStore {
    async fn get_account(&self, traveler_id: &str) -> Result<LoyaltyAccount, StoreError> {
        let accounts = self.accounts.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(accounts.get(traveler_id).cloned().unwrap_or_default())
    }

    async fn swap_account(
        &self,
        traveler_id: &str,
        expected: &LoyaltyAccount,
        new: &LoyaltyAccount,
    ) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.lock().map_err(|_| StoreError::Poisoned)?;
        let current = accounts.entry(traveler_id.to_string()).or_default();
        if current != expected {
            return Ok(false);
        }
        *current = new.clone();
        Ok(true)
    }
}
