//! In-memory store used by tests and lightweight embeddings.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::daily_goal::DailyGoal;
use crate::models::user::{CreateUserProfile, UserProfile};
use crate::models::water_intake::WaterIntake;
use crate::models::water_reminder::WaterReminder;
use crate::store::{GoalStore, IntakeStore, ProfileStore, ReminderStore, StoreError};

#[derive(Default)]
struct Inner {
    profiles: HashMap<Uuid, UserProfile>,
    intakes: HashMap<(Uuid, NaiveDate), WaterIntake>,
    goals: HashMap<Uuid, DailyGoal>,
    reminders: HashMap<Uuid, WaterReminder>,
}

/// Keeps every row in process memory behind one lock. The one-per-user and
/// one-per-(user, date) invariants hold by map construction.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn default_reminder(user_id: Uuid) -> WaterReminder {
    WaterReminder {
        id: Uuid::new_v4(),
        user_id,
        is_enabled: true,
        interval_minutes: WaterReminder::DEFAULT_INTERVAL_MINUTES,
        last_reminder_time: Utc::now(),
    }
}

fn zero_intake(user_id: Uuid, date: NaiveDate) -> WaterIntake {
    WaterIntake {
        id: Uuid::new_v4(),
        user_id,
        date,
        amount: 0,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.inner.read().await.profiles.get(&id).cloned())
    }

    async fn create(&self, data: &CreateUserProfile) -> Result<UserProfile, StoreError> {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            email: data.email.clone(),
            age: data.age,
            weight_kg: data.weight_kg,
            height_cm: data.height_cm,
            profession: data.profession.clone(),
            created_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .profiles
            .insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update(
        &self,
        id: Uuid,
        data: &CreateUserProfile,
    ) -> Result<Option<UserProfile>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(profile) = inner.profiles.get_mut(&id) else {
            return Ok(None);
        };
        profile.name = data.name.clone();
        if data.email.is_some() {
            profile.email = data.email.clone();
        }
        profile.age = data.age;
        profile.weight_kg = data.weight_kg;
        profile.height_cm = data.height_cm;
        profile.profession = data.profession.clone();
        Ok(Some(profile.clone()))
    }
}

#[async_trait]
impl IntakeStore for MemoryStore {
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<WaterIntake>, StoreError> {
        Ok(self.inner.read().await.intakes.get(&(user_id, date)).cloned())
    }

    async fn create_zero(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<WaterIntake, StoreError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .intakes
            .entry((user_id, date))
            .or_insert_with(|| zero_intake(user_id, date));
        Ok(record.clone())
    }

    async fn add_amount(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        delta: i64,
    ) -> Result<WaterIntake, StoreError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .intakes
            .entry((user_id, date))
            .or_insert_with(|| zero_intake(user_id, date));
        record.amount = record.amount.saturating_add(delta);
        Ok(record.clone())
    }

    async fn history(&self, user_id: Uuid) -> Result<Vec<WaterIntake>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<WaterIntake> = inner
            .intakes
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.date);
        Ok(records)
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<DailyGoal>, StoreError> {
        Ok(self.inner.read().await.goals.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: Uuid, amount: i64) -> Result<DailyGoal, StoreError> {
        let mut inner = self.inner.write().await;
        let goal = inner
            .goals
            .entry(user_id)
            .and_modify(|goal| {
                goal.amount = amount;
                goal.updated_at = Utc::now();
            })
            .or_insert_with(|| DailyGoal {
                id: Uuid::new_v4(),
                user_id,
                amount,
                updated_at: Utc::now(),
            });
        Ok(goal.clone())
    }
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<WaterReminder>, StoreError> {
        Ok(self.inner.read().await.reminders.get(&user_id).cloned())
    }

    async fn create_default(&self, user_id: Uuid) -> Result<WaterReminder, StoreError> {
        let mut inner = self.inner.write().await;
        let reminder = inner
            .reminders
            .entry(user_id)
            .or_insert_with(|| default_reminder(user_id));
        Ok(reminder.clone())
    }

    async fn set_enabled(
        &self,
        user_id: Uuid,
        enabled: bool,
    ) -> Result<WaterReminder, StoreError> {
        let mut inner = self.inner.write().await;
        let reminder = inner
            .reminders
            .entry(user_id)
            .or_insert_with(|| default_reminder(user_id));
        reminder.is_enabled = enabled;
        Ok(reminder.clone())
    }

    async fn set_interval(
        &self,
        user_id: Uuid,
        minutes: i64,
    ) -> Result<WaterReminder, StoreError> {
        let mut inner = self.inner.write().await;
        let reminder = inner
            .reminders
            .entry(user_id)
            .or_insert_with(|| default_reminder(user_id));
        reminder.interval_minutes = minutes;
        Ok(reminder.clone())
    }

    async fn mark_reminded(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<WaterReminder, StoreError> {
        let mut inner = self.inner.write().await;
        let reminder = inner
            .reminders
            .entry(user_id)
            .or_insert_with(|| default_reminder(user_id));
        reminder.last_reminder_time = at;
        Ok(reminder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_data(name: &str) -> CreateUserProfile {
        CreateUserProfile {
            name: name.to_string(),
            email: Some(format!("{name}@example.com")),
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            profession: "engineer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_keeps_email_when_payload_has_none() {
        let store = MemoryStore::new();
        let created = store.create(&profile_data("dana")).await.unwrap();

        let mut edit = profile_data("dana");
        edit.email = None;
        edit.weight_kg = 72.5;
        let updated = store.update(created.id, &edit).await.unwrap().unwrap();

        assert_eq!(updated.email.as_deref(), Some("dana@example.com"));
        assert_eq!(updated.weight_kg, 72.5);
    }

    #[tokio::test]
    async fn test_update_missing_profile_returns_none() {
        let store = MemoryStore::new();
        let result = store.update(Uuid::new_v4(), &profile_data("ghost")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_add_amount_creates_then_increments() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let first = store.add_amount(user_id, date, 250).await.unwrap();
        assert_eq!(first.amount, 250);

        let second = store.add_amount(user_id, date, 500).await.unwrap();
        assert_eq!(second.amount, 750);
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_add_amount_saturates_instead_of_wrapping() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        store.add_amount(user_id, date, i64::MAX).await.unwrap();
        let record = store.add_amount(user_id, date, 250).await.unwrap();
        assert_eq!(record.amount, i64::MAX);
    }

    #[tokio::test]
    async fn test_create_zero_is_idempotent() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        store.add_amount(user_id, date, 300).await.unwrap();
        let record = store.create_zero(user_id, date).await.unwrap();
        assert_eq!(record.amount, 300);
    }

    #[tokio::test]
    async fn test_history_is_ordered_and_scoped_to_user() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        store.add_amount(user_id, d3, 100).await.unwrap();
        store.add_amount(user_id, d1, 200).await.unwrap();
        store.add_amount(user_id, d2, 300).await.unwrap();
        store.add_amount(other, d1, 999).await.unwrap();

        let history = store.history(user_id).await.unwrap();
        let dates: Vec<NaiveDate> = history.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d1, d2, d3]);
        assert!(history.iter().all(|r| r.user_id == user_id));
    }

    #[tokio::test]
    async fn test_goal_upsert_overwrites_single_row() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let first = store.upsert(user_id, 2500).await.unwrap();
        let second = store.upsert(user_id, 1900).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.amount, 1900);
    }

    #[tokio::test]
    async fn test_reminder_setters_fill_defaults() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let reminder = store.set_interval(user_id, 120).await.unwrap();
        assert_eq!(reminder.interval_minutes, 120);
        assert!(reminder.is_enabled);

        let reminder = store.set_enabled(user_id, false).await.unwrap();
        assert_eq!(reminder.interval_minutes, 120);
        assert!(!reminder.is_enabled);
    }

    #[tokio::test]
    async fn test_mark_reminded_updates_timestamp() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let at = Utc::now();

        store.create_default(user_id).await.unwrap();
        let reminder = store.mark_reminded(user_id, at).await.unwrap();
        assert_eq!(reminder.last_reminder_time, at);
    }
}
