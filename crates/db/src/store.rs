//! Storage seams for the hydration models.
//!
//! The persistence engine lives outside this workspace; services reach rows
//! only through these traits. Absent rows are `Ok(None)`, never an error.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::daily_goal::DailyGoal;
use crate::models::user::{CreateUserProfile, UserProfile};
use crate::models::water_intake::WaterIntake;
use crate::models::water_reminder::WaterReminder;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    async fn create(&self, data: &CreateUserProfile) -> Result<UserProfile, StoreError>;

    /// Updates an existing profile. A `None` email in `data` keeps the
    /// stored value. Returns `None` when no profile exists for `id`.
    async fn update(
        &self,
        id: Uuid,
        data: &CreateUserProfile,
    ) -> Result<Option<UserProfile>, StoreError>;
}

#[async_trait]
pub trait IntakeStore: Send + Sync {
    async fn find_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<WaterIntake>, StoreError>;

    /// Returns the day's record, creating it at 0 ml when missing.
    async fn create_zero(&self, user_id: Uuid, date: NaiveDate)
    -> Result<WaterIntake, StoreError>;

    /// Adds `delta` to the day's record, creating it first when missing.
    /// The total saturates at `i64::MAX` rather than wrapping.
    async fn add_amount(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        delta: i64,
    ) -> Result<WaterIntake, StoreError>;

    /// All of a user's records ordered by date ascending.
    async fn history(&self, user_id: Uuid) -> Result<Vec<WaterIntake>, StoreError>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<DailyGoal>, StoreError>;

    async fn upsert(&self, user_id: Uuid, amount: i64) -> Result<DailyGoal, StoreError>;
}

/// Reminder rows are singletons per user; every setter upserts, filling the
/// unspecified fields with defaults when the row is missing.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<WaterReminder>, StoreError>;

    async fn create_default(&self, user_id: Uuid) -> Result<WaterReminder, StoreError>;

    async fn set_enabled(&self, user_id: Uuid, enabled: bool)
    -> Result<WaterReminder, StoreError>;

    /// Persists the interval as given; range policy belongs to the caller.
    async fn set_interval(&self, user_id: Uuid, minutes: i64)
    -> Result<WaterReminder, StoreError>;

    async fn mark_reminded(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<WaterReminder, StoreError>;
}
