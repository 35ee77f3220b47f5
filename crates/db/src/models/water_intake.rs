use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One day's accumulated intake for a user, in milliliters.
/// At most one record exists per (user, date); logging increments it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct WaterIntake {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
