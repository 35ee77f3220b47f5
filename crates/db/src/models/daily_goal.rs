use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A user's current daily target in milliliters.
/// One row per user; recomputing the goal overwrites it in place.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DailyGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub updated_at: DateTime<Utc>,
}
