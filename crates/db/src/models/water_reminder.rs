use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Reminder preferences for a user, plus the timestamp gating the next nudge
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct WaterReminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_enabled: bool,
    pub interval_minutes: i64,
    pub last_reminder_time: DateTime<Utc>,
}

impl WaterReminder {
    pub const DEFAULT_INTERVAL_MINUTES: i64 = 90;
    pub const MIN_INTERVAL_MINUTES: i64 = 30;
    pub const MAX_INTERVAL_MINUTES: i64 = 240;
}
