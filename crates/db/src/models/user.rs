use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A registered user with the physical attributes the goal formula reads
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub profession: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or editing a profile
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateUserProfile {
    pub name: String,
    pub email: Option<String>,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub profession: String,
}
