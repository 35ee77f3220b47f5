//! Profile, goal, and intake bookkeeping behind the dashboard and widgets.

use chrono::{Local, NaiveDate};
use db::models::daily_goal::DailyGoal;
use db::models::user::{CreateUserProfile, UserProfile};
use db::store::{GoalStore, IntakeStore, ProfileStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use super::goal::{self, HydrationInsights, Progress};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("negative amount")]
    NegativeAmount,
}

/// Response for a water logging request
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct WaterLog {
    pub current_amount: i64,
    pub goal: i64,
    pub goal_achieved: bool,
    pub percentage: u8,
}

/// Storage-facing operations around profiles, goals, and intake records
pub struct WaterTracker;

impl WaterTracker {
    /// Create or update a profile, then recompute and persist its goal.
    /// An id with no backing row falls back to creating a fresh profile.
    /// Saving unchanged data leaves the same goal behind.
    pub async fn save_profile(
        profiles: &dyn ProfileStore,
        goals: &dyn GoalStore,
        user_id: Option<Uuid>,
        data: &CreateUserProfile,
    ) -> Result<UserProfile, TrackerError> {
        let profile = match user_id {
            Some(id) => match profiles.update(id, data).await? {
                Some(profile) => profile,
                None => profiles.create(data).await?,
            },
            None => profiles.create(data).await?,
        };

        let goal = Self::recalculate_goal(goals, &profile).await?;
        info!(
            user_id = %profile.id,
            goal_ml = goal.amount,
            "profile saved and goal recomputed"
        );

        Ok(profile)
    }

    /// Recompute the recommended goal from the profile and overwrite the row.
    pub async fn recalculate_goal(
        goals: &dyn GoalStore,
        profile: &UserProfile,
    ) -> Result<DailyGoal, TrackerError> {
        let amount =
            goal::recommended_goal_ml(profile.weight_kg, profile.age, &profile.profession);
        Ok(goals.upsert(profile.id, amount).await?)
    }

    /// Add water to today's record, creating it when missing, and report the
    /// resulting progress. Works without a goal row; the percentage reads 0.
    pub async fn log_water(
        intakes: &dyn IntakeStore,
        goals: &dyn GoalStore,
        user_id: Uuid,
        amount_ml: i64,
    ) -> Result<WaterLog, TrackerError> {
        if amount_ml < 0 {
            return Err(TrackerError::NegativeAmount);
        }

        let today = Local::now().date_naive();
        let intake = intakes.add_amount(user_id, today, amount_ml).await?;
        let goal_ml = goals
            .find_by_user(user_id)
            .await?
            .map(|goal| goal.amount)
            .unwrap_or(0);
        let progress = Progress::new(intake.amount, goal_ml);

        info!(
            user_id = %user_id,
            amount_ml,
            total_ml = intake.amount,
            "water logged"
        );

        Ok(WaterLog {
            current_amount: intake.amount,
            goal: goal_ml,
            goal_achieved: progress.goal_achieved,
            percentage: progress.percentage,
        })
    }

    /// Today's record (created at 0 when absent) against the goal.
    pub async fn today_progress(
        intakes: &dyn IntakeStore,
        goals: &dyn GoalStore,
        user_id: Uuid,
    ) -> Result<Progress, TrackerError> {
        let today = Local::now().date_naive();
        let intake = intakes.create_zero(user_id, today).await?;
        let goal_ml = goals
            .find_by_user(user_id)
            .await?
            .map(|goal| goal.amount)
            .unwrap_or(0);
        Ok(Progress::new(intake.amount, goal_ml))
    }

    /// Streak and badges over the full intake history.
    pub async fn insights(
        intakes: &dyn IntakeStore,
        goals: &dyn GoalStore,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<HydrationInsights, TrackerError> {
        let history = intakes.history(user_id).await?;
        let goal_ml = goals
            .find_by_user(user_id)
            .await?
            .map(|goal| goal.amount)
            .unwrap_or(0);
        Ok(HydrationInsights::compute(&history, goal_ml, today))
    }
}
