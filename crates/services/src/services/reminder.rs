//! Periodic hydration nudges driven by client polling.

use chrono::{DateTime, Local, Utc};
use db::models::water_reminder::WaterReminder;
use db::store::{GoalStore, IntakeStore, ProfileStore, ReminderStore, StoreError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

/// Goal and remaining-ml figures shown when the user never saved a goal.
const FALLBACK_GOAL_ML: i64 = 2500;

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("profile not found")]
    ProfileNotFound,
}

/// Outcome of a reminder poll
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ReminderCheck {
    pub should_remind: bool,
    pub message: Option<String>,
    pub current_amount: Option<i64>,
    pub goal: Option<i64>,
}

impl ReminderCheck {
    fn quiet() -> Self {
        Self {
            should_remind: false,
            message: None,
            current_amount: None,
            goal: None,
        }
    }
}

/// Reminder preferences plus the poll that decides when to nudge
pub struct ReminderService;

impl ReminderService {
    /// Current settings for a user, created at defaults on first access.
    pub async fn settings(
        reminders: &dyn ReminderStore,
        user_id: Uuid,
    ) -> Result<WaterReminder, ReminderError> {
        if let Some(reminder) = reminders.find_by_user(user_id).await? {
            return Ok(reminder);
        }
        Ok(reminders.create_default(user_id).await?)
    }

    pub async fn set_enabled(
        reminders: &dyn ReminderStore,
        user_id: Uuid,
        enabled: bool,
    ) -> Result<WaterReminder, ReminderError> {
        let reminder = reminders.set_enabled(user_id, enabled).await?;
        info!(user_id = %user_id, enabled, "reminders toggled");
        Ok(reminder)
    }

    /// Stores a new interval, clamped to the supported range.
    pub async fn set_interval(
        reminders: &dyn ReminderStore,
        user_id: Uuid,
        minutes: i64,
    ) -> Result<WaterReminder, ReminderError> {
        let minutes = minutes.clamp(
            WaterReminder::MIN_INTERVAL_MINUTES,
            WaterReminder::MAX_INTERVAL_MINUTES,
        );
        let reminder = reminders.set_interval(user_id, minutes).await?;
        info!(user_id = %user_id, interval_minutes = minutes, "reminder interval updated");
        Ok(reminder)
    }

    /// Decides whether a nudge is due. Firing picks one of the canned
    /// messages, stamps the reminder, and reports today's intake alongside.
    ///
    /// A first poll creates the settings row at defaults, starting the
    /// interval clock. Disabled reminders and polls inside the interval
    /// stay quiet.
    pub async fn check(
        reminders: &dyn ReminderStore,
        profiles: &dyn ProfileStore,
        intakes: &dyn IntakeStore,
        goals: &dyn GoalStore,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ReminderCheck, ReminderError> {
        let reminder = Self::settings(reminders, user_id).await?;
        if !reminder.is_enabled {
            return Ok(ReminderCheck::quiet());
        }
        if (now - reminder.last_reminder_time).num_minutes() < reminder.interval_minutes {
            return Ok(ReminderCheck::quiet());
        }

        let profile = profiles
            .find_by_id(user_id)
            .await?
            .ok_or(ReminderError::ProfileNotFound)?;
        let today = now.with_timezone(&Local).date_naive();
        let intake = intakes.create_zero(user_id, today).await?;
        let goal = goals.find_by_user(user_id).await?;

        // remaining may go negative once the goal is exceeded
        let remaining = goal
            .as_ref()
            .map(|goal| goal.amount - intake.amount)
            .unwrap_or(FALLBACK_GOAL_ML);
        let goal_ml = goal.map(|goal| goal.amount).unwrap_or(FALLBACK_GOAL_ML);

        let name = &profile.name;
        let mut messages = vec![
            format!("Hi {name}! It's been 1.5 hours since your last water break. Time to hydrate!"),
            format!("Water break time! You still need {remaining}ml to reach your daily goal."),
            format!("Remember to stay hydrated, {name}! How about drinking some water now?"),
            "Hydration reminder! A glass of water will help you stay focused and energized."
                .to_string(),
            "Your body needs water to function properly. Take a moment to hydrate now!".to_string(),
        ];
        let pick = rand::thread_rng().gen_range(0..messages.len());
        let message = messages.swap_remove(pick);

        reminders.mark_reminded(user_id, now).await?;
        info!(
            user_id = %user_id,
            interval_minutes = reminder.interval_minutes,
            "reminder fired"
        );

        Ok(ReminderCheck {
            should_remind: true,
            message: Some(message),
            current_amount: Some(intake.amount),
            goal: Some(goal_ml),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use db::memory::MemoryStore;
    use db::models::user::CreateUserProfile;

    use super::*;

    async fn seed_profile(store: &MemoryStore, name: &str) -> Uuid {
        let profile = store
            .create(&CreateUserProfile {
                name: name.to_string(),
                email: None,
                age: 30,
                weight_kg: 70.0,
                height_cm: 175.0,
                profession: "engineer".to_string(),
            })
            .await
            .unwrap();
        profile.id
    }

    fn expected_messages(name: &str, remaining: i64) -> Vec<String> {
        vec![
            format!("Hi {name}! It's been 1.5 hours since your last water break. Time to hydrate!"),
            format!("Water break time! You still need {remaining}ml to reach your daily goal."),
            format!("Remember to stay hydrated, {name}! How about drinking some water now?"),
            "Hydration reminder! A glass of water will help you stay focused and energized."
                .to_string(),
            "Your body needs water to function properly. Take a moment to hydrate now!".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_settings_creates_default_row_once() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let first = ReminderService::settings(&store, user_id).await.unwrap();
        assert!(first.is_enabled);
        assert_eq!(
            first.interval_minutes,
            WaterReminder::DEFAULT_INTERVAL_MINUTES
        );

        let second = ReminderService::settings(&store, user_id).await.unwrap();
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_first_poll_creates_settings_and_starts_clock() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let check = ReminderService::check(&store, &store, &store, &store, user_id, Utc::now())
            .await
            .unwrap();
        assert!(!check.should_remind);
        assert!(check.message.is_none());

        // Polling alone is enough to start the interval clock
        let reminder = ReminderStore::find_by_user(&store, user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(reminder.is_enabled);
        assert_eq!(
            reminder.interval_minutes,
            WaterReminder::DEFAULT_INTERVAL_MINUTES
        );

        let again = ReminderService::check(&store, &store, &store, &store, user_id, Utc::now())
            .await
            .unwrap();
        assert!(!again.should_remind);

        let unchanged = ReminderStore::find_by_user(&store, user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.last_reminder_time, reminder.last_reminder_time);
    }

    #[tokio::test]
    async fn test_check_disabled_is_quiet() {
        let store = MemoryStore::new();
        let user_id = seed_profile(&store, "Dana").await;
        let now = Utc::now();
        store
            .mark_reminded(user_id, now - Duration::hours(3))
            .await
            .unwrap();
        store.set_enabled(user_id, false).await.unwrap();

        let check = ReminderService::check(&store, &store, &store, &store, user_id, now)
            .await
            .unwrap();

        assert!(!check.should_remind);
    }

    #[tokio::test]
    async fn test_check_inside_interval_is_quiet() {
        let store = MemoryStore::new();
        let user_id = seed_profile(&store, "Dana").await;
        let now = Utc::now();
        store
            .mark_reminded(user_id, now - Duration::minutes(30))
            .await
            .unwrap();

        let check = ReminderService::check(&store, &store, &store, &store, user_id, now)
            .await
            .unwrap();

        assert!(!check.should_remind);

        let reminder = ReminderStore::find_by_user(&store, user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reminder.last_reminder_time, now - Duration::minutes(30));
    }

    #[tokio::test]
    async fn test_check_fires_after_interval() {
        let store = MemoryStore::new();
        let user_id = seed_profile(&store, "Dana").await;
        store.upsert(user_id, 2000).await.unwrap();

        let now = Utc::now();
        let today = now.with_timezone(&Local).date_naive();
        store.add_amount(user_id, today, 500).await.unwrap();
        store
            .mark_reminded(user_id, now - Duration::hours(2))
            .await
            .unwrap();

        let check = ReminderService::check(&store, &store, &store, &store, user_id, now)
            .await
            .unwrap();

        assert!(check.should_remind);
        assert_eq!(check.current_amount, Some(500));
        assert_eq!(check.goal, Some(2000));
        let message = check.message.unwrap();
        assert!(expected_messages("Dana", 1500).contains(&message));

        let reminder = ReminderStore::find_by_user(&store, user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reminder.last_reminder_time, now);
    }

    #[tokio::test]
    async fn test_check_without_goal_reports_fallback() {
        let store = MemoryStore::new();
        let user_id = seed_profile(&store, "Dana").await;
        let now = Utc::now();
        store
            .mark_reminded(user_id, now - Duration::hours(2))
            .await
            .unwrap();

        let check = ReminderService::check(&store, &store, &store, &store, user_id, now)
            .await
            .unwrap();

        assert!(check.should_remind);
        assert_eq!(check.current_amount, Some(0));
        assert_eq!(check.goal, Some(2500));
        let message = check.message.unwrap();
        assert!(expected_messages("Dana", 2500).contains(&message));
    }

    #[tokio::test]
    async fn test_check_requires_profile() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        store
            .mark_reminded(user_id, now - Duration::hours(2))
            .await
            .unwrap();

        let result = ReminderService::check(&store, &store, &store, &store, user_id, now).await;
        assert!(matches!(result, Err(ReminderError::ProfileNotFound)));
    }

    #[tokio::test]
    async fn test_set_interval_clamps_to_range() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let low = ReminderService::set_interval(&store, user_id, 10)
            .await
            .unwrap();
        assert_eq!(low.interval_minutes, 30);

        let high = ReminderService::set_interval(&store, user_id, 500)
            .await
            .unwrap();
        assert_eq!(high.interval_minutes, 240);

        let ok = ReminderService::set_interval(&store, user_id, 120)
            .await
            .unwrap();
        assert_eq!(ok.interval_minutes, 120);
    }
}
