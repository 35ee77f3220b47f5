//! Conversational assistant: canned acknowledgements, Gemini-backed replies,
//! and the deterministic local fallback used whenever the API is unavailable.

use chrono::{Local, Timelike};
use db::models::user::UserProfile;
use db::store::{GoalStore, IntakeStore, ProfileStore, StoreError};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use super::gemini_api::{GeminiApiClient, GeminiApiError};
use super::goal::Progress;
use super::hydration_content;
use super::quantity::extract_quantity;

const CHAT_WATER_KEYWORDS: [&str; 7] = ["add", "water", "glass", "cup", "ml", "bottle", "drink"];
const PROGRESS_QUERIES: [&str; 4] = ["how much", "progress", "water intake", "hydration level"];
const TIP_QUERIES: [&str; 3] = ["tip", "advice", "suggest"];
const FACT_QUERIES: [&str; 4] = ["fact", "benefit", "health", "importance"];

const API_KEY_NOTE: &str =
    "\n\n(Note: For more advanced AI responses, ask your admin to set up the Gemini API key in Settings.)";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("profile not found")]
    ProfileNotFound,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("api key cannot be empty")]
    Empty,
    #[error("invalid api key")]
    Rejected,
    #[error("error setting api key: {0}")]
    Other(String),
}

/// Coarse clock band used by the greeting fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 18 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }
}

/// Everything the chat widget needs to render one exchange
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ChatReply {
    pub message: String,
    pub current_amount: i64,
    pub goal: i64,
    pub percentage: u8,
    pub water_added: bool,
    pub api_key_set: bool,
}

/// Chat layer over the Gemini client. Replies never fail outward: when the
/// API is unconfigured or down, a locally synthesized answer is returned.
pub struct WaterAssistant {
    gemini: RwLock<Option<GeminiApiClient>>,
}

impl Default for WaterAssistant {
    fn default() -> Self {
        Self::new()
    }
}

impl WaterAssistant {
    pub fn new() -> Self {
        Self {
            gemini: RwLock::new(None),
        }
    }

    /// Picks up GEMINI_API_KEY when present; stays unconfigured otherwise.
    pub fn from_env() -> Self {
        match GeminiApiClient::from_env() {
            Ok(client) => {
                info!("gemini api key loaded from environment");
                Self {
                    gemini: RwLock::new(Some(client)),
                }
            }
            Err(GeminiApiError::MissingApiKey) => Self::new(),
            Err(e) => {
                warn!("could not build gemini client from environment: {e}");
                Self::new()
            }
        }
    }

    pub async fn is_configured(&self) -> bool {
        self.gemini.read().await.is_some()
    }

    /// Validates and installs an API key. Safe to call again at any time;
    /// the previous client is replaced wholesale.
    pub async fn configure(&self, api_key: &str) -> Result<(), CredentialError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CredentialError::Empty);
        }

        let client = GeminiApiClient::new(api_key.to_string(), None)
            .map_err(|e| CredentialError::Other(e.to_string()))?;

        match client.validate_key().await {
            Ok(()) => {
                *self.gemini.write().await = Some(client);
                info!("gemini api key configured");
                Ok(())
            }
            Err(GeminiApiError::InvalidApiKey) => Err(CredentialError::Rejected),
            Err(e) => Err(CredentialError::Other(e.to_string())),
        }
    }

    /// Produces the reply text for one message. Short logging commands get a
    /// canned acknowledgement without touching the network; everything else
    /// goes to Gemini with an enriched prompt, falling back to a local
    /// answer on any failure.
    pub async fn generate_reply(
        &self,
        message: &str,
        profile: &UserProfile,
        progress: &Progress,
    ) -> String {
        if let Some(ack) = canned_ack(message, progress.percentage) {
            return ack;
        }

        let prompt = enrich_prompt(&build_prompt(&profile.name, progress, message));

        let client = self.gemini.read().await.clone();
        match client {
            Some(client) => match client.ask(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(user = %profile.name, error = %e, "gemini call failed, using local fallback");
                    fallback_reply(message, &profile.name, progress, Local::now().hour())
                }
            },
            None => {
                debug!("no gemini client configured, using local fallback");
                fallback_reply(message, &profile.name, progress, Local::now().hour())
            }
        }
    }

    /// Full chat turn: log any water the message carries, snapshot progress,
    /// and produce the reply.
    pub async fn handle_message(
        &self,
        profiles: &dyn ProfileStore,
        intakes: &dyn IntakeStore,
        goals: &dyn GoalStore,
        user_id: Uuid,
        text: &str,
    ) -> Result<ChatReply, ChatError> {
        let message = text.to_lowercase();

        let profile = profiles
            .find_by_id(user_id)
            .await?
            .ok_or(ChatError::ProfileNotFound)?;

        let today = Local::now().date_naive();
        let mut intake = intakes.create_zero(user_id, today).await?;

        let extraction = extract_quantity(&message);
        if extraction.amount_ml > 0 {
            intake = intakes.add_amount(user_id, today, extraction.amount_ml).await?;
            info!(
                user_id = %user_id,
                amount_ml = extraction.amount_ml,
                total_ml = intake.amount,
                "logged water from chat"
            );
        }

        let goal_ml = goals
            .find_by_user(user_id)
            .await?
            .map(|goal| goal.amount)
            .unwrap_or(0);
        let progress = Progress::new(intake.amount, goal_ml);

        let mut reply = self.generate_reply(&message, &profile, &progress).await;

        let api_key_set = self.is_configured().await;
        if !api_key_set && !message.contains("api") && !message.contains("gemini") {
            reply.push_str(API_KEY_NOTE);
        }

        Ok(ChatReply {
            message: reply,
            current_amount: intake.amount,
            goal: goal_ml,
            percentage: progress.percentage,
            water_added: extraction.amount_ml > 0,
            api_key_set,
        })
    }
}

/// Short water-ish messages get an instant acknowledgement banded on
/// progress instead of a round trip to the API.
fn canned_ack(message: &str, percentage: u8) -> Option<String> {
    let mentions_water = CHAT_WATER_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword));
    if !mentions_water || message.split_whitespace().count() > 4 {
        return None;
    }

    let ack = if percentage >= 100 {
        format!(
            "Great job! I've updated your water intake. You've reached {percentage}% of your daily goal!"
        )
    } else if percentage >= 75 {
        format!(
            "Almost there! I've updated your water intake. You're at {percentage}% of your daily goal."
        )
    } else if percentage >= 50 {
        format!(
            "Halfway there! I've updated your water intake. You're at {percentage}% of your daily goal."
        )
    } else if percentage >= 25 {
        format!(
            "Good start! I've updated your water intake. You're at {percentage}% of your daily goal."
        )
    } else {
        format!("I've updated your water intake. You're at {percentage}% of your daily goal.")
    };
    Some(ack)
}

fn build_prompt(name: &str, progress: &Progress, message: &str) -> String {
    format!(
        r#"You are a helpful water intake assistant named WaterBuddy, helping a user track their hydration.
Be friendly, supportive, and provide useful information about hydration. Keep your responses concise and natural.

Respond to the user's message below. Here's some context:
- User's name: {name}
- Current water intake: {amount}ml
- Daily goal: {goal}ml
- Current progress: {percentage}%
- Remaining water needed: {remaining}ml

User's message: {message}

Note: If the user is asking about water intake progress, be specific with the numbers.
If they're asking about hydration tips or benefits, provide valuable information.
DO NOT mention that you're an AI or language model."#,
        amount = progress.amount_ml,
        goal = progress.goal_ml,
        percentage = progress.percentage,
        remaining = progress.remaining_ml,
    )
}

/// Appends a random fact and tip so replies stay substantive even when the
/// user's question is thin.
fn enrich_prompt(prompt: &str) -> String {
    format!(
        r#"{prompt}

Additional hydration information to consider:
1. Did you know? {fact}
2. Helpful tip: {tip}

Please provide a helpful, friendly response to the user about their water intake or hydration question.
Keep your response concise (1-3 sentences) and focused on helping them stay hydrated.
"#,
        fact = hydration_content::random_fact(),
        tip = hydration_content::random_tip(),
    )
}

/// Deterministic reply used when the API cannot. Classifies the message as a
/// progress query, tip request, fact request, or generic greeting.
fn fallback_reply(message: &str, name: &str, progress: &Progress, hour: u32) -> String {
    let percentage = progress.percentage;

    if PROGRESS_QUERIES.iter().any(|query| message.contains(query)) {
        if percentage >= 80 {
            format!(
                "You're doing great, {name}! You've had {amount}ml, which is {percentage}% of your {goal}ml goal.",
                amount = progress.amount_ml,
                goal = progress.goal_ml,
            )
        } else {
            let glasses_remaining = (progress.remaining_ml as f64 / 250.0).round() as i64;
            format!(
                "You're currently at {percentage}% of your daily goal with {amount}ml. You still need {remaining}ml to reach your {goal}ml target. That's about {glasses_remaining} more glasses.",
                amount = progress.amount_ml,
                remaining = progress.remaining_ml,
                goal = progress.goal_ml,
            )
        }
    } else if TIP_QUERIES.iter().any(|query| message.contains(query)) {
        format!("Here's a hydration tip: {}", hydration_content::random_tip())
    } else if FACT_QUERIES.iter().any(|query| message.contains(query)) {
        format!("Hydration fact: {}", hydration_content::random_fact())
    } else {
        format!(
            "Good {time_of_day}, {name}! I'm here to help you track your water intake. Currently you're at {percentage}% of your daily goal.",
            time_of_day = TimeOfDay::from_hour(hour),
        )
    }
}
