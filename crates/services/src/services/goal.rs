//! Goal and progress math for daily hydration. Everything here is pure;
//! callers fetch the rows and pass them in.

use std::collections::HashMap;

use chrono::NaiveDate;
use db::models::water_intake::WaterIntake;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

const BASE_ML_PER_KG: f64 = 35.0;
const MIN_GOAL_ML: i64 = 1500;

const ACTIVE_TERMS: [&str; 6] = [
    "athlete",
    "construction",
    "fitness",
    "trainer",
    "labor",
    "worker",
];
const SEDENTARY_TERMS: [&str; 5] = ["office", "desk", "computer", "programmer", "developer"];

/// Recommended daily intake in milliliters.
///
/// 35 ml per kg of body weight, nudged for age (over 65 down, under 18 up)
/// and profession. Profession matching is by substring against an active
/// and a sedentary term list; each list applies its multiplier at most
/// once, and a title like "office worker" hits both. Rounded to the
/// nearest 100 ml with a 1500 ml floor.
pub fn recommended_goal_ml(weight_kg: f64, age: u32, profession: &str) -> i64 {
    let mut base = weight_kg * BASE_ML_PER_KG;

    if age > 65 {
        base *= 0.9;
    } else if age < 18 {
        base *= 1.1;
    }

    let profession = profession.to_lowercase();
    if ACTIVE_TERMS.iter().any(|term| profession.contains(term)) {
        base *= 1.3;
    }
    if SEDENTARY_TERMS.iter().any(|term| profession.contains(term)) {
        base *= 0.9;
    }

    let rounded = ((base / 100.0).round() as i64) * 100;
    rounded.max(MIN_GOAL_ML)
}

/// Share of the goal consumed, clamped to 0..=100.
/// A missing or zero goal reads as 0.
pub fn percentage_of_goal(amount_ml: i64, goal_ml: i64) -> u8 {
    if goal_ml <= 0 {
        return 0;
    }
    let raw = (amount_ml as f64 / goal_ml as f64 * 100.0).round();
    raw.clamp(0.0, 100.0) as u8
}

/// Snapshot of a day's intake against the goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
pub struct Progress {
    pub amount_ml: i64,
    pub goal_ml: i64,
    pub percentage: u8,
    pub goal_achieved: bool,
    pub remaining_ml: i64,
}

impl Progress {
    pub fn new(amount_ml: i64, goal_ml: i64) -> Self {
        Self {
            amount_ml,
            goal_ml,
            percentage: percentage_of_goal(amount_ml, goal_ml),
            goal_achieved: goal_ml > 0 && amount_ml >= goal_ml,
            remaining_ml: (goal_ml - amount_ml).max(0),
        }
    }
}

/// Consecutive days at or above goal, ending today.
///
/// The walk starts at yesterday and stops at the first missing or
/// under-goal day; today joins the count only once its own record meets
/// the goal. Without a positive goal there is no streak.
pub fn current_streak(history: &[WaterIntake], goal_ml: i64, today: NaiveDate) -> u32 {
    if goal_ml <= 0 {
        return 0;
    }

    let by_date: HashMap<NaiveDate, i64> = history
        .iter()
        .map(|record| (record.date, record.amount))
        .collect();

    let mut streak = 0u32;
    let mut check = today.pred_opt();
    while let Some(date) = check {
        match by_date.get(&date) {
            Some(amount) if *amount >= goal_ml => {
                streak += 1;
                check = date.pred_opt();
            }
            _ => break,
        }
    }

    if by_date.get(&today).is_some_and(|amount| *amount >= goal_ml) {
        streak += 1;
    }

    streak
}

/// Achievement flags, recomputed on every request and never stored
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
pub struct Badges {
    pub first_day: bool,
    pub week_streak: bool,
    pub month_perfect: bool,
    pub overachiever: bool,
    pub early_bird: bool,
    pub night_owl: bool,
    pub consistency: bool,
    pub goal_setter: bool,
}

/// Derives badges from the full history (date ascending) and the current
/// streak. The last four are streak-based placeholders; real time-of-day
/// and goal-change tracking does not exist yet.
pub fn compute_badges(history: &[WaterIntake], goal_ml: i64, streak: u32) -> Badges {
    // A full week at half again over goal. With fewer than seven records
    // the badge cannot trigger.
    let overachiever_days = history
        .iter()
        .rev()
        .take(7)
        .filter(|record| {
            goal_ml > 0 && record.amount.saturating_mul(2) >= goal_ml.saturating_mul(3)
        })
        .count();

    Badges {
        first_day: !history.is_empty(),
        week_streak: streak >= 7,
        month_perfect: streak >= 30,
        overachiever: overachiever_days >= 7,
        early_bird: streak >= 5,
        night_owl: streak >= 5,
        consistency: streak >= 10,
        goal_setter: streak >= 10,
    }
}

/// Streak plus badges for the insights screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
pub struct HydrationInsights {
    pub streak: u32,
    pub badges: Badges,
}

impl HydrationInsights {
    pub fn compute(history: &[WaterIntake], goal_ml: i64, today: NaiveDate) -> Self {
        let streak = current_streak(history, goal_ml, today);
        let badges = compute_badges(history, goal_ml, streak);
        Self { streak, badges }
    }
}
