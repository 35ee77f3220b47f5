pub mod daily_goal;
pub mod user;
pub mod water_intake;
pub mod water_reminder;
