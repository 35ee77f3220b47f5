pub mod assistant;
pub mod gemini_api;
pub mod goal;
pub mod hydration_content;
pub mod quantity;
pub mod reminder;
pub mod tracker;
