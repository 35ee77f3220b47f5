//! Built-in hydration facts and tips woven into assistant responses.

use rand::Rng;

/// Facts appended to outbound prompts and used for fact-request fallbacks
pub const HYDRATION_FACTS: [&str; 15] = [
    "Your brain is approximately 75% water, which is why staying hydrated is crucial for cognitive function.",
    "Even mild dehydration (1-2% of body weight) can impair cognitive performance and mood.",
    "Proper hydration can reduce the risk of kidney stones by diluting stone-forming substances in urine.",
    "Drinking enough water helps maintain electrolyte balance, which is essential for nerve and muscle function.",
    "Water helps transport oxygen and nutrients to your cells, supporting overall cellular health.",
    "Hydration supports your immune system by helping your body naturally eliminate toxins and waste.",
    "Studies show that proper hydration can improve physical performance by as much as 25%.",
    "Your body's thirst mechanism becomes less effective as you age, which is why older adults need to be more mindful about drinking water.",
    "Drinking water before meals can help with weight management by creating a sense of fullness.",
    "Water helps regulate body temperature through sweating and respiration.",
    "Approximately 60% of an adult human body is water, highlighting its importance for overall health.",
    "Chronic dehydration can contribute to headaches, fatigue, and difficulty concentrating.",
    "Dark-colored urine often indicates that you need to drink more water.",
    "The Institute of Medicine recommends about 3.7 liters (125 ounces) of total water intake for men and 2.7 liters (91 ounces) for women daily.",
    "Exercise increases your water needs - you should drink about 17-20 oz of water 2-3 hours before exercise, and 7-10 oz every 10-20 minutes during activity.",
];

/// Tips appended to outbound prompts and used for tip-request fallbacks
pub const HYDRATION_TIPS: [&str; 15] = [
    "Keep a reusable water bottle with you at all times. Studies show visual reminders can increase water consumption by up to 25%.",
    "Set specific hydration goals for different parts of your day - like 500ml by lunch and another 500ml by dinner.",
    "Try the 8x8 rule: eight 8-ounce glasses of water throughout the day (about 2 liters total).",
    "Add natural flavors to your water with fruits like lemon, berries, cucumber, or herbs like mint or basil.",
    "Use a marked water bottle with time indicators to pace your drinking throughout the day.",
    "Download a water tracking app that sends you regular reminders to drink up.",
    "Create a routine by drinking a full glass of water after specific daily activities like brushing your teeth or checking email.",
    "Start your day with a full glass of water before your morning coffee or tea to kickstart hydration.",
    "Keep a glass of water on your desk while working and take sips between tasks.",
    "Eat water-rich foods like cucumber (96% water), zucchini (95%), watermelon (92%), and strawberries (91%).",
    "Set up water-drinking 'triggers' - like drinking water every time you check your phone or after each bathroom break.",
    "Try drinking through a straw, which can help increase your water consumption without even noticing.",
    "Make it a habit to drink a full glass of water before and after each meal.",
    "Replace at least one sugary beverage each day with water to improve both hydration and overall health.",
    "Use a smart water bottle that tracks your intake and glows when it's time to drink more water.",
];

pub fn random_fact() -> &'static str {
    HYDRATION_FACTS[rand::thread_rng().gen_range(0..HYDRATION_FACTS.len())]
}

pub fn random_tip() -> &'static str {
    HYDRATION_TIPS[rand::thread_rng().gen_range(0..HYDRATION_TIPS.len())]
}
