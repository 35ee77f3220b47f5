//! Parses free-form chat text for water quantities.

const UNIT_HINTS: [&str; 5] = ["water", "glass", "cup", "ml", "bottle"];
const GLASS_UNITS: [&str; 4] = ["glass", "glasses", "cup", "cups"];
const BOTTLE_UNITS: [&str; 2] = ["bottle", "bottles"];

const GLASS_ML: i64 = 250;
const BOTTLE_ML: i64 = 500;

/// Outcome of scanning one chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityMatch {
    /// Milliliters to log; 0 when the message carried no usable number
    pub amount_ml: i64,
    /// True when the message was shaped like a logging command
    pub is_command: bool,
}

/// Scans an already-lowercased chat message for a water amount.
///
/// A bare "add" means one glass. A bare number is taken as milliliters.
/// Otherwise an "add ..." phrase is scanned for its first numeric token,
/// with the following token deciding the unit: glasses and cups are 250 ml,
/// bottles 500 ml, anything else milliliters as written.
pub fn extract_quantity(message: &str) -> QuantityMatch {
    let trimmed = message.trim();

    if trimmed == "add" {
        return QuantityMatch {
            amount_ml: GLASS_ML,
            is_command: true,
        };
    }

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(amount) = trimmed.parse::<i64>() {
            return QuantityMatch {
                amount_ml: amount,
                is_command: true,
            };
        }
        // Digit runs too long for i64 fall through as ordinary text
    }

    let mentions_unit = UNIT_HINTS.iter().any(|hint| message.contains(hint));
    let words: Vec<&str> = message.split_whitespace().collect();
    if message.contains("add") && (mentions_unit || words.len() <= 3) {
        for (i, word) in words.iter().enumerate() {
            // Peel units off tokens like "300ml" before parsing
            let digits: String = word.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                continue;
            }
            let Ok(num) = digits.parse::<i64>() else {
                continue;
            };
            let amount = match words.get(i + 1) {
                Some(next) if GLASS_UNITS.iter().any(|unit| next.contains(unit)) => {
                    num.saturating_mul(GLASS_ML)
                }
                Some(next) if BOTTLE_UNITS.iter().any(|unit| next.contains(unit)) => {
                    num.saturating_mul(BOTTLE_ML)
                }
                // Milliliters when the unit is absent or unrecognized
                _ => num,
            };
            return QuantityMatch {
                amount_ml: amount,
                is_command: true,
            };
        }
        return QuantityMatch {
            amount_ml: 0,
            is_command: true,
        };
    }

    QuantityMatch {
        amount_ml: 0,
        is_command: false,
    }
}
