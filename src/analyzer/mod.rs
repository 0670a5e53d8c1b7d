//! Password Analyzer - pure strength scoring
//!
//! Side-effect-free functions over a plaintext password. Strength requires
//! length >= 8 plus one uppercase letter, one lowercase letter, one digit,
//! and one character from the fixed special set. The 0-100 score is
//! order-preserving with [`is_strong`]: strong passwords always score at
//! least [`STRONG_FLOOR`], weak ones never reach it.

use serde::{Deserialize, Serialize};

/// Special characters accepted by the strength rule
pub const SPECIAL_CHARS: &str = "@$!%*?&";

/// Minimum score a strong password can receive
pub const STRONG_FLOOR: u8 = 80;

/// Score below which a password is classified weak
const MEDIUM_FLOOR: u8 = 50;

/// Strength classification of a password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    /// Classify a score on the 0-100 scale
    pub fn from_score(score: u8) -> Self {
        if score >= STRONG_FLOOR {
            Strength::Strong
        } else if score >= MEDIUM_FLOOR {
            Strength::Medium
        } else {
            Strength::Weak
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strength::Weak => write!(f, "weak"),
            Strength::Medium => write!(f, "medium"),
            Strength::Strong => write!(f, "strong"),
        }
    }
}

/// True iff the password meets every strength requirement
pub fn is_strong(password: &str) -> bool {
    if password.chars().count() < 8 {
        return false;
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_uppercase() {
            has_upper = true;
        } else if c.is_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if SPECIAL_CHARS.contains(c) {
            has_special = true;
        }
    }

    has_upper && has_lower && has_digit && has_special
}

/// Strength score on a 0-100 scale
///
/// Strong passwords start at [`STRONG_FLOOR`] and earn up to 20 more for
/// length beyond 8 characters. Weak passwords accumulate length and
/// character-class points but are capped just below the floor.
pub fn score(password: &str) -> u8 {
    let len = password.chars().count();

    if is_strong(password) {
        let extra = ((len.saturating_sub(8)) * 5).min(20) as u8;
        return STRONG_FLOOR + extra;
    }

    let mut classes = 0u8;
    if password.chars().any(|c| c.is_uppercase()) {
        classes += 1;
    }
    if password.chars().any(|c| c.is_lowercase()) {
        classes += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        classes += 1;
    }
    if password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        classes += 1;
    }

    let length_points = (len * 4).min(40) as u8;
    (length_points + classes * 10).min(STRONG_FLOOR - 1)
}

/// Classify a password directly
pub fn classify(password: &str) -> Strength {
    Strength::from_score(score(password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_strong_accepts_full_mix() {
        assert!(is_strong("Secret123!"));
        assert!(is_strong("Aa1@aaaa"));
    }

    #[test]
    fn test_is_strong_rejects_short() {
        assert!(!is_strong("abc"));
        assert!(!is_strong("Aa1@aaa")); // 7 chars
    }

    #[test]
    fn test_is_strong_requires_every_class() {
        assert!(!is_strong("alllowercase1!")); // no uppercase
        assert!(!is_strong("ALLUPPERCASE1!")); // no lowercase
        assert!(!is_strong("NoDigitsHere!")); // no digit
        assert!(!is_strong("NoSpecials123")); // no special
    }

    #[test]
    fn test_special_set_is_fixed() {
        // '#' is not in the accepted set
        assert!(!is_strong("Secret123#"));
        assert!(is_strong("Secret123&"));
    }

    #[test]
    fn test_score_order_preserving() {
        // Any strong password outranks any weak one
        let strong = ["Secret123!", "Aa1@aaaa", "LongerPassw0rd?"];
        let weak = ["abc", "alllowercase1!", "correcthorsebatterystaple"];

        for s in strong {
            assert!(score(s) >= STRONG_FLOOR, "{} should score strong", s);
            for w in weak {
                assert!(score(s) > score(w), "{} should outrank {}", s, w);
            }
        }
    }

    #[test]
    fn test_score_rewards_length() {
        assert!(score("Secret123!Secret") > score("Aa1@aaaa"));
        assert!(score("password") > score("pw"));
    }

    #[test]
    fn test_score_capped_at_100() {
        assert!(score("Averylongpassword123!withlotsofentropy?") <= 100);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify("Secret123!"), Strength::Strong);
        assert_eq!(classify("abc"), Strength::Weak);
        // Long with three classes: capped below strong but above medium floor
        assert_eq!(classify("alllowercase1!"), Strength::Medium);
    }
}
