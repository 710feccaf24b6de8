//! Alert severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical warning level.
///
/// `Unknown` covers every token the feed may send outside the three warning
/// colours, including its "no hazard" green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Yellow,
    Orange,
    Red,
    Unknown,
}

impl AlertLevel {
    /// Map a raw feed token. Case-insensitive and total.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "yellow" => AlertLevel::Yellow,
            "orange" => AlertLevel::Orange,
            "red" => AlertLevel::Red,
            _ => AlertLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Yellow => "yellow",
            AlertLevel::Orange => "orange",
            AlertLevel::Red => "red",
            AlertLevel::Unknown => "unknown",
        }
    }

    /// Badge text shown on an alert card.
    pub fn badge_label(&self) -> &'static str {
        match self {
            AlertLevel::Yellow => "AMARELO",
            AlertLevel::Orange => "LARANJA",
            AlertLevel::Red => "VERMELHO",
            AlertLevel::Unknown => "ALERTA",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AlertLevel::Unknown)
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertLevel {
    type Err = String;

    /// Strict parse for user input; unlike [`AlertLevel::from_token`] this
    /// rejects anything that is not a level name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown" => Ok(AlertLevel::Unknown),
            other => match AlertLevel::from_token(other) {
                AlertLevel::Unknown => Err(format!("unknown level: {}", other)),
                level => Ok(level),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_case_insensitive() {
        assert_eq!(AlertLevel::from_token("ORANGE"), AlertLevel::Orange);
        assert_eq!(AlertLevel::from_token("Red"), AlertLevel::Red);
        assert_eq!(AlertLevel::from_token(" yellow "), AlertLevel::Yellow);
    }

    #[test]
    fn test_from_token_is_total() {
        for token in ["green", "", "purple", "3", "REDD"] {
            assert_eq!(AlertLevel::from_token(token), AlertLevel::Unknown);
        }
    }

    #[test]
    fn test_badge_labels() {
        assert_eq!(AlertLevel::Yellow.badge_label(), "AMARELO");
        assert_eq!(AlertLevel::Unknown.badge_label(), "ALERTA");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AlertLevel::Orange).unwrap();
        assert_eq!(json, "\"orange\"");
        let level: AlertLevel = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(level, AlertLevel::Red);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("green".parse::<AlertLevel>().is_err());
        assert_eq!("unknown".parse::<AlertLevel>(), Ok(AlertLevel::Unknown));
    }
}
