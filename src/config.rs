//! Match rule configuration.
//!
//! The defaults are the standard rules: 3 reinforcements per turn, a win at
//! `territories - 3` owned, up to 3 attacking and 2 defending dice.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors raised while loading or adjusting a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunable rule constants for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Armies granted at the start of each Reinforce phase.
    pub reinforcements_per_turn: u32,
    /// A player wins on owning exactly `territories - win_margin`.
    pub win_margin: usize,
    pub max_attack_dice: u32,
    pub max_defense_dice: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            reinforcements_per_turn: 3,
            win_margin: 3,
            max_attack_dice: 3,
            max_defense_dice: 2,
        }
    }
}

impl MatchConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both sides can always roll at least one die.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("max_attack_dice", self.max_attack_dice),
            ("max_defense_dice", self.max_defense_dice),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Reads a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Sets a single option by its protocol name.
    ///
    /// Known names are `Reinforcements`, `WinMargin`, `AttackDice` and
    /// `DefenseDice`. Dice counts must be at least 1.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        let mut next = *self;
        match name {
            "Reinforcements" => {
                next.reinforcements_per_turn = value.parse().map_err(|_| invalid())?;
            }
            "WinMargin" => {
                next.win_margin = value.parse().map_err(|_| invalid())?;
            }
            "AttackDice" => {
                next.max_attack_dice = value.parse().map_err(|_| invalid())?;
            }
            "DefenseDice" => {
                next.max_defense_dice = value.parse().map_err(|_| invalid())?;
            }
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        }
        next.validate().map_err(|_| invalid())?;
        *self = next;
        Ok(())
    }

    /// Number of owned territories that ends the game on a board of `count`.
    ///
    /// None when the board has no more than `win_margin` territories; owning
    /// nothing never counts as a win.
    pub fn win_threshold(&self, count: usize) -> Option<usize> {
        count.checked_sub(self.win_margin).filter(|&t| t > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_standard_rules() {
        let c = MatchConfig::default();
        assert_eq!(c.reinforcements_per_turn, 3);
        assert_eq!(c.win_margin, 3);
        assert_eq!(c.max_attack_dice, 3);
        assert_eq!(c.max_defense_dice, 2);
        assert_eq!(c.win_threshold(14), Some(11));
    }

    #[test]
    fn json_fills_missing_fields() {
        let c = MatchConfig::from_json(r#"{"reinforcements_per_turn": 5}"#).unwrap();
        assert_eq!(c.reinforcements_per_turn, 5);
        assert_eq!(c.win_margin, 3);
    }

    #[test]
    fn json_rejects_zero_dice() {
        let err = MatchConfig::from_json(r#"{"max_attack_dice": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref name, .. } if name == "max_attack_dice"
        ));
        assert!(matches!(
            MatchConfig::from_json(r#"{"max_defense_dice": 0}"#),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(MatchConfig::from_json(r#"{"max_attack_dice": 1}"#).is_ok());
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(matches!(MatchConfig::from_json("[1,2"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn set_option_updates_fields() {
        let mut c = MatchConfig::default();
        c.set_option("Reinforcements", "4").unwrap();
        c.set_option("WinMargin", "0").unwrap();
        c.set_option("AttackDice", "2").unwrap();
        c.set_option("DefenseDice", "1").unwrap();
        assert_eq!(
            c,
            MatchConfig {
                reinforcements_per_turn: 4,
                win_margin: 0,
                max_attack_dice: 2,
                max_defense_dice: 1,
            }
        );
    }

    #[test]
    fn set_option_rejects_bad_input() {
        let mut c = MatchConfig::default();
        assert!(matches!(
            c.set_option("Threads", "4"),
            Err(ConfigError::UnknownOption(_))
        ));
        assert!(matches!(
            c.set_option("AttackDice", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            c.set_option("WinMargin", "-1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(c, MatchConfig::default());
    }

    #[test]
    fn no_threshold_on_tiny_maps() {
        let c = MatchConfig::default();
        assert_eq!(c.win_threshold(3), None);
        assert_eq!(c.win_threshold(2), None);
        assert_eq!(c.win_threshold(4), Some(1));
    }
}
