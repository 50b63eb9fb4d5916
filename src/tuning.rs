//! Data-driven game balance
//!
//! Every gameplay constant a designer might want to retune lives here, with
//! defaults matching the shipped levels. A `Tuning` is loaded once and
//! shared read-only by every state of a run.

use serde::{Deserialize, Serialize};

/// Balance constants for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration, cells/s²
    pub gravity: f32,
    /// Player horizontal speed, cells/s
    pub player_x_speed: f32,
    /// Horizontal speed while a speed boost is active
    pub boosted_x_speed: f32,
    /// Jump impulse, cells/s
    pub jump_speed: f32,
    /// Jump impulse while a jump boost is active
    pub boosted_jump_speed: f32,
    /// Monster patrol speed, cells/s
    pub monster_speed: f32,
    /// Shield window, seconds
    pub shield_duration: f32,
    /// Speed/jump boost window, seconds
    pub boost_duration: f32,
    /// Seconds the final frame keeps rendering after a terminal status
    pub linger_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            player_x_speed: 8.0,
            boosted_x_speed: 12.0,
            jump_speed: 17.0,
            boosted_jump_speed: 24.0,
            monster_speed: 4.0,
            shield_duration: 5.0,
            boost_duration: 8.0,
            linger_secs: 1.0,
        }
    }
}

impl Tuning {
    /// Load from JSON. Missing fields keep their defaults, so a tuning file
    /// only has to name what it overrides.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_balance() {
        let t = Tuning::default();
        assert_eq!(t.gravity, 30.0);
        assert_eq!(t.player_x_speed, 8.0);
        assert_eq!(t.jump_speed, 17.0);
        assert_eq!(t.shield_duration, 5.0);
        assert_eq!(t.boost_duration, 8.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let t = Tuning::from_json_str(r#"{"gravity": 12.5, "monster_speed": 6.0}"#).unwrap();
        assert_eq!(t.gravity, 12.5);
        assert_eq!(t.monster_speed, 6.0);
        // Untouched fields keep their defaults
        assert_eq!(t.jump_speed, 17.0);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Tuning::from_json_str("{gravity:}").is_err());
    }
}
