//! Which physical camera a stream is bound to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Facing mode of a camera.
///
/// Serialized with the platform's constraint names (`environment`, `user`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera.
    #[default]
    Environment,
    /// Front camera.
    User,
}

impl FacingMode {
    /// Returns the other camera.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }

    /// Constraint value understood by the platform.
    pub fn as_str(self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }

    /// Short human label ("back" / "front").
    pub fn label(self) -> &'static str {
        match self {
            FacingMode::Environment => "back",
            FacingMode::User => "front",
        }
    }
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown facing mode.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown facing mode '{0}' (expected environment/back or user/front)")]
pub struct ParseFacingModeError(String);

impl FromStr for FacingMode {
    type Err = ParseFacingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "environment" | "back" | "rear" => Ok(FacingMode::Environment),
            "user" | "front" => Ok(FacingMode::User),
            other => Err(ParseFacingModeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_toggles() {
        assert_eq!(FacingMode::Environment.opposite(), FacingMode::User);
        assert_eq!(FacingMode::User.opposite().opposite(), FacingMode::User);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("front".parse::<FacingMode>().unwrap(), FacingMode::User);
        assert_eq!("Rear".parse::<FacingMode>().unwrap(), FacingMode::Environment);
        assert!("sideways".parse::<FacingMode>().is_err());
    }

    #[test]
    fn test_default_is_rear() {
        assert_eq!(FacingMode::default(), FacingMode::Environment);
    }
}
