//! Ranking preference.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::DomainError;

/// The criterion used to order candidate itineraries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    /// Shortest total travel time first
    #[default]
    Time,
    /// Cheapest first
    Cost,
    /// Fewest transfers first
    Switches,
}

impl Preference {
    /// The wire name of this preference.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Time => "time",
            Preference::Cost => "cost",
            Preference::Switches => "switches",
        }
    }

    /// Label appended to itinerary names, e.g. "Route 1 (Cost Efficient)".
    pub fn label(&self) -> &'static str {
        match self {
            Preference::Time => "Time Efficient",
            Preference::Cost => "Cost Efficient",
            Preference::Switches => "Minimum Switching",
        }
    }
}

impl FromStr for Preference {
    type Err = DomainError;

    /// Parses case-insensitively; "transfers" is accepted as an alias for
    /// "switches".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(Preference::Time),
            "cost" => Ok(Preference::Cost),
            "switches" | "transfers" => Ok(Preference::Switches),
            _ => Err(DomainError::UnknownPreference(s.to_string())),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_values() {
        assert_eq!("time".parse::<Preference>(), Ok(Preference::Time));
        assert_eq!(" COST ".parse::<Preference>(), Ok(Preference::Cost));
        assert_eq!("Switches".parse::<Preference>(), Ok(Preference::Switches));
        assert_eq!("transfers".parse::<Preference>(), Ok(Preference::Switches));
    }

    #[test]
    fn parse_unknown_fails() {
        assert_eq!(
            "fastest".parse::<Preference>(),
            Err(DomainError::UnknownPreference("fastest".into()))
        );
    }

    #[test]
    fn default_is_time() {
        assert_eq!(Preference::default(), Preference::Time);
    }

    #[test]
    fn labels() {
        assert_eq!(Preference::Time.label(), "Time Efficient");
        assert_eq!(Preference::Cost.label(), "Cost Efficient");
        assert_eq!(Preference::Switches.label(), "Minimum Switching");
    }
}
