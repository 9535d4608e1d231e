use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The areas of law offered when opening a new case. Stored as the raw
/// `value()` string so older rows with other values still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AreaOfLaw {
    Criminal,
    Civil,
    Corporate,
    Family,
    Intellectual,
}

impl AreaOfLaw {
    pub const ALL: [AreaOfLaw; 5] = [
        AreaOfLaw::Criminal,
        AreaOfLaw::Civil,
        AreaOfLaw::Corporate,
        AreaOfLaw::Family,
        AreaOfLaw::Intellectual,
    ];

    pub fn value(self) -> &'static str {
        match self {
            AreaOfLaw::Criminal => "criminal",
            AreaOfLaw::Civil => "civil",
            AreaOfLaw::Corporate => "corporate",
            AreaOfLaw::Family => "family",
            AreaOfLaw::Intellectual => "intellectual",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AreaOfLaw::Criminal => "Criminal Law",
            AreaOfLaw::Civil => "Civil Law",
            AreaOfLaw::Corporate => "Corporate Law",
            AreaOfLaw::Family => "Family Law",
            AreaOfLaw::Intellectual => "Intellectual Property Law",
        }
    }

    /// Display label for a stored value; unknown values are shown as-is.
    pub fn label_for(raw: &str) -> &str {
        match raw.parse::<AreaOfLaw>() {
            Ok(area) => area.label(),
            Err(_) => raw,
        }
    }
}

impl fmt::Display for AreaOfLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown area of law `{0}`")]
pub struct UnknownAreaOfLaw(pub String);

impl FromStr for AreaOfLaw {
    type Err = UnknownAreaOfLaw;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AreaOfLaw::ALL
            .into_iter()
            .find(|area| area.value().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAreaOfLaw(s.to_string()))
    }
}
