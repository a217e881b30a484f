//! Data kind selector definitions.

use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Which files a job downloads.
///
/// Deserializes from a name (`"tick"`, `"tc"`, ...) or from the numeric code
/// used by older JSON configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Structure files plus tick and trade files for every day.
    All,
    /// Tick and trade files for every day.
    Both,
    /// Tick files only.
    Tick,
    /// Trade (TC) files only.
    Trade,
    /// The two fixed structure files only.
    Structure,
}

impl DataKind {
    /// Kind for a numeric code: 0 all, 1 both, 2 tick, 3 trade, 4 structure.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DataKind::All),
            1 => Some(DataKind::Both),
            2 => Some(DataKind::Tick),
            3 => Some(DataKind::Trade),
            4 => Some(DataKind::Structure),
            _ => None,
        }
    }

    /// Whether the fixed structure files are part of the job.
    pub fn needs_structure(self) -> bool {
        matches!(self, DataKind::All | DataKind::Structure)
    }

    pub fn needs_tick(self) -> bool {
        matches!(self, DataKind::All | DataKind::Both | DataKind::Tick)
    }

    pub fn needs_trade(self) -> bool {
        matches!(self, DataKind::All | DataKind::Both | DataKind::Trade)
    }

    /// Whether the job depends on a date range at all.
    pub fn needs_range(self) -> bool {
        self != DataKind::Structure
    }

    /// Files produced per published day.
    pub fn files_per_day(self) -> u32 {
        u32::from(self.needs_tick()) + u32::from(self.needs_trade())
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::All => write!(f, "all"),
            DataKind::Both => write!(f, "both"),
            DataKind::Tick => write!(f, "tick"),
            DataKind::Trade => write!(f, "trade"),
            DataKind::Structure => write!(f, "structure"),
        }
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DataKind::All),
            "both" => Ok(DataKind::Both),
            "tick" => Ok(DataKind::Tick),
            "trade" | "tc" => Ok(DataKind::Trade),
            "structure" | "ds" => Ok(DataKind::Structure),
            _ => Err(format!("Unknown data kind: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for DataKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u8),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => DataKind::from_code(code).ok_or_else(|| {
                de::Error::custom(format!("data kind code must be within [0, 5) (got {})", code))
            }),
            Raw::Name(name) => name.parse().map_err(de::Error::custom),
        }
    }
}
