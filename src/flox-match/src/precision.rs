//! Search precision levels
//!
//! Mirrors the launcher's `QuerySearchPrecision` setting. Lower levels accept
//! weaker acronym matches.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Minimum acronym score required to accept an acronym match
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(try_from = "String")]
pub enum SearchPrecision {
    #[default]
    Regular,
    Low,
    None,
}

impl SearchPrecision {
    /// Threshold on the 0-100 acronym score scale
    pub const fn threshold(self) -> u32 {
        match self {
            Self::Regular => 50,
            Self::Low => 20,
            Self::None => 0,
        }
    }

    /// Setting name as stored by the launcher
    pub const fn name(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Low => "Low",
            Self::None => "None",
        }
    }
}

impl fmt::Display for SearchPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchPrecision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "low" => Ok(Self::Low),
            "none" => Ok(Self::None),
            _ => Err(Error::UnknownPrecision(s.to_string())),
        }
    }
}

impl TryFrom<String> for SearchPrecision {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SearchPrecision> for u32 {
    fn from(precision: SearchPrecision) -> Self {
        precision.threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(SearchPrecision::Regular.threshold(), 50);
        assert_eq!(SearchPrecision::Low.threshold(), 20);
        assert_eq!(SearchPrecision::None.threshold(), 0);
    }

    #[test]
    fn test_default_is_regular() {
        assert_eq!(SearchPrecision::default(), SearchPrecision::Regular);
    }

    #[test]
    fn test_parse_setting_names() {
        assert_eq!("Regular".parse::<SearchPrecision>().unwrap(), SearchPrecision::Regular);
        assert_eq!("low".parse::<SearchPrecision>().unwrap(), SearchPrecision::Low);
        assert_eq!(" NONE ".parse::<SearchPrecision>().unwrap(), SearchPrecision::None);
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "High".parse::<SearchPrecision>().unwrap_err();
        assert!(matches!(err, Error::UnknownPrecision(ref s) if s == "High"));
    }

    #[derive(Debug, Deserialize)]
    struct Setting {
        precision: SearchPrecision,
    }

    #[test]
    fn test_deserialize_any_case() {
        for (input, expected) in [
            ("precision = \"low\"", SearchPrecision::Low),
            ("precision = \"Low\"", SearchPrecision::Low),
            ("precision = \"REGULAR\"", SearchPrecision::Regular),
            ("precision = \"None\"", SearchPrecision::None),
        ] {
            let setting: Setting = toml::from_str(input).unwrap();
            assert_eq!(setting.precision, expected, "{input}");
        }
    }

    #[test]
    fn test_deserialize_unknown_name() {
        assert!(toml::from_str::<Setting>("precision = \"High\"").is_err());
    }

    #[test]
    fn test_serialize_uses_setting_name() {
        #[derive(Serialize)]
        struct Out {
            precision: SearchPrecision,
        }
        let out = toml::to_string(&Out { precision: SearchPrecision::Low }).unwrap();
        assert_eq!(out.trim(), "precision = \"Low\"");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for precision in [SearchPrecision::Regular, SearchPrecision::Low, SearchPrecision::None] {
            assert_eq!(precision.to_string().parse::<SearchPrecision>().unwrap(), precision);
        }
    }
}
