use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Unknown,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
            Language::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| anyhow!("unknown language code `{raw}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn codes_round_trip_through_from_str() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert_eq!("HI".parse::<Language>().unwrap(), Language::Hindi);
        assert!("hindi".parse::<Language>().is_err());
    }

    #[test]
    fn serde_uses_short_codes() {
        assert_eq!(serde_json::to_string(&Language::Tamil).unwrap(), "\"ta\"");
        let lang: Language = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(lang, Language::Unknown);
        assert!(serde_json::from_str::<Language>("\"fr\"").is_err());
    }
}
