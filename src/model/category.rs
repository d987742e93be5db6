use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// Complaint categories, listed in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Garbage,
    Streetlight,
    WaterLeak,
    RoadDamage,
    Drainage,
    Other,
}

impl Category {
    pub const COUNT: usize = 6;

    /// Fixed enumeration order. On equal scores the earlier entry wins.
    pub const ALL: [Category; Category::COUNT] = [
        Category::Garbage,
        Category::Streetlight,
        Category::WaterLeak,
        Category::RoadDamage,
        Category::Drainage,
        Category::Other,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Garbage => "garbage",
            Category::Streetlight => "streetlight",
            Category::WaterLeak => "water_leak",
            Category::RoadDamage => "road_damage",
            Category::Drainage => "drainage",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|cat| cat.as_str() == normalized)
            .ok_or_else(|| anyhow!("unknown category `{raw}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn index_follows_enumeration_order() {
        for (pos, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), pos);
        }
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("water_leak".parse::<Category>().unwrap(), Category::WaterLeak);
        assert_eq!(" Road_Damage ".parse::<Category>().unwrap(), Category::RoadDamage);
        assert!("potholes".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Category::RoadDamage).unwrap();
        assert_eq!(json, "\"road_damage\"");
        let back: Category = serde_json::from_str("\"streetlight\"").unwrap();
        assert_eq!(back, Category::Streetlight);
    }
}
