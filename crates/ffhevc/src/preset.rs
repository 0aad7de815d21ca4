use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// x265 speed preset passed through `-preset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Fast,
    #[default]
    Medium,
    Slow,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Fast => "fast",
            Preset::Medium => "medium",
            Preset::Slow => "slow",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(Preset::Fast),
            "medium" => Ok(Preset::Medium),
            "slow" => Ok(Preset::Slow),
            other => Err(format!("unknown preset '{}' (expected fast, medium or slow)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parse() {
        assert_eq!("fast".parse::<Preset>().unwrap(), Preset::Fast);
        assert_eq!("slow".parse::<Preset>().unwrap(), Preset::Slow);
        assert!("veryslow".parse::<Preset>().is_err());
        assert_eq!(Preset::default(), Preset::Medium);
    }

    #[test]
    fn test_preset_serde() {
        let json = serde_json::to_string(&Preset::Slow).unwrap();
        assert_eq!(json, "\"slow\"");
        let preset: Preset = serde_json::from_str("\"fast\"").unwrap();
        assert_eq!(preset, Preset::Fast);
    }
}
