//! Shared type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UI language of an account. Closed set; string tables live with the screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Bn,
    Hi,
    Ur,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Bn => "bn",
            Locale::Hi => "hi",
            Locale::Ur => "ur",
        }
    }

    /// Map a browser language tag (e.g. `bn-BD`) to a supported locale.
    /// Unknown tags fall back to English.
    pub fn from_browser_tag(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        primary.parse().unwrap_or_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "bn" => Ok(Locale::Bn),
            "hi" => Ok(Locale::Hi),
            "ur" => Ok(Locale::Ur),
            other => Err(crate::Error::InvalidInput(format!("unsupported locale '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_tag_fallback() {
        assert_eq!(Locale::from_browser_tag("bn-BD"), Locale::Bn);
        assert_eq!(Locale::from_browser_tag("ur_PK"), Locale::Ur);
        assert_eq!(Locale::from_browser_tag("fr-FR"), Locale::En);
        assert_eq!(Locale::from_browser_tag(""), Locale::En);
    }

    #[test]
    fn test_locale_serde_tag() {
        let json = serde_json::to_string(&Locale::Hi).unwrap();
        assert_eq!(json, "\"hi\"");
        assert!("de".parse::<Locale>().is_err());
    }
}
