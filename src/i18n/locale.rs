//! Supported locales
//!
//! The closed set of languages the dashboard ships catalogs for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::I18nError;

/// A supported UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Vietnamese (default)
    #[default]
    Vi,
    /// English
    En,
    /// Japanese
    Ja,
}

const SUPPORTED: [Locale; 3] = [Locale::Vi, Locale::En, Locale::Ja];

impl Locale {
    /// All supported locales, in display order
    pub fn supported() -> &'static [Locale] {
        &SUPPORTED
    }

    /// Short identifier used in storage and on the command line
    pub fn code(self) -> &'static str {
        match self {
            Locale::Vi => "vi",
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    /// Native display name
    pub fn display_name(self) -> &'static str {
        match self {
            Locale::Vi => "Tiếng Việt",
            Locale::En => "English",
            Locale::Ja => "日本語",
        }
    }

    /// Parse a code, falling back to the default locale when unrecognised
    pub fn from_code_or_default(code: &str) -> Locale {
        code.parse().unwrap_or_default()
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vi" => Ok(Locale::Vi),
            "en" => Ok(Locale::En),
            "ja" => Ok(Locale::Ja),
            other => Err(I18nError::UnsupportedLocale(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_order() {
        assert_eq!(Locale::supported(), &[Locale::Vi, Locale::En, Locale::Ja]);
        assert_eq!(Locale::default(), Locale::Vi);
    }

    #[test]
    fn test_parse() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(" JA ".parse::<Locale>().unwrap(), Locale::Ja);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_fallback_to_default() {
        assert_eq!(Locale::from_code_or_default("fr"), Locale::Vi);
        assert_eq!(Locale::from_code_or_default(""), Locale::Vi);
        assert_eq!(Locale::from_code_or_default("ja"), Locale::Ja);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Locale::Vi.display_name(), "Tiếng Việt");
        assert_eq!(Locale::En.display_name(), "English");
        assert_eq!(Locale::Ja.display_name(), "日本語");
        assert_eq!(Locale::Ja.to_string(), "ja");
    }
}
