//! Theme selection and light/dark mode
//!
//! Only the choice is modelled here; colour tables belong to the renderer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKey {
    #[default]
    Default,
    Lavender,
    Royal,
    Mint,
    Sunset,
    Coffee,
    Autumn,
    Ocean,
}

impl ThemeKey {
    /// Every theme in picker order
    pub const ALL: [ThemeKey; 8] = [
        ThemeKey::Default,
        ThemeKey::Lavender,
        ThemeKey::Royal,
        ThemeKey::Mint,
        ThemeKey::Sunset,
        ThemeKey::Coffee,
        ThemeKey::Autumn,
        ThemeKey::Ocean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemeKey::Default => "default",
            ThemeKey::Lavender => "lavender",
            ThemeKey::Royal => "royal",
            ThemeKey::Mint => "mint",
            ThemeKey::Sunset => "sunset",
            ThemeKey::Coffee => "coffee",
            ThemeKey::Autumn => "autumn",
            ThemeKey::Ocean => "ocean",
        }
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ThemeKey::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown theme: '{}'", s))
    }
}

/// User appearance preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(default)]
    pub theme: ThemeKey,
    #[serde(default)]
    pub dark: bool,
}

impl Appearance {
    pub fn toggle_dark(&mut self) {
        self.dark = !self.dark;
    }

    pub fn set_theme(&mut self, theme: ThemeKey) {
        self.theme = theme;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_appearance() {
        let appearance = Appearance::default();
        assert_eq!(appearance.theme, ThemeKey::Default);
        assert!(!appearance.dark);
    }

    #[test]
    fn test_toggle_dark() {
        let mut appearance = Appearance::default();
        appearance.toggle_dark();
        assert!(appearance.dark);
        appearance.toggle_dark();
        assert!(!appearance.dark);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("Ocean".parse::<ThemeKey>().unwrap(), ThemeKey::Ocean);
        assert_eq!(" mint ".parse::<ThemeKey>().unwrap(), ThemeKey::Mint);
        assert!("neon".parse::<ThemeKey>().is_err());
    }

    #[test]
    fn test_serialization() {
        let appearance = Appearance {
            theme: ThemeKey::Sunset,
            dark: true,
        };
        let json = serde_json::to_string(&appearance).unwrap();
        assert_eq!(json, r#"{"theme":"sunset","dark":true}"#);
        let parsed: Appearance = serde_json::from_str(r#"{"theme":"royal"}"#).unwrap();
        assert_eq!(parsed.theme, ThemeKey::Royal);
        assert!(!parsed.dark);
    }
}
