use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target languages a card or dialogue line can be practised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (default)
    #[default]
    En,
    /// Spanish
    Es,
    /// Japanese
    Ja,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Es, Language::Ja];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Ja => "ja",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Ja => "Japanese",
        }
    }

    /// BCP-47 tag handed to the speaker and recognizer
    pub fn speech_tag(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Es => "es-ES",
            Language::Ja => "ja-JP",
        }
    }

    /// Next language in `ALL`, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown language '{0}' (expected one of: en, es, ja)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "ja" => Ok(Language::Ja),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!(" ES ".parse::<Language>().unwrap(), Language::Es);
        assert_eq!("ja".parse::<Language>().unwrap(), Language::Ja);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_speech_tags() {
        assert_eq!(Language::En.speech_tag(), "en-US");
        assert_eq!(Language::Es.speech_tag(), "es-ES");
        assert_eq!(Language::Ja.speech_tag(), "ja-JP");
    }

    #[test]
    fn test_next_cycles() {
        assert_eq!(Language::En.next(), Language::Es);
        assert_eq!(Language::Es.next(), Language::Ja);
        assert_eq!(Language::Ja.next(), Language::En);
    }
}
