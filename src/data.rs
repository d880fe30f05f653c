//! Practice data: vocabulary decks and conversation scenes
//!
//! The data file is JSON shaped as `{ "decks": { id: Deck }, "conversations": [Scene] }`.
//! A small sample set is compiled into the binary for running without one.

use crate::lang::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const UNCATEGORIZED: &str = "Uncategorized";

const SAMPLE_JSON: &str = include_str!("../data/sample.json");

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid practice data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Card {
    /// Native-language gloss shown on the back
    #[serde(default)]
    pub zh: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Card {
    /// Target-language text; an empty string counts as missing
    pub fn text(&self, lang: Language) -> Option<&str> {
        non_empty(match lang {
            Language::En => &self.en,
            Language::Es => &self.es,
            Language::Ja => &self.ja,
        })
    }

    pub fn note(&self) -> Option<&str> {
        non_empty(&self.note)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub role: String,
    #[serde(default)]
    pub zh: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ja: Option<String>,
}

impl Line {
    pub fn text(&self, lang: Language) -> Option<&str> {
        non_empty(match lang {
            Language::En => &self.en,
            Language::Es => &self.es,
            Language::Ja => &self.ja,
        })
    }
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Scene {
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Which categories to draw cards or scenes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// `"all"` (any case) selects everything, anything else names a category
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(s.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Named(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub decks: BTreeMap<String, Deck>,
    #[serde(default)]
    pub conversations: Vec<Scene>,
}

impl AppData {
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Built-in sample set
    pub fn sample() -> Result<Self, DataError> {
        Self::from_json(SAMPLE_JSON)
    }

    pub fn total_cards(&self) -> usize {
        self.decks.values().map(|d| d.cards.len()).sum()
    }

    /// Distinct deck categories in first-seen order
    pub fn card_categories(&self) -> Vec<String> {
        distinct(self.decks.values().map(Deck::category))
    }

    /// Distinct scene categories in first-seen order
    pub fn scene_categories(&self) -> Vec<String> {
        distinct(self.conversations.iter().map(Scene::category))
    }

    /// Cards of every matching deck, concatenated in deck order
    pub fn cards(&self, filter: &CategoryFilter) -> Vec<&Card> {
        self.decks
            .values()
            .filter(|d| filter.matches(d.category()))
            .flat_map(|d| d.cards.iter())
            .collect()
    }

    pub fn scenes(&self, filter: &CategoryFilter) -> Vec<&Scene> {
        self.conversations
            .iter()
            .filter(|s| filter.matches(s.category()))
            .collect()
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.conversations.iter().find(|s| s.id == id)
    }
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.iter().any(|c| c == item) {
            out.push(item.to_string());
        }
    }
    out
}
