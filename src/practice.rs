//! Practice state - current language, card cursor and scene selection
//!
//! "Next card" is a plain sequential cycle. The good/again marks are for the
//! session tally only and never reorder cards.

use crate::data::{AppData, Card, CategoryFilter, Scene};
use crate::lang::Language;

pub const EMPTY_CATEGORY: &str = "(no cards in this category)";
pub const MISSING_TEXT: &str = "—";

pub struct Practice {
    data: AppData,
    lang: Language,
    card_filter: CategoryFilter,
    card_index: usize,
    show_back: bool,
    scene_filter: CategoryFilter,
    scene_id: Option<String>,
}

impl Practice {
    pub fn new(data: AppData, lang: Language) -> Self {
        let mut practice = Self {
            data,
            lang,
            card_filter: CategoryFilter::All,
            card_index: 0,
            show_back: false,
            scene_filter: CategoryFilter::All,
            scene_id: None,
        };
        practice.select_first_scene();
        practice
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    // ========================================================================
    // Language
    // ========================================================================

    pub fn lang(&self) -> Language {
        self.lang
    }

    pub fn set_lang(&mut self, lang: Language) {
        self.lang = lang;
    }

    // ========================================================================
    // Cards
    // ========================================================================

    pub fn card_filter(&self) -> &CategoryFilter {
        &self.card_filter
    }

    pub fn cards(&self) -> Vec<&Card> {
        self.data.cards(&self.card_filter)
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.cards().get(self.card_index).copied()
    }

    pub fn card_index(&self) -> usize {
        self.card_index
    }

    pub fn show_back(&self) -> bool {
        self.show_back
    }

    pub fn flip(&mut self) {
        self.show_back = !self.show_back;
    }

    /// Advance to the next card, wrapping at the end
    pub fn next_card(&mut self) {
        let len = self.cards().len();
        if len == 0 {
            return;
        }
        self.card_index = (self.card_index + 1) % len;
        self.show_back = false;
    }

    /// Switch category and start over at its first card
    pub fn set_category(&mut self, filter: CategoryFilter) {
        self.card_filter = filter;
        self.card_index = 0;
        self.show_back = false;
    }

    /// Cycle All -> each card category -> All
    pub fn next_category(&mut self) {
        let categories = self.data.card_categories();
        let next = match &self.card_filter {
            CategoryFilter::All => categories.first().cloned(),
            CategoryFilter::Named(current) => categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| categories.get(i + 1).cloned()),
        };
        self.set_category(next.map(CategoryFilter::Named).unwrap_or_default());
    }

    /// Target-language text for the front of the current card
    pub fn front(&self) -> String {
        let cards = self.cards();
        match cards.get(self.card_index) {
            Some(card) => card.text(self.lang).unwrap_or(MISSING_TEXT).to_string(),
            None if cards.is_empty() => EMPTY_CATEGORY.to_string(),
            None => MISSING_TEXT.to_string(),
        }
    }

    /// Gloss plus note, one per line
    pub fn back(&self) -> String {
        match self.current_card() {
            Some(card) => match card.note() {
                Some(note) => format!("{}\n{}", card.zh, note),
                None => card.zh.clone(),
            },
            None => String::new(),
        }
    }

    pub fn progress(&self) -> String {
        format!("{} / {}", self.card_index + 1, self.cards().len())
    }

    // ========================================================================
    // Scenes
    // ========================================================================

    pub fn scenes(&self) -> Vec<&Scene> {
        self.data.scenes(&self.scene_filter)
    }

    /// Filter the scene list and select its first entry
    pub fn set_scene_category(&mut self, filter: CategoryFilter) {
        self.scene_filter = filter;
        self.select_first_scene();
    }

    /// Select a scene by id; unknown ids leave the selection unchanged
    pub fn select_scene(&mut self, id: &str) -> bool {
        if self.data.scene(id).is_some() {
            self.scene_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.scene_id.as_deref().and_then(|id| self.data.scene(id))
    }

    fn select_first_scene(&mut self) {
        self.scene_id = self.scenes().first().map(|s| s.id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Deck, Line};

    fn card(en: &str, zh: &str) -> Card {
        Card {
            zh: zh.into(),
            en: Some(en.into()),
            ..Card::default()
        }
    }

    fn practice() -> Practice {
        let mut data = AppData::default();
        data.decks.insert(
            "a".into(),
            Deck {
                title: "Food".into(),
                category: Some("Daily".into()),
                cards: vec![
                    card("apple", "蘋果"),
                    Card {
                        note: Some("uncountable".into()),
                        ..card("water", "水")
                    },
                ],
            },
        );
        data.decks.insert(
            "b".into(),
            Deck {
                title: "Travel".into(),
                category: Some("Travel".into()),
                cards: vec![card("station", "車站")],
            },
        );
        data.conversations = vec![
            Scene {
                id: "cafe".into(),
                title: "Cafe".into(),
                category: Some("Daily".into()),
                lines: vec![Line {
                    role: "A".into(),
                    en: Some("Hi".into()),
                    ..Line::default()
                }],
            },
            Scene {
                id: "hotel".into(),
                title: "Hotel".into(),
                category: Some("Travel".into()),
                lines: vec![],
            },
        ];
        Practice::new(data, Language::En)
    }

    #[test]
    fn test_next_card_wraps() {
        let mut p = practice();
        assert_eq!(p.front(), "apple");
        p.next_card();
        p.next_card();
        assert_eq!(p.front(), "station");
        assert_eq!(p.progress(), "3 / 3");
        p.next_card();
        assert_eq!(p.front(), "apple");
        assert_eq!(p.progress(), "1 / 3");
    }

    #[test]
    fn test_next_card_resets_flip() {
        let mut p = practice();
        p.flip();
        assert!(p.show_back());
        p.next_card();
        assert!(!p.show_back());
    }

    #[test]
    fn test_back_includes_note() {
        let mut p = practice();
        assert_eq!(p.back(), "蘋果");
        p.next_card();
        assert_eq!(p.back(), "水\nuncountable");
    }

    #[test]
    fn test_empty_strings_shown_as_missing() {
        let mut data = AppData::default();
        data.decks.insert(
            "a".into(),
            Deck {
                title: "Blank".into(),
                category: None,
                cards: vec![Card {
                    zh: "空".into(),
                    en: Some(String::new()),
                    note: Some(String::new()),
                    ..Card::default()
                }],
            },
        );
        let p = Practice::new(data, Language::En);
        assert_eq!(p.front(), MISSING_TEXT);
        assert_eq!(p.back(), "空");
    }

    #[test]
    fn test_missing_language_text() {
        let mut p = practice();
        p.set_lang(Language::Ja);
        assert_eq!(p.front(), MISSING_TEXT);
    }

    #[test]
    fn test_set_category_resets_cursor() {
        let mut p = practice();
        p.next_card();
        p.flip();
        p.set_category(CategoryFilter::Named("Travel".into()));
        assert_eq!(p.card_index(), 0);
        assert!(!p.show_back());
        assert_eq!(p.front(), "station");
        assert_eq!(p.progress(), "1 / 1");
    }

    #[test]
    fn test_empty_category() {
        let mut p = practice();
        p.set_category(CategoryFilter::Named("Nope".into()));
        assert_eq!(p.front(), EMPTY_CATEGORY);
        assert_eq!(p.back(), "");
        assert_eq!(p.progress(), "1 / 0");
        p.next_card();
        assert_eq!(p.card_index(), 0);
    }

    #[test]
    fn test_next_category_cycles() {
        let mut p = practice();
        p.next_category();
        assert_eq!(p.card_filter(), &CategoryFilter::Named("Daily".into()));
        p.next_category();
        assert_eq!(p.card_filter(), &CategoryFilter::Named("Travel".into()));
        p.next_category();
        assert_eq!(p.card_filter(), &CategoryFilter::All);
    }

    #[test]
    fn test_scene_selection() {
        let mut p = practice();
        assert_eq!(p.current_scene().map(|s| s.id.as_str()), Some("cafe"));
        assert!(p.select_scene("hotel"));
        assert_eq!(p.current_scene().map(|s| s.id.as_str()), Some("hotel"));
        assert!(!p.select_scene("nowhere"));
        assert_eq!(p.current_scene().map(|s| s.id.as_str()), Some("hotel"));
        p.set_scene_category(CategoryFilter::Named("Daily".into()));
        assert_eq!(p.current_scene().map(|s| s.id.as_str()), Some("cafe"));
        assert_eq!(p.scenes().len(), 1);
    }
}
