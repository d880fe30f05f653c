//! Synthetic dataset expansion for demos and tests
//!
//! Grows a small dataset to a target size by cloning records by index.
//! The source dataset is never modified.

use crate::data::{AppData, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Minimum total number of cards across all decks
    pub target_deck_cards: usize,
    /// Minimum number of conversation scenes
    pub target_scenes: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            target_deck_cards: 500,
            target_scenes: 250,
        }
    }
}

/// Return a copy of `data` padded out to the requested counts
///
/// Card `i` of the padding is a copy of base card `i % base_len` and goes to
/// deck `i % deck_count`. Scene clones get `-{n}` id and ` ({n})` title
/// suffixes, with `n` counting full passes over the base scenes.
pub fn expand(data: &AppData, opts: ExpandOptions) -> AppData {
    let mut out = data.clone();

    let base_cards: Vec<_> = data
        .decks
        .values()
        .flat_map(|d| d.cards.iter().cloned())
        .collect();
    let deck_ids: Vec<String> = out.decks.keys().cloned().collect();

    if !base_cards.is_empty() && !deck_ids.is_empty() {
        let missing = opts.target_deck_cards.saturating_sub(base_cards.len());
        for i in 0..missing {
            let card = base_cards[i % base_cards.len()].clone();
            if let Some(deck) = out.decks.get_mut(&deck_ids[i % deck_ids.len()]) {
                deck.cards.push(card);
            }
        }
    }

    let base_scenes = &data.conversations;
    if !base_scenes.is_empty() {
        let missing = opts.target_scenes.saturating_sub(base_scenes.len());
        out.conversations.extend((0..missing).map(|i| {
            let suffix = i / base_scenes.len() + 1;
            clone_scene(&base_scenes[i % base_scenes.len()], suffix)
        }));
    }

    log::debug!(
        "expanded dataset: {} cards, {} scenes",
        out.total_cards(),
        out.conversations.len()
    );
    out
}

fn clone_scene(scene: &Scene, suffix: usize) -> Scene {
    Scene {
        id: format!("{}-{}", scene.id, suffix),
        title: format!("{} ({})", scene.title, suffix),
        category: scene.category.clone(),
        lines: scene.lines.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Card, Deck, Line};

    fn card(en: &str) -> Card {
        Card {
            zh: format!("zh-{}", en),
            en: Some(en.to_string()),
            ..Card::default()
        }
    }

    fn fixture() -> AppData {
        let mut data = AppData::default();
        data.decks.insert(
            "a".into(),
            Deck {
                title: "A".into(),
                category: Some("Daily".into()),
                cards: vec![card("one"), card("two")],
            },
        );
        data.decks.insert(
            "b".into(),
            Deck {
                title: "B".into(),
                category: None,
                cards: vec![card("three")],
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
                id: "bus".into(),
                title: "Bus".into(),
                category: None,
                lines: vec![],
            },
        ];
        data
    }

    #[test]
    fn test_reaches_targets() {
        let out = expand(
            &fixture(),
            ExpandOptions {
                target_deck_cards: 10,
                target_scenes: 7,
            },
        );
        assert_eq!(out.total_cards(), 10);
        assert_eq!(out.conversations.len(), 7);
    }

    #[test]
    fn test_cards_round_robin() {
        let out = expand(
            &fixture(),
            ExpandOptions {
                target_deck_cards: 7,
                target_scenes: 0,
            },
        );
        // padding i=0..4: decks a,b,a,b ; cards one,two,three,one
        let a: Vec<_> = out.decks["a"].cards.iter().map(|c| c.en.clone().unwrap()).collect();
        let b: Vec<_> = out.decks["b"].cards.iter().map(|c| c.en.clone().unwrap()).collect();
        assert_eq!(a, vec!["one", "two", "one", "three"]);
        assert_eq!(b, vec!["three", "two", "one"]);
    }

    #[test]
    fn test_scene_suffixes() {
        let out = expand(
            &fixture(),
            ExpandOptions {
                target_deck_cards: 0,
                target_scenes: 5,
            },
        );
        let ids: Vec<_> = out.conversations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["cafe", "bus", "cafe-1", "bus-1", "cafe-2"]);
        assert_eq!(out.conversations[4].title, "Cafe (2)");
        assert_eq!(out.conversations[4].category.as_deref(), Some("Daily"));
        assert_eq!(out.conversations[4].lines, out.conversations[0].lines);
    }

    #[test]
    fn test_source_untouched_and_deterministic() {
        let data = fixture();
        let opts = ExpandOptions::default();
        let first = expand(&data, opts);
        let second = expand(&data, opts);
        assert_eq!(first, second);
        assert_eq!(data, fixture());
        assert_eq!(first.total_cards(), 500);
        assert_eq!(first.conversations.len(), 250);
    }

    #[test]
    fn test_already_large_enough() {
        let data = fixture();
        let out = expand(
            &data,
            ExpandOptions {
                target_deck_cards: 1,
                target_scenes: 1,
            },
        );
        assert_eq!(out, data);
    }

    #[test]
    fn test_empty_dataset() {
        let out = expand(&AppData::default(), ExpandOptions::default());
        assert_eq!(out, AppData::default());
    }
}
