//! Terminal rendering for the card and dialogue views

use crate::data::Scene;
use crate::lang::Language;
use crate::practice::{MISSING_TEXT, Practice};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_width::UnicodeWidthStr;

const MIN_CARD_WIDTH: usize = 24;

/// What a key press in the card view asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Flip,
    /// Advance; `true` marks the card good, `false` again
    Next(bool),
    Speak,
    Shadow,
    NextCategory,
    NextLanguage,
    Quit,
}

pub fn map_key(key: &KeyEvent) -> Option<CardAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(CardAction::Quit);
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(CardAction::Flip),
        KeyCode::Right => Some(CardAction::Next(true)),
        KeyCode::Left => Some(CardAction::Next(false)),
        KeyCode::Char('s') => Some(CardAction::Speak),
        KeyCode::Char('r') => Some(CardAction::Shadow),
        KeyCode::Char('c') => Some(CardAction::NextCategory),
        KeyCode::Char('l') => Some(CardAction::NextLanguage),
        KeyCode::Esc | KeyCode::Char('q') => Some(CardAction::Quit),
        _ => None,
    }
}

/// Pad `text` with spaces to `width` terminal columns
fn pad(text: &str, width: usize) -> String {
    let w = text.width();
    format!("{}{}", text, " ".repeat(width.saturating_sub(w)))
}

/// Draw `lines` inside a rounded box sized to the widest line
pub fn boxed(lines: &[String]) -> Vec<String> {
    let inner = lines
        .iter()
        .map(|l| l.width())
        .max()
        .unwrap_or(0)
        .max(MIN_CARD_WIDTH);
    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("╭{}╮", "─".repeat(inner + 2)));
    for line in lines {
        out.push(format!("│ {} │", pad(line, inner)));
    }
    out.push(format!("╰{}╯", "─".repeat(inner + 2)));
    out
}

/// Full card screen; lines end in `\r\n` for raw mode
pub fn card_screen(practice: &Practice, shadow_available: bool) -> String {
    let lang = practice.lang();
    let mut body = vec![practice.front()];
    if practice.show_back() {
        body.push(String::new());
        body.extend(practice.back().lines().map(String::from));
    }

    let mut lines = vec![format!(
        "{} · {} · {}",
        lang.label(),
        practice.card_filter(),
        practice.progress()
    )];
    lines.extend(boxed(&body));
    let shadow_hint = if shadow_available { "  r shadow" } else { "" };
    lines.push(format!(
        "\x1b[90mspace flip  → good  ← again  s speak{}  c category  l language  q quit\x1b[0m",
        shadow_hint
    ));

    let mut out = String::from("\x1b[2J\x1b[H");
    for line in lines {
        out.push_str(&line);
        out.push_str("\r\n");
    }
    out
}

/// Numbered dialogue lines with their glosses
pub fn dialogue(scene: &Scene, lang: Language, shadow_available: bool) -> String {
    let mut out = format!("{} [{}]\n", scene.title, scene.category());
    for (idx, line) in scene.lines.iter().enumerate() {
        let text = line.text(lang).unwrap_or(MISSING_TEXT);
        out.push_str(&format!("{:>3}. {}: {}\n", idx + 1, line.role, text));
        out.push_str(&format!("     \x1b[90m{}\x1b[0m\n", line.zh));
    }
    let shadow_hint = if shadow_available { ", s N shadow" } else { "" };
    out.push_str(&format!(
        "\x1b[90mN speak{}, p play all, l language, q quit\x1b[0m\n",
        shadow_hint
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AppData, Card, Deck, Line};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(&key(KeyCode::Char(' '))), Some(CardAction::Flip));
        assert_eq!(map_key(&key(KeyCode::Enter)), Some(CardAction::Flip));
        assert_eq!(map_key(&key(KeyCode::Right)), Some(CardAction::Next(true)));
        assert_eq!(map_key(&key(KeyCode::Left)), Some(CardAction::Next(false)));
        assert_eq!(map_key(&key(KeyCode::Char('s'))), Some(CardAction::Speak));
        assert_eq!(map_key(&key(KeyCode::Char('r'))), Some(CardAction::Shadow));
        assert_eq!(map_key(&key(KeyCode::Esc)), Some(CardAction::Quit));
        assert_eq!(map_key(&key(KeyCode::Char('x'))), None);
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(CardAction::Quit)
        );
    }

    #[test]
    fn test_ignores_release() {
        let mut ev = key(KeyCode::Char(' '));
        ev.kind = KeyEventKind::Release;
        assert_eq!(map_key(&ev), None);
    }

    #[test]
    fn test_boxed_aligns_wide_chars() {
        let lines = boxed(&["ありがとう".to_string(), "thanks".to_string()]);
        let widths: Vec<usize> = lines.iter().map(|l| l.width()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
        assert_eq!(widths[0], MIN_CARD_WIDTH + 4);
    }

    #[test]
    fn test_card_screen_shows_back_when_flipped() {
        let mut data = AppData::default();
        data.decks.insert(
            "d".into(),
            Deck {
                title: "D".into(),
                category: None,
                cards: vec![Card {
                    zh: "謝謝".into(),
                    en: Some("Thank you".into()),
                    note: Some("polite".into()),
                    ..Card::default()
                }],
            },
        );
        let mut practice = Practice::new(data, Language::En);
        let front = card_screen(&practice, false);
        assert!(front.contains("Thank you"));
        assert!(!front.contains("謝謝"));
        assert!(!front.contains("r shadow"));

        practice.flip();
        let back = card_screen(&practice, true);
        assert!(back.contains("謝謝"));
        assert!(back.contains("polite"));
        assert!(back.contains("1 / 1"));
        assert!(back.contains("r shadow"));
    }

    #[test]
    fn test_dialogue_lines() {
        let scene = Scene {
            id: "s".into(),
            title: "Cafe".into(),
            category: Some("Daily".into()),
            lines: vec![Line {
                role: "Barista".into(),
                zh: "你好".into(),
                en: Some("Hi!".into()),
                ..Line::default()
            }],
        };
        let out = dialogue(&scene, Language::En, false);
        assert!(out.starts_with("Cafe [Daily]\n"));
        assert!(out.contains("  1. Barista: Hi!\n"));
        let ja = dialogue(&scene, Language::Ja, true);
        assert!(ja.contains(&format!("Barista: {}", MISSING_TEXT)));
        assert!(ja.contains("s N shadow"));
    }

    #[test]
    fn test_dialogue_blank_line_text() {
        let scene = Scene {
            id: "s".into(),
            title: "Cafe".into(),
            category: None,
            lines: vec![Line {
                role: "Guest".into(),
                zh: "嗯".into(),
                es: Some(String::new()),
                ..Line::default()
            }],
        };
        let out = dialogue(&scene, Language::Es, false);
        assert!(out.contains(&format!("  1. Guest: {}\n", MISSING_TEXT)));
    }
}
