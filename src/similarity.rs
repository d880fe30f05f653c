//! Similarity scoring using Levenshtein distance
//!
//! Grades a spoken (or typed) repetition against its target phrase. Both
//! sides are lowercased and trimmed, then compared character by character.

/// Lowercase and trim surrounding whitespace. Nothing else is stripped.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Calculate Levenshtein distance between two strings
///
/// Keeps two rows of the DP table, iterating over the longer string so the
/// rows are sized by the shorter one.
#[hotpath::measure]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for i in 1..=long.len() {
        curr[0] = i;
        for j in 1..=short.len() {
            let cost = if long[i - 1] == short[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[short.len()]
}

/// Score in `[0, 1]`: one minus the normalized edit distance
pub fn similarity(heard: &str, target: &str) -> f64 {
    let a = normalize(heard);
    let b = normalize(target);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let dist = levenshtein(&a, &b);
    let max_len = a.chars().count().max(b.chars().count()).max(1);
    1.0 - dist as f64 / max_len as f64
}

/// Display percentage, rounded half away from zero
pub fn percent(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("hello", "hello"), 0);
        assert_eq!(levenshtein("hello", "helo"), 1);
        assert_eq!(levenshtein("hello", "world"), 4);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_levenshtein_counts_chars_not_bytes() {
        assert_eq!(levenshtein("ありがとう", "ありがと"), 1);
        assert_eq!(levenshtein("señor", "senor"), 1);
    }

    #[test]
    fn test_empty_pair_is_perfect() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("   ", "\t"), 1.0);
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(similarity("cat", "cat"), 1.0);
        assert_eq!(similarity("CAT", "cat"), 1.0);
        assert_eq!(similarity("  hello  ", "hello"), 1.0);
    }

    #[test]
    fn test_known_scores() {
        assert_eq!(similarity("cat", "cats"), 0.75);
        let s = similarity("kitten", "sitting");
        assert!((s - 4.0 / 7.0).abs() < 1e-12);
        assert_eq!(percent(s), 57);
    }

    #[test]
    fn test_one_side_empty() {
        assert_eq!(similarity("", "hello"), 0.0);
        assert_eq!(similarity("hello", "  "), 0.0);
    }

    #[test]
    fn test_punctuation_is_kept() {
        // "hello!" vs "hello": one insertion over six chars
        let s = similarity("Hello!", "hello");
        assert!((s - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0.0), 0);
        assert_eq!(percent(1.0), 100);
        assert_eq!(percent(0.125), 13);
        assert_eq!(percent(0.994), 99);
        assert_eq!(percent(0.5), 50);
    }
}
