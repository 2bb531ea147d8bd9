//! Sentence and word helpers shared by the fallback heuristics.

/// Splits on sentence punctuation (`.`, `!`, `?`), trims each piece and drops
/// the blank ones.
pub(crate) fn sentences(text: &str) -> Vec<&str> {
    text.split(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The first `count` space-separated words of `sentence`, rejoined with spaces.
pub(crate) fn first_words(sentence: &str, count: usize) -> String {
    sentence.split(' ').take(count).collect::<Vec<_>>().join(" ")
}

/// Length in characters rather than bytes.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
