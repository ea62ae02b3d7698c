//! Windowed text chunking over whitespace tokens

/// Split `text` into overlapping windows of `size` whitespace tokens.
///
/// Successive windows start `size - overlap` tokens apart; when
/// `overlap >= size` the step collapses to `size` so iteration always
/// terminates. The final window is clipped to the remaining tokens and is
/// always emitted. `size == 0` is a documented degenerate case returning the
/// whole text as a single fragment.
///
/// Deterministic and free of I/O; identical inputs always produce the same
/// windows.
pub fn chunk(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if size == 0 {
        return vec![text.to_string()];
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let mut step = size.saturating_sub(overlap);
    if step == 0 {
        step = size;
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + size).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end == words.len() {
            break;
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_follow_the_step_formula() {
        let text = "the sky is blue the grass is green";
        let chunks = chunk(text, 4, 2);
        assert_eq!(
            chunks,
            vec!["the sky is blue", "is blue the grass", "the grass is green"]
        );
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota";
        assert_eq!(chunk(text, 3, 1), chunk(text, 3, 1));
    }

    #[test]
    fn every_window_is_at_most_size_tokens() {
        let text = "one two three four five six seven";
        for fragment in chunk(text, 3, 1) {
            assert!(fragment.split_whitespace().count() <= 3);
        }
    }

    #[test]
    fn last_window_ends_at_the_token_sequence_end() {
        let text = "a b c d e f g";
        let chunks = chunk(text, 3, 1);
        assert_eq!(chunks.last().map(String::as_str), Some("e f g"));
    }

    #[test]
    fn overlap_at_least_size_still_terminates() {
        let text = "a b c d e f";
        let chunks = chunk(text, 2, 5);
        // step collapses to size: disjoint windows
        assert_eq!(chunks, vec!["a b", "c d", "e f"]);
    }

    #[test]
    fn zero_size_returns_whole_text() {
        assert_eq!(chunk("hello world", 0, 0), vec!["hello world"]);
    }

    #[test]
    fn empty_text_yields_no_windows() {
        assert!(chunk("", 4, 2).is_empty());
        assert!(chunk("   \t\n", 4, 2).is_empty());
    }

    #[test]
    fn short_text_yields_single_clipped_window() {
        assert_eq!(chunk("just two", 10, 2), vec!["just two"]);
    }
}
