//! Keyword-based sentiment scan of player messages.
//!
//! Shared by the engine and the front end so both read the same word lists.
//! Matching is case-insensitive and on whole words; multi-word entries match
//! as a contiguous phrase.

/// Compliments and warm words.
pub const POSITIVE: &[&str] = &[
    "adore",
    "amazing",
    "awesome",
    "beautiful",
    "brilliant",
    "charming",
    "cool",
    "cute",
    "fantastic",
    "funny",
    "genius",
    "gorgeous",
    "great",
    "handsome",
    "incredible",
    "kind",
    "love",
    "lovely",
    "perfect",
    "pretty",
    "smart",
    "sweet",
    "thank you",
    "thanks",
    "wonderful",
];

/// Insults and dismissive words. Disjoint from `POSITIVE`.
pub const NEGATIVE: &[&str] = &[
    "annoying",
    "awful",
    "boring",
    "dumb",
    "gross",
    "hate",
    "idiot",
    "jerk",
    "lame",
    "loser",
    "pathetic",
    "shut up",
    "stupid",
    "terrible",
    "ugly",
    "useless",
    "weird",
    "worst",
];

/// Which lists a message hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub positive: bool,
    pub negative: bool,
}

/// Scan `text` against both keyword lists.
pub fn scan(text: &str) -> KeywordHits {
    let normalized = normalize(text);
    if normalized.trim().is_empty() {
        return KeywordHits::default();
    }
    KeywordHits {
        positive: POSITIVE.iter().any(|w| contains_phrase(&normalized, w)),
        negative: NEGATIVE.iter().any(|w| contains_phrase(&normalized, w)),
    }
}

/// Lower-case, split on anything that is not part of a word, and pad with
/// spaces so phrases can be matched as ` phrase `. Apostrophes only count
/// inside a word (`you're`), not as quotes around it.
fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .collect();
    format!(" {} ", words.join(" "))
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&format!(" {} ", phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_text() {
        let hits = scan("what time is it");
        assert_eq!(hits, KeywordHits::default());
    }

    #[test]
    fn test_positive_text() {
        let hits = scan("You are AMAZING!");
        assert!(hits.positive);
        assert!(!hits.negative);
    }

    #[test]
    fn test_negative_text() {
        let hits = scan("ugh, shut up");
        assert!(hits.negative);
    }

    #[test]
    fn test_both_lists_sum() {
        let hits = scan("you're cute but kind of boring");
        assert!(hits.positive && hits.negative);
    }

    #[test]
    fn test_single_quotes_around_words() {
        let hits = scan("I think you're 'amazing'");
        assert!(hits.positive);
        assert!(scan("'shut up'").negative);
        assert_eq!(scan("' ' ''"), KeywordHits::default());
    }

    #[test]
    fn test_whole_words_only() {
        // "cool" inside "school", "kind" inside "kindling"
        assert_eq!(scan("school kindling"), KeywordHits::default());
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(scan(""), KeywordHits::default());
        assert_eq!(scan("   ?!"), KeywordHits::default());
    }

    #[test]
    fn test_lists_are_disjoint() {
        for w in POSITIVE {
            assert!(!NEGATIVE.contains(w), "{} is in both lists", w);
        }
    }
}
