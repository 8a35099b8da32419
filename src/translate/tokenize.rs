// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Local text-to-sign tokenization.
//!
//! This module turns raw input text into an ordered sequence of signable
//! tokens for local-mode playback:
//!
//! 1. Lowercase and split on whitespace.
//! 2. Drop stopwords.
//! 3. Prepend a tense marker token (`Before`, `Will` or `Now`) when the text
//!    matches a past, future or continuous tense pattern; the checks are
//!    mutually exclusive in that priority order.
//! 4. Keep words present in the available-signs vocabulary whole; expand any
//!    other word into its alphanumeric characters for finger-spelling.
//!
//! The server resolver is authoritative for translation quality; this
//! pipeline is the documented legacy approximation and keeps its word lists
//! and tense heuristics unchanged.

/// Common function words removed before sign lookup.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "about", "against", "between",
    "into", "through", "during", "before", "after", "above", "below", "to",
    "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "s", "t", "can", "will", "just", "don", "should", "now",
];

/// The closed vocabulary of words with a dedicated sign clip. Words absent
/// from this list are finger-spelled letter by letter.
const AVAILABLE_SIGNS: &[&str] = &[
    "hello", "thank", "you", "welcome", "please", "sorry", "yes", "no",
    "help", "want", "need", "what", "where", "when", "who", "why", "how",
    "name", "sign", "language", "learn", "good", "bad", "happy", "sad",
    "angry", "tired", "hungry", "thirsty", "hot", "cold", "love", "like",
    "hate", "friend", "family", "mother", "father", "sister", "brother",
    "home", "school", "work", "play", "eat", "drink", "sleep", "walk", "run",
    "go", "come", "stop", "start", "finish", "before", "after", "now",
    "later", "tomorrow", "yesterday", "today", "time", "day", "week",
    "month", "year", "morning", "afternoon", "evening", "night", "me", "my",
    "mine", "your", "yours", "we", "our", "they", "their", "this", "that",
    "these", "those", "here", "there", "will", "can", "cannot", "do", "does",
    "did", "done", "make", "made", "see", "saw", "seen", "look", "watch",
    "read", "write", "speak", "talk", "listen", "hear", "understand", "know",
    "think", "believe", "feel", "touch", "give", "take", "bring", "carry",
    "hold", "put", "get", "buy", "sell", "pay", "cost", "money", "store",
    "shop", "food", "water", "clothes", "house", "car", "bus", "train",
    "plane", "boat", "bike", "street", "road", "way", "path", "door",
    "window", "room", "table", "chair", "bed", "bathroom", "kitchen",
    "living", "computer", "phone", "television", "music", "movie", "book",
    "paper", "pen", "pencil", "color", "red", "blue", "green", "yellow",
    "black", "white", "big", "small", "tall", "short", "long", "wide",
    "narrow", "high", "low", "new", "old", "young", "beautiful", "ugly",
    "clean", "dirty", "right", "wrong", "true", "false", "same", "different",
    "all", "some", "many", "few", "more", "less", "first", "last", "next",
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "a", "b", "c", "d",
    "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
    "s", "t", "u", "v", "w", "x", "y", "z",
];

const PAST_MARKERS: &[&str] = &["was", "were", "had", "did", "gone", "came", "saw", "been"];
const FUTURE_MARKERS: &[&str] = &["will", "shall"];
const CONTINUOUS_AUXILIARIES: &[&str] = &["am", "is", "are"];

/// Produces the ordered signable token sequence for `text`.
///
/// Empty or whitespace-only input yields an empty sequence.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let filtered: Vec<&str> = words
        .iter()
        .copied()
        .filter(|word| !STOPWORDS.contains(word))
        .collect();

    let marked = add_tense_marker(filtered, &lowered);

    marked
        .into_iter()
        .flat_map(|word| {
            if is_available(&word) {
                vec![word]
            } else {
                finger_spell(&word)
            }
        })
        .collect()
}

/// Returns true if `word` has a dedicated sign clip.
pub(crate) fn is_available(word: &str) -> bool {
    let lowered = word.to_lowercase();
    AVAILABLE_SIGNS.contains(&lowered.as_str())
}

// Tense detection scans the whole lowercased text (markers may sit inside
// stopwords the filter already removed). Checks are mutually exclusive and
// applied in priority order: past, then future, then continuous.
fn add_tense_marker(words: Vec<&str>, lowered_text: &str) -> Vec<String> {
    let scan: Vec<&str> = lowered_text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let has_past = scan.iter().any(|w| PAST_MARKERS.contains(w));
    let has_future = scan.iter().any(|w| FUTURE_MARKERS.contains(w))
        || scan.windows(2).any(|pair| pair == ["going", "to"]);
    let has_continuous = scan.windows(2).any(|pair| {
        CONTINUOUS_AUXILIARIES.contains(&pair[0])
            && pair[1].len() > 3
            && pair[1].ends_with("ing")
    });

    let mut result: Vec<String> = words.into_iter().map(str::to_string).collect();

    if has_past {
        result.insert(0, "Before".to_string());
    } else if has_future {
        if !result.iter().any(|w| w == "will") {
            result.insert(0, "Will".to_string());
        }
    } else if has_continuous {
        result.insert(0, "Now".to_string());
    }

    result
}

// Finger-spelling fallback: one token per alphanumeric character, original
// order, everything else dropped.
fn finger_spell(word: &str) -> Vec<String> {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn past_tense_with_finger_spelling() {
        // "was" triggers the past marker but has no dedicated sign, so it is
        // finger-spelled; "hungry" is in the vocabulary and stays whole.
        assert_eq!(
            tokens("I was hungry"),
            vec!["Before", "i", "w", "a", "s", "hungry"]
        );
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \t \n ").is_empty());
    }

    #[test]
    fn stopwords_are_removed() {
        // "the" and "to" are stopwords; "go" and "school" have signs.
        assert_eq!(tokens("go to the school"), vec!["go", "school"]);
    }

    #[test]
    fn future_tense_prepends_will_once() {
        // "will" itself is a stopword, so the marker token is prepended.
        assert_eq!(tokens("I will eat"), vec!["Will", "i", "eat"]);
    }

    #[test]
    fn going_to_counts_as_future() {
        let result = tokens("I am going to sleep");
        assert_eq!(result.first().map(String::as_str), Some("Will"));
        assert!(result.contains(&"sleep".to_string()));
    }

    #[test]
    fn continuous_tense_prepends_now() {
        // Neither "am" nor "eating" has a sign, so both are finger-spelled.
        assert_eq!(
            tokens("I am eating"),
            vec!["Now", "i", "a", "m", "e", "a", "t", "i", "n", "g"]
        );
    }

    #[test]
    fn past_takes_priority_over_future() {
        // Both "was" and "will" appear; past wins and no "Will" is added.
        let result = tokens("he was sure he will help");
        assert_eq!(result.first().map(String::as_str), Some("Before"));
        assert!(!result.contains(&"Will".to_string()));
    }

    #[test]
    fn unknown_words_are_finger_spelled_without_punctuation() {
        // "xylophone!" has no sign; punctuation is dropped from the spelling.
        let result = tokens("xylophone!");
        assert_eq!(
            result,
            vec!["x", "y", "l", "o", "p", "h", "o", "n", "e"]
        );
    }

    #[test]
    fn digits_are_individual_signs() {
        assert_eq!(tokens("42"), vec!["4", "2"]);
    }
}
