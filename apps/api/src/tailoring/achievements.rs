//! Guard for the regenerated achievements list: formal recognition stays,
//! bare performance metrics go.

use tracing::warn;

/// Matched as word prefixes.
const RECOGNITION_STEMS: &[&str] = &[
    "award",
    "prize",
    "winner",
    "runner up",
    "runner-up",
    "finalist",
    "honor",
    "honour",
    "dean's list",
    "scholarship",
    "fellowship",
    "recogni",
    "publish",
    "publication",
    "patent",
    "cum laude",
    "certified",
    "medal",
    "champion",
    "ranked",
    "selected",
    "employee of the",
    "nominated",
];

/// Matched as whole words.
const RECOGNITION_WORDS: &[&str] = &["won", "win", "wins", "top"];

const METRIC_VERBS: &[&str] = &[
    "achieved",
    "improved",
    "increased",
    "reduced",
    "decreased",
    "optimized",
    "boosted",
    "cut",
    "grew",
    "saved",
    "accelerated",
];

/// Lowercased words joined by single spaces, padded with a space on each side.
fn padded_words(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '\'' && c != '-' && c != '%'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!(" {} ", words.join(" "))
}

const SPELLED_ORDINALS: &[&str] = &[
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

const PLACEMENT_NOUNS: &[&str] = &["place", "prize", "position", "rank"];

/// `1st`, `22nd`, `3rd`, `10th` and the spelled-out ordinals up to tenth.
fn is_ordinal(word: &str) -> bool {
    if SPELLED_ORDINALS.contains(&word) {
        return true;
    }
    let digits = word.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let suffix = &word[digits.len()..];
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && matches!(suffix, "st" | "nd" | "rd" | "th")
}

/// An ordinal directly followed by a placement noun, e.g. "1st place".
fn has_placement(padded: &str) -> bool {
    let words: Vec<&str> = padded.split_whitespace().collect();
    words
        .windows(2)
        .any(|pair| is_ordinal(pair[0]) && PLACEMENT_NOUNS.contains(&pair[1]))
}

fn has_recognition(padded: &str) -> bool {
    has_placement(padded)
        || RECOGNITION_STEMS
        .iter()
        .any(|stem| padded.contains(&format!(" {stem}")))
        || RECOGNITION_WORDS
            .iter()
            .any(|word| padded.contains(&format!(" {word} ")))
}

fn has_metric(text: &str, padded: &str) -> bool {
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let by_number = padded
        .match_indices(" by ")
        .any(|(i, m)| padded[i + m.len()..].starts_with(|c: char| c.is_ascii_digit()));
    let multiplier = padded.split(' ').any(|word| {
        word.len() > 1
            && word.ends_with('x')
            && word[..word.len() - 1].chars().all(|c| c.is_ascii_digit() || c == '.')
    });
    let metric_verb =
        has_digit && METRIC_VERBS.iter().any(|verb| padded.contains(&format!(" {verb} ")));

    has_percent || by_number || multiplier || metric_verb
}

/// A performance figure with no award or recognition vocabulary.
pub fn is_metric_only(text: &str) -> bool {
    let padded = padded_words(text);
    has_metric(text, &padded) && !has_recognition(&padded)
}

/// Drops blank and metric-only entries, keeping order.
pub fn retain_recognitions(achievements: Vec<Option<String>>) -> Vec<Option<String>> {
    achievements
        .into_iter()
        .filter_map(|item| {
            let text = item?.trim().to_string();
            if text.is_empty() {
                return None;
            }
            if is_metric_only(&text) {
                warn!(achievement = %text, "dropping performance metric from achievements");
                return None;
            }
            Some(Some(text))
        })
        .collect()
}
