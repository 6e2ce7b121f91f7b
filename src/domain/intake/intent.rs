//! Intent Classifier
//!
//! Matches normalized text against an ordered list of regex patterns. The
//! first intent whose pattern matches anywhere wins, so overlaps resolve by
//! declaration order rather than specificity: "cancel" appears under both
//! `cancel` and `confirmation_no` and always classifies as `cancel`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::values::Intent;

/// Intent patterns in priority order.
const INTENT_PATTERNS: [(Intent, &str); 8] = [
    (Intent::Greeting, r"\b(hi|hello|hey)\b"),
    (Intent::Farewell, r"\b(bye|goodbye|thanks|thank you)\b"),
    (Intent::StatusCheck, r"\b(status|update|tracking)\b"),
    (Intent::Restart, r"\b(start over|restart|reset)\b"),
    (Intent::Help, r"\b(help|assist|support)\b"),
    (Intent::Cancel, r"\b(cancel|stop|forget it)\b"),
    (
        Intent::ConfirmationYes,
        r"\b(yes|confirm|ok|okay|submit|register|proceed|correct|right|it's correct|that's right)\b",
    ),
    (
        Intent::ConfirmationNo,
        r"\b(no|wait|add|more|change|wrong|incorrect|cancel|not correct)\b",
    ),
];

static DEFAULT_CLASSIFIER: Lazy<IntentClassifier> = Lazy::new(IntentClassifier::new);

/// Classifies with the shared default pattern set.
pub fn classify_intent(text: &str) -> Intent {
    DEFAULT_CLASSIFIER.classify(text)
}

/// Ordered regex intent matcher.
pub struct IntentClassifier {
    compiled: Vec<(Intent, Regex)>,
}

impl IntentClassifier {
    /// Compiles the built-in pattern set.
    pub fn new() -> Self {
        let compiled = INTENT_PATTERNS
            .iter()
            .filter_map(|(intent, pattern)| {
                match Regex::new(&format!("(?i){}", pattern)) {
                    Ok(regex) => Some((*intent, regex)),
                    Err(e) => {
                        tracing::warn!(intent = %intent, error = %e, "Skipping invalid intent pattern");
                        None
                    }
                }
            })
            .collect();
        Self { compiled }
    }

    /// Returns the first matching intent, or `Unknown`.
    pub fn classify(&self, text: &str) -> Intent {
        self.compiled
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Unknown)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(IntentClassifier::new().compiled.len(), INTENT_PATTERNS.len());
    }

    #[test]
    fn matches_each_intent() {
        let cases = [
            ("hello there", Intent::Greeting),
            ("ok bye", Intent::Farewell),
            ("what is the status of my complaint", Intent::StatusCheck),
            ("please restart", Intent::Restart),
            ("can you help me", Intent::Help),
            ("forget it", Intent::Cancel),
            ("yes submit", Intent::ConfirmationYes),
            ("that's wrong", Intent::ConfirmationNo),
        ];
        for (text, expected) in cases {
            assert_eq!(classify_intent(text), expected, "text: {}", text);
        }
    }

    #[test]
    fn unmatched_text_is_unknown() {
        assert_eq!(
            classify_intent("there's a huge pothole on oak avenue"),
            Intent::Unknown
        );
        assert_eq!(classify_intent(""), Intent::Unknown);
    }

    #[test]
    fn overlaps_resolve_by_declaration_order() {
        assert_eq!(classify_intent("cancel"), Intent::Cancel);
        assert_eq!(classify_intent("hi, yes that's right"), Intent::Greeting);
        assert_eq!(classify_intent("thanks, no more"), Intent::Farewell);
    }

    #[test]
    fn respects_word_boundaries() {
        assert_eq!(classify_intent("this is not okay"), Intent::ConfirmationYes);
        assert_eq!(classify_intent("nothing happened"), Intent::Unknown);
        assert_eq!(classify_intent("the highway is broken"), Intent::Unknown);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify_intent("YES"), Intent::ConfirmationYes);
    }
}
