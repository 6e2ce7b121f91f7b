//! Text normalization ahead of intent matching and extraction.

/// Known misspellings and their corrections.
const MISSPELLINGS: [(&str, &str); 4] = [
    ("electisity", "electricity"),
    ("watter", "water"),
    ("potholse", "potholes"),
    ("strret", "street"),
];

/// Result of normalizing one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Lowercased tokens joined by single spaces.
    pub text: String,
    /// `(misspelled, corrected)` pairs that were rewritten.
    pub corrections: Vec<(String, String)>,
}

impl NormalizedText {
    /// The normalized text, only when a misspelling was actually rewritten.
    pub fn corrected_text(&self) -> Option<&str> {
        (!self.corrections.is_empty()).then_some(self.text.as_str())
    }
}

/// Lowercases, tokenizes on whitespace, trims surrounding punctuation from
/// each token and rewrites known misspellings. Total and idempotent.
pub fn normalize(raw: &str) -> NormalizedText {
    let lowered = raw.to_lowercase();
    let mut corrections = Vec::new();
    let mut tokens = Vec::new();

    for token in lowered.split_whitespace() {
        let token = token.trim_matches(|c: char| c.is_ascii_punctuation());
        if token.is_empty() {
            continue;
        }
        match MISSPELLINGS.iter().find(|(bad, _)| *bad == token) {
            Some((bad, good)) => {
                corrections.push((bad.to_string(), good.to_string()));
                tokens.push(*good);
            }
            None => tokens.push(token),
        }
    }

    NormalizedText {
        text: tokens.join(" "),
        corrections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        let n = normalize("  There's a   HUGE pothole\ton Oak Avenue!  ");
        assert_eq!(n.text, "there's a huge pothole on oak avenue");
        assert!(n.corrections.is_empty());
        assert_eq!(n.corrected_text(), None);
    }

    #[test]
    fn rewrites_known_misspellings() {
        let n = normalize("No electisity, and the strret is dark.");
        assert_eq!(n.text, "no electricity and the street is dark");
        assert_eq!(
            n.corrections,
            vec![
                ("electisity".to_string(), "electricity".to_string()),
                ("strret".to_string(), "street".to_string())
            ]
        );
        assert_eq!(n.corrected_text(), Some("no electricity and the street is dark"));
    }

    #[test]
    fn punctuation_only_tokens_are_dropped() {
        assert_eq!(normalize("hello -- world ...").text, "hello world");
        assert_eq!(normalize("?!").text, "");
        assert_eq!(normalize("").text, "");
    }

    #[test]
    fn inner_punctuation_is_kept() {
        assert_eq!(normalize("(it's) broken, e.g. here").text, "it's broken e.g here");
    }

    #[test]
    fn non_ascii_text_is_stable_on_a_second_pass() {
        for raw in ["ÇA VA, İSTANBUL?", "ΟΔΟΣ ΣΚΟΤΕΙΝΗ.", "\u{00a0}Straße\u{2003}\u{2014}kaputt!", "..\u{301}watter"] {
            let once = normalize(raw).text;
            assert_eq!(normalize(&once).text, once, "input {:?}", raw);
        }
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(input in "[a-zA-Z .,!?'\\-\t]{0,60}|(watter|strret|Potholse|electisity)[ .!]{0,3}") {
            let once = normalize(&input).text;
            let twice = normalize(&once);
            prop_assert_eq!(&twice.text, &once);
            prop_assert!(twice.corrections.is_empty());
        }

        #[test]
        fn normalize_is_idempotent_for_any_text(input in any::<String>()) {
            let once = normalize(&input).text;
            let twice = normalize(&once);
            prop_assert_eq!(&twice.text, &once);
            prop_assert!(twice.corrections.is_empty());
        }

        #[test]
        fn normalize_never_panics(input in any::<String>()) {
            let n = normalize(&input);
            prop_assert!(!n.text.contains("  "));
        }
    }
}
