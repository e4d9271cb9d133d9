//! Text cleanup and term extraction for transaction descriptions.

/// Normalizes a raw transaction description.
///
/// Lower-cases the text, turns every character that is not an ASCII letter or
/// whitespace into a space, collapses whitespace runs and trims the ends.
/// Digits are dropped along with punctuation, so amounts never reach the model.
///
/// # Example
/// ```
/// use expense_categorizer::normalize;
///
/// assert_eq!(normalize("Swiggy order #42, ₹450!"), "swiggy order");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts unigrams followed by bigrams from already-normalized text.
pub(crate) fn terms(normalized: &str) -> Vec<String> {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let mut out: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    out.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_digits_and_symbols() {
        assert_eq!(normalize("Swiggy order biryani 450"), "swiggy order biryani");
        assert_eq!(normalize("McDonald's 250"), "mcdonald s");
        assert_eq!(normalize("  Uber\t\tride\n300  "), "uber ride");
        assert_eq!(normalize("Café ☕ 180"), "caf");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("1234 !!"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Swiggy order biryani 450",
            "  MIXED case\tText ",
            "x-ray 800",
            "",
            "Ünïcödé and emoji 🎉 mix",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_terms_unigrams_then_bigrams() {
        let t = terms("metro card recharge");
        assert_eq!(
            t,
            vec!["metro", "card", "recharge", "metro card", "card recharge"]
        );
        assert!(terms("").is_empty());
        assert_eq!(terms("uber"), vec!["uber"]);
    }
}
